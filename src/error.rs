use thiserror::Error;

use crate::catalog::record::Difficulty;

#[derive(Debug, Error)]
pub enum QuizError {
    /// Neither the requested difficulty nor the `easy` fallback has any records.
    #[error("no shortcuts available for difficulty '{difficulty}' (easy fallback is empty too)")]
    EmptyCatalogSubset { difficulty: Difficulty },

    #[error("shortcut '{name}' has an invalid {platform} chord {chord:?}")]
    InvalidChordShape {
        name: String,
        platform: &'static str,
        chord: Vec<String>,
    },

    #[error("shortcut '{name}' has unknown difficulty '{value}'")]
    UnknownDifficulty { name: String, value: String },

    /// A verdict arrived for a question that is already locked. Expected
    /// race between the timer and keyboard; never shown to the user.
    #[error("question {index} already resolved")]
    DoubleResolution { index: usize },

    #[error("failed to parse shortcut catalog: {0}")]
    CatalogParse(#[from] serde_json::Error),
}
