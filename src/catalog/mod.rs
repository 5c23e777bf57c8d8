pub mod record;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::error::QuizError;
use record::{Difficulty, RawRecord, ShortcutRecord};

const BUNDLED_SHORTCUTS: &str = include_str!("../../assets/shortcuts.json");

/// Read-only collection of quiz questions. Every record has been shape
/// checked by the time it lands here.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    records: Vec<ShortcutRecord>,
}

impl Catalog {
    pub fn from_records(records: Vec<ShortcutRecord>) -> Self {
        Self { records }
    }

    pub fn from_json(json: &str) -> Result<Self, QuizError> {
        let raw: Vec<RawRecord> = serde_json::from_str(json)?;
        let records = raw
            .into_iter()
            .map(ShortcutRecord::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { records })
    }

    pub fn bundled() -> Result<Self, QuizError> {
        Self::from_json(BUNDLED_SHORTCUTS)
    }

    /// Loads a user catalog when a path is given, otherwise the bundled one.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let catalog = match path {
            Some(path) => {
                let content = fs::read_to_string(path)
                    .with_context(|| format!("reading catalog {}", path.display()))?;
                Self::from_json(&content)
                    .with_context(|| format!("loading catalog {}", path.display()))?
            }
            None => Self::bundled().context("loading bundled catalog")?,
        };
        tracing::info!(
            records = catalog.len(),
            easy = catalog.count(Difficulty::Easy),
            medium = catalog.count(Difficulty::Medium),
            hard = catalog.count(Difficulty::Hard),
            "catalog loaded"
        );
        Ok(catalog)
    }

    pub fn records(&self) -> &[ShortcutRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn subset(&self, difficulty: Difficulty) -> Vec<&ShortcutRecord> {
        self.records
            .iter()
            .filter(|r| r.difficulty == difficulty)
            .collect()
    }

    pub fn count(&self, difficulty: Difficulty) -> usize {
        self.records
            .iter()
            .filter(|r| r.difficulty == difficulty)
            .count()
    }
}
