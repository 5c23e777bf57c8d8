use rand::Rng;
use rand::seq::SliceRandom;

use crate::catalog::Catalog;
use crate::catalog::record::{Difficulty, ShortcutRecord};
use crate::error::QuizError;

/// Fixed question order for one session.
#[derive(Clone, Debug, Default)]
pub struct Pool {
    questions: Vec<ShortcutRecord>,
}

impl Pool {
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ShortcutRecord> {
        self.questions.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ShortcutRecord> {
        self.questions.iter()
    }
}

/// Builds exactly `n` questions for `difficulty`.
///
/// The whole padded list is shuffled before truncation, so when fewer than
/// `n` records match, repeated copies are not spread evenly over the run.
pub fn build_pool<R: Rng + ?Sized>(
    catalog: &Catalog,
    difficulty: Difficulty,
    n: usize,
    rng: &mut R,
) -> Result<Pool, QuizError> {
    let mut questions = candidates(catalog, difficulty)?;
    pad_to(&mut questions, n);
    questions.shuffle(rng);
    questions.truncate(n);
    Ok(Pool { questions })
}

/// Records for `difficulty`, falling back to `easy` when that subset is empty.
pub fn candidates(
    catalog: &Catalog,
    difficulty: Difficulty,
) -> Result<Vec<ShortcutRecord>, QuizError> {
    let mut subset = catalog.subset(difficulty);
    if subset.is_empty() {
        tracing::warn!(%difficulty, "no shortcuts for difficulty, falling back to easy");
        subset = catalog.subset(Difficulty::Easy);
    }
    if subset.is_empty() {
        return Err(QuizError::EmptyCatalogSubset { difficulty });
    }
    Ok(subset.into_iter().cloned().collect())
}

/// Cycles through the existing entries until `questions` holds `n` items.
pub fn pad_to(questions: &mut Vec<ShortcutRecord>, n: usize) {
    let k = questions.len();
    if k == 0 || k >= n {
        return;
    }
    tracing::debug!(available = k, wanted = n, "padding question list with repeats");
    let mut i = 0;
    while questions.len() < n {
        let repeat = questions[i % k].clone();
        questions.push(repeat);
        i += 1;
    }
}
