use crate::catalog::record::{Difficulty, ShortcutRecord};
use crate::engine::pool::Pool;
use crate::engine::timer::TimerHandle;
use crate::keyboard::platform::Platform;
use crate::session::badge::BadgeTier;
use crate::session::view::Outcome;

/// Mutable fields of one running quiz. Only the session's transition
/// functions touch these.
#[derive(Debug)]
pub struct SessionState {
    pub difficulty: Difficulty,
    pub score: u32,
    pub index: usize,
    pub pool: Pool,
    /// True from the moment a verdict is taken until the next question is
    /// activated.
    pub locked: bool,
    pub platform: Platform,
    pub time_remaining: u32,
    pub timer: Option<TimerHandle>,
}

impl SessionState {
    pub fn new(difficulty: Difficulty, pool: Pool, platform: Platform) -> Self {
        Self {
            difficulty,
            score: 0,
            index: 0,
            pool,
            locked: false,
            platform,
            time_remaining: 0,
            timer: None,
        }
    }

    pub fn total(&self) -> usize {
        self.pool.len()
    }

    pub fn current(&self) -> Option<&ShortcutRecord> {
        self.pool.get(self.index)
    }

    pub fn is_finished(&self) -> bool {
        self.index >= self.pool.len()
    }

    /// Check-and-set. Returns false if the question was already locked.
    pub fn try_lock(&mut self) -> bool {
        if self.locked {
            return false;
        }
        self.locked = true;
        true
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuizSummary {
    pub difficulty: Difficulty,
    pub score: u32,
    pub total: usize,
    pub badge: BadgeTier,
    pub offer_harder: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Welcome,
    Active,
    /// Verdict taken. Correct waits out the acknowledgment delay; the other
    /// outcomes wait for a reveal request.
    Locked(Outcome),
    /// Answer shown, waiting for the player to continue.
    Revealed,
    Results(QuizSummary),
}

impl Phase {
    pub fn in_quiz(self) -> bool {
        matches!(self, Phase::Active | Phase::Locked(_) | Phase::Revealed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_lock_is_check_and_set() {
        let mut state = SessionState::new(Difficulty::Easy, Pool::default(), Platform::Win);
        assert!(state.try_lock());
        assert!(!state.try_lock());
        assert!(state.locked);
    }

    #[test]
    fn test_empty_pool_is_finished() {
        let state = SessionState::new(Difficulty::Easy, Pool::default(), Platform::Mac);
        assert!(state.is_finished());
        assert!(state.current().is_none());
    }
}
