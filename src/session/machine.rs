use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::catalog::Catalog;
use crate::catalog::record::{Chord, Difficulty};
use crate::engine::matcher::{InputMode, InputStrategy, KeyOutcome, strategy_for};
use crate::engine::pool::build_pool;
use crate::engine::timer::{Countdown, TimerEvent, TimerHandle, Urgency};
use crate::error::QuizError;
use crate::keyboard::display;
use crate::keyboard::observed::ObservedKey;
use crate::keyboard::platform::Platform;
use crate::session::badge::BadgeThresholds;
use crate::session::state::{Phase, QuizSummary, SessionState};
use crate::session::view::{Outcome, QuizEvent, QuizView};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionSettings {
    pub question_count: usize,
    pub question_secs: u32,
    pub ack_delay: Duration,
    pub warn_secs: u32,
    pub danger_secs: u32,
    pub badges: BadgeThresholds,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            question_count: 10,
            question_secs: 15,
            ack_delay: Duration::from_millis(1200),
            warn_secs: 5,
            danger_secs: 2,
            badges: BadgeThresholds::default(),
        }
    }
}

/// The quiz state machine.
///
/// Two producers feed it for the live question: keyboard input
/// (`handle_key`, `submit`) and the countdown (`poll`). Whichever resolves
/// the question first takes the lock and cancels the countdown; everything
/// after that for the same question is dropped.
pub struct QuizSession<V: QuizView> {
    settings: SessionSettings,
    catalog: Catalog,
    platform: Platform,
    strategy: Box<dyn InputStrategy>,
    timer: Countdown,
    rng: SmallRng,
    phase: Phase,
    state: Option<SessionState>,
    last_difficulty: Option<Difficulty>,
    pending_advance: Option<Instant>,
    view: V,
}

impl<V: QuizView> QuizSession<V> {
    pub fn new(
        catalog: Catalog,
        platform: Platform,
        mode: InputMode,
        settings: SessionSettings,
        view: V,
    ) -> Self {
        Self {
            settings,
            catalog,
            platform,
            strategy: strategy_for(mode),
            timer: Countdown::new(),
            rng: SmallRng::from_entropy(),
            phase: Phase::Welcome,
            state: None,
            last_difficulty: None,
            pending_advance: None,
            view,
        }
    }

    /// Fixes the shuffle order, for reproducible runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = SmallRng::seed_from_u64(seed);
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> Option<&SessionState> {
        self.state.as_ref()
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn input_mode(&self) -> InputMode {
        self.strategy.mode()
    }

    pub fn input_buffer(&self) -> &[String] {
        self.strategy.buffer()
    }

    pub fn last_difficulty(&self) -> Option<Difficulty> {
        self.last_difficulty
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    /// Switches strategy. Refused while a quiz is running so one question
    /// never sees both.
    pub fn set_input_mode(&mut self, mode: InputMode) -> bool {
        if self.phase.in_quiz() {
            return false;
        }
        if self.strategy.mode() != mode {
            tracing::info!(%mode, "input mode changed");
            self.strategy = strategy_for(mode);
        }
        true
    }

    pub fn start_game(&mut self, difficulty: Difficulty, now: Instant) -> Result<(), QuizError> {
        let pool = build_pool(
            &self.catalog,
            difficulty,
            self.settings.question_count,
            &mut self.rng,
        )?;
        if pool.is_empty() {
            return Err(QuizError::EmptyCatalogSubset { difficulty });
        }

        self.timer.stop();
        self.pending_advance = None;
        self.strategy.reset();
        tracing::info!(%difficulty, questions = pool.len(), mode = %self.strategy.mode(), "quiz started");
        self.state = Some(SessionState::new(difficulty, pool, self.platform));
        self.last_difficulty = Some(difficulty);
        self.activate_question(now);
        Ok(())
    }

    /// Restarts the most recent difficulty. No-op before the first game.
    pub fn retake(&mut self, now: Instant) -> Result<(), QuizError> {
        match self.last_difficulty {
            Some(difficulty) => self.start_game(difficulty, now),
            None => Ok(()),
        }
    }

    /// Starts the follow-up difficulty, only when the results offered it.
    pub fn try_harder(&mut self, now: Instant) -> Result<(), QuizError> {
        match self.phase {
            Phase::Results(summary) if summary.offer_harder => {
                self.start_game(Difficulty::HARDER_FOLLOW_UP, now)
            }
            _ => {
                tracing::debug!("try harder not offered, ignoring");
                Ok(())
            }
        }
    }

    pub fn reset_game(&mut self) {
        self.timer.stop();
        self.pending_advance = None;
        self.strategy.reset();
        self.state = None;
        self.phase = Phase::Welcome;
        tracing::debug!("returned to welcome");
        self.view.publish(QuizEvent::WelcomeReady);
    }

    pub fn handle_key(&mut self, key: &ObservedKey, now: Instant) {
        let Some(expected) = self.live_chord() else {
            tracing::trace!(key = %key.key, "keydown outside a live question");
            return;
        };
        match self.strategy.on_key(&expected, key) {
            KeyOutcome::Verdict { correct: true } => self.settle(Outcome::Correct, now),
            KeyOutcome::Verdict { correct: false } => self.settle(Outcome::Incorrect, now),
            KeyOutcome::BufferChanged => self.view.publish(QuizEvent::InputChanged {
                buffer: self.strategy.buffer().to_vec(),
            }),
            KeyOutcome::Pending | KeyOutcome::Ignored => {}
        }
    }

    /// Judges the input buffer (buffered mode).
    pub fn submit(&mut self, now: Instant) {
        let Some(expected) = self.live_chord() else {
            return;
        };
        match self.strategy.submit(&expected) {
            Some(true) => self.settle(Outcome::Correct, now),
            Some(false) => self.settle(Outcome::Incorrect, now),
            None => tracing::debug!("submit ignored in immediate mode"),
        }
    }

    pub fn clear_input(&mut self) {
        if self.live_chord().is_none() {
            return;
        }
        self.strategy.reset();
        self.view.publish(QuizEvent::InputChanged { buffer: Vec::new() });
    }

    /// Shows the expected chord after an incorrect answer or a timeout.
    pub fn reveal(&mut self) {
        if !matches!(self.phase, Phase::Locked(Outcome::Incorrect | Outcome::Timeout)) {
            tracing::debug!(phase = ?self.phase, "reveal not available");
            return;
        }
        let Some(state) = self.state.as_mut() else {
            return;
        };
        let chord = state
            .current()
            .map(|record| display::chord_label(record.chord(state.platform), state.platform))
            .unwrap_or_default();
        state.index += 1;
        self.phase = Phase::Revealed;
        self.view.publish(QuizEvent::AnswerRevealed { chord });
    }

    pub fn continue_quiz(&mut self, now: Instant) {
        if self.phase != Phase::Revealed {
            tracing::debug!(phase = ?self.phase, "continue not available");
            return;
        }
        self.next_question(now);
    }

    /// Drives the countdown and the post-correct delay. Call on every host tick.
    pub fn poll(&mut self, now: Instant) {
        for event in self.timer.poll(now) {
            match event {
                TimerEvent::Tick { handle, remaining } => self.handle_tick(handle, remaining),
                TimerEvent::Expired { handle } => self.handle_timeout(handle, now),
            }
        }

        if self.pending_advance.is_some_and(|due| now >= due) {
            self.pending_advance = None;
            if self.phase == Phase::Locked(Outcome::Correct) {
                if let Some(state) = self.state.as_mut() {
                    state.index += 1;
                }
                self.next_question(now);
            }
        }
    }

    /// Expiry callback for `handle`. Stale handles and already-locked
    /// questions are ignored.
    pub fn handle_timeout(&mut self, handle: TimerHandle, now: Instant) {
        let live = self
            .state
            .as_ref()
            .is_some_and(|s| s.timer == Some(handle));
        if !live {
            tracing::trace!(?handle, "stale timer expiry dropped");
            return;
        }
        self.settle(Outcome::Timeout, now);
    }

    fn handle_tick(&mut self, handle: TimerHandle, remaining: u32) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        if state.locked || state.timer != Some(handle) {
            return;
        }
        state.time_remaining = remaining;
        let urgency =
            Urgency::from_remaining(remaining, self.settings.warn_secs, self.settings.danger_secs);
        self.view.publish(QuizEvent::Tick { remaining, urgency });
    }

    /// Chord of the live, unlocked question.
    fn live_chord(&self) -> Option<Chord> {
        if self.phase != Phase::Active {
            return None;
        }
        let state = self.state.as_ref()?;
        if state.locked {
            return None;
        }
        state
            .current()
            .map(|record| record.chord(state.platform).clone())
    }

    fn settle(&mut self, outcome: Outcome, now: Instant) {
        if let Err(err) = self.resolve(outcome, now) {
            tracing::trace!(%err, ?outcome, "late verdict ignored");
        }
    }

    fn resolve(&mut self, outcome: Outcome, now: Instant) -> Result<(), QuizError> {
        let Some(state) = self.state.as_mut() else {
            return Ok(());
        };
        if !state.try_lock() {
            return Err(QuizError::DoubleResolution { index: state.index });
        }
        if let Some(handle) = state.timer.take() {
            self.timer.cancel(handle);
        }
        self.strategy.reset();

        if outcome == Outcome::Correct {
            state.score += 1;
            self.pending_advance = Some(now + self.settings.ack_delay);
        }
        tracing::debug!(index = state.index, ?outcome, score = state.score, "question resolved");
        let score = state.score;
        self.phase = Phase::Locked(outcome);
        self.view.publish(QuizEvent::Verdict { outcome, score });
        Ok(())
    }

    fn next_question(&mut self, now: Instant) {
        if self.state.as_ref().is_none_or(SessionState::is_finished) {
            self.finish();
        } else {
            self.activate_question(now);
        }
    }

    fn activate_question(&mut self, now: Instant) {
        let seconds = self.settings.question_secs;
        let Some(state) = self.state.as_mut() else {
            return;
        };
        let Some(prompt) = state.current().map(|record| record.name.clone()) else {
            return;
        };

        state.locked = false;
        self.strategy.reset();
        state.timer = Some(self.timer.start(seconds, now));
        state.time_remaining = seconds;
        self.phase = Phase::Active;

        tracing::debug!(index = state.index, %prompt, "question activated");
        self.view.publish(QuizEvent::QuestionActivated {
            prompt,
            index: state.index,
            total: state.total(),
            score: state.score,
            seconds,
        });
    }

    fn finish(&mut self) {
        self.timer.stop();
        self.pending_advance = None;
        let Some(state) = self.state.take() else {
            return;
        };

        let badges = self.settings.badges;
        let summary = QuizSummary {
            difficulty: state.difficulty,
            score: state.score,
            total: state.total(),
            badge: badges.tier(state.score),
            offer_harder: badges.offers_harder(state.difficulty, state.score),
        };
        tracing::info!(
            difficulty = %summary.difficulty,
            score = summary.score,
            total = summary.total,
            badge = ?summary.badge,
            "quiz finished"
        );
        self.phase = Phase::Results(summary);
        self.view.publish(QuizEvent::ResultsReady {
            score: summary.score,
            total: summary.total,
            badge: summary.badge,
            offer_harder: summary.offer_harder,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::record::{RawRecord, ShortcutRecord};
    use crate::session::badge::BadgeTier;

    fn record(name: &str, difficulty: &str, win: &[&str]) -> ShortcutRecord {
        let chord: Vec<String> = win.iter().map(|s| s.to_string()).collect();
        ShortcutRecord::try_from(RawRecord {
            name: name.to_string(),
            difficulty: difficulty.to_string(),
            mac: chord.clone(),
            win: chord,
        })
        .unwrap()
    }

    /// Every easy question is Ctrl+K so tests know the answer regardless of
    /// shuffle order.
    fn session(mode: InputMode) -> QuizSession<Vec<QuizEvent>> {
        let records = (0..12)
            .map(|i| record(&format!("Action {i}"), "easy", &["ctrlKey", "k"]))
            .collect();
        QuizSession::new(
            Catalog::from_records(records),
            Platform::Win,
            mode,
            SessionSettings::default(),
            Vec::new(),
        )
        .with_seed(42)
    }

    fn right() -> ObservedKey {
        ObservedKey::new("k").ctrl()
    }

    fn wrong() -> ObservedKey {
        ObservedKey::new("j").ctrl()
    }

    fn verdicts(events: &[QuizEvent]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, QuizEvent::Verdict { .. }))
            .count()
    }

    #[test]
    fn test_start_game_activates_first_question() {
        let t0 = Instant::now();
        let mut quiz = session(InputMode::Immediate);
        quiz.start_game(Difficulty::Easy, t0).unwrap();

        assert_eq!(quiz.phase(), Phase::Active);
        let state = quiz.state().unwrap();
        assert_eq!((state.index, state.score), (0, 0));
        assert!(!state.locked);
        assert!(matches!(
            quiz.view().last(),
            Some(QuizEvent::QuestionActivated { index: 0, total: 10, score: 0, seconds: 15, .. })
        ));
    }

    #[test]
    fn test_empty_catalog_refuses_to_start() {
        let t0 = Instant::now();
        let mut quiz = QuizSession::new(
            Catalog::default(),
            Platform::Win,
            InputMode::Immediate,
            SessionSettings::default(),
            Vec::new(),
        );
        let err = quiz.start_game(Difficulty::Medium, t0).unwrap_err();
        assert!(matches!(err, QuizError::EmptyCatalogSubset { .. }));
        assert_eq!(quiz.phase(), Phase::Welcome);
        assert!(quiz.state().is_none());
        assert!(quiz.view().is_empty());
    }

    #[test]
    fn test_correct_answer_scores_then_advances_after_delay() {
        let t0 = Instant::now();
        let mut quiz = session(InputMode::Immediate);
        quiz.start_game(Difficulty::Easy, t0).unwrap();

        quiz.handle_key(&right(), t0);
        assert_eq!(quiz.phase(), Phase::Locked(Outcome::Correct));
        assert_eq!(quiz.state().unwrap().score, 1);
        assert_eq!(quiz.state().unwrap().index, 0);

        quiz.poll(t0 + Duration::from_millis(1100));
        assert_eq!(quiz.state().unwrap().index, 0);

        quiz.poll(t0 + Duration::from_millis(1200));
        assert_eq!(quiz.phase(), Phase::Active);
        assert_eq!(quiz.state().unwrap().index, 1);
    }

    #[test]
    fn test_keys_while_locked_are_ignored() {
        let t0 = Instant::now();
        let mut quiz = session(InputMode::Immediate);
        quiz.start_game(Difficulty::Easy, t0).unwrap();

        quiz.handle_key(&wrong(), t0);
        quiz.handle_key(&right(), t0);
        quiz.handle_key(&right(), t0);
        assert_eq!(quiz.phase(), Phase::Locked(Outcome::Incorrect));
        assert_eq!(quiz.state().unwrap().score, 0);
        assert_eq!(verdicts(quiz.view()), 1);
    }

    #[test]
    fn test_stale_expiry_after_verdict_is_a_no_op() {
        let t0 = Instant::now();
        let mut quiz = session(InputMode::Immediate);
        quiz.start_game(Difficulty::Easy, t0).unwrap();
        let handle = quiz.state().unwrap().timer.unwrap();

        quiz.handle_key(&right(), t0);
        quiz.handle_timeout(handle, t0 + Duration::from_secs(15));

        let state = quiz.state().unwrap();
        assert_eq!((state.score, state.index), (1, 0));
        assert_eq!(quiz.phase(), Phase::Locked(Outcome::Correct));
        assert_eq!(verdicts(quiz.view()), 1);
    }

    #[test]
    fn test_verdict_cancels_the_countdown() {
        let t0 = Instant::now();
        let mut quiz = session(InputMode::Immediate);
        quiz.start_game(Difficulty::Easy, t0).unwrap();
        quiz.handle_key(&wrong(), t0 + Duration::from_secs(3));

        let before = quiz.view().len();
        quiz.poll(t0 + Duration::from_secs(30));
        assert_eq!(quiz.view().len(), before);
        assert_eq!(quiz.phase(), Phase::Locked(Outcome::Incorrect));
    }

    #[test]
    fn test_timeout_then_reveal_then_continue() {
        let t0 = Instant::now();
        let mut quiz = session(InputMode::Immediate);
        quiz.start_game(Difficulty::Easy, t0).unwrap();

        quiz.poll(t0 + Duration::from_secs(15));
        assert_eq!(quiz.phase(), Phase::Locked(Outcome::Timeout));
        assert_eq!(quiz.state().unwrap().index, 0);

        quiz.handle_key(&right(), t0 + Duration::from_secs(16));
        assert_eq!(quiz.state().unwrap().score, 0);

        quiz.reveal();
        assert_eq!(quiz.phase(), Phase::Revealed);
        assert_eq!(quiz.state().unwrap().index, 1);
        assert_eq!(
            quiz.view().last(),
            Some(&QuizEvent::AnswerRevealed {
                chord: "Ctrl + K".to_string()
            })
        );

        quiz.reveal();
        assert_eq!(quiz.state().unwrap().index, 1);

        quiz.continue_quiz(t0 + Duration::from_secs(17));
        assert_eq!(quiz.phase(), Phase::Active);
        assert!(!quiz.state().unwrap().locked);
    }

    #[test]
    fn test_ticks_report_urgency() {
        let t0 = Instant::now();
        let mut quiz = session(InputMode::Immediate);
        quiz.start_game(Difficulty::Easy, t0).unwrap();
        quiz.poll(t0 + Duration::from_secs(10));

        assert_eq!(quiz.state().unwrap().time_remaining, 5);
        assert_eq!(
            quiz.view().last(),
            Some(&QuizEvent::Tick {
                remaining: 5,
                urgency: Urgency::Warning
            })
        );
    }

    #[test]
    fn test_reset_from_any_state_returns_to_welcome() {
        let t0 = Instant::now();
        let mut quiz = session(InputMode::Immediate);
        quiz.start_game(Difficulty::Easy, t0).unwrap();
        quiz.handle_key(&right(), t0);

        quiz.reset_game();
        assert_eq!(quiz.phase(), Phase::Welcome);
        assert!(quiz.state().is_none());
        assert_eq!(quiz.view().last(), Some(&QuizEvent::WelcomeReady));

        let before = quiz.view().len();
        quiz.poll(t0 + Duration::from_secs(60));
        assert_eq!(quiz.view().len(), before);
    }

    #[test]
    fn test_buffered_mode_submits_on_request() {
        let t0 = Instant::now();
        let mut quiz = session(InputMode::Buffered);
        quiz.start_game(Difficulty::Easy, t0).unwrap();

        quiz.handle_key(&ObservedKey::new("k").ctrl(), t0);
        assert_eq!(quiz.phase(), Phase::Active);
        assert_eq!(quiz.input_buffer(), ["Control".to_string(), "k".to_string()].as_slice());

        quiz.submit(t0);
        assert_eq!(quiz.phase(), Phase::Locked(Outcome::Correct));
        assert!(quiz.input_buffer().is_empty());
    }

    #[test]
    fn test_buffered_clear_empties_buffer() {
        let t0 = Instant::now();
        let mut quiz = session(InputMode::Buffered);
        quiz.start_game(Difficulty::Easy, t0).unwrap();

        quiz.handle_key(&ObservedKey::new("x"), t0);
        quiz.clear_input();
        assert!(quiz.input_buffer().is_empty());
        assert_eq!(
            quiz.view().last(),
            Some(&QuizEvent::InputChanged { buffer: Vec::new() })
        );
    }

    #[test]
    fn test_input_mode_locked_during_quiz() {
        let t0 = Instant::now();
        let mut quiz = session(InputMode::Immediate);
        assert!(quiz.set_input_mode(InputMode::Buffered));
        quiz.start_game(Difficulty::Easy, t0).unwrap();
        assert!(!quiz.set_input_mode(InputMode::Immediate));
        assert_eq!(quiz.input_mode(), InputMode::Buffered);
    }

    #[test]
    fn test_perfect_run_earns_gold_and_offers_harder() {
        let mut now = Instant::now();
        let mut quiz = session(InputMode::Immediate);
        quiz.start_game(Difficulty::Easy, now).unwrap();

        for _ in 0..10 {
            quiz.handle_key(&right(), now);
            now += Duration::from_secs(2);
            quiz.poll(now);
        }

        assert_eq!(
            quiz.view().last(),
            Some(&QuizEvent::ResultsReady {
                score: 10,
                total: 10,
                badge: BadgeTier::Gold,
                offer_harder: true
            })
        );
        assert!(quiz.state().is_none());

        quiz.try_harder(now).unwrap();
        assert_eq!(quiz.phase(), Phase::Active);
        assert_eq!(quiz.state().unwrap().difficulty, Difficulty::Hard);
    }

    #[test]
    fn test_try_harder_requires_offer() {
        let t0 = Instant::now();
        let mut quiz = session(InputMode::Immediate);
        quiz.try_harder(t0).unwrap();
        assert_eq!(quiz.phase(), Phase::Welcome);
    }

    #[test]
    fn test_retake_restarts_same_difficulty() {
        let t0 = Instant::now();
        let mut quiz = session(InputMode::Immediate);
        quiz.retake(t0).unwrap();
        assert_eq!(quiz.phase(), Phase::Welcome);

        quiz.start_game(Difficulty::Easy, t0).unwrap();
        quiz.handle_key(&right(), t0);
        quiz.retake(t0).unwrap();
        let state = quiz.state().unwrap();
        assert_eq!((state.score, state.index), (0, 0));
        assert_eq!(quiz.phase(), Phase::Active);
    }
}
