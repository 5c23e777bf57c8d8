use crate::engine::timer::Urgency;
use crate::session::badge::BadgeTier;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Correct,
    Incorrect,
    Timeout,
}

impl Outcome {
    pub fn label(self) -> &'static str {
        match self {
            Outcome::Correct => "Correct!",
            Outcome::Incorrect => "Incorrect",
            Outcome::Timeout => "Time's up",
        }
    }
}

/// Everything the engine tells the presentation layer. The view never
/// calls back into the session from inside `publish`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuizEvent {
    WelcomeReady,
    QuestionActivated {
        prompt: String,
        index: usize,
        total: usize,
        score: u32,
        seconds: u32,
    },
    Tick {
        remaining: u32,
        urgency: Urgency,
    },
    InputChanged {
        buffer: Vec<String>,
    },
    Verdict {
        outcome: Outcome,
        score: u32,
    },
    AnswerRevealed {
        chord: String,
    },
    ResultsReady {
        score: u32,
        total: usize,
        badge: BadgeTier,
        offer_harder: bool,
    },
}

pub trait QuizView {
    fn publish(&mut self, event: QuizEvent);
}

/// Recording view, handy for tests and headless runs.
impl QuizView for Vec<QuizEvent> {
    fn publish(&mut self, event: QuizEvent) {
        self.push(event);
    }
}
