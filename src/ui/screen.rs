use crate::engine::timer::Urgency;
use crate::session::badge::BadgeTier;
use crate::session::view::{Outcome, QuizEvent, QuizView};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeedbackKind {
    Correct,
    Incorrect,
    Info,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Feedback {
    pub kind: FeedbackKind,
    pub text: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResultsModel {
    pub score: u32,
    pub total: usize,
    pub badge: BadgeTier,
    pub offer_harder: bool,
}

/// What the terminal shows, folded from engine events. Holds no quiz
/// logic of its own.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScreenModel {
    pub prompt: String,
    pub index: usize,
    pub total: usize,
    pub score: u32,
    pub remaining: u32,
    pub urgency: Urgency,
    pub feedback: Option<Feedback>,
    pub buffer: Vec<String>,
    pub results: Option<ResultsModel>,
}

impl Default for ScreenModel {
    fn default() -> Self {
        Self {
            prompt: String::new(),
            index: 0,
            total: 0,
            score: 0,
            remaining: 0,
            urgency: Urgency::Calm,
            feedback: None,
            buffer: Vec::new(),
            results: None,
        }
    }
}

impl ScreenModel {
    /// Fraction shown on the progress bar; counts the current question.
    pub fn progress(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        if self.results.is_some() {
            return 1.0;
        }
        ((self.index + 1) as f64 / self.total as f64).min(1.0)
    }
}

impl QuizView for ScreenModel {
    fn publish(&mut self, event: QuizEvent) {
        match event {
            QuizEvent::WelcomeReady => *self = ScreenModel::default(),
            QuizEvent::QuestionActivated {
                prompt,
                index,
                total,
                score,
                seconds,
            } => {
                self.prompt = prompt;
                self.index = index;
                self.total = total;
                self.score = score;
                self.remaining = seconds;
                self.urgency = Urgency::Calm;
                self.feedback = None;
                self.buffer.clear();
                self.results = None;
            }
            QuizEvent::Tick { remaining, urgency } => {
                self.remaining = remaining;
                self.urgency = urgency;
            }
            QuizEvent::InputChanged { buffer } => self.buffer = buffer,
            QuizEvent::Verdict { outcome, score } => {
                self.score = score;
                self.buffer.clear();
                let kind = match outcome {
                    Outcome::Correct => FeedbackKind::Correct,
                    Outcome::Incorrect | Outcome::Timeout => FeedbackKind::Incorrect,
                };
                self.feedback = Some(Feedback {
                    kind,
                    text: outcome.label().to_string(),
                });
            }
            QuizEvent::AnswerRevealed { chord } => {
                self.feedback = Some(Feedback {
                    kind: FeedbackKind::Info,
                    text: format!("Correct: {chord}"),
                });
            }
            QuizEvent::ResultsReady {
                score,
                total,
                badge,
                offer_harder,
            } => {
                self.score = score;
                self.results = Some(ResultsModel {
                    score,
                    total,
                    badge,
                    offer_harder,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn activated(index: usize) -> QuizEvent {
        QuizEvent::QuestionActivated {
            prompt: "Zoom In".to_string(),
            index,
            total: 10,
            score: 3,
            seconds: 15,
        }
    }

    #[test]
    fn test_activation_clears_previous_feedback() {
        let mut model = ScreenModel::default();
        model.publish(QuizEvent::Verdict {
            outcome: Outcome::Incorrect,
            score: 3,
        });
        model.publish(activated(4));
        assert_eq!(model.feedback, None);
        assert_eq!(model.prompt, "Zoom In");
        assert_eq!(model.remaining, 15);
        assert!((model.progress() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_reveal_shows_answer() {
        let mut model = ScreenModel::default();
        model.publish(activated(0));
        model.publish(QuizEvent::Verdict {
            outcome: Outcome::Timeout,
            score: 3,
        });
        model.publish(QuizEvent::AnswerRevealed {
            chord: "⌘ + Z".to_string(),
        });
        let feedback = model.feedback.unwrap();
        assert_eq!(feedback.kind, FeedbackKind::Info);
        assert_eq!(feedback.text, "Correct: ⌘ + Z");
    }

    #[test]
    fn test_results_fill_progress() {
        let mut model = ScreenModel::default();
        model.publish(activated(9));
        model.publish(QuizEvent::ResultsReady {
            score: 8,
            total: 10,
            badge: BadgeTier::Silver,
            offer_harder: true,
        });
        assert_eq!(model.progress(), 1.0);
        assert_eq!(model.results.unwrap().badge, BadgeTier::Silver);
    }

    #[test]
    fn test_welcome_resets_everything() {
        let mut model = ScreenModel::default();
        model.publish(activated(2));
        model.publish(QuizEvent::WelcomeReady);
        assert_eq!(model, ScreenModel::default());
    }
}
