pub mod badge;
pub mod machine;
pub mod state;
pub mod view;

pub use machine::{QuizSession, SessionSettings};
pub use view::{Outcome, QuizEvent, QuizView};
