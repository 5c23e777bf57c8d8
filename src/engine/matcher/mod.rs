//! Chord matching. Two strategies share one capability:
//!
//! - [`immediate`] judges on the triggering keydown, like a real shortcut.
//! - [`buffered`] collects keys and judges only on explicit submission.
//!
//! A session picks one strategy and keeps it for every question.

pub mod buffered;
pub mod immediate;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalog::record::Chord;
use crate::keyboard::observed::ObservedKey;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    Immediate,
    Buffered,
}

impl InputMode {
    pub fn as_str(self) -> &'static str {
        match self {
            InputMode::Immediate => "immediate",
            InputMode::Buffered => "buffered",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            InputMode::Immediate => InputMode::Buffered,
            InputMode::Buffered => InputMode::Immediate,
        }
    }
}

impl fmt::Display for InputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "immediate" => Ok(InputMode::Immediate),
            "buffered" => Ok(InputMode::Buffered),
            other => Err(format!("unknown input mode '{other}'")),
        }
    }
}

/// Result of judging some input against a chord.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Match {
    Correct,
    Incorrect,
    /// Not enough input yet (first `0` of the two-zero sequence, or no
    /// qualifying keydown at all).
    Pending,
}

impl Match {
    pub fn is_correct(self) -> bool {
        self == Match::Correct
    }
}

/// Input as each strategy observes it.
#[derive(Clone, Copy, Debug)]
pub enum ObservedInput<'a> {
    Keydowns(&'a [ObservedKey]),
    Buffer(&'a [String]),
}

/// Pure evaluation of `input` against `expected`.
pub fn evaluate(expected: &Chord, input: ObservedInput<'_>) -> Match {
    match input {
        ObservedInput::Keydowns(keys) => immediate::evaluate(expected, keys),
        ObservedInput::Buffer(buffer) => {
            if buffered::evaluate(expected, buffer) {
                Match::Correct
            } else {
                Match::Incorrect
            }
        }
    }
}

/// What a single keydown did to the active question.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyOutcome {
    Ignored,
    Pending,
    BufferChanged,
    Verdict { correct: bool },
}

pub trait InputStrategy: Send {
    fn mode(&self) -> InputMode;

    fn on_key(&mut self, expected: &Chord, key: &ObservedKey) -> KeyOutcome;

    /// Judges accumulated input on explicit submission. Strategies that
    /// judge per keydown return `None`.
    fn submit(&self, expected: &Chord) -> Option<bool>;

    fn reset(&mut self);

    fn buffer(&self) -> &[String];
}

pub fn strategy_for(mode: InputMode) -> Box<dyn InputStrategy> {
    match mode {
        InputMode::Immediate => Box::new(immediate::ImmediateMatcher::default()),
        InputMode::Buffered => Box::new(buffered::BufferedMatcher::default()),
    }
}

/// Literal comparison shared by both strategies: case-insensitive, with `=`
/// accepting `+`.
pub(crate) fn literal_eq(literal: &str, observed: &str) -> bool {
    observed.to_lowercase() == literal || (literal == "=" && observed == "+")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluate_is_pure() {
        let chord = Chord::parse(&["ctrlKey", "s"]).unwrap();
        let keys = [ObservedKey::new("s").ctrl()];
        let first = evaluate(&chord, ObservedInput::Keydowns(&keys));
        for _ in 0..5 {
            assert_eq!(evaluate(&chord, ObservedInput::Keydowns(&keys)), first);
        }
        assert_eq!(first, Match::Correct);

        let buffer = vec!["Control".to_string(), "s".to_string()];
        assert_eq!(evaluate(&chord, ObservedInput::Buffer(&buffer)), Match::Correct);
        assert_eq!(evaluate(&chord, ObservedInput::Buffer(&buffer)), Match::Correct);
    }

    #[test]
    fn test_terminal_plus_answers_zoom_in_in_both_modes() {
        use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

        let zoom_in = Chord::parse(&["="]).unwrap();
        let plus =
            ObservedKey::from_key_event(&KeyEvent::new(KeyCode::Char('+'), KeyModifiers::NONE))
                .unwrap();

        let mut immediate = strategy_for(InputMode::Immediate);
        assert_eq!(
            immediate.on_key(&zoom_in, &plus),
            KeyOutcome::Verdict { correct: true }
        );

        let mut buffered = strategy_for(InputMode::Buffered);
        assert_eq!(buffered.on_key(&zoom_in, &plus), KeyOutcome::BufferChanged);
        assert_eq!(buffered.buffer(), ["+"]);
        assert_eq!(buffered.submit(&zoom_in), Some(true));
    }

    #[test]
    fn test_strategy_for_mode() {
        assert_eq!(strategy_for(InputMode::Immediate).mode(), InputMode::Immediate);
        assert_eq!(strategy_for(InputMode::Buffered).mode(), InputMode::Buffered);
    }

    #[test]
    fn test_input_mode_parse_and_toggle() {
        assert_eq!("Buffered".parse::<InputMode>(), Ok(InputMode::Buffered));
        assert!("live".parse::<InputMode>().is_err());
        assert_eq!(InputMode::Immediate.toggled(), InputMode::Buffered);
    }
}
