use crate::catalog::record::{Chord, KeyToken, Modifier};
use crate::engine::matcher::{InputMode, InputStrategy, KeyOutcome, literal_eq};
use crate::keyboard::observed::ObservedKey;

/// Judges a submitted buffer of raw key names.
///
/// The buffer must be exactly as long as the chord. Every modifier in the
/// chord must appear (raw `Control` or marker `ctrl`), and some non-modifier
/// entry must equal the literal.
pub fn evaluate(expected: &Chord, buffer: &[String]) -> bool {
    if buffer.len() != expected.len() {
        return false;
    }
    if expected.is_double_zero() {
        return buffer.iter().all(|id| id == "0");
    }

    expected.tokens().iter().all(|token| match token {
        KeyToken::Modifier(m) => buffer.iter().any(|id| m.matches_identifier(id)),
        KeyToken::Literal(literal) => buffer
            .iter()
            .filter(|id| !is_modifier_identifier(id))
            .any(|id| literal_eq(literal, id) || (literal == "space" && id == " ")),
    })
}

fn is_modifier_identifier(id: &str) -> bool {
    Modifier::ALL.iter().any(|m| m.matches_identifier(id))
}

#[derive(Default)]
pub struct BufferedMatcher {
    buffer: Vec<String>,
}

impl BufferedMatcher {
    /// Appends unless already present. `0` may repeat so the two-zero chord
    /// can be entered.
    fn push(&mut self, id: String) -> bool {
        if id != "0" && self.buffer.contains(&id) {
            return false;
        }
        self.buffer.push(id);
        true
    }
}

impl InputStrategy for BufferedMatcher {
    fn mode(&self) -> InputMode {
        InputMode::Buffered
    }

    fn on_key(&mut self, _expected: &Chord, key: &ObservedKey) -> KeyOutcome {
        let mut changed = false;
        for id in key.raw_identifiers() {
            changed |= self.push(id);
        }
        if changed {
            KeyOutcome::BufferChanged
        } else {
            KeyOutcome::Ignored
        }
    }

    fn submit(&self, expected: &Chord) -> Option<bool> {
        Some(evaluate(expected, &self.buffer))
    }

    fn reset(&mut self) {
        self.buffer.clear();
    }

    fn buffer(&self) -> &[String] {
        &self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chord(tokens: &[&str]) -> Chord {
        Chord::parse(tokens).unwrap()
    }

    fn buf(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_shift_tab() {
        let chord = chord(&["shiftKey", "tab"]);
        assert!(evaluate(&chord, &buf(&["Shift", "Tab"])));
        assert!(evaluate(&chord, &buf(&["Tab", "shift"])));
    }

    #[test]
    fn test_length_mismatch_fails() {
        let chord = chord(&["shiftKey", "tab"]);
        assert!(!evaluate(&chord, &buf(&["Shift", "Tab", "Tab"])));
        assert!(!evaluate(&chord, &buf(&["Tab"])));
    }

    #[test]
    fn test_missing_modifier_fails() {
        assert!(!evaluate(&chord(&["ctrlKey", "s"]), &buf(&["Shift", "s"])));
    }

    #[test]
    fn test_literal_must_be_non_modifier_entry() {
        assert!(!evaluate(&chord(&["ctrlKey", "s"]), &buf(&["Control", "Shift"])));
    }

    #[test]
    fn test_aliases() {
        assert!(evaluate(&chord(&["="]), &buf(&["+"])));
        assert!(evaluate(&chord(&["space"]), &buf(&[" "])));
        assert!(evaluate(&chord(&["metaKey", "S"]), &buf(&["Meta", "s"])));
    }

    #[test]
    fn test_double_zero_needs_exact_buffer() {
        let opacity = chord(&["0", "0"]);
        assert!(evaluate(&opacity, &buf(&["0", "0"])));
        assert!(!evaluate(&opacity, &buf(&["0"])));
        assert!(!evaluate(&opacity, &buf(&["0", "1"])));
        assert!(!evaluate(&opacity, &buf(&["0", "0", "0"])));
    }

    #[test]
    fn test_duplicates_are_suppressed_except_zero() {
        let opacity = chord(&["0", "0"]);
        let mut matcher = BufferedMatcher::default();
        matcher.on_key(&opacity, &ObservedKey::new("Tab").shift());
        assert_eq!(
            matcher.on_key(&opacity, &ObservedKey::new("Tab").shift()),
            KeyOutcome::Ignored
        );
        assert_eq!(matcher.buffer(), buf(&["Shift", "Tab"]).as_slice());

        matcher.reset();
        matcher.on_key(&opacity, &ObservedKey::new("0"));
        matcher.on_key(&opacity, &ObservedKey::new("0"));
        assert_eq!(matcher.buffer(), buf(&["0", "0"]).as_slice());
        assert_eq!(matcher.submit(&opacity), Some(true));
    }

    #[test]
    fn test_bare_modifier_then_key() {
        let save = chord(&["ctrlKey", "s"]);
        let mut matcher = BufferedMatcher::default();
        matcher.on_key(&save, &ObservedKey::new("Control").ctrl());
        matcher.on_key(&save, &ObservedKey::new("s").ctrl());
        assert_eq!(matcher.buffer(), buf(&["Control", "s"]).as_slice());
        assert_eq!(matcher.submit(&save), Some(true));
    }
}
