use crate::catalog::record::{Chord, Modifier};
use crate::engine::matcher::{InputMode, InputStrategy, KeyOutcome, Match, literal_eq};
use crate::keyboard::observed::ObservedKey;

/// Judges the keydowns seen since the question was activated.
///
/// Modifier-only keydowns never count. For every chord except `0`,`0` the
/// first qualifying keydown decides. The two-zero chord is a press-press
/// sequence: bare `0` arms, a second bare `0` is correct, anything else
/// while armed is wrong.
pub fn evaluate(expected: &Chord, keys: &[ObservedKey]) -> Match {
    let mut qualifying = keys.iter().filter(|k| !k.is_modifier_only());

    if expected.is_double_zero() {
        let mut zeros = 0;
        for key in qualifying {
            if !is_bare_zero(key) {
                return Match::Incorrect;
            }
            zeros += 1;
            if zeros == 2 {
                return Match::Correct;
            }
        }
        return Match::Pending;
    }

    match qualifying.next() {
        Some(key) if matches_keydown(expected, key) => Match::Correct,
        Some(_) => Match::Incorrect,
        None => Match::Pending,
    }
}

/// Literal check plus an exact match on all four modifiers.
pub fn matches_keydown(expected: &Chord, key: &ObservedKey) -> bool {
    let literal_ok = match expected.literal() {
        Some(literal) => literal_eq(literal, &key.key) || (literal == "space" && key.code == "Space"),
        None => true,
    };
    literal_ok
        && Modifier::ALL
            .iter()
            .all(|m| expected.has_modifier(*m) == key.modifier_held(*m))
}

fn is_bare_zero(key: &ObservedKey) -> bool {
    key.key == "0" && !key.any_modifier_held()
}

#[derive(Default)]
pub struct ImmediateMatcher {
    keys: Vec<ObservedKey>,
}

impl InputStrategy for ImmediateMatcher {
    fn mode(&self) -> InputMode {
        InputMode::Immediate
    }

    fn on_key(&mut self, expected: &Chord, key: &ObservedKey) -> KeyOutcome {
        if key.is_modifier_only() {
            return KeyOutcome::Ignored;
        }
        self.keys.push(key.clone());
        match evaluate(expected, &self.keys) {
            Match::Correct => KeyOutcome::Verdict { correct: true },
            Match::Incorrect => KeyOutcome::Verdict { correct: false },
            Match::Pending => KeyOutcome::Pending,
        }
    }

    fn submit(&self, _expected: &Chord) -> Option<bool> {
        None
    }

    fn reset(&mut self) {
        self.keys.clear();
    }

    fn buffer(&self) -> &[String] {
        &[]
    }
}
