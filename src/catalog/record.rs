use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::QuizError;
use crate::keyboard::platform::Platform;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    /// Case-insensitive parse, matching how catalog files spell difficulties.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Target of the "try harder" follow-up offered after a strong easy run.
    /// There is no step-by-step ladder: the offer always jumps to hard.
    pub const HARDER_FOLLOW_UP: Difficulty = Difficulty::Hard;
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Difficulty::parse(s).ok_or_else(|| format!("unknown difficulty '{s}'"))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Modifier {
    Meta,
    Ctrl,
    Shift,
    Alt,
}

impl Modifier {
    pub const ALL: [Modifier; 4] = [Modifier::Meta, Modifier::Ctrl, Modifier::Alt, Modifier::Shift];

    pub fn from_token(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "metakey" | "meta" | "cmd" | "command" => Some(Modifier::Meta),
            "ctrlkey" | "ctrl" | "control" => Some(Modifier::Ctrl),
            "shiftkey" | "shift" => Some(Modifier::Shift),
            "altkey" | "alt" | "option" => Some(Modifier::Alt),
            _ => None,
        }
    }

    /// Lowercase marker form used in catalogs and accepted in buffers.
    pub fn marker(self) -> &'static str {
        match self {
            Modifier::Meta => "meta",
            Modifier::Ctrl => "ctrl",
            Modifier::Shift => "shift",
            Modifier::Alt => "alt",
        }
    }

    /// Key name a keyboard reports when the modifier itself is pressed.
    pub fn raw_name(self) -> &'static str {
        match self {
            Modifier::Meta => "Meta",
            Modifier::Ctrl => "Control",
            Modifier::Shift => "Shift",
            Modifier::Alt => "Alt",
        }
    }

    /// True if `identifier` names this modifier in either raw or marker form.
    pub fn matches_identifier(self, identifier: &str) -> bool {
        identifier == self.raw_name() || identifier == self.marker()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KeyToken {
    Modifier(Modifier),
    /// Non-modifier key, stored lowercase (`"s"`, `"escape"`, `"="`).
    Literal(String),
}

impl KeyToken {
    pub fn parse(raw: &str) -> Self {
        match Modifier::from_token(raw) {
            Some(m) => KeyToken::Modifier(m),
            None => KeyToken::Literal(raw.to_lowercase()),
        }
    }

    pub fn is_modifier(&self) -> bool {
        matches!(self, KeyToken::Modifier(_))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chord {
    tokens: Vec<KeyToken>,
}

impl Chord {
    /// Parses tokens and enforces the one-literal rule. The only two-literal
    /// chord allowed is the `0`,`0` press-press sequence.
    pub fn parse<S: AsRef<str>>(raw: &[S]) -> Option<Self> {
        let tokens: Vec<KeyToken> = raw.iter().map(|t| KeyToken::parse(t.as_ref())).collect();
        let chord = Self { tokens };
        if chord.tokens.is_empty() {
            return None;
        }
        let literals = chord.literals().count();
        if literals > 1 && !chord.is_double_zero() {
            return None;
        }
        Some(chord)
    }

    pub fn tokens(&self) -> &[KeyToken] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn is_double_zero(&self) -> bool {
        matches!(
            self.tokens.as_slice(),
            [KeyToken::Literal(a), KeyToken::Literal(b)] if a == "0" && b == "0"
        )
    }

    /// The single non-modifier key, if the chord has one.
    pub fn literal(&self) -> Option<&str> {
        self.literals().next()
    }

    pub fn has_modifier(&self, modifier: Modifier) -> bool {
        self.tokens
            .iter()
            .any(|t| matches!(t, KeyToken::Modifier(m) if *m == modifier))
    }

    fn literals(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().filter_map(|t| match t {
            KeyToken::Literal(s) => Some(s.as_str()),
            KeyToken::Modifier(_) => None,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShortcutRecord {
    pub name: String,
    pub difficulty: Difficulty,
    pub mac: Chord,
    pub win: Chord,
}

impl ShortcutRecord {
    pub fn chord(&self, platform: Platform) -> &Chord {
        match platform {
            Platform::Mac => &self.mac,
            Platform::Win => &self.win,
        }
    }
}

/// On-disk record shape shared by the bundled dataset and user catalogs.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RawRecord {
    pub name: String,
    pub difficulty: String,
    pub mac: Vec<String>,
    pub win: Vec<String>,
}

impl TryFrom<RawRecord> for ShortcutRecord {
    type Error = QuizError;

    fn try_from(raw: RawRecord) -> Result<Self, Self::Error> {
        let difficulty =
            Difficulty::parse(&raw.difficulty).ok_or_else(|| QuizError::UnknownDifficulty {
                name: raw.name.clone(),
                value: raw.difficulty.clone(),
            })?;
        let mac = Chord::parse(&raw.mac).ok_or_else(|| QuizError::InvalidChordShape {
            name: raw.name.clone(),
            platform: Platform::Mac.as_str(),
            chord: raw.mac.clone(),
        })?;
        let win = Chord::parse(&raw.win).ok_or_else(|| QuizError::InvalidChordShape {
            name: raw.name.clone(),
            platform: Platform::Win.as_str(),
            chord: raw.win.clone(),
        })?;
        Ok(Self {
            name: raw.name,
            difficulty,
            mac,
            win,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(name: &str, difficulty: &str, mac: &[&str], win: &[&str]) -> RawRecord {
        RawRecord {
            name: name.to_string(),
            difficulty: difficulty.to_string(),
            mac: mac.iter().map(|s| s.to_string()).collect(),
            win: win.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_difficulty_parse_is_case_insensitive() {
        assert_eq!(Difficulty::parse("Easy"), Some(Difficulty::Easy));
        assert_eq!(Difficulty::parse(" HARD "), Some(Difficulty::Hard));
        assert_eq!(Difficulty::parse("expert"), None);
    }

    #[test]
    fn test_harder_follow_up_is_hard() {
        assert_eq!(Difficulty::HARDER_FOLLOW_UP, Difficulty::Hard);
    }

    #[test]
    fn test_token_spellings() {
        assert_eq!(KeyToken::parse("metaKey"), KeyToken::Modifier(Modifier::Meta));
        assert_eq!(KeyToken::parse("ctrl"), KeyToken::Modifier(Modifier::Ctrl));
        assert_eq!(KeyToken::parse("shiftKey"), KeyToken::Modifier(Modifier::Shift));
        assert_eq!(KeyToken::parse("option"), KeyToken::Modifier(Modifier::Alt));
        assert_eq!(KeyToken::parse("Escape"), KeyToken::Literal("escape".to_string()));
    }

    #[test]
    fn test_chord_literal_and_modifiers() {
        let chord = Chord::parse(&["metaKey", "shiftKey", "z"]).unwrap();
        assert_eq!(chord.literal(), Some("z"));
        assert!(chord.has_modifier(Modifier::Meta));
        assert!(chord.has_modifier(Modifier::Shift));
        assert!(!chord.has_modifier(Modifier::Ctrl));
        assert!(!chord.is_double_zero());
    }

    #[test]
    fn test_pure_modifier_chord_has_no_literal() {
        let chord = Chord::parse(&["altKey"]).unwrap();
        assert_eq!(chord.literal(), None);
    }

    #[test]
    fn test_double_zero_is_the_only_two_literal_chord() {
        assert!(Chord::parse(&["0", "0"]).unwrap().is_double_zero());
        assert!(Chord::parse(&["ctrlKey", "a", "b"]).is_none());
        assert!(Chord::parse(&["1", "1"]).is_none());
        assert!(Chord::parse::<&str>(&[]).is_none());
    }

    #[test]
    fn test_record_rejects_invalid_shape_at_load() {
        let err = ShortcutRecord::try_from(raw("Bad", "easy", &["a", "b"], &["a"])).unwrap_err();
        assert!(matches!(err, QuizError::InvalidChordShape { platform: "mac", .. }));
    }

    #[test]
    fn test_record_rejects_unknown_difficulty() {
        let err = ShortcutRecord::try_from(raw("Odd", "expert", &["a"], &["a"])).unwrap_err();
        assert!(matches!(err, QuizError::UnknownDifficulty { .. }));
    }

    #[test]
    fn test_record_picks_platform_chord() {
        let record =
            ShortcutRecord::try_from(raw("Copy", "easy", &["metaKey", "c"], &["ctrlKey", "c"]))
                .unwrap();
        assert!(record.chord(Platform::Mac).has_modifier(Modifier::Meta));
        assert!(record.chord(Platform::Win).has_modifier(Modifier::Ctrl));
    }
}
