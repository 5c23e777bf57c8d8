//! Human-readable rendering of chords and input buffers.
//!
//! Catalog tokens stay lowercase markers internally; everything shown to the
//! player goes through these functions so the glyph choices live in one place.

use crate::catalog::record::{Chord, KeyToken, Modifier};
use crate::keyboard::platform::Platform;

pub const SEPARATOR: &str = " + ";

pub fn modifier_label(modifier: Modifier, platform: Platform) -> &'static str {
    match (modifier, platform) {
        (Modifier::Meta, Platform::Mac) => "⌘",
        (Modifier::Meta, Platform::Win) => "Ctrl",
        (Modifier::Ctrl, _) => "Ctrl",
        (Modifier::Shift, _) => "⇧",
        (Modifier::Alt, Platform::Mac) => "⌥",
        (Modifier::Alt, Platform::Win) => "Alt",
    }
}

/// Display name for a literal key. Single characters are upper-cased.
pub fn literal_label(literal: &str, platform: Platform) -> String {
    let named = match literal {
        "escape" => "Esc",
        "enter" => "↩",
        "backspace" if platform == Platform::Mac => "⌫",
        "backspace" => "Backspace",
        "delete" => "Del",
        "pageup" => "Page Up",
        "pagedown" => "Page Down",
        "home" => "Home",
        "end" => "End",
        "tab" => "Tab",
        "space" => "Space",
        "=" => "+",
        _ => "",
    };
    if named.is_empty() {
        literal.to_uppercase()
    } else {
        named.to_string()
    }
}

pub fn token_label(token: &KeyToken, platform: Platform) -> String {
    match token {
        KeyToken::Modifier(m) => modifier_label(*m, platform).to_string(),
        KeyToken::Literal(l) => literal_label(l, platform),
    }
}

/// The reveal text for an expected chord, e.g. `⌘ + ⇧ + Z`.
pub fn chord_label(chord: &Chord, platform: Platform) -> String {
    if chord.is_double_zero() {
        return "0 + 0".to_string();
    }
    chord
        .tokens()
        .iter()
        .map(|t| token_label(t, platform))
        .collect::<Vec<_>>()
        .join(SEPARATOR)
}

/// Renders raw buffer identifiers as typed (`Shift + Tab`).
pub fn buffer_label(buffer: &[String]) -> String {
    buffer
        .iter()
        .map(|id| if id == " " { "Space" } else { id.as_str() })
        .collect::<Vec<_>>()
        .join(SEPARATOR)
}
