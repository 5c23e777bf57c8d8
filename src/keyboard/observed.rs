use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, ModifierKeyCode};

use crate::catalog::record::Modifier;

/// One keydown as the matcher sees it: the key identifier (`"s"`, `"Tab"`,
/// `" "`), the physical code where it matters (`"Space"`), and which
/// modifiers were held.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ObservedKey {
    pub key: String,
    pub code: String,
    pub meta: bool,
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

/// US layout symbol pairs, (shifted, base). `+` is absent: it is a key in
/// its own right (numpad, and the `=` alias in chords).
const SHIFTED_SYMBOLS: &[(char, char)] = &[
    ('!', '1'),
    ('@', '2'),
    ('#', '3'),
    ('$', '4'),
    ('%', '5'),
    ('^', '6'),
    ('&', '7'),
    ('*', '8'),
    ('(', '9'),
    (')', '0'),
    ('_', '-'),
    ('{', '['),
    ('}', ']'),
    ('|', '\\'),
    (':', ';'),
    ('"', '\''),
    ('<', ','),
    ('>', '.'),
    ('?', '/'),
    ('~', '`'),
];

impl ObservedKey {
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        let code = if key == " " {
            "Space".to_string()
        } else {
            String::new()
        };
        Self {
            key,
            code,
            ..Self::default()
        }
    }

    pub fn meta(mut self) -> Self {
        self.meta = true;
        self
    }

    pub fn ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn alt(mut self) -> Self {
        self.alt = true;
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    pub fn modifier_held(&self, modifier: Modifier) -> bool {
        match modifier {
            Modifier::Meta => self.meta,
            Modifier::Ctrl => self.ctrl,
            Modifier::Shift => self.shift,
            Modifier::Alt => self.alt,
        }
    }

    pub fn any_modifier_held(&self) -> bool {
        self.meta || self.ctrl || self.shift || self.alt
    }

    /// A keydown of a modifier key on its own (Shift, Control, ...).
    pub fn is_modifier_only(&self) -> bool {
        Modifier::ALL.iter().any(|m| self.key == m.raw_name())
    }

    /// Raw key names this keydown contributes to an input buffer: held
    /// modifiers first, then the key itself.
    pub fn raw_identifiers(&self) -> Vec<String> {
        let mut ids: Vec<String> = Modifier::ALL
            .iter()
            .filter(|m| self.modifier_held(**m) && self.key != m.raw_name())
            .map(|m| m.raw_name().to_string())
            .collect();
        ids.push(self.key.clone());
        ids
    }

    /// Converts a terminal key press. Returns `None` for keys the quiz never
    /// asks for (media keys, caps lock, ...).
    pub fn from_key_event(event: &KeyEvent) -> Option<Self> {
        let mods = event.modifiers;
        let mut observed = match event.code {
            KeyCode::Char(' ') => Self::new(" "),
            KeyCode::Char('+') => Self::new("+"),
            KeyCode::Char(ch) if ch.is_ascii_uppercase() => Self::new(ch.to_string()).shift(),
            KeyCode::Char(ch) => match SHIFTED_SYMBOLS.iter().find(|(shifted, _)| *shifted == ch) {
                Some((_, base)) => Self::new(base.to_string()).shift(),
                None => Self::new(ch.to_string()),
            },
            KeyCode::Enter => Self::new("Enter"),
            KeyCode::Tab => Self::new("Tab"),
            KeyCode::BackTab => Self::new("Tab").shift(),
            KeyCode::Backspace => Self::new("Backspace"),
            KeyCode::Delete => Self::new("Delete"),
            KeyCode::Esc => Self::new("Escape"),
            KeyCode::Home => Self::new("Home"),
            KeyCode::End => Self::new("End"),
            KeyCode::PageUp => Self::new("PageUp"),
            KeyCode::PageDown => Self::new("PageDown"),
            KeyCode::Insert => Self::new("Insert"),
            KeyCode::Up => Self::new("ArrowUp"),
            KeyCode::Down => Self::new("ArrowDown"),
            KeyCode::Left => Self::new("ArrowLeft"),
            KeyCode::Right => Self::new("ArrowRight"),
            KeyCode::F(n) => Self::new(format!("F{n}")),
            KeyCode::Modifier(code) => modifier_keydown(code)?,
            _ => return None,
        };

        observed.ctrl |= mods.contains(KeyModifiers::CONTROL);
        observed.alt |= mods.contains(KeyModifiers::ALT);
        // Shift is how `+` is typed on the main row, not part of the chord.
        observed.shift |= mods.contains(KeyModifiers::SHIFT) && observed.key != "+";
        observed.meta |= mods.intersects(KeyModifiers::SUPER | KeyModifiers::META);
        Some(observed)
    }
}

fn modifier_keydown(code: ModifierKeyCode) -> Option<ObservedKey> {
    let modifier = match code {
        ModifierKeyCode::LeftShift | ModifierKeyCode::RightShift => Modifier::Shift,
        ModifierKeyCode::LeftControl | ModifierKeyCode::RightControl => Modifier::Ctrl,
        ModifierKeyCode::LeftAlt | ModifierKeyCode::RightAlt => Modifier::Alt,
        ModifierKeyCode::LeftSuper
        | ModifierKeyCode::RightSuper
        | ModifierKeyCode::LeftMeta
        | ModifierKeyCode::RightMeta => Modifier::Meta,
        _ => return None,
    };
    let mut observed = ObservedKey::new(modifier.raw_name());
    match modifier {
        Modifier::Meta => observed.meta = true,
        Modifier::Ctrl => observed.ctrl = true,
        Modifier::Shift => observed.shift = true,
        Modifier::Alt => observed.alt = true,
    }
    Some(observed)
}
