//! Key combos and key name resolution.
//!
//! Configuration files refer to keys by name ("Enter", "PgUp",
//! "Shift-0", "Ctrl-S"); this module resolves those names into the
//! crossterm key combos the action registry is keyed by.

use std::fmt;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use thiserror::Error;

/// A key name that resolves to nothing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid key specified: {0:?}")]
pub struct KeyLookupError(pub String);

/// A key code plus its modifiers, hashable for registry lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyCombo {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyCombo {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub fn ctrl(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::CONTROL)
    }

    /// Normalize a terminal key event for registry matching.
    ///
    /// Character keys already encode shift in the character itself, so
    /// the SHIFT bit is dropped for them; otherwise 'G' would arrive as
    /// Shift+Char('G') and never match a plain Char('G') binding.
    /// Control characters fold to lowercase, since Ctrl-S and Ctrl-s
    /// are the same byte on the wire.
    pub fn from_event(event: &KeyEvent) -> Self {
        let mut code = event.code;
        let mut modifiers = event.modifiers;
        if let KeyCode::Char(c) = code {
            modifiers -= KeyModifiers::SHIFT;
            if modifiers.contains(KeyModifiers::CONTROL) {
                code = KeyCode::Char(c.to_ascii_lowercase());
            }
        }
        Self::new(code, modifiers)
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            f.write_str("Ctrl-")?;
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            f.write_str("Alt-")?;
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            f.write_str("Shift-")?;
        }
        match self.code {
            KeyCode::Char(' ') => f.write_str("Space"),
            KeyCode::Char(c) if self.modifiers.contains(KeyModifiers::CONTROL) => {
                write!(f, "{}", c.to_ascii_uppercase())
            }
            KeyCode::Char(c) => write!(f, "{c}"),
            KeyCode::F(n) => write!(f, "F{n}"),
            KeyCode::Enter => f.write_str("Enter"),
            KeyCode::Esc => f.write_str("Esc"),
            KeyCode::Tab => f.write_str("Tab"),
            KeyCode::BackTab => f.write_str("Backtab"),
            KeyCode::Backspace => f.write_str("Backspace"),
            KeyCode::Up => f.write_str("Up"),
            KeyCode::Down => f.write_str("Down"),
            KeyCode::Left => f.write_str("Left"),
            KeyCode::Right => f.write_str("Right"),
            KeyCode::Home => f.write_str("Home"),
            KeyCode::End => f.write_str("End"),
            KeyCode::PageUp => f.write_str("PgUp"),
            KeyCode::PageDown => f.write_str("PgDn"),
            KeyCode::Insert => f.write_str("Insert"),
            KeyCode::Delete => f.write_str("Delete"),
            other => write!(f, "{other:?}"),
        }
    }
}

/// US-layout shifted forms of digits and punctuation. Terminals send
/// the shifted glyph itself, so "Shift-0" has to resolve to ')' for
/// the binding to ever see a matching event.
const SHIFTED_PAIRS: &[(char, char)] = &[
    ('0', ')'),
    ('1', '!'),
    ('2', '@'),
    ('3', '#'),
    ('4', '$'),
    ('5', '%'),
    ('6', '^'),
    ('7', '&'),
    ('8', '*'),
    ('9', '('),
    ('`', '~'),
    ('-', '_'),
    ('=', '+'),
    ('[', '{'),
    (']', '}'),
    ('\\', '|'),
    (';', ':'),
    ('\'', '"'),
    (',', '<'),
    ('.', '>'),
    ('/', '?'),
];

fn shifted_char(c: char) -> char {
    if c.is_alphabetic() {
        return c.to_ascii_uppercase();
    }
    SHIFTED_PAIRS
        .iter()
        .find(|(plain, _)| *plain == c)
        .map_or(c, |(_, shifted)| *shifted)
}

/// Resolve a key name into a combo.
///
/// Accepts the named keys (Enter, Esc, Tab, PgUp, F1..F12, ...), any
/// single character, and Ctrl-/Alt-/Shift- prefixed forms of both.
/// Shift- on a character resolves to the glyph the terminal actually
/// sends: letters uppercase, digits and punctuation through their
/// US-layout pairs. Other layouts should bind the glyph directly.
pub fn lookup_key(name: &str) -> Result<KeyCombo, KeyLookupError> {
    if let Some(rest) = name.strip_prefix("Ctrl-") {
        let base = lookup_key(rest).map_err(|_| KeyLookupError(name.to_string()))?;
        // Control folds case: Ctrl-S and Ctrl-s arrive identically, as
        // the lowercase character.
        let code = match base.code {
            KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
            other => other,
        };
        return Ok(KeyCombo::new(code, base.modifiers | KeyModifiers::CONTROL));
    }
    if let Some(rest) = name.strip_prefix("Alt-") {
        let base = lookup_key(rest).map_err(|_| KeyLookupError(name.to_string()))?;
        return Ok(KeyCombo::new(base.code, base.modifiers | KeyModifiers::ALT));
    }
    if let Some(rest) = name.strip_prefix("Shift-") {
        let base = lookup_key(rest).map_err(|_| KeyLookupError(name.to_string()))?;
        // Char combos never carry SHIFT; the shift lives in the
        // character itself. Only special keys keep the bit.
        if let KeyCode::Char(c) = base.code {
            return Ok(KeyCombo::new(KeyCode::Char(shifted_char(c)), base.modifiers));
        }
        return Ok(KeyCombo::new(
            base.code,
            base.modifiers | KeyModifiers::SHIFT,
        ));
    }

    let code = match name {
        "Enter" => KeyCode::Enter,
        "Esc" | "Escape" => KeyCode::Esc,
        "Tab" => KeyCode::Tab,
        "Backtab" => KeyCode::BackTab,
        "Backspace" => KeyCode::Backspace,
        "Space" => KeyCode::Char(' '),
        "Up" => KeyCode::Up,
        "Down" => KeyCode::Down,
        "Left" => KeyCode::Left,
        "Right" => KeyCode::Right,
        "Home" => KeyCode::Home,
        "End" => KeyCode::End,
        "PgUp" => KeyCode::PageUp,
        "PgDn" => KeyCode::PageDown,
        "Insert" => KeyCode::Insert,
        "Delete" => KeyCode::Delete,
        _ => {
            if let Some(digits) = name.strip_prefix('F') {
                if let Ok(n) = digits.parse::<u8>() {
                    if (1..=12).contains(&n) {
                        return Ok(KeyCombo::plain(KeyCode::F(n)));
                    }
                }
            }
            let mut chars = name.chars();
            return match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(KeyCombo::plain(KeyCode::Char(c))),
                _ => Err(KeyLookupError(name.to_string())),
            };
        }
    };
    Ok(KeyCombo::plain(code))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_keys() {
        assert_eq!(lookup_key("Enter").unwrap(), KeyCombo::plain(KeyCode::Enter));
        assert_eq!(lookup_key("PgUp").unwrap(), KeyCombo::plain(KeyCode::PageUp));
        assert_eq!(lookup_key("Escape").unwrap(), KeyCombo::plain(KeyCode::Esc));
        assert_eq!(lookup_key("F5").unwrap(), KeyCombo::plain(KeyCode::F(5)));
        assert_eq!(
            lookup_key("Space").unwrap(),
            KeyCombo::plain(KeyCode::Char(' '))
        );
    }

    #[test]
    fn test_single_characters() {
        assert_eq!(lookup_key("n").unwrap(), KeyCombo::plain(KeyCode::Char('n')));
        assert_eq!(lookup_key("0").unwrap(), KeyCombo::plain(KeyCode::Char('0')));
    }

    #[test]
    fn test_modifier_prefixes() {
        assert_eq!(
            lookup_key("Ctrl-S").unwrap(),
            KeyCombo::ctrl(KeyCode::Char('s')),
            "control folds letters to lowercase"
        );
        assert_eq!(
            lookup_key("Shift-0").unwrap(),
            KeyCombo::plain(KeyCode::Char(')')),
            "shifted digits resolve to the US-layout glyph"
        );
        assert_eq!(
            lookup_key("Alt-Enter").unwrap(),
            KeyCombo::new(KeyCode::Enter, KeyModifiers::ALT)
        );
    }

    #[test]
    fn test_ctrl_binding_matches_terminal_event() {
        // Terminals report Ctrl+S as the lowercase char with CONTROL set.
        let ev = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL);
        assert_eq!(KeyCombo::from_event(&ev), lookup_key("Ctrl-S").unwrap());
    }

    #[test]
    fn test_shifted_letter_normalizes_to_uppercase() {
        assert_eq!(
            lookup_key("Shift-s").unwrap(),
            KeyCombo::plain(KeyCode::Char('S'))
        );
    }

    #[test]
    fn test_shifted_digit_binding_matches_terminal_event() {
        // Shift+0 on a US terminal arrives as ')' with no modifier.
        let ev = KeyEvent::new(KeyCode::Char(')'), KeyModifiers::NONE);
        assert_eq!(KeyCombo::from_event(&ev), lookup_key("Shift-0").unwrap());

        // Enhanced protocols may keep SHIFT on the glyph; normalization
        // still lines the two up.
        let ev = KeyEvent::new(KeyCode::Char('!'), KeyModifiers::SHIFT);
        assert_eq!(KeyCombo::from_event(&ev), lookup_key("Shift-1").unwrap());
    }

    #[test]
    fn test_shifted_punctuation_pairs() {
        assert_eq!(
            lookup_key("Shift--").unwrap(),
            KeyCombo::plain(KeyCode::Char('_'))
        );
        assert_eq!(
            lookup_key("Shift-/").unwrap(),
            KeyCombo::plain(KeyCode::Char('?'))
        );
        assert_eq!(
            lookup_key("Shift-)").unwrap(),
            KeyCombo::plain(KeyCode::Char(')')),
            "an already shifted glyph passes through"
        );
    }

    #[test]
    fn test_unknown_name_error_message() {
        let err = lookup_key("NotAKey").unwrap_err();
        assert_eq!(err.to_string(), "invalid key specified: \"NotAKey\"");
    }

    #[test]
    fn test_unknown_name_under_prefix_reports_full_name() {
        let err = lookup_key("Ctrl-NotAKey").unwrap_err();
        assert_eq!(err.to_string(), "invalid key specified: \"Ctrl-NotAKey\"");
    }

    #[test]
    fn test_f_key_out_of_range_is_invalid() {
        assert!(lookup_key("F13").is_err());
        assert!(lookup_key("F0").is_err());
    }

    #[test]
    fn test_event_normalization_strips_shift_on_chars() {
        let ev = KeyEvent::new(KeyCode::Char('G'), KeyModifiers::SHIFT);
        assert_eq!(KeyCombo::from_event(&ev), KeyCombo::plain(KeyCode::Char('G')));

        let ev = KeyEvent::new(KeyCode::Up, KeyModifiers::SHIFT);
        assert_eq!(
            KeyCombo::from_event(&ev),
            KeyCombo::new(KeyCode::Up, KeyModifiers::SHIFT),
            "non-character keys keep their shift bit"
        );
    }

    #[test]
    fn test_display_round_trips_common_names() {
        for name in ["Enter", "PgDn", "Space", "Ctrl-S", "F9", "q"] {
            let combo = lookup_key(name).unwrap();
            assert_eq!(combo.to_string(), name);
        }
    }
}
