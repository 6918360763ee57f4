//! Key names and key sequence specs
//!
//! Sequences are written as comma separated key names with an optional
//! repeat count: `"up, tab"`, `"escape, i"`, `"left:3"`.

use std::fmt;

/// A single key press sent to the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPress {
    Up,
    Down,
    Left,
    Right,
    Tab,
    Escape,
    Enter,
    Backspace,
    Delete,
    Home,
    End,
    /// Printable character, e.g. `i` to re-enter insert mode
    Char(char),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeySpecError {
    #[error("unknown key '{0}'")]
    UnknownKey(String),
    #[error("invalid repeat count in '{0}'")]
    BadRepeat(String),
    #[error("empty key sequence")]
    Empty,
}

impl KeyPress {
    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.trim().to_lowercase();
        Some(match lower.as_str() {
            "up" => KeyPress::Up,
            "down" => KeyPress::Down,
            "left" => KeyPress::Left,
            "right" => KeyPress::Right,
            "tab" => KeyPress::Tab,
            "escape" | "esc" => KeyPress::Escape,
            "enter" | "return" => KeyPress::Enter,
            "backspace" => KeyPress::Backspace,
            "delete" | "del" => KeyPress::Delete,
            "home" => KeyPress::Home,
            "end" => KeyPress::End,
            "space" => KeyPress::Char(' '),
            _ => {
                let mut chars = name.trim().chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => KeyPress::Char(c),
                    _ => return None,
                }
            }
        })
    }
}

impl fmt::Display for KeyPress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            KeyPress::Up => "up",
            KeyPress::Down => "down",
            KeyPress::Left => "left",
            KeyPress::Right => "right",
            KeyPress::Tab => "tab",
            KeyPress::Escape => "escape",
            KeyPress::Enter => "enter",
            KeyPress::Backspace => "backspace",
            KeyPress::Delete => "delete",
            KeyPress::Home => "home",
            KeyPress::End => "end",
            KeyPress::Char(' ') => "space",
            KeyPress::Char(c) => return write!(f, "{}", c),
        };
        write!(f, "{}", name)
    }
}

/// Parse a key sequence spec into individual presses
pub fn parse_key_spec(spec: &str) -> Result<Vec<KeyPress>, KeySpecError> {
    let mut keys = Vec::new();

    for part in spec.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        let (name, repeat) = match part.rsplit_once(':') {
            Some((name, count)) if !name.is_empty() => {
                let count: usize = count
                    .trim()
                    .parse()
                    .map_err(|_| KeySpecError::BadRepeat(part.to_string()))?;
                (name, count)
            }
            _ => (part, 1),
        };

        let key =
            KeyPress::from_name(name).ok_or_else(|| KeySpecError::UnknownKey(name.to_string()))?;
        keys.extend(std::iter::repeat_n(key, repeat));
    }

    if keys.is_empty() {
        return Err(KeySpecError::Empty);
    }
    Ok(keys)
}
