//! Keyboard input backends
//!
//! Emissions reach the editor through an [`Injector`]:
//! - **KeyboardInjector** (feature `typing`): types into the focused window
//!   with enigo, either directly or via clipboard paste
//! - **EchoInjector**: writes a readable trace, used for dry runs
//! - **RecordingInjector**: keeps emissions in memory for tests

use super::actions::Emission;
use super::keys::KeyPress;
use serde::Deserialize;
use std::io::Write;

/// Input method for typing text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMethod {
    /// Use enigo's native text input directly
    #[default]
    Direct,
    /// Copy to clipboard, then paste with Cmd/Ctrl+V
    Clipboard,
}

/// Error type for typing operations
#[derive(Debug, thiserror::Error)]
pub enum InjectError {
    #[error("Keyboard error: {0}")]
    Keyboard(String),
    #[error("Clipboard error: {0}")]
    Clipboard(String),
    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),
}

/// Destination for text and key presses
pub trait Injector {
    fn type_text(&mut self, text: &str) -> Result<(), InjectError>;

    fn press_key(&mut self, key: KeyPress) -> Result<(), InjectError>;

    fn emit(&mut self, emission: &Emission) -> Result<(), InjectError> {
        match emission {
            Emission::Text(text) => self.type_text(text),
            Emission::Keys(keys) => keys.iter().try_for_each(|k| self.press_key(*k)),
        }
    }
}

/// Keeps every emission, merging consecutive key presses whether they
/// arrive one at a time or as a whole `Keys` emission
#[derive(Debug, Default)]
pub struct RecordingInjector {
    pub emissions: Vec<Emission>,
}

impl RecordingInjector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything typed so far, concatenated
    pub fn typed(&self) -> String {
        self.emissions
            .iter()
            .filter_map(|e| match e {
                Emission::Text(t) => Some(t.as_str()),
                Emission::Keys(_) => None,
            })
            .collect()
    }
}

impl Injector for RecordingInjector {
    fn type_text(&mut self, text: &str) -> Result<(), InjectError> {
        self.emissions.push(Emission::Text(text.to_string()));
        Ok(())
    }

    fn press_key(&mut self, key: KeyPress) -> Result<(), InjectError> {
        if let Some(Emission::Keys(keys)) = self.emissions.last_mut() {
            keys.push(key);
        } else {
            self.emissions.push(Emission::Keys(vec![key]));
        }
        Ok(())
    }
}

/// Writes one line per emission: `text "def foo("` or `keys up, tab`
pub struct EchoInjector<W: Write> {
    out: W,
}

impl<W: Write> EchoInjector<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Injector for EchoInjector<W> {
    fn type_text(&mut self, text: &str) -> Result<(), InjectError> {
        writeln!(self.out, "text {:?}", text)?;
        Ok(())
    }

    fn press_key(&mut self, key: KeyPress) -> Result<(), InjectError> {
        writeln!(self.out, "keys {}", key)?;
        Ok(())
    }

    fn emit(&mut self, emission: &Emission) -> Result<(), InjectError> {
        match emission {
            Emission::Text(text) => self.type_text(text),
            Emission::Keys(keys) => {
                let names: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
                writeln!(self.out, "keys {}", names.join(", "))?;
                Ok(())
            }
        }
    }
}

#[cfg(feature = "typing")]
pub use keyboard::KeyboardInjector;

#[cfg(feature = "typing")]
mod keyboard {
    use super::{InjectError, InputMethod, Injector, KeyPress};
    use arboard::Clipboard;
    use enigo::{Direction, Enigo, Key, Keyboard, Settings};
    use std::thread;
    use std::time::Duration;
    use tracing::warn;

    /// Keyboard input handler using enigo
    pub struct KeyboardInjector {
        enigo: Enigo,
        clipboard: Option<Clipboard>,
        method: InputMethod,
        key_delay: Duration,
    }

    impl KeyboardInjector {
        pub fn new(method: InputMethod, key_delay_ms: u64) -> Result<Self, InjectError> {
            let enigo = Enigo::new(&Settings::default()).map_err(|e| {
                InjectError::Keyboard(format!("Failed to initialize Enigo: {}", e))
            })?;
            let clipboard = match method {
                InputMethod::Clipboard => Some(Clipboard::new().map_err(|e| {
                    InjectError::Clipboard(format!("Failed to initialize clipboard: {}", e))
                })?),
                InputMethod::Direct => None,
            };

            Ok(Self {
                enigo,
                clipboard,
                method,
                key_delay: Duration::from_millis(key_delay_ms),
            })
        }

        fn to_enigo(key: KeyPress) -> Key {
            match key {
                KeyPress::Up => Key::UpArrow,
                KeyPress::Down => Key::DownArrow,
                KeyPress::Left => Key::LeftArrow,
                KeyPress::Right => Key::RightArrow,
                KeyPress::Tab => Key::Tab,
                KeyPress::Escape => Key::Escape,
                KeyPress::Enter => Key::Return,
                KeyPress::Backspace => Key::Backspace,
                KeyPress::Delete => Key::Delete,
                KeyPress::Home => Key::Home,
                KeyPress::End => Key::End,
                KeyPress::Char(' ') => Key::Space,
                KeyPress::Char(c) => Key::Unicode(c),
            }
        }

        /// Cmd on macOS, Ctrl elsewhere
        fn modifier_key() -> Key {
            #[cfg(target_os = "macos")]
            {
                Key::Meta
            }
            #[cfg(not(target_os = "macos"))]
            {
                Key::Control
            }
        }

        fn type_direct(&mut self, text: &str) -> Result<(), InjectError> {
            self.enigo
                .text(text)
                .map_err(|e| InjectError::Keyboard(format!("Failed to type text: {}", e)))
        }

        /// Copy to clipboard, paste, then restore the previous contents
        fn type_via_clipboard(&mut self, text: &str) -> Result<(), InjectError> {
            let Some(clipboard) = self.clipboard.as_mut() else {
                return self.type_direct(text);
            };
            let old_content = clipboard.get_text().ok();

            clipboard
                .set_text(text)
                .map_err(|e| InjectError::Clipboard(format!("Failed to set clipboard: {}", e)))?;
            thread::sleep(Duration::from_millis(50));

            let modifier = Self::modifier_key();
            let pasted = self
                .enigo
                .key(modifier, Direction::Press)
                .and_then(|_| self.enigo.key(Key::Unicode('v'), Direction::Click))
                .and_then(|_| self.enigo.key(modifier, Direction::Release))
                .map_err(|e| InjectError::Keyboard(format!("Paste failed: {}", e)));

            thread::sleep(Duration::from_millis(100));
            if let (Some(old), Some(clipboard)) = (old_content, self.clipboard.as_mut()) {
                let _ = clipboard.set_text(old);
            }
            pasted
        }
    }

    impl Injector for KeyboardInjector {
        fn type_text(&mut self, text: &str) -> Result<(), InjectError> {
            if text.is_empty() {
                return Ok(());
            }

            match self.method {
                InputMethod::Direct => self.type_direct(text),
                InputMethod::Clipboard => match self.type_via_clipboard(text) {
                    Ok(()) => Ok(()),
                    Err(e) => {
                        warn!("Clipboard method failed: {}, trying direct", e);
                        self.type_direct(text)
                    }
                },
            }
        }

        fn press_key(&mut self, key: KeyPress) -> Result<(), InjectError> {
            self.enigo
                .key(Self::to_enigo(key), Direction::Click)
                .map_err(|e| InjectError::Keyboard(format!("Failed to send key: {}", e)))?;
            thread::sleep(self.key_delay);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_method_deserialize() {
        #[derive(Deserialize)]
        struct Wrapper {
            method: InputMethod,
        }
        let w: Wrapper = toml::from_str("method = \"clipboard\"").unwrap();
        assert_eq!(w.method, InputMethod::Clipboard);
        let w: Wrapper = toml::from_str("method = \"direct\"").unwrap();
        assert_eq!(w.method, InputMethod::Direct);
    }

    #[test]
    fn test_recording_merges_key_presses() {
        let mut rec = RecordingInjector::new();
        rec.type_text("fmt.Println()").unwrap();
        rec.press_key(KeyPress::Up).unwrap();
        rec.press_key(KeyPress::Tab).unwrap();
        assert_eq!(
            rec.emissions,
            vec![
                Emission::Text("fmt.Println()".to_string()),
                Emission::Keys(vec![KeyPress::Up, KeyPress::Tab]),
            ]
        );
        assert_eq!(rec.typed(), "fmt.Println()");
    }

    #[test]
    fn test_recording_same_for_emit_and_press_key() {
        let mut by_emission = RecordingInjector::new();
        by_emission
            .emit(&Emission::Keys(vec![KeyPress::Up, KeyPress::Tab]))
            .unwrap();
        by_emission
            .emit(&Emission::Keys(vec![KeyPress::Escape, KeyPress::Char('i')]))
            .unwrap();

        let mut by_key = RecordingInjector::new();
        for key in [KeyPress::Up, KeyPress::Tab, KeyPress::Escape, KeyPress::Char('i')] {
            by_key.press_key(key).unwrap();
        }

        assert_eq!(by_emission.emissions, by_key.emissions);
        assert_eq!(by_key.emissions.len(), 1);
    }

    #[test]
    fn test_echo_output() {
        let mut echo = EchoInjector::new(Vec::new());
        echo.emit(&Emission::Text(") {\n\n".to_string())).unwrap();
        echo.emit(&Emission::Keys(vec![KeyPress::Up, KeyPress::Tab]))
            .unwrap();
        let out = String::from_utf8(echo.into_inner()).unwrap();
        assert_eq!(out, "text \") {\\n\\n\"\nkeys up, tab\n");
    }
}
