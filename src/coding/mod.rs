//! Voice commands for writing Python and Go
//!
//! Spoken phrases such as "new function load config", "close function"
//! or "compare equal" become text and key presses in the editor.
//!
//! # Features
//!
//! - **Two languages**: "mode python" / "mode gopher" switch what
//!   declarations, print statements, comments and null look like
//! - **Identifier casing**: dictated names are formatted per convention
//!   (`def load_config(` vs `func LoadConfig(`)
//! - **Operator and type tables**: fixed text, same in both languages
//! - **Custom phrases**: extra commands from `config.toml`

pub mod actions;
mod commands;
mod input;
pub mod keys;
mod processor;
mod template;

pub use actions::{DictationContext, Emission};
pub use commands::{CodeCommand, CommandParser, DATA_TYPES, OPERATORS};
pub use input::{EchoInjector, InjectError, Injector, InputMethod, RecordingInjector};
#[cfg(feature = "typing")]
pub use input::KeyboardInjector;
pub use keys::{parse_key_spec, KeyPress, KeySpecError};
pub use processor::{CodeProcessor, ProcessResult};
pub use template::{Template, TemplateError};
