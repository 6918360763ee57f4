//! Voice command grammar for dictating Python and Go source code

pub mod coding;
pub mod config;
pub mod format;
pub mod fuzzy;
pub mod grammar;
pub mod language;

pub use coding::{CodeCommand, CodeProcessor, CommandParser, DictationContext, Emission};
pub use config::Config;
pub use language::Language;
