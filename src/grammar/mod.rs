//! Phrase grammar: pattern notation, capture slots and matching
//!
//! A [`Grammar`] holds ordered [`Rule`]s. Each rule binds phrase patterns
//! such as `new class [named] <text>` to an action value and declares the
//! [`Extra`]s its capture slots accept. Recognizing an utterance yields the
//! bound action plus the captured values.

mod extras;
mod pattern;
mod rule;

pub use extras::{parse_spoken_number, Capture, Extra, Extras};
pub use pattern::{Element, PatternError};
pub use rule::{normalize, Captures, Grammar, Match, Rule};
