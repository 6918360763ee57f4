//! Voice command definitions and the phrase tables that trigger them
//!
//! Three built-in rules, matched in this order:
//! - **basics**: declarations, print, comment, null, mode switching
//! - **operators**: `defined` -> `:= `, `compare equal` -> `== `, ...
//! - **data types**: `string`, `int 64`, `bool`, ...
//!
//! Custom phrases from the config are appended as a fourth rule.

use super::keys::{parse_key_spec, KeyPress};
use super::template::Template;
use crate::config::CustomCommand;
use crate::fuzzy::suggest;
use crate::grammar::{Captures, Extra, Extras, Grammar, PatternError, Rule};
use crate::language::Language;
use std::fmt::Write;
use tracing::{debug, warn};

/// Commands that can be recognized from speech
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeCommand {
    SwitchMode(Language),
    CreateClass { name: String },
    CreatePublicFunction { name: String },
    CreatePrivateFunction { name: String },
    CreateClassFunction { receiver: String, method: String },
    CloseFunction,
    PrintLine,
    Null,
    Comment,
    /// Fixed text, same in every language
    Insert(&'static str),
    /// User defined phrase, text already rendered
    Custom {
        text: String,
        keys: Vec<KeyPress>,
        mode: Option<Language>,
    },
}

/// Built-in command kinds bound in the basics table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Basic {
    CreateClass,
    CreatePublicFunction,
    CreatePrivateFunction,
    CreateClassFunction,
    CloseFunction,
    PrintLine,
    Null,
    Comment,
    SwitchMode,
}

impl Basic {
    fn describe(self) -> &'static str {
        match self {
            Basic::CreateClass => "Python class declaration",
            Basic::CreatePublicFunction => "def snake_case( / func PascalCase(",
            Basic::CreatePrivateFunction => "def _snake_case( / func camelCase(",
            Basic::CreateClassFunction => "func (x *Type) Method(",
            Basic::CloseFunction => "): / ) { and move into the body",
            Basic::PrintLine => "print() / fmt.Println()",
            Basic::Null => "None / nil",
            Basic::Comment => "# / //",
            Basic::SwitchMode => "python or gopher",
        }
    }
}

const BASICS: &[(&str, Basic)] = &[
    ("new class [named] <text>", Basic::CreateClass),
    ("new [public] (function|func) [named] <text>", Basic::CreatePublicFunction),
    ("new private (function|func) [named] <text>", Basic::CreatePrivateFunction),
    ("new class function <text> [named] <text2>", Basic::CreateClassFunction),
    ("close (function|func)", Basic::CloseFunction),
    ("print line", Basic::PrintLine),
    ("null", Basic::Null),
    ("comment", Basic::Comment),
    ("mode <language>", Basic::SwitchMode),
];

pub const OPERATORS: &[(&str, &str)] = &[
    ("defined", ":= "),
    ("assign", "= "),
    ("compare equal", "== "),
    ("compare not equal", "!= "),
    ("compare greater", "> "),
    ("compare less", "< "),
    ("compare geck", ">= "),
    ("compare lack", "<= "),
    ("bit ore", "| "),
    ("bit and", "& "),
    ("bit ex or", "^ "),
    ("times", "* "),
    ("divided", "/ "),
    ("plus", "+ "),
    ("minus", "- "),
    ("plus equal", "+= "),
    ("minus equal", "-= "),
    ("times equal", "*= "),
    ("divided equal", "/= "),
    ("mod equal", "%= "),
    ("pointer to", "*"),
];

pub const DATA_TYPES: &[(&str, &str)] = &[
    ("string", "string"),
    ("int", "int"),
    ("int 64", "int64"),
    ("enum", "enum"),
    ("int 32", "int32"),
    ("(boolean|bool)", "bool"),
    ("struct", "struct"),
];

/// Capture slots shared by the basics and custom rules
const CAPTURE_SLOTS: &[&str] = &["text", "text2", "n", "n2"];

#[derive(Debug, Clone)]
struct CustomBinding {
    template: Template,
    keys: Vec<KeyPress>,
    mode: Option<Language>,
}

/// What a table entry is bound to
#[derive(Debug, Clone)]
enum Binding {
    Basic(Basic),
    Insert(&'static str),
    Custom(CustomBinding),
}

impl Binding {
    /// Custom commands restricted to another language don't match
    fn allowed_in(&self, language: Language) -> bool {
        match self {
            Binding::Custom(custom) => custom.mode.is_none_or(|mode| mode == language),
            Binding::Basic(_) | Binding::Insert(_) => true,
        }
    }
}

fn capture_extras() -> Extras {
    let mut extras = Extras::new();
    extras.insert("text".to_string(), Extra::Dictation);
    extras.insert("text2".to_string(), Extra::Dictation);
    extras.insert("n".to_string(), Extra::Integer { min: 1, max: 999 });
    extras.insert("n2".to_string(), Extra::Integer { min: 1, max: 999 });
    extras
}

fn basics_extras() -> Extras {
    let mut extras = capture_extras();
    extras.insert("language".to_string(), Extra::Choice(Language::choices()));
    extras
}

fn custom_binding(custom: &CustomCommand) -> Result<CustomBinding, String> {
    let template = Template::parse(&custom.text, CAPTURE_SLOTS).map_err(|e| e.to_string())?;
    let keys = match custom.keys.as_deref() {
        Some(spec) => parse_key_spec(spec).map_err(|e| e.to_string())?,
        None => Vec::new(),
    };
    Ok(CustomBinding {
        template,
        keys,
        mode: custom.mode,
    })
}

/// Recognizes utterances against the command tables
pub struct CommandParser {
    grammar: Grammar<Binding>,
}

impl CommandParser {
    /// Build and load the grammar.
    ///
    /// Built-in phrases always compile. Custom commands that fail to parse
    /// are skipped with a warning.
    pub fn new(custom: &[CustomCommand]) -> Result<Self, PatternError> {
        let mut grammar = Grammar::new("code");

        let mut basics = Rule::new("basics", basics_extras());
        for (spec, basic) in BASICS {
            basics.add(spec, Binding::Basic(*basic))?;
        }
        grammar.add_rule(basics);

        let mut operators = Rule::new("operators", Extras::new());
        for (spec, text) in OPERATORS {
            operators.add(spec, Binding::Insert(*text))?;
        }
        grammar.add_rule(operators);

        let mut data_types = Rule::new("data types", Extras::new());
        for (spec, text) in DATA_TYPES {
            data_types.add(spec, Binding::Insert(*text))?;
        }
        grammar.add_rule(data_types);

        if !custom.is_empty() {
            let mut rule = Rule::new("custom", capture_extras());
            for command in custom {
                let added = custom_binding(command).and_then(|binding| {
                    rule.add(&command.phrase, Binding::Custom(binding))
                        .map_err(|e| e.to_string())
                });
                if let Err(e) = added {
                    warn!(phrase = %command.phrase, "Skipping custom command: {}", e);
                }
            }
            grammar.add_rule(rule);
        }

        grammar.load();
        Ok(Self { grammar })
    }

    /// Recognize an utterance as a command in the given language
    pub fn parse(&self, text: &str, language: Language) -> Option<CodeCommand> {
        let matched = self
            .grammar
            .recognize_where(text, |binding| binding.allowed_in(language))?;
        let command = to_command(matched.action, &matched.captures);
        if command.is_none() {
            debug!(spec = matched.spec, "Match had incomplete captures");
        }
        command
    }

    /// Known phrases that sound close to an unrecognized utterance
    pub fn suggest(&self, text: &str) -> Vec<String> {
        suggest(text, &self.grammar.lead_ins(), 3)
    }

    /// Release the grammar. Idempotent.
    pub fn unload(&mut self) -> bool {
        self.grammar.unload()
    }

    pub fn is_loaded(&self) -> bool {
        self.grammar.is_loaded()
    }

    /// Table of all voice commands
    pub fn help_text(&self) -> String {
        let mut out = String::new();
        let mut current_rule = "";
        for (rule, spec) in self.grammar.phrases() {
            if rule != current_rule {
                let _ = writeln!(out, "\n{}", rule.to_uppercase());
                current_rule = rule;
            }
            let _ = writeln!(out, "  {:<46} {}", spec, describe(rule, spec));
        }
        out
    }
}

fn describe(rule: &str, spec: &str) -> String {
    match rule {
        "basics" => BASICS
            .iter()
            .find(|(s, _)| *s == spec)
            .map(|(_, b)| b.describe().to_string())
            .unwrap_or_default(),
        "operators" | "data types" => OPERATORS
            .iter()
            .chain(DATA_TYPES)
            .find(|(s, _)| *s == spec)
            .map(|(_, text)| format!("{:?}", text))
            .unwrap_or_default(),
        _ => String::new(),
    }
}

fn to_command(binding: &Binding, captures: &Captures) -> Option<CodeCommand> {
    let dictated = |name: &str| captures.text(name).map(str::to_string);

    Some(match binding {
        Binding::Basic(basic) => match basic {
            Basic::CreateClass => CodeCommand::CreateClass { name: dictated("text")? },
            Basic::CreatePublicFunction => {
                CodeCommand::CreatePublicFunction { name: dictated("text")? }
            }
            Basic::CreatePrivateFunction => {
                CodeCommand::CreatePrivateFunction { name: dictated("text")? }
            }
            Basic::CreateClassFunction => CodeCommand::CreateClassFunction {
                receiver: dictated("text")?,
                method: dictated("text2")?,
            },
            Basic::CloseFunction => CodeCommand::CloseFunction,
            Basic::PrintLine => CodeCommand::PrintLine,
            Basic::Null => CodeCommand::Null,
            Basic::Comment => CodeCommand::Comment,
            Basic::SwitchMode => {
                CodeCommand::SwitchMode(captures.choice("language")?.parse().ok()?)
            }
        },
        Binding::Insert(text) => CodeCommand::Insert(*text),
        Binding::Custom(custom) => CodeCommand::Custom {
            text: custom.template.render(captures),
            keys: custom.keys.clone(),
            mode: custom.mode,
        },
    })
}
