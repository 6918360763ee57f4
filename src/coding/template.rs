//! Text templates for custom commands
//!
//! `func Test{text:pascal}(t *testing.T) {{` renders the `text` capture in
//! PascalCase; `{{` and `}}` are literal braces.

use crate::format::{camel_case, pascal_case, snake_case};
use crate::grammar::{Capture, Captures};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Case {
    Snake,
    Camel,
    Pascal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Slot { name: String, case: Option<Case> },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    #[error("unclosed '{{' in template \"{0}\"")]
    Unclosed(String),
    #[error("unmatched '}}' in template \"{0}\"")]
    Unmatched(String),
    #[error("unknown formatter '{0}'")]
    UnknownCase(String),
    #[error("placeholder {{{0}}} does not name a capture")]
    UnknownSlot(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    /// Parse a template whose placeholders must be among `slots`
    pub fn parse(source: &str, slots: &[&str]) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = source.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    literal.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    literal.push('}');
                }
                '}' => return Err(TemplateError::Unmatched(source.to_string())),
                '{' => {
                    let mut body = String::new();
                    loop {
                        match chars.next() {
                            Some('}') => break,
                            Some(ch) => body.push(ch),
                            None => return Err(TemplateError::Unclosed(source.to_string())),
                        }
                    }

                    let (name, case) = match body.split_once(':') {
                        Some((name, case)) => (name.trim(), Some(parse_case(case.trim())?)),
                        None => (body.trim(), None),
                    };
                    if !slots.contains(&name) {
                        return Err(TemplateError::UnknownSlot(name.to_string()));
                    }

                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Slot {
                        name: name.to_string(),
                        case,
                    });
                }
                _ => literal.push(c),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }
        Ok(Self { segments })
    }

    /// Fill in captured values; slots without a capture render empty
    pub fn render(&self, captures: &Captures) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(s) => out.push_str(s),
                Segment::Slot { name, case } => {
                    let raw = match captures.get(name) {
                        Some(Capture::Text(s)) | Some(Capture::Choice(s)) => s.clone(),
                        Some(Capture::Integer(n)) => n.to_string(),
                        None => continue,
                    };
                    let formatted = match case {
                        Some(Case::Snake) => snake_case(&raw),
                        Some(Case::Camel) => camel_case(&raw),
                        Some(Case::Pascal) => pascal_case(&raw),
                        None => raw,
                    };
                    out.push_str(&formatted);
                }
            }
        }
        out
    }
}

fn parse_case(name: &str) -> Result<Case, TemplateError> {
    match name {
        "snake" => Ok(Case::Snake),
        "camel" => Ok(Case::Camel),
        "pascal" => Ok(Case::Pascal),
        other => Err(TemplateError::UnknownCase(other.to_string())),
    }
}
