//! Phrase pattern notation
//!
//! Patterns are written the way the command tables spell them:
//!
//! - `print line`: literal words
//! - `new [public] function`: `[...]` is optional
//! - `close (function|func)`: `(...|...)` picks one alternative
//! - `new class [named] <text>`: `<name>` is a capture slot
//!
//! Groups nest, so `(go|move) [to] (start|end [of line])` is valid.

use std::fmt;

/// Parsed pattern element
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    /// Literal word, stored lowercase
    Word(String),
    /// Named capture slot
    Capture(String),
    Sequence(Vec<Element>),
    Optional(Box<Element>),
    Alternatives(Vec<Element>),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    #[error("empty pattern")]
    Empty,
    #[error("unbalanced '{bracket}' in pattern \"{pattern}\"")]
    Unbalanced { pattern: String, bracket: char },
    #[error("empty group or alternative in pattern \"{pattern}\"")]
    EmptyGroup { pattern: String },
    #[error("unterminated capture in pattern \"{pattern}\"")]
    UnterminatedCapture { pattern: String },
    #[error("capture <{name}> in pattern \"{pattern}\" has no matching extra")]
    UnknownCapture { pattern: String, name: String },
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Word(String),
    Capture(String),
    OpenOptional,
    CloseOptional,
    OpenGroup,
    CloseGroup,
    Bar,
}

fn tokenize(pattern: &str) -> Result<Vec<Token>, PatternError> {
    let mut tokens = Vec::new();
    let mut chars = pattern.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '[' | ']' | '(' | ')' | '|' => {
                chars.next();
                tokens.push(match c {
                    '[' => Token::OpenOptional,
                    ']' => Token::CloseOptional,
                    '(' => Token::OpenGroup,
                    ')' => Token::CloseGroup,
                    _ => Token::Bar,
                });
            }
            '<' => {
                chars.next();
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some('>') => break,
                        Some(ch) if ch.is_alphanumeric() || ch == '_' => name.push(ch),
                        _ => {
                            return Err(PatternError::UnterminatedCapture {
                                pattern: pattern.to_string(),
                            });
                        }
                    }
                }
                if name.is_empty() {
                    return Err(PatternError::UnterminatedCapture {
                        pattern: pattern.to_string(),
                    });
                }
                tokens.push(Token::Capture(name));
            }
            _ => {
                let mut word = String::new();
                while let Some(&ch) = chars.peek() {
                    if ch.is_whitespace() || "[]()|<".contains(ch) {
                        break;
                    }
                    word.extend(ch.to_lowercase());
                    chars.next();
                }
                tokens.push(Token::Word(word));
            }
        }
    }

    Ok(tokens)
}

struct Parser<'a> {
    pattern: &'a str,
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn unbalanced(&self, bracket: char) -> PatternError {
        PatternError::Unbalanced {
            pattern: self.pattern.to_string(),
            bracket,
        }
    }

    fn empty_group(&self) -> PatternError {
        PatternError::EmptyGroup {
            pattern: self.pattern.to_string(),
        }
    }

    /// alternatives := sequence ('|' sequence)*
    fn alternatives(&mut self) -> Result<Element, PatternError> {
        let mut options = vec![self.sequence()?];
        while self.peek() == Some(&Token::Bar) {
            self.pos += 1;
            options.push(self.sequence()?);
        }
        if options.len() == 1 {
            Ok(options.remove(0))
        } else {
            Ok(Element::Alternatives(options))
        }
    }

    /// sequence := item+
    fn sequence(&mut self) -> Result<Element, PatternError> {
        let mut items = Vec::new();
        while let Some(token) = self.peek().cloned() {
            match token {
                Token::Bar | Token::CloseGroup | Token::CloseOptional => break,
                Token::Word(w) => {
                    self.pos += 1;
                    items.push(Element::Word(w));
                }
                Token::Capture(name) => {
                    self.pos += 1;
                    items.push(Element::Capture(name));
                }
                Token::OpenOptional => {
                    self.pos += 1;
                    let inner = self.alternatives()?;
                    if self.peek() != Some(&Token::CloseOptional) {
                        return Err(self.unbalanced('['));
                    }
                    self.pos += 1;
                    items.push(Element::Optional(Box::new(inner)));
                }
                Token::OpenGroup => {
                    self.pos += 1;
                    let inner = self.alternatives()?;
                    if self.peek() != Some(&Token::CloseGroup) {
                        return Err(self.unbalanced('('));
                    }
                    self.pos += 1;
                    items.push(inner);
                }
            }
        }

        match items.len() {
            0 => Err(self.empty_group()),
            1 => Ok(items.remove(0)),
            _ => Ok(Element::Sequence(items)),
        }
    }
}

impl Element {
    /// Parse a pattern string
    pub fn parse(pattern: &str) -> Result<Element, PatternError> {
        let tokens = tokenize(pattern)?;
        if tokens.is_empty() {
            return Err(PatternError::Empty);
        }

        let mut parser = Parser {
            pattern,
            tokens,
            pos: 0,
        };
        let element = parser.alternatives()?;

        match parser.peek() {
            None => Ok(element),
            Some(Token::CloseGroup) => Err(parser.unbalanced(')')),
            Some(Token::CloseOptional) => Err(parser.unbalanced(']')),
            Some(_) => Err(parser.empty_group()),
        }
    }

    /// Names of all capture slots, in order of appearance
    pub fn capture_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_captures(&mut names);
        names
    }

    fn collect_captures<'a>(&'a self, names: &mut Vec<&'a str>) {
        match self {
            Element::Word(_) => {}
            Element::Capture(name) => names.push(name),
            Element::Optional(inner) => inner.collect_captures(names),
            Element::Sequence(items) | Element::Alternatives(items) => {
                for item in items {
                    item.collect_captures(names);
                }
            }
        }
    }

    /// Literal words leading up to the first capture, taking the first
    /// alternative and including optional words.
    ///
    /// `new class [named] <text>` -> `["new", "class", "named"]`
    pub fn leading_words(&self) -> Vec<&str> {
        let mut words = Vec::new();
        self.collect_leading(&mut words);
        words
    }

    /// Returns false once a capture has been reached
    fn collect_leading<'a>(&'a self, words: &mut Vec<&'a str>) -> bool {
        match self {
            Element::Word(w) => {
                words.push(w);
                true
            }
            Element::Capture(_) => false,
            Element::Optional(inner) => inner.collect_leading(words),
            Element::Alternatives(options) => options[0].collect_leading(words),
            Element::Sequence(items) => items.iter().all(|item| item.collect_leading(words)),
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::Word(w) => write!(f, "{}", w),
            Element::Capture(name) => write!(f, "<{}>", name),
            Element::Optional(inner) => write!(f, "[{}]", inner),
            Element::Sequence(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
            Element::Alternatives(options) => {
                write!(f, "(")?;
                for (i, option) in options.iter().enumerate() {
                    if i > 0 {
                        write!(f, "|")?;
                    }
                    write!(f, "{}", option)?;
                }
                write!(f, ")")
            }
        }
    }
}
