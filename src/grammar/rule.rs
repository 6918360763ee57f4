//! Rules, grammars and utterance matching

use super::extras::{Capture, Extra, Extras};
use super::pattern::{Element, PatternError};
use tracing::{debug, info};

/// Captured values of a successful match, in pattern order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Captures(Vec<(String, Capture)>);

impl Captures {
    pub fn get(&self, name: &str) -> Option<&Capture> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, c)| c)
    }

    /// Dictated text for `name`, if captured
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.get(name)? {
            Capture::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn integer(&self, name: &str) -> Option<u32> {
        match self.get(name)? {
            Capture::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn choice(&self, name: &str) -> Option<&str> {
        match self.get(name)? {
            Capture::Choice(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A capture slot filled during matching. Dictation keeps only its word
/// span until the whole utterance has matched.
#[derive(Debug, Clone)]
struct Slot<'p> {
    name: &'p str,
    start: usize,
    end: usize,
    value: Option<Capture>,
}

/// Partial match state while walking a pattern
#[derive(Debug, Clone)]
struct State<'p> {
    pos: usize,
    literals: usize,
    slots: Vec<Slot<'p>>,
}

/// Elements still to match after the current one
#[derive(Clone, Copy)]
enum Next<'p, 'n> {
    End,
    Then(&'p [Element], &'n Next<'p, 'n>),
}

/// Fewest words `element` can match
fn min_words(element: &Element, extras: &Extras) -> usize {
    match element {
        Element::Word(_) => 1,
        Element::Capture(name) => extras.get(name).map_or(0, Extra::min_words),
        Element::Optional(_) => 0,
        Element::Alternatives(options) => options
            .iter()
            .map(|o| min_words(o, extras))
            .min()
            .unwrap_or(0),
        Element::Sequence(items) => items.iter().map(|i| min_words(i, extras)).sum(),
    }
}

/// Depth-first matcher over one utterance
struct Matcher<'w, 'p> {
    words: &'w [&'w str],
    extras: &'p Extras,
}

impl<'p> Matcher<'_, 'p> {
    fn min_remaining(&self, next: &Next<'p, '_>) -> usize {
        match *next {
            Next::End => 0,
            Next::Then(items, rest) => {
                items
                    .iter()
                    .map(|i| min_words(i, self.extras))
                    .sum::<usize>()
                    + self.min_remaining(rest)
            }
        }
    }

    /// First way `element` followed by `next` consumes every remaining
    /// word, in preference order: optional parts present before absent,
    /// alternatives left to right, shorter captures first.
    fn walk(
        &self,
        element: &'p Element,
        next: &Next<'p, '_>,
        state: State<'p>,
    ) -> Option<State<'p>> {
        match element {
            Element::Word(w) => {
                let actual = self.words.get(state.pos)?;
                if actual.to_lowercase() != *w {
                    return None;
                }
                let advanced = State {
                    pos: state.pos + 1,
                    literals: state.literals + 1,
                    ..state
                };
                self.walk_next(next, advanced)
            }
            Element::Capture(name) => {
                let extra = self.extras.get(name)?;
                // Leave enough words for whatever must follow
                let limit = self.words.len().saturating_sub(self.min_remaining(next));
                let available = self.words.get(state.pos..limit)?;
                extra
                    .candidates(available)
                    .into_iter()
                    .find_map(|(consumed, value)| {
                        let mut advanced = state.clone();
                        advanced.pos += consumed;
                        advanced.slots.push(Slot {
                            name,
                            start: state.pos,
                            end: advanced.pos,
                            value,
                        });
                        self.walk_next(next, advanced)
                    })
            }
            Element::Optional(inner) => self
                .walk(inner, next, state.clone())
                .or_else(|| self.walk_next(next, state)),
            Element::Alternatives(options) => options
                .iter()
                .find_map(|option| self.walk(option, next, state.clone())),
            Element::Sequence(items) => self.walk_next(&Next::Then(items, next), state),
        }
    }

    fn walk_next(&self, next: &Next<'p, '_>, state: State<'p>) -> Option<State<'p>> {
        match *next {
            Next::End => (state.pos == self.words.len()).then_some(state),
            Next::Then([], rest) => self.walk_next(rest, state),
            Next::Then([first, tail @ ..], rest) => {
                self.walk(first, &Next::Then(tail, rest), state)
            }
        }
    }

    fn captures(&self, slots: Vec<Slot<'_>>) -> Captures {
        Captures(
            slots
                .into_iter()
                .map(|slot| {
                    let value = slot.value.unwrap_or_else(|| {
                        Capture::Text(self.words[slot.start..slot.end].join(" "))
                    });
                    (slot.name.to_string(), value)
                })
                .collect(),
        )
    }
}

struct Entry<A> {
    spec: String,
    pattern: Element,
    action: A,
}

/// A named set of phrase patterns sharing the same extras
pub struct Rule<A> {
    name: String,
    entries: Vec<Entry<A>>,
    extras: Extras,
}

impl<A> Rule<A> {
    pub fn new(name: impl Into<String>, extras: Extras) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
            extras,
        }
    }

    /// Bind a phrase pattern to an action.
    ///
    /// Fails if the pattern is malformed or uses a capture slot the rule
    /// has no extra for.
    pub fn add(&mut self, spec: &str, action: A) -> Result<(), PatternError> {
        let pattern = Element::parse(spec)?;
        if let Some(name) = pattern
            .capture_names()
            .into_iter()
            .find(|n| !self.extras.contains_key(*n))
        {
            return Err(PatternError::UnknownCapture {
                pattern: spec.to_string(),
                name: name.to_string(),
            });
        }
        self.entries.push(Entry {
            spec: spec.to_string(),
            pattern,
            action,
        });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Result of recognizing an utterance
#[derive(Debug)]
pub struct Match<'a, A> {
    pub rule: &'a str,
    pub spec: &'a str,
    pub action: &'a A,
    pub captures: Captures,
    /// Number of literal words the pattern matched
    pub literals: usize,
}

/// An ordered collection of rules that can be loaded and unloaded
pub struct Grammar<A> {
    name: String,
    rules: Vec<Rule<A>>,
    loaded: bool,
}

/// Split an utterance into words, dropping punctuation the transcriber
/// attached to them ("Foo." -> "Foo")
pub fn normalize(utterance: &str) -> Vec<&str> {
    utterance
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| c.is_ascii_punctuation() && c != '_'))
        .filter(|w| !w.is_empty())
        .collect()
}

impl<A> Grammar<A> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rules: Vec::new(),
            loaded: false,
        }
    }

    pub fn add_rule(&mut self, rule: Rule<A>) {
        debug!(grammar = %self.name, rule = %rule.name, entries = rule.len(), "Adding rule");
        self.rules.push(rule);
    }

    /// Register the grammar so it starts recognizing utterances
    pub fn load(&mut self) {
        if !self.loaded {
            info!(grammar = %self.name, rules = self.rules.len(), "Grammar loaded");
        }
        self.loaded = true;
    }

    /// Release the grammar registration.
    ///
    /// Safe to call repeatedly; returns true only when the grammar was
    /// loaded before the call.
    pub fn unload(&mut self) -> bool {
        let was_loaded = self.loaded;
        if was_loaded {
            info!(grammar = %self.name, "Grammar unloaded");
        }
        self.loaded = false;
        was_loaded
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Find the best matching phrase for an utterance.
    ///
    /// The whole utterance must be consumed. When several patterns match,
    /// the one matching the most literal words wins, ties going to the
    /// earlier entry.
    pub fn recognize(&self, utterance: &str) -> Option<Match<'_, A>> {
        self.recognize_where(utterance, |_| true)
    }

    /// Like [`recognize`](Self::recognize), skipping entries whose action
    /// `accept` rejects
    pub fn recognize_where(
        &self,
        utterance: &str,
        accept: impl Fn(&A) -> bool,
    ) -> Option<Match<'_, A>> {
        if !self.loaded {
            return None;
        }

        let words = normalize(utterance);
        if words.is_empty() {
            return None;
        }

        let mut best: Option<Match<'_, A>> = None;
        for rule in &self.rules {
            let matcher = Matcher {
                words: &words,
                extras: &rule.extras,
            };
            for entry in rule.entries.iter().filter(|e| accept(&e.action)) {
                let start = State {
                    pos: 0,
                    literals: 0,
                    slots: Vec::new(),
                };
                let Some(state) = matcher.walk(&entry.pattern, &Next::End, start) else {
                    continue;
                };

                if best.as_ref().is_none_or(|b| state.literals > b.literals) {
                    best = Some(Match {
                        rule: &rule.name,
                        spec: &entry.spec,
                        action: &entry.action,
                        captures: matcher.captures(state.slots),
                        literals: state.literals,
                    });
                }
            }
        }

        if let Some(m) = &best {
            debug!(utterance, rule = m.rule, spec = m.spec, "Recognized");
        }
        best
    }

    /// Every (rule name, pattern) pair, in table order
    pub fn phrases(&self) -> impl Iterator<Item = (&str, &str)> {
        self.rules.iter().flat_map(|rule| {
            rule.entries
                .iter()
                .map(move |e| (rule.name.as_str(), e.spec.as_str()))
        })
    }

    /// The literal lead-in of every phrase ("new class named", "print line"),
    /// used for suggestions
    pub fn lead_ins(&self) -> Vec<String> {
        let mut lead_ins: Vec<String> = self
            .rules
            .iter()
            .flat_map(|rule| rule.entries.iter())
            .map(|e| e.pattern.leading_words().join(" "))
            .filter(|s| !s.is_empty())
            .collect();
        lead_ins.dedup();
        lead_ins
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn extras() -> Extras {
        let mut extras = Extras::new();
        extras.insert("text".to_string(), Extra::Dictation);
        extras.insert("text2".to_string(), Extra::Dictation);
        extras.insert("n".to_string(), Extra::Integer { min: 1, max: 999 });
        extras
    }

    fn grammar() -> Grammar<&'static str> {
        let mut rule = Rule::new("test", extras());
        rule.add("new class [named] <text>", "class").unwrap();
        rule.add("new class function <text> [named] <text2>", "method").unwrap();
        rule.add("close (function|func)", "close").unwrap();
        rule.add("go left <n>", "left").unwrap();
        let mut grammar = Grammar::new("test");
        grammar.add_rule(rule);
        grammar.load();
        grammar
    }

    #[test]
    fn test_literal_match() {
        let g = grammar();
        let m = g.recognize("close func").unwrap();
        assert_eq!(*m.action, "close");
        assert!(m.captures.is_empty());
        assert_eq!(m.literals, 2);
    }

    #[test]
    fn test_case_and_punctuation_ignored() {
        let g = grammar();
        assert_eq!(*g.recognize("Close Function.").unwrap().action, "close");
    }

    #[test]
    fn test_partial_utterance_does_not_match() {
        let g = grammar();
        assert!(g.recognize("close").is_none());
        assert!(g.recognize("close function now").is_none());
        assert!(g.recognize("").is_none());
    }

    #[test]
    fn test_dictation_keeps_original_case() {
        let g = grammar();
        let m = g.recognize("new class named User Account").unwrap();
        assert_eq!(*m.action, "class");
        assert_eq!(m.captures.text("text"), Some("User Account"));
    }

    #[test]
    fn test_optional_word_may_be_omitted() {
        let g = grammar();
        let m = g.recognize("new class widget").unwrap();
        assert_eq!(m.captures.text("text"), Some("widget"));
    }

    #[test]
    fn test_more_specific_phrase_wins() {
        // Also matches "new class [named] <text>" with text="function foo named bar"
        let g = grammar();
        let m = g.recognize("new class function foo named bar").unwrap();
        assert_eq!(*m.action, "method");
        assert_eq!(m.captures.text("text"), Some("foo"));
        assert_eq!(m.captures.text("text2"), Some("bar"));
    }

    #[test]
    fn test_two_dictations_without_separator() {
        let g = grammar();
        let m = g.recognize("new class function server start").unwrap();
        assert_eq!(*m.action, "method");
        assert_eq!(m.captures.text("text"), Some("server"));
        assert_eq!(m.captures.text("text2"), Some("start"));
    }

    #[test]
    fn test_long_dictation_matches_quickly() {
        let g = grammar();
        let method = vec!["word"; 600].join(" ");
        let utterance = format!("new class function receiver {}", method);

        let started = Instant::now();
        let m = g.recognize(&utterance).unwrap();
        assert!(started.elapsed() < Duration::from_secs(1));

        assert_eq!(*m.action, "method");
        assert_eq!(m.captures.text("text"), Some("receiver"));
        assert_eq!(m.captures.text("text2"), Some(method.as_str()));
    }

    #[test]
    fn test_capture_leaves_room_for_trailing_words() {
        let mut rule = Rule::new("test", extras());
        rule.add("wrap <text> in <n> [more] lines", "wrap").unwrap();
        let mut g = Grammar::new("test");
        g.add_rule(rule);
        g.load();

        let m = g.recognize("wrap the in crowd in three lines").unwrap();
        assert_eq!(m.captures.text("text"), Some("the in crowd"));
        assert_eq!(m.captures.integer("n"), Some(3));
        assert!(g.recognize("wrap in three lines").is_none());
    }

    #[test]
    fn test_recognize_where_skips_rejected_entries() {
        let mut rule = Rule::new("test", extras());
        rule.add("new test <text>", "go test").unwrap();
        rule.add("new test <text>", "python test").unwrap();
        let mut g = Grammar::new("test");
        g.add_rule(rule);
        g.load();

        assert_eq!(*g.recognize("new test parser").unwrap().action, "go test");
        let m = g
            .recognize_where("new test parser", |action| *action != "go test")
            .unwrap();
        assert_eq!(*m.action, "python test");
        assert_eq!(m.captures.text("text"), Some("parser"));
        assert!(g.recognize_where("new test parser", |_| false).is_none());
    }

    #[test]
    fn test_integer_capture() {
        let g = grammar();
        assert_eq!(g.recognize("go left three").unwrap().captures.integer("n"), Some(3));
        assert_eq!(
            g.recognize("go left one hundred and five").unwrap().captures.integer("n"),
            Some(105)
        );
        assert!(g.recognize("go left 1000").is_none());
    }

    #[test]
    fn test_unknown_capture_rejected() {
        let mut rule: Rule<()> = Rule::new("bad", Extras::new());
        assert!(matches!(
            rule.add("say <text>", ()),
            Err(PatternError::UnknownCapture { .. })
        ));
        assert!(rule.is_empty());
    }

    #[test]
    fn test_unloaded_grammar_recognizes_nothing() {
        let mut g = grammar();
        assert!(g.unload());
        assert!(!g.is_loaded());
        assert!(g.recognize("close function").is_none());
    }

    #[test]
    fn test_unload_is_idempotent() {
        let mut g = grammar();
        assert!(g.unload());
        assert!(!g.unload());
        assert!(!g.unload());
    }

    #[test]
    fn test_lead_ins() {
        let g = grammar();
        let lead_ins = g.lead_ins();
        assert!(lead_ins.contains(&"new class named".to_string()));
        assert!(lead_ins.contains(&"close function".to_string()));
    }
}
