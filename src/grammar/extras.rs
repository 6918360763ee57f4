//! Capture slot definitions and the values they produce

use std::collections::HashMap;

/// What a `<name>` slot in a pattern accepts
#[derive(Debug, Clone, PartialEq)]
pub enum Extra {
    /// Free dictation, one or more words
    Dictation,
    /// Whole number in `min..=max`, spoken as digits or words
    Integer { min: u32, max: u32 },
    /// One of a fixed set of spoken keys, each mapped to a value
    Choice(Vec<(String, String)>),
}

/// Value captured for a slot at match time
#[derive(Debug, Clone, PartialEq)]
pub enum Capture {
    Text(String),
    Integer(u32),
    Choice(String),
}

/// Longest run of words tried for a spoken integer
/// ("nine hundred and ninety nine")
const MAX_NUMBER_WORDS: usize = 5;

impl Extra {
    /// All ways this extra can consume words starting at the front of
    /// `words`, as (words consumed, captured value). Shortest first.
    ///
    /// Dictation yields no value: its text is the consumed words
    /// themselves, joined only once a match is chosen.
    pub fn candidates(&self, words: &[&str]) -> Vec<(usize, Option<Capture>)> {
        match self {
            Extra::Dictation => (1..=words.len()).map(|n| (n, None)).collect(),
            Extra::Integer { min, max } => (1..=words.len().min(MAX_NUMBER_WORDS))
                .filter_map(|n| {
                    let value = parse_spoken_number(&words[..n])?;
                    (*min..=*max)
                        .contains(&value)
                        .then_some((n, Some(Capture::Integer(value))))
                })
                .collect(),
            Extra::Choice(options) => options
                .iter()
                .filter_map(|(key, value)| {
                    let key_words: Vec<&str> = key.split_whitespace().collect();
                    let matches = key_words.len() <= words.len()
                        && key_words
                            .iter()
                            .zip(words)
                            .all(|(k, w)| k.eq_ignore_ascii_case(w));
                    matches.then(|| (key_words.len(), Some(Capture::Choice(value.clone()))))
                })
                .collect(),
        }
    }

    /// Fewest words a match of this extra consumes
    pub fn min_words(&self) -> usize {
        match self {
            Extra::Dictation | Extra::Integer { .. } => 1,
            Extra::Choice(options) => options
                .iter()
                .map(|(key, _)| key.split_whitespace().count())
                .min()
                .unwrap_or(0),
        }
    }
}

/// Named extras available to a rule's patterns
pub type Extras = HashMap<String, Extra>;

#[derive(Debug, Clone, Copy, PartialEq)]
enum NumberWord {
    Unit(u32),
    Teen(u32),
    Tens(u32),
    Hundred,
    And,
}

fn classify(word: &str) -> Option<NumberWord> {
    use NumberWord::*;
    let w = word.to_lowercase();
    Some(match w.as_str() {
        "zero" => Unit(0),
        "one" => Unit(1),
        "two" => Unit(2),
        "three" => Unit(3),
        "four" => Unit(4),
        "five" => Unit(5),
        "six" => Unit(6),
        "seven" => Unit(7),
        "eight" => Unit(8),
        "nine" => Unit(9),
        "ten" => Teen(10),
        "eleven" => Teen(11),
        "twelve" => Teen(12),
        "thirteen" => Teen(13),
        "fourteen" => Teen(14),
        "fifteen" => Teen(15),
        "sixteen" => Teen(16),
        "seventeen" => Teen(17),
        "eighteen" => Teen(18),
        "nineteen" => Teen(19),
        "twenty" => Tens(20),
        "thirty" => Tens(30),
        "forty" => Tens(40),
        "fifty" => Tens(50),
        "sixty" => Tens(60),
        "seventy" => Tens(70),
        "eighty" => Tens(80),
        "ninety" => Tens(90),
        "hundred" => Hundred,
        "and" => And,
        _ => return None,
    })
}

/// Parse a number spoken as digits ("42") or words ("forty two",
/// "one hundred and five"). Handles values below one thousand.
pub fn parse_spoken_number(words: &[&str]) -> Option<u32> {
    if let [single] = words {
        if let Ok(n) = single.parse::<u32>() {
            return Some(n);
        }
    }

    let mut total = 0;
    let mut seen_hundred = false;
    let mut last: Option<NumberWord> = None;

    for (i, word) in words.iter().enumerate() {
        let current = classify(word)?;
        match current {
            NumberWord::Unit(v) => {
                if matches!(last, Some(NumberWord::Unit(_) | NumberWord::Teen(_))) {
                    return None;
                }
                total += v;
            }
            NumberWord::Teen(v) | NumberWord::Tens(v) => {
                if matches!(
                    last,
                    Some(NumberWord::Unit(_) | NumberWord::Teen(_) | NumberWord::Tens(_))
                ) {
                    return None;
                }
                total += v;
            }
            NumberWord::Hundred => {
                // only "<unit> hundred" at the start
                if seen_hundred || i != 1 || !matches!(last, Some(NumberWord::Unit(1..))) {
                    return None;
                }
                total *= 100;
                seen_hundred = true;
            }
            NumberWord::And => {
                if last != Some(NumberWord::Hundred) {
                    return None;
                }
            }
        }
        last = Some(current);
    }

    // Trailing "and" or nothing at all isn't a number
    match last {
        None | Some(NumberWord::And) => None,
        Some(_) => Some(total),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(s: &str) -> Vec<&str> {
        s.split_whitespace().collect()
    }

    #[test]
    fn test_digits() {
        assert_eq!(parse_spoken_number(&["42"]), Some(42));
        assert_eq!(parse_spoken_number(&["999"]), Some(999));
    }

    #[test]
    fn test_number_words() {
        assert_eq!(parse_spoken_number(&words("five")), Some(5));
        assert_eq!(parse_spoken_number(&words("seventeen")), Some(17));
        assert_eq!(parse_spoken_number(&words("forty two")), Some(42));
        assert_eq!(parse_spoken_number(&words("one hundred")), Some(100));
        assert_eq!(parse_spoken_number(&words("two hundred five")), Some(205));
        assert_eq!(
            parse_spoken_number(&words("nine hundred and ninety nine")),
            Some(999)
        );
    }

    #[test]
    fn test_invalid_numbers() {
        assert_eq!(parse_spoken_number(&words("five five")), None);
        assert_eq!(parse_spoken_number(&words("twelve three")), None);
        assert_eq!(parse_spoken_number(&words("hundred")), None);
        assert_eq!(parse_spoken_number(&words("one hundred and")), None);
        assert_eq!(parse_spoken_number(&words("forty banana")), None);
        assert_eq!(parse_spoken_number(&[]), None);
    }

    #[test]
    fn test_dictation_candidates_shortest_first() {
        let extra = Extra::Dictation;
        let candidates = extra.candidates(&words("foo named bar"));
        assert_eq!(candidates, vec![(1, None), (2, None), (3, None)]);
    }

    #[test]
    fn test_integer_candidates_respect_bounds() {
        let extra = Extra::Integer { min: 1, max: 999 };
        assert_eq!(
            extra.candidates(&words("twenty five lines")),
            vec![
                (1, Some(Capture::Integer(20))),
                (2, Some(Capture::Integer(25)))
            ]
        );
        assert!(extra.candidates(&words("zero")).is_empty());
        assert!(extra.candidates(&words("1000")).is_empty());
    }

    #[test]
    fn test_choice_candidates() {
        let extra = Extra::Choice(vec![
            ("python".to_string(), "python".to_string()),
            ("gopher".to_string(), "gopher".to_string()),
        ]);
        assert_eq!(
            extra.candidates(&words("Gopher")),
            vec![(1, Some(Capture::Choice("gopher".to_string())))]
        );
        assert!(extra.candidates(&words("rust")).is_empty());
    }

    #[test]
    fn test_min_words() {
        assert_eq!(Extra::Dictation.min_words(), 1);
        assert_eq!(Extra::Integer { min: 1, max: 999 }.min_words(), 1);
        let choice = Extra::Choice(vec![
            ("int sixty four".to_string(), "int64".to_string()),
            ("bool".to_string(), "bool".to_string()),
        ]);
        assert_eq!(choice.min_words(), 1);
    }
}
