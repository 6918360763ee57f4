//! Identifier formatting for dictated names
//!
//! Dictated text arrives as loose words ("do thing") or already joined
//! ("doThing", "do_thing"). Each formatter first splits the input into
//! words, then joins them in the target convention:
//!
//! - `snake_case("do thing")` -> `do_thing`
//! - `camel_case("do thing")` -> `doThing`
//! - `pascal_case("do thing")` -> `DoThing`

/// Split dictated text into lowercase words.
///
/// Breaks on whitespace, `_`, `-` and on lower-to-upper case transitions,
/// so `"doThing"`, `"do_thing"` and `"do thing"` all give `["do", "thing"]`.
/// Non-alphanumeric characters are dropped.
pub fn split_words(text: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut prev: Option<char> = None;

    for c in text.chars() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev = None;
            continue;
        }

        // camelCase boundary: "doThing" -> "do" | "Thing"
        let boundary = c.is_uppercase()
            && prev.is_some_and(|p| p.is_lowercase() || p.is_ascii_digit());
        if boundary && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }

        current.extend(c.to_lowercase());
        prev = Some(c);
    }

    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => {
            let mut s = first.to_uppercase().to_string();
            s.push_str(chars.as_str());
            s
        }
        None => String::new(),
    }
}

/// `some words` -> `some_words`
pub fn snake_case(text: &str) -> String {
    split_words(text).join("_")
}

/// `some words` -> `someWords`
pub fn camel_case(text: &str) -> String {
    split_words(text)
        .iter()
        .enumerate()
        .map(|(i, w)| if i == 0 { w.clone() } else { capitalize(w) })
        .collect()
}

/// `some words` -> `SomeWords`
pub fn pascal_case(text: &str) -> String {
    split_words(text).iter().map(|w| capitalize(w)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_words() {
        assert_eq!(split_words("do thing"), vec!["do", "thing"]);
        assert_eq!(split_words("doThing"), vec!["do", "thing"]);
        assert_eq!(split_words("do_thing"), vec!["do", "thing"]);
        assert_eq!(split_words("  Do   Thing  "), vec!["do", "thing"]);
        assert_eq!(split_words("parse2Json"), vec!["parse2", "json"]);
        assert!(split_words("").is_empty());
    }

    #[test]
    fn test_acronyms_stay_together() {
        // Consecutive capitals don't split
        assert_eq!(split_words("HTTP server"), vec!["http", "server"]);
    }

    #[test]
    fn test_snake_case() {
        assert_eq!(snake_case("doThing"), "do_thing");
        assert_eq!(snake_case("load user profile"), "load_user_profile");
    }

    #[test]
    fn test_camel_case() {
        assert_eq!(camel_case("doThing"), "doThing");
        assert_eq!(camel_case("Load User profile"), "loadUserProfile");
    }

    #[test]
    fn test_pascal_case() {
        assert_eq!(pascal_case("doThing"), "DoThing");
        assert_eq!(pascal_case("foo"), "Foo");
        assert_eq!(pascal_case("user account"), "UserAccount");
    }

    #[test]
    fn test_punctuation_is_dropped() {
        assert_eq!(pascal_case("hello, world."), "HelloWorld");
    }
}
