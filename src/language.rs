//! Target languages that dictation can be switched between

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Language the spoken commands currently produce code for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    /// Go, spoken as "gopher"
    #[default]
    #[serde(alias = "gopher")]
    Go,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::Python, Language::Go];

    /// The word said after "mode" to select this language
    pub fn spoken_name(self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::Go => "gopher",
        }
    }

    /// Choice map for the `<language>` capture slot
    pub fn choices() -> Vec<(String, String)> {
        Self::ALL
            .iter()
            .map(|l| (l.spoken_name().to_string(), l.spoken_name().to_string()))
            .collect()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::Python => write!(f, "Python"),
            Language::Go => write!(f, "Go"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown language '{0}' (expected python or gopher)")]
pub struct UnknownLanguage(pub String);

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "python" | "py" => Ok(Language::Python),
            "gopher" | "go" | "golang" => Ok(Language::Go),
            other => Err(UnknownLanguage(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_go() {
        assert_eq!(Language::default(), Language::Go);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("python".parse::<Language>(), Ok(Language::Python));
        assert_eq!("Gopher".parse::<Language>(), Ok(Language::Go));
        assert_eq!("go".parse::<Language>(), Ok(Language::Go));
        assert!("rust".parse::<Language>().is_err());
    }

    #[test]
    fn test_spoken_names_round_trip() {
        for lang in Language::ALL {
            assert_eq!(lang.spoken_name().parse::<Language>(), Ok(lang));
        }
    }
}
