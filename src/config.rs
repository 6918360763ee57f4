use crate::coding::InputMethod;
use crate::language::Language;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub dictation: DictationConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub commands: CommandsConfig,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

// ============================================================================
// Dictation Config
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct DictationConfig {
    /// Language active at startup: "python" or "gopher"
    #[serde(default)]
    pub mode: Language,

    /// Only emit Go method declarations while in Go mode
    #[serde(default)]
    pub strict_class_functions: bool,
}

impl Default for DictationConfig {
    fn default() -> Self {
        Self {
            mode: Language::default(),
            strict_class_functions: false,
        }
    }
}

// ============================================================================
// Input Config
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct InputConfig {
    /// "direct" or "clipboard"
    #[serde(default)]
    pub method: InputMethod,

    /// Pause between individual key presses
    #[serde(default = "default_key_delay_ms")]
    pub key_delay_ms: u64,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            method: InputMethod::default(),
            key_delay_ms: default_key_delay_ms(),
        }
    }
}

fn default_key_delay_ms() -> u64 {
    10
}

// ============================================================================
// Commands Config
// ============================================================================

#[derive(Debug, Deserialize, Default)]
pub struct CommandsConfig {
    /// User phrases added after the built-in tables
    #[serde(default)]
    pub custom: Vec<CustomCommand>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CustomCommand {
    /// Phrase pattern, may use <text>, <text2>, <n> and <n2>
    pub phrase: String,
    /// Text to type, with {text}, {n}, {text:pascal}... placeholders
    #[serde(default)]
    pub text: String,
    /// Keys pressed after the text, e.g. "up, tab"
    #[serde(default)]
    pub keys: Option<String>,
    /// Restrict the command to one language
    #[serde(default)]
    pub mode: Option<Language>,
}

impl Config {
    /// Load configuration.
    ///
    /// With no explicit path, `config.toml` in the working directory is
    /// used when present and defaults otherwise. An explicit path must exist.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_PATH), false),
        };

        if !required && !path.exists() {
            debug!("No config.toml found, using defaults");
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        let config = Self::from_toml(&contents).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }
}
