// RUNTIME PREFERENCES (User Experience)

use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GrammarPreferences {
    /// Accept and drop a leading run of filler words ("i", "the", "a", "and")
    pub discard_junk_prefix: bool,

    /// Emit a debug event for every production reduced
    pub trace_reductions: bool,

    /// Warn when a derivation had to be chosen among several candidates
    pub warn_on_ambiguity: bool,
}

impl Default for GrammarPreferences {
    fn default() -> Self {
        Self {
            discard_junk_prefix: env::var("VOICE_GRAMMAR_DISCARD_JUNK")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            trace_reductions: env::var("VOICE_GRAMMAR_TRACE_REDUCTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            warn_on_ambiguity: env::var("VOICE_GRAMMAR_WARN_ON_AMBIGUITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LexicalPreferences {
    /// Lower-case recognised words before classifying them
    pub lowercase_words: bool,

    /// Log a summary of terminal and free-text word counts per utterance
    pub log_word_statistics: bool,
}

impl Default for LexicalPreferences {
    fn default() -> Self {
        Self {
            lowercase_words: env::var("VOICE_LEXICAL_LOWERCASE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            log_word_statistics: env::var("VOICE_LEXICAL_LOG_STATISTICS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingPreferences {
    /// Whether to use structured JSON logging (user preference)
    pub use_structured_logging: bool,

    /// Whether to enable console output (user preference)
    pub enable_console_logging: bool,

    /// User preferred minimum log level
    pub min_log_level: LogLevel,

    /// Optional file that receives a copy of every event
    pub log_file: Option<String>,

    /// Whether to tag events with the session utterance number
    pub include_utterance_context: bool,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            use_structured_logging: env::var("VOICE_LOGGING_USE_STRUCTURED")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            enable_console_logging: env::var("VOICE_LOGGING_ENABLE_CONSOLE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            min_log_level: env::var("VOICE_LOGGING_MIN_LEVEL")
                .ok()
                .and_then(|v| parse_log_level(&v))
                .unwrap_or(LogLevel::Info),
            log_file: env::var("VOICE_LOGGING_FILE").ok().filter(|v| !v.is_empty()),
            include_utterance_context: env::var("VOICE_LOGGING_INCLUDE_UTTERANCE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error = 0,
    Warning = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }

    /// Convert to events::LogLevel for compatibility
    pub fn to_events_log_level(&self) -> crate::logging::events::LogLevel {
        match self {
            LogLevel::Error => crate::logging::events::LogLevel::Error,
            LogLevel::Warning => crate::logging::events::LogLevel::Warning,
            LogLevel::Info => crate::logging::events::LogLevel::Info,
            LogLevel::Debug => crate::logging::events::LogLevel::Debug,
        }
    }
}

/// Parse log level from string (used for environment variables)
pub fn parse_log_level(level: &str) -> Option<LogLevel> {
    match level.to_lowercase().as_str() {
        "error" | "0" => Some(LogLevel::Error),
        "warning" | "warn" | "1" => Some(LogLevel::Warning),
        "info" | "2" => Some(LogLevel::Info),
        "debug" | "3" => Some(LogLevel::Debug),
        _ => None,
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub grammar: GrammarPreferences,
    pub lexical: LexicalPreferences,
    pub logging: LoggingPreferences,
}

impl RuntimeConfig {
    /// Parse preferences from TOML text. Missing sections and keys fall back
    /// to the environment-driven defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| format!("Invalid runtime configuration: {}", e))
    }

    /// Load preferences from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        Self::from_toml_str(&content)
    }
}

/// Environment variable names for configuration
pub mod env_vars {
    // Grammar
    pub const GRAMMAR_DISCARD_JUNK: &str = "VOICE_GRAMMAR_DISCARD_JUNK";
    pub const GRAMMAR_TRACE_REDUCTIONS: &str = "VOICE_GRAMMAR_TRACE_REDUCTIONS";
    pub const GRAMMAR_WARN_ON_AMBIGUITY: &str = "VOICE_GRAMMAR_WARN_ON_AMBIGUITY";

    // Lexical
    pub const LEXICAL_LOWERCASE: &str = "VOICE_LEXICAL_LOWERCASE";
    pub const LEXICAL_LOG_STATISTICS: &str = "VOICE_LEXICAL_LOG_STATISTICS";

    // Logging
    pub const LOGGING_USE_STRUCTURED: &str = "VOICE_LOGGING_USE_STRUCTURED";
    pub const LOGGING_ENABLE_CONSOLE: &str = "VOICE_LOGGING_ENABLE_CONSOLE";
    pub const LOGGING_MIN_LEVEL: &str = "VOICE_LOGGING_MIN_LEVEL";
    pub const LOGGING_FILE: &str = "VOICE_LOGGING_FILE";
    pub const LOGGING_INCLUDE_UTTERANCE: &str = "VOICE_LOGGING_INCLUDE_UTTERANCE";
}
