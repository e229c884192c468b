//! Log events emitted while utterances are tokenized and parsed

use super::codes::{self, Code};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Log severity levels, most severe first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
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
}

#[derive(Debug, Clone)]
pub struct LogEvent {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub code: Code,
    pub message: String,
    /// Zero-based position of the word the event refers to, if any
    pub word_no: Option<usize>,
    pub context: BTreeMap<String, String>,
}

// Borrowed view written out as one JSON line
#[derive(Serialize)]
struct EventRecord<'a> {
    timestamp: String,
    level: &'static str,
    code: &'static str,
    category: &'static str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    word_no: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    recoverable: Option<bool>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    context: &'a BTreeMap<String, String>,
}

impl LogEvent {
    fn with_level(level: LogLevel, code: Code, message: &str) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            code,
            message: truncate_message(message),
            word_no: None,
            context: BTreeMap::new(),
        }
    }

    pub fn error(code: Code, message: &str) -> Self {
        Self::with_level(LogLevel::Error, code, message)
    }

    /// Uncoded warning
    pub fn warning(message: &str) -> Self {
        Self::with_level(LogLevel::Warning, Code::new("W000"), message)
    }

    pub fn warning_with_code(code: Code, message: &str) -> Self {
        Self::with_level(LogLevel::Warning, code, message)
    }

    /// Uncoded informational event
    pub fn info(message: &str) -> Self {
        Self::with_level(LogLevel::Info, Code::new("I000"), message)
    }

    /// Informational event carrying a stage completion code
    pub fn success(code: Code, message: &str) -> Self {
        Self::with_level(LogLevel::Info, code, message)
    }

    pub fn debug(message: &str) -> Self {
        Self::with_level(LogLevel::Debug, Code::new("D000"), message)
    }

    pub fn debug_with_code(code: Code, message: &str) -> Self {
        Self::with_level(LogLevel::Debug, code, message)
    }

    /// Attach the word position the event refers to
    pub fn with_word(mut self, word_no: usize) -> Self {
        self.word_no = Some(word_no);
        self
    }

    pub fn with_context(mut self, key: &str, value: &str) -> Self {
        self.context.insert(key.to_string(), value.to_string());
        self
    }

    pub fn is_error(&self) -> bool {
        self.level == LogLevel::Error
    }

    pub fn category(&self) -> &'static str {
        codes::get_category(self.code.as_str())
    }

    /// `[LEVEL] CODE u<utterance> - message at word N {key=value, ...}`
    pub fn format(&self) -> String {
        let mut line = format!("[{}] {}", self.level.as_str(), self.code.as_str());

        if let Some(utterance) = self.context.get("utterance") {
            line.push_str(&format!(" u{}", utterance));
        }

        line.push_str(" - ");
        line.push_str(&self.message);

        if let Some(word_no) = self.word_no {
            line.push_str(&format!(" at word {}", word_no));
        }

        let extra: Vec<String> = self
            .context
            .iter()
            .filter(|(key, _)| key.as_str() != "utterance")
            .map(|(key, value)| format!("{}={}", key, value))
            .collect();
        if !extra.is_empty() {
            line.push_str(&format!(" {{{}}}", extra.join(", ")));
        }

        line
    }

    /// One JSON object per event, for structured sinks
    pub fn format_json(&self) -> Result<String, serde_json::Error> {
        let record = EventRecord {
            timestamp: self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            level: self.level.as_str(),
            code: self.code.as_str(),
            category: self.category(),
            message: &self.message,
            word_no: self.word_no,
            recoverable: self
                .is_error()
                .then(|| codes::is_recoverable(self.code.as_str())),
            context: &self.context,
        };
        serde_json::to_string(&record)
    }
}

fn truncate_message(message: &str) -> String {
    let limit = super::config::get_max_log_message_length();
    if message.len() <= limit {
        return message.to_string();
    }

    let mut cut = limit;
    while !message.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}...", &message[..cut])
}
