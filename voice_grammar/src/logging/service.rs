//! Logging service and the sinks it fans events out to
//!
//! The global service holds every configured sink. Parsers may also be given
//! a sink of their own (usually a [`MemoryLogger`]) for reduction tracing.

use super::codes::Code;
use super::config;
use super::events::{LogEvent, LogLevel};
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

pub trait Logger: Send + Sync {
    fn log(&self, event: &LogEvent);
}

/// How a sink renders each event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineFormat {
    Text,
    Json,
}

impl LineFormat {
    pub fn from_structured(structured: bool) -> Self {
        if structured {
            Self::Json
        } else {
            Self::Text
        }
    }

    fn render(self, event: &LogEvent) -> String {
        match self {
            Self::Text => event.format(),
            Self::Json => event.format_json().unwrap_or_else(|_| event.format()),
        }
    }
}

/// Level filter in front of a set of sinks
pub struct LoggingService {
    sinks: Vec<Arc<dyn Logger>>,
    min_level: LogLevel,
}

impl LoggingService {
    pub fn new(min_level: LogLevel) -> Self {
        Self {
            sinks: Vec::new(),
            min_level,
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn Logger>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }

    pub fn should_log(&self, level: LogLevel) -> bool {
        level <= self.min_level
    }

    pub fn log_event(&self, event: LogEvent) {
        if !self.should_log(event.level) {
            return;
        }
        for sink in &self.sinks {
            sink.log(&event);
        }
    }
}

/// Errors to stderr, everything else to stdout
pub struct ConsoleLogger {
    format: LineFormat,
}

impl ConsoleLogger {
    pub fn new(format: LineFormat) -> Self {
        Self { format }
    }
}

impl Logger for ConsoleLogger {
    fn log(&self, event: &LogEvent) {
        let line = self.format.render(event);
        if event.is_error() {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    }
}

/// Appends one line per event to a file kept open for the session
pub struct FileLogger {
    writer: Mutex<BufWriter<File>>,
    format: LineFormat,
}

impl FileLogger {
    pub fn new<P: AsRef<Path>>(path: P, format: LineFormat) -> io::Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            writer: Mutex::new(BufWriter::new(file)),
            format,
        })
    }
}

impl Logger for FileLogger {
    fn log(&self, event: &LogEvent) {
        let line = self.format.render(event);
        let mut writer = self
            .writer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        // A failing log file must not fail the utterance
        let _ = writeln!(writer, "{}", line).and_then(|_| writer.flush());
    }
}

/// Ring buffer of recent events; also the usual reduction trace sink
pub struct MemoryLogger {
    events: Mutex<Vec<LogEvent>>,
    capacity: usize,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::with_capacity(config::get_event_buffer_size())
    }

    /// Keep at most `capacity` events, dropping the oldest first
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            capacity: capacity.max(1),
        }
    }

    fn events(&self) -> MutexGuard<'_, Vec<LogEvent>> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn get_events(&self) -> Vec<LogEvent> {
        self.events().clone()
    }

    pub fn event_count(&self) -> usize {
        self.events().len()
    }

    pub fn clear(&self) {
        self.events().clear();
    }

    pub fn get_events_with_code(&self, code: Code) -> Vec<LogEvent> {
        self.events()
            .iter()
            .filter(|e| e.code == code)
            .cloned()
            .collect()
    }

    /// Events tagged with the given utterance number
    pub fn get_utterance_events(&self, utterance_no: u64) -> Vec<LogEvent> {
        let tag = utterance_no.to_string();
        self.events()
            .iter()
            .filter(|e| e.context.get("utterance") == Some(&tag))
            .cloned()
            .collect()
    }

    pub fn has_error_with_code(&self, code: Code) -> bool {
        self.events()
            .iter()
            .any(|e| e.is_error() && e.code == code)
    }
}

impl Default for MemoryLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger for MemoryLogger {
    fn log(&self, event: &LogEvent) {
        let mut events = self.events();
        if events.len() >= self.capacity {
            let excess = events.len() + 1 - self.capacity;
            events.drain(..excess);
        }
        events.push(event.clone());
    }
}

/// Build the global service from the logging preferences
pub fn create_configured_service() -> io::Result<LoggingService> {
    let format = LineFormat::from_structured(config::use_structured_logging());
    let mut service = LoggingService::new(config::get_min_log_level());

    if config::use_console_logging() {
        service = service.with_sink(Arc::new(ConsoleLogger::new(format)));
    }

    if let Some(path) = config::log_file_path() {
        service = service.with_sink(Arc::new(FileLogger::new(path, format)?));
    }

    Ok(service)
}
