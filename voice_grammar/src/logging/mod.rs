//! Global logging module for the voice grammar
//!
//! Provides thread-safe global logging with per-utterance context and a
//! clean macro interface.

pub mod codes;
pub mod config;
pub mod events;
pub mod macros;
pub mod service;

use std::cell::{Cell, RefCell};
use std::sync::{Arc, OnceLock};

// Re-export main types
pub use codes::Code;
pub use events::{LogEvent, LogLevel};
pub use service::{ConsoleLogger, FileLogger, LineFormat, Logger, LoggingService, MemoryLogger};

// ============================================================================
// GLOBAL STATE
// ============================================================================

static GLOBAL_LOGGER: OnceLock<Arc<LoggingService>> = OnceLock::new();

thread_local! {
    static UTTERANCE_CONTEXT: RefCell<Option<UtteranceContext>> = RefCell::new(None);
    static UTTERANCE_EVENTS: Cell<usize> = const { Cell::new(0) };
    static UTTERANCE_DROPPED: Cell<usize> = const { Cell::new(0) };
}

/// Identifies the utterance currently being processed on this thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UtteranceContext {
    /// Sequence number of the utterance within its session, starting at 1
    pub utterance_no: u64,
    /// Entry production the utterance is parsed against
    pub entry: &'static str,
}

impl UtteranceContext {
    pub fn new(utterance_no: u64, entry: &'static str) -> Self {
        Self {
            utterance_no,
            entry,
        }
    }
}

// ============================================================================
// INITIALIZATION
// ============================================================================

/// Initialize global logging system
pub fn init_global_logging() -> Result<(), String> {
    config::validate_config().map_err(|e| format!("Configuration validation failed: {}", e))?;

    let logging_service = Arc::new(
        service::create_configured_service()
            .map_err(|e| format!("Failed to create logging service: {}", e))?,
    );

    GLOBAL_LOGGER
        .set(logging_service.clone())
        .map_err(|_| "Global logger already initialized")?;

    let required_codes = ["ERR001", "E041", "E050", "I040"];
    for &code in &required_codes {
        if codes::get_description(code) == "Unknown error" {
            return Err(format!("Missing metadata for error code: {}", code));
        }
    }

    logging_service.log_event(LogEvent::success(
        codes::success::SYSTEM_INITIALIZATION_COMPLETED,
        "Global logging system initialized",
    ));

    Ok(())
}

/// Initialize with custom service (primarily for testing)
pub fn init_global_logging_with_service(service: Arc<LoggingService>) -> Result<(), String> {
    GLOBAL_LOGGER
        .set(service)
        .map_err(|_| "Global logger already initialized".to_string())
}

/// Check if global logging is initialized
pub fn is_initialized() -> bool {
    GLOBAL_LOGGER.get().is_some()
}

/// Safe access to global logger
pub fn try_get_global_logger() -> Option<&'static LoggingService> {
    GLOBAL_LOGGER.get().map(|service| service.as_ref())
}

// ============================================================================
// UTTERANCE CONTEXT MANAGEMENT
// ============================================================================

fn reset_utterance_counters() {
    UTTERANCE_EVENTS.with(|count| count.set(0));
    UTTERANCE_DROPPED.with(|count| count.set(0));
}

/// Set utterance context for current thread
pub fn set_utterance_context(context: UtteranceContext) {
    UTTERANCE_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = Some(context);
    });
    reset_utterance_counters();
}

/// Clear utterance context for current thread
pub fn clear_utterance_context() {
    UTTERANCE_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = None;
    });
    reset_utterance_counters();
}

/// Execute function with utterance context
///
/// Events dropped over the per-utterance limit are reported once the
/// utterance is done.
pub fn with_utterance_context<F, R>(context: UtteranceContext, f: F) -> R
where
    F: FnOnce() -> R,
{
    let utterance_no = context.utterance_no;
    set_utterance_context(context);
    let result = f();

    let dropped = dropped_utterance_events();
    clear_utterance_context();

    if dropped > 0 {
        if let Some(logger) = try_get_global_logger() {
            logger.log_event(
                LogEvent::warning("Per-utterance log event limit reached")
                    .with_context("utterance", &utterance_no.to_string())
                    .with_context("dropped", &dropped.to_string()),
            );
        }
    }

    result
}

/// Whether an event may still be logged for the current utterance
///
/// Errors are always admitted. Other events count against
/// `MAX_LOG_EVENTS_PER_UTTERANCE`; outside an utterance there is no limit.
pub fn admit_utterance_event(level: LogLevel) -> bool {
    if level == LogLevel::Error {
        return true;
    }

    let in_utterance = UTTERANCE_CONTEXT.with(|ctx| ctx.borrow().is_some());
    if !in_utterance {
        return true;
    }

    let seen = UTTERANCE_EVENTS.with(|count| {
        let seen = count.get() + 1;
        count.set(seen);
        seen
    });

    if seen > config::get_max_log_events_per_utterance() {
        UTTERANCE_DROPPED.with(|count| count.set(count.get() + 1));
        return false;
    }

    true
}

/// Events refused so far for the current utterance
pub fn dropped_utterance_events() -> usize {
    UTTERANCE_DROPPED.with(|count| count.get())
}

/// Get current utterance context (used by macros)
pub fn get_current_utterance_context() -> Option<UtteranceContext> {
    UTTERANCE_CONTEXT.with(|ctx| ctx.borrow().clone())
}

/// Tag an event with the current utterance, when enabled
pub fn attach_utterance_context(event: LogEvent) -> LogEvent {
    if !config::include_utterance_context() {
        return event;
    }

    match get_current_utterance_context() {
        Some(ctx) => event
            .with_context("utterance", &ctx.utterance_no.to_string())
            .with_context("entry", ctx.entry),
        None => event,
    }
}

// ============================================================================
// MACRO SUPPORT FUNCTIONS
// ============================================================================

fn apply_context(mut event: LogEvent, context: Vec<(&str, &str)>) -> LogEvent {
    for (key, value) in context {
        event = event.with_context(key, value);
    }
    event
}

fn emit(event: LogEvent) {
    if let Some(logger) = try_get_global_logger() {
        if admit_utterance_event(event.level) {
            logger.log_event(attach_utterance_context(event));
        }
    }
}

/// Log error with context (used by log_error! macro)
pub fn log_error_with_context(
    code: Code,
    message: &str,
    word_no: Option<usize>,
    context: Vec<(&str, &str)>,
) {
    let mut event = LogEvent::error(code, message);

    if let Some(w) = word_no {
        event = event.with_word(w);
    }

    emit(apply_context(event, context));
}

/// Log success with context (used by log_success! macro)
pub fn log_success_with_context(code: Code, message: &str, context: Vec<(&str, &str)>) {
    emit(apply_context(LogEvent::success(code, message), context));
}

/// Log info with context (used by log_info! macro)
pub fn log_info_with_context(message: &str, context: Vec<(&str, &str)>) {
    emit(apply_context(LogEvent::info(message), context));
}

/// Log a pre-built event through the global logger
pub fn log_prepared_event(event: LogEvent) {
    emit(event);
}

// ============================================================================
// DIAGNOSTICS AND FALLBACK LOGGING
// ============================================================================

/// Get system diagnostics
pub fn get_system_diagnostics() -> String {
    let mut diagnostics = String::new();

    diagnostics.push_str("=== Logging System Diagnostics ===\n");
    diagnostics.push_str(&format!("Initialized: {}\n", is_initialized()));
    if let Some(ctx) = get_current_utterance_context() {
        diagnostics.push_str(&format!(
            "Current utterance: {} ({})\n",
            ctx.utterance_no, ctx.entry
        ));
    }
    diagnostics.push('\n');
    diagnostics.push_str(&config::get_config_summary());

    diagnostics
}

/// Safe error logging (won't panic if uninitialized)
pub fn safe_log_error(code: Code, message: &str) {
    if let Some(logger) = try_get_global_logger() {
        logger.log_event(LogEvent::error(code, message));
    } else {
        eprintln!("[ERROR] FALLBACK: [{}] {}", code.as_str(), message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utterance_context_management() {
        assert!(get_current_utterance_context().is_none());

        set_utterance_context(UtteranceContext::new(4, "single_input"));
        let context = get_current_utterance_context();
        assert_eq!(context.map(|c| c.utterance_no), Some(4));

        clear_utterance_context();
        assert!(get_current_utterance_context().is_none());
    }

    #[test]
    fn test_with_utterance_context() {
        let result = with_utterance_context(UtteranceContext::new(9, "single_input"), || {
            let event = attach_utterance_context(LogEvent::info("inside"));
            if config::include_utterance_context() {
                assert_eq!(event.context.get("utterance"), Some(&"9".to_string()));
            }
            42
        });

        assert_eq!(result, 42);
        assert!(get_current_utterance_context().is_none());
    }

    #[test]
    fn test_utterance_event_limit() {
        let limit = config::get_max_log_events_per_utterance();

        // No limit outside an utterance
        for _ in 0..=limit {
            assert!(admit_utterance_event(LogLevel::Debug));
        }

        with_utterance_context(UtteranceContext::new(1, "single_input"), || {
            for _ in 0..limit {
                assert!(admit_utterance_event(LogLevel::Info));
            }
            assert!(!admit_utterance_event(LogLevel::Debug));
            assert!(!admit_utterance_event(LogLevel::Warning));
            assert!(admit_utterance_event(LogLevel::Error));
            assert_eq!(dropped_utterance_events(), 2);
        });

        assert_eq!(dropped_utterance_events(), 0);

        // Each utterance starts with a fresh allowance
        with_utterance_context(UtteranceContext::new(2, "single_input"), || {
            assert!(admit_utterance_event(LogLevel::Info));
            assert_eq!(dropped_utterance_events(), 0);
        });
    }

    #[test]
    fn test_safe_logging() {
        // Should not panic even if global logging is not initialized
        safe_log_error(codes::system::INTERNAL_ERROR, "Test error");
    }

    #[test]
    fn test_diagnostics() {
        let diagnostics = get_system_diagnostics();
        assert!(diagnostics.contains("Logging System Diagnostics"));
        assert!(diagnostics.contains("Initialized:"));
    }
}
