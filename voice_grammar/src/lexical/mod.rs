//! Lexical analysis module - recognised text to token streams
//!
//! The recogniser upstream is trusted to produce words; this module only
//! decides, per entry point, which words are grammar terminals and which are
//! free text, and enforces the compile-time size limits.

pub mod analyzer;

use crate::config::compile_time::lexical::*;
use crate::config::runtime::LexicalPreferences;
use crate::grammar::EntryPoint;
use crate::logging::codes;
use crate::tokens::TokenStream;

pub use analyzer::{LexerError, LexicalAnalyzer, LexicalMetrics};

/// Tokenize one utterance with default preferences
pub fn tokenize_utterance(text: &str, entry: EntryPoint) -> Result<TokenStream, LexerError> {
    LexicalAnalyzer::new(entry).tokenize(text)
}

pub fn tokenize_utterance_with_preferences(
    text: &str,
    entry: EntryPoint,
    preferences: LexicalPreferences,
) -> Result<TokenStream, LexerError> {
    LexicalAnalyzer::with_preferences(entry, preferences).tokenize(text)
}

pub fn create_analyzer(entry: EntryPoint) -> LexicalAnalyzer {
    LexicalAnalyzer::new(entry)
}

/// Check that lexical error codes are registered and limits are usable
pub fn validate_tokenization() -> Result<(), String> {
    for code in [codes::lexical::TOO_MANY_WORDS, codes::lexical::WORD_TOO_LONG] {
        if codes::get_error_metadata(code.as_str()).is_none() {
            return Err(format!(
                "Lexical error code {} not found in metadata registry",
                code.as_str()
            ));
        }
    }

    if MAX_WORDS_PER_UTTERANCE == 0 {
        return Err("MAX_WORDS_PER_UTTERANCE cannot be zero".to_string());
    }
    if MAX_WORD_LENGTH == 0 {
        return Err("MAX_WORD_LENGTH cannot be zero".to_string());
    }

    crate::log_debug!("Lexical limits initialized",
        "max_words_per_utterance" => MAX_WORDS_PER_UTTERANCE,
        "max_word_length" => MAX_WORD_LENGTH
    );

    Ok(())
}
