//! Text to action tree in one call
//!
//! `VoicePipeline` pairs a lexical analyzer with a voice parser so that the
//! analyzer classifies words against the vocabulary of the entry point the
//! parser will start from.

mod error;
pub mod output;
mod result;
mod validation;

pub use error::PipelineError;
pub use output::PipelineOutput;
pub use result::PipelineResult;
pub use validation::validate_pipeline;

use crate::config::runtime::{LexicalPreferences, RuntimeConfig};
use crate::lexical::{LexicalAnalyzer, LexicalMetrics};
use crate::syntax::{ParserStats, VoiceParser};
use std::time::Instant;

pub struct VoicePipeline {
    analyzer: LexicalAnalyzer,
    parser: VoiceParser,
}

impl VoicePipeline {
    pub fn new() -> Self {
        Self::from_parts(VoiceParser::new(), LexicalPreferences::default())
    }

    pub fn from_config(config: &RuntimeConfig) -> Self {
        Self::from_parts(
            VoiceParser::with_preferences(config.grammar.clone()),
            config.lexical.clone(),
        )
    }

    /// Wrap an existing parser, keeping its session
    pub fn from_parts(parser: VoiceParser, preferences: LexicalPreferences) -> Self {
        Self {
            analyzer: LexicalAnalyzer::with_preferences(parser.entry(), preferences),
            parser,
        }
    }

    pub fn process(&mut self, utterance: &str) -> Result<PipelineResult, PipelineError> {
        let start_time = Instant::now();

        let tokens = self.analyzer.tokenize(utterance)?;
        let outcome = self.parser.parse_detailed(tokens.tokens())?;

        let result = PipelineResult::new(
            outcome,
            tokens.word_count(),
            tokens.len(),
            self.parser.is_sleeping(),
            start_time.elapsed(),
        );
        result.log_success(utterance);

        Ok(result)
    }

    pub fn parser(&self) -> &VoiceParser {
        &self.parser
    }

    pub fn parser_stats(&self) -> &ParserStats {
        self.parser.stats()
    }

    pub fn lexical_metrics(&self) -> &LexicalMetrics {
        self.analyzer.metrics()
    }

    pub fn into_parser(self) -> VoiceParser {
        self.parser
    }
}

impl Default for VoicePipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Process one utterance against `parser`'s session
///
/// Words are classified with default lexical preferences for the parser's
/// entry point.
pub fn process_utterance(
    parser: &mut VoiceParser,
    utterance: &str,
) -> Result<PipelineResult, PipelineError> {
    let start_time = Instant::now();

    crate::log_debug!("Starting utterance processing", "utterance" => utterance);

    let tokens = crate::lexical::tokenize_utterance(utterance, parser.entry())?;
    let outcome = parser.parse_detailed(tokens.tokens())?;

    let result = PipelineResult::new(
        outcome,
        tokens.word_count(),
        tokens.len(),
        parser.is_sleeping(),
        start_time.elapsed(),
    );
    result.log_success(utterance);

    Ok(result)
}
