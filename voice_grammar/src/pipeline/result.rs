use crate::grammar::Action;
use crate::syntax::ParseOutcome;
use std::time::Duration;

/// One utterance taken from text to an action tree
#[derive(Debug, Clone)]
pub struct PipelineResult {
    pub action: Action,
    pub word_count: usize,
    pub token_count: usize,
    pub ties: usize,
    pub reductions: usize,
    /// Session state after the utterance
    pub sleeping: bool,
    pub processing_duration: Duration,
}

impl PipelineResult {
    pub fn new(
        outcome: ParseOutcome,
        word_count: usize,
        token_count: usize,
        sleeping: bool,
        processing_duration: Duration,
    ) -> Self {
        Self {
            action: outcome.action,
            word_count,
            token_count,
            ties: outcome.ties,
            reductions: outcome.reductions,
            sleeping,
            processing_duration,
        }
    }

    /// Nothing for the executor to do
    pub fn is_noop(&self) -> bool {
        self.action.is_empty()
    }

    pub fn log_success(&self, utterance: &str) {
        crate::log_success!(
            crate::logging::codes::success::AST_CONSTRUCTION_COMPLETE,
            "Utterance processing pipeline succeeded",
            "utterance" => utterance,
            "kind" => self.action.kind_name(),
            "words" => self.word_count,
            "duration_ms" => format!("{:.3}", self.processing_duration.as_secs_f64() * 1000.0)
        );
    }
}
