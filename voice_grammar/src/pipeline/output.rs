use super::PipelineResult;
use crate::grammar::Action;
use serde::{Deserialize, Serialize};

/// What an executor receives for one utterance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineOutput {
    pub action: Action,
    pub sleeping: bool,
    pub words: usize,
}

impl PipelineOutput {
    pub fn new(action: Action, sleeping: bool, words: usize) -> Self {
        Self {
            action,
            sleeping,
            words,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl From<PipelineResult> for PipelineOutput {
    fn from(result: PipelineResult) -> Self {
        Self::new(result.action, result.sleeping, result.word_count)
    }
}
