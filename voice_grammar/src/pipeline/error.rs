use crate::lexical::LexerError;
use crate::logging::Code;
use crate::syntax::GrammarError;

/// Pipeline processing errors
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Lexical analysis failed: {0}")]
    LexicalAnalysis(#[from] LexerError),

    #[error("Syntax analysis failed: {0}")]
    SyntaxAnalysis(#[from] GrammarError),

    #[error("Pipeline error: {message}")]
    Pipeline { message: String },
}

impl PipelineError {
    pub fn pipeline_error(message: &str) -> Self {
        Self::Pipeline {
            message: message.to_string(),
        }
    }

    pub fn error_code(&self) -> Code {
        match self {
            Self::LexicalAnalysis(error) => error.error_code(),
            Self::SyntaxAnalysis(error) => error.error_code(),
            Self::Pipeline { .. } => crate::logging::codes::system::INTERNAL_ERROR,
        }
    }

    /// Zero-based index of the word the failing stage blamed
    pub fn word_no(&self) -> Option<usize> {
        match self {
            Self::LexicalAnalysis(error) => error.word_no(),
            Self::SyntaxAnalysis(error) => error.word_no(),
            Self::Pipeline { .. } => None,
        }
    }
}
