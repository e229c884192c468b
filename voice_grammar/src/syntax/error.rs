//! Error types for parsing token streams into action trees
//!
//! Every error maps to a code in the global registry so that callers can log
//! it without inspecting the variant.

use crate::logging::{codes, Code};
use crate::tokens::Token;

pub type GrammarResult<T> = Result<T, GrammarError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GrammarError {
    /// The first token no derivation could continue through
    #[error("Unexpected token `{token}' (word number {word_no})")]
    UnexpectedToken { token: Token, word_no: usize },

    #[error("Empty token stream - no tokens to parse")]
    EmptyTokenStream,

    #[error("Utterance too long: {count} tokens (maximum {max})")]
    UtteranceTooLong { count: usize, max: usize },

    #[error("Maximum derivation depth {max} exceeded")]
    MaxDerivationDepth { max: usize },

    #[error("Internal parser error: {message}")]
    InternalParserError { message: String },
}

impl GrammarError {
    pub fn unexpected_token(token: Token) -> Self {
        let word_no = token.word_no;
        Self::UnexpectedToken { token, word_no }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalParserError {
            message: message.into(),
        }
    }

    /// Get error code for global logging system
    pub fn error_code(&self) -> Code {
        match self {
            Self::UnexpectedToken { .. } => codes::syntax::UNEXPECTED_TOKEN,
            Self::EmptyTokenStream => codes::syntax::EMPTY_TOKEN_STREAM,
            Self::UtteranceTooLong { .. } => codes::syntax::UTTERANCE_TOO_LONG,
            Self::MaxDerivationDepth { .. } => codes::syntax::MAX_DERIVATION_DEPTH,
            Self::InternalParserError { .. } => codes::syntax::INTERNAL_PARSER_ERROR,
        }
    }

    /// Zero-based index of the offending word, if the error has one
    pub fn word_no(&self) -> Option<usize> {
        match self {
            Self::UnexpectedToken { word_no, .. } => Some(*word_no),
            _ => None,
        }
    }

    pub fn token(&self) -> Option<&Token> {
        match self {
            Self::UnexpectedToken { token, .. } => Some(token),
            _ => None,
        }
    }

    /// Terminal label of the offending token (`ANY` for free-text words)
    pub fn terminal(&self) -> Option<&str> {
        self.token().map(|token| token.kind.as_str())
    }

    /// A user can retry with a different utterance
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            Self::InternalParserError { .. } | Self::MaxDerivationDepth { .. }
        )
    }

    pub fn severity(&self) -> &'static str {
        codes::get_severity(self.error_code().as_str()).as_str()
    }

    pub fn description(&self) -> &'static str {
        codes::get_description(self.error_code().as_str())
    }

    pub fn recommended_action(&self) -> &'static str {
        codes::get_action(self.error_code().as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unexpected_token_message() {
        let error = GrammarError::unexpected_token(Token::any("cat", 1));

        assert_eq!(
            error.to_string(),
            "Unexpected token `ANY(cat)' (word number 1)"
        );
        assert_eq!(error.word_no(), Some(1));
        assert_eq!(error.terminal(), Some("ANY"));
    }

    #[test]
    fn test_error_code_mapping() {
        assert_eq!(
            GrammarError::unexpected_token(Token::new("up", 0))
                .error_code()
                .as_str(),
            "E050"
        );
        assert_eq!(GrammarError::EmptyTokenStream.error_code().as_str(), "E041");
        assert_eq!(
            GrammarError::UtteranceTooLong { count: 9, max: 8 }
                .error_code()
                .as_str(),
            "E042"
        );
        assert_eq!(
            GrammarError::MaxDerivationDepth { max: 4 }.error_code().as_str(),
            "E087"
        );
        assert_eq!(GrammarError::internal("x").error_code().as_str(), "E086");
    }

    #[test]
    fn test_error_properties() {
        assert!(GrammarError::EmptyTokenStream.is_recoverable());
        assert!(!GrammarError::internal("bad table").is_recoverable());
        assert_eq!(GrammarError::EmptyTokenStream.word_no(), None);
        assert!(!GrammarError::EmptyTokenStream.description().is_empty());
    }
}
