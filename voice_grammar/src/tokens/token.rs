//! Token definition

use serde::{Deserialize, Serialize};
use std::fmt;

/// Label of the token that closes every utterance
pub const END: &str = "END";

/// Label of a free-text word outside the command vocabulary
pub const ANY: &str = "ANY";

/// One recognised word
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    /// Terminal label the grammar matches against (case-sensitive)
    pub kind: String,
    /// Zero-based position of the word in the utterance
    pub word_no: usize,
    /// Raw word text for `ANY` tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<String>,
}

impl Token {
    /// A vocabulary word; the label is the word itself
    pub fn new(kind: impl Into<String>, word_no: usize) -> Self {
        Self {
            kind: kind.into(),
            word_no,
            extra: None,
        }
    }

    /// A free-text word
    pub fn any(text: impl Into<String>, word_no: usize) -> Self {
        Self {
            kind: ANY.to_string(),
            word_no,
            extra: Some(text.into()),
        }
    }

    /// The end-of-utterance marker
    pub fn end(word_no: usize) -> Self {
        Self::new(END, word_no)
    }

    pub fn is_end(&self) -> bool {
        self.kind == END
    }

    pub fn is_any(&self) -> bool {
        self.kind == ANY
    }

    /// Whether this token satisfies a terminal symbol of the grammar
    pub fn matches(&self, terminal: &str) -> bool {
        self.kind == terminal
    }

    /// Spoken text of the token: the raw word for `ANY`, otherwise the label
    pub fn text(&self) -> &str {
        self.extra.as_deref().unwrap_or(&self.kind)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.extra {
            Some(extra) => write!(f, "{}({})", self.kind, extra),
            None => write!(f, "{}", self.kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocabulary_token() {
        let token = Token::new("up", 0);
        assert!(token.matches("up"));
        assert!(!token.matches("Up"));
        assert!(!token.is_any());
        assert_eq!(token.text(), "up");
        assert_eq!(token.to_string(), "up");
    }

    #[test]
    fn test_free_text_token() {
        let token = Token::any("hello", 3);
        assert!(token.is_any());
        assert!(token.matches(ANY));
        assert_eq!(token.text(), "hello");
        assert_eq!(token.word_no, 3);
        assert_eq!(token.to_string(), "ANY(hello)");
    }

    #[test]
    fn test_end_token() {
        let token = Token::end(5);
        assert!(token.is_end());
        assert_eq!(token.extra, None);
    }

    #[test]
    fn test_token_json_shape() {
        let json = serde_json::to_string(&Token::new("sky", 1)).unwrap();
        assert_eq!(json, r#"{"kind":"sky","word_no":1}"#);

        let back: Token = serde_json::from_str(r#"{"kind":"ANY","word_no":2,"extra":"foo"}"#)
            .unwrap();
        assert_eq!(back, Token::any("foo", 2));
    }
}
