//! END-terminated token streams

use crate::tokens::token::{Token, END};
use std::fmt;

/// An owned utterance ready for parsing
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    /// Wrap tokens as given; call [`TokenStream::validate`] to check shape
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter()
    }

    /// Number of spoken words, not counting the END marker
    pub fn word_count(&self) -> usize {
        self.tokens.iter().filter(|t| !t.is_end()).count()
    }

    pub fn has_end(&self) -> bool {
        self.tokens.last().map(|t| t.is_end()).unwrap_or(false)
    }

    /// Check that the stream ends in exactly one END and word numbers ascend
    pub fn validate(&self) -> Result<(), TokenStreamError> {
        if self.tokens.is_empty() {
            return Err(TokenStreamError::Empty);
        }

        if !self.has_end() {
            return Err(TokenStreamError::MissingEnd);
        }

        let end_count = self.tokens.iter().filter(|t| t.is_end()).count();
        if end_count > 1 {
            return Err(TokenStreamError::MultipleEnd { count: end_count });
        }

        for pair in self.tokens.windows(2) {
            if pair[1].word_no <= pair[0].word_no {
                return Err(TokenStreamError::WordOrder {
                    word_no: pair[1].word_no,
                });
            }
        }

        Ok(())
    }
}

impl fmt::Display for TokenStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels: Vec<String> = self.tokens.iter().map(|t| t.to_string()).collect();
        write!(f, "{}", labels.join(" "))
    }
}

/// Shape problems in a hand-built token stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenStreamError {
    Empty,
    MissingEnd,
    MultipleEnd { count: usize },
    WordOrder { word_no: usize },
}

impl fmt::Display for TokenStreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenStreamError::Empty => write!(f, "Token stream is empty"),
            TokenStreamError::MissingEnd => write!(f, "Token stream does not end with {}", END),
            TokenStreamError::MultipleEnd { count } => {
                write!(f, "Token stream contains {} {} markers", count, END)
            }
            TokenStreamError::WordOrder { word_no } => {
                write!(f, "Word numbers out of order at word {}", word_no)
            }
        }
    }
}

impl std::error::Error for TokenStreamError {}

/// Builder that numbers words automatically
#[derive(Debug, Default)]
pub struct TokenStreamBuilder {
    tokens: Vec<Token>,
}

impl TokenStreamBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a vocabulary word
    pub fn word(mut self, kind: &str) -> Self {
        let word_no = self.tokens.len();
        self.tokens.push(Token::new(kind, word_no));
        self
    }

    /// Push several vocabulary words
    pub fn words(mut self, kinds: &[&str]) -> Self {
        for kind in kinds {
            self = self.word(kind);
        }
        self
    }

    /// Push a free-text word
    pub fn any(mut self, text: &str) -> Self {
        let word_no = self.tokens.len();
        self.tokens.push(Token::any(text, word_no));
        self
    }

    /// Finish the utterance, appending END
    pub fn build(mut self) -> TokenStream {
        let word_no = self.tokens.len();
        self.tokens.push(Token::end(word_no));
        TokenStream::new(self.tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_builder_numbers_words_and_appends_end() {
        let stream = TokenStreamBuilder::new()
            .words(&["word"])
            .any("hello")
            .build();

        assert_eq!(stream.len(), 3);
        assert_eq!(stream.word_count(), 2);
        assert!(stream.has_end());
        assert_eq!(stream.tokens()[1].word_no, 1);
        assert_eq!(stream.tokens()[2].word_no, 2);
        assert!(stream.validate().is_ok());
        assert_eq!(stream.to_string(), "word ANY(hello) END");
    }

    #[test]
    fn test_validation_failures() {
        assert_matches!(TokenStream::default().validate(), Err(TokenStreamError::Empty));

        let no_end = TokenStream::new(vec![Token::new("up", 0)]);
        assert_matches!(no_end.validate(), Err(TokenStreamError::MissingEnd));

        let two_ends = TokenStream::new(vec![Token::end(0), Token::end(1)]);
        assert_matches!(
            two_ends.validate(),
            Err(TokenStreamError::MultipleEnd { count: 2 })
        );

        let disordered = TokenStream::new(vec![Token::new("up", 1), Token::end(1)]);
        assert_matches!(
            disordered.validate(),
            Err(TokenStreamError::WordOrder { word_no: 1 })
        );
    }
}
