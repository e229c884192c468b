//! Word classification for recognised utterances
//!
//! A speech recogniser hands over plain text. Each whitespace-separated word
//! becomes one token: words in the grammar's vocabulary for the chosen entry
//! point are labelled with themselves, anything else becomes a free-text
//! `ANY` token carrying the word as spoken. `END` closes every utterance.

use crate::config::compile_time::lexical::*;
use crate::config::runtime::LexicalPreferences;
use crate::grammar::{grammar, EntryPoint};
use crate::logging::codes;
use crate::tokens::{Token, TokenStream};
use crate::{log_debug, log_error, log_success};

/// Lexical errors with compile-time limits
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexerError {
    #[error("Too many words: {count} (max {max})")]
    TooManyWords { count: usize, max: usize },

    #[error("Word too long: {length} characters at word {word_no} (max {max})")]
    WordTooLong {
        word_no: usize,
        length: usize,
        max: usize,
    },
}

impl LexerError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            LexerError::TooManyWords { .. } => codes::lexical::TOO_MANY_WORDS,
            LexerError::WordTooLong { .. } => codes::lexical::WORD_TOO_LONG,
        }
    }

    pub fn word_no(&self) -> Option<usize> {
        match self {
            LexerError::WordTooLong { word_no, .. } => Some(*word_no),
            LexerError::TooManyWords { .. } => None,
        }
    }
}

/// Running counts over every utterance an analyzer has scanned
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LexicalMetrics {
    pub utterances: usize,
    pub total_words: usize,
    pub vocabulary_words: usize,
    pub free_words: usize,
    pub longest_word: usize,
}

impl LexicalMetrics {
    pub(crate) fn record_token(&mut self, token: &Token, length: usize) {
        self.total_words += 1;
        self.longest_word = self.longest_word.max(length);

        if token.is_any() {
            self.free_words += 1;
        } else {
            self.vocabulary_words += 1;
        }
    }
}

pub struct LexicalAnalyzer {
    entry: EntryPoint,
    metrics: LexicalMetrics,
    preferences: LexicalPreferences,
}

impl LexicalAnalyzer {
    pub fn new(entry: EntryPoint) -> Self {
        Self::with_preferences(entry, LexicalPreferences::default())
    }

    pub fn with_preferences(entry: EntryPoint, preferences: LexicalPreferences) -> Self {
        Self {
            entry,
            metrics: LexicalMetrics::default(),
            preferences,
        }
    }

    pub fn entry(&self) -> EntryPoint {
        self.entry
    }

    /// Turn one recognised utterance into a token stream ending in `END`
    pub fn tokenize(&mut self, utterance: &str) -> Result<TokenStream, LexerError> {
        let words: Vec<&str> = utterance.split_whitespace().collect();

        if words.len() > MAX_WORDS_PER_UTTERANCE {
            let error = LexerError::TooManyWords {
                count: words.len(),
                max: MAX_WORDS_PER_UTTERANCE,
            };
            log_error!(error.error_code(), "Utterance exceeds word limit",
                "count" => words.len(),
                "max" => MAX_WORDS_PER_UTTERANCE
            );
            return Err(error);
        }

        let mut tokens = Vec::with_capacity(words.len() + 1);
        let mut free_words = 0;

        for (word_no, word) in words.iter().enumerate() {
            let length = word.chars().count();
            if length > MAX_WORD_LENGTH {
                let error = LexerError::WordTooLong {
                    word_no,
                    length,
                    max: MAX_WORD_LENGTH,
                };
                log_error!(error.error_code(), "Word exceeds length limit",
                    word = word_no,
                    "length" => length
                );
                return Err(error);
            }

            let token = self.classify(word, word_no);
            if token.is_any() {
                free_words += 1;
            }
            self.metrics.record_token(&token, length);
            tokens.push(token);
        }

        tokens.push(Token::end(words.len()));
        self.metrics.utterances += 1;

        if self.preferences.log_word_statistics {
            log_debug!("Word classification",
                "words" => words.len(),
                "free_words" => free_words,
                "entry" => self.entry.as_str()
            );
        }

        log_success!(codes::success::TOKENIZATION_COMPLETE, "Utterance tokenized",
            "words" => words.len()
        );

        Ok(TokenStream::new(tokens))
    }

    fn classify(&self, word: &str, word_no: usize) -> Token {
        let vocabulary = grammar();

        if vocabulary.is_vocabulary_word(self.entry, word) {
            return Token::new(word, word_no);
        }

        if self.preferences.lowercase_words {
            let lowered = word.to_lowercase();
            if vocabulary.is_vocabulary_word(self.entry, &lowered) {
                return Token::new(lowered, word_no);
            }
        }

        Token::any(word, word_no)
    }

    pub fn metrics(&self) -> &LexicalMetrics {
        &self.metrics
    }

    pub fn preferences(&self) -> &LexicalPreferences {
        &self.preferences
    }

    pub fn set_preferences(&mut self, preferences: LexicalPreferences) {
        self.preferences = preferences;
    }
}

impl Default for LexicalAnalyzer {
    fn default() -> Self {
        Self::new(EntryPoint::default())
    }
}
