//! Token system for spoken commands
//!
//! The recogniser upstream hands the grammar a flat sequence of tokens, one
//! per recognised word, terminated by an `END` marker.
//!
//! ## Key Components
//!
//! - **[`Token`]** - A terminal label, the zero-based word position and, for
//!   free-text words, the raw text
//! - **[`TokenStream`]** - An owned, `END`-terminated utterance
//! - **[`TokenStreamBuilder`]** - Convenience construction for callers and tests
//!
//! ## Terminal Labels
//!
//! A recognised vocabulary word is its own label (`up`, `sky`, `thousand`).
//! Any other word is labelled [`ANY`] and keeps its spelling in `extra`. The
//! utterance ends with a single [`END`] token.

pub mod token;
pub mod token_stream;

pub use token::{Token, ANY, END};
pub use token_stream::{TokenStream, TokenStreamBuilder, TokenStreamError};
