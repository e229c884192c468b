//! Spoken command grammar
//!
//! Turns the words of one recognised utterance into an `Action` tree for a
//! keyboard executor, tracking the session's sleep state across utterances.

// Internal modules
#[macro_use]
pub mod logging;
pub mod config;
pub mod grammar;
pub mod lexical;
pub mod pipeline;
pub mod session;
pub mod syntax;
pub mod tokens;

// Re-export key types for library consumers
pub use grammar::{Action, Direction, EntryPoint, Modifier};
pub use pipeline::{process_utterance, PipelineError, PipelineResult, VoicePipeline};
pub use session::{Session, SleepState};
pub use syntax::{GrammarError, ParseOutcome, VoiceParser};
pub use tokens::{Token, TokenStream, TokenStreamBuilder};

// Re-export pipeline output for executor consumers
pub use pipeline::output::PipelineOutput;
