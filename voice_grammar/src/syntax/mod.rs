//! Syntax analysis module - token sequence to action tree
//!
//! `chart` recognises a token sequence against the production table and
//! reads back one derivation; `parser` evaluates that derivation's semantic
//! actions against a voice session.

pub mod chart;
mod error;
mod parser;

pub use error::{GrammarError, GrammarResult};
pub use parser::{ParseOutcome, ParserStats, VoiceParser};

use crate::grammar::Action;
use crate::tokens::TokenStream;
use crate::{log_debug, log_info};

/// Parse one utterance with a fresh, awake session
///
/// Convenience for callers that do not track sleep state across utterances.
pub fn parse_utterance(stream: &TokenStream) -> GrammarResult<Action> {
    log_debug!("Starting syntax analysis", "tokens" => stream.len());
    VoiceParser::new().parse_stream(stream)
}

/// Log a one-line summary of a parser's counters
pub fn log_parser_stats(parser: &VoiceParser) {
    let stats = parser.stats();
    log_info!("Parser statistics",
        "utterances" => stats.utterances,
        "accepted" => stats.accepted,
        "rejected" => stats.rejected,
        "suppressed" => stats.suppressed,
        "ambiguous" => stats.ambiguous
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::Direction;
    use crate::tokens::TokenStreamBuilder;

    #[test]
    fn test_parse_utterance_uses_awake_session() {
        let stream = TokenStreamBuilder::new().words(&["down"]).build();
        assert_eq!(
            parse_utterance(&stream).unwrap(),
            Action::chain(vec![Action::movement(Direction::Down)])
        );
    }

    #[test]
    fn test_log_parser_stats_without_global_logger() {
        let mut parser = VoiceParser::new();
        parser
            .parse_stream(&TokenStreamBuilder::new().words(&["slap"]).build())
            .unwrap();
        log_parser_stats(&parser);
        assert_eq!(parser.stats().accepted, 1);
    }
}
