//! Voice parser: token sequence to action tree
//!
//! One `VoiceParser` serves one voice session. It owns the session state and
//! parses utterances one at a time; each parse either returns an action tree
//! or fails without touching the session.

use super::chart::{Chart, ChartError, Derivation, DerivationChild};
use super::error::{GrammarError, GrammarResult};
use crate::config::compile_time::lexical::MAX_WORDS_PER_UTTERANCE;
use crate::config::compile_time::syntax::MAX_DERIVATION_DEPTH;
use crate::config::runtime::GrammarPreferences;
use crate::grammar::{grammar, Action, EntryPoint, Grammar, Production, ReductionContext, Rule, Value};
use crate::logging::{self, codes, LogEvent, Logger, UtteranceContext};
use crate::session::Session;
use crate::tokens::{Token, TokenStream};
use crate::{log_error, log_success, log_warning};
use serde::Serialize;
use std::sync::Arc;

/// An accepted utterance with parse diagnostics
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOutcome {
    pub action: Action,
    /// Points where the derivation had more than one choice
    pub ties: usize,
    /// Semantic actions run
    pub reductions: usize,
    pub chart_items: usize,
}

/// Counters over the lifetime of a parser
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParserStats {
    pub utterances: u64,
    pub accepted: u64,
    pub rejected: u64,
    /// Accepted while asleep and replaced by an empty action
    pub suppressed: u64,
    /// Accepted with at least one tie broken
    pub ambiguous: u64,
}

struct Evaluation {
    value: Value,
    ties: usize,
    reductions: usize,
    chart_items: usize,
}

pub struct VoiceParser {
    grammar: &'static Grammar,
    entry: EntryPoint,
    session: Session,
    preferences: GrammarPreferences,
    trace: Option<Arc<dyn Logger>>,
    stats: ParserStats,
}

impl VoiceParser {
    pub fn new() -> Self {
        Self::with_preferences(GrammarPreferences::default())
    }

    /// Parser whose entry point follows `discard_junk_prefix`
    pub fn with_preferences(preferences: GrammarPreferences) -> Self {
        Self {
            grammar: grammar(),
            entry: EntryPoint::from_discard_junk(preferences.discard_junk_prefix),
            session: Session::new(),
            preferences,
            trace: None,
            stats: ParserStats::default(),
        }
    }

    pub fn with_entry(mut self, entry: EntryPoint) -> Self {
        self.entry = entry;
        self
    }

    /// Resume an existing session
    pub fn with_session(mut self, session: Session) -> Self {
        self.session = session;
        self
    }

    /// Send a debug event for every reduction to `logger`
    pub fn with_trace_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.trace = Some(logger);
        self
    }

    pub fn entry(&self) -> EntryPoint {
        self.entry
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_sleeping(&self) -> bool {
        self.session.is_sleeping()
    }

    pub fn preferences(&self) -> &GrammarPreferences {
        &self.preferences
    }

    pub fn stats(&self) -> &ParserStats {
        &self.stats
    }

    /// Parse one utterance; `tokens` must end with `END`
    pub fn parse(&mut self, tokens: &[Token]) -> GrammarResult<Action> {
        self.parse_detailed(tokens).map(|outcome| outcome.action)
    }

    pub fn parse_stream(&mut self, stream: &TokenStream) -> GrammarResult<Action> {
        self.parse(stream.tokens())
    }

    /// Parse one utterance and report how the derivation was chosen
    pub fn parse_detailed(&mut self, tokens: &[Token]) -> GrammarResult<ParseOutcome> {
        self.stats.utterances += 1;
        let context = UtteranceContext::new(self.stats.utterances, self.entry.as_str());
        logging::with_utterance_context(context, || self.run_utterance(tokens))
    }

    /// Parse `tokens` as a single `rule`, without `END`
    ///
    /// Runs against a scratch copy of the session, so sleep phrases parsed
    /// this way have no lasting effect.
    pub fn parse_fragment(&self, rule: Rule, tokens: &[Token]) -> GrammarResult<Value> {
        let mut scratch = self.session.clone();
        self.derive_and_evaluate(rule, tokens, &mut scratch)
            .map(|evaluation| evaluation.value)
    }

    fn run_utterance(&mut self, tokens: &[Token]) -> GrammarResult<ParseOutcome> {
        let was_sleeping = self.session.is_sleeping();
        let mut session = self.session.clone();

        let result = self
            .derive_and_evaluate(self.entry.rule(), tokens, &mut session)
            .and_then(|evaluation| match evaluation.value {
                Value::Node(action) => Ok(ParseOutcome {
                    action,
                    ties: evaluation.ties,
                    reductions: evaluation.reductions,
                    chart_items: evaluation.chart_items,
                }),
                other => Err(GrammarError::internal(format!(
                    "entry production returned {} instead of an action",
                    other.kind_name()
                ))),
            });

        let outcome = match result {
            Ok(outcome) => outcome,
            Err(error) => {
                self.stats.rejected += 1;
                match error.word_no() {
                    Some(word_no) => log_error!(error.error_code(), "Utterance rejected",
                        word = word_no,
                        "error" => error
                    ),
                    None => log_error!(error.error_code(), "Utterance rejected",
                        "error" => error
                    ),
                }
                return Err(error);
            }
        };

        // Commit only once the whole utterance evaluated
        self.session = session;
        self.stats.accepted += 1;

        if was_sleeping && self.session.is_sleeping() {
            self.stats.suppressed += 1;
        }

        if outcome.ties > 0 {
            self.stats.ambiguous += 1;
            if self.preferences.warn_on_ambiguity {
                log_warning!(code = codes::warnings::AMBIGUOUS_DERIVATION,
                    "Ambiguous derivation resolved by tie-break",
                    "ties" => outcome.ties
                );
            }
        }

        log_success!(codes::success::AST_CONSTRUCTION_COMPLETE, "Utterance parsed",
            "kind" => outcome.action.kind_name(),
            "nodes" => outcome.action.node_count(),
            "sleeping" => self.session.is_sleeping()
        );

        Ok(outcome)
    }

    fn derive_and_evaluate(
        &self,
        start: Rule,
        tokens: &[Token],
        session: &mut Session,
    ) -> GrammarResult<Evaluation> {
        if tokens.is_empty() {
            return Err(GrammarError::EmptyTokenStream);
        }

        // Words plus the closing END
        let max = MAX_WORDS_PER_UTTERANCE + 1;
        if tokens.len() > max {
            return Err(GrammarError::UtteranceTooLong {
                count: tokens.len(),
                max,
            });
        }

        let chart = Chart::build(self.grammar, start, tokens)
            .map_err(|error| chart_error(error, tokens))?;
        let (derivation, ties) = chart.derive().map_err(|error| chart_error(error, tokens))?;

        self.trace_event(
            LogEvent::debug_with_code(codes::trace::CHART_SUMMARY, "Derivation chosen")
                .with_context("start", start.as_str())
                .with_context("items", &chart.item_count().to_string())
                .with_context("ties", &ties.to_string()),
        );

        let mut ctx = ReductionContext::new(session);
        let mut reductions = 0;
        let value = self.evaluate(&derivation, tokens, &mut ctx, &mut reductions)?;

        Ok(Evaluation {
            value,
            ties,
            reductions,
            chart_items: chart.item_count(),
        })
    }

    // Post-order: children left to right, then this node's action
    fn evaluate(
        &self,
        node: &Derivation,
        tokens: &[Token],
        ctx: &mut ReductionContext<'_>,
        reductions: &mut usize,
    ) -> GrammarResult<Value> {
        let mut args = Vec::with_capacity(node.children.len());
        for child in &node.children {
            match child {
                DerivationChild::Token(index) => {
                    let token = tokens.get(*index).cloned().ok_or_else(|| {
                        GrammarError::internal(format!("token index {} out of range", index))
                    })?;
                    args.push(Value::Token(token));
                }
                DerivationChild::Node(inner) => {
                    args.push(self.evaluate(inner, tokens, ctx, reductions)?);
                }
            }
        }

        let production = self.grammar.production(node.production);
        self.trace_reduction(production, node);
        *reductions += 1;

        (production.action)(ctx, args).map_err(GrammarError::internal)
    }

    fn trace_reduction(&self, production: &Production, node: &Derivation) {
        if self.trace.is_none() && !self.preferences.trace_reductions {
            return;
        }

        self.trace_event(
            LogEvent::debug_with_code(codes::trace::REDUCTION, &production.to_string())
                .with_word(node.start)
                .with_context("span", &format!("{}..{}", node.start, node.end)),
        );
    }

    fn trace_event(&self, event: LogEvent) {
        if let Some(trace) = &self.trace {
            trace.log(&event);
        }
        if self.preferences.trace_reductions {
            logging::log_prepared_event(event);
        }
    }
}

impl Default for VoiceParser {
    fn default() -> Self {
        Self::new()
    }
}

fn chart_error(error: ChartError, tokens: &[Token]) -> GrammarError {
    match error {
        ChartError::Rejected { position } => match tokens.get(position) {
            Some(token) => GrammarError::unexpected_token(token.clone()),
            None => GrammarError::internal(format!("rejected at missing position {}", position)),
        },
        ChartError::TooLarge { items } => {
            GrammarError::internal(format!("chart exceeded {} items", items))
        }
        ChartError::DepthExceeded { .. } => GrammarError::MaxDerivationDepth {
            max: MAX_DERIVATION_DEPTH,
        },
        ChartError::Inconsistent { rule, start, end } => GrammarError::internal(format!(
            "no derivation of {} over {}..{} despite acceptance",
            rule, start, end
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::{Direction, Modifier};
    use crate::logging::MemoryLogger;
    use crate::tokens::TokenStreamBuilder;
    use assert_matches::assert_matches;

    fn parser() -> VoiceParser {
        VoiceParser::with_preferences(GrammarPreferences {
            discard_junk_prefix: false,
            trace_reductions: false,
            warn_on_ambiguity: true,
        })
    }

    fn say(parser: &mut VoiceParser, words: &[&str]) -> GrammarResult<Action> {
        parser.parse_stream(&TokenStreamBuilder::new().words(words).build())
    }

    fn fragment(words: &[&str]) -> Vec<Token> {
        words
            .iter()
            .enumerate()
            .map(|(i, word)| Token::new(*word, i))
            .collect()
    }

    fn chain(actions: Vec<Action>) -> Action {
        Action::chain(actions)
    }

    fn number(parser: &mut VoiceParser, words: &[&str]) -> Action {
        let mut spoken = vec!["number"];
        spoken.extend_from_slice(words);
        say(parser, &spoken).unwrap()
    }

    #[test]
    fn test_number_composition() {
        let mut p = parser();

        assert_eq!(
            number(&mut p, &["two", "thousand", "five", "hundred"]),
            chain(vec![Action::sequence("2500")])
        );
        assert_eq!(
            number(&mut p, &["one", "million", "two", "hundred", "thousand", "three"]),
            chain(vec![Action::sequence("1200003")])
        );
        assert_eq!(
            number(&mut p, &["nine", "hundred"]),
            chain(vec![Action::sequence("900")])
        );
        assert_eq!(number(&mut p, &["to"]), chain(vec![Action::sequence("2")]));
        assert_eq!(
            number(&mut p, &["three", "hundred", "forty", "for"]),
            chain(vec![Action::sequence("344")])
        );
        assert_eq!(
            number(&mut p, &["seven", "billion", "three", "million"]),
            chain(vec![Action::sequence("7003000000")])
        );
        assert_eq!(
            number(
                &mut p,
                &["nine", "hundred", "ninety", "nine", "billion", "nine", "hundred", "ninety", "nine",
                  "million", "nine", "hundred", "ninety", "nine", "thousand", "nine", "hundred",
                  "ninety", "nine"]
            ),
            chain(vec![Action::sequence("999999999999")])
        );
    }

    #[test]
    fn test_number_fragments() {
        let p = parser();

        assert_eq!(
            p.parse_fragment(Rule::ThousandNumberSet, &fragment(&["two", "thousand", "five", "hundred"])),
            Ok(Value::Integer(2500))
        );
        assert_eq!(
            p.parse_fragment(Rule::NumberSet, &fragment(&["to"])),
            Ok(Value::Integer(2))
        );
        assert_eq!(
            p.parse_fragment(Rule::NumberSet, &fragment(&["twenty", "for"])),
            Ok(Value::Integer(24))
        );
        assert_matches!(
            p.parse_fragment(Rule::NumberSet, &fragment(&["ten", "five"])),
            Err(GrammarError::UnexpectedToken { word_no: 1, .. })
        );
    }

    #[test]
    fn test_chain_order_with_repeats() {
        let mut p = parser();
        assert_eq!(
            say(&mut p, &["up", "five", "down", "three"]).unwrap(),
            chain(vec![
                Action::repeat(5, Action::movement(Direction::Up)),
                Action::repeat(3, Action::movement(Direction::Down)),
            ])
        );
    }

    #[test]
    fn test_alias_resolved_by_context() {
        let mut p = parser();
        assert_eq!(
            say(&mut p, &["up", "to"]).unwrap(),
            chain(vec![Action::repeat(2, Action::movement(Direction::Up))])
        );
        assert_eq!(
            say(&mut p, &["phrase", "to"]).unwrap(),
            chain(vec![Action::word_sequence(vec![Action::null("to")])])
        );
    }

    #[test]
    fn test_letter_case() {
        let mut p = parser();
        assert_eq!(say(&mut p, &["bravo"]).unwrap(), chain(vec![Action::char('b')]));
        assert_eq!(say(&mut p, &["sky", "bravo"]).unwrap(), chain(vec![Action::char('B')]));
        assert_eq!(say(&mut p, &["sky", "expert"]).unwrap(), chain(vec![Action::char('X')]));
    }

    #[test]
    fn test_modifier_order() {
        let mut p = parser();
        assert_eq!(
            say(&mut p, &["control", "alt", "arch"]).unwrap(),
            chain(vec![Action::mod_plus_key(
                vec![Modifier::Control, Modifier::Alt],
                Action::char('a')
            )])
        );
    }

    #[test]
    fn test_characters_and_editing() {
        let mut p = parser();
        assert_eq!(
            say(&mut p, &["single", "quote", "left", "square", "dit"]).unwrap(),
            chain(vec![
                Action::raw_char("apostrophe"),
                Action::raw_char("leftsquare"),
                Action::raw_char("period"),
            ])
        );
        assert_eq!(
            say(&mut p, &["scratch", "three", "slap"]).unwrap(),
            chain(vec![
                Action::repeat(3, Action::raw_char("BackSpace")),
                Action::raw_char("Return"),
            ])
        );
    }

    #[test]
    fn test_free_text() {
        let mut p = parser();

        let stream = TokenStreamBuilder::new().word("word").any("Hello").build();
        assert_eq!(
            p.parse_stream(&stream).unwrap(),
            chain(vec![Action::sequence("Hello")])
        );

        let stream = TokenStreamBuilder::new()
            .word("variable")
            .any("fOO")
            .any("bar")
            .build();
        assert_eq!(
            p.parse_stream(&stream).unwrap(),
            chain(vec![Action::word_sequence(vec![
                Action::null("Foo"),
                Action::null("bar"),
            ])])
        );

        let stream = TokenStreamBuilder::new()
            .word("phrase")
            .any("hello")
            .word("two")
            .word("slap")
            .build();
        assert_eq!(
            p.parse_stream(&stream).unwrap(),
            chain(vec![
                Action::word_sequence(vec![Action::null("hello"), Action::null("two")]),
                Action::raw_char("Return"),
            ])
        );
    }

    #[test]
    fn test_sleep_gating_across_utterances() {
        let mut p = parser();

        assert_eq!(say(&mut p, &["go", "to", "sleep"]).unwrap(), Action::Empty);
        assert!(p.is_sleeping());

        assert_eq!(say(&mut p, &["up", "five"]).unwrap(), Action::Empty);
        assert_eq!(say(&mut p, &["go", "to", "sleep"]).unwrap(), Action::Empty);
        assert!(p.is_sleeping());

        assert_eq!(say(&mut p, &["start", "listening"]).unwrap(), Action::Empty);
        assert!(!p.is_sleeping());

        assert_eq!(
            say(&mut p, &["up"]).unwrap(),
            chain(vec![Action::movement(Direction::Up)])
        );
        assert_eq!(p.stats().suppressed, 2);
    }

    #[test]
    fn test_failed_parse_leaves_session_unchanged() {
        let mut p = parser();
        let stream = TokenStreamBuilder::new()
            .words(&["go", "to", "sleep"])
            .any("cat")
            .build();
        assert_matches!(
            p.parse_stream(&stream),
            Err(GrammarError::UnexpectedToken { word_no: 3, .. })
        );
        assert!(!p.is_sleeping());

        say(&mut p, &["go", "to", "sleep"]).unwrap();
        let stream = TokenStreamBuilder::new()
            .words(&["start", "listening"])
            .any("now")
            .build();
        assert!(p.parse_stream(&stream).is_err());
        assert!(p.is_sleeping());
    }

    #[test]
    fn test_error_reports_first_unreducible_word() {
        let mut p = parser();

        let stream = TokenStreamBuilder::new().word("up").any("cat").build();
        let error = p.parse_stream(&stream).unwrap_err();
        assert_eq!(error.word_no(), Some(1));
        assert_eq!(error.terminal(), Some("ANY"));
        assert_eq!(error.to_string(), "Unexpected token `ANY(cat)' (word number 1)");

        // Incomplete command: nothing consumes the closing END
        let error = say(&mut p, &["sky"]).unwrap_err();
        assert_eq!(error.word_no(), Some(1));
        assert_eq!(error.terminal(), Some("END"));

        assert_eq!(p.stats().rejected, 2);
    }

    #[test]
    fn test_empty_and_bare_end() {
        let mut p = parser();
        assert_eq!(p.parse(&[]), Err(GrammarError::EmptyTokenStream));
        assert_eq!(say(&mut p, &[]).unwrap(), Action::Empty);
    }

    #[test]
    fn test_utterance_too_long() {
        let mut p = parser();
        let mut words = vec!["up"; MAX_WORDS_PER_UTTERANCE + 1];
        words.push("down");
        assert_matches!(
            say(&mut p, &words),
            Err(GrammarError::UtteranceTooLong { .. })
        );
    }

    #[test]
    fn test_idempotent_parse() {
        let mut p = parser();
        let stream = TokenStreamBuilder::new()
            .words(&["control", "shift", "tango", "left", "twenty", "one"])
            .word("sentence")
            .any("hello")
            .build();

        let first = p.parse_stream(&stream).unwrap();
        let second = p.parse_stream(&stream).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_discard_junk_entry() {
        let mut p = parser().with_entry(EntryPoint::DiscardJunk);
        assert_eq!(p.entry(), EntryPoint::DiscardJunk);

        assert_eq!(
            say(&mut p, &["the", "a", "up"]).unwrap(),
            chain(vec![Action::movement(Direction::Up)])
        );
        assert_eq!(say(&mut p, &["and", "go", "to", "sleep"]).unwrap(), Action::Empty);
        assert!(p.is_sleeping());
        assert_eq!(say(&mut p, &["i", "start", "listening"]).unwrap(), Action::Empty);
        assert!(!p.is_sleeping());

        // Only a leading run is dropped
        assert_matches!(
            say(&mut p, &["up", "the"]),
            Err(GrammarError::UnexpectedToken { word_no: 1, .. })
        );
    }

    #[test]
    fn test_junk_words_rejected_by_default_entry() {
        let mut p = parser();
        assert_matches!(
            say(&mut p, &["the", "up"]),
            Err(GrammarError::UnexpectedToken { word_no: 0, .. })
        );
    }

    #[test]
    fn test_shipped_grammar_needs_no_tie_breaks() {
        let mut p = parser();
        let utterances: Vec<Vec<&str>> = vec![
            vec!["up", "five", "down", "three"],
            vec!["number", "one", "million", "two", "hundred", "thousand", "three"],
            vec!["number", "one", "hundred", "twenty", "three"],
            vec!["number", "four", "billion", "one", "thousand"],
            vec!["control", "alt", "sky", "arch"],
            vec!["left", "square", "left", "two"],
            vec!["phrase", "one", "two", "number", "three"],
            vec!["scratch", "to", "slap"],
            vec!["go", "to", "sleep"],
            vec!["start", "listening"],
        ];

        for words in utterances {
            let stream = TokenStreamBuilder::new().words(&words).build();
            let outcome = p.parse_detailed(stream.tokens()).unwrap();
            assert_eq!(outcome.ties, 0, "{:?}", words);
        }
        assert_eq!(p.stats().ambiguous, 0);
    }

    #[test]
    fn test_trace_hook_sees_every_reduction() {
        let memory = Arc::new(MemoryLogger::with_capacity(100));
        let mut p = parser().with_trace_logger(memory.clone());

        let stream = TokenStreamBuilder::new().word("up").build();
        let outcome = p.parse_detailed(stream.tokens()).unwrap();

        // repeat, movement, single_command, chained_commands, single_input
        let reductions = memory.get_events_with_code(codes::trace::REDUCTION);
        assert_eq!(outcome.reductions, 5);
        assert_eq!(reductions.len(), 5);
        assert_eq!(reductions[0].message, "repeat ::= <empty>");
        assert!(reductions[4].message.starts_with("single_input ::="));
        assert_eq!(
            memory.get_events_with_code(codes::trace::CHART_SUMMARY).len(),
            1
        );
    }

    #[test]
    fn test_stats_track_outcomes() {
        let mut p = parser();
        say(&mut p, &["up"]).unwrap();
        say(&mut p, &["hundred"]).unwrap_err();

        let stats = p.stats();
        assert_eq!(stats.utterances, 2);
        assert_eq!(stats.accepted, 1);
        assert_eq!(stats.rejected, 1);
    }
}
