//! Event codes and their metadata
//!
//! Every code an event can carry is declared once in a stage module below and
//! described once in [`REGISTRY`].

use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// What a code means and what to do about it
#[derive(Debug, Clone)]
pub struct CodeInfo {
    pub code: Code,
    pub category: &'static str,
    pub severity: Severity,
    /// Another utterance can follow without restarting the session
    pub recoverable: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
}

/// Word classification
pub mod lexical {
    use super::Code;

    pub const TOO_MANY_WORDS: Code = Code::new("E020");
    pub const WORD_TOO_LONG: Code = Code::new("E021");
}

pub mod syntax {
    use super::Code;

    pub const EMPTY_TOKEN_STREAM: Code = Code::new("E041");
    pub const UTTERANCE_TOO_LONG: Code = Code::new("E042");
    pub const UNEXPECTED_TOKEN: Code = Code::new("E050");
    pub const INTERNAL_PARSER_ERROR: Code = Code::new("E086");
    pub const MAX_DERIVATION_DEPTH: Code = Code::new("E087");
}

/// Production table checks
pub mod grammar {
    use super::Code;

    pub const UNDEFINED_NONTERMINAL: Code = Code::new("E060");
    pub const UNREACHABLE_NONTERMINAL: Code = Code::new("E061");
}

pub mod warnings {
    use super::Code;

    pub const AMBIGUOUS_DERIVATION: Code = Code::new("W010");
    pub const INPUT_WHILE_ASLEEP: Code = Code::new("W011");
}

/// Reduction tracing
pub mod trace {
    use super::Code;

    pub const REDUCTION: Code = Code::new("D010");
    pub const CHART_SUMMARY: Code = Code::new("D011");
}

pub mod success {
    use super::Code;

    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I004");
    pub const TOKENIZATION_COMPLETE: Code = Code::new("I020");
    pub const AST_CONSTRUCTION_COMPLETE: Code = Code::new("I040");
    pub const GRAMMAR_VALIDATION_PASSED: Code = Code::new("I041");
    pub const SESSION_ASLEEP: Code = Code::new("I090");
    pub const SESSION_AWAKE: Code = Code::new("I091");
}

const fn entry(
    code: Code,
    category: &'static str,
    severity: Severity,
    recoverable: bool,
    description: &'static str,
    recommended_action: &'static str,
) -> CodeInfo {
    CodeInfo {
        code,
        category,
        severity,
        recoverable,
        description,
        recommended_action,
    }
}

use Severity::{Critical, High, Low, Medium};

pub static REGISTRY: &[CodeInfo] = &[
    entry(system::INTERNAL_ERROR, "System", Critical, false,
        "Critical internal system error",
        "File a bug report with the utterance that triggered it"),
    entry(system::INITIALIZATION_FAILURE, "System", Critical, false,
        "System initialization failure",
        "Check runtime configuration and environment variables"),
    entry(lexical::TOO_MANY_WORDS, "Lexical", Medium, true,
        "Utterance has more words than the configured limit",
        "Split the command into shorter utterances"),
    entry(lexical::WORD_TOO_LONG, "Lexical", Low, true,
        "Recognised word exceeds the maximum word length",
        "Check the recogniser output for run-together words"),
    entry(syntax::EMPTY_TOKEN_STREAM, "Syntax", Medium, true,
        "Token stream is empty",
        "Terminate every utterance with an END token"),
    entry(syntax::UTTERANCE_TOO_LONG, "Syntax", Medium, true,
        "Token stream exceeds the configured utterance length",
        "Split the command into shorter utterances"),
    entry(syntax::UNEXPECTED_TOKEN, "Syntax", Low, true,
        "Token does not fit any command at this position",
        "Repeat the utterance; the word number identifies the misheard word"),
    entry(syntax::INTERNAL_PARSER_ERROR, "Syntax", High, false,
        "Semantic action received a value of the wrong shape",
        "The production table and its actions disagree; file a bug report"),
    entry(syntax::MAX_DERIVATION_DEPTH, "Syntax", High, false,
        "Derivation depth limit exceeded",
        "Raise max_derivation_depth or shorten the utterance"),
    entry(grammar::UNDEFINED_NONTERMINAL, "Grammar", Critical, false,
        "Production references a nonterminal with no alternatives",
        "Add productions for the nonterminal or remove the reference"),
    entry(grammar::UNREACHABLE_NONTERMINAL, "Grammar", Low, true,
        "Nonterminal cannot be reached from any entry point",
        "Remove the dead productions or reference them from a command"),
    entry(warnings::AMBIGUOUS_DERIVATION, "Syntax", Low, true,
        "More than one derivation matched; the tie-break policy chose one",
        "Review the productions involved for overlapping alternatives"),
    entry(warnings::INPUT_WHILE_ASLEEP, "Session", Low, true,
        "Command recognised while the session is asleep and was discarded",
        "Say \"start listening\" to resume command execution"),
    entry(trace::REDUCTION, "Trace", Low, true,
        "Production reduced",
        "No action required"),
    entry(trace::CHART_SUMMARY, "Trace", Low, true,
        "Chart construction statistics",
        "No action required"),
    entry(success::SYSTEM_INITIALIZATION_COMPLETED, "System", Low, true,
        "System initialization completed",
        "Continue normal operation"),
    entry(success::TOKENIZATION_COMPLETE, "Lexical", Low, true,
        "Utterance classified into tokens",
        "Continue to parsing"),
    entry(success::AST_CONSTRUCTION_COMPLETE, "Syntax", Low, true,
        "Action tree constructed",
        "Hand the action to the executor"),
    entry(success::GRAMMAR_VALIDATION_PASSED, "Grammar", Low, true,
        "Production table validated",
        "Continue normal operation"),
    entry(success::SESSION_ASLEEP, "Session", Low, true,
        "Session went to sleep",
        "Say \"start listening\" to resume"),
    entry(success::SESSION_AWAKE, "Session", Low, true,
        "Session woke up",
        "Continue normal operation"),
];

fn index() -> &'static HashMap<&'static str, &'static CodeInfo> {
    static INDEX: OnceLock<HashMap<&'static str, &'static CodeInfo>> = OnceLock::new();
    INDEX.get_or_init(|| REGISTRY.iter().map(|info| (info.code.as_str(), info)).collect())
}

pub fn get_error_metadata(code: &str) -> Option<&'static CodeInfo> {
    index().get(code).copied()
}

/// Unregistered codes are treated as `Medium`
pub fn get_severity(code: &str) -> Severity {
    get_error_metadata(code).map_or(Severity::Medium, |info| info.severity)
}

pub fn is_recoverable(code: &str) -> bool {
    get_error_metadata(code).map_or(true, |info| info.recoverable)
}

pub fn get_description(code: &str) -> &'static str {
    get_error_metadata(code).map_or("Unknown error", |info| info.description)
}

pub fn get_action(code: &str) -> &'static str {
    get_error_metadata(code).map_or("No specific action available", |info| {
        info.recommended_action
    })
}

pub fn get_category(code: &str) -> &'static str {
    get_error_metadata(code).map_or("Unknown", |info| info.category)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_registry_codes_are_unique() {
        let codes: HashSet<&str> = REGISTRY.iter().map(|info| info.code.as_str()).collect();
        assert_eq!(codes.len(), REGISTRY.len());
    }

    #[test]
    fn test_declared_codes_are_registered() {
        for code in [
            syntax::UNEXPECTED_TOKEN,
            syntax::MAX_DERIVATION_DEPTH,
            warnings::INPUT_WHILE_ASLEEP,
            trace::CHART_SUMMARY,
            success::SESSION_AWAKE,
        ] {
            assert!(get_error_metadata(code.as_str()).is_some(), "missing {}", code);
        }
    }

    #[test]
    fn test_classification() {
        assert_eq!(get_severity("ERR001"), Severity::Critical);
        assert!(!is_recoverable("E086"));
        assert!(is_recoverable("E050"));
        assert_eq!(get_category("E050"), "Syntax");
        assert_eq!(get_category("I090"), "Session");
    }

    #[test]
    fn test_unknown_code_defaults() {
        assert_eq!(get_description("X999"), "Unknown error");
        assert_eq!(get_category("X999"), "Unknown");
        assert_eq!(get_severity("X999"), Severity::Medium);
        assert_eq!(get_action("X999"), "No specific action available");
    }
}
