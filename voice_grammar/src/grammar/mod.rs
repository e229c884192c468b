//! Grammar definitions for spoken commands
//!
//! `keywords` holds the vocabulary, `rules` the production table built from
//! it, `builders` the semantic action attached to each production, and `ast`
//! the action tree those actions produce.

pub mod ast;
pub mod builders;
pub mod keywords;
pub mod rules;

// Re-export AST types
pub use ast::nodes::{Action, Direction, Modifier};

// Re-export the production table
pub use rules::{grammar, EntryPoint, Grammar, GrammarIssue, Production, Rule, Symbol};

pub use builders::{ReductionContext, SemanticAction, Value};

use crate::logging::codes;
use crate::{log_error, log_success};

/// Check the production table and log the outcome
pub fn validate_grammar() -> Result<(), Vec<GrammarIssue>> {
    match grammar().validate() {
        Ok(()) => {
            log_success!(codes::success::GRAMMAR_VALIDATION_PASSED, "Grammar validated",
                "productions" => grammar().productions().len()
            );
            Ok(())
        }
        Err(issues) => {
            for issue in &issues {
                let code = match issue {
                    GrammarIssue::Undefined { .. } => codes::grammar::UNDEFINED_NONTERMINAL,
                    GrammarIssue::Unreachable { .. } => codes::grammar::UNREACHABLE_NONTERMINAL,
                };
                log_error!(code, &issue.to_string());
            }
            Err(issues)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shipped_grammar_is_valid() {
        assert!(validate_grammar().is_ok());
    }
}
