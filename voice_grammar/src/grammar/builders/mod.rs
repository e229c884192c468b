//! Semantic actions for grammar productions
//!
//! Each production carries one [`SemanticAction`]. When a derivation is
//! evaluated, the action receives the values of the production's right-hand
//! side in order (terminals as [`Value::Token`], nonterminals as whatever their
//! own action returned) and produces the value of the left-hand side.

pub mod atomic;
pub mod blocks;
pub mod helpers;
pub mod numbers;

use crate::grammar::ast::nodes::Action;
use crate::session::Session;
use crate::tokens::Token;

pub use helpers::Args;

/// Mutable state visible to semantic actions during one evaluation
pub struct ReductionContext<'a> {
    pub session: &'a mut Session,
}

impl<'a> ReductionContext<'a> {
    pub fn new(session: &'a mut Session) -> Self {
        Self { session }
    }
}

/// Signature shared by every production's action
pub type SemanticAction = fn(&mut ReductionContext<'_>, Vec<Value>) -> Result<Value, String>;

/// Intermediate value flowing up a derivation
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A matched terminal, as produced by the tokenizer
    Token(Token),
    /// A partial number
    Integer(u64),
    /// A free-text word
    Word(String),
    /// A finished action subtree
    Node(Action),
    /// Result of an empty or discarded production
    Absent,
}

impl Value {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Token(_) => "token",
            Self::Integer(_) => "integer",
            Self::Word(_) => "word",
            Self::Node(_) => "node",
            Self::Absent => "absent",
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

// Re-export the actions the production table is built from
pub use atomic::{
    build_character, build_editing, build_letter, build_movement, build_repeat,
    build_sky_letter,
};
pub use blocks::{
    build_chained_commands, build_english, build_junk_tokens, build_modifiers, build_raw_word,
    build_single_command, build_single_input, build_single_input_discard_junk,
    build_sleep_commands, build_word_phrase, build_word_repeat, build_word_sentence,
    build_word_variable,
};
pub use numbers::{
    build_billion_number_set, build_hundreds, build_million_number_set, build_number_rule,
    build_number_set, build_small_number, build_tens, build_thousand_number_set,
};
