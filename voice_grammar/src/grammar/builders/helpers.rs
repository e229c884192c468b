//! Argument access for semantic actions
//!
//! Actions consume their right-hand-side values front to back. A value of the
//! wrong shape means the production table and the action disagree, which is
//! reported as an error string and surfaces as an internal parser error.

use super::Value;
use crate::grammar::ast::nodes::Action;
use crate::tokens::Token;

/// Cursor over the values handed to one semantic action
pub struct Args {
    values: std::vec::IntoIter<Value>,
    production: &'static str,
}

impl Args {
    pub fn new(values: Vec<Value>, production: &'static str) -> Self {
        Self {
            values: values.into_iter(),
            production,
        }
    }

    /// Values not yet consumed
    pub fn remaining(&self) -> usize {
        self.values.len()
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    pub fn next_value(&mut self) -> Result<Value, String> {
        self.values
            .next()
            .ok_or_else(|| format!("{}: missing argument", self.production))
    }

    /// Drop one value (a keyword terminal whose meaning is the production itself)
    pub fn skip(&mut self) -> Result<(), String> {
        self.next_value().map(|_| ())
    }

    pub fn token(&mut self) -> Result<Token, String> {
        match self.next_value()? {
            Value::Token(token) => Ok(token),
            other => Err(self.mismatch("token", &other)),
        }
    }

    pub fn integer(&mut self) -> Result<u64, String> {
        match self.next_value()? {
            Value::Integer(n) => Ok(n),
            other => Err(self.mismatch("integer", &other)),
        }
    }

    /// An integer that may be missing entirely or produced by an empty production
    pub fn optional_integer(&mut self) -> Result<Option<u64>, String> {
        match self.values.next() {
            None | Some(Value::Absent) => Ok(None),
            Some(Value::Integer(n)) => Ok(Some(n)),
            Some(other) => Err(self.mismatch("integer", &other)),
        }
    }

    pub fn word(&mut self) -> Result<String, String> {
        match self.next_value()? {
            Value::Word(word) => Ok(word),
            other => Err(self.mismatch("word", &other)),
        }
    }

    pub fn node(&mut self) -> Result<Action, String> {
        match self.next_value()? {
            Value::Node(action) => Ok(action),
            other => Err(self.mismatch("node", &other)),
        }
    }

    /// A node that may be missing (the short alternative of a recursive rule)
    pub fn optional_node(&mut self) -> Result<Option<Action>, String> {
        match self.values.next() {
            None | Some(Value::Absent) => Ok(None),
            Some(Value::Node(action)) => Ok(Some(action)),
            Some(other) => Err(self.mismatch("node", &other)),
        }
    }

    fn mismatch(&self, expected: &str, found: &Value) -> String {
        format!(
            "{}: expected {} argument, found {}",
            self.production,
            expected,
            found.kind_name()
        )
    }
}

/// Multiply then add, refusing to wrap
pub fn scale_and_add(head: u64, multiplier: u64, tail: u64) -> Result<u64, String> {
    head.checked_mul(multiplier)
        .and_then(|scaled| scaled.checked_add(tail))
        .ok_or_else(|| format!("number overflow: {} * {} + {}", head, multiplier, tail))
}

/// First character upper-cased, the rest lower-cased
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
