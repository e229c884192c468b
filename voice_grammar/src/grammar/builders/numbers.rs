//! Actions for spoken numbers
//!
//! Values are composed bottom-up: ones and tens add, "hundred" multiplies the
//! ones word before it, and each scale word multiplies everything to its left
//! before the remainder is added.

use super::helpers::{scale_and_add, Args};
use super::{ReductionContext, Value};
use crate::grammar::ast::nodes::Action;
use crate::grammar::keywords;

/// number_rule ::= number (number_set | thousand_number_set | million_number_set | billion_number_set)
pub fn build_number_rule(_ctx: &mut ReductionContext<'_>, args: Vec<Value>) -> Result<Value, String> {
    let mut args = Args::new(args, "number_rule");
    args.skip()?;
    let value = args.integer()?;

    Ok(Value::Node(Action::sequence(value.to_string())))
}

/// _ones and _firstnumbers: a single number word up to nineteen
pub fn build_small_number(_ctx: &mut ReductionContext<'_>, args: Vec<Value>) -> Result<Value, String> {
    let mut args = Args::new(args, "small_number");
    let token = args.token()?;
    keywords::small_number_value(&token.kind)
        .map(Value::Integer)
        .ok_or_else(|| format!("small_number: `{}' is not a number word", token.kind))
}

/// _tens ::= twenty | thirty | ... | ninety
pub fn build_tens(_ctx: &mut ReductionContext<'_>, args: Vec<Value>) -> Result<Value, String> {
    let mut args = Args::new(args, "tens");
    let token = args.token()?;
    keywords::tens_value(&token.kind)
        .map(Value::Integer)
        .ok_or_else(|| format!("tens: `{}' is not a tens word", token.kind))
}

/// _hundreds ::= _ones hundred
pub fn build_hundreds(_ctx: &mut ReductionContext<'_>, args: Vec<Value>) -> Result<Value, String> {
    let mut args = Args::new(args, "hundreds");
    let ones = args.integer()?;
    args.skip()?;

    Ok(Value::Integer(scale_and_add(ones, 100, 0)?))
}

/// number_set: the parts below one thousand, summed
pub fn build_number_set(_ctx: &mut ReductionContext<'_>, args: Vec<Value>) -> Result<Value, String> {
    let mut args = Args::new(args, "number_set");
    let mut total: u64 = 0;
    while !args.is_exhausted() {
        total = scale_and_add(total, 1, args.integer()?)?;
    }

    Ok(Value::Integer(total))
}

pub fn build_thousand_number_set(
    _ctx: &mut ReductionContext<'_>,
    args: Vec<Value>,
) -> Result<Value, String> {
    scaled(Args::new(args, "thousand_number_set"), 1_000)
}

pub fn build_million_number_set(
    _ctx: &mut ReductionContext<'_>,
    args: Vec<Value>,
) -> Result<Value, String> {
    scaled(Args::new(args, "million_number_set"), 1_000_000)
}

pub fn build_billion_number_set(
    _ctx: &mut ReductionContext<'_>,
    args: Vec<Value>,
) -> Result<Value, String> {
    scaled(Args::new(args, "billion_number_set"), 1_000_000_000)
}

// head SCALE [tail]
fn scaled(mut args: Args, multiplier: u64) -> Result<Value, String> {
    let head = args.integer()?;
    args.skip()?;
    let tail = args.optional_integer()?.unwrap_or(0);

    Ok(Value::Integer(scale_and_add(head, multiplier, tail)?))
}
