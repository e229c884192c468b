//! Actions for single-key commands
//!
//! Movement, editing, letters and punctuation: each produces one leaf action,
//! optionally wrapped in a `Repeat` when a count was spoken after it.

use super::helpers::Args;
use super::{ReductionContext, Value};
use crate::grammar::ast::nodes::{Action, Direction};
use crate::grammar::keywords;

/// Wrap an action in `Repeat` when a count was spoken
pub fn with_repeat(action: Action, count: Option<u64>) -> Action {
    match count {
        Some(count) => Action::repeat(count, action),
        None => action,
    }
}

/// movement ::= (up | down | left | right) repeat
pub fn build_movement(_ctx: &mut ReductionContext<'_>, args: Vec<Value>) -> Result<Value, String> {
    let mut args = Args::new(args, "movement");
    let token = args.token()?;
    let direction = Direction::parse(&token.kind)
        .ok_or_else(|| format!("movement: `{}' is not a direction", token.kind))?;
    let count = args.optional_integer()?;

    Ok(Value::Node(with_repeat(Action::movement(direction), count)))
}

/// repeat ::= <empty> | number_set
pub fn build_repeat(_ctx: &mut ReductionContext<'_>, args: Vec<Value>) -> Result<Value, String> {
    let mut args = Args::new(args, "repeat");
    Ok(match args.optional_integer()? {
        Some(count) => Value::Integer(count),
        None => Value::Absent,
    })
}

/// editing ::= (slap | scratch) repeat
pub fn build_editing(_ctx: &mut ReductionContext<'_>, args: Vec<Value>) -> Result<Value, String> {
    let mut args = Args::new(args, "editing");
    let token = args.token()?;
    let key = keywords::editing_key(&token.kind)
        .ok_or_else(|| format!("editing: `{}' is not an editing word", token.kind))?;
    let count = args.optional_integer()?;

    Ok(Value::Node(with_repeat(Action::raw_char(key), count)))
}

/// letter ::= arch | bravo | ... | zulu
pub fn build_letter(_ctx: &mut ReductionContext<'_>, args: Vec<Value>) -> Result<Value, String> {
    let mut args = Args::new(args, "letter");
    let token = args.token()?;
    let value = keywords::letter_for(&token.kind)
        .ok_or_else(|| format!("letter: `{}' is not a letter codeword", token.kind))?;

    Ok(Value::Node(Action::char(value)))
}

/// sky_letter ::= sky letter
pub fn build_sky_letter(_ctx: &mut ReductionContext<'_>, args: Vec<Value>) -> Result<Value, String> {
    let mut args = Args::new(args, "sky_letter");
    args.skip()?;

    match args.node()? {
        Action::Char { value } => Ok(Value::Node(Action::char(value.to_ascii_uppercase()))),
        other => Err(format!(
            "sky_letter: expected char node, found {}",
            other.kind_name()
        )),
    }
}

/// character ::= act | colon | single quote | ...
///
/// Two-word names are keyed by their first word; the rest of the phrase is
/// only there to make the name unambiguous to the recogniser.
pub fn build_character(_ctx: &mut ReductionContext<'_>, args: Vec<Value>) -> Result<Value, String> {
    let mut args = Args::new(args, "character");
    let token = args.token()?;
    let key = keywords::character_key(&token.kind)
        .ok_or_else(|| format!("character: `{}' is not a character name", token.kind))?;

    Ok(Value::Node(Action::raw_char(key)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Session;
    use crate::tokens::Token;
    use assert_matches::assert_matches;

    fn token(word: &str) -> Value {
        Value::Token(Token::new(word, 0))
    }

    fn run(
        action: fn(&mut ReductionContext<'_>, Vec<Value>) -> Result<Value, String>,
        args: Vec<Value>,
    ) -> Result<Value, String> {
        let mut session = Session::new();
        let mut ctx = ReductionContext::new(&mut session);
        action(&mut ctx, args)
    }

    #[test]
    fn test_movement_without_count() {
        let value = run(build_movement, vec![token("left"), Value::Absent]).unwrap();
        assert_eq!(value, Value::Node(Action::movement(Direction::Left)));
    }

    #[test]
    fn test_movement_with_count() {
        let value = run(build_movement, vec![token("up"), Value::Integer(5)]).unwrap();
        assert_eq!(
            value,
            Value::Node(Action::repeat(5, Action::movement(Direction::Up)))
        );
    }

    #[test]
    fn test_repeat_passes_count_through() {
        assert_eq!(run(build_repeat, vec![]).unwrap(), Value::Absent);
        assert_eq!(
            run(build_repeat, vec![Value::Integer(3)]).unwrap(),
            Value::Integer(3)
        );
    }

    #[test]
    fn test_editing() {
        let value = run(build_editing, vec![token("scratch"), Value::Integer(2)]).unwrap();
        assert_eq!(
            value,
            Value::Node(Action::repeat(2, Action::raw_char("BackSpace")))
        );

        let value = run(build_editing, vec![token("slap"), Value::Absent]).unwrap();
        assert_eq!(value, Value::Node(Action::raw_char("Return")));
    }

    #[test]
    fn test_letters() {
        assert_eq!(
            run(build_letter, vec![token("expert")]).unwrap(),
            Value::Node(Action::char('x'))
        );
        assert_eq!(
            run(build_sky_letter, vec![token("sky"), Value::Node(Action::char('b'))]).unwrap(),
            Value::Node(Action::char('B'))
        );
    }

    #[test]
    fn test_character_uses_first_word() {
        let value = run(build_character, vec![token("double"), token("quote")]).unwrap();
        assert_eq!(value, Value::Node(Action::raw_char("quotedbl")));
    }

    #[test]
    fn test_wrong_shapes_are_reported() {
        assert_matches!(run(build_movement, vec![token("sideways")]), Err(m) if m.contains("direction"));
        assert_matches!(
            run(build_sky_letter, vec![token("sky"), Value::Node(Action::Empty)]),
            Err(m) if m.contains("expected char node")
        );
    }
}
