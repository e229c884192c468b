//! Actions for composite commands
//!
//! Chaining, modifier stacking, free text, and the utterance-level entry
//! productions. The entry productions are the only place the session is read;
//! the sleep phrases are the only place it is written.

use super::helpers::{capitalize, Args};
use super::{ReductionContext, Value};
use crate::grammar::ast::nodes::{Action, Modifier};
use crate::logging::codes;
use crate::{log_success, log_warning};

/// single_command ::= letter | sky_letter | number_rule | ... | word_phrase
pub fn build_single_command(
    _ctx: &mut ReductionContext<'_>,
    args: Vec<Value>,
) -> Result<Value, String> {
    let mut args = Args::new(args, "single_command");
    args.node().map(Value::Node)
}

/// chained_commands ::= single_command [chained_commands]
pub fn build_chained_commands(
    _ctx: &mut ReductionContext<'_>,
    args: Vec<Value>,
) -> Result<Value, String> {
    let mut args = Args::new(args, "chained_commands");
    let first = args.node()?;

    match args.optional_node()? {
        None => Ok(Value::Node(Action::chain(vec![first]))),
        Some(Action::Chain { mut actions }) => {
            actions.insert(0, first);
            Ok(Value::Node(Action::chain(actions)))
        }
        Some(other) => Err(format!(
            "chained_commands: expected chain node, found {}",
            other.kind_name()
        )),
    }
}

/// modifiers ::= (control | alt | alternative | super | shift | command) single_command
///
/// Nested modifiers collapse into one `ModPlusKey`, outermost word first.
pub fn build_modifiers(_ctx: &mut ReductionContext<'_>, args: Vec<Value>) -> Result<Value, String> {
    let mut args = Args::new(args, "modifiers");
    let token = args.token()?;
    let modifier = Modifier::parse(&token.kind)
        .ok_or_else(|| format!("modifiers: `{}' is not a modifier", token.kind))?;

    Ok(Value::Node(match args.node()? {
        Action::ModPlusKey {
            mut modifiers,
            action,
        } => {
            modifiers.insert(0, modifier);
            Action::ModPlusKey { modifiers, action }
        }
        other => Action::mod_plus_key(vec![modifier], other),
    }))
}

/// english ::= word ANY
pub fn build_english(_ctx: &mut ReductionContext<'_>, args: Vec<Value>) -> Result<Value, String> {
    let mut args = Args::new(args, "english");
    args.skip()?;
    let token = args.token()?;

    Ok(Value::Node(Action::sequence(token.text())))
}

/// word_sentence ::= sentence word_repeat
pub fn build_word_sentence(
    _ctx: &mut ReductionContext<'_>,
    args: Vec<Value>,
) -> Result<Value, String> {
    capitalized_words(Args::new(args, "word_sentence"))
}

/// word_variable ::= variable word_repeat
pub fn build_word_variable(
    _ctx: &mut ReductionContext<'_>,
    args: Vec<Value>,
) -> Result<Value, String> {
    capitalized_words(Args::new(args, "word_variable"))
}

fn capitalized_words(mut args: Args) -> Result<Value, String> {
    args.skip()?;
    let mut sequence = args.node()?;

    if let Action::WordSequence { words } = &mut sequence {
        if let Some(Action::Null { word }) = words.first_mut() {
            *word = capitalize(word);
        }
    }

    Ok(Value::Node(sequence))
}

/// word_phrase ::= phrase word_repeat
pub fn build_word_phrase(_ctx: &mut ReductionContext<'_>, args: Vec<Value>) -> Result<Value, String> {
    let mut args = Args::new(args, "word_phrase");
    args.skip()?;
    args.node().map(Value::Node)
}

/// word_repeat ::= raw_word [word_repeat]
pub fn build_word_repeat(_ctx: &mut ReductionContext<'_>, args: Vec<Value>) -> Result<Value, String> {
    let mut args = Args::new(args, "word_repeat");
    let word = Action::null(args.word()?);

    match args.optional_node()? {
        None => Ok(Value::Node(Action::word_sequence(vec![word]))),
        Some(Action::WordSequence { mut words }) => {
            words.insert(0, word);
            Ok(Value::Node(Action::word_sequence(words)))
        }
        Some(other) => Err(format!(
            "word_repeat: expected word_sequence node, found {}",
            other.kind_name()
        )),
    }
}

/// raw_word ::= ANY | zero | one | ... | nine | to | for
///
/// Number words are kept as spoken text, not converted.
pub fn build_raw_word(_ctx: &mut ReductionContext<'_>, args: Vec<Value>) -> Result<Value, String> {
    let mut args = Args::new(args, "raw_word");
    let token = args.token()?;
    Ok(Value::Word(token.text().to_string()))
}

/// sleep_commands ::= go to sleep | start listening
pub fn build_sleep_commands(
    ctx: &mut ReductionContext<'_>,
    args: Vec<Value>,
) -> Result<Value, String> {
    let mut args = Args::new(args, "sleep_commands");
    let mut last = None;
    while !args.is_exhausted() {
        last = Some(args.token()?);
    }

    match last.as_ref().map(|token| token.kind.as_str()) {
        Some("sleep") => {
            ctx.session.fall_asleep();
            log_success!(codes::success::SESSION_ASLEEP, "Going to sleep.");
        }
        Some(_) => {
            ctx.session.wake_up();
            log_success!(codes::success::SESSION_AWAKE, "Waking from sleep");
        }
        None => return Err("sleep_commands: no words".to_string()),
    }

    Ok(Value::Node(Action::Empty))
}

/// junk_tokens ::= <empty> | (i | the | a | and) junk_tokens
pub fn build_junk_tokens(_ctx: &mut ReductionContext<'_>, _args: Vec<Value>) -> Result<Value, String> {
    Ok(Value::Absent)
}

/// single_input ::= END | sleep_commands END | chained_commands END
pub fn build_single_input(ctx: &mut ReductionContext<'_>, args: Vec<Value>) -> Result<Value, String> {
    let mut args = Args::new(args, "single_input");
    match args.next_value()? {
        Value::Token(token) if token.is_end() => Ok(Value::Node(Action::Empty)),
        Value::Node(action) => gate_on_session(ctx, action),
        other => Err(format!(
            "single_input: unexpected {} argument",
            other.kind_name()
        )),
    }
}

/// single_input_discard_junk ::= END | junk_tokens (sleep_commands | chained_commands) END
pub fn build_single_input_discard_junk(
    ctx: &mut ReductionContext<'_>,
    args: Vec<Value>,
) -> Result<Value, String> {
    let mut args = Args::new(args, "single_input_discard_junk");
    match args.next_value()? {
        Value::Token(token) if token.is_end() => Ok(Value::Node(Action::Empty)),
        Value::Absent => gate_on_session(ctx, args.node()?),
        other => Err(format!(
            "single_input_discard_junk: unexpected {} argument",
            other.kind_name()
        )),
    }
}

// A sleeping session swallows everything except the wake phrase, which has
// already run by the time this is reached.
fn gate_on_session(ctx: &mut ReductionContext<'_>, action: Action) -> Result<Value, String> {
    if !ctx.session.is_sleeping() {
        return Ok(Value::Node(action));
    }

    if !action.is_empty() {
        log_warning!(code = codes::warnings::INPUT_WHILE_ASLEEP, "Input ignored while asleep",
            "kind" => action.kind_name()
        );
    }

    Ok(Value::Node(Action::Empty))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::ast::nodes::Direction;
    use crate::session::Session;
    use crate::tokens::Token;

    fn token(word: &str) -> Value {
        Value::Token(Token::new(word, 0))
    }

    fn node(action: Action) -> Value {
        Value::Node(action)
    }

    fn run_with(
        session: &mut Session,
        action: fn(&mut ReductionContext<'_>, Vec<Value>) -> Result<Value, String>,
        args: Vec<Value>,
    ) -> Result<Value, String> {
        let mut ctx = ReductionContext::new(session);
        action(&mut ctx, args)
    }

    fn run(
        action: fn(&mut ReductionContext<'_>, Vec<Value>) -> Result<Value, String>,
        args: Vec<Value>,
    ) -> Result<Value, String> {
        run_with(&mut Session::new(), action, args)
    }

    #[test]
    fn test_chain_prepends() {
        let tail = run(build_chained_commands, vec![node(Action::char('b'))]).unwrap();
        let chain = run(build_chained_commands, vec![node(Action::char('a')), tail]).unwrap();

        assert_eq!(
            chain,
            node(Action::chain(vec![Action::char('a'), Action::char('b')]))
        );
    }

    #[test]
    fn test_modifiers_stack_outermost_first() {
        let inner = run(build_modifiers, vec![token("alt"), node(Action::char('a'))]).unwrap();
        let outer = run(build_modifiers, vec![token("control"), inner]).unwrap();

        assert_eq!(
            outer,
            node(Action::mod_plus_key(
                vec![Modifier::Control, Modifier::Alt],
                Action::char('a')
            ))
        );
    }

    #[test]
    fn test_modifier_around_repeat_is_not_merged() {
        let repeated = Action::repeat(3, Action::movement(Direction::Down));
        let value = run(build_modifiers, vec![token("shift"), node(repeated.clone())]).unwrap();
        assert_eq!(value, node(Action::mod_plus_key(vec![Modifier::Shift], repeated)));
    }

    #[test]
    fn test_english_takes_raw_text() {
        let value = run(
            build_english,
            vec![token("word"), Value::Token(Token::any("Hello", 1))],
        )
        .unwrap();
        assert_eq!(value, node(Action::sequence("Hello")));
    }

    #[test]
    fn test_word_repeat_and_sentence() {
        let tail = run(build_word_repeat, vec![Value::Word("WORLD".to_string())]).unwrap();
        let words = run(
            build_word_repeat,
            vec![Value::Word("hELLO".to_string()), tail],
        )
        .unwrap();

        let sentence = run(build_word_sentence, vec![token("sentence"), words.clone()]).unwrap();
        assert_eq!(
            sentence,
            node(Action::word_sequence(vec![
                Action::null("Hello"),
                Action::null("WORLD"),
            ]))
        );

        let phrase = run(build_word_phrase, vec![token("phrase"), words.clone()]).unwrap();
        assert_eq!(phrase, words);
    }

    #[test]
    fn test_raw_word_keeps_number_words() {
        assert_eq!(
            run(build_raw_word, vec![token("to")]).unwrap(),
            Value::Word("to".to_string())
        );
        assert_eq!(
            run(build_raw_word, vec![Value::Token(Token::any("cat", 0))]).unwrap(),
            Value::Word("cat".to_string())
        );
    }

    #[test]
    fn test_sleep_and_wake() {
        let mut session = Session::new();

        let value = run_with(
            &mut session,
            build_sleep_commands,
            vec![token("go"), token("to"), token("sleep")],
        )
        .unwrap();
        assert_eq!(value, node(Action::Empty));
        assert!(session.is_sleeping());

        run_with(
            &mut session,
            build_sleep_commands,
            vec![token("start"), token("listening")],
        )
        .unwrap();
        assert!(!session.is_sleeping());
    }

    #[test]
    fn test_single_input_gates_on_sleep() {
        let mut session = Session::new();
        let command = node(Action::chain(vec![Action::char('a')]));

        let awake = run_with(
            &mut session,
            build_single_input,
            vec![command.clone(), token("END")],
        )
        .unwrap();
        assert_eq!(awake, command);

        session.fall_asleep();
        let asleep = run_with(
            &mut session,
            build_single_input,
            vec![command, token("END")],
        )
        .unwrap();
        assert_eq!(asleep, node(Action::Empty));
    }

    #[test]
    fn test_bare_end_is_empty() {
        assert_eq!(
            run(build_single_input, vec![token("END")]).unwrap(),
            node(Action::Empty)
        );
        assert_eq!(
            run(build_single_input_discard_junk, vec![token("END")]).unwrap(),
            node(Action::Empty)
        );
    }

    #[test]
    fn test_discard_junk_drops_prefix() {
        let command = node(Action::chain(vec![Action::movement(Direction::Up)]));
        let value = run(
            build_single_input_discard_junk,
            vec![Value::Absent, command.clone(), token("END")],
        )
        .unwrap();
        assert_eq!(value, command);
    }
}
