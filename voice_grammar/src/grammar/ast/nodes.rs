//! Action tree node definitions
//!
//! The grammar turns one utterance into one [`Action`]. The executor walks the
//! tree and replays it as key presses and text entry.
//!
//! Shape invariants:
//! - `Chain` holds at least one action, in spoken order
//! - `Repeat` always carries a count; an unspoken count means no `Repeat` node
//! - `ModPlusKey` modifiers are in spoken order, outermost first
//! - `WordSequence` children are all `Null` word leaves

use serde::{Deserialize, Serialize};
use std::fmt;

/// Cursor movement directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Parse a spoken direction word (exact match)
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "up" => Some(Self::Up),
            "down" => Some(Self::Down),
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

/// Modifier keys that can be held around another action
///
/// Serialised by the executor's key name (`ctrl`, `Super_L`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Modifier {
    #[serde(rename = "ctrl")]
    Control,
    #[serde(rename = "alt")]
    Alt,
    #[serde(rename = "Super_L")]
    Super,
    #[serde(rename = "Shift_L")]
    Shift,
    #[serde(rename = "cmd")]
    Command,
}

impl Modifier {
    /// Spoken words that name a modifier
    pub const WORDS: [&'static str; 6] =
        ["control", "alt", "alternative", "super", "shift", "command"];

    /// Parse a spoken modifier word ("alternative" is a synonym of "alt")
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "control" => Some(Self::Control),
            "alt" | "alternative" => Some(Self::Alt),
            "super" => Some(Self::Super),
            "shift" => Some(Self::Shift),
            "command" => Some(Self::Command),
            _ => None,
        }
    }

    /// Canonical key name handed to the executor
    pub fn key_name(&self) -> &'static str {
        match self {
            Self::Control => "ctrl",
            Self::Alt => "alt",
            Self::Super => "Super_L",
            Self::Shift => "Shift_L",
            Self::Command => "cmd",
        }
    }
}

/// One node of an action tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Action {
    /// Commands spoken in one utterance, executed in order
    Chain { actions: Vec<Action> },
    /// Move the cursor one step
    Movement { direction: Direction },
    /// Perform the inner action `count` times
    Repeat { count: u64, action: Box<Action> },
    /// Type a single character
    Char { value: char },
    /// Press a key by canonical key name
    RawChar { key: String },
    /// Hold modifiers while performing the inner action
    ModPlusKey {
        modifiers: Vec<Modifier>,
        action: Box<Action>,
    },
    /// Type literal text (a spoken word or a composed number)
    Sequence { text: String },
    /// Type words joined by the executor's formatting rules
    WordSequence { words: Vec<Action> },
    /// A single word leaf inside a word sequence
    Null { word: String },
    /// Nothing to execute
    Empty,
}

impl Action {
    pub fn chain(actions: Vec<Action>) -> Self {
        Self::Chain { actions }
    }

    pub fn movement(direction: Direction) -> Self {
        Self::Movement { direction }
    }

    pub fn repeat(count: u64, action: Action) -> Self {
        Self::Repeat {
            count,
            action: Box::new(action),
        }
    }

    pub fn char(value: char) -> Self {
        Self::Char { value }
    }

    pub fn raw_char(key: impl Into<String>) -> Self {
        Self::RawChar { key: key.into() }
    }

    pub fn mod_plus_key(modifiers: Vec<Modifier>, action: Action) -> Self {
        Self::ModPlusKey {
            modifiers,
            action: Box::new(action),
        }
    }

    pub fn sequence(text: impl Into<String>) -> Self {
        Self::Sequence { text: text.into() }
    }

    pub fn word_sequence(words: Vec<Action>) -> Self {
        Self::WordSequence { words }
    }

    pub fn null(word: impl Into<String>) -> Self {
        Self::Null { word: word.into() }
    }

    /// Node kind as the executor names it
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Chain { .. } => "chain",
            Self::Movement { .. } => "movement",
            Self::Repeat { .. } => "repeat",
            Self::Char { .. } => "char",
            Self::RawChar { .. } => "raw_char",
            Self::ModPlusKey { .. } => "mod_plus_key",
            Self::Sequence { .. } => "sequence",
            Self::WordSequence { .. } => "word_sequence",
            Self::Null { .. } => "null",
            Self::Empty => "empty",
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Direct children in execution order
    pub fn children(&self) -> Vec<&Action> {
        match self {
            Self::Chain { actions } => actions.iter().collect(),
            Self::WordSequence { words } => words.iter().collect(),
            Self::Repeat { action, .. } | Self::ModPlusKey { action, .. } => vec![action.as_ref()],
            _ => Vec::new(),
        }
    }

    /// Total number of nodes in the tree, this one included
    pub fn node_count(&self) -> usize {
        1 + self
            .children()
            .into_iter()
            .map(Action::node_count)
            .sum::<usize>()
    }

    /// Serialize for the executor
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Chain { actions } => {
                write!(f, "chain(")?;
                write_list(f, actions)?;
                write!(f, ")")
            }
            Self::Movement { direction } => write!(f, "movement[{}]", direction.as_str()),
            Self::Repeat { count, action } => write!(f, "repeat[{}]({})", count, action),
            Self::Char { value } => write!(f, "char[{}]", value),
            Self::RawChar { key } => write!(f, "raw_char[{}]", key),
            Self::ModPlusKey { modifiers, action } => {
                let names: Vec<&str> = modifiers.iter().map(Modifier::key_name).collect();
                write!(f, "mod_plus_key[{}]({})", names.join(","), action)
            }
            Self::Sequence { text } => write!(f, "sequence[{}]", text),
            Self::WordSequence { words } => {
                write!(f, "word_sequence(")?;
                write_list(f, words)?;
                write!(f, ")")
            }
            Self::Null { word } => write!(f, "null[{}]", word),
            Self::Empty => write!(f, "empty"),
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, actions: &[Action]) -> fmt::Result {
    for (i, action) in actions.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", action)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_parse() {
        for direction in Direction::ALL {
            assert_eq!(Direction::parse(direction.as_str()), Some(direction));
        }
        assert_eq!(Direction::parse("Up"), None);
    }

    #[test]
    fn test_modifier_words() {
        assert_eq!(Modifier::parse("alternative"), Some(Modifier::Alt));
        assert_eq!(Modifier::parse("control").map(|m| m.key_name()), Some("ctrl"));
        assert_eq!(Modifier::parse("super").map(|m| m.key_name()), Some("Super_L"));
        assert_eq!(Modifier::parse("shift").map(|m| m.key_name()), Some("Shift_L"));
        assert_eq!(Modifier::parse("command").map(|m| m.key_name()), Some("cmd"));
        for word in Modifier::WORDS {
            assert!(Modifier::parse(word).is_some());
        }
    }

    #[test]
    fn test_display() {
        let action = Action::chain(vec![
            Action::repeat(5, Action::movement(Direction::Up)),
            Action::mod_plus_key(vec![Modifier::Control, Modifier::Alt], Action::char('a')),
        ]);
        assert_eq!(
            action.to_string(),
            "chain(repeat[5](movement[up]), mod_plus_key[ctrl,alt](char[a]))"
        );
    }

    #[test]
    fn test_kind_names_and_counts() {
        let words = Action::word_sequence(vec![Action::null("Hello"), Action::null("world")]);
        assert_eq!(words.kind_name(), "word_sequence");
        assert_eq!(words.node_count(), 3);
        assert_eq!(Action::Empty.kind_name(), "empty");
        assert!(Action::Empty.is_empty());
    }

    #[test]
    fn test_json_shape() {
        let json = Action::repeat(3, Action::raw_char("BackSpace"))
            .to_json()
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["kind"], "repeat");
        assert_eq!(value["count"], 3);
        assert_eq!(value["action"]["kind"], "raw_char");
        assert_eq!(value["action"]["key"], "BackSpace");

        let chord = Action::mod_plus_key(
            vec![Modifier::Control, Modifier::Super, Modifier::Shift],
            Action::char('a'),
        );
        let value: serde_json::Value = serde_json::from_str(&chord.to_json().unwrap()).unwrap();
        assert_eq!(value["kind"], "mod_plus_key");
        assert_eq!(
            value["modifiers"],
            serde_json::json!(["ctrl", "Super_L", "Shift_L"])
        );

        let back: Action = serde_json::from_str(&chord.to_json().unwrap()).unwrap();
        assert_eq!(back, chord);

        let empty: serde_json::Value =
            serde_json::from_str(&Action::Empty.to_json().unwrap()).unwrap();
        assert_eq!(empty["kind"], Action::Empty.kind_name());
    }
}
