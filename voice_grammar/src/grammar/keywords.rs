//! Spoken vocabulary tables
//!
//! Every word the grammar recognises as a terminal, together with the value it
//! contributes. The production table in [`crate::grammar::rules`] is generated
//! from these tables, so adding a word here adds it to the grammar.

/// Number words zero through nineteen, plus the homophones "to" and "for"
pub const SMALL_NUMBERS: &[(&str, u64)] = &[
    ("zero", 0),
    ("one", 1),
    ("two", 2),
    ("three", 3),
    ("four", 4),
    ("five", 5),
    ("six", 6),
    ("seven", 7),
    ("eight", 8),
    ("nine", 9),
    ("ten", 10),
    ("eleven", 11),
    ("twelve", 12),
    ("thirteen", 13),
    ("fourteen", 14),
    ("fifteen", 15),
    ("sixteen", 16),
    ("seventeen", 17),
    ("eighteen", 18),
    ("nineteen", 19),
    ("to", 2),
    ("for", 4),
];

/// Words that may stand in the ones position (after a tens word or before "hundred")
pub const ONES_WORDS: &[&str] = &[
    "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "to", "for",
];

/// Tens words twenty through ninety
pub const TENS: &[(&str, u64)] = &[
    ("twenty", 20),
    ("thirty", 30),
    ("forty", 40),
    ("fifty", 50),
    ("sixty", 60),
    ("seventy", 70),
    ("eighty", 80),
    ("ninety", 90),
];

/// Number words a free-text word run accepts literally
pub const RAW_NUMBER_WORDS: &[&str] = &[
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "to", "for",
];

pub const HUNDRED: &str = "hundred";
pub const THOUSAND: &str = "thousand";
pub const MILLION: &str = "million";
pub const BILLION: &str = "billion";

/// Codewords that produce a single lowercase letter
///
/// The letter is the codeword's first character, except "expert" which means x.
pub const LETTER_WORDS: &[&str] = &[
    "arch", "bravo", "charlie", "delta", "eco", "echo", "ergo", "fox", "golf", "hotel", "india",
    "julia", "kilo", "line", "mike", "november", "oscar", "papa", "queen", "romeo", "sierra",
    "tango", "uniform", "victor", "whiskey", "whisky", "xray", "expert", "yankee", "zulu",
];

/// Spoken character names, as word sequences, and the key name each produces
pub const CHARACTERS: &[(&[&str], &str)] = &[
    (&["act"], "Escape"),
    (&["colon"], "colon"),
    (&["semicolon"], "semicolon"),
    (&["single", "quote"], "apostrophe"),
    (&["double", "quote"], "quotedbl"),
    (&["equal"], "equal"),
    (&["space"], "space"),
    (&["tab"], "Tab"),
    (&["bang"], "exclam"),
    (&["hash"], "numbersign"),
    (&["dollar"], "dollar"),
    (&["percent"], "percent"),
    (&["carrot"], "caret"),
    (&["ampersand"], "ampersand"),
    (&["star"], "asterisk"),
    (&["late"], "parenleft"),
    (&["len"], "parenleft"),
    (&["rate"], "parenright"),
    (&["lack"], "curlleft"),
    (&["left", "square"], "leftsquare"),
    (&["minus"], "minus"),
    (&["dash"], "minus"),
    (&["underscore"], "underscore"),
    (&["plus"], "plus"),
    (&["backslash"], "backslash"),
    (&["dot"], "period"),
    (&["dit"], "period"),
    (&["slash"], "slash"),
    (&["question"], "question"),
    (&["comma"], "comma"),
];

/// Editing words and the key name each produces
pub const EDITING: &[(&str, &str)] = &[("slap", "Return"), ("scratch", "BackSpace")];

/// Filler words the junk-tolerant entry point drops from the front of an utterance
pub const JUNK_WORDS: &[&str] = &["i", "the", "a", "and"];

/// Prefix introducing a spoken number
pub const NUMBER: &str = "number";

/// Prefix that upper-cases the following letter
pub const SKY: &str = "sky";

/// Free-text prefixes
pub const WORD: &str = "word";
pub const SENTENCE: &str = "sentence";
pub const VARIABLE: &str = "variable";
pub const PHRASE: &str = "phrase";

/// Sleep and wake phrases
pub const GO_TO_SLEEP: &[&str] = &["go", "to", "sleep"];
pub const START_LISTENING: &[&str] = &["start", "listening"];

/// Value of a number word in the 0-19 range
pub fn small_number_value(word: &str) -> Option<u64> {
    SMALL_NUMBERS
        .iter()
        .find(|(w, _)| *w == word)
        .map(|(_, value)| *value)
}

/// Value of a tens word
pub fn tens_value(word: &str) -> Option<u64> {
    TENS.iter().find(|(w, _)| *w == word).map(|(_, value)| *value)
}

/// Letter produced by a codeword
pub fn letter_for(word: &str) -> Option<char> {
    if !LETTER_WORDS.contains(&word) {
        return None;
    }

    if word == "expert" {
        return Some('x');
    }

    word.chars().next()
}

/// Key name produced by a character phrase, looked up by its first word
pub fn character_key(first_word: &str) -> Option<&'static str> {
    CHARACTERS
        .iter()
        .find(|(words, _)| words.first() == Some(&first_word))
        .map(|(_, key)| *key)
}

/// Key name produced by an editing word
pub fn editing_key(word: &str) -> Option<&'static str> {
    EDITING.iter().find(|(w, _)| *w == word).map(|(_, key)| *key)
}

pub fn is_junk_word(word: &str) -> bool {
    JUNK_WORDS.contains(&word)
}
