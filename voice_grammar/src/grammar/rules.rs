//! Production table for the spoken command grammar
//!
//! The grammar is context-free and is built once per process. Productions are
//! generated from the vocabulary tables in [`crate::grammar::keywords`]; their
//! order matters, because when more than one alternative of a rule derives the
//! same span the earliest one wins.

use super::builders::{self, SemanticAction};
use super::keywords;
use crate::grammar::ast::nodes::{Direction, Modifier};
use crate::tokens::{ANY, END};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;
use std::sync::OnceLock;

/// Nonterminals of the grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rule {
    SingleInput,
    SingleInputDiscardJunk,
    JunkTokens,
    SleepCommands,
    ChainedCommands,
    SingleCommand,
    Movement,
    Repeat,
    NumberRule,
    NumberSet,
    Ones,
    FirstNumbers,
    Tens,
    Hundreds,
    ThousandNumberSet,
    MillionNumberSet,
    BillionNumberSet,
    SkyLetter,
    Letter,
    Character,
    Editing,
    Modifiers,
    English,
    WordSentence,
    WordVariable,
    WordPhrase,
    WordRepeat,
    RawWord,
}

impl Rule {
    pub const ALL: [Rule; 28] = [
        Rule::SingleInput,
        Rule::SingleInputDiscardJunk,
        Rule::JunkTokens,
        Rule::SleepCommands,
        Rule::ChainedCommands,
        Rule::SingleCommand,
        Rule::Movement,
        Rule::Repeat,
        Rule::NumberRule,
        Rule::NumberSet,
        Rule::Ones,
        Rule::FirstNumbers,
        Rule::Tens,
        Rule::Hundreds,
        Rule::ThousandNumberSet,
        Rule::MillionNumberSet,
        Rule::BillionNumberSet,
        Rule::SkyLetter,
        Rule::Letter,
        Rule::Character,
        Rule::Editing,
        Rule::Modifiers,
        Rule::English,
        Rule::WordSentence,
        Rule::WordVariable,
        Rule::WordPhrase,
        Rule::WordRepeat,
        Rule::RawWord,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SingleInput => "single_input",
            Self::SingleInputDiscardJunk => "single_input_discard_junk",
            Self::JunkTokens => "junk_tokens",
            Self::SleepCommands => "sleep_commands",
            Self::ChainedCommands => "chained_commands",
            Self::SingleCommand => "single_command",
            Self::Movement => "movement",
            Self::Repeat => "repeat",
            Self::NumberRule => "number_rule",
            Self::NumberSet => "number_set",
            Self::Ones => "_ones",
            Self::FirstNumbers => "_firstnumbers",
            Self::Tens => "_tens",
            Self::Hundreds => "_hundreds",
            Self::ThousandNumberSet => "thousand_number_set",
            Self::MillionNumberSet => "million_number_set",
            Self::BillionNumberSet => "billion_number_set",
            Self::SkyLetter => "sky_letter",
            Self::Letter => "letter",
            Self::Character => "character",
            Self::Editing => "editing",
            Self::Modifiers => "modifiers",
            Self::English => "english",
            Self::WordSentence => "word_sentence",
            Self::WordVariable => "word_variable",
            Self::WordPhrase => "word_phrase",
            Self::WordRepeat => "word_repeat",
            Self::RawWord => "raw_word",
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Start symbols an utterance can be parsed against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EntryPoint {
    /// The utterance must be exactly one input
    #[default]
    SingleInput,
    /// Leading filler words are accepted and dropped
    DiscardJunk,
}

impl EntryPoint {
    pub fn rule(&self) -> Rule {
        match self {
            Self::SingleInput => Rule::SingleInput,
            Self::DiscardJunk => Rule::SingleInputDiscardJunk,
        }
    }

    pub fn as_str(&self) -> &'static str {
        self.rule().as_str()
    }

    pub fn from_discard_junk(discard_junk: bool) -> Self {
        if discard_junk {
            Self::DiscardJunk
        } else {
            Self::SingleInput
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    /// Matched against a token's kind
    Terminal(&'static str),
    NonTerminal(Rule),
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Terminal(label) => f.write_str(label),
            Self::NonTerminal(rule) => f.write_str(rule.as_str()),
        }
    }
}

/// One alternative of a rule, with the action that evaluates it
#[derive(Clone)]
pub struct Production {
    pub id: usize,
    pub lhs: Rule,
    pub rhs: Vec<Symbol>,
    pub action: SemanticAction,
}

impl Production {
    pub fn len(&self) -> usize {
        self.rhs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rhs.is_empty()
    }
}

impl fmt::Debug for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Production#{}({})", self.id, self)
    }
}

impl fmt::Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ::=", self.lhs)?;
        if self.rhs.is_empty() {
            return write!(f, " <empty>");
        }
        for symbol in &self.rhs {
            write!(f, " {}", symbol)?;
        }
        Ok(())
    }
}

/// Defect found while checking the production table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrammarIssue {
    /// A right-hand side names a rule with no productions
    Undefined { production: usize, rule: Rule },
    /// A rule no entry point can reach
    Unreachable { rule: Rule },
}

impl fmt::Display for GrammarIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined { production, rule } => write!(
                f,
                "production #{} uses undefined nonterminal {}",
                production, rule
            ),
            Self::Unreachable { rule } => write!(f, "nonterminal {} is unreachable", rule),
        }
    }
}

/// The complete production table plus derived lookups
pub struct Grammar {
    productions: Vec<Production>,
    by_lhs: HashMap<Rule, Vec<usize>>,
    nullable: HashSet<Rule>,
    vocabulary: HashMap<Rule, BTreeSet<&'static str>>,
}

impl Grammar {
    fn from_productions(productions: Vec<Production>) -> Self {
        let mut by_lhs: HashMap<Rule, Vec<usize>> = HashMap::new();
        for production in &productions {
            by_lhs.entry(production.lhs).or_default().push(production.id);
        }

        let mut grammar = Self {
            productions,
            by_lhs,
            nullable: HashSet::new(),
            vocabulary: HashMap::new(),
        };
        grammar.nullable = grammar.compute_nullable();

        for entry in [EntryPoint::SingleInput, EntryPoint::DiscardJunk] {
            let words = grammar.reachable_terminals(entry.rule());
            grammar.vocabulary.insert(entry.rule(), words);
        }

        grammar
    }

    pub fn productions(&self) -> &[Production] {
        &self.productions
    }

    pub fn production(&self, id: usize) -> &Production {
        &self.productions[id]
    }

    /// Alternatives of a rule, in declaration order
    pub fn alternatives(&self, rule: Rule) -> &[usize] {
        self.by_lhs.get(&rule).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether the rule can derive the empty string
    pub fn is_nullable(&self, rule: Rule) -> bool {
        self.nullable.contains(&rule)
    }

    /// Words the tokenizer must label as themselves for an entry point
    ///
    /// Everything else becomes `ANY`. `END` and `ANY` are not words and are
    /// never in the set.
    pub fn vocabulary(&self, entry: EntryPoint) -> Option<&BTreeSet<&'static str>> {
        self.vocabulary.get(&entry.rule())
    }

    pub fn is_vocabulary_word(&self, entry: EntryPoint, word: &str) -> bool {
        self.vocabulary(entry)
            .map_or(false, |words| words.contains(word))
    }

    /// Check that every referenced rule is defined and every rule is reachable
    pub fn validate(&self) -> Result<(), Vec<GrammarIssue>> {
        let mut issues = Vec::new();

        for production in &self.productions {
            for symbol in &production.rhs {
                if let Symbol::NonTerminal(rule) = symbol {
                    if self.alternatives(*rule).is_empty() {
                        issues.push(GrammarIssue::Undefined {
                            production: production.id,
                            rule: *rule,
                        });
                    }
                }
            }
        }

        let mut reachable = self.reachable_rules(Rule::SingleInput);
        reachable.extend(self.reachable_rules(Rule::SingleInputDiscardJunk));
        for rule in Rule::ALL {
            if !reachable.contains(&rule) {
                issues.push(GrammarIssue::Unreachable { rule });
            }
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(issues)
        }
    }

    /// Human-readable listing of the whole table
    pub fn report(&self) -> String {
        let mut out = String::new();
        for rule in Rule::ALL {
            let nullable = if self.is_nullable(rule) { " (nullable)" } else { "" };
            out.push_str(&format!("{}{}\n", rule, nullable));
            for &id in self.alternatives(rule) {
                out.push_str(&format!("  {:>4}  {}\n", id, self.productions[id]));
            }
        }
        out
    }

    fn compute_nullable(&self) -> HashSet<Rule> {
        let mut nullable = HashSet::new();
        loop {
            let before = nullable.len();
            for production in &self.productions {
                if nullable.contains(&production.lhs) {
                    continue;
                }
                let all_nullable = production.rhs.iter().all(|symbol| match symbol {
                    Symbol::NonTerminal(rule) => nullable.contains(rule),
                    Symbol::Terminal(_) => false,
                });
                if all_nullable {
                    nullable.insert(production.lhs);
                }
            }
            if nullable.len() == before {
                return nullable;
            }
        }
    }

    fn reachable_rules(&self, start: Rule) -> HashSet<Rule> {
        let mut seen = HashSet::from([start]);
        let mut pending = vec![start];
        while let Some(rule) = pending.pop() {
            for &id in self.alternatives(rule) {
                for symbol in &self.productions[id].rhs {
                    if let Symbol::NonTerminal(next) = symbol {
                        if seen.insert(*next) {
                            pending.push(*next);
                        }
                    }
                }
            }
        }
        seen
    }

    fn reachable_terminals(&self, start: Rule) -> BTreeSet<&'static str> {
        let rules = self.reachable_rules(start);
        self.productions
            .iter()
            .filter(|production| rules.contains(&production.lhs))
            .flat_map(|production| production.rhs.iter())
            .filter_map(|symbol| match symbol {
                Symbol::Terminal(label) if *label != ANY && *label != END => Some(*label),
                _ => None,
            })
            .collect()
    }
}

/// The shared grammar, built on first use
pub fn grammar() -> &'static Grammar {
    static GRAMMAR: OnceLock<Grammar> = OnceLock::new();
    GRAMMAR.get_or_init(|| Grammar::from_productions(build_productions()))
}

struct TableBuilder {
    productions: Vec<Production>,
}

impl TableBuilder {
    fn add(&mut self, lhs: Rule, rhs: Vec<Symbol>, action: SemanticAction) {
        let id = self.productions.len();
        self.productions.push(Production {
            id,
            lhs,
            rhs,
            action,
        });
    }
}

fn t(label: &'static str) -> Symbol {
    Symbol::Terminal(label)
}

fn n(rule: Rule) -> Symbol {
    Symbol::NonTerminal(rule)
}

fn words(labels: &[&'static str]) -> Vec<Symbol> {
    labels.iter().map(|label| t(*label)).collect()
}

fn build_productions() -> Vec<Production> {
    use Rule::*;

    let mut g = TableBuilder {
        productions: Vec::new(),
    };

    // Entry points
    g.add(SingleInput, vec![t(END)], builders::build_single_input);
    g.add(SingleInput, vec![n(SleepCommands), t(END)], builders::build_single_input);
    g.add(SingleInput, vec![n(ChainedCommands), t(END)], builders::build_single_input);

    let discard = builders::build_single_input_discard_junk;
    g.add(SingleInputDiscardJunk, vec![t(END)], discard);
    g.add(
        SingleInputDiscardJunk,
        vec![n(JunkTokens), n(SleepCommands), t(END)],
        discard,
    );
    g.add(
        SingleInputDiscardJunk,
        vec![n(JunkTokens), n(ChainedCommands), t(END)],
        discard,
    );

    g.add(JunkTokens, vec![], builders::build_junk_tokens);
    for word in keywords::JUNK_WORDS {
        g.add(JunkTokens, vec![t(*word), n(JunkTokens)], builders::build_junk_tokens);
    }

    g.add(SleepCommands, words(keywords::GO_TO_SLEEP), builders::build_sleep_commands);
    g.add(SleepCommands, words(keywords::START_LISTENING), builders::build_sleep_commands);

    // Commands
    g.add(ChainedCommands, vec![n(SingleCommand)], builders::build_chained_commands);
    g.add(
        ChainedCommands,
        vec![n(SingleCommand), n(ChainedCommands)],
        builders::build_chained_commands,
    );

    for rule in [
        Letter,
        SkyLetter,
        NumberRule,
        Movement,
        Character,
        Editing,
        Modifiers,
        English,
        WordSentence,
        WordVariable,
        WordPhrase,
    ] {
        g.add(SingleCommand, vec![n(rule)], builders::build_single_command);
    }

    for direction in Direction::ALL {
        g.add(Movement, vec![t(direction.as_str()), n(Repeat)], builders::build_movement);
    }

    g.add(Repeat, vec![], builders::build_repeat);
    g.add(Repeat, vec![n(NumberSet)], builders::build_repeat);

    // Numbers
    for rule in [NumberSet, ThousandNumberSet, MillionNumberSet, BillionNumberSet] {
        g.add(NumberRule, vec![t(keywords::NUMBER), n(rule)], builders::build_number_rule);
    }

    for rhs in [
        vec![n(FirstNumbers)],
        vec![n(Tens)],
        vec![n(Tens), n(Ones)],
        vec![n(Hundreds)],
        vec![n(Hundreds), n(FirstNumbers)],
        vec![n(Hundreds), n(Tens)],
        vec![n(Hundreds), n(Tens), n(Ones)],
    ] {
        g.add(NumberSet, rhs, builders::build_number_set);
    }

    for word in keywords::ONES_WORDS {
        g.add(Ones, vec![t(*word)], builders::build_small_number);
    }
    for (word, _) in keywords::SMALL_NUMBERS {
        g.add(FirstNumbers, vec![t(*word)], builders::build_small_number);
    }
    for (word, _) in keywords::TENS {
        g.add(Tens, vec![t(*word)], builders::build_tens);
    }
    g.add(Hundreds, vec![n(Ones), t(keywords::HUNDRED)], builders::build_hundreds);

    let thousand = builders::build_thousand_number_set;
    g.add(ThousandNumberSet, vec![n(NumberSet), t(keywords::THOUSAND)], thousand);
    g.add(
        ThousandNumberSet,
        vec![n(NumberSet), t(keywords::THOUSAND), n(NumberSet)],
        thousand,
    );

    let million = builders::build_million_number_set;
    g.add(MillionNumberSet, vec![n(NumberSet), t(keywords::MILLION)], million);
    for tail in [NumberSet, ThousandNumberSet] {
        g.add(
            MillionNumberSet,
            vec![n(NumberSet), t(keywords::MILLION), n(tail)],
            million,
        );
    }

    let billion = builders::build_billion_number_set;
    g.add(BillionNumberSet, vec![n(NumberSet), t(keywords::BILLION)], billion);
    for tail in [NumberSet, ThousandNumberSet, MillionNumberSet] {
        g.add(
            BillionNumberSet,
            vec![n(NumberSet), t(keywords::BILLION), n(tail)],
            billion,
        );
    }

    // Keys
    g.add(SkyLetter, vec![t(keywords::SKY), n(Letter)], builders::build_sky_letter);
    for word in keywords::LETTER_WORDS {
        g.add(Letter, vec![t(*word)], builders::build_letter);
    }
    for (phrase, _) in keywords::CHARACTERS {
        g.add(Character, words(phrase), builders::build_character);
    }
    for (word, _) in keywords::EDITING {
        g.add(Editing, vec![t(*word), n(Repeat)], builders::build_editing);
    }
    for word in Modifier::WORDS {
        g.add(Modifiers, vec![t(word), n(SingleCommand)], builders::build_modifiers);
    }

    // Free text
    g.add(English, vec![t(keywords::WORD), t(ANY)], builders::build_english);
    g.add(
        WordSentence,
        vec![t(keywords::SENTENCE), n(WordRepeat)],
        builders::build_word_sentence,
    );
    g.add(
        WordVariable,
        vec![t(keywords::VARIABLE), n(WordRepeat)],
        builders::build_word_variable,
    );
    g.add(WordPhrase, vec![t(keywords::PHRASE), n(WordRepeat)], builders::build_word_phrase);
    g.add(WordRepeat, vec![n(RawWord)], builders::build_word_repeat);
    g.add(WordRepeat, vec![n(RawWord), n(WordRepeat)], builders::build_word_repeat);
    g.add(RawWord, vec![t(ANY)], builders::build_raw_word);
    for word in keywords::RAW_NUMBER_WORDS {
        g.add(RawWord, vec![t(*word)], builders::build_raw_word);
    }

    g.productions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grammar_validates() {
        assert_eq!(grammar().validate(), Ok(()));
    }

    #[test]
    fn test_production_ids_match_positions() {
        for (index, production) in grammar().productions().iter().enumerate() {
            assert_eq!(production.id, index);
        }
    }

    #[test]
    fn test_nullable_rules() {
        let g = grammar();
        assert!(g.is_nullable(Rule::Repeat));
        assert!(g.is_nullable(Rule::JunkTokens));
        assert!(!g.is_nullable(Rule::Movement));
        assert!(!g.is_nullable(Rule::SingleInput));
    }

    #[test]
    fn test_single_command_order() {
        let g = grammar();
        let order: Vec<String> = g
            .alternatives(Rule::SingleCommand)
            .iter()
            .map(|&id| g.production(id).rhs[0].to_string())
            .collect();

        assert_eq!(
            order,
            vec![
                "letter",
                "sky_letter",
                "number_rule",
                "movement",
                "character",
                "editing",
                "modifiers",
                "english",
                "word_sentence",
                "word_variable",
                "word_phrase",
            ]
        );
    }

    #[test]
    fn test_vocabulary_per_entry_point() {
        let g = grammar();
        assert!(g.is_vocabulary_word(EntryPoint::SingleInput, "up"));
        assert!(g.is_vocabulary_word(EntryPoint::SingleInput, "hundred"));
        assert!(g.is_vocabulary_word(EntryPoint::SingleInput, "quote"));
        assert!(!g.is_vocabulary_word(EntryPoint::SingleInput, "the"));
        assert!(!g.is_vocabulary_word(EntryPoint::SingleInput, END));
        assert!(!g.is_vocabulary_word(EntryPoint::SingleInput, ANY));

        assert!(g.is_vocabulary_word(EntryPoint::DiscardJunk, "the"));
        assert!(g.is_vocabulary_word(EntryPoint::DiscardJunk, "up"));
    }

    #[test]
    fn test_production_display() {
        let g = grammar();
        let hundreds = g.alternatives(Rule::Hundreds)[0];
        assert_eq!(g.production(hundreds).to_string(), "_hundreds ::= _ones hundred");

        let empty_repeat = g.alternatives(Rule::Repeat)[0];
        assert_eq!(g.production(empty_repeat).to_string(), "repeat ::= <empty>");
    }

    #[test]
    fn test_report_lists_every_rule() {
        let report = grammar().report();
        for rule in Rule::ALL {
            assert!(report.contains(rule.as_str()), "missing {}", rule);
        }
        assert!(report.contains("repeat (nullable)"));
    }

    #[test]
    fn test_entry_points() {
        assert_eq!(EntryPoint::default(), EntryPoint::SingleInput);
        assert_eq!(EntryPoint::from_discard_junk(true).rule(), Rule::SingleInputDiscardJunk);
        assert_eq!(EntryPoint::SingleInput.as_str(), "single_input");
    }
}
