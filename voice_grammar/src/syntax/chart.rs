//! Earley recogniser and derivation extraction
//!
//! The chart holds one item set per position in the token sequence (n tokens
//! give n + 1 sets). An item `(production, dot, origin)` in set k says the
//! first `dot` symbols of the production derive tokens `origin..k`.
//!
//! Nullable rules are handled by advancing over them at prediction time, so a
//! single pass over each set is complete.
//!
//! After recognition, one derivation is read back out of the chart:
//! - among alternatives of a rule completing over the same span, the one
//!   declared first wins
//! - when a right-hand side can be split over its span in several ways,
//!   earlier symbols take as many tokens as possible
//!
//! Each point where more than one choice existed is counted as a tie.

use crate::config::compile_time::syntax::{MAX_CHART_ITEMS, MAX_DERIVATION_DEPTH};
use crate::grammar::rules::{Grammar, Rule, Symbol};
use crate::tokens::Token;
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct Item {
    production: usize,
    dot: usize,
    origin: usize,
}

impl Item {
    fn advance(self) -> Self {
        Self {
            dot: self.dot + 1,
            ..self
        }
    }
}

#[derive(Debug, Default, Clone)]
struct ItemSet {
    items: Vec<Item>,
    seen: HashSet<Item>,
}

impl ItemSet {
    fn insert(&mut self, item: Item) {
        if self.seen.insert(item) {
            self.items.push(item);
        }
    }

    fn contains(&self, item: &Item) -> bool {
        self.seen.contains(item)
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChartError {
    /// No derivation continues through the token at `position`
    Rejected { position: usize },
    TooLarge { items: usize },
    DepthExceeded { depth: usize },
    /// The chart says a span is derivable but no matching items were found
    Inconsistent { rule: Rule, start: usize, end: usize },
}

/// A node of the chosen derivation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Derivation {
    pub production: usize,
    pub start: usize,
    pub end: usize,
    pub children: Vec<DerivationChild>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DerivationChild {
    /// Index into the token sequence
    Token(usize),
    Node(Derivation),
}

impl Derivation {
    /// Number of nodes, this one included
    pub fn node_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(|child| match child {
                DerivationChild::Node(node) => node.node_count(),
                DerivationChild::Token(_) => 0,
            })
            .sum::<usize>()
    }
}

pub struct Chart<'g> {
    grammar: &'g Grammar,
    start: Rule,
    sets: Vec<ItemSet>,
    token_count: usize,
}

impl fmt::Debug for Chart<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chart")
            .field("start", &self.start)
            .field("token_count", &self.token_count)
            .field("items", &self.item_count())
            .finish()
    }
}

impl<'g> Chart<'g> {
    /// Run the recogniser over `tokens`
    ///
    /// On rejection the position is that of the first token no item could
    /// scan, or of the last token when every token scanned but the start rule
    /// never completed.
    pub fn build(grammar: &'g Grammar, start: Rule, tokens: &[Token]) -> Result<Self, ChartError> {
        let n = tokens.len();
        let mut sets = vec![ItemSet::default(); n + 1];
        let mut total = 0usize;

        for &production in grammar.alternatives(start) {
            sets[0].insert(Item {
                production,
                dot: 0,
                origin: 0,
            });
        }

        for k in 0..=n {
            let mut i = 0;
            while i < sets[k].items.len() {
                let item = sets[k].items[i];
                i += 1;

                let production = grammar.production(item.production);
                match production.rhs.get(item.dot) {
                    None => {
                        let lhs = Symbol::NonTerminal(production.lhs);
                        let waiting: Vec<Item> = sets[item.origin]
                            .items
                            .iter()
                            .filter(|w| grammar.production(w.production).rhs.get(w.dot) == Some(&lhs))
                            .map(|w| w.advance())
                            .collect();
                        for advanced in waiting {
                            sets[k].insert(advanced);
                        }
                    }
                    Some(Symbol::NonTerminal(rule)) => {
                        for &alternative in grammar.alternatives(*rule) {
                            sets[k].insert(Item {
                                production: alternative,
                                dot: 0,
                                origin: k,
                            });
                        }
                        if grammar.is_nullable(*rule) {
                            sets[k].insert(item.advance());
                        }
                    }
                    Some(Symbol::Terminal(label)) => {
                        if k < n && tokens[k].matches(label) {
                            sets[k + 1].insert(item.advance());
                        }
                    }
                }
            }

            total += sets[k].len();
            if total > MAX_CHART_ITEMS {
                return Err(ChartError::TooLarge { items: total });
            }

            if k < n && sets[k + 1].is_empty() {
                return Err(ChartError::Rejected { position: k });
            }
        }

        let chart = Self {
            grammar,
            start,
            sets,
            token_count: n,
        };

        if !chart.accepted() {
            return Err(ChartError::Rejected {
                position: n.saturating_sub(1),
            });
        }

        Ok(chart)
    }

    /// Whether the start rule derives the whole input
    pub fn accepted(&self) -> bool {
        !self.completed(self.start, 0, self.token_count).is_empty()
    }

    pub fn item_count(&self) -> usize {
        self.sets.iter().map(ItemSet::len).sum()
    }

    /// Read one derivation of the whole input out of the chart
    ///
    /// Returns the derivation and the number of ties broken along the way.
    pub fn derive(&self) -> Result<(Derivation, usize), ChartError> {
        let mut ties = 0;
        let root = self.build_node(self.start, 0, self.token_count, 0, &mut ties)?;
        Ok((root, ties))
    }

    // Alternatives of `rule` that complete over start..end, in declaration order
    fn completed(&self, rule: Rule, start: usize, end: usize) -> Vec<usize> {
        self.grammar
            .alternatives(rule)
            .iter()
            .copied()
            .filter(|&production| {
                self.sets[end].contains(&Item {
                    production,
                    dot: self.grammar.production(production).len(),
                    origin: start,
                })
            })
            .collect()
    }

    fn build_node(
        &self,
        rule: Rule,
        start: usize,
        end: usize,
        depth: usize,
        ties: &mut usize,
    ) -> Result<Derivation, ChartError> {
        if depth > MAX_DERIVATION_DEPTH {
            return Err(ChartError::DepthExceeded { depth });
        }

        let candidates = self.completed(rule, start, end);
        let production = *candidates
            .first()
            .ok_or(ChartError::Inconsistent { rule, start, end })?;
        if candidates.len() > 1 {
            *ties += 1;
        }

        let children = self.split(production, start, end, depth, ties)?;

        Ok(Derivation {
            production,
            start,
            end,
            children,
        })
    }

    // Assign each right-hand-side symbol its sub-span, last symbol first
    fn split(
        &self,
        production_id: usize,
        start: usize,
        end: usize,
        depth: usize,
        ties: &mut usize,
    ) -> Result<Vec<DerivationChild>, ChartError> {
        let production = self.grammar.production(production_id);
        let inconsistent = ChartError::Inconsistent {
            rule: production.lhs,
            start,
            end,
        };

        let mut children = Vec::with_capacity(production.len());
        let mut right = end;

        for (position, symbol) in production.rhs.iter().enumerate().rev() {
            match symbol {
                Symbol::Terminal(_) => {
                    right = right.checked_sub(1).ok_or_else(|| inconsistent.clone())?;
                    children.push(DerivationChild::Token(right));
                }
                Symbol::NonTerminal(rule) => {
                    let mut chosen = None;
                    let mut options = 0;
                    // Largest split point first: the last symbol takes the
                    // fewest tokens, so earlier symbols take the most
                    for left in (start..=right).rev() {
                        if !self.prefix_reaches(production_id, position, start, left) {
                            continue;
                        }
                        if self.completed(*rule, left, right).is_empty() {
                            continue;
                        }
                        options += 1;
                        if chosen.is_none() {
                            chosen = Some(left);
                        }
                    }

                    let left = chosen.ok_or_else(|| inconsistent.clone())?;
                    if options > 1 {
                        *ties += 1;
                    }

                    let child = self.build_node(*rule, left, right, depth + 1, ties)?;
                    children.push(DerivationChild::Node(child));
                    right = left;
                }
            }
        }

        if right != start {
            return Err(inconsistent);
        }

        children.reverse();
        Ok(children)
    }

    // Whether the first `dot` symbols of the production derive origin..k
    fn prefix_reaches(&self, production: usize, dot: usize, origin: usize, k: usize) -> bool {
        if dot == 0 {
            return k == origin;
        }
        self.sets[k].contains(&Item {
            production,
            dot,
            origin,
        })
    }
}
