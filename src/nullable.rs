// Copyright (c) 2018 Fabian Schuiki

//! Nullable nonterminal computation.
//!
//! A nonterminal is nullable if it can derive the empty string. This is the
//! case if it has an empty production, or a production that consists entirely
//! of nullable nonterminals.

use bit_set::BitSet;
use grammar::{Grammar, NonterminalId, Symbol};

/// The nullable nonterminals of a grammar.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NullableSet(BitSet);

impl NullableSet {
    /// Compute the nullable nonterminals of a grammar.
    pub fn compute(grammar: &Grammar) -> NullableSet {
        let mut current = NullableSet(BitSet::with_capacity(grammar.nonterminal_id_bound()));
        let mut passes = 0;
        loop {
            passes += 1;
            let next = current.step(grammar);
            if next == current {
                break;
            }
            current = next;
        }
        debug!(
            "{} of {} nonterminals nullable after {} passes",
            current.0.len(),
            grammar.nonterminal_id_bound(),
            passes
        );
        current
    }

    /// Perform a single pass over all rules of the grammar.
    fn step(&self, grammar: &Grammar) -> NullableSet {
        let mut next = self.clone();
        for rule in grammar.rules() {
            if self.is_sequence_nullable(rule.symbols()) {
                next.0.insert(rule.name().as_usize());
            }
        }
        next
    }

    /// Check whether a nonterminal is nullable.
    pub fn is_nullable(&self, id: NonterminalId) -> bool {
        self.0.contains(id.as_usize())
    }

    /// Check whether a symbol is nullable. Terminals never are.
    pub fn is_symbol_nullable(&self, symbol: Symbol) -> bool {
        match symbol {
            Symbol::Terminal(_) => false,
            Symbol::Nonterminal(id) => self.is_nullable(id),
        }
    }

    /// Check whether a sequence of symbols is nullable.
    ///
    /// The empty sequence is trivially nullable.
    pub fn is_sequence_nullable(&self, symbols: &[Symbol]) -> bool {
        symbols.iter().all(|&s| self.is_symbol_nullable(s))
    }

    /// The nullable nonterminals.
    pub fn iter<'a>(&'a self) -> impl Iterator<Item = NonterminalId> + 'a {
        self.0.iter().map(NonterminalId::from_usize)
    }
}
