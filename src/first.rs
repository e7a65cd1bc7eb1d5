// Copyright (c) 2018 Fabian Schuiki

//! First set computation.
//!
//! This module implements computation of the first sets for a grammar. The
//! first set of a rule states all terminals that can appear as its first
//! symbol. Since rules may contain other rules and epsilon productions, the
//! sets are computed as a fixpoint: starting from empty sets, every pass
//! derives a new set of first sets from the previous one until nothing
//! changes anymore.

use std::fmt;
use std::iter::repeat;
use std::ops::Index;

use bit_set::BitSet;
use grammar::{Grammar, NonterminalId, Symbol, TerminalId};
use lookahead::Lookahead;
use nullable::NullableSet;
use Pretty;

/// All first sets of a grammar.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FirstSets(Vec<FirstSet>);

/// The first set of a nonterminal or a sequence of symbols.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FirstSet {
    /// The first symbols.
    symbols: BitSet,
    /// Whether the empty string can be derived.
    has_epsilon: bool,
}

impl FirstSets {
    /// Compute the first sets of a grammar.
    pub fn compute(grammar: &Grammar, nullable: &NullableSet) -> FirstSets {
        let mut current = FirstSets::empty(grammar);
        let mut passes = 0;
        loop {
            passes += 1;
            let next = current.step(grammar, nullable);
            if next == current {
                break;
            }
            trace!("first sets after pass {}:\n{}", passes, next.pretty(grammar));
            current = next;
        }
        debug!("first sets converged after {} passes", passes);
        current
    }

    /// Create the initial empty first sets.
    pub fn empty(grammar: &Grammar) -> FirstSets {
        FirstSets(
            repeat(FirstSet::with_capacity(grammar.terminal_id_bound()))
                .take(grammar.nonterminal_id_bound())
                .collect(),
        )
    }

    /// Perform a single pass over all rules of the grammar.
    ///
    /// The returned sets are derived from `self` without modifying it. Every
    /// set in the result is a superset of the corresponding set in `self`.
    pub fn step(&self, grammar: &Grammar, nullable: &NullableSet) -> FirstSets {
        let mut next = self.clone();
        for rule in grammar.rules() {
            let fs = self.of_sequence(rule.symbols(), nullable);
            next.0[rule.name().as_usize()].union_with(&fs);
        }
        next
    }

    /// Get the first set of a nonterminal.
    pub fn get(&self, id: NonterminalId) -> &FirstSet {
        &self.0[id.as_usize()]
    }

    /// Compute the first set of a single symbol.
    pub fn of_symbol(&self, symbol: Symbol) -> FirstSet {
        match symbol {
            Symbol::Terminal(id) => {
                let mut fs = FirstSet::default();
                fs.symbols.insert(id.as_usize());
                fs
            }
            Symbol::Nonterminal(id) => self.get(id).clone(),
        }
    }

    /// Compute the first set of a sequence of symbols.
    ///
    /// Collects the first sets of the symbols from left to right, stopping at
    /// the first symbol that is not nullable. If all symbols are nullable, the
    /// result contains epsilon. This is trivially the case for the empty
    /// sequence.
    pub fn of_sequence(&self, symbols: &[Symbol], nullable: &NullableSet) -> FirstSet {
        let mut first = BitSet::new();
        let has_epsilon = collect_symbols(symbols, nullable, &mut |symbol| match symbol {
            Symbol::Terminal(id) => {
                first.insert(id.as_usize());
            }
            Symbol::Nonterminal(id) => {
                first.union_with(&self.get(id).symbols);
            }
        });
        FirstSet {
            symbols: first,
            has_epsilon: has_epsilon,
        }
    }

    /// Iterate over the nonterminals and their first sets.
    pub fn iter<'a>(&'a self) -> impl Iterator<Item = (NonterminalId, &'a FirstSet)> + 'a {
        self.0
            .iter()
            .enumerate()
            .map(|(i, fs)| (NonterminalId::from_usize(i), fs))
    }

    /// Get a pretty printer for these first sets.
    pub fn pretty<'a>(&'a self, grammar: &'a Grammar) -> Pretty<&'a Grammar, &'a Self> {
        Pretty::new(grammar, self)
    }
}

impl Index<NonterminalId> for FirstSets {
    type Output = FirstSet;

    fn index(&self, index: NonterminalId) -> &FirstSet {
        self.get(index)
    }
}

impl<'a> fmt::Display for Pretty<&'a Grammar, &'a FirstSets> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (id, fs) in self.item.iter() {
            if id.as_usize() > 0 {
                write!(f, "\n")?;
            }
            write!(f, "{}: {}", id.pretty(self.ctx), fs.pretty(self.ctx))?;
        }
        Ok(())
    }
}

impl FirstSet {
    fn with_capacity(num_term: usize) -> FirstSet {
        FirstSet {
            symbols: BitSet::with_capacity(num_term),
            has_epsilon: false,
        }
    }

    /// Add all members of another first set to this set.
    pub fn union_with(&mut self, other: &FirstSet) {
        self.symbols.union_with(&other.symbols);
        self.has_epsilon |= other.has_epsilon;
    }

    /// Check whether the empty string is in the set.
    pub fn has_epsilon(&self) -> bool {
        self.has_epsilon
    }

    /// Check whether a lookahead is in the set.
    pub fn contains(&self, lookahead: Lookahead) -> bool {
        match lookahead {
            Lookahead::Terminal(id) => self.symbols.contains(id.as_usize()),
            Lookahead::Epsilon => self.has_epsilon,
            Lookahead::End => false,
        }
    }

    /// The terminals in the set, without epsilon.
    pub fn terminals<'a>(&'a self) -> impl Iterator<Item = TerminalId> + 'a {
        self.symbols.iter().map(TerminalId::from_usize)
    }

    /// All members of the set. The terminals come first in ascending order,
    /// followed by epsilon if present.
    pub fn iter<'a>(&'a self) -> impl Iterator<Item = Lookahead> + 'a {
        let epsilon = if self.has_epsilon {
            Some(Lookahead::Epsilon)
        } else {
            None
        };
        self.terminals().map(Lookahead::Terminal).chain(epsilon)
    }

    /// Check whether every member of this set is also in `other`.
    pub fn is_subset(&self, other: &FirstSet) -> bool {
        (!self.has_epsilon || other.has_epsilon) && self.symbols.is_subset(&other.symbols)
    }

    /// The terminals in the set as a bit set.
    pub(crate) fn symbols(&self) -> &BitSet {
        &self.symbols
    }

    /// Get a pretty printer for this set.
    pub fn pretty<'a>(&'a self, grammar: &'a Grammar) -> Pretty<&'a Grammar, &'a Self> {
        Pretty::new(grammar, self)
    }
}

impl<'a> fmt::Display for Pretty<&'a Grammar, &'a FirstSet> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{{")?;
        for (index, lookahead) in self.item.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", lookahead.pretty(self.ctx))?;
        }
        write!(f, "}}")
    }
}

/// Call a closure on each possible first symbol.
///
/// Walks the sequence of symbols and calls `f` on every symbol that may appear
/// first, i.e. every symbol up to and including the first one that is not
/// nullable. Returns `true` if the entire sequence is nullable.
fn collect_symbols<F>(symbols: &[Symbol], nullable: &NullableSet, f: &mut F) -> bool
where
    F: FnMut(Symbol),
{
    for &symbol in symbols {
        f(symbol);
        if !nullable.is_symbol_nullable(symbol) {
            return false;
        }
    }
    true
}
