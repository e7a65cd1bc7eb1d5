// Copyright (c) 2018 Fabian Schuiki

//! Follow set computation.
//!
//! The follow set of a nonterminal contains all terminals that may appear
//! immediately after it in some derivation from the start symbol, plus the end
//! of input if the nonterminal can appear at the very end. Follow sets of
//! different nonterminals depend on each other, so like the first sets they
//! are computed as a fixpoint over whole passes.

use std::fmt;
use std::iter::repeat;
use std::ops::Index;

use first::FirstSets;
use grammar::{Grammar, NonterminalId, Symbol};
use lookahead::LookaheadSet;
use nullable::NullableSet;
use Pretty;

/// All follow sets of a grammar.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FollowSets(Vec<LookaheadSet>);

impl FollowSets {
    /// Compute the follow sets of a grammar.
    pub fn compute(grammar: &Grammar, first: &FirstSets, nullable: &NullableSet) -> FollowSets {
        let mut current = FollowSets::seed(grammar);
        let mut passes = 0;
        loop {
            passes += 1;
            let next = current.step(grammar, first, nullable);
            if next == current {
                break;
            }
            trace!("follow sets after pass {}:\n{}", passes, next.pretty(grammar));
            current = next;
        }
        debug!("follow sets converged after {} passes", passes);
        current
    }

    /// Create the initial follow sets.
    ///
    /// All sets are empty, except for the start symbol's, which contains the
    /// end of input.
    pub fn seed(grammar: &Grammar) -> FollowSets {
        let mut sets: Vec<_> = repeat(LookaheadSet::with_capacity(grammar.terminal_id_bound()))
            .take(grammar.nonterminal_id_bound())
            .collect();
        sets[grammar.start().as_usize()].insert_end();
        FollowSets(sets)
    }

    /// Perform a single pass over all rules of the grammar.
    ///
    /// For every nonterminal in a rule, the first set of the symbols after it
    /// is added to its follow set. If those symbols are all nullable, the
    /// follow set of the rule's own nonterminal is added as well.
    pub fn step(&self, grammar: &Grammar, first: &FirstSets, nullable: &NullableSet) -> FollowSets {
        let mut next = self.clone();
        for rule in grammar.rules() {
            let symbols = rule.symbols();
            for (index, &symbol) in symbols.iter().enumerate() {
                let id = match symbol {
                    Symbol::Nonterminal(id) => id,
                    Symbol::Terminal(_) => continue,
                };
                let rest = first.of_sequence(&symbols[index + 1..], nullable);
                let target = &mut next.0[id.as_usize()];
                target.insert_all(rest.symbols());
                if rest.has_epsilon() {
                    target.union_with(self.get(rule.name()));
                }
            }
        }
        next
    }

    /// Get the follow set of a nonterminal.
    pub fn get(&self, id: NonterminalId) -> &LookaheadSet {
        &self.0[id.as_usize()]
    }

    /// Iterate over the nonterminals and their follow sets.
    pub fn iter<'a>(&'a self) -> impl Iterator<Item = (NonterminalId, &'a LookaheadSet)> + 'a {
        self.0
            .iter()
            .enumerate()
            .map(|(i, fs)| (NonterminalId::from_usize(i), fs))
    }

    /// Get a pretty printer for these follow sets.
    pub fn pretty<'a>(&'a self, grammar: &'a Grammar) -> Pretty<&'a Grammar, &'a Self> {
        Pretty::new(grammar, self)
    }
}

impl Index<NonterminalId> for FollowSets {
    type Output = LookaheadSet;

    fn index(&self, index: NonterminalId) -> &LookaheadSet {
        self.get(index)
    }
}

impl<'a> fmt::Display for Pretty<&'a Grammar, &'a FollowSets> {
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
