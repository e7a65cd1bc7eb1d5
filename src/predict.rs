// Copyright (c) 2018 Fabian Schuiki

//! Predict set computation.
//!
//! The predict set of a rule `A -> α` is the set of lookahead terminals for
//! which a top-down parser should expand `A` using this rule. It contains the
//! first set of `α`, and if `α` can derive the empty string, also the follow
//! set of `A`.

use std::fmt;
use std::ops::Index;

use first::FirstSets;
use follow::FollowSets;
use grammar::{Grammar, NonterminalId, RuleId};
use lookahead::LookaheadSet;
use nullable::NullableSet;
use Pretty;

/// The predict sets of all rules in a grammar.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PredictSets(Vec<LookaheadSet>);

impl PredictSets {
    /// Compute the predict sets of a grammar.
    pub fn compute(
        grammar: &Grammar,
        nullable: &NullableSet,
        first: &FirstSets,
        follow: &FollowSets,
    ) -> PredictSets {
        let sets = grammar
            .rules()
            .map(|rule| {
                let fs = first.of_sequence(rule.symbols(), nullable);
                let mut set = LookaheadSet::with_capacity(grammar.terminal_id_bound());
                set.insert_all(fs.symbols());
                if fs.has_epsilon() {
                    set.union_with(follow.get(rule.name()));
                }
                set
            })
            .collect();
        PredictSets(sets)
    }

    /// Get the predict set of a rule.
    pub fn get(&self, id: RuleId) -> &LookaheadSet {
        &self.0[id.as_usize()]
    }

    /// Iterate over the rules and their predict sets.
    pub fn iter<'a>(&'a self) -> impl Iterator<Item = (RuleId, &'a LookaheadSet)> + 'a {
        self.0
            .iter()
            .enumerate()
            .map(|(i, ps)| (RuleId::from_usize(i), ps))
    }

    /// Iterate over the rules of one nonterminal and their predict sets.
    pub fn for_nonterminal<'a>(
        &'a self,
        grammar: &'a Grammar,
        id: NonterminalId,
    ) -> impl Iterator<Item = (RuleId, &'a LookaheadSet)> + 'a {
        grammar
            .rules_for_nonterminal(id)
            .map(move |&rule| (rule, self.get(rule)))
    }

    /// Get a pretty printer for these predict sets.
    pub fn pretty<'a>(&'a self, grammar: &'a Grammar) -> Pretty<&'a Grammar, &'a Self> {
        Pretty::new(grammar, self)
    }
}

impl Index<RuleId> for PredictSets {
    type Output = LookaheadSet;

    fn index(&self, index: RuleId) -> &LookaheadSet {
        self.get(index)
    }
}

impl<'a> fmt::Display for Pretty<&'a Grammar, &'a PredictSets> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (id, ps) in self.item.iter() {
            if id.as_usize() > 0 {
                write!(f, "\n")?;
            }
            write!(f, "[{}]: {}", id.pretty(self.ctx), ps.pretty(self.ctx))?;
        }
        Ok(())
    }
}
