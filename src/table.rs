// Copyright (c) 2018 Fabian Schuiki

//! LL(1) parse tables and conflicts.
//!
//! A predictive parser picks the rule to expand a nonterminal with by looking
//! at the next terminal. The table maps each pair of nonterminal and lookahead
//! to that rule. If the predict sets of two rules of the same nonterminal
//! overlap, the grammar is not LL(1) and the table cannot be built.

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;

use indexmap::{IndexMap, IndexSet};

use follow::FollowSets;
use grammar::{Grammar, NonterminalId, RuleId};
use lookahead::Lookahead;
use predict::PredictSets;
use Pretty;

/// An LL(1) parse table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTable {
    entries: BTreeMap<(NonterminalId, Lookahead), RuleId>,
}

/// Multiple rules predicted for the same nonterminal and lookahead.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Conflict {
    /// The nonterminal being expanded.
    pub nonterminal: NonterminalId,
    /// The lookahead shared by the rules.
    pub lookahead: Lookahead,
    /// The conflicting rules, in grammar order.
    pub rules: Vec<RuleId>,
}

impl ParseTable {
    /// Build the parse table from the predict sets of a grammar.
    ///
    /// Fails with the list of all conflicts if the grammar is not LL(1).
    pub fn try_from(grammar: &Grammar, predict: &PredictSets) -> Result<ParseTable, Vec<Conflict>> {
        let conflicts = find_conflicts(grammar, predict);
        if !conflicts.is_empty() {
            debug!("grammar has {} LL(1) conflicts", conflicts.len());
            return Err(conflicts);
        }
        let mut entries = BTreeMap::new();
        for (rule, set) in predict.iter() {
            let name = grammar.rule(rule).name();
            for lookahead in set.iter() {
                entries.insert((name, lookahead), rule);
            }
        }
        debug!("parse table has {} entries", entries.len());
        Ok(ParseTable { entries })
    }

    /// Get the rule to expand a nonterminal with, given the next lookahead.
    pub fn get(&self, nonterminal: NonterminalId, lookahead: Lookahead) -> Option<RuleId> {
        self.entries.get(&(nonterminal, lookahead)).cloned()
    }

    /// An iterator over all entries of the table.
    pub fn entries(&self) -> Entries {
        Entries(self.entries.iter())
    }

    /// The synchronizing entries of the table.
    ///
    /// These are the follow set members of each nonterminal for which the
    /// table contains no rule. A parser recovering from a syntax error may pop
    /// the nonterminal when it encounters one of them.
    pub fn synchronizing(&self, grammar: &Grammar, follow: &FollowSets) -> Vec<(NonterminalId, Lookahead)> {
        let mut synch = Vec::new();
        for id in grammar.nonterminals() {
            for lookahead in follow[id].iter() {
                if !self.entries.contains_key(&(id, lookahead)) {
                    synch.push((id, lookahead));
                }
            }
        }
        synch
    }
}

/// An iterator over the entries of a parse table.
pub struct Entries<'a>(btree_map::Iter<'a, (NonterminalId, Lookahead), RuleId>);

impl<'a> Iterator for Entries<'a> {
    type Item = (NonterminalId, Lookahead, RuleId);

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(&(nt, la), &rule)| (nt, la, rule))
    }
}

/// Find the points where the same nonterminal and lookahead predict more than
/// one rule.
pub fn find_conflicts(grammar: &Grammar, predict: &PredictSets) -> Vec<Conflict> {
    let mut conflicts = Vec::new();
    for id in grammar.nonterminals() {
        // No conflicts possible with less than two rules.
        if grammar.rules_for_nonterminal(id).len() < 2 {
            continue;
        }

        // Create a Lookahead -> {Rule} mapping.
        let mut table: IndexMap<Lookahead, IndexSet<RuleId>> = IndexMap::new();
        for (rule, set) in predict.for_nonterminal(grammar, id) {
            for lookahead in set.iter() {
                table
                    .entry(lookahead)
                    .or_insert_with(|| IndexSet::new())
                    .insert(rule);
            }
        }

        // Filter out all lookaheads with more than one possible rule.
        conflicts.extend(table.into_iter().filter_map(|(lookahead, rules)| {
            if rules.len() > 1 {
                Some(Conflict {
                    nonterminal: id,
                    lookahead: lookahead,
                    rules: rules.into_iter().collect(),
                })
            } else {
                None
            }
        }));
    }
    conflicts
}

impl Conflict {
    /// Get a pretty printer for this conflict.
    pub fn pretty<'a>(&'a self, grammar: &'a Grammar) -> Pretty<&'a Grammar, &'a Self> {
        Pretty::new(grammar, self)
    }
}

impl<'a> fmt::Display for Pretty<&'a Grammar, &'a Conflict> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "conflict for {} on {} between",
            self.item.nonterminal.pretty(self.ctx),
            self.item.lookahead.pretty(self.ctx)
        )?;
        for (index, &rule) in self.item.rules.iter().enumerate() {
            if index > 0 {
                write!(f, " and")?;
            }
            write!(f, " [{}] {}", rule.as_usize() + 1, rule.pretty(self.ctx))?;
        }
        Ok(())
    }
}
