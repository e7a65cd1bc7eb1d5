// Copyright (c) 2018 Fabian Schuiki

//! Lookahead symbols and sets thereof.
//!
//! The analysis deals with two pseudo-symbols besides the terminals of the
//! grammar: epsilon, which marks that the empty string can be derived, and the
//! end of input. They are kept apart from the terminals in the `Lookahead`
//! enum such that a terminal can never be mistaken for either marker.

use std::fmt;

use bit_set::BitSet;
use grammar::{Grammar, TerminalId};
use Pretty;

/// A terminal or one of the pseudo-symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Lookahead {
    /// A terminal of the grammar.
    Terminal(TerminalId),
    /// The empty string.
    Epsilon,
    /// The end of input, traditionally written `$`.
    End,
}

impl Lookahead {
    /// Get a pretty printer for this lookahead.
    pub fn pretty<'a>(&'a self, grammar: &'a Grammar) -> Pretty<&'a Grammar, &'a Self> {
        Pretty::new(grammar, self)
    }
}

impl From<TerminalId> for Lookahead {
    fn from(id: TerminalId) -> Lookahead {
        Lookahead::Terminal(id)
    }
}

impl<'a> fmt::Display for Pretty<&'a Grammar, &'a Lookahead> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self.item {
            Lookahead::Terminal(id) => write!(f, "{}", id.pretty(self.ctx)),
            Lookahead::Epsilon => write!(f, "ε"),
            Lookahead::End => write!(f, "$"),
        }
    }
}

/// A set of terminals, optionally including the end of input.
///
/// This is the shape of follow and predict sets. Epsilon can never be a member.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct LookaheadSet {
    /// The terminals in the set.
    symbols: BitSet,
    /// Whether the end of input is in the set.
    has_end: bool,
}

impl LookaheadSet {
    /// Create an empty set.
    pub fn new() -> LookaheadSet {
        LookaheadSet::default()
    }

    /// Create an empty set with room for `num_term` terminals.
    pub fn with_capacity(num_term: usize) -> LookaheadSet {
        LookaheadSet {
            symbols: BitSet::with_capacity(num_term),
            has_end: false,
        }
    }

    /// Add a terminal to the set.
    pub fn insert(&mut self, id: TerminalId) -> bool {
        self.symbols.insert(id.as_usize())
    }

    /// Add the end of input to the set.
    pub fn insert_end(&mut self) -> bool {
        let added = !self.has_end;
        self.has_end = true;
        added
    }

    /// Add all terminals in `symbols` to the set.
    pub(crate) fn insert_all(&mut self, symbols: &BitSet) {
        self.symbols.union_with(symbols);
    }

    /// Add all members of another set to this set.
    pub fn union_with(&mut self, other: &LookaheadSet) {
        self.symbols.union_with(&other.symbols);
        self.has_end |= other.has_end;
    }

    /// Check whether the end of input is in the set.
    pub fn has_end(&self) -> bool {
        self.has_end
    }

    /// Check whether a lookahead is in the set.
    pub fn contains(&self, lookahead: Lookahead) -> bool {
        match lookahead {
            Lookahead::Terminal(id) => self.symbols.contains(id.as_usize()),
            Lookahead::Epsilon => false,
            Lookahead::End => self.has_end,
        }
    }

    /// The terminals in the set.
    pub fn terminals<'a>(&'a self) -> impl Iterator<Item = TerminalId> + 'a {
        self.symbols.iter().map(TerminalId::from_usize)
    }

    /// All members of the set. The end of input comes first, followed by the
    /// terminals in ascending order.
    pub fn iter<'a>(&'a self) -> impl Iterator<Item = Lookahead> + 'a {
        let end = if self.has_end {
            Some(Lookahead::End)
        } else {
            None
        };
        end.into_iter().chain(self.terminals().map(Lookahead::Terminal))
    }

    /// The members this set shares with another.
    pub fn intersection(&self, other: &LookaheadSet) -> LookaheadSet {
        LookaheadSet {
            symbols: self.symbols.intersection(&other.symbols).collect(),
            has_end: self.has_end && other.has_end,
        }
    }

    /// Check whether this set shares no member with another.
    pub fn is_disjoint(&self, other: &LookaheadSet) -> bool {
        !(self.has_end && other.has_end) && self.symbols.is_disjoint(&other.symbols)
    }

    /// The number of members in the set.
    pub fn len(&self) -> usize {
        self.symbols.len() + if self.has_end { 1 } else { 0 }
    }

    /// Check whether the set is empty.
    pub fn is_empty(&self) -> bool {
        !self.has_end && self.symbols.is_empty()
    }

    /// Check whether every member of this set is also in `other`.
    pub fn is_subset(&self, other: &LookaheadSet) -> bool {
        (!self.has_end || other.has_end) && self.symbols.is_subset(&other.symbols)
    }

    /// Get a pretty printer for this set.
    pub fn pretty<'a>(&'a self, grammar: &'a Grammar) -> Pretty<&'a Grammar, &'a Self> {
        Pretty::new(grammar, self)
    }
}

impl<'a> fmt::Display for Pretty<&'a Grammar, &'a LookaheadSet> {
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
