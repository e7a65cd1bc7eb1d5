// Copyright (c) 2018 Fabian Schuiki

//! The complete analysis of a grammar.

use first::FirstSets;
use follow::FollowSets;
use grammar::Grammar;
use nullable::NullableSet;
use predict::PredictSets;

/// The nullable, first, follow, and predict sets of a grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    nullable: NullableSet,
    first: FirstSets,
    follow: FollowSets,
    predict: PredictSets,
}

impl Analysis {
    /// Analyze a grammar.
    ///
    /// Runs the individual stages in dependency order.
    pub fn compute(grammar: &Grammar) -> Analysis {
        let nullable = NullableSet::compute(grammar);
        let first = FirstSets::compute(grammar, &nullable);
        let follow = FollowSets::compute(grammar, &first, &nullable);
        let predict = PredictSets::compute(grammar, &nullable, &first, &follow);
        Analysis {
            nullable,
            first,
            follow,
            predict,
        }
    }

    /// The nullable nonterminals.
    pub fn nullable(&self) -> &NullableSet {
        &self.nullable
    }

    /// The first sets of all nonterminals.
    pub fn first(&self) -> &FirstSets {
        &self.first
    }

    /// The follow sets of all nonterminals.
    pub fn follow(&self) -> &FollowSets {
        &self.follow
    }

    /// The predict sets of all rules.
    pub fn predict(&self) -> &PredictSets {
        &self.predict
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lookahead::Lookahead;
    use testing::grammar;

    fn dangling_else() -> Grammar {
        grammar(&[
            ("Stmt", &["if", "Expr", "then", "Stmt", "Else"]),
            ("Stmt", &["other"]),
            ("Else", &["else", "Stmt"]),
            ("Else", &[]),
            ("Expr", &["b"]),
        ])
    }

    #[test]
    fn idempotent() {
        let g = dangling_else();
        assert_eq!(Analysis::compute(&g), Analysis::compute(&g));
    }

    #[test]
    fn epsilon_iff_nullable() {
        let g = dangling_else();
        let a = Analysis::compute(&g);
        for id in g.nonterminals() {
            assert_eq!(
                a.first()[id].contains(Lookahead::Epsilon),
                a.nullable().is_nullable(id)
            );
        }
    }

    #[test]
    fn start_follows_end() {
        let g = dangling_else();
        let a = Analysis::compute(&g);
        assert!(a.follow()[g.start()].has_end());
        for (_, fs) in a.follow().iter() {
            assert!(!fs.contains(Lookahead::Epsilon));
        }
    }
}
