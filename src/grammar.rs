// Copyright (c) 2018 Fabian Schuiki

//! Data structures representing a grammar.
//!
//! A grammar is constructed once from a sequence of raw production records via
//! `Grammar::from_rules`, which interns all symbol names and classifies every
//! right-hand side symbol as either a terminal or a nonterminal. The resulting
//! grammar is read-only.

use std;
use std::error::Error;
use std::fmt;

use indexmap::IndexSet;
use Pretty;

/// A grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grammar {
    rules: Vec<Rule>,
    nonterms: IndexSet<String>,
    terms: IndexSet<String>,
    nonterm_rules: Vec<Vec<RuleId>>,
    skipped: Vec<usize>,
}

/// A single production within a grammar.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Rule {
    name: NonterminalId,
    symbols: Vec<Symbol>,
}

/// A symbol of a production.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Symbol {
    /// A terminal.
    Terminal(TerminalId),
    /// A nonterminal.
    Nonterminal(NonterminalId),
}

/// A unique nonterminal identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NonterminalId(usize);

/// A unique terminal identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TerminalId(usize);

/// A unique rule identifier.
///
/// Rules are numbered in the order they were given to the grammar, starting at
/// zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RuleId(usize);

/// An iterator over the rules of a grammar.
pub type RulesIter<'a> = std::slice::Iter<'a, Rule>;

/// an iterator over the rule IDs of a grammar.
pub type RuleIdsIter<'a> = std::slice::Iter<'a, RuleId>;

/// A production record as handed over by a grammar loader.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RawRule {
    /// The name of the left-hand side nonterminal.
    pub lhs: String,
    /// The right-hand side symbols.
    pub rhs: Vec<RawSymbol>,
}

/// A symbol on the right-hand side of a raw production record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RawSymbol {
    /// A named terminal or nonterminal.
    Name(String),
    /// The empty string marker.
    Epsilon,
}

/// How right-hand side names without a production are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UndefinedSymbols {
    /// Every name that never appears on a left-hand side is a terminal.
    Terminal,
    /// Only declared terminals may appear without a production. Anything else
    /// is reported as a dangling reference.
    Reject,
}

impl Default for UndefinedSymbols {
    fn default() -> UndefinedSymbols {
        UndefinedSymbols::Terminal
    }
}

/// Options controlling grammar construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// The policy for undefined right-hand side names.
    pub undefined: UndefinedSymbols,
    /// Names that are explicitly declared as terminals.
    pub terminals: Vec<String>,
}

/// An error encountered while constructing a grammar.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GrammarError {
    /// No usable productions were given, so there is no start symbol.
    EmptyGrammar,
    /// A right-hand side name is neither a nonterminal nor a terminal.
    DanglingReference {
        /// The index of the production referring to the name.
        index: usize,
        /// The unresolved name.
        name: String,
    },
    /// A name is declared as a terminal but also has productions.
    ConflictingSymbol(String),
}

impl fmt::Display for GrammarError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            GrammarError::EmptyGrammar => write!(f, "grammar has no productions"),
            GrammarError::DanglingReference { index, ref name } => write!(
                f,
                "production {} refers to `{}`, which is neither a declared terminal nor defined by any production",
                index + 1,
                name
            ),
            GrammarError::ConflictingSymbol(ref name) => write!(
                f,
                "`{}` is declared as a terminal but also has productions",
                name
            ),
        }
    }
}

impl Error for GrammarError {}

impl Grammar {
    /// Create a grammar from a sequence of production records.
    ///
    /// The left-hand side of the first record is the start symbol. Epsilon
    /// markers are dropped from right-hand sides, such that a record whose
    /// right-hand side consists only of epsilon markers becomes an empty
    /// production. Records without a left-hand side are skipped with a
    /// warning and can be queried through `skipped`.
    pub fn from_rules(rules: &[RawRule], config: &Config) -> Result<Grammar, GrammarError> {
        let mut grammar = Grammar {
            rules: Vec::with_capacity(rules.len()),
            nonterms: IndexSet::new(),
            terms: IndexSet::new(),
            nonterm_rules: Vec::new(),
            skipped: Vec::new(),
        };

        // Declare the nonterminals first, such that forward references to
        // nonterminals defined further down resolve correctly.
        for (index, rule) in rules.iter().enumerate() {
            if rule.lhs.is_empty() {
                warn!("skipping production {}, which has no left-hand side", index + 1);
                grammar.skipped.push(index);
                continue;
            }
            grammar.add_nonterminal(rule.lhs.as_str());
        }
        if grammar.nonterms.is_empty() {
            return Err(GrammarError::EmptyGrammar);
        }
        for name in &config.terminals {
            if grammar.nonterms.contains(name.as_str()) {
                return Err(GrammarError::ConflictingSymbol(name.clone()));
            }
            grammar.add_terminal(name.as_str());
        }

        for (index, rule) in rules.iter().enumerate() {
            let name = match grammar.nonterminal_id(&rule.lhs) {
                Some(n) => n,
                None => continue,
            };
            let mut symbols = Vec::with_capacity(rule.rhs.len());
            for raw in &rule.rhs {
                let raw = match *raw {
                    RawSymbol::Name(ref n) => n,
                    RawSymbol::Epsilon => continue,
                };
                let symbol = match grammar.lookup(raw) {
                    Some(s) => s,
                    None => match config.undefined {
                        UndefinedSymbols::Terminal => grammar.add_terminal(raw.as_str()).into(),
                        UndefinedSymbols::Reject => {
                            return Err(GrammarError::DanglingReference {
                                index,
                                name: raw.clone(),
                            })
                        }
                    },
                };
                symbols.push(symbol);
            }
            grammar.add_rule(Rule::new(name, symbols));
        }

        debug!(
            "grammar has {} rules, {} nonterminals, {} terminals",
            grammar.rules.len(),
            grammar.nonterms.len(),
            grammar.terms.len()
        );
        Ok(grammar)
    }

    /// Add a nonterminal.
    fn add_nonterminal(&mut self, name: &str) -> NonterminalId {
        if let Some((id, _)) = self.nonterms.get_full(name) {
            return NonterminalId(id);
        }
        let (id, _) = self.nonterms.insert_full(name.to_owned());
        self.nonterm_rules.push(Vec::new());
        NonterminalId(id)
    }

    /// Add a terminal.
    fn add_terminal(&mut self, name: &str) -> TerminalId {
        if let Some((id, _)) = self.terms.get_full(name) {
            return TerminalId(id);
        }
        let (id, _) = self.terms.insert_full(name.to_owned());
        TerminalId(id)
    }

    /// Add a rule to the grammar.
    fn add_rule(&mut self, rule: Rule) -> RuleId {
        let id = RuleId::from_usize(self.rules.len());
        self.nonterm_rules[rule.name().as_usize()].push(id);
        self.rules.push(rule);
        id
    }

    /// The start symbol, i.e. the left-hand side of the first rule.
    pub fn start(&self) -> NonterminalId {
        NonterminalId(0)
    }

    /// Look up a symbol by name.
    pub fn lookup(&self, name: &str) -> Option<Symbol> {
        self.nonterminal_id(name)
            .map(Symbol::from)
            .or_else(|| self.terminal_id(name).map(Symbol::from))
    }

    /// Look up a nonterminal by name.
    pub fn nonterminal_id(&self, name: &str) -> Option<NonterminalId> {
        self.nonterms.get_full(name).map(|(id, _)| NonterminalId(id))
    }

    /// Look up a terminal by name.
    pub fn terminal_id(&self, name: &str) -> Option<TerminalId> {
        self.terms.get_full(name).map(|(id, _)| TerminalId(id))
    }

    /// Get the name of a nonterminal.
    pub fn nonterminal_name(&self, id: NonterminalId) -> &str {
        &self.nonterms[id.as_usize()]
    }

    /// Get the name of a terminal.
    pub fn terminal_name(&self, id: TerminalId) -> &str {
        &self.terms[id.as_usize()]
    }

    /// The upper bound on nonterminal IDs.
    ///
    /// Basically returns the largest nonterminal ID + 1. Can be used as
    /// capacity for containers that will hold nonterminals.
    pub fn nonterminal_id_bound(&self) -> usize {
        self.nonterms.len()
    }

    /// The upper bound on terminal IDs.
    ///
    /// Basically returns the largest terminal ID + 1. Can be used as capacity
    /// for containers that will hold terminals.
    pub fn terminal_id_bound(&self) -> usize {
        self.terms.len()
    }

    /// The nonterminals in this grammar, in order of first definition.
    pub fn nonterminals(&self) -> impl Iterator<Item = NonterminalId> {
        (0..self.nonterms.len()).map(NonterminalId)
    }

    /// The terminals in this grammar, in order of first appearance.
    pub fn terminals(&self) -> impl Iterator<Item = TerminalId> {
        (0..self.terms.len()).map(TerminalId)
    }

    /// The rules in this grammar.
    pub fn rules(&self) -> RulesIter {
        self.rules.iter()
    }

    /// The indices of the input records that were skipped for lacking a
    /// left-hand side.
    pub fn skipped(&self) -> &[usize] {
        &self.skipped
    }

    /// The number of rules in this grammar.
    pub fn num_rules(&self) -> usize {
        self.rules.len()
    }

    /// The rules for a specific nonterminal in the grammar.
    pub fn rules_for_nonterminal(&self, id: NonterminalId) -> RuleIdsIter {
        self.nonterm_rules[id.as_usize()].iter()
    }

    /// Access a single rule of this grammar.
    pub fn rule(&self, id: RuleId) -> &Rule {
        &self.rules[id.as_usize()]
    }
}

impl Rule {
    /// Create a new rule.
    pub fn new(name: NonterminalId, symbols: Vec<Symbol>) -> Rule {
        Rule {
            name: name,
            symbols: symbols,
        }
    }

    /// The name of this rule.
    pub fn name(&self) -> NonterminalId {
        self.name
    }

    /// The symbols in this production.
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Check whether this is an epsilon production.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Get a pretty printer for this rule.
    pub fn pretty<'a>(&'a self, grammar: &'a Grammar) -> Pretty<&'a Grammar, &'a Self> {
        Pretty::new(grammar, self)
    }
}

impl<'a> fmt::Display for Pretty<&'a Grammar, &'a Rule> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ->", self.item.name.pretty(self.ctx))?;
        if self.item.symbols.is_empty() {
            write!(f, " ε")?;
        }
        for symbol in &self.item.symbols {
            write!(f, " {}", symbol.pretty(self.ctx))?;
        }
        Ok(())
    }
}

impl RawRule {
    /// Create a new production record.
    pub fn new<S: Into<String>>(lhs: S, rhs: Vec<RawSymbol>) -> RawRule {
        RawRule {
            lhs: lhs.into(),
            rhs: rhs,
        }
    }
}

impl<'a> From<&'a str> for RawSymbol {
    fn from(name: &'a str) -> RawSymbol {
        RawSymbol::Name(name.into())
    }
}

impl From<String> for RawSymbol {
    fn from(name: String) -> RawSymbol {
        RawSymbol::Name(name)
    }
}

impl Symbol {
    /// Get a pretty printer for this symbol.
    pub fn pretty<'a>(&'a self, grammar: &'a Grammar) -> Pretty<&'a Grammar, &'a Self> {
        Pretty::new(grammar, self)
    }
}

impl From<TerminalId> for Symbol {
    fn from(id: TerminalId) -> Symbol {
        Symbol::Terminal(id)
    }
}

impl From<NonterminalId> for Symbol {
    fn from(id: NonterminalId) -> Symbol {
        Symbol::Nonterminal(id)
    }
}

impl<'a> fmt::Display for Pretty<&'a Grammar, &'a Symbol> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self.item {
            Symbol::Terminal(id) => write!(f, "{}", id.pretty(self.ctx)),
            Symbol::Nonterminal(id) => write!(f, "{}", id.pretty(self.ctx)),
        }
    }
}

impl NonterminalId {
    /// Create a nonterminal id from a usize.
    pub fn from_usize(id: usize) -> NonterminalId {
        NonterminalId(id)
    }

    /// Obtain the id as a usize.
    pub fn as_usize(self) -> usize {
        self.0
    }

    /// Get a pretty printer for this nonterminal.
    pub fn pretty(self, grammar: &Grammar) -> Pretty<&Grammar, Self> {
        Pretty::new(grammar, self)
    }
}

impl<'a> fmt::Display for Pretty<&'a Grammar, NonterminalId> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.ctx.nonterminal_name(self.item))
    }
}

impl TerminalId {
    /// Create a terminal id from a usize.
    pub fn from_usize(id: usize) -> TerminalId {
        TerminalId(id)
    }

    /// Obtain the id as a usize.
    pub fn as_usize(self) -> usize {
        self.0
    }

    /// Get a pretty printer for this terminal.
    pub fn pretty(self, grammar: &Grammar) -> Pretty<&Grammar, Self> {
        Pretty::new(grammar, self)
    }
}

impl<'a> fmt::Display for Pretty<&'a Grammar, TerminalId> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.ctx.terminal_name(self.item))
    }
}

impl RuleId {
    /// Create a rule id from a usize.
    pub fn from_usize(id: usize) -> RuleId {
        RuleId(id)
    }

    /// Obtain the id as a usize.
    pub fn as_usize(self) -> usize {
        self.0
    }

    /// Get a pretty printer for this rule.
    pub fn pretty(self, grammar: &Grammar) -> Pretty<&Grammar, Self> {
        Pretty::new(grammar, self)
    }
}

impl<'a> fmt::Display for Pretty<&'a Grammar, RuleId> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.ctx.rule(self.item).pretty(self.ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(lhs: &str, rhs: &[&str]) -> RawRule {
        RawRule::new(lhs, rhs.iter().map(|&s| RawSymbol::from(s)).collect())
    }

    #[test]
    fn classify_symbols() {
        let g = Grammar::from_rules(
            &[
                rule("S", &["a", "b", "A"]),
                rule("A", &["b", "c"]),
                RawRule::new("A", vec![RawSymbol::Epsilon]),
            ],
            &Config::default(),
        ).unwrap();
        assert_eq!(g.start(), NonterminalId(0));
        assert_eq!(g.nonterminal_id_bound(), 2);
        assert_eq!(g.terminal_id_bound(), 3);
        assert_eq!(g.lookup("A"), Some(Symbol::Nonterminal(NonterminalId(1))));
        assert_eq!(g.lookup("c"), Some(Symbol::Terminal(TerminalId(2))));
        assert_eq!(g.lookup("d"), None);
        assert!(g.rule(RuleId(2)).is_empty());
        let a_rules: Vec<_> = g.rules_for_nonterminal(NonterminalId(1)).cloned().collect();
        assert_eq!(a_rules, vec![RuleId(1), RuleId(2)]);
    }

    #[test]
    fn forward_references() {
        let g = Grammar::from_rules(&[rule("S", &["A"]), rule("A", &["a"])], &Config::default())
            .unwrap();
        assert_eq!(g.rule(RuleId(0)).symbols(), &[Symbol::Nonterminal(NonterminalId(1))]);
    }

    #[test]
    fn epsilon_markers_are_dropped() {
        let g = Grammar::from_rules(
            &[RawRule::new(
                "S",
                vec![RawSymbol::Epsilon, "a".into(), RawSymbol::Epsilon],
            )],
            &Config::default(),
        ).unwrap();
        assert_eq!(g.rule(RuleId(0)).symbols().len(), 1);
    }

    #[test]
    fn empty_grammar() {
        assert_eq!(
            Grammar::from_rules(&[], &Config::default()),
            Err(GrammarError::EmptyGrammar)
        );
    }

    #[test]
    fn missing_lhs() {
        let g = Grammar::from_rules(
            &[rule("S", &["a"]), rule("", &["b"]), rule("S", &["c"])],
            &Config::default(),
        ).unwrap();
        assert_eq!(g.skipped(), &[1]);
        assert_eq!(g.num_rules(), 2);
        assert_eq!(g.lookup("b"), None);
        assert_eq!(g.rule(RuleId(1)).symbols(), &[Symbol::Terminal(TerminalId(1))]);

        assert_eq!(
            Grammar::from_rules(&[rule("", &["a"]), rule("", &[])], &Config::default()),
            Err(GrammarError::EmptyGrammar)
        );
    }

    #[test]
    fn undefined_as_terminal() {
        let g = Grammar::from_rules(&[rule("S", &["Undefined"])], &Config::default()).unwrap();
        assert_eq!(g.lookup("Undefined"), Some(Symbol::Terminal(TerminalId(0))));
    }

    #[test]
    fn undefined_rejected() {
        let config = Config {
            undefined: UndefinedSymbols::Reject,
            terminals: vec!["a".into()],
        };
        assert!(Grammar::from_rules(&[rule("S", &["a"])], &config).is_ok());
        assert_eq!(
            Grammar::from_rules(&[rule("S", &["a"]), rule("S", &["B"])], &config),
            Err(GrammarError::DanglingReference {
                index: 1,
                name: "B".into(),
            })
        );
    }

    #[test]
    fn declared_terminal_with_productions() {
        let config = Config {
            undefined: UndefinedSymbols::Terminal,
            terminals: vec!["S".into()],
        };
        assert_eq!(
            Grammar::from_rules(&[rule("S", &["a"])], &config),
            Err(GrammarError::ConflictingSymbol("S".into()))
        );
    }

    #[test]
    fn pretty_rules() {
        let g = Grammar::from_rules(
            &[rule("S", &["a", "S"]), RawRule::new("S", vec![])],
            &Config::default(),
        ).unwrap();
        assert_eq!(format!("{}", RuleId(0).pretty(&g)), "S -> a S");
        assert_eq!(format!("{}", RuleId(1).pretty(&g)), "S -> ε");
    }
}
