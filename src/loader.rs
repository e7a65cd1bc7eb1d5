// Copyright (c) 2018 Fabian Schuiki

//! A loader for grammar descriptions.
//!
//! A description lists one rule per line, in the form `A -> B c d`. The arrow
//! may also be written as `→` or `⟶`. Alternatives may be separated by `|`, and
//! `ε` or `epsilon` denote the empty string. A line of the form `token a b c`
//! declares terminals. Lines that cannot be understood are skipped with a
//! warning, such that a single typo does not prevent the analysis of the rest
//! of the grammar.

use std::fmt;

use grammar::{Config, Grammar, GrammarError, RawRule, RawSymbol};
use lexer::{Keyword, Lexer, Token};

/// The contents of a grammar description.
#[derive(Debug, Default, PartialEq, Eq, Hash)]
pub struct Desc {
    /// The declared terminals.
    pub tokens: Vec<String>,
    /// The rules, in the order they appear.
    pub rules: Vec<RawRule>,
    /// The lines that were skipped.
    pub malformed: Vec<Malformed>,
}

/// A line of a grammar description that was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Malformed {
    /// The line number, starting at 1.
    pub line: usize,
    /// The byte offset of the first token on the line.
    pub offset: usize,
    /// What is wrong with the line.
    pub reason: Reason,
}

/// The reason a line of a grammar description is malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reason {
    /// The line has no arrow separating left and right-hand side.
    MissingArrow,
    /// There is nothing to the left of the arrow.
    MissingLeft,
    /// An alternative on the right of the arrow is empty.
    MissingRight,
    /// The left-hand side is not a single name.
    InvalidLeft,
    /// The line contains more than one arrow.
    ExtraArrow,
    /// A token declaration names no or invalid terminals.
    InvalidTokenDecl,
    /// A quoted name is not closed before the end of the line.
    UnclosedQuote,
}

impl fmt::Display for Malformed {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let msg = match self.reason {
            Reason::MissingArrow => "missing `->` between left and right-hand side",
            Reason::MissingLeft => "missing left-hand side",
            Reason::MissingRight => "missing right-hand side",
            Reason::InvalidLeft => "left-hand side must be a single name",
            Reason::ExtraArrow => "more than one `->`",
            Reason::InvalidTokenDecl => "`token` must be followed by terminal names",
            Reason::UnclosedQuote => "missing closing `'`",
        };
        write!(f, "line {}: {}", self.line, msg)
    }
}

/// Parse a grammar description.
pub fn parse_str(input: &str) -> Desc {
    let lines = LineIndex::new(input);
    let mut desc = Desc::default();
    let mut tokens = Vec::new();
    for (sp, _, tkn) in Lexer::new(input.char_indices()) {
        if tkn == Token::Newline {
            parse_line(&mut desc, &lines, &tokens);
            tokens.clear();
        } else {
            tokens.push((sp, tkn));
        }
    }
    parse_line(&mut desc, &lines, &tokens);
    debug!(
        "parsed {} rules and {} token declarations, skipped {} lines",
        desc.rules.len(),
        desc.tokens.len(),
        desc.malformed.len()
    );
    desc
}

/// The byte offsets at which the lines of an input start.
///
/// Block comments may span line breaks without producing newline tokens, so
/// line numbers are derived from offsets rather than by counting tokens.
struct LineIndex(Vec<usize>);

impl LineIndex {
    fn new(input: &str) -> LineIndex {
        let mut starts = vec![0];
        starts.extend(input.match_indices('\n').map(|(p, _)| p + 1));
        LineIndex(starts)
    }

    /// The line number of a byte offset, starting at 1.
    fn line(&self, offset: usize) -> usize {
        match self.0.binary_search(&offset) {
            Ok(i) => i + 1,
            Err(i) => i,
        }
    }
}

/// Parse the tokens of a single line and add the result to the description.
fn parse_line(desc: &mut Desc, lines: &LineIndex, tokens: &[(usize, Token)]) {
    let offset = match tokens.first() {
        Some(&(offset, _)) => offset,
        None => return,
    };
    let unclosed = tokens.iter().any(|&(_, ref t)| match *t {
        Token::Unclosed(_) => true,
        _ => false,
    });
    let result = match tokens[0].1 {
        _ if unclosed => Err(Reason::UnclosedQuote),
        Token::Keyword(Keyword::Token) if tokens.len() == 1 || tokens[1].1 != Token::Arrow => {
            parse_token_decl(&tokens[1..]).map(|names| desc.tokens.extend(names))
        }
        _ => parse_rule_decl(tokens).map(|rules| desc.rules.extend(rules)),
    };
    if let Err(reason) = result {
        let malformed = Malformed {
            line: lines.line(offset),
            offset,
            reason,
        };
        warn!("skipping {}", malformed);
        desc.malformed.push(malformed);
    }
}

/// Parse the names following a `token` keyword.
fn parse_token_decl(tokens: &[(usize, Token)]) -> Result<Vec<String>, Reason> {
    if tokens.is_empty() {
        return Err(Reason::InvalidTokenDecl);
    }
    tokens
        .iter()
        .map(|&(_, ref tkn)| tkn.symbol_name().ok_or(Reason::InvalidTokenDecl))
        .collect()
}

/// Parse a line of the form `A -> α | β | ...`.
fn parse_rule_decl(tokens: &[(usize, Token)]) -> Result<Vec<RawRule>, Reason> {
    let arrow = match tokens.iter().position(|&(_, ref t)| *t == Token::Arrow) {
        Some(p) => p,
        None => return Err(Reason::MissingArrow),
    };
    let name = match &tokens[..arrow] {
        [] => return Err(Reason::MissingLeft),
        [(_, tkn)] => tkn.symbol_name().ok_or(Reason::InvalidLeft)?,
        _ => return Err(Reason::InvalidLeft),
    };

    let mut rules = Vec::new();
    for variant in tokens[arrow + 1..].split(|&(_, ref t)| *t == Token::Pipe) {
        if variant.is_empty() {
            return Err(Reason::MissingRight);
        }
        let mut rhs = Vec::with_capacity(variant.len());
        for &(_, ref tkn) in variant {
            rhs.push(match *tkn {
                Token::Keyword(Keyword::Epsilon) => RawSymbol::Epsilon,
                Token::Arrow => return Err(Reason::ExtraArrow),
                _ => match tkn.symbol_name() {
                    Some(n) => RawSymbol::Name(n),
                    None => return Err(Reason::MissingRight),
                },
            });
        }
        rules.push(RawRule::new(name.clone(), rhs));
    }
    Ok(rules)
}

/// Convert the grammar description into an actual grammar.
///
/// Terminals declared in the description are added to the ones already
/// declared in `config`.
pub fn make_grammar(desc: &Desc, config: &Config) -> Result<Grammar, GrammarError> {
    let mut config = config.clone();
    config.terminals.extend(desc.tokens.iter().cloned());
    Grammar::from_rules(&desc.rules, &config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use grammar::UndefinedSymbols;

    fn rule(lhs: &str, rhs: &[&str]) -> RawRule {
        RawRule::new(
            lhs,
            rhs.iter()
                .map(|&s| if s == "ε" {
                    RawSymbol::Epsilon
                } else {
                    RawSymbol::from(s)
                })
                .collect(),
        )
    }

    #[test]
    fn simple1() {
        let desc = parse_str("S -> a b A\nA -> b c\nA -> ε\n");
        assert_eq!(
            desc,
            Desc {
                tokens: vec![],
                rules: vec![
                    rule("S", &["a", "b", "A"]),
                    rule("A", &["b", "c"]),
                    rule("A", &["ε"]),
                ],
                malformed: vec![],
            }
        );
    }

    #[test]
    fn alternatives() {
        let desc = parse_str("A ⟶ b c | epsilon");
        assert_eq!(desc.rules, vec![rule("A", &["b", "c"]), rule("A", &["ε"])]);
    }

    #[test]
    fn token_decls() {
        let desc = parse_str("token a b\n// the rules\nS -> a token b\n\n");
        assert_eq!(desc.tokens, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(desc.rules, vec![rule("S", &["a", "token", "b"])]);
        assert!(desc.malformed.is_empty());
    }

    #[test]
    fn token_as_rule_name() {
        let desc = parse_str("token -> x");
        assert_eq!(desc.rules, vec![rule("token", &["x"])]);
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let desc = parse_str(
            "S -> A\nA B\n-> x\nA -> \nA B -> x\nA -> x -> y\nA -> x |\ntoken\nA -> a\n",
        );
        assert_eq!(desc.rules, vec![rule("S", &["A"]), rule("A", &["a"])]);
        let reasons: Vec<_> = desc.malformed.iter().map(|m| (m.line, m.reason)).collect();
        assert_eq!(
            reasons,
            vec![
                (2, Reason::MissingArrow),
                (3, Reason::MissingLeft),
                (4, Reason::MissingRight),
                (5, Reason::InvalidLeft),
                (6, Reason::ExtraArrow),
                (7, Reason::MissingRight),
                (8, Reason::InvalidTokenDecl),
            ]
        );
        assert_eq!(desc.malformed[0].offset, 7);
        assert_eq!(format!("{}", desc.malformed[2]), "line 4: missing right-hand side");
    }

    #[test]
    fn unclosed_quote_skips_line() {
        let desc = parse_str("S -> ' b c\nS -> x 'y'\n");
        assert_eq!(desc.rules, vec![rule("S", &["x", "'y'"])]);
        assert_eq!(
            desc.malformed,
            vec![Malformed {
                line: 1,
                offset: 0,
                reason: Reason::UnclosedQuote,
            }]
        );
        assert_eq!(format!("{}", desc.malformed[0]), "line 1: missing closing `'`");
    }

    #[test]
    fn lines_after_block_comment() {
        let desc = parse_str("S -> a /* x\n y */\nbroken\n/*\n\n*/ A B\n");
        let lines: Vec<_> = desc.malformed.iter().map(|m| (m.line, m.offset)).collect();
        assert_eq!(lines, vec![(3, 18), (6, 32)]);
    }

    #[test]
    fn grammar_from_desc() {
        let desc = parse_str("token x\nS -> x A\nA -> y");
        let strict = Config {
            undefined: UndefinedSymbols::Reject,
            terminals: vec![],
        };
        assert_eq!(
            make_grammar(&desc, &strict),
            Err(GrammarError::DanglingReference {
                index: 1,
                name: "y".into(),
            })
        );
        let g = make_grammar(&desc, &Config::default()).unwrap();
        assert_eq!(g.terminal_id_bound(), 2);
        assert_eq!(g.nonterminal_id_bound(), 2);
    }

    #[test]
    fn empty_description() {
        let desc = parse_str("// nothing here\n\n");
        assert_eq!(make_grammar(&desc, &Config::default()), Err(GrammarError::EmptyGrammar));
    }
}
