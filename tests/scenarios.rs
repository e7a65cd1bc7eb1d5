// Copyright (c) 2018 Fabian Schuiki
extern crate llsets;

use llsets::Analysis;
use llsets::grammar::{Config, Grammar, GrammarError, RawRule, RawSymbol, RuleId,
                      UndefinedSymbols};
use llsets::loader;
use llsets::lookahead::Lookahead;
use llsets::output::{render_first, render_follow, render_predict, Glyphs};
use llsets::table::ParseTable;

fn load(src: &str) -> Grammar {
    let desc = loader::parse_str(src);
    assert!(desc.malformed.is_empty(), "{:?}", desc.malformed);
    loader::make_grammar(&desc, &Config::default()).unwrap()
}

fn render(g: &Grammar, a: &Analysis) -> (String, String, String) {
    let glyphs = Glyphs::default();
    let mut first = Vec::new();
    let mut follow = Vec::new();
    let mut predict = Vec::new();
    render_first(&mut first, g, a.first(), &glyphs).unwrap();
    render_follow(&mut follow, g, a.follow(), &glyphs).unwrap();
    render_predict(&mut predict, g, a.predict(), &glyphs).unwrap();
    (
        String::from_utf8(first).unwrap(),
        String::from_utf8(follow).unwrap(),
        String::from_utf8(predict).unwrap(),
    )
}

#[test]
fn simple() {
    let g = load("S ⟶ a b A\nA ⟶ b c\nA ⟶ ε\n");
    let a = Analysis::compute(&g);
    let (first, follow, predict) = render(&g, &a);
    assert_eq!(first, "S a\nA b ε\n");
    assert_eq!(follow, "S $\nA $\n");
    assert_eq!(predict, "1 a\n2 b\n3 $\n");
}

#[test]
fn expressions() {
    let g = load(
        "
        // Arithmetic expressions without left recursion.
        E  -> T E'
        E' -> + T E' | ε
        T  -> F T'
        T' -> * F T' | ε
        F  -> ( E ) | id
        ",
    );
    let a = Analysis::compute(&g);
    let (first, follow, predict) = render(&g, &a);
    assert_eq!(first, "E ( id\nE' + ε\nT ( id\nT' * ε\nF ( id\n");
    assert_eq!(follow, "E $ )\nE' $ )\nT $ + )\nT' $ + )\nF $ + * )\n");
    assert_eq!(predict, "1 ( id\n2 +\n3 $ )\n4 ( id\n5 *\n6 $ + )\n7 (\n8 id\n");
    assert!(ParseTable::try_from(&g, a.predict()).is_ok());
}

#[test]
fn declarations() {
    // A fragment of a C-like language as used by a predictive parser.
    let g = load(
        "
        Program -> Declaration-list
        Declaration-list -> Declaration Declaration-list | ε
        Declaration -> Declaration-initial Declaration-prime
        Declaration-initial -> Type-specifier ID
        Declaration-prime -> Fun-declaration-prime | Var-declaration-prime
        Var-declaration-prime -> ; | [ NUM ] ;
        Fun-declaration-prime -> ( Params ) Compound-stmt
        Type-specifier -> int | void
        Params -> int ID Param-prime Param-list | void
        Param-list -> , Param Param-list | ε
        Param -> Declaration-initial Param-prime
        Param-prime -> [ ] | ε
        Compound-stmt -> { Declaration-list }
        ",
    );
    let a = Analysis::compute(&g);
    let id = |name| g.nonterminal_id(name).unwrap();
    let first = |name| format!("{}", a.first()[id(name)].pretty(&g));
    let follow = |name| format!("{}", a.follow()[id(name)].pretty(&g));

    assert_eq!(first("Program"), "{int, void, ε}");
    assert_eq!(first("Declaration-prime"), "{;, [, (}");
    assert_eq!(first("Param-prime"), "{[, ε}");
    assert_eq!(follow("Program"), "{$}");
    assert_eq!(follow("Declaration-list"), "{$, }}");
    assert_eq!(follow("Declaration"), "{$, int, void, }}");
    assert_eq!(follow("Param-prime"), "{), ,}");
    assert_eq!(follow("Param-list"), "{)}");
    assert!(ParseTable::try_from(&g, a.predict()).is_ok());
}

#[test]
fn epsilon_iff_nullable() {
    let g = load("S -> A B C\nA -> a | ε\nB -> C C\nC -> c | ε\nD -> S d");
    let a = Analysis::compute(&g);
    for nt in g.nonterminals() {
        assert_eq!(
            a.first()[nt].contains(Lookahead::Epsilon),
            a.nullable().is_nullable(nt),
            "{}",
            g.nonterminal_name(nt)
        );
    }
}

#[test]
fn end_of_input_reaches_tails() {
    let g = load("S -> a A\nA -> B b C\nB -> x\nC -> D\nD -> d | ε");
    let a = Analysis::compute(&g);
    let has_end = |name| a.follow()[g.nonterminal_id(name).unwrap()].has_end();
    assert!(has_end("S"));
    assert!(has_end("A"));
    assert!(!has_end("B"));
    assert!(has_end("C"));
    assert!(has_end("D"));
}

#[test]
fn no_markers_where_they_do_not_belong() {
    let g = load("S -> A S b | ε\nA -> a | ε");
    let a = Analysis::compute(&g);
    for (_, fs) in a.first().iter() {
        assert!(!fs.contains(Lookahead::End));
    }
    for (_, fs) in a.follow().iter() {
        assert!(fs.iter().all(|la| la != Lookahead::Epsilon));
    }
    for (_, ps) in a.predict().iter() {
        assert!(ps.iter().all(|la| la != Lookahead::Epsilon));
    }
}

#[test]
fn idempotent() {
    let g = load("S -> A S b | ε\nA -> a | ε");
    let first = Analysis::compute(&g);
    let second = Analysis::compute(&g);
    assert_eq!(first, second);
    assert_eq!(render(&g, &first), render(&g, &second));
}

#[test]
fn rule_order_does_not_matter() {
    let a = load("S -> A B\nA -> a | ε\nB -> b | A");
    let b = load("S -> A B\nB -> A\nA -> ε\nB -> b\nA -> a");
    let aa = Analysis::compute(&a);
    let bb = Analysis::compute(&b);
    let names = |g: &Grammar, set: Vec<Lookahead>| {
        let mut names: Vec<String> = set.into_iter()
            .map(|la| format!("{}", la.pretty(g)))
            .collect();
        names.sort();
        names
    };
    for nt in a.nonterminals() {
        let other = b.nonterminal_id(a.nonterminal_name(nt)).unwrap();
        assert_eq!(
            names(&a, aa.first()[nt].iter().collect()),
            names(&b, bb.first()[other].iter().collect())
        );
        assert_eq!(
            names(&a, aa.follow()[nt].iter().collect()),
            names(&b, bb.follow()[other].iter().collect())
        );
        assert_eq!(
            aa.nullable().is_nullable(nt),
            bb.nullable().is_nullable(other)
        );
    }
}

#[test]
fn undefined_symbol_policies() {
    let rules = vec![RawRule::new(
        "S",
        vec![RawSymbol::from("a"), RawSymbol::from("Undefined")],
    )];
    let lenient = Grammar::from_rules(&rules, &Config::default()).unwrap();
    assert!(lenient.terminal_id("Undefined").is_some());

    let strict = Config {
        undefined: UndefinedSymbols::Reject,
        terminals: vec!["a".into()],
    };
    assert_eq!(
        Grammar::from_rules(&rules, &strict),
        Err(GrammarError::DanglingReference {
            index: 0,
            name: "Undefined".into(),
        })
    );
}

#[test]
fn empty_grammar() {
    assert_eq!(
        Grammar::from_rules(&[], &Config::default()),
        Err(GrammarError::EmptyGrammar)
    );
}

#[test]
fn malformed_lines_do_not_abort() {
    let desc = loader::parse_str("S -> a A\nbroken line\nA -> b\n");
    assert_eq!(desc.malformed.len(), 1);
    let g = loader::make_grammar(&desc, &Config::default()).unwrap();
    let a = Analysis::compute(&g);
    assert_eq!(a.predict().iter().count(), 2);
    assert_eq!(
        a.predict()[RuleId::from_usize(1)]
            .iter()
            .collect::<Vec<_>>(),
        vec![Lookahead::Terminal(g.terminal_id("b").unwrap())]
    );
}

#[test]
fn conflicts_are_reported() {
    let g = load("S -> i E t S S' | a\nS' -> e S | ε\nE -> b");
    let a = Analysis::compute(&g);
    let conflicts = ParseTable::try_from(&g, a.predict()).unwrap_err();
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].nonterminal, g.nonterminal_id("S'").unwrap());
    assert_eq!(
        conflicts[0].rules,
        vec![RuleId::from_usize(2), RuleId::from_usize(3)]
    );
}
