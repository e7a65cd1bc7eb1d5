// Copyright (c) 2018 Fabian Schuiki

//! A grammar analyzer for LL(1) languages.
//!
//! Given the productions of a context-free grammar, this crate computes which
//! nonterminals are nullable, the first and follow sets of every nonterminal,
//! and the predict set of every production. The analysis itself performs no
//! I/O; the `loader` and `output` modules take care of reading grammar
//! descriptions and writing the results.

#![deny(missing_docs)]

extern crate bit_set;
extern crate indexmap;
#[macro_use]
extern crate log;

pub mod grammar;
pub mod lookahead;
pub mod nullable;
pub mod first;
pub mod follow;
pub mod predict;
pub mod analysis;
pub mod table;
pub mod lexer;
pub mod loader;
pub mod output;

pub use analysis::Analysis;

/// A pretty printer.
pub struct Pretty<C, T> {
    ctx: C,
    item: T,
}

impl<C, T> Pretty<C, T> {
    pub(crate) fn new(ctx: C, item: T) -> Pretty<C, T> {
        Pretty { ctx, item }
    }
}
