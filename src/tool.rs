// Copyright (c) 2018 Fabian Schuiki
#[macro_use]
extern crate clap;
extern crate llsets;
#[macro_use]
extern crate log;
extern crate memmap;
extern crate stderrlog;

use std::error::Error;
use std::fs::File;
use std::path::Path;
use std::process;
use std::str;

use clap::{App, Arg, ArgMatches};
use llsets::Analysis;
use llsets::grammar::{Config, UndefinedSymbols};
use llsets::loader;
use llsets::output::{self, Glyphs};
use llsets::table::ParseTable;
use memmap::Mmap;

fn main() {
    let matches = App::new(crate_name!())
        .version(crate_version!())
        .author(crate_authors!())
        .about("Computes the nullable, first, follow, and predict sets of a grammar.")
        .arg(
            Arg::with_name("GRAMMAR")
                .help("The grammar description to analyze")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .takes_value(true)
                .value_name("DIR")
                .help("Directory to write first.txt, follow.txt, and predict.txt to"),
        )
        .arg(
            Arg::with_name("strict")
                .long("strict")
                .help("Reject symbols that are neither defined by a rule nor declared as token"),
        )
        .arg(
            Arg::with_name("check")
                .long("check")
                .help("Fail if the grammar is not LL(1)"),
        )
        .arg(
            Arg::with_name("epsilon")
                .long("epsilon")
                .takes_value(true)
                .value_name("GLYPH")
                .help("How to write the empty string [default: ε]"),
        )
        .arg(
            Arg::with_name("end")
                .long("end")
                .takes_value(true)
                .value_name("GLYPH")
                .help("How to write the end of input [default: $]"),
        )
        .arg(
            Arg::with_name("verbosity")
                .short("v")
                .multiple(true)
                .help("Increase message verbosity"),
        )
        .arg(
            Arg::with_name("quiet")
                .short("q")
                .help("Silence all output"),
        )
        .get_matches();

    stderrlog::new()
        .module(module_path!())
        .quiet(matches.is_present("quiet"))
        .verbosity(matches.occurrences_of("verbosity") as usize + 1)
        .init()
        .expect("unable to initialize logger");

    if let Err(e) = run(&matches) {
        error!("{}", e);
        process::exit(1);
    }
}

fn run(matches: &ArgMatches) -> Result<(), Box<dyn Error>> {
    let config = Config {
        undefined: if matches.is_present("strict") {
            UndefinedSymbols::Reject
        } else {
            UndefinedSymbols::Terminal
        },
        terminals: vec![],
    };
    let glyphs = {
        let default = Glyphs::default();
        let epsilon = matches.value_of("epsilon").unwrap_or(default.epsilon());
        let end = matches.value_of("end").unwrap_or(default.end());
        Glyphs::new(epsilon, end).ok_or_else(|| {
            format!("invalid glyphs `{}` and `{}`", epsilon, end)
        })?
    };

    // Load the grammar.
    let path = Path::new(matches.value_of("GRAMMAR").unwrap_or_default());
    let file = File::open(path).map_err(|e| format!("cannot open {}: {}", path.display(), e))?;
    let desc = if file.metadata()?.len() == 0 {
        loader::parse_str("")
    } else {
        let mmap = unsafe { Mmap::map(&file)? };
        loader::parse_str(str::from_utf8(&mmap)?)
    };
    let grammar = loader::make_grammar(&desc, &config)?;
    info!(
        "loaded {} rules over {} nonterminals and {} terminals",
        grammar.num_rules(),
        grammar.nonterminal_id_bound(),
        grammar.terminal_id_bound()
    );

    // Analyze the grammar.
    let analysis = Analysis::compute(&grammar);
    debug!("first sets:\n{}", analysis.first().pretty(&grammar));
    debug!("follow sets:\n{}", analysis.follow().pretty(&grammar));
    debug!("predict sets:\n{}", analysis.predict().pretty(&grammar));

    if matches.is_present("check") {
        match ParseTable::try_from(&grammar, analysis.predict()) {
            Ok(table) => info!("grammar is LL(1), {} table entries", table.entries().count()),
            Err(conflicts) => {
                for conflict in &conflicts {
                    error!("{}", conflict.pretty(&grammar));
                }
                return Err(format!("grammar is not LL(1), {} conflicts", conflicts.len()).into());
            }
        }
    }

    let dir = Path::new(matches.value_of("output").unwrap_or("."));
    output::write_files(dir, &grammar, &analysis, &glyphs)?;
    Ok(())
}
