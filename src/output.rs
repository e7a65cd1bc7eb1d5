// Copyright (c) 2018 Fabian Schuiki

//! Textual output of analysis results.
//!
//! Each set is written as a single line, starting with a key followed by the
//! members of the set, all separated by spaces. The key of a first or follow
//! set is the name of the nonterminal. The key of a predict set is the number
//! of the rule, counting from 1.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use analysis::Analysis;
use first::FirstSets;
use follow::FollowSets;
use grammar::Grammar;
use lookahead::Lookahead;
use predict::PredictSets;

/// The file names the results are written to.
pub const FIRST_FILE: &str = "first.txt";
/// See `FIRST_FILE`.
pub const FOLLOW_FILE: &str = "follow.txt";
/// See `FIRST_FILE`.
pub const PREDICT_FILE: &str = "predict.txt";

/// The glyphs used to render the pseudo-symbols.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Glyphs {
    epsilon: String,
    end: String,
}

impl Glyphs {
    /// Create a new set of glyphs.
    ///
    /// Returns `None` if either glyph is empty, contains whitespace, or if
    /// both are the same, since the output could not be read back then.
    pub fn new<S: Into<String>, T: Into<String>>(epsilon: S, end: T) -> Option<Glyphs> {
        let epsilon = epsilon.into();
        let end = end.into();
        let valid = |s: &str| !s.is_empty() && !s.contains(char::is_whitespace);
        if valid(epsilon.as_str()) && valid(end.as_str()) && epsilon != end {
            Some(Glyphs { epsilon, end })
        } else {
            None
        }
    }

    /// The glyph for the empty string.
    pub fn epsilon(&self) -> &str {
        &self.epsilon
    }

    /// The glyph for the end of input.
    pub fn end(&self) -> &str {
        &self.end
    }

    /// Check that no terminal of a grammar is written like one of the glyphs.
    ///
    /// Fails with `InvalidInput` otherwise, since the written sets could not
    /// be told apart from the pseudo-symbols.
    pub fn check(&self, grammar: &Grammar) -> io::Result<()> {
        for id in grammar.terminals() {
            let name = grammar.terminal_name(id);
            let marker = if name == self.epsilon {
                "the empty string"
            } else if name == self.end {
                "the end of input"
            } else {
                continue;
            };
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("terminal `{}` would be written like {}; choose another glyph", name, marker),
            ));
        }
        Ok(())
    }

    fn render<'a>(&'a self, grammar: &'a Grammar, lookahead: Lookahead) -> &'a str {
        match lookahead {
            Lookahead::Terminal(id) => grammar.terminal_name(id),
            Lookahead::Epsilon => &self.epsilon,
            Lookahead::End => &self.end,
        }
    }
}

impl Default for Glyphs {
    fn default() -> Glyphs {
        Glyphs {
            epsilon: "ε".into(),
            end: "$".into(),
        }
    }
}

/// Write one line per set.
fn write_line<W, I>(into: &mut W, key: &str, members: I, grammar: &Grammar, glyphs: &Glyphs) -> io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = Lookahead>,
{
    write!(into, "{}", key)?;
    for lookahead in members {
        write!(into, " {}", glyphs.render(grammar, lookahead))?;
    }
    write!(into, "\n")
}

/// Write the first sets of all nonterminals.
pub fn render_first<W: Write>(
    into: &mut W,
    grammar: &Grammar,
    first: &FirstSets,
    glyphs: &Glyphs,
) -> io::Result<()> {
    glyphs.check(grammar)?;
    for (id, fs) in first.iter() {
        write_line(into, grammar.nonterminal_name(id), fs.iter(), grammar, glyphs)?;
    }
    Ok(())
}

/// Write the follow sets of all nonterminals.
pub fn render_follow<W: Write>(
    into: &mut W,
    grammar: &Grammar,
    follow: &FollowSets,
    glyphs: &Glyphs,
) -> io::Result<()> {
    glyphs.check(grammar)?;
    for (id, fs) in follow.iter() {
        write_line(into, grammar.nonterminal_name(id), fs.iter(), grammar, glyphs)?;
    }
    Ok(())
}

/// Write the predict sets of all rules.
pub fn render_predict<W: Write>(
    into: &mut W,
    grammar: &Grammar,
    predict: &PredictSets,
    glyphs: &Glyphs,
) -> io::Result<()> {
    glyphs.check(grammar)?;
    for (id, ps) in predict.iter() {
        let key = format!("{}", id.as_usize() + 1);
        write_line(into, &key, ps.iter(), grammar, glyphs)?;
    }
    Ok(())
}

/// Write the first, follow, and predict sets into files in a directory.
///
/// Results of a previous run in the same directory are replaced. Nothing is
/// touched if a terminal collides with one of the glyphs.
pub fn write_files(dir: &Path, grammar: &Grammar, analysis: &Analysis, glyphs: &Glyphs) -> io::Result<()> {
    glyphs.check(grammar)?;
    write_file(&dir.join(FIRST_FILE), |f| {
        render_first(f, grammar, analysis.first(), glyphs)
    })?;
    write_file(&dir.join(FOLLOW_FILE), |f| {
        render_follow(f, grammar, analysis.follow(), glyphs)
    })?;
    write_file(&dir.join(PREDICT_FILE), |f| {
        render_predict(f, grammar, analysis.predict(), glyphs)
    })?;
    Ok(())
}

fn write_file<F>(path: &Path, render: F) -> io::Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> io::Result<()>,
{
    match fs::remove_file(path) {
        Ok(()) => debug!("removed stale {}", path.display()),
        Err(ref e) if e.kind() == io::ErrorKind::NotFound => (),
        Err(e) => return Err(e),
    }
    let mut f = BufWriter::new(File::create(path)?);
    render(&mut f)?;
    f.flush()?;
    info!("wrote {}", path.display());
    Ok(())
}
