// Copyright (c) 2018 Fabian Schuiki

//! A lexer for grammar descriptions.
//!
//! Grammar descriptions are line based, so unlike other whitespace, line
//! breaks are reported as tokens.

use std::iter::Peekable;

/// The tokens that may appear in a grammar description.
#[allow(missing_docs)]
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Token {
    Keyword(Keyword),
    Ident(String),
    /// A quoted name missing its closing quote before the end of the line.
    Unclosed(String),
    Arrow,
    Pipe,
    Newline,
}

impl Token {
    /// Return the name this token has when used as a grammar symbol.
    ///
    /// Keywords are only special at certain positions. Elsewhere they are
    /// regular identifiers.
    pub fn symbol_name(&self) -> Option<String> {
        match *self {
            Token::Ident(ref i) => Some(i.clone()),
            Token::Keyword(Keyword::Token) => Some("token".into()),
            _ => None,
        }
    }
}

/// The keywords that may appear in a grammar description.
#[allow(missing_docs)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Keyword {
    Token,
    Epsilon,
}

/// A lexer for grammar descriptions.
pub struct Lexer<T: Iterator<Item = (usize, char)>> {
    input: Peekable<T>,
    pending: Option<(usize, usize, Token)>,
}

impl<T: Iterator<Item = (usize, char)>> Lexer<T> {
    /// Create a new lexer.
    pub fn new(input: T) -> Lexer<T> {
        Lexer {
            input: input.peekable(),
            pending: None,
        }
    }
}

/// Return the next input character that is not whitespace, skipping comments.
///
/// Line breaks are returned, including the one terminating a single-line
/// comment.
fn next_relevant<I: Iterator<Item = (usize, char)>>(
    input: &mut Peekable<I>,
) -> Option<(usize, char)> {
    'outer: while let Some((p, c)) = input.next() {
        if c == '/' {
            match input.peek() {
                Some(&(_, '/')) => {
                    input.next();
                    while let Some(&(_, c)) = input.peek() {
                        if c == '\n' {
                            continue 'outer;
                        }
                        input.next();
                    }
                    return None; // end of input reached
                }
                Some(&(_, '*')) => {
                    input.next();
                    while let Some((_, c)) = input.next() {
                        if c != '*' {
                            continue;
                        }
                        if let Some(&(_, c)) = input.peek() {
                            if c == '/' {
                                input.next();
                                continue 'outer;
                            }
                        }
                    }
                    return None; // end of input reached
                }
                _ => (),
            }
        }
        if c == '\n' || !c.is_whitespace() {
            return Some((p, c));
        }
    }
    None
}

/// Checks whether a character terminates an identifier.
fn is_symbol(c: char) -> bool {
    match c {
        '|' | '→' | '⟶' => true,
        _ => c.is_whitespace(),
    }
}

impl<T: Iterator<Item = (usize, char)>> Iterator for Lexer<T> {
    type Item = (usize, usize, Token);

    fn next(&mut self) -> Option<(usize, usize, Token)> {
        if let Some(pending) = self.pending.take() {
            return Some(pending);
        }

        // Fetch the first character and see what we can do with it.
        let (sp, sc) = match next_relevant(&mut self.input) {
            Some(x) => x,
            None => return None,
        };
        let mut sl = sp + sc.len_utf8();
        let tkn = match sc {
            '\n' => Token::Newline,
            '|' => Token::Pipe,
            '→' | '⟶' => Token::Arrow,
            '\'' => {
                let mut buffer = String::new();
                buffer.push(sc);
                let mut escaped = false;
                let mut closed = false;
                while let Some(&(ep, ec)) = self.input.peek() {
                    if ec == '\n' {
                        break;
                    }
                    self.input.next();
                    escaped = if buffer.ends_with('\\') && !escaped {
                        buffer.pop();
                        true
                    } else {
                        false
                    };
                    buffer.push(ec);
                    sl = ep + ec.len_utf8();
                    if ec == '\'' && !escaped {
                        closed = true;
                        break;
                    }
                }
                if closed {
                    Token::Ident(buffer)
                } else {
                    Token::Unclosed(buffer)
                }
            }
            '-' if self.input.peek().map(|&(_, c)| c) == Some('>') => {
                self.input.next();
                sl += 1;
                Token::Arrow
            }
            _ => {
                let mut buffer = String::new();
                buffer.push(sc);
                while let Some(&(ep, ec)) = self.input.peek() {
                    if is_symbol(ec) {
                        break;
                    }
                    self.input.next();
                    // An arrow directly following the identifier, as in
                    // `A->b`, ends it.
                    if ec == '>' && buffer.ends_with('-') {
                        buffer.pop();
                        self.pending = Some((ep - 1, ep + 1, Token::Arrow));
                        break;
                    }
                    buffer.push(ec);
                    sl = ep + ec.len_utf8();
                }
                if self.pending.is_some() {
                    sl -= 1;
                }
                match buffer.as_str() {
                    "token" => Token::Keyword(Keyword::Token),
                    "epsilon" | "ε" => Token::Keyword(Keyword::Epsilon),
                    _ => Token::Ident(buffer),
                }
            }
        };
        Some((sp, sl, tkn))
    }
}
