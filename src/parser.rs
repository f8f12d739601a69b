//! Recursive-descent parser for the concrete regular-expression syntax.
//!
//! The grammar is layered so that no production is left-recursive, lowest to
//! highest precedence:
//!
//! ```text
//! plus    := concat (' '* '+' ' '* plus)?
//! concat  := starred (' '* concat)?
//! starred := atom '*'?
//! atom    := ALNUM | 'λ' | '(' ' '* plus ' '* ')'
//! ```
//!
//! The parser works on raw bytes: the only non-ASCII input it accepts is the
//! two-byte UTF-8 encoding of λ, decoded byte by byte.

use std::rc::Rc;

use crate::error::ParseError;
use crate::letter::LAMBDA_BYTES;
use crate::regex::Regex;

/// Parse a complete expression. Trailing input beyond the expression fails.
pub(crate) fn parse(input: &str) -> Result<Rc<Regex>, ParseError> {
    let mut parser = Parser {
        input: input.as_bytes(),
        pos: 0,
    };
    parser.skip_spaces();
    let expression = parser.plus()?;
    parser.skip_spaces();
    if parser.pos != parser.input.len() {
        return Err(ParseError {
            position: parser.pos,
            expected: "end of input",
        });
    }
    Ok(expression)
}

struct Parser<'a> {
    input: &'a [u8],
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn skip_spaces(&mut self) {
        while self.peek() == Some(b' ') {
            self.pos += 1;
        }
    }

    fn at_atom_start(&self) -> bool {
        matches!(
            self.peek(),
            Some(b) if b.is_ascii_alphanumeric() || b == b'(' || b == LAMBDA_BYTES[0]
        )
    }

    /// `+`-separated concatenations, folded from the right.
    fn plus(&mut self) -> Result<Rc<Regex>, ParseError> {
        let left = self.concat()?;
        let mark = self.pos;
        self.skip_spaces();
        if self.peek() == Some(b'+') {
            self.pos += 1;
            self.skip_spaces();
            let right = self.plus()?;
            Ok(Regex::plus(left, right))
        } else {
            self.pos = mark;
            Ok(left)
        }
    }

    /// Juxtaposed starred atoms; spaces are permitted between operands.
    fn concat(&mut self) -> Result<Rc<Regex>, ParseError> {
        let left = self.starred()?;
        let mark = self.pos;
        self.skip_spaces();
        if self.at_atom_start() {
            let right = self.concat()?;
            Ok(Regex::concat(left, right))
        } else {
            self.pos = mark;
            Ok(left)
        }
    }

    /// An atom with an optional immediate postfix `*`.
    fn starred(&mut self) -> Result<Rc<Regex>, ParseError> {
        let atom = self.atom()?;
        if self.peek() == Some(b'*') {
            self.pos += 1;
            Ok(Regex::star(atom))
        } else {
            Ok(atom)
        }
    }

    fn atom(&mut self) -> Result<Rc<Regex>, ParseError> {
        match self.peek() {
            Some(b'(') => {
                self.pos += 1;
                self.skip_spaces();
                let inner = self.plus()?;
                self.skip_spaces();
                if self.peek() == Some(b')') {
                    self.pos += 1;
                    Ok(inner)
                } else {
                    Err(ParseError {
                        position: self.pos,
                        expected: "a closing parenthesis",
                    })
                }
            }
            Some(b) if b.is_ascii_alphanumeric() => {
                self.pos += 1;
                Ok(Regex::character(b as char))
            }
            Some(b) if b == LAMBDA_BYTES[0] => {
                if self.input.get(self.pos + 1).copied() == Some(LAMBDA_BYTES[1]) {
                    self.pos += 2;
                    Ok(Regex::empty())
                } else {
                    Err(ParseError {
                        position: self.pos,
                        expected: "the second byte of λ",
                    })
                }
            }
            _ => Err(ParseError {
                position: self.pos,
                expected: "an atom",
            }),
        }
    }
}
