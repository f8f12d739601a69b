//! Regular expression trees.

use std::fmt;
use std::rc::Rc;

use crate::error::Result;
use crate::parser;

/// An immutable regular expression over single characters and λ.
///
/// Subtrees are shared: the composite constructors take reference-counted
/// operands, so any subtree may be referenced from multiple parents. Values
/// are never mutated after construction and cycles are impossible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Regex {
    /// The language {λ}.
    Empty,
    /// The language {c}.
    Character(char),
    /// Concatenation L(l)·L(r).
    Concat(Rc<Regex>, Rc<Regex>),
    /// Union L(l) ∪ L(r).
    Plus(Rc<Regex>, Rc<Regex>),
    /// Kleene closure L(inner)*.
    Star(Rc<Regex>),
}

impl Regex {
    /// The expression denoting the empty word.
    pub fn empty() -> Rc<Regex> {
        Rc::new(Regex::Empty)
    }

    /// A single-character expression.
    pub fn character(c: char) -> Rc<Regex> {
        Rc::new(Regex::Character(c))
    }

    /// Concatenate two expressions. `Empty` operands are absorbed, so the
    /// empty word never appears as a concatenation operand.
    pub fn concat(left: Rc<Regex>, right: Rc<Regex>) -> Rc<Regex> {
        if matches!(*left, Regex::Empty) {
            return right;
        }
        if matches!(*right, Regex::Empty) {
            return left;
        }
        Rc::new(Regex::Concat(left, right))
    }

    /// The union of two expressions.
    pub fn plus(left: Rc<Regex>, right: Rc<Regex>) -> Rc<Regex> {
        Rc::new(Regex::Plus(left, right))
    }

    /// The Kleene closure of an expression.
    pub fn star(inner: Rc<Regex>) -> Rc<Regex> {
        Rc::new(Regex::Star(inner))
    }

    /// Parse the concrete expression syntax.
    ///
    /// Operators in increasing precedence: union `+`, concatenation by
    /// juxtaposition, postfix `*` on an atom. Atoms are alphanumeric ASCII
    /// characters, the two-byte λ symbol, and parenthesized expressions.
    /// ASCII spaces are permitted around and between operands. The whole
    /// input must be consumed.
    pub fn from_expression(input: &str) -> Result<Rc<Regex>> {
        Ok(parser::parse(input)?)
    }
}

impl fmt::Display for Regex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Regex::Empty => write!(f, "λ"),
            Regex::Character(c) => write!(f, "{c}"),
            Regex::Plus(left, right) => write!(f, "{left}+{right}"),
            Regex::Concat(left, right) => {
                // union operands bind looser than juxtaposition and need grouping
                if matches!(**left, Regex::Plus(..)) {
                    write!(f, "({left})")?;
                } else {
                    write!(f, "{left}")?;
                }
                if matches!(**right, Regex::Plus(..)) {
                    write!(f, "({right})")
                } else {
                    write!(f, "{right}")
                }
            }
            Regex::Star(inner) => {
                if matches!(**inner, Regex::Plus(..) | Regex::Concat(..)) {
                    write!(f, "({inner})*")
                } else {
                    write!(f, "{inner}*")
                }
            }
        }
    }
}
