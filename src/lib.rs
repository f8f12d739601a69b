//! Transformations between representations of regular languages.
//!
//! This crate converts between regular expressions and finite automata
//! (λ-NFAs, NFAs and DFAs) and provides:
//! - Regular-expression parsing into an immutable expression tree
//! - Thompson construction (RE → λNFA)
//! - λ-closure elimination (λNFA → NFA)
//! - Subset construction (NFA → DFA)
//! - DFA minimization by partition refinement
//! - Generalized-NFA state elimination (DFA → RE)
//! - DFA complementation and string matching
//! - Structural isomorphism and language equivalence
//! - Graphviz / LaTeX renderers for automata and expressions
//!
//! Every transformation is a pure function producing a new artifact;
//! inputs are never mutated. The typical pipeline:
//!
//! ```
//! use formlang::{FiniteAutomaton, Regex};
//!
//! let re = Regex::from_expression("a(ba)*")?;
//! let minimum = FiniteAutomaton::from_regex(&re)
//!     .eliminate_lambda_moves()
//!     .determinize()?
//!     .minimize()?;
//! assert!(minimum.matches("aba")?);
//! assert!(!minimum.matches("ab")?);
//! # Ok::<(), formlang::FormlangError>(())
//! ```

mod automaton;
mod complement;
mod equivalence;
mod error;
mod export;
mod lambda_elimination;
mod letter;
mod minimize;
mod parser;
mod regex;
mod state;
mod state_elimination;
mod subset_construction;
mod thompson;

pub use automaton::{Edge, FiniteAutomaton};
pub use error::{FormlangError, ParseError, Result};
pub use letter::{is_lambda, Letter, LAMBDA};
pub use regex::Regex;
