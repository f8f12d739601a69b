//! Thompson construction of a λNFA from a regular expression.

use indexmap::IndexSet;

use crate::automaton::{Edge, FiniteAutomaton};
use crate::letter::{Letter, LAMBDA};
use crate::regex::Regex;

const ROOT: &str = "START";

impl FiniteAutomaton {
    /// Build a λNFA accepting exactly L(`re`).
    ///
    /// Sub-expressions are spliced in inductively: for a sub-expression
    /// entered at state `s` the builder appends fresh states and edges and
    /// returns the terminal state `t` such that the words labelling paths
    /// `s → t` are exactly the sub-expression's language. The single
    /// accepting state is the terminal of the whole expression. The result
    /// is canonicalized with [`Self::compress_names`] for stable, readable
    /// names.
    pub fn from_regex(re: &Regex) -> Self {
        let mut builder = ThompsonBuilder::new();
        let accepting = builder.add(re, ROOT);

        let mut accepting_states = IndexSet::new();
        accepting_states.insert(accepting);

        Self::assemble(builder.states, ROOT.to_string(), accepting_states, builder.edges).compress_names()
    }
}

/// Scratch automaton mutated while splicing sub-expressions; released once
/// the construction returns.
struct ThompsonBuilder {
    states: IndexSet<String>,
    edges: IndexSet<Edge>,
}

impl ThompsonBuilder {
    fn new() -> Self {
        let mut states = IndexSet::new();
        states.insert(ROOT.to_string());
        Self {
            states,
            edges: IndexSet::new(),
        }
    }

    /// Splice `re` in starting at `root`; returns the terminal state.
    fn add(&mut self, re: &Regex, root: &str) -> String {
        match re {
            Regex::Empty => self.add_leaf(root, LAMBDA),
            Regex::Character(c) => self.add_leaf(root, Some(*c)),
            Regex::Concat(left, right) => {
                let middle = self.add(left, root);
                self.add(right, &middle)
            }
            Regex::Plus(left, right) => {
                let branch0 = format!("{root}-b0");
                let branch1 = format!("{root}-b1");
                self.states.insert(branch0.clone());
                self.states.insert(branch1.clone());
                self.edges.insert(Edge::new(root, branch0.clone(), LAMBDA));
                self.edges.insert(Edge::new(root, branch1.clone(), LAMBDA));

                let end0 = self.add(left, &branch0);
                let end1 = self.add(right, &branch1);

                let combine = format!("{root}-c");
                self.states.insert(combine.clone());
                self.edges.insert(Edge::new(end0, combine.clone(), LAMBDA));
                self.edges.insert(Edge::new(end1, combine.clone(), LAMBDA));
                combine
            }
            Regex::Star(inner) => {
                let terminal = self.add(inner, root);
                // λ both ways: skip the body entirely, or loop back around it
                self.edges.insert(Edge::new(root, terminal.clone(), LAMBDA));
                self.edges.insert(Edge::new(terminal.clone(), root, LAMBDA));
                terminal
            }
        }
    }

    fn add_leaf(&mut self, root: &str, letter: Letter) -> String {
        let next = format!("{root}-c");
        self.states.insert(next.clone());
        self.edges.insert(Edge::new(root, next.clone(), letter));
        next
    }
}
