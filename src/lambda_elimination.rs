//! λ-closure elimination: turning a λNFA into a plain NFA.

use indexmap::IndexSet;
use log::trace;

use crate::automaton::{Edge, FiniteAutomaton};
use crate::letter::LAMBDA;

impl FiniteAutomaton {
    /// Produce a language-equivalent automaton without λ moves.
    ///
    /// Every state that can reach an accepting state through λ moves alone
    /// becomes accepting, and every non-λ edge `x -c-> y` is fanned out to
    /// all pairs of a λ-ancestor of `x` and a λ-descendant of `y`. The state
    /// set and the start state are unchanged. An automaton that already has
    /// no λ moves is returned as-is.
    pub fn eliminate_lambda_moves(&self) -> Self {
        if !self.has_lambda_moves() {
            return self.clone();
        }

        let mut accepting: IndexSet<String> = IndexSet::new();
        for accepting_state in self.accepting_states() {
            accepting.extend(self.transitive_predecessors_on(accepting_state, LAMBDA));
        }

        let mut edges: IndexSet<Edge> = IndexSet::new();
        for edge in self.edges() {
            if edge.letter.is_none() {
                continue;
            }
            let sources = self.transitive_predecessors_on(&edge.start, LAMBDA);
            let targets = self.transitive_successors_on(&edge.end, LAMBDA);
            for source in &sources {
                for target in &targets {
                    edges.insert(Edge::new(source.clone(), target.clone(), edge.letter));
                }
            }
        }
        trace!(
            "lambda elimination: {} edges in, {} edges out",
            self.edges().len(),
            edges.len()
        );

        Self::assemble(
            self.states().clone(),
            self.start_state().to_string(),
            accepting,
            edges,
        )
    }
}
