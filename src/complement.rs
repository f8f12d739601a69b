//! DFA complementation.

use indexmap::{IndexMap, IndexSet};

use crate::automaton::{Edge, FiniteAutomaton};
use crate::error::{FormlangError, Result};

// Sink outside the `create` name namespace.
const SINK: &str = "$EMPTY";

impl FiniteAutomaton {
    /// Complement a DFA.
    ///
    /// The alphabet is derived from the characters actually appearing on
    /// edges; a letter intended for the automaton but never used gains no
    /// transitions here. When the automaton is not total, a fresh `$EMPTY`
    /// sink absorbs every missing transition first; then the accepting flag
    /// is flipped on every state.
    pub fn complement(&self) -> Result<Self> {
        if !self.is_deterministic() {
            return Err(FormlangError::precondition(
                "complement",
                "only callable on a deterministic automaton",
            ));
        }

        // letter -> states that already transition on it
        let mut present: IndexMap<char, IndexSet<String>> = IndexMap::new();
        for edge in self.edges() {
            if let Some(c) = edge.letter {
                present.entry(c).or_default().insert(edge.start.clone());
            }
        }

        let mut states = self.states().clone();
        let mut edges = self.edges().clone();

        // a deterministic automaton is total exactly when every state has
        // one edge per derived letter
        if self.edges().len() != self.states().len() * present.len() {
            states.insert(SINK.to_string());
            for (letter, transitioning) in &present {
                for state in &states {
                    if !transitioning.contains(state) {
                        edges.insert(Edge::new(state.clone(), SINK, Some(*letter)));
                    }
                }
            }
        }

        let accepting: IndexSet<String> = states
            .iter()
            .filter(|state| !self.accepting_states().contains(*state))
            .cloned()
            .collect();

        Ok(Self::assemble(states, self.start_state().to_string(), accepting, edges))
    }
}
