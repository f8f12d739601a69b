//! Generalized-NFA state elimination: reading a regular expression off an
//! automaton.

use indexmap::IndexSet;
use std::collections::HashMap;
use std::rc::Rc;

use crate::automaton::{Edge, FiniteAutomaton};
use crate::letter::LAMBDA;
use crate::regex::Regex;

// Outside the `create` name namespace, so they cannot collide with user
// states.
const GNFA_START: &str = "$START";
const GNFA_ACCEPT: &str = "$ACCEPT";

/// `[start][end] -> label`, with parallel edges already folded into one
/// expression per state pair.
type LabelTable = HashMap<String, HashMap<String, Rc<Regex>>>;

impl FiniteAutomaton {
    /// Wrap the automaton with a unique non-reenterable source and a unique
    /// non-leaving sink: λ from `$START` to the old start, λ from every old
    /// accepting state to `$ACCEPT`.
    fn generalized_nfa(&self) -> Self {
        let mut states = self.states().clone();
        states.insert(GNFA_START.to_string());
        states.insert(GNFA_ACCEPT.to_string());

        let mut edges = self.edges().clone();
        edges.insert(Edge::new(GNFA_START, self.start_state(), LAMBDA));
        for accepting in self.accepting_states() {
            edges.insert(Edge::new(accepting.clone(), GNFA_ACCEPT, LAMBDA));
        }

        let mut accepting = IndexSet::new();
        accepting.insert(GNFA_ACCEPT.to_string());

        Self::assemble(states, GNFA_START.to_string(), accepting, edges)
    }

    /// Compute a regular expression denoting the automaton's language.
    ///
    /// Works on any λNFA. Edges of the generalized NFA carry expression
    /// labels (λ edges become `Empty`); every internal state is spliced out
    /// in turn, joining each incoming label to each outgoing label around a
    /// starred self-loop. The result is the label of the one surviving edge
    /// `$START → $ACCEPT`. The elimination order changes the shape of the
    /// expression but never its language.
    pub fn to_regex(&self) -> Rc<Regex> {
        let renfa = self.generalized_nfa();

        let mut labels: LabelTable = HashMap::new();
        let mut inverted_labels: LabelTable = HashMap::new();

        for edge in renfa.edges() {
            let edge_re = match edge.letter {
                Some(c) => Regex::character(c),
                None => Regex::empty(),
            };
            let combined = match lookup(&labels, &edge.start, &edge.end) {
                Some(existing) => Regex::plus(existing.clone(), edge_re),
                None => edge_re,
            };
            labels
                .entry(edge.start.clone())
                .or_default()
                .insert(edge.end.clone(), combined.clone());
            inverted_labels
                .entry(edge.end.clone())
                .or_default()
                .insert(edge.start.clone(), combined);
        }

        // The wrap above collapsed the accepting set to a single sink; read
        // it back out rather than assuming the name.
        let sink = renfa
            .accepting_states()
            .first()
            .cloned()
            .unwrap_or_else(|| GNFA_ACCEPT.to_string());

        let mut internal = renfa.states().clone();
        internal.shift_remove(renfa.start_state());
        internal.shift_remove(&sink);

        for state in &internal {
            let self_loop = match lookup(&labels, state, state) {
                Some(label) => Regex::star(label.clone()),
                None => Regex::empty(),
            };

            let mut incoming = inverted_labels.get(state).cloned().unwrap_or_default();
            let mut outgoing = labels.get(state).cloned().unwrap_or_default();
            incoming.remove(state);
            outgoing.remove(state);

            // one new edge joining every in-edge to every out-edge
            for (source, left) in &incoming {
                let left_with_loop = Regex::concat(left.clone(), self_loop.clone());
                for (target, right) in &outgoing {
                    let spliced = Regex::concat(left_with_loop.clone(), right.clone());
                    let combined = match lookup(&labels, source, target) {
                        Some(existing) => Regex::plus(existing.clone(), spliced),
                        None => spliced,
                    };
                    labels
                        .entry(source.clone())
                        .or_default()
                        .insert(target.clone(), combined.clone());
                    inverted_labels
                        .entry(target.clone())
                        .or_default()
                        .insert(source.clone(), combined);
                }
            }

            labels.remove(state);
            inverted_labels.remove(state);
            for source in incoming.keys() {
                if let Some(row) = labels.get_mut(source) {
                    row.remove(state.as_str());
                }
            }
            for target in outgoing.keys() {
                if let Some(row) = inverted_labels.get_mut(target) {
                    row.remove(state.as_str());
                }
            }
        }

        lookup(&labels, renfa.start_state(), &sink)
            .cloned()
            .unwrap_or_else(Regex::empty)
    }
}

fn lookup<'a>(table: &'a LabelTable, start: &str, end: &str) -> Option<&'a Rc<Regex>> {
    table.get(start)?.get(end)
}
