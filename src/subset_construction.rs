//! Subset construction: converting an NFA to a DFA.

use indexmap::{IndexMap, IndexSet};
use log::trace;
use std::collections::HashMap;

use crate::automaton::{composite_name, Edge, FiniteAutomaton};
use crate::error::{FormlangError, Result};
use crate::state::{StateId, StateInterner, StateSet};

impl FiniteAutomaton {
    /// Convert an NFA to an equivalent DFA using the powerset construction.
    ///
    /// Fails on λ moves (eliminate them first); an already-deterministic
    /// automaton is returned as-is. DFA states are named
    /// `{sorted,comma-joined}` after their member sets. The traversal is a
    /// BFS from `{q₀}`, so subsets unreachable from the start are never
    /// generated.
    pub fn determinize(&self) -> Result<Self> {
        if self.has_lambda_moves() {
            return Err(FormlangError::precondition(
                "determinize",
                "only callable on an automaton without λ moves",
            ));
        }
        if self.is_deterministic() {
            return Ok(self.clone());
        }

        // Subsets of Q become bit sets over interned ids.
        let mut interner = StateInterner::new();
        for state in self.states() {
            interner.get_or_intern(state);
        }
        let capacity = interner.len();

        let mut moves: HashMap<(StateId, char), StateSet> = HashMap::new();
        let mut alphabet: Vec<char> = Vec::new();
        for edge in self.edges() {
            let Some(c) = edge.letter else { continue };
            let source = interner.get_or_intern(&edge.start);
            let target = interner.get_or_intern(&edge.end);
            moves
                .entry((source, c))
                .or_insert_with(|| StateSet::with_capacity(capacity))
                .insert(target);
            if !alphabet.contains(&c) {
                alphabet.push(c);
            }
        }
        alphabet.sort_unstable();

        let mut accepting_ids = StateSet::with_capacity(capacity);
        for accepting in self.accepting_states() {
            accepting_ids.insert(interner.get_or_intern(accepting));
        }

        let mut states: IndexSet<String> = IndexSet::new();
        let mut accepting: IndexSet<String> = IndexSet::new();
        let mut edges: IndexSet<Edge> = IndexSet::new();

        // Each discovered subset is registered exactly once, keyed by its
        // canonical member-id vector.
        let mut subset_names: IndexMap<Vec<StateId>, String> = IndexMap::new();

        let start_id = interner.get_or_intern(self.start_state());
        let start_set = StateSet::singleton(start_id, capacity);
        let start_name = subset_name(&interner, &start_set);
        subset_names.insert(start_set.to_vec(), start_name.clone());

        let mut worklist: Vec<(StateSet, String)> = vec![(start_set, start_name.clone())];

        while let Some((current, current_name)) = worklist.pop() {
            if current.intersects(&accepting_ids) {
                accepting.insert(current_name.clone());
            }
            states.insert(current_name.clone());

            for &c in &alphabet {
                let mut successor = StateSet::with_capacity(capacity);
                for id in current.iter() {
                    if let Some(targets) = moves.get(&(id, c)) {
                        successor.union_with(targets);
                    }
                }
                if successor.is_empty() {
                    continue;
                }

                let key = successor.to_vec();
                let successor_name = if let Some(existing) = subset_names.get(&key) {
                    existing.clone()
                } else {
                    let name = subset_name(&interner, &successor);
                    subset_names.insert(key, name.clone());
                    worklist.push((successor, name.clone()));
                    name
                };

                edges.insert(Edge::new(current_name.clone(), successor_name, Some(c)));
            }
        }
        trace!("subset construction discovered {} states", states.len());

        Ok(Self::assemble(states, start_name, accepting, edges))
    }
}

fn subset_name(interner: &StateInterner, subset: &StateSet) -> String {
    composite_name(subset.iter().map(|id| interner.name_of(id)))
}
