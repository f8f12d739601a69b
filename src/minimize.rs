//! DFA minimization by partition refinement.

use indexmap::{IndexMap, IndexSet};
use log::trace;
use std::collections::{BTreeMap, HashMap};

use crate::automaton::{composite_name, Edge, FiniteAutomaton};
use crate::error::{FormlangError, Result};
use crate::letter::Letter;

/// A state's letter → class-of-successor map. Within one acceptance family,
/// two states with equal signatures cannot be told apart by one more input
/// letter.
type Signature = BTreeMap<Letter, usize>;

impl FiniteAutomaton {
    /// Compute the minimum DFA, restricted to states reachable from the
    /// start state.
    ///
    /// Partition refinement: start from the accepting / non-accepting split
    /// and regroup by signature until the number of classes stops growing.
    /// The result's states are named `{sorted members}` after their
    /// equivalence classes.
    pub fn minimize(&self) -> Result<Self> {
        if !self.is_deterministic() {
            return Err(FormlangError::precondition(
                "minimize",
                "only callable on a deterministic automaton",
            ));
        }

        let class_indexes = self.equivalence_class_indexes()?;

        let mut classes: IndexMap<usize, IndexSet<String>> = IndexMap::new();
        for (state, index) in &class_indexes {
            classes.entry(*index).or_default().insert(state.clone());
        }

        let mut states: IndexSet<String> = IndexSet::new();
        let mut start_state: Option<String> = None;
        let mut accepting: IndexSet<String> = IndexSet::new();
        let mut edges: IndexSet<Edge> = IndexSet::new();

        // Any member works as the representative of its class; take the
        // smallest for reproducible output.
        for members in classes.values() {
            let Some(representative) = members.iter().min() else {
                continue;
            };
            let name = class_name(members);

            states.insert(name.clone());
            if members.contains(self.start_state()) {
                start_state = Some(name.clone());
            }
            if self.accepting_states().contains(representative) {
                accepting.insert(name.clone());
            }

            if let Some(transitions) = self.transitions_from(representative) {
                for (letter, endpoints) in transitions {
                    let Some(endpoint) = endpoints.first() else {
                        continue;
                    };
                    let endpoint_class = class_indexes.get(endpoint).ok_or_else(|| {
                        FormlangError::index("minimize", format!("state {endpoint} has no equivalence class"))
                    })?;
                    let endpoint_members = classes.get(endpoint_class).ok_or_else(|| {
                        FormlangError::index("minimize", format!("equivalence class {endpoint_class} is empty"))
                    })?;
                    edges.insert(Edge::new(name.clone(), class_name(endpoint_members), *letter));
                }
            }
        }

        let start_state = start_state.ok_or_else(|| {
            FormlangError::index("minimize", "no equivalence class contains the start state")
        })?;

        Ok(Self::assemble(states, start_state, accepting, edges))
    }

    /// Assign every reachable state the index of its equivalence class.
    ///
    /// Restricting to reachable states both prunes dead inputs and is what
    /// makes the result minimal: unreachable states would otherwise form
    /// classes of their own.
    fn equivalence_class_indexes(&self) -> Result<HashMap<String, usize>> {
        let reachable = self.transitive_successors(self.start_state());

        let mut class_indexes: HashMap<String, usize> = HashMap::new();
        for state in &reachable {
            class_indexes.insert(state.clone(), usize::from(self.accepting_states().contains(state)));
        }

        let mut class_count = 2usize;
        loop {
            // split the accepting and non-accepting families separately so
            // a class never mixes acceptance
            let mut accepting_groups: IndexMap<Signature, IndexSet<String>> = IndexMap::new();
            let mut rejecting_groups: IndexMap<Signature, IndexSet<String>> = IndexMap::new();

            for state in &reachable {
                let mut signature = Signature::new();
                if let Some(transitions) = self.transitions_from(state) {
                    for (letter, endpoints) in transitions {
                        let Some(endpoint) = endpoints.first() else {
                            continue;
                        };
                        let index = class_indexes.get(endpoint).copied().ok_or_else(|| {
                            FormlangError::index(
                                "minimize",
                                format!("successor {endpoint} of reachable state {state} has no class"),
                            )
                        })?;
                        signature.insert(*letter, index);
                    }
                }

                let family = if self.accepting_states().contains(state) {
                    &mut accepting_groups
                } else {
                    &mut rejecting_groups
                };
                family.entry(signature).or_default().insert(state.clone());
            }

            // a further split always grows the class count, so an unchanged
            // count means the partition is stable
            let new_class_count = accepting_groups.len() + rejecting_groups.len();
            if new_class_count == class_count {
                return Ok(class_indexes);
            }
            class_count = new_class_count;
            trace!("minimize: refined to {class_count} classes");

            let mut next_index = 0usize;
            for group in accepting_groups.values().chain(rejecting_groups.values()) {
                for state in group {
                    class_indexes.insert(state.clone(), next_index);
                }
                next_index += 1;
            }
        }
    }
}

fn class_name(members: &IndexSet<String>) -> String {
    composite_name(members.iter().map(String::as_str))
}
