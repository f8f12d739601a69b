//! Structural isomorphism and language equivalence.

use std::collections::VecDeque;

use indexmap::IndexSet;
use log::trace;

use crate::automaton::FiniteAutomaton;
use crate::error::{FormlangError, Result};

impl FiniteAutomaton {
    /// Lock-step BFS structural check for DFAs.
    ///
    /// Both traversals start at the start states and advance together: a
    /// mismatch in acceptance, in visited status or in the sorted outgoing
    /// letter sets rejects. States unreachable from the start states are
    /// never inspected. This is a sufficient check for DFAs with isomorphic
    /// reachable components, not a general graph-isomorphism test; compare
    /// minimum DFAs when deciding languages.
    pub fn is_isomorphic(first: &Self, second: &Self) -> Result<bool> {
        if !first.is_deterministic() || !second.is_deterministic() {
            return Err(FormlangError::precondition(
                "is_isomorphic",
                "only callable on deterministic automata",
            ));
        }

        let mut visited_first: IndexSet<String> = IndexSet::new();
        let mut visited_second: IndexSet<String> = IndexSet::new();

        let mut queue_first: VecDeque<String> = VecDeque::from([first.start_state().to_string()]);
        let mut queue_second: VecDeque<String> = VecDeque::from([second.start_state().to_string()]);

        while let (Some(current_first), Some(current_second)) =
            (queue_first.pop_front(), queue_second.pop_front())
        {
            if first.accepting_states().contains(&current_first)
                != second.accepting_states().contains(&current_second)
            {
                return Ok(false);
            }

            let seen_first = visited_first.contains(&current_first);
            let seen_second = visited_second.contains(&current_second);
            if seen_first != seen_second {
                return Ok(false);
            }
            if seen_first {
                continue;
            }
            visited_first.insert(current_first.clone());
            visited_second.insert(current_second.clone());

            // enqueue order must pair up, so both sides walk their letters
            // in the same sorted order
            let letters_first = first.outgoing_letters(&current_first);
            let letters_second = second.outgoing_letters(&current_second);
            if letters_first != letters_second {
                return Ok(false);
            }

            for letter in letters_first {
                let target_first = first.single_target(&current_first, letter).ok_or_else(|| {
                    FormlangError::index("is_isomorphic", "outgoing letter without a target")
                })?;
                let target_second = second.single_target(&current_second, letter).ok_or_else(|| {
                    FormlangError::index("is_isomorphic", "outgoing letter without a target")
                })?;
                queue_first.push_back(target_first.to_string());
                queue_second.push_back(target_second.to_string());
            }
        }

        Ok(true)
    }

    /// Decide whether two automata (of any shape) accept the same language:
    /// normalize both to minimum DFAs, then compare structurally.
    pub fn language_equivalent(first: &Self, second: &Self) -> Result<bool> {
        let first_minimum = first.eliminate_lambda_moves().determinize()?.minimize()?;
        let second_minimum = second.eliminate_lambda_moves().determinize()?.minimize()?;
        trace!(
            "language equivalence: comparing minima with {} and {} states",
            first_minimum.states().len(),
            second_minimum.states().len()
        );
        Self::is_isomorphic(&first_minimum, &second_minimum)
    }
}
