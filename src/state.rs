//! Interned state ids and bit-set state collections.
//!
//! State names are strings throughout the public model; the subset
//! construction interns them into dense ids so that subsets of states become
//! cheap bit sets.

use fixedbitset::FixedBitSet;
use indexmap::IndexSet;
use std::fmt;

/// Dense identifier for an interned state name.
pub(crate) type StateId = u32;

/// A set of interned states implemented using a fixed-size bit set.
#[derive(Clone, PartialEq, Eq)]
pub(crate) struct StateSet {
    bits: FixedBitSet,
}

impl StateSet {
    /// Create a new empty state set with the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bits: FixedBitSet::with_capacity(capacity),
        }
    }

    /// Create a state set containing a single state.
    pub fn singleton(state: StateId, capacity: usize) -> Self {
        let mut set = Self::with_capacity(capacity);
        set.insert(state);
        set
    }

    /// Insert a state into the set.
    pub fn insert(&mut self, state: StateId) {
        let idx = state as usize;
        if idx >= self.bits.len() {
            self.bits.grow(idx + 1);
        }
        self.bits.insert(idx);
    }

    /// Check if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.bits.is_clear()
    }

    /// Iterate over all states in the set, in id order.
    pub fn iter(&self) -> impl Iterator<Item = StateId> + '_ {
        self.bits.ones().map(|i| i as StateId)
    }

    /// Union this set with another, modifying self in place.
    pub fn union_with(&mut self, other: &StateSet) {
        if other.bits.len() > self.bits.len() {
            self.bits.grow(other.bits.len());
        }
        self.bits.union_with(&other.bits);
    }

    /// Check if this set intersects with another.
    pub fn intersects(&self, other: &StateSet) -> bool {
        self.bits.intersection(&other.bits).next().is_some()
    }

    /// Canonical representation usable as a map key.
    pub fn to_vec(&self) -> Vec<StateId> {
        self.iter().collect()
    }
}

impl fmt::Debug for StateSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Bidirectional mapping between state names and dense ids.
#[derive(Debug, Default)]
pub(crate) struct StateInterner {
    names: IndexSet<String>,
}

impl StateInterner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the id for a name, interning it if unseen.
    pub fn get_or_intern(&mut self, name: &str) -> StateId {
        if let Some(index) = self.names.get_index_of(name) {
            return index as StateId;
        }
        let (index, _) = self.names.insert_full(name.to_string());
        index as StateId
    }

    /// The name behind an id. Ids come from [`Self::get_or_intern`], so an
    /// out-of-range id is a builder bug.
    pub fn name_of(&self, id: StateId) -> &str {
        &self.names[id as usize]
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }
}
