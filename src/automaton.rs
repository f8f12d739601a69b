//! The finite-automaton model shared by every transformation.

use indexmap::IndexSet;
use std::collections::{HashMap, VecDeque};
use std::fmt;

use crate::error::{FormlangError, Result};
use crate::letter::{letter_text, Letter, LAMBDA};

/// A directed transition between two named states. The letter is `None` for
/// a λ move. Edges are value types; parallel equal edges collapse because
/// the automaton stores them in a set.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Edge {
    pub start: String,
    pub end: String,
    pub letter: Letter,
}

impl Edge {
    pub fn new(start: impl Into<String>, end: impl Into<String>, letter: Letter) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            letter,
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "From {} via {} to {}",
            self.start,
            letter_text(self.letter),
            self.end
        )
    }
}

/// `[start][letter] -> endpoints` (or the inverse).
type TransitionTable = HashMap<String, HashMap<Letter, IndexSet<String>>>;

/// A finite automaton (Q, q₀, F, E) over named states.
///
/// The same type models λ-NFAs, NFAs and DFAs; the [`Self::has_lambda_moves`]
/// and [`Self::is_deterministic`] predicates tell the shapes apart and the
/// transformations check them as preconditions. Two derived adjacency maps
/// (forward and inverted) are rebuilt at construction and never exposed.
#[derive(Debug, Clone)]
pub struct FiniteAutomaton {
    states: IndexSet<String>,
    start_state: String,
    accepting_states: IndexSet<String>,
    edges: IndexSet<Edge>,
    transitions: TransitionTable,
    inverted_transitions: TransitionTable,
}

impl FiniteAutomaton {
    /// Public factory. Validates that the state set is non-empty, that the
    /// start state, accepting states and edge endpoints are all declared,
    /// and that state names match `[A-Za-z0-9_]+`. Internal constructions
    /// may introduce names containing `-`, `{`, `}`, `,` and `$`; those must
    /// never be fed back through here.
    pub fn create<S, A, E>(states: S, start_state: impl Into<String>, accepting_states: A, edges: E) -> Result<Self>
    where
        S: IntoIterator,
        S::Item: Into<String>,
        A: IntoIterator,
        A::Item: Into<String>,
        E: IntoIterator<Item = Edge>,
    {
        let states: IndexSet<String> = states.into_iter().map(Into::into).collect();
        for state in &states {
            if state.is_empty() || !state.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                return Err(FormlangError::validation(
                    "constructor",
                    format!("state name {state:?} must be alphanumeric or underscored"),
                ));
            }
        }
        Self::from_parts(
            states,
            start_state.into(),
            accepting_states.into_iter().map(Into::into).collect(),
            edges.into_iter().collect(),
        )
    }

    /// Validating constructor shared by the factory and by callers that are
    /// allowed to use the internal name namespace.
    pub(crate) fn from_parts(
        states: IndexSet<String>,
        start_state: String,
        accepting_states: IndexSet<String>,
        edges: IndexSet<Edge>,
    ) -> Result<Self> {
        if states.is_empty() {
            return Err(FormlangError::validation("constructor", "the state set must not be empty"));
        }
        if !states.contains(&start_state) {
            return Err(FormlangError::validation("constructor", "start refers to unknown state"));
        }
        for accepting in &accepting_states {
            if !states.contains(accepting) {
                return Err(FormlangError::validation(
                    "constructor",
                    "accepting state refers to unknown state",
                ));
            }
        }
        for edge in &edges {
            if !states.contains(&edge.start) || !states.contains(&edge.end) {
                return Err(FormlangError::validation("constructor", "edge refers to unknown state"));
            }
        }
        Ok(Self::assemble(states, start_state, accepting_states, edges))
    }

    /// Trusted constructor for the converters, which only ever produce
    /// consistent parts.
    pub(crate) fn assemble(
        states: IndexSet<String>,
        start_state: String,
        accepting_states: IndexSet<String>,
        edges: IndexSet<Edge>,
    ) -> Self {
        debug_assert!(states.contains(&start_state));
        debug_assert!(accepting_states.iter().all(|s| states.contains(s)));
        debug_assert!(edges.iter().all(|e| states.contains(&e.start) && states.contains(&e.end)));

        let mut transitions: TransitionTable = HashMap::new();
        let mut inverted_transitions: TransitionTable = HashMap::new();
        for edge in &edges {
            transitions
                .entry(edge.start.clone())
                .or_default()
                .entry(edge.letter)
                .or_default()
                .insert(edge.end.clone());
            inverted_transitions
                .entry(edge.end.clone())
                .or_default()
                .entry(edge.letter)
                .or_default()
                .insert(edge.start.clone());
        }

        Self {
            states,
            start_state,
            accepting_states,
            edges,
            transitions,
            inverted_transitions,
        }
    }

    /// The state set Q.
    pub fn states(&self) -> &IndexSet<String> {
        &self.states
    }

    /// The start state q₀.
    pub fn start_state(&self) -> &str {
        &self.start_state
    }

    /// The accepting set F.
    pub fn accepting_states(&self) -> &IndexSet<String> {
        &self.accepting_states
    }

    /// The edge set E.
    pub fn edges(&self) -> &IndexSet<Edge> {
        &self.edges
    }

    /// Whether any edge carries λ.
    pub fn has_lambda_moves(&self) -> bool {
        self.edges.iter().any(|edge| edge.letter.is_none())
    }

    /// Whether the automaton is deterministic: no λ edge and at most one
    /// endpoint per (state, letter).
    pub fn is_deterministic(&self) -> bool {
        for transitions in self.transitions.values() {
            if transitions.contains_key(&LAMBDA) {
                return false;
            }
            if transitions.values().any(|endpoints| endpoints.len() > 1) {
                return false;
            }
        }
        true
    }

    /// Canonicalize state names: states are sorted lexicographically and
    /// renamed to `A`..`Z` when there are at most 26 of them, decimal
    /// indices otherwise. Start, accepting set and edges are remapped
    /// consistently.
    pub fn compress_names(&self) -> Self {
        const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

        let mut original: Vec<&String> = self.states.iter().collect();
        original.sort();

        let mut mapping: HashMap<&str, String> = HashMap::new();
        for (index, state) in original.iter().enumerate() {
            let compressed = if original.len() > ALPHABET.len() {
                index.to_string()
            } else {
                (ALPHABET[index] as char).to_string()
            };
            mapping.insert(state.as_str(), compressed);
        }

        Self::assemble(
            self.states.iter().map(|s| mapping[s.as_str()].clone()).collect(),
            mapping[self.start_state.as_str()].clone(),
            self.accepting_states.iter().map(|s| mapping[s.as_str()].clone()).collect(),
            self.edges
                .iter()
                .map(|e| Edge::new(mapping[e.start.as_str()].clone(), mapping[e.end.as_str()].clone(), e.letter))
                .collect(),
        )
    }

    /// Decide whether a deterministic automaton accepts `input`. Fails fast
    /// on the first missing transition.
    pub fn matches(&self, input: &str) -> Result<bool> {
        if !self.is_deterministic() {
            return Err(FormlangError::precondition(
                "matches",
                "only callable on a deterministic automaton",
            ));
        }

        let mut state = self.start_state.as_str();
        for c in input.chars() {
            match self.single_target(state, Some(c)) {
                Some(next) => state = next,
                None => return Ok(false),
            }
        }
        Ok(self.accepting_states.contains(state))
    }

    // Derived-index accessors for the converter modules.

    pub(crate) fn transitions_from(&self, state: &str) -> Option<&HashMap<Letter, IndexSet<String>>> {
        self.transitions.get(state)
    }

    /// The unique endpoint of (state, letter), if any. Only meaningful on
    /// deterministic automata.
    pub(crate) fn single_target<'a>(&'a self, state: &str, letter: Letter) -> Option<&'a str> {
        self.transitions
            .get(state)?
            .get(&letter)?
            .first()
            .map(String::as_str)
    }

    /// The outgoing letters of a state, sorted with λ first.
    pub(crate) fn outgoing_letters(&self, state: &str) -> Vec<Letter> {
        let mut letters: Vec<Letter> = self
            .transitions
            .get(state)
            .map(|transitions| transitions.keys().copied().collect())
            .unwrap_or_default();
        letters.sort_unstable();
        letters
    }

    // Reachability utilities. The transitive variants are plain BFS and
    // include the seed state itself.

    pub(crate) fn direct_successors(&self, state: &str) -> IndexSet<String> {
        let mut all = IndexSet::new();
        if let Some(transitions) = self.transitions.get(state) {
            for endpoints in transitions.values() {
                all.extend(endpoints.iter().cloned());
            }
        }
        all
    }

    pub(crate) fn direct_successors_on(&self, state: &str, letter: Letter) -> IndexSet<String> {
        self.transitions
            .get(state)
            .and_then(|transitions| transitions.get(&letter))
            .cloned()
            .unwrap_or_default()
    }

    pub(crate) fn direct_predecessors_on(&self, state: &str, letter: Letter) -> IndexSet<String> {
        self.inverted_transitions
            .get(state)
            .and_then(|transitions| transitions.get(&letter))
            .cloned()
            .unwrap_or_default()
    }

    pub(crate) fn transitive_successors(&self, state: &str) -> IndexSet<String> {
        self.bfs(state, |s| self.direct_successors(s))
    }

    pub(crate) fn transitive_successors_on(&self, state: &str, letter: Letter) -> IndexSet<String> {
        self.bfs(state, |s| self.direct_successors_on(s, letter))
    }

    pub(crate) fn transitive_predecessors_on(&self, state: &str, letter: Letter) -> IndexSet<String> {
        self.bfs(state, |s| self.direct_predecessors_on(s, letter))
    }

    fn bfs<F>(&self, seed: &str, neighbors: F) -> IndexSet<String>
    where
        F: Fn(&str) -> IndexSet<String>,
    {
        let mut reached: IndexSet<String> = IndexSet::new();
        let mut queue: VecDeque<String> = VecDeque::new();
        queue.push_back(seed.to_string());

        while let Some(current) = queue.pop_front() {
            if reached.contains(&current) {
                continue;
            }
            for neighbor in neighbors(&current) {
                if !reached.contains(&neighbor) {
                    queue.push_back(neighbor);
                }
            }
            reached.insert(current);
        }

        reached
    }
}

/// Standard name for a set of original states: `{` + sorted, comma-joined
/// members + `}`. Keeps derived-automaton output deterministic and makes
/// state-set equality syntactic.
pub(crate) fn composite_name<'a>(members: impl IntoIterator<Item = &'a str>) -> String {
    let mut names: Vec<&str> = members.into_iter().collect();
    names.sort_unstable();
    format!("{{{}}}", names.join(","))
}

impl fmt::Display for FiniteAutomaton {
    /// The four-line textual dump: states, start state, accepting states and
    /// one tab-indented line per edge.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut states: Vec<&str> = self.states.iter().map(String::as_str).collect();
        states.sort_unstable();
        writeln!(f, "States: {}", states.join(", "))?;

        writeln!(f, "Start State: {}", self.start_state)?;

        let mut accepting: Vec<&str> = self.accepting_states.iter().map(String::as_str).collect();
        accepting.sort_unstable();
        if accepting.is_empty() {
            writeln!(f, "Accepting States: NONE")?;
        } else {
            writeln!(f, "Accepting States: {}", accepting.join(", "))?;
        }

        write!(f, "Edges: ")?;
        let mut edge_lines: Vec<String> = self.edges.iter().map(Edge::to_string).collect();
        edge_lines.sort_unstable();
        if edge_lines.is_empty() {
            write!(f, "\n\tNONE")?;
        } else {
            for line in edge_lines {
                write!(f, "\n\t{line}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_dfa() -> FiniteAutomaton {
        // A -a-> B -b-> C (accepting)
        FiniteAutomaton::create(
            ["A", "B", "C"],
            "A",
            ["C"],
            [
                Edge::new("A", "B", Some('a')),
                Edge::new("B", "C", Some('b')),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_create_rejects_unknown_states() {
        let error = FiniteAutomaton::create(["A"], "B", Vec::<String>::new(), []).unwrap_err();
        assert_eq!(error.to_string(), "constructor: start refers to unknown state");

        let error = FiniteAutomaton::create(["A"], "A", ["B"], []).unwrap_err();
        assert_eq!(error.to_string(), "constructor: accepting state refers to unknown state");

        let error =
            FiniteAutomaton::create(["A"], "A", ["A"], [Edge::new("A", "B", Some('a'))]).unwrap_err();
        assert_eq!(error.to_string(), "constructor: edge refers to unknown state");
    }

    #[test]
    fn test_create_rejects_illegal_names() {
        let error = FiniteAutomaton::create(["A-1"], "A-1", ["A-1"], []).unwrap_err();
        assert!(matches!(error, FormlangError::Validation { operation: "constructor", .. }));

        let error = FiniteAutomaton::create(["{A}"], "{A}", Vec::<String>::new(), []).unwrap_err();
        assert!(matches!(error, FormlangError::Validation { .. }));

        assert!(FiniteAutomaton::create(["state_1"], "state_1", Vec::<String>::new(), []).is_ok());
    }

    #[test]
    fn test_create_rejects_empty_state_set() {
        let error =
            FiniteAutomaton::create(Vec::<String>::new(), "A", Vec::<String>::new(), []).unwrap_err();
        assert_eq!(error.to_string(), "constructor: the state set must not be empty");
    }

    #[test]
    fn test_predicates() {
        let dfa = sample_dfa();
        assert!(!dfa.has_lambda_moves());
        assert!(dfa.is_deterministic());

        // adding A -λ-> C makes it a λNFA
        let lnfa = FiniteAutomaton::create(
            ["A", "B", "C"],
            "A",
            ["C"],
            [Edge::new("A", "B", Some('a')), Edge::new("A", "C", LAMBDA)],
        )
        .unwrap();
        assert!(lnfa.has_lambda_moves());
        assert!(!lnfa.is_deterministic());

        // two endpoints on (A, a) is nondeterministic without λ
        let nfa = FiniteAutomaton::create(
            ["A", "B", "C"],
            "A",
            ["C"],
            [Edge::new("A", "B", Some('a')), Edge::new("A", "C", Some('a'))],
        )
        .unwrap();
        assert!(!nfa.has_lambda_moves());
        assert!(!nfa.is_deterministic());
    }

    #[test]
    fn test_parallel_equal_edges_collapse() {
        let fa = FiniteAutomaton::create(
            ["A", "B"],
            "A",
            ["B"],
            [Edge::new("A", "B", Some('a')), Edge::new("A", "B", Some('a'))],
        )
        .unwrap();
        assert_eq!(fa.edges().len(), 1);
    }

    #[test]
    fn test_matches() {
        let dfa = sample_dfa();
        assert!(dfa.matches("ab").unwrap());
        assert!(!dfa.matches("a").unwrap());
        assert!(!dfa.matches("").unwrap());
        assert!(!dfa.matches("abb").unwrap());
        // letter with no transition anywhere
        assert!(!dfa.matches("x").unwrap());
    }

    #[test]
    fn test_matches_requires_determinism() {
        let nfa = FiniteAutomaton::create(
            ["A", "B"],
            "A",
            ["B"],
            [Edge::new("A", "A", Some('a')), Edge::new("A", "B", Some('a'))],
        )
        .unwrap();
        let error = nfa.matches("a").unwrap_err();
        assert!(matches!(error, FormlangError::Precondition { operation: "matches", .. }));
    }

    #[test]
    fn test_compress_names() {
        let fa = FiniteAutomaton::create(
            ["start", "middle", "finish"],
            "start",
            ["finish"],
            [
                Edge::new("start", "middle", Some('a')),
                Edge::new("middle", "finish", Some('b')),
            ],
        )
        .unwrap();

        // sorted: finish, middle, start -> A, B, C
        let compressed = fa.compress_names();
        assert_eq!(compressed.start_state(), "C");
        assert!(compressed.accepting_states().contains("A"));
        assert!(compressed.edges().contains(&Edge::new("C", "B", Some('a'))));
        assert!(compressed.edges().contains(&Edge::new("B", "A", Some('b'))));
    }

    #[test]
    fn test_compress_names_beyond_the_alphabet() {
        // more than 26 states fall back to decimal indices
        let names: Vec<String> = (0..30).map(|i| format!("s{i}")).collect();
        let fa = FiniteAutomaton::create(names, "s0", ["s29"], []).unwrap();

        let compressed = fa.compress_names();
        assert_eq!(compressed.states().len(), 30);
        // "s0" sorts first among the s-names
        assert_eq!(compressed.start_state(), "0");
        assert!(compressed.states().contains("29"));
        assert!(compressed.states().iter().all(|name| name.chars().all(|c| c.is_ascii_digit())));
    }

    #[test]
    fn test_reachability() {
        // A -a-> B -λ-> C, D isolated
        let fa = FiniteAutomaton::create(
            ["A", "B", "C", "D"],
            "A",
            ["C"],
            [Edge::new("A", "B", Some('a')), Edge::new("B", "C", LAMBDA)],
        )
        .unwrap();

        let reachable = fa.transitive_successors("A");
        assert!(reachable.contains("A"));
        assert!(reachable.contains("B"));
        assert!(reachable.contains("C"));
        assert!(!reachable.contains("D"));

        let lambda_ancestors = fa.transitive_predecessors_on("C", LAMBDA);
        assert!(lambda_ancestors.contains("C"));
        assert!(lambda_ancestors.contains("B"));
        assert!(!lambda_ancestors.contains("A"));
    }

    #[test]
    fn test_display_format() {
        let dfa = sample_dfa();
        assert_eq!(
            dfa.to_string(),
            "States: A, B, C\n\
             Start State: A\n\
             Accepting States: C\n\
             Edges: \n\
             \tFrom A via a to B\n\
             \tFrom B via b to C"
        );
    }

    #[test]
    fn test_display_lambda_and_none() {
        let fa = FiniteAutomaton::create(["A", "B"], "A", Vec::<String>::new(), [Edge::new("A", "B", LAMBDA)])
            .unwrap();
        assert_eq!(
            fa.to_string(),
            "States: A, B\nStart State: A\nAccepting States: NONE\nEdges: \n\tFrom A via λ to B"
        );

        let bare = FiniteAutomaton::create(["A"], "A", ["A"], []).unwrap();
        assert_eq!(
            bare.to_string(),
            "States: A\nStart State: A\nAccepting States: A\nEdges: \n\tNONE"
        );
    }

    #[test]
    fn test_composite_name_sorts_members() {
        assert_eq!(composite_name(["B", "A", "C"]), "{A,B,C}");
        assert_eq!(composite_name(["A"]), "{A}");
    }
}
