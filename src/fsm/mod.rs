//! The epsilon-NFA value that the rest of the crate is built around.
//!
//! The alphabet is fixed to `String` labels (edge labels or regex
//! identifiers), and each state carries a set of `VertexTag`s recording
//! which original graph vertex(es) it descends from and, after a tagged
//! union, which operand it came from. `remove_epsilon`'s state-merging
//! algorithm works by unioning those tag sets across each epsilon-closure
//! equivalence class.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::ops::Bound::Included;

use crate::algorithms::DisjointSets;
use crate::graph::LabeledMultigraph;

pub type StateId = usize;

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Symbol {
    Value(String),
    Epsilon,
}

/// Which side of a binary automaton operation (currently just union) a state
/// originated from. Recorded on `VertexTag` so that `startOf`/`finalOf` can
/// render tagged pairs identifying which operand a vertex came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Origin {
    Left,
    Right,
}

/// Tracks the provenance of a state: the original graph vertex it wraps and,
/// if it is the result of a tagged union, which operand contributed it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexTag {
    pub origin: Option<Origin>,
    pub vertex: String,
}

impl VertexTag {
    pub fn plain(vertex: impl Into<String>) -> Self {
        VertexTag {
            origin: None,
            vertex: vertex.into(),
        }
    }

    pub fn tagged(origin: Origin, vertex: impl Into<String>) -> Self {
        VertexTag {
            origin: Some(origin),
            vertex: vertex.into(),
        }
    }
}

/// An epsilon-NFA: `A = (Q, Sigma, Delta, S, F)`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FiniteAutomaton {
    num_states: StateId,
    state_tags: Vec<HashSet<VertexTag>>,
    starting_states: HashSet<StateId>,
    accepting_states: HashSet<StateId>,
    transitions: BTreeMap<(StateId, Symbol, StateId), ()>,
}

impl FiniteAutomaton {
    pub fn new() -> Self {
        FiniteAutomaton::default()
    }

    /// An automaton accepting exactly the empty string.
    pub fn zero() -> Self {
        let mut a = Self::new();
        let s = a.add_state();
        a.mark_start(s);
        a.mark_accept(s);
        a
    }

    pub fn add_state(&mut self) -> StateId {
        let id = self.num_states;
        self.num_states += 1;
        self.state_tags.push(HashSet::new());
        id
    }

    pub fn add_tag(&mut self, state_id: StateId, tag: VertexTag) {
        self.state_tags[state_id].insert(tag);
    }

    pub fn num_states(&self) -> usize {
        self.num_states
    }

    pub fn starts(&self) -> impl Iterator<Item = &StateId> {
        self.starting_states.iter()
    }

    pub fn acceptors(&self) -> impl Iterator<Item = &StateId> {
        self.accepting_states.iter()
    }

    pub fn is_start(&self, id: StateId) -> bool {
        self.starting_states.contains(&id)
    }

    pub fn is_accepting(&self, id: StateId) -> bool {
        self.accepting_states.contains(&id)
    }

    pub fn mark_start(&mut self, id: StateId) {
        self.starting_states.insert(id);
    }

    pub fn mark_accept(&mut self, id: StateId) {
        self.accepting_states.insert(id);
    }

    /// `add_start`/`add_final` silently insert the id into `S`/`F` even if it
    /// does not otherwise appear in any transition.
    pub fn add_start(&mut self, id: StateId) {
        self.starting_states.insert(id);
    }

    pub fn add_final(&mut self, id: StateId) {
        self.accepting_states.insert(id);
    }

    pub fn remove_start(&mut self, id: StateId) {
        self.starting_states.remove(&id);
    }

    pub fn remove_final(&mut self, id: StateId) {
        self.accepting_states.remove(&id);
    }

    pub fn add_transition(&mut self, from_id: StateId, sym: impl Into<String>, to_id: StateId) {
        self.transitions
            .insert((from_id, Symbol::Value(sym.into()), to_id), ());
    }

    pub fn add_epsilon(&mut self, from_id: StateId, to_id: StateId) {
        self.transitions.insert((from_id, Symbol::Epsilon, to_id), ());
    }

    /// Iterates `(q1, symbol, q2)`; `symbol` is `None` for an epsilon edge.
    pub fn transitions(&self) -> impl Iterator<Item = (StateId, Option<&str>, StateId)> {
        self.transitions.keys().map(|(i, s, j)| {
            let sym = match s {
                Symbol::Value(v) => Some(v.as_str()),
                Symbol::Epsilon => None,
            };
            (*i, sym, *j)
        })
    }

    fn lookup_sym(&self, from_id: StateId, sym: Symbol) -> impl Iterator<Item = StateId> + '_ {
        self.transitions
            .range((
                Included((from_id, sym.clone(), 0)),
                Included((from_id, sym, StateId::max_value())),
            ))
            .map(|((_, _, to_id), _)| *to_id)
    }

    pub fn lookup(&self, from_id: StateId, sym: &str) -> impl Iterator<Item = StateId> + '_ {
        self.lookup_sym(from_id, Symbol::Value(sym.to_string()))
    }

    /// Adds all states and transitions of `other` into `self`, offsetting ids.
    /// Plain disjoint union: no epsilon bridges and no tag merging across
    /// states. Used internally by regex compilation (alternation) and by the
    /// tagged `rpq::union` built on top of it.
    pub fn join(&mut self, mut other: Self) {
        let offset = self.num_states;

        self.num_states += other.num_states;
        self.state_tags.append(&mut other.state_tags);

        for id in other.starting_states {
            self.starting_states.insert(id + offset);
        }
        for id in other.accepting_states {
            self.accepting_states.insert(id + offset);
        }
        for ((i, s, j), _) in other.transitions {
            self.transitions.insert((i + offset, s, j + offset), ());
        }
    }

    /// Chains `other` after `self`: epsilon edges from every current acceptor
    /// to every start of `other`; `self`'s starts are kept, `other`'s
    /// acceptors become the new acceptors. Used both for regex concatenation
    /// and directly as the automaton concatenation construction (`F1 ->eps
    /// S2`).
    pub fn then(&mut self, mut other: Self) {
        let offset = self.num_states;

        self.num_states += other.num_states;
        self.state_tags.append(&mut other.state_tags);

        for j in other.starting_states {
            for i in self.accepting_states.clone() {
                self.transitions.insert((i, Symbol::Epsilon, j + offset), ());
            }
        }

        self.accepting_states.clear();
        for id in other.accepting_states {
            self.accepting_states.insert(id + offset);
        }

        for ((i, s, j), _) in other.transitions {
            self.transitions.insert((i + offset, s, j + offset), ());
        }
    }

    /// Adds back-edges from every acceptor to every start state, turning `A`
    /// into (the NFA for) `A+`.
    pub fn then_loop(&mut self) {
        let starts: Vec<_> = self.starting_states.iter().cloned().collect();
        for i in self.accepting_states.clone() {
            for j in &starts {
                self.transitions.insert((i, Symbol::Epsilon, *j), ());
            }
        }
    }

    /// Collapses to a single start state via an epsilon fan-out, if needed.
    pub fn with_single_start(mut self) -> Self {
        if self.starting_states.len() == 1 {
            return self;
        }

        let s = self.add_state();
        for si in self.starting_states.clone() {
            self.transitions.insert((s, Symbol::Epsilon, si), ());
        }

        self.starting_states.clear();
        self.starting_states.insert(s);
        self
    }

    pub fn has_epsilon(&self) -> bool {
        self.transitions.keys().any(|(_, s, _)| matches!(s, Symbol::Epsilon))
    }

    /// All symbols that label at least one transition (the observed alphabet).
    pub fn used_symbols(&self) -> BTreeSet<String> {
        self.transitions
            .keys()
            .filter_map(|(_, s, _)| match s {
                Symbol::Value(v) => Some(v.clone()),
                Symbol::Epsilon => None,
            })
            .collect()
    }

    /// Produces an equivalent epsilon-free automaton by merging each state
    /// with every state reachable from it purely via epsilon transitions.
    pub fn remove_epsilon(self) -> Self {
        if !self.has_epsilon() {
            return self;
        }

        let mut closures = DisjointSets::new(self.num_states);
        for i in 0..self.num_states {
            for j in self.lookup_sym(i, Symbol::Epsilon) {
                closures.union_sets(i, j);
            }
        }

        let mut new_num_states = 0;
        let mut new_state_tags: Vec<HashSet<VertexTag>> = vec![];
        let mut state_mapping = Vec::with_capacity(self.num_states);

        for (i, tags) in (0..self.num_states).zip(self.state_tags.iter().cloned()) {
            let c = closures.find_set_min(i);
            if c < i {
                let last_id = state_mapping[c];
                state_mapping.push(last_id);
                for tag in tags {
                    new_state_tags[last_id].insert(tag);
                }
            } else {
                let id = new_num_states;
                new_num_states += 1;
                new_state_tags.push(tags);
                state_mapping.push(id);
            }
        }

        let new_starting_states = self.starting_states.iter().map(|s| state_mapping[*s]).collect();
        let new_accepting_states = self.accepting_states.iter().map(|s| state_mapping[*s]).collect();

        let mut new_transitions = BTreeMap::new();
        for ((i, s, j), _) in self.transitions.into_iter() {
            if let Symbol::Epsilon = s {
                continue;
            }
            let key = (state_mapping[i], s, state_mapping[j]);
            new_transitions.insert(key, ());
        }

        FiniteAutomaton {
            num_states: new_num_states,
            state_tags: new_state_tags,
            starting_states: new_starting_states,
            accepting_states: new_accepting_states,
            transitions: new_transitions,
        }
    }

    pub fn accepts<'a, I>(&self, val: I) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut i = match self.starting_states.iter().next() {
            Some(i) => *i,
            None => return false,
        };

        for v in val {
            match self.lookup(i, v).next() {
                Some(j) => i = j,
                None => return false,
            }
        }

        self.accepting_states.contains(&i)
    }

    pub fn tags(&self, state_id: StateId) -> &HashSet<VertexTag> {
        &self.state_tags[state_id]
    }

    /// Rewrites every state's tags to carry `origin`, discarding whatever
    /// origin (if any) they previously had. Used by `rpq::union` to implement
    /// the disjoint-copy, origin-tagged union construction.
    pub fn with_origin(mut self, origin: Origin) -> Self {
        for tags in self.state_tags.iter_mut() {
            let retagged: HashSet<VertexTag> = tags
                .drain()
                .map(|t| VertexTag {
                    origin: Some(origin),
                    vertex: t.vertex,
                })
                .collect();
            *tags = retagged;
        }
        self
    }

    /// Finds the (unique, by construction) state wrapping `vertex` with no
    /// union origin, i.e. a vertex of a graph-backed, not-yet-unioned
    /// automaton. Used by the evaluator to translate DSL vertex-name sets
    /// into state ids for `setStart`/`setFinal`/`addStart`/`addFinal`.
    pub fn state_for_vertex(&self, vertex: &str) -> Option<StateId> {
        (0..self.num_states).find(|&id| {
            self.state_tags[id]
                .iter()
                .any(|t| t.origin.is_none() && t.vertex == vertex)
        })
    }

    /// Powerset construction (subset construction): produces a DFA-shaped
    /// NFA with exactly one transition per known symbol per state.
    pub fn compute_dfa(self) -> Self {
        let mut this = self.with_single_start().remove_epsilon();

        let alpha: Vec<String> = this.used_symbols().into_iter().collect();

        let mut new_starting_states = HashSet::new();
        new_starting_states.insert(0);
        let mut new_accepting_states = HashSet::new();

        let mut new_states: Vec<Vec<StateId>> = vec![];
        let mut new_states_idx: HashMap<Vec<StateId>, usize> = HashMap::new();
        let mut new_transitions = BTreeMap::new();

        let initial = vec![*this.starting_states.iter().next().unwrap()];
        new_states.push(initial.clone());
        new_states_idx.insert(initial.clone(), 0);
        if initial.iter().any(|s| this.accepting_states.contains(s)) {
            new_accepting_states.insert(0);
        }

        let mut queue = vec![0usize];
        while let Some(cur_id) = queue.pop() {
            for sym in &alpha {
                let mut next_accepts = false;
                let next_set: Vec<StateId> = {
                    let mut set = BTreeSet::new();
                    for state in &new_states[cur_id] {
                        for e in this.lookup(*state, sym) {
                            if this.accepting_states.contains(&e) {
                                next_accepts = true;
                            }
                            set.insert(e);
                        }
                    }
                    set.into_iter().collect()
                };

                let next_id = if let Some(id) = new_states_idx.get(&next_set).copied() {
                    id
                } else {
                    let id = new_states.len();
                    new_states.push(next_set.clone());
                    new_states_idx.insert(next_set, id);
                    if next_accepts {
                        new_accepting_states.insert(id);
                    }
                    queue.push(id);
                    id
                };

                new_transitions.insert((cur_id, Symbol::Value(sym.clone()), next_id), ());
            }
        }

        let mut new_state_tags = Vec::with_capacity(new_states.len());
        for group in &new_states {
            let mut tags = HashSet::new();
            for s in group {
                for t in this.state_tags[*s].drain() {
                    tags.insert(t);
                }
            }
            new_state_tags.push(tags);
        }

        FiniteAutomaton {
            num_states: new_states.len(),
            state_tags: new_state_tags,
            starting_states: new_starting_states,
            accepting_states: new_accepting_states,
            transitions: new_transitions,
        }
    }

    /// The automaton accepting the reverse language.
    pub fn reverse(self) -> Self {
        FiniteAutomaton {
            num_states: self.num_states,
            state_tags: self.state_tags,
            starting_states: self.accepting_states,
            accepting_states: self.starting_states,
            transitions: self
                .transitions
                .into_iter()
                .map(|((i, s, j), _)| ((j, s, i), ()))
                .collect(),
        }
    }

    /// DFA minimization via Brzozowski's algorithm: reverse, determinize,
    /// reverse, determinize.
    pub fn minimal(self) -> Self {
        self.reverse().compute_dfa().reverse().compute_dfa()
    }

    /// Builds an automaton from a labeled multigraph. If `start`/`final` are
    /// `None`, every vertex is marked both start and accepting, which is
    /// what gives unrestricted reachability queries over the whole graph.
    pub fn from_multigraph(
        graph: &LabeledMultigraph,
        start: Option<&HashSet<String>>,
        finish: Option<&HashSet<String>>,
    ) -> Self {
        let mut a = FiniteAutomaton::new();
        let mut ids: HashMap<&str, StateId> = HashMap::new();

        for v in graph.vertices() {
            let id = a.add_state();
            a.add_tag(id, VertexTag::plain(v.clone()));
            ids.insert(v.as_str(), id);

            let is_start = start.map_or(true, |s| s.contains(v));
            let is_final = finish.map_or(true, |s| s.contains(v));
            if is_start {
                a.mark_start(id);
            }
            if is_final {
                a.mark_accept(id);
            }
        }

        for (u, label, v) in graph.edges() {
            a.add_transition(ids[u.as_str()], label.clone(), ids[v.as_str()]);
        }

        a
    }
}
