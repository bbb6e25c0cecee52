//! The regular-path-query engine: automaton intersection by Kronecker
//! product, tagged union, concatenation, Kleene star, transitive closure,
//! and the RPQ start/final extraction built on top of them.

use std::collections::BTreeSet;

use crate::bool_matrix::{BoolMatrix, BooleanDecomposition};
use crate::fsm::{FiniteAutomaton, Origin, StateId};

/// `A1 ∩ A2` by Kronecker product of the two automata's Boolean
/// decompositions over their shared alphabet. Product states are numbered
/// lexicographically (`i1 * |Q2| + i2`), matching the decomposition's
/// Kronecker indexing exactly so no extra remapping is needed.
pub fn intersect(a1: &FiniteAutomaton, a2: &FiniteAutomaton) -> FiniteAutomaton {
    let e1 = a1.clone().remove_epsilon();
    let e2 = a2.clone().remove_epsilon();
    let d1 = BooleanDecomposition::build(&e1);
    let d2 = BooleanDecomposition::build(&e2);
    let n1 = d1.num_states();
    let n2 = d2.num_states();

    let mut out = FiniteAutomaton::new();
    for i1 in 0..n1 {
        for i2 in 0..n2 {
            let id = out.add_state();
            debug_assert_eq!(id, i1 * n2 + i2);

            for t in e1.tags(i1) {
                out.add_tag(id, t.clone());
            }
            for t in e2.tags(i2) {
                out.add_tag(id, t.clone());
            }

            if e1.is_start(i1) && e2.is_start(i2) {
                out.mark_start(id);
            }
            if e1.is_accepting(i1) && e2.is_accepting(i2) {
                out.mark_accept(id);
            }
        }
    }

    let shared_symbols: BTreeSet<&String> = d1
        .matrices
        .keys()
        .filter(|s| d2.matrices.contains_key(*s))
        .collect();

    for sym in shared_symbols {
        let product = d1.matrices[sym].kronecker(&d2.matrices[sym]);
        for (p, q) in product.iter() {
            out.add_transition(p, sym.clone(), q);
        }
    }

    out
}

/// `A1 ∪ A2`: a disjoint copy of each operand, states tagged by which side
/// they came from, with no epsilon bridges between the copies.
pub fn union(a1: &FiniteAutomaton, a2: &FiniteAutomaton) -> FiniteAutomaton {
    let mut out = a1.clone().with_origin(Origin::Left);
    out.join(a2.clone().with_origin(Origin::Right));
    out
}

/// `A1 . A2`: the conventional concatenation construction, `F1 ->eps S2`,
/// start `S1`, final `F2`. Exactly `FiniteAutomaton::then`.
pub fn concat(a1: &FiniteAutomaton, a2: &FiniteAutomaton) -> FiniteAutomaton {
    let mut out = a1.clone();
    out.then(a2.clone());
    out
}

/// `A*`, Thompson's construction: loop acceptors back to starts, then allow
/// skipping the whole automaton via a fresh epsilon-accepting branch.
pub fn star(a: &FiniteAutomaton) -> FiniteAutomaton {
    let mut out = a.clone();
    out.then_loop();
    out.join(FiniteAutomaton::zero());
    out
}

/// Raises `M = OR_sigma M_sigma` to its fixed point under `M <- M OR (M . M)`.
pub fn transitive_closure(decomposition: &BooleanDecomposition) -> BoolMatrix {
    let mut m = decomposition.combined();
    loop {
        let next = m.or(&m.mat_mul(&m));
        if next.nnz() == m.nnz() {
            return next;
        }
        m = next;
    }
}

fn untagged_vertex(a: &FiniteAutomaton, state: StateId) -> Option<String> {
    a.tags(state)
        .iter()
        .find(|t| t.origin.is_none())
        .map(|t| t.vertex.clone())
}

/// `RPQ(A, R)`: intersect `A` with (an already-minimized DFA for) `R`, take
/// the transitive closure of the intersection's decomposition, and return
/// the pairs of `A`-side vertices `(u, v)` witnessed by it: `u` reachable
/// from a start of `A`, `v` landing on a final of `A`. Because the query
/// automaton `r` carries no `VertexTag`s of its own, the intersection's
/// merged tag set reduces to exactly `A`'s vertex, which is how the identity
/// of the originating `A`-side state is recovered from the product state.
pub fn regular_path_query(a: &FiniteAutomaton, r: &FiniteAutomaton) -> BTreeSet<(String, String)> {
    let inter = intersect(a, r);
    // `intersect` only ever adds transitions labeled by a shared symbol, so
    // its output is already epsilon-free; decomposing it directly is safe.
    let decomposition = BooleanDecomposition::build(&inter);
    let closure = transitive_closure(&decomposition);

    let mut result = BTreeSet::new();
    let n = decomposition.num_states();
    for p in 0..n {
        if !inter.is_start(p) {
            continue;
        }
        for q in 0..n {
            if !inter.is_accepting(q) || !closure.get(p, q) {
                continue;
            }
            if let (Some(u), Some(v)) = (untagged_vertex(&inter, p), untagged_vertex(&inter, q)) {
                result.insert((u, v));
            }
        }
    }
    result
}

/// `reachableOf(A)`: `RPQ(A, .*)` restricted to the destination vertices,
/// implemented directly as the transitive closure of `A` itself (intersecting
/// with a DFA that accepts every string over `A`'s own alphabet would give
/// back an isomorphic copy of `A`, so that step is skipped).
pub fn reachable_of(a: &FiniteAutomaton) -> BTreeSet<String> {
    let e = a.clone().remove_epsilon();
    let decomposition = BooleanDecomposition::build(&e);
    let closure = transitive_closure(&decomposition);

    let mut result = BTreeSet::new();
    let n = decomposition.num_states();
    for p in 0..n {
        if !e.is_start(p) {
            continue;
        }
        for q in 0..n {
            if closure.get(p, q) {
                if let Some(v) = untagged_vertex(&e, q) {
                    result.insert(v);
                }
            }
        }
    }
    result
}
