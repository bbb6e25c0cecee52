//! Per-symbol sparse Boolean adjacency matrices, and the primitives built on
//! top of them: Kronecker product, matrix-matrix OR-product, and `nnz()`.
//! Hand-rolled on a `BTreeMap`/`BTreeSet` row representation rather than a
//! numeric matrix crate, since the values here are Boolean adjacency, not
//! floats.

use std::collections::{BTreeMap, BTreeSet};

use crate::fsm::FiniteAutomaton;

/// A `dim x dim` sparse Boolean matrix, stored row-major as the set of
/// occupied columns per row.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct BoolMatrix {
    dim: usize,
    rows: BTreeMap<usize, BTreeSet<usize>>,
}

impl BoolMatrix {
    pub fn zeros(dim: usize) -> Self {
        BoolMatrix {
            dim,
            rows: BTreeMap::new(),
        }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn get(&self, i: usize, j: usize) -> bool {
        self.rows.get(&i).map_or(false, |r| r.contains(&j))
    }

    pub fn set(&mut self, i: usize, j: usize) {
        self.rows.entry(i).or_insert_with(BTreeSet::new).insert(j);
    }

    pub fn nnz(&self) -> usize {
        self.rows.values().map(|r| r.len()).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.rows
            .iter()
            .flat_map(|(i, cols)| cols.iter().map(move |j| (*i, *j)))
    }

    /// Boolean OR of two same-shape matrices.
    pub fn or(&self, other: &Self) -> Self {
        assert_eq!(self.dim, other.dim);
        let mut out = self.clone();
        for (i, j) in other.iter() {
            out.set(i, j);
        }
        out
    }

    pub fn or_assign(&mut self, other: &Self) {
        for (i, j) in other.iter() {
            self.set(i, j);
        }
    }

    /// Boolean matrix product: `(A . B)[i, k] = OR_j A[i, j] AND B[j, k]`.
    pub fn mat_mul(&self, other: &Self) -> Self {
        assert_eq!(self.dim, other.dim);
        let mut out = BoolMatrix::zeros(self.dim);
        for (i, cols) in &self.rows {
            for j in cols {
                if let Some(other_cols) = other.rows.get(j) {
                    for k in other_cols {
                        out.set(*i, *k);
                    }
                }
            }
        }
        out
    }

    /// Kronecker (tensor) product: the result is `dim1*dim2` square, with
    /// `(i1, i2)` mapped lexicographically to `i1 * dim2 + i2`.
    pub fn kronecker(&self, other: &Self) -> Self {
        let dim2 = other.dim;
        let mut out = BoolMatrix::zeros(self.dim * dim2);
        for (i1, j1) in self.iter() {
            for (i2, j2) in other.iter() {
                out.set(i1 * dim2 + i2, j1 * dim2 + j2);
            }
        }
        out
    }
}

/// The Boolean decomposition of an epsilon-free NFA: one matrix per symbol,
/// plus the state ordering it is indexed by. `idx[states_in_order[i]] == i`.
pub struct BooleanDecomposition {
    pub matrices: BTreeMap<String, BoolMatrix>,
    pub states_in_order: Vec<usize>,
    pub idx: BTreeMap<usize, usize>,
}

impl BooleanDecomposition {
    /// Decomposes an epsilon-free automaton. Panics (via `debug_assert`) if
    /// called on an automaton that still has epsilon transitions; callers
    /// are responsible for calling `remove_epsilon` first.
    pub fn build(a: &FiniteAutomaton) -> Self {
        debug_assert!(!a.has_epsilon(), "boolean decomposition requires an epsilon-free NFA");

        // Insertion order over 0..num_states is already a deterministic,
        // stable ordering of the state set.
        let states_in_order: Vec<usize> = (0..a.num_states()).collect();
        let idx: BTreeMap<usize, usize> = states_in_order
            .iter()
            .enumerate()
            .map(|(pos, state)| (*state, pos))
            .collect();

        let n = states_in_order.len();
        let mut matrices: BTreeMap<String, BoolMatrix> = BTreeMap::new();
        for (from, sym, to) in a.transitions() {
            let sym = match sym {
                Some(s) => s,
                None => unreachable!("epsilon transition survived remove_epsilon"),
            };
            let m = matrices.entry(sym.to_string()).or_insert_with(|| BoolMatrix::zeros(n));
            m.set(idx[&from], idx[&to]);
        }

        BooleanDecomposition {
            matrices,
            states_in_order,
            idx,
        }
    }

    pub fn num_states(&self) -> usize {
        self.states_in_order.len()
    }

    /// Boolean OR of every per-symbol matrix: the base relation that
    /// `transitive_closure` (in `rpq.rs`) raises to its fixed point.
    pub fn combined(&self) -> BoolMatrix {
        let n = self.num_states();
        let mut out = BoolMatrix::zeros(n);
        for m in self.matrices.values() {
            out.or_assign(m);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::LabeledMultigraph;

    #[test]
    fn empty_alphabet_yields_empty_matrix_map() {
        let mut g = LabeledMultigraph::new();
        g.add_vertex("s1");
        let a = FiniteAutomaton::from_multigraph(&g, None, None);
        let d = BooleanDecomposition::build(&a);
        assert!(d.matrices.is_empty());
    }

    #[test]
    fn decomposition_reflects_transitions() {
        let mut g = LabeledMultigraph::new();
        g.add_edge("s1", "a", "s2");
        let a = FiniteAutomaton::from_multigraph(&g, None, None);
        let d = BooleanDecomposition::build(&a);

        let s1 = a.state_for_vertex("s1").unwrap();
        let s2 = a.state_for_vertex("s2").unwrap();
        let m = d.matrices.get("a").unwrap();
        assert!(m.get(d.idx[&s1], d.idx[&s2]));
    }

    #[test]
    fn kronecker_product_dimension_and_membership() {
        let mut a = BoolMatrix::zeros(2);
        a.set(0, 1);
        let mut b = BoolMatrix::zeros(3);
        b.set(1, 2);

        let k = a.kronecker(&b);
        assert_eq!(k.dim(), 6);
        // (0,1) x (1,2) -> (0*3+1, 1*3+2) = (1, 5)
        assert!(k.get(1, 5));
        assert_eq!(k.nnz(), 1);
    }

    #[test]
    fn mat_mul_and_nnz_fixed_point() {
        let mut m = BoolMatrix::zeros(3);
        m.set(0, 1);
        m.set(1, 2);
        let sq = m.mat_mul(&m);
        assert!(sq.get(0, 2));
        assert_eq!(sq.nnz(), 1);
    }
}
