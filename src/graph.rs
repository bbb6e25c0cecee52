//! The labeled directed multigraph that backs `FiniteAutomaton::from_multigraph`
//! and the CFPQ solvers' view of the input database.

use std::collections::BTreeSet;

/// `G = (V, E, L)`. Vertices are opaque string identifiers; edges carry a
/// label and parallel edges with distinct labels between the same pair of
/// vertices are allowed (hence "multigraph").
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LabeledMultigraph {
    vertices: BTreeSet<String>,
    edges: BTreeSet<(String, String, String)>,
}

impl LabeledMultigraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_vertex(&mut self, v: impl Into<String>) {
        self.vertices.insert(v.into());
    }

    /// Adds an edge `from -label-> to`, inserting any endpoint not yet present.
    pub fn add_edge(&mut self, from: impl Into<String>, label: impl Into<String>, to: impl Into<String>) {
        let from = from.into();
        let to = to.into();
        self.vertices.insert(from.clone());
        self.vertices.insert(to.clone());
        self.edges.insert((from, label.into(), to));
    }

    pub fn vertices(&self) -> impl Iterator<Item = &String> {
        self.vertices.iter()
    }

    pub fn edges(&self) -> impl Iterator<Item = (&String, &String, &String)> {
        self.edges.iter().map(|(u, l, v)| (u, l, v))
    }

    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn labels(&self) -> BTreeSet<String> {
        self.edges.iter().map(|(_, l, _)| l.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_edge_inserts_endpoints() {
        let mut g = LabeledMultigraph::new();
        g.add_edge("s1", "a", "s2");
        assert_eq!(g.num_vertices(), 2);
        assert_eq!(g.num_edges(), 1);
        assert!(g.vertices().any(|v| v == "s1"));
    }

    #[test]
    fn parallel_edges_with_distinct_labels_both_kept() {
        let mut g = LabeledMultigraph::new();
        g.add_edge("s1", "a", "s2");
        g.add_edge("s1", "b", "s2");
        assert_eq!(g.num_edges(), 2);
        assert_eq!(g.labels().len(), 2);
    }
}
