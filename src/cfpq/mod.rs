//! Context-free path query solvers and the higher-level `rpq` entry point
//! that restricts their all-pairs output to a chosen nonterminal and
//! start/final vertex sets. Dispatch between solvers is an explicit `Method`
//! enum plus a dispatch table local to this module, rather than a global
//! registry.

pub mod hellings;
pub mod matrix;

use std::collections::{BTreeSet, HashSet};

use crate::grammar::cfg::Wcnf;
use crate::graph::LabeledMultigraph;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Hellings,
    Matrix,
}

fn dispatch(method: Method) -> fn(&LabeledMultigraph, &Wcnf) -> BTreeSet<(String, String, String)> {
    match method {
        Method::Hellings => hellings::solve,
        Method::Matrix => matrix::solve,
    }
}

/// Solves all-pairs CFPQ with the chosen algorithm, then restricts the
/// triples to `non_term` (if given) and to `start_v`/`final_v` (if given),
/// returning the surviving `(u, v)` vertex pairs.
pub fn rpq(
    method: Method,
    graph: &LabeledMultigraph,
    grammar: &Wcnf,
    non_term: Option<&str>,
    start_v: Option<&HashSet<String>>,
    final_v: Option<&HashSet<String>>,
) -> BTreeSet<(String, String)> {
    let solve = dispatch(method);
    let non_term = non_term.unwrap_or(grammar.start.as_str());

    solve(graph, grammar)
        .into_iter()
        .filter(|(_, n, _)| n == non_term)
        .filter(|(u, _, _)| start_v.map_or(true, |s| s.contains(u)))
        .filter(|(_, _, v)| final_v.map_or(true, |f| f.contains(v)))
        .map(|(u, _, v)| (u, v))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::cfg::{Cfg, Symbol};

    fn nt(s: &str) -> Symbol {
        Symbol::NonTerminal(s.to_string())
    }
    fn t(s: &str) -> Symbol {
        Symbol::Terminal(s.to_string())
    }

    fn scenario() -> (LabeledMultigraph, Wcnf) {
        let mut g = LabeledMultigraph::new();
        g.add_edge("0", "a", "1");
        g.add_edge("1", "b", "2");
        g.add_edge("2", "c", "3");

        let mut cfg = Cfg::new("S");
        cfg.add_production("S", vec![nt("A"), nt("N")]);
        cfg.add_production("N", vec![nt("B"), nt("C")]);
        cfg.add_production("A", vec![t("a")]);
        cfg.add_production("B", vec![t("b")]);
        cfg.add_production("C", vec![t("c")]);
        (g, cfg.to_wcnf())
    }

    #[test]
    fn both_methods_restrict_to_the_requested_nonterminal() {
        let (g, wcnf) = scenario();
        let hellings = rpq(Method::Hellings, &g, &wcnf, Some("S"), None, None);
        let matrix = rpq(Method::Matrix, &g, &wcnf, Some("S"), None, None);
        assert_eq!(hellings, matrix);

        let mut expect = BTreeSet::new();
        expect.insert(("0".to_string(), "3".to_string()));
        assert_eq!(hellings, expect);
    }

    #[test]
    fn vertex_restriction_narrows_the_result() {
        let (g, wcnf) = scenario();
        let mut start = HashSet::new();
        start.insert("1".to_string());
        let result = rpq(Method::Hellings, &g, &wcnf, Some("N"), Some(&start), None);
        let mut expect = BTreeSet::new();
        expect.insert(("1".to_string(), "3".to_string()));
        assert_eq!(result, expect);
    }
}
