//! Boolean-matrix context-free path query solver: one |V|x|V| matrix per
//! nonterminal, raised to a fixed point under the grammar's binary
//! productions. Reuses `crate::bool_matrix::BoolMatrix`, the same sparse
//! representation the RPQ engine decomposes automata into.

use std::collections::{BTreeMap, BTreeSet};

use crate::bool_matrix::BoolMatrix;
use crate::grammar::cfg::{Wcnf, WcnfProduction};
use crate::graph::LabeledMultigraph;

/// Runs the Boolean-matrix algorithm and returns every witnessed
/// `(u, nonterminal, v)` triple.
pub fn solve(graph: &LabeledMultigraph, grammar: &Wcnf) -> BTreeSet<(String, String, String)> {
    let vertices: Vec<String> = graph.vertices().cloned().collect();
    let idx: BTreeMap<&str, usize> = vertices.iter().enumerate().map(|(i, v)| (v.as_str(), i)).collect();
    let n = vertices.len();

    let mut nonterminals: BTreeSet<&str> = BTreeSet::new();
    for p in &grammar.productions {
        nonterminals.insert(match p {
            WcnfProduction::Binary(h, _, _) | WcnfProduction::Terminal(h, _) | WcnfProduction::Epsilon(h) => h.as_str(),
        });
    }

    let mut tables: BTreeMap<String, BoolMatrix> = nonterminals.iter().map(|nt| (nt.to_string(), BoolMatrix::zeros(n))).collect();

    for p in &grammar.productions {
        match p {
            WcnfProduction::Epsilon(head) => {
                let m = tables.get_mut(head).unwrap();
                for i in 0..n {
                    m.set(i, i);
                }
            }
            WcnfProduction::Terminal(head, a) => {
                let m = tables.get_mut(head).unwrap();
                for (u, label, v) in graph.edges() {
                    if label == a {
                        m.set(idx[u.as_str()], idx[v.as_str()]);
                    }
                }
            }
            WcnfProduction::Binary(_, _, _) => {}
        }
    }

    let binaries: Vec<(&str, &str, &str)> = grammar
        .productions
        .iter()
        .filter_map(|p| match p {
            WcnfProduction::Binary(head, b, c) => Some((head.as_str(), b.as_str(), c.as_str())),
            _ => None,
        })
        .collect();

    loop {
        let mut changed = false;
        for &(head, b, c) in &binaries {
            let product = tables[b].mat_mul(&tables[c]);
            let updated = tables[head].or(&product);
            if updated.nnz() != tables[head].nnz() {
                changed = true;
            }
            tables.insert(head.to_string(), updated);
        }
        if !changed {
            break;
        }
    }

    let mut result = BTreeSet::new();
    for (nt, m) in &tables {
        for (i, j) in m.iter() {
            result.insert((vertices[i].clone(), nt.clone(), vertices[j].clone()));
        }
    }
    result
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

    #[test]
    fn agrees_with_hellings_on_end_to_end_scenario() {
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
        let wcnf = cfg.to_wcnf();

        let matrix_result = solve(&g, &wcnf);
        let hellings_result = super::super::hellings::solve(&g, &wcnf);
        assert_eq!(matrix_result, hellings_result);
    }
}
