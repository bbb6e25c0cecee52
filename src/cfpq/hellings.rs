//! Hellings' worklist algorithm for all-pairs context-free path querying.

use std::collections::{BTreeSet, HashMap, VecDeque};

use crate::grammar::cfg::{Wcnf, WcnfProduction};
use crate::graph::LabeledMultigraph;

struct State {
    result: BTreeSet<(String, String, String)>,
    by_left: HashMap<String, Vec<(String, String)>>,
    by_right: HashMap<String, Vec<(String, String)>>,
    worklist: VecDeque<(String, String, String)>,
}

impl State {
    fn add(&mut self, v: String, n: String, u: String) {
        if self.result.insert((v.clone(), n.clone(), u.clone())) {
            self.by_left.entry(v.clone()).or_default().push((n.clone(), u.clone()));
            self.by_right.entry(u.clone()).or_default().push((v.clone(), n.clone()));
            self.worklist.push_back((v, n, u));
        }
    }
}

/// Runs Hellings' algorithm and returns every witnessed `(u, nonterminal, v)`
/// triple.
pub fn solve(graph: &LabeledMultigraph, grammar: &Wcnf) -> BTreeSet<(String, String, String)> {
    // `Nk -> Ni Nj`, indexed by `Ni` (the first symbol of the body).
    let mut prod_by_left: HashMap<&str, Vec<(&str, &str)>> = HashMap::new();
    // `Nk -> Nj Ni`, indexed by `Ni` (the second symbol of the body).
    let mut prod_by_right: HashMap<&str, Vec<(&str, &str)>> = HashMap::new();
    for p in &grammar.productions {
        if let WcnfProduction::Binary(head, b, c) = p {
            prod_by_left.entry(b.as_str()).or_default().push((head.as_str(), c.as_str()));
            prod_by_right.entry(c.as_str()).or_default().push((head.as_str(), b.as_str()));
        }
    }

    let mut state = State {
        result: BTreeSet::new(),
        by_left: HashMap::new(),
        by_right: HashMap::new(),
        worklist: VecDeque::new(),
    };

    for p in &grammar.productions {
        if let WcnfProduction::Epsilon(head) = p {
            for v in graph.vertices() {
                state.add(v.clone(), head.clone(), v.clone());
            }
        }
    }
    for (u, label, w) in graph.edges() {
        for p in &grammar.productions {
            if let WcnfProduction::Terminal(head, t) = p {
                if t == label {
                    state.add(u.clone(), head.clone(), w.clone());
                }
            }
        }
    }

    while let Some((v, ni, u)) = state.worklist.pop_front() {
        // `(x, Nj, v)` in result, `Nk -> Nj Ni` in P => `(x, Nk, u)`.
        let left_matches: Vec<(String, String)> = state.by_right.get(&v).cloned().unwrap_or_default();
        for (x, nj) in left_matches {
            if let Some(targets) = prod_by_right.get(ni.as_str()) {
                for (nk, expect_nj) in targets.clone() {
                    if expect_nj == nj {
                        state.add(x.clone(), nk.to_string(), u.clone());
                    }
                }
            }
        }

        // `(u, Nj, x)` in result, `Nk -> Ni Nj` in P => `(v, Nk, x)`.
        let right_matches: Vec<(String, String)> = state.by_left.get(&u).cloned().unwrap_or_default();
        for (nj, x) in right_matches {
            if let Some(targets) = prod_by_left.get(ni.as_str()) {
                for (nk, expect_nj) in targets.clone() {
                    if expect_nj == nj {
                        state.add(v.clone(), nk.to_string(), x.clone());
                    }
                }
            }
        }
    }

    state.result
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
    fn matches_end_to_end_scenario() {
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

        let result = solve(&g, &wcnf);
        let expect: BTreeSet<(String, String, String)> = [
            ("0", "A", "1"),
            ("1", "B", "2"),
            ("2", "C", "3"),
            ("1", "N", "3"),
            ("0", "S", "3"),
        ]
        .iter()
        .map(|(u, n, v)| (u.to_string(), n.to_string(), v.to_string()))
        .collect();
        assert_eq!(result, expect);
    }
}
