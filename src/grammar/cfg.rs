//! Context-free grammars and their transformation to Weakened Chomsky Normal
//! Form, the shape the solvers in `crate::cfpq` require: `A -> BC`,
//! `A -> a`, `A -> ε` only.

use std::collections::{BTreeSet, HashMap, HashSet};

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Symbol {
    NonTerminal(String),
    Terminal(String),
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Production {
    pub head: String,
    pub body: Vec<Symbol>,
}

/// `G = (N, T, P, S)`. `N` and `T` are implicit in which `Symbol` variant
/// appears where; `S` is `start`.
#[derive(Clone, Debug, Default)]
pub struct Cfg {
    pub start: String,
    pub productions: Vec<Production>,
}

impl Cfg {
    pub fn new(start: impl Into<String>) -> Self {
        Cfg {
            start: start.into(),
            productions: Vec::new(),
        }
    }

    pub fn add_production(&mut self, head: impl Into<String>, body: Vec<Symbol>) {
        self.productions.push(Production {
            head: head.into(),
            body,
        });
    }

    pub fn nonterminals(&self) -> BTreeSet<String> {
        let mut ns: BTreeSet<String> = self.productions.iter().map(|p| p.head.clone()).collect();
        ns.insert(self.start.clone());
        ns
    }

    fn unit_target(body: &[Symbol]) -> Option<&str> {
        match body {
            [Symbol::NonTerminal(n)] => Some(n.as_str()),
            _ => None,
        }
    }

    /// Step 1: replace every chain of unit productions `A -> B -> ... -> body`
    /// with direct productions `A -> body` for every non-unit `body` reachable
    /// from `A` through unit rules (including the trivial `A =>* A`).
    fn eliminate_unit_productions(&self) -> Self {
        let nonterminals = self.nonterminals();

        let mut unit_reachable: HashMap<String, HashSet<String>> = HashMap::new();
        for n in &nonterminals {
            let mut reach = HashSet::new();
            reach.insert(n.clone());
            let mut frontier = vec![n.clone()];
            while let Some(cur) = frontier.pop() {
                for p in &self.productions {
                    if p.head != cur {
                        continue;
                    }
                    if let Some(target) = Self::unit_target(&p.body) {
                        if reach.insert(target.to_string()) {
                            frontier.push(target.to_string());
                        }
                    }
                }
            }
            unit_reachable.insert(n.clone(), reach);
        }

        let mut new_productions: BTreeSet<Production> = BTreeSet::new();
        for (head, reachable) in &unit_reachable {
            for via in reachable {
                for p in &self.productions {
                    if &p.head == via && Self::unit_target(&p.body).is_none() {
                        new_productions.insert(Production {
                            head: head.clone(),
                            body: p.body.clone(),
                        });
                    }
                }
            }
        }

        Cfg {
            start: self.start.clone(),
            productions: new_productions.into_iter().collect(),
        }
    }

    /// Step 2: drop non-generating symbols (those that can never derive a
    /// string of terminals) and then symbols unreachable from `start`.
    fn remove_useless_symbols(&self) -> Self {
        let mut generating: HashSet<String> = HashSet::new();
        loop {
            let mut changed = false;
            for p in &self.productions {
                if generating.contains(&p.head) {
                    continue;
                }
                let ok = p.body.iter().all(|s| match s {
                    Symbol::Terminal(_) => true,
                    Symbol::NonTerminal(n) => generating.contains(n),
                });
                if ok {
                    generating.insert(p.head.clone());
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }

        let gen_productions: Vec<Production> = self
            .productions
            .iter()
            .filter(|p| {
                generating.contains(&p.head)
                    && p.body.iter().all(|s| match s {
                        Symbol::Terminal(_) => true,
                        Symbol::NonTerminal(n) => generating.contains(n),
                    })
            })
            .cloned()
            .collect();

        let mut reachable: HashSet<String> = HashSet::new();
        reachable.insert(self.start.clone());
        let mut frontier = vec![self.start.clone()];
        while let Some(cur) = frontier.pop() {
            for p in &gen_productions {
                if p.head != cur {
                    continue;
                }
                for s in &p.body {
                    if let Symbol::NonTerminal(n) = s {
                        if reachable.insert(n.clone()) {
                            frontier.push(n.clone());
                        }
                    }
                }
            }
        }

        let productions = gen_productions
            .into_iter()
            .filter(|p| reachable.contains(&p.head))
            .collect();

        Cfg {
            start: self.start.clone(),
            productions,
        }
    }

    fn fresh_name(&self, prefix: &str, used: &mut HashSet<String>) -> String {
        let mut i = 0;
        loop {
            let candidate = format!("{}{}", prefix, i);
            if !used.contains(&candidate) {
                used.insert(candidate.clone());
                return candidate;
            }
            i += 1;
        }
    }

    /// Steps 3-4: lift terminals out of bodies of length >= 2 into fresh
    /// `T -> a` productions, then decompose bodies of length >= 3 into a
    /// chain of binary productions through fresh nonterminals.
    fn lift_and_decompose(&self) -> Self {
        let mut used: HashSet<String> = self.nonterminals();
        let mut terminal_proxies: HashMap<String, String> = HashMap::new();
        let mut extra: Vec<Production> = Vec::new();

        let lifted: Vec<Production> = self
            .productions
            .iter()
            .map(|p| {
                if p.body.len() < 2 {
                    return p.clone();
                }
                let body = p
                    .body
                    .iter()
                    .map(|s| match s {
                        Symbol::NonTerminal(_) => s.clone(),
                        Symbol::Terminal(t) => {
                            let name = terminal_proxies.entry(t.clone()).or_insert_with(|| {
                                let name = self.fresh_name("__T", &mut used);
                                extra.push(Production {
                                    head: name.clone(),
                                    body: vec![Symbol::Terminal(t.clone())],
                                });
                                name
                            });
                            Symbol::NonTerminal(name.clone())
                        }
                    })
                    .collect();
                Production {
                    head: p.head.clone(),
                    body,
                }
            })
            .collect();

        let mut decomposed = Vec::new();
        for p in lifted.into_iter().chain(extra.into_iter()) {
            if p.body.len() <= 2 {
                decomposed.push(p);
                continue;
            }
            let mut head = p.head.clone();
            let n = p.body.len();
            for (i, sym) in p.body.iter().enumerate().take(n - 2) {
                let next = self.fresh_name("__Y", &mut used);
                decomposed.push(Production {
                    head: head.clone(),
                    body: vec![sym.clone(), Symbol::NonTerminal(next.clone())],
                });
                head = next;
                let _ = i;
            }
            decomposed.push(Production {
                head,
                body: vec![p.body[n - 2].clone(), p.body[n - 1].clone()],
            });
        }

        Cfg {
            start: self.start.clone(),
            productions: decomposed,
        }
    }

    /// Runs the full WCNF pipeline: unit elimination, useless symbol removal,
    /// terminal lifting, then long-body decomposition.
    pub fn to_wcnf(&self) -> Wcnf {
        let g = self
            .eliminate_unit_productions()
            .remove_useless_symbols()
            .lift_and_decompose();

        let mut productions = Vec::new();
        for p in g.productions {
            match p.body.len() {
                0 => productions.push(WcnfProduction::Epsilon(p.head)),
                1 => match &p.body[0] {
                    Symbol::Terminal(t) => productions.push(WcnfProduction::Terminal(p.head, t.clone())),
                    Symbol::NonTerminal(_) => unreachable!("unit productions were eliminated"),
                },
                2 => match (&p.body[0], &p.body[1]) {
                    (Symbol::NonTerminal(b), Symbol::NonTerminal(c)) => {
                        productions.push(WcnfProduction::Binary(p.head, b.clone(), c.clone()))
                    }
                    _ => unreachable!("terminals were lifted before decomposition"),
                },
                _ => unreachable!("long bodies were decomposed"),
            }
        }

        Wcnf {
            start: g.start,
            productions,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum WcnfProduction {
    Binary(String, String, String),
    Terminal(String, String),
    Epsilon(String),
}

/// A grammar restricted to WCNF shape, the form `crate::cfpq`'s solvers
/// consume directly.
#[derive(Clone, Debug, Default)]
pub struct Wcnf {
    pub start: String,
    pub productions: Vec<WcnfProduction>,
}
