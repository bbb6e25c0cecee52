//! Recursive state machines: one NFA per nonterminal, compiled from an
//! ECFG's regex bodies. The Boolean-matrix solver in `crate::cfpq::matrix`
//! decomposes each component NFA the same way
//! `crate::bool_matrix::BooleanDecomposition` decomposes a graph automaton.

use std::collections::BTreeMap;

use crate::fsm::FiniteAutomaton;
use crate::grammar::ecfg::Ecfg;
use crate::regexp;

/// `nonterminal -> NFA equivalent to its ECFG regex`, plus the designated
/// start nonterminal.
#[derive(Clone, Debug, Default)]
pub struct Rsm {
    pub start: String,
    pub components: BTreeMap<String, FiniteAutomaton>,
}

impl Rsm {
    pub fn from_ecfg(ecfg: &Ecfg) -> Self {
        let components = ecfg
            .productions
            .iter()
            .map(|(head, node)| (head.clone(), regexp::compile_node(node)))
            .collect();

        Rsm {
            start: ecfg.start.clone(),
            components,
        }
    }

    /// DFA-minimizes every component NFA in place.
    pub fn minimize(self) -> Self {
        let components = self
            .components
            .into_iter()
            .map(|(head, a)| (head, a.minimal()))
            .collect();
        Rsm {
            start: self.start,
            components,
        }
    }

    pub fn component(&self, nonterminal: &str) -> Option<&FiniteAutomaton> {
        self.components.get(nonterminal)
    }
}
