//! A small regex-over-identifiers engine: parse, then compile to an
//! epsilon-NFA by Thompson's construction built out of the same
//! `FiniteAutomaton` primitives (`join`, `then`, `then_loop`) used elsewhere
//! in the crate, minus the character-class/capture-group machinery this
//! DSL's alphabet (whole identifiers, not characters) has no use for. Used
//! by `loadFrom regex "…"` and by ECFG nonterminal bodies.

pub mod ast;
pub mod parser;

use self::ast::RegexNode;
use crate::error::{ErrorKind, Result};
use crate::fsm::FiniteAutomaton;
use crate::rpq;

/// Compiles an already-parsed regex AST node to an epsilon-NFA. Exposed
/// crate-wide so `crate::grammar::rsm` can compile an ECFG production's
/// regex body without re-parsing it from text.
pub fn compile_node(node: &RegexNode) -> FiniteAutomaton {
    match node {
        RegexNode::Epsilon => FiniteAutomaton::zero(),
        RegexNode::Symbol(sym) => {
            let mut a = FiniteAutomaton::new();
            let s = a.add_state();
            let f = a.add_state();
            a.mark_start(s);
            a.mark_accept(f);
            a.add_transition(s, sym.clone(), f);
            a
        }
        RegexNode::Concat(a, b) => rpq::concat(&compile_node(a), &compile_node(b)),
        RegexNode::Alt(a, b) => {
            let mut out = compile_node(a);
            out.join(compile_node(b));
            out
        }
        RegexNode::Star(a) => rpq::star(&compile_node(a)),
    }
}

/// Parses `src` and compiles it to an epsilon-NFA. The result carries no
/// `VertexTag`s: it is a query pattern, not a graph-backed automaton, which
/// is what lets `rpq::regular_path_query` recover only the graph side's
/// vertex identity after intersecting against it.
pub fn compile(src: &str) -> Result<FiniteAutomaton> {
    let node = parser::parse(src)
        .map_err(|e| ErrorKind::LoadFailure(format!("malformed regex \"{}\": {}", src, e)))?;
    Ok(compile_node(&node))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiles_symbol_to_two_state_automaton() {
        let a = compile("a").unwrap();
        let det = a.remove_epsilon();
        assert!(det.accepts(["a"]));
        assert!(!det.accepts(["a", "a"]));
    }

    #[test]
    fn compiles_star_of_concat() {
        let a = compile("(a b)*").unwrap().remove_epsilon().compute_dfa();
        assert!(a.accepts(std::iter::empty()));
        assert!(a.accepts(["a", "b"]));
        assert!(a.accepts(["a", "b", "a", "b"]));
        assert!(!a.accepts(["a"]));
    }

    #[test]
    fn compiles_alternation() {
        let a = compile("a | b").unwrap().remove_epsilon().compute_dfa();
        assert!(a.accepts(["a"]));
        assert!(a.accepts(["b"]));
        assert!(!a.accepts(["a", "b"]));
    }

    #[test]
    fn rejects_malformed_source() {
        assert!(compile("(a b").is_err());
    }
}
