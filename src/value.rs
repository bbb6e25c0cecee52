//! The DSL's tagged-union value type.

use std::rc::Rc;

use crate::ast::Expr;
use crate::env::Environment;
use crate::fsm::FiniteAutomaton;

#[derive(Clone, Debug)]
pub enum Value {
    Int(i64),
    Str(String),
    Set(Vec<Value>),
    Tuple(Vec<Value>),
    Lambda {
        param: String,
        body: Rc<Expr>,
        captured_env: Environment,
    },
    Fsm(Rc<FiniteAutomaton>),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Str(_) => "string",
            Value::Set(_) => "set",
            Value::Tuple(_) => "tuple",
            Value::Lambda { .. } => "lambda",
            Value::Fsm(_) => "fsm",
        }
    }

    /// Structural equality within a variant; always `false` across mismatched
    /// variants, never an error. Two `Lambda`s are never considered equal:
    /// closures have no meaningful structural identity here.
    pub fn structural_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Set(a), Value::Set(b)) => {
                a.len() == b.len()
                    && a.iter().all(|x| b.iter().any(|y| x.structural_eq(y)))
                    && b.iter().all(|y| a.iter().any(|x| x.structural_eq(y)))
            }
            (Value::Tuple(a), Value::Tuple(b)) => {
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.structural_eq(y))
            }
            (Value::Fsm(a), Value::Fsm(b)) => fsm_equivalent(a, b),
            (Value::Lambda { .. }, Value::Lambda { .. }) => false,
            _ => false,
        }
    }
}

/// Language equality via canonical minimization. `FiniteAutomaton::minimal`'s
/// construction (sorted symbols, BTreeMap transition order) is already
/// deterministic given a language, so comparing minimized transition/
/// start/final sets (ignoring vertex tags, which carry no language
/// information) is a sound equivalence check.
fn fsm_equivalent(a: &FiniteAutomaton, b: &FiniteAutomaton) -> bool {
    let ma = a.clone().minimal();
    let mb = b.clone().minimal();

    if ma.num_states() != mb.num_states() {
        return false;
    }

    let sig = |m: &FiniteAutomaton| -> (
        std::collections::BTreeSet<(usize, String, usize)>,
        std::collections::BTreeSet<usize>,
        std::collections::BTreeSet<usize>,
    ) {
        (
            m.transitions().map(|(i, s, j)| (i, s.unwrap_or("").to_string(), j)).collect(),
            m.starts().cloned().collect(),
            m.acceptors().cloned().collect(),
        )
    };

    sig(&ma) == sig(&mb)
}

/// Inserts into a deduplicated set by structural equality: duplicates are
/// removed by equality, not by identity.
pub fn set_insert(set: &mut Vec<Value>, v: Value) {
    if !set.iter().any(|existing| existing.structural_eq(&v)) {
        set.push(v);
    }
}

pub fn set_from(values: impl IntoIterator<Item = Value>) -> Vec<Value> {
    let mut out = Vec::new();
    for v in values {
        set_insert(&mut out, v);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_across_variants_is_false_not_an_error() {
        assert!(!Value::Int(1).structural_eq(&Value::Str("1".into())));
    }

    #[test]
    fn set_insert_dedups_by_structural_equality() {
        let mut s = Vec::new();
        set_insert(&mut s, Value::Int(42));
        set_insert(&mut s, Value::Int(42));
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn tuple_equality_is_elementwise() {
        let a = Value::Tuple(vec![Value::Int(1), Value::Str("x".into())]);
        let b = Value::Tuple(vec![Value::Int(1), Value::Str("x".into())]);
        assert!(a.structural_eq(&b));
    }
}
