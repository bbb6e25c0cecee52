//! The tree-walking evaluator: a total function over AST nodes, producing a
//! `Value` for expressions and a side effect (a binding, or a line appended
//! to the print log) for statements.

use std::collections::HashSet;
use std::rc::Rc;

use log::trace;

use crate::ast::{BinOp, Expr, GetOp, Program, SetOp, Stmt};
use crate::env::Environment;
use crate::error::{ErrorKind, Result};
use crate::fsm::{FiniteAutomaton, Origin};
use crate::loader::Loader;
use crate::printer;
use crate::rpq;
use crate::value::{set_from, set_insert, Value};

pub struct Interpreter {
    env: Environment,
    loader: Loader,
    log: Vec<String>,
}

impl Interpreter {
    pub fn new(loader: Loader) -> Self {
        Interpreter {
            env: Environment::new(),
            loader,
            log: Vec::new(),
        }
    }

    pub fn log(&self) -> &[String] {
        &self.log
    }

    /// Looks up a top-level binding by name. Mainly useful for embedding
    /// and tests that need the underlying `Value` rather than its printed
    /// form.
    pub fn lookup(&self, name: &str) -> Option<&Value> {
        self.env.lookup(name)
    }

    pub fn run(&mut self, program: &Program) -> Result<()> {
        for stmt in program {
            self.exec_stmt(stmt)?;
        }
        Ok(())
    }

    fn exec_stmt(&mut self, stmt: &Stmt) -> Result<()> {
        match stmt {
            Stmt::Let(name, expr) => {
                let v = self.eval(expr)?;
                self.env.define(name.clone(), v);
            }
            Stmt::Print(expr) => {
                let v = self.eval(expr)?;
                let rendered = printer::render(&v);
                trace!("print: {}", rendered);
                self.log.push(rendered);
            }
        }
        Ok(())
    }

    fn eval(&mut self, expr: &Expr) -> Result<Value> {
        match expr {
            Expr::IntLit(i) => Ok(Value::Int(*i)),
            Expr::StringLit(s) => Ok(Value::Str(s.clone())),
            Expr::SetLit(exprs) => {
                let mut set = Vec::new();
                for e in exprs {
                    let v = self.eval(e)?;
                    set_insert(&mut set, v);
                }
                Ok(Value::Set(set))
            }
            Expr::TupleLit(exprs) => {
                let mut values = Vec::with_capacity(exprs.len());
                for e in exprs {
                    values.push(self.eval(e)?);
                }
                Ok(Value::Tuple(values))
            }
            Expr::Var(name) => self
                .env
                .lookup(name)
                .cloned()
                .ok_or_else(|| ErrorKind::UninitializedVariable(name.clone()).into()),
            Expr::Lambda(param, body) => Ok(Value::Lambda {
                param: param.clone(),
                body: body.clone(),
                captured_env: self.env.clone(),
            }),
            Expr::Load(kind, source) => {
                let a = self.loader.load(*kind, source)?;
                Ok(Value::Fsm(Rc::new(a)))
            }
            Expr::SetOp(op, set_expr, fsm_expr) => self.eval_set_op(*op, set_expr, fsm_expr),
            Expr::GetOp(op, fsm_expr) => self.eval_get_op(*op, fsm_expr),
            Expr::BinOp(op, lhs, rhs) => self.eval_bin_op(*op, lhs, rhs),
            Expr::Star(e) => {
                let a = self.expect_fsm(e)?;
                Ok(Value::Fsm(Rc::new(rpq::star(&a))))
            }
            Expr::InSet(value_expr, set_expr) => {
                let v = self.eval(value_expr)?;
                let s = self.expect_set(set_expr)?;
                let found = s.iter().any(|x| x.structural_eq(&v));
                Ok(Value::Int(if found { 1 } else { 0 }))
            }
            Expr::Map(lambda_expr, set_expr) => {
                let (param, body, captured) = self.expect_lambda(lambda_expr)?;
                let s = self.expect_set(set_expr)?;
                let mut out = Vec::new();
                for x in s {
                    let v = call_lambda(&self.loader, &param, &body, &captured, x)?;
                    set_insert(&mut out, v);
                }
                Ok(Value::Set(out))
            }
            Expr::Filter(lambda_expr, set_expr) => {
                let (param, body, captured) = self.expect_lambda(lambda_expr)?;
                let s = self.expect_set(set_expr)?;
                let mut out = Vec::new();
                for x in s {
                    let keep = call_lambda(&self.loader, &param, &body, &captured, x.clone())?;
                    if !matches!(keep, Value::Int(0)) {
                        set_insert(&mut out, x);
                    }
                }
                Ok(Value::Set(out))
            }
        }
    }

    fn expect_fsm(&mut self, e: &Expr) -> Result<Rc<FiniteAutomaton>> {
        match self.eval(e)? {
            Value::Fsm(a) => Ok(a),
            other => Err(ErrorKind::TypeMismatch(format!("expected an fsm, got a {}", other.type_name())).into()),
        }
    }

    fn expect_set(&mut self, e: &Expr) -> Result<Vec<Value>> {
        match self.eval(e)? {
            Value::Set(s) => Ok(s),
            other => Err(ErrorKind::TypeMismatch(format!("expected a set, got a {}", other.type_name())).into()),
        }
    }

    fn expect_lambda(&mut self, e: &Expr) -> Result<(String, Rc<Expr>, Environment)> {
        match self.eval(e)? {
            Value::Lambda { param, body, captured_env } => Ok((param, body, captured_env)),
            other => Err(ErrorKind::TypeMismatch(format!("expected a lambda, got a {}", other.type_name())).into()),
        }
    }

    fn eval_bin_op(&mut self, op: BinOp, lhs: &Expr, rhs: &Expr) -> Result<Value> {
        if let BinOp::Eq = op {
            let l = self.eval(lhs)?;
            let r = self.eval(rhs)?;
            return Ok(Value::Int(if l.structural_eq(&r) { 1 } else { 0 }));
        }

        let a = self.expect_fsm(lhs)?;
        let b = self.expect_fsm(rhs)?;
        let result = match op {
            BinOp::Intersect => rpq::intersect(&a, &b),
            BinOp::Concat => rpq::concat(&a, &b),
            BinOp::Union => rpq::union(&a, &b),
            BinOp::Eq => unreachable!("handled above"),
        };
        Ok(Value::Fsm(Rc::new(result)))
    }

    fn eval_set_op(&mut self, op: SetOp, set_expr: &Expr, fsm_expr: &Expr) -> Result<Value> {
        let vertices = self.expect_set(set_expr)?;
        let mut names = HashSet::new();
        for v in &vertices {
            match v {
                Value::Str(s) => {
                    names.insert(s.clone());
                }
                other => return Err(ErrorKind::TypeMismatch(format!("vertex set must contain strings, got a {}", other.type_name())).into()),
            }
        }

        let a = self.expect_fsm(fsm_expr)?;
        let mut out = (*a).clone();

        match op {
            SetOp::SetStart => {
                for s in out.starts().cloned().collect::<Vec<_>>() {
                    out.remove_start(s);
                }
                mark_vertices(&mut out, &names, true);
            }
            SetOp::SetFinal => {
                for s in out.acceptors().cloned().collect::<Vec<_>>() {
                    out.remove_final(s);
                }
                mark_vertices(&mut out, &names, false);
            }
            SetOp::AddStart => mark_vertices(&mut out, &names, true),
            SetOp::AddFinal => mark_vertices(&mut out, &names, false),
        }

        Ok(Value::Fsm(Rc::new(out)))
    }

    fn eval_get_op(&mut self, op: GetOp, fsm_expr: &Expr) -> Result<Value> {
        let a = self.expect_fsm(fsm_expr)?;

        match op {
            GetOp::StartOf => Ok(Value::Set(set_from(a.starts().flat_map(|s| tag_values(&a, *s))))),
            GetOp::FinalOf => Ok(Value::Set(set_from(a.acceptors().flat_map(|s| tag_values(&a, *s))))),
            GetOp::ReachableOf => {
                let reached = rpq::reachable_of(&a);
                Ok(Value::Set(set_from(reached.into_iter().map(Value::Str))))
            }
            GetOp::VerticesOf => {
                let all: Vec<Value> = (0..a.num_states()).flat_map(|s| tag_values(&a, s)).collect();
                Ok(Value::Set(set_from(all)))
            }
            GetOp::EdgesOf => {
                let mut triples = Vec::new();
                for (i, sym, j) in a.transitions() {
                    let sym = match sym {
                        Some(s) => s,
                        None => continue,
                    };
                    for from in tag_values(&a, i) {
                        for to in tag_values(&a, j) {
                            triples.push(Value::Tuple(vec![from.clone(), Value::Str(sym.to_string()), to]));
                        }
                    }
                }
                Ok(Value::Set(set_from(triples)))
            }
            GetOp::LabelsOf => Ok(Value::Set(set_from(a.used_symbols().into_iter().map(Value::Str)))),
        }
    }
}

/// Renders a state's vertex tags as DSL values: a bare `Str` for an
/// untagged (not-yet-unioned) vertex, or a `Tuple(Int(origin_code), Str)`
/// for a union-tagged one, e.g. `{(1,"s1"),(2,"s1_y")}`.
fn tag_values(a: &FiniteAutomaton, state: crate::fsm::StateId) -> Vec<Value> {
    a.tags(state)
        .iter()
        .map(|t| match t.origin {
            None => Value::Str(t.vertex.clone()),
            Some(Origin::Left) => Value::Tuple(vec![Value::Int(1), Value::Str(t.vertex.clone())]),
            Some(Origin::Right) => Value::Tuple(vec![Value::Int(2), Value::Str(t.vertex.clone())]),
        })
        .collect()
}

/// Marks every state whose untagged vertex name is in `names` as start
/// (`as_start = true`) or final. Names with no matching state are silently
/// skipped rather than treated as an error.
fn mark_vertices(a: &mut FiniteAutomaton, names: &HashSet<String>, as_start: bool) {
    for name in names {
        if let Some(id) = a.state_for_vertex(name) {
            if as_start {
                a.add_start(id);
            } else {
                a.add_final(id);
            }
        }
    }
}

fn call_lambda(loader: &Loader, param: &str, body: &Expr, captured_env: &Environment, arg: Value) -> Result<Value> {
    let mut call_env = captured_env.clone();
    call_env.push_frame();
    call_env.define(param, arg);

    let mut sub = Interpreter {
        env: call_env,
        loader: loader.clone(),
        log: Vec::new(),
    };
    sub.eval(body)
}
