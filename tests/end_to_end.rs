//! The six literal end-to-end scenarios from the DSL's evaluator contract,
//! constructed directly as `ast::Expr`/`ast::Stmt` trees since parsing is an
//! external collaborator.

use std::rc::Rc;

use lagraph::ast::{BinOp, Expr, GetOp, LoadKind, SetOp, Stmt};
use lagraph::graph::LabeledMultigraph;
use lagraph::loader::Loader;
use lagraph::Interpreter;

fn run(loader: Loader, program: Vec<Stmt>) -> Vec<String> {
    let mut interpreter = Interpreter::new(loader);
    interpreter.run(&program).expect("program should evaluate without error");
    interpreter.log().to_vec()
}

#[test]
fn scenario_1_int_print() {
    let log = run(
        Loader::new(),
        vec![Stmt::Let("x".into(), Expr::IntLit(42)), Stmt::Print(Expr::Var("x".into()))],
    );
    assert_eq!(log, vec!["42".to_string()]);
}

#[test]
fn scenario_2_map_dedups_to_single_element() {
    let lambda = Expr::Lambda("x".into(), Rc::new(Expr::IntLit(42)));
    let log = run(
        Loader::new(),
        vec![
            Stmt::Let("s".into(), Expr::SetLit(vec![Expr::IntLit(1), Expr::IntLit(2), Expr::IntLit(3)])),
            Stmt::Let("t".into(), Expr::Map(Box::new(lambda), Box::new(Expr::Var("s".into())))),
            Stmt::Print(Expr::Var("t".into())),
        ],
    );
    assert_eq!(log, vec!["{42}".to_string()]);
}

#[test]
fn scenario_3_in_set_membership() {
    let set = Expr::SetLit(vec![
        Expr::StringLit("a".into()),
        Expr::StringLit("b".into()),
        Expr::StringLit("c".into()),
    ]);
    let log = run(
        Loader::new(),
        vec![
            Stmt::Let("s".into(), set),
            Stmt::Let(
                "y".into(),
                Expr::InSet(Box::new(Expr::StringLit("a".into())), Box::new(Expr::Var("s".into()))),
            ),
            Stmt::Let(
                "n".into(),
                Expr::InSet(Box::new(Expr::StringLit("r".into())), Box::new(Expr::Var("s".into()))),
            ),
            Stmt::Print(Expr::Var("y".into())),
            Stmt::Print(Expr::Var("n".into())),
        ],
    );
    assert_eq!(log, vec!["1".to_string(), "0".to_string()]);
}

#[test]
fn scenario_4_rpq_via_intersection_reaches_s1_s3() {
    let mut g = LabeledMultigraph::new();
    g.add_edge("s1", "a", "s2");
    g.add_edge("s2", "b", "s3");
    let mut loader = Loader::new();
    loader.register("g", g);

    let mut interpreter = Interpreter::new(loader);
    let program = vec![
        Stmt::Let("g".into(), Expr::Load(LoadKind::Name, "g".into())),
        Stmt::Let(
            "g".into(),
            Expr::SetOp(
                SetOp::SetStart,
                Box::new(Expr::SetLit(vec![Expr::StringLit("s1".into())])),
                Box::new(Expr::Var("g".into())),
            ),
        ),
        Stmt::Let(
            "g".into(),
            Expr::SetOp(
                SetOp::SetFinal,
                Box::new(Expr::SetLit(vec![Expr::StringLit("s3".into())])),
                Box::new(Expr::Var("g".into())),
            ),
        ),
        Stmt::Let("r".into(), Expr::Load(LoadKind::Regex, "(a b)*".into())),
        Stmt::Let(
            "q".into(),
            Expr::BinOp(BinOp::Intersect, Box::new(Expr::Var("g".into())), Box::new(Expr::Var("r".into()))),
        ),
    ];
    interpreter.run(&program).unwrap();

    let q = match interpreter.lookup("q").cloned().unwrap() {
        lagraph::value::Value::Fsm(a) => a,
        _ => panic!("expected fsm"),
    };
    let pairs = lagraph::rpq::regular_path_query(&q, &q);
    assert!(pairs.iter().any(|(u, v)| u == "s1" && v == "s3"));
}

#[test]
fn scenario_5_cfpq_hellings_and_matrix_agree() {
    use lagraph::cfpq::{rpq, Method};
    use lagraph::grammar::cfg::{Cfg, Symbol};

    let mut g = LabeledMultigraph::new();
    g.add_edge("0", "a", "1");
    g.add_edge("1", "b", "2");
    g.add_edge("2", "c", "3");

    let mut cfg = Cfg::new("S");
    cfg.add_production("S", vec![Symbol::NonTerminal("A".into()), Symbol::NonTerminal("N".into())]);
    cfg.add_production("N", vec![Symbol::NonTerminal("B".into()), Symbol::NonTerminal("C".into())]);
    cfg.add_production("A", vec![Symbol::Terminal("a".into())]);
    cfg.add_production("B", vec![Symbol::Terminal("b".into())]);
    cfg.add_production("C", vec![Symbol::Terminal("c".into())]);
    let wcnf = cfg.to_wcnf();

    let hellings_all = lagraph::cfpq::hellings::solve(&g, &wcnf);
    let matrix_all = lagraph::cfpq::matrix::solve(&g, &wcnf);
    assert_eq!(hellings_all, matrix_all);

    let mut expect = std::collections::BTreeSet::new();
    for (u, n, v) in [
        ("0", "A", "1"),
        ("1", "B", "2"),
        ("2", "C", "3"),
        ("1", "N", "3"),
        ("0", "S", "3"),
    ] {
        expect.insert((u.to_string(), n.to_string(), v.to_string()));
    }
    assert_eq!(hellings_all, expect);

    let s_only = rpq(Method::Hellings, &g, &wcnf, Some("S"), None, None);
    let mut expect_s = std::collections::BTreeSet::new();
    expect_s.insert(("0".to_string(), "3".to_string()));
    assert_eq!(s_only, expect_s);
}

#[test]
fn scenario_6_union_tags_states_by_origin() {
    let mut x = LabeledMultigraph::new();
    x.add_edge("s1", "a", "s2");
    let mut y = LabeledMultigraph::new();
    y.add_edge("s1_y", "a", "s2_y");

    let mut loader = Loader::new();
    loader.register("x", x);
    loader.register("y", y);

    let mut interpreter = Interpreter::new(loader);
    let program = vec![
        Stmt::Let("x".into(), Expr::Load(LoadKind::Name, "x".into())),
        Stmt::Let(
            "x".into(),
            Expr::SetOp(
                SetOp::SetStart,
                Box::new(Expr::SetLit(vec![Expr::StringLit("s1".into())])),
                Box::new(Expr::Var("x".into())),
            ),
        ),
        Stmt::Let(
            "x".into(),
            Expr::SetOp(
                SetOp::SetFinal,
                Box::new(Expr::SetLit(vec![Expr::StringLit("s2".into())])),
                Box::new(Expr::Var("x".into())),
            ),
        ),
        Stmt::Let("y".into(), Expr::Load(LoadKind::Name, "y".into())),
        Stmt::Let(
            "y".into(),
            Expr::SetOp(
                SetOp::SetStart,
                Box::new(Expr::SetLit(vec![Expr::StringLit("s1_y".into())])),
                Box::new(Expr::Var("y".into())),
            ),
        ),
        Stmt::Let(
            "u".into(),
            Expr::BinOp(BinOp::Union, Box::new(Expr::Var("x".into())), Box::new(Expr::Var("y".into()))),
        ),
        Stmt::Print(Expr::GetOp(GetOp::StartOf, Box::new(Expr::Var("u".into())))),
    ];
    interpreter.run(&program).unwrap();

    let log = interpreter.log();
    assert_eq!(log.len(), 1);
    assert!(log[0].contains("(1,\"s1\")"));
    assert!(log[0].contains("(2,\"s1_y\")"));
}
