//! A thin smoke-test binary: builds a small graph and a couple of DSL
//! statements by hand (there is no parser wired up yet) and prints what
//! the interpreter produces.

use lagraph::ast::{BinOp, Expr, LoadKind, SetOp, Stmt};
use lagraph::graph::LabeledMultigraph;
use lagraph::loader::Loader;
use lagraph::Interpreter;

fn main() {
    env_logger::init();

    let mut g = LabeledMultigraph::new();
    g.add_edge("s1", "a", "s2");
    g.add_edge("s2", "b", "s3");

    let mut loader = Loader::new();
    loader.register("demo", g);

    let program = vec![
        Stmt::Let("g".into(), Expr::Load(LoadKind::Name, "demo".into())),
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
        Stmt::Print(Expr::GetOp(lagraph::ast::GetOp::StartOf, Box::new(Expr::Var("q".into())))),
        Stmt::Print(Expr::GetOp(lagraph::ast::GetOp::ReachableOf, Box::new(Expr::Var("g".into())))),
    ];

    let mut interpreter = Interpreter::new(loader);
    match interpreter.run(&program) {
        Ok(()) => {
            for line in interpreter.log() {
                println!("{}", line);
            }
        }
        Err(e) => {
            eprintln!("Interpretation error: {}", e);
            std::process::exit(1);
        }
    }
}
