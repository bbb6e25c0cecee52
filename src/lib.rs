//! A tree-walking interpreter and query-evaluation engine for a small DSL
//! of finite-state and context-free path queries over labeled directed
//! multigraphs.

#[macro_use]
extern crate error_chain;

pub mod algorithms;
pub mod ast;
pub mod bool_matrix;
pub mod cfpq;
pub mod env;
pub mod error;
pub mod eval;
pub mod fsm;
pub mod grammar;
pub mod graph;
pub mod loader;
pub mod printer;
pub mod regexp;
pub mod rpq;
pub mod value;

pub use error::{Error, ErrorKind, Result};
pub use eval::Interpreter;
