//! The grammar front-end: CFGs and their reduction to Weakened Chomsky
//! Normal Form, extended CFGs, and recursive state machines built from
//! them.

pub mod cfg;
pub mod ecfg;
pub mod rsm;

pub use self::cfg::{Cfg, Symbol, Wcnf, WcnfProduction};
pub use self::ecfg::Ecfg;
pub use self::rsm::Rsm;
