//! Extended context-free grammars: one production per nonterminal, body is a
//! regex over `N ∪ T`.

use std::collections::BTreeMap;

use crate::error::{ErrorKind, Result};
use crate::regexp::ast::RegexNode;
use crate::regexp::parser;

#[derive(Clone, Debug, Default)]
pub struct Ecfg {
    pub start: String,
    pub productions: BTreeMap<String, RegexNode>,
}

impl Ecfg {
    /// Parses lines of the form `X -> regex`, one nonterminal production per
    /// line; blank lines are skipped. Declaring the same nonterminal twice is
    /// a grammar error.
    pub fn from_text(start: impl Into<String>, text: &str) -> Result<Self> {
        let mut productions = BTreeMap::new();

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let (head, body) = line.split_once("->").ok_or_else(|| {
                ErrorKind::GrammarError(format!("expected 'X -> regex', got '{}'", line))
            })?;
            let head = head.trim().to_string();
            if head.is_empty() {
                return Err(ErrorKind::GrammarError(format!("empty nonterminal name in '{}'", line)).into());
            }

            if productions.contains_key(&head) {
                return Err(ErrorKind::GrammarError(format!("nonterminal '{}' declared twice", head)).into());
            }

            let node = parser::parse(body.trim())
                .map_err(|e| ErrorKind::GrammarError(format!("in production for '{}': {}", head, e)))?;
            productions.insert(head, node);
        }

        Ok(Ecfg {
            start: start.into(),
            productions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_multiple_productions() {
        let ecfg = Ecfg::from_text("S", "S -> A B\nA -> a\nB -> b").unwrap();
        assert_eq!(ecfg.productions.len(), 3);
        assert!(ecfg.productions.contains_key("S"));
    }

    #[test]
    fn duplicate_nonterminal_is_a_grammar_error() {
        let err = Ecfg::from_text("S", "S -> a\nS -> b").unwrap_err();
        assert!(err.to_string().contains("declared twice"));
    }

    #[test]
    fn malformed_line_is_a_grammar_error() {
        assert!(Ecfg::from_text("S", "not a production").is_err());
    }
}
