//! Recursive-descent parser for the regex surface syntax used by
//! `loadFrom regex "…"` and ECFG production bodies: space-separated
//! concatenation, `|` alternation, `*` postfix star, and parenthesized
//! grouping. Identifiers are whole tokens, not single characters: `"a b"`
//! is the two-symbol concatenation `a` then `b`, not five single-char
//! symbols.
//!
//! Grammar (lowest to highest precedence):
//!   expr   := term ('|' term)*
//!   term   := factor+
//!   factor := atom '*'?
//!   atom   := IDENT | '(' expr ')' | '(' ')'

use super::ast::RegexNode;

#[derive(Clone, Debug, PartialEq, Eq)]
enum Token {
    Ident(String),
    LParen,
    RParen,
    Star,
    Pipe,
}

fn lex(src: &str) -> Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let mut chars = src.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            '*' => {
                chars.next();
                tokens.push(Token::Star);
            }
            '|' => {
                chars.next();
                tokens.push(Token::Pipe);
            }
            c if c.is_alphanumeric() || c == '_' => {
                let mut ident = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_alphanumeric() || c == '_' {
                        ident.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Ident(ident));
            }
            other => return Err(format!("unexpected character '{}' in regex", other)),
        }
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn bump(&mut self) -> Option<Token> {
        let t = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        t
    }

    fn parse_expr(&mut self) -> Result<RegexNode, String> {
        let mut node = self.parse_term()?;
        while let Some(Token::Pipe) = self.peek() {
            self.bump();
            let rhs = self.parse_term()?;
            node = RegexNode::alt(node, rhs);
        }
        Ok(node)
    }

    fn parse_term(&mut self) -> Result<RegexNode, String> {
        let mut node: Option<RegexNode> = None;
        loop {
            match self.peek() {
                Some(Token::Ident(_)) | Some(Token::LParen) => {
                    let factor = self.parse_factor()?;
                    node = Some(match node {
                        Some(acc) => RegexNode::concat(acc, factor),
                        None => factor,
                    });
                }
                _ => break,
            }
        }
        node.ok_or_else(|| "expected a regex term".to_string())
    }

    fn parse_factor(&mut self) -> Result<RegexNode, String> {
        let mut atom = self.parse_atom()?;
        while let Some(Token::Star) = self.peek() {
            self.bump();
            atom = RegexNode::star(atom);
        }
        Ok(atom)
    }

    fn parse_atom(&mut self) -> Result<RegexNode, String> {
        match self.bump() {
            Some(Token::Ident(name)) => Ok(RegexNode::Symbol(name)),
            Some(Token::LParen) => {
                if let Some(Token::RParen) = self.peek() {
                    self.bump();
                    return Ok(RegexNode::Epsilon);
                }
                let inner = self.parse_expr()?;
                match self.bump() {
                    Some(Token::RParen) => Ok(inner),
                    _ => Err("unclosed '(' in regex".to_string()),
                }
            }
            Some(other) => Err(format!("unexpected token {:?} in regex", other)),
            None => Err("unexpected end of regex".to_string()),
        }
    }
}

/// Parses a complete regex string, requiring every token to be consumed.
pub fn parse(src: &str) -> Result<RegexNode, String> {
    let tokens = lex(src)?;
    let mut parser = Parser { tokens, pos: 0 };
    let node = parser.parse_expr()?;
    if parser.pos != parser.tokens.len() {
        return Err("trailing input after regex".to_string());
    }
    Ok(node)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_symbol() {
        assert_eq!(parse("a").unwrap(), RegexNode::Symbol("a".to_string()));
    }

    #[test]
    fn parses_concatenation_by_whitespace() {
        let got = parse("a b").unwrap();
        let want = RegexNode::concat(RegexNode::Symbol("a".into()), RegexNode::Symbol("b".into()));
        assert_eq!(got, want);
    }

    #[test]
    fn star_binds_tighter_than_concat() {
        let got = parse("a b*").unwrap();
        let want = RegexNode::concat(
            RegexNode::Symbol("a".into()),
            RegexNode::star(RegexNode::Symbol("b".into())),
        );
        assert_eq!(got, want);
    }

    #[test]
    fn parenthesized_group_can_be_starred() {
        let got = parse("(a b)*").unwrap();
        let want = RegexNode::star(RegexNode::concat(
            RegexNode::Symbol("a".into()),
            RegexNode::Symbol("b".into()),
        ));
        assert_eq!(got, want);
    }

    #[test]
    fn alternation_is_lowest_precedence() {
        let got = parse("a b | c").unwrap();
        let want = RegexNode::alt(
            RegexNode::concat(RegexNode::Symbol("a".into()), RegexNode::Symbol("b".into())),
            RegexNode::Symbol("c".into()),
        );
        assert_eq!(got, want);
    }

    #[test]
    fn rejects_unclosed_group() {
        assert!(parse("(a b").is_err());
    }

    #[test]
    fn rejects_trailing_garbage() {
        assert!(parse("a b)").is_err());
    }
}
