//! Grammar model, grammar-of-grammars parser and grammar compiler
//!
//! `schema` parses EBNF text (the grammar-of-grammars) and reports events to listeners while it
//! builds a [`Grammar`]. `compile` turns a `Grammar` into a [`GrammarParser`] that recognizes
//! sample text; the recognizer itself lives in `matcher`.

mod compile;
mod matcher;
mod schema;

pub use compile::GrammarParser;
pub use schema::{EbnfSchema, SchemaParse};

use serde::Serialize;

/// Right-hand side of a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Expr {
    /// `a | b | c`
    Alternation(Vec<Expr>),
    /// `a, b, c`
    Sequence(Vec<Expr>),
    /// `[ a ]`
    Optional(Box<Expr>),
    /// `{ a }`
    Repeat(Box<Expr>),
    /// `n * a`
    Times(u32, Box<Expr>),
    /// `a - b`
    Except(Box<Expr>, Box<Expr>),
    /// `a *`
    ZeroOrMore(Box<Expr>),
    /// `a +`
    OneOrMore(Box<Expr>),
    /// A quoted literal, without its quotes.
    Terminal(String),
    /// A reference to another rule.
    NonTerminal(String),
    /// `? ... ?`, without the question marks.
    Special(String),
    /// Nothing at all.
    Empty,
}

impl Expr {
    /// Visit every terminal literal in this expression.
    pub fn terminals<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Expr::Alternation(items) | Expr::Sequence(items) => {
                for item in items {
                    item.terminals(out);
                }
            }
            Expr::Optional(inner)
            | Expr::Repeat(inner)
            | Expr::Times(_, inner)
            | Expr::ZeroOrMore(inner)
            | Expr::OneOrMore(inner) => inner.terminals(out),
            Expr::Except(left, right) => {
                left.terminals(out);
                right.terminals(out);
            }
            Expr::Terminal(literal) => out.push(literal),
            Expr::NonTerminal(_) | Expr::Special(_) | Expr::Empty => {}
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rule {
    pub name: String,
    pub body: Expr,
}

/// Rules in declaration order; the first rule is the start rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Grammar {
    pub rules: Vec<Rule>,
}

impl Grammar {
    pub fn start_rule(&self) -> Option<&Rule> {
        self.rules.first()
    }

    pub fn rule(&self, name: &str) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.name == name)
    }

    pub fn terminals(&self) -> Vec<&str> {
        let mut out = Vec::new();
        for rule in &self.rules {
            rule.body.terminals(&mut out);
        }
        out
    }
}

/// Strip the surrounding quotes (or question marks) of a literal token.
pub(crate) fn unquote(token: &str) -> &str {
    let mut chars = token.chars();
    match (chars.next(), chars.next_back()) {
        (Some(_), Some(_)) => &token[1..token.len() - 1],
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unquote_drops_delimiters() {
        assert_eq!(unquote("\"abc\""), "abc");
        assert_eq!(unquote("''"), "");
        assert_eq!(unquote("? any ?"), " any ");
        assert_eq!(unquote("\""), "");
    }

    #[test]
    fn collects_terminals_in_order() {
        let grammar = Grammar {
            rules: vec![Rule {
                name: "s".into(),
                body: Expr::Sequence(vec![
                    Expr::Terminal("a".into()),
                    Expr::Optional(Box::new(Expr::Terminal("b".into()))),
                    Expr::NonTerminal("t".into()),
                ]),
            }],
        };
        assert_eq!(grammar.terminals(), vec!["a", "b"]);
        assert_eq!(grammar.start_rule().map(|r| r.name.as_str()), Some("s"));
        assert!(grammar.rule("t").is_none());
    }
}
