//! Grammar compiler
//!
//! Lowers a [`Grammar`] into index-resolved nodes and wraps it, together with a tokenizer derived
//! from the grammar's literals, into a [`GrammarParser`] that can be run against sample text.

use super::matcher::Matcher;
use super::schema::EbnfSchema;
use super::{Expr, Grammar};
use crate::error::ParseError;
use crate::events::Listeners;
use crate::interface::{SampleParser, Tokenizer};
use crate::lexing::{lex, SampleTokenizer};
use crate::outcome::ParseOutcome;
use std::collections::HashMap;

/// A rule body with rule references resolved to indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Node {
    Alternation(Vec<Node>),
    Sequence(Vec<Node>),
    Optional(Box<Node>),
    Repeat(Box<Node>),
    OneOrMore(Box<Node>),
    Times(u32, Box<Node>),
    Except(Box<Node>, Box<Node>),
    Terminal(String),
    Rule(usize),
    AnyToken,
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Compiled {
    pub(crate) names: Vec<String>,
    pub(crate) bodies: Vec<Node>,
}

impl Compiled {
    /// Rules defined more than once are merged into one rule with one alternative per definition.
    fn new(grammar: &Grammar) -> Result<Self, ParseError> {
        let mut names: Vec<String> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();
        for rule in &grammar.rules {
            if !index.contains_key(rule.name.as_str()) {
                index.insert(rule.name.as_str(), names.len());
                names.push(rule.name.clone());
            }
        }
        if names.is_empty() {
            return Err(ParseError::EmptyGrammar);
        }

        let mut definitions: Vec<Vec<Node>> = vec![Vec::new(); names.len()];
        for rule in &grammar.rules {
            let node = lower(&rule.body, &index)?;
            definitions[index[rule.name.as_str()]].push(node);
        }

        let bodies = definitions
            .into_iter()
            .map(|mut alternatives| {
                if alternatives.len() == 1 {
                    alternatives.remove(0)
                } else {
                    Node::Alternation(alternatives)
                }
            })
            .collect();

        Ok(Self { names, bodies })
    }
}

fn lower(expr: &Expr, index: &HashMap<&str, usize>) -> Result<Node, ParseError> {
    let node = match expr {
        Expr::Alternation(items) => Node::Alternation(lower_all(items, index)?),
        Expr::Sequence(items) => Node::Sequence(lower_all(items, index)?),
        Expr::Optional(inner) => Node::Optional(Box::new(lower(inner, index)?)),
        Expr::Repeat(inner) | Expr::ZeroOrMore(inner) => Node::Repeat(Box::new(lower(inner, index)?)),
        Expr::OneOrMore(inner) => Node::OneOrMore(Box::new(lower(inner, index)?)),
        Expr::Times(count, inner) => Node::Times(*count, Box::new(lower(inner, index)?)),
        Expr::Except(left, right) => {
            Node::Except(Box::new(lower(left, index)?), Box::new(lower(right, index)?))
        }
        Expr::Terminal(literal) => Node::Terminal(literal.clone()),
        Expr::NonTerminal(name) => match index.get(name.as_str()) {
            Some(idx) => Node::Rule(*idx),
            None => return Err(ParseError::UndefinedRule(name.clone())),
        },
        Expr::Special(_) => Node::AnyToken,
        Expr::Empty => Node::Empty,
    };
    Ok(node)
}

fn lower_all(items: &[Expr], index: &HashMap<&str, usize>) -> Result<Vec<Node>, ParseError> {
    items.iter().map(|item| lower(item, index)).collect()
}

/// Parser generated from a user grammar.
///
/// The first rule is the start rule. Special sequences (`? ... ?`) match any single token.
#[derive(Debug, Clone)]
pub struct GrammarParser {
    grammar: Grammar,
    compiled: Compiled,
    tokenizer: SampleTokenizer,
}

impl GrammarParser {
    /// Build a parser from EBNF source text.
    pub fn from_source(source: &str) -> Result<Self, ParseError> {
        Self::from_tokens(&lex(source))
    }

    /// Build a parser from an already lexed grammar.
    pub fn from_tokens(tokens: &[String]) -> Result<Self, ParseError> {
        let parse = EbnfSchema::new().parse_tokens(tokens, &mut Listeners::new());
        if let ParseOutcome::HaltedAt(index) = parse.outcome {
            return Err(ParseError::GrammarSyntax {
                index,
                token: tokens.get(index).cloned().unwrap_or_default(),
            });
        }
        Self::from_grammar(parse.grammar)
    }

    pub fn from_grammar(grammar: Grammar) -> Result<Self, ParseError> {
        let compiled = Compiled::new(&grammar)?;
        let tokenizer = SampleTokenizer::new(grammar.terminals());
        Ok(Self {
            grammar,
            compiled,
            tokenizer,
        })
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn start_rule(&self) -> &str {
        &self.compiled.names[0]
    }

    pub fn sample_tokenizer(&self) -> &SampleTokenizer {
        &self.tokenizer
    }
}

impl SampleParser for GrammarParser {
    fn parse(&self, text: &str) -> Result<ParseOutcome, ParseError> {
        let tokens = self.tokenizer.lex(text);
        Matcher::run(&self.compiled, &tokens)
    }

    fn tokenizer(&self) -> &dyn Tokenizer {
        &self.tokenizer
    }
}
