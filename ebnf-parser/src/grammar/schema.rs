//! The grammar-of-grammars parser
//!
//! A recursive descent parser for the ISO 14977 flavour of EBNF:
//!
//!     syntax              = {syntax rule};
//!     syntax rule         = meta identifier, "=", definitions list, (";" | ".");
//!     definitions list    = single definition, {"|", single definition};
//!     single definition   = syntactic term, {",", syntactic term};
//!     syntactic term      = syntactic factor, ["-", syntactic factor];
//!     syntactic factor    = [integer, "*"], syntactic primary, ["*" | "+"];
//!     syntactic primary   = optional sequence | repeated sequence | grouped sequence
//!                         | meta identifier | terminal string | special sequence
//!                         | empty sequence;
//!
//! Leaf events are emitted the moment their token is consumed, which keeps listeners in document
//! order. The parser never backtracks, so no event is ever emitted for a branch that is later
//! abandoned.
//!
//! Running out of tokens is not an error: a half-written last rule parses as `Complete`, and an
//! unterminated final rule is still kept in the grammar.

use super::{unquote, Expr, Grammar, Rule};
use crate::events::{nodes, Listeners, ParseEvent};
use crate::interface::Tokenizer;
use crate::lexing::EbnfLexer;
use crate::outcome::ParseOutcome;
use crate::token::TokenKind;

/// Deepest `[ ( {` nesting accepted before the parser halts.
const MAX_NESTING: usize = 256;

/// Result of one grammar-of-grammars parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaParse {
    pub outcome: ParseOutcome,
    pub grammar: Grammar,
}

/// Parser for EBNF grammar sources.
#[derive(Debug, Clone, Copy, Default)]
pub struct EbnfSchema {
    lexer: EbnfLexer,
}

impl EbnfSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lexer(lexer: EbnfLexer) -> Self {
        Self { lexer }
    }

    pub fn lexer(&self) -> &EbnfLexer {
        &self.lexer
    }

    /// Lex and parse `text`, reporting events to `listeners`.
    pub fn parse(&self, text: &str, listeners: &mut Listeners<'_>) -> ParseOutcome {
        let tokens = self.lexer.lex(text);
        self.parse_tokens(&tokens, listeners).outcome
    }

    /// Parse an already lexed token sequence.
    pub fn parse_tokens(&self, tokens: &[String], listeners: &mut Listeners<'_>) -> SchemaParse {
        let mut parser = SchemaParser {
            tokens,
            pos: 0,
            depth: 0,
            listeners,
        };
        let mut rules = Vec::new();
        let outcome = match parser.syntax(&mut rules) {
            Ok(()) => ParseOutcome::Complete,
            Err(Stop(index)) if index >= tokens.len() => ParseOutcome::Complete,
            Err(Stop(index)) => ParseOutcome::HaltedAt(index),
        };
        log::trace!(
            "schema parse of {} tokens: {} ({} rules)",
            tokens.len(),
            outcome,
            rules.len()
        );
        SchemaParse {
            outcome,
            grammar: Grammar { rules },
        }
    }
}

/// The token index the parser could not get past.
struct Stop(usize);

type Step<T> = Result<T, Stop>;

struct SchemaParser<'t, 'l, 'a> {
    tokens: &'t [String],
    pos: usize,
    depth: usize,
    listeners: &'l mut Listeners<'a>,
}

impl<'t> SchemaParser<'t, '_, '_> {
    fn peek_kind(&self) -> Option<TokenKind> {
        self.tokens
            .get(self.pos)
            .map(|token| TokenKind::classify(token))
    }

    fn emit(&mut self, node_name: &str, from: usize, to: usize) {
        if self.listeners.wants(node_name) {
            let result = self.tokens[from..to].join(" ");
            self.listeners
                .emit(&ParseEvent::new(node_name, result, from, to));
        }
    }

    /// Consume the current token, reporting it as `node_name`.
    fn bump(&mut self, node_name: &str) -> &'t str {
        let tokens = self.tokens;
        let from = self.pos;
        self.pos += 1;
        self.emit(node_name, from, self.pos);
        &tokens[from]
    }

    fn expect(&mut self, kind: TokenKind, node_name: &str) -> Step<&'t str> {
        if self.peek_kind() == Some(kind) {
            Ok(self.bump(node_name))
        } else {
            Err(Stop(self.pos))
        }
    }

    fn nested<T>(&mut self, body: impl FnOnce(&mut Self) -> Step<T>) -> Step<T> {
        if self.depth >= MAX_NESTING {
            return Err(Stop(self.pos));
        }
        self.depth += 1;
        let result = body(self);
        self.depth -= 1;
        result
    }

    fn syntax(&mut self, rules: &mut Vec<Rule>) -> Step<()> {
        while self.pos < self.tokens.len() {
            rules.push(self.syntax_rule()?);
        }
        Ok(())
    }

    fn syntax_rule(&mut self) -> Step<Rule> {
        let start = self.pos;
        let name = self
            .expect(TokenKind::MetaIdentifier, nodes::META_IDENTIFIER)?
            .to_string();
        self.expect(TokenKind::Defining, nodes::DEFINING_SYMBOL)?;
        let body = self.definitions_list()?;
        match self.peek_kind() {
            Some(TokenKind::Terminator) => {
                self.bump(nodes::TERMINATOR_SYMBOL);
            }
            None => {}
            Some(_) => return Err(Stop(self.pos)),
        }
        self.emit(nodes::SYNTAX_RULE, start, self.pos);
        Ok(Rule { name, body })
    }

    fn definitions_list(&mut self) -> Step<Expr> {
        let mut alternatives = vec![self.single_definition()?];
        while self.peek_kind() == Some(TokenKind::DefinitionSeparator) {
            self.bump(nodes::DEFINITION_SEPARATOR_SYMBOL);
            alternatives.push(self.single_definition()?);
        }
        Ok(collapse(alternatives, Expr::Alternation))
    }

    fn single_definition(&mut self) -> Step<Expr> {
        let mut terms = vec![self.syntactic_term()?];
        while self.peek_kind() == Some(TokenKind::Concatenate) {
            self.bump(nodes::CONCATENATE_SYMBOL);
            terms.push(self.syntactic_term()?);
        }
        Ok(collapse(terms, Expr::Sequence))
    }

    fn syntactic_term(&mut self) -> Step<Expr> {
        let factor = self.syntactic_factor()?;
        if self.peek_kind() == Some(TokenKind::Except) {
            self.bump(nodes::EXCEPT_SYMBOL);
            let exception = self.syntactic_factor()?;
            return Ok(Expr::Except(Box::new(factor), Box::new(exception)));
        }
        Ok(factor)
    }

    fn syntactic_factor(&mut self) -> Step<Expr> {
        let mut factor = if self.peek_kind() == Some(TokenKind::Integer) {
            let at = self.pos;
            let count: u32 = self.bump(nodes::INTEGER).parse().map_err(|_| Stop(at))?;
            self.expect(TokenKind::Repetition, nodes::REPETITION_SYMBOL)?;
            Expr::Times(count, Box::new(self.syntactic_primary()?))
        } else {
            self.syntactic_primary()?
        };

        match self.peek_kind() {
            Some(TokenKind::Repetition) => {
                self.bump(nodes::REPETITION_SYMBOL);
                factor = Expr::ZeroOrMore(Box::new(factor));
            }
            Some(TokenKind::Plus) => {
                self.bump(nodes::REPETITION_SYMBOL);
                factor = Expr::OneOrMore(Box::new(factor));
            }
            _ => {}
        }
        Ok(factor)
    }

    fn syntactic_primary(&mut self) -> Step<Expr> {
        match self.peek_kind() {
            Some(TokenKind::StartOption) => self.nested(|p| {
                p.bump(nodes::START_OPTION_SYMBOL);
                let inner = p.definitions_list()?;
                p.expect(TokenKind::EndOption, nodes::END_OPTION_SYMBOL)?;
                Ok(Expr::Optional(Box::new(inner)))
            }),
            Some(TokenKind::StartRepeat) => self.nested(|p| {
                p.bump(nodes::START_REPEAT_SYMBOL);
                let inner = p.definitions_list()?;
                p.expect(TokenKind::EndRepeat, nodes::END_REPEAT_SYMBOL)?;
                Ok(Expr::Repeat(Box::new(inner)))
            }),
            Some(TokenKind::StartGroup) => self.nested(|p| {
                p.bump(nodes::START_GROUP_SYMBOL);
                let inner = p.definitions_list()?;
                p.expect(TokenKind::EndGroup, nodes::END_GROUP_SYMBOL)?;
                Ok(inner)
            }),
            Some(TokenKind::MetaIdentifier) => {
                let name = self.bump(nodes::META_IDENTIFIER);
                Ok(Expr::NonTerminal(name.to_string()))
            }
            Some(TokenKind::TerminalString) => {
                let literal = self.bump(nodes::TERMINAL_STRING);
                Ok(Expr::Terminal(unquote(literal).to_string()))
            }
            Some(TokenKind::SpecialSequence) => {
                let special = self.bump(nodes::SPECIAL_SEQUENCE);
                Ok(Expr::Special(unquote(special).trim().to_string()))
            }
            // Empty sequence: the primary is simply absent.
            None
            | Some(
                TokenKind::Concatenate
                | TokenKind::DefinitionSeparator
                | TokenKind::Terminator
                | TokenKind::EndOption
                | TokenKind::EndRepeat
                | TokenKind::EndGroup,
            ) => Ok(Expr::Empty),
            Some(_) => Err(Stop(self.pos)),
        }
    }
}

fn collapse(mut items: Vec<Expr>, wrap: fn(Vec<Expr>) -> Expr) -> Expr {
    if items.len() == 1 {
        items.remove(0)
    } else {
        wrap(items)
    }
}
