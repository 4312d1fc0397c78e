//! Lexing for grammar sources and for sample text
//!
//! Two tokenizers live here:
//!
//!     EbnfLexer        Tokenizes EBNF grammar text. Whitespace and comments are dropped; the
//!                      whitespace inside quoted literals is kept by default and can be stripped
//!                      with `EbnfLexer::stripping()`.
//!     SampleTokenizer  Tokenizes sample text for a compiled grammar. It skips whitespace, prefers
//!                      the longest terminal literal of the grammar at the cursor and otherwise
//!                      emits a single character.
//!
//! Both produce bare token strings: downstream consumers (offset mapping, issue detection) only see
//! text, never spans.

use crate::interface::Tokenizer;
use crate::token::{RawToken, Token, TokenKind};
use logos::Logos;

/// Tokenize EBNF source into spanned tokens, keeping invalid input as `Invalid` tokens.
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut lexer = RawToken::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let text = lexer.slice();
        match result {
            Ok(raw) => {
                if let Some(kind) = TokenKind::from_raw(raw) {
                    tokens.push(Token::new(kind, text, span));
                }
            }
            Err(()) => tokens.push(Token::new(TokenKind::Invalid, text, span)),
        }
    }

    tokens
}

/// Tokenize EBNF source into bare token strings.
pub fn lex(source: &str) -> Vec<String> {
    EbnfLexer::new().lex(source)
}

/// Lexer for EBNF grammar text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EbnfLexer {
    preserve_quoted_whitespace: bool,
}

impl EbnfLexer {
    /// Lexer that keeps whitespace inside quoted literals verbatim.
    pub fn new() -> Self {
        Self {
            preserve_quoted_whitespace: true,
        }
    }

    /// Lexer that removes whitespace inside quoted literals (`"a b"` becomes `"ab"`).
    pub fn stripping() -> Self {
        Self {
            preserve_quoted_whitespace: false,
        }
    }

    pub fn tokens(&self, source: &str) -> Vec<Token> {
        let mut tokens = tokenize(source);
        if !self.preserve_quoted_whitespace {
            for token in tokens
                .iter_mut()
                .filter(|token| token.kind == TokenKind::TerminalString)
            {
                token.text.retain(|c| !c.is_whitespace());
            }
        }
        tokens
    }
}

impl Default for EbnfLexer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer for EbnfLexer {
    fn lex(&self, text: &str) -> Vec<String> {
        self.tokens(text)
            .into_iter()
            .map(|token| token.text)
            .collect()
    }
}

/// Tokenizer for sample text matched against a compiled grammar.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SampleTokenizer {
    /// Terminal literals, longest first.
    literals: Vec<String>,
}

impl SampleTokenizer {
    pub fn new<I, S>(literals: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut literals: Vec<String> = literals
            .into_iter()
            .map(Into::into)
            .filter(|literal| !literal.is_empty())
            .collect();
        literals.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        literals.dedup();
        Self { literals }
    }

    pub fn literals(&self) -> &[String] {
        &self.literals
    }
}

impl Tokenizer for SampleTokenizer {
    fn lex(&self, text: &str) -> Vec<String> {
        let mut tokens = Vec::new();
        let mut rest = text;

        loop {
            rest = rest.trim_start();
            let Some(ch) = rest.chars().next() else {
                break;
            };

            let literal = self
                .literals
                .iter()
                .find(|literal| rest.starts_with(literal.as_str()));
            let len = match literal {
                Some(literal) => literal.len(),
                None => ch.len_utf8(),
            };
            tokens.push(rest[..len].to_string());
            rest = &rest[len..];
        }

        tokens
    }
}
