//! Collaborator traits
//!
//! The analysis layer is written against these two traits rather than the concrete parsers, so a
//! host (or a test) can plug in any lexer/parser pair with the same contract.

use crate::error::ParseError;
use crate::outcome::ParseOutcome;

/// Turns text into an ordered sequence of token strings. Whitespace tokens are never produced.
pub trait Tokenizer {
    fn lex(&self, text: &str) -> Vec<String>;
}

/// A parser built from a user grammar, run against sample text.
pub trait SampleParser {
    /// Parse `text`, reporting how far the parser got.
    fn parse(&self, text: &str) -> Result<ParseOutcome, ParseError>;

    /// The tokenizer `parse` uses, so callers can line tokens up with the outcome index.
    fn tokenizer(&self) -> &dyn Tokenizer;
}
