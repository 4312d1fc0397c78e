//! # ebnf-parser
//!
//! Lexer, grammar-of-grammars parser and grammar compiler for EBNF sources.
//!
//! This crate is the collaborator the analysis layer talks to. It knows how to turn EBNF text into
//! tokens, how to walk those tokens with a recursive parser that reports what it recognized, and how
//! to compile a user grammar into a recognizer for arbitrary sample text.
//!
//! Layout
//!
//!     token       Token kinds (logos) and the spanned token type.
//!     lexing      EBNF lexer and the sample-text tokenizer used by compiled grammars.
//!     events      Parse events, listeners and the listener registry.
//!     outcome     `ParseOutcome`, the tagged form of "how far did the parser get".
//!     interface   The `Tokenizer` / `SampleParser` traits the analysis layer depends on.
//!     grammar     Grammar AST, the grammar-of-grammars parser, the compiler and the matcher.
//!
//! Parse results
//!
//!     Parsers historically report progress as a single integer: a non-negative value is the index
//!     of the first token that could not be consumed, `-1` means the input ran out without a hard
//!     error. That convention is only accepted at the edge (`ParseOutcome::from_raw`); everything in
//!     this workspace passes `ParseOutcome` around instead so nothing re-reads a negative number as
//!     an offset. Genuine failures (bad grammar, undefined rule) are `ParseError`s, never `Complete`.

pub mod error;
pub mod events;
pub mod grammar;
pub mod interface;
pub mod lexing;
pub mod outcome;
pub mod token;

pub use error::ParseError;
pub use events::{nodes, Listeners, ParseEvent, ParseListener};
pub use grammar::{EbnfSchema, Grammar, GrammarParser, SchemaParse};
pub use interface::{SampleParser, Tokenizer};
pub use lexing::{lex, tokenize, EbnfLexer, SampleTokenizer};
pub use outcome::ParseOutcome;
pub use token::{Token, TokenKind};
