//! Token definitions for EBNF sources
//!
//! The raw scanner is a logos-derived enum; it never produces an error variant of its own, so the
//! public [`TokenKind`] adds `Invalid` for anything logos rejects (stray characters, unterminated
//! literals). Invalid tokens are kept in the stream so the parser halts on them instead of silently
//! skipping text.

use logos::{Lexer, Logos, Skip};
use serde::Serialize;
use std::fmt;
use std::ops::Range;

/// Consume a `(* ... *)` comment. An unterminated comment runs to the end of input.
fn skip_comment(lex: &mut Lexer<RawToken>) -> Skip {
    let rest = lex.remainder();
    let consumed = rest.find("*)").map(|idx| idx + 2).unwrap_or(rest.len());
    lex.bump(consumed);
    Skip
}

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
pub(crate) enum RawToken {
    #[token("(*", skip_comment)]
    Comment,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    MetaIdentifier,

    #[regex(r#""[^"]*""#)]
    #[regex(r"'[^']*'")]
    TerminalString,

    #[regex(r"\?[^?]*\?")]
    SpecialSequence,

    #[regex(r"[0-9]+")]
    Integer,

    #[token("=")]
    Defining,
    #[token(",")]
    Concatenate,
    #[token("|")]
    DefinitionSeparator,
    #[token(";")]
    #[token(".")]
    Terminator,
    #[token("-")]
    Except,
    #[token("*")]
    Repetition,
    #[token("+")]
    Plus,
    #[token("{")]
    StartRepeat,
    #[token("}")]
    EndRepeat,
    #[token("[")]
    StartOption,
    #[token("]")]
    EndOption,
    #[token("(")]
    StartGroup,
    #[token(")")]
    EndGroup,
}

/// Kind of an EBNF token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TokenKind {
    MetaIdentifier,
    TerminalString,
    SpecialSequence,
    Integer,
    Defining,
    Concatenate,
    DefinitionSeparator,
    Terminator,
    Except,
    Repetition,
    Plus,
    StartRepeat,
    EndRepeat,
    StartOption,
    EndOption,
    StartGroup,
    EndGroup,
    Invalid,
}

impl TokenKind {
    pub(crate) fn from_raw(raw: RawToken) -> Option<Self> {
        let kind = match raw {
            RawToken::Comment => return None,
            RawToken::MetaIdentifier => TokenKind::MetaIdentifier,
            RawToken::TerminalString => TokenKind::TerminalString,
            RawToken::SpecialSequence => TokenKind::SpecialSequence,
            RawToken::Integer => TokenKind::Integer,
            RawToken::Defining => TokenKind::Defining,
            RawToken::Concatenate => TokenKind::Concatenate,
            RawToken::DefinitionSeparator => TokenKind::DefinitionSeparator,
            RawToken::Terminator => TokenKind::Terminator,
            RawToken::Except => TokenKind::Except,
            RawToken::Repetition => TokenKind::Repetition,
            RawToken::Plus => TokenKind::Plus,
            RawToken::StartRepeat => TokenKind::StartRepeat,
            RawToken::EndRepeat => TokenKind::EndRepeat,
            RawToken::StartOption => TokenKind::StartOption,
            RawToken::EndOption => TokenKind::EndOption,
            RawToken::StartGroup => TokenKind::StartGroup,
            RawToken::EndGroup => TokenKind::EndGroup,
        };
        Some(kind)
    }

    /// Classify a bare token string the way the lexer would have.
    ///
    /// Parsers only receive token text, so they re-derive the kind from it.
    pub fn classify(text: &str) -> TokenKind {
        match text {
            "=" => return TokenKind::Defining,
            "," => return TokenKind::Concatenate,
            "|" => return TokenKind::DefinitionSeparator,
            ";" | "." => return TokenKind::Terminator,
            "-" => return TokenKind::Except,
            "*" => return TokenKind::Repetition,
            "+" => return TokenKind::Plus,
            "{" => return TokenKind::StartRepeat,
            "}" => return TokenKind::EndRepeat,
            "[" => return TokenKind::StartOption,
            "]" => return TokenKind::EndOption,
            "(" => return TokenKind::StartGroup,
            ")" => return TokenKind::EndGroup,
            _ => {}
        }

        let mut chars = text.chars();
        let Some(first) = chars.next() else {
            return TokenKind::Invalid;
        };
        let last = text.chars().last().unwrap_or(first);

        if (first == '"' || first == '\'') && text.len() >= 2 && last == first {
            TokenKind::TerminalString
        } else if first == '?' && text.len() >= 2 && last == '?' {
            TokenKind::SpecialSequence
        } else if text.chars().all(|c| c.is_ascii_digit()) {
            TokenKind::Integer
        } else if (first.is_ascii_alphabetic() || first == '_')
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            TokenKind::MetaIdentifier
        } else {
            TokenKind::Invalid
        }
    }

    pub fn is_delimiter(&self) -> bool {
        !matches!(
            self,
            TokenKind::MetaIdentifier
                | TokenKind::TerminalString
                | TokenKind::SpecialSequence
                | TokenKind::Integer
                | TokenKind::Invalid
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::MetaIdentifier => "meta-identifier",
            TokenKind::TerminalString => "terminal-string",
            TokenKind::SpecialSequence => "special-sequence",
            TokenKind::Integer => "integer",
            TokenKind::Defining => "defining",
            TokenKind::Concatenate => "concatenate",
            TokenKind::DefinitionSeparator => "definition-separator",
            TokenKind::Terminator => "terminator",
            TokenKind::Except => "except",
            TokenKind::Repetition => "repetition",
            TokenKind::Plus => "plus",
            TokenKind::StartRepeat => "start-repeat",
            TokenKind::EndRepeat => "end-repeat",
            TokenKind::StartOption => "start-option",
            TokenKind::EndOption => "end-option",
            TokenKind::StartGroup => "start-group",
            TokenKind::EndGroup => "end-group",
            TokenKind::Invalid => "invalid",
        };
        f.write_str(name)
    }
}

/// A token with its text and byte span in the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Range<usize>,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, span: Range<usize>) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
        }
    }
}
