//! Tagged parse outcome

use serde::Serialize;
use std::fmt;

/// How far a parser got through its token stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "status", content = "token", rename_all = "kebab-case")]
pub enum ParseOutcome {
    /// The input ran out without a hard error. This covers both a full successful parse and a
    /// prefix that simply stops early (an unterminated last rule, a half-typed sample).
    Complete,
    /// Parsing halted at this token index: it is the first token that could not be consumed.
    HaltedAt(usize),
}

impl ParseOutcome {
    /// Accept the legacy integer convention: any negative value means `Complete`.
    pub fn from_raw(raw: i64) -> Self {
        if raw < 0 {
            ParseOutcome::Complete
        } else {
            ParseOutcome::HaltedAt(raw as usize)
        }
    }

    pub fn to_raw(self) -> i64 {
        match self {
            ParseOutcome::Complete => -1,
            ParseOutcome::HaltedAt(index) => index as i64,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, ParseOutcome::Complete)
    }

    pub fn halted_at(&self) -> Option<usize> {
        match self {
            ParseOutcome::Complete => None,
            ParseOutcome::HaltedAt(index) => Some(*index),
        }
    }
}

impl fmt::Display for ParseOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseOutcome::Complete => write!(f, "complete"),
            ParseOutcome::HaltedAt(index) => write!(f, "halted at token {index}"),
        }
    }
}
