//! Analysis of EBNF grammar sources
//!
//! Everything here works on the bare token strings produced by `ebnf-parser` plus the parse
//! events its grammar-of-grammars parser emits:
//!
//!     offsets      Recovers byte ranges for tokens by scanning the original text.
//!     symbols      Splits meta identifiers into definitions and references.
//!     logic        Token-level anti-pattern checks (`{ } | x`, `{ "" }`, `[ x ] | x`, `( x ) *`).
//!     diagnostics  One analysis pass over a grammar, producing a flat diagnostic list.
//!     completion   Definition names for completion.
//!     live         Sample text matching, plus the debounced highlight engine on top of it.
//!
//! None of the analysis entry points fail: problems degrade to fewer diagnostics or segments.

pub mod completion;
pub mod diagnostics;
pub mod live;
pub mod logic;
pub mod offsets;
pub mod symbols;

pub use completion::{complete_definitions, definition_names, CompletionCandidate};
pub use diagnostics::{analyze, Analyzer, AnalyzerOptions, Diagnostic, DiagnosticCode, Severity};
pub use live::{
    compute_match, match_with, HighlightSink, LiveMatchEngine, MatchReport, MatchSegment, Phase,
    SampleBuffer, SampleRegistry, VersionStamp,
};
pub use logic::{find_issues, IssueKind, LogicalIssue};
pub use offsets::TokenOffsetMap;
pub use symbols::{RuleSide, SymbolInfo, SymbolKind, SymbolTracker};
