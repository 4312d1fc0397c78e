//! Diagnostic assembly
//!
//! One pass over a grammar source:
//!
//! 1. Sources longer than the character ceiling get no diagnostics at all.
//! 2. The source is lexed and token offsets are recovered.
//! 3. The grammar-of-grammars parser runs with a [`SymbolTracker`] attached. A halt inside the
//!    token stream becomes a syntax error on that token.
//! 4. Logic checks run on the token list.
//! 5. If the pass is over its time budget, it stops here.
//! 6. Otherwise every undefined reference is an error and every definition gets an info marker.
//!
//! The result is not sorted by offset.

use crate::logic::{find_issues, IssueKind};
use crate::offsets::TokenOffsetMap;
use crate::symbols::SymbolTracker;
use ebnf_parser::{nodes, EbnfSchema, Listeners, Tokenizer};
use serde::Serialize;
use std::fmt;
use std::ops::Range;
use std::time::{Duration, Instant};

/// Value of [`Diagnostic::source`].
pub const SOURCE: &str = "ebnf";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticCode {
    SyntaxError,
    UnreachableAlternative,
    EmptyLoop,
    RedundantAlternative,
    InvalidRepetition,
    UndefinedSymbol,
    Definition,
}

impl DiagnosticCode {
    pub fn as_str(self) -> &'static str {
        match self {
            DiagnosticCode::SyntaxError => "syntax-error",
            DiagnosticCode::UnreachableAlternative => "unreachable-alternative",
            DiagnosticCode::EmptyLoop => "empty-loop",
            DiagnosticCode::RedundantAlternative => "redundant-alternative",
            DiagnosticCode::InvalidRepetition => "invalid-repetition",
            DiagnosticCode::UndefinedSymbol => "undefined-symbol",
            DiagnosticCode::Definition => "definition",
        }
    }
}

impl From<IssueKind> for DiagnosticCode {
    fn from(kind: IssueKind) -> Self {
        match kind {
            IssueKind::UnreachableAlternative => DiagnosticCode::UnreachableAlternative,
            IssueKind::EmptyLoop => DiagnosticCode::EmptyLoop,
            IssueKind::RedundantAlternative => DiagnosticCode::RedundantAlternative,
            IssueKind::InvalidRepetition => DiagnosticCode::InvalidRepetition,
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A finding in a grammar source. `span` is a byte range.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Diagnostic {
    pub span: Range<usize>,
    pub severity: Severity,
    pub message: String,
    pub code: DiagnosticCode,
    pub source: &'static str,
}

impl Diagnostic {
    pub fn new(
        span: Range<usize>,
        severity: Severity,
        code: DiagnosticCode,
        message: impl Into<String>,
    ) -> Self {
        Self {
            span,
            severity,
            message: message.into(),
            code,
            source: SOURCE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyzerOptions {
    /// Sources with more characters than this are skipped.
    pub max_source_chars: usize,
    /// Undefined-symbol and definition diagnostics are dropped once a pass takes longer.
    pub time_budget: Duration,
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        Self {
            max_source_chars: 100_000,
            time_budget: Duration::from_secs(1),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    options: AnalyzerOptions,
    schema: EbnfSchema,
}

impl Analyzer {
    pub fn new(options: AnalyzerOptions) -> Self {
        Self {
            options,
            schema: EbnfSchema::new(),
        }
    }

    pub fn options(&self) -> &AnalyzerOptions {
        &self.options
    }

    pub fn analyze(&self, text: &str) -> Vec<Diagnostic> {
        let chars = text.chars().count();
        if chars > self.options.max_source_chars {
            log::debug!(
                "skipping analysis: {} chars exceeds {}",
                chars,
                self.options.max_source_chars
            );
            return Vec::new();
        }

        let started = Instant::now();
        let mut diagnostics = Vec::new();

        let tokens = self.schema.lexer().lex(text);
        let offsets = TokenOffsetMap::build(text, &tokens);

        let mut tracker = SymbolTracker::new();
        let outcome = {
            let mut listeners = Listeners::new();
            listeners.assign(&mut tracker, nodes::ANALYSIS);
            self.schema.parse_tokens(&tokens, &mut listeners).outcome
        };

        if let Some(index) = outcome.halted_at() {
            if let Some(span) = offsets.span(index) {
                diagnostics.push(Diagnostic::new(
                    span,
                    Severity::Error,
                    DiagnosticCode::SyntaxError,
                    format!("syntax error: unexpected token '{}'", tokens[index]),
                ));
            }
        }

        for issue in find_issues(&tokens) {
            if let Some(span) = offsets.span(issue.token_index) {
                diagnostics.push(Diagnostic::new(
                    span,
                    issue.severity,
                    issue.kind.into(),
                    issue.message,
                ));
            }
        }

        let elapsed = started.elapsed();
        if elapsed > self.options.time_budget {
            log::warn!(
                "analysis took {:?}, over the {:?} budget; skipping symbol diagnostics",
                elapsed,
                self.options.time_budget
            );
            return diagnostics;
        }

        for reference in tracker.undefined_references() {
            if let Some(span) = offsets.covering(reference.start_token, reference.end_token) {
                diagnostics.push(Diagnostic::new(
                    span,
                    Severity::Error,
                    DiagnosticCode::UndefinedSymbol,
                    format!("undefined symbol: '{}'", reference.name),
                ));
            }
        }

        for definition in tracker.definitions() {
            if let Some(span) = offsets.covering(definition.start_token, definition.end_token) {
                diagnostics.push(Diagnostic::new(
                    span,
                    Severity::Info,
                    DiagnosticCode::Definition,
                    format!("definition: '{}'", definition.name),
                ));
            }
        }

        log::debug!(
            "analyzed {} tokens ({}): {} diagnostics in {:?}",
            tokens.len(),
            outcome,
            diagnostics.len(),
            started.elapsed()
        );
        diagnostics
    }
}

/// Analyze `text` with default options.
pub fn analyze(text: &str) -> Vec<Diagnostic> {
    Analyzer::default().analyze(text)
}
