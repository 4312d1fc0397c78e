//! Plain-text renderings of analysis results. Positions are 1-based, columns count characters.

use ebnf_analysis::{Diagnostic, MatchReport, Severity, SymbolInfo, TokenOffsetMap};
use ebnf_parser::Token;
use std::fmt::Write;

pub fn line_col(text: &str, offset: usize) -> (usize, usize) {
    let head = text.get(..offset).unwrap_or(text);
    let line_start = head.rfind('\n').map_or(0, |idx| idx + 1);
    let line = head.matches('\n').count() + 1;
    let column = head[line_start..].chars().count() + 1;
    (line, column)
}

/// One line per diagnostic, then a summary of errors and warnings.
pub fn diagnostics(path: &str, text: &str, diagnostics: &[Diagnostic]) -> String {
    let mut out = String::new();
    for diagnostic in diagnostics {
        let (line, column) = line_col(text, diagnostic.span.start);
        let _ = writeln!(
            out,
            "{path}:{line}:{column}: {}[{}]: {}",
            diagnostic.severity, diagnostic.code, diagnostic.message
        );
    }
    let count = |severity| {
        diagnostics
            .iter()
            .filter(|diagnostic| diagnostic.severity == severity)
            .count()
    };
    let _ = writeln!(
        out,
        "{} error(s), {} warning(s)",
        count(Severity::Error),
        count(Severity::Warning)
    );
    out
}

pub fn match_report(sample: &str, report: &MatchReport) -> String {
    if report.is_empty() {
        return "nothing to match\n".to_string();
    }
    let mut out = String::new();
    for segment in &report.segments {
        let label = if segment.matched { "matched" } else { "unmatched" };
        let excerpt = sample.get(segment.span()).unwrap_or_default();
        let _ = writeln!(
            out,
            "{label} {}..{} {excerpt:?}",
            segment.start, segment.end
        );
    }
    out
}

/// Symbols in source order, located through the token offset map.
pub fn symbols(text: &str, offsets: &TokenOffsetMap, symbols: &[&SymbolInfo]) -> String {
    let mut out = String::new();
    for symbol in symbols {
        let Some(start) = offsets.start(symbol.start_token) else {
            continue;
        };
        let (line, column) = line_col(text, start);
        let _ = writeln!(out, "{line}:{column} {} {}", symbol.kind, symbol.name);
    }
    out
}

pub fn tokens(text: &str, tokens: &[Token]) -> String {
    let mut out = String::new();
    for token in tokens {
        let (line, column) = line_col(text, token.span.start);
        let _ = writeln!(out, "{line}:{column} {} {}", token.kind, token.text);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ebnf_analysis::{analyze, compute_match};

    #[test]
    fn line_col_is_one_based_and_counts_chars() {
        let text = "ä = b ;\nc = d ;";
        assert_eq!(line_col(text, 0), (1, 1));
        assert_eq!(line_col(text, text.find('b').unwrap()), (1, 5));
        assert_eq!(line_col(text, text.find('c').unwrap()), (2, 1));
        assert_eq!(line_col(text, 1000), (2, 8));
    }

    #[test]
    fn renders_diagnostics_with_summary() {
        let text = "s = a ;";
        let mut found = analyze(text);
        found.sort_by_key(|diagnostic| diagnostic.span.start);
        insta::assert_snapshot!(diagnostics("g.ebnf", text, &found), @r###"
        g.ebnf:1:1: info[definition]: definition: 's'
        g.ebnf:1:5: error[undefined-symbol]: undefined symbol: 'a'
        1 error(s), 0 warning(s)
        "###);
    }

    #[test]
    fn renders_match_segments() {
        let report = compute_match("pair = 'a', 'b' ;", "a c");
        assert_eq!(
            match_report("a c", &report),
            "matched 0..1 \"a\"\nunmatched 1..3 \" c\"\n"
        );
        assert_eq!(
            match_report("", &MatchReport::default()),
            "nothing to match\n"
        );
    }
}
