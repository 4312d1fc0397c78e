use super::position::LineIndex;
use ebnf_analysis::{Analyzer, Diagnostic, Severity};
use lsp_types::{Diagnostic as LspDiagnostic, DiagnosticSeverity, NumberOrString};

/// Analyze `text` and convert the findings for publishing, ordered by start offset.
pub fn collect_diagnostics(analyzer: &Analyzer, text: &str) -> Vec<LspDiagnostic> {
    let mut diagnostics = analyzer.analyze(text);
    diagnostics.sort_by_key(|diagnostic| diagnostic.span.start);

    let index = LineIndex::new(text);
    diagnostics
        .iter()
        .map(|diagnostic| to_lsp_diagnostic(&index, diagnostic))
        .collect()
}

fn to_lsp_diagnostic(index: &LineIndex<'_>, diagnostic: &Diagnostic) -> LspDiagnostic {
    LspDiagnostic {
        range: index.range(diagnostic.span.clone()),
        severity: Some(to_lsp_severity(diagnostic.severity)),
        code: Some(NumberOrString::String(diagnostic.code.to_string())),
        source: Some(diagnostic.source.to_string()),
        message: diagnostic.message.clone(),
        ..LspDiagnostic::default()
    }
}

fn to_lsp_severity(severity: Severity) -> DiagnosticSeverity {
    match severity {
        Severity::Info => DiagnosticSeverity::INFORMATION,
        Severity::Warning => DiagnosticSeverity::WARNING,
        Severity::Error => DiagnosticSeverity::ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lsp_types::{Position, Range};

    #[test]
    fn diagnostics_are_sorted_and_positioned() {
        let text = "s = { a } | b ;\nb = 'x' ;";
        let diagnostics = collect_diagnostics(&Analyzer::default(), text);

        let starts: Vec<Position> = diagnostics.iter().map(|d| d.range.start).collect();
        let mut sorted = starts.clone();
        sorted.sort_by_key(|p| (p.line, p.character));
        assert_eq!(starts, sorted);

        let undefined = diagnostics
            .iter()
            .find(|d| d.message == "undefined symbol: 'a'")
            .expect("a is undefined");
        assert_eq!(
            undefined.range,
            Range::new(Position::new(0, 6), Position::new(0, 7))
        );
        assert_eq!(undefined.severity, Some(DiagnosticSeverity::ERROR));
        assert_eq!(
            undefined.code,
            Some(NumberOrString::String("undefined-symbol".into()))
        );
        assert_eq!(undefined.source.as_deref(), Some("ebnf"));

        let second = diagnostics
            .iter()
            .find(|d| d.message == "definition: 'b'")
            .expect("b is defined");
        assert_eq!(second.range.start, Position::new(1, 0));
        assert_eq!(second.severity, Some(DiagnosticSeverity::INFORMATION));
    }

    #[test]
    fn unreachable_alternatives_are_warnings() {
        let diagnostics = collect_diagnostics(&Analyzer::default(), "s = { 'x' } | 'y' ;");
        let warning = diagnostics
            .iter()
            .find(|d| d.severity == Some(DiagnosticSeverity::WARNING))
            .expect("warning reported");
        assert_eq!(warning.range.start, Position::new(0, 14));
    }
}
