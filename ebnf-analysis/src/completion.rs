use crate::symbols::SymbolTracker;
use lsp_types::CompletionItemKind;
use std::collections::BTreeSet;

/// Describes a completion candidate that can be translated into protocol specific items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionCandidate {
    pub label: String,
    pub detail: Option<String>,
    pub kind: CompletionItemKind,
}

impl CompletionCandidate {
    fn new(label: impl Into<String>, kind: CompletionItemKind) -> Self {
        Self {
            label: label.into(),
            detail: None,
            kind,
        }
    }

    fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// Every meta identifier in `source`, defined or merely referenced.
pub fn definition_names(source: &str) -> BTreeSet<String> {
    let (_, tracker) = SymbolTracker::scan(source);
    tracker
        .definitions()
        .iter()
        .chain(tracker.references())
        .map(|symbol| symbol.name.clone())
        .collect()
}

/// Names starting with `prefix`, sorted. The prefix itself is left out: while typing it shows up
/// in the source as a reference of its own.
pub fn complete_definitions(source: &str, prefix: &str) -> Vec<CompletionCandidate> {
    definition_names(source)
        .into_iter()
        .filter(|name| name.starts_with(prefix) && name != prefix)
        .map(|name| {
            CompletionCandidate::new(name, CompletionItemKind::REFERENCE)
                .with_detail("EBNF definition")
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = "expr = term, { op, term } ;\nterm = factor ;\nfactor = digit | ex";

    #[test]
    fn collects_all_identifiers() {
        let names: Vec<String> = definition_names(SOURCE).into_iter().collect();
        assert_eq!(names, vec!["digit", "ex", "expr", "factor", "op", "term"]);
    }

    #[test]
    fn filters_by_prefix_and_skips_the_prefix_itself() {
        let labels: Vec<String> = complete_definitions(SOURCE, "ex")
            .into_iter()
            .map(|candidate| candidate.label)
            .collect();
        assert_eq!(labels, vec!["expr"]);
    }

    #[test]
    fn empty_prefix_offers_everything() {
        let candidates = complete_definitions(SOURCE, "");
        assert_eq!(candidates.len(), 6);
        assert_eq!(candidates[0].detail.as_deref(), Some("EBNF definition"));
        assert_eq!(candidates[0].kind, CompletionItemKind::REFERENCE);
    }

    #[test]
    fn broken_sources_still_offer_names_seen_before_the_error() {
        let names = definition_names("a = b ; c = @ d ;");
        assert!(names.contains("a"));
        assert!(names.contains("c"));
        assert!(!names.contains("d"));
    }
}
