use super::position::LineIndex;
use ebnf_analysis::{complete_definitions, CompletionCandidate};
use lsp_types::{CompletionItem, Position};

/// Definition names completing the identifier that ends at `position`.
pub fn completion_items(text: &str, position: Position) -> Vec<CompletionItem> {
    let offset = LineIndex::new(text).offset(position);
    let prefix = identifier_prefix(text, offset);
    complete_definitions(text, prefix)
        .into_iter()
        .map(to_completion_item)
        .collect()
}

/// The run of identifier characters directly before `offset`.
fn identifier_prefix(text: &str, offset: usize) -> &str {
    let head = &text[..offset];
    let start = head
        .rfind(|ch: char| !(ch.is_ascii_alphanumeric() || ch == '_'))
        .map_or(0, |idx| idx + 1);
    &head[start..]
}

fn to_completion_item(candidate: CompletionCandidate) -> CompletionItem {
    CompletionItem {
        label: candidate.label,
        kind: Some(candidate.kind),
        detail: candidate.detail,
        ..CompletionItem::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lsp_types::CompletionItemKind;

    #[test]
    fn prefix_stops_at_separators() {
        assert_eq!(identifier_prefix("a = b, ter", 10), "ter");
        assert_eq!(identifier_prefix("a = b, ", 7), "");
        assert_eq!(identifier_prefix("snake_case", 5), "snake");
        assert_eq!(identifier_prefix("x = 'é'", 4), "");
    }

    #[test]
    fn completes_the_word_under_the_cursor() {
        let text = "term = factor ;\nfactor = 'x' ;\nexpr = te";
        let items = completion_items(text, Position::new(2, 9));
        let labels: Vec<&str> = items.iter().map(|item| item.label.as_str()).collect();
        assert_eq!(labels, vec!["term"]);
        assert_eq!(items[0].kind, Some(CompletionItemKind::REFERENCE));
        assert_eq!(items[0].detail.as_deref(), Some("EBNF definition"));
    }
}
