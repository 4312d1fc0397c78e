use ebnf_lsp::features::completion::completion_items;
use ebnf_lsp::features::position::LineIndex;
use lsp_types::Position;
use proptest::prelude::*;
use rstest::rstest;

#[rstest]
#[case::everything_on_empty_prefix("a = b ; c = ", Position::new(0, 12), &["a", "b", "c"])]
#[case::prefix_on_a_later_line("alpha = 'x' ;\nbeta = al", Position::new(1, 9), &["alpha"])]
#[case::exact_name_is_not_offered("x = y ;", Position::new(0, 1), &[])]
#[case::cursor_inside_a_word("term = terminal ;", Position::new(0, 10), &["term", "terminal"])]
fn completion_cases(#[case] text: &str, #[case] position: Position, #[case] expected: &[&str]) {
    let labels: Vec<String> = completion_items(text, position)
        .into_iter()
        .map(|item| item.label)
        .collect();
    assert_eq!(labels, expected);
}

fn boundaries(text: &str) -> Vec<usize> {
    text.char_indices()
        .map(|(idx, _)| idx)
        .chain(std::iter::once(text.len()))
        .collect()
}

proptest! {
    #[test]
    fn positions_round_trip_to_offsets(text in "[a-z =;é𝄞\n]{0,40}") {
        let index = LineIndex::new(&text);
        for offset in boundaries(&text) {
            prop_assert_eq!(index.offset(index.position(offset)), offset);
        }
    }

    #[test]
    fn positions_never_move_backwards(text in "[a-z =;é𝄞\n]{0,40}") {
        let index = LineIndex::new(&text);
        let positions: Vec<(u32, u32)> = boundaries(&text)
            .into_iter()
            .map(|offset| index.position(offset))
            .map(|position| (position.line, position.character))
            .collect();
        for pair in positions.windows(2) {
            prop_assert!(pair[0] < pair[1]);
        }
    }
}
