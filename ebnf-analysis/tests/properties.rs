//! Property tests for offset recovery and analysis

use ebnf_analysis::{analyze, TokenOffsetMap};
use proptest::prelude::*;
use std::collections::HashSet;

fn distinct_tokens() -> impl Strategy<Value = Vec<String>> {
    prop::collection::hash_set("[a-z]{1,6}|[=;,|{}()]", 0..16)
        .prop_map(|set| set.into_iter().collect())
}

fn separators(count: usize) -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[ \t\n]{0,3}", count + 1)
}

fn grammar_source() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            "[a-c]{1,2}",
            Just("'x'".to_string()),
            Just("\"\"".to_string()),
            Just("=".to_string()),
            Just(",".to_string()),
            Just("|".to_string()),
            Just(";".to_string()),
            Just("{".to_string()),
            Just("}".to_string()),
        ],
        0..30,
    )
    .prop_map(|parts| parts.join(" "))
}

proptest! {
    #[test]
    fn recovered_offsets_are_monotonic(
        (tokens, gaps) in distinct_tokens().prop_flat_map(|tokens| {
            let count = tokens.len();
            (Just(tokens), separators(count))
        })
    ) {
        let mut text = String::new();
        for (token, gap) in tokens.iter().zip(gaps.iter()) {
            text.push_str(gap);
            text.push_str(token);
        }
        text.push_str(gaps.last().map(String::as_str).unwrap_or(""));

        let map = TokenOffsetMap::build(&text, &tokens);
        prop_assert_eq!(map.len(), tokens.len());
        let mut previous = 0;
        for (index, token) in tokens.iter().enumerate() {
            let span = map.span(index).unwrap();
            prop_assert!(span.start >= previous);
            prop_assert_eq!(&text[span.clone()], token.as_str());
            previous = span.start;
        }
    }

    #[test]
    fn analysis_is_idempotent(source in grammar_source()) {
        let first: HashSet<_> = analyze(&source).into_iter().collect();
        let second: HashSet<_> = analyze(&source).into_iter().collect();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn diagnostic_spans_stay_inside_the_source(source in grammar_source()) {
        for diagnostic in analyze(&source) {
            prop_assert!(diagnostic.span.start <= diagnostic.span.end);
            prop_assert!(diagnostic.span.end <= source.len());
        }
    }
}
