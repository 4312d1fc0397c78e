//! Property tests for the EBNF lexer and grammar-of-grammars parser

use ebnf_parser::{nodes, tokenize, EbnfSchema, Listeners, ParseEvent, ParseOutcome};
use proptest::prelude::*;

const SYMBOLS: &[&str] = &[
    "=", ",", "|", ";", "{", "}", "[", "]", "(", ")", "*", "+", "-", "@",
];

fn grammar_source_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            "[a-z][a-z0-9_]{0,6}",
            "\"[a-z ]{0,4}\"",
            "'[a-z]{0,3}'",
            prop::sample::select(SYMBOLS).prop_map(str::to_string),
            "[0-9]{1,2}",
        ],
        0..40,
    )
    .prop_map(|parts| parts.join(" "))
}

proptest! {
    #[test]
    fn token_spans_are_ordered_slices(source in "\\PC{0,80}") {
        let tokens = tokenize(&source);
        let mut last_end = 0;
        for token in &tokens {
            prop_assert!(token.span.start >= last_end);
            prop_assert!(token.span.end <= source.len());
            prop_assert_eq!(&source[token.span.clone()], token.text.as_str());
            last_end = token.span.end;
        }
    }

    #[test]
    fn schema_parse_halts_inside_the_token_stream(source in grammar_source_strategy()) {
        let tokens = ebnf_parser::lex(&source);
        let parse = EbnfSchema::new().parse_tokens(&tokens, &mut Listeners::new());
        if let ParseOutcome::HaltedAt(index) = parse.outcome {
            prop_assert!(index < tokens.len());
        }
    }

    #[test]
    fn events_arrive_in_document_order(source in grammar_source_strategy()) {
        let mut starts = Vec::new();
        let mut record = |event: &ParseEvent| starts.push(event.from);
        let mut listeners = Listeners::new();
        listeners.assign(&mut record, &[nodes::META_IDENTIFIER, nodes::DEFINING_SYMBOL, nodes::TERMINATOR_SYMBOL]);
        EbnfSchema::new().parse(&source, &mut listeners);
        drop(listeners);
        prop_assert!(starts.windows(2).all(|pair| pair[0] < pair[1]));
    }
}
