use ebnf_parser::{GrammarParser, ParseOutcome, SampleParser};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// A byte range of the sample text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchSegment {
    pub start: usize,
    pub end: usize,
    pub matched: bool,
}

impl MatchSegment {
    pub fn matched(span: Range<usize>) -> Self {
        Self {
            start: span.start,
            end: span.end,
            matched: true,
        }
    }

    pub fn unmatched(span: Range<usize>) -> Self {
        Self {
            start: span.start,
            end: span.end,
            matched: false,
        }
    }

    pub fn span(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Segments of one match pass: one matched segment per confirmed token, then at most one
/// unmatched segment running to the end of the sample.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatchReport {
    pub segments: Vec<MatchSegment>,
}

impl MatchReport {
    /// The whole sample marked unmatched.
    pub fn failed(sample: &str) -> Self {
        Self {
            segments: vec![MatchSegment::unmatched(0..sample.len())],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn matched(&self) -> impl Iterator<Item = &MatchSegment> {
        self.segments.iter().filter(|segment| segment.matched)
    }

    pub fn unmatched(&self) -> impl Iterator<Item = &MatchSegment> {
        self.segments.iter().filter(|segment| !segment.matched)
    }

    /// From the start of the first matched token to the end of the last one.
    pub fn matched_extent(&self) -> Option<Range<usize>> {
        let first = self.matched().next()?;
        let last = self.matched().last()?;
        Some(first.start..last.end)
    }
}

/// Match `sample` against the grammar in `grammar`.
///
/// Blank inputs produce no segments. A grammar that does not compile marks the whole sample
/// unmatched.
pub fn compute_match(grammar: &str, sample: &str) -> MatchReport {
    if grammar.trim().is_empty() || sample.trim().is_empty() {
        return MatchReport::default();
    }
    match GrammarParser::from_source(grammar) {
        Ok(parser) => match_with(&parser, sample),
        Err(err) => {
            log::debug!("grammar does not compile: {err}");
            MatchReport::failed(sample)
        }
    }
}

/// Match `sample` with an already built parser.
pub fn match_with<P: SampleParser + ?Sized>(parser: &P, sample: &str) -> MatchReport {
    if sample.trim().is_empty() {
        return MatchReport::default();
    }

    let outcome = match parser.parse(sample) {
        Ok(outcome) => outcome,
        Err(err) => {
            log::warn!("sample parse failed: {err}");
            return MatchReport::failed(sample);
        }
    };

    let tokens = parser.tokenizer().lex(sample);
    let consumed = match outcome {
        ParseOutcome::Complete => tokens.len(),
        ParseOutcome::HaltedAt(index) => index.min(tokens.len()),
    };

    let mut segments = confirm_tokens(sample, &tokens[..consumed]);
    if outcome.halted_at().is_some() {
        let matched_end = segments.last().map_or(0, |segment| segment.end);
        if matched_end < sample.len() {
            segments.push(MatchSegment::unmatched(matched_end..sample.len()));
        }
    }
    log::trace!("{outcome}: {} of {} tokens confirmed", segments.len(), tokens.len());

    MatchReport { segments }
}

/// Walk `text` and confirm that `tokens` occur verbatim, in order, with only whitespace between
/// them. Stops at the first token that is not found at the cursor.
fn confirm_tokens(text: &str, tokens: &[String]) -> Vec<MatchSegment> {
    let mut segments = Vec::with_capacity(tokens.len());
    let mut cursor = 0;

    for token in tokens {
        let rest = &text[cursor..];
        cursor += rest.len() - rest.trim_start().len();
        if token.is_empty() || !text[cursor..].starts_with(token.as_str()) {
            break;
        }
        segments.push(MatchSegment::matched(cursor..cursor + token.len()));
        cursor += token.len();
    }

    segments
}
