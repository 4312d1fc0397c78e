//! Token-level logic checks
//!
//! Each check scans the whole token list on its own and knows nothing about the parse tree:
//!
//!     unreachable alternative   `{ ... } | x`     warning on `x`
//!     empty loop                `{ "" }`          error on `{`
//!     redundant alternative     `[ x ] | x`       warning on the second `x`
//!     invalid repetition        `( ... ) *`       error on `)`
//!
//! Issues come out grouped by check in that order, and by token index within a check.

use crate::diagnostics::Severity;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueKind {
    UnreachableAlternative,
    EmptyLoop,
    RedundantAlternative,
    InvalidRepetition,
}

impl IssueKind {
    pub fn severity(self) -> Severity {
        match self {
            IssueKind::UnreachableAlternative | IssueKind::RedundantAlternative => Severity::Warning,
            IssueKind::EmptyLoop | IssueKind::InvalidRepetition => Severity::Error,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogicalIssue {
    pub token_index: usize,
    pub kind: IssueKind,
    pub message: String,
    pub severity: Severity,
}

impl LogicalIssue {
    fn new(token_index: usize, kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            token_index,
            kind,
            message: message.into(),
            severity: kind.severity(),
        }
    }
}

/// Run every check over `tokens`.
pub fn find_issues<S: AsRef<str>>(tokens: &[S]) -> Vec<LogicalIssue> {
    let tokens: Vec<&str> = tokens.iter().map(AsRef::as_ref).collect();
    let mut issues = Vec::new();
    unreachable_alternatives(&tokens, &mut issues);
    empty_loops(&tokens, &mut issues);
    redundant_alternatives(&tokens, &mut issues);
    invalid_repetitions(&tokens, &mut issues);
    issues
}

fn unreachable_alternatives(tokens: &[&str], issues: &mut Vec<LogicalIssue>) {
    for open in positions(tokens, "{") {
        let Some(close) = find_closing(tokens, open, "{", "}") else {
            continue;
        };
        if tokens.get(close + 1) == Some(&"|") && close + 2 < tokens.len() {
            issues.push(LogicalIssue::new(
                close + 2,
                IssueKind::UnreachableAlternative,
                "unreachable alternative: '{ ... }' already matches the empty input",
            ));
        }
    }
}

fn empty_loops(tokens: &[&str], issues: &mut Vec<LogicalIssue>) {
    for (index, window) in tokens.windows(3).enumerate() {
        if let ["{", body, "}"] = window {
            if is_empty_literal(body) {
                issues.push(LogicalIssue::new(
                    index,
                    IssueKind::EmptyLoop,
                    format!("empty loop: '{{ {body} }}' repeats an empty literal forever"),
                ));
            }
        }
    }
}

fn redundant_alternatives(tokens: &[&str], issues: &mut Vec<LogicalIssue>) {
    for open in positions(tokens, "[") {
        let Some(close) = find_closing(tokens, open, "[", "]") else {
            continue;
        };
        // only `[ x ] | x` where both sides are one token
        if close != open + 2 || tokens.get(close + 1) != Some(&"|") {
            continue;
        }
        let alternative = close + 2;
        let Some(&candidate) = tokens.get(alternative) else {
            continue;
        };
        let single = tokens
            .get(alternative + 1)
            .map_or(true, |next| ALTERNATIVE_END.contains(next));
        if single && candidate == tokens[open + 1] {
            issues.push(LogicalIssue::new(
                alternative,
                IssueKind::RedundantAlternative,
                format!("redundant alternative: '[ {candidate} ]' already covers '{candidate}'"),
            ));
        }
    }
}

/// Tokens that end a single-token alternative.
const ALTERNATIVE_END: &[&str] = &[";", ".", "|", ")", "]", "}"];

fn invalid_repetitions(tokens: &[&str], issues: &mut Vec<LogicalIssue>) {
    for close in positions(tokens, ")") {
        let repeated = matches!(tokens.get(close + 1), Some(&"*") | Some(&"+"));
        if repeated && find_opening(tokens, close, "(", ")").is_some() {
            issues.push(LogicalIssue::new(
                close,
                IssueKind::InvalidRepetition,
                "invalid repetition: '*' and '+' are not allowed on a grouped expression",
            ));
        }
    }
}

fn positions<'a>(tokens: &'a [&str], wanted: &'a str) -> impl Iterator<Item = usize> + 'a {
    tokens
        .iter()
        .enumerate()
        .filter(move |(_, token)| **token == wanted)
        .map(|(index, _)| index)
}

fn is_empty_literal(token: &str) -> bool {
    token == "\"\"" || token == "''"
}

/// Index of the delimiter closing the one at `open_index`, skipping nested pairs of the same kind.
pub fn find_closing(tokens: &[&str], open_index: usize, open: &str, close: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (index, token) in tokens.iter().enumerate().skip(open_index + 1) {
        if *token == open {
            depth += 1;
        } else if *token == close {
            if depth == 0 {
                return Some(index);
            }
            depth -= 1;
        }
    }
    None
}

/// Index of the delimiter opening the one at `close_index`, skipping nested pairs of the same kind.
pub fn find_opening(tokens: &[&str], close_index: usize, open: &str, close: &str) -> Option<usize> {
    let mut depth = 0usize;
    for index in (0..close_index.min(tokens.len())).rev() {
        let token = tokens[index];
        if token == close {
            depth += 1;
        } else if token == open {
            if depth == 0 {
                return Some(index);
            }
            depth -= 1;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use ebnf_parser::lex;

    fn issues(source: &str) -> Vec<(usize, IssueKind)> {
        find_issues(&lex(source))
            .into_iter()
            .map(|issue| (issue.token_index, issue.kind))
            .collect()
    }

    #[test]
    fn empty_loop_on_opening_brace() {
        let found = find_issues(&["{", "\"\"", "}"]);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].token_index, 0);
        assert_eq!(found[0].severity, Severity::Error);
        assert_eq!(issues("a = { '' } ;"), vec![(2, IssueKind::EmptyLoop)]);
        assert!(find_issues(&["{", "x", "}"]).is_empty());
    }

    #[test]
    fn invalid_repetition_on_closing_paren() {
        let found = find_issues(&["(", "x", ")", "*"]);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].token_index, 2);
        assert_eq!(found[0].kind, IssueKind::InvalidRepetition);
        assert!(find_issues(&["x", "*"]).is_empty());
        assert!(find_issues(&["x", ")", "+"]).is_empty());
        assert_eq!(
            issues("a = ( ( b ) , c ) + ;"),
            vec![(8, IssueKind::InvalidRepetition)]
        );
    }

    #[test]
    fn unreachable_alternative_after_repetition() {
        assert_eq!(
            issues("a = { b } | c ;"),
            vec![(6, IssueKind::UnreachableAlternative)]
        );
        assert_eq!(
            issues("a = { { b } } | c ;"),
            vec![(8, IssueKind::UnreachableAlternative)]
        );
        assert!(issues("a = c | { b } ;").is_empty());
        // nothing after the bar
        assert!(find_issues(&["{", "b", "}", "|"]).is_empty());
    }

    #[test]
    fn redundant_alternative_after_option() {
        let found = find_issues(&lex("a = [ b ] | b ;"));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].token_index, 6);
        assert_eq!(found[0].severity, Severity::Warning);
        assert!(found[0].message.contains("'[ b ]'"));

        assert!(issues("a = [ b ] | c ;").is_empty());
        assert!(issues("a = [ b ] | b, c ;").is_empty());
        assert!(issues("a = [ b, c ] | b ;").is_empty());
        assert_eq!(
            issues("a = [ 'x' ] | 'x'"),
            vec![(6, IssueKind::RedundantAlternative)]
        );
    }

    #[test]
    fn checks_report_in_declaration_order() {
        let found = issues("a = ( b ) * | { '' } | [ c ] | c ; d = { e } | f ;");
        let kinds: Vec<IssueKind> = found.iter().map(|(_, kind)| *kind).collect();
        assert_eq!(
            kinds,
            vec![
                IssueKind::UnreachableAlternative,
                IssueKind::UnreachableAlternative,
                IssueKind::EmptyLoop,
                IssueKind::RedundantAlternative,
                IssueKind::InvalidRepetition,
            ]
        );
    }

    #[test]
    fn delimiter_matching() {
        let tokens = ["{", "{", "}", "x", "}", "}"];
        assert_eq!(find_closing(&tokens, 0, "{", "}"), Some(4));
        assert_eq!(find_closing(&tokens, 1, "{", "}"), Some(2));
        assert_eq!(find_closing(&["{", "x"], 0, "{", "}"), None);

        let tokens = ["(", "(", "x", ")", ")"];
        assert_eq!(find_opening(&tokens, 4, "(", ")"), Some(0));
        assert_eq!(find_opening(&tokens, 3, "(", ")"), Some(1));
        assert_eq!(find_opening(&["x", ")"], 1, "(", ")"), None);
    }
}
