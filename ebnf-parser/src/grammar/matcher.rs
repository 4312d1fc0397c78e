//! Memoized recognizer for compiled grammars
//!
//! Every node is evaluated to the set of token positions where it can end when started at a given
//! position. Rule results are memoized per `(rule, position)`.
//!
//! Left recursion is handled by growing a seed: a rule re-entered at the same position while it is
//! still being evaluated sees the ends found so far (initially none). Once the first evaluation
//! finishes, the rule is evaluated again with the larger seed until the set of ends stops growing.
//! Memo entries recorded during an iteration may depend on the old seed and are dropped before the
//! next one.
//!
//! Rule evaluation recurses, so each nested rule may move onto a fresh heap-allocated stack
//! segment. Nesting is still capped: a rule that would start beyond [`MAX_DEPTH`] fails at its
//! position, and the match halts there.

use super::compile::{Compiled, Node};
use crate::error::ParseError;
use crate::outcome::ParseOutcome;
use std::collections::{BTreeSet, HashMap};

/// Maximum number of nested rule evaluations.
pub(crate) const MAX_DEPTH: usize = 2048;

/// Remaining stack below which a rule evaluation switches to a new segment.
const RED_ZONE: usize = 64 * 1024;

/// Size of each new stack segment.
const STACK_SEGMENT: usize = 1024 * 1024;

type Ends = BTreeSet<usize>;

enum Memo {
    InProgress { seed: Ends, recursed: bool },
    Done(Ends),
}

pub(crate) struct Matcher<'c, 't> {
    grammar: &'c Compiled,
    tokens: &'t [String],
    memo: HashMap<(usize, usize), Memo>,
    /// Keys of `Memo::Done` entries in insertion order.
    finished: Vec<(usize, usize)>,
    furthest_failure: Option<usize>,
    depth: usize,
}

impl<'c, 't> Matcher<'c, 't> {
    /// Match `tokens` against the start rule of `grammar`.
    ///
    /// The input is complete when the start rule can end exactly at the last token, or when the
    /// furthest point the matcher reached lies at or past the end of the input. Otherwise the
    /// outcome names the first token it could not consume.
    pub(crate) fn run(grammar: &'c Compiled, tokens: &'t [String]) -> Result<ParseOutcome, ParseError> {
        let mut matcher = Matcher {
            grammar,
            tokens,
            memo: HashMap::new(),
            finished: Vec::new(),
            furthest_failure: None,
            depth: 0,
        };
        let ends = matcher.rule(0, 0)?;
        let len = tokens.len();
        if ends.contains(&len) {
            return Ok(ParseOutcome::Complete);
        }

        let reached = ends
            .iter()
            .next_back()
            .copied()
            .into_iter()
            .chain(matcher.furthest_failure)
            .max()
            .unwrap_or(0);
        log::trace!("matched {} of {} tokens", reached, len);

        Ok(if reached >= len {
            ParseOutcome::Complete
        } else {
            ParseOutcome::HaltedAt(reached)
        })
    }

    fn rule(&mut self, index: usize, pos: usize) -> Result<Ends, ParseError> {
        let key = (index, pos);
        match self.memo.get_mut(&key) {
            Some(Memo::Done(ends)) => return Ok(ends.clone()),
            Some(Memo::InProgress { seed, recursed }) => {
                *recursed = true;
                return Ok(seed.clone());
            }
            None => {}
        }
        if self.depth >= MAX_DEPTH {
            log::debug!("rule nesting reached {} at token {}", MAX_DEPTH, pos);
            self.fail_at(pos);
            return Ok(Ends::new());
        }

        self.memo.insert(
            key,
            Memo::InProgress {
                seed: Ends::new(),
                recursed: false,
            },
        );
        self.depth += 1;
        let result = stacker::maybe_grow(RED_ZONE, STACK_SEGMENT, || self.grow(key));
        self.depth -= 1;

        let ends = result?;
        self.memo.insert(key, Memo::Done(ends.clone()));
        self.finished.push(key);
        Ok(ends)
    }

    fn grow(&mut self, key: (usize, usize)) -> Result<Ends, ParseError> {
        let (index, pos) = key;
        let grammar = self.grammar;
        let body = &grammar.bodies[index];
        let mark = self.finished.len();

        let mut ends = self.ends(body, pos)?;
        loop {
            let recursed = matches!(
                self.memo.get(&key),
                Some(Memo::InProgress { recursed: true, .. })
            );
            if !recursed {
                return Ok(ends);
            }

            for stale in self.finished.drain(mark..) {
                self.memo.remove(&stale);
            }
            self.memo.insert(
                key,
                Memo::InProgress {
                    seed: ends.clone(),
                    recursed: false,
                },
            );

            let next = self.ends(body, pos)?;
            if next.is_subset(&ends) {
                return Ok(ends);
            }
            ends.extend(next);
        }
    }

    fn ends(&mut self, node: &'c Node, pos: usize) -> Result<Ends, ParseError> {
        let mut out = Ends::new();
        match node {
            Node::Empty => {
                out.insert(pos);
            }
            Node::Terminal(literal) => {
                if literal.is_empty() {
                    out.insert(pos);
                } else if self.tokens.get(pos).map(String::as_str) == Some(literal.as_str()) {
                    out.insert(pos + 1);
                } else {
                    self.fail_at(pos);
                }
            }
            Node::AnyToken => {
                if pos < self.tokens.len() {
                    out.insert(pos + 1);
                } else {
                    self.fail_at(pos);
                }
            }
            Node::Rule(index) => return self.rule(*index, pos),
            Node::Alternation(items) => {
                for item in items {
                    out.extend(self.ends(item, pos)?);
                }
            }
            Node::Sequence(items) => {
                out.insert(pos);
                for item in items {
                    out = self.step(item, &out)?;
                    if out.is_empty() {
                        break;
                    }
                }
            }
            Node::Optional(inner) => {
                out.insert(pos);
                out.extend(self.ends(inner, pos)?);
            }
            Node::Repeat(inner) => {
                out = self.closure(inner, Ends::from([pos]))?;
            }
            Node::OneOrMore(inner) => {
                let first = self.ends(inner, pos)?;
                out = self.closure(inner, first)?;
            }
            Node::Times(count, inner) => {
                out.insert(pos);
                for _ in 0..*count {
                    let next = self.step(inner, &out)?;
                    // further rounds would repeat this one
                    if next.is_empty() || next == out {
                        out = next;
                        break;
                    }
                    out = next;
                }
            }
            Node::Except(left, right) => {
                let kept = self.ends(left, pos)?;
                let excluded = self.ends(right, pos)?;
                out = kept.difference(&excluded).copied().collect();
            }
        }
        Ok(out)
    }

    /// Ends of `node` started from each position in `from`.
    fn step(&mut self, node: &'c Node, from: &Ends) -> Result<Ends, ParseError> {
        let mut next = Ends::new();
        for &pos in from {
            next.extend(self.ends(node, pos)?);
        }
        Ok(next)
    }

    /// Positions reachable by applying `node` any number of times from `start`.
    /// Iterations that consume nothing are dropped, so empty loops terminate.
    fn closure(&mut self, node: &'c Node, start: Ends) -> Result<Ends, ParseError> {
        let mut frontier: Vec<usize> = start.iter().copied().collect();
        let mut reached = start;
        while let Some(pos) = frontier.pop() {
            for end in self.ends(node, pos)? {
                if end > pos && reached.insert(end) {
                    frontier.push(end);
                }
            }
        }
        Ok(reached)
    }

    fn fail_at(&mut self, pos: usize) {
        self.furthest_failure = Some(self.furthest_failure.map_or(pos, |f| f.max(pos)));
    }
}
