//! Parse events and listeners
//!
//! Parsers report every grammar construct they recognize as a [`ParseEvent`]. Listeners are plain
//! synchronous observers: they are called on the parsing thread, in document order, once per event
//! whose node name they were assigned to. There is no queue and no async hop, so a listener's state
//! at any point reflects exactly the prefix of the input parsed so far.

use serde::Serialize;

/// Node names emitted by the grammar-of-grammars parser.
pub mod nodes {
    pub const SYNTAX_RULE: &str = "syntax rule";
    pub const META_IDENTIFIER: &str = "meta identifier";
    pub const DEFINING_SYMBOL: &str = "defining symbol";
    pub const CONCATENATE_SYMBOL: &str = "concatenate symbol";
    pub const DEFINITION_SEPARATOR_SYMBOL: &str = "definition separator symbol";
    pub const TERMINAL_STRING: &str = "terminal string";
    pub const START_OPTION_SYMBOL: &str = "start option symbol";
    pub const END_OPTION_SYMBOL: &str = "end option symbol";
    pub const START_GROUP_SYMBOL: &str = "start group symbol";
    pub const END_GROUP_SYMBOL: &str = "end group symbol";
    pub const START_REPEAT_SYMBOL: &str = "start repeat symbol";
    pub const END_REPEAT_SYMBOL: &str = "end repeat symbol";
    pub const TERMINATOR_SYMBOL: &str = "terminator symbol";
    pub const SPECIAL_SEQUENCE: &str = "special sequence";
    pub const EXCEPT_SYMBOL: &str = "except symbol";
    pub const INTEGER: &str = "integer";
    pub const REPETITION_SYMBOL: &str = "repetition symbol";

    /// Every construct the analysis layer listens to.
    pub const ANALYSIS: &[&str] = &[
        META_IDENTIFIER,
        DEFINING_SYMBOL,
        CONCATENATE_SYMBOL,
        DEFINITION_SEPARATOR_SYMBOL,
        TERMINAL_STRING,
        START_OPTION_SYMBOL,
        END_OPTION_SYMBOL,
        START_GROUP_SYMBOL,
        END_GROUP_SYMBOL,
        START_REPEAT_SYMBOL,
        END_REPEAT_SYMBOL,
        TERMINATOR_SYMBOL,
        SPECIAL_SEQUENCE,
        EXCEPT_SYMBOL,
        INTEGER,
        REPETITION_SYMBOL,
    ];
}

/// A recognized grammar construct.
///
/// `from` and `to` are token indices; `to` is exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseEvent {
    pub node_name: String,
    pub result: String,
    pub from: usize,
    pub to: usize,
}

impl ParseEvent {
    pub fn new(node_name: impl Into<String>, result: impl Into<String>, from: usize, to: usize) -> Self {
        Self {
            node_name: node_name.into(),
            result: result.into(),
            from,
            to,
        }
    }
}

/// Observer for parse events.
pub trait ParseListener {
    fn on_event(&mut self, event: &ParseEvent);
}

impl<F> ParseListener for F
where
    F: FnMut(&ParseEvent),
{
    fn on_event(&mut self, event: &ParseEvent) {
        self(event)
    }
}

struct Subscription<'a> {
    listener: &'a mut dyn ParseListener,
    node_names: Vec<String>,
}

/// Listener registry handed to a parser for one parse.
#[derive(Default)]
pub struct Listeners<'a> {
    subscriptions: Vec<Subscription<'a>>,
}

impl<'a> Listeners<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` for the given node names.
    pub fn assign(&mut self, listener: &'a mut dyn ParseListener, node_names: &[&str]) -> &mut Self {
        self.subscriptions.push(Subscription {
            listener,
            node_names: node_names.iter().map(|name| name.to_string()).collect(),
        });
        self
    }

    /// Whether any listener is interested in `node_name`.
    pub fn wants(&self, node_name: &str) -> bool {
        self.subscriptions
            .iter()
            .any(|sub| sub.node_names.iter().any(|name| name == node_name))
    }

    pub fn emit(&mut self, event: &ParseEvent) {
        for sub in self.subscriptions.iter_mut() {
            if sub.node_names.iter().any(|name| *name == event.node_name) {
                sub.listener.on_event(event);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_assigned_node_names_are_delivered() {
        let mut seen = Vec::new();
        let mut record = |event: &ParseEvent| seen.push(event.node_name.clone());
        {
            let mut listeners = Listeners::new();
            listeners.assign(&mut record, &[nodes::META_IDENTIFIER]);
            assert!(listeners.wants(nodes::META_IDENTIFIER));
            assert!(!listeners.wants(nodes::INTEGER));

            listeners.emit(&ParseEvent::new(nodes::META_IDENTIFIER, "a", 0, 1));
            listeners.emit(&ParseEvent::new(nodes::DEFINING_SYMBOL, "=", 1, 2));
        }
        assert_eq!(seen, vec![nodes::META_IDENTIFIER.to_string()]);
    }

    #[test]
    fn empty_registry_wants_nothing() {
        let listeners = Listeners::new();
        assert!(listeners.is_empty());
        assert!(!listeners.wants(nodes::SYNTAX_RULE));
    }
}
