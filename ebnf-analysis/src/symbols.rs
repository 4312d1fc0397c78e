//! Definition and reference tracking
//!
//! A meta identifier seen before a rule's defining symbol (`=`) is a definition; one seen between
//! `=` and the terminator (`;` or `.`) is a reference. Only the order of events matters.

use ebnf_parser::{nodes, EbnfSchema, Listeners, ParseEvent, ParseListener, ParseOutcome};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SymbolKind {
    Definition,
    Reference,
    TerminalString,
    SpecialSequence,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SymbolKind::Definition => "definition",
            SymbolKind::Reference => "reference",
            SymbolKind::TerminalString => "terminal-string",
            SymbolKind::SpecialSequence => "special-sequence",
        };
        f.write_str(label)
    }
}

/// One recorded symbol; token indices are `[start_token, end_token)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymbolInfo {
    pub name: String,
    pub start_token: usize,
    pub end_token: usize,
    pub kind: SymbolKind,
}

impl SymbolInfo {
    fn from_event(event: &ParseEvent, kind: SymbolKind) -> Self {
        Self {
            name: event.result.clone(),
            start_token: event.from,
            end_token: event.to,
            kind,
        }
    }
}

/// Which side of `=` the scan is on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RuleSide {
    #[default]
    ExpectingDefinition,
    ExpectingReferences,
}

#[derive(Debug, Clone, Default)]
pub struct SymbolTracker {
    side: RuleSide,
    definitions: Vec<SymbolInfo>,
    references: Vec<SymbolInfo>,
    literals: Vec<SymbolInfo>,
    defined: HashSet<String>,
}

impl SymbolTracker {
    /// Node names the tracker reacts to.
    pub const NODE_NAMES: &'static [&'static str] = &[
        nodes::META_IDENTIFIER,
        nodes::DEFINING_SYMBOL,
        nodes::TERMINATOR_SYMBOL,
        nodes::TERMINAL_STRING,
        nodes::SPECIAL_SEQUENCE,
    ];

    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `text` with the grammar-of-grammars parser and track its symbols.
    pub fn scan(text: &str) -> (ParseOutcome, Self) {
        let mut tracker = Self::new();
        let outcome = {
            let mut listeners = Listeners::new();
            listeners.assign(&mut tracker, Self::NODE_NAMES);
            EbnfSchema::new().parse(text, &mut listeners)
        };
        (outcome, tracker)
    }

    pub fn observe(&mut self, event: &ParseEvent) {
        match event.node_name.as_str() {
            nodes::META_IDENTIFIER => match self.side {
                RuleSide::ExpectingDefinition => {
                    self.defined.insert(event.result.clone());
                    self.definitions
                        .push(SymbolInfo::from_event(event, SymbolKind::Definition));
                }
                RuleSide::ExpectingReferences => {
                    self.references
                        .push(SymbolInfo::from_event(event, SymbolKind::Reference));
                }
            },
            nodes::DEFINING_SYMBOL => self.side = RuleSide::ExpectingReferences,
            nodes::TERMINATOR_SYMBOL => self.side = RuleSide::ExpectingDefinition,
            nodes::TERMINAL_STRING => self
                .literals
                .push(SymbolInfo::from_event(event, SymbolKind::TerminalString)),
            nodes::SPECIAL_SEQUENCE => self
                .literals
                .push(SymbolInfo::from_event(event, SymbolKind::SpecialSequence)),
            _ => {}
        }
    }

    pub fn side(&self) -> RuleSide {
        self.side
    }

    pub fn definitions(&self) -> &[SymbolInfo] {
        &self.definitions
    }

    pub fn references(&self) -> &[SymbolInfo] {
        &self.references
    }

    /// Terminal strings and special sequences, in document order.
    pub fn literals(&self) -> &[SymbolInfo] {
        &self.literals
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.defined.contains(name)
    }

    /// References whose name matches no definition exactly.
    pub fn undefined_references(&self) -> Vec<&SymbolInfo> {
        self.references
            .iter()
            .filter(|reference| !self.is_defined(&reference.name))
            .collect()
    }
}

impl ParseListener for SymbolTracker {
    fn on_event(&mut self, event: &ParseEvent) {
        self.observe(event);
    }
}
