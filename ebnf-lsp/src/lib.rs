//! Language Server Protocol implementation for EBNF grammars
//!
//!     Built on tower-lsp. The server keeps full-text copies of open grammar documents and
//!     re-analyzes a document on every open and change.
//!
//! Feature Set
//!
//!     1. Diagnostics (textDocument/publishDiagnostics):
//!         - Syntax errors from the grammar-of-grammars parser
//!         - Logic checks: unreachable and redundant alternatives, empty loops, repeated groups
//!         - Undefined symbols, plus an informational marker on every definition
//!
//!     2. Completion (textDocument/completion):
//!         - Meta identifiers seen anywhere in the document, filtered by the word at the cursor
//!
//!     3. Live sample tester (custom notifications):
//!         - ebnf/didChangeSample: client sends the sample text paired with a grammar document
//!         - ebnf/matchHighlights: server reports matched segments at once and unmatched ones after
//!           a debounce interval
//!
//! Architecture
//!
//!     Server Layer (server.rs):
//!         - Implements LanguageServer, owns document state, sample buffers and the match engine
//!         - Talks to the client through the `LspClient` trait so tests can record traffic
//!
//!     Feature Layer (features/):
//!         - Conversions between ebnf-analysis results and protocol types
//!         - Byte offset to UTF-16 position mapping
//!
//! Usage
//!
//!     $ ebnf-lsp
//!     Starts the language server on stdin/stdout. Logging goes to stderr, filtered by RUST_LOG.

pub mod features;
pub mod server;

pub use features::live::{DidChangeSampleParams, MatchHighlights, MatchHighlightsParams};
pub use server::{EbnfLanguageServer, LspClient};

use features::live::DID_CHANGE_SAMPLE;
use tower_lsp::{ClientSocket, LspService};

/// Service with the custom sample-tester method registered.
pub fn build_service() -> (LspService<EbnfLanguageServer>, ClientSocket) {
    LspService::build(EbnfLanguageServer::new)
        .custom_method(DID_CHANGE_SAMPLE, EbnfLanguageServer::did_change_sample)
        .finish()
}
