//! Main language server implementation

use std::collections::HashMap;
use std::sync::Arc;

use crate::features::completion::completion_items;
use crate::features::diagnostics::collect_diagnostics;
use crate::features::live::{
    ChannelSink, DidChangeSampleParams, MatchHighlights, MatchHighlightsParams,
};
use ebnf_analysis::{Analyzer, AnalyzerOptions, LiveMatchEngine, SampleRegistry};
use ebnf_config::EbnfConfig;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::sync::{Mutex, MutexGuard, RwLock};
use tower_lsp::async_trait;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::{
    CompletionOptions, CompletionParams, CompletionResponse, Diagnostic,
    DidChangeTextDocumentParams, DidCloseTextDocumentParams, DidOpenTextDocumentParams,
    InitializeParams, InitializeResult, InitializedParams, ServerCapabilities, ServerInfo,
    TextDocumentItem, TextDocumentSyncCapability, TextDocumentSyncKind, Url,
};
use tower_lsp::Client;

/// The parts of the client the server talks back to.
#[async_trait]
pub trait LspClient: Send + Sync + Clone + 'static {
    async fn publish_diagnostics(
        &self,
        uri: Url,
        diagnostics: Vec<Diagnostic>,
        version: Option<i32>,
    );
    async fn match_highlights(&self, params: MatchHighlightsParams);
}

#[async_trait]
impl LspClient for Client {
    async fn publish_diagnostics(
        &self,
        uri: Url,
        diagnostics: Vec<Diagnostic>,
        version: Option<i32>,
    ) {
        Client::publish_diagnostics(self, uri, diagnostics, version).await;
    }

    async fn match_highlights(&self, params: MatchHighlightsParams) {
        self.send_notification::<MatchHighlights>(params).await;
    }
}

#[derive(Default)]
struct DocumentStore {
    entries: RwLock<HashMap<Url, Arc<String>>>,
}

impl DocumentStore {
    async fn upsert(&self, uri: Url, text: String) -> Arc<String> {
        let text = Arc::new(text);
        self.entries.write().await.insert(uri, Arc::clone(&text));
        text
    }

    async fn get(&self, uri: &Url) -> Option<Arc<String>> {
        self.entries.read().await.get(uri).cloned()
    }

    async fn remove(&self, uri: &Url) {
        self.entries.write().await.remove(uri);
    }
}

/// Grammar documents, their sample buffers, and the live match engine.
///
/// Must be created inside a tokio runtime: the task that forwards highlight updates to the client
/// is spawned on construction.
pub struct EbnfLanguageServer<C = Client> {
    client: C,
    analyzer: Analyzer,
    documents: DocumentStore,
    samples: Mutex<SampleRegistry<Url>>,
    engine: LiveMatchEngine<Url, ChannelSink>,
}

impl EbnfLanguageServer<Client> {
    pub fn new(client: Client) -> Self {
        match ebnf_config::load_defaults() {
            Ok(config) => Self::with_config(client, &config),
            Err(err) => {
                log::warn!("built-in configuration did not load: {err}");
                Self::with_options(
                    client,
                    AnalyzerOptions::default(),
                    LiveMatchEngine::<Url, ChannelSink>::DEFAULT_DEBOUNCE,
                )
            }
        }
    }
}

impl<C: LspClient> EbnfLanguageServer<C> {
    pub fn with_config(client: C, config: &EbnfConfig) -> Self {
        Self::with_options(client, config.analyzer_options(), config.debounce())
    }

    pub fn with_options(
        client: C,
        options: AnalyzerOptions,
        debounce: std::time::Duration,
    ) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        spawn_highlight_forwarder(client.clone(), receiver);
        Self {
            client,
            analyzer: Analyzer::new(options),
            documents: DocumentStore::default(),
            samples: Mutex::new(SampleRegistry::new()),
            engine: LiveMatchEngine::with_debounce(Arc::new(ChannelSink::new(sender)), debounce),
        }
    }

    /// Handler for `ebnf/didChangeSample`.
    ///
    /// The grammar is read while the sample registry is locked, so a grammar edit either lands
    /// before this refresh or triggers its own refresh after it.
    pub async fn did_change_sample(&self, params: DidChangeSampleParams) {
        let DidChangeSampleParams { uri, text } = params;
        let mut samples = self.samples().await;
        let grammar = self.documents.get(&uri).await;
        let buffer = samples.update(uri.clone(), text);
        let grammar = grammar.as_deref().map_or("", String::as_str);
        self.engine.refresh(&uri, grammar, buffer);
    }

    async fn update_document(&self, uri: Url, text: String, version: Option<i32>) {
        let text = self.documents.upsert(uri.clone(), text).await;
        let diagnostics = collect_diagnostics(&self.analyzer, &text);
        log::debug!("{uri}: publishing {} diagnostics", diagnostics.len());
        self.client
            .publish_diagnostics(uri.clone(), diagnostics, version)
            .await;
        self.rematch_sample(&uri).await;
    }

    /// Re-run an attached sample against the current grammar.
    async fn rematch_sample(&self, uri: &Url) {
        let samples = self.samples().await;
        let Some(buffer) = samples.get(uri) else {
            return;
        };
        let Some(grammar) = self.documents.get(uri).await else {
            return;
        };
        self.engine.refresh(uri, &grammar, buffer);
    }

    async fn samples(&self) -> MutexGuard<'_, SampleRegistry<Url>> {
        self.samples.lock().await
    }
}

fn spawn_highlight_forwarder<C: LspClient>(
    client: C,
    mut receiver: UnboundedReceiver<MatchHighlightsParams>,
) {
    tokio::spawn(async move {
        while let Some(params) = receiver.recv().await {
            client.match_highlights(params).await;
        }
    });
}

#[async_trait]
impl<C: LspClient> tower_lsp::LanguageServer for EbnfLanguageServer<C> {
    async fn initialize(&self, _: InitializeParams) -> Result<InitializeResult> {
        let capabilities = ServerCapabilities {
            text_document_sync: Some(TextDocumentSyncCapability::Kind(TextDocumentSyncKind::FULL)),
            completion_provider: Some(CompletionOptions::default()),
            ..ServerCapabilities::default()
        };

        Ok(InitializeResult {
            capabilities,
            server_info: Some(ServerInfo {
                name: "ebnf-lsp".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        log::info!("ebnf-lsp initialized");
    }

    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let TextDocumentItem {
            uri, text, version, ..
        } = params.text_document;
        self.update_document(uri, text, Some(version)).await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let version = params.text_document.version;
        if let Some(change) = params.content_changes.into_iter().last() {
            self.update_document(params.text_document.uri, change.text, Some(version))
                .await;
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        self.documents.remove(&uri).await;
        self.samples().await.release(&uri);
        self.engine.forget(&uri);
        self.client.publish_diagnostics(uri, Vec::new(), None).await;
    }

    async fn completion(&self, params: CompletionParams) -> Result<Option<CompletionResponse>> {
        let position = params.text_document_position;
        let Some(text) = self.documents.get(&position.text_document.uri).await else {
            return Ok(None);
        };
        let items = completion_items(&text, position.position);
        Ok(Some(CompletionResponse::Array(items)))
    }
}
