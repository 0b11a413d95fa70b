use dashmap::DashMap;
use tokio::sync::RwLock;

use tower_lsp::lsp_types::{
    CompletionList, CompletionOptions, CompletionParams, CompletionResponse,
    DidChangeConfigurationParams, DidChangeTextDocumentParams, DidCloseTextDocumentParams,
    DidOpenTextDocumentParams, InitializeParams, InitializeResult, InitializedParams, MessageType,
    ServerCapabilities, ServerInfo, TextDocumentSyncCapability, TextDocumentSyncKind, Url,
};
use tower_lsp::{Client, LanguageServer, jsonrpc};

use tracing::{debug, info, warn};

use crate::completion::{discover, should_trigger, to_completion_list};
use crate::config::ServerConfig;
use crate::document::Document;
use crate::parser::SyntaxTreeCache;

#[derive(Debug)]
pub struct JsThisBackend {
    client: Client,
    documents: DashMap<Url, Document>,
    trees: SyntaxTreeCache,
    config: RwLock<ServerConfig>,
}

impl JsThisBackend {
    pub fn new(client: Client) -> Self {
        JsThisBackend {
            client,
            documents: DashMap::new(),
            trees: SyntaxTreeCache::new().expect("Failed to create parser"),
            config: RwLock::new(ServerConfig::default()),
        }
    }

    async fn reload_config(&self, value: &serde_json::Value) {
        if let Some(config) = ServerConfig::from_value(value) {
            info!("Alias configuration updated: {:?}", config.this_var_names);
            *self.config.write().await = config;
        } else {
            warn!("Received configuration in an unexpected shape, keeping previous settings");
        }
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for JsThisBackend {
    async fn initialize(&self, params: InitializeParams) -> jsonrpc::Result<InitializeResult> {
        if let Some(options) = params.initialization_options.as_ref() {
            self.reload_config(options).await;
        }
        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Kind(
                    TextDocumentSyncKind::FULL,
                )),
                completion_provider: Some(CompletionOptions {
                    trigger_characters: Some(vec![".".to_string()]),
                    ..Default::default()
                }),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: "jsthis-language-server".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        self.client
            .log_message(MessageType::INFO, "jsthis language server initialized")
            .await;
    }

    async fn shutdown(&self) -> jsonrpc::Result<()> {
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let uri = params.text_document.uri;
        let text = params.text_document.text;
        let version = params.text_document.version;
        debug!("Opened document: {}, version: {}", uri, version);

        // Parse eagerly so a good tree exists before the user starts typing
        // into an unparseable state.
        self.trees.resolve(&text, &uri);
        self.documents
            .insert(uri, Document::new(&text, version));
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        let version = params.text_document.version;

        let text = match self.documents.get_mut(&uri) {
            Some(mut document) => {
                document.apply(params.content_changes, version);
                document.text.to_string()
            }
            None => {
                warn!("Change for unknown document: {}", uri);
                return;
            }
        };

        // Keeps the last known good tree current while the buffer parses;
        // a mid-edit syntax error leaves the previous tree in place.
        self.trees.resolve(&text, &uri);
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        debug!("Closed document: {}", uri);
        self.documents.remove(&uri);
        self.trees.invalidate(&uri);
    }

    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        self.reload_config(&params.settings).await;
    }

    async fn completion(
        &self,
        params: CompletionParams,
    ) -> jsonrpc::Result<Option<CompletionResponse>> {
        let uri = params.text_document_position.text_document.uri;
        let position = params.text_document_position.position;

        // Snapshot of the alias configuration, re-read per request.
        let alias_names = self.config.read().await.this_var_names.clone();

        let (text_to_cursor, full_text) = match self.documents.get(&uri) {
            Some(document) => (document.text_to(&position), document.text.to_string()),
            None => {
                warn!("Completion for unknown document: {}", uri);
                return Ok(None);
            }
        };

        if !should_trigger(&text_to_cursor, &alias_names) {
            return Ok(None);
        }

        let Some(parsed) = self.trees.resolve(&full_text, &uri) else {
            debug!("No syntax tree available for {}", uri);
            return Ok(Some(CompletionResponse::List(CompletionList {
                is_incomplete: false,
                items: Vec::new(),
            })));
        };

        // Discovery runs over the tree's own source text: when the tree is a
        // stale fallback its byte ranges do not line up with the live buffer.
        let members = discover(&parsed.tree, &parsed.text, &alias_names);
        debug!("Discovered {} members for {}", members.len(), uri);

        Ok(Some(CompletionResponse::List(to_completion_list(members))))
    }
}
