use std::sync::Arc;

use serde_json::Value;
use tokio::sync::Mutex;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer};

use crate::Config;
use crate::core::{DiagnosticCollection, DiagnosticProvider, DocumentManager};
use crate::lsp::handlers::{
    ActiveDocumentParams, COMPILE_COMMAND, HandleDiagnostics, HandleExecuteCommand, HandleHover,
};

/// The main LSP backend that holds state and implements the Language Server Protocol
pub struct Backend {
    pub client: Client,
    pub documents: Arc<Mutex<DocumentManager>>,
    pub diagnostics: Arc<Mutex<DiagnosticCollection<Client>>>,
    pub provider: DiagnosticProvider,
    pub config: Config,
}

impl Backend {
    pub fn new(client: Client, config: Config) -> Self {
        let diagnostics = DiagnosticCollection::new("cadl", client.clone());

        Self {
            provider: DiagnosticProvider::new(config.languages.clone()),
            diagnostics: Arc::new(Mutex::new(diagnostics)),
            documents: Arc::new(Mutex::new(DocumentManager::new())),
            client,
            config,
        }
    }

    /// `cadl/didChangeActiveDocument` notification
    pub async fn did_change_active_document(&self, params: ActiveDocumentParams) {
        self.handle_active_document(params).await;
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(
        &self,
        _: InitializeParams,
    ) -> tower_lsp::jsonrpc::Result<InitializeResult> {
        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                hover_provider: Some(HoverProviderCapability::Simple(true)),
                execute_command_provider: Some(ExecuteCommandOptions {
                    commands: vec![COMPILE_COMMAND.to_string()],
                    work_done_progress_options: Default::default(),
                }),
                text_document_sync: Some(TextDocumentSyncCapability::Kind(
                    TextDocumentSyncKind::FULL,
                )),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: "cadl-language-server".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        self.client
            .log_message(
                MessageType::INFO,
                format!(
                    "cadl-language-server initialized (languages: {})",
                    self.config.languages.languages().join(", ")
                ),
            )
            .await;
    }

    async fn shutdown(&self) -> tower_lsp::jsonrpc::Result<()> {
        self.diagnostics.lock().await.dispose().await;
        Ok(())
    }

    async fn hover(&self, params: HoverParams) -> tower_lsp::jsonrpc::Result<Option<Hover>> {
        self.handle_hover(params).await
    }

    async fn execute_command(
        &self,
        params: ExecuteCommandParams,
    ) -> tower_lsp::jsonrpc::Result<Option<Value>> {
        self.handle_execute_command(params).await
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let doc = params.text_document;
        let uri = doc.uri.clone();

        let mut docs = self.documents.lock().await;
        docs.open(doc.uri, doc.language_id, doc.version, doc.text);
        drop(docs); // Release the lock before refreshing diagnostics

        self.refresh_diagnostics(uri).await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri.clone();
        let version = params.text_document.version;
        if let Some(change) = params.content_changes.into_iter().last() {
            let mut docs = self.documents.lock().await;
            let known = docs.change(&uri, version, change.text);
            drop(docs);

            if known {
                self.refresh_diagnostics(uri).await;
            }
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;

        let mut docs = self.documents.lock().await;
        docs.close(&uri);
        let mut diagnostics = self.diagnostics.lock().await;
        drop(docs);

        diagnostics.clear_document(&uri).await;
    }
}
