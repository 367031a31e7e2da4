use crate::config::EngineConfiguration;
use crate::document::{Workspace, load_document_from_disk};
use crate::handlers::{
    EXTRACT_STRING_TABLE_COMMAND, handle_code_actions, handle_diagnostics,
    handle_extract_string_table,
};
use dashmap::{DashMap, DashSet};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tower_lsp_server::jsonrpc::Result;
use tower_lsp_server::ls_types::{
    CodeActionKind, CodeActionOptions, CodeActionParams, CodeActionProviderCapability,
    CodeActionResponse, DidChangeConfigurationParams, DidChangeTextDocumentParams,
    DidCloseTextDocumentParams, DidOpenTextDocumentParams, ExecuteCommandOptions,
    ExecuteCommandParams, InitializeParams, InitializeResult, InitializedParams, MessageType,
    ServerCapabilities, ServerInfo, TextDocumentSyncCapability, TextDocumentSyncKind, Uri,
};
use tower_lsp_server::{Client, LanguageServer};
use yarn_core::is_definitions_uri;

pub struct Backend {
    client: Client,
    workspace: Arc<Workspace>,
    config: Arc<RwLock<EngineConfiguration>>,
    open_documents: DashSet<Uri>,
    /// Cancels in-flight code actions when their document changes.
    cancellations: DashMap<Uri, CancellationToken>,
}

impl Backend {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            workspace: Arc::new(Workspace::new()),
            config: Arc::new(RwLock::new(EngineConfiguration::default())),
            open_documents: DashSet::new(),
            cancellations: DashMap::new(),
        }
    }

    /// Current configuration snapshot.
    pub async fn configuration(&self) -> EngineConfiguration {
        *self.config.read().await
    }

    pub fn server_capabilities() -> ServerCapabilities {
        ServerCapabilities {
            text_document_sync: Some(TextDocumentSyncCapability::Kind(
                TextDocumentSyncKind::FULL,
            )),
            code_action_provider: Some(CodeActionProviderCapability::Options(CodeActionOptions {
                code_action_kinds: Some(vec![CodeActionKind::QUICKFIX]),
                resolve_provider: Some(false),
                ..Default::default()
            })),
            execute_command_provider: Some(ExecuteCommandOptions {
                commands: vec![EXTRACT_STRING_TABLE_COMMAND.to_string()],
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    fn workspace_roots(params: &InitializeParams) -> Vec<Uri> {
        if let Some(folders) = &params.workspace_folders {
            return folders.iter().map(|folder| folder.uri.clone()).collect();
        }
        #[allow(deprecated)]
        let root = params.root_uri.clone();
        root.into_iter().collect()
    }

    fn cancel_pending(&self, uri: &Uri) {
        if let Some((_, token)) = self.cancellations.remove(uri) {
            token.cancel();
        }
    }

    fn cancellation_token(&self, uri: &Uri) -> CancellationToken {
        self.cancellations
            .entry(uri.clone())
            .or_default()
            .value()
            .clone()
    }

    async fn analyze(&self, uri: &Uri, content: &str) {
        if let Err(e) = self.workspace.update_document(uri, content) {
            tracing::error!("failed to analyze {}: {}", uri.as_str(), e);
            self.client
                .log_message(MessageType::ERROR, format!("Parse error: {}", e))
                .await;
        }
    }

    async fn publish_diagnostics(&self, uri: &Uri) {
        if is_definitions_uri(uri) {
            return;
        }
        let config = self.configuration().await;
        let diagnostics = handle_diagnostics(&self.workspace, uri, config);
        self.client
            .publish_diagnostics(uri.clone(), diagnostics, None)
            .await;
    }

    async fn publish_all_diagnostics(&self) {
        let open: Vec<Uri> = self.open_documents.iter().map(|uri| uri.key().clone()).collect();
        for uri in open {
            self.publish_diagnostics(&uri).await;
        }
    }

    /// Publishes diagnostics after `uri` changed. Definitions affect every
    /// open script.
    async fn refresh_after_change(&self, uri: &Uri) {
        if is_definitions_uri(uri) {
            self.publish_all_diagnostics().await;
        } else {
            self.publish_diagnostics(uri).await;
        }
    }
}

impl LanguageServer for Backend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        tracing::info!("initializing yarn-lsp server");

        {
            let mut config = self.config.write().await;
            config.initialize(params.initialization_options.as_ref());
            tracing::debug!("initial configuration: {:?}", *config);
        }

        self.workspace.configure_roots(Self::workspace_roots(&params));

        Ok(InitializeResult {
            capabilities: Self::server_capabilities(),
            server_info: Some(ServerInfo {
                name: "yarn-lsp".into(),
                version: Some(env!("CARGO_PKG_VERSION").into()),
            }),
            ..Default::default()
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        self.workspace.load_from_disk().await;
        self.publish_all_diagnostics().await;

        tracing::info!("yarn-lsp server initialized");
        self.client
            .log_message(MessageType::INFO, "yarn-lsp ready")
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        tracing::info!("shutting down yarn-lsp server");
        for entry in self.cancellations.iter() {
            entry.value().cancel();
        }
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let uri = params.text_document.uri;
        tracing::info!("document opened: {}", uri.as_str());

        self.open_documents.insert(uri.clone());
        self.analyze(&uri, &params.text_document.text).await;
        self.refresh_after_change(&uri).await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        let Some(change) = params.content_changes.into_iter().last() else {
            return;
        };

        self.cancel_pending(&uri);
        self.analyze(&uri, &change.text).await;
        self.refresh_after_change(&uri).await;
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        tracing::info!("document closed: {}", uri.as_str());

        self.open_documents.remove(&uri);
        self.cancel_pending(&uri);

        // The file may have unsaved edits; fall back to what is on disk.
        match load_document_from_disk(&uri).await {
            Ok(content) => self.analyze(&uri, &content).await,
            Err(e) => {
                tracing::debug!("dropping {} from projects: {}", uri.as_str(), e);
                self.workspace.remove_document(&uri);
            }
        }

        self.client.publish_diagnostics(uri, vec![], None).await;
    }

    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        self.config.write().await.update(Some(&params.settings));
        self.publish_all_diagnostics().await;
    }

    async fn code_action(&self, params: CodeActionParams) -> Result<Option<CodeActionResponse>> {
        let config = self.configuration().await;
        let workspace = Arc::clone(&self.workspace);
        let cancel = self.cancellation_token(&params.text_document.uri);

        let task = tokio::task::spawn_blocking(move || {
            handle_code_actions(&workspace, config, &params, &cancel)
        });

        match task.await {
            Ok(actions) => Ok(Some(actions)),
            Err(e) => {
                tracing::error!("code action task failed: {}", e);
                Ok(Some(vec![]))
            }
        }
    }

    async fn execute_command(&self, params: ExecuteCommandParams) -> Result<Option<Value>> {
        if params.command == EXTRACT_STRING_TABLE_COMMAND {
            return Ok(handle_extract_string_table(
                &self.workspace,
                &params.arguments,
            ));
        }

        tracing::warn!("unknown command: {}", params.command);
        Ok(None)
    }
}
