//! Code actions handler implementation.
//!
//! Offers quick fixes for the diagnostics the client sends with the request:
//! - "Rename to '...'" for misspelled variables, commands, and node names
//! - "Generate variable declaration" for implicitly declared variables
//! - "Generate node" for jumps to missing nodes

use crate::config::EngineConfiguration;
use crate::document::Workspace;
use crate::quick_fix::{FixContext, ProposedFix, resolve_quick_fixes};
use tokio_util::sync::CancellationToken;
use tower_lsp_server::ls_types::{CodeActionOrCommand, CodeActionParams};
use yarn_core::DefaultDeclarationInference;

/// Handles code action requests.
///
/// Returns fixes grouped per diagnostic in request order. Diagnostics this
/// server does not own, and documents no project owns, produce nothing.
pub fn handle_code_actions(
    workspace: &Workspace,
    config: EngineConfiguration,
    params: &CodeActionParams,
    cancel: &CancellationToken,
) -> Vec<CodeActionOrCommand> {
    let uri = &params.text_document.uri;
    let diagnostics = &params.context.diagnostics;

    tracing::debug!(
        "code_action request: uri={}, diagnostics={}",
        uri.as_str(),
        diagnostics.len()
    );

    let registries = workspace.registries_for_uri(uri);
    if registries.is_empty() {
        tracing::warn!("no project for code actions: {}", uri.as_str());
        return vec![];
    }

    let ctx = FixContext {
        uri,
        registries: &registries,
        inference: &DefaultDeclarationInference,
        config,
    };

    resolve_quick_fixes(&ctx, diagnostics, cancel)
        .into_iter()
        .map(ProposedFix::into_code_action)
        .collect()
}
