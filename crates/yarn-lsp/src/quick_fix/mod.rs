//! Quick-fix engine.
//!
//! Turns analyzer diagnostics into ready-to-apply edits. Each diagnostic is
//! classified by its code, its payload decoded once into a [`Remediation`],
//! and the matching resolver queries the project registries for candidates.
//! The engine only reads registry and buffer state; nothing here mutates a
//! project.

pub mod assemble;
pub mod classify;
pub mod edits;
pub mod resolve;

pub use assemble::ProposedFix;
pub use classify::{CommandReference, Remediation, Strategy};
pub use resolve::MAX_SUGGESTIONS;

use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tower_lsp_server::ls_types::{Diagnostic, Uri};
use yarn_core::{DeclarationInference, NameMatch, SymbolRegistry};

use crate::config::EngineConfiguration;

/// Everything a resolver may consult for one request.
pub struct FixContext<'a> {
    /// Document the fixes apply to.
    pub uri: &'a Uri,
    /// Projects that own the document, in workspace order.
    pub registries: &'a [Arc<dyn SymbolRegistry>],
    pub inference: &'a dyn DeclarationInference,
    /// Snapshot taken when the request started.
    pub config: EngineConfiguration,
}

impl FixContext<'_> {
    fn fuzzy(&self) -> NameMatch {
        NameMatch::Fuzzy {
            threshold: self.config.fuzzy_match_threshold,
        }
    }
}

/// Computes fixes for `diagnostics` in input order.
///
/// Unrecognized codes and malformed payloads contribute nothing. Processing
/// stops before the next diagnostic once `cancel` fires.
pub fn resolve_quick_fixes(
    ctx: &FixContext<'_>,
    diagnostics: &[Diagnostic],
    cancel: &CancellationToken,
) -> Vec<ProposedFix> {
    let mut fixes = Vec::new();

    for diagnostic in diagnostics {
        if cancel.is_cancelled() {
            tracing::debug!("quick fix request for {} cancelled", ctx.uri.as_str());
            break;
        }

        let Some(strategy) = Strategy::classify(diagnostic) else {
            continue;
        };
        let Some(remediation) = Remediation::decode(strategy, diagnostic.data.as_ref()) else {
            tracing::debug!("{} diagnostic without usable payload", strategy.code());
            continue;
        };

        fixes.extend(resolve::resolve(ctx, diagnostic, &remediation));
    }

    fixes
}
