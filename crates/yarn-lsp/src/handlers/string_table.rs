//! `yarnspinner.extractStringTable` command.
//!
//! Returns the string table of a script as JSON so clients can export lines
//! for localization.

use crate::document::Workspace;
use serde_json::Value;
use tower_lsp_server::ls_types::Uri;
use yarn_core::{Result, YarnError};

pub const EXTRACT_STRING_TABLE_COMMAND: &str = "yarnspinner.extractStringTable";

/// Handles the command. The first argument is the document URI.
///
/// Returns `None` when the argument is missing or not a URI. Unknown
/// documents yield an empty table.
pub fn handle_extract_string_table(workspace: &Workspace, arguments: &[Value]) -> Option<Value> {
    match extract_string_table(workspace, arguments) {
        Ok(table) => Some(table),
        Err(e) => {
            tracing::warn!("string table extraction failed: {}", e);
            None
        }
    }
}

fn extract_string_table(workspace: &Workspace, arguments: &[Value]) -> Result<Value> {
    let raw = arguments
        .first()
        .and_then(Value::as_str)
        .ok_or_else(|| YarnError::InvalidUri(format!("{:?}", arguments.first())))?;
    let uri: Uri = raw
        .parse()
        .map_err(|_| YarnError::InvalidUri(raw.to_string()))?;

    let entries = workspace
        .projects_for_uri(&uri)
        .iter()
        .find_map(|project| project.string_table(&uri))
        .unwrap_or_default();

    tracing::debug!("extracted {} lines from {}", entries.len(), uri.as_str());
    Ok(serde_json::to_value(entries)?)
}
