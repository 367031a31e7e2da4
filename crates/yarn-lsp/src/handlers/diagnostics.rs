//! Diagnostics handler implementation.
//!
//! Reports references the project cannot resolve:
//! - Jumps to nodes that do not exist (`YRNMsngJumpDest`)
//! - Commands with no built-in or registered definition (`YRNMsngCmdDef`)
//! - Variables used without a `declare` statement (`YRNMsngVarDec`), when
//!   declarations are required
//!
//! Each diagnostic carries the payload its quick fix expects in `data`.

use crate::config::EngineConfiguration;
use crate::document::Workspace;
use crate::quick_fix::classify::{
    MISSING_COMMAND_DEFINITION, MISSING_JUMP_DESTINATION, MISSING_VARIABLE_DECLARATION,
};
use serde_json::{Value, json};
use std::collections::HashSet;
use tower_lsp_server::ls_types::{Diagnostic, DiagnosticSeverity, NumberOrString, Range, Uri};
use yarn_core::ActionKind;

pub const DIAGNOSTIC_SOURCE: &str = "yarn-lsp";

/// Computes diagnostics for one script.
///
/// Returns an empty list when the document is unknown.
pub fn handle_diagnostics(
    workspace: &Workspace,
    uri: &Uri,
    config: EngineConfiguration,
) -> Vec<Diagnostic> {
    let Some(document) = workspace.document(uri) else {
        tracing::warn!("document not found for diagnostics: {}", uri.as_str());
        return vec![];
    };
    let Some(project) = workspace.projects_for_uri(uri).into_iter().next() else {
        return vec![];
    };

    let mut diagnostics = Vec::new();

    let nodes: HashSet<String> = project.node_titles().into_iter().collect();
    for jump in document.jumps.iter().filter(|j| !nodes.contains(&j.name)) {
        diagnostics.push(diagnostic(
            jump.range,
            DiagnosticSeverity::ERROR,
            MISSING_JUMP_DESTINATION,
            format!("Node '{}' does not exist", jump.name),
            json!(jump.name),
        ));
    }

    let commands: HashSet<String> = project
        .actions(ActionKind::Command)
        .into_iter()
        .map(|action| action.yarn_name)
        .collect();
    for command in document.commands.iter().filter(|c| !commands.contains(&c.name)) {
        diagnostics.push(diagnostic(
            command.range,
            DiagnosticSeverity::WARNING,
            MISSING_COMMAND_DEFINITION,
            format!("Could not find command definition for '{}'", command.name),
            json!({ "Name": command.name, "IsCommand": true }),
        ));
    }

    if config.restrict_to_declared_variables {
        let declared: HashSet<String> = project
            .variables()
            .into_iter()
            .filter(|variable| !variable.is_implicit)
            .map(|variable| variable.name)
            .collect();
        for usage in document
            .variable_uses
            .iter()
            .filter(|u| !declared.contains(&u.name))
        {
            diagnostics.push(diagnostic(
                usage.range,
                DiagnosticSeverity::WARNING,
                MISSING_VARIABLE_DECLARATION,
                format!("Variable '{}' is used but not declared", usage.name),
                json!(usage.name),
            ));
        }
    }

    tracing::debug!("{} diagnostics for {}", diagnostics.len(), uri.as_str());
    diagnostics
}

fn diagnostic(
    range: Range,
    severity: DiagnosticSeverity,
    code: &str,
    message: String,
    data: Value,
) -> Diagnostic {
    Diagnostic {
        range,
        severity: Some(severity),
        code: Some(NumberOrString::String(code.to_string())),
        source: Some(DIAGNOSTIC_SOURCE.to_string()),
        message,
        data: Some(data),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tower_lsp_server::ls_types::Position;

    const SCRIPT: &str = "title: Start
---
<<declare $gold = 0>>
<<set $gold to 5>>
<<set $gems to 2>>
<<wait 1>>
<<gre3t Sam>>
<<jump Shop>>
<<jump Start>>
===
";

    fn setup() -> (Workspace, Uri) {
        let workspace = Workspace::new();
        let uri: Uri = "file:///game/Start.yarn".parse().unwrap();
        workspace.update_document(&uri, SCRIPT).unwrap();
        (workspace, uri)
    }

    fn codes(diagnostics: &[Diagnostic]) -> Vec<String> {
        diagnostics
            .iter()
            .filter_map(|d| match &d.code {
                Some(NumberOrString::String(code)) => Some(code.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_reports_unresolved_references() {
        let (workspace, uri) = setup();
        let diagnostics = handle_diagnostics(&workspace, &uri, EngineConfiguration::default());

        assert_eq!(
            codes(&diagnostics),
            vec!["YRNMsngJumpDest", "YRNMsngCmdDef", "YRNMsngVarDec"]
        );

        let jump = &diagnostics[0];
        assert_eq!(jump.data, Some(json!("Shop")));
        assert_eq!(
            jump.range,
            Range::new(Position::new(7, 7), Position::new(7, 11))
        );
        assert_eq!(jump.source.as_deref(), Some("yarn-lsp"));

        let command = &diagnostics[1];
        assert_eq!(command.data, Some(json!({ "Name": "gre3t", "IsCommand": true })));

        let variable = &diagnostics[2];
        assert_eq!(variable.data, Some(json!("$gems")));
    }

    #[test]
    fn test_undeclared_variables_allowed() {
        let (workspace, uri) = setup();
        let config = EngineConfiguration {
            restrict_to_declared_variables: false,
            ..Default::default()
        };
        let diagnostics = handle_diagnostics(&workspace, &uri, config);
        assert_eq!(codes(&diagnostics), vec!["YRNMsngJumpDest", "YRNMsngCmdDef"]);
    }

    #[test]
    fn test_unknown_document() {
        let workspace = Workspace::new();
        let uri: Uri = "file:///game/Missing.yarn".parse().unwrap();
        assert!(handle_diagnostics(&workspace, &uri, EngineConfiguration::default()).is_empty());
    }
}
