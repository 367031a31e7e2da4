//! Command and function definitions from `.ysls.json` files and built-ins.

use crate::error::{Result, YarnError};
use crate::symbols::{ActionDescriptor, ActionKind, ParameterInfo, YarnType};
use serde::Deserialize;
use tower_lsp_server::ls_types::Uri;

/// File suffix of JSON definition files.
pub const DEFINITIONS_SUFFIX: &str = ".ysls.json";

const BUILT_IN_COMMANDS: &[&str] = &["wait", "stop"];

const BUILT_IN_FUNCTIONS: &[(&str, YarnType)] = &[
    ("visited", YarnType::Bool),
    ("visited_count", YarnType::Number),
    ("random", YarnType::Number),
    ("random_range", YarnType::Number),
    ("dice", YarnType::Number),
    ("round", YarnType::Number),
    ("floor", YarnType::Number),
    ("ceil", YarnType::Number),
    ("inc", YarnType::Number),
    ("dec", YarnType::Number),
    ("decimal", YarnType::Number),
    ("int", YarnType::Number),
];

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DefinitionsFile {
    #[serde(default)]
    commands: Vec<RegisteredDefinition>,
    #[serde(default)]
    functions: Vec<RegisteredDefinition>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegisteredDefinition {
    yarn_name: String,
    definition_name: Option<String>,
    #[serde(default)]
    documentation: String,
    #[serde(default)]
    parameters: Vec<RegisteredParameter>,
    return_type: Option<String>,
    variadic_parameter_type: Option<String>,
    #[serde(default)]
    priority: i32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegisteredParameter {
    name: String,
    #[serde(rename = "type", default)]
    type_name: String,
    #[serde(default)]
    documentation: String,
    default_value: Option<String>,
    #[serde(default)]
    is_params_array: bool,
}

impl RegisteredDefinition {
    fn into_action(self, kind: ActionKind, uri: &Uri) -> ActionDescriptor {
        ActionDescriptor {
            display_name: self
                .definition_name
                .unwrap_or_else(|| self.yarn_name.clone()),
            yarn_name: self.yarn_name,
            kind,
            documentation: self.documentation,
            parameters: self
                .parameters
                .into_iter()
                .map(|p| ParameterInfo {
                    name: p.name,
                    type_name: p.type_name,
                    documentation: p.documentation,
                    default_value: p.default_value,
                    is_variadic_tail: p.is_params_array,
                })
                .collect(),
            variadic_type: self
                .variadic_parameter_type
                .as_deref()
                .map(YarnType::from_type_name),
            return_type: self.return_type.as_deref().map(YarnType::from_type_name),
            priority: self.priority,
            is_built_in: false,
            source_uri: Some(uri.clone()),
            source_range: None,
        }
    }
}

/// Parses a `.ysls.json` document into action descriptors.
///
/// # Errors
///
/// Returns [`YarnError::InvalidDefinitions`] when the content is not a valid
/// definitions file.
pub fn parse_definitions(content: &str, uri: &Uri) -> Result<Vec<ActionDescriptor>> {
    let file: DefinitionsFile =
        serde_json::from_str(content).map_err(|source| YarnError::InvalidDefinitions {
            file: uri.as_str().to_string(),
            source,
        })?;

    let commands = file
        .commands
        .into_iter()
        .map(|d| d.into_action(ActionKind::Command, uri));
    let functions = file
        .functions
        .into_iter()
        .map(|d| d.into_action(ActionKind::Function, uri));

    let actions: Vec<_> = commands.chain(functions).collect();
    tracing::debug!("parsed {} definitions from {}", actions.len(), uri.as_str());
    Ok(actions)
}

/// Commands and functions every Yarn project can call.
pub fn built_in_actions() -> Vec<ActionDescriptor> {
    let commands = BUILT_IN_COMMANDS
        .iter()
        .map(|name| ActionDescriptor::built_in(name, ActionKind::Command));
    let functions = BUILT_IN_FUNCTIONS.iter().map(|(name, return_type)| {
        let mut action = ActionDescriptor::built_in(name, ActionKind::Function);
        action.return_type = Some(*return_type);
        action
    });
    commands.chain(functions).collect()
}

/// Whether `uri` names a definitions file.
pub fn is_definitions_uri(uri: &Uri) -> bool {
    uri.as_str().ends_with(DEFINITIONS_SUFFIX)
}
