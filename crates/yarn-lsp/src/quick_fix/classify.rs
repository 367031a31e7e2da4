//! Diagnostic classification and payload decoding.

use serde::Deserialize;
use serde_json::Value;
use tower_lsp_server::ls_types::{Diagnostic, NumberOrString};

pub const MISSING_COMMAND_DEFINITION: &str = "YRNMsngCmdDef";
pub const MISSING_VARIABLE_DECLARATION: &str = "YRNMsngVarDec";
pub const MISSING_JUMP_DESTINATION: &str = "YRNMsngJumpDest";

/// Remediation strategies, one per diagnostic code this engine fixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    MissingCommandDefinition,
    MissingVariableDeclaration,
    MissingJumpDestination,
}

impl Strategy {
    /// Looks up the strategy for a diagnostic code. Codes owned by other
    /// tooling map to `None`.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            MISSING_COMMAND_DEFINITION => Some(Self::MissingCommandDefinition),
            MISSING_VARIABLE_DECLARATION => Some(Self::MissingVariableDeclaration),
            MISSING_JUMP_DESTINATION => Some(Self::MissingJumpDestination),
            _ => None,
        }
    }

    /// Classifies a diagnostic by its string code.
    pub fn classify(diagnostic: &Diagnostic) -> Option<Self> {
        match diagnostic.code.as_ref()? {
            NumberOrString::String(code) => Self::from_code(code),
            NumberOrString::Number(_) => None,
        }
    }

    pub const fn code(self) -> &'static str {
        match self {
            Self::MissingCommandDefinition => MISSING_COMMAND_DEFINITION,
            Self::MissingVariableDeclaration => MISSING_VARIABLE_DECLARATION,
            Self::MissingJumpDestination => MISSING_JUMP_DESTINATION,
        }
    }
}

/// Payload of a missing-command diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CommandReference {
    pub name: String,
    #[serde(default)]
    pub is_command: bool,
}

/// A classified diagnostic with its typed payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Remediation {
    MissingCommand(CommandReference),
    MissingVariable(String),
    MissingJumpDestination(String),
}

impl Remediation {
    /// Decodes the diagnostic payload for `strategy`.
    ///
    /// Returns `None` when the payload is absent, has the wrong shape, or
    /// names nothing.
    pub fn decode(strategy: Strategy, data: Option<&Value>) -> Option<Self> {
        match strategy {
            Strategy::MissingCommandDefinition => {
                let data = data.filter(|d| d.as_object().is_some_and(|o| !o.is_empty()))?;
                let reference = CommandReference::deserialize(data).ok()?;
                (!reference.name.is_empty()).then_some(Self::MissingCommand(reference))
            }
            Strategy::MissingVariableDeclaration => {
                non_empty_string(data).map(Self::MissingVariable)
            }
            Strategy::MissingJumpDestination => {
                non_empty_string(data).map(Self::MissingJumpDestination)
            }
        }
    }
}

fn non_empty_string(data: Option<&Value>) -> Option<String> {
    data.and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
