//! Type and initial-value inference for generated `declare` statements.

use crate::symbols::{SymbolDescriptor, YarnType};

/// Concrete pieces of a `declare` statement for a variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclarationInfo {
    pub type_name: String,
    pub default_value: String,
}

pub trait DeclarationInference: Send + Sync {
    /// Derives the type keyword and initial value for `symbol`.
    fn infer_declaration(&self, symbol: &SymbolDescriptor) -> DeclarationInfo;
}

/// Uses the analyzer's inferred type and the type's zero value.
///
/// Variables whose type could not be inferred are declared as numbers, the
/// type Yarn scripts use most for counters and flags.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultDeclarationInference;

impl DeclarationInference for DefaultDeclarationInference {
    fn infer_declaration(&self, symbol: &SymbolDescriptor) -> DeclarationInfo {
        let yarn_type = match symbol.yarn_type {
            YarnType::Any => YarnType::Number,
            other => other,
        };

        let default_value = symbol
            .default_value
            .clone()
            .unwrap_or_else(|| zero_value(yarn_type).to_string());

        DeclarationInfo {
            type_name: yarn_type.type_name().to_string(),
            default_value,
        }
    }
}

fn zero_value(yarn_type: YarnType) -> &'static str {
    match yarn_type {
        YarnType::String => "\"\"",
        YarnType::Bool => "false",
        YarnType::Number | YarnType::Any => "0",
    }
}
