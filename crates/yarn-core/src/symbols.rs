//! Symbol records produced by the project model and consumed by LSP handlers.

use tower_lsp_server::ls_types::{Range, Uri};

/// Value types known to the Yarn type checker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum YarnType {
    Number,
    String,
    Bool,
    #[default]
    Any,
}

impl YarnType {
    /// Maps a definition-file type name onto a Yarn type.
    ///
    /// Host-language numeric aliases collapse to `Number`; anything
    /// unrecognized becomes `Any`.
    pub fn from_type_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "string" => Self::String,
            "bool" | "boolean" => Self::Bool,
            "number" | "float" | "int" | "double" => Self::Number,
            _ => Self::Any,
        }
    }

    /// Infers the type of a literal as written in a Yarn script.
    pub fn from_literal(literal: &str) -> Self {
        let literal = literal.trim();
        if literal.eq_ignore_ascii_case("true") || literal.eq_ignore_ascii_case("false") {
            Self::Bool
        } else if literal.len() >= 2 && literal.starts_with('"') && literal.ends_with('"') {
            Self::String
        } else if literal.parse::<f64>().is_ok() {
            Self::Number
        } else {
            Self::Any
        }
    }

    /// Keyword used in `declare ... as <type>` statements.
    pub fn type_name(self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::String => "string",
            Self::Bool => "bool",
            Self::Any => "any",
        }
    }
}

/// A variable known to a project.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolDescriptor {
    /// Variable name including the leading `$`.
    pub name: String,
    /// True when the analyzer inferred the variable from usage rather than a
    /// `declare` statement.
    pub is_implicit: bool,
    pub yarn_type: YarnType,
    /// Initial value literal, if one was written in a declaration.
    pub default_value: Option<String>,
    pub source_uri: Uri,
    pub source_range: Range,
}

/// Distinguishes `<<command>>` actions from functions called in expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Command,
    Function,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterInfo {
    pub name: String,
    pub type_name: String,
    pub documentation: String,
    /// `None` when the parameter is required.
    pub default_value: Option<String>,
    /// Set on a trailing `params`-style parameter that absorbs the rest.
    pub is_variadic_tail: bool,
}

/// A registered command or function definition.
///
/// Built once per definition when a project loads, read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionDescriptor {
    /// Name as written in Yarn scripts.
    pub yarn_name: String,
    /// Name in the host language, if different.
    pub display_name: String,
    pub kind: ActionKind,
    pub documentation: String,
    pub parameters: Vec<ParameterInfo>,
    pub variadic_type: Option<YarnType>,
    pub return_type: Option<YarnType>,
    /// Lower priority wins when several definitions share a name.
    pub priority: i32,
    pub is_built_in: bool,
    pub source_uri: Option<Uri>,
    pub source_range: Option<Range>,
}

impl ActionDescriptor {
    /// Minimal descriptor for a built-in action with no documented parameters.
    pub fn built_in(yarn_name: &str, kind: ActionKind) -> Self {
        Self {
            yarn_name: yarn_name.to_string(),
            display_name: yarn_name.to_string(),
            kind,
            documentation: String::new(),
            parameters: Vec::new(),
            variadic_type: None,
            return_type: None,
            priority: i32::MAX,
            is_built_in: true,
            source_uri: None,
            source_range: None,
        }
    }
}
