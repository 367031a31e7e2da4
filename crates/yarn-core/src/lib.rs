//! Core abstractions for yarn-lsp.
//!
//! Symbol records, the registry and text-buffer contracts that quick fixes
//! are computed against, declaration inference, and shared error types.

pub mod buffer;
pub mod declaration;
pub mod definitions;
pub mod error;
pub mod fuzzy;
pub mod registry;
pub mod string_table;
pub mod symbols;

pub use buffer::{TextBuffer, utf16_len};
pub use declaration::{DeclarationInfo, DeclarationInference, DefaultDeclarationInference};
pub use definitions::{built_in_actions, is_definitions_uri, parse_definitions};
pub use error::{Result, YarnError};
pub use fuzzy::rank_by_similarity;
pub use registry::{EditableTextBuffer, NameMatch, SymbolRegistry};
pub use string_table::{LineContent, StringTableEntry};
pub use symbols::{ActionDescriptor, ActionKind, ParameterInfo, SymbolDescriptor, YarnType};
