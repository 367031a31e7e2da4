//! LSP request handlers.

pub mod code_actions;
pub mod diagnostics;
pub mod string_table;

pub use code_actions::handle_code_actions;
pub use diagnostics::handle_diagnostics;
pub use string_table::{EXTRACT_STRING_TABLE_COMMAND, handle_extract_string_table};
