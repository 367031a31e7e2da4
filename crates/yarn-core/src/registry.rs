use crate::fuzzy::rank_by_similarity;
use crate::symbols::{ActionDescriptor, ActionKind, SymbolDescriptor};
use std::sync::Arc;
use tower_lsp_server::ls_types::Uri;

/// How a registry query compares names.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NameMatch {
    /// Only names equal to the query.
    Exact,
    /// Names within `threshold` normalized edit distance, closest first.
    Fuzzy { threshold: f32 },
}

impl NameMatch {
    /// Applies this match mode to a set of named records.
    ///
    /// Exact matching keeps input order. Fuzzy matching orders by distance
    /// and keeps input order among ties.
    pub fn select<T, F>(self, query: &str, items: impl IntoIterator<Item = T>, name: F) -> Vec<T>
    where
        F: Fn(&T) -> &str,
    {
        match self {
            Self::Exact => items.into_iter().filter(|item| name(item) == query).collect(),
            Self::Fuzzy { threshold } => rank_by_similarity(query, items, threshold, name)
                .into_iter()
                .map(|(_, item)| item)
                .collect(),
        }
    }
}

/// Read-only view of a document's text as the edit synthesizer needs it.
///
/// Line indices and lengths follow LSP conventions: zero-based lines,
/// lengths in UTF-16 code units, terminators excluded.
pub trait EditableTextBuffer: Send + Sync {
    /// Number of lines. A buffer ending in a terminator has a final empty line.
    fn line_count(&self) -> u32;

    /// Length of `line`, or 0 when out of range.
    fn line_length(&self, line: u32) -> u32;

    /// Whether the last character of the buffer is a line terminator.
    fn ends_with_line_terminator(&self) -> bool;

    /// Terminator to use for inserted lines.
    fn line_terminator(&self) -> &str {
        "\n"
    }
}

/// Symbol lookups over a project.
///
/// Implementors answer from an already-analyzed snapshot; none of these
/// methods block or mutate project state.
pub trait SymbolRegistry: Send + Sync {
    /// Variables whose name matches `name`.
    fn find_variables(&self, name: &str, matching: NameMatch) -> Vec<SymbolDescriptor>;

    /// Commands or functions whose Yarn name matches `name`.
    fn find_actions(
        &self,
        name: &str,
        kind: ActionKind,
        matching: NameMatch,
    ) -> Vec<ActionDescriptor>;

    /// Node titles matching `name`.
    fn find_nodes(&self, name: &str, matching: NameMatch) -> Vec<String>;

    /// Text buffer for a document in this project, if the project owns it.
    fn document_buffer(&self, uri: &Uri) -> Option<Arc<dyn EditableTextBuffer>>;
}
