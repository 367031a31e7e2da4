//! Packaging of proposed fixes into code actions.

use std::collections::HashMap;
use tower_lsp_server::ls_types::{
    CodeAction, CodeActionKind, CodeActionOrCommand, Range, TextEdit, Uri, WorkspaceEdit,
};

use super::edits;

/// A titled edit set for a single document.
#[derive(Debug, Clone, PartialEq)]
pub struct ProposedFix {
    pub title: String,
    pub is_preferred: bool,
    pub edits: HashMap<Uri, Vec<TextEdit>>,
}

impl ProposedFix {
    fn new(title: String, is_preferred: bool, uri: &Uri, edit: TextEdit) -> Self {
        let mut edits = HashMap::with_capacity(1);
        edits.insert(uri.clone(), vec![edit]);
        Self {
            title,
            is_preferred,
            edits,
        }
    }

    /// Replaces `range` in `uri` with `name`.
    pub fn rename(uri: &Uri, range: Range, name: &str) -> Self {
        Self::new(
            format!("Rename to '{}'", name),
            false,
            uri,
            edits::replace_range(range, name),
        )
    }

    /// A generated fix the editor should offer first.
    pub fn preferred(title: String, uri: &Uri, edit: TextEdit) -> Self {
        Self::new(title, true, uri, edit)
    }

    pub fn into_code_action(self) -> CodeActionOrCommand {
        CodeActionOrCommand::CodeAction(CodeAction {
            title: self.title,
            kind: Some(CodeActionKind::QUICKFIX),
            is_preferred: self.is_preferred.then_some(true),
            edit: Some(WorkspaceEdit {
                changes: Some(self.edits),
                ..Default::default()
            }),
            ..Default::default()
        })
    }
}

/// Orders one diagnostic's fixes: the preferred fix, if any, then renames in
/// resolver order.
pub fn assemble(preferred: Option<ProposedFix>, renames: Vec<ProposedFix>) -> Vec<ProposedFix> {
    preferred.into_iter().chain(renames).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tower_lsp_server::ls_types::Position;

    fn uri() -> Uri {
        "file:///project/story.yarn".parse().unwrap()
    }

    fn range() -> Range {
        Range::new(Position::new(3, 2), Position::new(3, 7))
    }

    #[test]
    fn test_rename_fix() {
        let fix = ProposedFix::rename(&uri(), range(), "greet");
        assert_eq!(fix.title, "Rename to 'greet'");
        assert!(!fix.is_preferred);
        assert_eq!(fix.edits.len(), 1);

        let edits = &fix.edits[&uri()];
        assert_eq!(edits.len(), 1);
        assert_eq!(edits[0].range, range());
        assert_eq!(edits[0].new_text, "greet");
    }

    #[test]
    fn test_into_code_action() {
        let fix = ProposedFix::preferred(
            "Generate node 'Shop'".into(),
            &uri(),
            edits::insert_at_line_start(0, "x"),
        );
        let CodeActionOrCommand::CodeAction(action) = fix.into_code_action() else {
            panic!("expected code action");
        };
        assert_eq!(action.title, "Generate node 'Shop'");
        assert_eq!(action.kind, Some(CodeActionKind::QUICKFIX));
        assert_eq!(action.is_preferred, Some(true));
        let changes = action.edit.unwrap().changes.unwrap();
        assert!(changes.contains_key(&uri()));
    }

    #[test]
    fn test_rename_action_not_marked_preferred() {
        let fix = ProposedFix::rename(&uri(), range(), "greet");
        let CodeActionOrCommand::CodeAction(action) = fix.into_code_action() else {
            panic!("expected code action");
        };
        assert_eq!(action.is_preferred, None);
    }

    #[test]
    fn test_assemble_puts_preferred_first() {
        let renames = vec![
            ProposedFix::rename(&uri(), range(), "a"),
            ProposedFix::rename(&uri(), range(), "b"),
        ];
        let preferred = ProposedFix::preferred(
            "Generate variable declaration '$c'".into(),
            &uri(),
            edits::insert_at_line_start(3, "<<declare $c = 0 as number>>\n"),
        );

        let fixes = assemble(Some(preferred), renames);
        let titles: Vec<_> = fixes.iter().map(|f| f.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["Generate variable declaration '$c'", "Rename to 'a'", "Rename to 'b'"]
        );
    }

    #[test]
    fn test_assemble_without_preferred() {
        let fixes = assemble(None, vec![ProposedFix::rename(&uri(), range(), "a")]);
        assert_eq!(fixes.len(), 1);
        assert!(!fixes[0].is_preferred);
    }
}
