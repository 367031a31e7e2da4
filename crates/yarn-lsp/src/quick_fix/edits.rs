//! Text edit synthesis.
//!
//! Two placement policies: overwrite a reported range verbatim, or insert
//! whole lines, either at the start of a line or after the last line of the
//! buffer. End-of-buffer insertion keeps the file ending the way it did: a
//! buffer that ended with a terminator still ends with exactly one, and one
//! that did not gets a terminator between its last line and the new block.

use tower_lsp_server::ls_types::{Position, Range, TextEdit};
use yarn_core::{DeclarationInfo, EditableTextBuffer};

/// Replaces `range` with `text`.
pub fn replace_range(range: Range, text: impl Into<String>) -> TextEdit {
    TextEdit {
        range,
        new_text: text.into(),
    }
}

/// Inserts `text` at column 0 of `line`.
pub fn insert_at_line_start(line: u32, text: impl Into<String>) -> TextEdit {
    let position = Position::new(line, 0);
    TextEdit {
        range: Range::new(position, position),
        new_text: text.into(),
    }
}

/// Appends `lines` after the last line of `buffer`, each terminated with the
/// buffer's line terminator.
pub fn append_lines(buffer: &dyn EditableTextBuffer, lines: &[String]) -> TextEdit {
    let terminator = buffer.line_terminator();
    let mut text: String = lines
        .iter()
        .map(|line| format!("{}{}", line, terminator))
        .collect();

    let last_line = buffer.line_count().saturating_sub(1);
    let position = if buffer.ends_with_line_terminator() {
        // The final line is the empty one after the terminator.
        Position::new(last_line, 0)
    } else {
        text.insert_str(0, terminator);
        Position::new(last_line, buffer.line_length(last_line))
    };

    TextEdit {
        range: Range::new(position, position),
        new_text: text,
    }
}

/// A `<<declare>>` statement line, terminator included.
pub fn declaration_statement(name: &str, info: &DeclarationInfo, terminator: &str) -> String {
    format!(
        "<<declare {} = {} as {}>>{}",
        name, info.default_value, info.type_name, terminator
    )
}

/// Lines of an empty node titled `title`.
pub fn node_lines(title: &str) -> Vec<String> {
    vec![
        format!("title: {}", title),
        "---".to_string(),
        String::new(),
        "===".to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use yarn_core::TextBuffer;

    #[test]
    fn test_replace_range() {
        let range = Range::new(Position::new(2, 4), Position::new(2, 9));
        let edit = replace_range(range, "greet");
        assert_eq!(edit.range, range);
        assert_eq!(edit.new_text, "greet");
    }

    #[test]
    fn test_insert_at_line_start() {
        let edit = insert_at_line_start(7, "<<declare $x = 0 as number>>\n");
        assert_eq!(edit.range.start, Position::new(7, 0));
        assert_eq!(edit.range.end, Position::new(7, 0));
    }

    #[test]
    fn test_append_after_trailing_newline() {
        let buffer = TextBuffer::new("title: A\n---\n===\n");
        let edit = append_lines(&buffer, &node_lines("B"));
        assert_eq!(edit.range.start, Position::new(3, 0));
        assert_eq!(edit.range.start, edit.range.end);
        assert_eq!(edit.new_text, "title: B\n---\n\n===\n");
    }

    #[test]
    fn test_append_without_trailing_newline() {
        let buffer = TextBuffer::new("title: A\n---\n===");
        let edit = append_lines(&buffer, &node_lines("B"));
        assert_eq!(edit.range.start, Position::new(2, 3));
        assert_eq!(edit.new_text, "\ntitle: B\n---\n\n===\n");
    }

    #[test]
    fn test_append_uses_crlf_when_buffer_does() {
        let buffer = TextBuffer::new("title: A\r\n---\r\n===");
        let edit = append_lines(&buffer, &node_lines("B"));
        assert_eq!(edit.range.start, Position::new(2, 3));
        assert_eq!(edit.new_text, "\r\ntitle: B\r\n---\r\n\r\n===\r\n");
    }

    #[test]
    fn test_append_to_empty_buffer() {
        let buffer = TextBuffer::new("");
        let edit = append_lines(&buffer, &["x".to_string()]);
        assert_eq!(edit.range.start, Position::new(0, 0));
        assert_eq!(edit.new_text, "\nx\n");
    }

    #[test]
    fn test_declaration_statement() {
        let info = DeclarationInfo {
            type_name: "bool".into(),
            default_value: "false".into(),
        };
        assert_eq!(
            declaration_statement("$met_sam", &info, "\n"),
            "<<declare $met_sam = false as bool>>\n"
        );
    }
}
