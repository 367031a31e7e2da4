//! Line-indexed text buffer for open documents.

use crate::registry::EditableTextBuffer;

/// Immutable document text with precomputed line starts.
#[derive(Debug, Clone)]
pub struct TextBuffer {
    text: String,
    line_starts: Vec<usize>,
    terminator: &'static str,
}

impl TextBuffer {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let line_starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        let terminator = if text.contains("\r\n") { "\r\n" } else { "\n" };

        Self {
            text,
            line_starts,
            terminator,
        }
    }

    /// Text of `line` without its terminator.
    pub fn line(&self, line: u32) -> Option<&str> {
        let index = line as usize;
        let start = *self.line_starts.get(index)?;
        let end = self
            .line_starts
            .get(index + 1)
            .copied()
            .unwrap_or(self.text.len());
        let raw = &self.text[start..end];
        let raw = raw.strip_suffix('\n').unwrap_or(raw);
        Some(raw.strip_suffix('\r').unwrap_or(raw))
    }

    /// Iterates lines with their indices, terminators stripped.
    pub fn lines(&self) -> impl Iterator<Item = (u32, &str)> {
        (0..self.line_count()).filter_map(|i| self.line(i).map(|l| (i, l)))
    }
}

impl EditableTextBuffer for TextBuffer {
    fn line_count(&self) -> u32 {
        self.line_starts.len() as u32
    }

    fn line_length(&self, line: u32) -> u32 {
        self.line(line).map_or(0, utf16_len)
    }

    fn ends_with_line_terminator(&self) -> bool {
        self.text.ends_with('\n')
    }

    fn line_terminator(&self) -> &str {
        self.terminator
    }
}

/// Length of `s` in UTF-16 code units, the LSP default position encoding.
pub fn utf16_len(s: &str) -> u32 {
    s.encode_utf16().count() as u32
}
