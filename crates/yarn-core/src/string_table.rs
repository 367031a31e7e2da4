//! String table records for compiled lines.
//!
//! A line either carries its own text or shadows another line and reuses
//! that line's text. [`LineContent`] keeps the two cases exclusive.

use crate::error::YarnError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineContent {
    Text(String),
    /// ID of the line whose text this entry reuses.
    ShadowOf(String),
}

/// One entry of a compiled string table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawStringTableEntry", into = "RawStringTableEntry")]
pub struct StringTableEntry {
    content: LineContent,
    pub node_name: String,
    pub line_number: u32,
    pub file_name: String,
    /// The line ID was generated rather than written as a `#line:` tag, so it
    /// may change between compilations.
    pub is_implicit_id: bool,
    /// Hashtags on the line other than `#line:`.
    pub metadata: BTreeSet<String>,
}

impl StringTableEntry {
    pub fn new(
        content: LineContent,
        file_name: impl Into<String>,
        node_name: impl Into<String>,
        line_number: u32,
        is_implicit_id: bool,
        metadata: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            content,
            node_name: node_name.into(),
            line_number,
            file_name: file_name.into(),
            is_implicit_id,
            metadata: metadata.into_iter().collect(),
        }
    }

    /// Own text, absent for shadow lines.
    pub fn text(&self) -> Option<&str> {
        match &self.content {
            LineContent::Text(text) => Some(text),
            LineContent::ShadowOf(_) => None,
        }
    }

    pub fn shadow_of(&self) -> Option<&str> {
        match &self.content {
            LineContent::Text(_) => None,
            LineContent::ShadowOf(id) => Some(id),
        }
    }
}

impl fmt::Display for StringTableEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}:{})",
            self.text().unwrap_or_default(),
            self.file_name,
            self.line_number
        )
    }
}

/// Wire shape with independent `text` and `shadowLineId` fields.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawStringTableEntry {
    text: Option<String>,
    node_name: String,
    line_number: u32,
    file_name: String,
    #[serde(default)]
    is_implicit_tag: bool,
    #[serde(default)]
    metadata: BTreeSet<String>,
    #[serde(rename = "shadowLineId")]
    shadow_line_id: Option<String>,
}

impl TryFrom<RawStringTableEntry> for StringTableEntry {
    type Error = YarnError;

    fn try_from(raw: RawStringTableEntry) -> Result<Self, Self::Error> {
        let content = match (raw.text, raw.shadow_line_id) {
            (Some(text), None) => LineContent::Text(text),
            (None, Some(id)) => LineContent::ShadowOf(id),
            (Some(_), Some(_)) => {
                return Err(YarnError::InvalidStringTableEntry {
                    node: raw.node_name,
                    message: "a shadow line cannot carry its own text".into(),
                });
            }
            (None, None) => {
                return Err(YarnError::InvalidStringTableEntry {
                    node: raw.node_name,
                    message: "line has neither text nor a shadowed line".into(),
                });
            }
        };

        Ok(Self {
            content,
            node_name: raw.node_name,
            line_number: raw.line_number,
            file_name: raw.file_name,
            is_implicit_id: raw.is_implicit_tag,
            metadata: raw.metadata,
        })
    }
}

impl From<StringTableEntry> for RawStringTableEntry {
    fn from(entry: StringTableEntry) -> Self {
        let (text, shadow_line_id) = match entry.content {
            LineContent::Text(text) => (Some(text), None),
            LineContent::ShadowOf(id) => (None, Some(id)),
        };

        Self {
            text,
            node_name: entry.node_name,
            line_number: entry.line_number,
            file_name: entry.file_name,
            is_implicit_tag: entry.is_implicit_id,
            metadata: entry.metadata,
            shadow_line_id,
        }
    }
}
