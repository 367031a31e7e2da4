//! Line-based scanner for `.yarn` documents.
//!
//! Extracts what the quick-fix engine and diagnostics need: node titles,
//! variable declarations and usages, jump targets, command invocations, and
//! string table entries. It is not a full Yarn parser; constructs it does not
//! recognize are skipped.

use regex::Regex;
use std::sync::{Arc, LazyLock};
use tower_lsp_server::ls_types::{Position, Range, Uri};
use yarn_core::{
    LineContent, StringTableEntry, SymbolDescriptor, TextBuffer, YarnType, utf16_len,
};

/// Matches: `<<...>>`
static RE_COMMAND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<<\s*(.*?)\s*>>").expect("Invalid regex"));

/// Matches: `declare $name = value as type`
static RE_DECLARE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^declare\s+(\$[A-Za-z_]\w*)\s*(?:=|to)\s*(.+?)(?:\s+as\s+(\w+))?\s*$")
        .expect("Invalid regex")
});

/// Matches: `set $name to value`
static RE_SET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^set\s+(\$[A-Za-z_]\w*)\s*(?:=|to)\s*(.+?)\s*$").expect("Invalid regex")
});

/// Matches: `jump Node` / `detour Node`
static RE_JUMP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:jump|detour)\s+([A-Za-z_][\w.]*)\s*$").expect("Invalid regex")
});

/// Matches: `$name`
static RE_VARIABLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$[A-Za-z_]\w*").expect("Invalid regex"));

/// Matches: `#tag` or `#key:value`
static RE_HASHTAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#([\w:\-.]+)").expect("Invalid regex"));

/// Statement keywords that are not command invocations.
const KEYWORDS: &[&str] = &[
    "declare", "set", "if", "elseif", "else", "endif", "jump", "detour", "return", "once",
    "endonce", "call", "enum", "case", "endenum", "local",
];

/// A node title and where it is defined.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeInfo {
    pub title: String,
    pub range: Range,
}

/// A name referenced in a script, with its location.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedReference {
    pub name: String,
    pub range: Range,
}

/// A variable mentioned outside a `declare` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableUse {
    pub name: String,
    pub range: Range,
    /// Type of the literal assigned by `<<set>>`, when this use is one.
    pub assigned_type: Option<YarnType>,
}

/// Scan result for one Yarn document.
#[derive(Debug, Clone)]
pub struct YarnDocument {
    pub buffer: Arc<TextBuffer>,
    pub nodes: Vec<NodeInfo>,
    /// Explicit `<<declare>>` statements.
    pub declarations: Vec<SymbolDescriptor>,
    pub variable_uses: Vec<VariableUse>,
    pub jumps: Vec<NamedReference>,
    pub commands: Vec<NamedReference>,
    pub string_table: Vec<StringTableEntry>,
}

#[derive(Clone, Copy, PartialEq)]
enum Section {
    Header,
    Body,
}

pub fn scan_document(uri: &Uri, content: &str) -> YarnDocument {
    let buffer = Arc::new(TextBuffer::new(content));
    let file_name = uri
        .as_str()
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .to_string();

    let mut doc = YarnDocument {
        buffer: Arc::clone(&buffer),
        nodes: Vec::new(),
        declarations: Vec::new(),
        variable_uses: Vec::new(),
        jumps: Vec::new(),
        commands: Vec::new(),
        string_table: Vec::new(),
    };

    let mut section = Section::Header;
    let mut current_node = String::new();

    for (line_idx, line) in buffer.lines() {
        let trimmed = line.trim();

        match section {
            Section::Header => {
                if trimmed == "---" {
                    section = Section::Body;
                } else if let Some(rest) = trimmed.strip_prefix("title:") {
                    let title = rest.trim();
                    let start = (line.len() - line.trim_start().len())
                        + "title:".len()
                        + (rest.len() - rest.trim_start().len());
                    current_node = title.to_string();
                    doc.nodes.push(NodeInfo {
                        title: current_node.clone(),
                        range: byte_range(line, line_idx, start, start + title.len()),
                    });
                }
            }
            Section::Body => {
                if trimmed == "===" {
                    section = Section::Header;
                    current_node.clear();
                    continue;
                }
                if trimmed.starts_with("//") {
                    continue;
                }
                scan_statements(uri, line_idx, line, &mut doc);
                scan_dialogue(&file_name, &current_node, line_idx, line, &mut doc);
            }
        }
    }

    doc
}

fn scan_statements(uri: &Uri, line_idx: u32, line: &str, doc: &mut YarnDocument) {
    let mut declared_here: Vec<(usize, usize)> = Vec::new();

    for caps in RE_COMMAND.captures_iter(line) {
        let Some(inner) = caps.get(1) else {
            continue;
        };
        let body = inner.as_str();

        if let Some(decl) = RE_DECLARE.captures(body) {
            let (Some(name), Some(value)) = (decl.get(1), decl.get(2)) else {
                continue;
            };
            let start = inner.start() + name.start();
            let end = inner.start() + name.end();
            declared_here.push((start, end));

            let yarn_type = decl
                .get(3)
                .map(|t| YarnType::from_type_name(t.as_str()))
                .unwrap_or_else(|| YarnType::from_literal(value.as_str()));

            doc.declarations.push(SymbolDescriptor {
                name: name.as_str().to_string(),
                is_implicit: false,
                yarn_type,
                default_value: Some(value.as_str().to_string()),
                source_uri: uri.clone(),
                source_range: byte_range(line, line_idx, start, end),
            });
        } else if let Some(set) = RE_SET.captures(body) {
            let (Some(name), Some(value)) = (set.get(1), set.get(2)) else {
                continue;
            };
            let start = inner.start() + name.start();
            let end = inner.start() + name.end();
            declared_here.push((start, end));

            doc.variable_uses.push(VariableUse {
                name: name.as_str().to_string(),
                range: byte_range(line, line_idx, start, end),
                assigned_type: Some(YarnType::from_literal(value.as_str())),
            });
        } else if let Some(jump) = RE_JUMP.captures(body) {
            if let Some(target) = jump.get(1) {
                let start = inner.start() + target.start();
                let end = inner.start() + target.end();
                doc.jumps.push(NamedReference {
                    name: target.as_str().to_string(),
                    range: byte_range(line, line_idx, start, end),
                });
            }
        } else if let Some(word) = body.split_whitespace().next()
            && !KEYWORDS.contains(&word)
            && !word.starts_with('$')
        {
            let start = inner.start();
            doc.commands.push(NamedReference {
                name: word.to_string(),
                range: byte_range(line, line_idx, start, start + word.len()),
            });
        }
    }

    for m in RE_VARIABLE.find_iter(line) {
        if declared_here.contains(&(m.start(), m.end())) {
            continue;
        }
        doc.variable_uses.push(VariableUse {
            name: m.as_str().to_string(),
            range: byte_range(line, line_idx, m.start(), m.end()),
            assigned_type: None,
        });
    }
}

fn scan_dialogue(file_name: &str, node: &str, line_idx: u32, line: &str, doc: &mut YarnDocument) {
    let trimmed = line.trim_start();
    let trimmed = trimmed.strip_prefix("->").unwrap_or(trimmed).trim_start();
    if trimmed.is_empty() || trimmed.starts_with("<<") {
        return;
    }

    let text_end = [trimmed.find("<<"), trimmed.find('#')]
        .into_iter()
        .flatten()
        .min()
        .unwrap_or(trimmed.len());
    let text = trimmed[..text_end].trim_end();

    let mut has_line_id = false;
    let mut shadow_of = None;
    let mut metadata = Vec::new();
    for caps in RE_HASHTAG.captures_iter(&trimmed[text_end..]) {
        let Some(tag) = caps.get(1) else {
            continue;
        };
        let tag = tag.as_str();
        if tag.starts_with("line:") {
            has_line_id = true;
        } else if let Some(id) = tag.strip_prefix("shadow:") {
            shadow_of = Some(format!("line:{}", id));
        } else {
            metadata.push(tag.to_string());
        }
    }

    let content = match shadow_of {
        Some(id) => LineContent::ShadowOf(id),
        None if text.is_empty() => return,
        None => LineContent::Text(text.to_string()),
    };

    doc.string_table.push(StringTableEntry::new(
        content,
        file_name,
        node,
        line_idx + 1,
        !has_line_id,
        metadata,
    ));
}

fn byte_range(line: &str, line_idx: u32, start: usize, end: usize) -> Range {
    line_range(line_idx, utf16_len(&line[..start]), utf16_len(&line[..end]))
}

fn line_range(line_idx: u32, start: u32, end: u32) -> Range {
    Range::new(Position::new(line_idx, start), Position::new(line_idx, end))
}
