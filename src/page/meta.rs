//! Metadata block extraction and stripping.
//!
//! Each format carries optional `Name` / `Description` fields in a leading
//! comment block. Only the first block, anchored at the very start of the
//! text, is considered.
//!
//! | Format | Block | Fields |
//! |--------|-------|--------|
//! | `md`, `svg` | `<!-- ... -->` | `Name: ...` / `Description: ...` anywhere in the block |
//! | `tsx` | `/* ... */` | same labels (JSDoc `*` prefixes allowed) |
//! | `txt` | leading `#` lines | `# Name: ...` / `# Description: ...` |
//! | `mermaid` | `%%{ ... }%%` | JSON object keys `Name` / `Description` |
//!
//! Labels are case-insensitive except for the JSON keys of diagrams.
//! A missing block is not an error: both fields are simply absent.

use super::Format;
use crate::log;
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;

// ============================================================================
// Grammar Table
// ============================================================================

/// How fields are read out of a matched block body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldRule {
    /// `Name: value` anywhere in the block; the value runs to the end of its line.
    Labels,
    /// `# Name: value` header lines.
    HashLabels,
    /// Body is the inside of a JSON object.
    Json,
}

/// Metadata grammar for one comment style.
///
/// `block` is anchored at the start of the text and captures the block body
/// in group 1. Removing its first match is the stripping operation.
struct Grammar {
    block: Regex,
    fields: FieldRule,
}

static HTML_COMMENT: LazyLock<Grammar> = LazyLock::new(|| Grammar {
    block: Regex::new(r"\A<!--\s*((?s:.*?))\s*-->").unwrap(),
    fields: FieldRule::Labels,
});

static BLOCK_COMMENT: LazyLock<Grammar> = LazyLock::new(|| Grammar {
    block: Regex::new(r"\A/\*\s*((?s:.*?))\s*\*/").unwrap(),
    fields: FieldRule::Labels,
});

static HASH_LINES: LazyLock<Grammar> = LazyLock::new(|| Grammar {
    block: Regex::new(r"\A((?:#[^\n]*(?:\n|\z))+)").unwrap(),
    fields: FieldRule::HashLabels,
});

static DIAGRAM_DIRECTIVE: LazyLock<Grammar> = LazyLock::new(|| Grammar {
    block: Regex::new(r"\A%%\s*\{\s*((?s:.*?))\s*\}\s*%%").unwrap(),
    fields: FieldRule::Json,
});

static NAME_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bName[ \t]*:[ \t]*(.*)").unwrap());

static DESCRIPTION_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bDescription[ \t]*:[ \t]*(.*)").unwrap());

static NAME_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?im)^#[ \t]*Name[ \t]*:[ \t]*(.*)$").unwrap());

static DESCRIPTION_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?im)^#[ \t]*Description[ \t]*:[ \t]*(.*)$").unwrap());

impl Format {
    /// Metadata grammar for this format.
    fn grammar(self) -> &'static Grammar {
        match self {
            Self::Markdown | Self::VectorImage => &*HTML_COMMENT,
            Self::Component => &*BLOCK_COMMENT,
            Self::PlainText => &*HASH_LINES,
            Self::Diagram => &*DIAGRAM_DIRECTIVE,
        }
    }
}

// ============================================================================
// Types
// ============================================================================

/// Author-supplied metadata. Both fields are optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Diagram directive payload. Keys are matched exactly.
#[derive(Debug, Default, Deserialize)]
struct DiagramMeta {
    #[serde(rename = "Name")]
    name: Option<String>,
    #[serde(rename = "Description")]
    description: Option<String>,
}

/// A file split into its metadata and displayable body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub meta: Metadata,
    pub body: String,
}

// ============================================================================
// Public API
// ============================================================================

/// Extract `Name` / `Description` from the leading metadata block.
///
/// Never fails. Malformed diagram JSON is logged and treated as absent.
pub fn extract_metadata(text: &str, format: Format) -> Metadata {
    read_block(text, format).unwrap_or_default()
}

/// Remove exactly one leading metadata block and trim the result.
///
/// Text without a leading block passes through unchanged (apart from trimming).
pub fn strip_metadata(text: &str, format: Format) -> String {
    format.grammar().block.replacen(text, 1, "").trim().to_owned()
}

/// Extract metadata and strip the block in one pass.
///
/// A diagram whose directive fails to parse keeps its directive in the body.
pub fn parse_document(text: &str, format: Format) -> Document {
    match read_block(text, format) {
        Some(meta) => Document {
            meta,
            body: strip_metadata(text, format),
        },
        None if format == Format::Diagram => Document {
            meta: Metadata::default(),
            body: text.trim().to_owned(),
        },
        None => Document {
            meta: Metadata::default(),
            body: strip_metadata(text, format),
        },
    }
}

// ============================================================================
// Internal
// ============================================================================

/// Read fields from the leading block.
///
/// Returns `None` only when the block is present but cannot be parsed;
/// a missing block yields empty metadata.
fn read_block(text: &str, format: Format) -> Option<Metadata> {
    let grammar = format.grammar();
    let Some(body) = grammar.block.captures(text).and_then(|c| c.get(1)) else {
        return Some(Metadata::default());
    };

    match grammar.fields {
        FieldRule::Labels => Some(Metadata {
            name: label(&NAME_LABEL, body.as_str()),
            description: label(&DESCRIPTION_LABEL, body.as_str()),
        }),
        FieldRule::HashLabels => Some(Metadata {
            name: label(&NAME_HEADER, body.as_str()),
            description: label(&DESCRIPTION_HEADER, body.as_str()),
        }),
        FieldRule::Json => {
            let json = format!("{{{}}}", body.as_str());
            match serde_json::from_str::<DiagramMeta>(&json) {
                Ok(meta) => Some(Metadata {
                    name: meta.name,
                    description: meta.description,
                }),
                Err(err) => {
                    log!("warn"; "failed to parse diagram metadata: {err}");
                    None
                }
            }
        }
    }
}

/// First label match in `body`, trimmed. Empty values count as absent.
fn label(re: &Regex, body: &str) -> Option<String> {
    re.captures(body)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_owned())
        .filter(|v| !v.is_empty())
}

// ============================================================================
// Tests
// ============================================================================
