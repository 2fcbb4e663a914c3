//! Page descriptors and content formats.
//!
//! A page is one discoverable content file. Its descriptor is built once from
//! the file's eagerly available raw text and never changes afterwards.
//!
//! # Construction
//!
//! ```text
//! "./MyDiagram.mermaid" + raw text
//!         │
//!         ├── extension  ──► "mermaid" ──► Format::Diagram
//!         ├── base name  ──► "MyDiagram"
//!         │                      ├── id:   "mydiagram"
//!         │                      └── default name: "My Diagram"
//!         └── meta::extract_metadata(raw, format)
//!                                └── name / description overrides
//! ```

pub mod meta;

use serde::Serialize;
use std::fmt;

pub use meta::{Metadata, extract_metadata, parse_document};

// ============================================================================
// Format
// ============================================================================

/// Closed set of content formats.
///
/// Drives both the metadata grammar and the renderer the presentation layer picks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Format {
    #[serde(rename = "tsx")]
    Component,
    #[serde(rename = "md")]
    Markdown,
    #[serde(rename = "svg")]
    VectorImage,
    #[serde(rename = "mermaid")]
    Diagram,
    #[serde(rename = "txt")]
    PlainText,
}

impl Format {
    /// All formats, in registry construction order.
    pub const ALL: [Self; 5] = [
        Self::Component,
        Self::Markdown,
        Self::VectorImage,
        Self::Diagram,
        Self::PlainText,
    ];

    /// Literal file extension for this format.
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Component => "tsx",
            Self::Markdown => "md",
            Self::VectorImage => "svg",
            Self::Diagram => "mermaid",
            Self::PlainText => "txt",
        }
    }

    /// Classify a file extension. Unknown extensions are treated as plain text.
    pub fn from_extension(ext: &str) -> Self {
        Self::parse(ext).unwrap_or(Self::PlainText)
    }

    /// Strict variant of [`Format::from_extension`], used for user input.
    pub fn parse(ext: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.extension() == ext)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

// ============================================================================
// Page Descriptor
// ============================================================================

/// Metadata record for one content file.
///
/// | Field | Source |
/// |-------|--------|
/// | `id` | lowercased base name |
/// | `name` | `Name` metadata, else spaced base name |
/// | `description` | `Description` metadata, else absent |
/// | `format` | classified from the extension |
/// | `extension` | literal extension, display only |
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageDescriptor {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub format: Format,
    pub extension: String,
}

impl PageDescriptor {
    /// Build a descriptor from a source path (`./Name.ext`) and its raw text.
    pub fn from_file(path: &str, raw: &str) -> Self {
        let FileName { base, extension } = FileName::parse(path);
        let format = Format::from_extension(extension);
        let Metadata { name, description } = extract_metadata(raw, format);

        Self {
            id: page_id(base),
            name: name.unwrap_or_else(|| default_name(base)),
            description,
            format,
            extension: extension.to_owned(),
        }
    }
}

// ============================================================================
// Path helpers
// ============================================================================

/// Base name and extension of a content path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileName<'a> {
    pub base: &'a str,
    pub extension: &'a str,
}

impl<'a> FileName<'a> {
    /// Split `./dir/MyPage.md` into `MyPage` and `md`.
    ///
    /// The extension is everything after the last `.` of the file name;
    /// a name without a dot has an empty extension.
    pub fn parse(path: &'a str) -> Self {
        let file = path.rsplit(['/', '\\']).next().unwrap_or(path);
        match file.rsplit_once('.') {
            Some((base, extension)) => Self { base, extension },
            None => Self {
                base: file,
                extension: "",
            },
        }
    }
}

/// Registry identifier for a base name.
pub fn page_id(base: &str) -> String {
    base.to_ascii_lowercase()
}

/// Lookup key used by the lazy loader maps: `./{id}.{ext}`.
pub fn page_key(id: &str, format: Format) -> String {
    format!("./{id}.{}", format.extension())
}

/// Insert a space before every uppercase letter: `MyDiagram` → `My Diagram`.
pub fn default_name(base: &str) -> String {
    let mut name = String::with_capacity(base.len() + 4);
    for c in base.chars() {
        if c.is_ascii_uppercase() {
            name.push(' ');
        }
        name.push(c);
    }
    name.trim().to_owned()
}

/// Private and infrastructure files never become pages.
pub fn is_excluded(path: &str) -> bool {
    FileName::parse(path).base.starts_with('_') || path.contains("index.")
}

// ============================================================================
// Tests
// ============================================================================
