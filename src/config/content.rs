//! `[content]` section configuration.
//!
//! Contains the location of the pages folder.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[content]` section in pagedeck.toml - where pages are discovered.
///
/// # Example
/// ```toml
/// [content]
/// dir = "docs"   # flat folder, relative to the project root
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct ContentConfig {
    /// Directory scanned for pages (non-recursive).
    #[serde(default = "defaults::content::dir")]
    #[educe(Default = defaults::content::dir())]
    pub dir: PathBuf,
}
