//! Page registry: eager descriptors plus lazy content accessors.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                        Two-Phase Loading                            │
//! ├─────────────────────────────────────────────────────────────────────┤
//! │                                                                     │
//! │  Phase 1: build_registry() (start-up, synchronous)                  │
//! │  ┌──────────────┐    ┌──────────────┐    ┌──────────────────────┐   │
//! │  │ list_eager() │ ─► │ exclude _x / │ ─► │ PageDescriptor[]     │   │
//! │  │ per format   │    │ index.*      │    │ sorted by id         │   │
//! │  └──────────────┘    └──────────────┘    └──────────────────────┘   │
//! │                                                                     │
//! │  Phase 2: get_content() / get_component() (on demand, async)        │
//! │  ┌──────────────┐    ┌──────────────┐    ┌──────────────────────┐   │
//! │  │ ./{id}.{ext} │ ─► │ lazy loader  │ ─► │ text / component     │   │
//! │  │ lookup       │    │ (no caching) │    │ "" / None on failure │   │
//! │  └──────────────┘    └──────────────┘    └──────────────────────┘   │
//! │                                                                     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The registry is immutable once built. Accessors never return errors: every
//! failure is logged and surfaced as an empty result.

use crate::log;
use crate::page::{FileName, Format, PageDescriptor, is_excluded, page_id, page_key};
use crate::source::{Component, ContentSource, Loaded, Loader, SourceError};
use std::collections::{BTreeMap, HashMap};

/// Immutable, id-sorted page list with lazy loaders for every format.
pub struct Registry {
    pages: Vec<PageDescriptor>,
    loaders: HashMap<Format, BTreeMap<String, Loader>>,
}

/// Build the registry from a content source.
///
/// Formats are visited in [`Format::ALL`] order; the combined list is then
/// stably sorted by `id` (ordinal comparison), so the visiting order only
/// shows through for equal ids.
pub fn build_registry(source: &dyn ContentSource) -> Registry {
    let mut pages = Vec::new();
    let mut loaders = HashMap::new();

    for format in Format::ALL {
        let ext = format.extension();

        pages.extend(
            source
                .list_eager(ext)
                .iter()
                .filter(|(path, _)| !is_excluded(path))
                .map(|(path, raw)| PageDescriptor::from_file(path, raw)),
        );

        loaders.insert(format, normalize_loaders(source.list_lazy(ext), format));
    }

    pages.sort_by(|a, b| a.id.cmp(&b.id));

    Registry { pages, loaders }
}

/// Re-key loaders as `./{id}.{ext}` so lookups by page id hit mixed-case files.
fn normalize_loaders(
    lazy: BTreeMap<String, Loader>,
    format: Format,
) -> BTreeMap<String, Loader> {
    let mut normalized = BTreeMap::new();
    for (path, load) in lazy {
        let key = page_key(&page_id(FileName::parse(&path).base), format);
        if normalized.contains_key(&key) {
            log!("warn"; "`{path}` shadowed by another file with the same id");
            continue;
        }
        normalized.insert(key, load);
    }
    normalized
}

impl Registry {
    /// All pages, sorted by id.
    pub fn pages(&self) -> &[PageDescriptor] {
        &self.pages
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Exact lookup by the composite key.
    pub fn find(&self, id: &str, format: Format) -> Option<&PageDescriptor> {
        self.pages.iter().find(|p| p.id == id && p.format == format)
    }

    /// Every page with `id`, one per format at most (in registry order).
    pub fn find_all<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a PageDescriptor> + 'a {
        self.pages.iter().filter(move |p| p.id == id)
    }

    /// Restore a persisted selection.
    ///
    /// Returns the first page with the stored id, or `None` when nothing was
    /// stored or the page no longer exists.
    pub fn select(&self, selected_id: Option<&str>) -> Option<&PageDescriptor> {
        let id = selected_id?;
        self.pages.iter().find(|p| p.id == id)
    }

    /// Lazily load the raw text of a page.
    ///
    /// Returns `""` when no loader is registered, the loader fails, or the
    /// format has no text content. Callers must treat `""` as unavailable.
    pub async fn get_content(&self, id: &str, format: Format) -> String {
        if format == Format::Component {
            log!("error"; "unsupported content format: {format}");
            return String::new();
        }

        let key = page_key(id, format);
        let Some(load) = self.loader(&key, format) else {
            log!("error"; "content not found: {key}");
            return String::new();
        };

        match load().await {
            Ok(Loaded::Text(text)) => text,
            Ok(Loaded::Module(_)) => {
                let err = SourceError::UnexpectedKind { path: key, expected: "text" };
                log!("error"; "failed to load content: {id}: {err}");
                String::new()
            }
            Err(err) => {
                log!("error"; "failed to load content: {id}: {err:#}");
                String::new()
            }
        }
    }

    /// Lazily load the component module of a page and return its default export.
    pub async fn get_component(&self, id: &str) -> Option<Component> {
        let key = page_key(id, Format::Component);
        let Some(load) = self.loader(&key, Format::Component) else {
            log!("error"; "module not found: {key}");
            return None;
        };

        match load().await {
            Ok(Loaded::Module(module)) => module.default,
            Ok(Loaded::Text(_)) => {
                let err = SourceError::UnexpectedKind { path: key, expected: "a module" };
                log!("error"; "failed to load component: {id}: {err}");
                None
            }
            Err(err) => {
                log!("error"; "failed to load component: {id}: {err:#}");
                None
            }
        }
    }

    fn loader(&self, key: &str, format: Format) -> Option<Loader> {
        self.loaders.get(&format)?.get(key).cloned()
    }
}

// ============================================================================
// Tests
// ============================================================================
