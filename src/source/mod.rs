//! Content source abstraction.
//!
//! A source answers one question per file extension, in two modes:
//!
//! - **eager**: `path → raw text`, available synchronously at start-up and
//!   used only to build page descriptors.
//! - **lazy**: `path → loader`, where invoking the loader returns a future
//!   resolving to the file's text or to an executable [`Module`].
//!
//! Paths are always of the form `./{file name}`. The registry never writes
//! through a source.

mod fs;
#[cfg(test)]
mod memory;

pub use fs::FsSource;
#[cfg(test)]
pub use memory::MemorySource;

use std::{collections::BTreeMap, future::Future, path::PathBuf, pin::Pin, sync::Arc};
use thiserror::Error;

/// Boxed, sendable future returned by loaders.
pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

/// Zero-argument lazy loader. Every call starts a fresh fetch.
pub type Loader = Arc<dyn Fn() -> BoxFuture<anyhow::Result<Loaded>> + Send + Sync>;

/// Result of invoking a [`Loader`].
#[derive(Debug, Clone)]
pub enum Loaded {
    /// Raw file text.
    Text(String),
    /// Executable unit (component formats).
    Module(Module),
}

/// A loaded component module.
#[derive(Debug, Clone, Default)]
pub struct Module {
    /// Primary export, if the module has one.
    pub default: Option<Component>,
}

/// Mountable unit handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    /// Base name of the module file.
    pub name: String,
    /// Module source; what a bundler would mount.
    pub source: Arc<str>,
}

/// Errors raised by loaders.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("`{path}` did not load as {expected}")]
    UnexpectedKind { path: String, expected: &'static str },
}

/// Bimodal listing of content files by extension.
pub trait ContentSource {
    /// `path → raw text` for every file with `extension`.
    fn list_eager(&self, extension: &str) -> BTreeMap<String, String>;

    /// `path → loader` for every file with `extension`.
    fn list_lazy(&self, extension: &str) -> BTreeMap<String, Loader>;
}

/// Wrap an async block into a [`Loader`].
pub fn loader<F, Fut>(f: F) -> Loader
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<Loaded>> + Send + 'static,
{
    Arc::new(move || Box::pin(f()) as BoxFuture<_>)
}
