//! In-memory content source for tests.
//!
//! Holds a fixed set of files keyed by `./{file name}`. Component files
//! load as modules whose default export carries the file text. Individual
//! entries can be marked as failing so that fetch errors can be reproduced.

use super::{Component, ContentSource, Loaded, Loader, Module, loader};
use crate::page::{FileName, Format};
use anyhow::anyhow;
use std::{collections::BTreeMap, sync::Arc};

#[derive(Debug, Clone)]
enum Entry {
    Ready(Arc<str>),
    Failing(String),
}

/// Content source over a fixed set of in-memory files.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: BTreeMap<String, Entry>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file. `name` may be given with or without the `./` prefix.
    pub fn with_file(mut self, name: &str, content: &str) -> Self {
        self.files.insert(key(name), Entry::Ready(content.into()));
        self
    }

    /// Add a file that lists normally but whose lazy loader fails.
    ///
    /// The eager text is empty.
    pub fn with_failing_file(mut self, name: &str, reason: &str) -> Self {
        self.files.insert(key(name), Entry::Failing(reason.to_owned()));
        self
    }

    fn entries(&self, extension: &str) -> impl Iterator<Item = (&String, &Entry)> {
        self.files
            .iter()
            .filter(move |(path, _)| FileName::parse(path).extension == extension)
    }
}

impl ContentSource for MemorySource {
    fn list_eager(&self, extension: &str) -> BTreeMap<String, String> {
        self.entries(extension)
            .map(|(path, entry)| {
                let text = match entry {
                    Entry::Ready(text) => text.to_string(),
                    Entry::Failing(_) => String::new(),
                };
                (path.clone(), text)
            })
            .collect()
    }

    fn list_lazy(&self, extension: &str) -> BTreeMap<String, Loader> {
        let is_component = Format::from_extension(extension) == Format::Component;
        self.entries(extension)
            .map(|(path, entry)| {
                let entry = entry.clone();
                let name = FileName::parse(path).base.to_owned();
                let load = loader(move || {
                    let entry = entry.clone();
                    let name = name.clone();
                    async move {
                        match entry {
                            Entry::Failing(reason) => Err(anyhow!(reason)),
                            Entry::Ready(source) if is_component => Ok(Loaded::Module(Module {
                                default: Some(Component { name, source }),
                            })),
                            Entry::Ready(text) => Ok(Loaded::Text(text.to_string())),
                        }
                    }
                });
                (path.clone(), load)
            })
            .collect()
    }
}

fn key(name: &str) -> String {
    if name.starts_with("./") {
        name.to_owned()
    } else {
        format!("./{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_prefixed() {
        let source = MemorySource::new()
            .with_file("A.md", "a")
            .with_file("./B.md", "b");
        let eager = source.list_eager("md");
        assert_eq!(eager.keys().collect::<Vec<_>>(), ["./A.md", "./B.md"]);
    }

    #[tokio::test]
    async fn test_failing_entry() {
        let source = MemorySource::new().with_failing_file("Broken.md", "disk on fire");
        assert_eq!(source.list_eager("md")["./Broken.md"], "");

        let err = source.list_lazy("md")["./Broken.md"]().await.unwrap_err();
        assert_eq!(err.to_string(), "disk on fire");
    }
}
