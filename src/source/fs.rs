//! Flat directory content source.
//!
//! Lists files directly inside one directory (no recursion). Eager reads go
//! through `std::fs`; lazy loaders read with `tokio::fs` on every invocation.

use super::{Component, ContentSource, Loaded, Loader, Module, SourceError, loader};
use crate::log;
use crate::page::{FileName, Format};
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};
use walkdir::WalkDir;

/// Files to ignore during directory traversal
const IGNORED_FILES: &[&str] = &[".DS_Store"];

/// Content source backed by a single directory on disk.
#[derive(Debug, Clone)]
pub struct FsSource {
    root: PathBuf,
}

impl FsSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `(./name, absolute path)` for each file with `extension`.
    fn files(&self, extension: &str) -> Vec<(String, PathBuf)> {
        WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
            .filter_map(|e| {
                let name = e.file_name().to_str()?.to_owned();
                let matches = !IGNORED_FILES.contains(&name.as_str())
                    && FileName::parse(&name).extension == extension;
                matches.then(|| (format!("./{name}"), e.into_path()))
            })
            .collect()
    }
}

impl ContentSource for FsSource {
    fn list_eager(&self, extension: &str) -> BTreeMap<String, String> {
        self.files(extension)
            .into_iter()
            .filter_map(|(key, path)| match fs::read_to_string(&path) {
                Ok(text) => Some((key, text)),
                Err(err) => {
                    log!("warn"; "skipping `{}`: {err}", path.display());
                    None
                }
            })
            .collect()
    }

    fn list_lazy(&self, extension: &str) -> BTreeMap<String, Loader> {
        let is_component = Format::from_extension(extension) == Format::Component;
        self.files(extension)
            .into_iter()
            .map(|(key, path)| {
                let path = Arc::new(path);
                let load = if is_component {
                    loader(move || read_module(Arc::clone(&path)))
                } else {
                    loader(move || read_text(Arc::clone(&path)))
                };
                (key, load)
            })
            .collect()
    }
}

async fn read(path: &Path) -> anyhow::Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|err| SourceError::Io(path.to_path_buf(), err).into())
}

async fn read_text(path: Arc<PathBuf>) -> anyhow::Result<Loaded> {
    read(&path).await.map(Loaded::Text)
}

async fn read_module(path: Arc<PathBuf>) -> anyhow::Result<Loaded> {
    let source = read(&path).await?;
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(Loaded::Module(Module {
        default: Some(Component {
            name,
            source: source.into(),
        }),
    }))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn test_list_eager_filters_by_extension() {
        let dir = tempdir().unwrap();
        write(dir.path(), "Intro.md", "hello");
        write(dir.path(), "Notes.txt", "notes");
        write(dir.path(), "Other.md", "other");

        let eager = FsSource::new(dir.path()).list_eager("md");
        let keys: Vec<_> = eager.keys().cloned().collect();
        assert_eq!(keys, ["./Intro.md", "./Other.md"]);
        assert_eq!(eager["./Intro.md"], "hello");
    }

    #[test]
    fn test_list_is_not_recursive() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        write(&dir.path().join("nested"), "Deep.md", "deep");
        write(dir.path(), "Top.md", "top");
        write(dir.path(), ".DS_Store", "");

        let eager = FsSource::new(dir.path()).list_eager("md");
        assert_eq!(eager.len(), 1);
        assert!(eager.contains_key("./Top.md"));
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let dir = tempdir().unwrap();
        let source = FsSource::new(dir.path().join("missing"));
        assert!(source.list_eager("md").is_empty());
        assert!(source.list_lazy("md").is_empty());
    }

    #[tokio::test]
    async fn test_lazy_text_reads_on_every_call() {
        let dir = tempdir().unwrap();
        write(dir.path(), "Page.md", "first");

        let lazy = FsSource::new(dir.path()).list_lazy("md");
        let load = &lazy["./Page.md"];

        let Loaded::Text(text) = load().await.unwrap() else {
            panic!("expected text");
        };
        assert_eq!(text, "first");

        write(dir.path(), "Page.md", "second");
        let Loaded::Text(text) = load().await.unwrap() else {
            panic!("expected text");
        };
        assert_eq!(text, "second");
    }

    #[tokio::test]
    async fn test_lazy_component_is_module() {
        let dir = tempdir().unwrap();
        write(dir.path(), "Counter.tsx", "export default function Counter() {}");

        let lazy = FsSource::new(dir.path()).list_lazy("tsx");
        let Loaded::Module(module) = lazy["./Counter.tsx"]().await.unwrap() else {
            panic!("expected module");
        };
        let component = module.default.unwrap();
        assert_eq!(component.name, "Counter");
        assert!(component.source.contains("function Counter"));
    }

    #[tokio::test]
    async fn test_lazy_loader_reports_deleted_file() {
        let dir = tempdir().unwrap();
        write(dir.path(), "Gone.txt", "soon gone");

        let lazy = FsSource::new(dir.path()).list_lazy("txt");
        fs::remove_file(dir.path().join("Gone.txt")).unwrap();

        let err = lazy["./Gone.txt"]().await.unwrap_err();
        assert!(err.to_string().contains("Gone.txt"));
    }
}
