//! Pagedeck - a lazily-loaded page registry for folders of mixed-format documents.

mod cli;
mod config;
mod logger;
mod page;
mod registry;
mod serve;
mod source;

use anyhow::{Result, bail};
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use page::{Format, PageDescriptor, parse_document};
use registry::{Registry, build_registry};
use serve::serve_registry;
use source::FsSource;
use std::io::{Write, stdout};
use tokio::runtime::Runtime;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(&cli)?;

    if config.config_path.exists() {
        log!("config"; "loaded {}", config.config_path.display());
    } else {
        log!("config"; "{} not found, using defaults", config.config_path.display());
    }

    let source = FsSource::new(&config.content.dir);
    log!("registry"; "scanning {}", source.root().display());
    let registry = build_registry(&source);
    if registry.is_empty() {
        log!("warn"; "no pages found in {}", source.root().display());
    } else {
        log!("registry"; "{} pages", registry.len());
    }

    match &cli.command {
        Commands::List { json, format } => {
            list_pages(&registry, *json, *format, &mut stdout().lock())
        }
        Commands::Show { id, format, raw } => {
            let runtime = Runtime::new()?;
            runtime.block_on(show_page(&registry, id, *format, *raw, &mut stdout().lock()))
        }
        Commands::Serve { .. } => {
            let runtime = Runtime::new()?;
            serve_registry(&registry, &config, &runtime)
        }
    }
}

/// Print the registry, optionally restricted to one format.
fn list_pages(
    registry: &Registry,
    json: bool,
    format: Option<Format>,
    out: &mut impl Write,
) -> Result<()> {
    let pages: Vec<&PageDescriptor> = registry
        .pages()
        .iter()
        .filter(|p| format.is_none_or(|f| p.format == f))
        .collect();

    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&pages)?)?;
        return Ok(());
    }

    for page in pages {
        match &page.description {
            Some(description) => writeln!(
                out,
                "{:<24} {:<8} {} - {}",
                page.id, page.extension, page.name, description
            )?,
            None => writeln!(out, "{:<24} {:<8} {}", page.id, page.extension, page.name)?,
        }
    }
    Ok(())
}

/// Load one page and print its content.
///
/// Without `--format` the id must identify a single page.
async fn show_page(
    registry: &Registry,
    id: &str,
    format: Option<Format>,
    raw: bool,
    out: &mut impl Write,
) -> Result<()> {
    let page = match format {
        Some(format) => registry.find(id, format),
        None => {
            if registry.find_all(id).nth(1).is_some() {
                bail!("`{id}` exists in several formats, pass --format");
            }
            registry.select(Some(id))
        }
    };
    let Some(page) = page else {
        bail!("page not found: {id}");
    };

    let text = match page.format {
        Format::Component => registry
            .get_component(&page.id)
            .await
            .map(|component| component.source.to_string())
            .unwrap_or_default(),
        format => registry.get_content(&page.id, format).await,
    };
    if text.is_empty() {
        bail!("content unavailable: {id}");
    }

    if raw {
        writeln!(out, "{text}")?;
    } else {
        writeln!(out, "{}", parse_document(&text, page.format).body)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemorySource;

    fn registry() -> Registry {
        build_registry(
            &MemorySource::new()
                .with_file("Intro.md", "<!-- Name: Welcome -->\nHello")
                .with_file("Intro.txt", "# Name: Plain intro\nHi")
                .with_file("Counter.tsx", "/* Name: Counter */\nexport default 1")
                .with_failing_file("Broken.svg", "gone"),
        )
    }

    #[tokio::test]
    async fn test_show_page_with_format() {
        let mut out = Vec::new();
        show_page(&registry(), "intro", Some(Format::PlainText), false, &mut out)
            .await
            .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Hi\n");
    }

    #[tokio::test]
    async fn test_show_page_ambiguous_id() {
        let err = show_page(&registry(), "intro", None, false, &mut Vec::new())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("--format"));
    }

    #[tokio::test]
    async fn test_show_component() {
        let mut out = Vec::new();
        show_page(&registry(), "counter", None, true, &mut out).await.unwrap();
        assert!(String::from_utf8(out).unwrap().starts_with("/* Name: Counter */"));
    }

    #[tokio::test]
    async fn test_show_missing_or_unavailable() {
        let registry = registry();
        let err = show_page(&registry, "nope", None, false, &mut Vec::new())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("page not found"));

        let err = show_page(&registry, "broken", None, false, &mut Vec::new())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("content unavailable"));
    }

    #[test]
    fn test_list_pages() {
        let mut out = Vec::new();
        list_pages(&registry(), false, None, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 4);
        assert!(text.lines().any(|l| l.starts_with("counter") && l.contains("Counter")));
    }

    #[test]
    fn test_list_pages_json_is_parseable() {
        let mut out = Vec::new();
        list_pages(&registry(), true, None, &mut out).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        let ids: Vec<_> = value
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, ["broken", "counter", "intro", "intro"]);
    }

    #[test]
    fn test_list_pages_json_filtered_by_format() {
        let mut out = Vec::new();
        list_pages(&registry(), true, Some(Format::Markdown), &mut out).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 1);
        assert_eq!(value[0]["name"], "Welcome");
    }
}
