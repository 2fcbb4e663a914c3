//! Command-line interface definitions.
//!
//! Defines all CLI arguments and subcommands using clap.

use crate::page::Format;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Pagedeck: browse a folder of mixed-format pages
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Project root directory
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Content directory path (relative to project root)
    #[arg(short, long)]
    pub content: Option<PathBuf>,

    /// Config file name (default: pagedeck.toml)
    #[arg(short = 'C', long, default_value = "pagedeck.toml")]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// List every page in the registry, sorted by id
    List {
        /// Print the registry as JSON
        #[arg(long)]
        json: bool,

        /// Only list pages of this format (tsx, md, svg, mermaid, txt)
        #[arg(short, long, value_parser = parse_format)]
        format: Option<Format>,
    },

    /// Load a page and print its content without the metadata block
    Show {
        /// Page id
        id: String,

        /// Page format, required when several formats share the id
        #[arg(short, long, value_parser = parse_format)]
        format: Option<Format>,

        /// Keep the metadata block
        #[arg(long)]
        raw: bool,
    },

    /// Serve the registry over a read-only HTTP API
    Serve {
        /// Interface to bind on
        #[arg(short, long)]
        interface: Option<String>,

        /// The port you should provide
        #[arg(short, long)]
        port: Option<u16>,
    },
}

fn parse_format(s: &str) -> Result<Format, String> {
    Format::parse(s).ok_or_else(|| format!("unknown format `{s}` (expected tsx, md, svg, mermaid or txt)"))
}
