//! Errors raised while loading `pagedeck.toml`.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("invalid pagedeck.toml")]
    Toml(#[from] toml::de::Error),

    #[error("[content.dir] `{0}` not found")]
    MissingContentDir(PathBuf),

    #[error("[content.dir] `{0}` is not a directory")]
    ContentDirNotDir(PathBuf),

    #[error("[serve.interface] `{0}` is not an IP address")]
    Interface(String),
}
