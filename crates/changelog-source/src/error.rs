use std::path::PathBuf;

use changelog_core::ChangelogError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read changelog source at '{path}'")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported changelog source '{path}': expected a .toml or .json file")]
    UnsupportedFormat { path: PathBuf },

    #[error("failed to parse TOML changelog source")]
    Toml(#[from] toml::de::Error),

    #[error("failed to parse JSON changelog source")]
    Json(#[from] serde_json::Error),

    #[error("invalid release data")]
    Changelog(#[from] ChangelogError),
}
