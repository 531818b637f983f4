use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to load changelog source")]
    Source(#[from] changelog_source::SourceError),

    #[error("invalid changelog input")]
    Changelog(#[from] changelog_core::ChangelogError),

    #[error("failed to write changelog to '{path}'")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no release '{version}' in changelog")]
    ReleaseNotFound { version: String },
}

pub type Result<T> = std::result::Result<T, CliError>;
