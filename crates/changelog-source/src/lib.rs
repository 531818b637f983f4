mod document;
mod error;
mod loader;

pub use document::{ChangeEntry, ReleaseEntry, SourceDocument, SourceFormat};
pub use error::SourceError;
pub use loader::{LoadOptions, build_changelog, load_path, parse_document};

pub type Result<T> = std::result::Result<T, SourceError>;
