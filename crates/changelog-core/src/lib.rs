mod change;
mod changelog;
mod config;
mod error;
mod forge;
mod format;
mod links;
mod release;
mod sort;
mod version;

pub use change::{BulletStyle, Change, ChangeCategory};
pub use changelog::{Changelog, ChangelogId};
pub use config::{ChangelogConfig, Format, LinkStyle};
pub use error::ChangelogError;
pub use forge::Forge;
pub use format::{DEFAULT_DESCRIPTION, format_date};
pub use links::{
    CompareLinkBuilder, PrefixedTagName, TagLinkBuilder, TagNameBuilder, TemplateLinks,
};
pub use release::{Release, ReleaseId};
pub use version::{IntoDate, IntoVersion, parse_date, parse_version};

pub type Result<T> = std::result::Result<T, ChangelogError>;
