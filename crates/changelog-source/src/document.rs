use std::path::Path;

use changelog_core::{Change, ChangelogConfig};
use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::SourceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Toml,
    Json,
}

impl SourceFormat {
    /// # Errors
    ///
    /// Returns `SourceError::UnsupportedFormat` for anything but `.toml` and `.json`.
    pub fn from_path(path: &Path) -> Result<Self, SourceError> {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("toml") => Ok(Self::Toml),
            Some("json") => Ok(Self::Json),
            _ => Err(SourceError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// A changelog described as data: title, options and releases in any order.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct SourceDocument {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub config: ChangelogConfig,
    #[serde(default, rename = "release", alias = "releases")]
    pub releases: Vec<ReleaseEntry>,
}

fn default_title() -> String {
    "Changelog".to_string()
}

/// One release table. Omitting `version` describes the unreleased section;
/// dates are `YYYY-MM-DD` strings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ReleaseEntry {
    pub version: Option<String>,
    pub date: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub yanked: bool,
    #[serde(default)]
    pub changes: IndexMap<String, Vec<ChangeEntry>>,
}

impl ReleaseEntry {
    /// Category keys are case-insensitive; entries under `Added` and `added`
    /// end up in one list.
    pub(crate) fn changes(&self) -> IndexMap<String, Vec<Change>> {
        let mut changes: IndexMap<String, Vec<Change>> = IndexMap::new();
        for (category, entries) in &self.changes {
            changes
                .entry(category.to_ascii_lowercase())
                .or_default()
                .extend(entries.iter().map(ChangeEntry::to_change));
        }
        changes
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ChangeEntry {
    Text(String),
    Detailed {
        text: String,
        #[serde(default)]
        issues: Vec<String>,
    },
}

impl ChangeEntry {
    fn to_change(&self) -> Change {
        match self {
            Self::Text(text) => Change::new(text.as_str()),
            Self::Detailed { text, issues } => issues
                .iter()
                .fold(Change::new(text.as_str()), |change, issue| change.with_issue(issue)),
        }
    }
}
