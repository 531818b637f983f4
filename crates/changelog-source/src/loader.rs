use std::path::Path;

use changelog_core::{BulletStyle, Changelog, ChangelogConfig, ChangelogError, Format, Release};
use tracing::debug;

use crate::document::{ReleaseEntry, SourceDocument, SourceFormat};
use crate::error::SourceError;

/// Loader behaviour plus options that take precedence over the source's
/// `[config]` table.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Drop releases with no description and no changes.
    pub omit_empty: bool,
    pub url: Option<String>,
    pub head: Option<String>,
    pub format: Option<Format>,
    pub bullet_style: Option<BulletStyle>,
}

impl LoadOptions {
    fn override_config(&self, config: &mut ChangelogConfig) {
        if self.url.is_some() {
            config.url.clone_from(&self.url);
        }
        if self.head.is_some() {
            config.head.clone_from(&self.head);
        }
        if let Some(format) = self.format {
            config.format = format;
        }
        if let Some(bullet_style) = self.bullet_style {
            config.bullet_style = bullet_style;
        }
    }
}

/// # Errors
///
/// Returns `SourceError::Toml` or `SourceError::Json` if the content does not
/// describe a changelog.
pub fn parse_document(content: &str, format: SourceFormat) -> Result<SourceDocument, SourceError> {
    let document = match format {
        SourceFormat::Toml => toml::from_str(content)?,
        SourceFormat::Json => serde_json::from_str(content)?,
    };
    Ok(document)
}

/// Reads a `.toml` or `.json` source file and builds the changelog it describes.
///
/// # Errors
///
/// Returns `SourceError::Read` if the file cannot be read, a parse error for
/// malformed content, or `SourceError::Changelog` for invalid release data.
pub fn load_path(path: &Path, options: LoadOptions) -> Result<Changelog, SourceError> {
    let format = SourceFormat::from_path(path)?;
    let content = std::fs::read_to_string(path).map_err(|source| SourceError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(path = %path.display(), ?format, "loading changelog source");

    let document = parse_document(&content, format)?;
    build_changelog(document, options)
}

/// Entries sharing a version, or several entries without one, are merged into
/// the release created by the first of them.
///
/// # Errors
///
/// Returns `SourceError::Changelog` if a version or date is malformed, or the
/// config requests forge links for an unparseable URL.
pub fn build_changelog(
    document: SourceDocument,
    options: LoadOptions,
) -> Result<Changelog, SourceError> {
    let mut config = document.config;
    options.override_config(&mut config);

    let mut changelog = Changelog::new(document.title, document.description);
    config.apply_to(&mut changelog)?;

    for entry in document.releases {
        let release = new_release(&entry)?;

        let version = release.version();
        let label = version.as_deref().unwrap_or("Unreleased");

        if options.omit_empty && release.is_empty() {
            debug!(version = label, "skipping empty release");
            continue;
        }

        let existing = match release.parsed_version() {
            Some(version) => changelog.find_release(version)?,
            None => changelog.find_unreleased(),
        }
        .and_then(Release::id);

        match existing {
            Some(id) => {
                debug!(version = label, "merging duplicate release entry");
                changelog
                    .update_release(id, |target| merge_into(target, release))
                    .transpose()?;
            }
            None => {
                changelog.add_release(release);
            }
        }
    }

    Ok(changelog)
}

fn new_release(entry: &ReleaseEntry) -> Result<Release, SourceError> {
    let mut release = match &entry.version {
        Some(version) => Release::undated(version)?,
        None => Release::unreleased(),
    };

    if let Some(date) = &entry.date {
        release.set_date(date)?;
    }

    release
        .set_description(entry.description.clone())
        .set_yanked(entry.yanked)
        .combine_changes(entry.changes());

    Ok(release)
}

fn merge_into(target: &mut Release, source: Release) -> Result<(), ChangelogError> {
    if let (None, Some(date)) = (target.date(), source.date()) {
        target.set_date(date)?;
    }
    if target.description().trim().is_empty() {
        target.set_description(source.description());
    }
    if source.is_yanked() {
        target.set_yanked(true);
    }
    target.combine_changes(source.changes().clone());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(toml: &str) -> Changelog {
        let document = parse_document(toml, SourceFormat::Toml).expect("should parse");
        build_changelog(document, LoadOptions::default()).expect("should build")
    }

    #[test]
    fn builds_sorted_releases() {
        let changelog = build(
            r#"
            [[release]]
            version = "1.0.0"
            date = "2023-01-01"

            [[release]]
            version = "1.1.0"
            date = "2023-02-01"

            [[release]]
            changes = { added = ["Next thing"] }
            "#,
        );

        let versions: Vec<Option<String>> =
            changelog.releases().iter().map(Release::version).collect();
        assert_eq!(
            versions,
            [None, Some("1.1.0".to_string()), Some("1.0.0".to_string())]
        );
    }

    #[test]
    fn merges_duplicate_unreleased_entries() {
        let changelog = build(
            r#"
            [[release]]
            changes = { added = ["First"] }

            [[release]]
            description = "Upcoming"
            changes = { added = ["Second"], performance = ["Faster"] }
            "#,
        );

        assert_eq!(changelog.releases().len(), 1);
        let release = &changelog.releases()[0];
        assert_eq!(release.description(), "Upcoming");
        assert_eq!(release.changes()["added"].len(), 2);
        assert_eq!(release.changes()["performance"].len(), 1);
    }

    #[test]
    fn merges_same_version_and_fills_date() {
        let changelog = build(
            r#"
            [[release]]
            version = "2.0.0"
            changes = { removed = ["Old API"] }

            [[release]]
            version = "2.0.0"
            date = "2024-04-01"
            yanked = true
            changes = { fixed = ["Crash"] }
            "#,
        );

        assert_eq!(changelog.releases().len(), 1);
        let release = &changelog.releases()[0];
        assert_eq!(changelog_core::format_date(release.date()), "2024-04-01");
        assert!(release.is_yanked());
        assert_eq!(release.changes()["removed"].len(), 1);
        assert_eq!(release.changes()["fixed"].len(), 1);
    }

    #[test]
    fn omit_empty_drops_blank_releases() {
        let document = parse_document(
            r#"
            [[release]]

            [[release]]
            version = "1.0.0"
            date = "2023-01-01"
            changes = { added = ["Initial release"] }
            "#,
            SourceFormat::Toml,
        )
        .expect("should parse");

        let kept = build_changelog(document.clone(), LoadOptions::default()).expect("build");
        assert_eq!(kept.releases().len(), 2);

        let options = LoadOptions {
            omit_empty: true,
            ..LoadOptions::default()
        };
        let trimmed = build_changelog(document, options).expect("build");
        assert_eq!(trimmed.releases().len(), 1);
        assert!(trimmed.find_unreleased().is_none());
    }

    #[test]
    fn applies_config_table() {
        let changelog = build(
            r#"
            title = "MyLib"

            [config]
            url = "https://example.com/MyLib"
            head = "main"
            "#,
        );

        assert_eq!(changelog.title, "MyLib");
        assert_eq!(changelog.url.as_deref(), Some("https://example.com/MyLib"));
        assert_eq!(changelog.head, "main");
    }

    #[test]
    fn overrides_take_precedence_over_config_table() {
        let document = parse_document(
            r#"
            [config]
            url = "https://github.com/owner/repo"
            head = "main"
            links = "forge"

            [[release]]
            version = "1.0.0"
            date = "2023-01-01"
            changes = { added = ["Initial release"] }
            "#,
            SourceFormat::Toml,
        )
        .expect("should parse");
        let options = LoadOptions {
            url: Some("https://gitlab.com/owner/repo".to_string()),
            head: Some("trunk".to_string()),
            format: Some(Format::Markdownlint),
            ..LoadOptions::default()
        };

        let changelog = build_changelog(document, options).expect("should build");

        assert_eq!(changelog.url.as_deref(), Some("https://gitlab.com/owner/repo"));
        assert_eq!(changelog.head, "trunk");
        assert_eq!(changelog.format, Format::Markdownlint);
        assert!(
            changelog
                .to_string()
                .contains("[1.0.0]: https://gitlab.com/owner/repo/-/tags/v1.0.0")
        );
    }

    #[test]
    fn malformed_version_is_reported() {
        let document = parse_document(
            r#"
            [[release]]
            version = "one"
            "#,
            SourceFormat::Toml,
        )
        .expect("should parse");

        let result = build_changelog(document, LoadOptions::default());
        assert!(matches!(result, Err(SourceError::Changelog(_))));
    }

    #[test]
    fn parses_json_documents() {
        let json = r#"{
            "title": "MyLib",
            "release": [
                { "version": "1.0.0", "date": "2023-01-01", "changes": { "added": ["Initial release"] } }
            ]
        }"#;

        let document = parse_document(json, SourceFormat::Json).expect("should parse");
        let changelog = build_changelog(document, LoadOptions::default()).expect("should build");
        assert_eq!(changelog.releases().len(), 1);
        assert_eq!(changelog.releases()[0].changes()["added"][0].text(), "Initial release");
    }
}
