use std::fmt;

use clap::ValueEnum;
use serde::Deserialize;

use crate::change::BulletStyle;
use crate::changelog::Changelog;
use crate::error::ChangelogError;
use crate::forge::Forge;
use crate::links::{PrefixedTagName, TemplateLinks};

/// Markdown dialect. `Markdownlint` adds a blank line after every heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Compact,
    #[serde(alias = "strict")]
    #[value(alias = "strict")]
    Markdownlint,
}

impl Format {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Compact => "compact",
            Self::Markdownlint => "markdownlint",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which built-in link builder a config installs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LinkStyle {
    /// GitHub-style `releases/tag` and `compare` URLs.
    #[default]
    Default,
    /// URL shapes of the forge detected from the changelog URL.
    Forge,
    /// `tag-link-template` and `compare-link-template`.
    Template,
}

impl LinkStyle {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Forge => "forge",
            Self::Template => "template",
        }
    }
}

impl fmt::Display for LinkStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rendering and link options, e.g. the `[config]` table of a changelog source.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ChangelogConfig {
    pub head: Option<String>,
    pub url: Option<String>,
    #[serde(default)]
    pub format: Format,
    #[serde(default)]
    pub bullet_style: BulletStyle,
    pub auto_sort_releases: Option<bool>,
    pub footer: Option<String>,
    pub flag: Option<String>,
    pub tag_prefix: Option<String>,
    #[serde(default)]
    pub links: LinkStyle,
    pub tag_link_template: Option<String>,
    pub compare_link_template: Option<String>,
}

impl ChangelogConfig {
    /// Copies the options onto `changelog` and installs the configured
    /// tag-name and tag-link builders.
    ///
    /// # Errors
    ///
    /// Returns `ChangelogError::UrlParse` if forge links are requested and the
    /// URL cannot be parsed.
    pub fn apply_to(&self, changelog: &mut Changelog) -> Result<(), ChangelogError> {
        if let Some(head) = &self.head {
            changelog.head.clone_from(head);
        }
        if self.url.is_some() {
            changelog.url.clone_from(&self.url);
        }
        if self.footer.is_some() {
            changelog.footer.clone_from(&self.footer);
        }
        if self.flag.is_some() {
            changelog.flag.clone_from(&self.flag);
        }
        if let Some(auto_sort) = self.auto_sort_releases {
            changelog.auto_sort_releases = auto_sort;
        }
        changelog.format = self.format;
        changelog.bullet_style = self.bullet_style;

        if let Some(prefix) = &self.tag_prefix {
            let builder = PrefixedTagName::new(prefix.clone()).with_head(changelog.head.clone());
            changelog.set_tag_name_builder(builder);
        }

        match self.links {
            LinkStyle::Default => {}
            LinkStyle::Forge => {
                if let Some(url) = &changelog.url {
                    let forge = Forge::detect(url)?;
                    changelog.set_tag_link_builder(forge);
                }
            }
            LinkStyle::Template => {
                let links = TemplateLinks::new(
                    self.tag_link_template
                        .as_deref()
                        .unwrap_or(TemplateLinks::DEFAULT_TAG_TEMPLATE),
                    self.compare_link_template
                        .as_deref()
                        .unwrap_or(TemplateLinks::DEFAULT_COMPARE_TEMPLATE),
                );
                changelog.set_tag_link_builder(links);
            }
        }

        Ok(())
    }
}
