use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use tracing::{debug, trace};

use crate::change::BulletStyle;
use crate::config::Format;
use crate::error::ChangelogError;
use crate::format::format_changelog;
use crate::links::{CompareLinkBuilder, TagLinkBuilder, TagNameBuilder};
use crate::release::{Release, ReleaseId};
use crate::sort::insertion_sort_by;
use crate::version::IntoVersion;

static NEXT_CHANGELOG_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a [`Changelog`], recorded on every release it owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChangelogId(u64);

pub struct Changelog {
    id: ChangelogId,
    next_release_id: u64,
    releases: Vec<Release>,
    pub title: String,
    pub description: String,
    /// Rendered as an HTML comment above the title.
    pub flag: Option<String>,
    pub head: String,
    /// Repository URL. Without it no links are generated.
    pub url: Option<String>,
    pub footer: Option<String>,
    pub format: Format,
    pub bullet_style: BulletStyle,
    pub auto_sort_releases: bool,
    tag_name_builder: Option<Box<dyn TagNameBuilder>>,
    tag_link_builder: Option<Box<dyn TagLinkBuilder>>,
    compare_link_builder: Option<Box<dyn CompareLinkBuilder>>,
}

impl Changelog {
    #[must_use]
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: ChangelogId(NEXT_CHANGELOG_ID.fetch_add(1, AtomicOrdering::Relaxed)),
            next_release_id: 0,
            releases: Vec::new(),
            title: title.into(),
            description: description.into(),
            flag: None,
            head: "HEAD".to_string(),
            url: None,
            footer: None,
            format: Format::default(),
            bullet_style: BulletStyle::default(),
            auto_sort_releases: true,
            tag_name_builder: None,
            tag_link_builder: None,
            compare_link_builder: None,
        }
    }

    #[must_use]
    pub fn id(&self) -> ChangelogId {
        self.id
    }

    #[must_use]
    pub fn releases(&self) -> &[Release] {
        &self.releases
    }

    #[must_use]
    pub fn release(&self, id: ReleaseId) -> Option<&Release> {
        self.releases.iter().find(|release| release.id() == Some(id))
    }

    pub fn add_release(&mut self, release: Release) -> &mut Self {
        self.insert_release(release);
        self
    }

    /// Like [`Changelog::add_release`] but hands back the new release's id.
    pub fn insert_release(&mut self, mut release: Release) -> ReleaseId {
        let id = ReleaseId(self.next_release_id);
        self.next_release_id += 1;

        release.attach(self.id, id);
        let version = release.version();
        debug!(
            version = version.as_deref().unwrap_or("Unreleased"),
            auto_sort = self.auto_sort_releases,
            "adding release"
        );
        self.releases.push(release);

        if self.auto_sort_releases {
            self.sort_releases();
        }

        id
    }

    /// The first release without a version, i.e. the "Unreleased" slot.
    #[must_use]
    pub fn find_unreleased(&self) -> Option<&Release> {
        self.releases
            .iter()
            .find(|release| release.parsed_version().is_none())
    }

    /// The first release whose version has the same precedence as `version`.
    ///
    /// # Errors
    ///
    /// Returns `ChangelogError::VersionParse` if `version` is a malformed string.
    pub fn find_release(
        &self,
        version: impl IntoVersion,
    ) -> Result<Option<&Release>, ChangelogError> {
        let version = version.into_version()?;

        Ok(self.releases.iter().find(|release| {
            release
                .parsed_version()
                .is_some_and(|candidate| candidate.cmp_precedence(&version).is_eq())
        }))
    }

    /// Mutates a contained release. With auto-sort enabled, a change to the
    /// release's version or date re-sorts the list.
    pub fn update_release<R>(
        &mut self,
        id: ReleaseId,
        update: impl FnOnce(&mut Release) -> R,
    ) -> Option<R> {
        let release = self
            .releases
            .iter_mut()
            .find(|release| release.id() == Some(id))?;

        let before = release.sort_key();
        let result = update(release);
        let moved = release.sort_key() != before;

        if moved && self.auto_sort_releases {
            self.sort_releases();
        }

        Some(result)
    }

    pub fn sort_releases(&mut self) {
        insertion_sort_by(&mut self.releases, Release::compare);
        trace!(count = self.releases.len(), "sorted releases");
    }

    pub fn set_tag_name_builder(&mut self, builder: impl TagNameBuilder + 'static) -> &mut Self {
        self.tag_name_builder = Some(Box::new(builder));
        self
    }

    pub fn set_tag_link_builder(&mut self, builder: impl TagLinkBuilder + 'static) -> &mut Self {
        self.tag_link_builder = Some(Box::new(builder));
        self
    }

    #[deprecated(note = "use `set_tag_link_builder` instead")]
    pub fn set_compare_link_builder(
        &mut self,
        builder: impl CompareLinkBuilder + 'static,
    ) -> &mut Self {
        self.compare_link_builder = Some(Box::new(builder));
        self
    }

    /// The link target for `release`, compared against `previous` when given.
    /// Returns `None` without a URL (unless the legacy compare-link builder is
    /// set) or when a builder produces an empty link.
    #[must_use]
    pub fn compare_link(&self, previous: Option<&Release>, release: &Release) -> Option<String> {
        let link = if let Some(builder) = &self.compare_link_builder {
            builder.compare_link(previous, release)
        } else {
            let url = self.url.as_deref()?;
            let unreleased = release.date().is_none() || release.parsed_version().is_none();

            let (tag, previous_tag) = match previous {
                None => (self.tag_name(release), None),
                Some(previous) if unreleased => (self.head.clone(), Some(self.tag_name(previous))),
                Some(previous) => (self.tag_name(release), Some(self.tag_name(previous))),
            };

            match (&self.tag_link_builder, previous_tag) {
                (Some(builder), previous_tag) => {
                    builder.tag_link(url, &tag, previous_tag.as_deref(), &self.head)
                }
                (None, None) => format!("{url}/releases/tag/{tag}"),
                (None, Some(previous_tag)) => format!("{url}/compare/{previous_tag}...{tag}"),
            }
        };

        (!link.is_empty()).then_some(link)
    }

    /// `v<version>` unless a tag-name builder is set. Releases without a
    /// version resolve to the head label.
    #[must_use]
    pub fn tag_name(&self, release: &Release) -> String {
        if let Some(builder) = &self.tag_name_builder {
            return builder.tag_name(release);
        }

        match release.version() {
            Some(version) => format!("v{version}"),
            None => self.head.clone(),
        }
    }

    /// Renders the whole document.
    #[must_use]
    pub fn render(&self) -> String {
        format_changelog(self)
    }

    pub(crate) fn position(&self, release: &Release) -> Option<usize> {
        if release.changelog_id() != Some(self.id) {
            return None;
        }
        self.releases
            .iter()
            .position(|candidate| candidate.is_same(release))
    }
}

impl fmt::Display for Changelog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl fmt::Debug for Changelog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Changelog")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("description", &self.description)
            .field("flag", &self.flag)
            .field("head", &self.head)
            .field("url", &self.url)
            .field("footer", &self.footer)
            .field("format", &self.format)
            .field("bullet_style", &self.bullet_style)
            .field("auto_sort_releases", &self.auto_sort_releases)
            .field("releases", &self.releases)
            .field("tag_name_builder", &self.tag_name_builder.is_some())
            .field("tag_link_builder", &self.tag_link_builder.is_some())
            .field("compare_link_builder", &self.compare_link_builder.is_some())
            .finish()
    }
}
