use std::cmp::Ordering;
use std::fmt;

use chrono::NaiveDate;
use indexmap::IndexMap;
use semver::Version;

use crate::change::{Change, ChangeCategory};
use crate::changelog::{Changelog, ChangelogId};
use crate::error::ChangelogError;
use crate::format::format_release;
use crate::version::{IntoDate, IntoVersion};

/// Identifies a release within its owning [`Changelog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReleaseId(pub(crate) u64);

/// One changelog section. A release without a version is the "Unreleased"
/// slot; a release without a date has not shipped yet.
#[derive(Debug)]
pub struct Release {
    id: Option<ReleaseId>,
    changelog: Option<ChangelogId>,
    version: Option<Version>,
    date: Option<NaiveDate>,
    yanked: bool,
    description: String,
    changes: IndexMap<String, Vec<Change>>,
}

impl Default for Release {
    fn default() -> Self {
        Self::unreleased()
    }
}

impl Release {
    #[must_use]
    pub fn unreleased() -> Self {
        Self {
            id: None,
            changelog: None,
            version: None,
            date: None,
            yanked: false,
            description: String::new(),
            changes: ChangeCategory::ALL
                .iter()
                .map(|category| (category.as_str().to_string(), Vec::new()))
                .collect(),
        }
    }

    /// # Errors
    ///
    /// Returns `ChangelogError::VersionParse` or `ChangelogError::DateParse`
    /// if either string form is malformed.
    pub fn new(version: impl IntoVersion, date: impl IntoDate) -> Result<Self, ChangelogError> {
        let mut release = Self::undated(version)?;
        release.date = Some(date.into_date()?);
        Ok(release)
    }

    /// # Errors
    ///
    /// Returns `ChangelogError::VersionParse` if the version string is malformed.
    pub fn undated(version: impl IntoVersion) -> Result<Self, ChangelogError> {
        let mut release = Self::unreleased();
        release.version = Some(version.into_version()?);
        Ok(release)
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_yanked(mut self, yanked: bool) -> Self {
        self.yanked = yanked;
        self
    }

    /// Assigned when the release is added to a changelog.
    #[must_use]
    pub fn id(&self) -> Option<ReleaseId> {
        self.id
    }

    /// The changelog this release belongs to, if any.
    #[must_use]
    pub fn changelog_id(&self) -> Option<ChangelogId> {
        self.changelog
    }

    #[must_use]
    pub fn version(&self) -> Option<String> {
        self.version.as_ref().map(ToString::to_string)
    }

    #[must_use]
    pub fn parsed_version(&self) -> Option<&Version> {
        self.version.as_ref()
    }

    #[must_use]
    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    #[must_use]
    pub fn is_yanked(&self) -> bool {
        self.yanked
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn changes(&self) -> &IndexMap<String, Vec<Change>> {
        &self.changes
    }

    /// When the release is inside a changelog, prefer
    /// [`Changelog::update_release`] so the release list is re-sorted.
    ///
    /// # Errors
    ///
    /// Returns `ChangelogError::VersionParse` if the version string is malformed.
    pub fn set_version(&mut self, version: impl IntoVersion) -> Result<&mut Self, ChangelogError> {
        self.version = Some(version.into_version()?);
        Ok(self)
    }

    pub fn clear_version(&mut self) -> &mut Self {
        self.version = None;
        self
    }

    /// # Errors
    ///
    /// Returns `ChangelogError::DateParse` if the date string is malformed.
    pub fn set_date(&mut self, date: impl IntoDate) -> Result<&mut Self, ChangelogError> {
        self.date = Some(date.into_date()?);
        Ok(self)
    }

    pub fn clear_date(&mut self) -> &mut Self {
        self.date = None;
        self
    }

    pub fn set_yanked(&mut self, yanked: bool) -> &mut Self {
        self.yanked = yanked;
        self
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = description.into();
        self
    }

    /// Ordering used to sort a changelog: the unversioned release first, then
    /// undated releases, then versions newest first.
    ///
    /// This is not a total order: two unversioned releases, or two undated
    /// versioned ones, both report `Greater` against each other.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Ordering {
        match (&self.version, &other.version) {
            (None, Some(_)) => return Ordering::Less,
            (_, None) => return Ordering::Greater,
            _ => {}
        }

        match (self.date, other.date) {
            (None, Some(_)) => return Ordering::Less,
            (_, None) => return Ordering::Greater,
            _ => {}
        }

        match (&self.version, &other.version) {
            (Some(ours), Some(theirs)) => ours.cmp_precedence(theirs).reverse(),
            _ => Ordering::Equal,
        }
    }

    /// Appends `change` to an existing category.
    ///
    /// # Errors
    ///
    /// Returns `ChangelogError::InvalidCategory` if the category is not present
    /// in this release. Use [`Release::combine_changes`] to introduce new ones.
    pub fn add_change(
        &mut self,
        category: impl AsRef<str>,
        change: impl Into<Change>,
    ) -> Result<&mut Self, ChangelogError> {
        self.category_mut(category.as_ref())?.push(change.into());
        Ok(self)
    }

    pub fn added(&mut self, change: impl Into<Change>) -> &mut Self {
        self.push_conventional(ChangeCategory::Added, change.into())
    }

    pub fn changed(&mut self, change: impl Into<Change>) -> &mut Self {
        self.push_conventional(ChangeCategory::Changed, change.into())
    }

    pub fn deprecated(&mut self, change: impl Into<Change>) -> &mut Self {
        self.push_conventional(ChangeCategory::Deprecated, change.into())
    }

    pub fn removed(&mut self, change: impl Into<Change>) -> &mut Self {
        self.push_conventional(ChangeCategory::Removed, change.into())
    }

    pub fn fixed(&mut self, change: impl Into<Change>) -> &mut Self {
        self.push_conventional(ChangeCategory::Fixed, change.into())
    }

    pub fn security(&mut self, change: impl Into<Change>) -> &mut Self {
        self.push_conventional(ChangeCategory::Security, change.into())
    }

    /// Appends every category of `changes`, creating categories this release
    /// does not have yet.
    pub fn combine_changes<I>(&mut self, changes: I) -> &mut Self
    where
        I: IntoIterator<Item = (String, Vec<Change>)>,
    {
        for (category, entries) in changes {
            self.category_or_insert(category).extend(entries);
        }
        self
    }

    /// True when the description is blank and no category holds a change.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.description.trim().is_empty() && self.changes.values().all(Vec::is_empty)
    }

    /// The reference-style definition linking this release's heading, e.g.
    /// `[1.1.0]: https://github.com/owner/repo/compare/v1.0.0...v1.1.0`.
    #[must_use]
    pub fn compare_link(&self, changelog: &Changelog) -> Option<String> {
        if changelog.url.is_none() {
            return None;
        }

        let index = changelog.position(self)?;
        let previous = changelog.releases()[index + 1..]
            .iter()
            .find(|release| release.date.is_some());

        if previous.is_none() && (self.version.is_none() || self.date.is_none()) {
            return None;
        }

        let link = changelog.compare_link(previous, self)?;
        let label = self.version().unwrap_or_else(|| "Unreleased".to_string());

        Some(format!("[{label}]: {link}"))
    }

    /// Issue reference definitions for every change, first occurrence wins.
    #[must_use]
    pub fn links(&self, changelog: &Changelog) -> Vec<String> {
        let Some(url) = changelog.url.as_deref() else {
            return Vec::new();
        };

        let mut links: Vec<String> = Vec::new();
        for change in self.changes.values().flatten() {
            for issue in change.issues() {
                let link = format!("[#{issue}]: {url}/issues/{issue}");
                if !links.contains(&link) {
                    links.push(link);
                }
            }
        }

        links
    }

    /// Renders the release section. Without a changelog no compare link can
    /// exist, so the heading is unbracketed and compact defaults apply.
    #[must_use]
    pub fn render(&self, changelog: Option<&Changelog>) -> String {
        format_release(self, changelog)
    }

    pub(crate) fn attach(&mut self, changelog: ChangelogId, id: ReleaseId) {
        self.changelog = Some(changelog);
        self.id = Some(id);
    }

    pub(crate) fn is_same(&self, other: &Self) -> bool {
        self.id.is_some() && self.id == other.id && self.changelog == other.changelog
    }

    pub(crate) fn sort_key(&self) -> (Option<Version>, Option<NaiveDate>) {
        (self.version.clone(), self.date)
    }

    fn category_mut(&mut self, category: &str) -> Result<&mut Vec<Change>, ChangelogError> {
        self.changes
            .get_mut(category)
            .ok_or_else(|| ChangelogError::InvalidCategory {
                category: category.to_string(),
            })
    }

    fn category_or_insert(&mut self, category: String) -> &mut Vec<Change> {
        self.changes.entry(category).or_default()
    }

    fn push_conventional(&mut self, category: ChangeCategory, change: Change) -> &mut Self {
        self.category_or_insert(category.as_str().to_string())
            .push(change);
        self
    }
}

impl fmt::Display for Release {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dated(version: &str, date: &str) -> Release {
        Release::new(version, date).expect("valid release")
    }

    #[test]
    fn new_release_seeds_conventional_categories() {
        let release = Release::unreleased();
        let categories: Vec<&str> = release.changes().keys().map(String::as_str).collect();

        assert_eq!(
            categories,
            ["added", "changed", "deprecated", "removed", "fixed", "security"]
        );
        assert!(release.version().is_none());
        assert!(release.date().is_none());
        assert!(!release.is_yanked());
        assert!(release.id().is_none());
        assert!(release.changelog_id().is_none());
    }

    #[test]
    fn version_is_canonical_string() {
        let release = Release::undated("1.2.3").expect("valid version");
        assert_eq!(release.version().as_deref(), Some("1.2.3"));
    }

    #[test]
    fn malformed_version_propagates() {
        let result = Release::undated("1.2");
        assert!(matches!(result, Err(ChangelogError::VersionParse { .. })));
    }

    #[test]
    fn malformed_date_propagates() {
        let result = Release::new("1.2.0", "01/02/2023");
        assert!(matches!(result, Err(ChangelogError::DateParse { .. })));
    }

    #[test]
    fn newer_version_sorts_first() {
        let newer = dated("2.0.0", "2023-02-01");
        let older = dated("1.0.0", "2023-01-01");

        assert_eq!(newer.compare(&older), Ordering::Less);
        assert_eq!(older.compare(&newer), Ordering::Greater);
    }

    #[test]
    fn unversioned_sorts_before_versioned_regardless_of_date() {
        let mut unreleased = Release::unreleased();
        unreleased.set_date("2020-01-01").expect("valid date");
        let versioned = dated("1.0.0", "2023-01-01");

        assert_eq!(unreleased.compare(&versioned), Ordering::Less);
        assert_eq!(versioned.compare(&unreleased), Ordering::Greater);
    }

    #[test]
    fn undated_sorts_before_dated() {
        let undated = Release::undated("1.0.0").expect("valid version");
        let released = dated("2.0.0", "2023-01-01");

        assert_eq!(undated.compare(&released), Ordering::Less);
        assert_eq!(released.compare(&undated), Ordering::Greater);
    }

    #[test]
    fn build_metadata_does_not_affect_order() {
        let a = dated("1.0.0+build.1", "2023-01-01");
        let b = dated("1.0.0+build.2", "2023-01-01");
        assert_eq!(a.compare(&b), Ordering::Equal);
    }

    #[test]
    fn add_change_rejects_unknown_category() {
        let mut release = Release::unreleased();
        let result = release.add_change("improved", "Faster startup");

        assert!(matches!(
            result,
            Err(ChangelogError::InvalidCategory { ref category }) if category == "improved"
        ));
    }

    #[test]
    fn add_change_wraps_text() {
        let mut release = Release::unreleased();
        release
            .add_change(ChangeCategory::Fixed, "Crash on empty input #4")
            .expect("seeded category")
            .add_change("fixed", Change::new("Typo"))
            .expect("seeded category");

        let fixed = &release.changes()["fixed"];
        assert_eq!(fixed.len(), 2);
        assert_eq!(fixed[0].issues(), ["4"]);
        assert_eq!(fixed[1].text(), "Typo");
    }

    #[test]
    fn convenience_methods_target_their_category() {
        let mut release = Release::unreleased();
        release
            .added("a")
            .changed("c")
            .deprecated("d")
            .removed("r")
            .fixed("f")
            .security("s");

        for (category, changes) in release.changes() {
            assert_eq!(changes.len(), 1, "{category}");
        }
        assert_eq!(release.changes()["security"][0].text(), "s");
    }

    #[test]
    fn combine_changes_appends_and_creates_categories() {
        let mut release = Release::unreleased();
        release.added("first");

        let mut other = IndexMap::new();
        other.insert("added".to_string(), vec![Change::new("second")]);
        other.insert("performance".to_string(), vec![Change::new("faster")]);
        release.combine_changes(other);

        let added: Vec<&str> = release.changes()["added"].iter().map(Change::text).collect();
        assert_eq!(added, ["first", "second"]);
        assert_eq!(release.changes().keys().next_back().map(String::as_str), Some("performance"));

        release
            .add_change("performance", "even faster")
            .expect("merged category is usable");
        assert_eq!(release.changes()["performance"].len(), 2);
    }

    #[test]
    fn emptiness_considers_description_and_changes() {
        let mut release = Release::unreleased().with_description("   \n");
        assert!(release.is_empty());

        release.set_description("Big rewrite");
        assert!(!release.is_empty());

        let mut release = Release::unreleased();
        release.removed("Legacy API");
        assert!(!release.is_empty());
    }

    #[test]
    fn render_without_changelog_has_no_brackets() {
        let mut release = dated("1.0.0", "2023-01-01");
        release.added("Initial release");

        assert_eq!(
            release.render(None),
            "## 1.0.0 - 2023-01-01\n### Added\n- Initial release"
        );
        assert_eq!(release.to_string(), release.render(None));
    }

    #[test]
    fn render_undated_and_yanked() {
        let mut release = Release::undated("0.3.0").expect("valid version");
        release.set_yanked(true);
        assert_eq!(release.render(None), "## 0.3.0 - Unreleased [YANKED]");

        let release = Release::unreleased().with_yanked(true);
        assert_eq!(release.render(None), "## Unreleased [YANKED]");
    }

    #[test]
    fn render_description_before_categories() {
        let mut release = dated("1.1.0", "2023-06-30").with_description("  Summer release.  ");
        release.fixed("Leak").security("Patched CVE");

        assert_eq!(
            release.render(None),
            "## 1.1.0 - 2023-06-30\nSummer release.\n\n### Fixed\n- Leak\n\n### Security\n- Patched CVE"
        );
    }

    #[test]
    fn render_custom_category_capitalized() {
        let mut release = dated("1.1.0", "2023-06-30");
        let mut extra = IndexMap::new();
        extra.insert("performance tweaks".to_string(), vec![Change::new("Cache")]);
        release.combine_changes(extra);

        assert!(release.render(None).contains("### Performance tweaks\n- Cache"));
    }

    #[test]
    fn compare_link_requires_url() {
        let mut changelog = Changelog::new("Changelog", "");
        changelog.add_release(dated("1.0.0", "2023-01-01"));

        assert!(changelog.releases()[0].compare_link(&changelog).is_none());
    }

    #[test]
    fn compare_link_requires_membership() {
        let mut changelog = Changelog::new("Changelog", "");
        changelog.url = Some("https://example.com/repo".to_string());
        changelog.add_release(dated("1.0.0", "2023-01-01"));

        let stranger = dated("1.0.0", "2023-01-01");
        assert!(stranger.compare_link(&changelog).is_none());

        let mut other = Changelog::new("Other", "");
        other.url = changelog.url.clone();
        other.add_release(dated("1.0.0", "2023-01-01"));
        assert!(other.releases()[0].compare_link(&changelog).is_none());
        assert!(other.releases()[0].compare_link(&other).is_some());
    }

    #[test]
    fn links_are_empty_without_url() {
        let mut release = dated("1.0.0", "2023-01-01");
        release.fixed("Bug #1");
        let changelog = Changelog::new("Changelog", "");

        assert!(release.links(&changelog).is_empty());
    }

    #[test]
    fn links_follow_first_encounter_order_without_duplicates() {
        let mut release = dated("1.0.0", "2023-01-01");
        release
            .added("Feature #10")
            .added("Other feature #3 #10")
            .fixed(Change::new("Bug").with_issue("3").with_issue("abc"));

        let mut changelog = Changelog::new("Changelog", "");
        changelog.url = Some("https://example.com/repo".to_string());

        assert_eq!(
            release.links(&changelog),
            [
                "[#10]: https://example.com/repo/issues/10",
                "[#3]: https://example.com/repo/issues/3",
                "[#abc]: https://example.com/repo/issues/abc",
            ]
        );
    }
}
