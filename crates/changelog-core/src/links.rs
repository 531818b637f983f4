use std::cmp::Ordering;

use crate::release::Release;

/// Derives the source-control tag name of a release.
pub trait TagNameBuilder {
    fn tag_name(&self, release: &Release) -> String;
}

impl<F> TagNameBuilder for F
where
    F: Fn(&Release) -> String,
{
    fn tag_name(&self, release: &Release) -> String {
        self(release)
    }
}

/// Builds a release link from tag names.
///
/// `previous` is `None` when the release has no dated predecessor, in which
/// case the link points at the tag itself. For releases without a version or
/// date, `tag` is the changelog's head label.
pub trait TagLinkBuilder {
    fn tag_link(&self, url: &str, tag: &str, previous: Option<&str>, head: &str) -> String;
}

impl<F> TagLinkBuilder for F
where
    F: Fn(&str, &str, Option<&str>, &str) -> String,
{
    fn tag_link(&self, url: &str, tag: &str, previous: Option<&str>, head: &str) -> String {
        self(url, tag, previous, head)
    }
}

/// Legacy hook receiving both releases. Its result is used verbatim, bypassing
/// tag names entirely. Prefer [`TagLinkBuilder`].
pub trait CompareLinkBuilder {
    fn compare_link(&self, previous: Option<&Release>, release: &Release) -> String;
}

impl<F> CompareLinkBuilder for F
where
    F: Fn(Option<&Release>, &Release) -> String,
{
    fn compare_link(&self, previous: Option<&Release>, release: &Release) -> String {
        self(previous, release)
    }
}

/// Tags of the form `<prefix>v<version>`, e.g. `my-crate@v1.2.0`.
///
/// Releases without a version are named after `head`, which defaults to
/// `HEAD` and should match the changelog's head label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixedTagName {
    prefix: String,
    head: String,
}

impl PrefixedTagName {
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            head: "HEAD".to_string(),
        }
    }

    #[must_use]
    pub fn with_head(mut self, head: impl Into<String>) -> Self {
        self.head = head.into();
        self
    }
}

impl TagNameBuilder for PrefixedTagName {
    fn tag_name(&self, release: &Release) -> String {
        match release.version() {
            Some(version) => format!("{}v{version}", self.prefix),
            None => self.head.clone(),
        }
    }
}

/// Link templates with `{url}`, `{tag}`, `{previous}` and `{head}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateLinks {
    tag_template: String,
    compare_template: String,
}

impl TemplateLinks {
    pub const DEFAULT_TAG_TEMPLATE: &'static str = "{url}/releases/tag/{tag}";
    pub const DEFAULT_COMPARE_TEMPLATE: &'static str = "{url}/compare/{previous}...{tag}";

    #[must_use]
    pub fn new(tag_template: impl Into<String>, compare_template: impl Into<String>) -> Self {
        Self {
            tag_template: tag_template.into(),
            compare_template: compare_template.into(),
        }
    }
}

impl Default for TemplateLinks {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TAG_TEMPLATE, Self::DEFAULT_COMPARE_TEMPLATE)
    }
}

impl TagLinkBuilder for TemplateLinks {
    fn tag_link(&self, url: &str, tag: &str, previous: Option<&str>, head: &str) -> String {
        let template = match previous {
            Some(_) => &self.compare_template,
            None => &self.tag_template,
        };

        template
            .replace("{url}", url.trim_end_matches('/'))
            .replace("{previous}", previous.unwrap_or_default())
            .replace("{head}", head)
            .replace("{tag}", tag)
    }
}

/// Ordering for reference-style link lines. Two `[#<digits>]:` lines compare
/// numerically; any other pair compares as plain strings.
pub(crate) fn compare_reference_links(a: &str, b: &str) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }

    match (numeric_reference(a), numeric_reference(b)) {
        (Some(left), Some(right)) => compare_digits(left, right),
        _ => a.cmp(b),
    }
}

fn numeric_reference(line: &str) -> Option<&str> {
    let rest = line.strip_prefix("[#")?;
    let end = rest.find(|c: char| !c.is_ascii_digit())?;
    if end == 0 || !rest[end..].starts_with("]:") {
        return None;
    }
    Some(&rest[..end])
}

fn compare_digits(left: &str, right: &str) -> Ordering {
    let left = left.trim_start_matches('0');
    let right = right.trim_start_matches('0');
    left.len().cmp(&right.len()).then_with(|| left.cmp(right))
}
