use std::fmt;
use std::ops::Range;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeCategory {
    Added,
    Changed,
    Deprecated,
    Removed,
    Fixed,
    Security,
}

impl ChangeCategory {
    /// Keep a Changelog order, which is also the order categories are seeded in a release.
    pub const ALL: [Self; 6] = [
        Self::Added,
        Self::Changed,
        Self::Deprecated,
        Self::Removed,
        Self::Fixed,
        Self::Security,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Changed => "changed",
            Self::Deprecated => "deprecated",
            Self::Removed => "removed",
            Self::Fixed => "fixed",
            Self::Security => "security",
        }
    }
}

impl fmt::Display for ChangeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for ChangeCategory {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
pub enum BulletStyle {
    #[default]
    #[serde(rename = "-")]
    #[value(name = "-", alias = "dash")]
    Dash,
    #[serde(rename = "*")]
    #[value(name = "*", alias = "asterisk")]
    Asterisk,
    #[serde(rename = "+")]
    #[value(name = "+", alias = "plus")]
    Plus,
}

impl BulletStyle {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dash => "-",
            Self::Asterisk => "*",
            Self::Plus => "+",
        }
    }
}

impl fmt::Display for BulletStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single bullet entry. Bare `#123` references in the text are picked up as
/// issue ids and rendered as `[#123]` so the changelog's link block resolves them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    text: String,
    issues: Vec<String>,
}

impl Change {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let mut change = Self {
            issues: Vec::new(),
            text: String::new(),
        };

        for IssueReference { range, .. } in issue_references(&text) {
            change.push_issue(&text[range.start + 1..range.end]);
        }
        change.text = text;
        change
    }

    #[must_use]
    pub fn with_issue(mut self, issue: impl AsRef<str>) -> Self {
        self.push_issue(issue.as_ref());
        self
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn issues(&self) -> &[String] {
        &self.issues
    }

    #[must_use]
    pub fn render(&self, bullet: BulletStyle) -> String {
        let linked = link_issue_references(self.text.trim());
        let mut lines = linked.lines();
        let mut output = format!("{bullet} {}", lines.next().unwrap_or_default());

        for line in lines {
            output.push('\n');
            output.push_str(format!("  {line}").trim_end());
        }

        output
    }

    fn push_issue(&mut self, issue: &str) {
        let issue = issue.trim().trim_start_matches('#');
        if !issue.is_empty() && !self.issues.iter().any(|known| known == issue) {
            self.issues.push(issue.to_string());
        }
    }
}

impl From<&str> for Change {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for Change {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(BulletStyle::default()))
    }
}

/// A `#<digits>` token. `linked` is set when it is already written as `[#N]`.
struct IssueReference {
    range: Range<usize>,
    linked: bool,
}

/// Finds issue references, skipping HTML entities and tokens glued to
/// surrounding words.
fn issue_references(text: &str) -> Vec<IssueReference> {
    let bytes = text.as_bytes();
    let mut references = Vec::new();
    let mut index = 0;

    while index < bytes.len() {
        if bytes[index] != b'#' {
            index += 1;
            continue;
        }

        let digits_end = bytes[index + 1..]
            .iter()
            .position(|b| !b.is_ascii_digit())
            .map_or(bytes.len(), |offset| index + 1 + offset);

        let prev = index.checked_sub(1).map(|at| bytes[at]);
        let next = bytes.get(digits_end).copied();
        let linked = prev == Some(b'[') && next == Some(b']');

        let preceded_ok = linked
            || prev.is_none_or(|b| !(b.is_ascii_alphanumeric() || matches!(b, b'[' | b'&' | b'_')));
        let followed_ok = linked
            || next.is_none_or(|b| !(b.is_ascii_alphanumeric() || matches!(b, b'_' | b']')));

        if preceded_ok && followed_ok && digits_end > index + 1 {
            references.push(IssueReference {
                range: index..digits_end,
                linked,
            });
        }

        index = digits_end.max(index + 1);
    }

    references
}

fn link_issue_references(text: &str) -> String {
    let mut output = String::with_capacity(text.len() + 8);
    let mut last = 0;

    for IssueReference { range, .. } in issue_references(text)
        .into_iter()
        .filter(|reference| !reference.linked)
    {
        output.push_str(&text[last..range.start]);
        output.push('[');
        output.push_str(&text[range.clone()]);
        output.push(']');
        last = range.end;
    }
    output.push_str(&text[last..]);

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_follow_keep_a_changelog_order() {
        let names: Vec<&str> = ChangeCategory::ALL.iter().map(|c| c.as_str()).collect();
        assert_eq!(
            names,
            ["added", "changed", "deprecated", "removed", "fixed", "security"]
        );
    }

    #[test]
    fn plain_change_has_no_issues() {
        let change = Change::new("Initial release");
        assert_eq!(change.text(), "Initial release");
        assert!(change.issues().is_empty());
        assert_eq!(change.render(BulletStyle::Dash), "- Initial release");
    }

    #[test]
    fn extracts_issue_references_from_text() {
        let change = Change::new("Fixed crash on startup #12, see also #3 and #12");
        assert_eq!(change.issues(), ["12", "3"]);
    }

    #[test]
    fn renders_issue_references_as_links() {
        let change = Change::new("Fixed crash #12");
        assert_eq!(change.render(BulletStyle::Asterisk), "* Fixed crash [#12]");
    }

    #[test]
    fn ignores_glued_references() {
        let change = Change::new("See C# and abc#5 and #6x and [#7 and #8] and &#39;");
        assert!(change.issues().is_empty());
        assert_eq!(
            change.render(BulletStyle::Dash),
            "- See C# and abc#5 and #6x and [#7 and #8] and &#39;"
        );
    }

    #[test]
    fn bracketed_references_are_recorded_but_not_relinked() {
        let change = Change::new("Fix crash [#4], see #9");
        assert_eq!(change.issues(), ["4", "9"]);
        assert_eq!(change.render(BulletStyle::Dash), "- Fix crash [#4], see [#9]");
    }

    #[test]
    fn explicit_issues_are_deduplicated() {
        let change = Change::new("Bump dependency #7")
            .with_issue("7")
            .with_issue("#8")
            .with_issue("8");
        assert_eq!(change.issues(), ["7", "8"]);
    }

    #[test]
    fn continuation_lines_are_indented() {
        let change = Change::new("First line\nsecond line\n\nthird");
        assert_eq!(
            change.render(BulletStyle::Plus),
            "+ First line\n  second line\n\n  third"
        );
    }

    #[test]
    fn bullet_style_deserializes_from_marker() {
        #[derive(Deserialize)]
        struct Wrapper {
            bullet: BulletStyle,
        }

        let wrapper: Wrapper = toml::from_str(r#"bullet = "*""#).expect("should deserialize");
        assert_eq!(wrapper.bullet, BulletStyle::Asterisk);
    }
}
