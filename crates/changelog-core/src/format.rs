use chrono::NaiveDate;
use tracing::debug;

use crate::change::BulletStyle;
use crate::changelog::Changelog;
use crate::config::Format;
use crate::links::compare_reference_links;
use crate::release::Release;
use crate::sort::insertion_sort_by;

/// Used when a changelog has no description of its own.
pub const DEFAULT_DESCRIPTION: &str = "All notable changes to this project will be documented in this file.

The format is based on [Keep a Changelog](https://keepachangelog.com/)
and this project adheres to [Semantic Versioning](https://semver.org/).";

/// `YYYY-MM-DD`, or `Unreleased` for a missing date.
#[must_use]
pub fn format_date(date: Option<NaiveDate>) -> String {
    date.map_or_else(|| "Unreleased".to_string(), |date| date.format("%Y-%m-%d").to_string())
}

pub(crate) fn format_release(release: &Release, changelog: Option<&Changelog>) -> String {
    let strict = changelog.is_some_and(|changelog| changelog.format == Format::Markdownlint);
    let bullet = changelog.map_or(BulletStyle::default(), |changelog| changelog.bullet_style);
    let has_compare_link = changelog
        .and_then(|changelog| release.compare_link(changelog))
        .is_some();
    let yanked = if release.is_yanked() { " [YANKED]" } else { "" };

    let mut lines: Vec<String> = Vec::new();

    let heading = match (release.version(), has_compare_link) {
        (Some(version), true) => format!("## [{version}] - {}", format_date(release.date())),
        (Some(version), false) => format!("## {version} - {}", format_date(release.date())),
        (None, true) => "## [Unreleased]".to_string(),
        (None, false) => "## Unreleased".to_string(),
    };
    lines.push(format!("{heading}{yanked}"));

    if strict {
        lines.push(String::new());
    }

    let description = release.description().trim();
    if !description.is_empty() {
        lines.push(description.to_string());
        lines.push(String::new());
    }

    for (category, changes) in release.changes() {
        if changes.is_empty() {
            continue;
        }

        lines.push(format!("### {}", capitalize(category)));
        if strict {
            lines.push(String::new());
        }
        lines.extend(changes.iter().map(|change| change.render(bullet)));
        lines.push(String::new());
    }

    lines.join("\n").trim().to_string()
}

pub(crate) fn format_changelog(changelog: &Changelog) -> String {
    let strict = changelog.format == Format::Markdownlint;
    let mut lines: Vec<String> = Vec::new();

    if let Some(flag) = changelog.flag.as_deref().filter(|flag| !flag.is_empty()) {
        lines.push(format!("<!-- {flag} -->"));
        lines.push(String::new());
    }

    lines.push(format!("# {}", changelog.title));
    if strict {
        lines.push(String::new());
    }

    let description = changelog.description.trim();
    lines.push(if description.is_empty() {
        DEFAULT_DESCRIPTION.to_string()
    } else {
        description.to_string()
    });

    let mut links: Vec<String> = Vec::new();
    let mut compare_links: Vec<String> = Vec::new();

    for release in changelog.releases() {
        lines.push(String::new());
        lines.push(format_release(release, Some(changelog)));

        for link in release.links(changelog) {
            if !links.contains(&link) {
                links.push(link);
            }
        }

        if let Some(link) = release.compare_link(changelog) {
            compare_links.push(link);
        }
    }

    debug!(
        releases = changelog.releases().len(),
        issue_links = links.len(),
        compare_links = compare_links.len(),
        "rendering changelog"
    );

    if !links.is_empty() {
        lines.push(String::new());
        insertion_sort_by(&mut links, |a, b| compare_reference_links(a, b));
        lines.extend(links);
    }

    if !compare_links.is_empty() {
        lines.push(String::new());
        lines.extend(compare_links);
    }

    lines.push(String::new());

    if let Some(footer) = changelog.footer.as_deref().filter(|footer| !footer.is_empty()) {
        lines.push("---".to_string());
        lines.push(String::new());
        lines.push(footer.to_string());
        lines.push(String::new());
    }

    lines.join("\n")
}

fn capitalize(category: &str) -> String {
    let mut chars = category.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
