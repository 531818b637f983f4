use url::{ParseError, Url};

use crate::error::ChangelogError;
use crate::links::TagLinkBuilder;

/// Source-hosting flavours with known tag and comparison URL shapes.
///
/// As a [`TagLinkBuilder`] a forge treats the changelog URL as the repository
/// URL, e.g. `https://gitlab.com/owner/repo`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Forge {
    GitHub,
    GitLab,
    Bitbucket,
    Gitea,
    SourceHut,
}

impl Forge {
    /// Unknown hosts fall back to GitHub-style URLs.
    ///
    /// # Errors
    ///
    /// Returns `ChangelogError::UrlParse` if `url` is not an absolute URL with a host.
    pub fn detect(url: &str) -> Result<Self, ChangelogError> {
        host_of(url).map(|host| forge_for_host(&host))
    }

    #[must_use]
    pub fn tag_url(self, repository_url: &str, tag: &str) -> String {
        let base = repository_url.trim_end_matches('/');
        match self {
            Self::GitHub | Self::Gitea => format!("{base}/releases/tag/{tag}"),
            Self::GitLab => format!("{base}/-/tags/{tag}"),
            Self::Bitbucket => format!("{base}/src/{tag}"),
            Self::SourceHut => format!("{base}/refs/{tag}"),
        }
    }

    #[must_use]
    pub fn comparison_url(self, repository_url: &str, base_tag: &str, target_tag: &str) -> String {
        let base = repository_url.trim_end_matches('/');
        match self {
            Self::GitHub | Self::Gitea => format!("{base}/compare/{base_tag}...{target_tag}"),
            Self::GitLab => format!("{base}/-/compare/{base_tag}...{target_tag}"),
            Self::Bitbucket => format!("{base}/branches/compare/{target_tag}..{base_tag}"),
            Self::SourceHut => format!("{base}/log/{base_tag}..{target_tag}"),
        }
    }
}

impl TagLinkBuilder for Forge {
    fn tag_link(&self, url: &str, tag: &str, previous: Option<&str>, _head: &str) -> String {
        match previous {
            Some(previous) => self.comparison_url(url, previous, tag),
            None => self.tag_url(url, tag),
        }
    }
}

fn host_of(url: &str) -> Result<String, ChangelogError> {
    let parsed = Url::parse(url).map_err(|source| ChangelogError::UrlParse {
        url: url.to_string(),
        source,
    })?;
    parsed
        .host_str()
        .map(str::to_ascii_lowercase)
        .ok_or_else(|| ChangelogError::UrlParse {
            url: url.to_string(),
            source: ParseError::EmptyHost,
        })
}

fn forge_for_host(host: &str) -> Forge {
    let on = |domain: &str| host == domain || host.ends_with(&format!(".{domain}"));

    if on("gitlab.com") || host.starts_with("gitlab.") || host.contains(".gitlab.") {
        Forge::GitLab
    } else if on("bitbucket.org") {
        Forge::Bitbucket
    } else if host == "codeberg.org" || host.starts_with("gitea.") {
        Forge::Gitea
    } else if host == "git.sr.ht" || host.ends_with(".sr.ht") {
        Forge::SourceHut
    } else {
        Forge::GitHub
    }
}
