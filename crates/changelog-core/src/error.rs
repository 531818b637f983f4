use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChangelogError {
    #[error("invalid change category '{category}'")]
    InvalidCategory { category: String },

    #[error("failed to parse version '{version}'")]
    VersionParse {
        version: String,
        #[source]
        source: semver::Error,
    },

    #[error("failed to parse date '{date}'")]
    DateParse {
        date: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("failed to parse URL '{url}'")]
    UrlParse {
        url: String,
        #[source]
        source: url::ParseError,
    },
}
