use chrono::{DateTime, NaiveDate, Utc};
use semver::Version;

use crate::error::ChangelogError;

/// # Errors
///
/// Returns `ChangelogError::VersionParse` if `input` is not a valid semantic version.
pub fn parse_version(input: &str) -> Result<Version, ChangelogError> {
    Version::parse(input.trim()).map_err(|source| ChangelogError::VersionParse {
        version: input.to_string(),
        source,
    })
}

/// Accepts a plain `YYYY-MM-DD` date or an RFC 3339 timestamp, which is
/// reduced to its UTC calendar date.
///
/// # Errors
///
/// Returns `ChangelogError::DateParse` if `input` matches neither form.
pub fn parse_date(input: &str) -> Result<NaiveDate, ChangelogError> {
    let trimmed = input.trim();

    match NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        Ok(date) => Ok(date),
        Err(source) => DateTime::parse_from_rfc3339(trimmed)
            .map(|timestamp| timestamp.with_timezone(&Utc).date_naive())
            .map_err(|_| ChangelogError::DateParse {
                date: input.to_string(),
                source,
            }),
    }
}

pub trait IntoVersion {
    /// # Errors
    ///
    /// Returns `ChangelogError::VersionParse` if the value cannot be parsed.
    fn into_version(self) -> Result<Version, ChangelogError>;
}

impl IntoVersion for Version {
    fn into_version(self) -> Result<Version, ChangelogError> {
        Ok(self)
    }
}

impl IntoVersion for &Version {
    fn into_version(self) -> Result<Version, ChangelogError> {
        Ok(self.clone())
    }
}

impl IntoVersion for &str {
    fn into_version(self) -> Result<Version, ChangelogError> {
        parse_version(self)
    }
}

impl IntoVersion for String {
    fn into_version(self) -> Result<Version, ChangelogError> {
        parse_version(&self)
    }
}

impl IntoVersion for &String {
    fn into_version(self) -> Result<Version, ChangelogError> {
        parse_version(self)
    }
}

pub trait IntoDate {
    /// # Errors
    ///
    /// Returns `ChangelogError::DateParse` if the value cannot be parsed.
    fn into_date(self) -> Result<NaiveDate, ChangelogError>;
}

impl IntoDate for NaiveDate {
    fn into_date(self) -> Result<NaiveDate, ChangelogError> {
        Ok(self)
    }
}

impl IntoDate for DateTime<Utc> {
    fn into_date(self) -> Result<NaiveDate, ChangelogError> {
        Ok(self.date_naive())
    }
}

impl IntoDate for &str {
    fn into_date(self) -> Result<NaiveDate, ChangelogError> {
        parse_date(self)
    }
}

impl IntoDate for String {
    fn into_date(self) -> Result<NaiveDate, ChangelogError> {
        parse_date(&self)
    }
}

impl IntoDate for &String {
    fn into_date(self) -> Result<NaiveDate, ChangelogError> {
        parse_date(self)
    }
}
