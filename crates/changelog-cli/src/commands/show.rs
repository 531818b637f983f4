use clap::Args;

use super::SourceArgs;
use crate::error::{CliError, Result};

#[derive(Args)]
pub(crate) struct ShowArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Version to show; omit for the unreleased section
    version: Option<String>,
}

pub(crate) fn run(args: ShowArgs) -> Result<()> {
    let changelog = args.source.load()?;

    let release = match args.version.as_deref() {
        Some(version) => changelog.find_release(version)?,
        None => changelog.find_unreleased(),
    };

    let Some(release) = release else {
        return Err(CliError::ReleaseNotFound {
            version: args.version.unwrap_or_else(|| "Unreleased".to_string()),
        });
    };

    println!("{}", release.render(Some(&changelog)));

    Ok(())
}
