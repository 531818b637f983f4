use std::path::PathBuf;

use clap::Args;
use tracing::info;

use super::SourceArgs;
use crate::error::{CliError, Result};

#[derive(Args)]
pub(crate) struct RenderArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Write the changelog to this file instead of stdout
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,
}

pub(crate) fn run(args: RenderArgs) -> Result<()> {
    let changelog = args.source.load()?;
    let rendered = changelog.render();

    match args.output {
        Some(path) => {
            std::fs::write(&path, &rendered).map_err(|source| CliError::Write {
                path: path.clone(),
                source,
            })?;
            info!(
                path = %path.display(),
                releases = changelog.releases().len(),
                "wrote changelog"
            );
        }
        None => print!("{rendered}"),
    }

    Ok(())
}
