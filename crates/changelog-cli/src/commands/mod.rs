mod render;
mod show;

use std::path::PathBuf;

use changelog_core::{BulletStyle, Changelog, Format};
use changelog_source::{LoadOptions, load_path};
use clap::{Args, Subcommand};

use crate::error::Result;

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Render a changelog source to markdown
    Render(render::RenderArgs),
    /// Print a single release section
    Show(show::ShowArgs),
}

impl Commands {
    pub(crate) fn execute(self) -> Result<()> {
        match self {
            Self::Render(args) => render::run(args),
            Self::Show(args) => show::run(args),
        }
    }
}

/// Options shared by every command that loads a changelog source.
#[derive(Args)]
pub(crate) struct SourceArgs {
    /// Changelog source file (.toml or .json)
    source: PathBuf,

    /// Repository URL used for compare and issue links
    #[arg(long)]
    url: Option<String>,

    /// Label compared against for unreleased changes
    #[arg(long)]
    head: Option<String>,

    /// Markdown dialect
    #[arg(long, value_enum)]
    format: Option<Format>,

    /// Bullet marker for change entries
    #[arg(long, value_enum)]
    bullet_style: Option<BulletStyle>,

    /// Drop releases without a description or changes
    #[arg(long)]
    omit_empty: bool,
}

impl SourceArgs {
    pub(crate) fn load(&self) -> Result<Changelog> {
        let options = LoadOptions {
            omit_empty: self.omit_empty,
            url: self.url.clone(),
            head: self.head.clone(),
            format: self.format,
            bullet_style: self.bullet_style,
        };
        Ok(load_path(&self.source, options)?)
    }
}
