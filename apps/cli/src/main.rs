//! issuepress CLI: publish a repository's issues as a blog.
//!
//! Rewrites the index document and RSS feed from the current issue state and
//! archives newly published issues as markdown.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
