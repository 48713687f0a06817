//! CLI definition, tracing setup, and the run command.

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use issuepress_core::pipeline::{self, ProgressReporter, RunSummary};
use issuepress_shared::{CONFIG_FILE_NAME, load_config, to_toml};
use issuepress_tracker::{GitHubOptions, GitHubTracker};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// issuepress: turn GitHub issues into an index, a feed, and an archive.
#[derive(Debug, Parser)]
#[command(
    name = "issuepress",
    version,
    about = "Publish a repository's issues as an index document, RSS feed, and markdown archive.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// GitHub token used for every API call.
    #[arg(
        env = "GITHUB_TOKEN",
        hide_env_values = true,
        required_unless_present = "print_config"
    )]
    pub github_token: Option<String>,

    /// Repository as `owner/name`.
    #[arg(required_unless_present = "print_config")]
    pub repo_name: Option<String>,

    /// Archive this issue even if it was archived before.
    #[arg(long)]
    pub issue_number: Option<u64>,

    /// Path to the config file.
    #[arg(long, default_value = CONFIG_FILE_NAME)]
    pub config: PathBuf,

    /// Print the resolved configuration and exit.
    #[arg(long)]
    pub print_config: bool,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text")]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Log output format.
#[derive(Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "issuepress=info",
        1 => "issuepress=debug",
        _ => "issuepress=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli.config)?;

    if cli.print_config {
        println!("{}", to_toml(&config)?);
        return Ok(());
    }

    let (Some(token), Some(repo_name)) = (cli.github_token.as_deref(), cli.repo_name.as_deref())
    else {
        return Err(eyre!("a GitHub token and a repository name are required"));
    };
    if token.trim().is_empty() {
        return Err(eyre!("GitHub token is empty"));
    }

    info!(
        repo = %repo_name,
        config = %cli.config.display(),
        issue_number = ?cli.issue_number,
        "publishing issues"
    );

    let tracker = GitHubTracker::connect(token, repo_name, &GitHubOptions::default())?;

    let reporter = CliProgress::new()?;
    let summary = pipeline::run(&config, &tracker, cli.issue_number, &reporter)?;

    println!();
    println!("  Published {repo_name}");
    println!("  Sections: {}", summary.sections.join(", "));
    println!("  Feed:     {} entries", summary.feed_entries);
    println!("  Archived: {} new documents", summary.archived.len());
    println!("  Time:     {:.1}s", summary.elapsed.as_secs_f64());
    println!();

    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Result<Self> {
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .map_err(|e| eyre!("invalid progress template: {e}"))?
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(style);
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Ok(Self { spinner })
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn archived(&self, number: u64, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Archiving [{current}/{total}] #{number}"));
    }

    fn done(&self, _summary: &RunSummary) {
        self.spinner.finish_and_clear();
    }
}
