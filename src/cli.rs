use crate::config::{Config, Format, OrderBy};
use crate::filter::FileFilter;
use crate::git::GitCli;
use crate::{langs, report, stats};
use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "gitfame")]
#[command(about = "Per-author contribution statistics for a git revision")]
#[command(version)]
pub struct Cli {
    #[arg(long, default_value = ".", help = "Path to the git repository")]
    pub repository: PathBuf,

    #[arg(long, default_value = "HEAD", help = "Revision to analyze")]
    pub revision: String,

    #[arg(long, value_enum, default_value_t = OrderBy::Lines, help = "Ranking key")]
    pub order_by: OrderBy,

    #[arg(long, value_enum, default_value_t = Format::Tabular, help = "Output format")]
    pub format: Format,

    #[arg(long, help = "Credit the committer instead of the author")]
    pub use_committer: bool,

    #[arg(long, value_delimiter = ',', help = "File extensions to include, e.g. .rs,.md")]
    pub extensions: Vec<String>,

    #[arg(long, value_delimiter = ',', help = "Language names to include, resolved to extensions")]
    pub languages: Vec<String>,

    #[arg(long = "exclude", value_delimiter = ',', help = "Glob patterns that drop matching paths")]
    pub exclude: Vec<String>,

    #[arg(long = "restrict-to", value_delimiter = ',', help = "Glob patterns; keep only matching paths")]
    pub restrict_to: Vec<String>,

    #[arg(long, help = "Bound on concurrent blame workers (default: one per CPU)")]
    pub jobs: Option<usize>,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn execute(self) -> Result<()> {
        let config = self.into_config()?;

        let git = GitCli::new(&config.repository);
        let files = git
            .ls_tree(&config.revision)
            .context("failed to list files at revision")?;

        let filter = FileFilter::new(&config.extensions, &config.excludes, &config.restrict_to)
            .context("invalid filter pattern")?;
        let files = filter.apply(files);
        log::debug!("{} file(s) selected for blame", files.len());

        let spinner = collection_spinner();
        let collected = stats::collect(&git, &config, &files);
        spinner.finish_and_clear();

        let mut ranked = collected.context("failed to collect statistics")?;
        stats::rank(&mut ranked, config.order_by);

        let stdout = io::stdout();
        report::render(&ranked, config.format, &mut stdout.lock())
            .context("failed to render report")?;
        Ok(())
    }

    /// Resolves `--languages` into extensions (warning on unknown names)
    /// and freezes everything into the run configuration.
    fn into_config(self) -> Result<Config> {
        let mut extensions = self.extensions;
        if !self.languages.is_empty() {
            let resolution =
                langs::resolve(&self.languages).context("failed to load language table")?;
            if !resolution.unknown.is_empty() {
                eprintln!(
                    "{} undefined languages: {}",
                    style("Warning:").yellow().bold(),
                    resolution.unknown.join(", ")
                );
            }
            extensions.extend(resolution.extensions);
        }

        Ok(Config {
            repository: self.repository,
            revision: self.revision,
            order_by: self.order_by,
            format: self.format,
            use_committer: self.use_committer,
            extensions,
            excludes: self.exclude,
            restrict_to: self.restrict_to,
            jobs: self.jobs,
        })
    }
}

fn collection_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message("Collecting statistics...");
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}
