use clap::ValueEnum;
use std::path::PathBuf;

/// Ranking key for the final report. The other two keys act as fixed
/// descending tie-breakers, then author name ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OrderBy {
    Lines,
    Commits,
    Files,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Tabular,
    Csv,
    Json,
    JsonLines,
}

/// Validated run configuration. Built once by the CLI layer and treated as
/// immutable for the whole collection run.
#[derive(Debug, Clone)]
pub struct Config {
    pub repository: PathBuf,
    pub revision: String,
    pub order_by: OrderBy,
    pub format: Format,
    pub use_committer: bool,
    pub extensions: Vec<String>,
    pub excludes: Vec<String>,
    pub restrict_to: Vec<String>,
    pub jobs: Option<usize>,
}
