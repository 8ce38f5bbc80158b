//! Concurrent collection of per-author totals and the final ranking.
//!
//! One rayon task per filtered file; each task shells out to git and parses
//! on its own, then merges its per-file tally into the shared author map in
//! a single critical section. The first failing task aborts the run.

use crate::blame::{self, FileTally, Identity};
use crate::config::{Config, OrderBy};
use crate::error::Result;
use crate::git::GitCli;
use crate::model::AuthorStats;
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

#[derive(Debug, Default)]
struct AuthorTotals {
    lines: usize,
    files: usize,
    commit_ids: HashSet<String>,
}

/// Shared accumulation point. Workers never see the map itself, only the
/// atomic [`StatsCollector::record_file`] operation; the map is frozen into
/// plain [`AuthorStats`] once all workers have joined.
#[derive(Debug, Default)]
pub struct StatsCollector {
    totals: Mutex<HashMap<String, AuthorTotals>>,
}

impl StatsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges one file's tally: adds line counts, unions commit ids
    /// (idempotent across files) and counts the file once per identity.
    pub fn record_file(&self, tally: FileTally) {
        let mut totals = self.totals.lock().unwrap_or_else(|e| e.into_inner());
        for (author, contribution) in tally.into_per_author() {
            let entry = totals.entry(author).or_default();
            entry.lines += contribution.lines;
            entry.files += 1;
            entry.commit_ids.extend(contribution.commits);
        }
    }

    /// Derives `commits` from the de-duplicated id sets and discards the
    /// working state. Only called after the worker join point.
    pub fn finalize(self) -> Vec<AuthorStats> {
        let totals = self.totals.into_inner().unwrap_or_else(|e| e.into_inner());
        totals
            .into_iter()
            .map(|(name, t)| AuthorStats {
                name,
                lines: t.lines,
                commits: t.commit_ids.len(),
                files: t.files,
            })
            .collect()
    }
}

/// Runs the history parser over every filtered file and returns the
/// unranked author records. Fail-fast: the first file whose git invocation
/// or parse fails cancels the whole run and its error is returned.
pub fn collect(git: &GitCli, config: &Config, files: &[String]) -> Result<Vec<AuthorStats>> {
    let identity = if config.use_committer {
        Identity::Committer
    } else {
        Identity::Author
    };

    let collector = StatsCollector::new();
    let scan = || {
        files.par_iter().try_for_each(|file| -> Result<()> {
            let tally = process_file(git, &config.revision, file, identity)?;
            log::debug!("{file}: {} contributor(s)", tally.len());
            collector.record_file(tally);
            Ok(())
        })
    };

    match config.jobs {
        Some(jobs) => {
            let pool = rayon::ThreadPoolBuilder::new().num_threads(jobs).build()?;
            pool.install(scan)?;
        }
        None => scan()?,
    }

    Ok(collector.finalize())
}

/// Blames one file; when blame reports nothing (empty file), falls back to
/// the file's log and credits its creation commit.
fn process_file(git: &GitCli, revision: &str, file: &str, identity: Identity) -> Result<FileTally> {
    let output = git.blame_porcelain(revision, file)?;
    let tally = blame::parse_blame(&output, identity)?;
    if !tally.is_empty() {
        return Ok(tally);
    }

    let log = git.log_file(revision, file)?;
    let (commit, author) = blame::parse_creation_log(&log)?;
    Ok(blame::fallback_tally(author, commit))
}

/// Stable sort: configured key descending, the two remaining keys as fixed
/// descending tie-breakers, then name ascending as the total-order anchor.
pub fn rank(stats: &mut [AuthorStats], order_by: OrderBy) {
    let keys = move |s: &AuthorStats| match order_by {
        OrderBy::Lines => [s.lines, s.commits, s.files],
        OrderBy::Commits => [s.commits, s.lines, s.files],
        OrderBy::Files => [s.files, s.lines, s.commits],
    };
    stats.sort_by(|a, b| keys(b).cmp(&keys(a)).then_with(|| a.name.cmp(&b.name)));
}
