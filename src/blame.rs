//! Parsing of `git blame --porcelain` output and, for files with no
//! line-level history, of `git log` output. Pure functions over captured
//! text; all git invocations live in [`crate::git`].

use crate::error::{FameError, Result};
use std::collections::{HashMap, HashSet};

/// Length of a full commit id.
const COMMIT_ID_LEN: usize = 40;
/// Shortest possible group header: `<40-hex id> <orig> <final> <count>`.
const MIN_HEADER_LEN: usize = 46;

/// Which identity line of a commit gets the credit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Identity {
    Author,
    Committer,
}

impl Identity {
    fn line_prefix(self) -> &'static str {
        match self {
            Identity::Author => "author ",
            Identity::Committer => "committer ",
        }
    }
}

/// Per-file attribution totals for one identity.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct AuthorTally {
    pub lines: usize,
    pub commits: HashSet<String>,
}

/// Everything the history parser learned about one file: line counts and
/// commit ids per identity. Each identity present here earns exactly one
/// file-count increment during aggregation.
#[derive(Debug, Default)]
pub struct FileTally {
    per_author: HashMap<String, AuthorTally>,
}

impl FileTally {
    pub fn is_empty(&self) -> bool {
        self.per_author.is_empty()
    }

    pub fn len(&self) -> usize {
        self.per_author.len()
    }

    pub fn into_per_author(self) -> HashMap<String, AuthorTally> {
        self.per_author
    }

    fn credit_lines(&mut self, author: &str, commit: &str, lines: usize) {
        let tally = self.per_author.entry(author.to_string()).or_default();
        tally.lines += lines;
        if !tally.commits.contains(commit) {
            tally.commits.insert(commit.to_string());
        }
    }

    /// Credits the creation commit of a file that has no blame output.
    /// Contributes no lines, one commit, one file.
    fn credit_creation(&mut self, author: String, commit: String) {
        self.per_author.entry(author).or_default().commits.insert(commit);
    }
}

/// Recognizes a group header in porcelain blame output: a minimum length,
/// at least four space-separated fields, and a leading fixed-width run of
/// hex digits (the commit id). Content lines start with a tab and metadata
/// lines with a keyword, so neither can satisfy the hex check.
pub fn is_commit_header(line: &str) -> bool {
    if line.len() < MIN_HEADER_LEN || line.split(' ').count() < 4 {
        return false;
    }
    line.as_bytes()[..COMMIT_ID_LEN]
        .iter()
        .all(u8::is_ascii_hexdigit)
}

/// Parses one file's porcelain blame output into per-identity totals.
///
/// The identity of a commit is resolved once, at its first group header,
/// by scanning the metadata lines that follow it; later headers for the
/// same commit (which porcelain emits without metadata) reuse the cached
/// resolution. An empty tally means the file produced no blame output and
/// the caller should fall back to [`parse_creation_log`].
pub fn parse_blame(output: &str, identity: Identity) -> Result<FileTally> {
    let lines: Vec<&str> = output.lines().collect();
    let mut resolved: HashMap<String, String> = HashMap::new();
    let mut tally = FileTally::default();

    for (i, line) in lines.iter().enumerate() {
        if !is_commit_header(line) {
            continue;
        }

        // Guaranteed char boundary: the predicate checked 40 ASCII bytes.
        let commit = &line[..COMMIT_ID_LEN];
        let group_lines = parse_group_count(line)?;

        let author = match resolved.get(commit) {
            Some(author) => author.clone(),
            None => {
                let author = resolve_identity(&lines[i..], identity).ok_or_else(|| {
                    FameError::Parse(format!("no {}field after header of commit {commit}", identity.line_prefix()))
                })?;
                resolved.insert(commit.to_string(), author.clone());
                author
            }
        };

        tally.credit_lines(&author, commit, group_lines);
    }

    Ok(tally)
}

fn parse_group_count(header: &str) -> Result<usize> {
    let field = header.split(' ').nth(3).unwrap_or_default();
    field
        .parse()
        .map_err(|_| FameError::Parse(format!("bad line-group count in blame header `{header}`")))
}

/// Scans the metadata lines following a group header for the requested
/// identity line, stopping at the next header. `window` starts at the
/// header itself.
fn resolve_identity(window: &[&str], identity: Identity) -> Option<String> {
    window
        .iter()
        .skip(1)
        .take_while(|line| !is_commit_header(line))
        .find_map(|line| line.strip_prefix(identity.line_prefix()))
        .map(str::to_string)
}

/// Extracts the creation commit id and author name from `git log` output
/// for a file, used when blame reported nothing (empty files). Expects the
/// newest-first log to end with the creation commit; takes the first entry
/// the same way the original tooling does and reads its `Author:` header.
pub fn parse_creation_log(output: &str) -> Result<(String, String)> {
    let mut lines = output.lines();

    let first = lines
        .next()
        .ok_or_else(|| FameError::Parse("empty log output for file with no blame history".into()))?;
    let commit = first
        .strip_prefix("commit ")
        .and_then(|rest| rest.split_whitespace().next())
        .ok_or_else(|| FameError::Parse(format!("expected `commit <id>` in log output, got `{first}`")))?;

    // Header block ends at the first blank line. Merge commits insert a
    // `Merge:` line before `Author:`, so scan rather than index.
    let author_line = lines
        .take_while(|line| !line.is_empty())
        .find_map(|line| line.strip_prefix("Author: "))
        .ok_or_else(|| FameError::Parse("no `Author:` line in log output".into()))?;

    let name = match author_line.find(" <") {
        Some(idx) => &author_line[..idx],
        None => {
            return Err(FameError::Parse(format!(
                "malformed `Author:` line in log output: `{author_line}`"
            )))
        }
    };

    Ok((commit.to_string(), name.to_string()))
}

/// Marks the creation commit on an otherwise empty tally.
pub fn fallback_tally(author: String, commit: String) -> FileTally {
    let mut tally = FileTally::default();
    tally.credit_creation(author, commit);
    tally
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHA_A: &str = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
    const SHA_B: &str = "bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";

    fn porcelain_sample() -> String {
        // Two commits; SHA_A appears twice, with metadata only on its
        // first group, the way porcelain actually behaves.
        format!(
            "{SHA_A} 1 1 2\n\
             author Alice\n\
             author-mail <alice@example.com>\n\
             author-time 1700000000\n\
             author-tz +0000\n\
             committer Carol\n\
             committer-mail <carol@example.com>\n\
             committer-time 1700000000\n\
             committer-tz +0000\n\
             summary first\n\
             filename demo.txt\n\
             \tone\n\
             {SHA_A} 2 2\n\
             \ttwo\n\
             {SHA_B} 3 3 1\n\
             author Bob\n\
             author-mail <bob@example.com>\n\
             author-time 1700000100\n\
             author-tz +0000\n\
             committer Carol\n\
             committer-mail <carol@example.com>\n\
             committer-time 1700000100\n\
             committer-tz +0000\n\
             summary second\n\
             filename demo.txt\n\
             \tthree\n\
             {SHA_A} 4 4 1\n\
             \tfour\n"
        )
    }

    #[test]
    fn header_predicate_accepts_group_headers() {
        assert!(is_commit_header(&format!("{SHA_A} 1 1 2")));
        assert!(is_commit_header(&format!("{SHA_A} 10 20 117")));
    }

    #[test]
    fn header_predicate_rejects_short_and_three_field_lines() {
        // 46-byte threshold: `<sha> 1 1 2` is exactly 46, `<sha> 1 1` is 44
        assert!(!is_commit_header(&format!("{SHA_A} 1 1")));
        assert!(!is_commit_header(SHA_A));
        assert!(!is_commit_header(""));
    }

    #[test]
    fn header_predicate_rejects_metadata_and_content() {
        assert!(!is_commit_header("author Alice von Wolfsburg-Hammerstein"));
        assert!(!is_commit_header("committer-mail <carol@example.com> xx yy"));
        assert!(!is_commit_header("\tsome indented content line with many words in it"));
        // right shape but a non-hex byte inside the id field
        let mut bad = format!("{SHA_A} 1 1 2");
        bad.replace_range(12..13, "z");
        assert!(!is_commit_header(&bad));
    }

    #[test]
    fn parse_blame_tallies_lines_and_dedupes_commits() {
        let tally = parse_blame(&porcelain_sample(), Identity::Author).unwrap();
        let per_author = tally.into_per_author();

        let alice = &per_author["Alice"];
        assert_eq!(alice.lines, 3); // group of 2 + later group of 1
        assert_eq!(alice.commits.len(), 1);
        assert!(alice.commits.contains(SHA_A));

        let bob = &per_author["Bob"];
        assert_eq!(bob.lines, 1);
        assert_eq!(bob.commits.len(), 1);
    }

    #[test]
    fn line_totals_match_the_blamed_file() {
        let tally = parse_blame(&porcelain_sample(), Identity::Author).unwrap();
        let total: usize = tally.into_per_author().values().map(|t| t.lines).sum();
        assert_eq!(total, 4);
    }

    #[test]
    fn committer_mode_credits_the_committer() {
        let tally = parse_blame(&porcelain_sample(), Identity::Committer).unwrap();
        let per_author = tally.into_per_author();

        let carol = &per_author["Carol"];
        assert_eq!(carol.lines, 4);
        assert_eq!(carol.commits.len(), 2);
        assert!(!per_author.contains_key("Alice"));
    }

    #[test]
    fn empty_output_yields_empty_tally() {
        let tally = parse_blame("", Identity::Author).unwrap();
        assert!(tally.is_empty());
    }

    #[test]
    fn missing_identity_line_is_a_parse_error() {
        let output = format!("{SHA_A} 1 1 1\nsummary orphan header\n\tcontent\n");
        let err = parse_blame(&output, Identity::Author).unwrap_err();
        assert!(err.to_string().contains("author"));
    }

    #[test]
    fn bad_group_count_is_a_parse_error() {
        let output = format!("{SHA_A} 1 1 xyz12\nauthor Alice\n\tcontent\n");
        assert!(parse_blame(&output, Identity::Author).is_err());
    }

    #[test]
    fn creation_log_extracts_commit_and_author() {
        let log = format!(
            "commit {SHA_B}\n\
             Author: Bob <bob@x.com>\n\
             Date:   Mon Nov 13 00:00:00 2023 +0000\n\
             \n\
             \tadd empty placeholder\n"
        );
        let (commit, author) = parse_creation_log(&log).unwrap();
        assert_eq!(commit, SHA_B);
        assert_eq!(author, "Bob");
    }

    #[test]
    fn creation_log_skips_merge_header() {
        let log = format!(
            "commit {SHA_A}\n\
             Merge: 1234567 89abcde\n\
             Author: Alice <alice@x.com>\n\
             Date:   Mon Nov 13 00:00:00 2023 +0000\n\
             \n\
             \tmerge branch\n"
        );
        let (_, author) = parse_creation_log(&log).unwrap();
        assert_eq!(author, "Alice");
    }

    #[test]
    fn malformed_creation_log_is_an_error_not_a_panic() {
        assert!(parse_creation_log("").is_err());
        assert!(parse_creation_log("nonsense first line\n").is_err());
        assert!(parse_creation_log(&format!("commit {SHA_A}\nDate: whenever\n")).is_err());
        // author header without the expected ` <email>` tail
        assert!(parse_creation_log(&format!("commit {SHA_A}\nAuthor: Bob\n")).is_err());
    }

    #[test]
    fn fallback_tally_counts_one_commit_zero_lines() {
        let tally = fallback_tally("Bob".into(), SHA_B.into());
        let per_author = tally.into_per_author();
        let bob = &per_author["Bob"];
        assert_eq!(bob.lines, 0);
        assert_eq!(bob.commits.len(), 1);
    }
}
