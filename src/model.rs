use serde::Serialize;

/// One row of the final report: a single author identity with its
/// accumulated totals. `commits` is the size of the de-duplicated set of
/// commit ids credited to the author, never a per-line or per-file count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorStats {
    pub name: String,
    pub lines: usize,
    pub commits: usize,
    pub files: usize,
}
