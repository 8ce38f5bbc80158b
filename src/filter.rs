use crate::error::Result;
use glob::{MatchOptions, Pattern};

/// Decides which repository paths take part in the computation. Pure and
/// deterministic: a path passes the extension allow-list, must not match any
/// exclude pattern, and (when the restrict-to list is non-empty) must match
/// at least one restrict-to pattern.
#[derive(Debug)]
pub struct FileFilter {
    extensions: Vec<String>,
    excludes: Vec<Pattern>,
    restrict_to: Vec<Pattern>,
}

// `*` must not cross `/`; patterns are matched against the whole
// repository-relative path.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

impl FileFilter {
    pub fn new(extensions: &[String], excludes: &[String], restrict_to: &[String]) -> Result<Self> {
        Ok(Self {
            extensions: extensions.to_vec(),
            excludes: compile(excludes)?,
            restrict_to: compile(restrict_to)?,
        })
    }

    /// Keeps the paths that survive all three checks, dropping empty entries
    /// from the enumeration output.
    pub fn apply(&self, files: Vec<String>) -> Vec<String> {
        files
            .into_iter()
            .filter(|f| !f.is_empty() && self.keep(f))
            .collect()
    }

    pub fn keep(&self, path: &str) -> bool {
        self.has_extension(path)
            && !matches_any(path, &self.excludes)
            && (self.restrict_to.is_empty() || matches_any(path, &self.restrict_to))
    }

    fn has_extension(&self, path: &str) -> bool {
        self.extensions.is_empty() || self.extensions.iter().any(|ext| path.ends_with(ext))
    }
}

fn compile(patterns: &[String]) -> Result<Vec<Pattern>> {
    patterns.iter().map(|p| Ok(Pattern::new(p)?)).collect()
}

fn matches_any(path: &str, patterns: &[Pattern]) -> bool {
    patterns.iter().any(|pattern| {
        if pattern.matches_with(path, MATCH_OPTIONS) {
            return true;
        }
        // Legacy convenience: `foo/*` also excludes everything under `foo`,
        // even though `*` itself does not cross path separators.
        match pattern.as_str().strip_suffix("/*") {
            Some(prefix) => path.starts_with(prefix),
            None => false,
        }
    })
}
