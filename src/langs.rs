//! Language name to file-extension resolution, backed by a table embedded
//! at compile time. Unknown names are reported back to the caller instead
//! of failing the run.

use crate::error::Result;
use serde::Deserialize;

static LANGUAGE_TABLE: &str = include_str!("langs/languages.json");

#[derive(Debug, Deserialize)]
struct LanguageEntry {
    name: String,
    extensions: Vec<String>,
}

/// Extensions resolved from the requested language names, plus the names
/// the table does not know (warned about, never fatal).
#[derive(Debug, Default)]
pub struct Resolution {
    pub extensions: Vec<String>,
    pub unknown: Vec<String>,
}

/// Case-insensitive lookup of each requested language name.
pub fn resolve(languages: &[String]) -> Result<Resolution> {
    let table: Vec<LanguageEntry> = serde_json::from_str(LANGUAGE_TABLE)?;

    let mut resolution = Resolution::default();
    for requested in languages {
        let entry = table
            .iter()
            .find(|e| e.name.eq_ignore_ascii_case(requested));
        match entry {
            Some(entry) => resolution.extensions.extend(entry.extensions.iter().cloned()),
            None => resolution.unknown.push(requested.clone()),
        }
    }

    Ok(resolution)
}
