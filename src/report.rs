//! Serialization of the ranked author list. Every renderer takes the
//! already-ranked records and a writer; nothing here reorders or mutates.

use crate::config::Format;
use crate::error::Result;
use crate::model::AuthorStats;
use comfy_table::{presets, Table};
use std::borrow::Cow;
use std::io::Write;

const HEADER: [&str; 4] = ["Name", "Lines", "Commits", "Files"];

pub fn render(stats: &[AuthorStats], format: Format, out: &mut impl Write) -> Result<()> {
    match format {
        Format::Tabular => render_tabular(stats, out),
        Format::Csv => render_csv(stats, out),
        Format::Json => render_json(stats, out),
        Format::JsonLines => render_json_lines(stats, out),
    }
}

fn render_tabular(stats: &[AuthorStats], out: &mut impl Write) -> Result<()> {
    let mut table = Table::new();
    table.load_preset(presets::NOTHING).set_header(HEADER);
    for column in table.column_iter_mut() {
        column.set_padding((0, 1));
    }

    for stat in stats {
        table.add_row(vec![
            stat.name.clone(),
            stat.lines.to_string(),
            stat.commits.to_string(),
            stat.files.to_string(),
        ]);
    }

    writeln!(out, "{table}")?;
    Ok(())
}

fn render_csv(stats: &[AuthorStats], out: &mut impl Write) -> Result<()> {
    writeln!(out, "{}", HEADER.join(","))?;
    for stat in stats {
        writeln!(
            out,
            "{},{},{},{}",
            csv_field(&stat.name),
            stat.lines,
            stat.commits,
            stat.files
        )?;
    }
    Ok(())
}

fn render_json(stats: &[AuthorStats], out: &mut impl Write) -> Result<()> {
    writeln!(out, "{}", serde_json::to_string(stats)?)?;
    Ok(())
}

fn render_json_lines(stats: &[AuthorStats], out: &mut impl Write) -> Result<()> {
    for stat in stats {
        writeln!(out, "{}", serde_json::to_string(stat)?)?;
    }
    Ok(())
}

/// Quotes a field when it contains a delimiter, quote or newline.
fn csv_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}
