//! Projection output: CSV table, JSON document, console table.
//!
//! Files are written to a temporary sibling and renamed into place, so an
//! existing output is only ever replaced by a complete new one.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use season_core::report::ProbabilityValue;
use season_core::SeasonProjectionRow;
use serde::Serialize;

fn temp_sibling(path: &Path) -> PathBuf {
    let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    path.with_file_name(format!(".{}.tmp", name))
}

/// An output written to its temporary sibling, waiting to be renamed.
#[derive(Debug)]
struct StagedFile {
    tmp: PathBuf,
    dest: PathBuf,
}

fn stage_file(path: &Path, bytes: &[u8]) -> Result<StagedFile> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
        }
    }

    let tmp = temp_sibling(path);
    if let Err(err) = fs::write(&tmp, bytes) {
        let _ = fs::remove_file(&tmp);
        return Err(err).with_context(|| format!("Failed to write temporary file: {}", tmp.display()));
    }
    Ok(StagedFile { tmp, dest: path.to_path_buf() })
}

fn discard(staged: &[StagedFile]) {
    for file in staged {
        let _ = fs::remove_file(&file.tmp);
    }
}

/// Replace several outputs together.
///
/// Every output is written to a temporary sibling first. If any of those
/// writes fails the temporaries are removed and no destination is touched.
pub fn replace_files(outputs: &[(&Path, Vec<u8>)]) -> Result<()> {
    let mut staged = Vec::with_capacity(outputs.len());
    for (path, bytes) in outputs {
        match stage_file(path, bytes) {
            Ok(file) => staged.push(file),
            Err(err) => {
                discard(&staged);
                return Err(err);
            }
        }
    }

    for (idx, file) in staged.iter().enumerate() {
        if let Err(err) = fs::rename(&file.tmp, &file.dest) {
            discard(&staged[idx..]);
            return Err(err).with_context(|| format!("Failed to replace output file: {}", file.dest.display()));
        }
    }
    Ok(())
}

/// Write `bytes` to `path` via a temporary file and rename.
pub fn replace_file(path: &Path, bytes: &[u8]) -> Result<()> {
    replace_files(&[(path, bytes.to_vec())])
}

pub fn projection_csv_bytes(rows: &[SeasonProjectionRow]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row).context("Failed to serialize projection row")?;
    }
    writer.into_inner().context("Failed to flush projection CSV")
}

pub fn json_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    serde_json::to_vec_pretty(value).context("Failed to serialize JSON output")
}

pub fn write_projection_csv(path: &Path, rows: &[SeasonProjectionRow]) -> Result<()> {
    replace_file(path, &projection_csv_bytes(rows)?)
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    replace_file(path, &json_bytes(value)?)
}

fn cell(value: &ProbabilityValue) -> String {
    match value {
        ProbabilityValue::Fraction(p) => format!("{:.3}", p),
        ProbabilityValue::Percent(s) => s.clone(),
    }
}

/// Fixed-width table for the console.
pub fn format_table(season: &str, rows: &[SeasonProjectionRow]) -> String {
    let width = rows.iter().map(|r| r.team.len()).max().unwrap_or(4).max(4);
    let rule = "=".repeat(width + 58);

    let mut out = String::new();
    out.push_str(&format!("{}\nPROJECTED FINAL STANDINGS - SEASON {}\n{}\n", rule, season, rule));
    out.push_str(&format!(
        "{:>3}  {:<width$}  {:>7}  {:>8}  {:>6}  {:>8}  {:>8}  {:>8}\n",
        "#", "Team", "Current", "Expected", "Likely", "Title", "Top", "Releg",
        width = width
    ));
    for (idx, row) in rows.iter().enumerate() {
        out.push_str(&format!(
            "{:>3}  {:<width$}  {:>7}  {:>8.1}  {:>6}  {:>8}  {:>8}  {:>8}\n",
            idx + 1,
            row.team,
            row.current_points,
            row.expected_points,
            row.most_likely_position,
            cell(&row.prob_title),
            cell(&row.prob_top4),
            cell(&row.prob_relegation),
            width = width
        ));
    }
    out
}
