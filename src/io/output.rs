//! Outcome export as JSON Lines

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;
use crate::types::{FlatOpportunity, ProductFailure, ProductOutcome};

#[derive(Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
enum OutputLine<'a> {
    Ok(FlatOpportunity),
    Failed(&'a ProductFailure),
}

/// One JSON object per product: the flattened record, or the failure marker.
pub fn write_outcomes<W: Write>(writer: &mut W, outcomes: &[ProductOutcome]) -> Result<usize> {
    for outcome in outcomes {
        let line = match &outcome.result {
            Ok(record) => OutputLine::Ok(record.flatten()),
            Err(failure) => OutputLine::Failed(failure),
        };
        writeln!(writer, "{}", serde_json::to_string(&line)?)?;
    }
    writer.flush()?;
    Ok(outcomes.len())
}

pub fn save_outcomes(path: impl AsRef<Path>, outcomes: &[ProductOutcome]) -> Result<usize> {
    let path = path.as_ref();
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
        .with_context(|| format!("Failed to create output file {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    let written = write_outcomes(&mut writer, outcomes)?;

    info!(path = %path.display(), outcomes = written, "Saved analysis results");
    Ok(written)
}

/// Dated default location under `output/results`.
pub fn default_output_path() -> PathBuf {
    PathBuf::from(format!(
        "output/results/opportunities_{}.jsonl",
        Utc::now().format("%Y-%m-%d_%H%M%S")
    ))
}

pub fn write_summary_file(path: impl AsRef<Path>, summary: &impl Serialize) -> Result<()> {
    let file = File::create(path.as_ref())?;
    serde_json::to_writer_pretty(file, summary)?;
    Ok(())
}
