//! Observation loading from JSON array or JSON Lines input

use anyhow::{Context, Result};
use std::fs;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};
use crate::types::RawObservation;

/// Parsed input plus the JSONL lines that could not be read as records.
#[derive(Debug, Clone, Default)]
pub struct InputBatch {
    pub records: Vec<RawObservation>,
    pub skipped_lines: Vec<usize>,
}

/// A document starting with `[` is read as one JSON array and must parse as
/// a whole. Anything else is JSON Lines: blank lines are ignored and a
/// malformed line is skipped and reported without stopping the read.
pub fn parse_observations(content: &str) -> Result<InputBatch> {
    let trimmed = content.trim_start();
    if trimmed.starts_with('[') {
        let records: Vec<RawObservation> =
            serde_json::from_str(trimmed).context("Failed to parse observation array")?;
        return Ok(InputBatch { records, skipped_lines: Vec::new() });
    }

    let mut batch = InputBatch::default();
    for (idx, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<RawObservation>(line) {
            Ok(record) => batch.records.push(record),
            Err(e) => {
                warn!(line = idx + 1, error = %e, "Skipping malformed observation");
                batch.skipped_lines.push(idx + 1);
            }
        }
    }
    Ok(batch)
}

pub fn read_observations<R: Read>(mut reader: R) -> Result<InputBatch> {
    let mut content = String::new();
    reader
        .read_to_string(&mut content)
        .context("Failed to read observations")?;
    parse_observations(&content)
}

pub fn read_observations_file(path: impl AsRef<Path>) -> Result<InputBatch> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to open input file {}", path.display()))?;
    let batch = parse_observations(&content)?;
    info!(
        path = %path.display(),
        records = batch.records.len(),
        skipped = batch.skipped_lines.len(),
        "Loaded observations"
    );
    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn reads_json_array() {
        let input = r#"[
            {"productId": "B01", "marketCode": "IT", "grossPrice": 19.99},
            {"productId": "B01", "marketCode": "DE", "grossPrice": "24.50", "salesRank": 1200}
        ]"#;
        let batch = parse_observations(input).unwrap();
        assert_eq!(batch.records.len(), 2);
        assert_eq!(batch.records[1].gross_price, dec!(24.50));
        assert_eq!(batch.records[1].sales_rank, Some(1200));
    }

    #[test]
    fn reads_json_lines_and_skips_bad_ones() {
        let input = concat!(
            r#"{"productId": "B01", "marketCode": "IT", "grossPrice": 10}"#, "\n",
            "\n",
            "{not json}\n",
            r#"{"productId": "B02", "marketCode": "FR", "grossPrice": 12.5, "prices": {"buyBox": 11.0}}"#, "\n",
        );
        let batch = read_observations(input.as_bytes()).unwrap();
        assert_eq!(batch.records.len(), 2);
        assert_eq!(batch.skipped_lines, vec![3]);
        assert_eq!(batch.records[1].prices.buy_box, Some(dec!(11.0)));
    }

    #[test]
    fn broken_array_is_an_error() {
        assert!(parse_observations(r#"[{"productId": "B01"}"#).is_err());
    }
}
