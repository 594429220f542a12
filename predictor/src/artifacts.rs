//! Model artifacts loaded at startup
//!
//! `feature_columns.json` fixes the model's input order; `X_train.csv`
//! supplies the per-column means used as the baseline for every feature
//! the caller does not provide.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use crate::error::{PredictorError, PredictorResult};

pub const FEATURE_COLUMNS_FILE: &str = "feature_columns.json";
pub const TRAINING_DATA_FILE: &str = "X_train.csv";

#[derive(Debug, Clone, PartialEq)]
pub struct ModelArtifacts {
    columns: Vec<String>,
    baseline: Vec<f64>,
}

impl ModelArtifacts {
    /// Columns are taken as given; columns without a mean start at zero
    pub fn from_means(columns: Vec<String>, means: &HashMap<String, f64>) -> Self {
        let baseline = columns
            .iter()
            .map(|column| means.get(column).copied().unwrap_or(0.0))
            .collect();
        Self { columns, baseline }
    }

    pub fn load(dir: &Path) -> PredictorResult<Self> {
        let columns_path = dir.join(FEATURE_COLUMNS_FILE);
        let columns: Vec<String> =
            serde_json::from_reader(std::fs::File::open(&columns_path)?)?;
        if columns.is_empty() {
            return Err(PredictorError::Artifact(format!(
                "{} lists no columns",
                columns_path.display()
            )));
        }

        let means = column_means(std::fs::File::open(dir.join(TRAINING_DATA_FILE))?)?;
        for column in columns.iter().filter(|c| !means.contains_key(*c)) {
            tracing::warn!(%column, "Feature column missing from training data; using 0");
        }

        tracing::info!(
            columns = columns.len(),
            dir = %dir.display(),
            "Model artifacts loaded"
        );
        Ok(Self::from_means(columns, &means))
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn baseline(&self) -> &[f64] {
        &self.baseline
    }
}

fn parse_cell(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    // One-hot columns may be written as booleans
    if raw.eq_ignore_ascii_case("true") {
        Some(1.0)
    } else if raw.eq_ignore_ascii_case("false") {
        Some(0.0)
    } else {
        raw.parse().ok()
    }
}

/// Mean of every column in a headed CSV; blank cells are skipped
pub fn column_means<R: Read>(reader: R) -> PredictorResult<HashMap<String, f64>> {
    let mut csv = csv::Reader::from_reader(reader);
    let headers = csv.headers()?.clone();
    let mut sums = vec![(0.0_f64, 0_u64); headers.len()];

    for (row, record) in csv.records().enumerate() {
        let record = record?;
        for (index, cell) in record.iter().enumerate() {
            if cell.trim().is_empty() {
                continue;
            }
            let value = parse_cell(cell).ok_or_else(|| {
                PredictorError::Artifact(format!(
                    "Row {} column '{}' is not numeric: {}",
                    row + 1,
                    headers.get(index).unwrap_or("?"),
                    cell
                ))
            })?;
            if let Some(slot) = sums.get_mut(index) {
                slot.0 += value;
                slot.1 += 1;
            }
        }
    }

    if sums.iter().all(|(_, count)| *count == 0) {
        return Err(PredictorError::Artifact("Training data has no rows".to_string()));
    }

    Ok(headers
        .iter()
        .zip(sums)
        .filter(|(_, (_, count))| *count > 0)
        .map(|(header, (sum, count))| (header.to_string(), sum / count as f64))
        .collect())
}
