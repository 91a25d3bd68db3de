use std::path::Path;

use anyhow::{bail, Context, Result};

pub mod geography;

pub use geography::{is_valid_state, state_fips, STATE_ABBREVIATIONS};

const STATE_COLUMN: &str = "FAC_STATE";
const COUNTY_COLUMN: &str = "County";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceRow {
    pub state: String,
    pub county: String,
}

/// The state/county lookup table backing the selection controls. Built once
/// at startup from the reference CSV, filtered to valid U.S. abbreviations,
/// and shared read-only for the process lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceTable {
    rows: Vec<ReferenceRow>,
}

impl ReferenceTable {
    /// Read and filter the reference CSV. An unreadable file or a missing
    /// `FAC_STATE`/`County` column is fatal; the process has nothing to
    /// select from without this table.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = csv::Reader::from_path(path)
            .with_context(|| format!("failed to open reference table '{}'", path.display()))?;

        let headers = reader
            .headers()
            .with_context(|| format!("failed to read headers of '{}'", path.display()))?;
        let state_idx = column_index(headers, STATE_COLUMN, path)?;
        let county_idx = column_index(headers, COUNTY_COLUMN, path)?;

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record
                .with_context(|| format!("failed to read reference row in '{}'", path.display()))?;
            let state = record.get(state_idx).unwrap_or_default().trim();
            let county = record.get(county_idx).unwrap_or_default().trim();
            if county.is_empty() || !geography::is_valid_state(state) {
                continue;
            }
            rows.push(ReferenceRow {
                state: state.to_string(),
                county: county.to_string(),
            });
        }

        Ok(Self { rows })
    }

    /// Build a table from in-memory rows, applying the same invalid-state
    /// filter as `load`.
    pub fn from_rows(rows: impl IntoIterator<Item = ReferenceRow>) -> Self {
        Self {
            rows: rows
                .into_iter()
                .filter(|row| geography::is_valid_state(&row.state))
                .collect(),
        }
    }

    /// Sorted, de-duplicated abbreviations of every state present.
    pub fn states(&self) -> Vec<String> {
        let mut states: Vec<String> = self.rows.iter().map(|row| row.state.clone()).collect();
        states.sort();
        states.dedup();
        states
    }

    /// County names of one state, de-duplicated in first-appearance order.
    pub fn counties_in(&self, state: &str) -> Vec<String> {
        let mut counties = Vec::new();
        for row in self.rows.iter().filter(|row| row.state == state) {
            if !counties.contains(&row.county) {
                counties.push(row.county.clone());
            }
        }
        counties
    }

    pub fn contains_state(&self, state: &str) -> bool {
        self.rows.iter().any(|row| row.state == state)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn column_index(headers: &csv::StringRecord, name: &str, path: &Path) -> Result<usize> {
    match headers.iter().position(|header| header == name) {
        Some(idx) => Ok(idx),
        None => bail!(
            "reference table '{}' is missing the '{}' column",
            path.display(),
            name
        ),
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
