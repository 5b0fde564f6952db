//! Keyword lookups over the car usage-statistics table.

use anyhow::{Context, Result};
use std::path::Path;

use crate::models::StatRecord;

/// Read-only usage-statistics store.
pub struct StatStore {
    rows: Vec<StatRecord>,
}

impl StatStore {
    /// Load the statistics table from a CSV file
    /// (`car,trips,avg_km,fuel_type,maintenance_score`).
    pub fn load(path: &Path) -> Result<Self> {
        let mut reader = csv::Reader::from_path(path)
            .with_context(|| format!("Failed to open stats table: {}", path.display()))?;

        let mut rows = Vec::new();
        for row in reader.deserialize() {
            let record: StatRecord =
                row.with_context(|| format!("Malformed row in {}", path.display()))?;
            rows.push(record);
        }

        Ok(Self { rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Return every row whose car name contains `keyword`,
    /// case-insensitively, in table order. No limit is applied here; the
    /// relevance filter downstream does the truncation.
    pub fn query_by_keyword(&self, keyword: &str) -> Vec<StatRecord> {
        let needle = keyword.to_lowercase();
        self.rows
            .iter()
            .filter(|row| row.car.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }
}
