//! Entity lookups over the car-feature relation table.

use anyhow::{Context, Result};
use std::path::Path;

use crate::models::RelationRecord;

/// Read-only relation store: `car --relation--> feature` edges.
pub struct GraphStore {
    rows: Vec<RelationRecord>,
}

impl GraphStore {
    /// Load the relation table from a CSV file (`car,feature,relation`).
    pub fn load(path: &Path) -> Result<Self> {
        let mut reader = csv::Reader::from_path(path)
            .with_context(|| format!("Failed to open relations table: {}", path.display()))?;

        let mut rows = Vec::new();
        for row in reader.deserialize() {
            let record: RelationRecord =
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

    /// Return every edge whose car name equals `car`, case-insensitively,
    /// in table order.
    pub fn query_by_car(&self, car: &str) -> Vec<RelationRecord> {
        self.rows
            .iter()
            .filter(|row| row.car.eq_ignore_ascii_case(car))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_relations_csv(dir: &TempDir) -> std::path::PathBuf {
        let path = dir.path().join("relations.csv");
        fs::write(
            &path,
            "car,feature,relation\n\
             Car A,High Mileage,has_feature\n\
             Car A,Comfort,has_feature\n\
             Car B,Suitable for Long Trips,has_feature\n",
        )
        .unwrap();
        path
    }

    #[test]
    fn test_exact_match_is_case_insensitive() {
        let tmp = TempDir::new().unwrap();
        let store = GraphStore::load(&write_relations_csv(&tmp)).unwrap();

        let edges = store.query_by_car("car a");
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[0].feature, "High Mileage");
        assert_eq!(edges[1].feature, "Comfort");
    }

    #[test]
    fn test_substring_does_not_match() {
        let tmp = TempDir::new().unwrap();
        let store = GraphStore::load(&write_relations_csv(&tmp)).unwrap();
        assert!(store.query_by_car("Car").is_empty());
    }

    #[test]
    fn test_unknown_car_returns_empty() {
        let tmp = TempDir::new().unwrap();
        let store = GraphStore::load(&write_relations_csv(&tmp)).unwrap();
        assert!(store.query_by_car("Car Z").is_empty());
    }
}
