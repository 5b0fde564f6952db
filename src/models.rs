//! Core data models used throughout Fleetwise.
//!
//! One record type per store kind. Rows are converted into these types at
//! the store boundary, immediately after reading the underlying table;
//! nothing downstream ever sees a loosely-typed row.

use serde::{Deserialize, Serialize};

/// A vehicle description row from the semantic document store.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DocRecord {
    pub id: i64,
    pub text: String,
    pub category: String,
}

/// A raw usage-statistics row from the tabular store.
///
/// The numeric columns stay as raw strings on purpose: a malformed cell is
/// tolerated at load time and only excluded later, when the relevance
/// filter tries to parse it.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StatRecord {
    pub car: String,
    pub trips: String,
    pub avg_km: String,
    pub fuel_type: String,
    pub maintenance_score: String,
}

/// A statistics row that survived relevance scoring.
///
/// Carries a copy of the original fields plus the derived score; the
/// source record is never mutated.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredStatRecord {
    pub car: String,
    pub trips: String,
    pub avg_km: String,
    pub fuel_type: String,
    pub maintenance_score: String,
    pub long_trip_score: f64,
}

/// A car-to-feature edge from the relation store.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RelationRecord {
    pub car: String,
    pub feature: String,
    pub relation: String,
}
