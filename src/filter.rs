//! Relevance filtering for tabular results.
//!
//! A statistics lookup can return every row in the table; feeding all of
//! them to the generator wastes tokens and dilutes signal. This module
//! scores each row for long-trip relevance and keeps only the top N. The
//! semantic and relation branches are never filtered — they are already
//! small and high-signal.

use crate::models::{ScoredStatRecord, StatRecord};

const AVG_KM_WEIGHT: f64 = 0.7;
const TRIP_WEIGHT: f64 = 10.0;

/// Score statistics rows and return the top `n` by descending score.
///
/// `score = avg_km * 0.7 + trips * 10`, rounded to two decimals and
/// attached to a copy of the row as `long_trip_score`. Rows whose numeric
/// columns fail to parse are dropped from the ranking, never surfaced as
/// errors. The sort is stable: rows with equal scores keep their table
/// order. Fewer than `n` survivors means fewer than `n` results.
pub fn rank_long_trips(records: &[StatRecord], n: usize) -> Vec<ScoredStatRecord> {
    let mut scored: Vec<ScoredStatRecord> = records
        .iter()
        .filter_map(|record| {
            let avg_km: f64 = match record.avg_km.trim().parse() {
                Ok(v) => v,
                Err(_) => {
                    tracing::debug!(car = %record.car, avg_km = %record.avg_km, "dropping unparsable row");
                    return None;
                }
            };
            let trips: f64 = match record.trips.trim().parse() {
                Ok(v) => v,
                Err(_) => {
                    tracing::debug!(car = %record.car, trips = %record.trips, "dropping unparsable row");
                    return None;
                }
            };

            let score = avg_km * AVG_KM_WEIGHT + trips * TRIP_WEIGHT;

            Some(ScoredStatRecord {
                car: record.car.clone(),
                trips: record.trips.clone(),
                avg_km: record.avg_km.clone(),
                fuel_type: record.fuel_type.clone(),
                maintenance_score: record.maintenance_score.clone(),
                long_trip_score: (score * 100.0).round() / 100.0,
            })
        })
        .collect();

    scored.sort_by(|a, b| {
        b.long_trip_score
            .partial_cmp(&a.long_trip_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    scored.truncate(n);
    scored
}
