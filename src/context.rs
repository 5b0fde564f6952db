//! Evidence context assembly.
//!
//! Merges the question and the retrieved records into the single text
//! block handed to the generator. Section order is fixed and empty
//! sections are omitted entirely (no header, no placeholder); the
//! generation prompt depends on both behaviors.

use crate::models::{DocRecord, RelationRecord, ScoredStatRecord};

/// Assemble the evidence context for one question.
///
/// Sections, in order, each present only when non-empty:
/// 1. the question, restated verbatim
/// 2. `[CAR STATS]` — one summary line per statistics row
/// 3. `[CAR DESCRIPTIONS]` — the text of each matched description
/// 4. `[CAR FEATURES]` — one `car --relation--> feature` line per edge
///
/// With all three collections empty the output is just the restated
/// question.
pub fn assemble(
    question: &str,
    docs: &[DocRecord],
    stats: &[ScoredStatRecord],
    relations: &[RelationRecord],
) -> String {
    let mut parts = vec![format!("User Question: {}\n", question)];

    if !stats.is_empty() {
        parts.push("\n[CAR STATS]\n".to_string());
        for row in stats {
            parts.push(format!(
                "- {}: trips={}, avg_km={}, fuel_type={}, maintenance_score={}, long_trip_score={}\n",
                row.car,
                row.trips,
                row.avg_km,
                row.fuel_type,
                row.maintenance_score,
                row.long_trip_score
            ));
        }
    }

    if !docs.is_empty() {
        parts.push("\n[CAR DESCRIPTIONS]\n".to_string());
        for doc in docs {
            parts.push(format!("- {}\n", doc.text));
        }
    }

    if !relations.is_empty() {
        parts.push("\n[CAR FEATURES]\n".to_string());
        for rel in relations {
            parts.push(format!("- {} --{}--> {}\n", rel.car, rel.relation, rel.feature));
        }
    }

    parts.concat()
}
