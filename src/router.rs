//! Query routing.
//!
//! Decides which fleet stores a question should consult and extracts an
//! optional target car name used to narrow the statistics and relation
//! lookups. Routing is deterministic keyword matching against named trigger
//! vocabularies; no model call is involved.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

/// Trigger words that route a question to the usage-statistics table.
pub const STAT_TRIGGERS: [&str; 6] = ["trip", "km", "distance", "average", "avg", "usage"];

/// Trigger words that route a question to the car-feature relations.
pub const RELATION_TRIGGERS: [&str; 5] = ["feature", "comfort", "relation", "best", "suitable"];

static CAR_NAME_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bCar\s+[A-Z]\b").unwrap());

/// The Router's decision for a single question.
///
/// At least one of the three store flags is true in every plan; a question
/// that matches nothing still retrieves broadly rather than not at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RetrievalPlan {
    pub use_semantic: bool,
    pub use_stats: bool,
    pub use_relations: bool,
    pub target_key: Option<String>,
}

/// Decide which stores to consult for a question.
///
/// Semantic search is always on — it is cheap and generally useful context.
/// The statistics and relation branches are keyed off their trigger
/// vocabularies, matched case-insensitively. When neither vocabulary hits,
/// both branches are enabled: absence of a signal defaults to breadth,
/// never to narrowness.
pub fn plan(question: &str) -> RetrievalPlan {
    let lower = question.to_lowercase();

    let mut use_stats = STAT_TRIGGERS.iter().any(|t| lower.contains(t));
    let mut use_relations = RELATION_TRIGGERS.iter().any(|t| lower.contains(t));

    if !use_stats && !use_relations {
        use_stats = true;
        use_relations = true;
    }

    RetrievalPlan {
        use_semantic: true,
        use_stats,
        use_relations,
        target_key: extract_target(question),
    }
}

/// Extract the first `Car <letter>` token from the question, left to right.
///
/// This is a naming-convention heuristic, not an entity recognizer: it
/// misses multi-word and lowercased car names. Interior whitespace in the
/// match is collapsed to a single space.
fn extract_target(question: &str) -> Option<String> {
    CAR_NAME_RE
        .find(question)
        .map(|m| m.as_str().split_whitespace().collect::<Vec<_>>().join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_triggers() {
        let plan = plan("What is the average distance for Car B on long trips?");
        assert!(plan.use_stats);
        assert!(plan.use_semantic);
        assert_eq!(plan.target_key, Some("Car B".to_string()));
    }

    #[test]
    fn test_relation_triggers() {
        let plan = plan("Which car has the best comfort features?");
        assert!(plan.use_relations);
        assert!(plan.use_semantic);
    }

    #[test]
    fn test_fallback_enables_both_branches() {
        let plan = plan("Tell me something interesting");
        assert!(plan.use_stats);
        assert!(plan.use_relations);
        assert!(plan.use_semantic);
    }

    #[test]
    fn test_every_plan_consults_at_least_one_store() {
        for question in [
            "",
            "hello",
            "average km?",
            "best features",
            "What is the usage of Car C?",
        ] {
            let plan = plan(question);
            assert!(
                plan.use_semantic || plan.use_stats || plan.use_relations,
                "plan for {:?} consults nothing",
                question
            );
        }
    }

    #[test]
    fn test_triggers_are_case_insensitive() {
        let plan = plan("AVERAGE DISTANCE?");
        assert!(plan.use_stats);
        assert!(!plan.use_relations);
    }

    #[test]
    fn test_first_target_wins() {
        let plan = plan("Compare Car A with Car B on comfort");
        assert_eq!(plan.target_key, Some("Car A".to_string()));
    }

    #[test]
    fn test_no_target_for_lowercase_names() {
        let plan = plan("is car b good for long trips?");
        assert_eq!(plan.target_key, None);
    }

    #[test]
    fn test_no_target_for_multiletter_suffix() {
        let plan = plan("what about Car Bravo?");
        assert_eq!(plan.target_key, None);
    }
}
