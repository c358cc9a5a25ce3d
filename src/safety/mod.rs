//! Table-driven medication safety checks: look-alike/sound-alike names and
//! known drug-drug interactions. Pure lookups, no database access.

pub mod interactions;
pub mod lasa;

pub use interactions::{interaction_alerts, InteractionAlert, InteractionSeverity};
pub use lasa::{lasa_warnings, LasaWarning};

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SafetyReport {
    pub lasa_warnings: Vec<LasaWarning>,
    pub interactions: Vec<InteractionAlert>,
}

/// Trimmed, lowercased, sorted and deduplicated names. Blanks are dropped.
pub fn normalize_names(names: &[String]) -> Vec<String> {
    let mut normalized: Vec<String> = names
        .iter()
        .map(|n| n.trim().to_lowercase())
        .filter(|n| !n.is_empty())
        .collect();
    normalized.sort();
    normalized.dedup();
    normalized
}

/// Combined LASA and interaction check for a medication list.
pub fn check_medications(names: &[String]) -> SafetyReport {
    let normalized = normalize_names(names);
    SafetyReport {
        lasa_warnings: normalized.iter().flat_map(|n| lasa_warnings(n)).collect(),
        interactions: interaction_alerts(&normalized),
    }
}
