//! Discussion-dynamics analysis: per-speaker contribution counts and the
//! dominant/silenced voice flags derived from them.

use std::collections::BTreeMap;

use contracts::{DiscussionEntry, DynamicsReport};

const DOMINANT_SHARE: f64 = 0.7;
const SILENCED_SHARE: f64 = 0.3;

/// Counts statements per speaker. The roster seeds zero counts so silent
/// participants still appear in the report; an empty log yields empty
/// dominant/silenced sets (max == 0 never divides anything).
pub fn analyze_dynamics(entries: &[DiscussionEntry], roster: &[String]) -> DynamicsReport {
    let mut contribution_counts = roster
        .iter()
        .map(|speaker| (speaker.clone(), 0_usize))
        .collect::<BTreeMap<_, _>>();

    let mut total_exchanges = 0;
    for entry in entries {
        if entry.statement.is_none() {
            continue;
        }
        total_exchanges += 1;
        if let Some(speaker) = entry.speaker.as_ref() {
            *contribution_counts.entry(speaker.clone()).or_insert(0) += 1;
        }
    }

    let max_count = contribution_counts.values().copied().max().unwrap_or(0);
    let (dominant_voices, silenced_voices) = if max_count == 0 {
        (Vec::new(), Vec::new())
    } else {
        let dominant_floor = DOMINANT_SHARE * max_count as f64;
        let silenced_ceiling = SILENCED_SHARE * max_count as f64;
        let dominant = contribution_counts
            .iter()
            .filter(|(_, count)| **count as f64 > dominant_floor)
            .map(|(speaker, _)| speaker.clone())
            .collect();
        let silenced = contribution_counts
            .iter()
            .filter(|(_, count)| **count > 0 && (**count as f64) < silenced_ceiling)
            .map(|(speaker, _)| speaker.clone())
            .collect();
        (dominant, silenced)
    };

    DynamicsReport {
        contribution_counts,
        dominant_voices,
        silenced_voices,
        total_exchanges,
    }
}
