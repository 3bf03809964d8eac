//! Policy-package analysis: equity, justice, and coherence scores with
//! narrative bands, plus the who-benefits classification.

use contracts::{ActionError, PackageAnalysis, PolicyArea, ScoreReading, SCHEMA_VERSION_V1};

use crate::ledger::AllocationLedger;

/// Maximum weighted option sum: 7 areas at level 3. The equity score is
/// normalized by this so it stays in [1/3, 1].
const MAX_WEIGHTED_SUM: f64 = 21.0;

/// Sum of the three justice-critical areas at level 3.
const MAX_JUSTICE_SUM: f64 = 9.0;

const JUSTICE_CRITICAL_AREAS: [PolicyArea; 3] = [
    PolicyArea::AccessToEducation,
    PolicyArea::PsychosocialSupport,
    PolicyArea::Certification,
];

const COHERENCE_PAIRS: [(PolicyArea, PolicyArea); 3] = [
    (PolicyArea::AccessToEducation, PolicyArea::LanguageInstruction),
    (PolicyArea::TeacherTraining, PolicyArea::CurriculumAdaptation),
    (PolicyArea::FinancialSupport, PolicyArea::PsychosocialSupport),
];

/// Analyzes a completed allocation. An allocation with unset areas is an
/// `IncompletePackage` error; internal callers only reach this behind
/// completeness gates, so that path exists for direct API exposure.
pub fn analyze(ledger: &AllocationLedger) -> Result<PackageAnalysis, ActionError> {
    let missing = ledger.missing_areas();
    if !missing.is_empty() {
        return Err(ActionError::IncompletePackage { missing });
    }

    let policies = ledger.selected_policies();
    let counts = ledger.option_counts();
    let level = |area: PolicyArea| -> f64 { f64::from(policies[&area]) };

    let weighted_sum = counts
        .iter()
        .map(|(option, count)| f64::from(*option) * *count as f64)
        .sum::<f64>();
    let equity_score = weighted_sum / MAX_WEIGHTED_SUM;

    let justice_score = JUSTICE_CRITICAL_AREAS
        .iter()
        .map(|area| level(*area))
        .sum::<f64>()
        / MAX_JUSTICE_SUM;

    let mut coherence_points = 0.0;
    for (left, right) in COHERENCE_PAIRS {
        let difference = (level(left) - level(right)).abs();
        if difference == 0.0 {
            coherence_points += 1.0;
        } else if difference == 1.0 {
            coherence_points += 0.5;
        }
    }
    let coherence_score = coherence_points / COHERENCE_PAIRS.len() as f64;

    Ok(PackageAnalysis {
        schema_version: SCHEMA_VERSION_V1.to_string(),
        equity: ScoreReading {
            score: equity_score,
            narrative: equity_narrative(equity_score).to_string(),
        },
        justice: ScoreReading {
            score: justice_score,
            narrative: justice_narrative(justice_score).to_string(),
        },
        coherence: ScoreReading {
            score: coherence_score,
            narrative: coherence_narrative(coherence_score).to_string(),
        },
        benefit_narrative: benefit_narrative(equity_score, justice_score).to_string(),
        option_distribution: counts,
        budget_used: ledger.current_usage(),
        budget_remaining: ledger.remaining_budget(),
    })
}

// Band thresholds are strict: 0.7 and 0.5 themselves fall in the lower band.

fn equity_narrative(score: f64) -> &'static str {
    if score > 0.7 {
        "Your policy package strongly prioritizes equity and inclusion."
    } else if score > 0.5 {
        "Your policy package shows a moderate commitment to equity."
    } else {
        "Your policy package prioritizes minimal intervention over equity concerns."
    }
}

fn justice_narrative(score: f64) -> &'static str {
    if score > 0.7 {
        "Your decisions strongly support justice-oriented approaches to refugee education."
    } else if score > 0.5 {
        "Your decisions show some commitment to justice but with significant compromises."
    } else {
        "Your decisions prioritize system stability over transformative justice."
    }
}

fn coherence_narrative(score: f64) -> &'static str {
    if score > 0.7 {
        "Your policy choices are highly coherent and mutually reinforcing."
    } else if score > 0.5 {
        "Your policy choices show moderate coherence with some contradictions."
    } else {
        "Your policy choices contain significant contradictions that may undermine effectiveness."
    }
}

/// First match wins: the low-equity check shadows the refugee-centered one.
fn benefit_narrative(equity_score: f64, justice_score: f64) -> &'static str {
    if equity_score < 0.4 {
        "Your policy package primarily serves the interests of the state and existing citizens."
    } else if justice_score > 0.7 && equity_score > 0.6 {
        "Your policy package strongly centers refugee needs and rights."
    } else {
        "Your policy package attempts to balance state interests with some refugee needs."
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::DEFAULT_TOTAL_BUDGET;

    fn ledger_with(options: [u8; 7]) -> AllocationLedger {
        // 21-unit budget so any combination can be staged in tests; the
        // scoring itself is budget-agnostic.
        let mut ledger = AllocationLedger::new(21);
        for (area, option) in PolicyArea::ALL.into_iter().zip(options) {
            ledger.set_option(area, option).expect("test edit fits");
        }
        ledger
    }

    #[test]
    fn incomplete_allocation_is_rejected() {
        let ledger = AllocationLedger::new(DEFAULT_TOTAL_BUDGET);
        let err = analyze(&ledger).unwrap_err();
        match err {
            ActionError::IncompletePackage { missing } => {
                assert_eq!(missing.len(), PolicyArea::ALL.len());
            }
            other => panic!("expected IncompletePackage, got {other:?}"),
        }
    }

    #[test]
    fn spec_scenario_scores_land_in_documented_ranges() {
        // Allocation from the worked budget walk: usage 14, counts
        // {1: 2, 2: 3, 3: 2}.
        let ledger = ledger_with([3, 1, 3, 2, 2, 1, 2]);
        let analysis = analyze(&ledger).expect("complete allocation");

        assert!((analysis.equity.score - 14.0 / 21.0).abs() < 1e-12);
        // Critical areas: access 3, psychosocial 2, certification 2.
        assert!((analysis.justice.score - 7.0 / 9.0).abs() < 1e-12);
        // Pairs: (3,1) -> 0, (3,2) -> 0.5, (1,2) -> 0.5.
        assert!((analysis.coherence.score - 1.0 / 3.0).abs() < 1e-12);

        assert_eq!(analysis.option_distribution[&1], 2);
        assert_eq!(analysis.option_distribution[&2], 3);
        assert_eq!(analysis.option_distribution[&3], 2);
    }

    #[test]
    fn analysis_is_deterministic() {
        let ledger = ledger_with([2, 2, 1, 3, 2, 1, 3]);
        assert_eq!(
            analyze(&ledger).expect("complete"),
            analyze(&ledger).expect("complete")
        );
    }

    #[test]
    fn scores_stay_in_range_at_the_extremes() {
        let minimal = analyze(&ledger_with([1; 7])).expect("complete");
        assert!((minimal.equity.score - 1.0 / 3.0).abs() < 1e-12);
        assert!((minimal.justice.score - 1.0 / 3.0).abs() < 1e-12);
        assert!((minimal.coherence.score - 1.0).abs() < 1e-12);

        let comprehensive = analyze(&ledger_with([3; 7])).expect("complete");
        assert!((comprehensive.equity.score - 1.0).abs() < 1e-12);
        assert!((comprehensive.justice.score - 1.0).abs() < 1e-12);
        assert!((comprehensive.coherence.score - 1.0).abs() < 1e-12);
    }

    #[test]
    fn band_boundaries_are_strict() {
        // Justice exactly 0.5 must read as the low band, not the middle.
        // Critical sum 4.5 is unreachable with integers, so use coherence:
        // one equal pair and one adjacent pair score (1 + 0.5 + 0)/3 = 0.5.
        let analysis = analyze(&ledger_with([2, 2, 3, 2, 1, 3, 2])).expect("complete");
        assert!((analysis.coherence.score - 0.5).abs() < 1e-12);
        assert!(analysis.coherence.narrative.contains("significant contradictions"));
    }

    #[test]
    fn benefit_priority_low_equity_wins_first() {
        // All-1s: equity 1/3 < 0.4 even though coherence is perfect.
        let analysis = analyze(&ledger_with([1; 7])).expect("complete");
        assert!(analysis
            .benefit_narrative
            .contains("interests of the state and existing citizens"));

        // High justice in the critical areas plus high equity overall.
        let refugee_centered = analyze(&ledger_with([3, 1, 3, 2, 2, 1, 2])).expect("complete");
        assert!(refugee_centered
            .benefit_narrative
            .contains("centers refugee needs"));

        // All-2s: equity clears 0.4 but justice misses the 0.7 bar.
        let balanced = analyze(&ledger_with([2; 7])).expect("complete");
        assert!(balanced.benefit_narrative.contains("balance state interests"));
    }
}
