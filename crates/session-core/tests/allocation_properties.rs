use contracts::{ActionError, PolicyArea, DEFAULT_TOTAL_BUDGET};
use proptest::prelude::*;
use session_core::analyzer::analyze;
use session_core::ledger::AllocationLedger;

fn arbitrary_edit() -> impl Strategy<Value = (usize, u8)> {
    // Area index and an option that may be out of range, so invalid input
    // rejection is exercised alongside budget admission.
    (0..PolicyArea::ALL.len(), 0_u8..5)
}

proptest! {
    #[test]
    fn usage_never_exceeds_budget(edits in proptest::collection::vec(arbitrary_edit(), 0..64)) {
        let mut ledger = AllocationLedger::new(DEFAULT_TOTAL_BUDGET);
        for (area_index, option) in edits {
            let _ = ledger.set_option(PolicyArea::ALL[area_index], option);
            prop_assert!(ledger.current_usage() <= DEFAULT_TOTAL_BUDGET);
        }
    }

    #[test]
    fn accounting_identity_always_holds(edits in proptest::collection::vec(arbitrary_edit(), 0..64)) {
        let mut ledger = AllocationLedger::new(DEFAULT_TOTAL_BUDGET);
        for (area_index, option) in edits {
            let _ = ledger.set_option(PolicyArea::ALL[area_index], option);
            prop_assert_eq!(
                ledger.current_usage() + ledger.remaining_budget(),
                DEFAULT_TOTAL_BUDGET
            );
        }
    }

    #[test]
    fn rejected_edits_are_observable_no_ops(edits in proptest::collection::vec(arbitrary_edit(), 0..64)) {
        let mut ledger = AllocationLedger::new(DEFAULT_TOTAL_BUDGET);
        for (area_index, option) in edits {
            let before = ledger.summary();
            if ledger.set_option(PolicyArea::ALL[area_index], option).is_err() {
                prop_assert_eq!(ledger.summary(), before.clone());
            }
        }
    }

    #[test]
    fn reselecting_the_current_option_never_moves_the_budget(
        edits in proptest::collection::vec(arbitrary_edit(), 1..32)
    ) {
        let mut ledger = AllocationLedger::new(DEFAULT_TOTAL_BUDGET);
        for (area_index, option) in edits {
            let area = PolicyArea::ALL[area_index];
            if ledger.set_option(area, option).is_ok() {
                let remaining = ledger.remaining_budget();
                prop_assert_eq!(ledger.set_option(area, option), Ok(remaining));
            }
        }
    }

    #[test]
    fn validity_matches_its_three_conjuncts(edits in proptest::collection::vec(arbitrary_edit(), 0..64)) {
        let mut ledger = AllocationLedger::new(DEFAULT_TOTAL_BUDGET);
        for (area_index, option) in edits {
            let _ = ledger.set_option(PolicyArea::ALL[area_index], option);
        }
        let expected = ledger.is_complete()
            && ledger.has_mix()
            && ledger.current_usage() <= DEFAULT_TOTAL_BUDGET;
        prop_assert_eq!(ledger.is_valid(), expected);
    }

    #[test]
    fn analysis_of_complete_packages_stays_in_range(options in proptest::array::uniform7(1_u8..=3)) {
        // A 21-unit staging budget admits any combination; scores do not
        // depend on the budget itself.
        let mut ledger = AllocationLedger::new(21);
        for (area, option) in PolicyArea::ALL.into_iter().zip(options) {
            ledger.set_option(area, option).expect("staging budget fits all");
        }

        let analysis = analyze(&ledger).expect("complete package");
        prop_assert!((1.0 / 3.0..=1.0).contains(&analysis.equity.score));
        prop_assert!((1.0 / 3.0..=1.0).contains(&analysis.justice.score));
        prop_assert!((0.0..=1.0).contains(&analysis.coherence.score));

        let repeat = analyze(&ledger).expect("complete package");
        prop_assert_eq!(analysis, repeat);
    }
}

#[test]
fn incomplete_packages_name_their_missing_areas() {
    let mut ledger = AllocationLedger::new(DEFAULT_TOTAL_BUDGET);
    ledger
        .set_option(PolicyArea::AccessToEducation, 2)
        .expect("fits");

    match analyze(&ledger) {
        Err(ActionError::IncompletePackage { missing }) => {
            assert_eq!(missing.len(), 6);
            assert!(!missing.contains(&PolicyArea::AccessToEducation));
        }
        other => panic!("expected IncompletePackage, got {other:?}"),
    }
}
