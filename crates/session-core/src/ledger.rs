//! Budget-constrained allocation ledger. Each single-area change is
//! admitted against the incrementally tracked remaining budget, never by
//! re-summing a would-be final allocation; the order of edits therefore
//! decides which edit sequences are accepted.

use std::collections::BTreeMap;

use contracts::{ActionError, AllocationSummary, PolicyArea};

fn option_cost(option: u8) -> u32 {
    u32::from(option)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationLedger {
    total_budget: u32,
    selections: BTreeMap<PolicyArea, Option<u8>>,
}

impl AllocationLedger {
    pub fn new(total_budget: u32) -> Self {
        let selections = PolicyArea::ALL
            .iter()
            .map(|area| (*area, None))
            .collect::<BTreeMap<_, _>>();
        Self {
            total_budget,
            selections,
        }
    }

    pub fn total_budget(&self) -> u32 {
        self.total_budget
    }

    pub fn current_option(&self, area: PolicyArea) -> Option<u8> {
        self.selections.get(&area).copied().flatten()
    }

    pub fn current_usage(&self) -> u32 {
        self.selections
            .values()
            .flatten()
            .map(|option| option_cost(*option))
            .sum()
    }

    pub fn remaining_budget(&self) -> u32 {
        self.total_budget.saturating_sub(self.current_usage())
    }

    /// Commits `option` for `area` if the incremental cost change fits the
    /// remaining budget. Rejections leave the ledger untouched; success
    /// returns the updated remaining budget. Re-selecting the current
    /// option is a zero-delta success.
    pub fn set_option(&mut self, area: PolicyArea, option: u8) -> Result<u32, ActionError> {
        if !(1..=3).contains(&option) {
            return Err(ActionError::InvalidOption { value: option });
        }

        let current_cost = self.current_option(area).map(option_cost).unwrap_or(0);
        let delta = i64::from(option_cost(option)) - i64::from(current_cost);
        let remaining = self.remaining_budget();
        if delta > 0 && i64::from(remaining) < delta {
            return Err(ActionError::BudgetExceeded {
                remaining,
                requested_delta: delta as u32,
            });
        }

        self.selections.insert(area, Some(option));
        Ok(self.remaining_budget())
    }

    pub fn is_complete(&self) -> bool {
        self.selections.values().all(Option::is_some)
    }

    /// More than one distinct option level across the set areas. A single
    /// session-wide variety rule, not a per-pair constraint.
    pub fn has_mix(&self) -> bool {
        let mut seen = [false; 3];
        for option in self.selections.values().flatten() {
            seen[usize::from(*option) - 1] = true;
        }
        seen.iter().filter(|present| **present).count() > 1
    }

    /// Terminal acceptance predicate for a policy package. Only the budget
    /// rule is enforced eagerly in `set_option`; mix and completeness are
    /// checked when a client tries to leave a phase.
    pub fn is_valid(&self) -> bool {
        self.current_usage() <= self.total_budget && self.has_mix() && self.is_complete()
    }

    pub fn missing_areas(&self) -> Vec<PolicyArea> {
        self.selections
            .iter()
            .filter(|(_, option)| option.is_none())
            .map(|(area, _)| *area)
            .collect()
    }

    /// Set areas only; used for the final-policy report once complete.
    pub fn selected_policies(&self) -> BTreeMap<PolicyArea, u8> {
        self.selections
            .iter()
            .filter_map(|(area, option)| option.map(|value| (*area, value)))
            .collect()
    }

    pub fn option_counts(&self) -> BTreeMap<u8, usize> {
        let mut counts = BTreeMap::from([(1_u8, 0_usize), (2, 0), (3, 0)]);
        for option in self.selections.values().flatten() {
            *counts.entry(*option).or_insert(0) += 1;
        }
        counts
    }

    pub fn summary(&self) -> AllocationSummary {
        AllocationSummary {
            budget_used: self.current_usage(),
            budget_remaining: self.remaining_budget(),
            selections: self.selections.clone(),
            option_counts: self.option_counts(),
            is_complete: self.is_complete(),
            has_mix: self.has_mix(),
        }
    }

    /// Ordered human-readable diagnostics: budget status, then the mix
    /// warning, then the incomplete-area list. Pure; never mutates.
    pub fn feedback(&self) -> Vec<String> {
        let mut feedback = Vec::new();
        let used = self.current_usage();

        if used < self.total_budget {
            feedback.push(format!(
                "You have {} budget units remaining. Consider upgrading some policies.",
                self.remaining_budget()
            ));
        } else if used == self.total_budget {
            feedback.push("You have used your entire budget efficiently.".to_string());
        } else {
            feedback.push("WARNING: You have exceeded your budget limit!".to_string());
        }

        let any_set = self.selections.values().any(Option::is_some);
        if any_set && !self.has_mix() {
            feedback.push(
                "WARNING: You must choose a mix of policy options, not all from the same level."
                    .to_string(),
            );
        }

        if !self.is_complete() {
            let missing = self
                .missing_areas()
                .iter()
                .map(|area| area.label())
                .collect::<Vec<_>>()
                .join(", ");
            feedback.push(format!("You still need to make decisions for: {missing}"));
        }

        feedback
    }
}
