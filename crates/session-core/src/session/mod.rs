//! The deliberation session: phase machine, per-phase allocations, roster,
//! and the append-only discussion log.

use std::collections::BTreeMap;
use std::fmt;

mod actions;
mod log;

use contracts::{
    ActionError, AllocationSummary, DiscussionEntry, ParticipantProfile, Phase, PolicyArea,
    SessionConfig, SessionStatus, HUMAN_SPEAKER_ID, SCHEMA_VERSION_V1,
};

use crate::ledger::AllocationLedger;
use crate::preference::generate_preferences;
use crate::profile::generate_profiles;
use crate::statement::{CannedStatementGenerator, StatementGenerator};

pub struct DeliberationSession {
    config: SessionConfig,
    phase: Phase,
    current_topic: Option<PolicyArea>,
    /// Private warm-up allocation; discarded when the group phase begins.
    human_allocation: AllocationLedger,
    /// The allocation that counts: decided topic by topic in the group
    /// phase, analyzed in reflection.
    group_allocation: AllocationLedger,
    discussion_log: Vec<DiscussionEntry>,
    profiles: Vec<ParticipantProfile>,
    preferences: BTreeMap<String, BTreeMap<PolicyArea, u8>>,
    statements: Box<dyn StatementGenerator>,
    next_sequence: u64,
}

impl DeliberationSession {
    pub fn new(config: SessionConfig) -> Self {
        let generator = CannedStatementGenerator::new(config.seed);
        Self::with_generator(config, Box::new(generator))
    }

    /// Constructs a session around an arbitrary statement source. Profiles
    /// and preferences are generated here, once, and never change for the
    /// session's lifetime.
    pub fn with_generator(config: SessionConfig, statements: Box<dyn StatementGenerator>) -> Self {
        let profiles = generate_profiles(config.seed, config.agent_count);
        let preferences = generate_preferences(config.seed, &profiles);
        Self {
            phase: Phase::Setup,
            current_topic: None,
            human_allocation: AllocationLedger::new(config.total_budget),
            group_allocation: AllocationLedger::new(config.total_budget),
            discussion_log: Vec::new(),
            profiles,
            preferences,
            statements,
            next_sequence: 0,
            config,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn session_id(&self) -> &str {
        &self.config.session_id
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn current_topic(&self) -> Option<PolicyArea> {
        self.current_topic
    }

    pub fn profiles(&self) -> &[ParticipantProfile] {
        &self.profiles
    }

    pub fn preferences(&self) -> &BTreeMap<String, BTreeMap<PolicyArea, u8>> {
        &self.preferences
    }

    pub fn discussion_log(&self) -> &[DiscussionEntry] {
        &self.discussion_log
    }

    pub fn human_summary(&self) -> AllocationSummary {
        self.human_allocation.summary()
    }

    pub fn group_summary(&self) -> AllocationSummary {
        self.group_allocation.summary()
    }

    /// Everyone who can appear in the discussion log: the human first, then
    /// the agents in roster order.
    pub fn roster_ids(&self) -> Vec<String> {
        let mut roster = vec![HUMAN_SPEAKER_ID.to_string()];
        roster.extend(self.profiles.iter().map(|profile| profile.id.clone()));
        roster
    }

    pub fn status(&self) -> SessionStatus {
        let ledger = self.active_ledger();
        SessionStatus {
            schema_version: SCHEMA_VERSION_V1.to_string(),
            session_id: self.config.session_id.clone(),
            phase: self.phase,
            current_topic: self.current_topic,
            decided_topics: ledger.selected_policies().len(),
            total_topics: PolicyArea::ALL.len(),
            budget_used: ledger.current_usage(),
            budget_remaining: ledger.remaining_budget(),
            log_entries: self.discussion_log.len(),
        }
    }

    /// The ledger the current phase budgets against: the human warm-up
    /// before the group phase, the group allocation from then on.
    fn active_ledger(&self) -> &AllocationLedger {
        match self.phase {
            Phase::Setup | Phase::Individual => &self.human_allocation,
            Phase::Group | Phase::Reflection | Phase::Complete => &self.group_allocation,
        }
    }

    fn require_phase(&self, expected: Phase) -> Result<(), ActionError> {
        if self.phase != expected {
            return Err(ActionError::PhaseViolation {
                expected,
                actual: self.phase,
            });
        }
        Ok(())
    }
}

impl fmt::Debug for DeliberationSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeliberationSession")
            .field("session_id", &self.config.session_id)
            .field("phase", &self.phase)
            .field("current_topic", &self.current_topic)
            .field("log_entries", &self.discussion_log.len())
            .field("agents", &self.profiles.len())
            .finish_non_exhaustive()
    }
}
