//! In-process session facade with action dispatch, an append-only action
//! audit, and optional SQLite transcript persistence.

mod persistence;
mod server;

use std::path::Path;

use contracts::{
    ActionError, AllocationSummary, ApiError, ArgumentOutcome, DiscussionEntry, FinalReport,
    GroupStartOutcome, ParticipantProfile, PolicyArea, PreferenceOutcome, ReflectionOutcome,
    SessionConfig, SessionStatus,
};
use persistence::SqliteSessionStore;
use serde::{Deserialize, Serialize};
use session_core::session::DeliberationSession;

pub use persistence::{PersistedSessionSummary, PersistenceError};
pub use server::{serve, ServerError};

/// One audited client action: what was attempted and how it resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionRecord {
    pub action: String,
    pub accepted: bool,
    pub error: Option<ApiError>,
}

#[derive(Debug)]
struct PersistenceState {
    store: SqliteSessionStore,
    persisted_entry_count: usize,
}

pub struct SessionApi {
    session: DeliberationSession,
    action_audit: Vec<ActionRecord>,
    persistence: Option<PersistenceState>,
    last_persistence_error: Option<String>,
    pending_report: Option<FinalReport>,
}

impl SessionApi {
    pub fn from_config(config: SessionConfig) -> Self {
        Self::from_session(DeliberationSession::new(config))
    }

    /// Wraps a prebuilt session, e.g. one carrying a custom statement
    /// generator.
    pub fn from_session(session: DeliberationSession) -> Self {
        Self {
            session,
            action_audit: Vec::new(),
            persistence: None,
            last_persistence_error: None,
            pending_report: None,
        }
    }

    pub fn attach_sqlite_store(&mut self, path: impl AsRef<Path>) -> Result<(), PersistenceError> {
        let store = SqliteSessionStore::open(path)?;
        self.persistence = Some(PersistenceState {
            store,
            persisted_entry_count: 0,
        });
        Ok(())
    }

    pub fn initialize_session_storage(
        &mut self,
        replace_existing: bool,
    ) -> Result<(), PersistenceError> {
        let session_id = self.session.session_id().to_string();
        let Some(state) = self.persistence.as_mut() else {
            return Err(PersistenceError::NotAttached);
        };

        if state.store.session_exists(&session_id)? {
            if replace_existing {
                state.store.delete_session(&session_id)?;
                state.persisted_entry_count = 0;
            } else {
                return Err(PersistenceError::SessionAlreadyExists(session_id));
            }
        }

        self.flush_persistence_checked()?;
        self.last_persistence_error = None;
        Ok(())
    }

    pub fn flush_persistence_checked(&mut self) -> Result<(), PersistenceError> {
        let status = self.session.status();
        let entries = self.session.discussion_log();
        let Some(state) = self.persistence.as_mut() else {
            return Err(PersistenceError::NotAttached);
        };

        let new_entries = &entries[state.persisted_entry_count..];
        state.store.persist_delta(
            self.session.config(),
            &status,
            new_entries,
            self.pending_report.as_ref(),
        )?;
        state.persisted_entry_count = entries.len();
        self.pending_report = None;
        self.last_persistence_error = None;
        Ok(())
    }

    /// Reads a transcript back from the attached archive; any session id
    /// the store holds, not just this one.
    pub fn load_persisted_transcript(
        &self,
        session_id: &str,
    ) -> Result<Vec<DiscussionEntry>, PersistenceError> {
        let Some(state) = self.persistence.as_ref() else {
            return Err(PersistenceError::NotAttached);
        };

        state.store.load_transcript(session_id)
    }

    pub fn load_persisted_report(
        &self,
        session_id: &str,
    ) -> Result<Option<FinalReport>, PersistenceError> {
        let Some(state) = self.persistence.as_ref() else {
            return Err(PersistenceError::NotAttached);
        };

        state.store.load_report(session_id)
    }

    pub fn last_persistence_error(&self) -> Option<&str> {
        self.last_persistence_error.as_deref()
    }

    pub fn session_id(&self) -> &str {
        self.session.session_id()
    }

    pub fn config(&self) -> &SessionConfig {
        self.session.config()
    }

    pub fn status(&self) -> SessionStatus {
        self.session.status()
    }

    pub fn profiles(&self) -> &[ParticipantProfile] {
        self.session.profiles()
    }

    pub fn transcript(&self) -> &[DiscussionEntry] {
        self.session.discussion_log()
    }

    pub fn roster_ids(&self) -> Vec<String> {
        self.session.roster_ids()
    }

    pub fn human_summary(&self) -> AllocationSummary {
        self.session.human_summary()
    }

    pub fn group_summary(&self) -> AllocationSummary {
        self.session.group_summary()
    }

    pub fn action_audit(&self) -> &[ActionRecord] {
        &self.action_audit
    }

    pub fn start(&mut self) -> Result<SessionStatus, ActionError> {
        let result = self.session.start();
        self.finish_action("session.start", &result);
        result
    }

    pub fn set_preference(
        &mut self,
        area: PolicyArea,
        option: u8,
    ) -> Result<PreferenceOutcome, ActionError> {
        let result = self.session.set_preference(area, option);
        self.finish_action("session.set_preference", &result);
        result
    }

    pub fn start_group_discussion(&mut self) -> Result<GroupStartOutcome, ActionError> {
        let result = self.session.start_group_discussion();
        self.finish_action("session.start_group_discussion", &result);
        result
    }

    pub fn submit_argument(
        &mut self,
        argument: &str,
        claimed_option: u8,
    ) -> Result<ArgumentOutcome, ActionError> {
        let result = self.session.submit_argument(argument, claimed_option);
        self.finish_action("session.submit_argument", &result);
        result
    }

    pub fn finalize_topic(&mut self, option: u8) -> Result<contracts::TopicOutcome, ActionError> {
        let result = self.session.finalize_topic(option);
        self.finish_action("session.finalize_topic", &result);
        result
    }

    pub fn start_reflection(&mut self) -> Result<ReflectionOutcome, ActionError> {
        let result = self.session.start_reflection();
        self.finish_action("session.start_reflection", &result);
        result
    }

    pub fn final_report(&mut self) -> Result<FinalReport, ActionError> {
        let result = self.session.final_report();
        if let Ok(report) = &result {
            self.pending_report = Some(report.clone());
        }
        self.finish_action("session.final_report", &result);
        result
    }

    /// Records the audit row and flushes the transcript delta. Persistence
    /// failures are remembered, never surfaced as action failures.
    fn finish_action<T>(&mut self, action: &str, result: &Result<T, ActionError>) {
        self.action_audit.push(ActionRecord {
            action: action.to_string(),
            accepted: result.is_ok(),
            error: result.as_ref().err().map(ActionError::to_api_error),
        });

        if self.persistence.is_none() {
            return;
        }
        if let Err(err) = self.flush_persistence_checked() {
            self.last_persistence_error = Some(err.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::Phase;

    const SCRIPT: [u8; 7] = [3, 1, 3, 2, 2, 1, 2];

    fn test_config(session_id: &str) -> SessionConfig {
        SessionConfig {
            session_id: session_id.to_string(),
            seed: 4242,
            ..SessionConfig::default()
        }
    }

    fn temp_db_path(name: &str) -> std::path::PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be monotonic")
            .as_nanos();

        std::env::temp_dir().join(format!("deliberation_{name}_{nanos}.sqlite"))
    }

    fn run_full_session(api: &mut SessionApi) {
        api.start().expect("setup -> individual");
        for (area, option) in PolicyArea::ALL.into_iter().zip(SCRIPT) {
            api.set_preference(area, option).expect("warm-up fits");
        }
        api.start_group_discussion().expect("warm-up complete");
        for option in SCRIPT {
            api.submit_argument("making the case", option)
                .expect("group accepts arguments");
            api.finalize_topic(option).expect("scripted decision fits");
        }
        api.start_reflection().expect("package complete");
        api.final_report().expect("reflection -> complete");
    }

    #[test]
    fn audit_records_accepted_and_rejected_actions() {
        let mut api = SessionApi::from_config(test_config("session_audit"));
        api.start().expect("setup -> individual");
        api.set_preference(PolicyArea::AccessToEducation, 9)
            .expect_err("invalid option");

        let audit = api.action_audit();
        assert_eq!(audit.len(), 2);
        assert!(audit[0].accepted);
        assert!(!audit[1].accepted);
        assert_eq!(
            audit[1].error.as_ref().map(|err| err.error_code),
            Some(contracts::ErrorCode::InvalidOption)
        );
    }

    #[test]
    fn full_session_persists_transcript_and_report() {
        let db_path = temp_db_path("full");
        let mut api = SessionApi::from_config(test_config("session_persist"));
        api.attach_sqlite_store(&db_path).expect("attach store");
        api.initialize_session_storage(true).expect("initialize");

        run_full_session(&mut api);
        assert!(api.last_persistence_error().is_none());
        assert_eq!(api.status().phase, Phase::Complete);

        let through_facade = api
            .load_persisted_transcript("session_persist")
            .expect("facade read");
        assert_eq!(through_facade.len(), api.transcript().len());

        let store = SqliteSessionStore::open(&db_path).expect("reopen");
        let transcript = store
            .load_transcript("session_persist")
            .expect("transcript persisted");
        assert_eq!(transcript.len(), api.transcript().len());
        assert_eq!(transcript, api.transcript().to_vec());

        let report = store
            .load_report("session_persist")
            .expect("report query")
            .expect("report persisted");
        assert_eq!(report.budget_summary.budget_used, 14);

        let summaries = store.list_sessions(10).expect("list");
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].phase, "complete");

        let _ = std::fs::remove_file(&db_path);
        let _ = std::fs::remove_file(db_path.with_extension("sqlite-wal"));
        let _ = std::fs::remove_file(db_path.with_extension("sqlite-shm"));
    }

    #[test]
    fn initialize_refuses_to_clobber_without_replace_flag() {
        let db_path = temp_db_path("conflict");
        {
            let mut api = SessionApi::from_config(test_config("session_conflict"));
            api.attach_sqlite_store(&db_path).expect("attach store");
            api.initialize_session_storage(true).expect("first init");
        }

        let mut second = SessionApi::from_config(test_config("session_conflict"));
        second.attach_sqlite_store(&db_path).expect("attach store");
        let err = second.initialize_session_storage(false).unwrap_err();
        assert!(matches!(err, PersistenceError::SessionAlreadyExists(_)));

        second
            .initialize_session_storage(true)
            .expect("replace succeeds");

        let _ = std::fs::remove_file(&db_path);
        let _ = std::fs::remove_file(db_path.with_extension("sqlite-wal"));
        let _ = std::fs::remove_file(db_path.with_extension("sqlite-shm"));
    }

    #[test]
    fn actions_without_a_store_skip_persistence_entirely() {
        let mut api = SessionApi::from_config(test_config("session_memory"));
        run_full_session(&mut api);
        assert!(api.last_persistence_error().is_none());
        assert!(api.flush_persistence_checked().is_err());
    }
}
