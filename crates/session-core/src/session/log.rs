use super::*;

use crate::sampling::synthetic_timestamp;

impl DeliberationSession {
    fn push_entry(
        &mut self,
        topic: Option<PolicyArea>,
        speaker: Option<(&str, &str)>,
        statement: Option<String>,
        decision: Option<u8>,
    ) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.discussion_log.push(DiscussionEntry {
            schema_version: SCHEMA_VERSION_V1.to_string(),
            session_id: self.config.session_id.clone(),
            sequence,
            phase: self.phase,
            topic,
            speaker: speaker.map(|(id, _)| id.to_string()),
            speaker_name: speaker.map(|(_, name)| name.to_string()),
            statement,
            decision,
            recorded_at: synthetic_timestamp(sequence),
        });
    }

    pub(super) fn log_statement(
        &mut self,
        topic: Option<PolicyArea>,
        speaker_id: &str,
        speaker_name: &str,
        statement: String,
    ) {
        self.push_entry(topic, Some((speaker_id, speaker_name)), Some(statement), None);
    }

    pub(super) fn log_decision(&mut self, topic: PolicyArea, option: u8) {
        self.push_entry(Some(topic), None, None, Some(option));
    }

    /// Phase-level marker: no topic, speaker, statement, or decision. The
    /// entry's own `phase` field records the phase just entered.
    pub(super) fn log_phase_marker(&mut self) {
        self.push_entry(None, None, None, None);
    }
}
