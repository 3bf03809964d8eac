//! v1 cross-boundary contracts for the deliberation engine, API, and persistence.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const SCHEMA_VERSION_V1: &str = "1.0";
pub const DEFAULT_TOTAL_BUDGET: u32 = 14;
pub const DEFAULT_AGENT_COUNT: usize = 4;
pub const AREA_COUNT: usize = 7;

/// Reserved speaker id for the human participant in the discussion log.
pub const HUMAN_SPEAKER_ID: &str = "human";
pub const HUMAN_SPEAKER_NAME: &str = "Human Participant";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PolicyArea {
    AccessToEducation,
    LanguageInstruction,
    TeacherTraining,
    CurriculumAdaptation,
    PsychosocialSupport,
    FinancialSupport,
    Certification,
}

impl PolicyArea {
    /// Canonical catalog order; group-phase topics are visited in this order.
    pub const ALL: [PolicyArea; AREA_COUNT] = [
        PolicyArea::AccessToEducation,
        PolicyArea::LanguageInstruction,
        PolicyArea::TeacherTraining,
        PolicyArea::CurriculumAdaptation,
        PolicyArea::PsychosocialSupport,
        PolicyArea::FinancialSupport,
        PolicyArea::Certification,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::AccessToEducation => "access_to_education",
            Self::LanguageInstruction => "language_instruction",
            Self::TeacherTraining => "teacher_training",
            Self::CurriculumAdaptation => "curriculum_adaptation",
            Self::PsychosocialSupport => "psychosocial_support",
            Self::FinancialSupport => "financial_support",
            Self::Certification => "certification",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::AccessToEducation => "Access to Education",
            Self::LanguageInstruction => "Language Instruction",
            Self::TeacherTraining => "Teacher Training",
            Self::CurriculumAdaptation => "Curriculum Adaptation",
            Self::PsychosocialSupport => "Psychosocial Support",
            Self::FinancialSupport => "Financial Support",
            Self::Certification => "Certification/Accreditation",
        }
    }

    pub fn next_in_catalog(self) -> Option<PolicyArea> {
        let index = Self::ALL.iter().position(|area| *area == self)?;
        Self::ALL.get(index + 1).copied()
    }
}

impl fmt::Display for PolicyArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PolicyArea {
    type Err = ActionError;

    /// Accepts both the snake_case wire id and the display label.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        Self::ALL
            .iter()
            .find(|area| area.as_str() == trimmed || area.label() == trimmed)
            .copied()
            .ok_or_else(|| ActionError::UnknownArea {
                raw: trimmed.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Setup,
    Individual,
    Group,
    Reflection,
    Complete,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Setup => "setup",
            Self::Individual => "individual",
            Self::Group => "group",
            Self::Reflection => "reflection",
            Self::Complete => "complete",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionConfig {
    pub schema_version: String,
    pub session_id: String,
    #[serde(with = "serde_u64_string")]
    pub seed: u64,
    #[serde(default = "default_agent_count")]
    pub agent_count: usize,
    #[serde(default = "default_total_budget")]
    pub total_budget: u32,
    pub notes: Option<String>,
}

fn default_agent_count() -> usize {
    DEFAULT_AGENT_COUNT
}

fn default_total_budget() -> u32 {
    DEFAULT_TOTAL_BUDGET
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION_V1.to_string(),
            session_id: "session_local_001".to_string(),
            seed: 1337,
            agent_count: DEFAULT_AGENT_COUNT,
            total_budget: DEFAULT_TOTAL_BUDGET,
            notes: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionStatus {
    pub schema_version: String,
    pub session_id: String,
    pub phase: Phase,
    pub current_topic: Option<PolicyArea>,
    pub decided_topics: usize,
    pub total_topics: usize,
    pub budget_used: u32,
    pub budget_remaining: u32,
    pub log_entries: usize,
}

impl SessionStatus {
    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Complete
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "session_id={} phase={} topics={}/{} budget={}/{} entries={}",
            self.session_id,
            self.phase,
            self.decided_topics,
            self.total_topics,
            self.budget_used,
            self.budget_used + self.budget_remaining,
            self.log_entries
        )
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EducationLevel {
    HighSchoolDiploma,
    TechnicalCertificate,
    AssociateDegree,
    BachelorsHumanities,
    BachelorsSocialSciences,
    BachelorsBusiness,
    BachelorsStem,
    MastersEducation,
    MastersPublicPolicy,
    MastersSocialWork,
    MastersBusinessAdministration,
    PhdEconomics,
    PhdPoliticalScience,
    PhdSociology,
    PhdEducation,
}

impl EducationLevel {
    pub const ALL: [EducationLevel; 15] = [
        EducationLevel::HighSchoolDiploma,
        EducationLevel::TechnicalCertificate,
        EducationLevel::AssociateDegree,
        EducationLevel::BachelorsHumanities,
        EducationLevel::BachelorsSocialSciences,
        EducationLevel::BachelorsBusiness,
        EducationLevel::BachelorsStem,
        EducationLevel::MastersEducation,
        EducationLevel::MastersPublicPolicy,
        EducationLevel::MastersSocialWork,
        EducationLevel::MastersBusinessAdministration,
        EducationLevel::PhdEconomics,
        EducationLevel::PhdPoliticalScience,
        EducationLevel::PhdSociology,
        EducationLevel::PhdEducation,
    ];

    /// Undergraduate tiers come first in `ALL`; the profile generator caps
    /// younger participants to a prefix of this ordering.
    pub const UNDERGRADUATE_TIER: usize = 7;
    pub const MASTERS_TIER: usize = 11;

    pub fn label(self) -> &'static str {
        match self {
            Self::HighSchoolDiploma => "High School Diploma",
            Self::TechnicalCertificate => "Technical Certificate",
            Self::AssociateDegree => "Associate's Degree",
            Self::BachelorsHumanities => "Bachelor's Degree in Humanities",
            Self::BachelorsSocialSciences => "Bachelor's Degree in Social Sciences",
            Self::BachelorsBusiness => "Bachelor's Degree in Business",
            Self::BachelorsStem => "Bachelor's Degree in STEM",
            Self::MastersEducation => "Master's Degree in Education",
            Self::MastersPublicPolicy => "Master's Degree in Public Policy",
            Self::MastersSocialWork => "Master's Degree in Social Work",
            Self::MastersBusinessAdministration => "Master's Degree in Business Administration",
            Self::PhdEconomics => "PhD in Economics",
            Self::PhdPoliticalScience => "PhD in Political Science",
            Self::PhdSociology => "PhD in Sociology",
            Self::PhdEducation => "PhD in Education",
        }
    }

    pub fn is_postgraduate(self) -> bool {
        Self::ALL
            .iter()
            .position(|level| *level == self)
            .map(|index| index >= Self::UNDERGRADUATE_TIER)
            .unwrap_or(false)
    }

    pub fn is_doctoral(self) -> bool {
        matches!(
            self,
            Self::PhdEconomics | Self::PhdPoliticalScience | Self::PhdSociology | Self::PhdEducation
        )
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Occupation {
    Teacher,
    SchoolAdministrator,
    UniversityProfessor,
    CivilServant,
    NgoWorker,
    SocialWorker,
    Lawyer,
    SmallBusinessOwner,
    CorporateExecutive,
    HealthcareProfessional,
    CommunityOrganizer,
    Journalist,
    ReligiousLeader,
    RetiredMilitaryOfficer,
    LocalGovernmentOfficial,
}

impl Occupation {
    pub const ALL: [Occupation; 15] = [
        Occupation::Teacher,
        Occupation::SchoolAdministrator,
        Occupation::UniversityProfessor,
        Occupation::CivilServant,
        Occupation::NgoWorker,
        Occupation::SocialWorker,
        Occupation::Lawyer,
        Occupation::SmallBusinessOwner,
        Occupation::CorporateExecutive,
        Occupation::HealthcareProfessional,
        Occupation::CommunityOrganizer,
        Occupation::Journalist,
        Occupation::ReligiousLeader,
        Occupation::RetiredMilitaryOfficer,
        Occupation::LocalGovernmentOfficial,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Teacher => "Teacher",
            Self::SchoolAdministrator => "School Administrator",
            Self::UniversityProfessor => "University Professor",
            Self::CivilServant => "Civil Servant",
            Self::NgoWorker => "NGO Worker",
            Self::SocialWorker => "Social Worker",
            Self::Lawyer => "Lawyer",
            Self::SmallBusinessOwner => "Small Business Owner",
            Self::CorporateExecutive => "Corporate Executive",
            Self::HealthcareProfessional => "Healthcare Professional",
            Self::CommunityOrganizer => "Community Organizer",
            Self::Journalist => "Journalist",
            Self::ReligiousLeader => "Religious Leader",
            Self::RetiredMilitaryOfficer => "Retired Military Officer",
            Self::LocalGovernmentOfficial => "Local Government Official",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SocioeconomicStatus {
    WorkingClass,
    LowerMiddleClass,
    MiddleClass,
    UpperMiddleClass,
    Affluent,
}

impl SocioeconomicStatus {
    pub const ALL: [SocioeconomicStatus; 5] = [
        SocioeconomicStatus::WorkingClass,
        SocioeconomicStatus::LowerMiddleClass,
        SocioeconomicStatus::MiddleClass,
        SocioeconomicStatus::UpperMiddleClass,
        SocioeconomicStatus::Affluent,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::WorkingClass => "Working class",
            Self::LowerMiddleClass => "Lower middle class",
            Self::MiddleClass => "Middle class",
            Self::UpperMiddleClass => "Upper middle class",
            Self::Affluent => "Affluent",
        }
    }
}

/// Coarse wings used by the roster diversity rule: every generated roster
/// must contain at least one participant from each wing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum StanceWing {
    Conservative,
    Moderate,
    Progressive,
}

impl StanceWing {
    pub const ALL: [StanceWing; 3] = [
        StanceWing::Conservative,
        StanceWing::Moderate,
        StanceWing::Progressive,
    ];
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PoliticalStance {
    Conservative,
    ModerateConservative,
    Moderate,
    ModerateLiberal,
    Liberal,
    Progressive,
    Socialist,
    Libertarian,
    Centrist,
    Pragmatist,
}

impl PoliticalStance {
    pub const ALL: [PoliticalStance; 10] = [
        PoliticalStance::Conservative,
        PoliticalStance::ModerateConservative,
        PoliticalStance::Moderate,
        PoliticalStance::ModerateLiberal,
        PoliticalStance::Liberal,
        PoliticalStance::Progressive,
        PoliticalStance::Socialist,
        PoliticalStance::Libertarian,
        PoliticalStance::Centrist,
        PoliticalStance::Pragmatist,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Conservative => "Conservative",
            Self::ModerateConservative => "Moderate conservative",
            Self::Moderate => "Moderate",
            Self::ModerateLiberal => "Moderate liberal",
            Self::Liberal => "Liberal",
            Self::Progressive => "Progressive",
            Self::Socialist => "Socialist",
            Self::Libertarian => "Libertarian",
            Self::Centrist => "Centrist",
            Self::Pragmatist => "Pragmatist",
        }
    }

    /// Libertarian, Centrist, and Pragmatist belong to no wing; they neither
    /// satisfy nor violate the diversity rule.
    pub fn wing(self) -> Option<StanceWing> {
        match self {
            Self::Conservative | Self::ModerateConservative => Some(StanceWing::Conservative),
            Self::Moderate | Self::ModerateLiberal => Some(StanceWing::Moderate),
            Self::Liberal | Self::Progressive | Self::Socialist => Some(StanceWing::Progressive),
            Self::Libertarian | Self::Centrist | Self::Pragmatist => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParticipantProfile {
    pub id: String,
    pub name: String,
    pub age: u8,
    pub education: EducationLevel,
    pub occupation: Occupation,
    pub socioeconomic_status: SocioeconomicStatus,
    pub political_stance: PoliticalStance,
}

/// One row of the append-only discussion log. Phase-level markers carry no
/// topic, speaker, statement, or decision; decision rows carry no speaker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiscussionEntry {
    pub schema_version: String,
    pub session_id: String,
    pub sequence: u64,
    pub phase: Phase,
    pub topic: Option<PolicyArea>,
    pub speaker: Option<String>,
    pub speaker_name: Option<String>,
    pub statement: Option<String>,
    pub decision: Option<u8>,
    pub recorded_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AllocationSummary {
    pub budget_used: u32,
    pub budget_remaining: u32,
    pub selections: BTreeMap<PolicyArea, Option<u8>>,
    pub option_counts: BTreeMap<u8, usize>,
    pub is_complete: bool,
    pub has_mix: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoreReading {
    pub score: f64,
    pub narrative: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PackageAnalysis {
    pub schema_version: String,
    pub equity: ScoreReading,
    pub justice: ScoreReading,
    pub coherence: ScoreReading,
    pub benefit_narrative: String,
    pub option_distribution: BTreeMap<u8, usize>,
    pub budget_used: u32,
    pub budget_remaining: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DynamicsReport {
    pub contribution_counts: BTreeMap<String, usize>,
    pub dominant_voices: Vec<String>,
    pub silenced_voices: Vec<String>,
    pub total_exchanges: usize,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct BudgetSummary {
    pub total_budget: u32,
    pub budget_used: u32,
    pub budget_remaining: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FinalReport {
    pub schema_version: String,
    pub session_id: String,
    pub final_policies: BTreeMap<PolicyArea, u8>,
    pub policy_analysis: PackageAnalysis,
    pub discussion_dynamics: DynamicsReport,
    pub budget_summary: BudgetSummary,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReflectionSentiment {
    Satisfied,
    Mixed,
    Disappointed,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentReflection {
    pub agent_id: String,
    pub agent_name: String,
    pub sentiment: ReflectionSentiment,
    pub reflection: String,
    pub preference_alignment_pct: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgentStatement {
    pub agent_id: String,
    pub agent_name: String,
    pub preference: u8,
    pub statement: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PreferenceOutcome {
    pub area: PolicyArea,
    pub option: u8,
    pub budget_remaining: u32,
    pub feedback: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GroupStartOutcome {
    pub current_topic: PolicyArea,
    pub statements: Vec<AgentStatement>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArgumentOutcome {
    pub topic: PolicyArea,
    pub responses: Vec<AgentStatement>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TopicOutcome {
    pub topic: PolicyArea,
    pub option: u8,
    pub budget_remaining: u32,
    pub is_final_topic: bool,
    pub next_topic: Option<PolicyArea>,
    pub next_phase: Option<Phase>,
    /// Opening statements for the next topic; empty once the final topic
    /// has been decided.
    pub statements: Vec<AgentStatement>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReflectionOutcome {
    pub final_policies: BTreeMap<PolicyArea, u8>,
    pub analysis: PackageAnalysis,
    pub reflection_questions: Vec<String>,
    pub agent_reflections: Vec<AgentReflection>,
    pub budget_used: u32,
    pub budget_remaining: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    UnknownArea,
    InvalidOption,
    BudgetExceeded,
    PhaseViolation,
    IncompletePackage,
    SessionNotFound,
    SessionStateConflict,
    InvalidRequest,
    InternalError,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiError {
    pub schema_version: String,
    pub error_code: ErrorCode,
    pub message: String,
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(error_code: ErrorCode, message: impl Into<String>, details: Option<String>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION_V1.to_string(),
            error_code,
            message: message.into(),
            details,
        }
    }
}

/// Recoverable engine-level failures. Every variant is a rejected action
/// with no side effects; none of them aborts a session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActionError {
    UnknownArea {
        raw: String,
    },
    InvalidOption {
        value: u8,
    },
    BudgetExceeded {
        remaining: u32,
        requested_delta: u32,
    },
    PhaseViolation {
        expected: Phase,
        actual: Phase,
    },
    IncompletePackage {
        missing: Vec<PolicyArea>,
    },
}

impl ActionError {
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::UnknownArea { .. } => ErrorCode::UnknownArea,
            Self::InvalidOption { .. } => ErrorCode::InvalidOption,
            Self::BudgetExceeded { .. } => ErrorCode::BudgetExceeded,
            Self::PhaseViolation { .. } => ErrorCode::PhaseViolation,
            Self::IncompletePackage { .. } => ErrorCode::IncompletePackage,
        }
    }

    pub fn to_api_error(&self) -> ApiError {
        let details = match self {
            Self::UnknownArea { raw } => Some(format!("area={raw}")),
            Self::InvalidOption { value } => Some(format!("option={value}")),
            Self::BudgetExceeded {
                remaining,
                requested_delta,
            } => Some(format!(
                "remaining_budget={remaining} requested_delta={requested_delta}"
            )),
            Self::PhaseViolation { expected, actual } => {
                Some(format!("expected_phase={expected} actual_phase={actual}"))
            }
            Self::IncompletePackage { missing } => {
                let areas = missing
                    .iter()
                    .map(|area| area.as_str())
                    .collect::<Vec<_>>()
                    .join(",");
                Some(format!("missing_areas={areas}"))
            }
        };

        ApiError::new(self.error_code(), self.to_string(), details)
    }
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownArea { raw } => write!(f, "unknown policy area: {raw}"),
            Self::InvalidOption { value } => {
                write!(f, "invalid option: {value}. Must be 1, 2, or 3")
            }
            Self::BudgetExceeded {
                remaining,
                requested_delta,
            } => write!(
                f,
                "not enough budget: change costs {requested_delta} with {remaining} remaining"
            ),
            Self::PhaseViolation { expected, actual } => write!(
                f,
                "action requires the {expected} phase but the session is in {actual}"
            ),
            Self::IncompletePackage { missing } => {
                write!(f, "{} policy area(s) are still undecided", missing.len())
            }
        }
    }
}

impl std::error::Error for ActionError {}

pub mod serde_u64_string {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &u64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<u64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse::<u64>().map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_area_parses_ids_and_labels() {
        assert_eq!(
            "psychosocial_support".parse::<PolicyArea>().ok(),
            Some(PolicyArea::PsychosocialSupport)
        );
        assert_eq!(
            "Certification/Accreditation".parse::<PolicyArea>().ok(),
            Some(PolicyArea::Certification)
        );

        let err = "border_control".parse::<PolicyArea>().unwrap_err();
        assert_eq!(err.error_code(), ErrorCode::UnknownArea);
    }

    #[test]
    fn catalog_order_is_stable_and_terminates() {
        let mut walked = vec![PolicyArea::ALL[0]];
        while let Some(next) = walked.last().copied().and_then(PolicyArea::next_in_catalog) {
            walked.push(next);
        }
        assert_eq!(walked, PolicyArea::ALL.to_vec());
    }

    #[test]
    fn session_config_round_trips_with_string_seed() {
        let config = SessionConfig {
            seed: u64::MAX,
            ..SessionConfig::default()
        };
        let encoded = serde_json::to_string(&config).expect("serialize");
        assert!(encoded.contains("\"18446744073709551615\""));

        let decoded: SessionConfig = serde_json::from_str(&encoded).expect("deserialize");
        assert_eq!(config, decoded);
    }

    #[test]
    fn partial_config_json_fills_defaults() {
        let decoded: SessionConfig = serde_json::from_str(
            r#"{"schema_version":"1.0","session_id":"s1","seed":"42","notes":null}"#,
        )
        .expect("deserialize");
        assert_eq!(decoded.agent_count, DEFAULT_AGENT_COUNT);
        assert_eq!(decoded.total_budget, DEFAULT_TOTAL_BUDGET);
    }

    #[test]
    fn error_codes_serialize_screaming_snake_case() {
        let encoded = serde_json::to_string(&ErrorCode::BudgetExceeded).expect("serialize");
        assert_eq!(encoded, "\"BUDGET_EXCEEDED\"");
    }

    #[test]
    fn action_error_maps_to_api_error_with_details() {
        let err = ActionError::BudgetExceeded {
            remaining: 2,
            requested_delta: 3,
        };
        let api = err.to_api_error();
        assert_eq!(api.error_code, ErrorCode::BudgetExceeded);
        assert_eq!(
            api.details.as_deref(),
            Some("remaining_budget=2 requested_delta=3")
        );
    }

    #[test]
    fn stance_wings_bucket_adjacent_stances() {
        assert_eq!(
            PoliticalStance::ModerateConservative.wing(),
            Some(StanceWing::Conservative)
        );
        assert_eq!(
            PoliticalStance::Socialist.wing(),
            Some(StanceWing::Progressive)
        );
        assert_eq!(PoliticalStance::Pragmatist.wing(), None);
    }
}
