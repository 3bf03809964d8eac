use super::*;

use contracts::{
    AgentReflection, AgentStatement, ArgumentOutcome, GroupStartOutcome, PreferenceOutcome,
    ReflectionOutcome, ReflectionSentiment, TopicOutcome, HUMAN_SPEAKER_NAME,
};

use crate::analyzer;
use crate::catalog::REFLECTION_QUESTIONS;
use crate::statement::FALLBACK_STATEMENT;

impl DeliberationSession {
    /// setup -> individual. The human budgets privately before facing the
    /// group.
    pub fn start(&mut self) -> Result<SessionStatus, ActionError> {
        self.require_phase(Phase::Setup)?;
        self.phase = Phase::Individual;
        self.log_phase_marker();
        Ok(self.status())
    }

    /// Records one warm-up selection on the human allocation.
    pub fn set_preference(
        &mut self,
        area: PolicyArea,
        option: u8,
    ) -> Result<PreferenceOutcome, ActionError> {
        self.require_phase(Phase::Individual)?;
        let budget_remaining = self.human_allocation.set_option(area, option)?;
        Ok(PreferenceOutcome {
            area,
            option,
            budget_remaining,
            feedback: self.human_allocation.feedback(),
        })
    }

    /// individual -> group. Gated on completeness alone; mix and budget
    /// shortfalls of the warm-up are irrelevant because the warm-up is
    /// discarded here and the group starts from an empty allocation.
    pub fn start_group_discussion(&mut self) -> Result<GroupStartOutcome, ActionError> {
        self.require_phase(Phase::Individual)?;
        if !self.human_allocation.is_complete() {
            return Err(ActionError::IncompletePackage {
                missing: self.human_allocation.missing_areas(),
            });
        }

        self.phase = Phase::Group;
        self.group_allocation = AllocationLedger::new(self.config.total_budget);
        let first_topic = PolicyArea::ALL[0];
        self.current_topic = Some(first_topic);
        self.log_phase_marker();

        let statements = self.collect_opening_statements(first_topic);
        Ok(GroupStartOutcome {
            current_topic: first_topic,
            statements,
        })
    }

    /// Appends the human's argument and one counterargument per agent.
    pub fn submit_argument(
        &mut self,
        argument: &str,
        claimed_option: u8,
    ) -> Result<ArgumentOutcome, ActionError> {
        self.require_phase(Phase::Group)?;
        if !(1..=3).contains(&claimed_option) {
            return Err(ActionError::InvalidOption {
                value: claimed_option,
            });
        }
        let Some(topic) = self.current_topic else {
            return Err(ActionError::PhaseViolation {
                expected: Phase::Group,
                actual: self.phase,
            });
        };

        self.log_statement(
            Some(topic),
            HUMAN_SPEAKER_ID,
            HUMAN_SPEAKER_NAME,
            argument.to_string(),
        );

        let responses: Vec<AgentStatement> = self
            .profiles
            .iter()
            .map(|profile| {
                let own_option = self.preferred_option(&profile.id, topic);
                let statement = self
                    .statements
                    .counter(profile, topic, own_option, claimed_option)
                    .unwrap_or_else(|_| FALLBACK_STATEMENT.to_string());
                AgentStatement {
                    agent_id: profile.id.clone(),
                    agent_name: profile.name.clone(),
                    preference: own_option,
                    statement,
                }
            })
            .collect();

        for response in &responses {
            self.log_statement(
                Some(topic),
                &response.agent_id,
                &response.agent_name,
                response.statement.clone(),
            );
        }

        Ok(ArgumentOutcome { topic, responses })
    }

    /// Commits the group's decision for the current topic and advances to
    /// the next one, or into reflection after the last. A budget rejection
    /// leaves the topic unchanged and carries the remaining budget so the
    /// client can retry with a cheaper option.
    pub fn finalize_topic(&mut self, option: u8) -> Result<TopicOutcome, ActionError> {
        self.require_phase(Phase::Group)?;
        let Some(topic) = self.current_topic else {
            return Err(ActionError::PhaseViolation {
                expected: Phase::Group,
                actual: self.phase,
            });
        };

        let budget_remaining = self.group_allocation.set_option(topic, option)?;
        self.log_decision(topic, option);

        match topic.next_in_catalog() {
            Some(next_topic) => {
                self.current_topic = Some(next_topic);
                let statements = self.collect_opening_statements(next_topic);
                Ok(TopicOutcome {
                    topic,
                    option,
                    budget_remaining,
                    is_final_topic: false,
                    next_topic: Some(next_topic),
                    next_phase: None,
                    statements,
                })
            }
            None => {
                // Last catalog area: the topic pointer stays put and the
                // session moves to reflection.
                self.phase = Phase::Reflection;
                self.log_phase_marker();
                Ok(TopicOutcome {
                    topic,
                    option,
                    budget_remaining,
                    is_final_topic: true,
                    next_topic: None,
                    next_phase: Some(Phase::Reflection),
                    statements: Vec::new(),
                })
            }
        }
    }

    /// Analysis of the decided package plus the reflection prompts and the
    /// agents' verdicts on how the outcome treated their priorities.
    pub fn start_reflection(&mut self) -> Result<ReflectionOutcome, ActionError> {
        self.require_phase(Phase::Reflection)?;
        let analysis = analyzer::analyze(&self.group_allocation)?;
        let final_policies = self.group_allocation.selected_policies();

        Ok(ReflectionOutcome {
            agent_reflections: self.collect_agent_reflections(),
            reflection_questions: REFLECTION_QUESTIONS
                .iter()
                .map(|question| question.to_string())
                .collect(),
            budget_used: self.group_allocation.current_usage(),
            budget_remaining: self.group_allocation.remaining_budget(),
            final_policies,
            analysis,
        })
    }

    /// Assembles the combined report and marks the session complete. Valid
    /// from reflection onward; repeat calls re-assemble the same report.
    pub fn final_report(&mut self) -> Result<contracts::FinalReport, ActionError> {
        if self.phase != Phase::Reflection && self.phase != Phase::Complete {
            return Err(ActionError::PhaseViolation {
                expected: Phase::Reflection,
                actual: self.phase,
            });
        }

        let policy_analysis = analyzer::analyze(&self.group_allocation)?;
        let discussion_dynamics =
            crate::dynamics::analyze_dynamics(&self.discussion_log, &self.roster_ids());

        if self.phase == Phase::Reflection {
            self.phase = Phase::Complete;
            self.log_phase_marker();
        }

        Ok(contracts::FinalReport {
            schema_version: SCHEMA_VERSION_V1.to_string(),
            session_id: self.config.session_id.clone(),
            final_policies: self.group_allocation.selected_policies(),
            policy_analysis,
            discussion_dynamics,
            budget_summary: contracts::BudgetSummary {
                total_budget: self.group_allocation.total_budget(),
                budget_used: self.group_allocation.current_usage(),
                budget_remaining: self.group_allocation.remaining_budget(),
            },
        })
    }

    fn preferred_option(&self, agent_id: &str, topic: PolicyArea) -> u8 {
        self.preferences
            .get(agent_id)
            .and_then(|per_area| per_area.get(&topic))
            .copied()
            .unwrap_or(2)
    }

    /// One opening statement per agent for `topic`, each appended to the
    /// log. A generator failure degrades to the fallback line rather than
    /// blocking the transition.
    fn collect_opening_statements(&mut self, topic: PolicyArea) -> Vec<AgentStatement> {
        let remaining = self.group_allocation.remaining_budget();
        let statements: Vec<AgentStatement> = self
            .profiles
            .iter()
            .map(|profile| {
                let preference = self.preferred_option(&profile.id, topic);
                let statement = self
                    .statements
                    .opening(profile, topic, preference, "", remaining)
                    .unwrap_or_else(|_| FALLBACK_STATEMENT.to_string());
                AgentStatement {
                    agent_id: profile.id.clone(),
                    agent_name: profile.name.clone(),
                    preference,
                    statement,
                }
            })
            .collect();

        for statement in &statements {
            self.log_statement(
                Some(topic),
                &statement.agent_id,
                &statement.agent_name,
                statement.statement.clone(),
            );
        }

        statements
    }

    fn collect_agent_reflections(&self) -> Vec<AgentReflection> {
        let final_policies = self.group_allocation.selected_policies();
        self.profiles
            .iter()
            .map(|profile| {
                let honored: Vec<PolicyArea> = PolicyArea::ALL
                    .iter()
                    .filter(|area| {
                        final_policies.get(*area).copied()
                            == Some(self.preferred_option(&profile.id, **area))
                    })
                    .copied()
                    .collect();
                let overridden = PolicyArea::ALL
                    .iter()
                    .find(|area| !honored.contains(*area))
                    .copied();

                let alignment_pct =
                    honored.len() as f64 / PolicyArea::ALL.len() as f64 * 100.0;

                let (sentiment, reflection) = if alignment_pct > 70.0 {
                    let favorite = honored
                        .first()
                        .map(|area| area.label())
                        .unwrap_or("our overall direction");
                    (
                        ReflectionSentiment::Satisfied,
                        format!(
                            "I'm pleased with our final policy package as it aligns with many of my priorities. Particularly, I appreciate our approach to {favorite}."
                        ),
                    )
                } else if alignment_pct > 40.0 {
                    let sore_point = overridden
                        .map(|area| area.label())
                        .unwrap_or("several areas");
                    (
                        ReflectionSentiment::Mixed,
                        format!(
                            "The final policy has some strengths, but I'm disappointed in our decision on {sore_point}. I believe we could have done better there."
                        ),
                    )
                } else {
                    (
                        ReflectionSentiment::Disappointed,
                        "This policy package falls short of what I believe would truly serve the refugee population. Too many compromises were made at the expense of those most vulnerable.".to_string(),
                    )
                };

                AgentReflection {
                    agent_id: profile.id.clone(),
                    agent_name: profile.name.clone(),
                    sentiment,
                    reflection,
                    preference_alignment_pct: alignment_pct,
                }
            })
            .collect()
    }
}
