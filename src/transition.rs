//! Outcome transition engine.
//!
//! `plan_transition` is the single authority on how a lead's status,
//! outcome, and follow-up fields may change. It is pure: it validates the
//! request against an injected `now`, predicts the next canonical lead
//! state, and names the one gateway call that realizes it. Committing the
//! result is the coordinator's job — the gateway call is the sole
//! side-effecting step, so replaying an identical request after a partial
//! failure cannot double-count an attempt.

use chrono::{DateTime, Duration, Utc};

use crate::config::BoardConfig;
use crate::error::LeadError;
use crate::gateway::{ScheduleKind, ScheduleRequest};
use crate::types::{ColumnSpec, ContactOutcome, Lead, LeadStatus};

pub const REASON_CALLBACK_REQUESTED: &str = "Callback Requested";
pub const REASON_NO_ANSWER: &str = "No Answer";
pub const REASON_UNREACHABLE: &str = "Unreachable";
pub const REASON_NOT_INTERESTED: &str = "Not Interested";

/// An outcome recorded from the quick-action panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeAction {
    ScheduleConsultation { at: DateTime<Utc> },
    ScheduleCallback { at: DateTime<Utc> },
    Answered,
    NoAnswer,
    Unreachable,
    NotInterested,
}

/// A requested change to one lead.
#[derive(Debug, Clone)]
pub enum Transition {
    /// Outcome panel: record what the last contact attempt produced.
    Outcome {
        action: OutcomeAction,
        note: Option<String>,
    },
    /// Kanban drag: restricted sub-grammar, see `plan_drop`.
    Drop { target: ColumnSpec },
}

/// The single persistence call a plan resolves to.
#[derive(Debug, Clone)]
pub enum GatewayCall {
    UpdateStatus {
        status: LeadStatus,
    },
    UpdateOutcome {
        outcome: ContactOutcome,
        note: Option<String>,
        next_follow_up_at: Option<DateTime<Utc>>,
    },
    ScheduleEvent {
        request: ScheduleRequest,
    },
}

/// Validated transition: the predicted next lead state plus the call that
/// realizes it. `call == None` is a silent no-op — nothing is sent and the
/// lead is returned unchanged.
#[derive(Debug, Clone)]
pub struct TransitionPlan {
    pub next: Lead,
    pub call: Option<GatewayCall>,
    /// Human-readable activity-log entry, appended best-effort after the
    /// primary call succeeds.
    pub activity_note: Option<String>,
}

impl TransitionPlan {
    fn noop(lead: &Lead) -> Self {
        Self {
            next: lead.clone(),
            call: None,
            activity_note: None,
        }
    }
}

/// Validate a request and produce its plan.
pub fn plan_transition(
    lead: &Lead,
    transition: &Transition,
    now: DateTime<Utc>,
    config: &BoardConfig,
) -> Result<TransitionPlan, LeadError> {
    match transition {
        Transition::Outcome { action, note } => {
            plan_outcome(lead, *action, note.clone(), now, config)
        }
        Transition::Drop { target } => plan_drop(lead, *target, now),
    }
}

/// The authoritative outcome routing table. No other transition paths
/// exist for recorded outcomes.
fn plan_outcome(
    lead: &Lead,
    action: OutcomeAction,
    note: Option<String>,
    now: DateTime<Utc>,
    config: &BoardConfig,
) -> Result<TransitionPlan, LeadError> {
    let mut next = lead.clone();
    next.contact_attempts = lead.contact_attempts + 1;
    next.last_contact_attempt = Some(now);
    next.last_updated_at = Some(now);

    let (call, activity_note) = match action {
        OutcomeAction::ScheduleConsultation { at } => {
            require_future(at, now)?;
            next.contact_outcome = ContactOutcome::Scheduled;
            next.status = LeadStatus::Scheduled;
            next.scheduled_consultation_at = Some(at);
            // Entering the scheduled queue always sets the callback
            // timestamp the column sorts and filters on.
            next.scheduled_callback_at = Some(at);
            next.follow_up_reason = None;
            next.next_follow_up_at = None;
            let call = GatewayCall::ScheduleEvent {
                request: ScheduleRequest {
                    at,
                    kind: ScheduleKind::Consultation,
                    notes: note,
                },
            };
            (call, Some(format!("Consultation scheduled for {}", stamp(at))))
        }
        OutcomeAction::ScheduleCallback { at } => {
            require_future(at, now)?;
            next.contact_outcome = ContactOutcome::CallbackRequested;
            next.scheduled_callback_at = Some(at);
            next.follow_up_reason = Some(REASON_CALLBACK_REQUESTED.to_string());
            next.next_follow_up_at = Some(at);
            let call = GatewayCall::ScheduleEvent {
                request: ScheduleRequest {
                    at,
                    kind: ScheduleKind::Callback,
                    notes: note,
                },
            };
            (call, Some(format!("Callback scheduled for {}", stamp(at))))
        }
        OutcomeAction::Answered => {
            next.contact_outcome = ContactOutcome::Answered;
            if lead.status == LeadStatus::New {
                next.status = LeadStatus::Contacted;
            }
            next.follow_up_reason = None;
            next.next_follow_up_at = None;
            let call = GatewayCall::UpdateOutcome {
                outcome: ContactOutcome::Answered,
                note,
                next_follow_up_at: None,
            };
            (call, None)
        }
        OutcomeAction::NoAnswer => {
            let due = now + Duration::hours(config.no_answer_follow_up_hours);
            next.contact_outcome = ContactOutcome::NoAnswer;
            next.follow_up_reason = Some(REASON_NO_ANSWER.to_string());
            next.next_follow_up_at = Some(due);
            let call = GatewayCall::UpdateOutcome {
                outcome: ContactOutcome::NoAnswer,
                note,
                next_follow_up_at: Some(due),
            };
            (call, None)
        }
        OutcomeAction::Unreachable => {
            next.contact_outcome = ContactOutcome::Unreachable;
            next.follow_up_reason = Some(REASON_UNREACHABLE.to_string());
            next.next_follow_up_at = None;
            let call = GatewayCall::UpdateOutcome {
                outcome: ContactOutcome::Unreachable,
                note,
                next_follow_up_at: None,
            };
            (call, None)
        }
        OutcomeAction::NotInterested => {
            // A delay, not a disqualification: the lead resurfaces in the
            // follow-up queue after the cool-off window.
            let due = now + Duration::days(config.not_interested_follow_up_days);
            next.contact_outcome = ContactOutcome::NotInterested;
            next.follow_up_reason = Some(REASON_NOT_INTERESTED.to_string());
            next.next_follow_up_at = Some(due);
            let call = GatewayCall::UpdateOutcome {
                outcome: ContactOutcome::NotInterested,
                note,
                next_follow_up_at: Some(due),
            };
            (call, None)
        }
    };

    Ok(TransitionPlan {
        next,
        call: Some(call),
        activity_note,
    })
}

/// The Kanban drag sub-grammar.
///
/// Dropping on a status column sets that status outright. Dropping within
/// a priority column only advances `new → contacted`; for any other
/// current status it is a silent no-op — the lead is returned unchanged
/// and no call is issued, never an error.
fn plan_drop(
    lead: &Lead,
    target: ColumnSpec,
    now: DateTime<Utc>,
) -> Result<TransitionPlan, LeadError> {
    match target {
        ColumnSpec::Status(status) => {
            if lead.status == status {
                return Ok(TransitionPlan::noop(lead));
            }
            if status == LeadStatus::Scheduled && lead.scheduled_callback_at.is_none() {
                return Err(LeadError::Validation(
                    "cannot move a lead without a booked callback into the scheduled queue"
                        .to_string(),
                ));
            }
            let mut next = lead.clone();
            next.status = status;
            next.last_updated_at = Some(now);
            Ok(TransitionPlan {
                next,
                call: Some(GatewayCall::UpdateStatus { status }),
                activity_note: None,
            })
        }
        ColumnSpec::Priority(_) => {
            if lead.status != LeadStatus::New {
                return Ok(TransitionPlan::noop(lead));
            }
            let mut next = lead.clone();
            next.status = LeadStatus::Contacted;
            next.last_updated_at = Some(now);
            Ok(TransitionPlan {
                next,
                call: Some(GatewayCall::UpdateStatus {
                    status: LeadStatus::Contacted,
                }),
                activity_note: None,
            })
        }
    }
}

fn require_future(at: DateTime<Utc>, now: DateTime<Utc>) -> Result<(), LeadError> {
    if at < now {
        return Err(LeadError::Validation(format!(
            "cannot schedule in the past ({} < {})",
            stamp(at),
            stamp(now)
        )));
    }
    Ok(())
}

fn stamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M UTC").to_string()
}
