use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Priority bucket computed by the external lead-scoring process.
///
/// Read-only inside this crate. Unrecognized wire values deserialize to
/// `Unknown` rather than falling back to a default bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Hot,
    Medium,
    Low,
    Disqualified,
    Unknown,
}

impl Priority {
    fn from_wire(s: &str) -> Self {
        match s {
            "hot" => Priority::Hot,
            "medium" => Priority::Medium,
            "low" => Priority::Low,
            "disqualified" => Priority::Disqualified,
            _ => Priority::Unknown,
        }
    }

    /// Rank used by the priority sort option. Lower sorts first.
    pub fn sort_rank(&self) -> u8 {
        match self {
            Priority::Hot => 0,
            Priority::Medium => 1,
            Priority::Low | Priority::Disqualified | Priority::Unknown => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Hot => "hot",
            Priority::Medium => "medium",
            Priority::Low => "low",
            Priority::Disqualified => "disqualified",
            Priority::Unknown => "unknown",
        }
    }
}

impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Priority::from_wire(&s))
    }
}

/// Macro pipeline stage of a lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    New,
    Contacted,
    Scheduled,
    ConsultationComplete,
    TreatmentStarted,
    Lost,
    Disqualified,
    Unknown,
}

impl LeadStatus {
    fn from_wire(s: &str) -> Self {
        match s {
            "new" => LeadStatus::New,
            "contacted" => LeadStatus::Contacted,
            "scheduled" => LeadStatus::Scheduled,
            "consultation_complete" => LeadStatus::ConsultationComplete,
            "treatment_started" => LeadStatus::TreatmentStarted,
            "lost" => LeadStatus::Lost,
            "disqualified" => LeadStatus::Disqualified,
            _ => LeadStatus::Unknown,
        }
    }

    /// Statuses that pull a lead out of the priority columns and into a
    /// dedicated status column.
    pub fn owns_status_column(&self) -> bool {
        matches!(self, LeadStatus::Scheduled | LeadStatus::ConsultationComplete)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::New => "new",
            LeadStatus::Contacted => "contacted",
            LeadStatus::Scheduled => "scheduled",
            LeadStatus::ConsultationComplete => "consultation_complete",
            LeadStatus::TreatmentStarted => "treatment_started",
            LeadStatus::Lost => "lost",
            LeadStatus::Disqualified => "disqualified",
            LeadStatus::Unknown => "unknown",
        }
    }
}

impl<'de> Deserialize<'de> for LeadStatus {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(LeadStatus::from_wire(&s))
    }
}

/// Outcome of the most recent contact attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContactOutcome {
    #[default]
    New,
    Answered,
    NoAnswer,
    Unreachable,
    CallbackRequested,
    NotInterested,
    Scheduled,
    Completed,
    Unknown,
}

impl ContactOutcome {
    fn from_wire(s: &str) -> Self {
        match s {
            "NEW" => ContactOutcome::New,
            "ANSWERED" => ContactOutcome::Answered,
            "NO_ANSWER" => ContactOutcome::NoAnswer,
            "UNREACHABLE" => ContactOutcome::Unreachable,
            "CALLBACK_REQUESTED" => ContactOutcome::CallbackRequested,
            "NOT_INTERESTED" => ContactOutcome::NotInterested,
            "SCHEDULED" => ContactOutcome::Scheduled,
            "COMPLETED" => ContactOutcome::Completed,
            _ => ContactOutcome::Unknown,
        }
    }
}

impl<'de> Deserialize<'de> for ContactOutcome {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(ContactOutcome::from_wire(&s))
    }
}

/// A prospective patient's contact record moving through the intake funnel.
///
/// Owned by the persistence system; this crate holds a cached copy that is
/// written only by the coordinator after server confirmation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: String,
    pub lead_number: String,
    pub priority: Priority,
    pub status: LeadStatus,
    #[serde(default)]
    pub contact_outcome: ContactOutcome,
    #[serde(default)]
    pub contact_attempts: u32,
    /// Short tag set as a side effect of certain transitions
    /// (e.g. "No Answer", "Not Interested").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_up_reason: Option<String>,
    /// Derived deadline for the next contact attempt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_follow_up_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_callback_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_consultation_at: Option<DateTime<Utc>>,
    pub submitted_at: DateTime<Utc>,
    /// None until the first mutation — the "untouched" state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_contact_attempt: Option<DateTime<Utc>>,
}

impl Lead {
    /// A fresh lead as the intake funnel produces it.
    pub fn new(
        id: impl Into<String>,
        lead_number: impl Into<String>,
        priority: Priority,
        submitted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            lead_number: lead_number.into(),
            priority,
            status: LeadStatus::New,
            contact_outcome: ContactOutcome::New,
            contact_attempts: 0,
            follow_up_reason: None,
            next_follow_up_at: None,
            scheduled_callback_at: None,
            scheduled_consultation_at: None,
            submitted_at,
            last_updated_at: None,
            last_contact_attempt: None,
        }
    }

    /// Whether the lead has never been touched by a transition.
    pub fn is_untouched(&self) -> bool {
        self.last_updated_at.is_none()
    }
}

/// A derived board column. Never persisted — membership is recomputed from
/// lead state on every render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "filterType", content = "filterValue", rename_all = "lowercase")]
pub enum ColumnSpec {
    /// Leads stay here until scheduled or completed.
    Priority(Priority),
    /// Membership by status alone, regardless of priority.
    Status(LeadStatus),
}

impl ColumnSpec {
    /// The four columns of the intake board, left to right.
    pub fn board_columns() -> [ColumnSpec; 4] {
        [
            ColumnSpec::Priority(Priority::Hot),
            ColumnSpec::Priority(Priority::Medium),
            ColumnSpec::Status(LeadStatus::Scheduled),
            ColumnSpec::Status(LeadStatus::ConsultationComplete),
        ]
    }

    pub fn is_priority_column(&self) -> bool {
        matches!(self, ColumnSpec::Priority(_))
    }
}

/// Date window filter applied within a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DateFilter {
    #[default]
    All,
    Today,
    Week,
    Month,
}

/// Column sort option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOption {
    #[default]
    Newest,
    Oldest,
    Priority,
}

/// Transient per-column filter state. Not persisted; the enclosing view
/// resets it when the column context changes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome_filter: Option<ContactOutcome>,
    #[serde(default)]
    pub date_filter: DateFilter,
    #[serde(default)]
    pub sort: SortOption,
}

/// What happened to a lead's cached state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadEventKind {
    /// A transition succeeded and the server-confirmed lead was stored.
    Updated,
    /// A conflict was reported and the server's state replaced ours.
    Adopted,
}

/// Change notification emitted after the store is written.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadEvent {
    pub id: String,
    pub lead_id: String,
    pub kind: LeadEventKind,
    pub occurred_at: DateTime<Utc>,
}

/// Per-column counts plus callback deadline tallies for the header strip.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardStats {
    pub hot: usize,
    pub medium: usize,
    pub scheduled: usize,
    pub consultation_complete: usize,
    pub callbacks_due_today: usize,
    pub callbacks_overdue: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 23, h, 0, 0).unwrap()
    }

    #[test]
    fn test_fresh_lead_is_untouched() {
        let lead = Lead::new("l1", "L-0001", Priority::Hot, ts(9));
        assert!(lead.is_untouched());
        assert_eq!(lead.status, LeadStatus::New);
        assert_eq!(lead.contact_outcome, ContactOutcome::New);
        assert_eq!(lead.contact_attempts, 0);
    }

    #[test]
    fn test_outcome_wire_casing() {
        let json = serde_json::to_string(&ContactOutcome::NoAnswer).unwrap();
        assert_eq!(json, "\"NO_ANSWER\"");
        let back: ContactOutcome = serde_json::from_str("\"CALLBACK_REQUESTED\"").unwrap();
        assert_eq!(back, ContactOutcome::CallbackRequested);
    }

    #[test]
    fn test_unknown_variants_absorb_new_wire_values() {
        let p: Priority = serde_json::from_str("\"volcanic\"").unwrap();
        assert_eq!(p, Priority::Unknown);
        let s: LeadStatus = serde_json::from_str("\"paused\"").unwrap();
        assert_eq!(s, LeadStatus::Unknown);
        let o: ContactOutcome = serde_json::from_str("\"GHOSTED\"").unwrap();
        assert_eq!(o, ContactOutcome::Unknown);
    }

    #[test]
    fn test_lead_round_trips_camel_case() {
        let lead = Lead::new("l1", "L-0001", Priority::Medium, ts(9));
        let json = serde_json::to_string(&lead).unwrap();
        assert!(json.contains("\"leadNumber\""));
        assert!(json.contains("\"submittedAt\""));
        // Untouched optionals are omitted entirely
        assert!(!json.contains("lastUpdatedAt"));
        let back: Lead = serde_json::from_str(&json).unwrap();
        assert_eq!(back, lead);
    }

    #[test]
    fn test_lead_deserializes_without_counters() {
        // Minimal payload from an older intake funnel version
        let json = r#"{
            "id": "l1",
            "leadNumber": "L-0001",
            "priority": "hot",
            "status": "new",
            "submittedAt": "2026-01-23T09:00:00Z"
        }"#;
        let lead: Lead = serde_json::from_str(json).unwrap();
        assert_eq!(lead.contact_outcome, ContactOutcome::New);
        assert_eq!(lead.contact_attempts, 0);
        assert!(lead.is_untouched());
    }

    #[test]
    fn test_priority_sort_rank() {
        assert_eq!(Priority::Hot.sort_rank(), 0);
        assert_eq!(Priority::Medium.sort_rank(), 1);
        assert_eq!(Priority::Low.sort_rank(), 2);
        assert_eq!(Priority::Unknown.sort_rank(), 2);
    }
}
