//! Narrow interface to the external system of record.
//!
//! Every call is asynchronous and returns the server's authoritative copy
//! of the lead, which the coordinator adopts on success. Implementations
//! live outside this crate (HTTP client, test double); the trait is
//! dyn-compatible via `async_trait` so the board can hold an `Arc<dyn>`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::LeadError;
use crate::types::{ContactOutcome, Lead, LeadStatus};

/// What kind of event a scheduling call books.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleKind {
    Consultation,
    Callback,
}

/// Payload for `schedule_event`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRequest {
    pub at: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: ScheduleKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Errors an implementation may surface. Transport and validation are
/// terminal for the attempt; conflict carries the server's current lead.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("transport failure: {0}")]
    Transport(String),

    #[error("rejected by persistence: {0}")]
    Validation(String),

    #[error("lead {} already mutated by another actor", .0.id)]
    Conflict(Box<Lead>),
}

impl From<GatewayError> for LeadError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Transport(msg) => LeadError::Transport(msg),
            GatewayError::Validation(msg) => LeadError::Validation(msg),
            GatewayError::Conflict(lead) => LeadError::Conflict(lead),
        }
    }
}

/// Remote persistence for leads. No timeouts here — the transport layer
/// owns those.
#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    /// Set the macro lifecycle status outright (Kanban drop).
    async fn update_status(&self, lead_id: &str, status: LeadStatus)
        -> Result<Lead, GatewayError>;

    /// Record a contact outcome, optionally with a note and a derived
    /// follow-up deadline.
    async fn update_outcome(
        &self,
        lead_id: &str,
        outcome: ContactOutcome,
        note: Option<&str>,
        next_follow_up_at: Option<DateTime<Utc>>,
    ) -> Result<Lead, GatewayError>;

    /// Book a consultation or callback.
    async fn schedule_event(
        &self,
        lead_id: &str,
        request: ScheduleRequest,
    ) -> Result<Lead, GatewayError>;

    /// Append a free-text note to the lead's activity log. Best-effort
    /// from the coordinator's point of view.
    async fn create_note(&self, lead_id: &str, text: &str) -> Result<(), GatewayError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_errors_map_to_lead_errors() {
        let err: LeadError = GatewayError::Transport("connection reset".into()).into();
        assert!(matches!(err, LeadError::Transport(_)));
        assert!(err.is_retryable());

        let err: LeadError = GatewayError::Validation("slot taken".into()).into();
        assert!(matches!(err, LeadError::Validation(_)));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_schedule_request_wire_shape() {
        use chrono::TimeZone;
        let req = ScheduleRequest {
            at: Utc.with_ymd_and_hms(2026, 1, 24, 15, 0, 0).unwrap(),
            kind: ScheduleKind::Callback,
            notes: None,
        };
        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains("\"type\":\"callback\""));
        assert!(!json.contains("notes"));
    }
}
