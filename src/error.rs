//! Error types for lead transitions
//!
//! Errors are classified by how the caller should react:
//! - Validation: rejected before any gateway call; fix the request
//! - Busy: a transition is already in flight for this lead; do not retry
//! - Transport: the gateway call failed; local state untouched, retryable
//! - Conflict: the server already holds newer state; it has been adopted

use thiserror::Error;

use crate::types::Lead;

/// Error types for lead transitions
#[derive(Debug, Error)]
pub enum LeadError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Transition already in flight for lead {0}")]
    Busy(String),

    #[error("Lead not found: {0}")]
    NotFound(String),

    #[error("Transport error: {0}")]
    Transport(String),

    /// The server reported the lead was mutated by another actor. The
    /// boxed lead is the server's authoritative state, which the
    /// coordinator has already adopted verbatim.
    #[error("Lead {} was modified by another actor", .0.id)]
    Conflict(Box<Lead>),
}

impl LeadError {
    /// Returns true if the caller may retry the same request.
    ///
    /// Only transport failures qualify: validation and conflict need a
    /// changed request, and busy means a retry is already running.
    pub fn is_retryable(&self) -> bool {
        matches!(self, LeadError::Transport(_))
    }

    /// Get a user-friendly recovery suggestion
    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            LeadError::Validation(_) => "Correct the highlighted fields and try again.",
            LeadError::Busy(_) => "An update for this lead is still running. Wait for it to finish.",
            LeadError::NotFound(_) => "This lead is no longer on the board. Refresh the view.",
            LeadError::Transport(_) => "Check your connection and try again.",
            LeadError::Conflict(_) => {
                "Someone else updated this lead. The board now shows their change."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_transport_is_retryable() {
        assert!(LeadError::Transport("timeout".into()).is_retryable());
        assert!(!LeadError::Validation("bad date".into()).is_retryable());
        assert!(!LeadError::Busy("lead-1".into()).is_retryable());
        assert!(!LeadError::NotFound("lead-1".into()).is_retryable());
    }

    #[test]
    fn test_display_names_the_lead() {
        let err = LeadError::Busy("lead-42".into());
        assert!(err.to_string().contains("lead-42"));
    }
}
