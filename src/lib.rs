//! Lead lifecycle and queue derivation engine for a clinic intake
//! dashboard.
//!
//! The board holds a cached copy of the lead collection and derives the
//! four work columns (hot, medium, scheduled, consultation complete) from
//! lead state on every render — columns are views, never stored. All
//! mutation flows through one path: the transition engine validates and
//! plans the change, the coordinator makes a single gateway call and
//! commits the server-confirmed result, and subscribers get a change
//! notification to re-derive their queues.
//!
//! Persistence, transport, and presentation live outside this crate
//! behind the [`gateway::PersistenceGateway`] trait and the
//! [`coordinator::LeadBoard`] API. Time is injected via [`clock::Clock`]
//! so every temporal rule is testable against a fixed instant.

pub mod classifier;
pub mod clock;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod gateway;
pub mod transition;
pub mod types;
pub mod urgency;

pub use classifier::classify;
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::BoardConfig;
pub use coordinator::LeadBoard;
pub use error::LeadError;
pub use gateway::{GatewayError, PersistenceGateway, ScheduleKind, ScheduleRequest};
pub use transition::{plan_transition, GatewayCall, OutcomeAction, Transition, TransitionPlan};
pub use types::{
    BoardStats, ColumnSpec, ContactOutcome, DateFilter, FilterCriteria, Lead, LeadEvent,
    LeadEventKind, LeadStatus, Priority, SortOption,
};
pub use urgency::{day_label, urgency, Urgency};
