//! Optimistic update coordinator.
//!
//! `LeadBoard` owns the cached lead collection and is its only writer.
//! A transition validates locally, makes exactly one gateway call, and
//! commits the server-confirmed lead on success — nothing is mutated
//! before confirmation, so a failed call leaves no partial state behind.
//! Per-lead single flight is enforced with a busy set: a second request
//! for the same id fails fast with `Busy` instead of queueing.

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashSet;
use parking_lot::{Mutex, RwLock};
use tokio::sync::broadcast;

use crate::classifier::classify;
use crate::clock::Clock;
use crate::config::BoardConfig;
use crate::error::LeadError;
use crate::gateway::{GatewayError, PersistenceGateway};
use crate::transition::{plan_transition, GatewayCall, Transition};
use crate::types::{
    BoardStats, ColumnSpec, FilterCriteria, Lead, LeadEvent, LeadEventKind, LeadStatus, Priority,
};
use crate::urgency::{urgency, Urgency};

/// Broadcast capacity for change notifications. Slow subscribers that lag
/// beyond this see `RecvError::Lagged` and should re-snapshot.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// The intake board: cached leads, busy flags, and change notifications.
pub struct LeadBoard {
    leads: RwLock<HashMap<String, Lead>>,
    in_flight: DashSet<String>,
    events: broadcast::Sender<LeadEvent>,
    history: Mutex<Vec<LeadEvent>>,
    gateway: Arc<dyn PersistenceGateway>,
    clock: Arc<dyn Clock>,
    config: BoardConfig,
}

/// Clears the busy flag when a transition finishes, on every exit path.
struct InFlightGuard<'a> {
    set: &'a DashSet<String>,
    id: &'a str,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.set.remove(self.id);
    }
}

impl LeadBoard {
    pub fn new(
        gateway: Arc<dyn PersistenceGateway>,
        clock: Arc<dyn Clock>,
        config: BoardConfig,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            leads: RwLock::new(HashMap::new()),
            in_flight: DashSet::new(),
            events,
            history: Mutex::new(Vec::new()),
            gateway,
            clock,
            config,
        }
    }

    /// Seed the board from the intake funnel or an initial fetch.
    pub fn load(&self, leads: impl IntoIterator<Item = Lead>) {
        let mut guard = self.leads.write();
        for lead in leads {
            guard.insert(lead.id.clone(), lead);
        }
    }

    /// Add a single lead (new intake submission).
    pub fn insert(&self, lead: Lead) {
        self.leads.write().insert(lead.id.clone(), lead);
    }

    /// Drop a lead from the cache (external admin deletion). Any
    /// transition still in flight for it will discard its result.
    pub fn remove(&self, lead_id: &str) -> Option<Lead> {
        self.leads.write().remove(lead_id)
    }

    pub fn get(&self, lead_id: &str) -> Option<Lead> {
        self.leads.read().get(lead_id).cloned()
    }

    /// All cached leads, unordered.
    pub fn snapshot(&self) -> Vec<Lead> {
        self.leads.read().values().cloned().collect()
    }

    /// Derive one column for rendering.
    pub fn column(&self, column: ColumnSpec, criteria: &FilterCriteria) -> Vec<Lead> {
        classify(&self.snapshot(), column, criteria, self.clock.now())
    }

    /// Whether a transition is currently in flight for this lead.
    pub fn is_busy(&self, lead_id: &str) -> bool {
        self.in_flight.contains(lead_id)
    }

    /// Subscribe to change notifications (queue re-render trigger).
    pub fn subscribe(&self) -> broadcast::Receiver<LeadEvent> {
        self.events.subscribe()
    }

    /// Most recent change events, newest first.
    pub fn recent_events(&self, limit: usize) -> Vec<LeadEvent> {
        self.history.lock().iter().take(limit).cloned().collect()
    }

    /// Header-strip counts for the four board columns plus callback
    /// deadline tallies.
    pub fn stats(&self) -> BoardStats {
        let now = self.clock.now();
        let leads = self.snapshot();
        let criteria = FilterCriteria::default();

        let count = |column: ColumnSpec| classify(&leads, column, &criteria, now).len();

        let mut due_today = 0;
        let mut overdue = 0;
        for lead in &leads {
            if lead.status != LeadStatus::Scheduled {
                continue;
            }
            if let Some(at) = lead.scheduled_callback_at {
                match urgency(at, now) {
                    Urgency::Past => overdue += 1,
                    Urgency::Soon | Urgency::Today => due_today += 1,
                    Urgency::Upcoming => {}
                }
            }
        }

        BoardStats {
            hot: count(ColumnSpec::Priority(Priority::Hot)),
            medium: count(ColumnSpec::Priority(Priority::Medium)),
            scheduled: count(ColumnSpec::Status(LeadStatus::Scheduled)),
            consultation_complete: count(ColumnSpec::Status(LeadStatus::ConsultationComplete)),
            callbacks_due_today: due_today,
            callbacks_overdue: overdue,
        }
    }

    /// Run one transition against the system of record.
    ///
    /// Flow: busy-gate → plan (validation happens here, before any call)
    /// → single gateway call → adopt the confirmed lead and notify. On
    /// transport failure the cache is left exactly as it was. On conflict
    /// the server's lead is adopted verbatim and the conflict surfaced.
    pub async fn execute(
        &self,
        lead_id: &str,
        transition: Transition,
    ) -> Result<Lead, LeadError> {
        if !self.in_flight.insert(lead_id.to_string()) {
            log::debug!("leadboard: {lead_id} busy, rejecting concurrent transition");
            return Err(LeadError::Busy(lead_id.to_string()));
        }
        let _guard = InFlightGuard {
            set: &self.in_flight,
            id: lead_id,
        };

        let current = self
            .get(lead_id)
            .ok_or_else(|| LeadError::NotFound(lead_id.to_string()))?;
        let now = self.clock.now();
        let plan = plan_transition(&current, &transition, now, &self.config)?;

        let Some(call) = plan.call else {
            // Silent no-op per the drag sub-grammar: nothing sent, nothing
            // changed.
            log::debug!("leadboard: no-op transition for {lead_id}");
            return Ok(current);
        };

        let result = match call {
            GatewayCall::UpdateStatus { status } => {
                self.gateway.update_status(lead_id, status).await
            }
            GatewayCall::UpdateOutcome {
                outcome,
                note,
                next_follow_up_at,
            } => {
                self.gateway
                    .update_outcome(lead_id, outcome, note.as_deref(), next_follow_up_at)
                    .await
            }
            GatewayCall::ScheduleEvent { request } => {
                self.gateway.schedule_event(lead_id, request).await
            }
        };

        match result {
            Ok(confirmed) => {
                if !self.adopt(lead_id, confirmed.clone(), LeadEventKind::Updated) {
                    // Torn down mid-flight: the lead left the board while
                    // the call was pending. Drop the result.
                    log::debug!("leadboard: {lead_id} removed mid-flight, discarding result");
                    return Ok(confirmed);
                }
                if let Some(text) = plan.activity_note {
                    self.spawn_note(lead_id.to_string(), text);
                }
                Ok(confirmed)
            }
            Err(GatewayError::Conflict(server)) => {
                log::warn!("leadboard: conflict on {lead_id}, adopting server state");
                self.adopt(lead_id, (*server).clone(), LeadEventKind::Adopted);
                Err(LeadError::Conflict(server))
            }
            Err(err) => {
                log::warn!("leadboard: transition failed for {lead_id}: {err}");
                Err(err.into())
            }
        }
    }

    /// Store a server-confirmed lead and notify subscribers. Returns false
    /// if the lead is no longer cached (teardown race) — nothing is
    /// written and no event fires.
    fn adopt(&self, lead_id: &str, lead: Lead, kind: LeadEventKind) -> bool {
        {
            let mut guard = self.leads.write();
            if !guard.contains_key(lead_id) {
                return false;
            }
            guard.insert(lead_id.to_string(), lead);
        }

        let event = LeadEvent {
            id: uuid::Uuid::new_v4().to_string(),
            lead_id: lead_id.to_string(),
            kind,
            occurred_at: self.clock.now(),
        };

        {
            let mut history = self.history.lock();
            history.insert(0, event.clone());
            if history.len() > self.config.event_history_size {
                history.truncate(self.config.event_history_size);
            }
        }

        // No subscribers is fine
        let _ = self.events.send(event);
        true
    }

    /// Best-effort activity note: never blocks or fails the transition.
    fn spawn_note(&self, lead_id: String, text: String) {
        let gateway = Arc::clone(&self.gateway);
        tokio::spawn(async move {
            if let Err(err) = gateway.create_note(&lead_id, &text).await {
                log::warn!("leadboard: note for {lead_id} not recorded: {err}");
            }
        });
    }
}
