//! Queue derivation: which column a lead renders in, and in what order.
//!
//! Pure over its inputs — the classifier never mutates the lead
//! collection and takes `now` as a parameter. Columns are derived views:
//! leads stay in their priority column until scheduled or completed, at
//! which point the status columns take over regardless of priority.

use chrono::{DateTime, Duration, NaiveTime, Utc};

use crate::types::{ColumnSpec, DateFilter, FilterCriteria, Lead, LeadStatus, SortOption};

/// Derive the ordered contents of one column.
pub fn classify(
    leads: &[Lead],
    column: ColumnSpec,
    criteria: &FilterCriteria,
    now: DateTime<Utc>,
) -> Vec<Lead> {
    let mut members: Vec<Lead> = leads
        .iter()
        .filter(|lead| in_column(lead, column))
        .filter(|lead| passes_outcome_filter(lead, column, criteria))
        .filter(|lead| passes_date_filter(date_anchor(lead, column), criteria.date_filter, now))
        .cloned()
        .collect();

    sort_column(&mut members, column, criteria.sort);
    members
}

/// Membership rule. Priority columns require both the matching priority
/// and a status that has not yet claimed its own column; status columns
/// match on status alone.
pub fn in_column(lead: &Lead, column: ColumnSpec) -> bool {
    match column {
        ColumnSpec::Priority(p) => lead.priority == p && !lead.status.owns_status_column(),
        ColumnSpec::Status(s) => lead.status == s,
    }
}

/// Outcome filters only apply to priority columns; status columns ignore
/// them so a scheduled lead never vanishes behind a stale filter.
fn passes_outcome_filter(lead: &Lead, column: ColumnSpec, criteria: &FilterCriteria) -> bool {
    match criteria.outcome_filter {
        Some(outcome) if column.is_priority_column() => lead.contact_outcome == outcome,
        _ => true,
    }
}

/// The timestamp a date filter inspects: the booked callback for the
/// scheduled column (falling back to submission), submission elsewhere.
fn date_anchor(lead: &Lead, column: ColumnSpec) -> DateTime<Utc> {
    if column == ColumnSpec::Status(LeadStatus::Scheduled) {
        lead.scheduled_callback_at.unwrap_or(lead.submitted_at)
    } else {
        lead.submitted_at
    }
}

fn passes_date_filter(anchor: DateTime<Utc>, filter: DateFilter, now: DateTime<Utc>) -> bool {
    match filter {
        DateFilter::All => true,
        DateFilter::Today => {
            let midnight = now.date_naive().and_time(NaiveTime::MIN).and_utc();
            anchor >= midnight && anchor < midnight + Duration::hours(24)
        }
        DateFilter::Week => anchor >= now - Duration::days(7),
        DateFilter::Month => anchor >= now - Duration::days(30),
    }
}

/// All sorts are stable: equal keys preserve input order.
fn sort_column(members: &mut [Lead], column: ColumnSpec, sort: SortOption) {
    match sort {
        SortOption::Newest => {
            if column == ColumnSpec::Status(LeadStatus::Scheduled) {
                // Soonest callback first; pairs without two booked
                // callbacks fall back to newest submission.
                members.sort_by(|a, b| {
                    match (a.scheduled_callback_at, b.scheduled_callback_at) {
                        (Some(x), Some(y)) => x.cmp(&y),
                        _ => b.submitted_at.cmp(&a.submitted_at),
                    }
                });
            } else {
                members.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
            }
        }
        SortOption::Oldest => members.sort_by(|a, b| a.submitted_at.cmp(&b.submitted_at)),
        SortOption::Priority => members.sort_by(|a, b| {
            a.priority
                .sort_rank()
                .cmp(&b.priority.sort_rank())
                .then_with(|| b.submitted_at.cmp(&a.submitted_at))
        }),
    }
}
