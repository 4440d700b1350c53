//! Assignment policy: least-loaded eligible worker.
//!
//! Pure decision logic, invoked at request creation (and nowhere else).
//! Greedy: picks the candidate with the fewest assigned/in-progress
//! requests, ties broken by ascending user id so the outcome never depends
//! on store iteration order. Not priority- or skill-aware.

use crate::core::{PropertyId, TrackerState, UserId};

/// An eligible worker with their current active load.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
    pub user_id: UserId,
    pub load: usize,
}

/// Pick the least-loaded candidate; ties resolve to the smallest user id.
pub fn least_loaded(candidates: &[Candidate]) -> Option<&Candidate> {
    candidates
        .iter()
        .min_by(|a, b| a.load.cmp(&b.load).then_with(|| a.user_id.cmp(&b.user_id)))
}

/// Eligible workers for a property with index-derived loads.
pub fn eligible_candidates(state: &TrackerState, property_id: &PropertyId) -> Vec<Candidate> {
    state
        .roster
        .workers_for(property_id)
        .map(|user_id| Candidate {
            user_id: user_id.clone(),
            load: state.active_load(user_id),
        })
        .collect()
}

/// The worker a new request on this property should go to, if any.
pub fn pick_assignee(state: &TrackerState, property_id: &PropertyId) -> Option<UserId> {
    let candidates = eligible_candidates(state, property_id);
    least_loaded(&candidates).map(|c| c.user_id.clone())
}
