//! Canonical tracker state.
//!
//! Single source of truth for requests, the update log, and the roster.
//! Derived indexes are rebuilt on load and updated incrementally; they are
//! never serialized.
//!
//! INVARIANT: every index row points at a live request, and every request
//! appears in exactly the index rows its fields imply. All mutation goes
//! through `insert_request` / `modify_request` / `remove_request` to keep
//! that true.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::domain::StatusKind;
use super::identity::{PropertyId, RequestId, UserId};
use super::request::Request;
use super::roster::Roster;
use super::update::UpdateLog;

/// Derived lookup indexes.
///
/// Not serialized - derived state only.
#[derive(Clone, Debug, Default)]
pub struct RequestIndexes {
    by_property: BTreeMap<PropertyId, BTreeSet<RequestId>>,
    by_requester: BTreeMap<UserId, BTreeSet<RequestId>>,
    by_status: BTreeMap<StatusKind, BTreeSet<RequestId>>,
    /// Any request carrying an assignment (assigned, in_progress, completed).
    by_assignee: BTreeMap<UserId, BTreeSet<RequestId>>,
    /// Only assignments that count toward load (assigned, in_progress).
    active_by_assignee: BTreeMap<UserId, BTreeSet<RequestId>>,
}

impl RequestIndexes {
    fn add(&mut self, request: &Request) {
        let id = request.id.clone();
        self.by_property
            .entry(request.property_id.clone())
            .or_default()
            .insert(id.clone());
        self.by_requester
            .entry(request.requested_by.clone())
            .or_default()
            .insert(id.clone());
        self.by_status
            .entry(request.status())
            .or_default()
            .insert(id.clone());
        if let Some(assignee) = request.assignee() {
            self.by_assignee
                .entry(assignee.clone())
                .or_default()
                .insert(id.clone());
            if request.status().is_active_assignment() {
                self.active_by_assignee
                    .entry(assignee.clone())
                    .or_default()
                    .insert(id);
            }
        }
    }

    fn remove(&mut self, request: &Request) {
        let id = &request.id;
        remove_row(&mut self.by_property, &request.property_id, id);
        remove_row(&mut self.by_requester, &request.requested_by, id);
        remove_row(&mut self.by_status, &request.status(), id);
        if let Some(assignee) = request.assignee() {
            remove_row(&mut self.by_assignee, assignee, id);
            remove_row(&mut self.active_by_assignee, assignee, id);
        }
    }
}

fn remove_row<K: Ord>(index: &mut BTreeMap<K, BTreeSet<RequestId>>, key: &K, id: &RequestId) {
    if let Some(ids) = index.get_mut(key) {
        ids.remove(id);
        if ids.is_empty() {
            index.remove(key);
        }
    }
}

/// Canonical state: requests + update log + roster.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TrackerState {
    requests: BTreeMap<RequestId, Request>,
    pub updates: UpdateLog,
    pub roster: Roster,
    /// Derived indexes. Not serialized - rebuilt on load.
    #[serde(skip, default)]
    indexes: RequestIndexes,
}

impl TrackerState {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn get(&self, id: &RequestId) -> Option<&Request> {
        self.requests.get(id)
    }

    pub fn contains(&self, id: &RequestId) -> bool {
        self.requests.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RequestId, &Request)> {
        self.requests.iter()
    }

    /// Requests on a property.
    pub fn ids_by_property(&self, property_id: &PropertyId) -> impl Iterator<Item = &RequestId> {
        self.indexes.by_property.get(property_id).into_iter().flatten()
    }

    /// Requests created by a user.
    pub fn ids_by_requester(&self, user_id: &UserId) -> impl Iterator<Item = &RequestId> {
        self.indexes.by_requester.get(user_id).into_iter().flatten()
    }

    /// Requests with the given status.
    pub fn ids_by_status(&self, status: StatusKind) -> impl Iterator<Item = &RequestId> {
        self.indexes.by_status.get(&status).into_iter().flatten()
    }

    /// Requests carrying an assignment for the given worker.
    pub fn ids_by_assignee(&self, user_id: &UserId) -> impl Iterator<Item = &RequestId> {
        self.indexes.by_assignee.get(user_id).into_iter().flatten()
    }

    /// Number of assigned/in-progress requests held by a worker.
    ///
    /// Index lookup, not a collection scan: this is what the assignment
    /// policy reads per candidate.
    pub fn active_load(&self, user_id: &UserId) -> usize {
        self.indexes
            .active_by_assignee
            .get(user_id)
            .map(BTreeSet::len)
            .unwrap_or(0)
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Insert a new request. Panics in debug builds on id reuse; ids are
    /// engine-generated so collisions indicate a bug, not bad input.
    pub fn insert_request(&mut self, request: Request) {
        debug_assert!(
            !self.requests.contains_key(&request.id),
            "request id reuse: {}",
            request.id
        );
        self.indexes.add(&request);
        self.requests.insert(request.id.clone(), request);
    }

    /// Mutate a request in place, fixing indexes afterward.
    ///
    /// Returns None (without running `f`) if the request does not exist.
    pub fn modify_request<R>(
        &mut self,
        id: &RequestId,
        f: impl FnOnce(&mut Request) -> R,
    ) -> Option<R> {
        let request = self.requests.get_mut(id)?;
        let before = request.clone();
        let result = f(request);
        let after = request.clone();
        self.indexes.remove(&before);
        self.indexes.add(&after);
        Some(result)
    }

    /// Hard-delete a request, cascading to its timeline.
    pub fn remove_request(&mut self, id: &RequestId) -> Option<Request> {
        let request = self.requests.remove(id)?;
        self.indexes.remove(&request);
        self.updates.remove_request(id);
        Some(request)
    }

    /// Rebuild every index from the request map. Called after
    /// deserialization; also the reference implementation the incremental
    /// maintenance must agree with.
    pub fn rebuild_indexes(&mut self) {
        self.indexes = RequestIndexes::default();
        for request in self.requests.values() {
            self.indexes.add(request);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::domain::{Priority, RequestType};
    use crate::core::progress::{Assignment, Progress};
    use crate::core::time::Timestamp;

    fn request(id: &str, property: &str, requester: &str, progress: Progress) -> Request {
        Request {
            id: RequestId::parse(id).unwrap(),
            property_id: PropertyId::new(property).unwrap(),
            unit_id: None,
            requested_by: UserId::new(requester).unwrap(),
            request_type: RequestType::General,
            priority: Priority::Medium,
            title: "t".to_string(),
            description: "d".to_string(),
            location: "l".to_string(),
            photos: Vec::new(),
            progress,
            estimated_cost: None,
            actual_cost: None,
            estimated_completion: None,
            actual_completion: None,
            tenant_approval: None,
            created_at: Timestamp::from_ms(1000),
            updated_at: Timestamp::from_ms(1000),
        }
    }

    fn assigned(worker: &str) -> Progress {
        Progress::Assigned(Assignment::new(
            UserId::new(worker).unwrap(),
            Timestamp::from_ms(1000),
        ))
    }

    #[test]
    fn insert_populates_indexes() {
        let mut state = TrackerState::new();
        state.insert_request(request("mr-a", "p1", "tenant-1", assigned("v1")));

        let worker = UserId::new("v1").unwrap();
        assert_eq!(state.active_load(&worker), 1);
        assert_eq!(
            state.ids_by_property(&PropertyId::new("p1").unwrap()).count(),
            1
        );
        assert_eq!(
            state
                .ids_by_requester(&UserId::new("tenant-1").unwrap())
                .count(),
            1
        );
        assert_eq!(state.ids_by_status(StatusKind::Assigned).count(), 1);
    }

    #[test]
    fn modify_moves_index_rows() {
        let mut state = TrackerState::new();
        state.insert_request(request("mr-a", "p1", "tenant-1", assigned("v1")));
        let id = RequestId::parse("mr-a").unwrap();
        let worker = UserId::new("v1").unwrap();

        state.modify_request(&id, |req| {
            let assignment = req.assignment().cloned().unwrap();
            req.progress = Progress::Completed(crate::core::progress::Completion {
                assignment,
                completed_at: Timestamp::from_ms(2000),
            });
        });

        // Completed assignments keep the by_assignee row but shed load.
        assert_eq!(state.active_load(&worker), 0);
        assert_eq!(state.ids_by_assignee(&worker).count(), 1);
        assert_eq!(state.ids_by_status(StatusKind::Assigned).count(), 0);
        assert_eq!(state.ids_by_status(StatusKind::Completed).count(), 1);
    }

    #[test]
    fn remove_clears_indexes_and_timeline() {
        let mut state = TrackerState::new();
        state.insert_request(request("mr-a", "p1", "tenant-1", assigned("v1")));
        let id = RequestId::parse("mr-a").unwrap();

        state.remove_request(&id);
        assert!(state.get(&id).is_none());
        assert_eq!(state.active_load(&UserId::new("v1").unwrap()), 0);
        assert_eq!(
            state.ids_by_property(&PropertyId::new("p1").unwrap()).count(),
            0
        );
        assert_eq!(state.updates.count_for(&id), 0);
    }

    #[test]
    fn rebuild_matches_incremental() {
        let mut state = TrackerState::new();
        state.insert_request(request("mr-a", "p1", "tenant-1", assigned("v1")));
        state.insert_request(request("mr-b", "p1", "tenant-2", Progress::Pending));
        state.insert_request(request("mr-c", "p2", "tenant-1", assigned("v1")));

        let mut rebuilt = state.clone();
        rebuilt.rebuild_indexes();

        let worker = UserId::new("v1").unwrap();
        assert_eq!(state.active_load(&worker), rebuilt.active_load(&worker));
        assert_eq!(
            state.ids_by_status(StatusKind::Pending).count(),
            rebuilt.ids_by_status(StatusKind::Pending).count()
        );
        assert_eq!(
            state
                .ids_by_requester(&UserId::new("tenant-1").unwrap())
                .count(),
            rebuilt
                .ids_by_requester(&UserId::new("tenant-1").unwrap())
                .count()
        );
    }

    #[test]
    fn modify_missing_request_is_none() {
        let mut state = TrackerState::new();
        let id = RequestId::parse("mr-nope").unwrap();
        assert!(state.modify_request(&id, |_| ()).is_none());
    }
}
