//! The tracker engine: lifecycle mutations and queries over canonical state.
//!
//! Every operation takes an explicit, already-resolved `CallerIdentity` and
//! runs on `&mut self`, so mutations serialize by construction - the engine
//! has no internal locking and no retry machinery. Embedders that share a
//! tracker across threads wrap it in their own lock.

pub mod assign;
pub mod authz;
mod lifecycle;
pub mod ops;
pub mod query;

use std::sync::Arc;

use crate::config::Config;
use crate::core::{
    PropertyId, RequestId, Role, RoleEntry, StatusKind, SystemClock, TimeSource, Timestamp,
    TrackerState, UpdateEntry, UpdateId, UserId,
};

pub use assign::{Candidate, eligible_candidates, least_loaded, pick_assignee};
pub use authz::{CallerIdentity, Relationship, authorize, relationships};
pub use lifecycle::{Created, Updated};
pub use ops::{CreateRequest, OpError, Patch, RequestPatch};
pub use query::{Filters, StatusFilter};

/// The maintenance-request tracker.
pub struct Tracker {
    state: TrackerState,
    config: Config,
    clock: Arc<dyn TimeSource>,
}

impl Tracker {
    pub fn new(config: Config) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: Config, clock: Arc<dyn TimeSource>) -> Self {
        Self {
            state: TrackerState::new(),
            config,
            clock,
        }
    }

    /// Rehydrate a tracker from previously persisted state.
    ///
    /// Indexes are derived, so they are rebuilt here rather than trusted
    /// from the snapshot.
    pub fn from_state(mut state: TrackerState, config: Config, clock: Arc<dyn TimeSource>) -> Self {
        state.rebuild_indexes();
        Self {
            state,
            config,
            clock,
        }
    }

    pub fn state(&self) -> &TrackerState {
        &self.state
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub(crate) fn now(&self) -> Timestamp {
        Timestamp::from_ms(self.clock.now_ms())
    }

    // =========================================================================
    // Roster maintenance
    // =========================================================================

    /// Record or replace a user's role on a property.
    pub fn upsert_role(
        &mut self,
        property_id: PropertyId,
        user_id: UserId,
        role: Role,
        active: bool,
    ) {
        tracing::info!(
            property = %property_id,
            user = %user_id,
            role = role.as_str(),
            active,
            "roster role upserted"
        );
        self.state
            .roster
            .upsert(property_id, user_id, RoleEntry { role, active });
    }

    /// Deactivate a user's role on a property. Existing assignments are
    /// untouched; the user just stops being eligible for new ones.
    pub fn deactivate_role(&mut self, property_id: &PropertyId, user_id: &UserId) -> bool {
        let changed = self.state.roster.deactivate(property_id, user_id);
        if changed {
            tracing::info!(property = %property_id, user = %user_id, "roster role deactivated");
        }
        changed
    }

    // =========================================================================
    // Internals shared by lifecycle ops
    // =========================================================================

    /// Generate a request id that is not already taken.
    pub(crate) fn fresh_request_id(&self) -> RequestId {
        loop {
            let id = RequestId::generate(self.config.request_id_len);
            if !self.state.contains(&id) {
                return id;
            }
        }
    }

    /// Append one timeline entry for an accepted mutation.
    pub(crate) fn append_update(
        &mut self,
        request_id: &RequestId,
        property_id: PropertyId,
        status: StatusKind,
        description: String,
        updated_by: &UserId,
        at: Timestamp,
    ) {
        self.state.updates.append(UpdateEntry {
            id: UpdateId::generate(),
            request_id: request_id.clone(),
            property_id,
            status,
            description,
            updated_by: updated_by.clone(),
            photos: Vec::new(),
            at,
        });
    }

    pub(crate) fn state_mut(&mut self) -> &mut TrackerState {
        &mut self.state
    }
}
