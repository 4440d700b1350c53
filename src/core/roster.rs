//! Property roster: the authorization oracle.
//!
//! Maps user x property -> role + active flag. Lifecycle and query
//! operations consume it read-only; the embedder feeds it through the
//! roster maintenance operations.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::Role;
use super::identity::{PropertyId, UserId};

/// A user's standing on one property.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleEntry {
    pub role: Role,
    pub active: bool,
}

/// All user/property role mappings.
///
/// Nested maps keep lookups by property cheap and keep the worker iteration
/// order deterministic (ascending user id).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roster {
    by_property: BTreeMap<PropertyId, BTreeMap<UserId, RoleEntry>>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a user's role on a property.
    pub fn upsert(&mut self, property_id: PropertyId, user_id: UserId, entry: RoleEntry) {
        self.by_property
            .entry(property_id)
            .or_default()
            .insert(user_id, entry);
    }

    /// Mark a user's role inactive. Returns false if no mapping exists.
    pub fn deactivate(&mut self, property_id: &PropertyId, user_id: &UserId) -> bool {
        match self
            .by_property
            .get_mut(property_id)
            .and_then(|users| users.get_mut(user_id))
        {
            Some(entry) => {
                entry.active = false;
                true
            }
            None => false,
        }
    }

    /// Active role of a user on a property, if any.
    pub fn role_of(&self, user_id: &UserId, property_id: &PropertyId) -> Option<Role> {
        self.by_property
            .get(property_id)
            .and_then(|users| users.get(user_id))
            .filter(|entry| entry.active)
            .map(|entry| entry.role)
    }

    /// Whether the user holds the given active role on the property.
    pub fn has_role(&self, user_id: &UserId, property_id: &PropertyId, role: Role) -> bool {
        self.role_of(user_id, property_id) == Some(role)
    }

    /// Active vendors and field technicians on a property, ascending by id.
    pub fn workers_for<'a>(
        &'a self,
        property_id: &PropertyId,
    ) -> impl Iterator<Item = &'a UserId> {
        self.by_property
            .get(property_id)
            .into_iter()
            .flatten()
            .filter(|(_, entry)| entry.active && entry.role.is_worker())
            .map(|(user_id, _)| user_id)
    }

    pub fn len(&self) -> usize {
        self.by_property.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_property.is_empty()
    }
}
