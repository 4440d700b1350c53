//! Authorization policy.
//!
//! One reusable decision function shared by every handler: compute the
//! caller's relationships to a request, then check them against the
//! relationships an operation requires. Handlers never re-implement role
//! lookups inline.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::core::{Request, Role, Roster, UserId};

use super::ops::OpError;

/// An already-resolved caller.
///
/// Identity resolution belongs to the external auth collaborator; every
/// operation takes the result explicitly instead of reading an ambient
/// context.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerIdentity {
    pub user_id: UserId,
}

impl CallerIdentity {
    pub fn new(user_id: UserId) -> Self {
        Self { user_id }
    }
}

/// How a caller relates to a request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Relationship {
    /// The user who created the request.
    Requester,
    /// The currently assigned worker.
    Assignee,
    /// An active manager of the request's property.
    Manager,
}

/// Compute every relationship the caller holds on a request.
pub fn relationships(
    caller: &CallerIdentity,
    request: &Request,
    roster: &Roster,
) -> BTreeSet<Relationship> {
    let mut set = BTreeSet::new();
    if caller.user_id == request.requested_by {
        set.insert(Relationship::Requester);
    }
    if request.assignee() == Some(&caller.user_id) {
        set.insert(Relationship::Assignee);
    }
    if roster.has_role(&caller.user_id, &request.property_id, Role::Manager) {
        set.insert(Relationship::Manager);
    }
    set
}

/// Require at least one of the given relationships.
pub fn authorize(
    caller: &CallerIdentity,
    request: &Request,
    roster: &Roster,
    required: &[Relationship],
) -> Result<BTreeSet<Relationship>, OpError> {
    let held = relationships(caller, request, roster);
    if required.iter().any(|r| held.contains(r)) {
        Ok(held)
    } else {
        Err(OpError::NotAuthorized)
    }
}
