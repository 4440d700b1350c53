//! Composite domain types.
//!
//! Assignment: worker + assignment stamp
//! Completion: assignment + completion stamp
//! Closure: reason for a cancelled/rejected request
//! Approval: tenant confirmation stamp
//! Progress: sum type - status derived from variant

use serde::{Deserialize, Serialize};

use super::domain::StatusKind;
use super::identity::UserId;
use super::time::Timestamp;

/// Worker assignment on a request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub assigned_to: UserId,
    pub assigned_at: Timestamp,
}

impl Assignment {
    pub fn new(assigned_to: UserId, assigned_at: Timestamp) -> Self {
        Self {
            assigned_to,
            assigned_at,
        }
    }
}

/// Completion info - the assignment that finished plus when.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    #[serde(flatten)]
    pub assignment: Assignment,
    pub completed_at: Timestamp,
}

/// Closure info for cancelled/rejected requests.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Closure {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Closure {
    pub fn new(reason: Option<String>) -> Self {
        Self { reason }
    }
}

/// Tenant confirmation that completed work is acceptable.
///
/// Presence is the boolean; the stamp records when it was given.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Approval {
    pub at: Timestamp,
}

/// Request progress as a sum type.
///
/// Status is DERIVED from the variant, not stored separately, and the
/// assignment rides inside the variants that have one. Impossible to be
/// `assigned` without an assignee, or to carry an assignee while `pending`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
#[derive(Default)]
pub enum Progress {
    #[default]
    Pending,
    Assigned(Assignment),
    InProgress(Assignment),
    Completed(Completion),
    Cancelled(Closure),
    Rejected(Closure),
}

impl Progress {
    /// Derive the status discriminant.
    pub fn kind(&self) -> StatusKind {
        match self {
            Self::Pending => StatusKind::Pending,
            Self::Assigned(_) => StatusKind::Assigned,
            Self::InProgress(_) => StatusKind::InProgress,
            Self::Completed(_) => StatusKind::Completed,
            Self::Cancelled(_) => StatusKind::Cancelled,
            Self::Rejected(_) => StatusKind::Rejected,
        }
    }

    /// Get the assignment if one is embedded.
    pub fn assignment(&self) -> Option<&Assignment> {
        match self {
            Self::Assigned(a) | Self::InProgress(a) => Some(a),
            Self::Completed(c) => Some(&c.assignment),
            Self::Pending | Self::Cancelled(_) | Self::Rejected(_) => None,
        }
    }

    /// Current assignee, if any.
    pub fn assignee(&self) -> Option<&UserId> {
        self.assignment().map(|a| &a.assigned_to)
    }

    /// Closure info if cancelled or rejected.
    pub fn closure(&self) -> Option<&Closure> {
        match self {
            Self::Cancelled(c) | Self::Rejected(c) => Some(c),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.kind().is_terminal()
    }
}
