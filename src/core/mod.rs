//! Core domain types.
//!
//! Module hierarchy follows type dependency order:
//! - time: Timestamp + clock source
//! - identity: RequestId, UpdateId, UserId, PropertyId, UnitId
//! - domain: RequestType, Priority, Role, StatusKind
//! - progress: Assignment, Approval, Progress
//! - request: the maintenance request document
//! - update: UpdateEntry, UpdateLog
//! - roster: RoleEntry, Roster
//! - state: TrackerState + derived indexes

pub mod domain;
pub mod error;
pub mod identity;
pub mod limits;
pub mod progress;
pub mod request;
pub mod roster;
pub mod state;
pub mod time;
pub mod update;

pub use domain::{Priority, RequestType, Role, StatusKind};
pub use error::{CoreError, InvalidId, LimitExceeded};
pub use identity::{PropertyId, RequestId, UnitId, UpdateId, UserId};
pub use limits::Limits;
pub use progress::{Approval, Assignment, Closure, Completion, Progress};
pub use request::Request;
pub use roster::{RoleEntry, Roster};
pub use state::TrackerState;
pub use time::{SystemClock, TimeSource, Timestamp};
pub use update::{UpdateEntry, UpdateLog};
