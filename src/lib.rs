#![forbid(unsafe_code)]

//! Maintenance-request tracking engine for property operations.
//!
//! Requests move through a small status state machine (pending, assigned,
//! in_progress, completed, cancelled, rejected) with every accepted
//! transition recorded in an append-only timeline. New requests are
//! auto-assigned to the least-loaded active worker on the property. All
//! operations take an explicit caller identity, authorize through one
//! shared policy, and surface failures as `{success: false, message}`
//! envelopes at the API boundary.

pub mod api;
pub mod config;
pub mod core;
pub mod engine;
mod paths;
pub mod snapshot;
pub mod telemetry;
pub mod test_harness;

mod error;

pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;

pub use paths::snapshot_path;

// Re-export core and engine types at crate root for convenience
pub use crate::api::{
    AckResponse, CreateResponse, RequestView, RequestsResponse, Service, StatusResponse,
    UpdateView,
};
pub use crate::config::Config;
pub use crate::core::{
    Approval, Assignment, Closure, Completion, CoreError, Limits, Priority, Progress, PropertyId,
    Request, RequestId, RequestType, Role, RoleEntry, Roster, StatusKind, SystemClock, TimeSource,
    Timestamp, TrackerState, UnitId, UpdateEntry, UpdateId, UpdateLog, UserId,
};
pub use crate::engine::{
    CallerIdentity, CreateRequest, Filters, OpError, Patch, Relationship, RequestPatch,
    StatusFilter, Tracker,
};
