use thiserror::Error;

use crate::core::CoreError;
use crate::engine::OpError;
use crate::snapshot::SnapshotError;

/// Crate-level convenience error.
///
/// Not a "god error": it is a thin wrapper over canonical capability
/// errors. There is no transient/permanent split - every failure is
/// terminal for the call that produced it, and the API facade renders op
/// errors as soft `{success: false}` envelopes instead of surfacing this
/// type at all.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Op(#[from] OpError),

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}
