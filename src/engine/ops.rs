//! Operation inputs, patches, and errors.
//!
//! Provides:
//! - `Patch<T>` - Three-way patch enum (Keep, Clear, Set)
//! - `RequestPatch` - Partial update for request fields
//! - `CreateRequest` - Creation input
//! - `OpError` - Operation errors

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{
    CoreError, LimitExceeded, Limits, Priority, PropertyId, RequestId, RequestType, StatusKind,
    UnitId, UserId,
};

// =============================================================================
// Patch<T> - Three-way field update
// =============================================================================

/// Three-way patch for updating a field.
///
/// This is the clean solution to the "Option<Option<T>>" problem for
/// nullable fields:
/// - `Keep` - Don't change the field
/// - `Clear` - Set the field to None
/// - `Set(T)` - Set the field to a new value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
    /// Don't change the field.
    Keep,
    /// Clear the field (set to None).
    Clear,
    /// Set the field to a new value.
    Set(T),
}

// Manual impl: the derive would demand T: Default, which patched field
// types have no reason to provide.
impl<T> Default for Patch<T> {
    fn default() -> Self {
        Self::Keep
    }
}

impl<T> Patch<T> {
    pub fn is_keep(&self) -> bool {
        matches!(self, Self::Keep)
    }

    pub fn as_set(&self) -> Option<&T> {
        match self {
            Self::Set(v) => Some(v),
            _ => None,
        }
    }
}

// Custom serde for Patch: absent = Keep, null = Clear, value = Set
impl<T: Serialize> Serialize for Patch<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Self::Keep | Self::Clear => serializer.serialize_none(),
            Self::Set(v) => v.serialize(serializer),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        // If present and null -> Clear
        // If present and value -> Set
        // If absent -> Keep (handled by #[serde(default)])
        let opt: Option<T> = Option::deserialize(deserializer)?;
        match opt {
            None => Ok(Self::Clear),
            Some(v) => Ok(Self::Set(v)),
        }
    }
}

// =============================================================================
// CreateRequest - Creation input
// =============================================================================

/// Input to request creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRequest {
    pub property_id: PropertyId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_id: Option<UnitId>,
    pub request_type: RequestType,
    pub priority: Priority,
    pub title: String,
    pub description: String,
    pub location: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub photos: Vec<String>,
}

impl CreateRequest {
    pub fn validate(&self, limits: &Limits) -> Result<(), OpError> {
        limits.check_title(&self.title)?;
        limits.check_description(&self.description)?;
        limits.check_location(&self.location)?;
        limits.check_photos(&self.photos)?;
        Ok(())
    }
}

// =============================================================================
// RequestPatch - Partial update for request fields
// =============================================================================

/// Partial update for request fields.
///
/// All fields default to `Keep`, meaning no change. Which fields actually
/// apply depends on the caller's relationship to the request; fields the
/// caller may not touch are ignored, not rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestPatch {
    #[serde(default, skip_serializing_if = "Patch::is_keep")]
    pub title: Patch<String>,

    #[serde(default, skip_serializing_if = "Patch::is_keep")]
    pub description: Patch<String>,

    #[serde(default, skip_serializing_if = "Patch::is_keep")]
    pub priority: Patch<Priority>,

    #[serde(default, skip_serializing_if = "Patch::is_keep")]
    pub location: Patch<String>,

    #[serde(default, skip_serializing_if = "Patch::is_keep")]
    pub photos: Patch<Vec<String>>,

    #[serde(default, skip_serializing_if = "Patch::is_keep")]
    pub status: Patch<StatusKind>,

    #[serde(default, skip_serializing_if = "Patch::is_keep")]
    pub assigned_to: Patch<UserId>,
}

impl RequestPatch {
    /// Validate the patch, returning an error if invalid.
    ///
    /// Rules:
    /// - Cannot clear required fields (photos, an optional list, excepted)
    /// - Set values must respect configured limits
    pub fn validate(&self, limits: &Limits) -> Result<(), OpError> {
        for (field, cleared) in [
            ("title", matches!(self.title, Patch::Clear)),
            ("description", matches!(self.description, Patch::Clear)),
            ("priority", matches!(self.priority, Patch::Clear)),
            ("location", matches!(self.location, Patch::Clear)),
            ("status", matches!(self.status, Patch::Clear)),
            ("assigned_to", matches!(self.assigned_to, Patch::Clear)),
        ] {
            if cleared {
                return Err(OpError::ValidationFailed {
                    field: field.into(),
                    reason: "cannot clear required field".into(),
                });
            }
        }

        if let Patch::Set(title) = &self.title {
            limits.check_title(title)?;
        }
        if let Patch::Set(description) = &self.description {
            limits.check_description(description)?;
        }
        if let Patch::Set(location) = &self.location {
            limits.check_location(location)?;
        }
        if let Patch::Set(photos) = &self.photos {
            limits.check_photos(photos)?;
        }
        Ok(())
    }

    /// Check if this patch has any changes.
    pub fn is_empty(&self) -> bool {
        self.title.is_keep()
            && self.description.is_keep()
            && self.priority.is_keep()
            && self.location.is_keep()
            && self.photos.is_keep()
            && self.status.is_keep()
            && self.assigned_to.is_keep()
    }

    /// Whether any requester-editable content field is present.
    pub fn touches_content(&self) -> bool {
        !self.title.is_keep()
            || !self.description.is_keep()
            || !self.priority.is_keep()
            || !self.location.is_keep()
            || !self.photos.is_keep()
    }
}

// =============================================================================
// OpError - Operation errors
// =============================================================================

/// Errors returned by lifecycle and query operations.
///
/// All of these are terminal for the call; the API facade renders them as
/// `{success: false, message}` envelopes and nothing is retried.
#[derive(Error, Debug, Clone)]
#[non_exhaustive]
pub enum OpError {
    #[error("user not authenticated")]
    NotAuthenticated,

    #[error("request not found: {0}")]
    NotFound(RequestId),

    #[error("not authorized")]
    NotAuthorized,

    #[error("invalid transition from {} to {}", from.as_str(), to.as_str())]
    InvalidTransition { from: StatusKind, to: StatusKind },

    #[error("completion cannot be confirmed while request is {}", status.as_str())]
    NotConfirmable { status: StatusKind },

    #[error("request is completed and no longer editable by the requester")]
    RequestFrozen,

    #[error("validation failed for field {field}: {reason}")]
    ValidationFailed { field: String, reason: String },
}

impl From<LimitExceeded> for OpError {
    fn from(err: LimitExceeded) -> Self {
        Self::ValidationFailed {
            field: err.field.to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<CoreError> for OpError {
    fn from(err: CoreError) -> Self {
        Self::ValidationFailed {
            field: "input".into(),
            reason: err.to_string(),
        }
    }
}
