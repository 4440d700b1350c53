//! Lifecycle mutations: create, update, cancel, delete, confirm completion.
//!
//! Each operation authenticates nothing itself (callers arrive resolved),
//! authorizes through the shared policy, validates the transition against
//! the status state machine, mutates canonical state, and appends exactly
//! one timeline entry when the mutation is state-changing.

use crate::core::progress::{Approval, Assignment, Closure, Completion, Progress};
use crate::core::{RequestId, StatusKind};

use super::authz::{self, CallerIdentity, Relationship};
use super::ops::{CreateRequest, OpError, Patch, RequestPatch};
use super::{Tracker, assign};

/// Outcome of request creation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Created {
    pub request_id: RequestId,
    pub assigned_to: Option<crate::core::UserId>,
}

/// Outcome of an accepted mutation on an existing request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Updated {
    /// The request's status after the mutation.
    pub status: StatusKind,
}

const ALL_RELATIONSHIPS: &[Relationship] = &[
    Relationship::Requester,
    Relationship::Assignee,
    Relationship::Manager,
];

impl Tracker {
    /// Create a request, then attempt auto-assignment.
    ///
    /// Property and unit references are opaque external keys and are not
    /// checked for existence. If at least one eligible worker is active on
    /// the property, the request is immediately assigned to the least-loaded
    /// one and an `"Request automatically assigned"` entry is appended;
    /// otherwise it stays `pending` with an empty timeline.
    pub fn create_request(
        &mut self,
        caller: &CallerIdentity,
        input: CreateRequest,
    ) -> Result<Created, OpError> {
        input.validate(&self.config.limits)?;

        let now = self.now();
        let id = self.fresh_request_id();
        let property_id = input.property_id.clone();
        self.state_mut().insert_request(crate::core::Request {
            id: id.clone(),
            property_id: input.property_id,
            unit_id: input.unit_id,
            requested_by: caller.user_id.clone(),
            request_type: input.request_type,
            priority: input.priority,
            title: input.title,
            description: input.description,
            location: input.location,
            photos: input.photos,
            progress: Progress::Pending,
            estimated_cost: None,
            actual_cost: None,
            estimated_completion: None,
            actual_completion: None,
            tenant_approval: None,
            created_at: now,
            updated_at: now,
        });
        tracing::info!(request = %id, property = %property_id, "request created");

        let mut assigned_to = None;
        if self.config.auto_assign
            && let Some(worker) = assign::pick_assignee(self.state(), &property_id)
        {
            self.state_mut().modify_request(&id, |req| {
                req.progress = Progress::Assigned(Assignment::new(worker.clone(), now));
                req.updated_at = now;
            });
            self.append_update(
                &id,
                property_id.clone(),
                StatusKind::Assigned,
                "Request automatically assigned".to_string(),
                &caller.user_id,
                now,
            );
            tracing::info!(request = %id, worker = %worker, "request auto-assigned");
            assigned_to = Some(worker);
        }

        Ok(Created {
            request_id: id,
            assigned_to,
        })
    }

    /// Apply a partial update.
    ///
    /// Field-level permissions:
    /// - requester: content fields (title, description, priority, location,
    ///   photos), frozen once the request completes
    /// - assignee or manager: status
    /// - manager only: assigned_to (reassignment, restamping assigned_at)
    ///
    /// Fields the caller may not touch are ignored rather than rejected.
    /// Exactly one timeline entry is appended on success, carrying the
    /// resulting status.
    pub fn update_request(
        &mut self,
        caller: &CallerIdentity,
        id: &RequestId,
        patch: &RequestPatch,
    ) -> Result<Updated, OpError> {
        patch.validate(&self.config.limits)?;

        let request = self
            .state()
            .get(id)
            .ok_or_else(|| OpError::NotFound(id.clone()))?;
        let held = authz::authorize(caller, request, &self.state().roster, ALL_RELATIONSHIPS)?;
        let is_requester = held.contains(&Relationship::Requester);
        let is_assignee = held.contains(&Relationship::Assignee);
        let is_manager = held.contains(&Relationship::Manager);

        let current = request.progress.clone();
        let current_kind = current.kind();
        let property_id = request.property_id.clone();
        let editable = request.editable_by_requester();
        let now = self.now();

        if patch.touches_content() && is_requester && !editable {
            return Err(OpError::RequestFrozen);
        }
        let apply_content = is_requester && editable;
        if patch.touches_content() && !apply_content {
            tracing::debug!(request = %id, "content fields ignored: caller is not the requester");
        }

        let mut next_progress: Option<Progress> = None;

        if let Patch::Set(target) = &patch.status {
            if !(is_assignee || is_manager) {
                tracing::debug!(request = %id, "status change ignored: caller may not set status");
            } else if *target != current_kind {
                if !current_kind.can_transition_to(*target) {
                    return Err(OpError::InvalidTransition {
                        from: current_kind,
                        to: *target,
                    });
                }
                next_progress = Some(match target {
                    StatusKind::Assigned => {
                        if !is_manager {
                            return Err(OpError::NotAuthorized);
                        }
                        let worker = patch.assigned_to.as_set().cloned().ok_or_else(|| {
                            OpError::ValidationFailed {
                                field: "assigned_to".into(),
                                reason: "a worker is required to assign a request".into(),
                            }
                        })?;
                        Progress::Assigned(Assignment::new(worker, now))
                    }
                    StatusKind::InProgress => match current.assignment() {
                        Some(assignment) => Progress::InProgress(assignment.clone()),
                        None => {
                            return Err(OpError::InvalidTransition {
                                from: current_kind,
                                to: *target,
                            });
                        }
                    },
                    StatusKind::Completed => match current.assignment() {
                        Some(assignment) => Progress::Completed(Completion {
                            assignment: assignment.clone(),
                            completed_at: now,
                        }),
                        None => {
                            return Err(OpError::InvalidTransition {
                                from: current_kind,
                                to: *target,
                            });
                        }
                    },
                    StatusKind::Cancelled => {
                        if !is_manager {
                            return Err(OpError::NotAuthorized);
                        }
                        Progress::Cancelled(Closure::new(None))
                    }
                    StatusKind::Rejected => {
                        if !is_manager {
                            return Err(OpError::NotAuthorized);
                        }
                        Progress::Rejected(Closure::new(None))
                    }
                    StatusKind::Pending => {
                        // No edge re-enters pending; can_transition_to already
                        // rejected this.
                        return Err(OpError::InvalidTransition {
                            from: current_kind,
                            to: *target,
                        });
                    }
                });
            }
        }

        // Reassignment without a status change (covers manual assignment of
        // a pending request: setting a worker is what moves it to assigned).
        if next_progress.is_none()
            && let Patch::Set(worker) = &patch.assigned_to
        {
            if is_manager {
                next_progress = match &current {
                    Progress::Pending | Progress::Assigned(_) => Some(Progress::Assigned(
                        Assignment::new(worker.clone(), now),
                    )),
                    Progress::InProgress(_) => Some(Progress::InProgress(Assignment::new(
                        worker.clone(),
                        now,
                    ))),
                    Progress::Completed(_) | Progress::Cancelled(_) | Progress::Rejected(_) => {
                        return Err(OpError::InvalidTransition {
                            from: current_kind,
                            to: StatusKind::Assigned,
                        });
                    }
                };
            } else {
                tracing::debug!(request = %id, "reassignment ignored: caller is not a manager");
            }
        }

        let resulting = next_progress
            .as_ref()
            .map(Progress::kind)
            .unwrap_or(current_kind);
        let patch = patch.clone();
        self.state_mut()
            .modify_request(id, move |req| {
                if apply_content {
                    if let Patch::Set(v) = &patch.title {
                        req.title = v.clone();
                    }
                    if let Patch::Set(v) = &patch.description {
                        req.description = v.clone();
                    }
                    if let Patch::Set(v) = &patch.priority {
                        req.priority = *v;
                    }
                    if let Patch::Set(v) = &patch.location {
                        req.location = v.clone();
                    }
                    match &patch.photos {
                        Patch::Set(v) => req.photos = v.clone(),
                        Patch::Clear => req.photos.clear(),
                        Patch::Keep => {}
                    }
                }
                if let Some(progress) = next_progress {
                    if progress.kind() == StatusKind::Completed {
                        req.actual_completion = Some(now);
                    }
                    req.progress = progress;
                }
                req.updated_at = now;
            })
            .ok_or_else(|| OpError::NotFound(id.clone()))?;

        self.append_update(
            id,
            property_id,
            resulting,
            "Request updated".to_string(),
            &caller.user_id,
            now,
        );
        tracing::info!(request = %id, status = resulting.as_str(), "request updated");

        Ok(Updated { status: resulting })
    }

    /// Cancel a non-terminal request.
    pub fn cancel_request(
        &mut self,
        caller: &CallerIdentity,
        id: &RequestId,
        reason: Option<String>,
    ) -> Result<Updated, OpError> {
        if let Some(reason) = &reason {
            self.config.limits.check_reason(reason)?;
        }

        let request = self
            .state()
            .get(id)
            .ok_or_else(|| OpError::NotFound(id.clone()))?;
        authz::authorize(
            caller,
            request,
            &self.state().roster,
            &[Relationship::Requester, Relationship::Manager],
        )?;

        let current_kind = request.status();
        if current_kind.is_terminal() {
            return Err(OpError::InvalidTransition {
                from: current_kind,
                to: StatusKind::Cancelled,
            });
        }
        let property_id = request.property_id.clone();
        let now = self.now();

        let description = reason
            .clone()
            .unwrap_or_else(|| "Request cancelled".to_string());
        self.state_mut()
            .modify_request(id, move |req| {
                req.progress = Progress::Cancelled(Closure::new(reason));
                req.updated_at = now;
            })
            .ok_or_else(|| OpError::NotFound(id.clone()))?;

        self.append_update(
            id,
            property_id,
            StatusKind::Cancelled,
            description,
            &caller.user_id,
            now,
        );
        tracing::info!(request = %id, "request cancelled");

        Ok(Updated {
            status: StatusKind::Cancelled,
        })
    }

    /// Hard-delete a request, cascading to its timeline.
    ///
    /// No timeline entry is written: the timeline it would land in is gone.
    pub fn delete_request(
        &mut self,
        caller: &CallerIdentity,
        id: &RequestId,
    ) -> Result<(), OpError> {
        let request = self
            .state()
            .get(id)
            .ok_or_else(|| OpError::NotFound(id.clone()))?;
        authz::authorize(
            caller,
            request,
            &self.state().roster,
            &[Relationship::Requester, Relationship::Manager],
        )?;

        self.state_mut().remove_request(id);
        tracing::info!(request = %id, "request deleted");
        Ok(())
    }

    /// Tenant confirmation that the work is done.
    ///
    /// Only the original requester may confirm, and only while the request
    /// is in progress or completed. Rating and feedback are accepted for
    /// contract compatibility but not persisted: there is no rating store.
    pub fn confirm_completion(
        &mut self,
        caller: &CallerIdentity,
        id: &RequestId,
        rating: Option<u8>,
        feedback: Option<String>,
    ) -> Result<Updated, OpError> {
        let request = self
            .state()
            .get(id)
            .ok_or_else(|| OpError::NotFound(id.clone()))?;
        authz::authorize(
            caller,
            request,
            &self.state().roster,
            &[Relationship::Requester],
        )?;

        let current_kind = request.status();
        if !matches!(
            current_kind,
            StatusKind::InProgress | StatusKind::Completed
        ) {
            return Err(OpError::NotConfirmable {
                status: current_kind,
            });
        }
        let property_id = request.property_id.clone();
        let now = self.now();

        if rating.is_some() || feedback.is_some() {
            tracing::debug!(request = %id, ?rating, "rating/feedback received but not persisted");
        }

        self.state_mut()
            .modify_request(id, move |req| {
                req.tenant_approval = Some(Approval { at: now });
                req.updated_at = now;
            })
            .ok_or_else(|| OpError::NotFound(id.clone()))?;

        self.append_update(
            id,
            property_id,
            current_kind,
            "Tenant confirmed completion".to_string(),
            &caller.user_id,
            now,
        );
        tracing::info!(request = %id, "tenant confirmed completion");

        Ok(Updated {
            status: current_kind,
        })
    }
}
