//! Read-only projections over the request store.
//!
//! Candidate sets come from the narrowest applicable index; remaining
//! criteria are plain predicates. Results are newest-created-first with id
//! as the tie-break so repeated reads are stable.

use serde::{Deserialize, Serialize};

use crate::core::{
    PropertyId, Request, RequestId, RequestType, StatusKind, UpdateEntry,
};

use super::authz::{self, CallerIdentity};
use super::ops::OpError;
use super::Tracker;

/// Status dimension of `my_current_requests`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StatusFilter {
    /// Exclude terminal statuses (completed, cancelled, rejected).
    #[default]
    Active,
    /// No exclusion.
    All,
    /// Exactly this status.
    Only(StatusKind),
}

impl StatusFilter {
    /// Parse the wire form: absent = active, "all" = all, otherwise an
    /// exact status name.
    pub fn parse(raw: Option<&str>) -> Result<Self, OpError> {
        match raw {
            None => Ok(Self::Active),
            Some("all") => Ok(Self::All),
            Some(other) => StatusKind::parse(other).map(Self::Only).ok_or_else(|| {
                OpError::ValidationFailed {
                    field: "status_filter".into(),
                    reason: format!("unknown status {other:?}"),
                }
            }),
        }
    }

    fn matches(&self, status: StatusKind) -> bool {
        match self {
            Self::Active => !status.is_terminal(),
            Self::All => true,
            Self::Only(only) => status == *only,
        }
    }
}

/// Filters for the listing query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Filters {
    #[serde(default)]
    pub property_id: Option<PropertyId>,

    #[serde(default)]
    pub status: Option<StatusKind>,

    #[serde(default, rename = "type")]
    pub request_type: Option<RequestType>,

    /// Only requests currently assigned to the caller.
    #[serde(default)]
    pub assigned_to_me: bool,

    /// Only requests created by the caller.
    #[serde(default)]
    pub mine: bool,
}

impl Filters {
    fn matches(&self, caller: &CallerIdentity, request: &Request) -> bool {
        if let Some(property_id) = &self.property_id
            && request.property_id != *property_id
        {
            return false;
        }
        if let Some(status) = self.status
            && request.status() != status
        {
            return false;
        }
        if let Some(request_type) = self.request_type
            && request.request_type != request_type
        {
            return false;
        }
        if self.assigned_to_me && request.assignee() != Some(&caller.user_id) {
            return false;
        }
        if self.mine && request.requested_by != caller.user_id {
            return false;
        }
        true
    }
}

impl Tracker {
    /// The caller's own requests, newest first.
    ///
    /// With no status filter, terminal requests are excluded even though the
    /// caller created them.
    pub fn my_current_requests(
        &self,
        caller: &CallerIdentity,
        filter: StatusFilter,
        search: Option<&str>,
    ) -> Vec<&Request> {
        let state = self.state();
        let mut requests: Vec<&Request> = state
            .ids_by_requester(&caller.user_id)
            .filter_map(|id| state.get(id))
            .filter(|req| filter.matches(req.status()))
            .filter(|req| search.is_none_or(|needle| req.matches_search(needle)))
            .collect();
        sort_newest_first(&mut requests);
        requests
    }

    /// A request plus its timeline, newest entry first.
    ///
    /// Visible to the requester, the current assignee, and property
    /// managers. Read-only: calling this twice without an intervening
    /// mutation returns identical data.
    pub fn request_status(
        &self,
        caller: &CallerIdentity,
        id: &RequestId,
    ) -> Result<(&Request, Vec<&UpdateEntry>), OpError> {
        let state = self.state();
        let request = state.get(id).ok_or_else(|| OpError::NotFound(id.clone()))?;
        authz::authorize(
            caller,
            request,
            &state.roster,
            &[
                authz::Relationship::Requester,
                authz::Relationship::Assignee,
                authz::Relationship::Manager,
            ],
        )?;
        Ok((request, state.updates.entries_desc(id)))
    }

    /// Filtered listing, newest first.
    pub fn list_requests(&self, caller: &CallerIdentity, filters: &Filters) -> Vec<&Request> {
        let state = self.state();

        // Narrowest index first; everything else is a predicate.
        let candidates: Vec<&Request> = if let Some(property_id) = &filters.property_id {
            state
                .ids_by_property(property_id)
                .filter_map(|id| state.get(id))
                .collect()
        } else if filters.assigned_to_me {
            state
                .ids_by_assignee(&caller.user_id)
                .filter_map(|id| state.get(id))
                .collect()
        } else if filters.mine {
            state
                .ids_by_requester(&caller.user_id)
                .filter_map(|id| state.get(id))
                .collect()
        } else if let Some(status) = filters.status {
            state
                .ids_by_status(status)
                .filter_map(|id| state.get(id))
                .collect()
        } else {
            state.iter().map(|(_, req)| req).collect()
        };

        let mut requests: Vec<&Request> = candidates
            .into_iter()
            .filter(|req| filters.matches(caller, req))
            .collect();
        sort_newest_first(&mut requests);
        requests
    }
}

fn sort_newest_first(requests: &mut [&Request]) {
    requests.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| a.id.cmp(&b.id))
    });
}
