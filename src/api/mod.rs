//! The boundary surface: soft-failure response envelopes.
//!
//! Every operation returns a `{success, ...}` object instead of an error;
//! clients branch on `success`. The engine's typed errors are rendered into
//! the `message` field here and nowhere else.

mod convert;

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::core::{RequestId, StatusKind};
use crate::engine::{
    CallerIdentity, CreateRequest, Filters, OpError, RequestPatch, StatusFilter, Tracker,
};

pub use convert::{RequestView, UpdateView};

/// Outcome of request creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Outcome of a mutation with no payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AckResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl AckResponse {
    fn ok() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    fn err(err: &OpError) -> Self {
        Self {
            success: false,
            message: Some(err.to_string()),
        }
    }
}

/// A list of request views.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestsResponse {
    pub success: bool,
    pub requests: Vec<RequestView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// A request plus its timeline, newest entry first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<StatusKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request: Option<RequestView>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub updates: Vec<UpdateView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// The request-tracking service: a tracker behind the envelope contract.
pub struct Service {
    tracker: Tracker,
}

impl Service {
    pub fn new(tracker: Tracker) -> Self {
        Self { tracker }
    }

    pub fn from_config(config: Config) -> Self {
        Self::new(Tracker::new(config))
    }

    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    pub fn tracker_mut(&mut self) -> &mut Tracker {
        &mut self.tracker
    }

    pub fn create_request(
        &mut self,
        caller: Option<&CallerIdentity>,
        input: CreateRequest,
    ) -> CreateResponse {
        let result = require_caller(caller)
            .and_then(|caller| self.tracker.create_request(caller, input));
        match result {
            Ok(created) => CreateResponse {
                success: true,
                request_id: Some(created.request_id.as_str().to_string()),
                assigned_to: created.assigned_to.map(|u| u.as_str().to_string()),
                message: None,
            },
            Err(err) => CreateResponse {
                success: false,
                request_id: None,
                assigned_to: None,
                message: Some(err.to_string()),
            },
        }
    }

    pub fn update_request(
        &mut self,
        caller: Option<&CallerIdentity>,
        id: &RequestId,
        patch: &RequestPatch,
    ) -> AckResponse {
        let result = require_caller(caller)
            .and_then(|caller| self.tracker.update_request(caller, id, patch));
        match result {
            Ok(_) => AckResponse::ok(),
            Err(err) => AckResponse::err(&err),
        }
    }

    pub fn cancel_request(
        &mut self,
        caller: Option<&CallerIdentity>,
        id: &RequestId,
        reason: Option<String>,
    ) -> AckResponse {
        let result = require_caller(caller)
            .and_then(|caller| self.tracker.cancel_request(caller, id, reason));
        match result {
            Ok(_) => AckResponse::ok(),
            Err(err) => AckResponse::err(&err),
        }
    }

    pub fn delete_request(
        &mut self,
        caller: Option<&CallerIdentity>,
        id: &RequestId,
    ) -> AckResponse {
        let result =
            require_caller(caller).and_then(|caller| self.tracker.delete_request(caller, id));
        match result {
            Ok(()) => AckResponse::ok(),
            Err(err) => AckResponse::err(&err),
        }
    }

    pub fn tenant_confirm_completion(
        &mut self,
        caller: Option<&CallerIdentity>,
        id: &RequestId,
        rating: Option<u8>,
        feedback: Option<String>,
    ) -> AckResponse {
        let result = require_caller(caller)
            .and_then(|caller| self.tracker.confirm_completion(caller, id, rating, feedback));
        match result {
            Ok(_) => AckResponse::ok(),
            Err(err) => AckResponse::err(&err),
        }
    }

    pub fn get_my_current_requests(
        &self,
        caller: Option<&CallerIdentity>,
        status_filter: Option<&str>,
        search: Option<&str>,
    ) -> RequestsResponse {
        let result = require_caller(caller).and_then(|caller| {
            let filter = StatusFilter::parse(status_filter)?;
            Ok(self.tracker.my_current_requests(caller, filter, search))
        });
        match result {
            Ok(requests) => RequestsResponse {
                success: true,
                requests: requests.into_iter().map(RequestView::from).collect(),
                message: None,
            },
            Err(err) => RequestsResponse {
                success: false,
                requests: Vec::new(),
                message: Some(err.to_string()),
            },
        }
    }

    pub fn get_request_status(
        &self,
        caller: Option<&CallerIdentity>,
        id: &RequestId,
    ) -> StatusResponse {
        let result =
            require_caller(caller).and_then(|caller| self.tracker.request_status(caller, id));
        match result {
            Ok((request, updates)) => StatusResponse {
                success: true,
                status: Some(request.status()),
                request: Some(RequestView::from(request)),
                updates: updates.into_iter().map(UpdateView::from).collect(),
                message: None,
            },
            Err(err) => StatusResponse {
                success: false,
                status: None,
                request: None,
                updates: Vec::new(),
                message: Some(err.to_string()),
            },
        }
    }

    pub fn get_requests(
        &self,
        caller: Option<&CallerIdentity>,
        filters: &Filters,
    ) -> RequestsResponse {
        let result =
            require_caller(caller).map(|caller| self.tracker.list_requests(caller, filters));
        match result {
            Ok(requests) => RequestsResponse {
                success: true,
                requests: requests.into_iter().map(RequestView::from).collect(),
                message: None,
            },
            Err(err) => RequestsResponse {
                success: false,
                requests: Vec::new(),
                message: Some(err.to_string()),
            },
        }
    }
}

fn require_caller(caller: Option<&CallerIdentity>) -> Result<&CallerIdentity, OpError> {
    caller.ok_or(OpError::NotAuthenticated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::UserId;

    #[test]
    fn unauthenticated_calls_fail_softly() {
        let mut service = Service::from_config(Config::default());
        let id = RequestId::parse("mr-abc").unwrap();

        let ack = service.update_request(None, &id, &RequestPatch::default());
        assert!(!ack.success);
        assert_eq!(ack.message.as_deref(), Some("user not authenticated"));

        let listing = service.get_requests(None, &Filters::default());
        assert!(!listing.success);
        assert!(listing.requests.is_empty());
    }

    #[test]
    fn missing_request_fails_softly() {
        let mut service = Service::from_config(Config::default());
        let caller = CallerIdentity::new(UserId::new("tenant-1").unwrap());
        let id = RequestId::parse("mr-missing").unwrap();

        let ack = service.cancel_request(Some(&caller), &id, None);
        assert!(!ack.success);
        assert!(ack.message.unwrap().contains("not found"));
    }
}
