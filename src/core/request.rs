//! The maintenance request document.
//!
//! Creation provenance (requester, property, stamp) is immutable; everything
//! else mutates through the engine, which re-stamps `updated_at` on every
//! accepted operation.

use serde::{Deserialize, Serialize};

use super::domain::{Priority, RequestType, StatusKind};
use super::identity::{PropertyId, RequestId, UnitId, UserId};
use super::progress::{Approval, Assignment, Progress};
use super::time::Timestamp;

/// A maintenance request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    pub id: RequestId,
    pub property_id: PropertyId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_id: Option<UnitId>,
    pub requested_by: UserId,
    pub request_type: RequestType,
    pub priority: Priority,
    pub title: String,
    pub description: String,
    pub location: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub photos: Vec<String>,
    #[serde(flatten)]
    pub progress: Progress,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_cost: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_cost: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_completion: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_completion: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_approval: Option<Approval>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Request {
    /// Derived status discriminant.
    pub fn status(&self) -> StatusKind {
        self.progress.kind()
    }

    /// Current assignment, if any.
    pub fn assignment(&self) -> Option<&Assignment> {
        self.progress.assignment()
    }

    /// Current assignee, if any.
    pub fn assignee(&self) -> Option<&UserId> {
        self.progress.assignee()
    }

    /// Whether the requester may still edit content fields.
    ///
    /// Completed requests are frozen for the requester.
    pub fn editable_by_requester(&self) -> bool {
        self.status() != StatusKind::Completed
    }

    /// Case-insensitive search over title, description, and location.
    pub fn matches_search(&self, needle: &str) -> bool {
        let n = needle.to_lowercase();
        self.title.to_lowercase().contains(&n)
            || self.description.to_lowercase().contains(&n)
            || self.location.to_lowercase().contains(&n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(progress: Progress) -> Request {
        Request {
            id: RequestId::parse("mr-test1").unwrap(),
            property_id: PropertyId::new("prop-1").unwrap(),
            unit_id: None,
            requested_by: UserId::new("tenant-1").unwrap(),
            request_type: RequestType::Plumbing,
            priority: Priority::High,
            title: "Leaking tap".to_string(),
            description: "Kitchen tap drips constantly".to_string(),
            location: "Kitchen".to_string(),
            photos: Vec::new(),
            progress,
            estimated_cost: None,
            actual_cost: None,
            estimated_completion: None,
            actual_completion: None,
            tenant_approval: None,
            created_at: Timestamp::from_ms(1000),
            updated_at: Timestamp::from_ms(1000),
        }
    }

    #[test]
    fn requester_edits_frozen_when_completed() {
        let assignment = Assignment::new(UserId::new("vendor-1").unwrap(), Timestamp::from_ms(1500));
        assert!(request(Progress::Pending).editable_by_requester());
        assert!(request(Progress::Assigned(assignment.clone())).editable_by_requester());
        assert!(
            !request(Progress::Completed(crate::core::progress::Completion {
                assignment,
                completed_at: Timestamp::from_ms(2000),
            }))
            .editable_by_requester()
        );
    }

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let req = request(Progress::Pending);
        assert!(req.matches_search("LEAK"));
        assert!(req.matches_search("drips"));
        assert!(req.matches_search("kitchen"));
        assert!(!req.matches_search("electrical"));
    }

    #[test]
    fn serde_flattens_status() {
        let req = request(Progress::Pending);
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["status"], "pending");
        assert_eq!(json["id"], "mr-test1");

        let back: Request = serde_json::from_value(json).unwrap();
        assert_eq!(back, req);
    }
}
