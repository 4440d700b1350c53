//! Wire views of core documents.
//!
//! Views flatten the progress sum type into the `status` / `assigned_to` /
//! `assigned_at` shape clients consume. They are snapshots: serializable,
//! detached from store lifetimes.

use serde::{Deserialize, Serialize};

use crate::core::{Priority, Request, RequestType, StatusKind, Timestamp, UpdateEntry};

/// Full request representation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestView {
    pub id: String,
    pub property_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_id: Option<String>,
    pub requested_by: String,
    #[serde(rename = "type")]
    pub request_type: RequestType,
    pub priority: Priority,
    pub title: String,
    pub description: String,
    pub location: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub photos: Vec<String>,
    pub status: StatusKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_at: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_cost: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_cost: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_completion: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_completion: Option<Timestamp>,
    pub tenant_approval: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_approval_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<&Request> for RequestView {
    fn from(req: &Request) -> Self {
        let assignment = req.assignment();
        Self {
            id: req.id.as_str().to_string(),
            property_id: req.property_id.as_str().to_string(),
            unit_id: req.unit_id.as_ref().map(|u| u.as_str().to_string()),
            requested_by: req.requested_by.as_str().to_string(),
            request_type: req.request_type,
            priority: req.priority,
            title: req.title.clone(),
            description: req.description.clone(),
            location: req.location.clone(),
            photos: req.photos.clone(),
            status: req.status(),
            assigned_to: assignment.map(|a| a.assigned_to.as_str().to_string()),
            assigned_at: assignment.map(|a| a.assigned_at),
            estimated_cost: req.estimated_cost,
            actual_cost: req.actual_cost,
            estimated_completion: req.estimated_completion,
            actual_completion: req.actual_completion,
            tenant_approval: req.tenant_approval.is_some(),
            tenant_approval_at: req.tenant_approval.map(|a| a.at),
            created_at: req.created_at,
            updated_at: req.updated_at,
        }
    }
}

/// Timeline entry representation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateView {
    pub id: String,
    pub request_id: String,
    pub property_id: String,
    pub status: StatusKind,
    pub description: String,
    pub updated_by: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub photos: Vec<String>,
    pub timestamp: Timestamp,
}

impl From<&UpdateEntry> for UpdateView {
    fn from(entry: &UpdateEntry) -> Self {
        Self {
            id: entry.id.as_str().to_string(),
            request_id: entry.request_id.as_str().to_string(),
            property_id: entry.property_id.as_str().to_string(),
            status: entry.status,
            description: entry.description.clone(),
            updated_by: entry.updated_by.as_str().to_string(),
            photos: entry.photos.clone(),
            timestamp: entry.at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::progress::{Assignment, Progress};
    use crate::core::{PropertyId, RequestId, UserId};

    #[test]
    fn view_flattens_assignment() {
        let req = Request {
            id: RequestId::parse("mr-view1").unwrap(),
            property_id: PropertyId::new("p1").unwrap(),
            unit_id: None,
            requested_by: UserId::new("tenant-1").unwrap(),
            request_type: RequestType::Electrical,
            priority: Priority::High,
            title: "t".to_string(),
            description: "d".to_string(),
            location: "l".to_string(),
            photos: Vec::new(),
            progress: Progress::Assigned(Assignment::new(
                UserId::new("vendor-1").unwrap(),
                Timestamp::from_ms(1500),
            )),
            estimated_cost: None,
            actual_cost: None,
            estimated_completion: None,
            actual_completion: None,
            tenant_approval: None,
            created_at: Timestamp::from_ms(1000),
            updated_at: Timestamp::from_ms(1500),
        };

        let view = RequestView::from(&req);
        assert_eq!(view.status, StatusKind::Assigned);
        assert_eq!(view.assigned_to.as_deref(), Some("vendor-1"));
        assert_eq!(view.assigned_at, Some(Timestamp::from_ms(1500)));
        assert!(!view.tenant_approval);

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["status"], "assigned");
        assert_eq!(json["type"], "electrical");
    }
}
