//! Domain enums.
//!
//! RequestType: plumbing, electrical, hvac, appliance, general, emergency
//! Priority: low, medium, high, emergency
//! Role: manager, tenant, vendor, field_technician
//! StatusKind: wire-facing status discriminant

use serde::{Deserialize, Serialize};

/// Maintenance request category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestType {
    Plumbing,
    Electrical,
    Hvac,
    Appliance,
    General,
    Emergency,
}

impl RequestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Plumbing => "plumbing",
            Self::Electrical => "electrical",
            Self::Hvac => "hvac",
            Self::Appliance => "appliance",
            Self::General => "general",
            Self::Emergency => "emergency",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "plumbing" => Some(Self::Plumbing),
            "electrical" => Some(Self::Electrical),
            "hvac" => Some(Self::Hvac),
            "appliance" => Some(Self::Appliance),
            "general" => Some(Self::General),
            "emergency" => Some(Self::Emergency),
            _ => None,
        }
    }
}

/// Request urgency.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
    Emergency,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Emergency => "emergency",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            "emergency" => Some(Self::Emergency),
            _ => None,
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::Medium
    }
}

/// Role a user holds on a property.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Manager,
    Tenant,
    Vendor,
    FieldTechnician,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manager => "manager",
            Self::Tenant => "tenant",
            Self::Vendor => "vendor",
            Self::FieldTechnician => "field_technician",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "manager" => Some(Self::Manager),
            "tenant" => Some(Self::Tenant),
            "vendor" => Some(Self::Vendor),
            "field_technician" => Some(Self::FieldTechnician),
            _ => None,
        }
    }

    /// Roles that can be picked as assignees.
    pub fn is_worker(&self) -> bool {
        matches!(self, Self::Vendor | Self::FieldTechnician)
    }
}

/// Status discriminant.
///
/// The canonical status lives in `Progress`, which carries per-variant data;
/// this fieldless mirror is what filters, indexes, and wire payloads use.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    Pending,
    Assigned,
    InProgress,
    Completed,
    Cancelled,
    Rejected,
}

impl StatusKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Assigned => "assigned",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Rejected => "rejected",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "pending" => Some(Self::Pending),
            "assigned" => Some(Self::Assigned),
            "in_progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            "cancelled" => Some(Self::Cancelled),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Terminal statuses accept no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::Rejected)
    }

    /// Statuses that count toward a worker's active load.
    pub fn is_active_assignment(&self) -> bool {
        matches!(self, Self::Assigned | Self::InProgress)
    }

    /// Whether the state machine permits `self -> to`.
    ///
    /// Edges:
    ///   pending -> assigned | cancelled | rejected
    ///   assigned -> in_progress | cancelled
    ///   in_progress -> completed | cancelled
    pub fn can_transition_to(&self, to: Self) -> bool {
        matches!(
            (self, to),
            (Self::Pending, Self::Assigned)
                | (Self::Pending, Self::Cancelled)
                | (Self::Pending, Self::Rejected)
                | (Self::Assigned, Self::InProgress)
                | (Self::Assigned, Self::Cancelled)
                | (Self::InProgress, Self::Completed)
                | (Self::InProgress, Self::Cancelled)
        )
    }

    pub fn all() -> [Self; 6] {
        [
            Self::Pending,
            Self::Assigned,
            Self::InProgress,
            Self::Completed,
            Self::Cancelled,
            Self::Rejected,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enums_roundtrip_as_str() {
        for kind in StatusKind::all() {
            assert_eq!(StatusKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(Role::parse("field_technician"), Some(Role::FieldTechnician));
        assert_eq!(RequestType::parse("hvac"), Some(RequestType::Hvac));
        assert_eq!(Priority::parse("emergency"), Some(Priority::Emergency));
        assert_eq!(StatusKind::parse("open"), None);
    }

    #[test]
    fn terminal_statuses_have_no_outgoing_edges() {
        for from in [StatusKind::Completed, StatusKind::Cancelled, StatusKind::Rejected] {
            assert!(from.is_terminal());
            for to in StatusKind::all() {
                assert!(!from.can_transition_to(to));
            }
        }
    }

    #[test]
    fn state_machine_edges() {
        use StatusKind::*;
        assert!(Pending.can_transition_to(Assigned));
        assert!(Pending.can_transition_to(Rejected));
        assert!(Assigned.can_transition_to(InProgress));
        assert!(InProgress.can_transition_to(Completed));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Assigned.can_transition_to(Cancelled));
        assert!(InProgress.can_transition_to(Cancelled));

        assert!(!Pending.can_transition_to(InProgress));
        assert!(!Pending.can_transition_to(Completed));
        assert!(!Assigned.can_transition_to(Completed));
        assert!(!Assigned.can_transition_to(Rejected));
        assert!(!InProgress.can_transition_to(Rejected));
    }

    #[test]
    fn worker_roles() {
        assert!(Role::Vendor.is_worker());
        assert!(Role::FieldTechnician.is_worker());
        assert!(!Role::Manager.is_worker());
        assert!(!Role::Tenant.is_worker());
    }
}
