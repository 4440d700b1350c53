//! The update log: append-only request timeline.
//!
//! Exactly one entry per accepted state-changing operation. Entries are
//! immutable once written and never reordered; display order is
//! newest-first.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::StatusKind;
use super::identity::{PropertyId, RequestId, UpdateId, UserId};
use super::time::Timestamp;

/// Immutable timeline entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateEntry {
    pub id: UpdateId,
    pub request_id: RequestId,
    /// Denormalized for property-scoped filtering.
    pub property_id: PropertyId,
    /// Request status at the time of this entry.
    pub status: StatusKind,
    pub description: String,
    pub updated_by: UserId,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub photos: Vec<String>,
    pub at: Timestamp,
}

/// Append-only store of timeline entries, keyed by request.
///
/// Entries are kept in append order; within one engine mutation the wall
/// clock may not advance, so append order is the tie-break that keeps the
/// newest-first view stable.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UpdateLog {
    by_request: BTreeMap<RequestId, Vec<UpdateEntry>>,
}

impl UpdateLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry to its request's timeline.
    pub fn append(&mut self, entry: UpdateEntry) {
        self.by_request
            .entry(entry.request_id.clone())
            .or_default()
            .push(entry);
    }

    /// Timeline for a request, newest first.
    pub fn entries_desc(&self, id: &RequestId) -> Vec<&UpdateEntry> {
        self.by_request
            .get(id)
            .map(|entries| entries.iter().rev().collect())
            .unwrap_or_default()
    }

    /// Number of entries for a request.
    pub fn count_for(&self, id: &RequestId) -> usize {
        self.by_request.get(id).map(Vec::len).unwrap_or(0)
    }

    /// Drop a request's entire timeline (request hard-delete cascade).
    pub fn remove_request(&mut self, id: &RequestId) -> usize {
        self.by_request.remove(id).map(|v| v.len()).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.by_request.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_request.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &UpdateEntry> {
        self.by_request.values().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(request: &str, at: u64, description: &str) -> UpdateEntry {
        UpdateEntry {
            id: UpdateId::generate(),
            request_id: RequestId::parse(request).unwrap(),
            property_id: PropertyId::new("prop-1").unwrap(),
            status: StatusKind::Pending,
            description: description.to_string(),
            updated_by: UserId::new("manager-1").unwrap(),
            photos: Vec::new(),
            at: Timestamp::from_ms(at),
        }
    }

    #[test]
    fn entries_read_newest_first() {
        let mut log = UpdateLog::new();
        let id = RequestId::parse("mr-abc").unwrap();
        log.append(entry("mr-abc", 1000, "first"));
        log.append(entry("mr-abc", 2000, "second"));
        log.append(entry("mr-abc", 2000, "third"));

        let entries = log.entries_desc(&id);
        let descriptions: Vec<&str> =
            entries.iter().map(|e| e.description.as_str()).collect();
        assert_eq!(descriptions, vec!["third", "second", "first"]);
    }

    #[test]
    fn timelines_are_per_request() {
        let mut log = UpdateLog::new();
        log.append(entry("mr-abc", 1000, "a"));
        log.append(entry("mr-xyz", 1000, "x"));

        assert_eq!(log.count_for(&RequestId::parse("mr-abc").unwrap()), 1);
        assert_eq!(log.count_for(&RequestId::parse("mr-xyz").unwrap()), 1);
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn remove_request_drops_whole_timeline() {
        let mut log = UpdateLog::new();
        let id = RequestId::parse("mr-abc").unwrap();
        log.append(entry("mr-abc", 1000, "a"));
        log.append(entry("mr-abc", 2000, "b"));

        assert_eq!(log.remove_request(&id), 2);
        assert!(log.entries_desc(&id).is_empty());
        assert!(log.is_empty());
    }
}
