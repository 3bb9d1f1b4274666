//! Request history and saved requests
//!
//! Both lists hold immutable snapshots, newest first, deduplicated with
//! [`requests_equal`](crate::request::requests_equal).

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::request::{Request, is_duplicate};
use crate::response::Response;

/// A snapshot of a dispatched (or saved) request and its outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryItem {
    /// The request as it was sent
    pub request: Request,
    /// Response received, if the dispatch succeeded
    #[serde(default)]
    pub response: Option<Response>,
    /// Transport error message, if the dispatch failed
    #[serde(default)]
    pub error: Option<String>,
}

impl HistoryItem {
    /// Creates an item from a request snapshot and its outcome.
    #[must_use]
    pub const fn new(request: Request, response: Option<Response>, error: Option<String>) -> Self {
        Self {
            request,
            response,
            error,
        }
    }

    /// Returns a human-readable "time ago" string relative to `now`.
    #[must_use]
    pub fn time_ago(&self, now: DateTime<Utc>) -> String {
        let duration = now.signed_duration_since(self.request.timestamp);

        if duration.num_seconds() < 60 {
            "just now".to_string()
        } else if duration.num_minutes() < 60 {
            format!("{}m ago", duration.num_minutes())
        } else if duration.num_hours() < 24 {
            format!("{}h ago", duration.num_hours())
        } else if duration.num_days() < 7 {
            format!("{}d ago", duration.num_days())
        } else {
            self.request.timestamp.format("%Y-%m-%d").to_string()
        }
    }
}

/// A newest-first list of unique [`HistoryItem`]s, optionally capped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryList {
    items: VecDeque<HistoryItem>,
    limit: Option<usize>,
}

impl HistoryList {
    /// Creates an empty list; `limit` caps the number of kept items.
    #[must_use]
    pub const fn new(limit: Option<usize>) -> Self {
        Self {
            items: VecDeque::new(),
            limit,
        }
    }

    /// Rebuilds a list from persisted items (already newest first).
    #[must_use]
    pub fn from_items(items: Vec<HistoryItem>, limit: Option<usize>) -> Self {
        let mut list = Self {
            items: items.into(),
            limit,
        };
        list.trim();
        list
    }

    /// Adds an item at the front unless an equal request is already listed.
    ///
    /// Returns whether the item was added. The oldest items are dropped
    /// once the limit is exceeded; a limit of zero keeps nothing.
    pub fn push_unique(&mut self, item: HistoryItem) -> bool {
        if self.limit == Some(0)
            || is_duplicate(&item.request, self.items.iter().map(|i| &i.request))
        {
            return false;
        }
        self.items.push_front(item);
        self.trim();
        true
    }

    /// Removes every item whose request has the given id.
    ///
    /// Returns the number of removed items.
    pub fn remove_by_request_id(&mut self, request_id: &str) -> usize {
        let before = self.items.len();
        self.items.retain(|item| item.request.id() != request_id);
        before - self.items.len()
    }

    /// Clears all items.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Returns all items (newest first).
    #[must_use]
    pub const fn items(&self) -> &VecDeque<HistoryItem> {
        &self.items
    }

    /// Returns the item at `index` (0 is newest).
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&HistoryItem> {
        self.items.get(index)
    }

    /// Finds an item by the id of its request.
    #[must_use]
    pub fn find(&self, request_id: &str) -> Option<&HistoryItem> {
        self.items.iter().find(|item| item.request.id() == request_id)
    }

    /// Returns the number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Copies the items out for persistence.
    #[must_use]
    pub fn to_vec(&self) -> Vec<HistoryItem> {
        self.items.iter().cloned().collect()
    }

    fn trim(&mut self) {
        if let Some(limit) = self.limit {
            self.items.truncate(limit);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use pretty_assertions::assert_eq;

    fn item(id: &str, url: &str) -> HistoryItem {
        let mut request = Request::new(id, Utc::now());
        request.url = url.to_string();
        HistoryItem::new(request, None, None)
    }

    #[test]
    fn test_push_is_newest_first() {
        let mut list = HistoryList::new(None);
        assert!(list.push_unique(item("a", "https://x.test/a")));
        assert!(list.push_unique(item("b", "https://x.test/b")));

        let ids: Vec<_> = list.items().iter().map(|i| i.request.id()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_duplicate_leaves_length_unchanged() {
        let mut list = HistoryList::new(None);
        list.push_unique(item("a", "https://x.test/a"));

        // Different id, trailing slash and timestamp do not matter.
        assert!(!list.push_unique(item("b", "https://x.test/a/")));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_limit_drops_oldest() {
        let mut list = HistoryList::new(Some(2));
        list.push_unique(item("a", "https://x.test/a"));
        list.push_unique(item("b", "https://x.test/b"));
        list.push_unique(item("c", "https://x.test/c"));

        assert_eq!(list.len(), 2);
        assert!(list.find("a").is_none());
        assert_eq!(list.get(0).map(|i| i.request.id()), Some("c"));
    }

    #[test]
    fn test_zero_limit_reports_nothing_added() {
        let mut list = HistoryList::new(Some(0));
        assert!(!list.push_unique(item("a", "https://x.test/a")));
        assert!(list.is_empty());
    }

    #[test]
    fn test_from_items_applies_limit() {
        let items = vec![item("a", "u1"), item("b", "u2"), item("c", "u3")];
        let list = HistoryList::from_items(items, Some(2));
        assert_eq!(list.len(), 2);
        assert_eq!(list.to_vec()[1].request.id(), "b");
    }

    #[test]
    fn test_remove_by_request_id() {
        let mut list = HistoryList::new(None);
        list.push_unique(item("a", "https://x.test/a"));
        list.push_unique(item("b", "https://x.test/b"));

        assert_eq!(list.remove_by_request_id("a"), 1);
        assert_eq!(list.remove_by_request_id("missing"), 0);
        assert_eq!(list.len(), 1);

        list.clear();
        assert!(list.is_empty());
    }

    #[test]
    fn test_time_ago() {
        let entry = item("a", "u");
        let sent = entry.request.timestamp;
        assert_eq!(entry.time_ago(sent + Duration::seconds(5)), "just now");
        assert_eq!(entry.time_ago(sent + Duration::minutes(5)), "5m ago");
        assert_eq!(entry.time_ago(sent + Duration::hours(3)), "3h ago");
        assert_eq!(entry.time_ago(sent + Duration::days(2)), "2d ago");
        assert_eq!(
            entry.time_ago(sent + Duration::days(30)),
            sent.format("%Y-%m-%d").to_string()
        );
    }
}
