//! Tab/History store
//!
//! Process-wide editing state: open tabs, the active tab, history and
//! saved requests. Every mutation is synchronous; callers persist the
//! resulting [`StoreSnapshot`] as full values under [`keys`].

mod tab_store;

pub use tab_store::TabStore;

use khabari_domain::{HistoryItem, Tab};

/// Keys used on the persistence boundary.
pub mod keys {
    /// Open tabs, in display order.
    pub const TABS: &str = "tabs";
    /// Id of the active tab.
    pub const ACTIVE_TAB: &str = "active_tab";
    /// History items, newest first.
    pub const HISTORY: &str = "history";
    /// Saved requests, newest first.
    pub const SAVED_REQUESTS: &str = "saved_requests";

    /// Every key, in the order they are written.
    pub const ALL: [&str; 4] = [TABS, ACTIVE_TAB, HISTORY, SAVED_REQUESTS];
}

/// A point-in-time copy of everything the store persists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreSnapshot {
    /// Open tabs
    pub tabs: Vec<Tab>,
    /// Active tab id
    pub active_tab: Option<String>,
    /// History items, newest first
    pub history: Vec<HistoryItem>,
    /// Saved requests, newest first
    pub saved: Vec<HistoryItem>,
}
