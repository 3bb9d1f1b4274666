//! The tab state machine and history/saved lists.

use std::sync::Arc;

use khabari_domain::request::url_sync::{params_changed, url_changed};
use khabari_domain::{
    EditorSection, Headers, HistoryItem, HistoryList, IdGenerator, QueryParam, Request, Response,
    Tab,
};
use tracing::debug;

use super::StoreSnapshot;
use crate::error::{ApplicationError, ApplicationResult};
use crate::ports::Clock;

/// Owns the open tabs and the history/saved lists.
///
/// The tab list is never empty and exactly one tab is active.
pub struct TabStore {
    tabs: Vec<Tab>,
    active: String,
    history: HistoryList,
    saved: HistoryList,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
    template_headers: Headers,
}

impl TabStore {
    /// Creates a store with a single default tab and empty lists.
    #[must_use]
    pub fn new(
        ids: Arc<dyn IdGenerator>,
        clock: Arc<dyn Clock>,
        template_headers: Headers,
        history_limit: Option<usize>,
    ) -> Self {
        Self::restore(
            ids,
            clock,
            template_headers,
            history_limit,
            StoreSnapshot::default(),
        )
    }

    /// Rebuilds a store from persisted state.
    ///
    /// An empty tab list gets one default tab; an unknown active id falls
    /// back to the first tab.
    #[must_use]
    pub fn restore(
        ids: Arc<dyn IdGenerator>,
        clock: Arc<dyn Clock>,
        template_headers: Headers,
        history_limit: Option<usize>,
        snapshot: StoreSnapshot,
    ) -> Self {
        let mut store = Self {
            tabs: snapshot.tabs,
            active: String::new(),
            history: HistoryList::from_items(snapshot.history, history_limit),
            saved: HistoryList::from_items(snapshot.saved, None),
            ids,
            clock,
            template_headers,
        };
        if store.tabs.is_empty() {
            let tab = store.default_tab();
            store.tabs.push(tab);
        }
        store.active = snapshot
            .active_tab
            .filter(|id| store.tabs.iter().any(|t| t.id() == id))
            .unwrap_or_else(|| store.tabs[0].id().to_string());
        store
    }

    /// Copies out everything that is persisted.
    #[must_use]
    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            tabs: self.tabs.clone(),
            active_tab: Some(self.active.clone()),
            history: self.history.to_vec(),
            saved: self.saved.to_vec(),
        }
    }

    fn default_tab(&self) -> Tab {
        let request =
            Request::from_template(self.ids.next_id(), self.clock.now(), &self.template_headers);
        Tab::new(self.ids.next_id(), request)
    }

    /// Returns the open tabs in display order.
    #[must_use]
    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    /// Returns a tab by id.
    #[must_use]
    pub fn tab(&self, id: &str) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id() == id)
    }

    fn tab_mut(&mut self, id: &str) -> ApplicationResult<&mut Tab> {
        self.tabs
            .iter_mut()
            .find(|t| t.id() == id)
            .ok_or_else(|| ApplicationError::TabNotFound(id.to_string()))
    }

    /// Returns the id of the active tab.
    #[must_use]
    pub fn active_tab_id(&self) -> &str {
        &self.active
    }

    /// Returns the active tab.
    #[must_use]
    pub fn active_tab(&self) -> &Tab {
        self.tab(&self.active).unwrap_or(&self.tabs[0])
    }

    /// Returns the history list.
    #[must_use]
    pub const fn history(&self) -> &HistoryList {
        &self.history
    }

    /// Returns the saved-request list.
    #[must_use]
    pub const fn saved(&self) -> &HistoryList {
        &self.saved
    }

    /// Opens a tab with the default template and makes it active.
    ///
    /// Returns the new tab's id.
    pub fn add_tab(&mut self) -> String {
        let tab = self.default_tab();
        let id = tab.id().to_string();
        self.tabs.push(tab);
        self.active.clone_from(&id);
        debug!(tab = %id, "tab opened");
        id
    }

    /// Closes a tab.
    ///
    /// Closing the active tab activates the tab just before it (or the
    /// first one). Closing the last tab replaces it with a fresh default
    /// tab. Returns false if no tab has that id.
    pub fn close_tab(&mut self, id: &str) -> bool {
        let Some(index) = self.tabs.iter().position(|t| t.id() == id) else {
            return false;
        };
        self.tabs.remove(index);

        if self.tabs.is_empty() {
            let tab = self.default_tab();
            self.active = tab.id().to_string();
            self.tabs.push(tab);
        } else if self.active == id {
            self.active = self.tabs[index.saturating_sub(1)].id().to_string();
        }
        debug!(tab = %id, active = %self.active, "tab closed");
        true
    }

    /// Makes a tab active.
    ///
    /// # Errors
    /// Returns `TabNotFound` if no tab has that id.
    pub fn set_active_tab(&mut self, id: &str) -> ApplicationResult<()> {
        self.tab_mut(id)?;
        self.active = id.to_string();
        Ok(())
    }

    /// Replaces a tab's request and re-derives its title.
    ///
    /// # Errors
    /// Returns `TabNotFound` if no tab has that id.
    pub fn update_tab_request(&mut self, id: &str, request: Request) -> ApplicationResult<()> {
        self.tab_mut(id)?.set_request(request);
        Ok(())
    }

    /// Replaces a tab's response and error together.
    ///
    /// # Errors
    /// Returns `TabNotFound` if no tab has that id.
    pub fn update_tab_response(
        &mut self,
        id: &str,
        response: Option<Response>,
        error: Option<String>,
    ) -> ApplicationResult<()> {
        self.tab_mut(id)?.set_outcome(response, error);
        Ok(())
    }

    /// Applies a URL edit, re-deriving the param rows when the new URL
    /// carries any parameters.
    ///
    /// # Errors
    /// Returns `TabNotFound` if no tab has that id.
    pub fn edit_url(&mut self, id: &str, url: &str) -> ApplicationResult<()> {
        let tab = self.tab_mut(id)?;
        let mut request = tab.request.clone();
        request.url = url.to_string();
        if let Some(params) = url_changed(url) {
            request.params = params;
        }
        tab.set_request(request);
        Ok(())
    }

    /// Applies a param-row edit, rebuilding the URL when it changes.
    ///
    /// # Errors
    /// Returns `TabNotFound` if no tab has that id.
    pub fn edit_params(&mut self, id: &str, params: Vec<QueryParam>) -> ApplicationResult<()> {
        let tab = self.tab_mut(id)?;
        let mut request = tab.request.clone();
        if let Some(url) = params_changed(&request.url, &params) {
            request.url = url;
        }
        request.params = params;
        tab.set_request(request);
        Ok(())
    }

    /// Focuses an editor section of a tab.
    ///
    /// # Errors
    /// Returns `TabNotFound` if no tab has that id.
    pub fn set_section(&mut self, id: &str, section: EditorSection) -> ApplicationResult<()> {
        self.tab_mut(id)?.section = section;
        Ok(())
    }

    /// Starts a dispatch from the active tab.
    ///
    /// Refreshes the request timestamp, marks the tab loading and returns
    /// the tab id with a snapshot of the request to send. The id is what
    /// the result must be applied to, whichever tab is active by then.
    pub fn begin_dispatch(&mut self) -> (String, Request) {
        let now = self.clock.now();
        let index = self
            .tabs
            .iter()
            .position(|t| t.id() == self.active)
            .unwrap_or(0);
        let tab = &mut self.tabs[index];
        tab.request.touch(now);
        tab.loading = true;
        tab.body_error = None;
        (tab.id().to_string(), tab.request.clone())
    }

    /// Starts a dispatch from the active tab if its body passes `check`.
    ///
    /// The check and the start happen under the same borrow, so the tab
    /// that is sent is the tab that was checked. A rejected body is
    /// recorded on that tab, which switches to its body editor and is not
    /// marked loading.
    ///
    /// # Errors
    /// Returns the message from `check` when the body is rejected.
    pub fn try_begin_dispatch(
        &mut self,
        check: impl FnOnce(&str) -> Result<(), String>,
    ) -> Result<(String, Request), String> {
        let index = self
            .tabs
            .iter()
            .position(|t| t.id() == self.active)
            .unwrap_or(0);
        if let Err(message) = check(&self.tabs[index].request.body) {
            let tab = &mut self.tabs[index];
            tab.body_error = Some(message.clone());
            tab.section = EditorSection::Body;
            return Err(message);
        }
        Ok(self.begin_dispatch())
    }

    /// Applies a finished dispatch to the tab it started from and records
    /// it in history.
    ///
    /// If that tab was closed meanwhile, only history is updated. Returns
    /// whether a history item was added.
    pub fn complete_dispatch(
        &mut self,
        tab_id: &str,
        request: Request,
        result: Result<Response, String>,
    ) -> bool {
        let (response, error) = match result {
            Ok(response) => (Some(response), None),
            Err(message) => (None, Some(message)),
        };
        match self.tabs.iter_mut().find(|t| t.id() == tab_id) {
            Some(tab) => tab.set_outcome(response.clone(), error.clone()),
            None => debug!(tab = %tab_id, "tab closed before its response arrived"),
        }
        self.add_to_history(HistoryItem::new(request, response, error))
    }

    /// Adds an item to history unless an equal request is already there.
    pub fn add_to_history(&mut self, item: HistoryItem) -> bool {
        self.history.push_unique(item)
    }

    /// Adds an item to the saved list unless an equal request is already there.
    pub fn add_to_saved(&mut self, item: HistoryItem) -> bool {
        self.saved.push_unique(item)
    }

    /// Saves the active tab's request along with its current outcome.
    pub fn save_active(&mut self) -> bool {
        let tab = self.active_tab();
        let item = HistoryItem::new(tab.request.clone(), tab.response.clone(), tab.error.clone());
        self.add_to_saved(item)
    }

    /// Copies a history item into the saved list.
    ///
    /// # Errors
    /// Returns `ItemNotFound` if `index` is out of range.
    pub fn promote_history(&mut self, index: usize) -> ApplicationResult<bool> {
        let item = self
            .history
            .get(index)
            .cloned()
            .ok_or(ApplicationError::ItemNotFound(index))?;
        Ok(self.add_to_saved(item))
    }

    /// Removes saved items by request id. Returns how many were removed.
    pub fn remove_saved(&mut self, request_id: &str) -> usize {
        self.saved.remove_by_request_id(request_id)
    }

    /// Empties history. Saved requests are untouched.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Loads a history item into the active tab.
    ///
    /// # Errors
    /// Returns `ItemNotFound` if `index` is out of range.
    pub fn select_history_item(&mut self, index: usize) -> ApplicationResult<()> {
        let item = self
            .history
            .get(index)
            .cloned()
            .ok_or(ApplicationError::ItemNotFound(index))?;
        let active = self.active.clone();
        let tab = self.tab_mut(&active)?;
        tab.set_request(item.request);
        tab.set_outcome(item.response, item.error);
        Ok(())
    }
}
