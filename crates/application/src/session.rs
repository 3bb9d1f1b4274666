//! Session service
//!
//! Glues the [`TabStore`], the [`Dispatcher`] and the persistence port
//! together and exposes the user intents of the front end. Store
//! mutations happen under a short synchronous lock; only the network
//! round trip and the storage writes are awaited.

use std::sync::Arc;

use khabari_domain::{
    AppSettings, EditorSection, HistoryItem, IdGenerator, QueryParam, Request, Response, Tab,
    validate_body,
};
use parking_lot::Mutex;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::dispatcher::Dispatcher;
use crate::error::{ApplicationError, ApplicationResult};
use crate::ports::{Clock, HttpClient, KeyValueStore, StorageError};
use crate::store::{StoreSnapshot, TabStore, keys};

/// Errors that stop a send before or after the network round trip.
///
/// Transport failures are not `SendError`s; they end up on the tab and
/// in history.
#[derive(Debug, Error)]
pub enum SendError {
    /// The body is not valid JSON; nothing was sent.
    #[error("{0}")]
    InvalidBody(String),

    /// The outcome could not be persisted.
    #[error(transparent)]
    Application(#[from] ApplicationError),
}

/// The result of a send, as applied to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendOutcome {
    /// Tab the request was sent from
    pub tab_id: String,
    /// The request as sent
    pub request: Request,
    /// Response, if the transport succeeded
    pub response: Option<Response>,
    /// Transport error message, if it failed
    pub error: Option<String>,
    /// Whether a new history item was recorded
    pub added_to_history: bool,
}

/// A user session over persisted tabs and history.
pub struct Session<C: HttpClient> {
    store: Mutex<TabStore>,
    dispatcher: Dispatcher<C>,
    storage: Arc<dyn KeyValueStore>,
    write_lock: tokio::sync::Mutex<()>,
    validate_json_body: bool,
}

impl<C: HttpClient> Session<C> {
    /// Loads the session from `storage`.
    ///
    /// Missing keys yield their defaults (one default tab, empty lists).
    /// A corrupt value is logged and replaced by its default.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read at all.
    pub async fn load(
        dispatcher: Dispatcher<C>,
        storage: Arc<dyn KeyValueStore>,
        ids: Arc<dyn IdGenerator>,
        clock: Arc<dyn Clock>,
        settings: &AppSettings,
    ) -> ApplicationResult<Self> {
        let snapshot = StoreSnapshot {
            tabs: read_or_default(storage.as_ref(), keys::TABS).await?,
            active_tab: read_or_default(storage.as_ref(), keys::ACTIVE_TAB).await?,
            history: read_or_default(storage.as_ref(), keys::HISTORY).await?,
            saved: read_or_default(storage.as_ref(), keys::SAVED_REQUESTS).await?,
        };
        info!(
            tabs = snapshot.tabs.len(),
            history = snapshot.history.len(),
            saved = snapshot.saved.len(),
            "session loaded"
        );

        let store = TabStore::restore(
            ids,
            clock,
            settings.default_headers.clone(),
            Some(settings.history_limit),
            snapshot,
        );

        Ok(Self {
            store: Mutex::new(store),
            dispatcher,
            storage,
            write_lock: tokio::sync::Mutex::new(()),
            validate_json_body: settings.validate_json_body,
        })
    }

    /// Reads the store.
    pub fn read<R>(&self, f: impl FnOnce(&TabStore) -> R) -> R {
        f(&self.store.lock())
    }

    /// Mutates the store and persists the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the new state cannot be written.
    pub async fn update<R>(&self, f: impl FnOnce(&mut TabStore) -> R) -> ApplicationResult<R> {
        let result = f(&mut self.store.lock());
        self.persist().await?;
        Ok(result)
    }

    /// Writes every key as a full value.
    ///
    /// Writers queue on a lock and snapshot only once they hold it, so the
    /// last write always carries the latest state.
    async fn persist(&self) -> ApplicationResult<()> {
        let _guard = self.write_lock.lock().await;
        let snapshot = self.store.lock().snapshot();

        write(self.storage.as_ref(), keys::TABS, &snapshot.tabs).await?;
        write(self.storage.as_ref(), keys::ACTIVE_TAB, &snapshot.active_tab).await?;
        write(self.storage.as_ref(), keys::HISTORY, &snapshot.history).await?;
        write(self.storage.as_ref(), keys::SAVED_REQUESTS, &snapshot.saved).await?;
        debug!("session persisted");
        Ok(())
    }

    /// Sends the active tab's request.
    ///
    /// A non-empty body that is not JSON (when validation is on) blocks
    /// the send and switches the tab to its body editor. Otherwise the
    /// result is applied to the tab that was active when the send began
    /// and recorded in history.
    ///
    /// # Errors
    ///
    /// Returns `InvalidBody` when validation fails, or an application
    /// error when persisting fails.
    pub async fn send_active(&self) -> Result<SendOutcome, SendError> {
        let started = self
            .store
            .lock()
            .try_begin_dispatch(|body| self.check_body(body));
        let (tab_id, request) = match started {
            Ok(started) => started,
            Err(message) => {
                self.persist().await?;
                return Err(SendError::InvalidBody(message));
            }
        };
        let result = self
            .dispatcher
            .send(&request)
            .await
            .map_err(|e| e.message());

        let (response, error) = match &result {
            Ok(response) => (Some(response.clone()), None),
            Err(message) => (None, Some(message.clone())),
        };
        let added_to_history =
            self.store
                .lock()
                .complete_dispatch(&tab_id, request.clone(), result);
        self.persist().await?;

        Ok(SendOutcome {
            tab_id,
            request,
            response,
            error,
            added_to_history,
        })
    }

    fn check_body(&self, body: &str) -> Result<(), String> {
        if !self.validate_json_body {
            return Ok(());
        }
        validate_body(body).map_err(|e| e.to_string())
    }

    /// Returns a copy of the active tab.
    pub fn active_tab(&self) -> Tab {
        self.read(|store| store.active_tab().clone())
    }

    /// Opens a new default tab.
    ///
    /// # Errors
    /// Returns an error if persisting fails.
    pub async fn add_tab(&self) -> ApplicationResult<String> {
        self.update(TabStore::add_tab).await
    }

    /// Closes a tab.
    ///
    /// # Errors
    /// Returns an error if persisting fails.
    pub async fn close_tab(&self, id: &str) -> ApplicationResult<bool> {
        self.update(|store| store.close_tab(id)).await
    }

    /// Activates a tab.
    ///
    /// # Errors
    /// Returns an error if the tab does not exist or persisting fails.
    pub async fn set_active_tab(&self, id: &str) -> ApplicationResult<()> {
        self.update(|store| store.set_active_tab(id)).await?
    }

    /// Edits the URL of the active tab.
    ///
    /// # Errors
    /// Returns an error if persisting fails.
    pub async fn edit_url(&self, url: &str) -> ApplicationResult<()> {
        self.update(|store| {
            let id = store.active_tab_id().to_string();
            store.edit_url(&id, url)
        })
        .await?
    }

    /// Edits the param rows of the active tab.
    ///
    /// # Errors
    /// Returns an error if persisting fails.
    pub async fn edit_params(&self, params: Vec<QueryParam>) -> ApplicationResult<()> {
        self.update(|store| {
            let id = store.active_tab_id().to_string();
            store.edit_params(&id, params)
        })
        .await?
    }

    /// Applies an arbitrary edit to the active tab's request.
    ///
    /// # Errors
    /// Returns an error if persisting fails.
    pub async fn edit_request(&self, edit: impl FnOnce(&mut Request)) -> ApplicationResult<()> {
        self.update(|store| {
            let tab = store.active_tab();
            let id = tab.id().to_string();
            let mut request = tab.request.clone();
            edit(&mut request);
            store.update_tab_request(&id, request)
        })
        .await?
    }

    /// Focuses an editor section of the active tab.
    ///
    /// # Errors
    /// Returns an error if persisting fails.
    pub async fn set_section(&self, section: EditorSection) -> ApplicationResult<()> {
        self.update(|store| {
            let id = store.active_tab_id().to_string();
            store.set_section(&id, section)
        })
        .await?
    }

    /// Saves the active tab's request.
    ///
    /// # Errors
    /// Returns an error if persisting fails.
    pub async fn save_active(&self) -> ApplicationResult<bool> {
        self.update(TabStore::save_active).await
    }

    /// Copies a history item into the saved list.
    ///
    /// # Errors
    /// Returns an error if the index is out of range or persisting fails.
    pub async fn promote_history(&self, index: usize) -> ApplicationResult<bool> {
        self.update(|store| store.promote_history(index)).await?
    }

    /// Loads a history item into the active tab.
    ///
    /// # Errors
    /// Returns an error if the index is out of range or persisting fails.
    pub async fn select_history(&self, index: usize) -> ApplicationResult<()> {
        self.update(|store| store.select_history_item(index)).await?
    }

    /// Removes saved requests by request id.
    ///
    /// # Errors
    /// Returns an error if persisting fails.
    pub async fn remove_saved(&self, request_id: &str) -> ApplicationResult<usize> {
        self.update(|store| store.remove_saved(request_id)).await
    }

    /// Empties history.
    ///
    /// # Errors
    /// Returns an error if persisting fails.
    pub async fn clear_history(&self) -> ApplicationResult<()> {
        self.update(TabStore::clear_history).await
    }

    /// Returns a copy of the history items, newest first.
    pub fn history(&self) -> Vec<HistoryItem> {
        self.read(|store| store.history().to_vec())
    }

    /// Returns a copy of the saved requests, newest first.
    pub fn saved(&self) -> Vec<HistoryItem> {
        self.read(|store| store.saved().to_vec())
    }
}

async fn read_or_default<T: DeserializeOwned + Default>(
    storage: &dyn KeyValueStore,
    key: &str,
) -> ApplicationResult<T> {
    let value = match storage.get(key).await {
        Ok(Some(value)) => value,
        Ok(None) => return Ok(T::default()),
        Err(StorageError::Corrupt { key, message }) => {
            warn!(%key, %message, "discarding corrupt persisted value");
            return Ok(T::default());
        }
        Err(e) => return Err(e.into()),
    };
    match serde_json::from_value(value) {
        Ok(decoded) => Ok(decoded),
        Err(e) => {
            warn!(%key, error = %e, "persisted value has an unexpected shape, using default");
            Ok(T::default())
        }
    }
}

async fn write<T: Serialize + ?Sized>(
    storage: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> ApplicationResult<()> {
    let value = serde_json::to_value(value).map_err(|e| ApplicationError::Encoding(e.to_string()))?;
    storage.set(key, value).await.map_err(|e| {
        warn!(%key, error = %e, "failed to persist");
        ApplicationError::from(e)
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use indexmap::IndexMap;
    use khabari_domain::{EditorSection, HttpMethod};
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::future::Future;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::Duration;

    use crate::ports::{HttpClientError, TransportRequest, TransportResponse};

    struct SequentialIds(AtomicU64);

    impl IdGenerator for SequentialIds {
        fn next_id(&self) -> String {
            format!("id-{}", self.0.fetch_add(1, Ordering::SeqCst))
        }
    }

    struct FixedClock;

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            DateTime::<Utc>::UNIX_EPOCH
        }
    }

    #[derive(Default)]
    struct MemoryStore {
        values: parking_lot::Mutex<HashMap<String, serde_json::Value>>,
        writes: AtomicU64,
    }

    #[async_trait]
    impl KeyValueStore for MemoryStore {
        async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, StorageError> {
            if key == "corrupt" {
                return Err(StorageError::Corrupt {
                    key: key.to_string(),
                    message: "bad".to_string(),
                });
            }
            Ok(self.values.lock().get(key).cloned())
        }

        async fn set(&self, key: &str, value: serde_json::Value) -> Result<(), StorageError> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.values.lock().insert(key.to_string(), value);
            Ok(())
        }
    }

    /// Answers by path: `/slow` waits, `/down` fails, anything else is JSON.
    struct MockHttpClient;

    impl HttpClient for MockHttpClient {
        fn execute(
            &self,
            request: TransportRequest,
        ) -> impl Future<Output = Result<TransportResponse, HttpClientError>> + Send {
            async move {
                if request.url.contains("/down") {
                    return Err(HttpClientError::ConnectionFailed("no route".to_string()));
                }
                if request.url.contains("/slow") {
                    tokio::time::sleep(Duration::from_millis(50)).await;
                }
                Ok(TransportResponse {
                    status: 200,
                    status_text: "OK".to_string(),
                    headers: IndexMap::new(),
                    body: br#"{"echo":true}"#.to_vec(),
                    content_type: Some("application/json".to_string()),
                })
            }
        }
    }

    async fn session_over(storage: Arc<MemoryStore>) -> Session<MockHttpClient> {
        let clock: Arc<dyn Clock> = Arc::new(FixedClock);
        Session::load(
            Dispatcher::new(Arc::new(MockHttpClient), Arc::clone(&clock)),
            storage,
            Arc::new(SequentialIds(AtomicU64::new(0))),
            clock,
            &AppSettings::default(),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_empty_storage_yields_defaults() {
        let session = session_over(Arc::new(MemoryStore::default())).await;
        let tab = session.active_tab();
        assert_eq!(tab.title, "New Request");
        assert_eq!(tab.request.method, HttpMethod::Get);
        assert!(session.history().is_empty());
        assert!(session.saved().is_empty());
    }

    #[tokio::test]
    async fn test_send_records_response_and_history() {
        let storage = Arc::new(MemoryStore::default());
        let session = session_over(Arc::clone(&storage)).await;
        session.edit_url("https://api.test/items?page=1").await.unwrap();

        let outcome = session.send_active().await.unwrap();
        assert!(outcome.added_to_history);
        assert_eq!(outcome.response.as_ref().map(Response::status), Some(200));
        assert_eq!(outcome.request.params.len(), 1);

        let tab = session.active_tab();
        assert!(!tab.loading);
        assert_eq!(tab.response, outcome.response);
        assert_eq!(session.history().len(), 1);

        let stored = storage.values.lock().get(keys::HISTORY).cloned().unwrap();
        assert_eq!(stored.as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn test_transport_failure_is_applied_not_returned() {
        let session = session_over(Arc::new(MemoryStore::default())).await;
        session.edit_url("https://api.test/down").await.unwrap();

        let outcome = session.send_active().await.unwrap();
        assert_eq!(outcome.response, None);
        assert_eq!(outcome.error.as_deref(), Some("Connection failed: no route"));

        let history = session.history();
        assert_eq!(history[0].response, None);
        assert_eq!(history[0].error, outcome.error);
    }

    #[tokio::test]
    async fn test_invalid_body_blocks_send() {
        let session = session_over(Arc::new(MemoryStore::default())).await;
        session
            .edit_request(|request| {
                request.method = HttpMethod::Post;
                request.url = "https://api.test/items".to_string();
                request.body = "{not json".to_string();
            })
            .await
            .unwrap();

        let err = session.send_active().await.unwrap_err();
        assert!(matches!(err, SendError::InvalidBody(ref m) if m.starts_with("Invalid JSON in request body")));

        let tab = session.active_tab();
        assert_eq!(tab.section, EditorSection::Body);
        assert!(tab.body_error.is_some());
        assert!(session.history().is_empty());
    }

    #[tokio::test]
    async fn test_section_focus_is_persisted() {
        let storage = Arc::new(MemoryStore::default());
        {
            let session = session_over(Arc::clone(&storage)).await;
            session.set_section(EditorSection::Headers).await.unwrap();
        }

        let session = session_over(storage).await;
        assert_eq!(session.active_tab().section, EditorSection::Headers);
    }

    #[tokio::test]
    async fn test_response_lands_on_originating_tab() {
        let session = Arc::new(session_over(Arc::new(MemoryStore::default())).await);
        session.edit_url("https://api.test/slow").await.unwrap();
        let origin = session.active_tab().id().to_string();

        let sending = {
            let session = Arc::clone(&session);
            tokio::spawn(async move { session.send_active().await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(session.read(|s| s.tab(&origin).unwrap().loading));

        let other = session.add_tab().await.unwrap();
        let outcome = sending.await.unwrap().unwrap();

        assert_eq!(outcome.tab_id, origin);
        assert_eq!(session.active_tab().id(), other);
        assert_eq!(session.active_tab().response, None);
        assert!(session.read(|s| s.tab(&origin).unwrap().response.is_some()));
    }

    #[tokio::test]
    async fn test_state_survives_reload() {
        let storage = Arc::new(MemoryStore::default());
        {
            let session = session_over(Arc::clone(&storage)).await;
            session.edit_url("https://api.test/a").await.unwrap();
            session.send_active().await.unwrap();
            session.save_active().await.unwrap();
            session.add_tab().await.unwrap();
        }

        let session = session_over(storage).await;
        assert_eq!(session.read(|s| s.tabs().len()), 2);
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.saved().len(), 1);
        assert_eq!(session.active_tab().title, "New Request");
    }

    #[tokio::test]
    async fn test_corrupt_value_falls_back_to_default() {
        let storage = MemoryStore::default();
        let tabs: Vec<Tab> = read_or_default(&storage, "corrupt").await.unwrap();
        assert!(tabs.is_empty());

        storage
            .set(keys::HISTORY, serde_json::json!({"not": "a list"}))
            .await
            .unwrap();
        let history: Vec<HistoryItem> = read_or_default(&storage, keys::HISTORY).await.unwrap();
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn test_every_mutation_writes_full_values() {
        let storage = Arc::new(MemoryStore::default());
        let session = session_over(Arc::clone(&storage)).await;
        session.clear_history().await.unwrap();
        assert_eq!(storage.writes.load(Ordering::SeqCst), keys::ALL.len() as u64);
        for key in keys::ALL {
            assert!(storage.values.lock().contains_key(key));
        }
    }
}
