//! Resource service: loader, local collection and CRUD mutator for one
//! resource.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::{RwLock, broadcast};

use crate::api::ApiClient;
use crate::config::ClientConfig;
use crate::domain::{Fetched, Record, RecordId, merge_patch};
use crate::error::ClientError;
use crate::notice::{Notice, NoticeBoard};
use crate::store::{CollectionEvent, CollectionStore};
use crate::view::{ViewQuery, derive_view};

/// Loading flags exposed to the screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadState {
    /// An initial load is in flight.
    pub loading: bool,
    /// A user-triggered refresh is in flight.
    pub refreshing: bool,
    /// Completion time of the last successful fetch.
    pub last_loaded_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy)]
enum FetchKind {
    Load,
    Refresh,
}

/// Orchestration layer for one resource collection.
///
/// Every mutation follows the same pattern: call the backend, and only on
/// success reconcile the local collection and publish a change event. Any
/// failure is posted to the [`NoticeBoard`] and returned, leaving the
/// collection at its last known good value.
#[derive(Debug)]
pub struct ResourceService<R: Record> {
    api: ApiClient,
    store: CollectionStore<R>,
    notices: Arc<NoticeBoard>,
    state: RwLock<LoadState>,
}

impl<R: Record> ResourceService<R> {
    /// Creates a service around an existing client and notice board.
    ///
    /// `event_capacity` bounds the change events buffered per subscriber.
    #[must_use]
    pub fn new(api: ApiClient, notices: Arc<NoticeBoard>, event_capacity: usize) -> Self {
        Self {
            api,
            store: CollectionStore::new(event_capacity),
            notices,
            state: RwLock::new(LoadState::default()),
        }
    }

    /// Creates a service with its own client built from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] if the HTTP client cannot be built.
    pub fn from_config(
        config: &ClientConfig,
        notices: Arc<NoticeBoard>,
    ) -> Result<Self, ClientError> {
        Ok(Self::new(
            ApiClient::new(config)?,
            notices,
            config.change_event_capacity,
        ))
    }

    /// Returns the notice board failures are posted to.
    #[must_use]
    pub fn notices(&self) -> &Arc<NoticeBoard> {
        &self.notices
    }

    /// Returns the underlying HTTP client.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Subscribes to collection change events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<CollectionEvent> {
        self.store.subscribe()
    }

    /// Returns the current loading flags.
    pub async fn load_state(&self) -> LoadState {
        *self.state.read().await
    }

    /// Returns the current collection snapshot.
    pub async fn records(&self) -> Arc<Vec<R>> {
        self.store.snapshot().await
    }

    /// Returns the identifiers of the current collection, in order.
    pub async fn ids(&self) -> Vec<RecordId> {
        self.store.ids().await
    }

    /// Returns a local copy of one record.
    pub async fn get(&self, id: &RecordId) -> Option<R> {
        self.store.get(id).await
    }

    /// Derives the display list for `query` from the current snapshot.
    pub async fn view(&self, query: &ViewQuery) -> Vec<R> {
        let snapshot = self.store.snapshot().await;
        derive_view(snapshot.as_slice(), query)
    }

    /// Initial load: fetches the collection and replaces the local copy.
    ///
    /// Returns the number of records loaded.
    ///
    /// # Errors
    ///
    /// Returns the fetch error after posting it as a notice; the local
    /// collection is left untouched.
    pub async fn load(&self) -> Result<usize, ClientError> {
        self.fetch_all(FetchKind::Load).await
    }

    /// Pull-to-refresh: same as [`Self::load`] but flags `refreshing`.
    ///
    /// # Errors
    ///
    /// Returns the fetch error after posting it as a notice; the local
    /// collection is left untouched.
    pub async fn refresh(&self) -> Result<usize, ClientError> {
        self.fetch_all(FetchKind::Refresh).await
    }

    /// Fetches a single record from the backend without touching the
    /// local collection.
    ///
    /// # Errors
    ///
    /// Returns the fetch error after posting it as a notice.
    pub async fn fetch_one(&self, id: &RecordId) -> Result<R, ClientError> {
        let result = self.api.fetch::<R>(id).await.map(|fetched| fetched.record);
        self.surface(result).await
    }

    /// Creates a record and inserts the stored version locally.
    ///
    /// # Errors
    ///
    /// Returns the failure after posting it as a notice; the local
    /// collection is left untouched.
    pub async fn create<P: Serialize + Sync>(&self, payload: &P) -> Result<R, ClientError> {
        let result: Result<Fetched<R>, ClientError> = async {
            let body = serde_json::to_value(payload)?;
            self.api.create::<R>(&body).await
        }
        .await;
        let created = self.surface(result).await?;

        let record = created.record.clone();
        self.store.insert(created).await;
        tracing::info!(resource = %R::RESOURCE, id = %record.id(), "record created");
        Ok(record)
    }

    /// Merges `changes` into the record's backend document, as last
    /// received, and PUTs the full result, so fields the caller did not
    /// touch go back exactly as the backend sent them.
    ///
    /// When the backend acknowledges without returning the record, the
    /// local copy is rebuilt from the merged document.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotFound`] without a network call when the
    /// record is not in the local collection, or the backend failure.
    /// Either way the error is posted as a notice and the local collection
    /// is left untouched.
    pub async fn update(&self, id: &RecordId, changes: &Value) -> Result<R, ClientError> {
        let result: Result<Fetched<R>, ClientError> = async {
            let document = self.merged_document(id, changes).await?;
            match self.api.replace::<R>(id, &document).await? {
                Some(stored) => Ok(stored),
                None => Fetched::decode(document),
            }
        }
        .await;
        let updated = self.surface(result).await?;
        self.reconcile_update(id, updated).await
    }

    /// Sends only `changes` with PATCH.
    ///
    /// When the backend acknowledges without returning the record, the
    /// local record is reconciled by merging `changes` into its document.
    ///
    /// # Errors
    ///
    /// Same as [`Self::update`].
    pub async fn patch(&self, id: &RecordId, changes: &Value) -> Result<R, ClientError> {
        let result: Result<Fetched<R>, ClientError> = async {
            let document = self.merged_document(id, changes).await?;
            match self.api.patch::<R>(id, changes).await? {
                Some(stored) => Ok(stored),
                None => Fetched::decode(document),
            }
        }
        .await;
        let patched = self.surface(result).await?;
        self.reconcile_update(id, patched).await
    }

    /// Deletes a record and removes it locally.
    ///
    /// # Errors
    ///
    /// Returns the backend failure after posting it as a notice; the local
    /// collection is left untouched.
    pub async fn delete(&self, id: &RecordId) -> Result<(), ClientError> {
        let result = self.api.delete(R::RESOURCE, id).await;
        self.surface(result).await?;

        // Already gone locally is fine: the backend is authoritative.
        if self.store.remove(id).await.is_err() {
            tracing::debug!(resource = %R::RESOURCE, %id, "deleted record was not loaded locally");
        }
        tracing::info!(resource = %R::RESOURCE, %id, "record deleted");
        Ok(())
    }

    async fn fetch_all(&self, kind: FetchKind) -> Result<usize, ClientError> {
        self.set_in_flight(kind, true).await;
        let result = self.api.list::<R>().await;
        self.set_in_flight(kind, false).await;

        let records = self.surface(result).await?;
        let count = self.store.replace_all(records).await;
        self.state.write().await.last_loaded_at = Some(Utc::now());
        tracing::info!(resource = %R::RESOURCE, count, ?kind, "collection loaded");
        Ok(count)
    }

    async fn set_in_flight(&self, kind: FetchKind, value: bool) {
        let mut state = self.state.write().await;
        match kind {
            FetchKind::Load => state.loading = value,
            FetchKind::Refresh => state.refreshing = value,
        }
    }

    /// Backend document of the local record with `changes` merged on top.
    async fn merged_document(&self, id: &RecordId, changes: &Value) -> Result<Value, ClientError> {
        let mut document = self
            .store
            .document(id)
            .await
            .ok_or_else(|| ClientError::NotFound(id.clone()))?;
        merge_patch(&mut document, changes);
        Ok(document)
    }

    async fn reconcile_update(&self, id: &RecordId, fetched: Fetched<R>) -> Result<R, ClientError> {
        let record = fetched.record.clone();
        // Last write wins: a concurrent refresh may have dropped the record.
        if self.store.update(fetched).await.is_err() {
            tracing::debug!(resource = %R::RESOURCE, %id, "updated record no longer loaded");
        }
        tracing::info!(resource = %R::RESOURCE, %id, "record updated");
        Ok(record)
    }

    /// Posts a notice for a failed result and passes it through.
    async fn surface<T>(&self, result: Result<T, ClientError>) -> Result<T, ClientError> {
        if let Err(err) = &result {
            tracing::warn!(resource = %R::RESOURCE, error = %err, "surfacing failure");
            self.notices
                .post(Notice::from_error(R::RESOURCE, err))
                .await;
        }
        result
    }
}
