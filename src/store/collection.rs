//! In-memory mirror of one remote collection.
//!
//! [`CollectionStore`] holds the collection as an `Arc<Vec<R>>` snapshot.
//! Readers clone the `Arc` and keep a stable view for as long as they
//! like; writers build a new vector and swap the pointer, so no reader
//! ever observes a half-applied mutation. Next to each record the store
//! keeps the backend document it was decoded from, which is what edits
//! are merged into.
//!
//! Every mutation is announced as a [`CollectionEvent`] on a
//! [`tokio::sync::broadcast`] channel. With no subscribers the event is
//! dropped; a lagging subscriber simply recomputes from the latest
//! snapshot.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tokio::sync::{RwLock, broadcast};

use super::CollectionEvent;
use crate::domain::{Fetched, InsertPosition, Record, RecordId};
use crate::error::ClientError;

#[derive(Debug)]
struct Contents<R> {
    records: Arc<Vec<R>>,
    documents: HashMap<RecordId, Value>,
}

/// Replace-on-write store for the records of one resource.
#[derive(Debug)]
pub struct CollectionStore<R: Record> {
    contents: RwLock<Contents<R>>,
    events: broadcast::Sender<CollectionEvent>,
}

impl<R: Record> CollectionStore<R> {
    /// Creates an empty store whose change channel buffers `capacity`
    /// events per subscriber.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (events, _) = broadcast::channel(capacity.max(1));
        Self {
            contents: RwLock::new(Contents {
                records: Arc::new(Vec::new()),
                documents: HashMap::new(),
            }),
            events,
        }
    }

    /// Creates a receiver for all future change events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<CollectionEvent> {
        self.events.subscribe()
    }

    /// Returns the current snapshot.
    pub async fn snapshot(&self) -> Arc<Vec<R>> {
        Arc::clone(&self.contents.read().await.records)
    }

    /// Returns a copy of the record with the given identifier.
    pub async fn get(&self, id: &RecordId) -> Option<R> {
        self.contents
            .read()
            .await
            .records
            .iter()
            .find(|record| record.id() == id)
            .cloned()
    }

    /// Returns the backend document of the record with the given
    /// identifier, as last received.
    pub async fn document(&self, id: &RecordId) -> Option<Value> {
        self.contents.read().await.documents.get(id).cloned()
    }

    /// Returns the identifiers of every record, in collection order.
    pub async fn ids(&self) -> Vec<RecordId> {
        self.contents
            .read()
            .await
            .records
            .iter()
            .map(|record| record.id().clone())
            .collect()
    }

    /// Returns the number of records.
    pub async fn len(&self) -> usize {
        self.contents.read().await.records.len()
    }

    /// Returns `true` if the collection holds no records.
    pub async fn is_empty(&self) -> bool {
        self.contents.read().await.records.is_empty()
    }

    /// Replaces the whole collection with a fresh fetch.
    ///
    /// Returns the new record count.
    pub async fn replace_all(&self, fetched: Vec<Fetched<R>>) -> usize {
        let count = fetched.len();
        let mut records = Vec::with_capacity(count);
        let mut documents = HashMap::with_capacity(count);
        for Fetched { record, document } in fetched {
            documents.insert(record.id().clone(), document);
            records.push(record);
        }
        {
            let mut contents = self.contents.write().await;
            contents.records = Arc::new(records);
            contents.documents = documents;
        }
        self.publish(CollectionEvent::Replaced {
            resource: R::RESOURCE,
            count,
            timestamp: Utc::now(),
        });
        count
    }

    /// Adds a newly created record at the resource's insert position.
    ///
    /// A record whose identifier is already present replaces the existing
    /// entry in place instead of being duplicated.
    pub async fn insert(&self, fetched: Fetched<R>) {
        let Fetched { record, document } = fetched;
        let id = record.id().clone();
        {
            let mut contents = self.contents.write().await;
            let mut next = Vec::with_capacity(contents.records.len().saturating_add(1));
            next.extend(contents.records.iter().cloned());
            if let Some(slot) = next.iter_mut().find(|existing| existing.id() == &id) {
                *slot = record;
            } else {
                match R::INSERT_AT {
                    InsertPosition::Prepend => next.insert(0, record),
                    InsertPosition::Append => next.push(record),
                }
            }
            contents.records = Arc::new(next);
            contents.documents.insert(id.clone(), document);
        }
        self.publish(CollectionEvent::Inserted {
            resource: R::RESOURCE,
            id,
            timestamp: Utc::now(),
        });
    }

    /// Replaces the record sharing `fetched`'s identifier, keeping its
    /// position.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotFound`] if no record has that identifier.
    pub async fn update(&self, fetched: Fetched<R>) -> Result<(), ClientError> {
        let Fetched { record, document } = fetched;
        let id = record.id().clone();
        {
            let mut contents = self.contents.write().await;
            let position = contents
                .records
                .iter()
                .position(|existing| existing.id() == &id)
                .ok_or_else(|| ClientError::NotFound(id.clone()))?;
            let mut next: Vec<R> = (*contents.records).clone();
            if let Some(slot) = next.get_mut(position) {
                *slot = record;
            }
            contents.records = Arc::new(next);
            contents.documents.insert(id.clone(), document);
        }
        self.publish(CollectionEvent::Updated {
            resource: R::RESOURCE,
            id,
            timestamp: Utc::now(),
        });
        Ok(())
    }

    /// Removes the record with the given identifier and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotFound`] if no record has that identifier.
    pub async fn remove(&self, id: &RecordId) -> Result<R, ClientError> {
        let removed = {
            let mut contents = self.contents.write().await;
            let position = contents
                .records
                .iter()
                .position(|existing| existing.id() == id)
                .ok_or_else(|| ClientError::NotFound(id.clone()))?;
            let mut next: Vec<R> = (*contents.records).clone();
            let removed = next.remove(position);
            contents.records = Arc::new(next);
            contents.documents.remove(id);
            removed
        };
        self.publish(CollectionEvent::Removed {
            resource: R::RESOURCE,
            id: id.clone(),
            timestamp: Utc::now(),
        });
        Ok(removed)
    }

    fn publish(&self, event: CollectionEvent) {
        // No subscribers is not an error.
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::{Appointment, Client};

    fn client(id: u64, nombre: &str) -> Fetched<Client> {
        let Ok(client) = Fetched::decode(json!({ "id": id, "nombre": nombre })) else {
            panic!("test client should decode");
        };
        client
    }

    fn appointment(id: u64) -> Fetched<Appointment> {
        let Ok(appointment) = Fetched::decode(json!({ "id": id })) else {
            panic!("test appointment should decode");
        };
        appointment
    }

    #[tokio::test]
    async fn replace_all_swaps_contents() {
        let store = CollectionStore::new(16);
        assert!(store.is_empty().await);

        let count = store.replace_all(vec![client(1, "Ana"), client(2, "Beto")]).await;
        assert_eq!(count, 2);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn documents_are_kept_as_received() {
        let store = CollectionStore::<Client>::new(16);
        let Ok(raw) = Fetched::decode(json!({ "id": 1, "nombre": "Ana", "email": null })) else {
            panic!("test client should decode");
        };
        store.replace_all(vec![raw]).await;

        assert_eq!(
            store.document(&RecordId::from(1_u64)).await,
            Some(json!({ "id": 1, "nombre": "Ana", "email": null }))
        );
        let _ = store.remove(&RecordId::from(1_u64)).await;
        assert!(store.document(&RecordId::from(1_u64)).await.is_none());
    }

    #[tokio::test]
    async fn snapshots_are_not_affected_by_later_writes() {
        let store = CollectionStore::new(16);
        store.replace_all(vec![client(1, "Ana")]).await;
        let before = store.snapshot().await;

        store.insert(client(2, "Beto")).await;
        let _ = store.remove(&RecordId::from(1_u64)).await;

        assert_eq!(before.len(), 1);
        assert_eq!(store.ids().await, vec![RecordId::from(2_u64)]);
    }

    #[tokio::test]
    async fn insert_respects_resource_position() {
        let clients = CollectionStore::new(16);
        clients.replace_all(vec![client(1, "Ana")]).await;
        clients.insert(client(2, "Beto")).await;
        assert_eq!(
            clients.ids().await,
            vec![RecordId::from(2_u64), RecordId::from(1_u64)]
        );

        let agenda = CollectionStore::new(16);
        agenda.replace_all(vec![appointment(1)]).await;
        agenda.insert(appointment(2)).await;
        assert_eq!(
            agenda.ids().await,
            vec![RecordId::from(1_u64), RecordId::from(2_u64)]
        );
    }

    #[tokio::test]
    async fn insert_with_known_id_does_not_duplicate() {
        let store = CollectionStore::new(16);
        store.replace_all(vec![client(1, "Ana")]).await;
        store.insert(client(1, "Ana Paz")).await;
        assert_eq!(store.len().await, 1);
        let Some(updated) = store.get(&RecordId::from(1_u64)).await else {
            panic!("record should exist");
        };
        assert_eq!(updated.nombre.as_deref(), Some("Ana Paz"));
    }

    #[tokio::test]
    async fn update_keeps_position() {
        let store = CollectionStore::new(16);
        store
            .replace_all(vec![client(1, "Ana"), client(2, "Beto"), client(3, "Caro")])
            .await;
        assert!(store.update(client(2, "Roberto")).await.is_ok());
        let snapshot = store.snapshot().await;
        let names: Vec<_> = snapshot.iter().filter_map(|c| c.nombre.as_deref()).collect();
        assert_eq!(names, vec!["Ana", "Roberto", "Caro"]);
        assert_eq!(
            store.document(&RecordId::from(2_u64)).await,
            Some(json!({ "id": 2, "nombre": "Roberto" }))
        );
    }

    #[tokio::test]
    async fn update_and_remove_unknown_id_fail() {
        let store = CollectionStore::new(16);
        store.replace_all(vec![client(1, "Ana")]).await;
        assert!(matches!(
            store.update(client(9, "Nadie")).await,
            Err(ClientError::NotFound(_))
        ));
        assert!(store.remove(&RecordId::from(9_u64)).await.is_err());
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn mutations_without_subscribers_still_apply() {
        let store = CollectionStore::new(1);
        store.replace_all(vec![client(1, "Ana")]).await;
        store.insert(client(2, "Beto")).await;
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn mutations_are_published() {
        let store = CollectionStore::new(16);
        let mut rx = store.subscribe();

        store.replace_all(vec![client(1, "Ana")]).await;
        let _ = store.remove(&RecordId::from(1_u64)).await;

        let Ok(first) = rx.recv().await else {
            panic!("expected replace event");
        };
        let Ok(second) = rx.recv().await else {
            panic!("expected remove event");
        };
        assert_eq!(first.event_type_str(), "replaced");
        assert_eq!(second.event_type_str(), "removed");
        assert_eq!(second.record_id(), Some(&RecordId::from(1_u64)));
    }
}
