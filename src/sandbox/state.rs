//! In-memory tables backing the sandbox.
//!
//! [`SandboxState`] keeps one table per resource behind a single
//! [`tokio::sync::RwLock`]. Rows are stored as raw JSON objects so the
//! sandbox accepts any shape a real backend would, and identifiers come
//! from a per-table counter.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde_json::{Map, Value};
use tokio::sync::RwLock;

use super::SandboxError;
use crate::domain::{RecordId, Resource, merge_patch};

#[derive(Debug, Default)]
struct Table {
    next_id: u64,
    rows: Vec<Value>,
}

impl Table {
    fn assign_id(&mut self) -> u64 {
        self.next_id = self.next_id.saturating_add(1);
        self.next_id
    }

    fn position(&self, id: &RecordId) -> Option<usize> {
        self.rows.iter().position(|row| row_id(row).as_ref() == Some(id))
    }
}

/// Shared sandbox state injected into every handler.
#[derive(Debug, Clone, Default)]
pub struct SandboxState {
    tables: Arc<RwLock<HashMap<Resource, Table>>>,
    token: Option<Arc<str>>,
}

impl SandboxState {
    /// Creates an empty sandbox.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires every API request to carry `Authorization: Bearer <token>`.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<Arc<str>>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Token requests must present, if any.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Loads seed rows from a JSON object keyed by resource path
    /// (`{ "ventas": [...], "clientes": [...] }`).
    ///
    /// Rows without an `id` get one; counters continue after the highest
    /// numeric id seen.
    ///
    /// # Errors
    ///
    /// Returns [`SandboxError::InvalidRequest`] on an unknown resource key,
    /// a non-array value or a non-object row.
    pub async fn seed(&self, seed: Value) -> Result<usize, SandboxError> {
        let Value::Object(collections) = seed else {
            return Err(SandboxError::InvalidRequest(
                "seed must be an object keyed by resource".to_string(),
            ));
        };
        let mut tables = self.tables.write().await;
        let mut total = 0_usize;
        for (key, rows) in collections {
            let resource =
                Resource::from_path(&key).ok_or_else(|| SandboxError::UnknownResource(key.clone()))?;
            let Value::Array(rows) = rows else {
                return Err(SandboxError::InvalidRequest(format!(
                    "seed for {key} must be an array"
                )));
            };
            let mut seeded = Vec::with_capacity(rows.len());
            for row in rows {
                let Value::Object(row) = row else {
                    return Err(SandboxError::InvalidRequest(format!(
                        "seed rows for {key} must be objects"
                    )));
                };
                seeded.push(row);
            }

            let table = tables.entry(resource).or_default();
            // Explicit ids claim their numbers before any row gets a fresh one.
            let highest = seeded
                .iter()
                .filter_map(map_id)
                .filter_map(|id| id.as_u64())
                .max()
                .unwrap_or(0);
            table.next_id = table.next_id.max(highest);
            for mut row in seeded {
                if map_id(&row).is_none() {
                    let id = table.assign_id();
                    row.insert("id".to_string(), Value::from(id));
                }
                table.rows.push(Value::Object(row));
                total = total.saturating_add(1);
            }
        }
        tracing::info!(rows = total, "sandbox seeded");
        Ok(total)
    }

    /// Reads and applies a seed file.
    ///
    /// # Errors
    ///
    /// Returns [`SandboxError::Internal`] if the file cannot be read or
    /// parsed, or any error from [`Self::seed`].
    pub async fn seed_from_file(&self, path: &Path) -> Result<usize, SandboxError> {
        let raw = tokio::fs::read(path)
            .await
            .map_err(|e| SandboxError::Internal(format!("reading {}: {e}", path.display())))?;
        let seed = serde_json::from_slice(&raw)
            .map_err(|e| SandboxError::Internal(format!("parsing {}: {e}", path.display())))?;
        self.seed(seed).await
    }

    /// Returns every row of a collection, in insertion order.
    pub async fn list(&self, resource: Resource) -> Vec<Value> {
        self.tables
            .read()
            .await
            .get(&resource)
            .map(|table| table.rows.clone())
            .unwrap_or_default()
    }

    /// Returns one row.
    ///
    /// # Errors
    ///
    /// Returns [`SandboxError::RecordNotFound`] if the id is unknown.
    pub async fn get(&self, resource: Resource, id: &RecordId) -> Result<Value, SandboxError> {
        let tables = self.tables.read().await;
        tables
            .get(&resource)
            .and_then(|table| table.position(id).and_then(|i| table.rows.get(i)))
            .cloned()
            .ok_or_else(|| not_found(resource, id))
    }

    /// Stores a new row under a fresh identifier and returns it.
    ///
    /// Any client-supplied `id` is overwritten.
    ///
    /// # Errors
    ///
    /// Returns [`SandboxError::InvalidRequest`] if the body is not an object.
    pub async fn insert(&self, resource: Resource, body: Value) -> Result<Value, SandboxError> {
        let mut row = expect_object(body)?;
        let mut tables = self.tables.write().await;
        let table = tables.entry(resource).or_default();
        let id = table.assign_id();
        row.insert("id".to_string(), Value::from(id));
        let row = Value::Object(row);
        table.rows.push(row.clone());
        Ok(row)
    }

    /// Replaces a row wholesale, keeping its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`SandboxError::InvalidRequest`] if the body is not an
    /// object, or [`SandboxError::RecordNotFound`] if the id is unknown.
    pub async fn replace(
        &self,
        resource: Resource,
        id: &RecordId,
        body: Value,
    ) -> Result<Value, SandboxError> {
        let mut row = expect_object(body)?;
        let mut tables = self.tables.write().await;
        let slot = tables
            .get_mut(&resource)
            .and_then(|table| table.position(id).and_then(|i| table.rows.get_mut(i)))
            .ok_or_else(|| not_found(resource, id))?;
        let stored_id = slot.get("id").cloned().unwrap_or(Value::Null);
        row.insert("id".to_string(), stored_id);
        *slot = Value::Object(row);
        Ok(slot.clone())
    }

    /// Merge-patches a row, keeping its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`SandboxError::InvalidRequest`] if the body is not an
    /// object, or [`SandboxError::RecordNotFound`] if the id is unknown.
    pub async fn patch(
        &self,
        resource: Resource,
        id: &RecordId,
        changes: Value,
    ) -> Result<Value, SandboxError> {
        let mut changes = expect_object(changes)?;
        changes.remove("id");
        let mut tables = self.tables.write().await;
        let slot = tables
            .get_mut(&resource)
            .and_then(|table| table.position(id).and_then(|i| table.rows.get_mut(i)))
            .ok_or_else(|| not_found(resource, id))?;
        merge_patch(slot, &Value::Object(changes));
        Ok(slot.clone())
    }

    /// Deletes a row.
    ///
    /// # Errors
    ///
    /// Returns [`SandboxError::RecordNotFound`] if the id is unknown.
    pub async fn remove(&self, resource: Resource, id: &RecordId) -> Result<(), SandboxError> {
        let mut tables = self.tables.write().await;
        let table = tables
            .get_mut(&resource)
            .ok_or_else(|| not_found(resource, id))?;
        let index = table.position(id).ok_or_else(|| not_found(resource, id))?;
        table.rows.remove(index);
        Ok(())
    }
}

fn row_id(row: &Value) -> Option<RecordId> {
    row.as_object().and_then(map_id)
}

fn map_id(row: &Map<String, Value>) -> Option<RecordId> {
    row.get("id")
        .cloned()
        .and_then(|id| serde_json::from_value(id).ok())
}

fn expect_object(body: Value) -> Result<Map<String, Value>, SandboxError> {
    match body {
        Value::Object(map) => Ok(map),
        _ => Err(SandboxError::InvalidRequest(
            "request body must be a JSON object".to_string(),
        )),
    }
}

fn not_found(resource: Resource, id: &RecordId) -> SandboxError {
    SandboxError::RecordNotFound {
        resource,
        id: id.clone(),
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn insert_assigns_sequential_ids() {
        let state = SandboxState::new();
        let Ok(first) = state.insert(Resource::Clients, json!({ "nombre": "Ana" })).await else {
            panic!("insert should succeed");
        };
        let Ok(second) = state
            .insert(Resource::Clients, json!({ "id": 99, "nombre": "Beto" }))
            .await
        else {
            panic!("insert should succeed");
        };
        assert_eq!(first.get("id"), Some(&json!(1)));
        assert_eq!(second.get("id"), Some(&json!(2)));
    }

    #[tokio::test]
    async fn seed_continues_counter_after_highest_id() {
        let state = SandboxState::new();
        let seeded = state
            .seed(json!({ "ventas": [{ "id": 7, "total": 10 }, { "total": 20 }] }))
            .await;
        assert_eq!(seeded.ok(), Some(2));

        let Ok(row) = state.insert(Resource::Sales, json!({ "total": 30 })).await else {
            panic!("insert should succeed");
        };
        assert_eq!(row.get("id"), Some(&json!(9)));
        assert_eq!(state.list(Resource::Sales).await.len(), 3);
    }

    #[tokio::test]
    async fn seed_never_reuses_an_explicit_id() {
        let state = SandboxState::new();
        let seeded = state
            .seed(json!({ "ventas": [{ "total": 20 }, { "id": 1, "total": 30 }] }))
            .await;
        assert_eq!(seeded.ok(), Some(2));

        let ids: Vec<_> = state
            .list(Resource::Sales)
            .await
            .iter()
            .filter_map(|row| row.get("id").cloned())
            .collect();
        assert_eq!(ids, vec![json!(2), json!(1)]);

        let Ok(row) = state.insert(Resource::Sales, json!({ "total": 40 })).await else {
            panic!("insert should succeed");
        };
        assert_eq!(row.get("id"), Some(&json!(3)));
    }

    #[tokio::test]
    async fn seed_rejects_unknown_resource() {
        let state = SandboxState::new();
        assert!(matches!(
            state.seed(json!({ "lentes": [] })).await,
            Err(SandboxError::UnknownResource(_))
        ));
    }

    #[tokio::test]
    async fn replace_keeps_id_and_patch_merges() {
        let state = SandboxState::new();
        let _ = state
            .seed(json!({ "ventas": [{ "id": 1, "estado": "pendiente", "extra": { "a": 1 } }] }))
            .await;
        let id = RecordId::from(1_u64);

        let Ok(patched) = state
            .patch(Resource::Sales, &id, json!({ "estado": "pagada", "id": 5 }))
            .await
        else {
            panic!("patch should succeed");
        };
        assert_eq!(
            patched,
            json!({ "id": 1, "estado": "pagada", "extra": { "a": 1 } })
        );

        let Ok(replaced) = state
            .replace(Resource::Sales, &id, json!({ "estado": "anulada" }))
            .await
        else {
            panic!("replace should succeed");
        };
        assert_eq!(replaced, json!({ "id": 1, "estado": "anulada" }));
    }

    #[tokio::test]
    async fn unknown_ids_are_not_found() {
        let state = SandboxState::new();
        let id = RecordId::from(3_u64);
        assert!(state.get(Resource::Invoices, &id).await.is_err());
        assert!(state.remove(Resource::Invoices, &id).await.is_err());
        assert!(
            state
                .replace(Resource::Invoices, &id, json!({}))
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn remove_deletes_row() {
        let state = SandboxState::new();
        let _ = state.seed(json!({ "citas": [{ "id": "a1" }, { "id": "b2" }] })).await;
        assert!(state.remove(Resource::Appointments, &RecordId::from("a1")).await.is_ok());
        assert_eq!(state.list(Resource::Appointments).await.len(), 1);
    }
}
