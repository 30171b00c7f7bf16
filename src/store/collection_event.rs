//! Events reflecting local collection mutations.
//!
//! Every successful load or mutation emits a [`CollectionEvent`] through
//! the store's broadcast channel, telling view holders to recompute.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{RecordId, Resource};

/// Event emitted after every collection mutation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum CollectionEvent {
    /// The collection was replaced by a fresh fetch.
    Replaced {
        /// Affected collection.
        resource: Resource,
        /// Number of records after the replacement.
        count: usize,
        /// Time of the replacement.
        timestamp: DateTime<Utc>,
    },

    /// A created record was added.
    Inserted {
        /// Affected collection.
        resource: Resource,
        /// Identifier of the new record.
        id: RecordId,
        /// Time of the insertion.
        timestamp: DateTime<Utc>,
    },

    /// A record was replaced in place after an update.
    Updated {
        /// Affected collection.
        resource: Resource,
        /// Identifier of the updated record.
        id: RecordId,
        /// Time of the update.
        timestamp: DateTime<Utc>,
    },

    /// A record was removed after a delete.
    Removed {
        /// Affected collection.
        resource: Resource,
        /// Identifier of the removed record.
        id: RecordId,
        /// Time of the removal.
        timestamp: DateTime<Utc>,
    },
}

impl CollectionEvent {
    /// Returns the collection this event belongs to.
    #[must_use]
    pub const fn resource(&self) -> Resource {
        match self {
            Self::Replaced { resource, .. }
            | Self::Inserted { resource, .. }
            | Self::Updated { resource, .. }
            | Self::Removed { resource, .. } => *resource,
        }
    }

    /// Returns the affected record, if the event concerns a single one.
    #[must_use]
    pub const fn record_id(&self) -> Option<&RecordId> {
        match self {
            Self::Replaced { .. } => None,
            Self::Inserted { id, .. } | Self::Updated { id, .. } | Self::Removed { id, .. } => {
                Some(id)
            }
        }
    }

    /// Returns the event type as a snake_case string.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::Replaced { .. } => "replaced",
            Self::Inserted { .. } => "inserted",
            Self::Updated { .. } => "updated",
            Self::Removed { .. } => "removed",
        }
    }
}
