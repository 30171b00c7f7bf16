//! Type-safe notice identifier.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier of a [`super::Notice`], used to dismiss it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoticeId(uuid::Uuid);

impl NoticeId {
    /// Creates a new random `NoticeId` (UUID v4).
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Returns the inner [`uuid::Uuid`].
    #[must_use]
    pub const fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }
}

impl Default for NoticeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NoticeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<uuid::Uuid> for NoticeId {
    fn from(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }
}
