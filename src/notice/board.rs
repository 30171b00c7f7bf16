//! User-visible, dismissable notifications.
//!
//! Every failure the service surfaces lands on the [`NoticeBoard`] so the
//! front-end can show it as an alert or toast until the user dismisses it.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;

use super::NoticeId;
use crate::domain::Resource;
use crate::error::ClientError;

/// One notification waiting to be dismissed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
    /// Identifier used to dismiss the notice.
    pub id: NoticeId,
    /// Collection the notice relates to.
    pub resource: Resource,
    /// Heading.
    pub title: String,
    /// Body text.
    pub message: String,
    /// Whether re-invoking the failed action may succeed.
    pub retryable: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl Notice {
    /// Builds an error notice from a client error.
    #[must_use]
    pub fn from_error(resource: Resource, err: &ClientError) -> Self {
        Self {
            id: NoticeId::new(),
            resource,
            title: err.title().to_string(),
            message: err.user_message(),
            retryable: err.is_retryable(),
            created_at: Utc::now(),
        }
    }
}

/// Queue of pending notices, in arrival order.
#[derive(Debug, Default)]
pub struct NoticeBoard {
    notices: RwLock<Vec<Notice>>,
}

impl NoticeBoard {
    /// Creates an empty board.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Posts a notice and returns its identifier.
    pub async fn post(&self, notice: Notice) -> NoticeId {
        let id = notice.id;
        self.notices.write().await.push(notice);
        id
    }

    /// Returns every pending notice, oldest first.
    pub async fn pending(&self) -> Vec<Notice> {
        self.notices.read().await.clone()
    }

    /// Returns the most recent pending notice.
    pub async fn latest(&self) -> Option<Notice> {
        self.notices.read().await.last().cloned()
    }

    /// Dismisses a notice. Returns `false` if it was not pending.
    pub async fn dismiss(&self, id: NoticeId) -> bool {
        let mut notices = self.notices.write().await;
        let before = notices.len();
        notices.retain(|notice| notice.id != id);
        notices.len() != before
    }

    /// Dismisses every pending notice.
    pub async fn clear(&self) {
        self.notices.write().await.clear();
    }

    /// Returns the number of pending notices.
    pub async fn len(&self) -> usize {
        self.notices.read().await.len()
    }

    /// Returns `true` if nothing is pending.
    pub async fn is_empty(&self) -> bool {
        self.notices.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RecordId;

    #[tokio::test]
    async fn notices_keep_arrival_order() {
        let board = NoticeBoard::new();
        board
            .post(Notice::from_error(
                Resource::Sales,
                &ClientError::NotFound(RecordId::from(7_u64)),
            ))
            .await;
        board
            .post(Notice::from_error(
                Resource::Sales,
                &ClientError::Network("refused".to_string()),
            ))
            .await;

        let pending = board.pending().await;
        assert_eq!(pending.len(), 2);
        assert_eq!(pending.first().map(|n| n.retryable), Some(false));
        assert_eq!(board.latest().await.map(|n| n.retryable), Some(true));
    }

    #[tokio::test]
    async fn dismiss_removes_only_that_notice() {
        let board = NoticeBoard::new();
        let first = board
            .post(Notice::from_error(
                Resource::Clients,
                &ClientError::Network("first".to_string()),
            ))
            .await;
        board
            .post(Notice::from_error(
                Resource::Clients,
                &ClientError::Network("second".to_string()),
            ))
            .await;

        assert!(board.dismiss(first).await);
        assert!(!board.dismiss(first).await);
        assert_eq!(board.len().await, 1);

        board.clear().await;
        assert!(board.is_empty().await);
    }
}
