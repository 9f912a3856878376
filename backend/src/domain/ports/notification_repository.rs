//! Port for the per-user notification feed.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::notification::Notification;
use crate::domain::user::UserId;

/// Persistence errors raised by [`NotificationRepository`] adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotificationRepositoryError {
    /// Repository connection could not be established.
    #[error("notification repository connection failed: {message}")]
    Connection {
        /// Adapter detail.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("notification repository query failed: {message}")]
    Query {
        /// Adapter detail.
        message: String,
    },
    /// The referenced notification does not exist.
    #[error("notification {id} not found")]
    NotFound {
        /// Notification identifier.
        id: Uuid,
    },
}

impl NotificationRepositoryError {
    /// Helper for connection oriented failures.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for query failures.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Helper for missing notifications.
    #[must_use]
    pub const fn not_found(id: Uuid) -> Self {
        Self::NotFound { id }
    }
}

/// Port for the append-only notification feed.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Append a notification to its recipient's feed.
    async fn push(&self, notification: Notification) -> Result<(), NotificationRepositoryError>;

    /// All notifications for a user, newest first.
    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Notification>, NotificationRepositoryError>;

    /// Flag one notification as read and return the updated entry.
    async fn mark_read(&self, id: Uuid) -> Result<Notification, NotificationRepositoryError>;

    /// Count of unread notifications for a user.
    async fn unread_count(&self, user_id: &UserId) -> Result<u64, NotificationRepositoryError>;
}

/// Fixture implementation for tests that do not exercise notifications.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureNotificationRepository;

#[async_trait]
impl NotificationRepository for FixtureNotificationRepository {
    async fn push(&self, _notification: Notification) -> Result<(), NotificationRepositoryError> {
        Ok(())
    }

    async fn list_for_user(
        &self,
        _user_id: &UserId,
    ) -> Result<Vec<Notification>, NotificationRepositoryError> {
        Ok(Vec::new())
    }

    async fn mark_read(&self, id: Uuid) -> Result<Notification, NotificationRepositoryError> {
        Err(NotificationRepositoryError::not_found(id))
    }

    async fn unread_count(
        &self,
        _user_id: &UserId,
    ) -> Result<u64, NotificationRepositoryError> {
        Ok(0)
    }
}
