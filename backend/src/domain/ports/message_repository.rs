//! Port for per-project message feeds.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::message::Message;
use crate::domain::project::ProjectId;
use crate::domain::user::UserId;

/// Persistence errors raised by [`MessageRepository`] adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessageRepositoryError {
    /// Repository connection could not be established.
    #[error("message repository connection failed: {message}")]
    Connection {
        /// Adapter detail.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("message repository query failed: {message}")]
    Query {
        /// Adapter detail.
        message: String,
    },
    /// The referenced message does not exist.
    #[error("message {id} not found")]
    NotFound {
        /// Message identifier.
        id: Uuid,
    },
}

impl MessageRepositoryError {
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

    /// Helper for missing messages.
    #[must_use]
    pub const fn not_found(id: Uuid) -> Self {
        Self::NotFound { id }
    }
}

/// Port for the append-only message feed.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Append a message to its project's feed.
    async fn push(&self, message: Message) -> Result<(), MessageRepositoryError>;

    /// All messages on a project's feed, oldest first.
    async fn list_for_project(
        &self,
        project_id: &ProjectId,
    ) -> Result<Vec<Message>, MessageRepositoryError>;

    /// Flag one message as read and return the updated entry.
    async fn mark_read(&self, id: Uuid) -> Result<Message, MessageRepositoryError>;

    /// Count of unread messages addressed to a user.
    async fn unread_count(&self, user_id: &UserId) -> Result<u64, MessageRepositoryError>;
}

/// Fixture implementation for tests that do not exercise messaging.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureMessageRepository;

#[async_trait]
impl MessageRepository for FixtureMessageRepository {
    async fn push(&self, _message: Message) -> Result<(), MessageRepositoryError> {
        Ok(())
    }

    async fn list_for_project(
        &self,
        _project_id: &ProjectId,
    ) -> Result<Vec<Message>, MessageRepositoryError> {
        Ok(Vec::new())
    }

    async fn mark_read(&self, id: Uuid) -> Result<Message, MessageRepositoryError> {
        Err(MessageRepositoryError::not_found(id))
    }

    async fn unread_count(&self, _user_id: &UserId) -> Result<u64, MessageRepositoryError> {
        Ok(0)
    }
}
