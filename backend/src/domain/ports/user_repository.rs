//! Port for user account persistence.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::user::{UserAccount, UserId};

/// Persistence errors raised by [`UserAccountRepository`] adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserRepositoryError {
    /// Repository connection could not be established.
    #[error("user repository connection failed: {message}")]
    Connection {
        /// Adapter detail.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("user repository query failed: {message}")]
    Query {
        /// Adapter detail.
        message: String,
    },
}

impl UserRepositoryError {
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
}

/// Port for storing and retrieving user accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserAccountRepository: Send + Sync {
    /// Insert or update an account.
    async fn upsert(&self, account: &UserAccount) -> Result<(), UserRepositoryError>;

    /// Fetch an account by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserAccount>, UserRepositoryError>;
}

/// Fixture implementation for tests that do not exercise accounts.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUserAccountRepository;

#[async_trait]
impl UserAccountRepository for FixtureUserAccountRepository {
    async fn upsert(&self, _account: &UserAccount) -> Result<(), UserRepositoryError> {
        Ok(())
    }

    async fn find_by_id(
        &self,
        _id: &UserId,
    ) -> Result<Option<UserAccount>, UserRepositoryError> {
        Ok(None)
    }
}
