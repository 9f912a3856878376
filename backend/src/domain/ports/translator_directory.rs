//! Port for the translator directory.
//!
//! `reserve_slot` is the concurrency guard of the assignment workflow:
//! adapters must check capacity and increment the active count in one atomic
//! step so two concurrent assignments cannot both claim the last slot.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::translator::TranslatorProfile;
use crate::domain::user::UserId;

/// Persistence errors raised by [`TranslatorDirectory`] adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectoryError {
    /// Directory connection could not be established.
    #[error("translator directory connection failed: {message}")]
    Connection {
        /// Adapter detail.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("translator directory query failed: {message}")]
    Query {
        /// Adapter detail.
        message: String,
    },
    /// No profile exists for the given translator.
    #[error("no translator profile for user {user_id}")]
    NotFound {
        /// Translator account identifier.
        user_id: UserId,
    },
    /// The translator is unavailable or already at capacity.
    #[error("translator {user_id} has no free capacity")]
    NoCapacity {
        /// Translator account identifier.
        user_id: UserId,
    },
}

impl DirectoryError {
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

    /// Helper for missing profiles.
    #[must_use]
    pub const fn not_found(user_id: UserId) -> Self {
        Self::NotFound { user_id }
    }

    /// Helper for exhausted capacity.
    #[must_use]
    pub const fn no_capacity(user_id: UserId) -> Self {
        Self::NoCapacity { user_id }
    }
}

/// Port exposing translator profiles and their capacity mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TranslatorDirectory: Send + Sync {
    /// All profiles currently in the directory.
    async fn list(&self) -> Result<Vec<TranslatorProfile>, DirectoryError>;

    /// Fetch the profile owned by a translator account.
    async fn find_by_user_id(
        &self,
        user_id: &UserId,
    ) -> Result<Option<TranslatorProfile>, DirectoryError>;

    /// Insert or replace a profile.
    async fn upsert(&self, profile: &TranslatorProfile) -> Result<(), DirectoryError>;

    /// Atomically claim one assignment slot.
    ///
    /// Fails with [`DirectoryError::NoCapacity`] when the translator is
    /// unavailable or already at the concurrent maximum; the active count is
    /// untouched in that case.
    async fn reserve_slot(&self, user_id: &UserId)
    -> Result<TranslatorProfile, DirectoryError>;

    /// Release one assignment slot, saturating at zero.
    async fn release_slot(&self, user_id: &UserId)
    -> Result<TranslatorProfile, DirectoryError>;

    /// Release one slot and bump the lifetime completed counter.
    async fn record_completion(
        &self,
        user_id: &UserId,
    ) -> Result<TranslatorProfile, DirectoryError>;
}

/// Fixture implementation for tests that do not exercise the directory.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureTranslatorDirectory;

#[async_trait]
impl TranslatorDirectory for FixtureTranslatorDirectory {
    async fn list(&self) -> Result<Vec<TranslatorProfile>, DirectoryError> {
        Ok(Vec::new())
    }

    async fn find_by_user_id(
        &self,
        _user_id: &UserId,
    ) -> Result<Option<TranslatorProfile>, DirectoryError> {
        Ok(None)
    }

    async fn upsert(&self, _profile: &TranslatorProfile) -> Result<(), DirectoryError> {
        Ok(())
    }

    async fn reserve_slot(
        &self,
        user_id: &UserId,
    ) -> Result<TranslatorProfile, DirectoryError> {
        Err(DirectoryError::not_found(*user_id))
    }

    async fn release_slot(
        &self,
        user_id: &UserId,
    ) -> Result<TranslatorProfile, DirectoryError> {
        Err(DirectoryError::not_found(*user_id))
    }

    async fn record_completion(
        &self,
        user_id: &UserId,
    ) -> Result<TranslatorProfile, DirectoryError> {
        Err(DirectoryError::not_found(*user_id))
    }
}
