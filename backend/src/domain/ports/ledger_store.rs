//! Port for the append-only transaction ledger.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::transaction::{LedgerOwner, Transaction, TransactionStatus};

/// Persistence errors raised by [`LedgerStore`] adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerStoreError {
    /// Store connection could not be established.
    #[error("ledger store connection failed: {message}")]
    Connection {
        /// Adapter detail.
        message: String,
    },
    /// Query or write failed during execution.
    #[error("ledger store query failed: {message}")]
    Query {
        /// Adapter detail.
        message: String,
    },
    /// The referenced entry does not exist.
    #[error("ledger entry {id} not found")]
    NotFound {
        /// Entry identifier.
        id: Uuid,
    },
    /// The referenced entry already left the pending state.
    #[error("ledger entry {id} is already finalised")]
    AlreadyFinalized {
        /// Entry identifier.
        id: Uuid,
    },
}

impl LedgerStoreError {
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

    /// Helper for missing entries.
    #[must_use]
    pub const fn not_found(id: Uuid) -> Self {
        Self::NotFound { id }
    }

    /// Helper for repeated finalisation.
    #[must_use]
    pub const fn already_finalized(id: Uuid) -> Self {
        Self::AlreadyFinalized { id }
    }
}

/// Port for writing and reading ledger entries.
///
/// `append` and `finalize` are the transactional boundaries of the ledger:
/// adapters must apply each call all-or-nothing so a multi-entry financial
/// write can never land partially.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Append a batch of entries atomically.
    async fn append(&self, entries: Vec<Transaction>) -> Result<(), LedgerStoreError>;

    /// Transition a pending entry to its settlement outcome, record the
    /// gateway payment reference, and append any linked entries in the same
    /// atomic step.
    ///
    /// Returns the finalised entry.
    async fn finalize(
        &self,
        id: Uuid,
        outcome: TransactionStatus,
        payment_ref: Option<String>,
        linked: Vec<Transaction>,
    ) -> Result<Transaction, LedgerStoreError>;

    /// Fetch one entry by id.
    async fn find(&self, id: Uuid) -> Result<Option<Transaction>, LedgerStoreError>;

    /// All entries for an owner, newest first.
    async fn history(&self, owner: &LedgerOwner) -> Result<Vec<Transaction>, LedgerStoreError>;
}

/// Fixture implementation for tests that do not exercise the ledger.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLedgerStore;

#[async_trait]
impl LedgerStore for FixtureLedgerStore {
    async fn append(&self, _entries: Vec<Transaction>) -> Result<(), LedgerStoreError> {
        Ok(())
    }

    async fn finalize(
        &self,
        id: Uuid,
        _outcome: TransactionStatus,
        _payment_ref: Option<String>,
        _linked: Vec<Transaction>,
    ) -> Result<Transaction, LedgerStoreError> {
        Err(LedgerStoreError::not_found(id))
    }

    async fn find(&self, _id: Uuid) -> Result<Option<Transaction>, LedgerStoreError> {
        Ok(None)
    }

    async fn history(&self, _owner: &LedgerOwner) -> Result<Vec<Transaction>, LedgerStoreError> {
        Ok(Vec::new())
    }
}
