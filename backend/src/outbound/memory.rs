//! In-memory driven adapters.
//!
//! Reference implementation of the persistence collaborator. One mutex per
//! store makes every port call atomic, which is exactly the transactional
//! guarantee the ports demand: a multi-entry `append`, a `finalize` with its
//! linked entries, and a capacity reservation each happen under a single
//! lock. A database-backed adapter must map the same calls onto
//! transactions.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::message::Message;
use crate::domain::notification::Notification;
use crate::domain::ports::{
    DirectoryError, LedgerStore, LedgerStoreError, MessageRepository, MessageRepositoryError,
    NotificationRepository, NotificationRepositoryError, ProjectRepository,
    ProjectRepositoryError, TranslatorDirectory, UserAccountRepository, UserRepositoryError,
};
use crate::domain::project::{Project, ProjectId};
use crate::domain::transaction::{LedgerOwner, Transaction, TransactionStatus};
use crate::domain::translator::TranslatorProfile;
use crate::domain::user::{UserAccount, UserId};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // A poisoned lock only means another thread panicked mid-write; the data
    // itself is still a consistent snapshot for these single-step stores.
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-memory append-only transaction ledger.
#[derive(Debug, Default)]
pub struct InMemoryLedgerStore {
    entries: Mutex<Vec<Transaction>>,
}

impl InMemoryLedgerStore {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedgerStore {
    async fn append(&self, entries: Vec<Transaction>) -> Result<(), LedgerStoreError> {
        lock(&self.entries).extend(entries);
        Ok(())
    }

    async fn finalize(
        &self,
        id: Uuid,
        outcome: TransactionStatus,
        payment_ref: Option<String>,
        linked: Vec<Transaction>,
    ) -> Result<Transaction, LedgerStoreError> {
        let mut entries = lock(&self.entries);
        let entry = entries
            .iter_mut()
            .find(|entry| entry.id() == &id)
            .ok_or_else(|| LedgerStoreError::not_found(id))?;
        if entry.status() != TransactionStatus::Pending {
            return Err(LedgerStoreError::already_finalized(id));
        }
        let mut settled = entry.clone().with_status(outcome);
        if let Some(reference) = payment_ref {
            settled = settled.with_gateway_payment_ref(reference);
        }
        *entry = settled.clone();
        entries.extend(linked);
        Ok(settled)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Transaction>, LedgerStoreError> {
        Ok(lock(&self.entries)
            .iter()
            .find(|entry| entry.id() == &id)
            .cloned())
    }

    async fn history(&self, owner: &LedgerOwner) -> Result<Vec<Transaction>, LedgerStoreError> {
        Ok(lock(&self.entries)
            .iter()
            .rev()
            .filter(|entry| entry.owner() == owner)
            .cloned()
            .collect())
    }
}

/// In-memory project store.
#[derive(Debug, Default)]
pub struct InMemoryProjectRepository {
    projects: Mutex<HashMap<ProjectId, Project>>,
}

impl InMemoryProjectRepository {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProjectRepository for InMemoryProjectRepository {
    async fn insert(&self, project: &Project) -> Result<(), ProjectRepositoryError> {
        lock(&self.projects).insert(*project.id(), project.clone());
        Ok(())
    }

    async fn update(&self, project: &Project) -> Result<(), ProjectRepositoryError> {
        let mut projects = lock(&self.projects);
        if !projects.contains_key(project.id()) {
            return Err(ProjectRepositoryError::not_found(*project.id()));
        }
        projects.insert(*project.id(), project.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &ProjectId,
    ) -> Result<Option<Project>, ProjectRepositoryError> {
        Ok(lock(&self.projects).get(id).cloned())
    }

    async fn list_for_client(
        &self,
        client_id: &UserId,
    ) -> Result<Vec<Project>, ProjectRepositoryError> {
        let mut owned: Vec<Project> = lock(&self.projects)
            .values()
            .filter(|project| project.client_id() == client_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(owned)
    }
}

/// In-memory translator directory.
///
/// Slot reservation checks capacity and increments the active count under
/// one lock, so two concurrent assignments cannot both claim the last slot.
#[derive(Debug, Default)]
pub struct InMemoryTranslatorDirectory {
    profiles: Mutex<HashMap<UserId, TranslatorProfile>>,
}

impl InMemoryTranslatorDirectory {
    /// Create an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TranslatorDirectory for InMemoryTranslatorDirectory {
    async fn list(&self) -> Result<Vec<TranslatorProfile>, DirectoryError> {
        let mut profiles: Vec<TranslatorProfile> =
            lock(&self.profiles).values().cloned().collect();
        profiles.sort_by(|a, b| a.id().cmp(b.id()));
        Ok(profiles)
    }

    async fn find_by_user_id(
        &self,
        user_id: &UserId,
    ) -> Result<Option<TranslatorProfile>, DirectoryError> {
        Ok(lock(&self.profiles).get(user_id).cloned())
    }

    async fn upsert(&self, profile: &TranslatorProfile) -> Result<(), DirectoryError> {
        lock(&self.profiles).insert(*profile.user_id(), profile.clone());
        Ok(())
    }

    async fn reserve_slot(&self, user_id: &UserId) -> Result<TranslatorProfile, DirectoryError> {
        let mut profiles = lock(&self.profiles);
        let profile = profiles
            .get_mut(user_id)
            .ok_or_else(|| DirectoryError::not_found(*user_id))?;
        if !profile.reserve_slot() {
            return Err(DirectoryError::no_capacity(*user_id));
        }
        Ok(profile.clone())
    }

    async fn release_slot(&self, user_id: &UserId) -> Result<TranslatorProfile, DirectoryError> {
        let mut profiles = lock(&self.profiles);
        let profile = profiles
            .get_mut(user_id)
            .ok_or_else(|| DirectoryError::not_found(*user_id))?;
        profile.release_slot();
        Ok(profile.clone())
    }

    async fn record_completion(
        &self,
        user_id: &UserId,
    ) -> Result<TranslatorProfile, DirectoryError> {
        let mut profiles = lock(&self.profiles);
        let profile = profiles
            .get_mut(user_id)
            .ok_or_else(|| DirectoryError::not_found(*user_id))?;
        profile.record_completion();
        Ok(profile.clone())
    }
}

/// In-memory account store.
#[derive(Debug, Default)]
pub struct InMemoryUserAccountRepository {
    accounts: Mutex<HashMap<UserId, UserAccount>>,
}

impl InMemoryUserAccountRepository {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserAccountRepository for InMemoryUserAccountRepository {
    async fn upsert(&self, account: &UserAccount) -> Result<(), UserRepositoryError> {
        lock(&self.accounts).insert(*account.id(), account.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserAccount>, UserRepositoryError> {
        Ok(lock(&self.accounts).get(id).cloned())
    }
}

/// In-memory notification feed.
#[derive(Debug, Default)]
pub struct InMemoryNotificationRepository {
    entries: Mutex<Vec<Notification>>,
}

impl InMemoryNotificationRepository {
    /// Create an empty feed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NotificationRepository for InMemoryNotificationRepository {
    async fn push(&self, notification: Notification) -> Result<(), NotificationRepositoryError> {
        lock(&self.entries).push(notification);
        Ok(())
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Notification>, NotificationRepositoryError> {
        Ok(lock(&self.entries)
            .iter()
            .rev()
            .filter(|entry| entry.user_id() == user_id)
            .cloned()
            .collect())
    }

    async fn mark_read(&self, id: Uuid) -> Result<Notification, NotificationRepositoryError> {
        let mut entries = lock(&self.entries);
        let entry = entries
            .iter_mut()
            .find(|entry| entry.id() == &id)
            .ok_or_else(|| NotificationRepositoryError::not_found(id))?;
        entry.mark_read();
        Ok(entry.clone())
    }

    async fn unread_count(&self, user_id: &UserId) -> Result<u64, NotificationRepositoryError> {
        Ok(lock(&self.entries)
            .iter()
            .filter(|entry| entry.user_id() == user_id && !entry.is_read())
            .count() as u64)
    }
}

/// In-memory message feed.
#[derive(Debug, Default)]
pub struct InMemoryMessageRepository {
    entries: Mutex<Vec<Message>>,
}

impl InMemoryMessageRepository {
    /// Create an empty feed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn push(&self, message: Message) -> Result<(), MessageRepositoryError> {
        lock(&self.entries).push(message);
        Ok(())
    }

    async fn list_for_project(
        &self,
        project_id: &ProjectId,
    ) -> Result<Vec<Message>, MessageRepositoryError> {
        Ok(lock(&self.entries)
            .iter()
            .filter(|entry| entry.project_id() == project_id)
            .cloned()
            .collect())
    }

    async fn mark_read(&self, id: Uuid) -> Result<Message, MessageRepositoryError> {
        let mut entries = lock(&self.entries);
        let entry = entries
            .iter_mut()
            .find(|entry| entry.id() == &id)
            .ok_or_else(|| MessageRepositoryError::not_found(id))?;
        entry.mark_read();
        Ok(entry.clone())
    }

    async fn unread_count(&self, user_id: &UserId) -> Result<u64, MessageRepositoryError> {
        Ok(lock(&self.entries)
            .iter()
            .filter(|entry| entry.recipient_id() == Some(user_id) && !entry.is_read())
            .count() as u64)
    }
}
