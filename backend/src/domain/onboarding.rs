//! Account onboarding and currency preference management.
//!
//! Registration detects the signup country through the geolocation
//! collaborator and maps it to a default display currency; a failed lookup
//! falls back to the settlement currency. Translator signups receive a
//! starter profile so they are matchable immediately.

use std::collections::BTreeSet;
use std::num::NonZeroU32;
use std::sync::Arc;

use mockable::Clock;
use tracing::warn;
use uuid::Uuid;

use crate::domain::currency::{currency_for_country, CurrencyCode};
use crate::domain::error::DomainError;
use crate::domain::money::Money;
use crate::domain::notification::{Notification, NotificationKind};
use crate::domain::ports::{
    DirectoryError, GeolocationProvider, NotificationRepository, TranslatorDirectory,
    UserAccountRepository, UserRepositoryError,
};
use crate::domain::translator::{
    Language, Rating, TranslatorProfile, TranslatorProfileDraft, TranslatorValidationError,
};
use crate::domain::user::{DisplayName, UserAccount, UserId, UserRole};

/// Starter profile concurrent capacity.
const STARTER_CAPACITY: u32 = 3;
/// Starter profile response time in hours.
const STARTER_RESPONSE_HOURS: u32 = 4;
/// Starter profile price per word in settlement minor units.
const STARTER_PRICE_PER_WORD: Money = Money::from_minor(10);

/// Account onboarding service.
#[derive(Clone)]
pub struct OnboardingService {
    users: Arc<dyn UserAccountRepository>,
    directory: Arc<dyn TranslatorDirectory>,
    notifications: Arc<dyn NotificationRepository>,
    geolocation: Arc<dyn GeolocationProvider>,
    clock: Arc<dyn Clock>,
}

fn map_user_error(error: UserRepositoryError) -> DomainError {
    match error {
        UserRepositoryError::Connection { message } => {
            DomainError::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            DomainError::internal(format!("user repository error: {message}"))
        }
    }
}

fn map_directory_error(error: DirectoryError) -> DomainError {
    match error {
        DirectoryError::Connection { message } => {
            DomainError::service_unavailable(format!("translator directory unavailable: {message}"))
        }
        error => DomainError::internal(format!("translator directory error: {error}")),
    }
}

fn map_profile_error(error: TranslatorValidationError) -> DomainError {
    DomainError::internal(format!("starter profile construction failed: {error}"))
}

impl OnboardingService {
    /// Create a new service over the given collaborators.
    pub fn new(
        users: Arc<dyn UserAccountRepository>,
        directory: Arc<dyn TranslatorDirectory>,
        notifications: Arc<dyn NotificationRepository>,
        geolocation: Arc<dyn GeolocationProvider>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            directory,
            notifications,
            geolocation,
            clock,
        }
    }

    async fn notify(&self, notification: Notification) {
        if let Err(error) = self.notifications.push(notification).await {
            warn!(error = %error, "notification delivery failed");
        }
    }

    async fn detect_currency(&self) -> CurrencyCode {
        match self.geolocation.current_country().await {
            Ok(country) => currency_for_country(country.as_str()),
            Err(error) => {
                warn!(error = %error, "geolocation lookup failed, defaulting to base currency");
                CurrencyCode::base()
            }
        }
    }

    fn starter_profile(
        &self,
        user_id: UserId,
    ) -> Result<TranslatorProfile, TranslatorValidationError> {
        let languages: BTreeSet<Language> = [Language::new("English")?, Language::new("Spanish")?]
            .into_iter()
            .collect();
        TranslatorProfile::new(TranslatorProfileDraft {
            id: Uuid::new_v4(),
            user_id,
            languages,
            specializations: ["general".to_owned()].into_iter().collect(),
            rating: Rating::new(5.0)?,
            completed_projects: 0,
            active_projects: 0,
            max_concurrent_projects: NonZeroU32::new(STARTER_CAPACITY)
                .unwrap_or(NonZeroU32::MIN),
            is_available: true,
            price_per_word: STARTER_PRICE_PER_WORD,
            response_time_hours: STARTER_RESPONSE_HOURS,
            created_at: self.clock.utc(),
        })
    }

    /// Register a new account.
    ///
    /// The display currency comes from the detected signup country;
    /// translator signups also receive a starter directory profile.
    pub async fn register(
        &self,
        display_name: DisplayName,
        role: UserRole,
    ) -> Result<UserAccount, DomainError> {
        let currency = self.detect_currency().await;
        let account = UserAccount::new(UserId::random(), display_name, role, currency.clone());

        self.users.upsert(&account).await.map_err(map_user_error)?;
        if role == UserRole::Translator {
            let profile = self
                .starter_profile(*account.id())
                .map_err(map_profile_error)?;
            self.directory
                .upsert(&profile)
                .await
                .map_err(map_directory_error)?;
        }

        self.notify(Notification::new(
            *account.id(),
            NotificationKind::StatusChange,
            "Welcome to LingoBridge!",
            format!("Your display currency is set to {currency}."),
            None,
            self.clock.utc(),
        ))
        .await;
        Ok(account)
    }

    /// Update an account's preferred display currency.
    ///
    /// Wallet amounts are unaffected; the ledger stays denominated in the
    /// settlement currency.
    pub async fn change_currency(
        &self,
        user_id: &UserId,
        currency: CurrencyCode,
    ) -> Result<UserAccount, DomainError> {
        let mut account = self
            .users
            .find_by_id(user_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| DomainError::not_found(format!("user {user_id} not found")))?;

        account.set_currency(currency.clone());
        self.users.upsert(&account).await.map_err(map_user_error)?;

        self.notify(Notification::new(
            *account.id(),
            NotificationKind::StatusChange,
            "Currency Updated",
            format!("Your display currency is now {currency}."),
            None,
            self.clock.utc(),
        ))
        .await;
        Ok(account)
    }

    /// Fetch an account.
    pub async fn account(&self, user_id: &UserId) -> Result<UserAccount, DomainError> {
        self.users
            .find_by_id(user_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| DomainError::not_found(format!("user {user_id} not found")))
    }
}

#[cfg(test)]
#[path = "onboarding_tests.rs"]
mod tests;
