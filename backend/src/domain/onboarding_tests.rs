//! Regression coverage for onboarding and currency preferences.

use std::sync::Arc;

use mockable::DefaultClock;

use super::*;
use crate::domain::error::ErrorCode;
use crate::domain::ports::{
    CountryCode, GeolocationError, MockGeolocationProvider, MockNotificationRepository,
    MockTranslatorDirectory, MockUserAccountRepository,
};

struct Collaborators {
    users: MockUserAccountRepository,
    directory: MockTranslatorDirectory,
    notifications: MockNotificationRepository,
    geolocation: MockGeolocationProvider,
}

impl Collaborators {
    fn new() -> Self {
        Self {
            users: MockUserAccountRepository::new(),
            directory: MockTranslatorDirectory::new(),
            notifications: MockNotificationRepository::new(),
            geolocation: MockGeolocationProvider::new(),
        }
    }

    fn into_service(self) -> OnboardingService {
        OnboardingService::new(
            Arc::new(self.users),
            Arc::new(self.directory),
            Arc::new(self.notifications),
            Arc::new(self.geolocation),
            Arc::new(DefaultClock),
        )
    }
}

fn name(raw: &str) -> DisplayName {
    DisplayName::new(raw).expect("valid name")
}

#[tokio::test]
async fn registration_detects_the_display_currency() {
    let mut mocks = Collaborators::new();

    mocks
        .geolocation
        .expect_current_country()
        .return_once(|| Ok(CountryCode::new("IN").expect("valid country")));
    mocks
        .users
        .expect_upsert()
        .withf(|account| account.currency().as_str() == "INR")
        .times(1)
        .return_once(|_| Ok(()));
    mocks
        .notifications
        .expect_push()
        .withf(|notification| {
            notification.title() == "Welcome to LingoBridge!"
                && notification.body().contains("INR")
        })
        .times(1)
        .return_once(|_| Ok(()));

    let service = mocks.into_service();
    let account = service
        .register(name("Avery Client"), UserRole::Client)
        .await
        .expect("registration succeeds");
    assert_eq!(account.currency().as_str(), "INR");
    assert_eq!(account.role(), UserRole::Client);
}

#[tokio::test]
async fn geolocation_failure_falls_back_to_the_base_currency() {
    let mut mocks = Collaborators::new();

    mocks
        .geolocation
        .expect_current_country()
        .return_once(|| Err(GeolocationError::unavailable("socket closed")));
    mocks
        .users
        .expect_upsert()
        .withf(|account| account.currency().as_str() == "USD")
        .times(1)
        .return_once(|_| Ok(()));
    mocks.notifications.expect_push().returning(|_| Ok(()));

    let service = mocks.into_service();
    let account = service
        .register(name("Avery Client"), UserRole::Client)
        .await
        .expect("registration succeeds");
    assert_eq!(account.currency(), &CurrencyCode::base());
}

#[tokio::test]
async fn translator_registration_creates_a_starter_profile() {
    let mut mocks = Collaborators::new();

    mocks
        .geolocation
        .expect_current_country()
        .return_once(|| Ok(CountryCode::new("US").expect("valid country")));
    mocks.users.expect_upsert().times(1).return_once(|_| Ok(()));
    mocks
        .directory
        .expect_upsert()
        .withf(|profile| {
            let english = Language::new("English").expect("valid language");
            let spanish = Language::new("Spanish").expect("valid language");
            profile.covers_pair(&english, &spanish)
                && profile.max_concurrent_projects().get() == 3
                && profile.is_available()
                && profile.completed_projects() == 0
        })
        .times(1)
        .return_once(|_| Ok(()));
    mocks.notifications.expect_push().returning(|_| Ok(()));

    let service = mocks.into_service();
    service
        .register(name("Noor Translator"), UserRole::Translator)
        .await
        .expect("registration succeeds");
}

#[tokio::test]
async fn client_registration_skips_the_directory() {
    let mut mocks = Collaborators::new();

    mocks
        .geolocation
        .expect_current_country()
        .return_once(|| Ok(CountryCode::new("GB").expect("valid country")));
    mocks.users.expect_upsert().times(1).return_once(|_| Ok(()));
    mocks.directory.expect_upsert().times(0);
    mocks.notifications.expect_push().returning(|_| Ok(()));

    let service = mocks.into_service();
    service
        .register(name("Avery Client"), UserRole::Client)
        .await
        .expect("registration succeeds");
}

#[tokio::test]
async fn change_currency_updates_the_preference_and_notifies() {
    let mut mocks = Collaborators::new();
    let user_id = UserId::random();
    let existing = UserAccount::new(
        user_id,
        name("Avery Client"),
        UserRole::Client,
        CurrencyCode::base(),
    );

    mocks
        .users
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(existing)));
    mocks
        .users
        .expect_upsert()
        .withf(|account| account.currency().as_str() == "EUR")
        .times(1)
        .return_once(|_| Ok(()));
    mocks
        .notifications
        .expect_push()
        .withf(|notification| notification.title() == "Currency Updated")
        .times(1)
        .return_once(|_| Ok(()));

    let service = mocks.into_service();
    let updated = service
        .change_currency(&user_id, CurrencyCode::new("EUR").expect("valid code"))
        .await
        .expect("currency updates");
    assert_eq!(updated.currency().as_str(), "EUR");
}

#[tokio::test]
async fn change_currency_for_a_missing_user_is_not_found() {
    let mut mocks = Collaborators::new();

    mocks.users.expect_find_by_id().return_once(|_| Ok(None));
    mocks.users.expect_upsert().times(0);

    let service = mocks.into_service();
    let error = service
        .change_currency(
            &UserId::random(),
            CurrencyCode::new("EUR").expect("valid code"),
        )
        .await
        .expect_err("missing user rejected");
    assert_eq!(error.code(), ErrorCode::NotFound);
}
