//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Ports describe how the domain expects to interact with driven adapters
//! (persistence, payment gateway, geolocation). Each trait exposes strongly
//! typed errors so adapters map their failures into predictable variants.

mod geolocation;
mod ledger_store;
mod message_repository;
mod notification_repository;
mod payment_gateway;
mod project_repository;
mod translator_directory;
mod user_repository;

#[cfg(test)]
pub use geolocation::MockGeolocationProvider;
pub use geolocation::{
    CountryCode, CountryCodeValidationError, FixtureGeolocationProvider, GeolocationError,
    GeolocationProvider,
};
#[cfg(test)]
pub use ledger_store::MockLedgerStore;
pub use ledger_store::{FixtureLedgerStore, LedgerStore, LedgerStoreError};
#[cfg(test)]
pub use message_repository::MockMessageRepository;
pub use message_repository::{FixtureMessageRepository, MessageRepository, MessageRepositoryError};
#[cfg(test)]
pub use notification_repository::MockNotificationRepository;
pub use notification_repository::{
    FixtureNotificationRepository, NotificationRepository, NotificationRepositoryError,
};
#[cfg(test)]
pub use payment_gateway::MockPaymentGateway;
pub use payment_gateway::{
    CaptureRequest, FixturePaymentGateway, GatewayOrder, GatewayPayout, PaymentGateway,
    PaymentGatewayError, PayoutRequest,
};
#[cfg(test)]
pub use project_repository::MockProjectRepository;
pub use project_repository::{
    FixtureProjectRepository, ProjectRepository, ProjectRepositoryError,
};
#[cfg(test)]
pub use translator_directory::MockTranslatorDirectory;
pub use translator_directory::{
    DirectoryError, FixtureTranslatorDirectory, TranslatorDirectory,
};
#[cfg(test)]
pub use user_repository::MockUserAccountRepository;
pub use user_repository::{
    FixtureUserAccountRepository, UserAccountRepository, UserRepositoryError,
};
