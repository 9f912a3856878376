//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data`, so they only
//! depend on the domain services and stay testable without real I/O.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};

use crate::domain::currency::{CurrencyCode, CurrencyConverter};
use crate::domain::ports::{
    GeolocationProvider, LedgerStore, MessageRepository, NotificationRepository, PaymentGateway,
    ProjectRepository, TranslatorDirectory, UserAccountRepository,
};
use crate::domain::{AssignmentService, LedgerService, MessagingService, OnboardingService};
use crate::outbound::{
    InMemoryLedgerStore, InMemoryMessageRepository, InMemoryNotificationRepository,
    InMemoryProjectRepository, InMemoryTranslatorDirectory, InMemoryUserAccountRepository,
};

/// Parameter object bundling the port implementations behind the services.
#[derive(Clone)]
pub struct StatePorts {
    /// Append-only transaction ledger.
    pub ledger: Arc<dyn LedgerStore>,
    /// Account store.
    pub users: Arc<dyn UserAccountRepository>,
    /// Project store.
    pub projects: Arc<dyn ProjectRepository>,
    /// Translator directory.
    pub directory: Arc<dyn TranslatorDirectory>,
    /// Per-user notification feed.
    pub notifications: Arc<dyn NotificationRepository>,
    /// Per-project message feed.
    pub messages: Arc<dyn MessageRepository>,
    /// External payment gateway.
    pub gateway: Arc<dyn PaymentGateway>,
    /// IP geolocation collaborator.
    pub geolocation: Arc<dyn GeolocationProvider>,
    /// Currency amounts are converted into before crossing the gateway.
    pub gateway_currency: CurrencyCode,
    /// Clock used for every timestamp.
    pub clock: Arc<dyn Clock>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// Wallet ledger service.
    pub ledger: LedgerService,
    /// Assignment workflow service.
    pub assignment: AssignmentService,
    /// Messaging and notification feeds.
    pub messaging: MessagingService,
    /// Registration and currency preferences.
    pub onboarding: OnboardingService,
    /// Direct directory access for listing and profile upserts.
    pub directory: Arc<dyn TranslatorDirectory>,
    /// Conversion and formatting over the currency reference table.
    pub converter: CurrencyConverter,
}

impl AppState {
    /// Wire the domain services over a bundle of ports.
    #[must_use]
    pub fn new(ports: StatePorts) -> Self {
        let StatePorts {
            ledger,
            users,
            projects,
            directory,
            notifications,
            messages,
            gateway,
            geolocation,
            gateway_currency,
            clock,
        } = ports;

        Self {
            ledger: LedgerService::new(
                Arc::clone(&ledger),
                Arc::clone(&users),
                Arc::clone(&projects),
                Arc::clone(&notifications),
                gateway,
                gateway_currency,
                Arc::clone(&clock),
            ),
            assignment: AssignmentService::new(
                Arc::clone(&projects),
                Arc::clone(&directory),
                Arc::clone(&users),
                Arc::clone(&notifications),
                Arc::clone(&messages),
                Arc::clone(&clock),
            ),
            messaging: MessagingService::new(
                projects,
                Arc::clone(&users),
                Arc::clone(&notifications),
                messages,
                Arc::clone(&clock),
            ),
            onboarding: OnboardingService::new(
                users,
                Arc::clone(&directory),
                notifications,
                geolocation,
                clock,
            ),
            directory,
            converter: CurrencyConverter::new(),
        }
    }

    /// Wire the services over fresh in-memory stores, keeping the gateway
    /// and geolocation collaborators pluggable.
    ///
    /// This is the reference persistence setup used by the bundled server
    /// and the integration suites.
    #[must_use]
    pub fn with_in_memory_stores(
        gateway: Arc<dyn PaymentGateway>,
        geolocation: Arc<dyn GeolocationProvider>,
        gateway_currency: CurrencyCode,
    ) -> Self {
        Self::new(StatePorts {
            ledger: Arc::new(InMemoryLedgerStore::new()),
            users: Arc::new(InMemoryUserAccountRepository::new()),
            projects: Arc::new(InMemoryProjectRepository::new()),
            directory: Arc::new(InMemoryTranslatorDirectory::new()),
            notifications: Arc::new(InMemoryNotificationRepository::new()),
            messages: Arc::new(InMemoryMessageRepository::new()),
            gateway,
            geolocation,
            gateway_currency,
            clock: Arc::new(DefaultClock),
        })
    }
}
