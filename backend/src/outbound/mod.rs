//! Driven adapters: persistence, payment gateway, and geolocation.
//!
//! Each adapter implements a port from `crate::domain::ports`. The in-memory
//! stores are the reference implementation of the persistence collaborator;
//! the reqwest adapters speak to the external payment gateway and the IP
//! geolocation service.

pub mod geolocation;
pub mod memory;
pub mod razorpay;

pub use self::geolocation::IpGeolocationProvider;
pub use self::memory::{
    InMemoryLedgerStore, InMemoryMessageRepository, InMemoryNotificationRepository,
    InMemoryProjectRepository, InMemoryTranslatorDirectory, InMemoryUserAccountRepository,
};
pub use self::razorpay::{RazorpayConfig, RazorpayGateway};
