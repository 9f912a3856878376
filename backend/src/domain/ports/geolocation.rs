//! Port for the geolocation collaborator used at registration.

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

/// Failures surfaced by geolocation adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeolocationError {
    /// The lookup service is unreachable or timed out.
    #[error("geolocation lookup unavailable: {message}")]
    Unavailable {
        /// Transport detail.
        message: String,
    },
    /// The lookup answered with an unusable payload.
    #[error("geolocation payload malformed: {message}")]
    Decode {
        /// Decoder detail.
        message: String,
    },
}

impl GeolocationError {
    /// Helper for transport failures.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Helper for payload failures.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }
}

/// Two-letter country code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CountryCode(String);

/// Validation failure for [`CountryCode`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("country code must be two uppercase letters")]
pub struct CountryCodeValidationError;

impl CountryCode {
    /// Validate and construct a country code.
    ///
    /// # Errors
    ///
    /// Rejects anything but two ASCII uppercase letters.
    pub fn new(code: impl AsRef<str>) -> Result<Self, CountryCodeValidationError> {
        let raw = code.as_ref();
        if raw.chars().count() != 2 || !raw.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(CountryCodeValidationError);
        }
        Ok(Self(raw.to_owned()))
    }

    /// Borrow the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Port over the IP-geolocation collaborator.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GeolocationProvider: Send + Sync {
    /// Country the current request appears to originate from.
    async fn current_country(&self) -> Result<CountryCode, GeolocationError>;
}

/// Fixture provider that always fails, exercising the base-currency
/// fallback.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureGeolocationProvider;

#[async_trait]
impl GeolocationProvider for FixtureGeolocationProvider {
    async fn current_country(&self) -> Result<CountryCode, GeolocationError> {
        Err(GeolocationError::unavailable("fixture provider"))
    }
}
