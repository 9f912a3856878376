//! User account data model.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::currency::CurrencyCode;

/// Validation errors returned by [`UserAccount`] constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    /// Identifier is empty.
    EmptyId,
    /// Identifier is not a UUID.
    InvalidId,
    /// Display name is blank once trimmed.
    EmptyDisplayName,
    /// Display name is shorter than the minimum.
    DisplayNameTooShort {
        /// Minimum accepted length.
        min: usize,
    },
    /// Display name is longer than the maximum.
    DisplayNameTooLong {
        /// Maximum accepted length.
        max: usize,
    },
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "user id must not be empty"),
            Self::InvalidId => write!(f, "user id must be a valid UUID"),
            Self::EmptyDisplayName => write!(f, "display name must not be empty"),
            Self::DisplayNameTooShort { min } => {
                write!(f, "display name must be at least {min} characters")
            }
            Self::DisplayNameTooLong { max } => {
                write!(f, "display name must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable user identifier stored as a UUID.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
pub struct UserId(Uuid);

impl UserId {
    /// Validate and construct a [`UserId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let raw = id.as_ref();
        if raw.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        let parsed = Uuid::parse_str(raw).map_err(|_| UserValidationError::InvalidId)?;
        Ok(Self(parsed))
    }

    /// Generate a new random identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Build an identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0.to_string()
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Minimum allowed length for a display name.
pub const DISPLAY_NAME_MIN: usize = 3;
/// Maximum allowed length for a display name.
pub const DISPLAY_NAME_MAX: usize = 64;

/// Human readable display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, example = "Ada Lovelace")]
pub struct DisplayName(String);

impl DisplayName {
    /// Validate and construct a [`DisplayName`].
    pub fn new(display_name: impl Into<String>) -> Result<Self, UserValidationError> {
        let display_name = display_name.into();
        if display_name.trim().is_empty() {
            return Err(UserValidationError::EmptyDisplayName);
        }
        let length = display_name.chars().count();
        if length < DISPLAY_NAME_MIN {
            return Err(UserValidationError::DisplayNameTooShort {
                min: DISPLAY_NAME_MIN,
            });
        }
        if length > DISPLAY_NAME_MAX {
            return Err(UserValidationError::DisplayNameTooLong {
                max: DISPLAY_NAME_MAX,
            });
        }
        Ok(Self(display_name))
    }
}

impl AsRef<str> for DisplayName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<DisplayName> for String {
    fn from(value: DisplayName) -> Self {
        value.0
    }
}

impl TryFrom<String> for DisplayName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Marketplace role of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Creates projects and deposits funds.
    Client,
    /// Completes projects and withdraws earnings.
    Translator,
}

/// Marketplace user account.
///
/// ## Invariants
/// - The display currency is a preference only; all ledger amounts stay in
///   the settlement currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    id: UserId,
    display_name: DisplayName,
    role: UserRole,
    currency: CurrencyCode,
}

impl UserAccount {
    /// Build an account from validated components.
    #[must_use]
    pub const fn new(
        id: UserId,
        display_name: DisplayName,
        role: UserRole,
        currency: CurrencyCode,
    ) -> Self {
        Self {
            id,
            display_name,
            role,
            currency,
        }
    }

    /// Stable identifier.
    #[must_use]
    pub const fn id(&self) -> &UserId {
        &self.id
    }

    /// Display name shown to other users.
    #[must_use]
    pub const fn display_name(&self) -> &DisplayName {
        &self.display_name
    }

    /// Marketplace role.
    #[must_use]
    pub const fn role(&self) -> UserRole {
        self.role
    }

    /// Preferred display currency.
    #[must_use]
    pub const fn currency(&self) -> &CurrencyCode {
        &self.currency
    }

    /// Replace the preferred display currency.
    pub fn set_currency(&mut self, currency: CurrencyCode) {
        self.currency = currency;
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for account validation.

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("")]
    #[case("not-a-uuid")]
    fn user_id_rejects_invalid_input(#[case] raw: &str) {
        assert!(UserId::new(raw).is_err());
    }

    #[test]
    fn user_id_round_trips_through_string() {
        let id = UserId::random();
        let parsed = UserId::new(id.to_string()).expect("uuid round-trips");
        assert_eq!(parsed, id);
    }

    #[rstest]
    #[case("", UserValidationError::EmptyDisplayName)]
    #[case("ab", UserValidationError::DisplayNameTooShort { min: DISPLAY_NAME_MIN })]
    fn display_name_enforces_bounds(#[case] raw: &str, #[case] expected: UserValidationError) {
        assert_eq!(DisplayName::new(raw).expect_err("invalid name"), expected);
    }

    #[test]
    fn display_name_rejects_overlong_input() {
        let raw = "x".repeat(DISPLAY_NAME_MAX + 1);
        assert!(matches!(
            DisplayName::new(raw),
            Err(UserValidationError::DisplayNameTooLong { .. })
        ));
    }
}
