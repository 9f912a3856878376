//! Ledger transaction data model.
//!
//! Transactions are append-only. The only mutation the ledger permits after
//! creation is the status transition `pending -> completed | failed`, and
//! balances are folded exclusively over completed entries, so a half-finished
//! gateway interaction can never move money.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::money::Money;
use super::project::ProjectId;
use super::user::{UserId, UserValidationError};

/// Sentinel owner string for platform-held entries.
const PLATFORM_OWNER: &str = "platform";

/// Owner of a ledger entry: a user wallet or the platform itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, example = "platform")]
pub enum LedgerOwner {
    /// A user's wallet.
    User(UserId),
    /// The platform commission account.
    Platform,
}

impl LedgerOwner {
    /// Owner for a user wallet.
    #[must_use]
    pub const fn user(id: UserId) -> Self {
        Self::User(id)
    }
}

impl fmt::Display for LedgerOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User(id) => write!(f, "{id}"),
            Self::Platform => f.write_str(PLATFORM_OWNER),
        }
    }
}

impl From<LedgerOwner> for String {
    fn from(value: LedgerOwner) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for LedgerOwner {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value == PLATFORM_OWNER {
            return Ok(Self::Platform);
        }
        Ok(Self::User(UserId::new(value)?))
    }
}

/// Kind of money movement a transaction records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// Funds added to a wallet from an external instrument.
    Deposit,
    /// Funds disbursed from a wallet to an external instrument.
    Withdrawal,
    /// Client wallet debit paying for a project.
    Payment,
    /// Translator wallet credit earned from a project.
    Earning,
    /// Returned funds.
    Refund,
    /// Platform fee income.
    Commission,
}

impl TransactionKind {
    /// Direction this kind moves a wallet balance: `+1` credit, `-1` debit,
    /// `0` neutral.
    #[must_use]
    pub const fn balance_sign(&self) -> i64 {
        match self {
            Self::Deposit | Self::Earning => 1,
            Self::Withdrawal | Self::Payment => -1,
            Self::Refund | Self::Commission => 0,
        }
    }
}

/// Lifecycle state of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    /// Awaiting gateway settlement; excluded from balances.
    Pending,
    /// Settled; contributes to balances.
    Completed,
    /// Rejected or timed out; excluded from balances.
    Failed,
}

/// Validation errors raised by the transaction builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionValidationError {
    /// Amount must be strictly positive.
    NonPositiveAmount,
    /// Description is blank once trimmed.
    EmptyDescription,
}

impl fmt::Display for TransactionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveAmount => write!(f, "transaction amount must be positive"),
            Self::EmptyDescription => write!(f, "transaction description must not be empty"),
        }
    }
}

impl std::error::Error for TransactionValidationError {}

/// Immutable ledger entry.
///
/// ## Invariants
/// - `amount` is strictly positive; direction comes from `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    id: Uuid,
    owner: LedgerOwner,
    kind: TransactionKind,
    amount: Money,
    status: TransactionStatus,
    description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    project_id: Option<ProjectId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    payment_method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fee: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    gateway_order_ref: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    gateway_payment_ref: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    commission: Option<Money>,
    created_at: DateTime<Utc>,
}

impl Transaction {
    /// Start building a transaction.
    #[must_use]
    pub fn builder(
        owner: LedgerOwner,
        kind: TransactionKind,
        amount: Money,
        created_at: DateTime<Utc>,
    ) -> TransactionBuilder {
        TransactionBuilder {
            owner,
            kind,
            amount,
            status: TransactionStatus::Completed,
            description: String::new(),
            project_id: None,
            payment_method: None,
            fee: None,
            gateway_order_ref: None,
            gateway_payment_ref: None,
            commission: None,
            created_at,
        }
    }

    /// Entry identifier.
    #[must_use]
    pub const fn id(&self) -> &Uuid {
        &self.id
    }

    /// Wallet or platform account this entry belongs to.
    #[must_use]
    pub const fn owner(&self) -> &LedgerOwner {
        &self.owner
    }

    /// Kind of money movement.
    #[must_use]
    pub const fn kind(&self) -> TransactionKind {
        self.kind
    }

    /// Positive amount in settlement minor units.
    #[must_use]
    pub const fn amount(&self) -> Money {
        self.amount
    }

    /// Lifecycle state.
    #[must_use]
    pub const fn status(&self) -> TransactionStatus {
        self.status
    }

    /// Human readable description.
    #[must_use]
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Related project, for payments and earnings.
    #[must_use]
    pub const fn project_id(&self) -> Option<&ProjectId> {
        self.project_id.as_ref()
    }

    /// Payment instrument tag, for deposits and withdrawals.
    #[must_use]
    pub fn payment_method(&self) -> Option<&str> {
        self.payment_method.as_deref()
    }

    /// Fee charged alongside this entry.
    #[must_use]
    pub const fn fee(&self) -> Option<Money> {
        self.fee
    }

    /// Gateway order reference.
    #[must_use]
    pub fn gateway_order_ref(&self) -> Option<&str> {
        self.gateway_order_ref.as_deref()
    }

    /// Gateway payment/payout reference.
    #[must_use]
    pub fn gateway_payment_ref(&self) -> Option<&str> {
        self.gateway_payment_ref.as_deref()
    }

    /// Commission charged alongside this entry.
    #[must_use]
    pub const fn commission(&self) -> Option<Money> {
        self.commission
    }

    /// Creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Signed wallet effect in minor units.
    ///
    /// Only completed entries move balances; pending and failed entries
    /// contribute zero.
    #[must_use]
    pub const fn signed_minor_units(&self) -> i64 {
        match self.status {
            TransactionStatus::Completed => self.kind.balance_sign() * self.amount.minor_units(),
            TransactionStatus::Pending | TransactionStatus::Failed => 0,
        }
    }

    /// Copy of this entry with the given settlement outcome.
    ///
    /// Used by ledger stores when finalising a pending entry; outside of
    /// that transition transactions never change.
    #[must_use]
    pub fn with_status(mut self, status: TransactionStatus) -> Self {
        self.status = status;
        self
    }

    /// Copy of this entry with the gateway payment/payout reference attached.
    #[must_use]
    pub fn with_gateway_payment_ref(mut self, payment_ref: impl Into<String>) -> Self {
        self.gateway_payment_ref = Some(payment_ref.into());
        self
    }
}

/// Builder for [`Transaction`].
#[derive(Debug, Clone)]
pub struct TransactionBuilder {
    owner: LedgerOwner,
    kind: TransactionKind,
    amount: Money,
    status: TransactionStatus,
    description: String,
    project_id: Option<ProjectId>,
    payment_method: Option<String>,
    fee: Option<Money>,
    gateway_order_ref: Option<String>,
    gateway_payment_ref: Option<String>,
    commission: Option<Money>,
    created_at: DateTime<Utc>,
}

impl TransactionBuilder {
    /// Lifecycle state; defaults to completed.
    #[must_use]
    pub const fn status(mut self, status: TransactionStatus) -> Self {
        self.status = status;
        self
    }

    /// Human readable description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Related project.
    #[must_use]
    pub const fn project(mut self, project_id: ProjectId) -> Self {
        self.project_id = Some(project_id);
        self
    }

    /// Payment instrument tag.
    #[must_use]
    pub fn payment_method(mut self, method: impl Into<String>) -> Self {
        self.payment_method = Some(method.into());
        self
    }

    /// Fee charged alongside this entry.
    #[must_use]
    pub const fn fee(mut self, fee: Money) -> Self {
        self.fee = Some(fee);
        self
    }

    /// Gateway order reference.
    #[must_use]
    pub fn gateway_order_ref(mut self, order_ref: impl Into<String>) -> Self {
        self.gateway_order_ref = Some(order_ref.into());
        self
    }

    /// Gateway payment/payout reference.
    #[must_use]
    pub fn gateway_payment_ref(mut self, payment_ref: impl Into<String>) -> Self {
        self.gateway_payment_ref = Some(payment_ref.into());
        self
    }

    /// Commission charged alongside this entry.
    #[must_use]
    pub const fn commission(mut self, commission: Money) -> Self {
        self.commission = Some(commission);
        self
    }

    /// Validate and build the transaction.
    pub fn build(self) -> Result<Transaction, TransactionValidationError> {
        if !self.amount.is_positive() {
            return Err(TransactionValidationError::NonPositiveAmount);
        }
        if self.description.trim().is_empty() {
            return Err(TransactionValidationError::EmptyDescription);
        }
        Ok(Transaction {
            id: Uuid::new_v4(),
            owner: self.owner,
            kind: self.kind,
            amount: self.amount,
            status: self.status,
            description: self.description,
            project_id: self.project_id,
            payment_method: self.payment_method,
            fee: self.fee,
            gateway_order_ref: self.gateway_order_ref,
            gateway_payment_ref: self.gateway_payment_ref,
            commission: self.commission,
            created_at: self.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for sign rules and builder validation.

    use rstest::rstest;

    use super::*;

    fn entry(kind: TransactionKind, status: TransactionStatus) -> Transaction {
        Transaction::builder(
            LedgerOwner::user(UserId::random()),
            kind,
            Money::from_major(40),
            Utc::now(),
        )
        .status(status)
        .description("test entry")
        .build()
        .expect("valid entry")
    }

    #[rstest]
    #[case(TransactionKind::Deposit, 4_000)]
    #[case(TransactionKind::Earning, 4_000)]
    #[case(TransactionKind::Withdrawal, -4_000)]
    #[case(TransactionKind::Payment, -4_000)]
    #[case(TransactionKind::Refund, 0)]
    #[case(TransactionKind::Commission, 0)]
    fn completed_entries_follow_sign_rules(#[case] kind: TransactionKind, #[case] expected: i64) {
        assert_eq!(
            entry(kind, TransactionStatus::Completed).signed_minor_units(),
            expected
        );
    }

    #[rstest]
    #[case(TransactionStatus::Pending)]
    #[case(TransactionStatus::Failed)]
    fn unsettled_entries_have_no_effect(#[case] status: TransactionStatus) {
        assert_eq!(
            entry(TransactionKind::Deposit, status).signed_minor_units(),
            0
        );
    }

    #[test]
    fn builder_rejects_non_positive_amounts() {
        let result = Transaction::builder(
            LedgerOwner::Platform,
            TransactionKind::Commission,
            Money::ZERO,
            Utc::now(),
        )
        .description("zero")
        .build();
        assert_eq!(result, Err(TransactionValidationError::NonPositiveAmount));
    }

    #[test]
    fn builder_rejects_blank_descriptions() {
        let result = Transaction::builder(
            LedgerOwner::Platform,
            TransactionKind::Commission,
            Money::from_minor(1),
            Utc::now(),
        )
        .description("   ")
        .build();
        assert_eq!(result, Err(TransactionValidationError::EmptyDescription));
    }

    #[test]
    fn owner_serialises_platform_sentinel() {
        let json = serde_json::to_string(&LedgerOwner::Platform).expect("serialises");
        assert_eq!(json, "\"platform\"");
        let parsed: LedgerOwner = serde_json::from_str(&json).expect("parses");
        assert_eq!(parsed, LedgerOwner::Platform);
    }
}
