//! Wallet ledger domain service.
//!
//! The transaction log is the single source of truth for every balance:
//! `balance` folds an owner's completed entries, so a pending or failed
//! gateway interaction can never move money. Multi-entry writes (a deposit
//! plus its platform commission, a payment plus its earning) go through the
//! atomic `append`/`finalize` operations of the [`LedgerStore`] port.

use std::sync::Arc;

use mockable::Clock;
use serde_json::json;
use tracing::warn;
use uuid::Uuid;

use crate::domain::currency::{CurrencyCode, CurrencyConverter};
use crate::domain::error::DomainError;
use crate::domain::money::Money;
use crate::domain::notification::{Notification, NotificationKind};
use crate::domain::ports::{
    CaptureRequest, GatewayOrder, LedgerStore, LedgerStoreError, NotificationRepository,
    NotificationRepositoryError, PaymentGateway, PaymentGatewayError, PayoutRequest,
    ProjectRepository, ProjectRepositoryError, UserAccountRepository, UserRepositoryError,
};
use crate::domain::project::{ProjectId, ProjectStatus};
use crate::domain::transaction::{
    LedgerOwner, Transaction, TransactionKind, TransactionStatus, TransactionValidationError,
};
use crate::domain::user::{UserAccount, UserId, UserRole};

/// Commission charged on top of client deposits, in basis points (5%).
pub const DEPOSIT_COMMISSION_BPS: u32 = 500;

/// Fee absorbed from withdrawals, in basis points (2%).
pub const WITHDRAWAL_FEE_BPS: u32 = 200;

/// Payment-method tag recorded on platform commission entries.
const COMMISSION_METHOD: &str = "gateway_auto_credit";

/// Input for initiating a deposit.
#[derive(Debug, Clone)]
pub struct DepositRequest {
    /// Depositing user.
    pub user_id: UserId,
    /// Intended wallet credit in settlement currency.
    pub amount: Money,
    /// Payment instrument tag.
    pub payment_method: String,
}

/// A deposit awaiting checkout settlement.
#[derive(Debug, Clone)]
pub struct DepositIntent {
    /// The pending ledger entry.
    pub transaction: Transaction,
    /// The gateway order the checkout must settle against.
    pub order: GatewayOrder,
}

/// Input for settling an initiated deposit after checkout.
#[derive(Debug, Clone)]
pub struct SettleDepositRequest {
    /// Depositing user.
    pub user_id: UserId,
    /// Identifier of the pending deposit entry.
    pub transaction_id: Uuid,
    /// Payment reference produced by the checkout.
    pub payment_ref: String,
    /// Checkout signature over order and payment references.
    pub signature: String,
}

/// Input for a withdrawal.
#[derive(Debug, Clone)]
pub struct WithdrawRequest {
    /// Withdrawing user.
    pub user_id: UserId,
    /// Wallet debit in settlement currency.
    pub amount: Money,
    /// Payment instrument tag.
    pub payment_method: String,
}

/// Outcome of a successful withdrawal.
#[derive(Debug, Clone)]
pub struct WithdrawalReceipt {
    /// The completed ledger entry; the wallet is debited its full amount.
    pub transaction: Transaction,
    /// Amount actually disbursed after the fee.
    pub disbursed: Money,
}

/// Input for paying a completed project.
#[derive(Debug, Clone)]
pub struct PaymentRequest {
    /// Paying client.
    pub user_id: UserId,
    /// Project being paid for.
    pub project_id: ProjectId,
    /// Wallet debit in settlement currency.
    pub amount: Money,
}

/// Outcome of a successful payment: debit and credit land together.
#[derive(Debug, Clone)]
pub struct PaymentReceipt {
    /// Client wallet debit.
    pub payment: Transaction,
    /// Translator wallet credit.
    pub earning: Transaction,
}

/// Wallet ledger service.
#[derive(Clone)]
pub struct LedgerService {
    ledger: Arc<dyn LedgerStore>,
    users: Arc<dyn UserAccountRepository>,
    projects: Arc<dyn ProjectRepository>,
    notifications: Arc<dyn NotificationRepository>,
    gateway: Arc<dyn PaymentGateway>,
    converter: CurrencyConverter,
    gateway_currency: CurrencyCode,
    clock: Arc<dyn Clock>,
}

impl LedgerService {
    /// Create a new service over the given collaborators.
    ///
    /// `gateway_currency` is the currency amounts are converted into before
    /// crossing the gateway boundary.
    pub fn new(
        ledger: Arc<dyn LedgerStore>,
        users: Arc<dyn UserAccountRepository>,
        projects: Arc<dyn ProjectRepository>,
        notifications: Arc<dyn NotificationRepository>,
        gateway: Arc<dyn PaymentGateway>,
        gateway_currency: CurrencyCode,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            ledger,
            users,
            projects,
            notifications,
            gateway,
            converter: CurrencyConverter::new(),
            gateway_currency,
            clock,
        }
    }
}

fn map_ledger_error(error: LedgerStoreError) -> DomainError {
    match error {
        LedgerStoreError::Connection { message } => {
            DomainError::service_unavailable(format!("ledger store unavailable: {message}"))
        }
        LedgerStoreError::Query { message } => {
            DomainError::internal(format!("ledger store error: {message}"))
        }
        LedgerStoreError::NotFound { id } => {
            DomainError::not_found(format!("ledger entry {id} not found"))
        }
        LedgerStoreError::AlreadyFinalized { id } => {
            DomainError::conflict(format!("ledger entry {id} is already finalised"))
        }
    }
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

fn map_project_error(error: ProjectRepositoryError) -> DomainError {
    match error {
        ProjectRepositoryError::Connection { message } => {
            DomainError::service_unavailable(format!("project repository unavailable: {message}"))
        }
        ProjectRepositoryError::Query { message } => {
            DomainError::internal(format!("project repository error: {message}"))
        }
        ProjectRepositoryError::NotFound { id } => {
            DomainError::not_found(format!("project {id} not found"))
        }
    }
}

fn map_gateway_error(error: &PaymentGatewayError) -> DomainError {
    // Gateway detail stays in logs; users get a generic description.
    match error {
        PaymentGatewayError::Timeout { .. } => {
            DomainError::gateway_failure("payment gateway timed out")
        }
        PaymentGatewayError::InvalidSignature => {
            DomainError::gateway_failure("payment could not be verified")
        }
        PaymentGatewayError::Rejected { .. } | PaymentGatewayError::Transport { .. } => {
            DomainError::gateway_failure("payment gateway rejected the operation")
        }
    }
}

fn map_build_error(error: TransactionValidationError) -> DomainError {
    DomainError::internal(format!("ledger entry construction failed: {error}"))
}

impl LedgerService {
    async fn require_user(&self, user_id: &UserId) -> Result<UserAccount, DomainError> {
        self.users
            .find_by_id(user_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| DomainError::not_found(format!("user {user_id} not found")))
    }

    async fn notify(&self, notification: Notification) {
        if let Err(error) = self.notifications.push(notification).await {
            record_notification_failure(&error);
        }
    }

    fn format_for_user(&self, amount: Money, user: &UserAccount) -> String {
        let display = self
            .converter
            .convert(amount, &CurrencyCode::base(), user.currency());
        self.converter.format(display, user.currency())
    }

    fn gateway_minor_units(&self, amount: Money) -> i64 {
        self.converter
            .to_gateway_minor_units(amount, &CurrencyCode::base(), &self.gateway_currency)
    }

    async fn require_balance(
        &self,
        user: &UserAccount,
        amount: Money,
        failure_title: &str,
    ) -> Result<(), DomainError> {
        let available = self.balance(&LedgerOwner::user(*user.id())).await?;
        if available >= amount {
            return Ok(());
        }
        self.notify(Notification::new(
            *user.id(),
            NotificationKind::StatusChange,
            failure_title,
            "Insufficient balance.",
            None,
            self.clock.utc(),
        ))
        .await;
        Err(
            DomainError::insufficient_balance("wallet balance does not cover this amount")
                .with_details(json!({
                    "requiredMinor": amount.minor_units(),
                    "availableMinor": available.minor_units(),
                })),
        )
    }

    /// Create the gateway order and pending ledger entry for a deposit.
    ///
    /// Client deposits carry a 5% platform commission on top of the intended
    /// wallet credit; the commission is charged to the payment instrument,
    /// not the wallet. The entry stays pending (no balance effect) until
    /// [`Self::settle_deposit`] resolves it.
    pub async fn initiate_deposit(
        &self,
        request: DepositRequest,
    ) -> Result<DepositIntent, DomainError> {
        if !request.amount.is_positive() {
            return Err(DomainError::invalid_request(
                "deposit amount must be positive",
            ));
        }
        let user = self.require_user(&request.user_id).await?;

        let commission = match user.role() {
            UserRole::Client => request.amount.fee(DEPOSIT_COMMISSION_BPS),
            UserRole::Translator => Money::ZERO,
        };
        let total_charge = request
            .amount
            .checked_add(commission)
            .ok_or_else(|| DomainError::internal("deposit amount overflow"))?;

        let order = match self
            .gateway
            .create_order(self.gateway_minor_units(total_charge), &self.gateway_currency)
            .await
        {
            Ok(order) => order,
            Err(error) => {
                warn!(error = %error, user = %user.id(), "gateway order creation failed");
                self.notify(Notification::new(
                    *user.id(),
                    NotificationKind::StatusChange,
                    "Deposit Failed",
                    "There was an error processing your deposit. Please try again.",
                    None,
                    self.clock.utc(),
                ))
                .await;
                return Err(map_gateway_error(&error));
            }
        };

        let mut builder = Transaction::builder(
            LedgerOwner::user(*user.id()),
            TransactionKind::Deposit,
            request.amount,
            self.clock.utc(),
        )
        .status(TransactionStatus::Pending)
        .description(format!("Deposit via {}", request.payment_method))
        .payment_method(request.payment_method)
        .gateway_order_ref(order.order_ref.clone());
        if commission.is_positive() {
            builder = builder.fee(commission).commission(commission);
        }
        let pending = builder.build().map_err(map_build_error)?;

        self.ledger
            .append(vec![pending.clone()])
            .await
            .map_err(map_ledger_error)?;

        Ok(DepositIntent {
            transaction: pending,
            order,
        })
    }

    /// Settle an initiated deposit with the checkout result.
    ///
    /// On capture success the entry completes and the linked platform
    /// commission lands in the same atomic step; on gateway rejection or
    /// timeout the entry fails and the wallet is untouched.
    pub async fn settle_deposit(
        &self,
        request: SettleDepositRequest,
    ) -> Result<Transaction, DomainError> {
        let user = self.require_user(&request.user_id).await?;
        let pending = self
            .ledger
            .find(request.transaction_id)
            .await
            .map_err(map_ledger_error)?
            .ok_or_else(|| {
                DomainError::not_found(format!("deposit {} not found", request.transaction_id))
            })?;

        if pending.owner() != &LedgerOwner::user(*user.id()) {
            return Err(DomainError::forbidden(
                "deposit belongs to a different user",
            ));
        }
        if pending.kind() != TransactionKind::Deposit
            || pending.status() != TransactionStatus::Pending
        {
            return Err(DomainError::conflict("deposit is not awaiting settlement"));
        }
        let order_ref = pending
            .gateway_order_ref()
            .ok_or_else(|| DomainError::internal("pending deposit is missing its order"))?
            .to_owned();

        let commission = pending.commission().unwrap_or(Money::ZERO);
        let total_charge = pending
            .amount()
            .checked_add(commission)
            .ok_or_else(|| DomainError::internal("deposit amount overflow"))?;

        let capture = CaptureRequest {
            order_ref: order_ref.clone(),
            payment_ref: request.payment_ref.clone(),
            signature: request.signature,
            amount_minor: self.gateway_minor_units(total_charge),
        };

        match self.gateway.capture_payment(&capture).await {
            Ok(()) => {
                let mut linked = Vec::new();
                if commission.is_positive() {
                    linked.push(
                        Transaction::builder(
                            LedgerOwner::Platform,
                            TransactionKind::Commission,
                            commission,
                            self.clock.utc(),
                        )
                        .description(format!("Platform commission from {}", user.display_name()))
                        .payment_method(COMMISSION_METHOD)
                        .gateway_order_ref(order_ref)
                        .gateway_payment_ref(request.payment_ref.clone())
                        .build()
                        .map_err(map_build_error)?,
                    );
                }
                let completed = self
                    .ledger
                    .finalize(
                        request.transaction_id,
                        TransactionStatus::Completed,
                        Some(request.payment_ref),
                        linked,
                    )
                    .await
                    .map_err(map_ledger_error)?;

                self.notify(Notification::new(
                    *user.id(),
                    NotificationKind::StatusChange,
                    "Funds Deposited!",
                    format!(
                        "Successfully added {} to your wallet.",
                        self.format_for_user(completed.amount(), &user)
                    ),
                    None,
                    self.clock.utc(),
                ))
                .await;
                Ok(completed)
            }
            Err(error) => {
                warn!(error = %error, user = %user.id(), "deposit capture failed");
                if let Err(finalize_error) = self
                    .ledger
                    .finalize(
                        request.transaction_id,
                        TransactionStatus::Failed,
                        None,
                        Vec::new(),
                    )
                    .await
                {
                    warn!(error = %finalize_error, "failed deposit could not be finalised");
                }
                self.notify(Notification::new(
                    *user.id(),
                    NotificationKind::StatusChange,
                    "Deposit Failed",
                    "There was an error processing your deposit. Please try again.",
                    None,
                    self.clock.utc(),
                ))
                .await;
                Err(map_gateway_error(&error))
            }
        }
    }

    /// Withdraw funds to an external instrument.
    ///
    /// The wallet is debited the full amount; the 2% fee is absorbed from
    /// the disbursed sum and credited to the platform.
    pub async fn withdraw(
        &self,
        request: WithdrawRequest,
    ) -> Result<WithdrawalReceipt, DomainError> {
        if !request.amount.is_positive() {
            return Err(DomainError::invalid_request(
                "withdrawal amount must be positive",
            ));
        }
        let user = self.require_user(&request.user_id).await?;
        self.require_balance(&user, request.amount, "Withdrawal Failed")
            .await?;

        let fee = request.amount.fee(WITHDRAWAL_FEE_BPS);
        let disbursed = request
            .amount
            .checked_sub(fee)
            .ok_or_else(|| DomainError::internal("withdrawal amount overflow"))?;

        let pending = Transaction::builder(
            LedgerOwner::user(*user.id()),
            TransactionKind::Withdrawal,
            request.amount,
            self.clock.utc(),
        )
        .status(TransactionStatus::Pending)
        .description(format!("Withdrawal to {}", request.payment_method))
        .payment_method(request.payment_method.clone())
        .fee(fee)
        .build()
        .map_err(map_build_error)?;
        let pending_id = *pending.id();

        self.ledger
            .append(vec![pending])
            .await
            .map_err(map_ledger_error)?;

        let payout_request = PayoutRequest {
            amount_minor: self.gateway_minor_units(disbursed),
            currency: self.gateway_currency.clone(),
            method: request.payment_method.clone(),
            // Destination ref of the saved instrument; a real integration
            // would resolve this from stored fund accounts.
            destination: format!("fa_{}_{}", user.id(), request.payment_method),
        };

        match self.gateway.create_payout(&payout_request).await {
            Ok(payout) => {
                let mut linked = Vec::new();
                if fee.is_positive() {
                    linked.push(
                        Transaction::builder(
                            LedgerOwner::Platform,
                            TransactionKind::Commission,
                            fee,
                            self.clock.utc(),
                        )
                        .description(format!(
                            "Withdrawal fee commission from {}",
                            user.display_name()
                        ))
                        .payment_method(COMMISSION_METHOD)
                        .gateway_payment_ref(payout.payout_ref.clone())
                        .build()
                        .map_err(map_build_error)?,
                    );
                }
                let completed = self
                    .ledger
                    .finalize(
                        pending_id,
                        TransactionStatus::Completed,
                        Some(payout.payout_ref),
                        linked,
                    )
                    .await
                    .map_err(map_ledger_error)?;

                self.notify(Notification::new(
                    *user.id(),
                    NotificationKind::StatusChange,
                    "Withdrawal Successful",
                    format!(
                        "Withdrew {}. You'll receive {}.",
                        self.format_for_user(completed.amount(), &user),
                        self.format_for_user(disbursed, &user)
                    ),
                    None,
                    self.clock.utc(),
                ))
                .await;
                Ok(WithdrawalReceipt {
                    transaction: completed,
                    disbursed,
                })
            }
            Err(error) => {
                warn!(error = %error, user = %user.id(), "payout creation failed");
                if let Err(finalize_error) = self
                    .ledger
                    .finalize(pending_id, TransactionStatus::Failed, None, Vec::new())
                    .await
                {
                    warn!(error = %finalize_error, "failed withdrawal could not be finalised");
                }
                self.notify(Notification::new(
                    *user.id(),
                    NotificationKind::StatusChange,
                    "Withdrawal Failed",
                    "There was an error processing your withdrawal. Please try again.",
                    None,
                    self.clock.utc(),
                ))
                .await;
                Err(map_gateway_error(&error))
            }
        }
    }

    /// Pay for a completed project.
    ///
    /// The client debit and the translator earning land in one atomic batch,
    /// exactly once per payment. Paying a project that is not completed is
    /// rejected.
    pub async fn pay(&self, request: PaymentRequest) -> Result<PaymentReceipt, DomainError> {
        if !request.amount.is_positive() {
            return Err(DomainError::invalid_request(
                "payment amount must be positive",
            ));
        }
        let user = self.require_user(&request.user_id).await?;
        if user.role() != UserRole::Client {
            return Err(DomainError::forbidden("only clients can pay for projects"));
        }

        let project = self
            .projects
            .find_by_id(&request.project_id)
            .await
            .map_err(map_project_error)?
            .ok_or_else(|| {
                DomainError::not_found(format!("project {} not found", request.project_id))
            })?;
        let assignment = match project.status() {
            ProjectStatus::Completed { assignment } => assignment.clone(),
            status => {
                return Err(DomainError::invalid_request(format!(
                    "project must be completed before payment, current status is {}",
                    status.label()
                )));
            }
        };

        self.require_balance(&user, request.amount, "Payment Failed")
            .await?;

        let payment = Transaction::builder(
            LedgerOwner::user(*user.id()),
            TransactionKind::Payment,
            request.amount,
            self.clock.utc(),
        )
        .description(format!("Payment for \"{}\"", project.title()))
        .project(request.project_id)
        .build()
        .map_err(map_build_error)?;

        let earning = Transaction::builder(
            LedgerOwner::user(assignment.translator_id),
            TransactionKind::Earning,
            request.amount,
            self.clock.utc(),
        )
        .description(format!("Earnings from \"{}\"", project.title()))
        .project(request.project_id)
        .build()
        .map_err(map_build_error)?;

        self.ledger
            .append(vec![payment.clone(), earning.clone()])
            .await
            .map_err(map_ledger_error)?;

        let earned = if let Some(translator) = self
            .users
            .find_by_id(&assignment.translator_id)
            .await
            .map_err(map_user_error)?
        {
            self.format_for_user(request.amount, &translator)
        } else {
            format!("${}", request.amount)
        };
        self.notify(Notification::new(
            assignment.translator_id,
            NotificationKind::StatusChange,
            "Payment Received",
            format!("You earned {} from \"{}\"", earned, project.title()),
            Some(request.project_id),
            self.clock.utc(),
        ))
        .await;

        Ok(PaymentReceipt { payment, earning })
    }

    /// Current balance of a wallet or the platform account.
    pub async fn balance(&self, owner: &LedgerOwner) -> Result<Money, DomainError> {
        let entries = self
            .ledger
            .history(owner)
            .await
            .map_err(map_ledger_error)?;
        let minor = entries
            .iter()
            .map(Transaction::signed_minor_units)
            .sum::<i64>();
        Ok(Money::from_minor(minor))
    }

    /// Running total of completed platform commission entries.
    pub async fn platform_commission_balance(&self) -> Result<Money, DomainError> {
        let entries = self
            .ledger
            .history(&LedgerOwner::Platform)
            .await
            .map_err(map_ledger_error)?;
        let minor = entries
            .iter()
            .filter(|entry| {
                entry.kind() == TransactionKind::Commission
                    && entry.status() == TransactionStatus::Completed
            })
            .map(|entry| entry.amount().minor_units())
            .sum::<i64>();
        Ok(Money::from_minor(minor))
    }

    /// Transaction history for an owner, newest first.
    pub async fn history(&self, owner: &LedgerOwner) -> Result<Vec<Transaction>, DomainError> {
        self.ledger.history(owner).await.map_err(map_ledger_error)
    }
}

fn record_notification_failure(error: &NotificationRepositoryError) {
    // Feed delivery is best effort; a failed push must not roll back money.
    warn!(error = %error, "notification delivery failed");
}

#[cfg(test)]
#[path = "ledger_tests.rs"]
mod tests;
