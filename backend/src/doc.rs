//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every REST handler and the schemas their payloads
//! reference. The generated specification feeds Swagger UI in debug builds.

use utoipa::OpenApi;

use crate::api::error::ApiError;
use crate::api::feeds::{NotificationPageBody, SendMessageBody, UnreadCountsBody};
use crate::api::projects::{CreateProjectBody, StatusBody, StatusTarget};
use crate::api::translators::ProfileBody;
use crate::api::users::{CurrencyBody, RegisterBody};
use crate::api::wallet::{
    CommissionBalanceBody, CurrencyEntryBody, DepositBody, DepositIntentBody, PaymentBody,
    PaymentReceiptBody, SettleBody, TransactionPageBody, WalletBody, WithdrawBody,
    WithdrawalReceiptBody,
};
use crate::domain::{
    Assignment, Message, Notification, NotificationKind, Project, ProjectStatus, Transaction,
    TransactionKind, TransactionStatus, TranslatorProfile, UserAccount, UserRole,
};

/// OpenAPI document for the REST API.
///
/// Swagger UI is enabled in debug builds only.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "LingoBridge backend API",
        description = "Translation marketplace: matching, assignment, and the wallet ledger.",
        license(name = "MIT")
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::api::users::register,
        crate::api::users::get_user,
        crate::api::users::change_currency,
        crate::api::wallet::get_wallet,
        crate::api::wallet::initiate_deposit,
        crate::api::wallet::settle_deposit,
        crate::api::wallet::withdraw,
        crate::api::wallet::pay,
        crate::api::wallet::list_transactions,
        crate::api::wallet::commission_balance,
        crate::api::wallet::list_currencies,
        crate::api::projects::create_project,
        crate::api::projects::get_project,
        crate::api::projects::list_client_projects,
        crate::api::projects::update_status,
        crate::api::translators::list_translators,
        crate::api::translators::get_translator,
        crate::api::translators::upsert_translator,
        crate::api::feeds::list_messages,
        crate::api::feeds::send_message,
        crate::api::feeds::mark_message_read,
        crate::api::feeds::list_notifications,
        crate::api::feeds::mark_notification_read,
        crate::api::feeds::unread_counts,
        crate::api::health::ready,
        crate::api::health::live,
    ),
    components(schemas(
        ApiError,
        UserAccount,
        UserRole,
        RegisterBody,
        CurrencyBody,
        WalletBody,
        DepositBody,
        DepositIntentBody,
        SettleBody,
        WithdrawBody,
        WithdrawalReceiptBody,
        PaymentBody,
        PaymentReceiptBody,
        TransactionPageBody,
        CommissionBalanceBody,
        CurrencyEntryBody,
        Transaction,
        TransactionKind,
        TransactionStatus,
        Project,
        ProjectStatus,
        Assignment,
        CreateProjectBody,
        StatusBody,
        StatusTarget,
        TranslatorProfile,
        ProfileBody,
        Message,
        SendMessageBody,
        Notification,
        NotificationKind,
        NotificationPageBody,
        UnreadCountsBody,
    )),
    tags(
        (name = "users", description = "Registration and currency preferences"),
        (name = "wallet", description = "Deposits, withdrawals, payments, and history"),
        (name = "projects", description = "Project lifecycle and auto-assignment"),
        (name = "translators", description = "Translator directory"),
        (name = "feeds", description = "Messages and notifications"),
        (name = "health", description = "Probes for orchestration")
    )
)]
pub struct ApiDoc;
