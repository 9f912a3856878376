//! Wallet and ledger HTTP handlers.
//!
//! ```text
//! GET  /api/v1/users/{id}/wallet
//! POST /api/v1/users/{id}/deposits
//! POST /api/v1/users/{id}/deposits/{transactionId}/settlement
//! POST /api/v1/users/{id}/withdrawals
//! POST /api/v1/users/{id}/payments
//! GET  /api/v1/users/{id}/transactions
//! GET  /api/v1/platform/commission-balance
//! GET  /api/v1/currencies
//! ```
//!
//! All amounts cross this boundary as integer minor units of the settlement
//! currency; the display currency only affects the formatted strings.

use actix_web::{get, post, web, HttpResponse};
use pagination::{paginate, Cursor};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::domain::{
    CurrencyCode, DecimalStyle, DepositRequest, DomainError, LedgerOwner, Money, PaymentRequest,
    ProjectId, SettleDepositRequest, Transaction, UserId, WithdrawRequest, CURRENCIES,
};

/// Request payload for initiating a deposit.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DepositBody {
    /// Intended wallet credit in settlement minor units.
    #[schema(example = 10_000)]
    pub amount_minor: i64,
    /// Payment instrument tag.
    #[schema(example = "card")]
    pub payment_method: String,
}

/// Request payload for settling an initiated deposit.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SettleBody {
    /// Payment reference produced by the checkout.
    pub payment_ref: String,
    /// Checkout signature over order and payment references.
    pub signature: String,
}

/// Request payload for a withdrawal.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawBody {
    /// Wallet debit in settlement minor units.
    #[schema(example = 5_000)]
    pub amount_minor: i64,
    /// Payment instrument tag.
    #[schema(example = "bank_transfer")]
    pub payment_method: String,
}

/// Request payload for paying a completed project.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentBody {
    /// Project being paid for.
    pub project_id: Uuid,
    /// Wallet debit in settlement minor units.
    #[schema(example = 8_000)]
    pub amount_minor: i64,
}

/// Wallet summary for one account.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WalletBody {
    /// Balance in settlement minor units.
    pub balance_minor: i64,
    /// The account's display currency.
    pub currency: String,
    /// Balance rendered in the display currency.
    pub formatted: String,
}

/// Deposit awaiting checkout settlement.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DepositIntentBody {
    /// The pending ledger entry.
    pub transaction: Transaction,
    /// Gateway order the checkout must settle against.
    pub order_ref: String,
    /// Amount the order was created for, in gateway minor units.
    pub order_amount_minor: i64,
    /// Currency the order settles in.
    pub order_currency: String,
}

/// Outcome of a successful withdrawal.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalReceiptBody {
    /// The completed ledger entry; the wallet is debited its full amount.
    pub transaction: Transaction,
    /// Amount disbursed after the fee, in settlement minor units.
    pub disbursed_minor: i64,
}

/// Outcome of a successful payment.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentReceiptBody {
    /// Client wallet debit.
    pub payment: Transaction,
    /// Translator wallet credit.
    pub earning: Transaction,
}

/// One window of a transaction history listing.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPageBody {
    /// Entries in this window, newest first.
    pub items: Vec<Transaction>,
    /// Token for the next window, when more entries remain.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

/// Platform commission running total.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommissionBalanceBody {
    /// Balance in settlement minor units.
    pub balance_minor: i64,
}

/// One supported currency.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyEntryBody {
    /// Three-letter code.
    pub code: String,
    /// Display symbol.
    pub symbol: String,
    /// Human-readable name.
    pub name: String,
    /// Exchange rate relative to the settlement currency.
    pub rate: f64,
    /// Whether amounts render without decimal places.
    pub zero_decimal: bool,
}

/// Cursor listing query parameters.
#[derive(Debug, Deserialize)]
pub struct ListingQuery {
    /// Opaque continuation token.
    pub cursor: Option<String>,
    /// Requested window size.
    pub limit: Option<usize>,
}

pub(super) fn parse_cursor(query: &ListingQuery) -> Result<Cursor, ApiError> {
    query.cursor.as_deref().map_or(Ok(Cursor::start()), |token| {
        Cursor::decode(token)
            .map_err(|error| DomainError::invalid_request(error.to_string()).into())
    })
}

/// Wallet balance in settlement minor units plus a display rendering.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/wallet",
    params(("id" = Uuid, Path, description = "Account identifier")),
    responses(
        (status = 200, description = "Wallet summary", body = WalletBody),
        (status = 404, description = "Unknown account", body = ApiError)
    ),
    tags = ["wallet"],
    operation_id = "getWallet"
)]
#[get("/users/{id}/wallet")]
pub async fn get_wallet(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<WalletBody>> {
    let user_id = UserId::from_uuid(*path);
    let account = state.onboarding.account(&user_id).await?;
    let balance = state.ledger.balance(&LedgerOwner::user(user_id)).await?;
    let display = state
        .converter
        .convert(balance, &CurrencyCode::base(), account.currency());
    Ok(web::Json(WalletBody {
        balance_minor: balance.minor_units(),
        currency: account.currency().to_string(),
        formatted: state.converter.format(display, account.currency()),
    }))
}

/// Create the gateway order and pending ledger entry for a deposit.
#[utoipa::path(
    post,
    path = "/api/v1/users/{id}/deposits",
    params(("id" = Uuid, Path, description = "Account identifier")),
    request_body = DepositBody,
    responses(
        (status = 202, description = "Deposit awaiting checkout", body = DepositIntentBody),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 502, description = "Gateway rejected the order", body = ApiError)
    ),
    tags = ["wallet"],
    operation_id = "initiateDeposit"
)]
#[post("/users/{id}/deposits")]
pub async fn initiate_deposit(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<DepositBody>,
) -> ApiResult<HttpResponse> {
    let payload = body.into_inner();
    let intent = state
        .ledger
        .initiate_deposit(DepositRequest {
            user_id: UserId::from_uuid(*path),
            amount: Money::from_minor(payload.amount_minor),
            payment_method: payload.payment_method,
        })
        .await?;
    Ok(HttpResponse::Accepted().json(DepositIntentBody {
        transaction: intent.transaction,
        order_ref: intent.order.order_ref,
        order_amount_minor: intent.order.amount_minor,
        order_currency: intent.order.currency.to_string(),
    }))
}

/// Settle an initiated deposit with the checkout result.
#[utoipa::path(
    post,
    path = "/api/v1/users/{id}/deposits/{transactionId}/settlement",
    params(
        ("id" = Uuid, Path, description = "Account identifier"),
        ("transactionId" = Uuid, Path, description = "Pending deposit entry")
    ),
    request_body = SettleBody,
    responses(
        (status = 200, description = "Deposit settled", body = Transaction),
        (status = 404, description = "Unknown deposit", body = ApiError),
        (status = 409, description = "Deposit is not awaiting settlement", body = ApiError),
        (status = 502, description = "Capture rejected", body = ApiError)
    ),
    tags = ["wallet"],
    operation_id = "settleDeposit"
)]
#[post("/users/{id}/deposits/{transaction_id}/settlement")]
pub async fn settle_deposit(
    state: web::Data<AppState>,
    path: web::Path<(Uuid, Uuid)>,
    body: web::Json<SettleBody>,
) -> ApiResult<web::Json<Transaction>> {
    let (user_id, transaction_id) = path.into_inner();
    let payload = body.into_inner();
    let settled = state
        .ledger
        .settle_deposit(SettleDepositRequest {
            user_id: UserId::from_uuid(user_id),
            transaction_id,
            payment_ref: payload.payment_ref,
            signature: payload.signature,
        })
        .await?;
    Ok(web::Json(settled))
}

/// Withdraw funds to an external instrument.
#[utoipa::path(
    post,
    path = "/api/v1/users/{id}/withdrawals",
    params(("id" = Uuid, Path, description = "Account identifier")),
    request_body = WithdrawBody,
    responses(
        (status = 200, description = "Withdrawal disbursed", body = WithdrawalReceiptBody),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 402, description = "Balance does not cover the amount", body = ApiError),
        (status = 502, description = "Payout rejected", body = ApiError)
    ),
    tags = ["wallet"],
    operation_id = "withdraw"
)]
#[post("/users/{id}/withdrawals")]
pub async fn withdraw(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<WithdrawBody>,
) -> ApiResult<web::Json<WithdrawalReceiptBody>> {
    let payload = body.into_inner();
    let receipt = state
        .ledger
        .withdraw(WithdrawRequest {
            user_id: UserId::from_uuid(*path),
            amount: Money::from_minor(payload.amount_minor),
            payment_method: payload.payment_method,
        })
        .await?;
    Ok(web::Json(WithdrawalReceiptBody {
        transaction: receipt.transaction,
        disbursed_minor: receipt.disbursed.minor_units(),
    }))
}

/// Pay for a completed project.
#[utoipa::path(
    post,
    path = "/api/v1/users/{id}/payments",
    params(("id" = Uuid, Path, description = "Paying client")),
    request_body = PaymentBody,
    responses(
        (status = 200, description = "Payment and earning recorded", body = PaymentReceiptBody),
        (status = 400, description = "Project is not completed", body = ApiError),
        (status = 402, description = "Balance does not cover the amount", body = ApiError),
        (status = 403, description = "Only clients can pay", body = ApiError)
    ),
    tags = ["wallet"],
    operation_id = "payProject"
)]
#[post("/users/{id}/payments")]
pub async fn pay(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<PaymentBody>,
) -> ApiResult<web::Json<PaymentReceiptBody>> {
    let payload = body.into_inner();
    let receipt = state
        .ledger
        .pay(PaymentRequest {
            user_id: UserId::from_uuid(*path),
            project_id: ProjectId::from(payload.project_id),
            amount: Money::from_minor(payload.amount_minor),
        })
        .await?;
    Ok(web::Json(PaymentReceiptBody {
        payment: receipt.payment,
        earning: receipt.earning,
    }))
}

/// Transaction history, newest first, cursor paginated.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/transactions",
    params(
        ("id" = Uuid, Path, description = "Account identifier"),
        ("cursor" = Option<String>, Query, description = "Continuation token"),
        ("limit" = Option<usize>, Query, description = "Window size")
    ),
    responses(
        (status = 200, description = "One history window", body = TransactionPageBody),
        (status = 400, description = "Malformed cursor", body = ApiError)
    ),
    tags = ["wallet"],
    operation_id = "listTransactions"
)]
#[get("/users/{id}/transactions")]
pub async fn list_transactions(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    query: web::Query<ListingQuery>,
) -> ApiResult<web::Json<TransactionPageBody>> {
    let cursor = parse_cursor(&query)?;
    let history = state
        .ledger
        .history(&LedgerOwner::user(UserId::from_uuid(*path)))
        .await?;
    let page = paginate(history, &cursor, query.limit.unwrap_or(0));
    let next_cursor = page.next_cursor().map(ToOwned::to_owned);
    Ok(web::Json(TransactionPageBody {
        items: page.into_items(),
        next_cursor,
    }))
}

/// Running total of completed platform commission entries.
#[utoipa::path(
    get,
    path = "/api/v1/platform/commission-balance",
    responses(
        (status = 200, description = "Commission balance", body = CommissionBalanceBody)
    ),
    tags = ["wallet"],
    operation_id = "platformCommissionBalance"
)]
#[get("/platform/commission-balance")]
pub async fn commission_balance(
    state: web::Data<AppState>,
) -> ApiResult<web::Json<CommissionBalanceBody>> {
    let balance = state.ledger.platform_commission_balance().await?;
    Ok(web::Json(CommissionBalanceBody {
        balance_minor: balance.minor_units(),
    }))
}

/// The supported currency reference table.
#[utoipa::path(
    get,
    path = "/api/v1/currencies",
    responses(
        (status = 200, description = "Supported currencies", body = [CurrencyEntryBody])
    ),
    tags = ["wallet"],
    operation_id = "listCurrencies"
)]
#[get("/currencies")]
pub async fn list_currencies() -> ApiResult<web::Json<Vec<CurrencyEntryBody>>> {
    let entries = CURRENCIES
        .iter()
        .map(|currency| CurrencyEntryBody {
            code: currency.code.to_owned(),
            symbol: currency.symbol.to_owned(),
            name: currency.name.to_owned(),
            rate: currency.rate,
            zero_decimal: currency.style == DecimalStyle::ZeroDecimal,
        })
        .collect();
    Ok(web::Json(entries))
}

#[cfg(test)]
mod tests {
    //! Regression coverage for listing query parsing.

    use super::*;
    use crate::domain::find_currency;

    #[test]
    fn absent_cursor_starts_at_the_beginning() {
        let query = ListingQuery {
            cursor: None,
            limit: None,
        };
        assert_eq!(parse_cursor(&query).expect("parses"), Cursor::start());
    }

    #[test]
    fn malformed_cursors_are_bad_requests() {
        let query = ListingQuery {
            cursor: Some("%%%".to_owned()),
            limit: None,
        };
        let error = parse_cursor(&query).expect_err("garbage rejected");
        assert_eq!(error.code(), crate::domain::ErrorCode::InvalidRequest);
    }

    #[test]
    fn currency_listing_marks_zero_decimal_units() {
        let _ = find_currency("JPY").expect("JPY in the table");
        let entries: Vec<CurrencyEntryBody> = CURRENCIES
            .iter()
            .map(|currency| CurrencyEntryBody {
                code: currency.code.to_owned(),
                symbol: currency.symbol.to_owned(),
                name: currency.name.to_owned(),
                rate: currency.rate,
                zero_decimal: currency.style == DecimalStyle::ZeroDecimal,
            })
            .collect();
        let zero_decimal: Vec<&str> = entries
            .iter()
            .filter(|entry| entry.zero_decimal)
            .map(|entry| entry.code.as_str())
            .collect();
        assert_eq!(zero_decimal, vec!["JPY", "KRW"]);
    }
}
