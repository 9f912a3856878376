//! Account HTTP handlers.
//!
//! ```text
//! POST /api/v1/users
//! GET  /api/v1/users/{id}
//! PUT  /api/v1/users/{id}/currency
//! ```

use actix_web::{get, post, put, web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::domain::{CurrencyCode, DisplayName, DomainError, UserAccount, UserId, UserRole};

/// Request payload for registering an account.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterBody {
    /// Display name shown to other users.
    #[schema(example = "Ada Lovelace")]
    pub display_name: String,
    /// Marketplace role.
    pub role: UserRole,
}

/// Request payload for changing the display currency.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyBody {
    /// Three-letter currency code.
    #[schema(example = "EUR")]
    pub currency: String,
}

fn parse_user_id(raw: &Uuid) -> UserId {
    UserId::from_uuid(*raw)
}

/// Register a new client or translator account.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = RegisterBody,
    responses(
        (status = 201, description = "Account created", body = UserAccount),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 503, description = "Persistence unavailable", body = ApiError)
    ),
    tags = ["users"],
    operation_id = "registerUser"
)]
#[post("/users")]
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterBody>,
) -> ApiResult<HttpResponse> {
    let payload = body.into_inner();
    let display_name = DisplayName::new(payload.display_name)
        .map_err(|error| DomainError::invalid_request(error.to_string()))?;
    let account = state.onboarding.register(display_name, payload.role).await?;
    Ok(HttpResponse::Created().json(account))
}

/// Fetch one account.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = Uuid, Path, description = "Account identifier")),
    responses(
        (status = 200, description = "Account", body = UserAccount),
        (status = 404, description = "Unknown account", body = ApiError)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<UserAccount>> {
    let account = state.onboarding.account(&parse_user_id(&path)).await?;
    Ok(web::Json(account))
}

/// Update an account's preferred display currency.
#[utoipa::path(
    put,
    path = "/api/v1/users/{id}/currency",
    params(("id" = Uuid, Path, description = "Account identifier")),
    request_body = CurrencyBody,
    responses(
        (status = 200, description = "Updated account", body = UserAccount),
        (status = 400, description = "Malformed currency code", body = ApiError),
        (status = 404, description = "Unknown account", body = ApiError)
    ),
    tags = ["users"],
    operation_id = "changeCurrency"
)]
#[put("/users/{id}/currency")]
pub async fn change_currency(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<CurrencyBody>,
) -> ApiResult<web::Json<UserAccount>> {
    let currency = CurrencyCode::new(body.into_inner().currency)
        .map_err(|error| DomainError::invalid_request(error.to_string()))?;
    let account = state
        .onboarding
        .change_currency(&parse_user_id(&path), currency)
        .await?;
    Ok(web::Json(account))
}
