//! Translator directory HTTP handlers.
//!
//! ```text
//! GET /api/v1/translators
//! GET /api/v1/translators/{userId}
//! PUT /api/v1/translators/{userId}
//! ```

use std::collections::BTreeSet;
use std::num::NonZeroU32;

use actix_web::{get, put, web};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::domain::ports::DirectoryError;
use crate::domain::{
    DomainError, Language, Money, Rating, TranslatorProfile, TranslatorProfileDraft, UserId,
};

/// Request payload for creating or replacing a translator profile.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileBody {
    /// Languages the translator works in.
    pub languages: Vec<String>,
    /// Document specialisation tags.
    pub specializations: Vec<String>,
    /// Star rating on the 0-5 scale.
    #[schema(example = 4.8)]
    pub rating: f32,
    /// Lifetime completed projects.
    pub completed_projects: u32,
    /// Currently assigned projects.
    pub active_projects: u32,
    /// Maximum concurrent projects.
    #[schema(example = 3)]
    pub max_concurrent_projects: u32,
    /// Whether the translator accepts new work.
    pub is_available: bool,
    /// Price per word in settlement minor units.
    #[schema(example = 10)]
    pub price_per_word_minor: i64,
    /// Average response time in hours.
    #[schema(example = 4)]
    pub response_time_hours: u32,
}

fn map_directory_error(error: DirectoryError) -> ApiError {
    match error {
        DirectoryError::Connection { message } => {
            DomainError::service_unavailable(format!("translator directory unavailable: {message}"))
        }
        DirectoryError::Query { message } => {
            DomainError::internal(format!("translator directory error: {message}"))
        }
        DirectoryError::NotFound { user_id } => {
            DomainError::not_found(format!("no translator profile for user {user_id}"))
        }
        DirectoryError::NoCapacity { user_id } => {
            DomainError::conflict(format!("translator {user_id} has no free capacity"))
        }
    }
    .into()
}

/// All translator profiles.
#[utoipa::path(
    get,
    path = "/api/v1/translators",
    responses(
        (status = 200, description = "Profiles", body = [TranslatorProfile])
    ),
    tags = ["translators"],
    operation_id = "listTranslators"
)]
#[get("/translators")]
pub async fn list_translators(
    state: web::Data<AppState>,
) -> ApiResult<web::Json<Vec<TranslatorProfile>>> {
    let profiles = state.directory.list().await.map_err(map_directory_error)?;
    Ok(web::Json(profiles))
}

/// The profile owned by a translator account.
#[utoipa::path(
    get,
    path = "/api/v1/translators/{userId}",
    params(("userId" = Uuid, Path, description = "Translator account")),
    responses(
        (status = 200, description = "Profile", body = TranslatorProfile),
        (status = 404, description = "No profile for this account", body = ApiError)
    ),
    tags = ["translators"],
    operation_id = "getTranslator"
)]
#[get("/translators/{user_id}")]
pub async fn get_translator(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<TranslatorProfile>> {
    let user_id = UserId::from_uuid(*path);
    let profile = state
        .directory
        .find_by_user_id(&user_id)
        .await
        .map_err(map_directory_error)?
        .ok_or_else(|| {
            ApiError::from(DomainError::not_found(format!(
                "no translator profile for user {user_id}"
            )))
        })?;
    Ok(web::Json(profile))
}

/// Create or replace a translator profile.
#[utoipa::path(
    put,
    path = "/api/v1/translators/{userId}",
    params(("userId" = Uuid, Path, description = "Translator account")),
    request_body = ProfileBody,
    responses(
        (status = 200, description = "Stored profile", body = TranslatorProfile),
        (status = 400, description = "Validation failed", body = ApiError)
    ),
    tags = ["translators"],
    operation_id = "upsertTranslator"
)]
#[put("/translators/{user_id}")]
pub async fn upsert_translator(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<ProfileBody>,
) -> ApiResult<web::Json<TranslatorProfile>> {
    let payload = body.into_inner();
    let languages = payload
        .languages
        .into_iter()
        .map(Language::new)
        .collect::<Result<BTreeSet<Language>, _>>()
        .map_err(|error| DomainError::invalid_request(error.to_string()))?;
    let rating = Rating::new(payload.rating)
        .map_err(|error| DomainError::invalid_request(error.to_string()))?;
    let max_concurrent = NonZeroU32::new(payload.max_concurrent_projects).ok_or_else(|| {
        ApiError::from(DomainError::invalid_request(
            "concurrent capacity must be at least one",
        ))
    })?;

    let user_id = UserId::from_uuid(*path);
    let existing = state
        .directory
        .find_by_user_id(&user_id)
        .await
        .map_err(map_directory_error)?;
    let (profile_id, created_at) = existing.map_or_else(
        || (Uuid::new_v4(), Utc::now()),
        |profile| (*profile.id(), profile.created_at()),
    );

    let profile = TranslatorProfile::new(TranslatorProfileDraft {
        id: profile_id,
        user_id,
        languages,
        specializations: payload.specializations.into_iter().collect(),
        rating,
        completed_projects: payload.completed_projects,
        active_projects: payload.active_projects,
        max_concurrent_projects: max_concurrent,
        is_available: payload.is_available,
        price_per_word: Money::from_minor(payload.price_per_word_minor),
        response_time_hours: payload.response_time_hours,
        created_at,
    })
    .map_err(|error| DomainError::invalid_request(error.to_string()))?;

    state
        .directory
        .upsert(&profile)
        .await
        .map_err(map_directory_error)?;
    Ok(web::Json(profile))
}
