//! Project HTTP handlers.
//!
//! ```text
//! POST /api/v1/projects
//! GET  /api/v1/projects/{id}
//! GET  /api/v1/clients/{id}/projects
//! POST /api/v1/projects/{id}/status
//! ```
//!
//! Creating a project immediately attempts auto-assignment; the response
//! carries the project in its post-attempt state.

use actix_web::{get, post, web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::domain::{
    DomainError, Language, Money, Project, ProjectDraft, ProjectId, UserId,
};

/// Request payload for creating a project.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectBody {
    /// Short title shown in listings.
    #[schema(example = "Product brochure")]
    pub title: String,
    /// Language the material is written in.
    #[schema(example = "English")]
    pub source_language: String,
    /// Language to translate into.
    #[schema(example = "Spanish")]
    pub target_language: String,
    /// Size of the material in words.
    #[schema(example = 500)]
    pub word_count: u32,
    /// Agreed delivery deadline.
    pub deadline: DateTime<Utc>,
    /// Agreed price in settlement minor units.
    #[schema(example = 6_000)]
    pub price_minor: i64,
    /// Owning client account.
    pub client_id: Uuid,
}

/// Requested status transition.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum StatusTarget {
    /// `Assigned -> InProgress`.
    InProgress,
    /// `InProgress -> Review`.
    Review,
    /// Any assigned state `-> Completed`.
    Completed,
    /// Any non-terminal state `-> Cancelled`.
    Cancelled,
}

/// Request payload for a status transition.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusBody {
    /// Target status.
    pub status: StatusTarget,
}

fn language(raw: String) -> Result<Language, ApiError> {
    Language::new(raw)
        .map_err(|error| DomainError::invalid_request(error.to_string()).into())
}

/// Create a project and attempt auto-assignment.
#[utoipa::path(
    post,
    path = "/api/v1/projects",
    request_body = CreateProjectBody,
    responses(
        (status = 201, description = "Project created; may already be assigned", body = Project),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 403, description = "Only clients can create projects", body = ApiError),
        (status = 404, description = "Unknown client", body = ApiError)
    ),
    tags = ["projects"],
    operation_id = "createProject"
)]
#[post("/projects")]
pub async fn create_project(
    state: web::Data<AppState>,
    body: web::Json<CreateProjectBody>,
) -> ApiResult<HttpResponse> {
    let payload = body.into_inner();
    let outcome = state
        .assignment
        .create_project(ProjectDraft {
            title: payload.title,
            source_language: language(payload.source_language)?,
            target_language: language(payload.target_language)?,
            word_count: payload.word_count,
            deadline: payload.deadline,
            price: Money::from_minor(payload.price_minor),
            client_id: UserId::from_uuid(payload.client_id),
        })
        .await?;
    Ok(HttpResponse::Created().json(outcome.project()))
}

/// Fetch one project.
#[utoipa::path(
    get,
    path = "/api/v1/projects/{id}",
    params(("id" = Uuid, Path, description = "Project identifier")),
    responses(
        (status = 200, description = "Project", body = Project),
        (status = 404, description = "Unknown project", body = ApiError)
    ),
    tags = ["projects"],
    operation_id = "getProject"
)]
#[get("/projects/{id}")]
pub async fn get_project(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<Project>> {
    let project = state
        .assignment
        .project(&ProjectId::from(*path))
        .await?;
    Ok(web::Json(project))
}

/// All projects owned by a client, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/clients/{id}/projects",
    params(("id" = Uuid, Path, description = "Client identifier")),
    responses(
        (status = 200, description = "Projects", body = [Project])
    ),
    tags = ["projects"],
    operation_id = "listClientProjects"
)]
#[get("/clients/{id}/projects")]
pub async fn list_client_projects(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<Vec<Project>>> {
    let projects = state
        .assignment
        .client_projects(&UserId::from_uuid(*path))
        .await?;
    Ok(web::Json(projects))
}

/// Apply a status transition.
///
/// Completion fires the translator's counters and the client notification
/// exactly once; repeating it answers with a conflict.
#[utoipa::path(
    post,
    path = "/api/v1/projects/{id}/status",
    params(("id" = Uuid, Path, description = "Project identifier")),
    request_body = StatusBody,
    responses(
        (status = 200, description = "Project after the transition", body = Project),
        (status = 404, description = "Unknown project", body = ApiError),
        (status = 409, description = "Transition is not valid from the current state", body = ApiError)
    ),
    tags = ["projects"],
    operation_id = "updateProjectStatus"
)]
#[post("/projects/{id}/status")]
pub async fn update_status(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<StatusBody>,
) -> ApiResult<web::Json<Project>> {
    let project_id = ProjectId::from(*path);
    let project = match body.status {
        StatusTarget::InProgress => state.assignment.start_project(&project_id).await?,
        StatusTarget::Review => state.assignment.submit_for_review(&project_id).await?,
        StatusTarget::Completed => state.assignment.complete_project(&project_id).await?,
        StatusTarget::Cancelled => state.assignment.cancel_project(&project_id).await?,
    };
    Ok(web::Json(project))
}
