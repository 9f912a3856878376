//! Message and notification feed HTTP handlers.
//!
//! ```text
//! GET  /api/v1/projects/{id}/messages
//! POST /api/v1/projects/{id}/messages
//! POST /api/v1/messages/{id}/read
//! GET  /api/v1/users/{id}/notifications
//! POST /api/v1/notifications/{id}/read
//! GET  /api/v1/users/{id}/unread-counts
//! ```

use actix_web::{get, post, web, HttpResponse};
use pagination::paginate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::api::wallet::{parse_cursor, ListingQuery};
use crate::domain::{Message, Notification, ProjectId, UserId};

/// Request payload for sending a message.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageBody {
    /// Author; must be the project's client or assigned translator.
    pub sender_id: Uuid,
    /// Message text.
    #[schema(example = "How is the draft coming along?")]
    pub body: String,
}

/// One window of a notification feed.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPageBody {
    /// Entries in this window, newest first.
    pub items: Vec<Notification>,
    /// Token for the next window, when more entries remain.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

/// Unread entry counts across both feeds.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UnreadCountsBody {
    /// Unread notifications.
    pub notifications: u64,
    /// Unread messages.
    pub messages: u64,
}

/// All messages on a project's feed, oldest first.
#[utoipa::path(
    get,
    path = "/api/v1/projects/{id}/messages",
    params(("id" = Uuid, Path, description = "Project identifier")),
    responses(
        (status = 200, description = "Message feed", body = [Message]),
        (status = 404, description = "Unknown project", body = ApiError)
    ),
    tags = ["feeds"],
    operation_id = "listProjectMessages"
)]
#[get("/projects/{id}/messages")]
pub async fn list_messages(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<Vec<Message>>> {
    let feed = state
        .messaging
        .project_feed(&ProjectId::from(*path))
        .await?;
    Ok(web::Json(feed))
}

/// Append a message to a project's feed.
#[utoipa::path(
    post,
    path = "/api/v1/projects/{id}/messages",
    params(("id" = Uuid, Path, description = "Project identifier")),
    request_body = SendMessageBody,
    responses(
        (status = 201, description = "Recorded message", body = Message),
        (status = 400, description = "Blank message body", body = ApiError),
        (status = 403, description = "Sender is not a project participant", body = ApiError),
        (status = 404, description = "Unknown project or sender", body = ApiError)
    ),
    tags = ["feeds"],
    operation_id = "sendProjectMessage"
)]
#[post("/projects/{id}/messages")]
pub async fn send_message(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<SendMessageBody>,
) -> ApiResult<HttpResponse> {
    let payload = body.into_inner();
    let message = state
        .messaging
        .send_message(
            &ProjectId::from(*path),
            &UserId::from_uuid(payload.sender_id),
            payload.body,
        )
        .await?;
    Ok(HttpResponse::Created().json(message))
}

/// Flag one message as seen.
#[utoipa::path(
    post,
    path = "/api/v1/messages/{id}/read",
    params(("id" = Uuid, Path, description = "Message identifier")),
    responses(
        (status = 200, description = "Updated message", body = Message),
        (status = 404, description = "Unknown message", body = ApiError)
    ),
    tags = ["feeds"],
    operation_id = "markMessageRead"
)]
#[post("/messages/{id}/read")]
pub async fn mark_message_read(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<Message>> {
    let message = state.messaging.mark_message_read(*path).await?;
    Ok(web::Json(message))
}

/// Notification feed, newest first, cursor paginated.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/notifications",
    params(
        ("id" = Uuid, Path, description = "Account identifier"),
        ("cursor" = Option<String>, Query, description = "Continuation token"),
        ("limit" = Option<usize>, Query, description = "Window size")
    ),
    responses(
        (status = 200, description = "One feed window", body = NotificationPageBody),
        (status = 400, description = "Malformed cursor", body = ApiError)
    ),
    tags = ["feeds"],
    operation_id = "listNotifications"
)]
#[get("/users/{id}/notifications")]
pub async fn list_notifications(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    query: web::Query<ListingQuery>,
) -> ApiResult<web::Json<NotificationPageBody>> {
    let cursor = parse_cursor(&query)?;
    let feed = state
        .messaging
        .notifications_for(&UserId::from_uuid(*path))
        .await?;
    let page = paginate(feed, &cursor, query.limit.unwrap_or(0));
    let next_cursor = page.next_cursor().map(ToOwned::to_owned);
    Ok(web::Json(NotificationPageBody {
        items: page.into_items(),
        next_cursor,
    }))
}

/// Flag one notification as seen.
#[utoipa::path(
    post,
    path = "/api/v1/notifications/{id}/read",
    params(("id" = Uuid, Path, description = "Notification identifier")),
    responses(
        (status = 200, description = "Updated notification", body = Notification),
        (status = 404, description = "Unknown notification", body = ApiError)
    ),
    tags = ["feeds"],
    operation_id = "markNotificationRead"
)]
#[post("/notifications/{id}/read")]
pub async fn mark_notification_read(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<Notification>> {
    let notification = state.messaging.mark_notification_read(*path).await?;
    Ok(web::Json(notification))
}

/// Unread entry counts across both feeds.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/unread-counts",
    params(("id" = Uuid, Path, description = "Account identifier")),
    responses(
        (status = 200, description = "Unread counts", body = UnreadCountsBody)
    ),
    tags = ["feeds"],
    operation_id = "unreadCounts"
)]
#[get("/users/{id}/unread-counts")]
pub async fn unread_counts(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<UnreadCountsBody>> {
    let counts = state
        .messaging
        .unread_counts(&UserId::from_uuid(*path))
        .await?;
    Ok(web::Json(UnreadCountsBody {
        notifications: counts.notifications,
        messages: counts.messages,
    }))
}
