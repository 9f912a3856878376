//! Per-user notification feed entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::project::ProjectId;
use super::user::UserId;

/// Category of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// A translator was attached to a project.
    ProjectAssigned,
    /// A project reached completion.
    ProjectCompleted,
    /// A new chat message arrived.
    Message,
    /// Wallet or account status changed.
    StatusChange,
}

/// One entry in a user's notification feed.
///
/// Entries are append-only; only the read flag changes after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    id: Uuid,
    user_id: UserId,
    kind: NotificationKind,
    title: String,
    body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    project_id: Option<ProjectId>,
    read: bool,
    created_at: DateTime<Utc>,
}

impl Notification {
    /// Build an unread notification.
    #[must_use]
    pub fn new(
        user_id: UserId,
        kind: NotificationKind,
        title: impl Into<String>,
        body: impl Into<String>,
        project_id: Option<ProjectId>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            kind,
            title: title.into(),
            body: body.into(),
            project_id,
            read: false,
            created_at,
        }
    }

    /// Entry identifier.
    #[must_use]
    pub const fn id(&self) -> &Uuid {
        &self.id
    }

    /// Recipient.
    #[must_use]
    pub const fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Category.
    #[must_use]
    pub const fn kind(&self) -> NotificationKind {
        self.kind
    }

    /// Short headline.
    #[must_use]
    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    /// Longer description.
    #[must_use]
    pub fn body(&self) -> &str {
        self.body.as_str()
    }

    /// Related project, when relevant.
    #[must_use]
    pub const fn project_id(&self) -> Option<&ProjectId> {
        self.project_id.as_ref()
    }

    /// Whether the recipient has seen this entry.
    #[must_use]
    pub const fn is_read(&self) -> bool {
        self.read
    }

    /// Flag the entry as seen.
    pub fn mark_read(&mut self) {
        self.read = true;
    }
}
