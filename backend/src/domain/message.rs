//! Per-project message feed entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::project::ProjectId;
use super::user::UserId;

/// One chat message on a project's feed.
///
/// The recipient is captured at send time (the project counterparty) so
/// unread counts do not need to re-derive project membership. Messages sent
/// while a project has no translator carry no recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    id: Uuid,
    project_id: ProjectId,
    sender_id: UserId,
    sender_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    recipient_id: Option<UserId>,
    body: String,
    read: bool,
    sent_at: DateTime<Utc>,
}

/// Display name recorded on platform-authored messages.
const SYSTEM_SENDER_NAME: &str = "LingoBridge Team";

impl Message {
    /// Build a platform-authored message, such as the assignment welcome
    /// note. The sender id is the nil UUID, which no real account carries.
    #[must_use]
    pub fn system(
        project_id: ProjectId,
        body: impl Into<String>,
        sent_at: DateTime<Utc>,
    ) -> Self {
        Self::new(
            project_id,
            UserId::from_uuid(Uuid::nil()),
            SYSTEM_SENDER_NAME,
            None,
            body,
            sent_at,
        )
    }

    /// Build an unread message.
    #[must_use]
    pub fn new(
        project_id: ProjectId,
        sender_id: UserId,
        sender_name: impl Into<String>,
        recipient_id: Option<UserId>,
        body: impl Into<String>,
        sent_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            project_id,
            sender_id,
            sender_name: sender_name.into(),
            recipient_id,
            body: body.into(),
            read: false,
            sent_at,
        }
    }

    /// Entry identifier.
    #[must_use]
    pub const fn id(&self) -> &Uuid {
        &self.id
    }

    /// Project whose feed this message belongs to.
    #[must_use]
    pub const fn project_id(&self) -> &ProjectId {
        &self.project_id
    }

    /// Author.
    #[must_use]
    pub const fn sender_id(&self) -> &UserId {
        &self.sender_id
    }

    /// Author display name captured at send time.
    #[must_use]
    pub fn sender_name(&self) -> &str {
        self.sender_name.as_str()
    }

    /// Counterparty the message was addressed to, when one existed.
    #[must_use]
    pub const fn recipient_id(&self) -> Option<&UserId> {
        self.recipient_id.as_ref()
    }

    /// Message text.
    #[must_use]
    pub fn body(&self) -> &str {
        self.body.as_str()
    }

    /// Whether the recipient has seen this message.
    #[must_use]
    pub const fn is_read(&self) -> bool {
        self.read
    }

    /// When the message was sent.
    #[must_use]
    pub const fn sent_at(&self) -> DateTime<Utc> {
        self.sent_at
    }

    /// Flag the message as seen.
    pub fn mark_read(&mut self) {
        self.read = true;
    }
}
