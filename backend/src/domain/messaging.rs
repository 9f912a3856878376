//! Project messaging and notification feeds.
//!
//! Both feeds are append-only; only the read flag changes after an entry
//! lands. Sending a message records the project counterparty at send time so
//! unread counts never re-derive membership from project state.

use std::sync::Arc;

use mockable::Clock;
use tracing::warn;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::message::Message;
use crate::domain::notification::{Notification, NotificationKind};
use crate::domain::ports::{
    MessageRepository, MessageRepositoryError, NotificationRepository,
    NotificationRepositoryError, ProjectRepository, ProjectRepositoryError,
    UserAccountRepository, UserRepositoryError,
};
use crate::domain::project::{Project, ProjectId};
use crate::domain::user::UserId;

/// Unread entry counts across both feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnreadCounts {
    /// Unread notifications addressed to the user.
    pub notifications: u64,
    /// Unread messages addressed to the user.
    pub messages: u64,
}

/// Messaging and notification feed service.
#[derive(Clone)]
pub struct MessagingService {
    projects: Arc<dyn ProjectRepository>,
    users: Arc<dyn UserAccountRepository>,
    notifications: Arc<dyn NotificationRepository>,
    messages: Arc<dyn MessageRepository>,
    clock: Arc<dyn Clock>,
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

fn map_message_error(error: MessageRepositoryError) -> DomainError {
    match error {
        MessageRepositoryError::Connection { message } => {
            DomainError::service_unavailable(format!("message repository unavailable: {message}"))
        }
        MessageRepositoryError::Query { message } => {
            DomainError::internal(format!("message repository error: {message}"))
        }
        MessageRepositoryError::NotFound { id } => {
            DomainError::not_found(format!("message {id} not found"))
        }
    }
}

fn map_notification_error(error: NotificationRepositoryError) -> DomainError {
    match error {
        NotificationRepositoryError::Connection { message } => {
            DomainError::service_unavailable(format!(
                "notification repository unavailable: {message}"
            ))
        }
        NotificationRepositoryError::Query { message } => {
            DomainError::internal(format!("notification repository error: {message}"))
        }
        NotificationRepositoryError::NotFound { id } => {
            DomainError::not_found(format!("notification {id} not found"))
        }
    }
}

impl MessagingService {
    /// Create a new service over the given collaborators.
    pub fn new(
        projects: Arc<dyn ProjectRepository>,
        users: Arc<dyn UserAccountRepository>,
        notifications: Arc<dyn NotificationRepository>,
        messages: Arc<dyn MessageRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            projects,
            users,
            notifications,
            messages,
            clock,
        }
    }

    fn counterparty(project: &Project, sender_id: &UserId) -> Result<Option<UserId>, DomainError> {
        let translator_id = project
            .assignment()
            .map(|assignment| assignment.translator_id);
        if sender_id == project.client_id() {
            return Ok(translator_id);
        }
        if translator_id.as_ref() == Some(sender_id) {
            return Ok(Some(*project.client_id()));
        }
        Err(DomainError::forbidden(
            "only project participants can send messages",
        ))
    }

    /// Append a message to a project's feed and notify the counterparty.
    ///
    /// A message sent by the client before a translator is assigned carries
    /// no recipient and raises no notification.
    pub async fn send_message(
        &self,
        project_id: &ProjectId,
        sender_id: &UserId,
        body: impl Into<String>,
    ) -> Result<Message, DomainError> {
        let body = body.into();
        if body.trim().is_empty() {
            return Err(DomainError::invalid_request("message body must not be empty"));
        }

        let project = self
            .projects
            .find_by_id(project_id)
            .await
            .map_err(map_project_error)?
            .ok_or_else(|| DomainError::not_found(format!("project {project_id} not found")))?;
        let sender = self
            .users
            .find_by_id(sender_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| DomainError::not_found(format!("user {sender_id} not found")))?;
        let recipient = Self::counterparty(&project, sender_id)?;

        let now = self.clock.utc();
        let message = Message::new(
            *project_id,
            *sender_id,
            sender.display_name().as_ref(),
            recipient,
            body,
            now,
        );
        self.messages
            .push(message.clone())
            .await
            .map_err(map_message_error)?;

        if let Some(recipient_id) = recipient {
            let notification = Notification::new(
                recipient_id,
                NotificationKind::Message,
                "New Message",
                format!(
                    "New message from {} on \"{}\".",
                    sender.display_name(),
                    project.title()
                ),
                Some(*project_id),
                now,
            );
            if let Err(error) = self.notifications.push(notification).await {
                warn!(error = %error, "message notification delivery failed");
            }
        }
        Ok(message)
    }

    /// All messages on a project's feed, oldest first.
    pub async fn project_feed(&self, project_id: &ProjectId) -> Result<Vec<Message>, DomainError> {
        self.projects
            .find_by_id(project_id)
            .await
            .map_err(map_project_error)?
            .ok_or_else(|| DomainError::not_found(format!("project {project_id} not found")))?;
        self.messages
            .list_for_project(project_id)
            .await
            .map_err(map_message_error)
    }

    /// Flag one message as seen.
    pub async fn mark_message_read(&self, id: Uuid) -> Result<Message, DomainError> {
        self.messages.mark_read(id).await.map_err(map_message_error)
    }

    /// All notifications for a user, newest first.
    pub async fn notifications_for(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Notification>, DomainError> {
        self.notifications
            .list_for_user(user_id)
            .await
            .map_err(map_notification_error)
    }

    /// Flag one notification as seen.
    pub async fn mark_notification_read(&self, id: Uuid) -> Result<Notification, DomainError> {
        self.notifications
            .mark_read(id)
            .await
            .map_err(map_notification_error)
    }

    /// Unread entry counts across both feeds.
    pub async fn unread_counts(&self, user_id: &UserId) -> Result<UnreadCounts, DomainError> {
        let notifications = self
            .notifications
            .unread_count(user_id)
            .await
            .map_err(map_notification_error)?;
        let messages = self
            .messages
            .unread_count(user_id)
            .await
            .map_err(map_message_error)?;
        Ok(UnreadCounts {
            notifications,
            messages,
        })
    }
}

#[cfg(test)]
#[path = "messaging_tests.rs"]
mod tests;
