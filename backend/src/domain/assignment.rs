//! Project assignment workflow.
//!
//! Owns the `Pending -> Assigned` transition and the paired capacity
//! reservation. Candidates are ranked by the matching engine and tried
//! best-first; the first successful atomic slot reservation wins, so a
//! candidate claimed by a concurrent assignment simply falls through to the
//! next one. Completion side effects fire exactly once because the project
//! state machine rejects a repeated completion before any counter moves.

use std::sync::Arc;

use mockable::Clock;
use tracing::warn;

use crate::domain::error::DomainError;
use crate::domain::matching::rank_candidates;
use crate::domain::message::Message;
use crate::domain::notification::{Notification, NotificationKind};
use crate::domain::ports::{
    DirectoryError, MessageRepository, NotificationRepository, ProjectRepository,
    ProjectRepositoryError, TranslatorDirectory, UserAccountRepository, UserRepositoryError,
};
use crate::domain::project::{
    Assignment, Project, ProjectDraft, ProjectId, ProjectStateError, ProjectStatus,
};
use crate::domain::user::{UserId, UserRole};

/// Outcome of an auto-assignment attempt.
#[derive(Debug, Clone)]
pub enum AssignmentOutcome {
    /// The best eligible translator was attached.
    Assigned(Project),
    /// Nobody is eligible right now; the project stays pending.
    AwaitingTranslator(Project),
}

impl AssignmentOutcome {
    /// The project in its post-attempt state.
    #[must_use]
    pub const fn project(&self) -> &Project {
        match self {
            Self::Assigned(project) | Self::AwaitingTranslator(project) => project,
        }
    }
}

/// Project assignment workflow service.
#[derive(Clone)]
pub struct AssignmentService {
    projects: Arc<dyn ProjectRepository>,
    directory: Arc<dyn TranslatorDirectory>,
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

fn map_directory_error(error: DirectoryError) -> DomainError {
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

fn map_state_error(error: &ProjectStateError) -> DomainError {
    DomainError::conflict(error.to_string())
}

impl AssignmentService {
    /// Create a new workflow over the given collaborators.
    pub fn new(
        projects: Arc<dyn ProjectRepository>,
        directory: Arc<dyn TranslatorDirectory>,
        users: Arc<dyn UserAccountRepository>,
        notifications: Arc<dyn NotificationRepository>,
        messages: Arc<dyn MessageRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            projects,
            directory,
            users,
            notifications,
            messages,
            clock,
        }
    }

    async fn notify(&self, notification: Notification) {
        // Feed delivery is best effort; a failed push must not undo an
        // assignment that already landed.
        if let Err(error) = self.notifications.push(notification).await {
            warn!(error = %error, "notification delivery failed");
        }
    }

    async fn load_project(&self, project_id: &ProjectId) -> Result<Project, DomainError> {
        self.projects
            .find_by_id(project_id)
            .await
            .map_err(map_project_error)?
            .ok_or_else(|| DomainError::not_found(format!("project {project_id} not found")))
    }

    /// Store a new project and immediately attempt auto-assignment.
    ///
    /// The owning account must exist and hold the client role.
    pub async fn create_project(
        &self,
        draft: ProjectDraft,
    ) -> Result<AssignmentOutcome, DomainError> {
        let owner = self
            .users
            .find_by_id(&draft.client_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| DomainError::not_found(format!("user {} not found", draft.client_id)))?;
        if owner.role() != UserRole::Client {
            return Err(DomainError::forbidden("only clients can create projects"));
        }

        let project = Project::new(draft, self.clock.utc())
            .map_err(|error| DomainError::invalid_request(error.to_string()))?;
        self.projects
            .insert(&project)
            .await
            .map_err(map_project_error)?;

        self.auto_assign(project.id()).await
    }

    /// Attach the best eligible translator to a pending project.
    ///
    /// Candidates are tried in score order; a slot lost to a concurrent
    /// assignment falls through to the next candidate. With no eligible
    /// translator the project stays pending and the client is told the
    /// project awaits assignment.
    pub async fn auto_assign(
        &self,
        project_id: &ProjectId,
    ) -> Result<AssignmentOutcome, DomainError> {
        let mut project = self.load_project(project_id).await?;
        match project.status() {
            ProjectStatus::Pending => {}
            status if status.assignment().is_some() => {
                return Err(DomainError::conflict(
                    "project already has an assigned translator",
                ));
            }
            status => {
                return Err(DomainError::conflict(format!(
                    "cannot assign a {} project",
                    status.label()
                )));
            }
        }

        let profiles = self
            .directory
            .list()
            .await
            .map_err(map_directory_error)?;
        let candidates = rank_candidates(&project, &profiles);

        for candidate in candidates {
            let translator_id = *candidate.profile.user_id();
            match self.directory.reserve_slot(&translator_id).await {
                Ok(_) => {}
                Err(DirectoryError::NoCapacity { .. }) => continue,
                Err(error) => return Err(map_directory_error(error)),
            }

            let Some(translator) = self
                .users
                .find_by_id(&translator_id)
                .await
                .map_err(map_user_error)?
            else {
                // A profile without an account cannot be messaged; give the
                // slot back and move on.
                warn!(translator = %translator_id, "profile has no account, skipping");
                self.release_reserved_slot(&translator_id).await;
                continue;
            };

            let now = self.clock.utc();
            let assignment = Assignment {
                translator_id,
                translator_name: translator.display_name().to_string(),
                match_score: candidate.score.value(),
                auto_assigned: true,
                assigned_at: now,
            };
            if let Err(error) = project.assign(assignment, now) {
                self.release_reserved_slot(&translator_id).await;
                return Err(map_state_error(&error));
            }
            if let Err(error) = self.projects.update(&project).await {
                self.release_reserved_slot(&translator_id).await;
                return Err(map_project_error(error));
            }

            self.notify(Notification::new(
                *project.client_id(),
                NotificationKind::ProjectAssigned,
                "Translator Assigned!",
                format!(
                    "{} has been assigned to your project \"{}\".",
                    translator.display_name(),
                    project.title()
                ),
                Some(*project.id()),
                now,
            ))
            .await;
            self.notify(Notification::new(
                translator_id,
                NotificationKind::ProjectAssigned,
                "New Project Assigned",
                format!("You have been assigned to \"{}\".", project.title()),
                Some(*project.id()),
                now,
            ))
            .await;
            let welcome = Message::system(
                *project.id(),
                format!(
                    "Welcome! {} will be translating \"{}\" from {} to {}.",
                    translator.display_name(),
                    project.title(),
                    project.source_language(),
                    project.target_language()
                ),
                now,
            );
            if let Err(error) = self.messages.push(welcome).await {
                warn!(error = %error, "welcome message delivery failed");
            }

            return Ok(AssignmentOutcome::Assigned(project));
        }

        self.notify(Notification::new(
            *project.client_id(),
            NotificationKind::StatusChange,
            "Project Pending",
            format!(
                "Your project \"{}\" is awaiting translator assignment.",
                project.title()
            ),
            Some(*project.id()),
            self.clock.utc(),
        ))
        .await;
        Ok(AssignmentOutcome::AwaitingTranslator(project))
    }

    async fn release_reserved_slot(&self, translator_id: &UserId) {
        if let Err(error) = self.directory.release_slot(translator_id).await {
            warn!(error = %error, translator = %translator_id, "slot release failed");
        }
    }

    /// Begin work on an assigned project.
    pub async fn start_project(&self, project_id: &ProjectId) -> Result<Project, DomainError> {
        let mut project = self.load_project(project_id).await?;
        project
            .start(self.clock.utc())
            .map_err(|error| map_state_error(&error))?;
        self.projects
            .update(&project)
            .await
            .map_err(map_project_error)?;
        Ok(project)
    }

    /// Deliver an in-progress project for client review.
    pub async fn submit_for_review(&self, project_id: &ProjectId) -> Result<Project, DomainError> {
        let mut project = self.load_project(project_id).await?;
        project
            .submit_for_review(self.clock.utc())
            .map_err(|error| map_state_error(&error))?;
        self.projects
            .update(&project)
            .await
            .map_err(map_project_error)?;
        Ok(project)
    }

    /// Finish a project and record the translator's completion.
    ///
    /// The state machine rejects a second completion before any side effect
    /// fires, so the active and completed counters move exactly once.
    pub async fn complete_project(&self, project_id: &ProjectId) -> Result<Project, DomainError> {
        let mut project = self.load_project(project_id).await?;
        let now = self.clock.utc();
        let assignment = project
            .complete(now)
            .map_err(|error| map_state_error(&error))?;
        self.projects
            .update(&project)
            .await
            .map_err(map_project_error)?;

        match self
            .directory
            .record_completion(&assignment.translator_id)
            .await
        {
            Ok(_) => {}
            Err(DirectoryError::NotFound { user_id }) => {
                warn!(translator = %user_id, "completion recorded without a profile");
            }
            Err(error) => return Err(map_directory_error(error)),
        }

        self.notify(Notification::new(
            *project.client_id(),
            NotificationKind::ProjectCompleted,
            "Project Completed",
            format!("Your project \"{}\" has been completed.", project.title()),
            Some(*project.id()),
            now,
        ))
        .await;
        Ok(project)
    }

    /// Abandon a project from any non-terminal state.
    pub async fn cancel_project(&self, project_id: &ProjectId) -> Result<Project, DomainError> {
        let mut project = self.load_project(project_id).await?;
        project
            .cancel(self.clock.utc())
            .map_err(|error| map_state_error(&error))?;
        self.projects
            .update(&project)
            .await
            .map_err(map_project_error)?;
        Ok(project)
    }

    /// Fetch one project.
    pub async fn project(&self, project_id: &ProjectId) -> Result<Project, DomainError> {
        self.load_project(project_id).await
    }

    /// All projects owned by a client, newest first.
    pub async fn client_projects(&self, client_id: &UserId) -> Result<Vec<Project>, DomainError> {
        self.projects
            .list_for_client(client_id)
            .await
            .map_err(map_project_error)
    }
}

#[cfg(test)]
#[path = "assignment_tests.rs"]
mod tests;
