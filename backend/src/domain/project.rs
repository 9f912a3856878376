//! Project aggregate and its status state machine.
//!
//! Status is a tagged union: the assignment record only exists in states
//! that actually have a translator, so "assigned without translator" and
//! "pending with translator" are unrepresentable.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::money::Money;
use super::translator::Language;
use super::user::UserId;

/// Stable project identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
#[schema(value_type = String, example = "7c9e6679-7425-40de-944b-e07fc1f90ae7")]
pub struct ProjectId(Uuid);

impl ProjectId {
    /// Generate a new random identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for ProjectId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

/// Translator assignment recorded on a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    /// Assigned translator account.
    pub translator_id: UserId,
    /// Translator display name captured at assignment time.
    pub translator_name: String,
    /// Match score the engine computed for this pairing.
    pub match_score: f64,
    /// Whether the workflow picked the translator automatically.
    pub auto_assigned: bool,
    /// When the assignment happened.
    pub assigned_at: DateTime<Utc>,
}

/// Project status state machine.
///
/// `Pending -> Assigned -> InProgress -> Review -> Completed`, with
/// `Cancelled` reachable from any non-terminal state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum ProjectStatus {
    /// Awaiting translator assignment.
    Pending,
    /// Assigned, work not yet started.
    Assigned {
        /// Assignment record.
        assignment: Assignment,
    },
    /// Translation underway.
    InProgress {
        /// Assignment record.
        assignment: Assignment,
    },
    /// Delivered and awaiting client review.
    Review {
        /// Assignment record.
        assignment: Assignment,
    },
    /// Accepted and finished.
    Completed {
        /// Assignment record.
        assignment: Assignment,
    },
    /// Abandoned before completion.
    Cancelled,
}

impl ProjectStatus {
    /// Wire label for this state.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Assigned { .. } => "assigned",
            Self::InProgress { .. } => "in-progress",
            Self::Review { .. } => "review",
            Self::Completed { .. } => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Assignment record, present in every state that has a translator.
    #[must_use]
    pub const fn assignment(&self) -> Option<&Assignment> {
        match self {
            Self::Assigned { assignment }
            | Self::InProgress { assignment }
            | Self::Review { assignment }
            | Self::Completed { assignment } => Some(assignment),
            Self::Pending | Self::Cancelled => None,
        }
    }

    /// True for states no further transition may leave.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed { .. } | Self::Cancelled)
    }
}

/// Errors raised by invalid state transitions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProjectStateError {
    /// The requested transition is not part of the state machine.
    #[error("cannot move project from {from} to {to}")]
    InvalidTransition {
        /// Current state label.
        from: &'static str,
        /// Requested state label.
        to: &'static str,
    },
    /// Assignment requested but the project already has a translator.
    #[error("project already has an assigned translator")]
    AlreadyAssigned,
    /// Completion requested twice.
    #[error("project is already completed")]
    AlreadyCompleted,
}

/// Validation errors raised when creating a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectValidationError {
    /// Title is blank once trimmed.
    EmptyTitle,
    /// Word count is zero.
    ZeroWordCount,
    /// Price is not positive.
    NonPositivePrice,
    /// Source and target language are identical.
    IdenticalLanguages,
}

impl fmt::Display for ProjectValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "project title must not be empty"),
            Self::ZeroWordCount => write!(f, "word count must be positive"),
            Self::NonPositivePrice => write!(f, "project price must be positive"),
            Self::IdenticalLanguages => {
                write!(f, "source and target language must differ")
            }
        }
    }
}

impl std::error::Error for ProjectValidationError {}

/// Unvalidated input for creating a project.
#[derive(Debug, Clone)]
pub struct ProjectDraft {
    /// Short title shown in listings.
    pub title: String,
    /// Language the material is written in.
    pub source_language: Language,
    /// Language to translate into.
    pub target_language: Language,
    /// Size of the material in words.
    pub word_count: u32,
    /// Agreed delivery deadline.
    pub deadline: DateTime<Utc>,
    /// Agreed price in settlement currency.
    pub price: Money,
    /// Owning client account.
    pub client_id: UserId,
}

/// One translation job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    id: ProjectId,
    title: String,
    source_language: Language,
    target_language: Language,
    word_count: u32,
    deadline: DateTime<Utc>,
    price: Money,
    client_id: UserId,
    #[serde(flatten)]
    status: ProjectStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Project {
    /// Validate a draft into a pending project.
    pub fn new(draft: ProjectDraft, now: DateTime<Utc>) -> Result<Self, ProjectValidationError> {
        if draft.title.trim().is_empty() {
            return Err(ProjectValidationError::EmptyTitle);
        }
        if draft.word_count == 0 {
            return Err(ProjectValidationError::ZeroWordCount);
        }
        if !draft.price.is_positive() {
            return Err(ProjectValidationError::NonPositivePrice);
        }
        if draft.source_language == draft.target_language {
            return Err(ProjectValidationError::IdenticalLanguages);
        }
        Ok(Self {
            id: ProjectId::random(),
            title: draft.title,
            source_language: draft.source_language,
            target_language: draft.target_language,
            word_count: draft.word_count,
            deadline: draft.deadline,
            price: draft.price,
            client_id: draft.client_id,
            status: ProjectStatus::Pending,
            created_at: now,
            updated_at: now,
        })
    }

    /// Stable identifier.
    #[must_use]
    pub const fn id(&self) -> &ProjectId {
        &self.id
    }

    /// Short title shown in listings.
    #[must_use]
    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    /// Language the material is written in.
    #[must_use]
    pub const fn source_language(&self) -> &Language {
        &self.source_language
    }

    /// Language to translate into.
    #[must_use]
    pub const fn target_language(&self) -> &Language {
        &self.target_language
    }

    /// Size of the material in words.
    #[must_use]
    pub const fn word_count(&self) -> u32 {
        self.word_count
    }

    /// Agreed delivery deadline.
    #[must_use]
    pub const fn deadline(&self) -> DateTime<Utc> {
        self.deadline
    }

    /// Agreed price in settlement currency.
    #[must_use]
    pub const fn price(&self) -> Money {
        self.price
    }

    /// Owning client account.
    #[must_use]
    pub const fn client_id(&self) -> &UserId {
        &self.client_id
    }

    /// Current state.
    #[must_use]
    pub const fn status(&self) -> &ProjectStatus {
        &self.status
    }

    /// Assignment record, when a translator is attached.
    #[must_use]
    pub const fn assignment(&self) -> Option<&Assignment> {
        self.status.assignment()
    }

    /// Creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Last mutation timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Attach a translator: `Pending -> Assigned`.
    pub fn assign(
        &mut self,
        assignment: Assignment,
        now: DateTime<Utc>,
    ) -> Result<(), ProjectStateError> {
        match &self.status {
            ProjectStatus::Pending => {
                self.status = ProjectStatus::Assigned { assignment };
                self.updated_at = now;
                Ok(())
            }
            status if status.assignment().is_some() => Err(ProjectStateError::AlreadyAssigned),
            status => Err(ProjectStateError::InvalidTransition {
                from: status.label(),
                to: "assigned",
            }),
        }
    }

    /// Begin work: `Assigned -> InProgress`.
    pub fn start(&mut self, now: DateTime<Utc>) -> Result<(), ProjectStateError> {
        match self.status.clone() {
            ProjectStatus::Assigned { assignment } => {
                self.status = ProjectStatus::InProgress { assignment };
                self.updated_at = now;
                Ok(())
            }
            status => Err(ProjectStateError::InvalidTransition {
                from: status.label(),
                to: "in-progress",
            }),
        }
    }

    /// Deliver for review: `InProgress -> Review`.
    pub fn submit_for_review(&mut self, now: DateTime<Utc>) -> Result<(), ProjectStateError> {
        match self.status.clone() {
            ProjectStatus::InProgress { assignment } => {
                self.status = ProjectStatus::Review { assignment };
                self.updated_at = now;
                Ok(())
            }
            status => Err(ProjectStateError::InvalidTransition {
                from: status.label(),
                to: "review",
            }),
        }
    }

    /// Finish the project from any assigned state.
    ///
    /// A repeated completion is rejected so completion side effects fire at
    /// most once.
    pub fn complete(&mut self, now: DateTime<Utc>) -> Result<Assignment, ProjectStateError> {
        match self.status.clone() {
            ProjectStatus::Assigned { assignment }
            | ProjectStatus::InProgress { assignment }
            | ProjectStatus::Review { assignment } => {
                self.status = ProjectStatus::Completed {
                    assignment: assignment.clone(),
                };
                self.updated_at = now;
                Ok(assignment)
            }
            ProjectStatus::Completed { .. } => Err(ProjectStateError::AlreadyCompleted),
            status => Err(ProjectStateError::InvalidTransition {
                from: status.label(),
                to: "completed",
            }),
        }
    }

    /// Abandon the project from any non-terminal state.
    pub fn cancel(&mut self, now: DateTime<Utc>) -> Result<(), ProjectStateError> {
        if self.status.is_terminal() {
            return Err(ProjectStateError::InvalidTransition {
                from: self.status.label(),
                to: "cancelled",
            });
        }
        self.status = ProjectStatus::Cancelled;
        self.updated_at = now;
        Ok(())
    }
}
