//! Port for project persistence.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::project::{Project, ProjectId};
use crate::domain::user::UserId;

/// Persistence errors raised by [`ProjectRepository`] adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProjectRepositoryError {
    /// Repository connection could not be established.
    #[error("project repository connection failed: {message}")]
    Connection {
        /// Adapter detail.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("project repository query failed: {message}")]
    Query {
        /// Adapter detail.
        message: String,
    },
    /// The referenced project does not exist.
    #[error("project {id} not found")]
    NotFound {
        /// Project identifier.
        id: ProjectId,
    },
}

impl ProjectRepositoryError {
    /// Helper for connection oriented failures.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for query failures.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Helper for missing projects.
    #[must_use]
    pub const fn not_found(id: ProjectId) -> Self {
        Self::NotFound { id }
    }
}

/// Port for storing and retrieving projects.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Persist a new project.
    async fn insert(&self, project: &Project) -> Result<(), ProjectRepositoryError>;

    /// Replace an existing project.
    async fn update(&self, project: &Project) -> Result<(), ProjectRepositoryError>;

    /// Fetch a project by id.
    async fn find_by_id(&self, id: &ProjectId)
    -> Result<Option<Project>, ProjectRepositoryError>;

    /// All projects owned by a client, newest first.
    async fn list_for_client(&self, client_id: &UserId)
    -> Result<Vec<Project>, ProjectRepositoryError>;
}

/// Fixture implementation for tests that do not exercise project storage.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureProjectRepository;

#[async_trait]
impl ProjectRepository for FixtureProjectRepository {
    async fn insert(&self, _project: &Project) -> Result<(), ProjectRepositoryError> {
        Ok(())
    }

    async fn update(&self, _project: &Project) -> Result<(), ProjectRepositoryError> {
        Ok(())
    }

    async fn find_by_id(
        &self,
        _id: &ProjectId,
    ) -> Result<Option<Project>, ProjectRepositoryError> {
        Ok(None)
    }

    async fn list_for_client(
        &self,
        _client_id: &UserId,
    ) -> Result<Vec<Project>, ProjectRepositoryError> {
        Ok(Vec::new())
    }
}
