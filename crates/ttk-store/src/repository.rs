//! Project repository trait.

use async_trait::async_trait;

use ttk_models::{Project, ProjectId};

use crate::error::StoreResult;

/// Owner-scoped project storage.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Insert a new project.
    async fn put(&self, project: &Project) -> StoreResult<()>;

    /// All projects of `owner_id`, newest first.
    async fn find_by_owner(&self, owner_id: &str) -> StoreResult<Vec<Project>>;

    /// The project with `id` if it belongs to `owner_id`.
    ///
    /// Missing and foreign ids are both `None`.
    async fn find_one(&self, id: &ProjectId, owner_id: &str) -> StoreResult<Option<Project>>;
}
