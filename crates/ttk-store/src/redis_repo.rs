//! Redis project repository.
//!
//! Each project is a JSON document under `project:{id}`; the per-owner index
//! `projects:owner:{owner}` is a sorted set scored by creation time (ms).

use async_trait::async_trait;
use redis::AsyncCommands;
use tracing::{debug, warn};

use ttk_models::{Project, ProjectId};

use crate::error::{StoreError, StoreResult};
use crate::repository::ProjectRepository;

pub struct RedisProjectRepository {
    client: redis::Client,
}

impl RedisProjectRepository {
    pub fn new(client: redis::Client) -> Self {
        Self { client }
    }

    pub fn from_url(redis_url: &str) -> StoreResult<Self> {
        let client = redis::Client::open(redis_url)?;
        Ok(Self::new(client))
    }

    pub fn project_key(id: &ProjectId) -> String {
        format!("project:{}", id)
    }

    pub fn owner_index_key(owner_id: &str) -> String {
        format!("projects:owner:{}", owner_id)
    }

    async fn connection(&self) -> StoreResult<redis::aio::MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| StoreError::connection_failed(e.to_string()))
    }
}

#[async_trait]
impl ProjectRepository for RedisProjectRepository {
    async fn put(&self, project: &Project) -> StoreResult<()> {
        let mut conn = self.connection().await?;
        let payload = serde_json::to_string(project)?;

        redis::pipe()
            .atomic()
            .set(Self::project_key(&project.id), payload)
            .ignore()
            .zadd(
                Self::owner_index_key(&project.owner_id),
                project.id.as_str(),
                project.created_at.timestamp_millis(),
            )
            .ignore()
            .query_async::<()>(&mut conn)
            .await?;

        debug!(project_id = %project.id, owner = %project.owner_id, "Stored project");
        Ok(())
    }

    async fn find_by_owner(&self, owner_id: &str) -> StoreResult<Vec<Project>> {
        let mut conn = self.connection().await?;
        let ids: Vec<String> = conn
            .zrevrange(Self::owner_index_key(owner_id), 0, -1)
            .await?;

        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let keys: Vec<String> = ids
            .iter()
            .map(|id| Self::project_key(&ProjectId::from(id.as_str())))
            .collect();
        let documents: Vec<Option<String>> = redis::cmd("MGET").arg(&keys).query_async(&mut conn).await?;

        let mut projects = Vec::with_capacity(documents.len());
        for (id, document) in ids.iter().zip(documents) {
            match document {
                Some(json) => {
                    let project: Project = serde_json::from_str(&json)?;
                    if project.is_owned_by(owner_id) {
                        projects.push(project);
                    }
                }
                None => warn!(project_id = %id, "Owner index references a missing project"),
            }
        }

        Ok(projects)
    }

    async fn find_one(&self, id: &ProjectId, owner_id: &str) -> StoreResult<Option<Project>> {
        let mut conn = self.connection().await?;
        let document: Option<String> = conn.get(Self::project_key(id)).await?;

        match document {
            Some(json) => {
                let project: Project = serde_json::from_str(&json)?;
                Ok(project.is_owned_by(owner_id).then_some(project))
            }
            None => Ok(None),
        }
    }
}
