//! In-memory project repository.

use async_trait::async_trait;
use tokio::sync::RwLock;

use ttk_models::{Project, ProjectId};

use crate::error::StoreResult;
use crate::repository::ProjectRepository;

/// Projects kept in insertion order.
#[derive(Default)]
pub struct InMemoryProjectRepository {
    projects: RwLock<Vec<Project>>,
}

impl InMemoryProjectRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.projects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.projects.read().await.is_empty()
    }
}

#[async_trait]
impl ProjectRepository for InMemoryProjectRepository {
    async fn put(&self, project: &Project) -> StoreResult<()> {
        self.projects.write().await.push(project.clone());
        Ok(())
    }

    async fn find_by_owner(&self, owner_id: &str) -> StoreResult<Vec<Project>> {
        let projects = self.projects.read().await;
        let mut owned: Vec<Project> = projects
            .iter()
            .rev()
            .filter(|p| p.is_owned_by(owner_id))
            .cloned()
            .collect();
        // Stable: equal timestamps keep latest-inserted first.
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn find_one(&self, id: &ProjectId, owner_id: &str) -> StoreResult<Option<Project>> {
        let projects = self.projects.read().await;
        Ok(projects
            .iter()
            .find(|p| &p.id == id && p.is_owned_by(owner_id))
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use ttk_models::{ScriptRecord, ScriptSet, TranscriptResult, TranscriptSource};

    fn project(owner: &str, age_secs: i64) -> Project {
        let records = (0..10)
            .map(|i| ScriptRecord {
                hook: format!("Hook {}", i),
                script_body: "Body".into(),
                cta: "Follow".into(),
                visual_cue: "Close up".into(),
            })
            .collect::<Vec<_>>();
        let transcript = TranscriptResult {
            text: "Hello World".into(),
            source: TranscriptSource::Primary,
            video_id: "dQw4w9WgXcQ".into(),
            title: "Test Video".into(),
        };
        let mut project = Project::new(
            owner,
            "https://youtu.be/dQw4w9WgXcQ",
            &transcript,
            ScriptSet::try_from(records).unwrap(),
        );
        project.created_at = Utc::now() - Duration::seconds(age_secs);
        project
    }

    #[tokio::test]
    async fn test_find_by_owner_newest_first() {
        let repo = InMemoryProjectRepository::new();
        let old = project("alice", 120);
        let new = project("alice", 0);
        let other = project("bob", 60);

        repo.put(&old).await.unwrap();
        repo.put(&other).await.unwrap();
        repo.put(&new).await.unwrap();

        let listed = repo.find_by_owner("alice").await.unwrap();
        let ids: Vec<_> = listed.iter().map(|p| p.id.clone()).collect();
        assert_eq!(ids, vec![new.id, old.id]);
    }

    #[tokio::test]
    async fn test_find_one_is_owner_scoped() {
        let repo = InMemoryProjectRepository::new();
        let p = project("alice", 0);
        repo.put(&p).await.unwrap();

        assert_eq!(repo.find_one(&p.id, "alice").await.unwrap(), Some(p.clone()));
        assert_eq!(repo.find_one(&p.id, "bob").await.unwrap(), None);
        assert_eq!(
            repo.find_one(&ProjectId::from("missing"), "alice").await.unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn test_empty_owner_listing() {
        let repo = InMemoryProjectRepository::new();
        assert!(repo.find_by_owner("nobody").await.unwrap().is_empty());
        assert!(repo.is_empty().await);
    }
}
