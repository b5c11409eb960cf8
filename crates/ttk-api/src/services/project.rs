//! Project orchestration: transcript, generation and persistence.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use ttk_ai::ScriptGenerator;
use ttk_models::{Project, ProjectId, ScriptSet, VideoReference, INVALID_URL_MESSAGE};
use ttk_store::ProjectRepository;
use ttk_transcript::TranscriptService;

use crate::auth::AuthUser;
use crate::client::ClientContext;
use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::services::{AccessPolicy, ListingCache};

const PROJECT_NOT_FOUND: &str = "Project not found";

/// Result of an anonymous generation.
#[derive(Debug, Clone, Serialize)]
pub struct TryFreeOutcome {
    pub video_id: String,
    pub scripts: ScriptSet,
}

/// Runs the generation flows.
///
/// Stages run in order and nothing is persisted unless every stage succeeds.
#[derive(Clone)]
pub struct ProjectService {
    policy: AccessPolicy,
    transcripts: TranscriptService,
    generator: ScriptGenerator,
    projects: Arc<dyn ProjectRepository>,
    listings: ListingCache,
}

impl ProjectService {
    pub fn new(
        policy: AccessPolicy,
        transcripts: TranscriptService,
        generator: ScriptGenerator,
        projects: Arc<dyn ProjectRepository>,
        listings: ListingCache,
    ) -> Self {
        Self {
            policy,
            transcripts,
            generator,
            projects,
            listings,
        }
    }

    /// Anonymous single-shot generation. Nothing is stored.
    pub async fn try_for_free(&self, client: &ClientContext, url: &str) -> ApiResult<TryFreeOutcome> {
        let identity = AccessPolicy::authorize_anonymous(client)?;
        let video = parse_video(url)?;
        self.policy.check_rate_limit(&identity).await?;

        let transcript = self.transcripts.fetch_transcript(&video.raw_url).await?;
        let scripts = self.generator.generate_scripts(&transcript.text).await?;

        metrics::record_generation("anonymous", transcript.source.as_str());
        info!(video_id = %transcript.video_id, source = %transcript.source, "Free generation complete");

        Ok(TryFreeOutcome {
            video_id: transcript.video_id,
            scripts,
        })
    }

    /// Generate and persist a new project for the signed-in user.
    pub async fn create_project(&self, user: Option<&AuthUser>, url: &str) -> ApiResult<ProjectId> {
        let identity = AccessPolicy::authorize_user(user)?;
        let owner_id = identity
            .subject_id()
            .ok_or(ApiError::Unauthorized)?
            .to_string();
        let video = parse_video(url)?;
        self.policy.check_rate_limit(&identity).await?;

        let transcript = self.transcripts.fetch_transcript(&video.raw_url).await?;
        let scripts = self.generator.generate_scripts(&transcript.text).await?;

        let project = Project::new(&owner_id, &video.raw_url, &transcript, scripts);
        self.projects.put(&project).await?;
        self.listings.invalidate(&owner_id).await;

        metrics::record_generation("authenticated", transcript.source.as_str());
        metrics::record_project_created();
        info!(
            project_id = %project.id,
            owner = %owner_id,
            source = %transcript.source,
            "Project created"
        );

        Ok(project.id)
    }

    /// The caller's projects, newest first.
    pub async fn list_projects(&self, user: Option<&AuthUser>) -> ApiResult<Vec<Project>> {
        let identity = AccessPolicy::authorize_user(user)?;
        let owner_id = identity.subject_id().ok_or(ApiError::Unauthorized)?;

        if let Some(cached) = self.listings.get(owner_id).await {
            return Ok(cached);
        }

        let epoch = self.listings.epoch().await;
        let projects = self.projects.find_by_owner(owner_id).await?;
        self.listings
            .set_if_current(owner_id, epoch, projects.clone())
            .await;
        Ok(projects)
    }

    /// One of the caller's projects. Missing and foreign ids look the same.
    pub async fn get_project(&self, user: Option<&AuthUser>, id: &ProjectId) -> ApiResult<Project> {
        let identity = AccessPolicy::authorize_user(user)?;
        let owner_id = identity.subject_id().ok_or(ApiError::Unauthorized)?;

        self.projects
            .find_one(id, owner_id)
            .await?
            .ok_or_else(|| ApiError::not_found(PROJECT_NOT_FOUND))
    }
}

fn parse_video(url: &str) -> ApiResult<VideoReference> {
    let video = VideoReference::parse(url.trim());
    if video.video_id.is_none() {
        return Err(ApiError::invalid_input(INVALID_URL_MESSAGE));
    }
    Ok(video)
}
