//! Prompt hub API: repositories and their commits

use super::common::{path_segment, ApiQueryParams};
use super::{ApiError, Client};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const REPOS_PATH: &str = "/api/v1/repos";
const COMMITS_PATH: &str = "/commits";

/// Repo handles are addressed under the caller's own namespace
const OWN_NAMESPACE: &str = "-";

#[derive(Debug, Clone, Deserialize)]
pub struct Prompt {
    pub id: String,
    pub repo_handle: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub readme: Option<String>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RepoEnvelope {
    repo: Prompt,
}

#[derive(Debug, Serialize)]
pub struct CreatePromptRequest {
    pub repo_handle: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub readme: Option<String>,
    pub is_public: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct UpdatePromptRequest {
    pub description: Option<String>,
    pub readme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_archived: Option<bool>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PromptCommit {
    #[serde(default)]
    pub id: Option<String>,
    pub commit_hash: String,
    #[serde(default)]
    pub manifest: Option<Value>,
    #[serde(default)]
    pub parent_commit_hash: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CommitEnvelope {
    commit: PromptCommit,
}

#[derive(Debug, Serialize)]
pub struct CreateCommitRequest {
    pub manifest: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_commit: Option<String>,
}

pub struct PromptsApi<'a> {
    client: &'a Client,
}

impl<'a> PromptsApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    fn repo_path(repo_handle: &str) -> String {
        format!("{}/{}/{}", REPOS_PATH, OWN_NAMESPACE, path_segment(repo_handle))
    }

    fn commits_path(repo_handle: &str) -> String {
        format!("{}/{}/{}", COMMITS_PATH, OWN_NAMESPACE, path_segment(repo_handle))
    }

    /// POST /api/v1/repos
    pub async fn create(&self, request: &CreatePromptRequest) -> Result<Prompt, ApiError> {
        let envelope: RepoEnvelope = self.client.post(REPOS_PATH, request).await?;
        Ok(envelope.repo)
    }

    /// GET /api/v1/repos/-/{repo_handle}
    pub async fn get(&self, repo_handle: &str) -> Result<Prompt, ApiError> {
        let envelope: RepoEnvelope = self
            .client
            .get(&Self::repo_path(repo_handle), &ApiQueryParams::new())
            .await?;
        Ok(envelope.repo)
    }

    /// PATCH /api/v1/repos/-/{repo_handle}
    pub async fn update(&self, repo_handle: &str, request: &UpdatePromptRequest) -> Result<Prompt, ApiError> {
        let envelope: RepoEnvelope = self
            .client
            .patch(&Self::repo_path(repo_handle), request)
            .await?;
        Ok(envelope.repo)
    }

    /// DELETE /api/v1/repos/-/{repo_handle}
    pub async fn delete(&self, repo_handle: &str) -> Result<(), ApiError> {
        self.client.delete(&Self::repo_path(repo_handle)).await
    }

    /// POST /commits/-/{repo_handle}
    pub async fn create_commit(
        &self,
        repo_handle: &str,
        request: &CreateCommitRequest,
    ) -> Result<PromptCommit, ApiError> {
        let envelope: CommitEnvelope = self
            .client
            .post(&Self::commits_path(repo_handle), request)
            .await?;
        Ok(envelope.commit)
    }

    /// GET /commits/-/{repo_handle}/{commit}
    ///
    /// `commit` is a hash, a tag, or `latest`.
    pub async fn get_commit(&self, repo_handle: &str, commit: &str) -> Result<PromptCommit, ApiError> {
        let path = format!("{}/{}", Self::commits_path(repo_handle), path_segment(commit));
        self.client.get(&path, &ApiQueryParams::new()).await
    }
}

impl Client {
    /// Prompt hub operations
    pub fn prompts(&self) -> PromptsApi<'_> {
        PromptsApi::new(self)
    }
}
