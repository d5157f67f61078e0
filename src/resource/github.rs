//! Shared GitHub Releases API client

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::resource::error::GitHubError;

/// Default base URL for GitHub API
pub const DEFAULT_API_URL: &str = "https://api.github.com";

const WEB_PREFIX: &str = "https://github.com/";

/// Response from GitHub Releases API
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Release {
    pub tag_name: String,
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ReleaseAsset {
    pub name: String,
    pub browser_download_url: String,
}

/// Which release of a repository to read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseTag {
    Latest,
    Tag(String),
}

/// A release addressed by its web location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseLocation {
    /// `owner/repo`
    pub repository: String,
    pub tag: ReleaseTag,
}

impl ReleaseLocation {
    /// Parses `https://github.com/<owner>/<repo>/releases/latest` and
    /// `https://github.com/<owner>/<repo>/releases/tag/<tag>`
    pub fn parse(location: &str) -> Option<Self> {
        let path = location.strip_prefix(WEB_PREFIX)?.trim_end_matches('/');
        let segments: Vec<&str> = path.split('/').collect();

        match segments.as_slice() {
            [owner, repo, "releases", "latest"] if !owner.is_empty() && !repo.is_empty() => {
                Some(Self {
                    repository: format!("{}/{}", owner, repo),
                    tag: ReleaseTag::Latest,
                })
            }
            [owner, repo, "releases", "tag", tag]
                if !owner.is_empty() && !repo.is_empty() && !tag.is_empty() =>
            {
                Some(Self {
                    repository: format!("{}/{}", owner, repo),
                    tag: ReleaseTag::Tag(tag.to_string()),
                })
            }
            _ => None,
        }
    }
}

/// Thin wrapper over one `reqwest::Client`, built once and shared by every
/// store and fetcher of a run
pub struct GitHubClient {
    client: reqwest::Client,
    base_url: String,
}

impl GitHubClient {
    /// Creates a new GitHubClient with a custom base URL
    pub fn new(base_url: &str) -> Result<Self, GitHubError> {
        let client = reqwest::Client::builder()
            .user_agent("repatch-check")
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetches the release addressed by `repository` and `tag`
    pub async fn release(
        &self,
        repository: &str,
        tag: &ReleaseTag,
    ) -> Result<Release, GitHubError> {
        let url = match tag {
            ReleaseTag::Latest => format!("{}/repos/{}/releases/latest", self.base_url, repository),
            ReleaseTag::Tag(tag) => {
                format!("{}/repos/{}/releases/tags/{}", self.base_url, repository, tag)
            }
        };

        debug!("Fetching release {}", url);
        self.get_json(&url, "application/vnd.github+json").await
    }

    /// Downloads a JSON document, typically a release asset
    pub async fn download_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, GitHubError> {
        debug!("Downloading {}", url);
        self.get_json(url, "application/octet-stream").await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, accept: &str) -> Result<T, GitHubError> {
        let response = self.client.get(url).header("Accept", accept).send().await?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(GitHubError::NotFound(url.to_string()));
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());
            return Err(GitHubError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        if !status.is_success() {
            warn!("GitHub returned status {}: {}", status, url);
            return Err(GitHubError::InvalidResponse(format!(
                "Unexpected status: {}",
                status
            )));
        }

        response.json().await.map_err(|e| {
            warn!("Failed to parse response from {}: {}", url, e);
            GitHubError::InvalidResponse(e.to_string())
        })
    }
}
