//! GitHub release source.

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use reqwest::header::USER_AGENT;

use super::{Release, ReleaseAsset, ReleaseSource, RepoId, SourceError};

/// GitHub API response types (internal).
mod api {
    use serde::Deserialize;

    #[derive(Deserialize, Debug)]
    pub struct Release {
        pub tag_name: String,
        pub name: Option<String>,
        pub body: Option<String>,
        pub html_url: String,
        pub published_at: Option<String>,
        #[serde(default)]
        pub draft: bool,
        #[serde(default)]
        pub prerelease: bool,
        #[serde(default)]
        pub assets: Vec<Asset>,
    }

    #[derive(Deserialize, Debug)]
    pub struct Asset {
        pub id: u64,
        pub name: String,
        pub size: u64,
        pub browser_download_url: String,
    }
}

impl From<api::Release> for Release {
    fn from(release: api::Release) -> Self {
        Release {
            tag: release.tag_name,
            name: release.name,
            body: release.body,
            html_url: release.html_url,
            published_at: release.published_at,
            draft: release.draft,
            prerelease: release.prerelease,
            assets: release.assets.into_iter().map(ReleaseAsset::from).collect(),
        }
    }
}

impl From<api::Asset> for ReleaseAsset {
    fn from(asset: api::Asset) -> Self {
        ReleaseAsset {
            id: asset.id,
            name: asset.name,
            size: asset.size,
            download_url: asset.browser_download_url,
        }
    }
}

/// Lists releases through the GitHub REST v3 API.
pub struct GitHubSource {
    client: Client,
    api_url: String,
    token: Option<String>,
}

impl GitHubSource {
    #[tracing::instrument(skip(client, api_url))]
    pub fn new(client: Client, api_url: Option<String>) -> Self {
        let api_url = api_url.unwrap_or_else(|| "https://api.github.com".to_string());
        Self {
            client,
            api_url,
            token: None,
        }
    }

    /// Sends the token as a bearer Authorization header when present.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    #[tracing::instrument(skip(self, repo))]
    async fn fetch_releases(&self, repo: &RepoId) -> Result<Vec<Release>> {
        let mut releases = Vec::new();
        let mut page = 1;

        // Limit to 10 pages (1000 releases) to prevent an unbounded walk
        while page <= 10 {
            let url = format!("{}/repos/{}/{}/releases", self.api_url, repo.owner, repo.repo);

            debug!("Fetching releases page {} from {}...", page, url);

            let mut request = self
                .client
                .get(&url)
                .query(&[("per_page", "100"), ("page", &page.to_string())])
                .header(USER_AGENT, concat!("ghup/", env!("CARGO_PKG_VERSION")));
            if let Some(token) = &self.token {
                request = request.bearer_auth(token);
            }

            let response = request
                .send()
                .await
                .context("Failed to send request to GitHub API")?;

            if let Some(err) = SourceError::from_status(response.status()) {
                return Err(err.into());
            }

            let parsed: Vec<api::Release> = response
                .json()
                .await
                .context("Failed to parse JSON response from GitHub API")?;

            if parsed.is_empty() {
                break;
            }

            let len = parsed.len();
            releases.extend(parsed.into_iter().map(Release::from));

            if len < 100 {
                break;
            }

            page += 1;
        }

        Ok(releases)
    }
}

#[async_trait]
impl ReleaseSource for GitHubSource {
    #[tracing::instrument(skip(self, repo))]
    async fn list_releases(&self, repo: &RepoId) -> Result<Vec<Release>> {
        self.fetch_releases(repo).await
    }
}
