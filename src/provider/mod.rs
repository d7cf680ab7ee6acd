//! Release listing abstraction over code-hosting platforms.
//!
//! The detector only needs one capability from the remote platform: list the
//! published releases of a repository. [`ReleaseSource`] isolates that call
//! so selection logic can be exercised against a test double instead of a
//! network client.

mod github;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use github::GitHubSource;

/// Repository identifier (owner/repo format).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoId {
    pub owner: String,
    pub repo: String,
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

impl FromStr for RepoId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('/').collect();
        if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
            Err(anyhow!("Invalid repository format. Expected 'owner/repo'."))
        } else {
            Ok(RepoId {
                owner: parts[0].to_string(),
                repo: parts[1].to_string(),
            })
        }
    }
}

/// A downloadable artifact attached to a release.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ReleaseAsset {
    pub id: u64,
    pub name: String,
    pub size: u64,
    pub download_url: String,
}

/// A published release snapshot.
///
/// Assets keep the provider's listing order, which is not guaranteed to be
/// chronological.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Release {
    /// Version tag (e.g. "v1.0.0")
    pub tag: String,
    /// Release name/title
    pub name: Option<String>,
    /// Release notes body
    pub body: Option<String>,
    /// Web page of the release
    pub html_url: String,
    /// Publication date (ISO 8601)
    pub published_at: Option<String>,
    pub draft: bool,
    pub prerelease: bool,
    pub assets: Vec<ReleaseAsset>,
}

/// Listing failures that carry an HTTP status worth acting on.
///
/// Surfaced through `anyhow` and recovered with `downcast_ref`; the detector
/// treats [`SourceError::NotFound`] as "zero releases" rather than an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// Repository or its releases do not exist (HTTP 404).
    NotFound,
    /// Invalid or missing authentication token (HTTP 401).
    AuthenticationFailed,
    /// Rate limit exceeded (HTTP 429).
    RateLimitExceeded,
    /// Access forbidden (HTTP 403).
    Forbidden,
    /// Any other non-success status.
    Api(u16),
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::NotFound => write!(f, "Repository or release not found"),
            SourceError::AuthenticationFailed => {
                write!(f, "Authentication failed. Check your GITHUB_TOKEN.")
            }
            SourceError::RateLimitExceeded => write!(
                f,
                "Rate limit exceeded. Try again later or set the GITHUB_TOKEN environment variable."
            ),
            SourceError::Forbidden => {
                write!(f, "Access forbidden. You may need authentication.")
            }
            SourceError::Api(status) => write!(f, "HTTP {} error from the release API", status),
        }
    }
}

impl std::error::Error for SourceError {}

impl SourceError {
    /// Maps a response status to a typed error; `None` for success statuses.
    pub fn from_status(status: StatusCode) -> Option<Self> {
        match status {
            StatusCode::NOT_FOUND => Some(SourceError::NotFound),
            StatusCode::UNAUTHORIZED => Some(SourceError::AuthenticationFailed),
            StatusCode::TOO_MANY_REQUESTS => Some(SourceError::RateLimitExceeded),
            StatusCode::FORBIDDEN => Some(SourceError::Forbidden),
            s if !s.is_success() => Some(SourceError::Api(s.as_u16())),
            _ => None,
        }
    }
}

/// Lists published releases for a repository.
///
/// One network call per query; dropping the returned future cancels an
/// in-flight listing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReleaseSource: Send + Sync {
    async fn list_releases(&self, repo: &RepoId) -> Result<Vec<Release>>;
}
