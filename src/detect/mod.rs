//! Release and asset selection.
//!
//! Given the published releases of a repository, [`Detector`] decides which
//! release and which artifact within it is the right upgrade for a platform:
//! eligibility filtering, semantic-version extraction from tags,
//! platform-suffix matching of asset names, optional regex allow-listing,
//! companion-validation pairing, and highest-version selection.

mod version;

use std::sync::Arc;

use anyhow::{Context, Result};
use log::debug;
use regex::Regex;
use semver::Version;

use crate::platform::Platform;
use crate::provider::{Release, ReleaseAsset, ReleaseSource, RepoId, SourceError};
use crate::report::{DetectEvent, LogReporter, Reporter, SkipReason};
use crate::validate::Validator;

pub use version::{TagParse, parse_tag};

/// A release/asset pair selected as an upgrade candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateCandidate {
    /// Version parsed from the release tag (never from the asset name).
    pub version: Version,
    pub asset_url: String,
    pub asset_size: u64,
    pub asset_id: u64,
    /// Companion validation asset, present only when a validator is
    /// configured.
    pub validation_asset_id: Option<u64>,
    /// Web page of the release.
    pub release_url: String,
    pub release_notes: Option<String>,
    pub release_name: Option<String>,
    pub published_at: Option<String>,
    pub repo_owner: String,
    pub repo_name: String,
}

/// Selects the release and asset a self-update should install.
///
/// Read-only after construction; one instance can serve concurrent queries.
/// Every query re-derives its result from a fresh listing, nothing is cached.
pub struct Detector {
    source: Arc<dyn ReleaseSource>,
    platform: Platform,
    filters: Vec<Regex>,
    validator: Option<Arc<dyn Validator>>,
    reporter: Arc<dyn Reporter>,
}

impl Detector {
    /// Detector for the running platform, with no asset filters and no
    /// validator, reporting through the `log` facade.
    pub fn new(source: Arc<dyn ReleaseSource>) -> Self {
        Self {
            source,
            platform: Platform::detect(),
            filters: Vec::new(),
            validator: None,
            reporter: Arc::new(LogReporter),
        }
    }

    /// Overrides the detected platform.
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Restricts matching to assets whose names match at least one pattern.
    ///
    /// An empty iterator leaves matching unrestricted.
    pub fn with_filters<I, S>(mut self, patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut filters = Vec::new();
        for pattern in patterns {
            let pattern = pattern.as_ref();
            filters.push(
                Regex::new(pattern)
                    .with_context(|| format!("Invalid asset filter pattern: {}", pattern))?,
            );
        }
        self.filters = filters;
        Ok(self)
    }

    /// Requires every candidate to carry a companion validation asset named
    /// `<asset><suffix>`; releases without one are dropped.
    pub fn with_validator(mut self, validator: Arc<dyn Validator>) -> Self {
        self.validator = Some(validator);
        self
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Highest-version candidate among all eligible releases of `slug`.
    ///
    /// Drafts and prereleases are ignored. Returns `Ok(None)` when nothing
    /// qualifies, including when the repository has no releases at all.
    pub async fn detect_latest(&self, slug: &str) -> Result<Option<UpdateCandidate>> {
        self.select_best(slug, None).await
    }

    /// Candidate for an exact release tag.
    ///
    /// The tag must match byte-for-byte; pinning also reaches drafts and
    /// prereleases.
    pub async fn detect_version(&self, slug: &str, tag: &str) -> Result<Option<UpdateCandidate>> {
        self.select_best(slug, Some(tag)).await
    }

    /// Lists every release carrying a suitable asset, in provider order.
    ///
    /// A 404 from the provider yields an empty list; any other provider error
    /// propagates unchanged. A malformed `slug` fails before the provider is
    /// called.
    pub async fn detect_versions(
        &self,
        slug: &str,
        target_tag: Option<&str>,
    ) -> Result<Vec<UpdateCandidate>> {
        let repo: RepoId = slug.parse()?;

        let releases = match self.source.list_releases(&repo).await {
            Ok(releases) => releases,
            Err(err)
                if err.downcast_ref::<SourceError>() == Some(&SourceError::NotFound) =>
            {
                // 404 means repository or releases not found, not a failure
                debug!("Release listing returned 404 for {}", repo);
                Vec::new()
            }
            Err(err) => return Err(err),
        };

        let suffixes = self.platform.asset_suffixes();
        let mut candidates = Vec::new();

        for release in &releases {
            let Some(version) = self.eligible_version(release, target_tag) else {
                continue;
            };
            let Some(asset) = self.match_asset(release, &suffixes) else {
                self.report_skip(&release.tag, SkipReason::NoMatchingAsset);
                continue;
            };

            let validation_asset_id = if let Some(validator) = &self.validator {
                let expected = format!("{}{}", asset.name, validator.suffix());
                match release.assets.iter().find(|a| a.name == expected) {
                    Some(found) => Some(found.id),
                    None => {
                        self.report_skip(
                            &release.tag,
                            SkipReason::MissingValidationAsset { expected },
                        );
                        continue;
                    }
                }
            } else {
                None
            };

            self.reporter.report(&DetectEvent::CandidateAdded {
                tag: release.tag.clone(),
                asset: asset.name.clone(),
                url: asset.download_url.clone(),
            });

            candidates.push(UpdateCandidate {
                version,
                asset_url: asset.download_url.clone(),
                asset_size: asset.size,
                asset_id: asset.id,
                validation_asset_id,
                release_url: release.html_url.clone(),
                release_notes: release.body.clone(),
                release_name: release.name.clone(),
                published_at: release.published_at.clone(),
                repo_owner: repo.owner.clone(),
                repo_name: repo.repo.clone(),
            });
        }

        Ok(candidates)
    }

    /// Ties on equal versions go to the later release in provider order; the
    /// listing order is not guaranteed to be chronological.
    async fn select_best(
        &self,
        slug: &str,
        target_tag: Option<&str>,
    ) -> Result<Option<UpdateCandidate>> {
        let candidates = self.detect_versions(slug, target_tag).await?;

        let mut best: Option<UpdateCandidate> = None;
        for candidate in candidates {
            match &best {
                Some(current) if candidate.version < current.version => {}
                _ => best = Some(candidate),
            }
        }
        Ok(best)
    }

    /// Eligibility gate plus version extraction for one release.
    fn eligible_version(&self, release: &Release, target_tag: Option<&str>) -> Option<Version> {
        match target_tag {
            Some(target) => {
                // An explicit pin overrides draft/prerelease gating
                if release.tag != target {
                    self.report_skip(
                        &release.tag,
                        SkipReason::TagMismatch {
                            target: target.to_string(),
                        },
                    );
                    return None;
                }
            }
            None => {
                if release.draft {
                    self.report_skip(&release.tag, SkipReason::Draft);
                    return None;
                }
                if release.prerelease {
                    self.report_skip(&release.tag, SkipReason::Prerelease);
                    return None;
                }
            }
        }

        match version::parse_tag(&release.tag) {
            TagParse::Version(version) => Some(version),
            TagParse::NoVersionTriple => {
                self.report_skip(&release.tag, SkipReason::NoVersionTriple);
                None
            }
            TagParse::NotSemver => {
                self.report_skip(&release.tag, SkipReason::NotSemver);
                None
            }
        }
    }

    /// First asset in listing order that passes the filter allow-list and
    /// ends with an acceptable platform suffix.
    fn match_asset<'a>(&self, release: &'a Release, suffixes: &[String]) -> Option<&'a ReleaseAsset> {
        for asset in &release.assets {
            if !self.filters.is_empty() && !self.filters.iter().any(|f| f.is_match(&asset.name)) {
                self.reporter.report(&DetectEvent::AssetFiltered {
                    tag: release.tag.clone(),
                    asset: asset.name.clone(),
                });
                continue;
            }
            if suffixes.iter().any(|s| asset.name.ends_with(s.as_str())) {
                self.reporter.report(&DetectEvent::AssetMatched {
                    tag: release.tag.clone(),
                    asset: asset.name.clone(),
                });
                return Some(asset);
            }
        }
        None
    }

    fn report_skip(&self, tag: &str, reason: SkipReason) {
        self.reporter.report(&DetectEvent::ReleaseSkipped {
            tag: tag.to_string(),
            reason,
        });
    }
}
