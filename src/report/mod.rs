//! Structured observation of selection decisions.
//!
//! The detector never logs directly. Every release it passes over and every
//! asset it settles on is emitted as a [`DetectEvent`] through an injectable
//! [`Reporter`], so production wiring can forward to the `log` facade while
//! tests assert on exactly what was skipped and why.

use log::debug;

/// Why a release contributed no candidate.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// Tag does not equal the pinned target tag.
    TagMismatch { target: String },
    Draft,
    Prerelease,
    /// No `x.y.z` triple anywhere in the tag.
    NoVersionTriple,
    /// Tag has a triple but the remainder is not valid semver.
    NotSemver,
    /// No asset passed the filters and matched a platform suffix.
    NoMatchingAsset,
    /// A validator is configured but the companion asset is missing.
    MissingValidationAsset { expected: String },
}

/// One observable step of a selection query.
#[derive(Debug, Clone, PartialEq)]
pub enum DetectEvent {
    ReleaseSkipped {
        tag: String,
        reason: SkipReason,
    },
    /// Asset rejected by the name filters before suffix matching.
    AssetFiltered {
        tag: String,
        asset: String,
    },
    /// Asset accepted for a release; at most one per release.
    AssetMatched {
        tag: String,
        asset: String,
    },
    /// Release survived every stage and entered the result set.
    CandidateAdded {
        tag: String,
        asset: String,
        url: String,
    },
}

/// Sink for selection events.
#[cfg_attr(test, mockall::automock)]
pub trait Reporter: Send + Sync {
    fn report(&self, event: &DetectEvent);
}

/// Forwards events to the `log` facade at debug level.
#[derive(Debug, Default)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn report(&self, event: &DetectEvent) {
        match event {
            DetectEvent::ReleaseSkipped { tag, reason } => match reason {
                SkipReason::TagMismatch { target } => {
                    debug!("Skip {}: not matching target version {}", tag, target)
                }
                SkipReason::Draft => debug!("Skip draft version {}", tag),
                SkipReason::Prerelease => debug!("Skip pre-release version {}", tag),
                SkipReason::NoVersionTriple => debug!("Skip version not adopting semver: {}", tag),
                SkipReason::NotSemver => debug!("Failed to parse a semantic version from {}", tag),
                SkipReason::NoMatchingAsset => debug!("No suitable asset found in release {}", tag),
                SkipReason::MissingValidationAsset { expected } => {
                    debug!("Release {} has no validation file {}", tag, expected)
                }
            },
            DetectEvent::AssetFiltered { asset, .. } => {
                debug!("Skipping asset {} not matching any filter", asset)
            }
            DetectEvent::AssetMatched { tag, asset } => {
                debug!("Selected asset {} from release {}", asset, tag)
            }
            DetectEvent::CandidateAdded { tag, asset, url } => {
                debug!("Found release {} with asset {} at {}", tag, asset, url)
            }
        }
    }
}
