//! Semantic version extraction from release tags.

use regex::Regex;
use semver::Version;
use std::sync::OnceLock;

/// Outcome of parsing a release tag.
///
/// Both failure variants are soft: a tag that carries no usable version makes
/// its release ineligible, it never aborts a query.
#[derive(Debug, Clone, PartialEq)]
pub enum TagParse {
    /// Tag carries a well-formed semantic version.
    Version(Version),
    /// No `digits.digits.digits` triple anywhere in the tag.
    NoVersionTriple,
    /// A triple was found but the remainder is not strict semver.
    NotSemver,
}

fn version_triple() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+\.\d+\.\d+").expect("version triple pattern"))
}

/// Extract a semantic version from a release tag.
///
/// The first `digits.digits.digits` triple anchors the version. Anything
/// before it (a leading `v`, `release-`, ...) is discarded; anything after it
/// (`-rc1`, `+build5`) is kept and must satisfy strict semver parsing.
pub fn parse_tag(tag: &str) -> TagParse {
    let Some(found) = version_triple().find(tag) else {
        return TagParse::NoVersionTriple;
    };
    match Version::parse(&tag[found.start()..]) {
        Ok(version) => TagParse::Version(version),
        Err(_) => TagParse::NotSemver,
    }
}
