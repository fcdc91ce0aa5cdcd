//! Hotfix tag grammar.
//!
//! A hotfix tag has the canonical form `<base-tag>-<suffix>.<sequence>`,
//! e.g. `v1.5.0-hotfix.2`. The base tag is a released version tag; the
//! sequence starts at 1 and is derived from the tags already present in the
//! repository, never from stored state.

use crate::domain::version::{self, Version};
use crate::error::{GitReleaseError, Result};

/// A hotfix tag decomposed into its parts. Derived on demand, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HotfixDescriptor {
    /// The released tag the hotfix is based on, as it appears in the
    /// repository (prefix included, e.g. "v1.5.0").
    pub base_tag: String,
    /// The base tag parsed as a version.
    pub base: Version,
    /// The literal suffix between base tag and sequence (e.g. "hotfix").
    pub suffix: String,
    /// The 1-based hotfix sequence number.
    pub sequence: u64,
}

impl HotfixDescriptor {
    /// Canonical string form: `<base-tag>-<suffix>.<sequence>`.
    pub fn tag(&self) -> String {
        format!("{}-{}.{}", self.base_tag, self.suffix, self.sequence)
    }
}

/// Syntactic test for the hotfix tag shape.
///
/// True iff the substring after the final '-' contains exactly one '.' and
/// the part after that '.' parses as an integer. This is deliberately
/// permissive: an ordinary prerelease like "v1.0.0-rc.1" has the same shape
/// and also matches. Callers that need certainty must compare against the
/// configured suffix; the bare predicate cannot tell the two apart.
pub fn is_hotfix_version(tag: &str) -> bool {
    let parts: Vec<&str> = tag.split('-').collect();
    if parts.len() < 2 {
        return false;
    }

    let last = parts[parts.len() - 1];
    let dot_parts: Vec<&str> = last.split('.').collect();
    if dot_parts.len() != 2 {
        return false;
    }

    dot_parts[1].parse::<u64>().is_ok()
}

/// Parse a hotfix tag like `v1.0.0-hotfix.3` into its descriptor.
///
/// The tag is split at the last '-', and the remainder at its first '.'.
/// The base substring is parsed semver-first when it has exactly two
/// internal dots, calver-first otherwise, falling back to the other scheme
/// either way.
pub fn parse_hotfix_version(tag: &str) -> Result<HotfixDescriptor> {
    if !is_hotfix_version(tag) {
        return Err(GitReleaseError::format(format!(
            "not a hotfix version: {}",
            tag
        )));
    }

    let (base_tag, suffix_part) = tag
        .rsplit_once('-')
        .ok_or_else(|| GitReleaseError::format(format!("invalid hotfix format: {}", tag)))?;

    let (suffix, seq_str) = suffix_part
        .split_once('.')
        .ok_or_else(|| GitReleaseError::format(format!("invalid hotfix format: {}", tag)))?;

    let sequence = seq_str
        .parse::<u64>()
        .map_err(|_| GitReleaseError::format(format!("invalid sequence number: {}", seq_str)))?;

    let base = parse_base(base_tag)
        .map_err(|e| GitReleaseError::format(format!("failed to parse base version '{}': {}", base_tag, e)))?;

    Ok(HotfixDescriptor {
        base_tag: base_tag.to_string(),
        base,
        suffix: suffix.to_string(),
        sequence,
    })
}

/// Parse the base substring of a hotfix tag under whichever scheme fits.
fn parse_base(base: &str) -> Result<Version> {
    if base.matches('.').count() == 2 {
        // Three dot-separated parts: most likely semver, maybe a calver date
        version::parse_semver(base).or_else(|_| version::parse_calver(base))
    } else {
        version::parse_calver(base).or_else(|_| version::parse_semver(base))
    }
}

/// Bump the sequence of an existing hotfix tag by one.
///
/// `v1.0.0-hotfix.2` becomes `v1.0.0-hotfix.3`; base tag and suffix are
/// preserved byte for byte.
pub fn increment_hotfix_sequence(tag: &str) -> Result<String> {
    let desc = parse_hotfix_version(tag)?;

    Ok(format!(
        "{}-{}.{}",
        desc.base_tag,
        desc.suffix,
        desc.sequence + 1
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::version::VersionKind;

    #[test]
    fn test_is_hotfix_version() {
        assert!(is_hotfix_version("v1.0.0-hotfix.1"));
        assert!(is_hotfix_version("2025.11.09-hotfix.2"));
        assert!(is_hotfix_version("api/v1.0.0-patch.1"));
    }

    #[test]
    fn test_is_hotfix_version_rejects_plain_tags() {
        assert!(!is_hotfix_version("v1.0.0"));
        assert!(!is_hotfix_version("2025.40.1"));
        assert!(!is_hotfix_version("v1.0.0-hotfix"));
        assert!(!is_hotfix_version("v1.0.0-hotfix.1.2"));
        assert!(!is_hotfix_version("v1.0.0-hotfix.x"));
    }

    #[test]
    fn test_is_hotfix_version_matches_prerelease_shape() {
        // Known permissiveness: a prerelease with the same shape matches.
        assert!(is_hotfix_version("v1.0.0-rc.1"));
    }

    #[test]
    fn test_parse_hotfix_version_semver_base() {
        let desc = parse_hotfix_version("1.0.0-hotfix.3").unwrap();
        assert_eq!(desc.base_tag, "1.0.0");
        assert_eq!(desc.suffix, "hotfix");
        assert_eq!(desc.sequence, 3);
        assert_eq!(
            desc.base.kind,
            VersionKind::SemVer {
                major: 1,
                minor: 0,
                patch: 0
            }
        );
    }

    #[test]
    fn test_parse_hotfix_version_prefixed_base_falls_back_to_calver() {
        // "v1.0.0" fails semver parsing and lands in the calver fallback,
        // which takes the period verbatim.
        let desc = parse_hotfix_version("v1.0.0-hotfix.1").unwrap();
        assert_eq!(desc.base_tag, "v1.0.0");
        assert_eq!(
            desc.base.kind,
            VersionKind::CalVer {
                period: "v1.0.0".to_string(),
                sequence: 0
            }
        );
    }

    #[test]
    fn test_parse_hotfix_version_calver_week_base() {
        let desc = parse_hotfix_version("2025.40-patch.2").unwrap();
        assert_eq!(desc.base_tag, "2025.40");
        assert_eq!(desc.suffix, "patch");
        assert_eq!(desc.sequence, 2);
    }

    #[test]
    fn test_parse_hotfix_version_three_part_base_is_semver_first() {
        // a dotted date like 2025.11.09 has exactly two dots and therefore
        // parses through the semver branch (leading zeros are accepted by
        // integer parsing)
        let desc = parse_hotfix_version("2025.11.09-hotfix.2").unwrap();
        assert_eq!(desc.base_tag, "2025.11.09");
        assert_eq!(desc.suffix, "hotfix");
        assert_eq!(desc.sequence, 2);
        assert_eq!(
            desc.base.kind,
            VersionKind::SemVer {
                major: 2025,
                minor: 11,
                patch: 9
            }
        );
    }

    #[test]
    fn test_parse_hotfix_version_not_hotfix() {
        assert!(parse_hotfix_version("v1.0.0").is_err());
    }

    #[test]
    fn test_descriptor_tag_roundtrip() {
        let desc = parse_hotfix_version("v1.5.0-hotfix.4").unwrap();
        assert_eq!(desc.tag(), "v1.5.0-hotfix.4");
    }

    #[test]
    fn test_increment_hotfix_sequence() {
        assert_eq!(
            increment_hotfix_sequence("v1.0.0-hotfix.2").unwrap(),
            "v1.0.0-hotfix.3"
        );
    }

    #[test]
    fn test_increment_preserves_base_and_suffix() {
        let next = increment_hotfix_sequence("api/v2.1.0-patch.9").unwrap();
        assert_eq!(next, "api/v2.1.0-patch.10");

        let desc = parse_hotfix_version(&next).unwrap();
        assert_eq!(desc.base_tag, "api/v2.1.0");
        assert_eq!(desc.suffix, "patch");
        assert_eq!(desc.sequence, 10);
    }

    #[test]
    fn test_increment_rejects_non_hotfix() {
        assert!(increment_hotfix_sequence("v1.0.0").is_err());
    }
}
