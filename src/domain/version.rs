use crate::error::{GitReleaseError, Result};
use std::fmt;
use std::str::FromStr;

/// Versioning scheme selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    SemVer,
    CalVer,
}

impl FromStr for Scheme {
    type Err = GitReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "semver" => Ok(Scheme::SemVer),
            "calver" => Ok(Scheme::CalVer),
            other => Err(GitReleaseError::scheme(format!(
                "'{}' (expected 'semver' or 'calver')",
                other
            ))),
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scheme::SemVer => write!(f, "semver"),
            Scheme::CalVer => write!(f, "calver"),
        }
    }
}

/// Which part of a semantic version to increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BumpType {
    Major,
    Minor,
    Patch,
}

impl FromStr for BumpType {
    type Err = GitReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "major" => Ok(BumpType::Major),
            "minor" => Ok(BumpType::Minor),
            "patch" => Ok(BumpType::Patch),
            other => Err(GitReleaseError::validation(format!(
                "invalid bump type '{}' (expected major, minor or patch)",
                other
            ))),
        }
    }
}

impl fmt::Display for BumpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BumpType::Major => write!(f, "major"),
            BumpType::Minor => write!(f, "minor"),
            BumpType::Patch => write!(f, "patch"),
        }
    }
}

/// Scheme-specific version payload.
///
/// A calver `sequence` of 0 means "no sequence suffix": `"2025.40"` parses to
/// sequence 0 and renders back to `"2025.40"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionKind {
    SemVer { major: u64, minor: u64, patch: u64 },
    CalVer { period: String, sequence: u64 },
}

/// A parsed version tag (without the configured tag prefix).
///
/// The prerelease and build-metadata overlays are opaque strings: they are
/// appended to the rendered form but never parsed further.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    pub kind: VersionKind,
    pub pre: Option<String>,
    pub meta: Option<String>,
}

impl Version {
    /// Create a plain semantic version
    pub fn semver(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            kind: VersionKind::SemVer {
                major,
                minor,
                patch,
            },
            pre: None,
            meta: None,
        }
    }

    /// Create a plain calendar version
    pub fn calver(period: impl Into<String>, sequence: u64) -> Self {
        Version {
            kind: VersionKind::CalVer {
                period: period.into(),
                sequence,
            },
            pre: None,
            meta: None,
        }
    }

    /// The scheme this version belongs to
    pub fn scheme(&self) -> Scheme {
        match self.kind {
            VersionKind::SemVer { .. } => Scheme::SemVer,
            VersionKind::CalVer { .. } => Scheme::CalVer,
        }
    }

    /// Return a copy with the prerelease overlay set.
    pub fn with_prerelease(&self, pre: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.pre = Some(pre.into());
        next
    }

    /// Return a copy with the build metadata overlay set.
    pub fn with_metadata(&self, meta: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.meta = Some(meta.into());
        next
    }

    /// Bump a semantic version.
    ///
    /// `patch` increments patch only; `minor` increments minor and resets
    /// patch; `major` increments major and resets minor and patch. Overlays
    /// are not carried over to the bumped version.
    ///
    /// Returns a validation error for calver versions, which advance by
    /// period instead (see [crate::domain::calver::next_calver]).
    pub fn bump(&self, bump: BumpType) -> Result<Version> {
        match self.kind {
            VersionKind::SemVer {
                major,
                minor,
                patch,
            } => Ok(match bump {
                BumpType::Major => Version::semver(major + 1, 0, 0),
                BumpType::Minor => Version::semver(major, minor + 1, 0),
                BumpType::Patch => Version::semver(major, minor, patch + 1),
            }),
            VersionKind::CalVer { .. } => Err(GitReleaseError::validation(format!(
                "cannot apply semver bump to calver version {}",
                self
            ))),
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            VersionKind::SemVer {
                major,
                minor,
                patch,
            } => write!(f, "{}.{}.{}", major, minor, patch)?,
            VersionKind::CalVer { period, sequence } => {
                write!(f, "{}", period)?;
                if *sequence > 0 {
                    write!(f, ".{}", sequence)?;
                }
            }
        }

        if let Some(pre) = &self.pre {
            write!(f, "-{}", pre)?;
        }

        if let Some(meta) = &self.meta {
            write!(f, "+{}", meta)?;
        }

        Ok(())
    }
}

/// Split off build metadata at the first '+', then a prerelease at the first
/// '-' in the remainder. Returns (core, pre, meta).
fn split_overlays(s: &str) -> (&str, Option<&str>, Option<&str>) {
    let (s, meta) = match s.split_once('+') {
        Some((core, meta)) => (core, Some(meta)),
        None => (s, None),
    };

    let (s, pre) = match s.split_once('-') {
        Some((core, pre)) => (core, Some(pre)),
        None => (s, None),
    };

    (s, pre, meta)
}

/// Parse a semantic version string (without prefix).
///
/// Format: `MAJOR.MINOR.PATCH[-PRERELEASE][+METADATA]`
pub fn parse_semver(s: &str) -> Result<Version> {
    let (core, pre, meta) = split_overlays(s);

    let parts: Vec<&str> = core.split('.').collect();
    if parts.len() != 3 {
        return Err(GitReleaseError::format(format!(
            "invalid semver format: {}",
            core
        )));
    }

    let major = parts[0]
        .parse::<u64>()
        .map_err(|_| GitReleaseError::format(format!("invalid major version: {}", parts[0])))?;
    let minor = parts[1]
        .parse::<u64>()
        .map_err(|_| GitReleaseError::format(format!("invalid minor version: {}", parts[1])))?;
    let patch = parts[2]
        .parse::<u64>()
        .map_err(|_| GitReleaseError::format(format!("invalid patch version: {}", parts[2])))?;

    Ok(Version {
        kind: VersionKind::SemVer {
            major,
            minor,
            patch,
        },
        pre: pre.map(str::to_string),
        meta: meta.map(str::to_string),
    })
}

/// Parse a calendar version string (without prefix).
///
/// Format: `YYYY.MM.DD[.SEQUENCE][-PRERELEASE][+METADATA]`
/// or week-based: `YYYY.WW[.SEQUENCE][-PRERELEASE][+METADATA]`
///
/// The two period shapes cannot always be told apart from token count alone,
/// so part counts are resolved by value range:
///
/// - 2 parts is a week period only when the second part is > 12; a value of
///   12 or less could be either a month missing its day or a 2-digit week,
///   and is rejected rather than guessed.
/// - 3 parts is week-plus-sequence when the middle part is in 13..=53 and
///   the last is <= 31; anything else (including non-numeric parts) is taken
///   verbatim as a full date period. A low middle part like `2025.05.03`
///   always resolves as a date even though "week 5, build 3" is structurally
///   identical - downstream behavior depends on this bias.
/// - 4 parts is a full date plus an explicit sequence.
pub fn parse_calver(s: &str) -> Result<Version> {
    let (core, pre, meta) = split_overlays(s);

    let parts: Vec<&str> = core.split('.').collect();

    let (period, sequence) = match parts.len() {
        0 | 1 => {
            return Err(GitReleaseError::format(format!(
                "invalid calver format: {}",
                core
            )));
        }
        2 => match parts[1].parse::<u64>() {
            Ok(week) if week > 12 => (core.to_string(), 0),
            _ => {
                return Err(GitReleaseError::format(format!(
                    "invalid calver format: {} (ambiguous 2-part format - use 3 parts for dates or week > 12)",
                    core
                )));
            }
        },
        3 => match (parts[1].parse::<u64>(), parts[2].parse::<u64>()) {
            (Ok(second), Ok(third)) if second <= 53 && third <= 31 => {
                if second > 12 {
                    // Weeks run 13..=53 here; months never exceed 12.
                    (parts[..2].join("."), third)
                } else {
                    (core.to_string(), 0)
                }
            }
            _ => (core.to_string(), 0),
        },
        4 => {
            let seq = parts[3].parse::<u64>().map_err(|_| {
                GitReleaseError::format(format!("invalid calver sequence: {}", parts[3]))
            })?;
            (parts[..3].join("."), seq)
        }
        _ => {
            return Err(GitReleaseError::format(format!(
                "invalid calver format: {}",
                core
            )));
        }
    };

    Ok(Version {
        kind: VersionKind::CalVer { period, sequence },
        pre: pre.map(str::to_string),
        meta: meta.map(str::to_string),
    })
}

/// Parse a prefix-stripped tag under the given scheme.
pub fn parse(s: &str, scheme: Scheme) -> Result<Version> {
    match scheme {
        Scheme::SemVer => parse_semver(s),
        Scheme::CalVer => parse_calver(s),
    }
}

/// Compute the next semantic version.
///
/// With no prior version the first release is 1.0.0 for a major bump and
/// 0.1.0 otherwise - a fixed "no history yet" convention, not the zero
/// version bumped normally.
pub fn next_semver(current: Option<&Version>, bump: BumpType) -> Result<Version> {
    match current {
        None => Ok(match bump {
            BumpType::Major => Version::semver(1, 0, 0),
            _ => Version::semver(0, 1, 0),
        }),
        Some(v) => v.bump(bump),
    }
}

/// Remove a configured prefix (e.g. "v") from a tag string, if present.
pub fn strip_prefix<'a>(tag: &'a str, prefix: &str) -> &'a str {
    tag.strip_prefix(prefix).unwrap_or(tag)
}

/// Prepend a configured prefix (e.g. "v") to a version string.
pub fn with_prefix(version: &str, prefix: &str) -> String {
    format!("{}{}", prefix, version)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_semver_simple() {
        let v = parse_semver("1.2.3").unwrap();
        assert_eq!(
            v.kind,
            VersionKind::SemVer {
                major: 1,
                minor: 2,
                patch: 3
            }
        );
        assert_eq!(v.pre, None);
        assert_eq!(v.meta, None);
    }

    #[test]
    fn test_parse_semver_with_prerelease() {
        let v = parse_semver("1.2.3-rc.1").unwrap();
        assert_eq!(v.pre.as_deref(), Some("rc.1"));
        assert_eq!(v.meta, None);
    }

    #[test]
    fn test_parse_semver_with_metadata() {
        let v = parse_semver("1.2.3+build.123").unwrap();
        assert_eq!(v.pre, None);
        assert_eq!(v.meta.as_deref(), Some("build.123"));
    }

    #[test]
    fn test_parse_semver_with_prerelease_and_metadata() {
        let v = parse_semver("1.2.3-rc.1+build.123").unwrap();
        assert_eq!(v.pre.as_deref(), Some("rc.1"));
        assert_eq!(v.meta.as_deref(), Some("build.123"));
    }

    #[test]
    fn test_parse_semver_invalid() {
        assert!(parse_semver("1.2").is_err());
        assert!(parse_semver("1.2.3.4").is_err());
        assert!(parse_semver("a.2.3").is_err());
    }

    #[test]
    fn test_semver_roundtrip() {
        for s in ["1.2.3", "1.2.3-rc.1", "1.2.3+build.5", "1.2.3-rc.1+build.5"] {
            assert_eq!(parse_semver(s).unwrap().to_string(), s);
        }
    }

    #[test]
    fn test_parse_calver_date() {
        let v = parse_calver("2025.10.02").unwrap();
        assert_eq!(
            v.kind,
            VersionKind::CalVer {
                period: "2025.10.02".to_string(),
                sequence: 0
            }
        );
    }

    #[test]
    fn test_parse_calver_date_with_sequence() {
        let v = parse_calver("2025.10.02.3").unwrap();
        assert_eq!(
            v.kind,
            VersionKind::CalVer {
                period: "2025.10.02".to_string(),
                sequence: 3
            }
        );
    }

    #[test]
    fn test_parse_calver_week() {
        let v = parse_calver("2025.40").unwrap();
        assert_eq!(
            v.kind,
            VersionKind::CalVer {
                period: "2025.40".to_string(),
                sequence: 0
            }
        );
    }

    #[test]
    fn test_parse_calver_week_with_sequence() {
        let v = parse_calver("2025.40.5").unwrap();
        assert_eq!(
            v.kind,
            VersionKind::CalVer {
                period: "2025.40".to_string(),
                sequence: 5
            }
        );
    }

    #[test]
    fn test_parse_calver_ambiguous_two_parts_rejected() {
        // 5 could be month or week, refuse rather than guess
        assert!(parse_calver("2025.05").is_err());
        assert!(parse_calver("2025.12").is_err());
        assert!(parse_calver("2025.13").is_ok());
    }

    #[test]
    fn test_parse_calver_three_parts_low_period_is_date() {
        // "week 5, build 3" reads identically, but the resolution bias is
        // toward dates and must stay that way.
        let v = parse_calver("2025.05.03").unwrap();
        assert_eq!(
            v.kind,
            VersionKind::CalVer {
                period: "2025.05.03".to_string(),
                sequence: 0
            }
        );
    }

    #[test]
    fn test_parse_calver_three_parts_large_day_is_date() {
        // third part > 31 cannot be a sequence under the heuristic
        let v = parse_calver("2025.40.99").unwrap();
        assert_eq!(
            v.kind,
            VersionKind::CalVer {
                period: "2025.40.99".to_string(),
                sequence: 0
            }
        );
    }

    #[test]
    fn test_parse_calver_non_numeric_parts_fall_back_to_date() {
        // the year part is never inspected, so prefixed strings like
        // "v1.0.0" parse as a verbatim date period
        let v = parse_calver("v1.0.0").unwrap();
        assert_eq!(
            v.kind,
            VersionKind::CalVer {
                period: "v1.0.0".to_string(),
                sequence: 0
            }
        );
    }

    #[test]
    fn test_parse_calver_with_overlays() {
        let v = parse_calver("2025.40.1-rc.1+build.9").unwrap();
        assert_eq!(v.pre.as_deref(), Some("rc.1"));
        assert_eq!(v.meta.as_deref(), Some("build.9"));
        assert_eq!(v.to_string(), "2025.40.1-rc.1+build.9");
    }

    #[test]
    fn test_parse_calver_invalid() {
        assert!(parse_calver("2025").is_err());
        assert!(parse_calver("2025.10.02.x").is_err());
        assert!(parse_calver("2025.10.02.1.9").is_err());
    }

    #[test]
    fn test_calver_roundtrip() {
        for s in ["2025.10.02", "2025.10.02.1", "2025.40", "2025.40.1"] {
            assert_eq!(parse_calver(s).unwrap().to_string(), s);
        }
    }

    #[test]
    fn test_calver_zero_sequence_renders_without_suffix() {
        let v = Version::calver("2025.40", 0);
        assert_eq!(v.to_string(), "2025.40");
    }

    #[test]
    fn test_bump_patch() {
        let v = Version::semver(1, 2, 3);
        assert_eq!(v.bump(BumpType::Patch).unwrap(), Version::semver(1, 2, 4));
    }

    #[test]
    fn test_bump_minor_resets_patch() {
        let v = Version::semver(1, 2, 3);
        assert_eq!(v.bump(BumpType::Minor).unwrap(), Version::semver(1, 3, 0));
    }

    #[test]
    fn test_bump_major_resets_minor_and_patch() {
        let v = Version::semver(1, 2, 3);
        assert_eq!(v.bump(BumpType::Major).unwrap(), Version::semver(2, 0, 0));
    }

    #[test]
    fn test_bump_drops_overlays() {
        let v = Version::semver(1, 2, 3).with_prerelease("rc.1");
        let next = v.bump(BumpType::Patch).unwrap();
        assert_eq!(next.pre, None);
    }

    #[test]
    fn test_bump_calver_rejected() {
        let v = Version::calver("2025.40", 1);
        assert!(v.bump(BumpType::Patch).is_err());
    }

    #[test]
    fn test_next_semver_no_history() {
        assert_eq!(
            next_semver(None, BumpType::Major).unwrap().to_string(),
            "1.0.0"
        );
        assert_eq!(
            next_semver(None, BumpType::Minor).unwrap().to_string(),
            "0.1.0"
        );
        assert_eq!(
            next_semver(None, BumpType::Patch).unwrap().to_string(),
            "0.1.0"
        );
    }

    #[test]
    fn test_next_semver_from_current() {
        let current = parse_semver("1.2.3").unwrap();
        assert_eq!(
            next_semver(Some(&current), BumpType::Minor)
                .unwrap()
                .to_string(),
            "1.3.0"
        );
    }

    #[test]
    fn test_with_prerelease_does_not_mutate() {
        let v = Version::semver(1, 0, 0);
        let pre = v.with_prerelease("rc.1");
        assert_eq!(v.pre, None);
        assert_eq!(pre.to_string(), "1.0.0-rc.1");
    }

    #[test]
    fn test_with_metadata() {
        let v = Version::calver("2025.40", 2).with_metadata("build.5");
        assert_eq!(v.to_string(), "2025.40.2+build.5");
    }

    #[test]
    fn test_scheme_from_str() {
        assert_eq!("semver".parse::<Scheme>().unwrap(), Scheme::SemVer);
        assert_eq!("calver".parse::<Scheme>().unwrap(), Scheme::CalVer);
        assert!("chromver".parse::<Scheme>().is_err());
    }

    #[test]
    fn test_bump_type_from_str() {
        assert_eq!("major".parse::<BumpType>().unwrap(), BumpType::Major);
        assert!("mega".parse::<BumpType>().is_err());
    }

    #[test]
    fn test_strip_prefix() {
        assert_eq!(strip_prefix("v1.2.3", "v"), "1.2.3");
        assert_eq!(strip_prefix("api/v1.2.3", "api/v"), "1.2.3");
        assert_eq!(strip_prefix("1.2.3", "v"), "1.2.3");
    }

    #[test]
    fn test_with_prefix() {
        assert_eq!(with_prefix("1.2.3", "v"), "v1.2.3");
        assert_eq!(with_prefix("1.2.3", ""), "1.2.3");
    }
}
