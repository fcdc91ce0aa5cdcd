//! Pure version domain: parsing, calculation and the hotfix tag grammar.
//!
//! Nothing in this module touches the filesystem or a repository; every
//! function is a value-in, value-out transform.

pub mod calver;
pub mod hotfix;
pub mod version;

pub use calver::{format_calver, next_calver};
pub use hotfix::{increment_hotfix_sequence, is_hotfix_version, parse_hotfix_version, HotfixDescriptor};
pub use version::{next_semver, parse_calver, parse_semver, BumpType, Scheme, Version, VersionKind};
