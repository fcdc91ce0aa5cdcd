//! Git operations abstraction layer
//!
//! This module provides a trait-based abstraction over the repository state
//! the release and hotfix engines consume. The concrete implementations are:
//!
//! - [repository::Git2Repository]: a real implementation using the `git2` crate
//! - [mock::MockRepository]: an in-memory implementation for testing
//!
//! Engine code depends on the [Repository] trait rather than a concrete
//! implementation, so every decision can be exercised without a repository
//! on disk.

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::error::Result;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;

/// Details of a single version tag, read from repository state on demand.
/// Never cached across calls.
#[derive(Debug, Clone, PartialEq)]
pub struct TagDescriptor {
    /// The tag name as stored, prefix included.
    pub tag: String,
    /// Full hash of the commit the tag points at.
    pub commit: String,
    /// Commit timestamp (not the tag annotation's).
    pub created_at: Option<DateTime<Utc>>,
    /// Commit summary line.
    pub message: String,
}

/// Read and write access to the tag/branch namespace of one repository.
///
/// The ref namespace is the single authoritative store: implementations
/// must never cache listings between calls, and tag/branch creation must
/// fail on collision rather than overwrite. All methods are synchronous and
/// blocking.
pub trait Repository: Send + Sync {
    /// List tags matching a glob pattern (all tags when `None`), sorted by
    /// version, newest first.
    fn list_tags(&self, pattern: Option<&str>) -> Result<Vec<String>>;

    /// Check whether a tag exists.
    fn tag_exists(&self, name: &str) -> Result<bool>;

    /// Create an annotated tag at HEAD. Fails with `AlreadyExists` if the
    /// tag name is taken.
    fn create_tag(&self, name: &str, message: &str) -> Result<()>;

    /// Full details for one tag.
    fn describe_tag(&self, name: &str) -> Result<TagDescriptor>;

    /// Create a branch pointing at the given ref (tag name, branch name or
    /// commit). Fails with `AlreadyExists` on name collision.
    fn create_branch(&self, name: &str, target: &str) -> Result<()>;

    /// Check out an existing local branch.
    fn checkout_branch(&self, name: &str) -> Result<()>;

    /// Check whether a local branch exists.
    fn branch_exists(&self, name: &str) -> Result<bool>;

    /// List local branch names.
    fn list_branches(&self) -> Result<Vec<String>>;

    /// Name of the currently checked out branch.
    fn current_branch(&self) -> Result<String>;

    /// Short hash of the current HEAD commit.
    fn short_commit(&self) -> Result<String>;

    /// Whether the working tree has uncommitted changes.
    fn is_working_tree_dirty(&self) -> Result<bool>;

    /// Whether the given tag points at the current HEAD commit. A missing
    /// or empty tag resolves to false, not an error.
    fn is_tag_at_head(&self, tag: &str) -> Result<bool>;

    /// Push a tag to the named remote.
    fn push_tag(&self, remote: &str, tag: &str) -> Result<()>;
}

/// Compare two tag names by version, descending - the ordering of
/// `git tag --sort=-version:refname`.
///
/// When both names parse as semantic versions after the leading non-digit
/// prefix is dropped, semver precedence applies (so `v1.0.0-rc.1` sorts
/// below `v1.0.0`). Otherwise falls back to a natural comparison that
/// orders digit runs numerically.
pub(crate) fn compare_tags_version_desc(a: &str, b: &str) -> Ordering {
    fn semver_part(tag: &str) -> Option<semver::Version> {
        let start = tag.find(|c: char| c.is_ascii_digit())?;
        semver::Version::parse(&tag[start..]).ok()
    }

    match (semver_part(a), semver_part(b)) {
        (Some(va), Some(vb)) => vb.cmp(&va).then_with(|| b.cmp(a)),
        _ => natural_cmp(b, a),
    }
}

/// Natural string comparison: digit runs compare numerically, everything
/// else byte-wise. Digit runs order before non-digit text.
fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut ca = a.chars().peekable();
    let mut cb = b.chars().peekable();

    loop {
        match (ca.peek().copied(), cb.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                if x.is_ascii_digit() && y.is_ascii_digit() {
                    let na = take_number(&mut ca);
                    let nb = take_number(&mut cb);
                    match na.cmp(&nb) {
                        Ordering::Equal => continue,
                        other => return other,
                    }
                } else if x.is_ascii_digit() {
                    return Ordering::Less;
                } else if y.is_ascii_digit() {
                    return Ordering::Greater;
                } else {
                    match x.cmp(&y) {
                        Ordering::Equal => {
                            ca.next();
                            cb.next();
                        }
                        other => return other,
                    }
                }
            }
        }
    }
}

fn take_number(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> u64 {
    let mut n: u64 = 0;
    while let Some(c) = chars.peek() {
        if let Some(d) = c.to_digit(10) {
            n = n.saturating_mul(10).saturating_add(d as u64);
            chars.next();
        } else {
            break;
        }
    }
    n
}
