//! Release tagging engine: latest-tag discovery, next-version computation
//! and tag creation, plus the effective-version display string.

use crate::domain::version::{self, BumpType, Scheme, Version};
use crate::domain::{calver, next_semver};
use crate::error::{GitReleaseError, Result};
use crate::git::{Repository, TagDescriptor};
use chrono::{DateTime, Utc};

/// Compute the display version string for the current repository state.
///
/// - No tag exists: `0.0.0-dev-<short-commit>`.
/// - The working tree is dirty, or the latest tag does not point at HEAD
///   (unreleased commits on top of it): `<version>-dirty-<short-commit>`.
/// - Otherwise the prefix-stripped tag, unchanged.
///
/// This value is for display and artifact naming only; tag creation always
/// derives its input from a verified-clean HEAD instead.
pub fn effective_version(
    latest_tag: Option<&str>,
    prefix: &str,
    short_commit: &str,
    dirty: bool,
    tag_at_head: bool,
) -> String {
    let tag = match latest_tag {
        None => return format!("0.0.0-dev-{}", short_commit),
        Some(tag) => tag,
    };

    let version = version::strip_prefix(tag, prefix);
    if dirty || !tag_at_head {
        format!("{}-dirty-{}", version, short_commit)
    } else {
        version.to_string()
    }
}

/// Drives release tagging against one repository.
///
/// Holds no version state of its own: every decision is recomputed from the
/// current tag listing, so retried calls converge on the same answer.
pub struct Releaser<'r> {
    repo: &'r dyn Repository,
    prefix: String,
    dry_run: bool,
}

impl<'r> Releaser<'r> {
    pub fn new(repo: &'r dyn Repository, prefix: impl Into<String>, dry_run: bool) -> Self {
        Releaser {
            repo,
            prefix: prefix.into(),
            dry_run,
        }
    }

    /// The latest tag carrying the configured prefix, or None when no such
    /// tag exists yet.
    pub fn latest_tag(&self) -> Result<Option<String>> {
        let pattern = format!("{}*", self.prefix);
        let tags = self.repo.list_tags(Some(&pattern))?;
        Ok(tags.into_iter().next())
    }

    /// The latest tag parsed under the given scheme, or None without tags.
    pub fn latest_version(&self, scheme: Scheme) -> Result<Option<Version>> {
        match self.latest_tag()? {
            None => Ok(None),
            Some(tag) => {
                let bare = version::strip_prefix(&tag, &self.prefix);
                version::parse(bare, scheme).map(Some)
            }
        }
    }

    /// Compute the next version without creating anything.
    ///
    /// Prerelease/metadata overlays are applied last and never influence the
    /// core computation.
    pub fn next_version(
        &self,
        scheme: Scheme,
        bump: BumpType,
        calver_format: &str,
        now: DateTime<Utc>,
        pre: &str,
        meta: &str,
    ) -> Result<Version> {
        let current = self.latest_version(scheme)?;

        let mut next = match scheme {
            Scheme::SemVer => next_semver(current.as_ref(), bump)?,
            Scheme::CalVer => calver::next_calver(current.as_ref(), calver_format, now),
        };

        if !pre.is_empty() {
            next = next.with_prerelease(pre);
        }
        if !meta.is_empty() {
            next = next.with_metadata(meta);
        }

        Ok(next)
    }

    /// Compute the next version and create its tag at HEAD.
    ///
    /// Returns the full tag name. In dry-run mode the tag name is computed
    /// and returned but nothing is created.
    pub fn create_next_tag(
        &self,
        scheme: Scheme,
        bump: BumpType,
        calver_format: &str,
        now: DateTime<Utc>,
        pre: &str,
        meta: &str,
        message: Option<&str>,
    ) -> Result<String> {
        let next = self.next_version(scheme, bump, calver_format, now, pre, meta)?;
        let tag = version::with_prefix(&next.to_string(), &self.prefix);

        if self.dry_run {
            return Ok(tag);
        }

        let default_message = format!("release {}", tag);
        self.repo
            .create_tag(&tag, message.unwrap_or(&default_message))?;

        Ok(tag)
    }

    /// The effective version string for display and artifact naming.
    pub fn effective_version(&self) -> Result<String> {
        let latest = self.latest_tag()?;
        let short_commit = self.repo.short_commit()?;
        let dirty = self.repo.is_working_tree_dirty()?;
        let tag_at_head = match &latest {
            Some(tag) => self.repo.is_tag_at_head(tag)?,
            None => false,
        };

        Ok(effective_version(
            latest.as_deref(),
            &self.prefix,
            &short_commit,
            dirty,
            tag_at_head,
        ))
    }

    /// Fail with a validation error when the working tree has uncommitted
    /// changes.
    pub fn ensure_clean_working_tree(&self) -> Result<()> {
        if self.repo.is_working_tree_dirty()? {
            return Err(GitReleaseError::validation(
                "working tree has uncommitted changes; commit or stash them first",
            ));
        }
        Ok(())
    }

    /// Details for every tag with the configured prefix, newest first.
    pub fn list_tag_details(&self) -> Result<Vec<TagDescriptor>> {
        let pattern = format!("{}*", self.prefix);
        let tags = self.repo.list_tags(Some(&pattern))?;

        let mut details = Vec::with_capacity(tags.len());
        for tag in tags {
            details.push(self.repo.describe_tag(&tag)?);
        }
        Ok(details)
    }

    /// Push an existing tag to the named remote.
    pub fn push_tag(&self, remote: &str, tag: &str) -> Result<()> {
        if self.dry_run {
            return Ok(());
        }
        self.repo.push_tag(remote, tag)
    }
}
