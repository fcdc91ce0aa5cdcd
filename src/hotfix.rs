//! Hotfix sequencing engine.
//!
//! Drives the hotfix track for a base tag: branch derivation, sequence
//! discovery and tag creation. The next sequence number is recomputed from
//! the live tag listing on every call - there is no stored counter, so a
//! partially failed run (e.g. tag created, push failed) converges to the
//! same answer when retried.

use crate::config::HotfixConfig;
use crate::domain::hotfix::{is_hotfix_version, parse_hotfix_version};
use crate::error::{GitReleaseError, Result};
use crate::git::Repository;
use regex::Regex;

/// Hotfix context derived from the currently checked out branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HotfixStatus {
    /// The hotfix branch name.
    pub branch: String,
    /// The base tag the branch was cut from.
    pub base_tag: String,
    /// Existing hotfix tags for this base, newest first.
    pub tags: Vec<String>,
    /// The tag the next bump would create.
    pub next_tag: String,
    /// The sequence number of the next bump.
    pub next_sequence: u64,
}

/// Hotfix operations against one repository.
pub struct HotfixEngine<'r> {
    repo: &'r dyn Repository,
    config: HotfixConfig,
    dry_run: bool,
}

impl<'r> HotfixEngine<'r> {
    pub fn new(repo: &'r dyn Repository, config: HotfixConfig, dry_run: bool) -> Self {
        HotfixEngine {
            repo,
            config,
            dry_run,
        }
    }

    /// The branch name for a base tag: branch prefix + base tag, verbatim.
    pub fn branch_name(&self, base_tag: &str) -> String {
        format!("{}{}", self.config.branch_prefix, base_tag)
    }

    /// Whether a branch name belongs to the hotfix namespace.
    pub fn is_hotfix_branch(&self, branch: &str) -> bool {
        branch.starts_with(&self.config.branch_prefix)
    }

    /// Extract the base tag from a hotfix branch name.
    /// `release/api/v1.0.0` with prefix `release/` yields `api/v1.0.0`.
    pub fn base_tag_from_branch(&self, branch: &str) -> Result<String> {
        branch
            .strip_prefix(&self.config.branch_prefix)
            .map(str::to_string)
            .ok_or_else(|| {
                GitReleaseError::validation(format!(
                    "branch '{}' does not match hotfix prefix '{}'",
                    branch, self.config.branch_prefix
                ))
            })
    }

    /// Ensure a tag is a valid hotfix base: it must exist and must not be a
    /// hotfix tag itself (hotfix-of-hotfix is rejected).
    pub fn validate_base_tag(&self, tag: &str) -> Result<()> {
        if !self.repo.tag_exists(tag)? {
            return Err(GitReleaseError::not_found(format!(
                "tag '{}' does not exist",
                tag
            )));
        }

        if is_hotfix_version(tag) {
            if let Ok(desc) = parse_hotfix_version(tag) {
                return Err(GitReleaseError::validation(format!(
                    "cannot create hotfix from hotfix version '{}'; use the base version instead: {}",
                    tag, desc.base
                )));
            }
            return Err(GitReleaseError::validation(format!(
                "cannot create hotfix from hotfix version '{}'",
                tag
            )));
        }

        Ok(())
    }

    /// Determine the next hotfix tag for a base tag.
    ///
    /// Lists the tags matching `<base>-<suffix>.*`, takes the highest
    /// trailing sequence number (0 when none exist, malformed tags are
    /// skipped) and returns the tag one past it together with its sequence.
    /// Calling this twice without creating the returned tag yields the same
    /// answer both times.
    pub fn next_tag(&self, base_tag: &str) -> Result<(String, u64)> {
        let stem = format!("{}-{}", base_tag, self.config.suffix);
        let pattern = format!("{}.*", stem);
        let tags = self.repo.list_tags(Some(&pattern))?;

        let sequence_re = Regex::new(&format!(r"^{}\.(\d+)$", regex::escape(&stem)))
            .map_err(|e| GitReleaseError::validation(format!("invalid hotfix pattern: {}", e)))?;

        let max_sequence = tags
            .iter()
            .filter_map(|tag| sequence_re.captures(tag))
            .filter_map(|captures| captures[1].parse::<u64>().ok())
            .max()
            .unwrap_or(0);

        let next_sequence = max_sequence + 1;
        let next_tag = format!("{}.{}", stem, next_sequence);

        Ok((next_tag, next_sequence))
    }

    /// Create the hotfix branch for a base tag and optionally check it out.
    ///
    /// The branch name collision is checked explicitly before creation so
    /// the caller gets an actionable error instead of a raw git failure.
    pub fn create_branch(&self, base_tag: &str, checkout: bool) -> Result<String> {
        let branch_name = self.branch_name(base_tag);

        if !self.repo.tag_exists(base_tag)? {
            return Err(GitReleaseError::not_found(format!(
                "tag '{}' does not exist",
                base_tag
            )));
        }

        if self.repo.branch_exists(&branch_name)? {
            return Err(GitReleaseError::already_exists(format!(
                "branch '{}'; check it out with: git checkout {}",
                branch_name, branch_name
            )));
        }

        if self.dry_run {
            return Ok(branch_name);
        }

        self.repo.create_branch(&branch_name, base_tag)?;

        if checkout {
            self.repo.checkout_branch(&branch_name)?;
        }

        Ok(branch_name)
    }

    /// Create the next hotfix tag for a base tag at HEAD.
    ///
    /// Returns the tag and its sequence. In dry-run mode the tag is
    /// computed but not created.
    pub fn bump(&self, base_tag: &str, message: Option<&str>) -> Result<(String, u64)> {
        let (tag, sequence) = self.next_tag(base_tag)?;

        if self.dry_run {
            return Ok((tag, sequence));
        }

        let default_message = format!("Hotfix {}", tag);
        self.repo
            .create_tag(&tag, message.unwrap_or(&default_message))?;

        Ok((tag, sequence))
    }

    /// Hotfix context for the currently checked out branch.
    ///
    /// Fails with a not-found error when the current branch is not a hotfix
    /// branch.
    pub fn status(&self) -> Result<HotfixStatus> {
        let branch = self.repo.current_branch()?;

        if !self.is_hotfix_branch(&branch) {
            return Err(GitReleaseError::not_found(format!(
                "not on a hotfix branch (current branch '{}' lacks prefix '{}')",
                branch, self.config.branch_prefix
            )));
        }

        let base_tag = self.base_tag_from_branch(&branch)?;
        let pattern = format!("{}-{}.*", base_tag, self.config.suffix);
        let tags = self.repo.list_tags(Some(&pattern))?;
        let (next_tag, next_sequence) = self.next_tag(&base_tag)?;

        Ok(HotfixStatus {
            branch,
            base_tag,
            tags,
            next_tag,
            next_sequence,
        })
    }
}
