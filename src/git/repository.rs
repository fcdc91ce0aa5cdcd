use crate::error::{GitReleaseError, Result};
use crate::git::{compare_tags_version_desc, TagDescriptor};
use chrono::{TimeZone, Utc};
use git2::{BranchType, Repository as Git2Repo};
use std::path::Path;

/// Wrapper around git2::Repository implementing the [super::Repository] trait
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository at or above the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository { repo })
    }

    /// Create from an existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }

    fn head_commit_id(&self) -> Result<git2::Oid> {
        let head = self.repo.head()?;
        let commit = head.peel_to_commit()?;
        Ok(commit.id())
    }
}

impl super::Repository for Git2Repository {
    fn list_tags(&self, pattern: Option<&str>) -> Result<Vec<String>> {
        let names = self.repo.tag_names(pattern)?;
        let mut tags: Vec<String> = names.iter().flatten().map(str::to_string).collect();

        tags.sort_by(|a, b| compare_tags_version_desc(a, b));
        Ok(tags)
    }

    fn tag_exists(&self, name: &str) -> Result<bool> {
        let reference_name = format!("refs/tags/{}", name);

        match self.repo.find_reference(&reference_name) {
            Ok(_) => Ok(true),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn create_tag(&self, name: &str, message: &str) -> Result<()> {
        if self.tag_exists(name)? {
            return Err(GitReleaseError::already_exists(format!("tag '{}'", name)));
        }

        let head = self.repo.head()?.peel_to_commit()?;
        let signature = self.repo.signature()?;

        self.repo
            .tag(name, head.as_object(), &signature, message, false)?;

        Ok(())
    }

    fn describe_tag(&self, name: &str) -> Result<TagDescriptor> {
        let reference_name = format!("refs/tags/{}", name);
        let reference = self.repo.find_reference(&reference_name).map_err(|e| {
            if e.code() == git2::ErrorCode::NotFound {
                GitReleaseError::not_found(format!("tag '{}'", name))
            } else {
                e.into()
            }
        })?;

        let commit = reference.peel_to_commit()?;
        let created_at = Utc.timestamp_opt(commit.time().seconds(), 0).single();

        Ok(TagDescriptor {
            tag: name.to_string(),
            commit: commit.id().to_string(),
            created_at,
            message: commit.summary().unwrap_or_default().to_string(),
        })
    }

    fn create_branch(&self, name: &str, target: &str) -> Result<()> {
        if self.branch_exists(name)? {
            return Err(GitReleaseError::already_exists(format!("branch '{}'", name)));
        }

        let object = self.repo.revparse_single(target).map_err(|e| {
            if e.code() == git2::ErrorCode::NotFound {
                GitReleaseError::not_found(format!("ref '{}'", target))
            } else {
                e.into()
            }
        })?;
        let commit = object
            .peel(git2::ObjectType::Commit)?
            .into_commit()
            .map_err(|_| {
                GitReleaseError::validation(format!("ref '{}' does not point at a commit", target))
            })?;

        self.repo.branch(name, &commit, false)?;
        Ok(())
    }

    fn checkout_branch(&self, name: &str) -> Result<()> {
        let reference_name = format!("refs/heads/{}", name);
        self.repo.set_head(&reference_name)?;

        let mut checkout = git2::build::CheckoutBuilder::new();
        checkout.safe();
        self.repo.checkout_head(Some(&mut checkout))?;

        Ok(())
    }

    fn branch_exists(&self, name: &str) -> Result<bool> {
        match self.repo.find_branch(name, BranchType::Local) {
            Ok(_) => Ok(true),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn list_branches(&self) -> Result<Vec<String>> {
        let mut branches = Vec::new();

        for entry in self.repo.branches(Some(BranchType::Local))? {
            let (branch, _) = entry?;
            if let Some(name) = branch.name()? {
                branches.push(name.to_string());
            }
        }

        Ok(branches)
    }

    fn current_branch(&self) -> Result<String> {
        let head = self.repo.head()?;
        Ok(head.shorthand().unwrap_or("HEAD").to_string())
    }

    fn short_commit(&self) -> Result<String> {
        let object = self.repo.revparse_single("HEAD")?;
        let buf = object.short_id()?;
        Ok(buf.as_str().unwrap_or_default().to_string())
    }

    fn is_working_tree_dirty(&self) -> Result<bool> {
        let mut options = git2::StatusOptions::new();
        options.include_untracked(true);

        let statuses = self.repo.statuses(Some(&mut options))?;
        Ok(!statuses.is_empty())
    }

    fn is_tag_at_head(&self, tag: &str) -> Result<bool> {
        if tag.is_empty() {
            return Ok(false);
        }

        // A tag that does not resolve is reported as "not at HEAD", not as
        // an error, so display paths keep working on odd repository states.
        let tag_commit = match self.repo.revparse_single(&format!("{}^{{}}", tag)) {
            Ok(object) => object.id(),
            Err(_) => return Ok(false),
        };

        Ok(tag_commit == self.head_commit_id()?)
    }

    fn push_tag(&self, remote: &str, tag: &str) -> Result<()> {
        let mut remote = self
            .repo
            .find_remote(remote)
            .map_err(|e| GitReleaseError::remote(format!("cannot find remote: {}", e)))?;

        let mut push_options = git2::PushOptions::new();

        let mut callbacks = git2::RemoteCallbacks::new();
        callbacks.credentials(|_url, username_from_url, allowed_types| {
            if allowed_types.contains(git2::CredentialType::SSH_KEY) {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                let key_paths = vec![
                    format!("{}/.ssh/id_ed25519", home),
                    format!("{}/.ssh/id_rsa", home),
                    format!("{}/.ssh/id_ecdsa", home),
                ];

                for key_path in key_paths {
                    let path = std::path::Path::new(&key_path);
                    if path.exists() {
                        if let Ok(cred) = git2::Cred::ssh_key(
                            username_from_url.unwrap_or("git"),
                            None,
                            path,
                            None,
                        ) {
                            return Ok(cred);
                        }
                    }
                }

                if let Ok(cred) = git2::Cred::ssh_key_from_agent(username_from_url.unwrap_or("git"))
                {
                    return Ok(cred);
                }
            }

            git2::Cred::default()
        });

        push_options.remote_callbacks(callbacks);

        let refspec = format!("refs/tags/{}:refs/tags/{}", tag, tag);
        remote
            .push(&[refspec.as_str()], Some(&mut push_options))
            .map_err(|e| GitReleaseError::remote(format!("push failed: {}", e)))?;

        Ok(())
    }
}

// SAFETY: Git2Repository wraps git2::Repository which is Send.
// git2 is thread-safe for read operations via libgit2's thread-safe design.
unsafe impl Sync for Git2Repository {}
