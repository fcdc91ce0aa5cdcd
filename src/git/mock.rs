use crate::error::{GitReleaseError, Result};
use crate::git::{compare_tags_version_desc, Repository, TagDescriptor};
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

/// In-memory repository state for testing without git on disk.
#[derive(Debug, Default)]
struct MockState {
    tags: Vec<String>,
    tag_messages: HashMap<String, String>,
    branches: Vec<String>,
    current_branch: String,
    short_commit: String,
    dirty: bool,
    tags_at_head: HashSet<String>,
    pushed: Vec<(String, String)>,
}

/// Mock repository for testing engine behavior without actual git operations.
///
/// State lives behind a mutex so tests can mutate it through the shared
/// reference the engines hold.
pub struct MockRepository {
    state: Mutex<MockState>,
}

impl MockRepository {
    /// Create a mock repository on branch "main" with no tags
    pub fn new() -> Self {
        MockRepository {
            state: Mutex::new(MockState {
                branches: vec!["main".to_string()],
                current_branch: "main".to_string(),
                short_commit: "abc1234".to_string(),
                ..MockState::default()
            }),
        }
    }

    /// Create a mock repository pre-seeded with tags
    pub fn with_tags(tags: &[&str]) -> Self {
        let repo = Self::new();
        for tag in tags {
            repo.add_tag(*tag);
        }
        repo
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Add a tag without going through create_tag's collision check
    pub fn add_tag(&self, name: impl Into<String>) {
        self.lock().tags.push(name.into());
    }

    /// Add a local branch
    pub fn add_branch(&self, name: impl Into<String>) {
        self.lock().branches.push(name.into());
    }

    /// Set the currently checked out branch name
    pub fn set_current_branch(&self, name: impl Into<String>) {
        self.lock().current_branch = name.into();
    }

    /// Set the short HEAD commit hash
    pub fn set_short_commit(&self, hash: impl Into<String>) {
        self.lock().short_commit = hash.into();
    }

    /// Mark the working tree dirty or clean
    pub fn set_dirty(&self, dirty: bool) {
        self.lock().dirty = dirty;
    }

    /// Mark a tag as pointing at the current HEAD
    pub fn set_tag_at_head(&self, tag: impl Into<String>) {
        self.lock().tags_at_head.insert(tag.into());
    }

    /// Tags pushed so far, as (remote, tag) pairs
    pub fn pushed_tags(&self) -> Vec<(String, String)> {
        self.lock().pushed.clone()
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

/// Minimal glob matching: `*` matches any run of characters. This covers
/// the patterns the engines produce (`<prefix>*`, `<base>-<suffix>.*`).
fn glob_match(pattern: &str, s: &str) -> bool {
    let segments: Vec<&str> = pattern.split('*').collect();
    if segments.len() == 1 {
        return pattern == s;
    }

    let first = segments[0];
    let last = segments[segments.len() - 1];

    if !s.starts_with(first) {
        return false;
    }

    let mut pos = first.len();
    for segment in &segments[1..segments.len() - 1] {
        if segment.is_empty() {
            continue;
        }
        match s[pos..].find(segment) {
            Some(offset) => pos += offset + segment.len(),
            None => return false,
        }
    }

    if last.is_empty() {
        return true;
    }

    s.len() >= pos + last.len() && s.ends_with(last)
}

impl Repository for MockRepository {
    fn list_tags(&self, pattern: Option<&str>) -> Result<Vec<String>> {
        let state = self.lock();
        let mut tags: Vec<String> = state
            .tags
            .iter()
            .filter(|tag| pattern.map_or(true, |p| glob_match(p, tag)))
            .cloned()
            .collect();

        tags.sort_by(|a, b| compare_tags_version_desc(a, b));
        Ok(tags)
    }

    fn tag_exists(&self, name: &str) -> Result<bool> {
        Ok(self.lock().tags.iter().any(|t| t == name))
    }

    fn create_tag(&self, name: &str, message: &str) -> Result<()> {
        let mut state = self.lock();
        if state.tags.iter().any(|t| t == name) {
            return Err(GitReleaseError::already_exists(format!("tag '{}'", name)));
        }

        state.tags.push(name.to_string());
        state
            .tag_messages
            .insert(name.to_string(), message.to_string());
        Ok(())
    }

    fn describe_tag(&self, name: &str) -> Result<TagDescriptor> {
        let state = self.lock();
        if !state.tags.iter().any(|t| t == name) {
            return Err(GitReleaseError::not_found(format!("tag '{}'", name)));
        }

        Ok(TagDescriptor {
            tag: name.to_string(),
            commit: state.short_commit.clone(),
            created_at: None,
            message: state.tag_messages.get(name).cloned().unwrap_or_default(),
        })
    }

    fn create_branch(&self, name: &str, target: &str) -> Result<()> {
        let mut state = self.lock();
        if state.branches.iter().any(|b| b == name) {
            return Err(GitReleaseError::already_exists(format!("branch '{}'", name)));
        }
        if !state.tags.iter().any(|t| t == target) && !state.branches.iter().any(|b| b == target) {
            return Err(GitReleaseError::not_found(format!("ref '{}'", target)));
        }

        state.branches.push(name.to_string());
        Ok(())
    }

    fn checkout_branch(&self, name: &str) -> Result<()> {
        let mut state = self.lock();
        if !state.branches.iter().any(|b| b == name) {
            return Err(GitReleaseError::not_found(format!("branch '{}'", name)));
        }

        state.current_branch = name.to_string();
        Ok(())
    }

    fn branch_exists(&self, name: &str) -> Result<bool> {
        Ok(self.lock().branches.iter().any(|b| b == name))
    }

    fn list_branches(&self) -> Result<Vec<String>> {
        Ok(self.lock().branches.clone())
    }

    fn current_branch(&self) -> Result<String> {
        Ok(self.lock().current_branch.clone())
    }

    fn short_commit(&self) -> Result<String> {
        Ok(self.lock().short_commit.clone())
    }

    fn is_working_tree_dirty(&self) -> Result<bool> {
        Ok(self.lock().dirty)
    }

    fn is_tag_at_head(&self, tag: &str) -> Result<bool> {
        Ok(self.lock().tags_at_head.contains(tag))
    }

    fn push_tag(&self, remote: &str, tag: &str) -> Result<()> {
        self.lock()
            .pushed
            .push((remote.to_string(), tag.to_string()));
        Ok(())
    }
}
