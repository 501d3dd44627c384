use crate::domain::{CommitEntry, TagPattern};
use crate::error::{ReleaseError, Result};
use crate::git::Repository;
use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

/// A commit recorded by [MockRepository::commit_paths].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCommit {
    pub paths: Vec<String>,
    pub message: String,
}

/// Mock repository for testing without actual git operations
///
/// History is scripted up front; write operations are recorded so tests can
/// assert on what the publisher did.
pub struct MockRepository {
    workdir: PathBuf,
    branch: String,
    tags: RefCell<BTreeSet<String>>,
    commits: Vec<CommitEntry>,
    changed_paths: BTreeSet<String>,
    remotes: HashMap<String, String>,
    fail_push: bool,
    recorded_commits: RefCell<Vec<RecordedCommit>>,
    annotated_tags: RefCell<Vec<(String, String)>>,
    pushes: RefCell<Vec<(String, String, String)>>,
}

impl MockRepository {
    /// Create a mock whose working tree is `workdir`, on branch `main`
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        MockRepository {
            workdir: workdir.into(),
            branch: "main".to_string(),
            tags: RefCell::new(BTreeSet::new()),
            commits: Vec::new(),
            changed_paths: BTreeSet::new(),
            remotes: HashMap::new(),
            fail_push: false,
            recorded_commits: RefCell::new(Vec::new()),
            annotated_tags: RefCell::new(Vec::new()),
            pushes: RefCell::new(Vec::new()),
        }
    }

    /// Add an existing tag reachable from HEAD
    pub fn add_tag(&mut self, name: impl Into<String>) {
        self.tags.get_mut().insert(name.into());
    }

    /// Add a commit after the latest tag; call newest first
    pub fn add_commit(&mut self, commit: CommitEntry) {
        self.commits.push(commit);
    }

    pub fn add_changed_path(&mut self, path: impl Into<String>) {
        self.changed_paths.insert(path.into());
    }

    pub fn set_branch(&mut self, branch: impl Into<String>) {
        self.branch = branch.into();
    }

    pub fn add_remote(&mut self, name: impl Into<String>, url: impl Into<String>) {
        self.remotes.insert(name.into(), url.into());
    }

    /// Make every subsequent push fail with a network error
    pub fn fail_pushes(&mut self) {
        self.fail_push = true;
    }

    pub fn recorded_commits(&self) -> Vec<RecordedCommit> {
        self.recorded_commits.borrow().clone()
    }

    pub fn annotated_tags(&self) -> Vec<(String, String)> {
        self.annotated_tags.borrow().clone()
    }

    pub fn pushes(&self) -> Vec<(String, String, String)> {
        self.pushes.borrow().clone()
    }
}

impl Repository for MockRepository {
    fn workdir(&self) -> &Path {
        &self.workdir
    }

    fn latest_tag(&self, pattern: &TagPattern) -> Result<Option<String>> {
        Ok(self
            .tags
            .borrow()
            .iter()
            .filter_map(|name| pattern.parse(name).map(|version| (version, name.clone())))
            .max()
            .map(|(_, name)| name))
    }

    fn commits_since(&self, tag: &str) -> Result<Vec<CommitEntry>> {
        if !self.tags.borrow().contains(tag) {
            return Err(ReleaseError::tag(format!("Cannot find tag '{}'", tag)));
        }
        Ok(self.commits.clone())
    }

    fn changed_paths_since(&self, tag: &str) -> Result<BTreeSet<String>> {
        if !self.tags.borrow().contains(tag) {
            return Err(ReleaseError::tag(format!("Cannot find tag '{}'", tag)));
        }
        Ok(self.changed_paths.clone())
    }

    fn current_branch(&self) -> Result<String> {
        Ok(self.branch.clone())
    }

    fn remote_url(&self, remote: &str) -> Result<Option<String>> {
        Ok(self.remotes.get(remote).cloned())
    }

    fn tag_exists(&self, name: &str) -> Result<bool> {
        Ok(self.tags.borrow().contains(name))
    }

    fn commit_paths(&self, paths: &[String], message: &str) -> Result<String> {
        let mut commits = self.recorded_commits.borrow_mut();
        commits.push(RecordedCommit {
            paths: paths.to_vec(),
            message: message.to_string(),
        });
        Ok(format!("{:040x}", commits.len()))
    }

    fn create_annotated_tag(&self, name: &str, message: &str) -> Result<()> {
        if !self.tags.borrow_mut().insert(name.to_string()) {
            return Err(ReleaseError::tag(format!("Tag '{}' already exists", name)));
        }
        self.annotated_tags
            .borrow_mut()
            .push((name.to_string(), message.to_string()));
        Ok(())
    }

    fn push(&self, remote: &str, branch: &str, tag: &str) -> Result<()> {
        if self.fail_push {
            return Err(ReleaseError::remote("Network error during push: mock"));
        }
        if !self.remotes.contains_key(remote) {
            return Err(ReleaseError::remote(format!("Cannot find remote '{}'", remote)));
        }
        self.pushes
            .borrow_mut()
            .push((remote.to_string(), branch.to_string(), tag.to_string()));
        Ok(())
    }
}
