//! Git operations abstraction layer
//!
//! The pipeline only talks to version control through the [Repository]
//! trait, so every stage can run against a real repository
//! ([repository::Git2Repository]) or an in-memory stand-in
//! ([mock::MockRepository]).
//!
//! # Usage
//!
//! ```rust
//! # use toolbox_release::git::Repository;
//! # use toolbox_release::domain::TagPattern;
//! # fn example<R: Repository>(repo: &R) -> toolbox_release::Result<()> {
//! if let Some(tag) = repo.latest_tag(&TagPattern::default())? {
//!     for commit in repo.commits_since(&tag)? {
//!         println!("{} {}", commit.hash, commit.subject);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::domain::{CommitEntry, TagPattern};
use crate::error::Result;
use std::collections::BTreeSet;
use std::path::Path;

/// Version-control operations used by the release pipeline.
///
/// Read operations feed the resolver and analyzer; write operations are
/// only used by the publisher, after every file has been rewritten.
///
/// Implementations map their native errors to [crate::error::ReleaseError].
pub trait Repository {
    /// Root of the working tree.
    fn workdir(&self) -> &Path;

    /// Most recent tag reachable from HEAD whose name follows `pattern`.
    ///
    /// # Returns
    /// * `Ok(Some(tag))` - The closest release tag
    /// * `Ok(None)` - No release tag exists in HEAD's history
    fn latest_tag(&self, pattern: &TagPattern) -> Result<Option<String>>;

    /// Non-merge commits reachable from HEAD but not from `tag`, newest first.
    fn commits_since(&self, tag: &str) -> Result<Vec<CommitEntry>>;

    /// Repository-relative paths that differ between `tag` and HEAD.
    fn changed_paths_since(&self, tag: &str) -> Result<BTreeSet<String>>;

    /// Name of the checked-out branch.
    ///
    /// # Returns
    /// * `Err` - If HEAD is detached
    fn current_branch(&self) -> Result<String>;

    /// URL of a remote, `None` if the remote is not configured.
    fn remote_url(&self, remote: &str) -> Result<Option<String>>;

    fn tag_exists(&self, name: &str) -> Result<bool>;

    /// Stage exactly `paths` and commit them on HEAD.
    ///
    /// # Returns
    /// * `Ok(hash)` - Full hash of the new commit
    fn commit_paths(&self, paths: &[String], message: &str) -> Result<String>;

    /// Create an annotated tag on HEAD. Never overwrites an existing tag.
    fn create_annotated_tag(&self, name: &str, message: &str) -> Result<()>;

    /// Push `branch` and `tag` to `remote` in one operation.
    fn push(&self, remote: &str, branch: &str, tag: &str) -> Result<()>;
}
