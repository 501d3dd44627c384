use crate::domain::CommitEntry;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Top-level directories whose churn drives release-note bullets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WatchedDir {
    Snippets,
    Syntaxes,
    Completions,
}

impl WatchedDir {
    pub const ALL: [WatchedDir; 3] = [
        WatchedDir::Snippets,
        WatchedDir::Syntaxes,
        WatchedDir::Completions,
    ];
}

impl fmt::Display for WatchedDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WatchedDir::Snippets => "snippets",
            WatchedDir::Syntaxes => "syntaxes",
            WatchedDir::Completions => "completions",
        };
        f.write_str(name)
    }
}

/// Number of touched (or, for an initial release, existing) files per
/// watched directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryCounts(BTreeMap<WatchedDir, usize>);

impl DirectoryCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, dir: WatchedDir, count: usize) -> Self {
        self.set(dir, count);
        self
    }

    pub fn set(&mut self, dir: WatchedDir, count: usize) {
        self.0.insert(dir, count);
    }

    pub fn get(&self, dir: WatchedDir) -> usize {
        self.0.get(&dir).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (WatchedDir, usize)> + '_ {
        WatchedDir::ALL.into_iter().map(|dir| (dir, self.get(dir)))
    }
}

/// Everything the analyzer captured about one release range.
///
/// Built once per run and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeSet {
    pub previous_tag: Option<String>,
    /// Newest first, as `git log` lists them
    pub commits: Vec<CommitEntry>,
    pub changed_paths: BTreeSet<String>,
    pub directory_counts: DirectoryCounts,
}

impl ChangeSet {
    /// No prior release tag: the data is synthesized from the working tree.
    pub fn is_initial_release(&self) -> bool {
        self.previous_tag.is_none()
    }

    pub fn subjects(&self) -> Vec<&str> {
        self.commits.iter().map(|c| c.subject.as_str()).collect()
    }
}
