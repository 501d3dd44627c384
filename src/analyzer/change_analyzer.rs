use crate::config::PathsConfig;
use crate::domain::{ChangeSet, CommitEntry, DirectoryCounts, WatchedDir};
use crate::error::Result;
use crate::git::Repository;
use std::collections::BTreeSet;
use std::path::Path;
use walkdir::{DirEntry, WalkDir};

/// Extensions that mark a file as package configuration when there is no
/// previous release to diff against.
const CONFIG_EXTENSIONS: &[&str] = &["json", "tmPreferences", "yaml", "yml", "py"];

/// Builds the [ChangeSet] for one release run.
pub struct ChangeAnalyzer<'a> {
    paths: &'a PathsConfig,
}

impl<'a> ChangeAnalyzer<'a> {
    pub fn new(paths: &'a PathsConfig) -> Self {
        ChangeAnalyzer { paths }
    }

    /// Collect commits, touched paths and per-directory counts.
    ///
    /// With a previous tag the data comes from history (`tag..HEAD`, merges
    /// excluded). Without one the run is an initial release: the commit list
    /// is a single placeholder and paths and counts come from scanning the
    /// working tree.
    pub fn analyze<R: Repository + ?Sized>(
        &self,
        repo: &R,
        previous_tag: Option<&str>,
    ) -> Result<ChangeSet> {
        match previous_tag {
            Some(tag) => self.analyze_range(repo, tag),
            None => Ok(self.analyze_initial(repo.workdir())),
        }
    }

    fn analyze_range<R: Repository + ?Sized>(&self, repo: &R, tag: &str) -> Result<ChangeSet> {
        let commits = repo.commits_since(tag)?;
        let changed_paths = repo.changed_paths_since(tag)?;

        let mut directory_counts = DirectoryCounts::new();
        for dir in WatchedDir::ALL {
            let name = self.paths.watched(dir);
            let count = changed_paths
                .iter()
                .filter(|path| top_level_dir(path) == Some(name))
                .count();
            directory_counts.set(dir, count);
        }

        Ok(ChangeSet {
            previous_tag: Some(tag.to_string()),
            commits,
            changed_paths,
            directory_counts,
        })
    }

    fn analyze_initial(&self, root: &Path) -> ChangeSet {
        let changed_paths = self
            .walk(root)
            .filter(|entry| is_config_file(entry.path()))
            .filter_map(|entry| relative_path(root, entry.path()))
            .collect::<BTreeSet<_>>();

        let mut directory_counts = DirectoryCounts::new();
        for dir in WatchedDir::ALL {
            let dir_path = root.join(self.paths.watched(dir));
            let count = if dir_path.is_dir() {
                self.walk(&dir_path).count()
            } else {
                0
            };
            directory_counts.set(dir, count);
        }

        ChangeSet {
            previous_tag: None,
            commits: vec![CommitEntry::placeholder()],
            changed_paths,
            directory_counts,
        }
    }

    /// Regular files below `root`, skipping VCS metadata and build output.
    fn walk(&self, root: &Path) -> impl Iterator<Item = DirEntry> {
        let dist_dir = self.paths.dist_dir.trim_end_matches('/').to_string();
        WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |entry| {
                if entry.depth() == 0 || !entry.file_type().is_dir() {
                    return true;
                }
                let name = entry.file_name().to_string_lossy();
                name != ".git" && name != "target" && name != dist_dir.as_str()
            })
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
    }
}

fn top_level_dir(path: &str) -> Option<&str> {
    path.split_once('/').map(|(dir, _)| dir)
}

fn is_config_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.starts_with("sublime-") || CONFIG_EXTENSIONS.contains(&ext))
        .unwrap_or(false)
}

fn relative_path(root: &Path, path: &Path) -> Option<String> {
    path.strip_prefix(root)
        .ok()
        .map(|relative| relative.to_string_lossy().replace('\\', "/"))
}
