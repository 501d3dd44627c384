use crate::domain::{short_hash, CommitEntry, TagPattern, Version};
use crate::error::{ReleaseError, Result};
use git2::{Oid, Repository as Git2Repo, Sort};
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
    workdir: PathBuf,
    https_token: Option<String>,
}

impl Git2Repository {
    /// Open or discover a non-bare git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;
        Self::from_git2(repo)
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Result<Self> {
        let workdir = repo
            .workdir()
            .map(Path::to_path_buf)
            .ok_or_else(|| ReleaseError::config("Cannot release from a bare repository"))?;

        Ok(Git2Repository {
            repo,
            workdir,
            https_token: None,
        })
    }

    /// Token offered as HTTPS password when pushing.
    pub fn with_https_token(mut self, token: Option<String>) -> Self {
        self.https_token = token;
        self
    }

    fn head_commit(&self) -> Result<git2::Commit<'_>> {
        let head = self
            .repo
            .head()
            .map_err(|e| ReleaseError::tag(format!("Repository has no HEAD commit: {}", e)))?;
        Ok(head.peel_to_commit()?)
    }

    fn tag_commit(&self, tag_name: &str) -> Result<git2::Commit<'_>> {
        let reference = self
            .repo
            .find_reference(&format!("refs/tags/{}", tag_name))
            .map_err(|e| ReleaseError::tag(format!("Cannot find tag '{}': {}", tag_name, e)))?;

        reference
            .peel_to_commit()
            .map_err(|e| ReleaseError::tag(format!("Tag '{}' does not point at a commit: {}", tag_name, e)))
    }

    fn push_callbacks(&self) -> git2::RemoteCallbacks<'_> {
        let mut callbacks = git2::RemoteCallbacks::new();
        let token = self.https_token.clone();

        callbacks.credentials(move |_url, username_from_url, allowed_types| {
            if allowed_types.contains(git2::CredentialType::SSH_KEY) {
                let username = username_from_url.unwrap_or("git");
                if let Some(home) = dirs::home_dir() {
                    for key in ["id_ed25519", "id_rsa", "id_ecdsa"] {
                        let path = home.join(".ssh").join(key);
                        if path.exists() {
                            if let Ok(cred) = git2::Cred::ssh_key(username, None, &path, None) {
                                return Ok(cred);
                            }
                        }
                    }
                }
                if let Ok(cred) = git2::Cred::ssh_key_from_agent(username) {
                    return Ok(cred);
                }
            }

            if allowed_types.contains(git2::CredentialType::USER_PASS_PLAINTEXT) {
                if let Some(token) = token.as_deref() {
                    return git2::Cred::userpass_plaintext("x-access-token", token);
                }
            }

            git2::Cred::default()
        });

        callbacks.push_update_reference(|refname, status| match status {
            Some(reason) => Err(git2::Error::from_str(&format!(
                "Remote rejected {}: {}",
                refname, reason
            ))),
            None => Ok(()),
        });

        callbacks
    }
}

impl super::Repository for Git2Repository {
    fn workdir(&self) -> &Path {
        &self.workdir
    }

    fn latest_tag(&self, pattern: &TagPattern) -> Result<Option<String>> {
        // Several release tags may share a commit; the highest version wins.
        let mut tagged: HashMap<Oid, (Version, String)> = HashMap::new();
        let tags = self.repo.tag_names(None)?;

        for name in tags.iter().flatten() {
            let Some(version) = pattern.parse(name) else {
                continue;
            };
            let Ok(reference) = self.repo.find_reference(&format!("refs/tags/{}", name)) else {
                continue;
            };
            let Ok(commit) = reference.peel_to_commit() else {
                continue;
            };

            let candidate = (version, name.to_string());
            tagged
                .entry(commit.id())
                .and_modify(|best| {
                    if candidate.0 > best.0 {
                        *best = candidate.clone();
                    }
                })
                .or_insert_with(|| candidate.clone());
        }

        if tagged.is_empty() {
            return Ok(None);
        }

        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        revwalk.push(self.head_commit()?.id())?;

        for oid in revwalk {
            if let Some((_, name)) = tagged.get(&oid?) {
                return Ok(Some(name.clone()));
            }
        }

        Ok(None)
    }

    fn commits_since(&self, tag: &str) -> Result<Vec<CommitEntry>> {
        let since = self.tag_commit(tag)?.id();

        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        revwalk.push(self.head_commit()?.id())?;
        revwalk.hide(since)?;

        let mut commits = Vec::new();
        for oid in revwalk {
            let oid = oid?;
            let commit = self.repo.find_commit(oid)?;
            if commit.parent_count() > 1 {
                continue;
            }
            let message = String::from_utf8_lossy(commit.message_bytes()).into_owned();
            commits.push(CommitEntry::from_message(short_hash(&oid.to_string()), &message));
        }

        Ok(commits)
    }

    fn changed_paths_since(&self, tag: &str) -> Result<BTreeSet<String>> {
        let old_tree = self.tag_commit(tag)?.tree()?;
        let new_tree = self.head_commit()?.tree()?;
        let diff = self
            .repo
            .diff_tree_to_tree(Some(&old_tree), Some(&new_tree), None)?;

        let mut paths = BTreeSet::new();
        for delta in diff.deltas() {
            for file in [delta.old_file(), delta.new_file()] {
                if let Some(path) = file.path() {
                    paths.insert(path.to_string_lossy().replace('\\', "/"));
                }
            }
        }

        Ok(paths)
    }

    fn current_branch(&self) -> Result<String> {
        let head = self.repo.head()?;
        if !head.is_branch() {
            return Err(ReleaseError::config(
                "HEAD is detached; check out the release branch first",
            ));
        }
        head.shorthand()
            .map(str::to_string)
            .ok_or_else(|| ReleaseError::config("Branch name is not valid UTF-8"))
    }

    fn remote_url(&self, remote: &str) -> Result<Option<String>> {
        match self.repo.find_remote(remote) {
            Ok(found) => Ok(found.url().map(str::to_string)),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn tag_exists(&self, name: &str) -> Result<bool> {
        match self.repo.find_reference(&format!("refs/tags/{}", name)) {
            Ok(_) => Ok(true),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn commit_paths(&self, paths: &[String], message: &str) -> Result<String> {
        let mut index = self.repo.index()?;
        for path in paths {
            let relative = Path::new(path);
            if self.workdir.join(relative).exists() {
                index.add_path(relative)?;
            } else {
                index.remove_path(relative)?;
            }
        }
        index.write()?;

        let tree = self.repo.find_tree(index.write_tree()?)?;
        let signature = self.repo.signature()?;
        let parent = self.head_commit()?;

        let oid = self.repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &[&parent],
        )?;

        Ok(oid.to_string())
    }

    fn create_annotated_tag(&self, name: &str, message: &str) -> Result<()> {
        if self.tag_exists(name)? {
            return Err(ReleaseError::tag(format!(
                "Tag '{}' already exists; delete it manually before re-running",
                name
            )));
        }

        let target = self.head_commit()?;
        let signature = self.repo.signature()?;
        self.repo
            .tag(name, target.as_object(), &signature, message, false)
            .map_err(|e| ReleaseError::tag(format!("Cannot create tag '{}': {}", name, e)))?;

        Ok(())
    }

    fn push(&self, remote: &str, branch: &str, tag: &str) -> Result<()> {
        let mut remote_handle = self
            .repo
            .find_remote(remote)
            .map_err(|e| ReleaseError::remote(format!("Cannot find remote '{}': {}", remote, e)))?;

        let mut push_options = git2::PushOptions::new();
        push_options.remote_callbacks(self.push_callbacks());

        let refspecs = [
            format!("refs/heads/{0}:refs/heads/{0}", branch),
            format!("refs/tags/{0}:refs/tags/{0}", tag),
        ];

        remote_handle
            .push(&refspecs, Some(&mut push_options))
            .map_err(|e| match e.class() {
                git2::ErrorClass::Net => {
                    ReleaseError::remote(format!("Network error during push: {}", e))
                }
                _ => ReleaseError::remote(format!("Push to '{}' failed: {}", remote, e)),
            })
    }
}
