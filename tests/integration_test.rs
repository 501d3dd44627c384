// tests/integration_test.rs
use std::process::Command;

#[test]
fn test_toolbox_release_help() {
    let output = Command::new("cargo")
        .args(["run", "--quiet", "--bin", "toolbox-release", "--", "--help"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("toolbox-release"));
    assert!(stdout.contains("release"));
    assert!(stdout.contains("validate"));
    assert!(stdout.contains("notes"));
}

#[test]
fn test_toolbox_release_version() {
    let output = Command::new("cargo")
        .args(["run", "--quiet", "--bin", "toolbox-release", "--", "--version"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("toolbox-release "));
}

#[test]
fn test_malformed_version_exits_nonzero() {
    let output = Command::new("cargo")
        .args(["run", "--quiet", "--bin", "toolbox-release", "--", "release", "1.3"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("ERROR:"));
    assert!(stderr.contains("1.3"));
}

#[test]
fn test_validate_from_subdirectory_checks_repository_root() {
    let dir = tempfile::TempDir::new().unwrap();
    git2::Repository::init(dir.path()).unwrap();
    std::fs::write(
        dir.path().join("package.json"),
        r#"{"name": "nunjucks-toolbox", "version": "1.2.0", "description": "Nunjucks support"}"#,
    )
    .unwrap();
    std::fs::write(dir.path().join("messages.json"), r#"{"install": "messages/install.txt"}"#).unwrap();
    let snippets = dir.path().join("Snippets");
    std::fs::create_dir_all(&snippets).unwrap();

    let output = Command::new("cargo")
        .args([
            "run",
            "--quiet",
            "--manifest-path",
            concat!(env!("CARGO_MANIFEST_DIR"), "/Cargo.toml"),
            "--bin",
            "toolbox-release",
            "--",
            "validate",
        ])
        .current_dir(&snippets)
        .output()
        .expect("Failed to execute command");

    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(output.status.success(), "validate failed: {}", stderr);
    assert!(!stderr.contains("ERROR:"));
}

#[cfg(test)]
mod git_operations_tests {
    use git2::{Oid, Repository, Signature};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;
    use toolbox_release::domain::TagPattern;
    use toolbox_release::git::{Git2Repository, Repository as _};
    use toolbox_release::ReleaseError;

    fn signature() -> Signature<'static> {
        Signature::now("Test User", "test@example.com").expect("Could not create signature")
    }

    /// Write `files`, stage them and commit with the given parents.
    fn commit_files(
        repo: &Repository,
        files: &[(&str, &str)],
        message: &str,
        parents: &[Oid],
        update_head: bool,
    ) -> Oid {
        let workdir = repo.workdir().unwrap().to_path_buf();
        let mut index = repo.index().expect("Could not get index");
        for (path, content) in files {
            let full = workdir.join(path);
            fs::create_dir_all(full.parent().unwrap()).unwrap();
            fs::write(&full, content).expect("Could not write file");
            index.add_path(Path::new(path)).expect("Could not add file to index");
        }
        index.write().expect("Could not write index");

        let tree = repo
            .find_tree(index.write_tree().expect("Could not write tree"))
            .expect("Could not find tree");
        let parents: Vec<git2::Commit> = parents
            .iter()
            .map(|oid| repo.find_commit(*oid).unwrap())
            .collect();
        let parent_refs: Vec<&git2::Commit> = parents.iter().collect();

        repo.commit(
            if update_head { Some("HEAD") } else { None },
            &signature(),
            &signature(),
            message,
            &tree,
            &parent_refs,
        )
        .expect("Could not create commit")
    }

    struct Fixture {
        dir: TempDir,
        base: Oid,
    }

    /// History: base (v1.0.0, v0.9.0) <- feat <- fix <- merge(fix, base)
    /// plus an unreachable commit tagged v2.0.0.
    fn setup_test_repo() -> Fixture {
        let dir = TempDir::new().expect("Could not create temp dir");
        let repo = Repository::init(dir.path()).expect("Could not init git repo");
        {
            let mut config = repo.config().expect("Could not get config");
            config.set_str("user.name", "Test User").unwrap();
            config.set_str("user.email", "test@example.com").unwrap();
        }

        let base = commit_files(
            &repo,
            &[("README.md", "# Toolbox 1.0.0\n"), ("package.json", "{}\n")],
            "Initial commit",
            &[],
            true,
        );
        let base_object = repo.find_object(base, None).unwrap();
        repo.tag("v1.0.0", &base_object, &signature(), "Release v1.0.0", false)
            .expect("Could not create annotated tag");
        repo.tag_lightweight("v0.9.0", &base_object, false).unwrap();

        let feat = commit_files(
            &repo,
            &[("Snippets/loop.sublime-snippet", "<snippet/>")],
            "feat: add loop snippet",
            &[base],
            true,
        );
        let fix = commit_files(
            &repo,
            &[("Syntaxes/Nunjucks.sublime-syntax", "name: Nunjucks\n")],
            "fix: correct regex\n\nEscape the closing brace.\n",
            &[feat],
            true,
        );
        let merge = {
            let tree = repo.find_commit(fix).unwrap().tree().unwrap();
            let parents = [&repo.find_commit(fix).unwrap(), &repo.find_commit(base).unwrap()];
            repo.commit(Some("HEAD"), &signature(), &signature(), "Merge branch 'side'", &tree, &parents)
                .unwrap()
        };
        repo.tag_lightweight("nightly", &repo.find_object(merge, None).unwrap(), false)
            .unwrap();

        let stray = commit_files(&repo, &[], "unreleased experiment", &[base], false);
        repo.tag_lightweight("v2.0.0", &repo.find_object(stray, None).unwrap(), false)
            .unwrap();

        Fixture { dir, base }
    }

    #[test]
    fn test_open_discovers_from_subdirectory() {
        let fixture = setup_test_repo();
        let repo = Git2Repository::open(fixture.dir.path().join("Snippets"))
            .expect("open() should discover the repository");
        assert_eq!(
            repo.workdir().canonicalize().unwrap(),
            fixture.dir.path().canonicalize().unwrap()
        );
    }

    #[test]
    fn test_latest_tag_is_reachable_and_highest() {
        let fixture = setup_test_repo();
        let repo = Git2Repository::open(fixture.dir.path()).unwrap();

        assert_eq!(
            repo.latest_tag(&TagPattern::default()).unwrap(),
            Some("v1.0.0".to_string())
        );
    }

    #[test]
    fn test_latest_tag_none_without_release_tags() {
        let dir = TempDir::new().unwrap();
        let raw = Repository::init(dir.path()).unwrap();
        commit_files(&raw, &[("README.md", "x")], "Initial commit", &[], true);

        let repo = Git2Repository::open(dir.path()).unwrap();
        assert_eq!(repo.latest_tag(&TagPattern::default()).unwrap(), None);
    }

    #[test]
    fn test_commits_since_skips_merges() {
        let fixture = setup_test_repo();
        let repo = Git2Repository::open(fixture.dir.path()).unwrap();

        let commits = repo.commits_since("v1.0.0").unwrap();
        let subjects: Vec<&str> = commits.iter().map(|c| c.subject.as_str()).collect();
        assert_eq!(subjects, vec!["fix: correct regex", "feat: add loop snippet"]);
        assert_eq!(commits[0].body, "Escape the closing brace.");
        assert!(commits.iter().all(|c| c.hash.len() == 7));
    }

    #[test]
    fn test_commits_since_unknown_tag() {
        let fixture = setup_test_repo();
        let repo = Git2Repository::open(fixture.dir.path()).unwrap();
        assert!(matches!(repo.commits_since("v9.9.9"), Err(ReleaseError::Tag(_))));
    }

    #[test]
    fn test_changed_paths_since_tag() {
        let fixture = setup_test_repo();
        let repo = Git2Repository::open(fixture.dir.path()).unwrap();

        let paths: Vec<String> = repo
            .changed_paths_since("v1.0.0")
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(
            paths,
            vec!["Snippets/loop.sublime-snippet", "Syntaxes/Nunjucks.sublime-syntax"]
        );
    }

    #[test]
    fn test_commit_paths_stages_only_listed_files() {
        let fixture = setup_test_repo();
        let root = fixture.dir.path();
        fs::write(root.join("package.json"), "{\"version\": \"1.1.0\"}\n").unwrap();
        fs::write(root.join("scratch.txt"), "not part of the release").unwrap();

        let repo = Git2Repository::open(root).unwrap();
        let hash = repo
            .commit_paths(&["package.json".to_string()], "Release v1.1.0\n\nUpdated files:\n")
            .unwrap();

        let raw = Repository::open(root).unwrap();
        let head = raw.head().unwrap().peel_to_commit().unwrap();
        assert_eq!(head.id().to_string(), hash);
        assert_eq!(head.summary(), Some("Release v1.1.0"));
        let tree = head.tree().unwrap();
        assert!(tree.get_path(Path::new("package.json")).is_ok());
        assert!(tree.get_path(Path::new("scratch.txt")).is_err());
    }

    #[test]
    fn test_annotated_tag_is_never_overwritten() {
        let fixture = setup_test_repo();
        let repo = Git2Repository::open(fixture.dir.path()).unwrap();

        repo.create_annotated_tag("v1.1.0", "Nunjucks Toolbox v1.1.0")
            .unwrap();
        assert!(repo.tag_exists("v1.1.0").unwrap());

        let raw = Repository::open(fixture.dir.path()).unwrap();
        let tag = raw
            .find_reference("refs/tags/v1.1.0")
            .unwrap()
            .peel_to_tag()
            .expect("tag should be annotated");
        assert_eq!(tag.message(), Some("Nunjucks Toolbox v1.1.0"));

        assert!(matches!(
            repo.create_annotated_tag("v1.0.0", "again"),
            Err(ReleaseError::Tag(_))
        ));
        // The original v1.0.0 still points at the base commit
        let original = raw.find_reference("refs/tags/v1.0.0").unwrap();
        assert_eq!(original.peel_to_commit().unwrap().id(), fixture.base);
    }

    #[test]
    fn test_push_branch_and_tag_to_local_remote() {
        let fixture = setup_test_repo();
        let remote_dir = TempDir::new().unwrap();
        let bare = Repository::init_bare(remote_dir.path()).unwrap();

        let raw = Repository::open(fixture.dir.path()).unwrap();
        raw.remote("origin", remote_dir.path().to_str().unwrap())
            .unwrap();

        let repo = Git2Repository::open(fixture.dir.path()).unwrap();
        assert_eq!(
            repo.remote_url("origin").unwrap().as_deref(),
            remote_dir.path().to_str()
        );
        assert_eq!(repo.remote_url("upstream").unwrap(), None);

        let branch = repo.current_branch().unwrap();
        repo.create_annotated_tag("v1.1.0", "Nunjucks Toolbox v1.1.0")
            .unwrap();
        repo.push("origin", &branch, "v1.1.0").unwrap();

        assert!(bare.find_reference("refs/tags/v1.1.0").is_ok());
        assert!(bare
            .find_reference(&format!("refs/heads/{}", branch))
            .is_ok());
    }

    #[test]
    fn test_push_to_missing_remote() {
        let fixture = setup_test_repo();
        let repo = Git2Repository::open(fixture.dir.path()).unwrap();
        let branch = repo.current_branch().unwrap();
        assert!(matches!(
            repo.push("origin", &branch, "v1.0.0"),
            Err(ReleaseError::Remote(_))
        ));
    }
}
