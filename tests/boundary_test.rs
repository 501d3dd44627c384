use chrono::Utc;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use toolbox_release::boundary::BoundaryWarning;
use toolbox_release::config::Config;
use toolbox_release::content::{ReleaseContent, ReleaseContext};
use toolbox_release::domain::{Classification, DirectoryCounts, Version, WatchedDir};
use toolbox_release::manifest::ManifestUpdater;
use toolbox_release::packager::Packager;
use toolbox_release::ui;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn checkout(readme: &str, index: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "package.json", "{\"version\": \"1.2.0\"}\n");
    write(dir.path(), "README.md", readme);
    write(dir.path(), "messages.json", index);
    dir
}

fn context() -> ReleaseContext {
    ReleaseContext {
        display_name: "Nunjucks Toolbox".to_string(),
        version: Version::new(1, 3, 0),
        tag: "v1.3.0".to_string(),
        previous_tag: Some("v1.2.0".to_string()),
        repository_url: "https://github.com/acme/nunjucks-toolbox".to_string(),
        archive_name: "NunjucksToolbox-v1.3.0.zip".to_string(),
    }
}

fn snippet_content() -> ReleaseContent {
    ReleaseContent::synthesize(
        &Classification::default(),
        &DirectoryCounts::new().with(WatchedDir::Snippets, 2),
        false,
    )
}

// ============================================================================
// Manifest Updater Boundaries
// ============================================================================

#[test]
fn test_readme_without_features_section_is_left_alone() {
    let dir = checkout("# Toolbox 1.2.0\n\nNo sections here.\n", "{}");
    let config = Config::default();

    let report = ManifestUpdater::new(dir.path(), &config)
        .apply(&context(), &snippet_content(), Utc::now())
        .expect("a missing features section is not fatal");

    assert!(
        report.warnings.contains(&BoundaryWarning::MissingFeaturesSection {
            readme: "README.md".to_string()
        }),
        "Expected a MissingFeaturesSection warning, got: {:?}",
        report.warnings
    );
    let readme = fs::read_to_string(dir.path().join("README.md")).unwrap();
    assert_eq!(readme, "# Toolbox 1.3.0\n\nNo sections here.\n");
}

#[test]
fn test_index_pointing_at_absent_install_message() {
    let dir = checkout("# Toolbox\n", r#"{"install": "messages/install.txt"}"#);
    let config = Config::default();

    let report = ManifestUpdater::new(dir.path(), &config)
        .apply(&context(), &snippet_content(), Utc::now())
        .unwrap();

    assert!(
        report.warnings.contains(&BoundaryWarning::InstallMessageMissing {
            path: "messages/install.txt".to_string()
        }),
        "Expected an InstallMessageMissing warning, got: {:?}",
        report.warnings
    );
    assert!(!report.paths().contains(&"messages/install.txt".to_string()));
}

#[test]
fn test_message_index_without_install_key() {
    let dir = checkout("# Toolbox\n", "{}");
    let config = Config::default();

    let maintenance = ReleaseContent::synthesize(&Classification::default(), &DirectoryCounts::new(), false);
    let report = ManifestUpdater::new(dir.path(), &config)
        .apply(&context(), &maintenance, Utc::now())
        .unwrap();

    assert!(report.warnings.is_empty(), "got: {:?}", report.warnings);
    let index = fs::read_to_string(dir.path().join("messages.json")).unwrap();
    assert_eq!(index, "{\n  \"1.3.0\": \"messages/1.3.0.txt\"\n}\n");
}

// ============================================================================
// Packager Boundaries
// ============================================================================

#[test]
fn test_bare_package_still_packages() {
    let dir = checkout("# Toolbox\n", "{}");
    let config = Config::default();

    let artifact = Packager::new(dir.path(), &config)
        .package("v1.3.0")
        .expect("only required files are needed");

    assert_eq!(artifact.file_count, 3);
    let skipped = config.packaging.directories.len() + config.packaging.optional_files.len();
    assert_eq!(
        artifact.warnings.len(),
        skipped,
        "Every optional input should be reported, got: {:?}",
        artifact.warnings
    );
}

// ============================================================================
// Warning Display
// ============================================================================

#[test]
fn test_display_boundary_warnings() {
    // Visual verification test - output is printed to stderr
    let warnings = vec![
        BoundaryWarning::NoPreviousRelease {
            pattern: "v{version}".to_string(),
        },
        BoundaryWarning::NoNewCommits {
            latest_tag: "v1.2.0".to_string(),
        },
        BoundaryWarning::UnclassifiedCommits { count: 2 },
    ];
    for warning in &warnings {
        ui::display_boundary_warning(warning);
    }
}
