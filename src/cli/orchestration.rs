//! Main workflow orchestration logic
//!
//! Runs the release pipeline stage by stage. Kept apart from `main.rs` so
//! the workflow can be driven programmatically (and tested) without clap,
//! a real repository or network access.

use chrono::{DateTime, Utc};

use crate::analyzer::{classifier, ChangeAnalyzer};
use crate::boundary::BoundaryWarning;
use crate::config::Config;
use crate::content::{templates, ReleaseContent, ReleaseContext};
use crate::domain::{ChangeSet, Classification, Version};
use crate::error::{ReleaseError, Result};
use crate::git::Repository;
use crate::manifest::{ManifestReport, ManifestUpdater};
use crate::packager::{PackageArtifact, Packager};
use crate::publish::{self, PublishOutcome, Publisher, ReleaseHost};
use crate::ui;
use crate::validate;

const TOTAL_STAGES: usize = 7;

/// Arguments for the release workflow
///
/// Mirrors the CLI flags in a form that does not depend on clap.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReleaseArgs {
    /// `MAJOR.MINOR.PATCH` of the release to cut
    pub version: String,

    /// Stop after synthesizing content; touch nothing
    pub dry_run: bool,

    /// Skip the package validation gate
    pub no_verify: bool,

    /// Rewrite files and build the archive, but do not commit, tag, push or release
    pub no_publish: bool,

    /// Skip the confirmation prompt before publishing
    pub assume_yes: bool,
}

/// Output of stages 1-4. Nothing on disk or in the repository has changed yet.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRelease {
    pub version: Version,
    pub changes: ChangeSet,
    pub classification: Classification,
    pub content: ReleaseContent,
    pub context: ReleaseContext,
    pub warnings: Vec<BoundaryWarning>,
}

impl PreparedRelease {
    /// Markdown body the hosted release will carry.
    pub fn release_body(&self) -> String {
        templates::release_body(&self.context, &self.content)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseStatus {
    /// `--dry-run`: stages 1-4 only
    DryRun,
    /// `--no-publish`: files rewritten and archive built
    Packaged,
    /// The operator declined the publish prompt after packaging
    Cancelled,
    Published,
}

/// Result of a release workflow run
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseOutcome {
    pub status: ReleaseStatus,
    pub prepared: PreparedRelease,
    pub manifest: Option<ManifestReport>,
    pub artifact: Option<PackageArtifact>,
    pub published: Option<PublishOutcome>,
}

impl ReleaseOutcome {
    /// Every non-fatal condition met during the run, in stage order.
    pub fn warnings(&self) -> Vec<BoundaryWarning> {
        let mut warnings = self.prepared.warnings.clone();
        if let Some(manifest) = &self.manifest {
            warnings.extend(manifest.warnings.iter().cloned());
        }
        if let Some(artifact) = &self.artifact {
            warnings.extend(artifact.warnings.iter().cloned());
        }
        warnings
    }
}

/// Stages 1-4: resolve the version and previous tag, analyze the changes,
/// classify the commits and synthesize the release text.
///
/// Side-effect free; an invalid version fails before the repository is read.
pub fn prepare_release<R: Repository>(
    version: &str,
    config: &Config,
    repo: &R,
) -> Result<PreparedRelease> {
    let version = Version::parse(version)?;
    let pattern = config.tag_pattern()?;
    let tag = pattern.format(&version);
    let mut warnings = Vec::new();

    ui::display_step(1, TOTAL_STAGES, "Resolving version and previous release");
    let previous_tag = repo.latest_tag(&pattern)?;
    match &previous_tag {
        Some(previous) => ui::display_status(&format!("{} -> {}", previous, tag)),
        None => warn(
            &mut warnings,
            BoundaryWarning::NoPreviousRelease {
                pattern: pattern.as_str().to_string(),
            },
        ),
    }

    ui::display_step(2, TOTAL_STAGES, "Analyzing changes");
    let changes = ChangeAnalyzer::new(&config.paths).analyze(repo, previous_tag.as_deref())?;
    if let (Some(previous), true) = (&changes.previous_tag, changes.commits.is_empty()) {
        warn(
            &mut warnings,
            BoundaryWarning::NoNewCommits {
                latest_tag: previous.clone(),
            },
        );
    }
    ui::display_change_summary(&changes);

    ui::display_step(3, TOTAL_STAGES, "Classifying commits");
    let classification = classifier::classify(&changes.commits);
    if !changes.is_initial_release() {
        let unclassified = classifier::unclassified(&changes.commits).len();
        if unclassified > 0 {
            warn(
                &mut warnings,
                BoundaryWarning::UnclassifiedCommits {
                    count: unclassified,
                },
            );
        }
    }
    ui::display_classification(&classification);

    ui::display_step(4, TOTAL_STAGES, "Synthesizing release content");
    let content = ReleaseContent::synthesize(
        &classification,
        &changes.directory_counts,
        changes.is_initial_release(),
    );
    let slug = publish::resolve_slug(config, repo)?;
    let context = ReleaseContext {
        display_name: config.package.display_name.clone(),
        version: version.clone(),
        archive_name: Packager::new(repo.workdir(), config).archive_name(&tag),
        tag,
        previous_tag: changes.previous_tag.clone(),
        repository_url: slug.url(),
    };

    Ok(PreparedRelease {
        version,
        changes,
        classification,
        content,
        context,
        warnings,
    })
}

/// Full release workflow
///
/// Orchestrates the seven stages:
/// 1. Resolve the version and the previous release tag
/// 2. Analyze commits and changed files
/// 3. Classify commits
/// 4. Synthesize release content
/// 5. Rewrite manifest, README and message files
/// 6. Build the archive
/// 7. Commit, tag, push and create the hosted release
///
/// Package validation runs between stages 4 and 5 unless disabled.
/// `confirm` is asked once before stage 7 unless `assume_yes` is set.
///
/// Nothing is rolled back on failure: files rewritten by stage 5 and the
/// commit or tag created by stage 7 remain for the operator to inspect.
pub fn run_release<R, H, F>(
    args: &ReleaseArgs,
    config: &Config,
    repo: &R,
    host: &H,
    now: DateTime<Utc>,
    confirm: F,
) -> Result<ReleaseOutcome>
where
    R: Repository,
    H: ReleaseHost,
    F: FnOnce(&str) -> bool,
{
    let version = Version::parse(&args.version)?;
    let tag = config.tag_pattern()?.format(&version);
    if !args.dry_run && repo.tag_exists(&tag)? {
        return Err(ReleaseError::tag(format!("Tag '{}' already exists", tag)));
    }

    let prepared = prepare_release(&args.version, config, repo)?;
    ui::display_release_content(&prepared.content);

    let mut outcome = ReleaseOutcome {
        status: ReleaseStatus::DryRun,
        prepared,
        manifest: None,
        artifact: None,
        published: None,
    };
    if args.dry_run {
        return Ok(outcome);
    }

    let root = repo.workdir();
    if !args.no_verify {
        ui::display_status("Validating package files");
        let report = validate::validate_package(root, config);
        ui::display_findings(&report.findings);
        report.into_result()?;
    }

    ui::display_step(5, TOTAL_STAGES, "Updating manifest and documentation");
    let manifest = ManifestUpdater::new(root, config).apply(
        &outcome.prepared.context,
        &outcome.prepared.content,
        now,
    )?;
    for file in &manifest.updated {
        ui::display_success(&format!("{}: {}", file.path, file.description));
    }
    manifest.warnings.iter().for_each(ui::display_boundary_warning);
    outcome.manifest = Some(manifest);

    ui::display_step(6, TOTAL_STAGES, "Packaging");
    let artifact = Packager::new(root, config).package(&outcome.prepared.context.tag)?;
    artifact.warnings.iter().for_each(ui::display_boundary_warning);
    ui::display_success(&format!(
        "{} ({} files)",
        artifact.archive_path.display(),
        artifact.file_count
    ));
    outcome.artifact = Some(artifact);

    let tag = outcome.prepared.context.tag.clone();
    if args.no_publish {
        ui::display_manual_publish_instruction(&tag, &config.repository.remote);
        outcome.status = ReleaseStatus::Packaged;
        return Ok(outcome);
    }

    if !args.assume_yes
        && !confirm(&format!(
            "Commit, tag and push {} to '{}' and create the release?",
            tag, config.repository.remote
        ))
    {
        ui::display_status("Publishing cancelled; rewritten files and archive are kept");
        outcome.status = ReleaseStatus::Cancelled;
        return Ok(outcome);
    }

    ui::display_step(7, TOTAL_STAGES, "Publishing");
    let published = match (&outcome.manifest, &outcome.artifact) {
        (Some(manifest), Some(artifact)) => Publisher::new(repo, host, &config.repository.remote)
            .publish(
                &outcome.prepared.context,
                &outcome.prepared.content,
                manifest,
                artifact,
            )?,
        _ => return Err(ReleaseError::publish("nothing was packaged")),
    };
    ui::display_success(&format!("Release {} created: {}", tag, published.release.html_url));
    outcome.published = Some(published);
    outcome.status = ReleaseStatus::Published;

    Ok(outcome)
}

fn warn(warnings: &mut Vec<BoundaryWarning>, warning: BoundaryWarning) {
    ui::display_boundary_warning(&warning);
    warnings.push(warning);
}
