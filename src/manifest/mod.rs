//! In-place rewriting of the package's manifest, documentation and
//! release-message files.

pub mod install;
pub mod messages;
pub mod package;
pub mod readme;

pub use messages::{MessageIndex, MessageKey};

use crate::boundary::BoundaryWarning;
use crate::config::Config;
use crate::content::{templates, ReleaseContent, ReleaseContext};
use crate::error::{ReleaseError, Result};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};

/// A file rewritten or created by the updater, relative to the repository root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatedFile {
    pub path: String,
    pub description: String,
}

impl UpdatedFile {
    pub fn new(path: impl Into<String>, description: impl Into<String>) -> Self {
        UpdatedFile {
            path: path.into(),
            description: description.into(),
        }
    }
}

/// What the updater changed, plus anything it had to skip.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestReport {
    pub updated: Vec<UpdatedFile>,
    pub warnings: Vec<BoundaryWarning>,
}

impl ManifestReport {
    pub fn paths(&self) -> Vec<String> {
        self.updated.iter().map(|file| file.path.clone()).collect()
    }
}

/// Applies a release to the files of one package checkout.
pub struct ManifestUpdater<'a> {
    root: PathBuf,
    config: &'a Config,
}

impl<'a> ManifestUpdater<'a> {
    pub fn new(root: impl Into<PathBuf>, config: &'a Config) -> Self {
        ManifestUpdater {
            root: root.into(),
            config,
        }
    }

    /// Fail if any file the updater must rewrite is absent.
    pub fn check_required(&self) -> Result<()> {
        for relative in self.config.paths.required_files() {
            if !self.root.join(relative).is_file() {
                return Err(ReleaseError::missing_file(relative));
            }
        }
        Ok(())
    }

    /// Rewrite manifest, README, message file, message index and install
    /// message for the release described by `ctx`.
    ///
    /// Files already written stay written if a later step fails.
    pub fn apply(
        &self,
        ctx: &ReleaseContext,
        content: &ReleaseContent,
        generated_at: DateTime<Utc>,
    ) -> Result<ManifestReport> {
        self.check_required()?;
        let paths = &self.config.paths;
        let mut report = ManifestReport::default();

        let manifest = self.read(&paths.manifest)?;
        let manifest = package::set_version(&manifest, &ctx.version)
            .map_err(|e| ReleaseError::manifest(format!("{}: {}", paths.manifest, e)))?;
        self.write(&paths.manifest, &manifest)?;
        report.updated.push(UpdatedFile::new(
            paths.manifest.as_str(),
            format!("version {}", ctx.version),
        ));

        let readme = self.read(&paths.readme)?;
        let (mut readme, _) = readme::replace_versions(&readme, &ctx.version)?;
        if !content.readme_bullets.is_empty() {
            match readme::append_feature_bullets(&readme, &content.readme_bullets) {
                Some(extended) => readme = extended,
                None => report.warnings.push(BoundaryWarning::MissingFeaturesSection {
                    readme: paths.readme.clone(),
                }),
            }
        }
        self.write(&paths.readme, &readme)?;
        report.updated.push(UpdatedFile::new(
            paths.readme.as_str(),
            "version references and features",
        ));

        let message_path = self.config.message_file(&ctx.version);
        let message = templates::message_file(ctx, content, generated_at);
        self.write(&message_path, &message)?;
        report
            .updated
            .push(UpdatedFile::new(message_path.as_str(), "release notes"));

        let index = MessageIndex::parse(&self.read(&paths.message_index)?)
            .map_err(|e| ReleaseError::manifest(format!("{}: {}", paths.message_index, e)))?;
        let index = index.with_version(&ctx.version, message_path.as_str());
        self.write(&paths.message_index, &index.to_json()?)?;
        report.updated.push(UpdatedFile::new(
            paths.message_index.as_str(),
            format!("message entry for {}", ctx.version),
        ));

        if let Some(install_path) = index.install_path() {
            self.rewrite_install_message(install_path, &ctx.repository_url, &mut report)?;
        }

        Ok(report)
    }

    fn rewrite_install_message(
        &self,
        install_path: &str,
        canonical: &str,
        report: &mut ManifestReport,
    ) -> Result<()> {
        if !self.root.join(install_path).is_file() {
            report.warnings.push(BoundaryWarning::InstallMessageMissing {
                path: install_path.to_string(),
            });
            return Ok(());
        }

        let text = self.read(install_path)?;
        let (rewritten, count) =
            install::rewrite_repository_links(&text, &self.config.repository.legacy_urls, canonical);
        if count > 0 {
            self.write(install_path, &rewritten)?;
            report
                .updated
                .push(UpdatedFile::new(install_path, "repository links"));
        }
        Ok(())
    }

    fn read(&self, relative: &str) -> Result<String> {
        let path = self.root.join(relative);
        fs::read_to_string(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ReleaseError::missing_file(relative),
            _ => e.into(),
        })
    }

    fn write(&self, relative: &str, content: &str) -> Result<()> {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            create_dir(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }
}

fn create_dir(path: &Path) -> Result<()> {
    if !path.is_dir() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}
