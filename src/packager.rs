use crate::boundary::BoundaryWarning;
use crate::config::Config;
use crate::error::{ReleaseError, Result};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// The distributable produced for one release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageArtifact {
    pub archive_path: PathBuf,
    pub archive_name: String,
    /// `<dist>/<archive_root>`, the tree that was compressed
    pub staging_dir: PathBuf,
    pub file_count: usize,
    pub warnings: Vec<BoundaryWarning>,
}

/// Assembles the distributable layout and compresses it.
pub struct Packager<'a> {
    root: PathBuf,
    config: &'a Config,
}

impl<'a> Packager<'a> {
    pub fn new(root: impl Into<PathBuf>, config: &'a Config) -> Self {
        Packager {
            root: root.into(),
            config,
        }
    }

    /// `<archive_root>-<tag>.zip`
    pub fn archive_name(&self, tag: &str) -> String {
        format!("{}-{}.zip", self.config.package.archive_root, tag)
    }

    /// Stage and compress the package for `tag`.
    ///
    /// Required files are checked before anything is written, so a missing
    /// one never leaves a partial archive behind. Absent optional files and
    /// directories are skipped with a warning.
    pub fn package(&self, tag: &str) -> Result<PackageArtifact> {
        for required in self.config.paths.required_files() {
            if !self.root.join(required).is_file() {
                return Err(ReleaseError::missing_file(required));
            }
        }

        let dist_dir = self.root.join(&self.config.paths.dist_dir);
        let staging_dir = dist_dir.join(&self.config.package.archive_root);
        if staging_dir.exists() {
            fs::remove_dir_all(&staging_dir)?;
        }
        fs::create_dir_all(&staging_dir)?;

        let mut warnings = Vec::new();
        let mut file_count = 0;

        for dir in &self.config.packaging.directories {
            let source = self.root.join(dir);
            if source.is_dir() {
                file_count += copy_tree(&source, &staging_dir.join(dir))?;
            } else {
                warnings.push(BoundaryWarning::SkippedOptionalInput { path: dir.clone() });
            }
        }

        for required in self.config.paths.required_files() {
            copy_file(&self.root.join(required), &staging_dir.join(required))?;
            file_count += 1;
        }

        for optional in &self.config.packaging.optional_files {
            let source = self.root.join(optional);
            if source.is_file() {
                copy_file(&source, &staging_dir.join(optional))?;
                file_count += 1;
            } else {
                warnings.push(BoundaryWarning::SkippedOptionalInput {
                    path: optional.clone(),
                });
            }
        }

        let archive_name = self.archive_name(tag);
        let archive_path = dist_dir.join(&archive_name);
        let partial = dist_dir.join(format!("{}.partial", archive_name));

        if let Err(e) = write_archive(&staging_dir, &self.config.package.archive_root, &partial) {
            let _ = fs::remove_file(&partial);
            return Err(e);
        }
        fs::rename(&partial, &archive_path)?;

        Ok(PackageArtifact {
            archive_path,
            archive_name,
            staging_dir,
            file_count,
            warnings,
        })
    }
}

fn copy_file(source: &Path, target: &Path) -> Result<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(source, target)?;
    Ok(())
}

/// Copy every regular file below `source` into `target`; returns the count.
fn copy_tree(source: &Path, target: &Path) -> Result<usize> {
    let mut copied = 0;
    for entry in WalkDir::new(source).sort_by_file_name() {
        let entry = entry.map_err(|e| ReleaseError::Io(io::Error::new(io::ErrorKind::Other, e)))?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|e| ReleaseError::Io(io::Error::new(io::ErrorKind::Other, e)))?;
        let destination = target.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&destination)?;
        } else if entry.file_type().is_file() {
            copy_file(entry.path(), &destination)?;
            copied += 1;
        }
    }
    Ok(copied)
}

/// Compress `staging_dir` so every entry sits under `<root_name>/`.
fn write_archive(staging_dir: &Path, root_name: &str, archive_path: &Path) -> Result<()> {
    let file = File::create(archive_path)?;
    let mut zip = ZipWriter::new(file);
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    for entry in WalkDir::new(staging_dir).sort_by_file_name() {
        let entry = entry.map_err(|e| ReleaseError::Io(io::Error::new(io::ErrorKind::Other, e)))?;
        let relative = entry
            .path()
            .strip_prefix(staging_dir)
            .map_err(|e| ReleaseError::Io(io::Error::new(io::ErrorKind::Other, e)))?;

        let mut name = root_name.to_string();
        for component in relative.components() {
            name.push('/');
            name.push_str(&component.as_os_str().to_string_lossy());
        }

        if entry.file_type().is_dir() {
            zip.add_directory(format!("{}/", name), options)?;
        } else if entry.file_type().is_file() {
            zip.start_file(name, options)?;
            let mut source = File::open(entry.path())?;
            io::copy(&mut source, &mut zip)?;
        }
    }

    zip.finish()?;
    Ok(())
}
