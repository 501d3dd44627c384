use std::fmt;

/// Non-fatal conditions met while preparing a release.
/// These are reported to the operator and never abort the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundaryWarning {
    /// No release tag in HEAD's history; treated as the initial release
    NoPreviousRelease { pattern: String },
    /// The previous release tag is HEAD itself
    NoNewCommits { latest_tag: String },
    /// Commits whose subjects match no category and won't appear in the notes
    UnclassifiedCommits { count: usize },
    /// README has no features section to extend
    MissingFeaturesSection { readme: String },
    /// Optional packaging input was absent and skipped
    SkippedOptionalInput { path: String },
    /// The message index points at an install message that does not exist
    InstallMessageMissing { path: String },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::NoPreviousRelease { pattern } => write!(
                f,
                "No previous release tag matching '{}'; preparing an initial release",
                pattern
            ),
            BoundaryWarning::NoNewCommits { latest_tag } => {
                write!(f, "No new commits since tag '{}'", latest_tag)
            }
            BoundaryWarning::UnclassifiedCommits { count } => write!(
                f,
                "{} commit(s) match no change category and are left out of the notes",
                count
            ),
            BoundaryWarning::MissingFeaturesSection { readme } => write!(
                f,
                "'{}' has no '## Features' section; feature bullets not added",
                readme
            ),
            BoundaryWarning::SkippedOptionalInput { path } => {
                write!(f, "Optional '{}' not found; left out of the archive", path)
            }
            BoundaryWarning::InstallMessageMissing { path } => {
                write!(f, "Install message '{}' not found; links not rewritten", path)
            }
        }
    }
}
