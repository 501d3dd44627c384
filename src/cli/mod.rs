//! Workflow entry points used by the command-line front end.

pub mod orchestration;

pub use orchestration::{
    prepare_release, run_release, PreparedRelease, ReleaseArgs, ReleaseOutcome, ReleaseStatus,
};
