//! Domain logic - pure release rules independent of git and the filesystem

pub mod changeset;
pub mod classification;
pub mod commit;
pub mod tag;
pub mod version;

pub use changeset::{ChangeSet, DirectoryCounts, WatchedDir};
pub use classification::Classification;
pub use commit::{short_hash, CommitEntry};
pub use tag::TagPattern;
pub use version::Version;
