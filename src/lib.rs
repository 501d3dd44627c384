pub mod analyzer;
pub mod boundary;
pub mod cli;
pub mod config;
pub mod content;
pub mod domain;
pub mod error;
pub mod git;
pub mod manifest;
pub mod packager;
pub mod publish;
pub mod ui;
pub mod validate;

pub use error::{ReleaseError, Result};
