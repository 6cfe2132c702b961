pub mod analyzer;
pub mod boundary;
pub mod changelog;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod files;
pub mod git;
pub mod ui;

pub use analyzer::{ReleaseDataTree, VersionBump};
pub use domain::{
    analyze_labels, parse_commits, BumpPart, Commit, LabelPattern, LabelPosition, SemanticCommit,
    Stages, Version,
};
pub use error::{BrauError, Result};
