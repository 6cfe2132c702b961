//! Analysis engine for turning labelled commits into release data

pub mod release_analyzer;
pub mod release_data;

pub use release_analyzer::{ReleaseAnalyzer, ReleaseData};
pub use release_data::{ReleaseDataTree, ScopeGroups, VersionBump, BREAKING_CHANGE_MARKER};
