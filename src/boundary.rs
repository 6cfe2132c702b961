use std::fmt;

use crate::domain::{Stages, Tag, TagPattern, Version};

/// Non-fatal issues found while preparing a release.
/// These are reported to the user and the release goes on (or stops cleanly).
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// No commits since the last release
    NothingToRelease { since: Option<String> },
    /// Tag follows the pattern but its version part cannot be parsed
    UnparsableTag { tag: String, reason: String },
    /// Tags exist but none of them follows the configured pattern
    TagMismatchPattern { tag: String, pattern: String },
    /// Commits exist but none carries a label
    NoLabelledCommits { commit_count: usize },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::NothingToRelease { since: Some(tag) } => {
                write!(f, "Nothing to release since tag '{}'", tag)
            }
            BoundaryWarning::NothingToRelease { since: None } => {
                write!(f, "Nothing to release, the repository has no commits")
            }
            BoundaryWarning::UnparsableTag { tag, reason } => {
                write!(f, "Cannot parse tag '{}': {}", tag, reason)
            }
            BoundaryWarning::TagMismatchPattern { tag, pattern } => {
                write!(f, "Latest tag '{}' does not match pattern '{}'", tag, pattern)
            }
            BoundaryWarning::NoLabelledCommits { commit_count } => {
                write!(
                    f,
                    "None of the {} commits carries a label, the changelog entry will be empty",
                    commit_count
                )
            }
        }
    }
}

/// Warnings about the tag list: tags following the pattern with a bad version part,
/// and a mismatch warning when tags exist but none follows the pattern.
pub fn tag_warnings(tags: &[Tag], pattern: &TagPattern, stages: &Stages) -> Vec<BoundaryWarning> {
    let mut warnings = Vec::new();
    let mut matched = false;

    for tag in tags {
        if let Some(version) = pattern.extract(&tag.name) {
            matched = true;
            if let Err(e) = Version::parse(version, stages) {
                warnings.push(BoundaryWarning::UnparsableTag {
                    tag: tag.name.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    if let (false, Some(latest)) = (matched, tags.first()) {
        warnings.push(BoundaryWarning::TagMismatchPattern {
            tag: latest.name.clone(),
            pattern: pattern.as_str().to_string(),
        });
    }

    warnings
}
