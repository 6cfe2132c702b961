//! Domain logic - pure release rules independent of git operations

pub mod commit;
pub mod label;
pub mod stage;
pub mod tag;
pub mod version;

pub use commit::{parse_commits, Commit};
pub use label::{analyze_labels, LabelPattern, LabelPosition, SemanticCommit};
pub use stage::{Stage, Stages};
pub use tag::{analyze_tags, Tag, TagPattern, TaggedVersion};
pub use version::{next_version, BumpPart, ReleaseTarget, Version};
