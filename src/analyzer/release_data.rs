use crate::domain::SemanticCommit;
use indexmap::IndexMap;
use std::fmt;

/// Substring in a commit message that forces a major release.
/// The plural "BREAKING CHANGES" contains it and matches as well.
pub const BREAKING_CHANGE_MARKER: &str = "BREAKING CHANGE";

/// Bump level derived from a set of commits
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum VersionBump {
    Patch,
    Minor,
    Major,
}

impl fmt::Display for VersionBump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionBump::Major => write!(f, "major"),
            VersionBump::Minor => write!(f, "minor"),
            VersionBump::Patch => write!(f, "patch"),
        }
    }
}

/// Commits of one action, grouped by scope in first-seen order.
///
/// The `None` key is the scopeless bucket, for commits that carry an action but
/// no scope. A scope literally named `scopeless` stays a regular scope.
pub type ScopeGroups = IndexMap<Option<String>, Vec<SemanticCommit>>;

/// Semantic commits grouped by action, then by scope.
///
/// Built once by [`ReleaseDataTree::aggregate`] and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReleaseDataTree {
    by_action: IndexMap<String, ScopeGroups>,
    has_breaking_changes: bool,
}

impl ReleaseDataTree {
    /// Group commits by action and scope, preserving their order.
    ///
    /// Every action gets a scopeless (`None`) bucket, empty or not.
    pub fn aggregate(commits: &[SemanticCommit]) -> Self {
        let mut by_action: IndexMap<String, ScopeGroups> = IndexMap::new();
        let mut has_breaking_changes = false;

        for commit in commits {
            has_breaking_changes =
                has_breaking_changes || commit.message.contains(BREAKING_CHANGE_MARKER);

            let scopes = by_action.entry(commit.action.clone()).or_insert_with(|| {
                let mut scopes = ScopeGroups::new();
                scopes.insert(None, Vec::new());
                scopes
            });

            scopes
                .entry(commit.scope.clone())
                .or_default()
                .push(commit.clone());
        }

        ReleaseDataTree {
            by_action,
            has_breaking_changes,
        }
    }

    /// `Major` on a breaking change, `Minor` when any `feat` is present, else `Patch`
    pub fn bump_version_to(&self) -> VersionBump {
        if self.has_breaking_changes {
            VersionBump::Major
        } else if self.by_action.contains_key("feat") {
            VersionBump::Minor
        } else {
            VersionBump::Patch
        }
    }

    pub fn has_breaking_changes(&self) -> bool {
        self.has_breaking_changes
    }

    /// Scope groups of one action
    pub fn get(&self, action: &str) -> Option<&ScopeGroups> {
        self.by_action.get(action)
    }

    /// Actions in first-seen order
    pub fn actions(&self) -> impl Iterator<Item = &str> {
        self.by_action.keys().map(String::as_str)
    }

    /// Number of aggregated commits
    pub fn len(&self) -> usize {
        self.by_action
            .values()
            .flat_map(|scopes| scopes.values())
            .map(Vec::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_action.is_empty()
    }
}
