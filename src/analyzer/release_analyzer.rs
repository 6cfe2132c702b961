use crate::analyzer::release_data::ReleaseDataTree;
use crate::domain::{analyze_labels, parse_commits, Commit, LabelPattern, LabelPosition};
use crate::error::Result;
use crate::git::Repository;

/// Turns commit history into release data for one label convention
pub struct ReleaseAnalyzer {
    pattern: LabelPattern,
    position: LabelPosition,
}

/// Everything a release learns from the commits since the last tag
#[derive(Debug, Clone)]
pub struct ReleaseData {
    /// All commits in the range, labelled or not
    pub commits: Vec<Commit>,
    pub tree: ReleaseDataTree,
}

impl ReleaseAnalyzer {
    /// Create an analyzer; the pattern must suit the position
    pub fn new(pattern: LabelPattern, position: LabelPosition) -> Result<Self> {
        pattern.validate(position)?;
        Ok(ReleaseAnalyzer { pattern, position })
    }

    /// Analyze raw `git log` text
    pub fn analyze_log(&self, log: &str) -> ReleaseData {
        self.analyze_commits(parse_commits(log))
    }

    /// Analyze already parsed commits
    pub fn analyze_commits(&self, commits: Vec<Commit>) -> ReleaseData {
        let semantic = analyze_labels(&commits, &self.pattern, self.position);
        let tree = ReleaseDataTree::aggregate(&semantic);

        ReleaseData { commits, tree }
    }

    /// Analyze the commits of a repository that came after `since`
    ///
    /// # Arguments
    /// * `repo` - Log source
    /// * `since` - Revision of the last release, whole history when `None`
    pub fn analyze_repository<R: Repository>(
        &self,
        repo: &R,
        since: Option<&str>,
    ) -> Result<ReleaseData> {
        let log = repo.log(since, None)?;
        Ok(self.analyze_log(&log))
    }
}
