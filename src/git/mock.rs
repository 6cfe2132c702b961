use crate::domain::Tag;
use crate::error::{BrauError, Result};
use crate::git::Repository;
use std::cell::RefCell;
use std::path::PathBuf;

/// A commit stored by the mock, hash plus plain message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockCommit {
    pub hash: String,
    pub message: String,
}

/// Mock repository for testing without actual git operations.
///
/// Commits and tags are kept newest first. Created tags and release commits are
/// recorded so tests can assert on them.
#[derive(Debug, Default)]
pub struct MockRepository {
    commits: RefCell<Vec<MockCommit>>,
    /// Tag plus the hash of the commit it points to
    tags: RefCell<Vec<(Tag, String)>>,
    created_tags: RefCell<Vec<String>>,
    release_commits: RefCell<Vec<(String, Vec<PathBuf>)>>,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a commit on top of the history
    pub fn add_commit(&self, message: impl Into<String>) -> String {
        let mut commits = self.commits.borrow_mut();
        let hash = format!("{:040x}", commits.len() + 1);

        commits.insert(
            0,
            MockCommit {
                hash: hash.clone(),
                message: message.into(),
            },
        );
        hash
    }

    /// Tag the newest commit
    pub fn add_tag(&self, date: impl Into<String>, name: impl Into<String>) {
        let head = self
            .commits
            .borrow()
            .first()
            .map(|c| c.hash.clone())
            .unwrap_or_default();

        self.tags
            .borrow_mut()
            .insert(0, (Tag::new(date, name), head));
    }

    /// Tags created through [`Repository::create_tag`]
    pub fn created_tags(&self) -> Vec<String> {
        self.created_tags.borrow().clone()
    }

    /// Commits created through [`Repository::commit`]
    pub fn release_commits(&self) -> Vec<(String, Vec<PathBuf>)> {
        self.release_commits.borrow().clone()
    }

    fn hash_of(&self, revision: &str) -> Result<String> {
        let tags = self.tags.borrow();
        if let Some((_, hash)) = tags.iter().find(|(tag, _)| tag.name == revision) {
            return Ok(hash.clone());
        }

        self.commits
            .borrow()
            .iter()
            .find(|c| c.hash == revision)
            .map(|c| c.hash.clone())
            .ok_or_else(|| BrauError::config(format!("unknown revision '{}'", revision)))
    }
}

impl Repository for MockRepository {
    fn log(&self, from: Option<&str>, to: Option<&str>) -> Result<String> {
        let stop = from.map(|revision| self.hash_of(revision)).transpose()?;
        let start = to.map(|revision| self.hash_of(revision)).transpose()?;

        let commits = self.commits.borrow();
        let mut text = String::new();
        let mut started = start.is_none();

        for commit in commits.iter() {
            if Some(&commit.hash) == start.as_ref() {
                started = true;
            }
            if Some(&commit.hash) == stop.as_ref() {
                break;
            }
            if !started {
                continue;
            }

            text.push_str(&format!(
                "commit {}\nAuthor: Mock <mock@example.com>\nDate:   Mon Jan 8 10:15:00 2024 +0000\n\n",
                commit.hash
            ));
            for line in commit.message.lines() {
                if line.is_empty() {
                    text.push('\n');
                } else {
                    text.push_str(&format!("    {}\n", line));
                }
            }
            text.push('\n');
        }

        Ok(text)
    }

    fn tags(&self) -> Result<Vec<Tag>> {
        Ok(self.tags.borrow().iter().map(|(tag, _)| tag.clone()).collect())
    }

    fn create_tag(&self, name: &str) -> Result<()> {
        self.created_tags.borrow_mut().push(name.to_string());
        self.add_tag("2024-01-08", name);
        Ok(())
    }

    fn commit(&self, message: &str, files: &[PathBuf]) -> Result<()> {
        self.release_commits
            .borrow_mut()
            .push((message.to_string(), files.to_vec()));
        self.add_commit(message);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::parse_commits;

    #[test]
    fn test_mock_log_since_tag() {
        let repo = MockRepository::new();
        repo.add_commit("Initial");
        repo.add_tag("2024-01-01", "v0.1.0");
        repo.add_commit("Add feature\n\n!feat:");
        repo.add_commit("Fix bug\n\n!fix:");

        let commits = parse_commits(&repo.log(Some("v0.1.0"), None).unwrap());
        let headers: Vec<&str> = commits.iter().map(|c| c.header.as_str()).collect();
        assert_eq!(headers, vec!["Fix bug", "Add feature"]);
        assert_eq!(commits[0].footer, "!fix:");
    }

    #[test]
    fn test_mock_full_log() {
        let repo = MockRepository::new();
        repo.add_commit("One");
        repo.add_commit("Two");
        assert_eq!(parse_commits(&repo.log(None, None).unwrap()).len(), 2);
    }

    #[test]
    fn test_mock_unknown_revision() {
        let repo = MockRepository::new();
        assert!(repo.log(Some("v9.9.9"), None).is_err());
    }

    #[test]
    fn test_mock_records_release() {
        let repo = MockRepository::new();
        repo.add_commit("Initial");
        repo.commit("Release version 1.0.0", &[PathBuf::from("HISTORY.rst")])
            .unwrap();
        repo.create_tag("v1.0.0").unwrap();

        assert_eq!(repo.created_tags(), vec!["v1.0.0"]);
        assert_eq!(repo.release_commits()[0].0, "Release version 1.0.0");
        assert_eq!(repo.tags().unwrap()[0].name, "v1.0.0");
        assert_eq!(repo.log(Some("v1.0.0"), None).unwrap(), "");
    }
}
