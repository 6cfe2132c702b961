//! Git operations abstraction layer
//!
//! The release workflow only needs four things from version control: the log
//! since the last release, the tag list, and a way to record the release as a
//! commit and a tag. The [Repository] trait captures exactly that, so the
//! workflow can run against a real repository or an in-memory one.
//!
//! - [repository::Git2Repository]: A real implementation using the `git2` crate
//! - [mock::MockRepository]: A mock implementation for testing
//!
//! ```rust
//! # use braulio::git::Repository;
//! # use braulio::domain::parse_commits;
//! # fn example<R: Repository>(repo: &R) -> braulio::error::Result<()> {
//! let tags = repo.tags()?;
//! let since = tags.first().map(|tag| tag.name.as_str());
//! let commits = parse_commits(&repo.log(since, None)?);
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::domain::Tag;
use crate::error::Result;
use std::path::PathBuf;

/// Version control operations used by a release
pub trait Repository {
    /// Raw log text in the `git log` medium layout, newest commit first.
    ///
    /// # Arguments
    /// * `from` - Revision whose history is excluded (usually the last release tag)
    /// * `to` - Revision to start from, `HEAD` when `None`
    ///
    /// # Returns
    /// * `Ok(String)` - Log text, empty when there are no commits in the range
    /// * `Err` - If a revision cannot be resolved
    fn log(&self, from: Option<&str>, to: Option<&str>) -> Result<String>;

    /// All tags, newest first by creation date
    fn tags(&self) -> Result<Vec<Tag>>;

    /// Create an annotated tag on `HEAD`
    fn create_tag(&self, name: &str) -> Result<()>;

    /// Stage `files` and commit them on top of `HEAD`
    fn commit(&self, message: &str, files: &[PathBuf]) -> Result<()>;
}
