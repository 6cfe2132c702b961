use crate::domain::Tag;
use crate::error::{BrauError, Result};
use chrono::{DateTime, FixedOffset, TimeZone};
use git2::{Oid, Repository as Git2Repo, Sort};
use log::debug;
use std::fmt::Write;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }

    fn resolve(&self, revision: &str) -> Result<Oid> {
        Ok(self.repo.revparse_single(revision)?.peel_to_commit()?.id())
    }

    fn relative_to_workdir(&self, file: &Path) -> Result<PathBuf> {
        let workdir = self
            .repo
            .workdir()
            .ok_or_else(|| BrauError::config("cannot commit in a bare repository"))?;

        let root = fs::canonicalize(workdir)?;
        let absolute = fs::canonicalize(file)?;

        absolute
            .strip_prefix(&root)
            .map(Path::to_path_buf)
            .map_err(|_| {
                BrauError::Io(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("{} is outside the repository", file.display()),
                ))
            })
    }
}

/// Git's default date layout, e.g. `Mon Jan 8 10:15:00 2024 +0100`
fn format_date(time: git2::Time, layout: &str) -> String {
    to_datetime(time)
        .map(|date| date.format(layout).to_string())
        .unwrap_or_default()
}

fn to_datetime(time: git2::Time) -> Option<DateTime<FixedOffset>> {
    FixedOffset::east_opt(time.offset_minutes() * 60)?
        .timestamp_opt(time.seconds(), 0)
        .single()
}

fn format_commit(commit: &git2::Commit<'_>, out: &mut String) -> std::fmt::Result {
    writeln!(out, "commit {}", commit.id())?;

    if commit.parent_count() > 1 {
        let parents: Vec<String> = commit
            .parent_ids()
            .map(|id| id.to_string().chars().take(7).collect())
            .collect();
        writeln!(out, "Merge: {}", parents.join(" "))?;
    }

    let author = commit.author();
    writeln!(
        out,
        "Author: {} <{}>",
        author.name().unwrap_or("unknown"),
        author.email().unwrap_or("")
    )?;
    writeln!(
        out,
        "Date:   {}",
        format_date(commit.time(), "%a %b %-d %H:%M:%S %Y %z")
    )?;
    writeln!(out)?;

    for line in commit.message().unwrap_or("").trim_end().lines() {
        if line.is_empty() {
            writeln!(out)?;
        } else {
            writeln!(out, "    {}", line)?;
        }
    }
    writeln!(out)
}

impl super::Repository for Git2Repository {
    fn log(&self, from: Option<&str>, to: Option<&str>) -> Result<String> {
        let start = match to {
            Some(revision) => self.resolve(revision)?,
            None => match self.repo.head() {
                Ok(head) => head.peel_to_commit()?.id(),
                Err(e) if e.code() == git2::ErrorCode::UnbornBranch => {
                    debug!("HEAD is unborn, log is empty");
                    return Ok(String::new());
                }
                Err(e) => return Err(e.into()),
            },
        };

        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        revwalk.push(start)?;

        if let Some(revision) = from {
            revwalk.hide(self.resolve(revision)?)?;
        }

        let mut text = String::new();
        let mut count = 0;

        for oid_result in revwalk {
            let commit = self.repo.find_commit(oid_result?)?;
            format_commit(&commit, &mut text)
                .map_err(|e| BrauError::Io(io::Error::new(io::ErrorKind::Other, e)))?;
            count += 1;
        }

        debug!("Read {} commits since {}", count, from.unwrap_or("the root"));

        Ok(text)
    }

    fn tags(&self) -> Result<Vec<Tag>> {
        let names = self.repo.tag_names(None)?;
        let mut dated: Vec<(i64, Tag)> = Vec::new();

        for name in names.iter().flatten() {
            let reference = self.repo.find_reference(&format!("refs/tags/{}", name))?;

            // Annotated tags carry their own date, lightweight ones use the commit's
            let time = match reference.peel_to_tag() {
                Ok(tag) => tag.tagger().map(|tagger| tagger.when()),
                Err(_) => None,
            };
            let time = match time {
                Some(time) => time,
                None => reference.peel_to_commit()?.time(),
            };

            dated.push((time.seconds(), Tag::new(format_date(time, "%Y-%m-%d"), name)));
        }

        // Same-second tags fall back to reverse name order
        dated.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| b.1.name.cmp(&a.1.name)));

        Ok(dated.into_iter().map(|(_, tag)| tag).collect())
    }

    fn create_tag(&self, name: &str) -> Result<()> {
        let head = self.repo.head()?.peel_to_commit()?;
        let signature = self.repo.signature()?;

        self.repo
            .tag(name, head.as_object(), &signature, name, false)?;

        debug!("Created tag {} on {}", name, head.id());
        Ok(())
    }

    fn commit(&self, message: &str, files: &[PathBuf]) -> Result<()> {
        let mut index = self.repo.index()?;

        for file in files {
            let relative = self.relative_to_workdir(file)?;
            index.add_path(&relative)?;
        }
        index.write()?;

        let tree = self.repo.find_tree(index.write_tree()?)?;
        let signature = self.repo.signature()?;

        let parent = match self.repo.head() {
            Ok(head) => Some(head.peel_to_commit()?),
            Err(_) => None,
        };
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();

        let oid = self
            .repo
            .commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)?;

        debug!("Committed {} files as {}", files.len(), oid);
        Ok(())
    }
}
