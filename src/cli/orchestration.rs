//! Release and init workflows
//!
//! Kept apart from main.rs so the workflows can be driven programmatically,
//! against any [Repository] and any [Prompter], without clap.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use log::{debug, info, warn};

use crate::analyzer::{ReleaseAnalyzer, VersionBump};
use crate::boundary::{tag_warnings, BoundaryWarning};
use crate::changelog::{create_chglog_file, find_chglog_file, update_chglog, DEFAULT_CHANGELOG};
use crate::config::{set_release_option, Config};
use crate::domain::{
    analyze_tags, next_version, LabelPattern, LabelPosition, ReleaseTarget, Stages, Tag,
    TagPattern, Version,
};
use crate::error::BrauError;
use crate::files::update_files;
use crate::git::Repository;
use crate::ui::{self, Prompter};

/// Arguments for the release workflow
///
/// Mirrors the CLI flags merged over the configuration file, in a format
/// that does not depend on clap.
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseArgs {
    /// Forced bump or exact version; the commits decide when `None`
    pub target: Option<ReleaseTarget>,

    /// Stage to release into (`dev`, `beta`, `final`, ...)
    pub stage: Option<String>,

    /// Create a release commit
    pub commit: bool,

    /// Create a release tag
    pub tag: bool,

    /// Skip the confirmation prompt
    pub confirm: bool,

    pub changelog_file: PathBuf,
    pub label_pattern: String,
    pub label_position: LabelPosition,
    pub tag_pattern: String,

    /// Version of the last release, when not taken from the tags
    pub current_version: Option<String>,

    /// Files whose quoted version string is updated
    pub files: Vec<PathBuf>,

    /// Configuration file whose `current_version` is rewritten after the release
    pub rewrite_config: Option<PathBuf>,

    /// Date printed in the changelog title
    pub date: NaiveDate,
}

impl ReleaseArgs {
    /// Arguments as configured, before command line overrides
    pub fn from_config(config: &Config) -> Self {
        ReleaseArgs {
            target: None,
            stage: None,
            commit: config.release.commit,
            tag: config.release.tag,
            confirm: config.release.confirm,
            changelog_file: config.release.changelog_file.clone(),
            label_pattern: config.labels.pattern.clone(),
            label_position: config.labels.position,
            tag_pattern: config.release.tag_pattern.clone(),
            current_version: config.release.current_version.clone(),
            files: config.release.files.clone(),
            rewrite_config: None,
            date: Local::now().date_naive(),
        }
    }
}

/// What a completed release did
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseOutcome {
    pub current: Version,
    pub new: Version,
    /// Bump level suggested by the commits
    pub bump: VersionBump,
    /// Tag created, if any
    pub tag: Option<String>,
    /// Files included in the release commit, if one was made
    pub committed: Option<Vec<PathBuf>>,
}

/// How the release workflow ended
#[derive(Debug, Clone, PartialEq)]
pub enum ReleaseStatus {
    /// No commits since the last release
    NothingToRelease,
    /// The user declined the confirmation prompt
    Aborted,
    Released(ReleaseOutcome),
}

/// Result of the release workflow with the warnings met on the way
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseReport {
    pub status: ReleaseStatus,
    pub warnings: Vec<BoundaryWarning>,
}

/// Current version and the tag it was released under
fn resolve_current(
    args: &ReleaseArgs,
    repo_tags: &[Tag],
    tag_pattern: &TagPattern,
    stages: &Stages,
) -> Result<(Version, Option<String>)> {
    if let Some(current) = &args.current_version {
        let version = Version::parse(current, stages)
            .with_context(|| format!("Invalid current version '{}'", current))?;
        let tag_name = tag_pattern.format(&version);
        let since = repo_tags
            .iter()
            .any(|tag| tag.name == tag_name)
            .then_some(tag_name);

        return Ok((version, since));
    }

    match analyze_tags(repo_tags, tag_pattern, stages).into_iter().next() {
        Some(tagged) => Ok((tagged.version, Some(tagged.tag.name))),
        None => Ok((Version::zero(stages)?, None)),
    }
}

/// Main release workflow
///
/// 1. Resolve the current version (explicit, configured, last tag, or zero)
/// 2. Read the commits since its tag and aggregate the labelled ones
/// 3. Resolve the next version and ask for confirmation
/// 4. Update the version files and the changelog
/// 5. Rewrite `current_version` in the configuration when it was set there
/// 6. Commit and tag
///
/// # Arguments
/// * `repo` - Log and tag source, commit and tag sink
/// * `args` - Merged command line and configuration
/// * `stages` - Stage table for parsing and bumping versions
/// * `prompter` - Source of the confirmation answer
pub fn run_release<R: Repository>(
    repo: &R,
    args: &ReleaseArgs,
    stages: &Stages,
    prompter: &dyn Prompter,
) -> Result<ReleaseReport> {
    let label_pattern = LabelPattern::new(args.label_pattern.clone())?;
    let analyzer = ReleaseAnalyzer::new(label_pattern, args.label_position)?;
    let tag_pattern = TagPattern::new(args.tag_pattern.clone())?;

    let tags = repo.tags().context("Failed to read tags")?;
    let mut warnings = tag_warnings(&tags, &tag_pattern, stages);

    let (current, since) = resolve_current(args, &tags, &tag_pattern, stages)?;
    debug!(
        "Current version {} (since {})",
        current,
        since.as_deref().unwrap_or("the first commit")
    );

    let data = analyzer
        .analyze_repository(repo, since.as_deref())
        .context("Failed to read the commit log")?;

    if data.commits.is_empty() {
        warnings.push(BoundaryWarning::NothingToRelease { since });
        return Ok(ReleaseReport {
            status: ReleaseStatus::NothingToRelease,
            warnings,
        });
    }

    if data.tree.is_empty() {
        warnings.push(BoundaryWarning::NoLabelledCommits {
            commit_count: data.commits.len(),
        });
    }

    let bump = data.tree.bump_version_to();
    let target = args.target.clone().unwrap_or(ReleaseTarget::Bump(bump));
    let new = next_version(&current, &target, args.stage.as_deref(), stages)?;
    info!("Releasing {} -> {} ({} suggested)", current, new, bump);

    ui::display_release_plan(&current, &new, bump, &data.tree);

    if !args.confirm && !prompter.confirm("Continue?")? {
        return Ok(ReleaseReport {
            status: ReleaseStatus::Aborted,
            warnings,
        });
    }

    if !args.changelog_file.is_file() {
        return Err(BrauError::ChangelogNotFound(args.changelog_file.display().to_string()))
            .context("Run \"brau init\" to create one");
    }

    update_files(&args.files, &current, &new)?;
    update_chglog(&args.changelog_file, &current, &new, &data.tree, args.date)?;

    let mut release_files = vec![args.changelog_file.clone()];
    release_files.extend(args.files.iter().cloned());

    if let Some(config_path) = &args.rewrite_config {
        set_release_option(config_path, "current_version", new.as_str())?;
        release_files.push(config_path.clone());
    }

    let committed = if args.commit {
        repo.commit(&format!("Release version {}", new), &release_files)
            .context("Failed to commit the release")?;
        Some(release_files)
    } else {
        None
    };

    let tag = if args.tag {
        let name = tag_pattern.format(&new);
        repo.create_tag(&name)
            .with_context(|| format!("Failed to create tag {}", name))?;
        Some(name)
    } else {
        None
    };

    for warning in &warnings {
        warn!("{}", warning);
    }

    Ok(ReleaseReport {
        status: ReleaseStatus::Released(ReleaseOutcome {
            current,
            new,
            bump,
            tag,
            committed,
        }),
        warnings,
    })
}

/// How the init workflow ended
#[derive(Debug, Clone, PartialEq)]
pub enum InitOutcome {
    /// A changelog already exists
    Found(PathBuf),
    /// A new changelog was written
    Created(PathBuf),
    /// The user did not want a changelog created
    Declined,
}

/// Find or create the changelog in `dir`.
///
/// A changelog name other than the default is recorded as `changelog_file` in the
/// configuration file so later releases pick it up.
///
/// # Arguments
/// * `dir` - Project directory
/// * `changelog_file` - Requested changelog name; the known names are searched when `None`
/// * `config_path` - Configuration file to record a custom changelog name in
/// * `prompter` - Asked before a file is created
pub fn run_init(
    dir: &Path,
    changelog_file: Option<&Path>,
    config_path: &Path,
    prompter: &dyn Prompter,
) -> Result<InitOutcome> {
    let existing = match changelog_file {
        Some(name) => Some(dir.join(name)).filter(|path| path.is_file()),
        None => find_chglog_file(dir),
    };

    let (path, outcome) = match existing {
        Some(path) => (path.clone(), InitOutcome::Found(path)),
        None => {
            let path = dir.join(changelog_file.unwrap_or(Path::new(DEFAULT_CHANGELOG)));
            let question = format!(
                "No changelog file was found. Do you want to create {}?",
                path.display()
            );

            if !prompter.confirm(&question)? {
                return Ok(InitOutcome::Declined);
            }

            create_chglog_file(&path)?;
            (path.clone(), InitOutcome::Created(path))
        }
    };

    let name = path.strip_prefix(dir).unwrap_or(path.as_path());
    if name != Path::new(DEFAULT_CHANGELOG) {
        set_release_option(config_path, "changelog_file", &name.to_string_lossy())?;
        info!("Recorded {} in {}", name.display(), config_path.display());
    }

    Ok(outcome)
}
