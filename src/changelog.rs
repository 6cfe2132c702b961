//! reStructuredText changelog
//!
//! Releases are inserted newest first, right below the document title:
//!
//! ```text
//! History
//! =======
//!
//! 1.1.0 (2024-01-08)
//! ------------------
//!
//! Features
//! ~~~~~~~~
//!
//! * cli - Add --verbose
//! ```

use crate::analyzer::{ReleaseDataTree, ScopeGroups};
use crate::domain::{SemanticCommit, Version};
use crate::error::{BrauError, Result};
use chrono::NaiveDate;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

/// Changelog names picked up without configuration, in lookup order
pub const KNOWN_CHANGELOG_FILES: [&str; 3] = ["HISTORY.rst", "CHANGELOG.rst", "CHANGES.rst"];

pub const DEFAULT_CHANGELOG: &str = "HISTORY.rst";

const UNDERLINES: [char; 3] = ['=', '-', '~'];

/// Actions listed in the changelog with their section titles
const SECTIONS: [(&str, &str); 2] = [("fix", "Bug Fixes"), ("feat", "Features")];

/// First known changelog that exists in `dir`
pub fn find_chglog_file(dir: &Path) -> Option<PathBuf> {
    KNOWN_CHANGELOG_FILES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

/// Create a changelog holding only the `History` title
pub fn create_chglog_file(path: &Path) -> Result<()> {
    fs::write(path, render_title("History", 1))?;
    info!("Created {}", path.display());
    Ok(())
}

/// Title underlined with `=`, `-` or `~` for levels 1 to 3, followed by a blank line
pub fn render_title(title: &str, level: usize) -> String {
    let index = level.clamp(1, UNDERLINES.len()) - 1;
    let underline: String = std::iter::repeat(UNDERLINES[index])
        .take(title.chars().count())
        .collect();

    format!("{}\n{}\n\n", title, underline)
}

fn render_sublist(commits: &[SemanticCommit]) -> String {
    commits
        .iter()
        .map(|commit| format!("  - {}\n", commit.subject))
        .collect()
}

/// Bullet list of one action: scopeless subjects first, then one entry per scope
pub fn render_list(scopes: &ScopeGroups) -> String {
    let mut markup = String::new();

    if let Some(commits) = scopes.get(&None) {
        for commit in commits {
            markup.push_str(&format!("* {}\n", commit.subject));
        }
    }

    for (scope, commits) in scopes.iter().filter_map(|(scope, c)| Some((scope.as_deref()?, c))) {
        match commits.as_slice() {
            [] => {}
            [single] => markup.push_str(&format!("* {} - {}\n", scope, single.subject)),
            several => {
                markup.push_str(&format!("* {}\n\n", scope));
                markup.push_str(&render_sublist(several));
            }
        }
    }

    markup.push('\n');
    markup
}

/// Markup for one release: a dated title and the fix/feat sections present in `tree`
pub fn render_release(version: &Version, tree: &ReleaseDataTree, date: NaiveDate) -> String {
    let title = format!("{} ({})", version, date.format("%Y-%m-%d"));
    let mut markup = render_title(&title, 2);

    for (action, section) in SECTIONS {
        if let Some(scopes) = tree.get(action) {
            markup.push_str(&render_title(section, 3));
            markup.push_str(&render_list(scopes));
        }
    }

    markup
}

fn is_adornment(line: &str) -> bool {
    let line = line.trim_end();
    let mut chars = line.chars();

    match chars.next() {
        Some(first) if first.is_ascii_punctuation() => {
            line.len() >= 2 && chars.all(|c| c == first)
        }
        _ => false,
    }
}

/// Whether `line` is a section title, given the line below it.
///
/// A title is a non-blank line that is not itself an adornment, underlined by a
/// run of one punctuation character at least as long as the title.
pub fn is_title(line: &str, underline: Option<&str>) -> bool {
    let text = line.trim_end();

    match underline {
        Some(underline) if !text.trim().is_empty() && !is_adornment(text) => {
            is_adornment(underline)
                && underline.trim_end().chars().count() >= text.chars().count()
        }
        _ => false,
    }
}

/// Split a changelog where a new release should go.
///
/// The split point is the start of the section whose title begins with `marker`,
/// an overline included. Without such a section it is the start of the first
/// section after the document title, and without that the end of the text.
pub fn split_chglog<'a>(text: &'a str, marker: &str) -> (&'a str, &'a str) {
    let mut offsets = Vec::new();
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        offsets.push(offset);
        offset += line.len();
    }
    let lines: Vec<&str> = text.lines().collect();

    let titles: Vec<usize> = (0..lines.len())
        .filter(|&i| is_title(lines[i], lines.get(i + 1).copied()))
        .collect();

    // An overline repeats the title's underline and is not the underline of the
    // line above it
    let has_overline = |i: usize| -> bool {
        let Some(above) = i.checked_sub(1).map(|j| lines[j]) else {
            return false;
        };
        let underline = lines.get(i + 1).copied().unwrap_or_default();
        let underlines_previous = i >= 2 && is_title(lines[i - 2], Some(above));

        is_adornment(above) && above.trim_end() == underline.trim_end() && !underlines_previous
    };

    let section_start = |i: usize| -> usize {
        if has_overline(i) {
            offsets[i - 1]
        } else {
            offsets[i]
        }
    };

    let marked = titles.iter().copied().find(|&i| {
        let title = lines[i].trim();
        title == marker || title.starts_with(&format!("{} ", marker))
    });

    match marked.or_else(|| titles.get(1).copied()) {
        Some(i) => text.split_at(section_start(i)),
        None => (text, ""),
    }
}

/// Insert the release of `new` into the changelog at `path`.
///
/// # Arguments
/// * `path` - Changelog file, must exist
/// * `current` - Version of the previous release, used to find where to insert
/// * `new` - Version being released
/// * `tree` - Release data, only read
/// * `date` - Release date shown in the title
pub fn update_chglog(
    path: &Path,
    current: &Version,
    new: &Version,
    tree: &ReleaseDataTree,
    date: NaiveDate,
) -> Result<()> {
    if !path.is_file() {
        return Err(BrauError::ChangelogNotFound(path.display().to_string()));
    }

    let text = fs::read_to_string(path)?;
    let (top, bottom) = split_chglog(&text, current.as_str());

    let mut updated = String::with_capacity(text.len() + 256);
    updated.push_str(top);
    if !top.is_empty() && !top.ends_with("\n\n") {
        updated.push_str(if top.ends_with('\n') { "\n" } else { "\n\n" });
    }
    updated.push_str(&render_release(new, tree, date));
    updated.push_str(bottom);

    fs::write(path, updated)?;
    info!("Updated {} with {}", path.display(), new);
    Ok(())
}
