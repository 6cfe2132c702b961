//! Pure formatting functions for UI output.
//!
//! Formatting is kept apart from printing so the release plan can be checked
//! in tests. Colors come from `console` and are dropped when the output is not
//! a terminal.

use console::style;

use crate::analyzer::{ReleaseDataTree, VersionBump};
use crate::boundary::BoundaryWarning;
use crate::domain::Version;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Display a boundary warning to the user.
///
/// Shows a yellow warning icon followed by the warning message.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Summary shown before a release is confirmed.
///
/// Lists the version change, the bump reason and the labelled commits by action.
///
/// # Arguments
/// * `current` - Version of the last release
/// * `new` - Version about to be released
/// * `bump` - Bump level suggested by the commits
/// * `tree` - Labelled commits
pub fn format_release_plan(
    current: &Version,
    new: &Version,
    bump: VersionBump,
    tree: &ReleaseDataTree,
) -> String {
    let mut out = String::new();

    out.push_str(&format!("{}\n", style("Release plan:").bold()));
    out.push_str(&format!(
        "  From: {}\n  To:   {}\n",
        style(current).red(),
        style(new).green()
    ));

    let reason = if tree.has_breaking_changes() {
        "breaking changes"
    } else if tree.get("feat").is_some() {
        "new features"
    } else {
        "fixes and other changes"
    };
    out.push_str(&format!("  Commits suggest a {} bump ({})\n", bump, reason));

    for action in tree.actions() {
        out.push_str(&format!("\n  {}\n", style(action).bold()));

        if let Some(scopes) = tree.get(action) {
            for (scope, commits) in scopes {
                for commit in commits {
                    match scope {
                        None => out.push_str(&format!("    - {}\n", commit.subject)),
                        Some(scope) => out.push_str(&format!(
                            "    - {}: {}\n",
                            style(scope).cyan(),
                            commit.subject
                        )),
                    }
                }
            }
        }
    }

    out
}

/// Print the release plan
pub fn display_release_plan(
    current: &Version,
    new: &Version,
    bump: VersionBump,
    tree: &ReleaseDataTree,
) {
    println!("\n{}", format_release_plan(current, new, bump, tree));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{SemanticCommit, Stages};

    fn commit(action: &str, scope: Option<&str>, subject: &str, message: &str) -> SemanticCommit {
        SemanticCommit {
            hash: String::new(),
            subject: subject.to_string(),
            action: action.to_string(),
            scope: scope.map(str::to_string),
            message: message.to_string(),
        }
    }

    #[test]
    fn test_format_release_plan() {
        console::set_colors_enabled(false);
        let stages = Stages::default();
        let tree = ReleaseDataTree::aggregate(&[
            commit("feat", Some("cli"), "Add --verbose", ""),
            commit("fix", None, "Crash on empty log", ""),
        ]);

        let plan = format_release_plan(
            &Version::parse("1.2.0", &stages).unwrap(),
            &Version::parse("1.3.0", &stages).unwrap(),
            tree.bump_version_to(),
            &tree,
        );

        assert!(plan.contains("From: 1.2.0"));
        assert!(plan.contains("To:   1.3.0"));
        assert!(plan.contains("minor bump (new features)"));
        assert!(plan.contains("    - cli: Add --verbose"));
        assert!(plan.contains("    - Crash on empty log"));
    }

    #[test]
    fn test_format_release_plan_breaking() {
        console::set_colors_enabled(false);
        let stages = Stages::default();
        let tree = ReleaseDataTree::aggregate(&[commit("fix", None, "x", "BREAKING CHANGE: y")]);

        let plan = format_release_plan(
            &Version::parse("1.2.0", &stages).unwrap(),
            &Version::parse("2.0.0", &stages).unwrap(),
            tree.bump_version_to(),
            &tree,
        );
        assert!(plan.contains("major bump (breaking changes)"));
    }

    #[test]
    fn test_display_functions_do_not_panic() {
        display_error("test error");
        display_success("test success");
        display_status("test status");
        display_boundary_warning(&BoundaryWarning::NoLabelledCommits { commit_count: 2 });
    }
}
