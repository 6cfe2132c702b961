use crate::domain::commit::Commit;
use crate::error::{BrauError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where the label is looked for in a commit message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelPosition {
    /// First line of the message
    Header,
    /// Last line of the message
    #[default]
    Footer,
}

impl FromStr for LabelPosition {
    type Err = BrauError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "header" => Ok(LabelPosition::Header),
            "footer" => Ok(LabelPosition::Footer),
            other => Err(BrauError::config(format!(
                "label position must be 'header' or 'footer', got '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for LabelPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelPosition::Header => write!(f, "header"),
            LabelPosition::Footer => write!(f, "footer"),
        }
    }
}

/// A commit that carries a label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemanticCommit {
    pub hash: String,
    /// One-line description shown in the changelog
    pub subject: String,
    /// Open vocabulary: `feat`, `fix`, `refactor`, ...
    pub action: String,
    pub scope: Option<String>,
    /// Full message, scanned for breaking-change markers
    pub message: String,
}

/// Compiled label convention such as `!{action}:{scope}` or `{action}({scope}): {subject}`
#[derive(Debug, Clone)]
pub struct LabelPattern {
    pattern: String,
    matcher: Regex,
}

impl LabelPattern {
    /// Compile a label pattern.
    ///
    /// Literal text is matched as is. `{action}` matches one or more word characters,
    /// `{scope}` zero or more, and `{subject}` the rest of the line. The match is
    /// anchored at the start of the line.
    ///
    /// # Returns
    /// * `Ok(LabelPattern)` - Ready to match commit headers or footers
    /// * `Err(InvalidLabelPattern)` - If `{action}` is missing or a placeholder repeats
    pub fn new(pattern: impl Into<String>) -> Result<Self> {
        let pattern = pattern.into();

        if !pattern.contains("{action}") {
            return Err(BrauError::label_pattern(format!(
                "'{}' is missing the {{action}} placeholder",
                pattern
            )));
        }

        let placeholder = Regex::new(r"\{(action|scope|subject)\}")
            .map_err(|e| BrauError::label_pattern(e.to_string()))?;

        let mut source = String::from("^");
        let mut last = 0;

        for found in placeholder.find_iter(&pattern) {
            source.push_str(&regex::escape(&pattern[last..found.start()]));
            source.push_str(match found.as_str() {
                "{action}" => r"(?P<action>\w+)",
                "{scope}" => r"(?P<scope>\w*)",
                _ => r"(?P<subject>.+)",
            });
            last = found.end();
        }
        source.push_str(&regex::escape(&pattern[last..]));

        let matcher = Regex::new(&source).map_err(|_| {
            BrauError::label_pattern(format!("'{}' repeats a placeholder", pattern))
        })?;

        Ok(LabelPattern { pattern, matcher })
    }

    /// Check that the placeholders fit the label position.
    ///
    /// `{subject}` is required in the header and forbidden in the footer, where the
    /// subject is the commit header itself.
    pub fn validate(&self, position: LabelPosition) -> Result<()> {
        let has_subject = self.pattern.contains("{subject}");

        match position {
            LabelPosition::Header if !has_subject => Err(BrauError::label_pattern(format!(
                "'{}' needs a {{subject}} placeholder when labels are in the header",
                self.pattern
            ))),
            LabelPosition::Footer if has_subject => Err(BrauError::label_pattern(format!(
                "'{}' cannot use {{subject}} when labels are in the footer",
                self.pattern
            ))),
            _ => Ok(()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// Match a single commit. Returns `None` when the commit carries no label.
    pub fn analyze(&self, commit: &Commit, position: LabelPosition) -> Option<SemanticCommit> {
        let text = match position {
            LabelPosition::Header => &commit.header,
            LabelPosition::Footer => &commit.footer,
        };

        let captures = self.matcher.captures(text)?;

        let action = captures.name("action")?.as_str().to_string();
        let scope = captures
            .name("scope")
            .map(|m| m.as_str())
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        let subject = match (position, captures.name("subject")) {
            (LabelPosition::Header, Some(m)) => m.as_str().trim().to_string(),
            _ => commit.header.trim().to_string(),
        };

        Some(SemanticCommit {
            hash: commit.hash.clone(),
            subject,
            action,
            scope,
            message: commit.message.clone(),
        })
    }
}

impl fmt::Display for LabelPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.pattern)
    }
}

/// Keep the commits that carry a label, in their original order
pub fn analyze_labels(
    commits: &[Commit],
    pattern: &LabelPattern,
    position: LabelPosition,
) -> Vec<SemanticCommit> {
    commits
        .iter()
        .filter_map(|commit| pattern.analyze(commit, position))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn footer_commits() -> Vec<Commit> {
        vec![
            Commit::from_message("1", "Add sandwich\n\nTasty.\n\n!feat:kitchen"),
            Commit::from_message("2", "Sudo make me a sandwich."),
            Commit::from_message("3", "Fix the oven\n\nIt was cold.\n\n!fix:"),
            Commit::from_message("4", "Rename stuff\n\nBREAKING CHANGE: names\n\n!refactor:api"),
        ]
    }

    #[test]
    fn test_footer_pattern() {
        let pattern = LabelPattern::new("!{action}:{scope}").unwrap();
        let commits = vec![Commit::from_message("1", "Add CLI\n\n!feat:cli")];

        let result = analyze_labels(&commits, &pattern, LabelPosition::Footer);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].action, "feat");
        assert_eq!(result[0].scope.as_deref(), Some("cli"));
        assert_eq!(result[0].subject, "Add CLI");
    }

    #[test]
    fn test_footer_no_match_is_dropped() {
        let pattern = LabelPattern::new("!{action}:{scope}").unwrap();
        let commits = vec![Commit::from_message("1", "Sudo make me a sandwich.")];
        assert!(analyze_labels(&commits, &pattern, LabelPosition::Footer).is_empty());
    }

    #[test]
    fn test_filter_preserves_order() {
        let pattern = LabelPattern::new("!{action}:{scope}").unwrap();
        let result = analyze_labels(&footer_commits(), &pattern, LabelPosition::Footer);

        let hashes: Vec<&str> = result.iter().map(|c| c.hash.as_str()).collect();
        assert_eq!(hashes, vec!["1", "3", "4"]);
        assert_eq!(result[1].scope, None);
        assert!(result[2].message.contains("BREAKING CHANGE"));
    }

    #[test]
    fn test_action_only_pattern() {
        let pattern = LabelPattern::new("!{action}").unwrap();
        let commits = vec![Commit::from_message("1", "Drop python 2\n\n!remove")];

        let result = analyze_labels(&commits, &pattern, LabelPosition::Footer);
        assert_eq!(result[0].action, "remove");
        assert_eq!(result[0].scope, None);
    }

    #[test]
    fn test_header_pattern() {
        let pattern = LabelPattern::new("{action}({scope}): {subject}").unwrap();
        let commits = vec![
            Commit::from_message("1", "feat(parser): support comments"),
            Commit::from_message("2", "fix(): handle empty input\n\nDetails."),
            Commit::from_message("3", "Merge branch 'topic'"),
        ];

        let result = analyze_labels(&commits, &pattern, LabelPosition::Header);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].action, "feat");
        assert_eq!(result[0].scope.as_deref(), Some("parser"));
        assert_eq!(result[0].subject, "support comments");
        assert_eq!(result[1].action, "fix");
        assert_eq!(result[1].scope, None);
        assert_eq!(result[1].subject, "handle empty input");
    }

    #[test]
    fn test_literal_characters_are_escaped() {
        let pattern = LabelPattern::new("[{action}] {subject}").unwrap();
        let commit = Commit::from_message("1", "[fix] Null pointer");
        let semantic = pattern.analyze(&commit, LabelPosition::Header).unwrap();
        assert_eq!(semantic.action, "fix");
        assert_eq!(semantic.subject, "Null pointer");

        // `.` must not behave as a wildcard
        let dotted = LabelPattern::new("{action}.{scope}").unwrap();
        let commit = Commit::from_message("1", "Head\n\nfeatXcli");
        assert!(dotted.analyze(&commit, LabelPosition::Footer).is_none());
    }

    #[test]
    fn test_match_is_anchored_at_start() {
        let pattern = LabelPattern::new("!{action}:{scope}").unwrap();
        let commit = Commit::from_message("1", "Head\n\nsee !feat:cli");
        assert!(pattern.analyze(&commit, LabelPosition::Footer).is_none());
    }

    #[test]
    fn test_missing_action_placeholder() {
        let result = LabelPattern::new("!{scope}");
        assert!(matches!(result, Err(BrauError::InvalidLabelPattern(_))));
    }

    #[test]
    fn test_repeated_placeholder() {
        let result = LabelPattern::new("{action}/{action}");
        assert!(matches!(result, Err(BrauError::InvalidLabelPattern(_))));
    }

    #[test]
    fn test_validate_position() {
        let footer = LabelPattern::new("!{action}:{scope}").unwrap();
        assert!(footer.validate(LabelPosition::Footer).is_ok());
        assert!(footer.validate(LabelPosition::Header).is_err());

        let header = LabelPattern::new("{action}: {subject}").unwrap();
        assert!(header.validate(LabelPosition::Header).is_ok());
        assert!(header.validate(LabelPosition::Footer).is_err());
    }

    #[test]
    fn test_label_position_from_str() {
        assert_eq!("header".parse::<LabelPosition>().unwrap(), LabelPosition::Header);
        assert_eq!("footer".parse::<LabelPosition>().unwrap(), LabelPosition::Footer);
        assert!("body".parse::<LabelPosition>().is_err());
        assert_eq!(LabelPosition::default(), LabelPosition::Footer);
    }
}
