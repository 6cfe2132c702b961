use regex::Regex;

/// Indentation `git log` puts in front of every message line
const MESSAGE_INDENT: &str = "    ";

/// A commit read from the `git log` medium layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub hash: String,
    /// First line of the message
    pub header: String,
    /// Everything after the blank line that follows the header
    pub body: Option<String>,
    /// Last line of the message, where trailing labels live
    pub footer: String,
    /// Full message text without the log indentation
    pub message: String,
}

impl Commit {
    /// Parse a single log block:
    ///
    /// ```text
    /// commit 0f3c8a1c6b2d4e5f60718293a4b5c6d7e8f90a1b
    /// Author: Jane Doe <jane@example.com>
    /// Date:   Mon Jan 8 10:15:00 2024 +0100
    ///
    ///     Add sandwich support
    ///
    ///     !feat:kitchen
    /// ```
    ///
    /// Lines between the hash line and the first blank line (`Author:`, `Merge:`,
    /// `Date:`) are skipped. Trailing blank lines never become part of the message.
    pub fn parse(block: &str) -> Self {
        let mut lines = block.lines();

        let hash = lines
            .next()
            .and_then(|line| line.strip_prefix("commit "))
            .and_then(|rest| rest.split_whitespace().next())
            .unwrap_or_default()
            .to_string();

        let mut message_lines: Vec<&str> = lines
            .skip_while(|line| !line.trim().is_empty())
            .skip(1)
            .map(|line| line.strip_prefix(MESSAGE_INDENT).unwrap_or(line.trim_start()))
            .collect();

        while message_lines.last().is_some_and(|line| line.trim().is_empty()) {
            message_lines.pop();
        }

        Self::from_lines(hash, &message_lines)
    }

    /// Build a commit from a hash and a plain (unindented) message
    pub fn from_message(hash: impl Into<String>, message: &str) -> Self {
        let mut lines: Vec<&str> = message.lines().collect();

        while lines.last().is_some_and(|line| line.trim().is_empty()) {
            lines.pop();
        }

        Self::from_lines(hash.into(), &lines)
    }

    fn from_lines(hash: String, lines: &[&str]) -> Self {
        let header = lines.first().copied().unwrap_or_default().to_string();
        let footer = lines.last().copied().unwrap_or_default().to_string();

        let body = if lines.len() > 2 && lines[1].trim().is_empty() {
            Some(lines[2..].join("\n"))
        } else {
            None
        };

        Commit {
            hash,
            header,
            body,
            footer,
            message: lines.join("\n"),
        }
    }
}

/// Split raw `git log` output into commits, newest first as git prints them.
///
/// A new commit starts at every line of the form `commit <40 hex digits>`.
/// Anything before the first such line is ignored.
pub fn parse_commits(log: &str) -> Vec<Commit> {
    let Ok(start) = Regex::new(r"^commit [0-9a-f]{40}\b") else {
        return Vec::new();
    };

    let mut blocks: Vec<Vec<&str>> = Vec::new();

    for line in log.lines() {
        if start.is_match(line) {
            blocks.push(vec![line]);
        } else if let Some(block) = blocks.last_mut() {
            block.push(line);
        }
    }

    blocks
        .iter()
        .map(|block| Commit::parse(&block.join("\n")))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const HASH: &str = "0f3c8a1c6b2d4e5f60718293a4b5c6d7e8f90a1b";

    fn block(message: &str) -> String {
        let indented: Vec<String> = message
            .lines()
            .map(|line| {
                if line.is_empty() {
                    String::new()
                } else {
                    format!("    {}", line)
                }
            })
            .collect();

        format!(
            "commit {}\nAuthor: Jane Doe <jane@example.com>\nDate:   Mon Jan 8 10:15:00 2024 +0100\n\n{}\n",
            HASH,
            indented.join("\n")
        )
    }

    #[test]
    fn test_parse_one_line_message() {
        let commit = Commit::parse(&block("Fix typo"));
        assert_eq!(commit.hash, HASH);
        assert_eq!(commit.header, "Fix typo");
        assert_eq!(commit.footer, "Fix typo");
        assert_eq!(commit.body, None);
        assert_eq!(commit.message, "Fix typo");
    }

    #[test]
    fn test_parse_header_and_body() {
        let commit = Commit::parse(&block("Add login\n\nUsers can now sign in."));
        assert_eq!(commit.header, "Add login");
        assert_eq!(commit.body, Some("Users can now sign in.".to_string()));
        assert_eq!(commit.footer, "Users can now sign in.");
    }

    #[test]
    fn test_parse_multi_paragraph_body() {
        let commit = Commit::parse(&block(
            "Add login\n\nFirst paragraph.\n\nBREAKING CHANGE: sessions reset\n\n!feat:auth",
        ));
        assert_eq!(
            commit.body.as_deref(),
            Some("First paragraph.\n\nBREAKING CHANGE: sessions reset\n\n!feat:auth")
        );
        assert_eq!(commit.footer, "!feat:auth");
        assert!(commit.message.starts_with("Add login\n\nFirst"));
    }

    #[test]
    fn test_parse_without_blank_separator_has_no_body() {
        let commit = Commit::parse(&block("Add login\nsecond line"));
        assert_eq!(commit.body, None);
        assert_eq!(commit.footer, "second line");
    }

    #[test]
    fn test_trailing_blank_lines_are_dropped() {
        let text = format!("{}\n\n\n", block("Add login\n\nBody text"));
        let commit = Commit::parse(&text);
        assert_eq!(commit.body, Some("Body text".to_string()));
        assert_eq!(commit.footer, "Body text");
    }

    #[test]
    fn test_parse_merge_commit_header_lines() {
        let text = format!(
            "commit {} (HEAD -> main)\nMerge: 1a2b3c4 5d6e7f8\nAuthor: Jane <j@x.org>\nDate:   Mon Jan 8 10:15:00 2024 +0100\n\n    Merge branch 'topic'\n",
            HASH
        );
        let commit = Commit::parse(&text);
        assert_eq!(commit.hash, HASH);
        assert_eq!(commit.header, "Merge branch 'topic'");
    }

    #[test]
    fn test_from_message() {
        let commit = Commit::from_message("abc", "Header\n\nBody\n!fix:\n");
        assert_eq!(commit.header, "Header");
        assert_eq!(commit.body, Some("Body\n!fix:".to_string()));
        assert_eq!(commit.footer, "!fix:");
    }

    #[test]
    fn test_parse_commits_splits_blocks() {
        let log = format!(
            "{}\n{}",
            block("Second\n\n!feat:"),
            block("First").replace(HASH, "1111111111111111111111111111111111111111")
        );
        let commits = parse_commits(&log);
        assert_eq!(commits.len(), 2);
        assert_eq!(commits[0].header, "Second");
        assert_eq!(commits[0].footer, "!feat:");
        assert_eq!(commits[1].header, "First");
        assert_eq!(commits[1].hash, "1111111111111111111111111111111111111111");
    }

    #[test]
    fn test_message_mentioning_commit_does_not_split() {
        let commits = parse_commits(&block("Revert\n\ncommit abc was wrong"));
        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].body, Some("commit abc was wrong".to_string()));
    }

    #[test]
    fn test_parse_commits_empty_log() {
        assert!(parse_commits("").is_empty());
        assert!(parse_commits("\n\n").is_empty());
    }
}
