use crate::domain::stage::Stages;
use crate::domain::version::Version;
use crate::error::{BrauError, Result};
use regex::Regex;

const VERSION_PLACEHOLDER: &str = "{version}";

/// A git tag with its creation date
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// `YYYY-MM-DD`
    pub date: String,
    pub name: String,
}

impl Tag {
    pub fn new(date: impl Into<String>, name: impl Into<String>) -> Self {
        Tag {
            date: date.into(),
            name: name.into(),
        }
    }
}

/// Tag naming pattern (e.g., "v{version}", "release-{version}")
#[derive(Debug, Clone)]
pub struct TagPattern {
    pattern: String,
    prefix: String,
    suffix: String,
}

impl TagPattern {
    /// Create a tag pattern; it must contain exactly one `{version}` placeholder
    pub fn new(pattern: impl Into<String>) -> Result<Self> {
        let pattern = pattern.into();

        if pattern.matches(VERSION_PLACEHOLDER).count() != 1 {
            return Err(BrauError::tag_pattern(format!(
                "'{}' must contain the {{version}} placeholder exactly once",
                pattern
            )));
        }

        let (prefix, suffix) = pattern
            .split_once(VERSION_PLACEHOLDER)
            .map(|(p, s)| (p.to_string(), s.to_string()))
            .unwrap_or_default();

        Ok(TagPattern {
            pattern,
            prefix,
            suffix,
        })
    }

    /// Format a version according to pattern
    /// Example: pattern="v{version}", version="1.2.3" -> "v1.2.3"
    pub fn format(&self, version: &Version) -> String {
        format!("{}{}{}", self.prefix, version, self.suffix)
    }

    /// Version part of a tag name, if the name follows this pattern
    pub fn extract<'a>(&self, name: &'a str) -> Option<&'a str> {
        let source = format!(
            "^{}(?P<version>.+){}$",
            regex::escape(&self.prefix),
            regex::escape(&self.suffix)
        );

        Regex::new(&source)
            .ok()
            .and_then(|re| re.captures(name))
            .and_then(|c| c.name("version"))
            .map(|m| m.as_str())
    }

    pub fn as_str(&self) -> &str {
        &self.pattern
    }
}

/// A tag whose name carries a parsable version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedVersion {
    pub tag: Tag,
    pub version: Version,
}

/// Pair each tag that follows `pattern` with its version, in input order.
///
/// Tags come newest first, so the first entry is the current release. Tags that do
/// not follow the pattern or whose version part does not parse are skipped.
pub fn analyze_tags(tags: &[Tag], pattern: &TagPattern, stages: &Stages) -> Vec<TaggedVersion> {
    tags.iter()
        .filter_map(|tag| {
            let version = pattern
                .extract(&tag.name)
                .and_then(|v| Version::parse(v, stages).ok())?;

            Some(TaggedVersion {
                tag: tag.clone(),
                version,
            })
        })
        .collect()
}
