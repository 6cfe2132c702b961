//! Release stages for staged versions
//!
//! A stage names a point in a version's pre-release lifecycle (`dev`, `beta`, ...)
//! or the terminal `final` state. Each stage carries its own serialization template,
//! and its position in the table is its rank: earlier stages are "less released".

use crate::error::{BrauError, Result};
use regex::Regex;

/// Key of the terminal, most released stage
pub const FINAL: &str = "final";

/// Template used for the final stage when none is configured
pub const FINAL_TEMPLATE: &str = "{major}.{minor}.{patch}";

/// A single configured stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stage {
    /// Name used in configuration and on the command line
    pub label: String,
    /// Letters that identify the stage inside a version string (`final` if none)
    pub key: String,
    /// Serialization template, e.g. `{major}.{minor}.{patch}beta{n}`
    pub template: String,
}

impl Stage {
    /// Build a stage from its label and serialization template.
    ///
    /// The template must be `{major}.{minor}.{patch}`, optionally followed by
    /// stage letters and the `{n}` placeholder (`{major}.{minor}.{patch}.dev{n}`).
    ///
    /// # Returns
    /// * `Ok(Stage)` - The stage, keyed by the letters in front of `{n}`
    /// * `Err(InvalidStageSerializer)` - If the template has any other shape
    pub fn new(label: impl Into<String>, template: impl Into<String>) -> Result<Self> {
        let label = label.into();
        let template = template.into();

        let captures = Regex::new(r"^\{major\}\.\{minor\}\.\{patch\}(?:\.?([a-z]+)\{n\})?$")
            .ok()
            .and_then(|re| re.captures(&template).map(|c| c.get(1).map(|m| m.as_str().to_string())))
            .ok_or_else(|| {
                BrauError::InvalidStageSerializer(format!(
                    "'{}' for stage '{}' must look like {{major}}.{{minor}}.{{patch}} \
                     optionally followed by letters and {{n}}",
                    template, label
                ))
            })?;

        let key = captures.unwrap_or_else(|| FINAL.to_string());

        Ok(Stage {
            label,
            key,
            template,
        })
    }

    /// Whether this is the terminal stage
    pub fn is_final(&self) -> bool {
        self.key == FINAL
    }

    /// Render a version through this stage's template
    pub fn format(&self, major: u32, minor: u32, patch: u32, n: u32) -> String {
        self.template
            .replace("{major}", &major.to_string())
            .replace("{minor}", &minor.to_string())
            .replace("{patch}", &patch.to_string())
            .replace("{n}", &n.to_string())
    }
}

/// Ordered stage table.
///
/// Passed explicitly to every version construction and bump, so several tables can
/// coexist (one per project, one per test) without shared mutable state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stages {
    stages: Vec<Stage>,
}

impl Stages {
    /// Build a table from ordered `(label, template)` pairs.
    ///
    /// Order defines rank. When no template produces the `final` key, a final stage
    /// with the plain `{major}.{minor}.{patch}` template is appended as the most
    /// released stage.
    ///
    /// # Returns
    /// * `Ok(Stages)` - The validated table
    /// * `Err(InvalidStageSerializer)` - If a template is malformed or two stages share a key
    pub fn new<I, L, T>(ordered: I) -> Result<Self>
    where
        I: IntoIterator<Item = (L, T)>,
        L: Into<String>,
        T: Into<String>,
    {
        let mut stages: Vec<Stage> = Vec::new();

        for (label, template) in ordered {
            let stage = Stage::new(label, template)?;

            if stages.iter().any(|s| s.key == stage.key) {
                return Err(BrauError::InvalidStageSerializer(format!(
                    "stage key '{}' is defined more than once",
                    stage.key
                )));
            }

            stages.push(stage);
        }

        if !stages.iter().any(Stage::is_final) {
            stages.push(Stage {
                label: FINAL.to_string(),
                key: FINAL.to_string(),
                template: FINAL_TEMPLATE.to_string(),
            });
        }

        Ok(Stages { stages })
    }

    /// Find a stage by key, falling back to its label
    pub fn get(&self, name: &str) -> Option<&Stage> {
        self.by_key(name)
            .or_else(|| self.stages.iter().find(|s| s.label == name))
    }

    /// Find a stage by the letters used inside version strings
    pub fn by_key(&self, key: &str) -> Option<&Stage> {
        self.stages.iter().find(|s| s.key == key)
    }

    /// Position of a stage key in the table
    pub fn rank(&self, key: &str) -> Option<usize> {
        self.stages.iter().position(|s| s.key == key)
    }

    /// Iterate over the stages in rank order
    pub fn iter(&self) -> impl Iterator<Item = &Stage> {
        self.stages.iter()
    }

    /// Number of configured stages
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// A table always holds at least the final stage
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

impl Default for Stages {
    fn default() -> Self {
        let stage = |label: &str, template: &str| Stage {
            label: label.to_string(),
            key: label.to_string(),
            template: template.to_string(),
        };

        Stages {
            stages: vec![
                stage("dev", "{major}.{minor}.{patch}.dev{n}"),
                stage("beta", "{major}.{minor}.{patch}beta{n}"),
                stage(FINAL, FINAL_TEMPLATE),
            ],
        }
    }
}
