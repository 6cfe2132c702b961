use crate::changelog::DEFAULT_CHANGELOG;
use crate::domain::{LabelPattern, LabelPosition, Stages, TagPattern};
use crate::error::Result;
use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the project configuration file
pub const CONFIG_FILE: &str = "brau.toml";

/// Represents the complete configuration for braulio.
///
/// Holds the release behavior, the label convention and the ordered stage table.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub release: ReleaseConfig,

    #[serde(default)]
    pub labels: LabelConfig,

    #[serde(default = "default_stages")]
    pub stages: Vec<StageConfig>,
}

fn default_true() -> bool {
    true
}

fn default_changelog_file() -> PathBuf {
    PathBuf::from(DEFAULT_CHANGELOG)
}

fn default_tag_pattern() -> String {
    "v{version}".to_string()
}

fn default_label_pattern() -> String {
    "!{action}:{scope}".to_string()
}

/// Returns the default stage table: dev, beta, final.
fn default_stages() -> Vec<StageConfig> {
    vec![
        StageConfig::new("dev", "{major}.{minor}.{patch}.dev{n}"),
        StageConfig::new("beta", "{major}.{minor}.{patch}beta{n}"),
        StageConfig::new("final", "{major}.{minor}.{patch}"),
    ]
}

/// What a release does besides computing the version
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ReleaseConfig {
    /// Commit the changelog and updated files
    #[serde(default = "default_true")]
    pub commit: bool,

    /// Tag the release commit
    #[serde(default = "default_true")]
    pub tag: bool,

    /// Skip the confirmation prompt
    #[serde(default)]
    pub confirm: bool,

    /// Files whose quoted version string is updated
    #[serde(default)]
    pub files: Vec<PathBuf>,

    #[serde(default = "default_changelog_file")]
    pub changelog_file: PathBuf,

    #[serde(default = "default_tag_pattern")]
    pub tag_pattern: String,

    /// Version of the last release when it is not derived from tags
    #[serde(default)]
    pub current_version: Option<String>,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        ReleaseConfig {
            commit: true,
            tag: true,
            confirm: false,
            files: Vec::new(),
            changelog_file: default_changelog_file(),
            tag_pattern: default_tag_pattern(),
            current_version: None,
        }
    }
}

/// Label convention used to classify commits
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct LabelConfig {
    #[serde(default = "default_label_pattern")]
    pub pattern: String,

    #[serde(default)]
    pub position: LabelPosition,
}

impl Default for LabelConfig {
    fn default() -> Self {
        LabelConfig {
            pattern: default_label_pattern(),
            position: LabelPosition::default(),
        }
    }
}

/// One entry of the ordered stage table
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct StageConfig {
    pub label: String,
    pub template: String,
}

impl StageConfig {
    pub fn new(label: impl Into<String>, template: impl Into<String>) -> Self {
        StageConfig {
            label: label.into(),
            template: template.into(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            release: ReleaseConfig::default(),
            labels: LabelConfig::default(),
            stages: default_stages(),
        }
    }
}

impl Config {
    /// Parse configuration from TOML text
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Validated stage table
    pub fn stages(&self) -> Result<Stages> {
        Stages::new(
            self.stages
                .iter()
                .map(|stage| (stage.label.clone(), stage.template.clone())),
        )
    }

    /// Compiled label pattern, checked against the configured position
    pub fn label_pattern(&self) -> Result<LabelPattern> {
        let pattern = LabelPattern::new(self.labels.pattern.clone())?;
        pattern.validate(self.labels.position)?;
        Ok(pattern)
    }

    pub fn tag_pattern(&self) -> Result<TagPattern> {
        TagPattern::new(self.release.tag_pattern.clone())
    }
}

/// Locates the configuration file.
///
/// Lookup order:
/// 1. Custom path provided as parameter
/// 2. `brau.toml` in current directory
/// 3. `brau.toml` in the user config directory
///
/// # Returns
/// * `Some(PathBuf)` - The first candidate that exists (a custom path is returned as is)
/// * `None` - If no configuration file was found
pub fn find_config_path(config_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = config_path {
        return Some(path.to_path_buf());
    }

    let local = Path::new(".").join(CONFIG_FILE);
    if local.is_file() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_FILE))
        .filter(|path| path.is_file())
}

/// Loads configuration from file or returns defaults.
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    match find_config_path(config_path) {
        Some(path) => {
            debug!("Loading configuration from {}", path.display());
            Config::from_toml(&fs::read_to_string(&path)?)
        }
        None => {
            debug!("No configuration file found, using defaults");
            Ok(Config::default())
        }
    }
}

/// Set `key` in the `[release]` section of the file at `path`, keeping every other line.
///
/// An existing assignment is replaced in place. Otherwise the key is added right
/// below the `[release]` header, and the section is appended when missing. The
/// file is created when it does not exist.
pub fn set_release_option(path: &Path, key: &str, value: &str) -> Result<()> {
    let assignment = format!("{} = {}", key, toml::Value::String(value.to_string()));

    let text = if path.exists() {
        fs::read_to_string(path)?
    } else {
        String::new()
    };

    let key_line = Regex::new(&format!(r"^\s*{}\s*=", regex::escape(key)))
        .map_err(|e| crate::error::BrauError::config(e.to_string()))?;

    let mut lines: Vec<String> = text.lines().map(str::to_string).collect();
    let mut section: Option<String> = None;
    let mut header_index: Option<usize> = None;
    let mut replaced = false;

    for (index, line) in lines.iter_mut().enumerate() {
        let trimmed = line.trim();
        if trimmed.starts_with('[') {
            section = Some(trimmed.to_string());
            if trimmed == "[release]" {
                header_index = Some(index);
            }
            continue;
        }

        if section.as_deref() == Some("[release]") && key_line.is_match(line) {
            *line = assignment.clone();
            replaced = true;
            break;
        }
    }

    if !replaced {
        match header_index {
            Some(index) => lines.insert(index + 1, assignment),
            None => {
                if lines.last().is_some_and(|line| !line.trim().is_empty()) {
                    lines.push(String::new());
                }
                lines.push("[release]".to_string());
                lines.push(assignment);
            }
        }
    }

    let mut updated = lines.join("\n");
    updated.push('\n');
    fs::write(path, updated)?;

    debug!("Set {} in {}", key, path.display());
    Ok(())
}
