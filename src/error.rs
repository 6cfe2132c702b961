use thiserror::Error;

/// Unified error type for braulio operations
#[derive(Error, Debug)]
pub enum BrauError {
    #[error("{0} is not a valid version string")]
    InvalidVersionString(String),

    #[error("Unknown stage: {0}")]
    UnknownStage(String),

    #[error("Invalid stage serializer: {0}")]
    InvalidStageSerializer(String),

    #[error("Invalid bump: {0}")]
    InvalidBump(String),

    #[error("Invalid label pattern: {0}")]
    InvalidLabelPattern(String),

    #[error("Invalid tag pattern: {0}")]
    InvalidTagPattern(String),

    #[error("Unable to find a version string to update in \"{0}\"")]
    VersionStringNotFound(String),

    #[error("Unable to find {0}")]
    ChangelogNotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Convenience type alias for Results in braulio
pub type Result<T> = std::result::Result<T, BrauError>;

impl BrauError {
    /// Create an invalid bump error with context
    pub fn invalid_bump(msg: impl Into<String>) -> Self {
        BrauError::InvalidBump(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        BrauError::Config(msg.into())
    }

    /// Create an unknown stage error
    pub fn unknown_stage(stage: impl Into<String>) -> Self {
        BrauError::UnknownStage(stage.into())
    }

    /// Create a label pattern error with context
    pub fn label_pattern(msg: impl Into<String>) -> Self {
        BrauError::InvalidLabelPattern(msg.into())
    }

    /// Create a tag pattern error with context
    pub fn tag_pattern(msg: impl Into<String>) -> Self {
        BrauError::InvalidTagPattern(msg.into())
    }
}
