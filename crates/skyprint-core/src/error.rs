//! Error types for Skyprint

use thiserror::Error;

/// The main error type for Skyprint operations
#[derive(Debug, Error)]
pub enum SkyprintError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid configuration: firework has no phases")]
    EmptyPhaseList,

    #[error("Invalid configuration: debris color palette is empty")]
    EmptyDebrisPalette,

    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(String),
}

impl SkyprintError {
    /// True for errors that mean the firework configuration itself is unusable.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            SkyprintError::InvalidConfig(_)
                | SkyprintError::EmptyPhaseList
                | SkyprintError::EmptyDebrisPalette
        )
    }
}

/// Result type alias for Skyprint operations
pub type Result<T> = std::result::Result<T, SkyprintError>;

impl From<toml::de::Error> for SkyprintError {
    fn from(err: toml::de::Error) -> Self {
        SkyprintError::TomlParse(err.to_string())
    }
}
