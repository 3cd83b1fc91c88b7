use thiserror::Error;

/// Configuration-time error.
///
/// Malformed configuration is rejected while rules are being constructed,
/// never at request time: a rule that failed to build does not exist, so
/// matching can stay total and infallible.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A path pattern failed to compile.
    #[error("invalid path pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// Result type alias for configuration construction.
pub type ConfigResult<T> = Result<T, ConfigError>;
