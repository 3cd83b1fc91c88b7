//! Tower middleware that silences application logging for selected requests,
//! matched by path or by a silence-control header. A header token can be
//! required so arbitrary clients cannot silence logs.
//!
//! For each matching request the controlled logger's threshold is raised to
//! the suppression level before the inner service runs and restored
//! unconditionally afterwards, errors and panics included. Everything else,
//! request and response alike, passes through unchanged.
//!
//! ```
//! use tower::ServiceBuilder;
//! use tower_silence::{FixedLogger, GlobalLogLevel, SilenceLayer, SilenceRule};
//!
//! # fn demo() -> Result<(), tower_silence::ConfigError> {
//! let silence = SilenceLayer::new(FixedLogger::new(GlobalLogLevel))
//!     .rule(SilenceRule::path("/ping"))
//!     .rule(SilenceRule::pattern("^/assets/")?);
//!
//! let builder = ServiceBuilder::new().layer(silence);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod logger;
pub mod middleware;
pub mod reload;
pub mod rules;

pub use config::{HeaderMode, SilenceConfig, TraceHook};
pub use error::{ConfigError, ConfigResult};
pub use logger::{
    FixedLogger, GlobalLogLevel, LevelControl, LoggerProvider, SharedLevel, SuppressGuard,
};
pub use middleware::{SilenceLayer, SilenceService};
pub use reload::ReloadLevel;
pub use rules::{SILENCE_HEADER, SilenceRule, Token};
