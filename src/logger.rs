//! The controlled logger: a get/set severity threshold behind a capability
//! trait, plus the guard that scopes a threshold change to one request.
//!
//! The middleware never owns the logger. It resolves a handle per silenced
//! request through [`LoggerProvider`], raises the threshold, and restores it
//! when the guard drops, which runs on every exit path, panics included.

use std::sync::{Arc, Mutex};

use tracing::level_filters::LevelFilter;

/// Minimum-severity control surface of a logger.
///
/// Anything with a readable and writable threshold can be silenced: a
/// subscriber's reload handle ([`ReloadLevel`]), the `log` crate's global
/// max level ([`GlobalLogLevel`]), or a standalone cell ([`SharedLevel`]).
///
/// [`ReloadLevel`]: crate::reload::ReloadLevel
pub trait LevelControl: Send + Sync {
    /// Current threshold.
    fn level(&self) -> LevelFilter;

    /// Replace the threshold.
    fn set_level(&self, level: LevelFilter);
}

impl<L: LevelControl + ?Sized> LevelControl for Arc<L> {
    fn level(&self) -> LevelFilter {
        (**self).level()
    }

    fn set_level(&self, level: LevelFilter) {
        (**self).set_level(level);
    }
}

/// Resolves the logger to control, once per silenced request.
///
/// Resolution is never cached, so a deferred supplier may hand out a
/// different logger between requests (test-time replacement, reconfigured
/// subscribers). [`FixedLogger`] is the constant form; any
/// `Fn() -> Arc<dyn LevelControl>` closure is the deferred form.
pub trait LoggerProvider: Send + Sync {
    fn resolve(&self) -> Arc<dyn LevelControl>;
}

/// Constant provider: hands out the same logger on every resolution.
#[derive(Clone)]
pub struct FixedLogger(Arc<dyn LevelControl>);

impl FixedLogger {
    pub fn new(logger: impl LevelControl + 'static) -> Self {
        Self(Arc::new(logger))
    }
}

impl From<Arc<dyn LevelControl>> for FixedLogger {
    fn from(logger: Arc<dyn LevelControl>) -> Self {
        Self(logger)
    }
}

impl LoggerProvider for FixedLogger {
    fn resolve(&self) -> Arc<dyn LevelControl> {
        Arc::clone(&self.0)
    }
}

impl<F> LoggerProvider for F
where
    F: Fn() -> Arc<dyn LevelControl> + Send + Sync,
{
    fn resolve(&self) -> Arc<dyn LevelControl> {
        self()
    }
}

/// Raises a logger's threshold for the lifetime of the guard.
///
/// Construction saves the current threshold and installs the suppression
/// level; `Drop` restores the saved one. Dropping runs on normal return,
/// `?` propagation, and unwinding alike, so the threshold after the guarded
/// block always equals the threshold before it.
pub struct SuppressGuard {
    logger: Arc<dyn LevelControl>,
    restore: LevelFilter,
}

impl SuppressGuard {
    #[must_use]
    pub fn new(logger: Arc<dyn LevelControl>, level: LevelFilter) -> Self {
        let restore = logger.level();
        logger.set_level(level);
        Self { logger, restore }
    }
}

impl Drop for SuppressGuard {
    fn drop(&mut self) {
        self.logger.set_level(self.restore);
    }
}

/// Standalone mutex-backed threshold.
///
/// For embedders that gate their own emission, and for tests. One of these
/// per request context also sidesteps the shared-threshold interleaving
/// hazard described on [`SilenceLayer`].
///
/// [`SilenceLayer`]: crate::middleware::SilenceLayer
#[derive(Debug)]
pub struct SharedLevel(Mutex<LevelFilter>);

impl SharedLevel {
    #[must_use]
    pub fn new(level: LevelFilter) -> Self {
        Self(Mutex::new(level))
    }
}

impl LevelControl for SharedLevel {
    fn level(&self) -> LevelFilter {
        *self.0.lock().expect("level lock poisoned")
    }

    fn set_level(&self, level: LevelFilter) {
        *self.0.lock().expect("level lock poisoned") = level;
    }
}

/// The `log` crate's process-wide max level as a controllable threshold.
///
/// This is the closest Rust analogue to a framework's single global logger:
/// `log::set_max_level` gates every `log` macro call site at once.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobalLogLevel;

impl LevelControl for GlobalLogLevel {
    fn level(&self) -> LevelFilter {
        from_log_filter(log::max_level())
    }

    fn set_level(&self, level: LevelFilter) {
        log::set_max_level(to_log_filter(level));
    }
}

fn to_log_filter(level: LevelFilter) -> log::LevelFilter {
    if level == LevelFilter::OFF {
        log::LevelFilter::Off
    } else if level == LevelFilter::ERROR {
        log::LevelFilter::Error
    } else if level == LevelFilter::WARN {
        log::LevelFilter::Warn
    } else if level == LevelFilter::INFO {
        log::LevelFilter::Info
    } else if level == LevelFilter::DEBUG {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Trace
    }
}

fn from_log_filter(level: log::LevelFilter) -> LevelFilter {
    match level {
        log::LevelFilter::Off => LevelFilter::OFF,
        log::LevelFilter::Error => LevelFilter::ERROR,
        log::LevelFilter::Warn => LevelFilter::WARN,
        log::LevelFilter::Info => LevelFilter::INFO,
        log::LevelFilter::Debug => LevelFilter::DEBUG,
        log::LevelFilter::Trace => LevelFilter::TRACE,
    }
}
