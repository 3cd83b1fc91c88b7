//! [`LevelControl`] over a `tracing-subscriber` reload handle.
//!
//! When the hosting application filters its subscriber through a
//! `reload::Layer<LevelFilter, _>`, the reload handle is the live threshold
//! of that subscriber, and silencing a request means reloading the filter
//! for the request's duration.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::reload;

use crate::logger::LevelControl;

/// Threshold control backed by a subscriber's reload handle.
///
/// Both directions are best effort once the subscriber is torn down: a
/// dangling handle reads as [`LevelFilter::TRACE`] and ignores writes, so a
/// request in flight during shutdown still completes.
pub struct ReloadLevel<S> {
    handle: reload::Handle<LevelFilter, S>,
}

impl<S> ReloadLevel<S> {
    #[must_use]
    pub fn new(handle: reload::Handle<LevelFilter, S>) -> Self {
        Self { handle }
    }
}

impl<S: 'static> LevelControl for ReloadLevel<S>
where
    reload::Handle<LevelFilter, S>: Send + Sync,
{
    fn level(&self) -> LevelFilter {
        self.handle.clone_current().unwrap_or(LevelFilter::TRACE)
    }

    fn set_level(&self, level: LevelFilter) {
        // Fails only when the subscriber no longer exists.
        let _ = self.handle.reload(level);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tracing_subscriber::Registry;
    use tracing_subscriber::layer::SubscriberExt;

    use super::*;
    use crate::logger::SuppressGuard;

    #[test]
    fn reload_handle_round_trips_threshold() {
        let (filter, handle) = reload::Layer::new(LevelFilter::INFO);
        let _subscriber = tracing_subscriber::registry().with(filter);

        let logger = Arc::new(ReloadLevel::new(handle));
        assert_eq!(logger.level(), LevelFilter::INFO);

        {
            let _guard = SuppressGuard::new(logger.clone(), LevelFilter::ERROR);
            assert_eq!(logger.level(), LevelFilter::ERROR);
        }
        assert_eq!(logger.level(), LevelFilter::INFO);
    }

    #[test]
    fn dangling_handle_is_inert() {
        let (filter, handle) = reload::Layer::<LevelFilter, Registry>::new(LevelFilter::INFO);
        drop(filter);

        let logger = ReloadLevel::new(handle);
        logger.set_level(LevelFilter::ERROR);
        assert_eq!(logger.level(), LevelFilter::TRACE);
    }
}
