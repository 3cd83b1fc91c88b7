//! Request-silencing middleware for tower services.
//!
//! Wraps a service and, for requests matching the configured silencing
//! rules, raises the controlled logger's threshold for the duration of the
//! inner call. Non-matching requests pass through with no logger access at
//! all. The response is never touched either way.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use http::Request;
use tower::{Layer, Service};
use tracing::debug;
use tracing::level_filters::LevelFilter;

use crate::config::{HeaderMode, SilenceConfig, TraceHook};
use crate::logger::{LoggerProvider, SuppressGuard};
use crate::rules::SilenceRule;

/// Tower layer that silences logging for matching requests.
///
/// ```
/// use tower_silence::{FixedLogger, HeaderMode, SharedLevel, SilenceLayer, SilenceRule};
///
/// # fn build() -> Result<(), tower_silence::ConfigError> {
/// let logger = FixedLogger::new(SharedLevel::new(tracing::level_filters::LevelFilter::INFO));
/// let layer = SilenceLayer::new(logger)
///     .header_mode(HeaderMode::Token)
///     .rule(SilenceRule::token("decafbad"))
///     .rule(SilenceRule::path("/noisy/action.json"))
///     .rule(SilenceRule::pattern("^/uninteresting/[0-9]+")?);
/// # Ok(())
/// # }
/// ```
///
/// # Shared-threshold hazard
///
/// The controlled threshold is typically process-wide. Two silenced
/// requests that overlap in time interleave their save/restore windows, and
/// the threshold left behind may be the suppressed one. This layer adds no
/// locking; a lock could serialize the mutations but not make two
/// overlapping windows correct. Embedders running silenced endpoints under
/// real concurrency should control a request-scoped threshold instead, e.g.
/// a [`SharedLevel`] per task or a scoped subscriber.
///
/// [`SharedLevel`]: crate::logger::SharedLevel
#[derive(Clone)]
pub struct SilenceLayer {
    config: SilenceConfig,
}

impl SilenceLayer {
    /// Create a layer controlling the logger resolved by `provider`.
    ///
    /// [`FixedLogger`] always silences the same logger; a
    /// `Fn() -> Arc<dyn LevelControl>` closure defers resolution to each
    /// silenced request.
    ///
    /// [`FixedLogger`]: crate::logger::FixedLogger
    #[must_use]
    pub fn new(provider: impl LoggerProvider + 'static) -> Self {
        Self {
            config: SilenceConfig::new(Arc::new(provider)),
        }
    }

    /// Append one silencing rule.
    #[must_use]
    pub fn rule(mut self, rule: impl Into<SilenceRule>) -> Self {
        self.config.rules.push(rule.into());
        self
    }

    /// Append a batch of silencing rules.
    #[must_use]
    pub fn rules<I>(mut self, rules: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<SilenceRule>,
    {
        self.config.rules.extend(rules.into_iter().map(Into::into));
        self
    }

    /// Set how the silence-control header is interpreted. Defaults to
    /// [`HeaderMode::Disabled`].
    #[must_use]
    pub fn header_mode(mut self, mode: HeaderMode) -> Self {
        self.config.header_mode = mode;
        self
    }

    /// Set the threshold installed while a request is silenced. Defaults to
    /// [`LevelFilter::ERROR`].
    #[must_use]
    pub fn level(mut self, level: LevelFilter) -> Self {
        self.config.level = level;
        self
    }

    /// Install a best-effort hook fired once per silenced request, before
    /// suppression begins. Meant for telling a tracing agent to drop the
    /// current transaction; a panic inside the hook is swallowed.
    #[must_use]
    pub fn trace_hook(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.config.trace_hook = Some(Arc::new(hook) as TraceHook);
        self
    }
}

impl<S> Layer<S> for SilenceLayer {
    type Service = SilenceService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        SilenceService {
            inner,
            config: Arc::new(self.config.clone()),
        }
    }
}

/// The wrapped service produced by [`SilenceLayer`].
#[derive(Clone)]
pub struct SilenceService<S> {
    inner: S,
    config: Arc<SilenceConfig>,
}

impl<S, ReqBody> Service<Request<ReqBody>> for SilenceService<S>
where
    S: Service<Request<ReqBody>> + Clone + Send + 'static,
    S::Future: Send,
    ReqBody: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        if !self.config.should_silence(&req) {
            let mut inner = self.inner.clone();
            return Box::pin(async move { inner.call(req).await });
        }

        debug!(path = req.uri().path(), "silencing request logging");
        self.config.suppress_tracing();

        let logger = self.config.resolve_logger();
        let level = self.config.level();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            // Guard spans the whole inner call; Drop restores the threshold
            // whether the call returns Ok, Err, or unwinds.
            let _guard = SuppressGuard::new(logger, level);
            inner.call(req).await
        })
    }
}
