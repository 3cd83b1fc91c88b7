//! Silencing configuration and the per-request decision.
//!
//! Built once through [`SilenceLayer`]'s builder methods, read-only
//! afterwards, shared across cloned services behind an `Arc`.
//!
//! [`SilenceLayer`]: crate::middleware::SilenceLayer

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use http::{HeaderMap, Request};
use tracing::level_filters::LevelFilter;

use crate::logger::{LevelControl, LoggerProvider};
use crate::rules::{SILENCE_HEADER, SilenceRule};

/// How the silence-control header participates in the decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeaderMode {
    /// Header ignored entirely, even when present.
    #[default]
    Disabled,
    /// Mere presence of the header silences, whatever its value.
    AnyValue,
    /// Header value must equal a configured [`SilenceRule::Token`] exactly.
    Token,
}

/// Best-effort callback fired when a request is silenced, before log
/// suppression begins. Used to tell an external tracing agent to drop the
/// current transaction from its reporting.
pub type TraceHook = Arc<dyn Fn() + Send + Sync>;

/// Immutable silencing configuration: the rule list, header mode, target
/// suppression level, logger provider, and optional trace hook.
#[derive(Clone)]
pub struct SilenceConfig {
    pub(crate) rules: Vec<SilenceRule>,
    pub(crate) header_mode: HeaderMode,
    pub(crate) level: LevelFilter,
    pub(crate) logger: Arc<dyn LoggerProvider>,
    pub(crate) trace_hook: Option<TraceHook>,
}

impl SilenceConfig {
    pub(crate) fn new(logger: Arc<dyn LoggerProvider>) -> Self {
        Self {
            rules: Vec::new(),
            header_mode: HeaderMode::Disabled,
            level: LevelFilter::ERROR,
            logger,
            trace_hook: None,
        }
    }

    /// Whether this request's logging should be suppressed.
    ///
    /// Total over all requests: a short-circuiting OR of the header check
    /// and the path check, with no other state involved.
    pub fn should_silence<T>(&self, req: &Request<T>) -> bool {
        self.header_matches(req.headers()) || self.path_matches(req.uri().path())
    }

    fn header_matches(&self, headers: &HeaderMap) -> bool {
        match self.header_mode {
            HeaderMode::Disabled => false,
            HeaderMode::AnyValue => headers.contains_key(SILENCE_HEADER),
            HeaderMode::Token => headers.get(SILENCE_HEADER).is_some_and(|value| {
                // Byte-exact and case-sensitive, shared-secret semantics.
                self.rules
                    .iter()
                    .filter_map(SilenceRule::token_value)
                    .any(|token| token.as_str().as_bytes() == value.as_bytes())
            }),
        }
    }

    fn path_matches(&self, path: &str) -> bool {
        self.rules.iter().any(|rule| rule.matches_path(path))
    }

    /// Resolve the logger to control for this request. Never cached.
    pub(crate) fn resolve_logger(&self) -> Arc<dyn LevelControl> {
        self.logger.resolve()
    }

    pub(crate) fn level(&self) -> LevelFilter {
        self.level
    }

    /// Fire the trace hook, if any. A panicking hook must not take the
    /// request down with it, so the unwind stops here.
    pub(crate) fn suppress_tracing(&self) {
        if let Some(hook) = &self.trace_hook {
            let hook = Arc::clone(hook);
            let _ = catch_unwind(AssertUnwindSafe(move || hook()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::{FixedLogger, SharedLevel};

    fn config(header_mode: HeaderMode, rules: Vec<SilenceRule>) -> SilenceConfig {
        let logger = FixedLogger::new(SharedLevel::new(LevelFilter::INFO));
        let mut config = SilenceConfig::new(Arc::new(logger));
        config.header_mode = header_mode;
        config.rules = rules;
        config
    }

    fn request(path: &str, header: Option<&str>) -> Request<()> {
        let mut builder = Request::builder().uri(path);
        if let Some(value) = header {
            builder = builder.header(SILENCE_HEADER, value);
        }
        builder.body(()).unwrap()
    }

    fn scenario_rules() -> Vec<SilenceRule> {
        vec![
            SilenceRule::token("deadbeef"),
            SilenceRule::path("/ping"),
            SilenceRule::pattern("/assets/").unwrap(),
        ]
    }

    #[test]
    fn non_matching_request_not_silenced() {
        let config = config(HeaderMode::Token, scenario_rules());
        assert!(!config.should_silence(&request("/", None)));
    }

    #[test]
    fn exact_path_silences() {
        let config = config(HeaderMode::Token, scenario_rules());
        assert!(config.should_silence(&request("/ping", None)));
    }

    #[test]
    fn pattern_path_silences() {
        let config = config(HeaderMode::Token, scenario_rules());
        assert!(config.should_silence(&request("/assets/foo.js", None)));
    }

    #[test]
    fn matching_token_silences() {
        let config = config(HeaderMode::Token, scenario_rules());
        assert!(config.should_silence(&request("/", Some("deadbeef"))));
    }

    #[test]
    fn non_matching_token_does_not_silence() {
        let config = config(HeaderMode::Token, scenario_rules());
        assert!(!config.should_silence(&request("/", Some("foo"))));
    }

    #[test]
    fn token_comparison_is_case_sensitive() {
        let config = config(HeaderMode::Token, scenario_rules());
        assert!(!config.should_silence(&request("/", Some("DEADBEEF"))));
    }

    #[test]
    fn any_value_mode_matches_presence_even_empty() {
        let config = config(HeaderMode::AnyValue, vec![]);
        assert!(config.should_silence(&request("/", Some(""))));
        assert!(!config.should_silence(&request("/", None)));
    }

    #[test]
    fn disabled_mode_ignores_header() {
        let config = config(HeaderMode::Disabled, scenario_rules());
        assert!(!config.should_silence(&request("/", Some("deadbeef"))));
    }

    #[test]
    fn token_mode_without_token_rules_never_matches_header() {
        let rules = vec![SilenceRule::path("/ping")];
        let config = config(HeaderMode::Token, rules);
        assert!(!config.should_silence(&request("/", Some("deadbeef"))));
    }

    #[test]
    fn empty_rule_list_never_matches_paths() {
        let config = config(HeaderMode::Disabled, vec![]);
        assert!(!config.should_silence(&request("/ping", None)));
    }

    #[test]
    fn path_check_runs_even_when_header_check_fails() {
        let config = config(HeaderMode::Token, scenario_rules());
        assert!(config.should_silence(&request("/ping", Some("not-the-token"))));
    }

    #[test]
    fn panicking_trace_hook_is_contained() {
        let mut config = config(HeaderMode::Disabled, vec![]);
        config.trace_hook = Some(Arc::new(|| panic!("agent exploded")));
        config.suppress_tracing();
    }
}
