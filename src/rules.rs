//! Silencing rules: what makes a request eligible for log suppression.
//!
//! A rule is either a literal path, a compiled path pattern, or a header
//! token. All three live in one configuration list; the [`Token`] newtype is
//! what keeps a shared secret distinguishable from a plain path string.

use regex::Regex;

use crate::error::ConfigError;

/// Header a client sets to request silencing.
///
/// Checked for presence in [`HeaderMode::AnyValue`] and compared
/// byte-for-byte against configured tokens in [`HeaderMode::Token`].
///
/// [`HeaderMode::AnyValue`]: crate::config::HeaderMode::AnyValue
/// [`HeaderMode::Token`]: crate::config::HeaderMode::Token
pub const SILENCE_HEADER: &str = "x-silence-logger";

/// Shared-secret value matched against the silence header.
///
/// A distinct type rather than a bare string so a configuration list can mix
/// paths and tokens without ambiguity. Two tokens are equal iff their
/// underlying values are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token(String);

impl Token {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A single silencing criterion.
///
/// Matching is a logical OR over the configured list; rule order never
/// affects the outcome. `Token` rules only participate in header matching
/// and are skipped by the path check.
#[derive(Debug, Clone)]
pub enum SilenceRule {
    /// Exact path equality.
    Path(String),
    /// Unanchored pattern searched anywhere within the path.
    Pattern(Regex),
    /// Header token, inert for path matching.
    Token(Token),
}

impl SilenceRule {
    pub fn path(path: impl Into<String>) -> Self {
        Self::Path(path.into())
    }

    /// Compile a path pattern. Rejects malformed patterns at configuration
    /// time instead of failing requests later.
    pub fn pattern(pattern: &str) -> Result<Self, ConfigError> {
        Ok(Self::Pattern(Regex::new(pattern)?))
    }

    pub fn token(value: impl Into<String>) -> Self {
        Self::Token(Token::new(value))
    }

    /// Whether this rule matches the request path. `Token` rules never do.
    pub(crate) fn matches_path(&self, path: &str) -> bool {
        match self {
            Self::Path(exact) => exact == path,
            Self::Pattern(re) => re.is_match(path),
            Self::Token(_) => false,
        }
    }

    /// The token value, if this is a token rule.
    pub(crate) fn token_value(&self) -> Option<&Token> {
        match self {
            Self::Token(token) => Some(token),
            _ => None,
        }
    }
}

impl From<&str> for SilenceRule {
    fn from(path: &str) -> Self {
        Self::path(path)
    }
}

impl From<String> for SilenceRule {
    fn from(path: String) -> Self {
        Self::Path(path)
    }
}

impl From<Regex> for SilenceRule {
    fn from(pattern: Regex) -> Self {
        Self::Pattern(pattern)
    }
}

impl From<Token> for SilenceRule {
    fn from(token: Token) -> Self {
        Self::Token(token)
    }
}
