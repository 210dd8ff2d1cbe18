//! Configuration constants and defaults for easyreq
//!
//! Nothing here is read from files or the environment. Callers that need a
//! different identity or extra headers on every request build a
//! [`ClientConfig`] and hand it to [`crate::RequestBuilder::with_config`].

use std::collections::BTreeMap;

/// User-Agent sent when the caller does not override it
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/97.0.4690.70 Safari/537.36";

/// Content-Type inferred for JSON and raw string bodies
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Content-Type inferred for url-encoded form bodies
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Defaults applied to every request a builder produces
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Value of the User-Agent header before any option runs
    pub user_agent: String,
    /// Extra headers installed before any option runs
    pub default_headers: BTreeMap<String, String>,
}

impl ClientConfig {
    /// Replace the User-Agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Add a header applied to every request
    pub fn with_default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(name.into(), value.into());
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            default_headers: BTreeMap::new(),
        }
    }
}
