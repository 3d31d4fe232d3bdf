//! UI driver abstraction.
//!
//! Defines the `UiDriver` trait that abstracts over the browser automation
//! engine. The lesson engine only ever talks to a live page through it.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

use crate::error::PilotResult;

/// Matches network responses by the tail of their request URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlPattern {
    suffix: String,
}

impl UrlPattern {
    pub fn suffix(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
        }
    }

    pub fn matches(&self, url: &str) -> bool {
        url.ends_with(&self.suffix)
    }
}

impl std::fmt::Display for UrlPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "*{}", self.suffix)
    }
}

/// A live page that can be queried, clicked, typed into and observed.
///
/// All operations take `&self` so that two waits can be outstanding against
/// the same page at once.
#[async_trait]
pub trait UiDriver: Send + Sync {
    /// Navigate to a URL.
    async fn navigate(&self, url: &str) -> PilotResult<()>;

    /// Whether an element matching `selector` is present right now.
    async fn exists(&self, selector: &str) -> PilotResult<bool>;

    /// Wait until an element matching `selector` is present.
    ///
    /// `None` uses the driver's default (long) timeout.
    async fn wait_for(&self, selector: &str, timeout: Option<Duration>) -> PilotResult<()>;

    /// Click the first element matching `selector`.
    async fn click(&self, selector: &str) -> PilotResult<()>;

    /// Click the first element matching `scope` whose visible text equals
    /// `text`. Returns `false` when no such element exists.
    async fn click_text(&self, scope: &str, text: &str) -> PilotResult<bool>;

    /// Type literal text into the first element matching `selector`.
    async fn type_text(&self, selector: &str, text: &str) -> PilotResult<()>;

    /// Evaluate a JavaScript expression in the page and return its value.
    async fn evaluate(&self, script: &str) -> PilotResult<Value>;

    /// Wait for the first network response whose URL matches `pattern` and
    /// return its JSON body.
    async fn wait_for_response(
        &self,
        pattern: &UrlPattern,
        timeout: Duration,
    ) -> PilotResult<Value>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_pattern_suffix() {
        let pattern = UrlPattern::suffix("sessions");
        assert!(pattern.matches("https://example.com/2017-06-30/sessions"));
        assert!(!pattern.matches("https://example.com/sessions/123"));
        assert!(!pattern.matches("https://example.com/sessions?x=1"));
        assert_eq!(pattern.to_string(), "*sessions");
    }
}
