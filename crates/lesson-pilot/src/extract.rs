//! Lesson data extraction from the intercepted session response.
//!
//! The session response lists `challenges` and, sometimes, a superseding
//! `adaptiveChallenges` tail of the same length. The canonical lesson swaps
//! that tail in rather than appending it.

use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

use crate::driver::{UiDriver, UrlPattern};
use crate::error::{PilotError, PilotResult};
use crate::types::{Challenge, Lesson};

/// Request URL suffix of the lesson session endpoint.
pub const SESSIONS_ENDPOINT: &str = "sessions";

/// The two relevant fields of a session response body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionPayload {
    challenges: Vec<Challenge>,
    #[serde(default)]
    adaptive_challenges: Option<Vec<Challenge>>,
}

/// Replace the tail of `challenges` with `adaptive`, keeping the length.
///
/// When `adaptive` is longer than `challenges`, the whole list is replaced.
pub fn reconcile<T>(mut challenges: Vec<T>, adaptive: Option<Vec<T>>) -> Vec<T> {
    let Some(adaptive) = adaptive.filter(|a| !a.is_empty()) else {
        return challenges;
    };
    if adaptive.len() > challenges.len() {
        tracing::warn!(
            "adaptive tail ({}) longer than lesson ({}); using adaptive challenges only",
            adaptive.len(),
            challenges.len()
        );
    }
    challenges.truncate(challenges.len().saturating_sub(adaptive.len()));
    challenges.extend(adaptive);
    challenges
}

/// Parse a session response body into its canonical lesson.
pub fn parse_lesson(body: Value) -> PilotResult<Lesson> {
    let payload: SessionPayload =
        serde_json::from_value(body).map_err(|e| PilotError::MalformedLesson(e.to_string()))?;
    Ok(Lesson::new(reconcile(
        payload.challenges,
        payload.adaptive_challenges,
    )))
}

/// Waits for the lesson session response and parses it.
pub struct LessonExtractor {
    pattern: UrlPattern,
    timeout: Duration,
}

impl LessonExtractor {
    pub fn new(timeout: Duration) -> Self {
        Self {
            pattern: UrlPattern::suffix(SESSIONS_ENDPOINT),
            timeout,
        }
    }

    /// Wait for the lesson data.
    ///
    /// Returns `Ok(None)` when no usable session response arrived in time;
    /// the caller abandons this lesson attempt.
    pub async fn extract(&self, driver: &dyn UiDriver) -> PilotResult<Option<Lesson>> {
        let body = match driver.wait_for_response(&self.pattern, self.timeout).await {
            Ok(body) => body,
            Err(e) if e.is_timeout() => {
                tracing::info!("No lesson data within {}ms", self.timeout.as_millis());
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        match parse_lesson(body) {
            Ok(lesson) => Ok(Some(lesson)),
            Err(e) => {
                tracing::warn!("Discarding lesson data: {e}");
                Ok(None)
            }
        }
    }
}
