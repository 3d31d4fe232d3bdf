//! Timing configuration shared by the lesson engine.

use std::time::Duration;

/// Default bound for waits that have no specific bound of their own.
pub const DEFAULT_WAIT: Duration = Duration::from_secs(30);

/// How long to wait for the lesson session response.
pub const DEFAULT_LESSON_DATA_WAIT: Duration = Duration::from_secs(5);

/// How long to look for optional controls before treating them as absent.
pub const DEFAULT_OPTIONAL_WAIT: Duration = Duration::from_secs(1);

/// Delay between presence checks while waiting for a selector.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Bounds applied to the waits performed during a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTimings {
    /// Driver default used for unbounded waits (advance affordance, prompts).
    pub default_wait: Duration,
    /// Bound on intercepting the lesson data response.
    pub lesson_data_wait: Duration,
    /// Bound on the optional keyboard toggle in translate challenges.
    pub keyboard_toggle_wait: Duration,
    /// Bound on the skill start button after opening a skill.
    pub start_button_wait: Duration,
    /// Polling interval used by drivers without native waiting.
    pub poll_interval: Duration,
}

impl Default for SessionTimings {
    fn default() -> Self {
        Self {
            default_wait: DEFAULT_WAIT,
            lesson_data_wait: DEFAULT_LESSON_DATA_WAIT,
            keyboard_toggle_wait: DEFAULT_OPTIONAL_WAIT,
            start_button_wait: DEFAULT_OPTIONAL_WAIT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}
