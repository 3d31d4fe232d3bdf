//! Lesson Pilot: plays language lessons in a browser without human input.
//!
//! The engine reads a lesson's challenges from the intercepted session
//! response, answers each one through a [`UiDriver`], and advances the
//! player between them.

pub mod advance;
pub mod config;
pub mod dispatch;
pub mod driver;
pub mod error;
pub mod extract;
pub mod login;
pub mod navigation;
pub mod probe;
pub mod selectors;
pub mod session;
pub mod types;

#[cfg(test)]
mod testing;

pub use advance::{AdvanceController, ReadySignal};
pub use config::SessionTimings;
pub use dispatch::{Dispatcher, InputModality};
pub use driver::{UiDriver, UrlPattern};
pub use error::{PilotError, PilotResult};
pub use extract::{parse_lesson, reconcile, LessonExtractor};
pub use login::{login, Credentials};
pub use navigation::{NavigationSummary, TreeNavigator, TreeState};
pub use probe::SkillState;
pub use session::{LessonOutcome, LessonSession};
pub use types::*;
