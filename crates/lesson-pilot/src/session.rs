//! Lesson session: play one lesson from its data to the completion screen.

use crate::advance::{AdvanceController, ReadySignal};
use crate::config::SessionTimings;
use crate::dispatch::Dispatcher;
use crate::driver::UiDriver;
use crate::error::PilotResult;
use crate::extract::LessonExtractor;
use crate::types::Lesson;

/// How a lesson attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LessonOutcome {
    /// Every challenge was answered and the completion screen cleared.
    Completed { challenges: usize },
    /// No lesson data arrived in time; nothing was attempted.
    NoLessonData,
    /// A recoverable failure stopped the lesson part-way.
    Abandoned { answered: usize, reason: String },
}

/// Plays lessons against one live page.
pub struct LessonSession<'a> {
    driver: &'a dyn UiDriver,
    timings: SessionTimings,
    extractor: LessonExtractor,
}

impl<'a> LessonSession<'a> {
    pub fn new(driver: &'a dyn UiDriver, timings: SessionTimings) -> Self {
        Self {
            driver,
            timings,
            extractor: LessonExtractor::new(timings.lesson_data_wait),
        }
    }

    /// Run the lesson that is currently starting.
    ///
    /// Only an unrecognized challenge is returned as an error; every other
    /// failure ends the attempt with a non-completed outcome.
    pub async fn run(&self) -> PilotResult<LessonOutcome> {
        tracing::info!("Waiting for lesson...");
        let lesson = match self.extractor.extract(self.driver).await {
            Ok(Some(lesson)) => lesson,
            Ok(None) => return Ok(LessonOutcome::NoLessonData),
            Err(e) => {
                tracing::warn!("Lesson data unavailable: {e}");
                return Ok(LessonOutcome::NoLessonData);
            }
        };
        tracing::info!("Found {} challenges", lesson.len());
        self.play(&lesson).await
    }

    /// Play a lesson whose data is already known.
    ///
    /// Only an unrecognized challenge is returned as an error.
    pub async fn play(&self, lesson: &Lesson) -> PilotResult<LessonOutcome> {
        let advance = AdvanceController::new(self.driver);
        let dispatcher = Dispatcher::new(self.driver, self.timings);

        let mut answered = 0;
        let result = async {
            advance.advance(ReadySignal::NextOrHeader).await?;
            for challenge in lesson {
                dispatcher.dispatch(challenge).await?;
                advance.advance(ReadySignal::Next).await?;
                answered += 1;
            }
            advance.advance(ReadySignal::Next).await
        }
        .await;

        match result {
            Ok(_) => {
                tracing::info!("Lesson complete ({answered} challenges)");
                Ok(LessonOutcome::Completed {
                    challenges: answered,
                })
            }
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                tracing::warn!("Abandoning lesson after {answered} challenge(s): {e}");
                Ok(LessonOutcome::Abandoned {
                    answered,
                    reason: e.to_string(),
                })
            }
        }
    }
}
