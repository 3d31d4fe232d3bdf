//! Skill tree navigation.
//!
//! Each pass returns to the tree, works out what needs doing next and starts
//! that lesson. The loop ends once the tree reports nothing left to do.

use serde::Serialize;

use crate::config::SessionTimings;
use crate::driver::UiDriver;
use crate::error::PilotResult;
use crate::probe::{open_skill, probe_skills, SkillState};
use crate::selectors;
use crate::session::{LessonOutcome, LessonSession};

const OPEN_LAST_CHECKPOINT_SCRIPT: &str = r#"(() => {
    const badge = Array.from(document.querySelectorAll("[data-test='checkpoint-badge']")).pop();
    if (badge) badge.click();
    return !!badge;
})()"#;

/// What the skill tree needs next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TreeState {
    /// The introductory lesson has not been taken.
    NeedsIntro,
    /// A skill is open for its next lesson.
    NeedsNewLesson { skill: usize },
    /// Every skill is done but a checkpoint is waiting.
    NeedsCheckpoint,
    /// Nothing left to do.
    Completed,
}

/// Tally of lesson attempts made by a navigation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NavigationSummary {
    pub lessons_completed: usize,
    pub lessons_without_data: usize,
    pub lessons_abandoned: usize,
    pub challenges_answered: usize,
}

impl NavigationSummary {
    pub fn record(&mut self, outcome: &LessonOutcome) {
        match outcome {
            LessonOutcome::Completed { challenges } => {
                self.lessons_completed += 1;
                self.challenges_answered += challenges;
            }
            LessonOutcome::NoLessonData => self.lessons_without_data += 1,
            LessonOutcome::Abandoned { answered, .. } => {
                self.lessons_abandoned += 1;
                self.challenges_answered += answered;
            }
        }
    }

    pub fn attempts(&self) -> usize {
        self.lessons_completed + self.lessons_without_data + self.lessons_abandoned
    }
}

/// Works through the skill tree one lesson at a time.
pub struct TreeNavigator<'a> {
    driver: &'a dyn UiDriver,
    timings: SessionTimings,
    max_lessons: Option<usize>,
}

impl<'a> TreeNavigator<'a> {
    pub fn new(driver: &'a dyn UiDriver, timings: SessionTimings) -> Self {
        Self {
            driver,
            timings,
            max_lessons: None,
        }
    }

    /// Stop after this many lesson attempts.
    pub fn with_max_lessons(mut self, max: Option<usize>) -> Self {
        self.max_lessons = max;
        self
    }

    /// Run until the tree is completed or the attempt limit is reached.
    pub async fn run(&self) -> PilotResult<NavigationSummary> {
        let mut summary = NavigationSummary::default();
        loop {
            if self.max_lessons.is_some_and(|max| summary.attempts() >= max) {
                tracing::info!("Lesson limit reached after {} attempts", summary.attempts());
                return Ok(summary);
            }

            self.return_to_tree().await?;
            let state = self.probe_state().await?;
            tracing::debug!("Tree state: {state:?}");
            if state == TreeState::Completed {
                tracing::info!("Completed");
                return Ok(summary);
            }

            self.start(state).await?;
            let outcome = LessonSession::new(self.driver, self.timings).run().await?;
            summary.record(&outcome);
        }
    }

    /// Leave any lesson screen and bring the tree into view.
    pub async fn return_to_tree(&self) -> PilotResult<()> {
        if self.driver.exists(selectors::START_LESSON).await? {
            self.driver.click(selectors::BACK_ARROW).await?;
        }
        self.driver.wait_for(selectors::SKILL_TREE, None).await?;
        self.driver.click(selectors::TREE_SECTION).await?;
        self.dismiss(selectors::CLOSE_BANNER).await?;
        self.dismiss(selectors::NOTIFICATION_NO_THANKS).await
    }

    async fn dismiss(&self, selector: &str) -> PilotResult<()> {
        if self.driver.exists(selector).await? {
            self.driver.click(selector).await?;
        }
        Ok(())
    }

    pub async fn probe_state(&self) -> PilotResult<TreeState> {
        if self.driver.exists(selectors::INTRO_LESSON).await? {
            return Ok(TreeState::NeedsIntro);
        }
        let skills = probe_skills(self.driver).await?;
        if let Some(skill) = skills.iter().position(|s| *s == SkillState::Available) {
            return Ok(TreeState::NeedsNewLesson { skill });
        }
        if self.driver.exists(selectors::CHECKPOINT_BADGE).await? {
            return Ok(TreeState::NeedsCheckpoint);
        }
        Ok(TreeState::Completed)
    }

    async fn start(&self, state: TreeState) -> PilotResult<()> {
        match state {
            TreeState::NeedsIntro => self.driver.click(selectors::INTRO_LESSON).await,
            TreeState::NeedsNewLesson { skill } => {
                open_skill(self.driver, skill).await?;
                match self
                    .driver
                    .wait_for(selectors::SKILL_START_BUTTON, Some(self.timings.start_button_wait))
                    .await
                {
                    Ok(()) => self.driver.click(selectors::SKILL_START_BUTTON).await,
                    Err(e) if e.is_timeout() => Ok(()),
                    Err(e) => Err(e),
                }
            }
            TreeState::NeedsCheckpoint => {
                self.driver.evaluate(OPEN_LAST_CHECKPOINT_SCRIPT).await?;
                self.driver
                    .wait_for(selectors::CHECKPOINT_START_BUTTON, None)
                    .await?;
                self.driver.click(selectors::CHECKPOINT_START_BUTTON).await
            }
            TreeState::Completed => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::LOCKED_BACKGROUND;
    use crate::testing::{click, FakeDriver};
    use serde_json::json;

    fn tree_page() -> FakeDriver {
        FakeDriver::new()
            .with(selectors::SKILL_TREE)
            .with(selectors::TREE_SECTION)
    }

    #[tokio::test]
    async fn test_completed_tree_ends_run() {
        let driver = tree_page()
            .with(selectors::START_LESSON)
            .with(selectors::BACK_ARROW)
            .with(selectors::CLOSE_BANNER)
            .with_evaluation(json!([{"level": 5, "background": "rgb(1, 2, 3)"}]));
        let summary = TreeNavigator::new(&driver, SessionTimings::default())
            .run()
            .await
            .unwrap();

        assert_eq!(summary, NavigationSummary::default());
        assert_eq!(
            driver.activations(),
            vec![
                click(selectors::BACK_ARROW),
                click(selectors::TREE_SECTION),
                click(selectors::CLOSE_BANNER),
            ]
        );
    }

    #[tokio::test]
    async fn test_intro_takes_priority() {
        let driver = tree_page().with(selectors::INTRO_LESSON);
        let nav = TreeNavigator::new(&driver, SessionTimings::default());
        assert_eq!(nav.probe_state().await.unwrap(), TreeState::NeedsIntro);
    }

    #[tokio::test]
    async fn test_first_available_skill_is_chosen() {
        let driver = tree_page().with_evaluation(json!([
            {"level": 5, "background": "rgb(1, 2, 3)"},
            {"level": null, "background": LOCKED_BACKGROUND},
            {"level": 2, "background": "rgb(1, 2, 3)"},
        ]));
        let nav = TreeNavigator::new(&driver, SessionTimings::default());
        assert_eq!(
            nav.probe_state().await.unwrap(),
            TreeState::NeedsNewLesson { skill: 2 }
        );
    }

    #[tokio::test]
    async fn test_checkpoint_when_no_skill_available() {
        let driver = tree_page()
            .with(selectors::CHECKPOINT_BADGE)
            .with_evaluation(json!([{"level": null, "background": LOCKED_BACKGROUND}]));
        let nav = TreeNavigator::new(&driver, SessionTimings::default());
        assert_eq!(nav.probe_state().await.unwrap(), TreeState::NeedsCheckpoint);
    }

    #[tokio::test]
    async fn test_new_lesson_without_data_counts_attempt() {
        let driver = tree_page()
            .with(selectors::SKILL_START_BUTTON)
            .with_evaluation(json!([{"level": 0, "background": "rgb(1, 2, 3)"}]))
            .with_evaluation(json!(true));
        let summary = TreeNavigator::new(&driver, SessionTimings::default())
            .with_max_lessons(Some(1))
            .run()
            .await
            .unwrap();

        assert_eq!(summary.lessons_without_data, 1);
        assert_eq!(summary.attempts(), 1);
        assert_eq!(
            driver.activations(),
            vec![click(selectors::TREE_SECTION), click(selectors::SKILL_START_BUTTON)]
        );
    }

    #[tokio::test]
    async fn test_missing_start_button_is_tolerated() {
        let driver = tree_page().with_evaluation(json!(true));
        let nav = TreeNavigator::new(&driver, SessionTimings::default());
        nav.start(TreeState::NeedsNewLesson { skill: 0 }).await.unwrap();
        assert!(driver.activations().is_empty());
    }

    #[test]
    fn test_summary_record() {
        let mut summary = NavigationSummary::default();
        summary.record(&LessonOutcome::Completed { challenges: 12 });
        summary.record(&LessonOutcome::NoLessonData);
        summary.record(&LessonOutcome::Abandoned {
            answered: 3,
            reason: "timeout".into(),
        });
        assert_eq!(summary.attempts(), 3);
        assert_eq!(summary.challenges_answered, 15);
    }
}
