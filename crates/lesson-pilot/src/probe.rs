//! Skill tree probe.
//!
//! Reads the skill tiles once through the driver and classifies them into
//! [`SkillState`] so callers never look at colors or tile text.

use serde::{Deserialize, Serialize};

use crate::driver::UiDriver;
use crate::error::{PilotError, PilotResult};

/// Icon background of a skill the learner cannot open yet.
pub const LOCKED_BACKGROUND: &str = "rgb(229, 229, 229)";

/// Level at which a skill counts as finished.
pub const COMPLETED_LEVEL: u32 = 5;

const SKILL_PROBE_SCRIPT: &str = r#"Array.from(document.querySelectorAll("div[data-test='skill']")).map((s) => {
    const pieces = s.innerText.split("\n");
    const level = pieces.length > 1 ? Number(pieces[0]) : null;
    const icon = s.querySelector("[data-test='skill-icon']");
    const tile = icon && icon.firstChild;
    return {
        level: Number.isFinite(level) ? level : null,
        background: tile ? window.getComputedStyle(tile).backgroundColor : null,
    };
})"#;

/// Where a skill stands for the learner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillState {
    Locked,
    Available,
    Completed,
}

/// A skill tile as rendered, before classification.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSkillTile {
    pub level: Option<f64>,
    pub background: Option<String>,
}

impl RawSkillTile {
    pub fn classify(&self) -> SkillState {
        if self.level.is_some_and(|l| l >= f64::from(COMPLETED_LEVEL)) {
            return SkillState::Completed;
        }
        if self.background.as_deref() == Some(LOCKED_BACKGROUND) {
            return SkillState::Locked;
        }
        SkillState::Available
    }
}

/// Read and classify every skill tile, in tree order.
pub async fn probe_skills(driver: &dyn UiDriver) -> PilotResult<Vec<SkillState>> {
    let value = driver.evaluate(SKILL_PROBE_SCRIPT).await?;
    let tiles: Vec<RawSkillTile> = serde_json::from_value(value)
        .map_err(|e| PilotError::Driver(format!("unexpected skill probe result: {e}")))?;
    Ok(tiles.iter().map(RawSkillTile::classify).collect())
}

/// Scroll to the `index`-th skill and open its panel.
pub async fn open_skill(driver: &dyn UiDriver, index: usize) -> PilotResult<()> {
    let script = format!(
        r#"(() => {{
            const skill = document.querySelectorAll("div[data-test='skill']")[{index}];
            if (!skill || !skill.firstChild) return false;
            skill.scrollIntoView();
            skill.firstChild.click();
            return true;
        }})()"#
    );
    match driver.evaluate(&script).await? {
        serde_json::Value::Bool(true) => Ok(()),
        _ => Err(PilotError::ElementNotFound(format!("skill #{index}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeDriver;
    use serde_json::json;

    fn tile(level: Option<f64>, background: &str) -> RawSkillTile {
        RawSkillTile {
            level,
            background: Some(background.to_string()),
        }
    }

    #[test]
    fn test_classify() {
        assert_eq!(tile(Some(5.0), LOCKED_BACKGROUND).classify(), SkillState::Completed);
        assert_eq!(tile(Some(4.0), LOCKED_BACKGROUND).classify(), SkillState::Locked);
        assert_eq!(tile(None, "rgb(120, 200, 0)").classify(), SkillState::Available);
        assert_eq!(tile(Some(2.0), "rgb(120, 200, 0)").classify(), SkillState::Available);
        assert_eq!(RawSkillTile::default().classify(), SkillState::Available);
    }

    #[tokio::test]
    async fn test_probe_skills() {
        let driver = FakeDriver::new().with_evaluation(json!([
            {"level": 5, "background": "rgb(255, 200, 0)"},
            {"level": 1, "background": "rgb(255, 200, 0)"},
            {"level": null, "background": LOCKED_BACKGROUND},
        ]));
        let states = probe_skills(&driver).await.unwrap();
        assert_eq!(
            states,
            vec![SkillState::Completed, SkillState::Available, SkillState::Locked]
        );
    }

    #[tokio::test]
    async fn test_probe_rejects_garbage() {
        let driver = FakeDriver::new().with_evaluation(json!({"oops": true}));
        assert!(probe_skills(&driver).await.is_err());
    }

    #[tokio::test]
    async fn test_open_missing_skill() {
        let driver = FakeDriver::new().with_evaluation(json!(false));
        let err = open_skill(&driver, 3).await.unwrap_err();
        assert!(matches!(err, PilotError::ElementNotFound(_)));
    }
}
