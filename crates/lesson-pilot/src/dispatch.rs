//! Interaction strategies: answer one challenge on the live page.
//!
//! Each strategy waits for the controls it needs, then performs exactly the
//! activations that satisfy the challenge. Committing the answer and moving
//! on is left to the advance controller.

use std::time::Duration;

use crate::config::SessionTimings;
use crate::driver::UiDriver;
use crate::error::{PilotError, PilotResult};
use crate::selectors;
use crate::types::{CharacterMatch, Challenge, ChallengeKind, ListenTap, Translate};

/// How a translate challenge accepts its answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputModality {
    /// A free-text input field.
    FreeText,
    /// A bank of word tokens to tap in order.
    WordBank,
}

/// Executes the interaction strategy matching each challenge.
pub struct Dispatcher<'a> {
    driver: &'a dyn UiDriver,
    timings: SessionTimings,
}

impl<'a> Dispatcher<'a> {
    pub fn new(driver: &'a dyn UiDriver, timings: SessionTimings) -> Self {
        Self { driver, timings }
    }

    /// Satisfy a single challenge.
    ///
    /// An unrecognized challenge fails with a fatal error before any UI
    /// action is attempted.
    pub async fn dispatch(&self, challenge: &Challenge) -> PilotResult<()> {
        tracing::debug!("Dispatching {} challenge", challenge.tag());
        match challenge {
            Challenge::CharacterMatch(c) => self.match_pairs(c).await,
            Challenge::SelectPronunciation(c) => {
                self.select_choice(ChallengeKind::SelectPronunciation, c.correct_index)
                    .await
            }
            Challenge::CharacterIntro(c) => {
                self.select_choice(ChallengeKind::CharacterIntro, c.correct_index)
                    .await
            }
            Challenge::Select(c) => {
                self.select_choice(ChallengeKind::Select, c.correct_index)
                    .await
            }
            Challenge::CharacterSelect(c) => {
                self.select_choice(ChallengeKind::CharacterSelect, c.correct_index)
                    .await
            }
            Challenge::Translate(c) => self.translate(c).await,
            Challenge::ListenTap(c) => self.listen_tap(c).await,
            Challenge::Unrecognized(u) => {
                tracing::error!("Unrecognized challenge: {}", u.raw);
                Err(PilotError::UnrecognizedChallenge(u.kind.clone()))
            }
        }
    }

    /// Tap each pair's transliteration then its character, pair by pair.
    async fn match_pairs(&self, challenge: &CharacterMatch) -> PilotResult<()> {
        self.driver
            .wait_for(selectors::TAP_TOKEN_ENABLED, None)
            .await?;
        for pair in &challenge.pairs {
            self.tap_text(selectors::MATCH_BUTTON, &pair.transliteration)
                .await?;
            self.tap_text(selectors::MATCH_BUTTON, &pair.character).await?;
        }
        Ok(())
    }

    /// Activate the rendered choice at `correct_index` (0-based).
    ///
    /// Pronunciation and intro challenges render plain choices; the other
    /// two render choice cards.
    async fn select_choice(&self, kind: ChallengeKind, correct_index: usize) -> PilotResult<()> {
        let (choice, choice_enabled) = match kind {
            ChallengeKind::SelectPronunciation | ChallengeKind::CharacterIntro => {
                (selectors::CHOICE, selectors::CHOICE_ENABLED)
            }
            _ => (selectors::CHOICE_CARD, selectors::CHOICE_CARD_ENABLED),
        };
        let position = correct_index
            .checked_add(1)
            .ok_or_else(|| PilotError::MissingAnswer {
                kind: kind.tag(),
                reason: format!("correct index {correct_index} has no rendered position"),
            })?;
        let target = selectors::nth_child(choice, position);
        self.driver.wait_for(choice_enabled, None).await?;
        self.driver.wait_for(&target, None).await?;
        self.driver.click(&target).await
    }

    async fn translate(&self, challenge: &Translate) -> PilotResult<()> {
        self.driver
            .wait_for(selectors::TRANSLATE_PROMPT, None)
            .await?;

        if !self.driver.exists(selectors::TRANSLATE_INPUT).await? {
            self.reveal_keyboard(self.timings.keyboard_toggle_wait)
                .await?;
        }

        match self.detect_modality().await? {
            InputModality::FreeText => {
                let solution = challenge.correct_solutions.first().ok_or_else(|| {
                    PilotError::MissingAnswer {
                        kind: "translate",
                        reason: "no correct solutions".to_string(),
                    }
                })?;
                self.driver
                    .type_text(selectors::TRANSLATE_INPUT_ENABLED, solution)
                    .await
            }
            InputModality::WordBank => {
                for token in &challenge.correct_tokens {
                    self.tap_text(selectors::TAP_TOKEN, token).await?;
                }
                Ok(())
            }
        }
    }

    /// Switch to keyboard entry if the toggle shows up within `bound`.
    async fn reveal_keyboard(&self, bound: Duration) -> PilotResult<()> {
        match self
            .driver
            .wait_for(selectors::TOGGLE_KEYBOARD, Some(bound))
            .await
        {
            Ok(()) => self.driver.click(selectors::TOGGLE_KEYBOARD).await,
            Err(e) if e.is_timeout() => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Race the free-text input against the word bank; the first to appear
    /// decides, the other wait is dropped.
    pub async fn detect_modality(&self) -> PilotResult<InputModality> {
        tokio::select! {
            input = self.driver.wait_for(selectors::TRANSLATE_INPUT_ENABLED, None) => {
                input.map(|()| InputModality::FreeText)
            }
            bank = self.driver.wait_for(selectors::WORD_BANK, None) => {
                bank.map(|()| InputModality::WordBank)
            }
        }
    }

    async fn listen_tap(&self, challenge: &ListenTap) -> PilotResult<()> {
        self.driver
            .wait_for(selectors::TOGGLE_KEYBOARD, None)
            .await?;
        if !self.driver.exists(selectors::TRANSLATE_INPUT).await? {
            self.driver.click(selectors::TOGGLE_KEYBOARD).await?;
        }
        self.driver
            .wait_for(selectors::TRANSLATE_INPUT, None)
            .await?;
        self.driver
            .type_text(selectors::TRANSLATE_INPUT, &challenge.correct_tokens.concat())
            .await
    }

    /// Click the control with this exact visible text; a miss is logged
    /// and skipped.
    async fn tap_text(&self, scope: &str, text: &str) -> PilotResult<()> {
        if !self.driver.click_text(scope, text).await? {
            tracing::warn!("No control with text {text:?} under {scope}");
        }
        Ok(())
    }
}
