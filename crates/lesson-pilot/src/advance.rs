//! Advance controller: move the player past feedback and transition screens.

use crate::driver::UiDriver;
use crate::error::PilotResult;
use crate::selectors;

/// What signals that the player is ready to be advanced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadySignal {
    /// The "next" control becomes enabled.
    Next,
    /// Either the "next" control becomes enabled or a challenge header
    /// appears, whichever comes first. Used where the player may have
    /// advanced on its own.
    NextOrHeader,
}

/// Drives the player's "next" control.
pub struct AdvanceController<'a> {
    driver: &'a dyn UiDriver,
}

impl<'a> AdvanceController<'a> {
    pub fn new(driver: &'a dyn UiDriver) -> Self {
        Self { driver }
    }

    /// Wait for `signal`, then click "next" while it stays enabled.
    ///
    /// Returns the number of clicks.
    pub async fn advance(&self, signal: ReadySignal) -> PilotResult<usize> {
        self.wait_ready(signal).await?;
        self.drain().await
    }

    /// Wait on the driver's default timeout for the ready signal.
    pub async fn wait_ready(&self, signal: ReadySignal) -> PilotResult<()> {
        match signal {
            ReadySignal::Next => self.driver.wait_for(selectors::NEXT_ENABLED, None).await,
            ReadySignal::NextOrHeader => {
                tokio::select! {
                    next = self.driver.wait_for(selectors::NEXT_ENABLED, None) => next,
                    header = self.driver.wait_for(selectors::CHALLENGE_HEADER, None) => header,
                }
            }
        }
    }

    /// Click "next" until it is absent or disabled.
    pub async fn drain(&self) -> PilotResult<usize> {
        let mut clicks = 0;
        while self.driver.exists(selectors::NEXT_ENABLED).await? {
            self.driver.click(selectors::NEXT_ENABLED).await?;
            clicks += 1;
        }
        tracing::info!("Next finished after {clicks} click(s)");
        Ok(clicks)
    }
}
