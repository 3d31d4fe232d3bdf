//! Chromium-based driver using chromiumoxide.

use anyhow::{Context, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::{
    EnableParams, EventLoadingFinished, EventResponseReceived, GetResponseBodyParams, RequestId,
};
use chromiumoxide::page::Page;
use futures::{Stream, StreamExt};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use lesson_pilot::{PilotError, PilotResult, SessionTimings, UiDriver, UrlPattern};

use super::{click_text_script, exists_script};

/// How to launch the browser.
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    pub chromium_path: PathBuf,
    pub headless: bool,
    pub timings: SessionTimings,
}

/// A single Chromium page driven over CDP.
pub struct ChromiumDriver {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
    timings: SessionTimings,
}

fn cdp_error(e: impl std::fmt::Display) -> PilotError {
    PilotError::Driver(e.to_string())
}

impl ChromiumDriver {
    /// Launch Chromium and open a blank page with network events enabled.
    pub async fn launch(options: LaunchOptions) -> Result<Self> {
        let mut builder = BrowserConfig::builder()
            .chrome_executable(&options.chromium_path)
            .arg("--disable-notifications")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions");
        if !options.headless {
            builder = builder.with_head();
        }
        let config = builder
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build browser config: {e}"))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .context("failed to launch Chromium")?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("CDP handler error: {e}");
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .context("failed to create new page")?;
        page.execute(EnableParams::default())
            .await
            .context("failed to enable network events")?;

        tracing::info!("Chromium launched from {}", options.chromium_path.display());

        Ok(Self {
            browser,
            page,
            handler,
            timings: options.timings,
        })
    }

    /// Close the browser and stop the CDP handler.
    pub async fn shutdown(mut self) -> Result<()> {
        let _ = self.page.close().await;
        self.browser
            .close()
            .await
            .context("failed to close Chromium")?;
        self.handler.abort();
        Ok(())
    }

    async fn poll_until_present(&self, selector: &str) -> PilotResult<()> {
        loop {
            if self.exists(selector).await? {
                return Ok(());
            }
            tokio::time::sleep(self.timings.poll_interval).await;
        }
    }

    async fn intercept(
        &self,
        pattern: &UrlPattern,
        responses: impl Stream<Item = Arc<EventResponseReceived>>,
        finished: impl Stream<Item = Arc<EventLoadingFinished>>,
    ) -> PilotResult<Value> {
        futures::pin_mut!(responses, finished);
        let request_id = loop {
            match responses.next().await {
                Some(event) if pattern.matches(&event.response.url) => {
                    tracing::debug!("Intercepted {}", event.response.url);
                    break event.request_id.clone();
                }
                Some(_) => continue,
                None => return Err(PilotError::Driver("response event stream closed".into())),
            }
        };

        // The body can only be fetched once loading has finished.
        while let Some(done) = finished.next().await {
            if done.request_id == request_id {
                break;
            }
        }

        self.response_body(request_id).await
    }

    async fn response_body(&self, request_id: RequestId) -> PilotResult<Value> {
        let body = self
            .page
            .execute(GetResponseBodyParams::new(request_id))
            .await
            .map_err(cdp_error)?
            .result;

        let text = if body.base64_encoded {
            let bytes = general_purpose::STANDARD
                .decode(&body.body)
                .map_err(|e| PilotError::Driver(format!("invalid base64 response body: {e}")))?;
            String::from_utf8(bytes)
                .map_err(|e| PilotError::Driver(format!("response body is not UTF-8: {e}")))?
        } else {
            body.body
        };

        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl UiDriver for ChromiumDriver {
    async fn navigate(&self, url: &str) -> PilotResult<()> {
        let bound = self.timings.default_wait;
        match tokio::time::timeout(bound, self.page.goto(url)).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(PilotError::Driver(format!("navigation failed: {e}"))),
            Err(_) => Err(PilotError::timeout(format!("navigation to {url}"), bound)),
        }
    }

    async fn exists(&self, selector: &str) -> PilotResult<bool> {
        Ok(self
            .evaluate(&exists_script(selector))
            .await?
            .as_bool()
            .unwrap_or(false))
    }

    async fn wait_for(&self, selector: &str, timeout: Option<Duration>) -> PilotResult<()> {
        let bound = timeout.unwrap_or(self.timings.default_wait);
        tokio::time::timeout(bound, self.poll_until_present(selector))
            .await
            .map_err(|_| PilotError::timeout(selector, bound))?
    }

    async fn click(&self, selector: &str) -> PilotResult<()> {
        let element = self
            .page
            .find_element(selector)
            .await
            .map_err(|e| PilotError::ElementNotFound(format!("{selector}: {e}")))?;
        element.click().await.map_err(cdp_error)?;
        Ok(())
    }

    async fn click_text(&self, scope: &str, text: &str) -> PilotResult<bool> {
        Ok(self
            .evaluate(&click_text_script(scope, text))
            .await?
            .as_bool()
            .unwrap_or(false))
    }

    async fn type_text(&self, selector: &str, text: &str) -> PilotResult<()> {
        let element = self
            .page
            .find_element(selector)
            .await
            .map_err(|e| PilotError::ElementNotFound(format!("{selector}: {e}")))?;
        element
            .click()
            .await
            .map_err(cdp_error)?
            .type_str(text)
            .await
            .map_err(cdp_error)?;
        Ok(())
    }

    async fn evaluate(&self, script: &str) -> PilotResult<Value> {
        let result = self.page.evaluate(script).await.map_err(cdp_error)?;
        Ok(result.into_value().unwrap_or(Value::Null))
    }

    async fn wait_for_response(
        &self,
        pattern: &UrlPattern,
        timeout: Duration,
    ) -> PilotResult<Value> {
        let responses = self
            .page
            .event_listener::<EventResponseReceived>()
            .await
            .map_err(cdp_error)?;
        let finished = self
            .page
            .event_listener::<EventLoadingFinished>()
            .await
            .map_err(cdp_error)?;

        tokio::time::timeout(timeout, self.intercept(pattern, responses, finished))
            .await
            .map_err(|_| PilotError::timeout(format!("response {pattern}"), timeout))?
    }
}
