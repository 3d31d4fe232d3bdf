//! `lesson-pilot run`: log in and work through the skill tree.

use anyhow::{Context, Result};
use clap::Args;
use std::time::Duration;

use lesson_pilot::config::{DEFAULT_LESSON_DATA_WAIT, DEFAULT_WAIT};
use lesson_pilot::{login, NavigationSummary, PilotResult, SessionTimings, TreeNavigator};

use crate::config;
use crate::driver::chromium::{ChromiumDriver, LaunchOptions};

const DEFAULT_TIMEOUT_MS: u64 = DEFAULT_WAIT.as_millis() as u64;
const DEFAULT_LESSON_DATA_TIMEOUT_MS: u64 = DEFAULT_LESSON_DATA_WAIT.as_millis() as u64;

/// Options for a run.
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Site to open (default: $LESSON_PILOT_URL or the public site)
    #[arg(long)]
    pub url: Option<String>,

    /// Path to the Chromium binary (default: $LESSON_PILOT_CHROMIUM_PATH or PATH lookup)
    #[arg(long)]
    pub chromium: Option<String>,

    /// Run the browser without a window
    #[arg(long)]
    pub headless: bool,

    /// Stop after this many lesson attempts
    #[arg(long)]
    pub max_lessons: Option<usize>,

    /// Default wait bound in milliseconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_MS)]
    pub timeout: u64,

    /// How long to wait for lesson data, in milliseconds
    #[arg(long, default_value_t = DEFAULT_LESSON_DATA_TIMEOUT_MS)]
    pub lesson_data_timeout: u64,
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            url: None,
            chromium: None,
            headless: false,
            max_lessons: None,
            timeout: DEFAULT_TIMEOUT_MS,
            lesson_data_timeout: DEFAULT_LESSON_DATA_TIMEOUT_MS,
        }
    }
}

impl RunArgs {
    pub fn timings(&self) -> SessionTimings {
        SessionTimings {
            default_wait: Duration::from_millis(self.timeout),
            lesson_data_wait: Duration::from_millis(self.lesson_data_timeout),
            ..SessionTimings::default()
        }
    }
}

/// Run the command.
pub async fn run(args: &RunArgs, json: bool) -> Result<()> {
    let base_url = config::resolve_base_url(args.url.as_deref());
    let credentials = config::resolve_credentials()?;
    let chromium_path = config::resolve_chromium_path(args.chromium.as_deref()).with_context(
        || {
            format!(
                "Chromium not found. Pass --chromium or set {}.",
                config::CHROMIUM_ENV
            )
        },
    )?;
    let timings = args.timings();

    let driver = ChromiumDriver::launch(LaunchOptions {
        chromium_path,
        headless: args.headless,
        timings,
    })
    .await?;

    let result = drive(&driver, &base_url, &credentials, timings, args.max_lessons).await;
    if let Err(e) = driver.shutdown().await {
        tracing::warn!("Browser shutdown failed: {e:#}");
    }
    let summary = result?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("Lessons completed:    {}", summary.lessons_completed);
        println!("Lessons without data: {}", summary.lessons_without_data);
        println!("Lessons abandoned:    {}", summary.lessons_abandoned);
        println!("Challenges answered:  {}", summary.challenges_answered);
    }
    Ok(())
}

async fn drive(
    driver: &ChromiumDriver,
    base_url: &str,
    credentials: &lesson_pilot::Credentials,
    timings: SessionTimings,
    max_lessons: Option<usize>,
) -> PilotResult<NavigationSummary> {
    login(driver, base_url, credentials).await?;
    TreeNavigator::new(driver, timings)
        .with_max_lessons(max_lessons)
        .run()
        .await
}
