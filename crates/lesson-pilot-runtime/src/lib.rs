//! Lesson Pilot runtime: Chromium-backed driver, configuration and CLI.

pub mod cli;
pub mod config;
pub mod driver;

pub use driver::chromium::{ChromiumDriver, LaunchOptions};
