//! Configuration loading and resolution.
//!
//! Every setting resolves in the same order: explicit CLI value, then
//! environment variable, then default.

use anyhow::{Context, Result};
use std::path::PathBuf;

use lesson_pilot::Credentials;

pub const URL_ENV: &str = "LESSON_PILOT_URL";
pub const CHROMIUM_ENV: &str = "LESSON_PILOT_CHROMIUM_PATH";
pub const USERNAME_ENV: &str = "LESSON_PILOT_USERNAME";
pub const PASSWORD_ENV: &str = "LESSON_PILOT_PASSWORD";

pub const DEFAULT_BASE_URL: &str = "https://www.duolingo.com/";

/// Resolve the site to open.
pub fn resolve_base_url(explicit: Option<&str>) -> String {
    if let Some(url) = explicit {
        return url.to_string();
    }
    std::env::var(URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string())
}

/// Read the account credentials from the environment.
pub fn resolve_credentials() -> Result<Credentials> {
    let username =
        std::env::var(USERNAME_ENV).with_context(|| format!("{USERNAME_ENV} is not set"))?;
    let password =
        std::env::var(PASSWORD_ENV).with_context(|| format!("{PASSWORD_ENV} is not set"))?;
    Ok(Credentials::new(username, password)?)
}

/// Find the Chromium binary.
///
/// An explicit path is used only if it exists; there is no fallback past it.
pub fn resolve_chromium_path(explicit: Option<&str>) -> Option<PathBuf> {
    if let Some(p) = explicit {
        let path = PathBuf::from(p);
        return path.exists().then_some(path);
    }

    if let Ok(p) = std::env::var(CHROMIUM_ENV) {
        let path = PathBuf::from(&p);
        if path.exists() {
            return Some(path);
        }
    }

    if let Some(home) = dirs::home_dir() {
        let candidates = if cfg!(target_os = "macos") {
            vec![
                home.join(".lesson-pilot/chromium/chrome-mac-arm64/Google Chrome for Testing.app/Contents/MacOS/Google Chrome for Testing"),
                home.join(".lesson-pilot/chromium/chrome-mac-x64/Google Chrome for Testing.app/Contents/MacOS/Google Chrome for Testing"),
            ]
        } else {
            vec![home.join(".lesson-pilot/chromium/chrome-linux64/chrome")]
        };
        if let Some(found) = candidates.into_iter().find(|c| c.exists()) {
            return Some(found);
        }
    }

    for name in ["google-chrome", "chromium", "chromium-browser"] {
        if let Ok(path) = which::which(name) {
            return Some(path);
        }
    }

    if cfg!(target_os = "macos") {
        let common =
            PathBuf::from("/Applications/Google Chrome.app/Contents/MacOS/Google Chrome");
        if common.exists() {
            return Some(common);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_url_wins() {
        assert_eq!(
            resolve_base_url(Some("http://localhost:8080/")),
            "http://localhost:8080/"
        );
    }

    #[test]
    fn test_explicit_chromium_path() {
        let dir = tempfile::tempdir().unwrap();
        let chrome = dir.path().join("chrome");
        std::fs::write(&chrome, b"").unwrap();

        assert_eq!(
            resolve_chromium_path(Some(chrome.to_str().unwrap())),
            Some(chrome.clone())
        );
        let missing = dir.path().join("nope");
        assert_eq!(resolve_chromium_path(Some(missing.to_str().unwrap())), None);
    }
}
