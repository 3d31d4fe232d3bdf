//! Environment readiness check.

use anyhow::Result;

use crate::config::{self, PASSWORD_ENV, USERNAME_ENV};

/// Check Chromium availability, credentials and the target site.
pub async fn run(chromium: Option<&str>, url: Option<&str>) -> Result<()> {
    println!("Lesson Pilot Doctor");
    println!("===================");
    println!();

    println!("OS:   {}", std::env::consts::OS);
    println!("Arch: {}", std::env::consts::ARCH);
    println!();

    let chromium_path = config::resolve_chromium_path(chromium);
    match &chromium_path {
        Some(path) => println!("[OK] Chromium found: {}", path.display()),
        None => println!(
            "[!!] Chromium NOT found. Install Chrome or set {}.",
            config::CHROMIUM_ENV
        ),
    }

    let mut credentials_ok = true;
    for var in [USERNAME_ENV, PASSWORD_ENV] {
        match std::env::var(var) {
            Ok(v) if !v.is_empty() => println!("[OK] {var} is set"),
            _ => {
                credentials_ok = false;
                println!("[!!] {var} is not set");
            }
        }
    }

    println!("[OK] Target site: {}", config::resolve_base_url(url));

    println!();
    if chromium_path.is_some() && credentials_ok {
        println!("Status: READY");
    } else {
        println!("Status: NOT READY");
    }

    Ok(())
}
