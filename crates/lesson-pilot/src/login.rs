//! Account login.

use crate::driver::UiDriver;
use crate::error::{PilotError, PilotResult};
use crate::selectors;

/// Account credentials.
#[derive(Clone)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> PilotResult<Self> {
        let username = username.into();
        let password = password.into();
        if username.is_empty() {
            return Err(PilotError::MissingCredential("username"));
        }
        if password.is_empty() {
            return Err(PilotError::MissingCredential("password"));
        }
        Ok(Self { username, password })
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Open the site and sign in.
pub async fn login(
    driver: &dyn UiDriver,
    base_url: &str,
    credentials: &Credentials,
) -> PilotResult<()> {
    tracing::info!("Logging in as {}", credentials.username());
    driver.navigate(base_url).await?;
    driver.wait_for(selectors::HAVE_ACCOUNT, None).await?;
    driver.click(selectors::HAVE_ACCOUNT).await?;
    driver.wait_for(selectors::EMAIL_INPUT, None).await?;
    driver
        .type_text(selectors::EMAIL_INPUT, credentials.username())
        .await?;
    driver
        .type_text(selectors::PASSWORD_INPUT, &credentials.password)
        .await?;
    driver.click(selectors::LOGIN_BUTTON).await
}
