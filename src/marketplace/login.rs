//! Credential entry

use tracing::{info, instrument, warn};

use super::header::HeaderRegion;
use crate::locator::Locator;
use crate::page::{Page, Region};
use crate::session::SessionContext;
use crate::{Error, Result};

/// Sign-in form
///
/// Owns credential submission. The header only knows how to get here.
#[derive(Debug, Clone)]
pub struct Login {
    ctx: SessionContext,
}

impl Page for Login {
    const NAME: &'static str = "login";
    const PATH: Option<&'static str> = Some("/login");
    const MARKER: Option<Locator> = Some(Self::FORM);

    fn bind(ctx: SessionContext) -> Self {
        Self { ctx }
    }

    fn context(&self) -> &SessionContext {
        &self.ctx
    }
}

impl Login {
    pub const FORM: Locator = Locator::css("login form", "#login-form");
    pub const EMAIL: Locator = Locator::css("email field", "#id_email");
    pub const PASSWORD: Locator = Locator::css("password field", "#id_password");
    pub const SUBMIT: Locator = Locator::css("sign in button", "#login-form button[type=submit]");
    pub const ERROR: Locator = Locator::css("login error", "#login-form .errorlist");

    /// Sign in as a configured user
    pub async fn login(&self, user: &str) -> Result<()> {
        let credentials = self.ctx.credentials(user)?.clone();
        self.login_with(&credentials.email, &credentials.password)
            .await
    }

    /// Submit the given credentials and wait for a signed-in header.
    ///
    /// Fails with `Timeout` carrying the form's error text when the site
    /// rejects them.
    #[instrument(skip(self, password))]
    pub async fn login_with(&self, email: &str, password: &str) -> Result<()> {
        let resolver = self.resolver();
        resolver.find(&Self::EMAIL).await?.fill(email).await?;
        resolver.find(&Self::PASSWORD).await?.fill(password).await?;
        resolver.find(&Self::SUBMIT).await?.click().await?;

        let header = HeaderRegion::bind(self.ctx.clone(), None);
        let header = &header;
        let wait = self.ctx.wait_policy();
        let signed_in = wait
            .until(move || async move { Ok(header.is_user_logged_in().await?.then_some(())) })
            .await?;

        if signed_in.is_none() {
            let reason = self.error_message().await?;
            warn!("Sign in as {} failed: {:?}", email, reason);
            return Err(Error::timeout(match reason {
                Some(reason) => format!("{} was not signed in: {}", email, reason),
                None => format!(
                    "{} was not signed in after {}ms",
                    email,
                    wait.timeout.as_millis()
                ),
            }));
        }

        info!("Signed in as {}", email);
        Ok(())
    }

    /// Validation error shown by the form, if any
    pub async fn error_message(&self) -> Result<Option<String>> {
        let resolver = self.resolver();
        if !resolver.is_visible(&Self::ERROR).await? {
            return Ok(None);
        }
        Ok(Some(resolver.find(&Self::ERROR).await?.text().await?))
    }
}
