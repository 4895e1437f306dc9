//! Session context
//!
//! The one long-lived value of a test: a shared driver handle plus the base
//! URL of the site under test. Pages and regions hold clones of it; none of
//! them own or close the browser.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, instrument, warn};
use url::Url;

use super::wait::{TransitionPolicy, WaitPolicy};
use crate::config::{Config, UserCredentials};
use crate::driver::Driver;
use crate::page::Page;
use crate::resolver::Resolver;
use crate::{Error, Result};

struct Inner {
    driver: Arc<dyn Driver>,
    base_url: Url,
    wait: WaitPolicy,
    transitions: TransitionPolicy,
    users: HashMap<String, UserCredentials>,
}

/// Shared handle to one browser session and the site under test
#[derive(Clone)]
pub struct SessionContext {
    inner: Arc<Inner>,
}

impl fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionContext")
            .field("base_url", &self.inner.base_url.as_str())
            .field("wait", &self.inner.wait)
            .field("transitions", &self.inner.transitions)
            .field("users", &self.inner.users.len())
            .finish()
    }
}

impl SessionContext {
    /// Bind a driver to a site, with default policies and no users
    pub fn new(driver: Arc<dyn Driver>, base_url: &str) -> Result<Self> {
        Self::builder(driver, base_url).build()
    }

    pub fn builder(driver: Arc<dyn Driver>, base_url: impl Into<String>) -> SessionContextBuilder {
        SessionContextBuilder {
            driver,
            base_url: base_url.into(),
            wait: WaitPolicy::default(),
            transitions: TransitionPolicy::default(),
            users: HashMap::new(),
        }
    }

    /// Build from configuration
    pub fn from_config(driver: Arc<dyn Driver>, config: &Config) -> Result<Self> {
        Self::builder(driver, config.base_url.clone())
            .wait(config.wait_policy())
            .transition_policy(config.transition_policy())
            .users(config.users.clone())
            .build()
    }

    pub(crate) fn driver(&self) -> &Arc<dyn Driver> {
        &self.inner.driver
    }

    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    pub fn wait_policy(&self) -> WaitPolicy {
        self.inner.wait
    }

    pub fn transition_policy(&self) -> TransitionPolicy {
        self.inner.transitions
    }

    /// Credentials of a configured user
    pub fn credentials(&self, user: &str) -> Result<&UserCredentials> {
        self.inner
            .users
            .get(user)
            .ok_or_else(|| Error::unknown_user(user))
    }

    /// Absolute URL of a site path, relative to the base URL
    pub fn url_for(&self, path: &str) -> Result<Url> {
        Ok(self.inner.base_url.join(path.trim_start_matches('/'))?)
    }

    /// Unscoped resolver
    pub fn resolver(&self) -> Resolver<'_> {
        Resolver::new(self)
    }

    /// URL currently displayed by the browser
    pub async fn current_url(&self) -> Result<String> {
        self.driver().current_url().await
    }

    /// Construct a page object for whatever is displayed, without any driver call
    pub fn bind<P: Page>(&self) -> P {
        P::bind(self.clone())
    }

    /// Suite entry: load the page's own path and return it
    pub async fn open<P: Page>(&self) -> Result<P> {
        let path = P::PATH
            .ok_or_else(|| Error::configuration(format!("{} has no path to open", P::NAME)))?;
        self.open_path(path).await
    }

    /// Load `path` and expect it to display `P`
    #[instrument(skip(self), fields(page = P::NAME))]
    pub async fn open_path<P: Page>(&self, path: &str) -> Result<P> {
        let url = self.url_for(path)?;
        debug!("Opening {}", url);
        self.driver().navigate(url.as_str()).await?;
        self.transition().await
    }

    /// Hand control to the destination page of a navigation.
    ///
    /// Under `Verify` the destination's marker must show up within the wait
    /// budget, otherwise `NavigationFailed`. Under `TrustCallSite` the page is
    /// returned as is.
    #[instrument(skip(self), fields(page = P::NAME))]
    pub async fn transition<P: Page>(&self) -> Result<P> {
        let page = self.bind::<P>();
        if self.inner.transitions == TransitionPolicy::Verify {
            self.verify(&page).await?;
        }
        Ok(page)
    }

    /// Wait for `page` to report itself displayed
    pub async fn verify<P: Page>(&self, page: &P) -> Result<()> {
        let landed = self
            .inner
            .wait
            .until(move || async move {
                match page.is_displayed().await {
                    Ok(true) => Ok(Some(())),
                    Ok(false) => Ok(None),
                    // Old document still being replaced
                    Err(e) if e.is_stale() => Ok(None),
                    Err(e) => Err(e),
                }
            })
            .await?;

        if landed.is_none() {
            let url = self
                .current_url()
                .await
                .unwrap_or_else(|_| "<unknown>".to_string());
            warn!("Expected {} but {} is displayed", P::NAME, url);
            return Err(Error::navigation_failed(format!(
                "expected {} at {}",
                P::NAME,
                url
            )));
        }
        Ok(())
    }
}

/// Builder for [`SessionContext`]
pub struct SessionContextBuilder {
    driver: Arc<dyn Driver>,
    base_url: String,
    wait: WaitPolicy,
    transitions: TransitionPolicy,
    users: HashMap<String, UserCredentials>,
}

impl SessionContextBuilder {
    pub fn wait(mut self, wait: WaitPolicy) -> Self {
        self.wait = wait;
        self
    }

    pub fn transition_policy(mut self, policy: TransitionPolicy) -> Self {
        self.transitions = policy;
        self
    }

    /// Register a named user
    pub fn user(mut self, name: impl Into<String>, credentials: UserCredentials) -> Self {
        self.users.insert(name.into(), credentials);
        self
    }

    pub fn users(mut self, users: HashMap<String, UserCredentials>) -> Self {
        self.users.extend(users);
        self
    }

    pub fn build(self) -> Result<SessionContext> {
        let mut base_url = Url::parse(&self.base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(Error::configuration(format!(
                "{} cannot be used as a base URL",
                self.base_url
            )));
        }
        // Relative joins must keep the last path segment
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(SessionContext {
            inner: Arc::new(Inner {
                driver: self.driver,
                base_url,
                wait: self.wait,
                transitions: self.transitions,
                users: self.users,
            }),
        })
    }
}
