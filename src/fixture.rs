//! Scoped session acquisition
//!
//! Tests receive a fresh [`SessionContext`] per body and the provider gets it
//! back on every exit path: success, error or panic.

use async_trait::async_trait;
use futures::FutureExt;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::driver::WebDriverClient;
use crate::session::SessionContext;
use crate::{Error, Result};

/// Source of session contexts for test bodies
#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn acquire(&self) -> Result<SessionContext>;

    /// Called exactly once per acquired context
    async fn release(&self, ctx: SessionContext) -> Result<()>;
}

/// Run `body` with a freshly acquired session and release it afterwards.
///
/// A panic in `body` is re-raised after the release. When both the body and
/// the release fail, the body's error wins.
pub async fn with_session<P, F, Fut, T>(provider: &P, body: F) -> Result<T>
where
    P: SessionProvider + ?Sized,
    F: FnOnce(SessionContext) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let ctx = provider.acquire().await?;
    debug!("Acquired session for {}", ctx.base_url());

    let scoped = ctx.clone();
    let outcome = AssertUnwindSafe(async move { body(scoped).await })
        .catch_unwind()
        .await;
    let released = provider.release(ctx).await;

    match outcome {
        Ok(Ok(value)) => {
            released?;
            Ok(value)
        }
        Ok(Err(e)) => {
            if let Err(release_err) = released {
                warn!("Release failed after error {}: {}", e, release_err);
            }
            Err(e)
        }
        Err(payload) => {
            if let Err(release_err) = released {
                warn!("Release failed after panic: {}", release_err);
            }
            panic::resume_unwind(payload)
        }
    }
}

/// Attaches to the WebDriver session named in the configuration
///
/// Release leaves the remote session open; whoever created it closes it.
#[derive(Debug, Clone)]
pub struct AttachedSessionProvider {
    config: Config,
}

impl AttachedSessionProvider {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

#[async_trait]
impl SessionProvider for AttachedSessionProvider {
    async fn acquire(&self) -> Result<SessionContext> {
        let session = self.config.webdriver_session.as_deref().ok_or_else(|| {
            Error::configuration("MARKETPLACE_WEBDRIVER_SESSION is not set")
        })?;
        let client = WebDriverClient::attach(&self.config.webdriver_url, session)?;
        info!("Attached to WebDriver session {}", client.session_id());
        SessionContext::from_config(Arc::new(client), &self.config)
    }

    async fn release(&self, ctx: SessionContext) -> Result<()> {
        debug!("Detached from session at {}", ctx.base_url());
        Ok(())
    }
}
