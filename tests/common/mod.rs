//! Common test utilities
//!
//! Shared fixtures for the integration tests: a mock marketplace with one
//! known developer account and session contexts bound to it.

use async_trait::async_trait;
use marketplace_pages::driver::MockBrowser;
use marketplace_pages::fixture::SessionProvider;
use marketplace_pages::marketplace::{MockMarketplace, MySubmissions};
use marketplace_pages::{
    telemetry, SessionContext, TransitionPolicy, UserCredentials, WaitPolicy,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub const BASE_URL: &str = "http://marketplace.test/";
pub const USER: &str = "default";
pub const EMAIL: &str = "dev@example.com";
pub const PASSWORD: &str = "secret";
pub const DISPLAY_NAME: &str = "Dev Eloper";

pub fn credentials() -> UserCredentials {
    UserCredentials::new(EMAIL, PASSWORD).with_name(DISPLAY_NAME)
}

/// Mock marketplace that knows the default user
pub fn site() -> MockMarketplace {
    MockMarketplace::new().user(credentials())
}

/// Short wait budget so negative paths fail fast
pub fn wait_policy() -> WaitPolicy {
    WaitPolicy::new(Duration::from_millis(200), Duration::from_millis(5))
}

pub fn context(browser: &MockBrowser) -> SessionContext {
    context_with(browser, TransitionPolicy::Verify)
}

pub fn context_with(browser: &MockBrowser, policy: TransitionPolicy) -> SessionContext {
    telemetry::init("warn");

    SessionContext::builder(Arc::new(browser.clone()), BASE_URL)
        .wait(wait_policy())
        .transition_policy(policy)
        .user(USER, credentials())
        .build()
        .expect("Failed to build session context")
}

/// Names of the rows displayed now, in listing order
pub async fn app_names(page: &MySubmissions) -> Vec<String> {
    let apps = page
        .submitted_apps()
        .await
        .expect("Failed to read submitted apps");

    let mut names = Vec::with_capacity(apps.len());
    for app in &apps {
        names.push(app.name().await.expect("Failed to read app name"));
    }
    names
}

/// Provider handing out contexts over a fresh mock site, counting releases
pub struct MockSessionProvider {
    acquired: AtomicUsize,
    released: AtomicUsize,
}

impl MockSessionProvider {
    pub fn new() -> Self {
        Self {
            acquired: AtomicUsize::new(0),
            released: AtomicUsize::new(0),
        }
    }

    pub fn acquired(&self) -> usize {
        self.acquired.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionProvider for MockSessionProvider {
    async fn acquire(&self) -> marketplace_pages::Result<SessionContext> {
        self.acquired.fetch_add(1, Ordering::SeqCst);
        Ok(context(&site().numbered_apps(3).build()))
    }

    async fn release(&self, _ctx: SessionContext) -> marketplace_pages::Result<()> {
        self.released.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
