//! Wait and transition policies

use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

use crate::Result;

/// Default wait budget for element resolution, in milliseconds
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 10_000;

/// Default polling interval, in milliseconds
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

/// Bounded polling budget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(DEFAULT_WAIT_TIMEOUT_MS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }
}

impl WaitPolicy {
    pub fn new(timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            timeout,
            poll_interval,
        }
    }

    /// Probe once, never sleep
    pub fn immediate() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    /// Same interval, different budget
    pub fn with_timeout(self, timeout: Duration) -> Self {
        Self { timeout, ..self }
    }

    /// Run `probe` until it yields `Some`, an error, or the budget runs out.
    ///
    /// The probe always runs at least once. Errors stop the wait immediately;
    /// `Ok(None)` means the budget was exhausted.
    pub async fn until<T, F, Fut>(&self, mut probe: F) -> Result<Option<T>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Option<T>>>,
    {
        let deadline = Instant::now() + self.timeout;
        loop {
            if let Some(value) = probe().await? {
                return Ok(Some(value));
            }
            if Instant::now() >= deadline {
                return Ok(None);
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

/// What a navigation transition does after binding the destination page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionPolicy {
    /// Probe the destination's marker and fail with `NavigationFailed` if it
    /// does not show up within the wait budget
    #[default]
    Verify,
    /// Return the destination unverified; a wrong page surfaces later as
    /// `ElementNotFound` on first use
    TrustCallSite,
}
