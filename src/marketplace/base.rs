//! Behaviour shared by every marketplace page

use async_trait::async_trait;

use super::header::HeaderRegion;
use crate::page::{Page, Region};
use crate::Result;

/// A page that carries the site header
#[async_trait]
pub trait MarketplacePage: Page {
    /// Header of the current document, rebuilt on every call
    fn header(&self) -> HeaderRegion {
        HeaderRegion::bind(self.context().clone(), None)
    }

    /// Sign in as a configured user through the header's login control.
    ///
    /// Returns once the header reports an authenticated session.
    async fn login(&self, user: &str) -> Result<()> {
        // Unknown users fail before the browser is touched
        self.context().credentials(user)?;

        let login = self.header().click_login().await?;
        login.login(user).await
    }
}
