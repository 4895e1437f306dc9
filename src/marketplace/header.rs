//! Site header
//!
//! The header is shown in one of two mutually exclusive states. Callers that
//! need to act on it ask for [`HeaderRegion::state`] and get a view that only
//! offers the actions valid in the state actually displayed.

use tracing::{debug, info, instrument};

use super::login::Login;
use super::submissions::MySubmissions;
use crate::locator::Locator;
use crate::page::{Page, Region};
use crate::resolver::Element;
use crate::session::SessionContext;
use crate::{Error, Result};

/// Navigation bar and account menu
#[derive(Debug, Clone)]
pub struct HeaderRegion {
    ctx: SessionContext,
    root: Option<Element>,
}

impl Region for HeaderRegion {
    const NAME: &'static str = "header";

    fn bind(ctx: SessionContext, root: Option<Element>) -> Self {
        Self { ctx, root }
    }

    fn context(&self) -> &SessionContext {
        &self.ctx
    }

    fn root(&self) -> Option<&Element> {
        self.root.as_ref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shown {
    Anonymous,
    Authenticated,
}

impl HeaderRegion {
    pub const LOGIN: Locator = Locator::css("login link", "a.browserid-login");
    pub const ACCOUNT_CONTROLLER: Locator =
        Locator::css("account controller", "#aux-nav .account a.user");
    pub const LOGOUT: Locator = Locator::css("logout link", "li.nomenu.logout > a");
    pub const MY_SUBMISSIONS: Locator =
        Locator::css("my submissions link", "#aux-nav .my-submissions > a");

    /// True iff the account controller is displayed right now
    pub async fn is_user_logged_in(&self) -> Result<bool> {
        self.resolver().is_visible(&Self::ACCOUNT_CONTROLLER).await
    }

    /// View of the state the header is displayed in.
    ///
    /// Waits for either control to show up; if neither does the header is
    /// missing and the result is `ElementNotFound`.
    pub async fn state(&self) -> Result<HeaderState> {
        let resolver = self.resolver();
        let wait = self.ctx.wait_policy();
        let shown = wait
            .until(move || async move {
                if resolver.is_visible(&Self::ACCOUNT_CONTROLLER).await? {
                    return Ok(Some(Shown::Authenticated));
                }
                if resolver.is_visible(&Self::LOGIN).await? {
                    return Ok(Some(Shown::Anonymous));
                }
                Ok(None)
            })
            .await?;

        match shown {
            Some(Shown::Authenticated) => Ok(HeaderState::Authenticated(AuthenticatedHeader {
                header: self.clone(),
            })),
            Some(Shown::Anonymous) => Ok(HeaderState::Anonymous(AnonymousHeader {
                header: self.clone(),
            })),
            None => Err(Error::element_not_found(format!(
                "header shows neither {} nor {} after {}ms",
                Self::LOGIN,
                Self::ACCOUNT_CONTROLLER,
                wait.timeout.as_millis()
            ))),
        }
    }

    /// Start signing in; fails with `UnexpectedState` when already signed in
    pub async fn click_login(&self) -> Result<Login> {
        self.state().await?.into_anonymous()?.click_login().await
    }

    /// Sign out; fails with `UnexpectedState` when nobody is signed in
    pub async fn click_logout(&self) -> Result<()> {
        self.state().await?.into_authenticated()?.click_logout().await
    }
}

/// Header in one of its two display states
#[derive(Debug, Clone)]
pub enum HeaderState {
    Anonymous(AnonymousHeader),
    Authenticated(AuthenticatedHeader),
}

impl HeaderState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, HeaderState::Authenticated(_))
    }

    pub fn into_anonymous(self) -> Result<AnonymousHeader> {
        match self {
            HeaderState::Anonymous(header) => Ok(header),
            HeaderState::Authenticated(_) => Err(Error::unexpected_state(
                "header is signed in, expected the anonymous header",
            )),
        }
    }

    pub fn into_authenticated(self) -> Result<AuthenticatedHeader> {
        match self {
            HeaderState::Authenticated(header) => Ok(header),
            HeaderState::Anonymous(_) => Err(Error::unexpected_state(
                "header is anonymous, expected a signed-in header",
            )),
        }
    }
}

/// Header as shown to visitors
#[derive(Debug, Clone)]
pub struct AnonymousHeader {
    header: HeaderRegion,
}

impl AnonymousHeader {
    /// Open the credential entry flow
    #[instrument(skip(self))]
    pub async fn click_login(self) -> Result<Login> {
        let resolver = self.header.resolver();
        resolver.find(&HeaderRegion::LOGIN).await?.click().await?;
        self.header.ctx.transition::<Login>().await
    }
}

/// Header as shown to a signed-in user
#[derive(Debug, Clone)]
pub struct AuthenticatedHeader {
    header: HeaderRegion,
}

impl AuthenticatedHeader {
    /// Name shown in the account controller
    pub async fn account_name(&self) -> Result<String> {
        let resolver = self.header.resolver();
        resolver
            .find(&HeaderRegion::ACCOUNT_CONTROLLER)
            .await?
            .text()
            .await
    }

    pub async fn click_my_submissions(self) -> Result<MySubmissions> {
        let resolver = self.header.resolver();
        resolver
            .find(&HeaderRegion::MY_SUBMISSIONS)
            .await?
            .click()
            .await?;
        self.header.ctx.transition::<MySubmissions>().await
    }

    /// Sign out and wait until the header no longer shows a signed-in user.
    ///
    /// Where the browser lands depends on where logout was triggered, so no
    /// page is returned. Use [`click_logout_to`](Self::click_logout_to) when
    /// the destination is known.
    #[instrument(skip(self))]
    pub async fn click_logout(self) -> Result<()> {
        let resolver = self.header.resolver();

        let logout = resolver.find(&HeaderRegion::LOGOUT).await?;
        let logout = if logout.is_displayed().await? {
            logout
        } else {
            // Folded into the account menu
            debug!("Opening the account menu");
            resolver
                .find(&HeaderRegion::ACCOUNT_CONTROLLER)
                .await?
                .click()
                .await?;
            resolver.wait_until_visible(&HeaderRegion::LOGOUT).await?
        };
        logout.click().await?;

        let header = &self.header;
        let wait = header.ctx.wait_policy();
        let signed_out = wait
            .until(move || async move {
                Ok((!header.is_user_logged_in().await?).then_some(()))
            })
            .await?;
        if signed_out.is_none() {
            return Err(Error::timeout(format!(
                "still signed in {}ms after logout",
                wait.timeout.as_millis()
            )));
        }

        info!("Signed out");
        Ok(())
    }

    /// Sign out and hand control to the page the caller expects
    pub async fn click_logout_to<P: Page>(self) -> Result<P> {
        let ctx = self.header.ctx.clone();
        self.click_logout().await?;
        debug!("Expecting {} after logout", P::NAME);
        ctx.transition::<P>().await
    }
}
