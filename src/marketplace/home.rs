//! Landing page

use super::base::MarketplacePage;
use crate::locator::Locator;
use crate::page::Page;
use crate::session::SessionContext;

/// Landing page
#[derive(Debug, Clone)]
pub struct Home {
    ctx: SessionContext,
}

impl Page for Home {
    const NAME: &'static str = "home";
    const PATH: Option<&'static str> = Some("/");
    const MARKER: Option<Locator> = Some(Self::SITE_HOME);

    fn bind(ctx: SessionContext) -> Self {
        Self { ctx }
    }

    fn context(&self) -> &SessionContext {
        &self.ctx
    }
}

impl MarketplacePage for Home {}

impl Home {
    pub const SITE_HOME: Locator = Locator::css("home page", "#site-home");
}
