//! Listing paginator

use std::fmt;
use std::marker::PhantomData;
use tracing::{debug, instrument};

use crate::locator::Locator;
use crate::page::{Page, Region};
use crate::resolver::Element;
use crate::session::{SessionContext, TransitionPolicy};
use crate::{Error, Result};

pub const PAGINATION: Locator = Locator::css("paginator", ".pagination");
pub const CURRENT_PAGE: Locator = Locator::css("current page", ".pagination .current-page");
pub const TOTAL_PAGES: Locator = Locator::css("total pages", ".pagination .total-pages");
pub const FIRST_PAGE: Locator = Locator::css("first page link", ".pagination a.first-page");
pub const NEXT_PAGE: Locator = Locator::css("next page link", ".pagination a.next-page");

/// Paginator of a listing page `P`; paging reloads `P`
pub struct Paginator<P> {
    ctx: SessionContext,
    root: Option<Element>,
    page: PhantomData<fn() -> P>,
}

impl<P> fmt::Debug for Paginator<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Paginator")
            .field("root", &self.root)
            .finish()
    }
}

impl<P> Clone for Paginator<P> {
    fn clone(&self) -> Self {
        Self {
            ctx: self.ctx.clone(),
            root: self.root.clone(),
            page: PhantomData,
        }
    }
}

impl<P: Page> Region for Paginator<P> {
    const NAME: &'static str = "paginator";

    fn bind(ctx: SessionContext, root: Option<Element>) -> Self {
        Self {
            ctx,
            root,
            page: PhantomData,
        }
    }

    fn context(&self) -> &SessionContext {
        &self.ctx
    }

    fn root(&self) -> Option<&Element> {
        self.root.as_ref()
    }
}

impl<P: Page> Paginator<P> {
    /// Listings that fit on one page show no paginator
    pub async fn is_paginator_present(&self) -> Result<bool> {
        self.resolver().is_visible(&PAGINATION).await
    }

    /// 1-based number of the page displayed
    pub async fn page_number(&self) -> Result<u32> {
        let text = self.resolver().find(&CURRENT_PAGE).await?.text().await?;
        parse_number(&CURRENT_PAGE, &text)
    }

    pub async fn total_page_number(&self) -> Result<u32> {
        if !self.is_paginator_present().await? {
            return Ok(1);
        }
        let text = self.resolver().find(&TOTAL_PAGES).await?.text().await?;
        parse_number(&TOTAL_PAGES, &text)
    }

    pub async fn is_first_page_disabled(&self) -> Result<bool> {
        self.resolver()
            .find(&FIRST_PAGE)
            .await?
            .has_class("disabled")
            .await
    }

    pub async fn is_next_page_disabled(&self) -> Result<bool> {
        self.resolver()
            .find(&NEXT_PAGE)
            .await?
            .has_class("disabled")
            .await
    }

    /// Load the next page of the listing.
    ///
    /// Every row read before the call belongs to the old document. Under
    /// `Verify` the page indicator must advance, else `NavigationFailed`.
    #[instrument(skip(self), fields(page = P::NAME))]
    pub async fn click_next_page(&self) -> Result<P> {
        let verify = self.ctx.transition_policy() == TransitionPolicy::Verify;
        let before = if verify {
            Some(self.page_number().await?)
        } else {
            None
        };

        self.resolver().find(&NEXT_PAGE).await?.click().await?;
        let page = self.ctx.transition::<P>().await?;

        if let Some(before) = before {
            // Any root went stale with the old document; read the new one whole
            let paginator = Self::bind(self.ctx.clone(), None);
            let paginator = &paginator;
            let advanced = self
                .ctx
                .wait_policy()
                .until(move || async move {
                    match paginator.page_number().await {
                        Ok(now) if now > before => Ok(Some(now)),
                        Ok(_) => Ok(None),
                        Err(e) if e.is_stale() => Ok(None),
                        Err(e) => Err(e),
                    }
                })
                .await?;

            match advanced {
                Some(now) => debug!("Paged from {} to {}", before, now),
                None => {
                    return Err(Error::navigation_failed(format!(
                        "{} stayed on page {} after clicking {}",
                        P::NAME,
                        before,
                        NEXT_PAGE
                    )))
                }
            }
        }

        Ok(page)
    }
}

fn parse_number(locator: &Locator, text: &str) -> Result<u32> {
    text.trim().parse().map_err(|_| {
        Error::unexpected_state(format!("{} shows {:?}, not a page number", locator, text))
    })
}
