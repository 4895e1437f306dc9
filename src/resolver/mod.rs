//! # Element locator resolver
//!
//! Turns locator descriptors into live elements at call time. Nothing is
//! cached: every call performs a fresh lookup against the document that is
//! displayed right now.
//!
//! - `find` waits up to the session's budget, then fails with
//!   `ElementNotFound`
//! - `find_all`, `is_present` and `is_visible` probe once
//! - `StaleReference` is never retried here; it reaches the caller unmodified

pub mod element;


use std::sync::Arc;
use tracing::{debug, instrument};

use crate::driver::ElementHandle;
use crate::locator::Locator;
use crate::page::{Region, RepeatedRegion};
use crate::session::SessionContext;
use crate::{Error, Result};

pub use element::Element;

/// Lookup scope: the whole document or the subtree of a region root
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    ctx: &'a SessionContext,
    scope: Option<&'a Element>,
}

impl<'a> Resolver<'a> {
    pub fn new(ctx: &'a SessionContext) -> Self {
        Self { ctx, scope: None }
    }

    /// Resolver restricted to descendants of `root`
    pub fn within(ctx: &'a SessionContext, root: Option<&'a Element>) -> Self {
        Self { ctx, scope: root }
    }

    /// Narrow this resolver to descendants of `root`
    pub fn scoped(&self, root: &'a Element) -> Self {
        Self {
            ctx: self.ctx,
            scope: Some(root),
        }
    }

    pub fn context(&self) -> &'a SessionContext {
        self.ctx
    }

    async fn lookup(&self, locator: &Locator) -> Result<Arc<dyn ElementHandle>> {
        match self.scope {
            Some(root) => root.handle().find_element(locator.by()).await,
            None => self.ctx.driver().find_element(locator.by()).await,
        }
    }

    async fn lookup_all(&self, locator: &Locator) -> Result<Vec<Arc<dyn ElementHandle>>> {
        match self.scope {
            Some(root) => root.handle().find_elements(locator.by()).await,
            None => self.ctx.driver().find_elements(locator.by()).await,
        }
    }

    /// One lookup; `None` when nothing matches
    async fn probe(&self, locator: &Locator) -> Result<Option<Element>> {
        match self.lookup(locator).await {
            Ok(handle) => Ok(Some(Element::new(handle, locator.clone()))),
            Err(Error::ElementNotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// First match, waiting up to the session's budget
    #[instrument(skip_all, fields(locator = %locator))]
    pub async fn find(&self, locator: &Locator) -> Result<Element> {
        let wait = self.ctx.wait_policy();
        let this = *self;
        let found = wait.until(move || async move { this.probe(locator).await }).await?;

        found.ok_or_else(|| {
            debug!("Gave up after {:?}", wait.timeout);
            Error::element_not_found(format!("{} after {}ms", locator, wait.timeout.as_millis()))
        })
    }

    /// Every current match in document order; may be empty
    pub async fn find_all(&self, locator: &Locator) -> Result<Vec<Element>> {
        let handles = self.lookup_all(locator).await?;
        Ok(handles
            .into_iter()
            .map(|handle| Element::new(handle, locator.clone()))
            .collect())
    }

    /// Whether the locator currently matches anything
    pub async fn is_present(&self, locator: &Locator) -> Result<bool> {
        Ok(self.probe(locator).await?.is_some())
    }

    /// Whether the locator currently matches a displayed element
    pub async fn is_visible(&self, locator: &Locator) -> Result<bool> {
        let Some(element) = self.probe(locator).await? else {
            return Ok(false);
        };
        match element.is_displayed().await {
            Ok(displayed) => Ok(displayed),
            // Replaced between lookup and probe: it is not what is shown now
            Err(e) if e.is_stale() => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// First displayed match, waiting up to the session's budget
    #[instrument(skip_all, fields(locator = %locator))]
    pub async fn wait_until_visible(&self, locator: &Locator) -> Result<Element> {
        let wait = self.ctx.wait_policy();
        let this = *self;
        let found = wait
            .until(move || async move {
                let Some(element) = this.probe(locator).await? else {
                    return Ok(None);
                };
                match element.is_displayed().await {
                    Ok(true) => Ok(Some(element)),
                    Ok(false) => Ok(None),
                    Err(e) if e.is_stale() => Ok(None),
                    Err(e) => Err(e),
                }
            })
            .await?;

        found.ok_or_else(|| {
            Error::timeout(format!(
                "{} not visible after {}ms",
                locator,
                wait.timeout.as_millis()
            ))
        })
    }

    /// Region bound to this resolver's scope
    pub fn region<R: Region>(&self) -> R {
        R::bind(self.ctx.clone(), self.scope.cloned())
    }

    /// Region rooted at the first match of `locator`
    pub async fn region_at<R: Region>(&self, locator: &Locator) -> Result<R> {
        let root = self.find(locator).await?;
        Ok(R::bind(self.ctx.clone(), Some(root)))
    }

    /// One region per current match of `locator`, in document order
    pub async fn regions<R: Region>(&self, locator: &Locator) -> Result<RepeatedRegion<R>> {
        let roots = self.find_all(locator).await?;
        debug!("{} {} region(s) at {}", roots.len(), R::NAME, locator);
        Ok(roots
            .into_iter()
            .map(|root| R::bind(self.ctx.clone(), Some(root)))
            .collect())
    }
}
