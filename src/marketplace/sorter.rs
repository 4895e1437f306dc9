//! Listing sort control

use std::fmt;
use std::marker::PhantomData;
use tracing::instrument;

use crate::locator::{By, Locator};
use crate::page::{Page, Region};
use crate::resolver::Element;
use crate::session::{SessionContext, TransitionPolicy};
use crate::{Error, Result};

pub const SORTER: Locator = Locator::css("sorter", "#sorter");
pub const SELECTED: Locator = Locator::css("selected sort option", "#sorter li.selected a");

/// Sort options of a listing page `P`; re-sorting reloads `P`
pub struct Sorter<P> {
    ctx: SessionContext,
    root: Option<Element>,
    page: PhantomData<fn() -> P>,
}

impl<P> fmt::Debug for Sorter<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sorter").field("root", &self.root).finish()
    }
}

impl<P: Page> Region for Sorter<P> {
    const NAME: &'static str = "sorter";

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

/// Option link with the given label
pub fn option(label: &str) -> Locator {
    Locator::dynamic(
        format!("sort option {:?}", label),
        By::LinkText(label.to_string().into()),
    )
}

impl<P: Page> Sorter<P> {
    /// Label of the active sort option
    pub async fn sorted_by(&self) -> Result<String> {
        self.resolver().find(&SELECTED).await?.text().await
    }

    /// Re-sort the listing by the option labelled `label`
    #[instrument(skip(self), fields(page = P::NAME))]
    pub async fn sort_by(&self, label: &str) -> Result<P> {
        let resolver = self.resolver();
        let sorter = resolver.find(&SORTER).await?;
        resolver
            .scoped(&sorter)
            .find(&option(label))
            .await?
            .click()
            .await?;

        let page = self.ctx.transition::<P>().await?;

        if self.ctx.transition_policy() == TransitionPolicy::Verify {
            // Any root went stale with the old document; read the new one whole
            let fresh = Self::bind(self.ctx.clone(), None);
            let fresh = &fresh;
            let applied = self
                .ctx
                .wait_policy()
                .until(move || async move {
                    match fresh.sorted_by().await {
                        Ok(now) if now == label => Ok(Some(())),
                        Ok(_) => Ok(None),
                        Err(e) if e.is_stale() => Ok(None),
                        Err(e) => Err(e),
                    }
                })
                .await?;
            if applied.is_none() {
                return Err(Error::navigation_failed(format!(
                    "{} is not sorted by {:?}",
                    P::NAME,
                    label
                )));
            }
        }

        Ok(page)
    }
}
