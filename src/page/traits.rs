//! Page and region traits

use async_trait::async_trait;

use crate::locator::Locator;
use crate::resolver::{Element, Resolver};
use crate::session::SessionContext;
use crate::Result;

/// "The page currently displayed is this page"
///
/// Binding a page performs no driver call and no validation. Operations fail
/// individually if a different page is displayed.
#[async_trait]
pub trait Page: Sized + Send + Sync {
    /// Name used in logs and navigation errors
    const NAME: &'static str;

    /// Site path the page can be opened at directly
    const PATH: Option<&'static str> = None;

    /// Element unique to this page, probed after navigation transitions
    const MARKER: Option<Locator> = None;

    fn bind(ctx: SessionContext) -> Self;

    fn context(&self) -> &SessionContext;

    fn resolver(&self) -> Resolver<'_> {
        Resolver::new(self.context())
    }

    /// Whether the page's marker is displayed. Pages without a marker
    /// cannot tell and report `true`.
    async fn is_displayed(&self) -> Result<bool> {
        match Self::MARKER {
            Some(marker) => self.resolver().is_visible(&marker).await,
            None => Ok(true),
        }
    }
}

/// Reusable sub-area of a page, optionally scoped to a root element
///
/// Regions are rebuilt by their accessor on every read and share the
/// session of the page that produced them.
pub trait Region: Sized + Send + Sync {
    const NAME: &'static str;

    fn bind(ctx: SessionContext, root: Option<Element>) -> Self;

    fn context(&self) -> &SessionContext;

    /// Root element; `None` means the whole document
    fn root(&self) -> Option<&Element>;

    /// Resolver limited to the region's root
    fn resolver(&self) -> Resolver<'_> {
        Resolver::within(self.context(), self.root())
    }
}
