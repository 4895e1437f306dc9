//! Browser driver traits
//!
//! The consumed interface of an already-initialised browser automation
//! session. The page layer only ever talks to these traits.

use async_trait::async_trait;
use std::sync::Arc;

use crate::locator::By;
use crate::Error;

/// Handle to a live browser session
///
/// Lookups never wait: an absent element is reported immediately as
/// `Error::ElementNotFound`. Waiting belongs to the resolver.
#[async_trait]
pub trait Driver: Send + Sync + std::fmt::Debug {
    /// Load a URL in the current window
    async fn navigate(&self, url: &str) -> Result<(), Error>;

    /// URL of the document currently displayed
    async fn current_url(&self) -> Result<String, Error>;

    /// First element matching `by` in document order
    async fn find_element(&self, by: &By) -> Result<Arc<dyn ElementHandle>, Error>;

    /// All elements matching `by`, in document order
    async fn find_elements(&self, by: &By) -> Result<Vec<Arc<dyn ElementHandle>>, Error>;

    /// Whether an element matching `by` exists and is displayed
    async fn is_visible(&self, by: &By) -> Result<bool, Error> {
        match self.find_element(by).await {
            Ok(element) => element.is_displayed().await,
            Err(Error::ElementNotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

/// Element reference trait
///
/// Represents one DOM element of the document that was current when the
/// handle was obtained.
#[async_trait]
pub trait ElementHandle: Send + Sync + std::fmt::Debug {
    /// Driver-assigned element id
    fn id(&self) -> &str;

    /// First descendant matching `by`
    async fn find_element(&self, by: &By) -> Result<Arc<dyn ElementHandle>, Error>;

    /// All descendants matching `by`, in document order
    async fn find_elements(&self, by: &By) -> Result<Vec<Arc<dyn ElementHandle>>, Error>;

    /// Click element
    async fn click(&self) -> Result<(), Error>;

    /// Type text into element
    async fn send_keys(&self, text: &str) -> Result<(), Error>;

    /// Clear an editable element
    async fn clear(&self) -> Result<(), Error>;

    /// Visible text
    async fn text(&self) -> Result<String, Error>;

    /// Attribute or property value
    async fn attribute(&self, name: &str) -> Result<Option<String>, Error>;

    /// Check if element is displayed
    async fn is_displayed(&self) -> Result<bool, Error>;

    /// Check if element is enabled
    async fn is_enabled(&self) -> Result<bool, Error>;
}
