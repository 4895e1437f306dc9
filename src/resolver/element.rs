//! Resolved element

use std::sync::Arc;
use tracing::{debug, instrument};

use crate::driver::ElementHandle;
use crate::locator::Locator;
use crate::{Error, Result};

/// A live element together with the locator that produced it
///
/// Valid only for the document it was resolved from. Once the page
/// navigates, every call fails with `StaleReference`.
#[derive(Debug, Clone)]
pub struct Element {
    handle: Arc<dyn ElementHandle>,
    locator: Locator,
}

impl Element {
    pub(crate) fn new(handle: Arc<dyn ElementHandle>, locator: Locator) -> Self {
        Self { handle, locator }
    }

    pub fn locator(&self) -> &Locator {
        &self.locator
    }

    pub(crate) fn handle(&self) -> &Arc<dyn ElementHandle> {
        &self.handle
    }

    #[instrument(skip(self), fields(locator = %self.locator))]
    pub async fn click(&self) -> Result<()> {
        debug!("Clicking element");
        self.handle.click().await.map_err(|e| self.annotate(e))
    }

    /// Append text to the element's current value
    pub async fn type_text(&self, text: &str) -> Result<()> {
        self.handle.send_keys(text).await.map_err(|e| self.annotate(e))
    }

    /// Replace the element's value
    pub async fn fill(&self, text: &str) -> Result<()> {
        self.clear().await?;
        self.type_text(text).await
    }

    pub async fn clear(&self) -> Result<()> {
        self.handle.clear().await.map_err(|e| self.annotate(e))
    }

    pub async fn text(&self) -> Result<String> {
        self.handle.text().await.map_err(|e| self.annotate(e))
    }

    pub async fn attribute(&self, name: &str) -> Result<Option<String>> {
        self.handle
            .attribute(name)
            .await
            .map_err(|e| self.annotate(e))
    }

    /// Whether the `class` attribute contains `class`
    pub async fn has_class(&self, class: &str) -> Result<bool> {
        Ok(self
            .attribute("class")
            .await?
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class)))
    }

    pub async fn is_displayed(&self) -> Result<bool> {
        self.handle.is_displayed().await.map_err(|e| self.annotate(e))
    }

    pub async fn is_enabled(&self) -> Result<bool> {
        self.handle.is_enabled().await.map_err(|e| self.annotate(e))
    }

    fn annotate(&self, err: Error) -> Error {
        match err {
            Error::StaleReference(msg) => {
                Error::stale_reference(format!("{}: {}", self.locator, msg))
            }
            other => other,
        }
    }
}
