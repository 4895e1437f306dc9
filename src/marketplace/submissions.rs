//! Developer submissions listing

use chrono::NaiveDate;

use super::base::MarketplacePage;
use super::paginator::Paginator;
use super::sorter::Sorter;
use crate::locator::Locator;
use crate::page::{Page, Region, RepeatedRegion};
use crate::resolver::Element;
use crate::session::SessionContext;
use crate::{Error, Result};

/// Format of the creation date shown on each row
pub const DATE_FORMAT: &str = "%b %d, %Y";

/// "My Submissions": the apps submitted by the signed-in developer
#[derive(Debug, Clone)]
pub struct MySubmissions {
    ctx: SessionContext,
}

impl Page for MySubmissions {
    const NAME: &'static str = "my submissions";
    const PATH: Option<&'static str> = Some("/developers/submissions");
    const MARKER: Option<Locator> = Some(Self::LISTING);

    fn bind(ctx: SessionContext) -> Self {
        Self { ctx }
    }

    fn context(&self) -> &SessionContext {
        &self.ctx
    }
}

impl MarketplacePage for MySubmissions {}

impl MySubmissions {
    pub const LISTING: Locator = Locator::css("submissions listing", "#my-submissions");
    pub const APP_ROWS: Locator = Locator::css("submitted app", "#my-submissions .item");
    pub const NOTIFICATION: Locator = Locator::css("notification", ".notification-box");

    /// Rows of the page displayed now
    pub async fn submitted_apps(&self) -> Result<RepeatedRegion<SubmittedApp>> {
        self.resolver().regions(&Self::APP_ROWS).await
    }

    pub fn paginator(&self) -> Paginator<Self> {
        Paginator::bind(self.ctx.clone(), None)
    }

    pub fn sorter(&self) -> Sorter<Self> {
        Sorter::bind(self.ctx.clone(), None)
    }

    pub async fn is_notification_visible(&self) -> Result<bool> {
        self.resolver().is_visible(&Self::NOTIFICATION).await
    }

    pub async fn is_notification_successful(&self) -> Result<bool> {
        self.resolver()
            .find(&Self::NOTIFICATION)
            .await?
            .has_class("success")
            .await
    }

    pub async fn notification_message(&self) -> Result<String> {
        self.resolver()
            .find(&Self::NOTIFICATION)
            .await?
            .text()
            .await
    }
}

/// One row of the submissions listing
#[derive(Debug, Clone)]
pub struct SubmittedApp {
    ctx: SessionContext,
    root: Option<Element>,
}

impl Region for SubmittedApp {
    const NAME: &'static str = "submitted app";

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

impl SubmittedApp {
    pub const NAME_LINK: Locator = Locator::css("app name", "h3");
    pub const DATE_CREATED: Locator = Locator::css("creation date", ".date-created");

    pub async fn name(&self) -> Result<String> {
        self.resolver().find(&Self::NAME_LINK).await?.text().await
    }

    pub async fn has_date(&self) -> Result<bool> {
        self.resolver().is_visible(&Self::DATE_CREATED).await
    }

    /// Creation date, shown as `Created: Oct 17, 2026`
    pub async fn date(&self) -> Result<NaiveDate> {
        let text = self
            .resolver()
            .find(&Self::DATE_CREATED)
            .await?
            .text()
            .await?;
        parse_created(&text)
    }
}

fn parse_created(text: &str) -> Result<NaiveDate> {
    let value = text.trim();
    let value = value.strip_prefix("Created:").unwrap_or(value).trim();
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|e| Error::unexpected_state(format!("unreadable creation date {:?}: {}", text, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_created() {
        assert_eq!(
            parse_created("Created: Oct 17, 2026").unwrap(),
            NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
        );
        assert_eq!(
            parse_created("  Jan 02, 2013 ").unwrap(),
            NaiveDate::from_ymd_opt(2013, 1, 2).unwrap()
        );
        assert!(matches!(
            parse_created("Created: yesterday"),
            Err(Error::UnexpectedState(_))
        ));
    }
}
