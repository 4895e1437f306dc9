//! Locator descriptors
//!
//! A locator is a declarative `(strategy, selector)` pair. It identifies an
//! element without resolving it; resolution happens in [`crate::resolver`].

use std::borrow::Cow;
use std::fmt;

/// W3C WebDriver strategy names
pub const CSS_SELECTOR: &str = "css selector";
pub const XPATH: &str = "xpath";
pub const LINK_TEXT: &str = "link text";
pub const PARTIAL_LINK_TEXT: &str = "partial link text";
pub const TAG_NAME: &str = "tag name";

/// Lookup strategy plus selector string
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum By {
    Css(Cow<'static, str>),
    XPath(Cow<'static, str>),
    Id(Cow<'static, str>),
    Name(Cow<'static, str>),
    ClassName(Cow<'static, str>),
    TagName(Cow<'static, str>),
    LinkText(Cow<'static, str>),
    PartialLinkText(Cow<'static, str>),
}

impl By {
    /// CSS selector
    pub const fn css(selector: &'static str) -> Self {
        By::Css(Cow::Borrowed(selector))
    }

    /// XPath expression
    pub const fn xpath(expr: &'static str) -> Self {
        By::XPath(Cow::Borrowed(expr))
    }

    /// Element id attribute
    pub const fn id(id: &'static str) -> Self {
        By::Id(Cow::Borrowed(id))
    }

    /// Exact anchor text
    pub const fn link_text(text: &'static str) -> Self {
        By::LinkText(Cow::Borrowed(text))
    }

    /// Strategy name used in log and error output
    pub fn strategy(&self) -> &'static str {
        match self {
            By::Css(_) => "css selector",
            By::XPath(_) => "xpath",
            By::Id(_) => "id",
            By::Name(_) => "name",
            By::ClassName(_) => "class name",
            By::TagName(_) => "tag name",
            By::LinkText(_) => "link text",
            By::PartialLinkText(_) => "partial link text",
        }
    }

    /// Raw selector string
    pub fn selector(&self) -> &str {
        match self {
            By::Css(s)
            | By::XPath(s)
            | By::Id(s)
            | By::Name(s)
            | By::ClassName(s)
            | By::TagName(s)
            | By::LinkText(s)
            | By::PartialLinkText(s) => s,
        }
    }

    /// Lower to a W3C WebDriver `(using, value)` pair.
    ///
    /// WebDriver dropped the id, name and class name strategies, so those are
    /// rewritten as CSS attribute selectors. A class name matches one
    /// whitespace-separated token of the `class` attribute.
    pub fn to_webdriver(&self) -> (&'static str, String) {
        match self {
            By::Css(s) => (CSS_SELECTOR, s.to_string()),
            By::XPath(s) => (XPATH, s.to_string()),
            By::Id(s) => (CSS_SELECTOR, format!("[id=\"{}\"]", escape_css_string(s))),
            By::Name(s) => (CSS_SELECTOR, format!("[name=\"{}\"]", escape_css_string(s))),
            By::ClassName(s) => (CSS_SELECTOR, format!("[class~=\"{}\"]", escape_css_string(s))),
            By::TagName(s) => (TAG_NAME, s.to_string()),
            By::LinkText(s) => (LINK_TEXT, s.to_string()),
            By::PartialLinkText(s) => (PARTIAL_LINK_TEXT, s.to_string()),
        }
    }
}

impl fmt::Display for By {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} `{}`", self.strategy(), self.selector())
    }
}

fn escape_css_string(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// A named locator declared by a page or region type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locator {
    by: By,
    name: Cow<'static, str>,
}

impl Locator {
    /// Declare a locator
    pub const fn new(name: &'static str, by: By) -> Self {
        Self {
            by,
            name: Cow::Borrowed(name),
        }
    }

    /// Named CSS locator
    pub const fn css(name: &'static str, selector: &'static str) -> Self {
        Self::new(name, By::css(selector))
    }

    /// Named XPath locator
    pub const fn xpath(name: &'static str, expr: &'static str) -> Self {
        Self::new(name, By::xpath(expr))
    }

    /// Build a locator at runtime, e.g. from test data
    pub fn dynamic(name: impl Into<String>, by: By) -> Self {
        Self {
            by,
            name: Cow::Owned(name.into()),
        }
    }

    pub fn by(&self) -> &By {
        &self.by
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.by)
    }
}
