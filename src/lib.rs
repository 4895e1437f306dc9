//! Marketplace Pages: page objects for browser-driven Marketplace UI tests
//!
//! Pages and regions expose semantic operations over a live browser session.
//! Elements are resolved lazily on every call and navigation actions return
//! the destination page object.

pub mod error;
pub mod config;
pub mod telemetry;

pub mod driver;
pub mod locator;
pub mod session;
pub mod resolver;
pub mod page;
pub mod fixture;
pub mod marketplace;

// Re-exports
pub use crate::config::{Config, UserCredentials};
pub use error::{Error, Result};
pub use locator::{By, Locator};
pub use page::{Page, Region, RepeatedRegion};
pub use resolver::{Element, Resolver};
pub use session::{SessionContext, TransitionPolicy, WaitPolicy};

/// Marketplace Pages library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
