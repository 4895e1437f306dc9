//! # Session layer
//!
//! Binds page objects to one live browser session.
//!
//! ## Module structure
//! - `context`: [`SessionContext`], the shared driver handle plus base URL
//! - `wait`: bounded polling and the navigation transition policy
//!
//! ## Example
//! ```rust,no_run
//! use marketplace_pages::marketplace::Home;
//! use marketplace_pages::session::SessionContext;
//! use marketplace_pages::driver::WebDriverClient;
//! use std::sync::Arc;
//!
//! # async fn example() -> marketplace_pages::Result<()> {
//! let driver = Arc::new(WebDriverClient::attach("http://localhost:4444", "abc123")?);
//! let ctx = SessionContext::new(driver, "https://marketplace-dev.allizom.org/")?;
//!
//! let home: Home = ctx.open().await?;
//! # Ok(())
//! # }
//! ```

pub mod context;
pub mod wait;


pub use context::{SessionContext, SessionContextBuilder};
pub use wait::{TransitionPolicy, WaitPolicy};
