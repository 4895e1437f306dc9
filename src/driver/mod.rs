//! # Browser driver layer
//!
//! The consumed interface of a live browser automation session, plus two
//! implementations:
//! - `webdriver`: a W3C WebDriver client that attaches to an existing session
//! - `mock`: a scripted in-memory browser for tests
//!
//! The page layer never opens or closes a browser. It is handed a driver and
//! only issues lookups and element actions against it.

pub mod traits;
pub mod mock;
pub mod webdriver;

pub use traits::{Driver, ElementHandle};
pub use mock::{MockBrowser, MockNode, MockState};
pub use webdriver::WebDriverClient;
