//! # Marketplace pages
//!
//! Page objects for the marketplace site. Every page carries the site header
//! through [`MarketplacePage`]; listings compose a [`Paginator`] and a
//! [`Sorter`] that reload the listing page they belong to.
//!
//! `mock` serves the same pages from the in-memory browser.

pub mod base;
pub mod header;
pub mod home;
pub mod login;
pub mod mock;
pub mod paginator;
pub mod sorter;
pub mod submissions;

#[cfg(test)]
mod tests;

pub use base::MarketplacePage;
pub use header::{AnonymousHeader, AuthenticatedHeader, HeaderRegion, HeaderState};
pub use home::Home;
pub use login::Login;
pub use mock::MockMarketplace;
pub use paginator::Paginator;
pub use sorter::Sorter;
pub use submissions::{MySubmissions, SubmittedApp};
