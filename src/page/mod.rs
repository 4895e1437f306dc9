//! # Page and region layer
//!
//! - [`Page`]: a page object bound to a [`SessionContext`](crate::session::SessionContext)
//! - [`Region`]: a reusable fragment of a page, optionally rooted at an element
//! - [`RepeatedRegion`]: regions read from a DOM collection, in document order
//!
//! Pages hold regions by composition: an accessor builds a fresh region from
//! the page's context on every call. Navigation transitions go through
//! [`SessionContext::transition`](crate::session::SessionContext::transition),
//! which returns the statically requested destination type and, under the
//! default policy, checks that its marker is displayed.

pub mod repeated;
pub mod traits;


pub use repeated::RepeatedRegion;
pub use traits::{Page, Region};
