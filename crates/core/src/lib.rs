//! Runtime component-location service
//!
//! Locates qualified components across a dynamic group of binding publishers,
//! with the following key properties:
//!
//! - **Ranked sources**: publishers are ordered by rank, stable on ties
//! - **Cached per-type views**: repeated lookups hit an `Arc`-shared view that
//!   stays consistent under concurrent publisher add/remove
//! - **Live watching**: registered watchers see binding changes without
//!   polling

pub mod bindings;
mod cache;
pub mod error;
pub mod implicits;
pub mod index;
pub mod locator;
pub mod ranked;
pub mod watching;

pub use bindings::RankedBindings;
pub use cache::LocatorConfig;
pub use error::{LocatorError, Result};
pub use implicits::ImplicitBindings;
pub use locator::{
    ComponentLocator, DefaultComponentLocator, LocatedComponents, MutableComponentLocator,
};
pub use ranked::{Ranked, RankedSequence, RankedSnapshot};
pub use watching::WatchedComponents;
