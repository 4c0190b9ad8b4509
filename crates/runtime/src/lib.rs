use std::sync::Arc;

use lodestone_api::DynPublisher;
use lodestone_core::{DefaultComponentLocator, MutableComponentLocator};

pub mod logging;
pub mod static_publisher;

pub use logging::init_logging;
pub use static_publisher::StaticBindingPublisher;

/// Rank for publishers that do not expose a ranking function.
pub const DEFAULT_RANK: i32 = 0;

/// Register a binding source with the locator at its self-declared maximum
/// rank.
///
/// This is the explicit counterpart of a container publishing itself on
/// construction: whoever builds a new binding source calls `publish` with it.
pub fn publish<L>(locator: &L, publisher: DynPublisher) -> bool
where
    L: MutableComponentLocator + ?Sized,
{
    let rank = publisher
        .ranking()
        .map(|ranking| ranking.max_rank())
        .unwrap_or(DEFAULT_RANK);
    tracing::debug!("Publishing {} at rank {}", publisher.name(), rank);
    locator.add(publisher, rank)
}

/// Bootstrap a locator over an initial set of binding sources.
pub fn build_locator(
    publishers: impl IntoIterator<Item = DynPublisher>,
) -> Arc<DefaultComponentLocator> {
    let locator = Arc::new(DefaultComponentLocator::new());
    for publisher in publishers {
        publish(locator.as_ref(), publisher);
    }
    locator
}
