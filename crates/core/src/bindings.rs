//! Per-type cached view over every publisher's bindings.

use std::sync::Arc;

use lodestone_api::{Binding, ComponentType, DynPublisher};

use crate::ranked::{RankedSequence, RankedSnapshot};

/// One publisher's bindings for a type, kept in the publisher's internal
/// order. Empty contributions are kept too, so the view mirrors the publisher
/// registry entry for entry.
#[derive(Clone)]
pub(crate) struct Contribution {
    publisher: DynPublisher,
    bindings: Arc<[Binding]>,
}

impl Contribution {
    pub(crate) fn bindings(&self) -> &[Binding] {
        &self.bindings
    }
}

/// Bindings of one component type aggregated across all current publishers,
/// in rank order.
///
/// The locator caches these views and updates them synchronously whenever a
/// publisher is added or removed; iteration goes through an immutable
/// snapshot, so readers are never disturbed by a concurrent update.
pub struct RankedBindings {
    component_type: ComponentType,
    contributions: RankedSequence<Contribution>,
}

impl RankedBindings {
    /// Build the view by querying each publisher in the snapshot for its
    /// bindings of the type.
    pub(crate) fn new(
        component_type: ComponentType,
        publishers: &RankedSnapshot<DynPublisher>,
    ) -> Self {
        let contributions = RankedSequence::new();
        for entry in publishers {
            let bindings = entry.item().bindings(&component_type);
            contributions.insert(
                Contribution {
                    publisher: entry.item().clone(),
                    bindings: bindings.into(),
                },
                entry.rank(),
            );
        }
        Self {
            component_type,
            contributions,
        }
    }

    /// Splice in a newly registered publisher's contribution at its rank
    /// position, leaving the others untouched.
    pub(crate) fn add(&self, publisher: &DynPublisher, rank: i32) {
        let bindings = publisher.bindings(&self.component_type);
        self.contributions.insert(
            Contribution {
                publisher: publisher.clone(),
                bindings: bindings.into(),
            },
            rank,
        );
    }

    /// Excise exactly the given publisher's contribution.
    pub(crate) fn remove(&self, publisher: &DynPublisher) {
        self.contributions
            .remove_where(|c| Arc::ptr_eq(&c.publisher, publisher));
    }

    /// The type this view was built for; checked during cache probing.
    pub fn component_type(&self) -> &ComponentType {
        &self.component_type
    }

    pub(crate) fn snapshot(&self) -> RankedSnapshot<Contribution> {
        self.contributions.snapshot()
    }
}
