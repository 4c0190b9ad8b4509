//! Fallback resolution for unqualified lookups of implicit-eligible types.

use std::sync::Arc;

use lodestone_api::{ComponentEntry, ComponentType, DynPublisher};

use crate::ranked::RankedSequence;

/// Consults the live publisher sequence for an implicit binding when an
/// unqualified lookup finds no explicit match. Shares the locator's publisher
/// registry and never touches the explicit cache.
#[derive(Clone)]
pub struct ImplicitBindings {
    publishers: Arc<RankedSequence<DynPublisher>>,
}

impl ImplicitBindings {
    pub(crate) fn new(publishers: Arc<RankedSequence<DynPublisher>>) -> Self {
        Self { publishers }
    }

    /// First implicit binding any current publisher can supply, highest
    /// ranked publisher first. Implicit entries rank below every explicit
    /// binding.
    pub fn get(&self, component_type: &ComponentType) -> Option<ComponentEntry> {
        for entry in &self.publishers.snapshot() {
            if let Some(binding) = entry.item().implicit_binding(component_type) {
                return Some(ComponentEntry::new(binding, i32::MIN));
            }
        }
        None
    }
}
