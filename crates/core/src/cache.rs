//! Weak per-type cache keyed by a 64-bit composite type id.

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use lodestone_api::ComponentType;
use xxhash_rust::xxh3::xxh3_64;

use crate::bindings::RankedBindings;

/// Tuning knobs for [`DefaultComponentLocator`](crate::DefaultComponentLocator).
#[derive(Debug, Clone)]
pub struct LocatorConfig {
    /// Initial slot capacity of the per-type binding cache.
    pub cache_capacity: usize,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            cache_capacity: 256,
        }
    }
}

// Collisions need equal 64-bit composites for unequal types; past this many
// probes the entry goes to the overflow list instead.
const PROBE_LIMIT: usize = 8;

/// Composite id: 32-bit name hash over the 32-bit realm identity.
fn type_id(component_type: &ComponentType) -> u64 {
    let name_hash = xxh3_64(component_type.name().as_bytes()) as u32;
    (name_hash as u64) << 32 | component_type.realm() as u64
}

struct Slot {
    component_type: ComponentType,
    bindings: Weak<RankedBindings>,
}

impl Slot {
    fn new(component_type: ComponentType, bindings: &Arc<RankedBindings>) -> Self {
        Self {
            component_type,
            bindings: Arc::downgrade(bindings),
        }
    }
}

/// Mapping from composite type id to a weakly-held [`RankedBindings`].
///
/// Values stay alive exactly while some caller retains the view handed out by
/// `locate`; a lookup after the last handle dropped rebuilds from scratch.
/// Slots remember their type so a probe can compare types even after the
/// value is gone.
pub(crate) struct BindingCache {
    slots: HashMap<u64, Slot>,
    overflow: Vec<Slot>,
}

impl BindingCache {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: HashMap::with_capacity(capacity),
            overflow: Vec::new(),
        }
    }

    /// Fetch the live view for the type, probing +1 from the base id on
    /// collision.
    pub(crate) fn fetch(&self, component_type: &ComponentType) -> Option<Arc<RankedBindings>> {
        let mut id = type_id(component_type);
        for _ in 0..PROBE_LIMIT {
            match self.slots.get(&id) {
                None => return None,
                Some(slot) if slot.component_type == *component_type => {
                    return slot.bindings.upgrade();
                }
                Some(_) => id = id.wrapping_add(1), // collision
            }
        }
        self.overflow
            .iter()
            .find(|slot| slot.component_type == *component_type)
            .and_then(|slot| slot.bindings.upgrade())
    }

    /// Record the view under the first free (or reclaimed same-type) slot on
    /// the probe chain, falling back to the overflow list.
    pub(crate) fn insert(&mut self, component_type: ComponentType, bindings: &Arc<RankedBindings>) {
        let mut id = type_id(&component_type);
        for _ in 0..PROBE_LIMIT {
            match self.slots.get(&id) {
                Some(slot) if slot.component_type != component_type => {
                    id = id.wrapping_add(1);
                }
                _ => {
                    self.slots.insert(id, Slot::new(component_type, bindings));
                    return;
                }
            }
        }
        if let Some(slot) = self
            .overflow
            .iter_mut()
            .find(|slot| slot.component_type == component_type)
        {
            slot.bindings = Arc::downgrade(bindings);
        } else {
            self.overflow.push(Slot::new(component_type, bindings));
        }
    }

    /// Every view still referenced by some caller.
    pub(crate) fn live(&self) -> Vec<Arc<RankedBindings>> {
        self.slots
            .values()
            .chain(self.overflow.iter())
            .filter_map(|slot| slot.bindings.upgrade())
            .collect()
    }

    /// Best-effort sweep of slots whose view has been reclaimed.
    pub(crate) fn compact(&mut self) {
        self.slots
            .retain(|_, slot| slot.bindings.strong_count() > 0);
        self.overflow
            .retain(|slot| slot.bindings.strong_count() > 0);
    }
}
