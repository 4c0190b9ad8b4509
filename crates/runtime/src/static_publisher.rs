//! In-memory binding source with live subscriber notification.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use lodestone_api::{
    Binding, BindingPublisher, ComponentType, DefaultRankingFunction, DynRanking, DynSubscriber,
};
use smol_str::SmolStr;

/// Binding source fed programmatically instead of by an injector.
///
/// Bindings are kept per type in ranking order. A new subscriber immediately
/// receives every existing binding of its type; later publishes and
/// retractions are pushed to all subscribers of the affected type. All
/// subscriber callbacks run outside the internal lock, so a mediator is free
/// to call back into the publisher or the locator.
pub struct StaticBindingPublisher {
    name: SmolStr,
    ranking: DynRanking,
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    bindings: HashMap<ComponentType, Vec<Binding>>,
    subscribers: Vec<DynSubscriber>,
}

impl StaticBindingPublisher {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self::with_ranking(name, Arc::new(DefaultRankingFunction::default()))
    }

    pub fn with_ranking(name: impl Into<SmolStr>, ranking: DynRanking) -> Self {
        Self {
            name: name.into(),
            ranking,
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Add a binding for the type and notify subscribers of that type.
    pub fn publish_binding(&self, component_type: ComponentType, binding: Binding) {
        let rank = self.ranking.rank(&binding);
        let subscribers = {
            let mut inner = self.inner.lock().expect("publisher lock poisoned");
            let slot = inner.bindings.entry(component_type.clone()).or_default();
            let at = slot.partition_point(|existing| self.ranking.rank(existing) >= rank);
            slot.insert(at, binding.clone());
            subscribers_of(&inner, &component_type)
        };
        for subscriber in subscribers {
            subscriber.add(binding.clone(), rank);
        }
    }

    /// Drop a binding (by identity) and notify subscribers of its type.
    pub fn retract_binding(&self, component_type: &ComponentType, binding: &Binding) {
        let subscribers = {
            let mut inner = self.inner.lock().expect("publisher lock poisoned");
            let Some(slot) = inner.bindings.get_mut(component_type) else {
                return;
            };
            let Some(at) = slot.iter().position(|existing| existing.same(binding)) else {
                return;
            };
            slot.remove(at);
            subscribers_of(&inner, component_type)
        };
        for subscriber in subscribers {
            subscriber.remove(binding);
        }
    }
}

fn subscribers_of(inner: &Inner, component_type: &ComponentType) -> Vec<DynSubscriber> {
    inner
        .subscribers
        .iter()
        .filter(|subscriber| subscriber.component_type() == component_type)
        .cloned()
        .collect()
}

impl BindingPublisher for StaticBindingPublisher {
    fn name(&self) -> &str {
        &self.name
    }

    fn bindings(&self, component_type: &ComponentType) -> Vec<Binding> {
        self.inner
            .lock()
            .expect("publisher lock poisoned")
            .bindings
            .get(component_type)
            .cloned()
            .unwrap_or_default()
    }

    fn ranking(&self) -> Option<DynRanking> {
        Some(self.ranking.clone())
    }

    fn subscribe(&self, subscriber: DynSubscriber) {
        let replay: Vec<(Binding, i32)> = {
            let mut inner = self.inner.lock().expect("publisher lock poisoned");
            inner.subscribers.push(subscriber.clone());
            inner
                .bindings
                .get(subscriber.component_type())
                .map(|slot| {
                    slot.iter()
                        .map(|binding| (binding.clone(), self.ranking.rank(binding)))
                        .collect()
                })
                .unwrap_or_default()
        };
        for (binding, rank) in replay {
            subscriber.add(binding, rank);
        }
    }

    fn unsubscribe(&self, subscriber: &DynSubscriber) {
        self.inner
            .lock()
            .expect("publisher lock poisoned")
            .subscribers
            .retain(|existing| !Arc::ptr_eq(existing, subscriber));
    }
}
