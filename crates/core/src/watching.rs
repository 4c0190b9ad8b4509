//! Live watch subscriptions.

use std::any::Any;
use std::sync::Weak;

use lodestone_api::{
    Binding, BindingSubscriber, ComponentEntry, ComponentType, DynMediator, Instance, Key,
};

/// One live subscription: a watched key, the mediator that applies events,
/// and the caller's opaque watcher identity.
///
/// Each call to `watch` produces its own `WatchedComponents`, even for equal
/// keys. The watcher is held weakly: once the caller drops it, events are
/// discarded and the subscription gets pruned from the registry.
pub struct WatchedComponents {
    key: Key,
    mediator: DynMediator,
    watcher: Weak<dyn Any + Send + Sync>,
}

impl WatchedComponents {
    pub(crate) fn new(key: Key, mediator: DynMediator, watcher: &Instance) -> Self {
        Self {
            key,
            mediator,
            watcher: std::sync::Arc::downgrade(watcher),
        }
    }

    pub fn key(&self) -> &Key {
        &self.key
    }

    /// Whether the watcher has been dropped by its owner.
    pub(crate) fn expired(&self) -> bool {
        self.watcher.strong_count() == 0
    }
}

impl BindingSubscriber for WatchedComponents {
    fn component_type(&self) -> &ComponentType {
        self.key.component_type()
    }

    fn add(&self, binding: Binding, rank: i32) {
        if !self.key.matches(&binding) {
            return;
        }
        let Some(watcher) = self.watcher.upgrade() else {
            return;
        };
        let entry = ComponentEntry::new(binding, rank);
        if let Err(err) = self.mediator.on_add(&entry, &watcher) {
            tracing::warn!("Watcher failed to apply added component for {}: {}", self.key, err);
        }
    }

    fn remove(&self, binding: &Binding) {
        if !self.key.matches(binding) {
            return;
        }
        let Some(watcher) = self.watcher.upgrade() else {
            return;
        };
        let entry = ComponentEntry::new(binding.clone(), 0);
        if let Err(err) = self.mediator.on_remove(&entry, &watcher) {
            tracing::warn!("Watcher failed to apply removed component for {}: {}", self.key, err);
        }
    }
}
