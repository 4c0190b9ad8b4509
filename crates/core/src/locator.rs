//! The default component locator.

use std::sync::{Arc, Mutex, RwLock};

use lodestone_api::{ComponentEntry, DynMediator, DynPublisher, DynSubscriber, Instance, Key};

use crate::bindings::{Contribution, RankedBindings};
use crate::cache::{BindingCache, LocatorConfig};
use crate::implicits::ImplicitBindings;
use crate::ranked::{RankedSequence, RankedSnapshot};
use crate::watching::WatchedComponents;

/// Read side of the locator: resolve and watch components.
pub trait ComponentLocator: Send + Sync {
    /// Locate components matching the key, best rank first. Returns a lazy,
    /// restartable view; an empty view when nothing matches.
    fn locate(&self, key: &Key) -> LocatedComponents;

    /// Watch the key for binding changes. The mediator receives add/remove
    /// events for matching bindings, keyed by the given watcher object; the
    /// watcher is retained weakly.
    fn watch(&self, key: Key, mediator: DynMediator, watcher: &Instance);
}

/// Write side: reconfigure the group of binding publishers at runtime.
pub trait MutableComponentLocator: ComponentLocator {
    /// Register a publisher at the given rank. Returns false without effect
    /// when that publisher is already registered.
    fn add(&self, publisher: DynPublisher, rank: i32) -> bool;

    /// Deregister a publisher. Returns false when it was never registered.
    fn remove(&self, publisher: &DynPublisher) -> bool;

    /// Immutable rank-ordered snapshot of the current publishers.
    fn publishers(&self) -> Vec<DynPublisher>;

    /// Remove every publisher one at a time, with full side effects.
    fn clear(&self);
}

/// Default [`MutableComponentLocator`] that locates qualified components
/// across a dynamic group of binding publishers.
///
/// Cache-hit lookups only take a read lock; `add`/`remove`/`watch` serialize
/// state mutation on a coarse mutex and update every live cached view before
/// returning. Subscription callbacks always run outside the locks against
/// defensive snapshots: a publisher is free to re-enter `watch` from inside
/// `subscribe` without deadlocking.
pub struct DefaultComponentLocator {
    publishers: Arc<RankedSequence<DynPublisher>>,
    cached: RwLock<BindingCache>,
    watched: Mutex<Vec<Arc<WatchedComponents>>>,
    implicits: ImplicitBindings,
    mutate: Mutex<()>,
}

impl DefaultComponentLocator {
    pub fn new() -> Self {
        Self::with_config(LocatorConfig::default())
    }

    pub fn with_config(config: LocatorConfig) -> Self {
        let publishers = Arc::new(RankedSequence::new());
        Self {
            implicits: ImplicitBindings::new(publishers.clone()),
            publishers,
            cached: RwLock::new(BindingCache::with_capacity(config.cache_capacity)),
            watched: Mutex::new(Vec::new()),
            mutate: Mutex::new(()),
        }
    }

    pub fn locate(&self, key: &Key) -> LocatedComponents {
        let component_type = key.component_type();
        // fetch with the read lock dropped again before the miss path asks
        // for the write lock
        let fetched = {
            self.cached
                .read()
                .expect("binding cache lock poisoned")
                .fetch(component_type)
        };
        let bindings = match fetched {
            Some(bindings) => bindings,
            None => {
                let mut cached = self.cached.write().expect("binding cache lock poisoned");
                // double-checked: another thread may have built the entry
                // while we waited for the write lock
                match cached.fetch(component_type) {
                    Some(bindings) => bindings,
                    None => {
                        tracing::trace!("Building bindings for {}", component_type);
                        let bindings = Arc::new(RankedBindings::new(
                            component_type.clone(),
                            &self.publishers.snapshot(),
                        ));
                        cached.insert(component_type.clone(), &bindings);
                        bindings
                    }
                }
            }
        };
        let implicits = key.is_implicit().then(|| self.implicits.clone());
        LocatedComponents {
            key: key.clone(),
            bindings,
            implicits,
        }
    }

    pub fn watch(&self, key: Key, mediator: DynMediator, watcher: &Instance) {
        let watched = Arc::new(WatchedComponents::new(key, mediator, watcher));
        let publishers = {
            let _guard = self.mutate.lock().expect("locator mutation lock poisoned");
            let mut registry = self.watched.lock().expect("watcher registry lock poisoned");
            registry.retain(|entry| !entry.expired());
            registry.push(watched.clone());
            self.publishers.snapshot()
        };
        // Covers every publisher present at watch time before returning;
        // publishers added later subscribe this entry themselves.
        for entry in &publishers {
            entry.item().subscribe(watched.clone());
        }
        // a remove() racing this loop has already run its unsubscriptions;
        // drop any subscription to a publisher that vanished mid-flight
        let current = self.publishers.snapshot();
        for entry in &publishers {
            if !current
                .iter()
                .any(|live| Arc::ptr_eq(live.item(), entry.item()))
            {
                entry
                    .item()
                    .unsubscribe(&(watched.clone() as DynSubscriber));
            }
        }
    }

    pub fn add(&self, publisher: DynPublisher, rank: i32) -> bool {
        let watchers = {
            let _guard = self.mutate.lock().expect("locator mutation lock poisoned");
            if self
                .publishers
                .contains_where(|p| Arc::ptr_eq(p, &publisher))
            {
                return false;
            }
            tracing::debug!("Add publisher: {} (rank {})", publisher.name(), rank);
            {
                // block new lookups while the registry and the cached views
                // change together
                let cached = self.cached.write().expect("binding cache lock poisoned");
                self.publishers.insert(publisher.clone(), rank);
                for bindings in cached.live() {
                    bindings.add(&publisher, rank);
                }
            }
            self.watcher_snapshot()
        };
        // Defensive copy: subscribe may re-enter watch() on this locator.
        for watched in &watchers {
            publisher.subscribe(watched.clone());
        }
        // a remove() racing this loop has already run its unsubscriptions;
        // back out if the publisher vanished mid-flight
        if !self
            .publishers
            .contains_where(|p| Arc::ptr_eq(p, &publisher))
        {
            for watched in &watchers {
                publisher.unsubscribe(watched);
            }
        }
        true
    }

    pub fn remove(&self, publisher: &DynPublisher) -> bool {
        let (removed, watchers) = {
            let _guard = self.mutate.lock().expect("locator mutation lock poisoned");
            let removed = {
                let cached = self.cached.write().expect("binding cache lock poisoned");
                let Some(removed) = self
                    .publishers
                    .remove_where(|p| Arc::ptr_eq(p, publisher))
                else {
                    return false;
                };
                for bindings in cached.live() {
                    bindings.remove(&removed);
                }
                removed
            };
            tracing::debug!("Remove publisher: {}", removed.name());
            (removed, self.watcher_snapshot())
        };
        for watched in watchers {
            removed.unsubscribe(&watched);
        }
        // one last round of cleanup in case more was freed
        self.cached
            .write()
            .expect("binding cache lock poisoned")
            .compact();
        true
    }

    pub fn publishers(&self) -> Vec<DynPublisher> {
        self.publishers
            .snapshot()
            .iter()
            .map(|entry| entry.item().clone())
            .collect()
    }

    pub fn clear(&self) {
        // remove() applies the full side effects per publisher
        for publisher in self.publishers() {
            self.remove(&publisher);
        }
    }

    fn watcher_snapshot(&self) -> Vec<DynSubscriber> {
        let mut registry = self.watched.lock().expect("watcher registry lock poisoned");
        registry.retain(|entry| !entry.expired());
        registry
            .iter()
            .map(|entry| entry.clone() as DynSubscriber)
            .collect()
    }
}

impl Default for DefaultComponentLocator {
    fn default() -> Self {
        Self::new()
    }
}

impl ComponentLocator for DefaultComponentLocator {
    fn locate(&self, key: &Key) -> LocatedComponents {
        self.locate(key)
    }

    fn watch(&self, key: Key, mediator: DynMediator, watcher: &Instance) {
        self.watch(key, mediator, watcher)
    }
}

impl MutableComponentLocator for DefaultComponentLocator {
    fn add(&self, publisher: DynPublisher, rank: i32) -> bool {
        self.add(publisher, rank)
    }

    fn remove(&self, publisher: &DynPublisher) -> bool {
        self.remove(publisher)
    }

    fn publishers(&self) -> Vec<DynPublisher> {
        self.publishers()
    }

    fn clear(&self) {
        self.clear()
    }
}

/// Lazy, restartable view over the components matching a key.
///
/// The view shares the cached [`RankedBindings`] for its type, so it follows
/// publisher add/remove without being re-fetched. Each [`iter`] call observes
/// the bindings as of that call.
///
/// [`iter`]: LocatedComponents::iter
pub struct LocatedComponents {
    key: Key,
    bindings: Arc<RankedBindings>,
    implicits: Option<ImplicitBindings>,
}

impl LocatedComponents {
    pub fn key(&self) -> &Key {
        &self.key
    }

    /// Iterate matching components, best rank first.
    pub fn iter(&self) -> Components<'_> {
        Components {
            key: &self.key,
            contributions: self.bindings.snapshot(),
            outer: 0,
            inner: 0,
            matched: false,
            fallback_done: false,
            implicits: self.implicits.as_ref(),
        }
    }

    pub fn first(&self) -> Option<ComponentEntry> {
        self.iter().next()
    }

    pub fn is_empty(&self) -> bool {
        self.first().is_none()
    }
}

impl<'a> IntoIterator for &'a LocatedComponents {
    type Item = ComponentEntry;
    type IntoIter = Components<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over located components; yields the implicit fallback only when
/// no explicit binding matched.
pub struct Components<'a> {
    key: &'a Key,
    contributions: RankedSnapshot<Contribution>,
    outer: usize,
    inner: usize,
    matched: bool,
    fallback_done: bool,
    implicits: Option<&'a ImplicitBindings>,
}

impl Components<'_> {
    fn next_explicit(&mut self) -> Option<ComponentEntry> {
        while let Some(ranked) = self.contributions.get(self.outer) {
            let bindings = ranked.item().bindings();
            while let Some(binding) = bindings.get(self.inner) {
                self.inner += 1;
                if self.key.matches(binding) {
                    return Some(ComponentEntry::new(binding.clone(), ranked.rank()));
                }
            }
            self.outer += 1;
            self.inner = 0;
        }
        None
    }
}

impl Iterator for Components<'_> {
    type Item = ComponentEntry;

    fn next(&mut self) -> Option<ComponentEntry> {
        if let Some(entry) = self.next_explicit() {
            self.matched = true;
            return Some(entry);
        }
        if self.matched || self.fallback_done {
            return None;
        }
        self.fallback_done = true;
        self.implicits
            .and_then(|implicits| implicits.get(self.key.component_type()))
    }
}
