#![allow(dead_code)] // not every suite exercises every helper

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use lodestone_api::{
    ApiResult, Binding, BindingPublisher, ComponentEntry, ComponentType, DynPublisher,
    DynSubscriber, Instance, Mediator, Qualifier,
};

/// Scripted in-memory publisher with instrumented queries and subscriptions.
pub struct TestPublisher {
    name: &'static str,
    served: Mutex<Vec<(ComponentType, Binding)>>,
    implicit: Mutex<Vec<(ComponentType, Binding)>>,
    queries: AtomicUsize,
    subscribers: Mutex<Vec<DynSubscriber>>,
}

impl TestPublisher {
    pub fn new(name: &'static str) -> Arc<Self> {
        Arc::new(Self {
            name,
            served: Mutex::new(Vec::new()),
            implicit: Mutex::new(Vec::new()),
            queries: AtomicUsize::new(0),
            subscribers: Mutex::new(Vec::new()),
        })
    }

    pub fn serve(&self, component_type: &ComponentType, binding: Binding) -> &Self {
        self.served
            .lock()
            .expect("served lock poisoned")
            .push((component_type.clone(), binding));
        self
    }

    pub fn serve_implicit(&self, component_type: &ComponentType, binding: Binding) -> &Self {
        self.implicit
            .lock()
            .expect("implicit lock poisoned")
            .push((component_type.clone(), binding));
        self
    }

    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .lock()
            .expect("subscribers lock poisoned")
            .len()
    }
}

impl BindingPublisher for TestPublisher {
    fn name(&self) -> &str {
        self.name
    }

    fn bindings(&self, component_type: &ComponentType) -> Vec<Binding> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.served
            .lock()
            .expect("served lock poisoned")
            .iter()
            .filter(|(ty, _)| ty == component_type)
            .map(|(_, binding)| binding.clone())
            .collect()
    }

    fn implicit_binding(&self, component_type: &ComponentType) -> Option<Binding> {
        self.implicit
            .lock()
            .expect("implicit lock poisoned")
            .iter()
            .find(|(ty, _)| ty == component_type)
            .map(|(_, binding)| binding.clone())
    }

    fn subscribe(&self, subscriber: DynSubscriber) {
        self.subscribers
            .lock()
            .expect("subscribers lock poisoned")
            .push(subscriber);
    }

    fn unsubscribe(&self, subscriber: &DynSubscriber) {
        self.subscribers
            .lock()
            .expect("subscribers lock poisoned")
            .retain(|existing| !Arc::ptr_eq(existing, subscriber));
    }
}

pub fn as_publisher(publisher: &Arc<TestPublisher>) -> DynPublisher {
    publisher.clone()
}

/// Binding whose provided instance is a static label, for easy assertions.
pub fn labeled(qualifier: Option<&str>, label: &'static str) -> Binding {
    Binding::new(qualifier.map(Qualifier::named), "test", move || {
        Arc::new(label) as Instance
    })
}

pub fn label_of(entry: &ComponentEntry) -> &'static str {
    *entry
        .value()
        .downcast::<&'static str>()
        .expect("test bindings provide labels")
}

/// Mediator recording delivered events as (event, label) pairs.
#[derive(Default)]
pub struct RecordingMediator {
    pub events: Mutex<Vec<(&'static str, &'static str)>>,
}

impl RecordingMediator {
    pub fn events(&self) -> Vec<(&'static str, &'static str)> {
        self.events.lock().expect("events lock poisoned").clone()
    }
}

impl Mediator for RecordingMediator {
    fn on_add(&self, entry: &ComponentEntry, _watcher: &Instance) -> ApiResult<()> {
        self.events
            .lock()
            .expect("events lock poisoned")
            .push(("add", label_of(entry)));
        Ok(())
    }

    fn on_remove(&self, entry: &ComponentEntry, _watcher: &Instance) -> ApiResult<()> {
        self.events
            .lock()
            .expect("events lock poisoned")
            .push(("remove", label_of(entry)));
        Ok(())
    }
}
