#![allow(dead_code)] // not every suite exercises every helper

use std::sync::{Arc, Mutex};

use lodestone_api::{
    ApiError, ApiResult, Binding, ComponentEntry, Instance, Mediator, Qualifier,
};

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
    events: Mutex<Vec<(&'static str, &'static str)>>,
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

/// Mediator that rejects every add but records the attempts.
#[derive(Default)]
pub struct RejectingMediator {
    attempts: Mutex<Vec<&'static str>>,
}

impl RejectingMediator {
    pub fn attempts(&self) -> Vec<&'static str> {
        self.attempts.lock().expect("attempts lock poisoned").clone()
    }
}

impl Mediator for RejectingMediator {
    fn on_add(&self, entry: &ComponentEntry, _watcher: &Instance) -> ApiResult<()> {
        self.attempts
            .lock()
            .expect("attempts lock poisoned")
            .push(label_of(entry));
        Err(ApiError::Rejected("not today".into()))
    }

    fn on_remove(&self, _entry: &ComponentEntry, _watcher: &Instance) -> ApiResult<()> {
        Ok(())
    }
}
