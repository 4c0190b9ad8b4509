use std::sync::Arc;

use crate::binding::{ComponentEntry, Instance};
use crate::error::ApiResult;

/// Callback contract between the watch machinery and a caller's watcher.
///
/// Invoked when a binding matching the watched key appears or disappears.
/// The `watcher` argument is the opaque object the caller registered; the
/// mediator downcasts it and applies the event. Errors are contained by the
/// caller of the mediator (logged, never propagated into the publisher).
pub trait Mediator: Send + Sync {
    fn on_add(&self, entry: &ComponentEntry, watcher: &Instance) -> ApiResult<()>;

    fn on_remove(&self, entry: &ComponentEntry, watcher: &Instance) -> ApiResult<()>;
}

pub type DynMediator = Arc<dyn Mediator>;
