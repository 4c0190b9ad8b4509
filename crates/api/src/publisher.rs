use std::sync::Arc;

use crate::binding::Binding;
use crate::model::ComponentType;
use crate::ranking::DynRanking;

/// Receives binding change events for one component type.
///
/// Implemented by the locator's watch machinery; called by publishers both
/// when replaying existing bindings on subscribe and when bindings appear or
/// disappear later.
pub trait BindingSubscriber: Send + Sync {
    /// The component type this subscriber is interested in.
    fn component_type(&self) -> &ComponentType;

    /// A binding of the subscribed type became available at the given rank.
    fn add(&self, binding: Binding, rank: i32);

    /// A previously delivered binding went away.
    fn remove(&self, binding: &Binding);
}

pub type DynSubscriber = Arc<dyn BindingSubscriber>;

/// One source of bindings (typically an injector adapter).
///
/// Publishers are deduplicated by object identity: register and remove with
/// clones of the same `Arc`. It uses capability discovery for the optional
/// hooks instead of fat interface inheritance.
pub trait BindingPublisher: Send + Sync {
    /// Human-readable label, used in logs and diagnostics.
    fn name(&self) -> &str;

    /// Enumerate this publisher's bindings for the given type, ordered by the
    /// publisher's internal rank. Returns an empty vec when it has none.
    fn bindings(&self, component_type: &ComponentType) -> Vec<Binding>;

    /// Resolve an implicit (unqualified fallback) binding for the type, if
    /// this publisher can construct one on demand.
    fn implicit_binding(&self, _component_type: &ComponentType) -> Option<Binding> {
        None
    }

    /// The ranking function governing this publisher's bindings, if it
    /// exposes one. Used to pick the registration rank at publish time.
    fn ranking(&self) -> Option<DynRanking> {
        None
    }

    /// Start notifying the subscriber about bindings of its type. Existing
    /// matching bindings are replayed immediately.
    fn subscribe(&self, subscriber: DynSubscriber);

    /// Stop notifying the subscriber. Must tolerate a subscriber that was
    /// never subscribed.
    fn unsubscribe(&self, subscriber: &DynSubscriber);
}

pub type DynPublisher = Arc<dyn BindingPublisher>;
