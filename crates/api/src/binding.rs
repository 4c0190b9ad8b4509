use std::any::Any;
use std::fmt;
use std::sync::Arc;

use smol_str::SmolStr;

use crate::model::Qualifier;

/// Opaque component instance handed back to callers.
pub type Instance = Arc<dyn Any + Send + Sync>;

/// Association between an optional qualifier and a component provider.
///
/// Bindings are cheap to clone (shared inner) and compared by identity via
/// [`Binding::same`]. Instance caching is the provider's concern: a singleton
/// provider returns the same `Arc` every call, a transient one builds fresh.
#[derive(Clone)]
pub struct Binding {
    inner: Arc<BindingInner>,
}

struct BindingInner {
    qualifier: Option<Qualifier>,
    source: SmolStr,
    provider: Box<dyn Fn() -> Instance + Send + Sync>,
}

impl Binding {
    pub fn new(
        qualifier: Option<Qualifier>,
        source: impl Into<SmolStr>,
        provider: impl Fn() -> Instance + Send + Sync + 'static,
    ) -> Self {
        Self {
            inner: Arc::new(BindingInner {
                qualifier,
                source: source.into(),
                provider: Box::new(provider),
            }),
        }
    }

    pub fn qualifier(&self) -> Option<&Qualifier> {
        self.inner.qualifier.as_ref()
    }

    /// Label of the publisher or site this binding came from.
    pub fn source(&self) -> &str {
        &self.inner.source
    }

    /// Resolve the bound instance through the provider.
    pub fn provide(&self) -> Instance {
        (self.inner.provider)()
    }

    /// Identity comparison: two handles to the same underlying binding.
    pub fn same(&self, other: &Binding) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("qualifier", &self.inner.qualifier)
            .field("source", &self.inner.source)
            .field("provider", &"<fn>")
            .finish()
    }
}

/// One located component: a binding plus the rank it resolved at.
#[derive(Debug, Clone)]
pub struct ComponentEntry {
    binding: Binding,
    rank: i32,
}

impl ComponentEntry {
    pub fn new(binding: Binding, rank: i32) -> Self {
        Self { binding, rank }
    }

    pub fn binding(&self) -> &Binding {
        &self.binding
    }

    pub fn rank(&self) -> i32 {
        self.rank
    }

    pub fn qualifier(&self) -> Option<&Qualifier> {
        self.binding.qualifier()
    }

    /// Resolve the component instance.
    pub fn value(&self) -> Instance {
        self.binding.provide()
    }
}
