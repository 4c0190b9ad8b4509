use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::binding::Binding;

/// Runtime descriptor for a component type.
///
/// Types are identified by their qualified name plus the *realm* they were
/// loaded from; the same name published from two different realms denotes two
/// distinct types. The implicit-eligibility flag is metadata only and does not
/// participate in identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentType {
    name: SmolStr,
    realm: u32,
    implicit: bool,
}

impl ComponentType {
    /// Create a type descriptor in the default realm.
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self::in_realm(name, 0)
    }

    /// Create a type descriptor in a specific realm.
    pub fn in_realm(name: impl Into<SmolStr>, realm: u32) -> Self {
        Self {
            name: name.into(),
            realm,
            implicit: false,
        }
    }

    /// Mark the type as eligible for implicit (unqualified fallback)
    /// resolution. Opt-in: only the code constructing the descriptor knows
    /// whether the type can be resolved on demand.
    pub fn allow_implicit(mut self) -> Self {
        self.implicit = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn realm(&self) -> u32 {
        self.realm
    }

    pub fn is_implicit(&self) -> bool {
        self.implicit
    }
}

// Identity is (name, realm); the implicit flag is advisory.
impl PartialEq for ComponentType {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.realm == other.realm
    }
}

impl Eq for ComponentType {}

impl Hash for ComponentType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.realm.hash(state);
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.realm == 0 {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}@{}", self.name, self.realm)
        }
    }
}

/// Named qualifier attached to a binding or a lookup key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Qualifier(SmolStr);

impl Qualifier {
    pub fn named(name: impl Into<SmolStr>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Qualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lookup key: a component type plus an optional qualifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Key {
    component_type: ComponentType,
    qualifier: Option<Qualifier>,
}

impl Key {
    /// Unqualified key: matches every binding of the type.
    pub fn of(component_type: ComponentType) -> Self {
        Self {
            component_type,
            qualifier: None,
        }
    }

    /// Qualified key: matches only bindings carrying the same qualifier.
    pub fn qualified(component_type: ComponentType, qualifier: Qualifier) -> Self {
        Self {
            component_type,
            qualifier: Some(qualifier),
        }
    }

    pub fn component_type(&self) -> &ComponentType {
        &self.component_type
    }

    pub fn qualifier(&self) -> Option<&Qualifier> {
        self.qualifier.as_ref()
    }

    /// Whether a binding of this key's type satisfies the key.
    pub fn matches(&self, binding: &Binding) -> bool {
        match self.qualifier() {
            Some(qualifier) => binding.qualifier() == Some(qualifier),
            None => true,
        }
    }

    /// Whether the key may fall back to implicit resolution: no qualifier and
    /// a type that opted in.
    pub fn is_implicit(&self) -> bool {
        self.qualifier.is_none() && self.component_type.is_implicit()
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.qualifier {
            Some(qualifier) => write!(f, "{}:{}", self.component_type, qualifier),
            None => write!(f, "{}", self.component_type),
        }
    }
}
