//! The component model: what an appspace stores and hands out.
//!
//! # Design
//!
//! A [`Component`] is the resolved currency of the registry: a plain object,
//! a callable, or a nested appspace (branch). A [`ComponentSpec`] is the
//! *registration* form — the caller states up front whether a value is
//! eager, an import path to resolve on first access, or a branch include.
//! The lazy/eager decision is made by the variant, never by inspecting the
//! runtime type of the value.
//!
//! Clones are shallow (`Arc`); pointer identity is the notion of "same app"
//! used by resolve-once guarantees.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::application::services::Appspace;
use crate::domain::ImportPath;
use crate::error::AppspaceResult;

/// A type-erased registered object.
pub type Object = Arc<dyn Any + Send + Sync>;

/// A callable component. Arguments and result are type-erased objects;
/// the function reports its own failures.
pub type AppFn = Arc<dyn Fn(&[Object]) -> AppspaceResult<Object> + Send + Sync>;

// ── Component ────────────────────────────────────────────────────────────────

/// A resolved component held by a registry entry.
#[derive(Clone)]
pub enum Component {
    /// A plain value.
    Object(Object),
    /// A callable.
    Function(AppFn),
    /// A branch: a nested appspace. Branch labels always map to an
    /// [`Appspace`], never to a bare manager.
    Space(Appspace),
}

impl Component {
    /// Wrap a plain value.
    pub fn object<T: Any + Send + Sync>(value: T) -> Self {
        Self::Object(Arc::new(value))
    }

    /// Wrap a callable.
    pub fn function<F>(f: F) -> Self
    where
        F: Fn(&[Object]) -> AppspaceResult<Object> + Send + Sync + 'static,
    {
        Self::Function(Arc::new(f))
    }

    /// Wrap a nested appspace.
    pub fn space(space: Appspace) -> Self {
        Self::Space(space)
    }

    /// Downcast a plain value to a concrete type.
    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        match self {
            Self::Object(obj) => Arc::clone(obj).downcast::<T>().ok(),
            _ => None,
        }
    }

    pub fn as_space(&self) -> Option<&Appspace> {
        match self {
            Self::Space(space) => Some(space),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&AppFn> {
        match self {
            Self::Function(f) => Some(f),
            _ => None,
        }
    }

    /// The capability check behind call-or-value dispatch.
    pub fn is_callable(&self) -> bool {
        matches!(self, Self::Function(_))
    }

    /// Pointer identity: the same underlying allocation, not structural
    /// equality.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Object(a), Self::Object(b)) => Arc::ptr_eq(a, b),
            (Self::Function(a), Self::Function(b)) => Arc::ptr_eq(a, b),
            (Self::Space(a), Self::Space(b)) => a.shares_manager(b),
            _ => false,
        }
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Object(_) => f.write_str("Component::Object"),
            Self::Function(_) => f.write_str("Component::Function"),
            Self::Space(space) => write!(f, "Component::Space({:?})", space.root_label()),
        }
    }
}

// ── ComponentSpec ────────────────────────────────────────────────────────────

/// How a component is registered: eagerly, or as a lazy reference.
#[derive(Clone, Debug)]
pub enum ComponentSpec {
    /// An already-materialized component, stored as-is.
    Value(Component),
    /// A dotted path resolved through the resolver on first access.
    Import(ImportPath),
    /// A branch include: the path names a module whose exported
    /// configuration is a pre-built appspace.
    Include(ImportPath),
}

impl ComponentSpec {
    /// Eager registration of a plain value.
    pub fn value<T: Any + Send + Sync>(value: T) -> Self {
        Self::Value(Component::object(value))
    }

    /// Eager registration of a callable.
    pub fn function<F>(f: F) -> Self
    where
        F: Fn(&[Object]) -> AppspaceResult<Object> + Send + Sync + 'static,
    {
        Self::Value(Component::function(f))
    }

    /// Lazy registration by import path.
    pub fn import(path: &str) -> AppspaceResult<Self> {
        Ok(Self::Import(ImportPath::new(path)?))
    }

    /// Branch include by module path.
    pub fn include(path: &str) -> AppspaceResult<Self> {
        Ok(Self::Include(ImportPath::new(path)?))
    }
}

/// Configure a branch include — sugar for [`ComponentSpec::include`].
pub fn include(module: &str) -> AppspaceResult<ComponentSpec> {
    ComponentSpec::include(module)
}
