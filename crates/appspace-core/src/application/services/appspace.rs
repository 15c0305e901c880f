//! Appspace - the consumer-facing facade over a manager.
//!
//! # Design
//!
//! The facade adds three things over raw manager access:
//!
//! - error translation: the registry's lookup failure becomes the public
//!   "no application found" signal carrying the label;
//! - call-or-value dispatch: one entry point serves plain values and
//!   callables uniformly, with callability decided by an explicit check,
//!   never by catching invocation errors;
//! - a per-instance lookup memo. The memo is never invalidated implicitly:
//!   once a label has been read through a facade, overwriting the entry in
//!   the manager does NOT change what this facade returns for that label.
//!   Callers that re-register after first read must call
//!   [`Appspace::invalidate`] (or [`Appspace::clear_cache`]) themselves.
//!   Facade clones share the memo.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use crate::application::component::{Component, Object};
use crate::application::error::ApplicationError;
use crate::application::services::manager::Manager;
use crate::domain::{DomainError, Label, LabelPath};
use crate::error::{AppspaceError, AppspaceResult};

/// Dict-like, callable access to a manager's components.
#[derive(Clone)]
pub struct Appspace {
    manager: Arc<Manager>,
    cache: Arc<RwLock<HashMap<Label, Component>>>,
}

impl Appspace {
    pub fn new(manager: Arc<Manager>) -> Self {
        Self {
            manager,
            cache: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn manager(&self) -> &Arc<Manager> {
        &self.manager
    }

    /// The root label this appspace identifies itself by, if any.
    pub fn root_label(&self) -> Option<&Label> {
        self.manager.root()
    }

    /// Whether two facades expose the same underlying manager.
    pub fn shares_manager(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.manager, &other.manager)
    }

    // ── lookup ─────────────────────────────────────────────────────────────

    /// Fetch the component at `label`.
    ///
    /// Lookup failures come back as the public `NoApp` signal; resolution
    /// failures propagate untouched.
    pub fn get(&self, label: &str) -> AppspaceResult<Component> {
        let label = Label::new(label)?;
        if let Some(component) = self.cached(&label) {
            return Ok(component);
        }
        let component = self.manager.get(&label).map_err(|err| match err {
            AppspaceError::Domain(DomainError::AppLookup { label, .. }) => {
                AppspaceError::Domain(DomainError::NoApp { label })
            }
            other => other,
        })?;
        self.remember(label, component.clone());
        Ok(component)
    }

    /// Call-or-value dispatch.
    ///
    /// A callable component is invoked with `args` and its own failures
    /// propagate; anything else is returned unchanged, so the same entry
    /// point serves values and factories uniformly.
    pub fn call(&self, label: &str, args: &[Object]) -> AppspaceResult<Component> {
        let component = self.get(label)?;
        match &component {
            Component::Function(f) => {
                let result = f(args).map_err(|err| ApplicationError::CallFailed {
                    label: label.to_string(),
                    reason: err.to_string(),
                })?;
                Ok(Component::Object(result))
            }
            _ => Ok(component),
        }
    }

    /// Shallow membership: only this appspace's own manager, lazy or
    /// resolved entries alike. Branch contents are never consulted.
    pub fn contains(&self, label: &str) -> bool {
        Label::new(label)
            .map(|label| self.manager.contains(&label))
            .unwrap_or(false)
    }

    /// Typed branch access: the label must hold a nested appspace.
    pub fn branch(&self, label: &str) -> AppspaceResult<Appspace> {
        match self.get(label)? {
            Component::Space(space) => Ok(space),
            _ => Err(ApplicationError::NotAnAppspace { target: label.to_string() }.into()),
        }
    }

    /// Descend a dotted path through nested branches.
    ///
    /// A literal flat key wins over traversal, so namespace-flattened
    /// labels (`"outer.inner"`) stay reachable.
    pub fn traverse(&self, path: &LabelPath) -> AppspaceResult<Component> {
        let flat = path.to_string();
        if self.contains(&flat) {
            return self.get(&flat);
        }
        let head = self.get(path.first().as_str())?;
        match path.rest() {
            None => Ok(head),
            Some(rest) => match head {
                Component::Space(space) => space.traverse(&rest),
                _ => Err(ApplicationError::NotAnAppspace {
                    target: path.first().to_string(),
                }
                .into()),
            },
        }
    }

    // ── memo ───────────────────────────────────────────────────────────────

    /// Drop the memoized component for one label.
    pub fn invalidate(&self, label: &str) {
        if let Ok(label) = Label::new(label) {
            if let Ok(mut cache) = self.cache.write() {
                cache.remove(&label);
            }
        }
    }

    /// Drop every memoized component.
    pub fn clear_cache(&self) {
        if let Ok(mut cache) = self.cache.write() {
            cache.clear();
        }
    }

    fn cached(&self, label: &Label) -> Option<Component> {
        self.cache.read().ok()?.get(label).cloned()
    }

    fn remember(&self, label: Label, component: Component) {
        if let Ok(mut cache) = self.cache.write() {
            cache.insert(label, component);
        }
    }
}

impl fmt::Debug for Appspace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Appspace({:?})", self.manager)
    }
}
