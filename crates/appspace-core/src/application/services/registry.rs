//! The namespaced label → entry store underneath every manager.

use std::collections::HashMap;
use std::sync::RwLock;

use uuid::Uuid;

use crate::application::component::Component;
use crate::application::error::ApplicationError;
use crate::application::services::manager::LazyApp;
use crate::domain::{DomainError, Label, Namespace};
use crate::error::AppspaceResult;

/// What a registry slot holds: a placeholder awaiting first access, or a
/// materialized component.
#[derive(Clone, Debug)]
pub enum Entry {
    Lazy(LazyApp),
    Ready(Component),
}

/// A namespaced key → entry store.
///
/// A registry is created bound to exactly one namespace and one root label;
/// entries registered under other namespaces stay isolated from it. Two
/// registries never share state even when their namespaces are textually
/// identical — each instance mints its own [`Uuid`].
#[derive(Debug)]
pub struct Registry {
    id: Uuid,
    root: Option<Label>,
    namespace: Namespace,
    entries: RwLock<HashMap<Namespace, HashMap<Label, Entry>>>,
}

impl Registry {
    /// Create a registry bound to `namespace`, rooted at `root`.
    ///
    /// `root` is the label the owning appspace registers itself under so
    /// branches can find their owning manager; an anonymous registry
    /// (`None`) skips self-identification.
    pub fn new(root: Option<Label>, namespace: Namespace) -> Self {
        Self {
            id: Uuid::new_v4(),
            root,
            namespace,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Unique instance id. Distinguishes registries with identical
    /// namespace names.
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn root(&self) -> Option<&Label> {
        self.root.as_ref()
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// Insert or overwrite the entry at `label` within `namespace`.
    pub fn register(
        &self,
        label: Label,
        namespace: &Namespace,
        entry: Entry,
    ) -> AppspaceResult<()> {
        let mut entries = self.entries.write().map_err(|_| ApplicationError::StoreLock)?;
        entries.entry(namespace.clone()).or_default().insert(label, entry);
        Ok(())
    }

    /// Fetch the entry at `label` within `namespace`.
    ///
    /// Absence is an error, never a sentinel.
    pub fn lookup(&self, label: &Label, namespace: &Namespace) -> AppspaceResult<Entry> {
        let entries = self.entries.read().map_err(|_| ApplicationError::StoreLock)?;
        entries
            .get(namespace)
            .and_then(|slots| slots.get(label))
            .cloned()
            .ok_or_else(|| {
                DomainError::AppLookup {
                    label: label.to_string(),
                    namespace: namespace.to_string(),
                }
                .into()
            })
    }

    /// Remove the entry at `label`. Off the common path; normal flows never
    /// delete.
    pub fn unregister(&self, label: &Label, namespace: &Namespace) -> AppspaceResult<()> {
        let mut entries = self.entries.write().map_err(|_| ApplicationError::StoreLock)?;
        let removed = entries
            .get_mut(namespace)
            .and_then(|slots| slots.remove(label));
        match removed {
            Some(_) => Ok(()),
            None => Err(DomainError::AppLookup {
                label: label.to_string(),
                namespace: namespace.to_string(),
            }
            .into()),
        }
    }

    /// Membership within the registry's own namespace, lazy or ready.
    pub fn contains(&self, label: &Label) -> bool {
        self.entries
            .read()
            .map(|entries| {
                entries
                    .get(&self.namespace)
                    .is_some_and(|slots| slots.contains_key(label))
            })
            .unwrap_or(false)
    }

    /// Labels registered in the registry's own namespace.
    pub fn labels(&self) -> Vec<Label> {
        self.entries
            .read()
            .map(|entries| {
                entries
                    .get(&self.namespace)
                    .map(|slots| slots.keys().cloned().collect())
                    .unwrap_or_default()
            })
            .unwrap_or_default()
    }
}
