//! In-process import-path table.
//!
//! The Rust stand-in for a dynamic language's import machinery: callers
//! register objects, functions, and exported appspace configurations under
//! dotted paths at bootstrap, and the registry engine resolves against the
//! table afterwards. Resolution is a plain map read — no caching beyond
//! what the engine itself memoizes.

use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use tracing::debug;

use appspace_core::{
    application::{ApplicationError, Component, ComponentSpec, Object, ports::Resolver},
    error::AppspaceResult,
    prelude::{Appspace, ImportPath, Label},
};

/// Thread-safe path → component table.
#[derive(Clone, Default)]
pub struct TableResolver {
    inner: Arc<RwLock<HashMap<String, Component>>>,
}

impl TableResolver {
    /// Create a new empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a component under a dotted path.
    pub fn insert(&self, path: &str, component: Component) -> AppspaceResult<()> {
        let path = ImportPath::new(path)?;
        let mut inner = self.inner.write().map_err(|_| ApplicationError::StoreLock)?;
        debug!(%path, "path registered");
        inner.insert(path.as_str().to_string(), component);
        Ok(())
    }

    /// Register a plain value.
    pub fn insert_object<T: std::any::Any + Send + Sync>(
        &self,
        path: &str,
        value: T,
    ) -> AppspaceResult<()> {
        self.insert(path, Component::object(value))
    }

    /// Register a callable.
    pub fn insert_fn<F>(&self, path: &str, f: F) -> AppspaceResult<()>
    where
        F: Fn(&[Object]) -> AppspaceResult<Object> + Send + Sync + 'static,
    {
        self.insert(path, Component::function(f))
    }

    /// Export a built appspace as a module's configuration attribute, the
    /// way branch includes expect to find it
    /// (`insert_conf("pkg.apps", "appconf", space)`).
    pub fn insert_conf(&self, module: &str, conf: &str, space: Appspace) -> AppspaceResult<()> {
        let module = ImportPath::new(module)?;
        let conf = Label::new(conf)?;
        self.insert(module.join(&conf).as_str(), Component::space(space))
    }

    /// Number of registered paths.
    pub fn len(&self) -> usize {
        self.inner.read().map(|inner| inner.len()).unwrap_or(0)
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clear all registrations.
    pub fn clear(&self) -> AppspaceResult<()> {
        let mut inner = self.inner.write().map_err(|_| ApplicationError::StoreLock)?;
        inner.clear();
        Ok(())
    }

    /// Erase the concrete type for handing to the engine.
    pub fn into_resolver(self) -> Arc<dyn Resolver> {
        Arc::new(self)
    }
}

impl Resolver for TableResolver {
    fn resolve(&self, path: &ImportPath) -> AppspaceResult<Component> {
        let inner = self.inner.read().map_err(|_| ApplicationError::StoreLock)?;
        inner.get(path.as_str()).cloned().ok_or_else(|| {
            ApplicationError::Resolution {
                path: path.to_string(),
                reason: "path not registered with the resolver".into(),
            }
            .into()
        })
    }

    fn resolve_attr(&self, module: &ImportPath, attr: &Label) -> AppspaceResult<Component> {
        self.resolve(&module.join(attr))
    }
}

/// Sugar bridging registration and `ComponentSpec` construction.
impl TableResolver {
    /// An import spec whose path this table can answer for — registers and
    /// returns the spec in one step.
    pub fn provide<T: std::any::Any + Send + Sync>(
        &self,
        path: &str,
        value: T,
    ) -> AppspaceResult<ComponentSpec> {
        self.insert_object(path, value)?;
        ComponentSpec::import(path)
    }
}
