//! Manager - the resolving registry.
//!
//! A [`Manager`] owns a [`Registry`] and turns lazy placeholders into
//! concrete components on first access. Resolution goes through the
//! [`Resolver`] port; a resolved component replaces its placeholder in
//! place, so every label resolves at most once.

use std::fmt;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, instrument};

use crate::application::component::{Component, ComponentSpec, Object};
use crate::application::error::ApplicationError;
use crate::application::ports::{EventBus, Listener, NullEventBus, Resolver};
use crate::application::services::registry::{Entry, Registry};
use crate::domain::{ImportPath, Label, Namespace, Settings};
use crate::error::AppspaceResult;

/// Default exported-configuration attribute for branch includes.
const CONF_LABEL: &str = "appconf";
/// Historical fallback attribute, tried when the primary is absent.
const CONF_FALLBACK: &str = "apps";

// ── LazyApp ──────────────────────────────────────────────────────────────────

/// What a lazy placeholder points at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LazyPath {
    /// A dotted path to a single object.
    Import(ImportPath),
    /// A module whose exported configuration is a pre-built appspace.
    Include(ImportPath),
}

impl LazyPath {
    pub fn path(&self) -> &ImportPath {
        match self {
            Self::Import(path) | Self::Include(path) => path,
        }
    }
}

/// A placeholder stored in place of a real component until first access.
///
/// Immutable once constructed; consumed at most once per label, after which
/// the registry entry is replaced by the resolved component.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LazyApp {
    path: LazyPath,
}

impl LazyApp {
    pub fn import(path: ImportPath) -> Self {
        Self { path: LazyPath::Import(path) }
    }

    pub fn include(path: ImportPath) -> Self {
        Self { path: LazyPath::Include(path) }
    }

    pub fn path(&self) -> &LazyPath {
        &self.path
    }
}

impl fmt::Display for LazyApp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "app@{}", self.path.path())
    }
}

// ── Manager ──────────────────────────────────────────────────────────────────

/// The resolving registry behind every appspace.
pub struct Manager {
    registry: Registry,
    resolver: Arc<dyn Resolver>,
    events: Arc<dyn EventBus>,
    settings: RwLock<Settings>,
    conf_label: Label,
}

impl Manager {
    /// Create a manager rooted at `root` within `namespace`.
    pub fn new(root: Option<Label>, namespace: Namespace, resolver: Arc<dyn Resolver>) -> Self {
        Self {
            registry: Registry::new(root, namespace),
            resolver,
            events: Arc::new(NullEventBus),
            settings: RwLock::new(Settings::new()),
            // CONF_LABEL is a non-empty literal, parsing cannot fail
            conf_label: Label::new(CONF_LABEL).unwrap_or_else(|_| unreachable!()),
        }
    }

    /// Replace the event bus (builder style).
    pub fn with_event_bus(mut self, events: Arc<dyn EventBus>) -> Self {
        self.events = events;
        self
    }

    /// Override the exported-configuration attribute used for includes.
    pub fn with_conf_label(mut self, conf_label: Label) -> Self {
        self.conf_label = conf_label;
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn namespace(&self) -> &Namespace {
        self.registry.namespace()
    }

    pub fn root(&self) -> Option<&Label> {
        self.registry.root()
    }

    pub fn conf_label(&self) -> &Label {
        &self.conf_label
    }

    // ── component access ───────────────────────────────────────────────────

    /// Fetch the component at `label`, resolving a lazy placeholder on the
    /// way.
    ///
    /// An absent label propagates the lookup failure untouched; translation
    /// into the public "no application" signal happens at the facade.
    pub fn get(&self, label: &Label) -> AppspaceResult<Component> {
        match self.registry.lookup(label, self.namespace())? {
            Entry::Ready(component) => Ok(component),
            Entry::Lazy(lazy) => self.load(label, lazy.path()),
        }
    }

    /// Resolve `path` and memoize the result at `label`, overwriting the
    /// placeholder. Resolution failures are fatal and propagate as-is.
    #[instrument(skip(self), fields(namespace = %self.namespace()))]
    pub fn load(&self, label: &Label, path: &LazyPath) -> AppspaceResult<Component> {
        let component = match path {
            LazyPath::Import(path) => self.resolver.resolve(path)?,
            LazyPath::Include(module) => self.load_include(module)?,
        };
        self.registry
            .register(label.clone(), self.namespace(), Entry::Ready(component.clone()))?;
        debug!(%label, "lazy app resolved");
        Ok(component)
    }

    /// Resolve a branch include: the module's exported configuration must
    /// be a built appspace.
    fn load_include(&self, module: &ImportPath) -> AppspaceResult<Component> {
        let conf = match self.resolver.resolve_attr(module, &self.conf_label) {
            Ok(conf) => conf,
            Err(primary)
                if self.conf_label.as_str() != CONF_FALLBACK
                    && matches!(
                        primary,
                        crate::error::AppspaceError::Application(
                            ApplicationError::Resolution { .. }
                        )
                    ) =>
            {
                // fall back to the historical attribute name; keep the
                // primary error if both are missing
                let fallback = Label::new(CONF_FALLBACK).unwrap_or_else(|_| unreachable!());
                self.resolver.resolve_attr(module, &fallback).map_err(|_| primary)?
            }
            Err(primary) => return Err(primary),
        };
        match conf {
            Component::Space(_) => Ok(conf),
            _ => Err(ApplicationError::NotAnAppspace { target: module.to_string() }.into()),
        }
    }

    /// Register a component at `label`.
    ///
    /// The single chokepoint deciding lazy vs. eager storage: import and
    /// include specs become placeholders, values are stored ready.
    pub fn set(&self, label: Label, spec: ComponentSpec) -> AppspaceResult<()> {
        let entry = match spec {
            ComponentSpec::Value(component) => Entry::Ready(component),
            ComponentSpec::Import(path) => Entry::Lazy(LazyApp::import(path)),
            ComponentSpec::Include(path) => Entry::Lazy(LazyApp::include(path)),
        };
        self.registry.register(label, self.namespace(), entry)
    }

    /// Membership in this manager's own namespace, lazy or ready. Never
    /// descends into branches.
    pub fn contains(&self, label: &Label) -> bool {
        self.registry.contains(label)
    }

    // ── collaborators ──────────────────────────────────────────────────────

    /// Read access to the settings overlay.
    pub fn settings(&self) -> AppspaceResult<RwLockReadGuard<'_, Settings>> {
        self.settings.read().map_err(|_| ApplicationError::StoreLock.into())
    }

    /// Write access to the settings overlay.
    pub fn settings_mut(&self) -> AppspaceResult<RwLockWriteGuard<'_, Settings>> {
        self.settings.write().map_err(|_| ApplicationError::StoreLock.into())
    }

    pub fn events(&self) -> &Arc<dyn EventBus> {
        &self.events
    }

    /// Bind a listener to an event on this manager's bus.
    pub fn bind(&self, event: &Label, listener: Listener) -> AppspaceResult<()> {
        self.events.bind(event, listener)
    }

    /// Fire an event on this manager's bus.
    pub fn fire(&self, event: &Label, args: &[Object]) -> AppspaceResult<()> {
        self.events.fire(event, args)
    }
}

impl fmt::Debug for Manager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Manager")
            .field("root", &self.registry.root())
            .field("namespace", self.registry.namespace())
            .field("id", &self.registry.id())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::component::Component;
    use crate::application::services::Appspace;
    use mockall::mock;
    use mockall::predicate::eq;

    mock! {
        TestResolver {}

        impl Resolver for TestResolver {
            fn resolve(&self, path: &ImportPath) -> AppspaceResult<Component>;
            fn resolve_attr(&self, module: &ImportPath, attr: &Label) -> AppspaceResult<Component>;
        }
    }

    fn label(s: &str) -> Label {
        Label::new(s).unwrap()
    }

    fn import(s: &str) -> ImportPath {
        ImportPath::new(s).unwrap()
    }

    fn manager(resolver: MockTestResolver) -> Manager {
        Manager::new(None, Namespace::default(), Arc::new(resolver))
    }

    #[test]
    fn eager_value_is_stored_ready() {
        let manager = manager(MockTestResolver::new());
        manager.set(label("answer"), ComponentSpec::value(42_i32)).unwrap();

        let component = manager.get(&label("answer")).unwrap();
        assert_eq!(*component.downcast::<i32>().unwrap(), 42);
    }

    #[test]
    fn lazy_import_resolves_exactly_once() {
        let mut resolver = MockTestResolver::new();
        resolver
            .expect_resolve()
            .with(eq(import("math.sqrt")))
            .times(1)
            .returning(|_| Ok(Component::object("the app".to_string())));

        let manager = manager(resolver);
        manager
            .set(label("square"), ComponentSpec::import("math.sqrt").unwrap())
            .unwrap();

        let first = manager.get(&label("square")).unwrap();
        let second = manager.get(&label("square")).unwrap();
        // memoized: identical allocation, and the mock verifies the single
        // resolver hit on drop
        assert!(first.ptr_eq(&second));
    }

    #[test]
    fn absent_label_propagates_lookup_error() {
        let manager = manager(MockTestResolver::new());
        let err = manager.get(&label("missing")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn unresolvable_path_is_fatal() {
        let mut resolver = MockTestResolver::new();
        resolver.expect_resolve().returning(|path| {
            Err(ApplicationError::Resolution {
                path: path.to_string(),
                reason: "not registered".into(),
            }
            .into())
        });

        let manager = manager(resolver);
        manager
            .set(label("broken"), ComponentSpec::import("no.such.path").unwrap())
            .unwrap();

        let err = manager.get(&label("broken")).unwrap_err();
        assert!(matches!(
            err,
            crate::error::AppspaceError::Application(ApplicationError::Resolution { .. })
        ));
    }

    #[test]
    fn include_requires_an_appspace_export() {
        let mut resolver = MockTestResolver::new();
        resolver
            .expect_resolve_attr()
            .returning(|_, _| Ok(Component::object(1_i32)));

        let manager = manager(resolver);
        manager
            .set(label("branch"), ComponentSpec::include("pkg.apps").unwrap())
            .unwrap();

        let err = manager.get(&label("branch")).unwrap_err();
        assert!(matches!(
            err,
            crate::error::AppspaceError::Application(ApplicationError::NotAnAppspace { .. })
        ));
    }

    #[test]
    fn include_falls_back_to_apps_attribute() {
        let mut resolver = MockTestResolver::new();
        resolver
            .expect_resolve_attr()
            .with(eq(import("pkg.apps")), eq(label("appconf")))
            .times(1)
            .returning(|module, attr| {
                Err(ApplicationError::Resolution {
                    path: module.join(attr).to_string(),
                    reason: "not registered".into(),
                }
                .into())
            });
        resolver
            .expect_resolve_attr()
            .with(eq(import("pkg.apps")), eq(label("apps")))
            .times(1)
            .returning(|_, _| {
                let inner = Arc::new(Manager::new(
                    None,
                    Namespace::default(),
                    Arc::new(MockTestResolver::new()),
                ));
                Ok(Component::space(Appspace::new(inner)))
            });

        let manager = manager(resolver);
        manager
            .set(label("branch"), ComponentSpec::include("pkg.apps").unwrap())
            .unwrap();

        let component = manager.get(&label("branch")).unwrap();
        assert!(component.as_space().is_some());
    }

    #[test]
    fn set_overwrites_previous_entry() {
        let manager = manager(MockTestResolver::new());
        manager.set(label("x"), ComponentSpec::value(1_i32)).unwrap();
        manager.set(label("x"), ComponentSpec::value(2_i32)).unwrap();

        let component = manager.get(&label("x")).unwrap();
        assert_eq!(*component.downcast::<i32>().unwrap(), 2);
    }

    #[test]
    fn contains_sees_lazy_and_ready_entries() {
        let manager = manager(MockTestResolver::new());
        manager.set(label("eager"), ComponentSpec::value(1_i32)).unwrap();
        manager
            .set(label("lazy"), ComponentSpec::import("some.path").unwrap())
            .unwrap();

        assert!(manager.contains(&label("eager")));
        assert!(manager.contains(&label("lazy")));
        assert!(!manager.contains(&label("missing")));
    }

    #[test]
    fn settings_are_shared_through_the_manager() {
        let manager = manager(MockTestResolver::new());
        manager
            .settings_mut()
            .unwrap()
            .set("db.host", serde_json::json!("localhost"));

        let settings = manager.settings().unwrap();
        assert_eq!(settings.get("db.host"), Some(serde_json::json!("localhost")));
    }

    #[test]
    fn lazy_app_displays_its_path() {
        let lazy = LazyApp::import(import("math.sqrt"));
        assert_eq!(lazy.to_string(), "app@math.sqrt");
    }
}
