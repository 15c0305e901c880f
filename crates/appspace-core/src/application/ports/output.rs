//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the registry engine needs from external
//! systems. The `appspace-adapters` crate provides implementations.

use std::sync::Arc;

use crate::application::component::{Component, Object};
use crate::domain::{ImportPath, Label};
use crate::error::AppspaceResult;

/// Port for import-path resolution.
///
/// Implemented by:
/// - `appspace_adapters::resolver::TableResolver` (in-process path table)
///
/// ## Design Notes
///
/// - Resolution is a blocking, possibly-caching external call; the engine
///   never retries it.
/// - Failure is fatal to the `get` that triggered it — a bad path is a
///   deployment error, not a transient condition.
pub trait Resolver: Send + Sync {
    /// Resolve a dotted path to a component.
    fn resolve(&self, path: &ImportPath) -> AppspaceResult<Component>;

    /// Resolve an attribute exported by a module (`pkg.apps` + `appconf`).
    /// Branch includes go through this to find a module's built appspace.
    fn resolve_attr(&self, module: &ImportPath, attr: &Label) -> AppspaceResult<Component>;
}

/// A callback bound to an event label.
pub type Listener = Arc<dyn Fn(&[Object]) + Send + Sync>;

/// Port for event binding and dispatch.
///
/// Implemented by:
/// - `appspace_adapters::events::SimpleEventBus` (priority-ordered dispatch)
/// - [`NullEventBus`] (no-op, the default wired into a manager)
pub trait EventBus: Send + Sync {
    /// Create an event with a dispatch priority (lower fires first).
    fn register(&self, label: &Label, priority: i32) -> AppspaceResult<()>;

    /// Bind a listener to an event.
    fn bind(&self, label: &Label, listener: Listener) -> AppspaceResult<()>;

    /// Fire an event, passing arbitrary arguments to every listener.
    fn fire(&self, label: &Label, args: &[Object]) -> AppspaceResult<()>;

    /// Listeners bound to an event, in dispatch order.
    fn react(&self, label: &Label) -> AppspaceResult<Vec<Listener>>;

    /// Run an event's listeners over a queue of argument batches.
    fn burst(&self, label: &Label, batches: &[Vec<Object>]) -> AppspaceResult<()>;

    /// Drop an event and everything bound to it.
    fn unbind(&self, label: &Label) -> AppspaceResult<()>;
}

/// The default event bus: accepts everything, dispatches nothing.
///
/// Managers built without an explicit bus get this, so event sugar is
/// always safe to call.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullEventBus;

impl EventBus for NullEventBus {
    fn register(&self, _label: &Label, _priority: i32) -> AppspaceResult<()> {
        Ok(())
    }

    fn bind(&self, _label: &Label, _listener: Listener) -> AppspaceResult<()> {
        Ok(())
    }

    fn fire(&self, _label: &Label, _args: &[Object]) -> AppspaceResult<()> {
        Ok(())
    }

    fn react(&self, _label: &Label) -> AppspaceResult<Vec<Listener>> {
        Ok(Vec::new())
    }

    fn burst(&self, _label: &Label, _batches: &[Vec<Object>]) -> AppspaceResult<()> {
        Ok(())
    }

    fn unbind(&self, _label: &Label) -> AppspaceResult<()> {
        Ok(())
    }
}
