//! Process-wide shared appspace handle.
//!
//! For callers that want one singleton appspace rather than an explicit
//! handle. The handle is an explicit API over a `OnceLock`, not a bare
//! module global: it can be initialised once per process, read from
//! anywhere, and reset from test teardown.
//!
//! Prefer passing an [`Appspace`] explicitly; reach for this only at the
//! outermost wiring layer.

use std::sync::{Arc, OnceLock, RwLock};

use appspace_core::{
    application::ApplicationError,
    error::{AppspaceError, AppspaceResult},
    prelude::{Appspace, ComponentSpec, Resolver, patterns},
};

static GLOBAL: OnceLock<RwLock<Option<Appspace>>> = OnceLock::new();

fn cell() -> &'static RwLock<Option<Appspace>> {
    GLOBAL.get_or_init(|| RwLock::new(None))
}

/// Install the process-wide appspace. Fails if one is already installed;
/// call [`reset_global`] first to replace it.
pub fn init_global(space: Appspace) -> AppspaceResult<()> {
    let mut slot = cell().write().map_err(|_| ApplicationError::StoreLock)?;
    if slot.is_some() {
        return Err(AppspaceError::Configuration {
            message: "a global appspace is already installed".into(),
        });
    }
    *slot = Some(space);
    Ok(())
}

/// The process-wide appspace, if one was installed.
pub fn global_appspace() -> Option<Appspace> {
    cell().read().ok().and_then(|slot| slot.clone())
}

/// Run a closure against the process-wide appspace.
pub fn with_global<T>(f: impl FnOnce(&Appspace) -> AppspaceResult<T>) -> AppspaceResult<T> {
    match global_appspace() {
        Some(space) => f(&space),
        None => Err(AppspaceError::Configuration {
            message: "no global appspace installed".into(),
        }),
    }
}

/// Tear the process-wide appspace down. Test-support hook; the handle's
/// normal lifecycle is the process lifetime.
pub fn reset_global() {
    if let Ok(mut slot) = cell().write() {
        *slot = None;
    }
}

/// Build an appspace from patterns and install it as the process-wide
/// handle in one step — for callers that want the singleton route rather
/// than an explicit handle.
pub fn init_global_patterns<I, L>(
    label: &str,
    entries: I,
    resolver: Arc<dyn Resolver>,
) -> AppspaceResult<Appspace>
where
    I: IntoIterator<Item = (L, ComponentSpec)>,
    L: AsRef<str>,
{
    let space = patterns(label, entries, resolver)?;
    init_global(space.clone())?;
    Ok(space)
}
