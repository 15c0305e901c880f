//! Builders - assemble a manager's initial contents into an appspace.
//!
//! # Design
//!
//! [`Factory`] is the low-level assembler: it wires a manager chain for a
//! (possibly dotted) root label, takes `(label, spec)` entries, and
//! registers the built appspace under its own root label so the space can
//! be referenced by its own name.
//!
//! [`Patterns`] / [`BranchPatterns`] / [`NamespacePatterns`] are the
//! declarative layer: an explicit builder API evaluated by `build()`.
//! Gathering flattens a pattern tree into factory entries:
//!
//! - namespace entries surface as flat dot-joined labels
//!   (`"outer.inner.app"`), however deeply nested;
//! - branch entries are always module includes, resolved lazily into
//!   nested appspaces;
//! - labels with a leading `_` are reserved and skipped.
//!
//! An empty pattern set builds an empty appspace, not an error.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::component::{Component, ComponentSpec};
use crate::application::ports::Resolver;
use crate::application::services::appspace::Appspace;
use crate::application::services::manager::Manager;
use crate::domain::{Label, LabelPath, Namespace};
use crate::error::{AppspaceError, AppspaceResult};

/// Builder options shared by a manager chain.
#[derive(Debug, Clone, Default)]
pub struct FactoryOptions {
    /// Namespace for every manager in the chain.
    pub namespace: Namespace,
    /// Exported-configuration attribute for branch includes
    /// (default `"appconf"`, falling back to `"apps"`).
    pub conf_label: Option<Label>,
}

// ── Factory ──────────────────────────────────────────────────────────────────

/// Assembles one appspace (or a nested chain of them) around a manager.
#[derive(Debug)]
pub struct Factory {
    top: Arc<Manager>,
    leaf: Arc<Manager>,
}

impl Factory {
    /// Create a factory rooted at `root`.
    ///
    /// An empty root builds an anonymous appspace. A dotted root
    /// (`"helpers.util.misc"`) builds a chain: entries land in the
    /// innermost manager, and each leading segment becomes a branch wrapper
    /// so the chain is reachable label by label.
    pub fn new(root: &str, resolver: Arc<dyn Resolver>) -> AppspaceResult<Self> {
        Self::with_options(root, resolver, FactoryOptions::default())
    }

    pub fn with_options(
        root: &str,
        resolver: Arc<dyn Resolver>,
        options: FactoryOptions,
    ) -> AppspaceResult<Self> {
        let segments = parse_root(root)?;
        let new_manager = |label: Option<Label>| {
            let manager = Manager::new(label, options.namespace.clone(), Arc::clone(&resolver));
            match &options.conf_label {
                Some(conf) => manager.with_conf_label(conf.clone()),
                None => manager,
            }
        };

        let (top, leaf) = match segments {
            None => {
                let manager = Arc::new(new_manager(None));
                (Arc::clone(&manager), manager)
            }
            Some(path) => {
                let segments = path.segments();
                let last = segments.len() - 1;
                let leaf = Arc::new(new_manager(Some(segments[last].clone())));
                let mut child = Appspace::new(Arc::clone(&leaf));
                // wrap leading segments from the inside out
                for index in (0..last).rev() {
                    let parent = Arc::new(new_manager(Some(segments[index].clone())));
                    parent.set(
                        segments[index + 1].clone(),
                        ComponentSpec::Value(Component::space(child)),
                    )?;
                    child = Appspace::new(Arc::clone(&parent));
                }
                let top = Arc::clone(child.manager());
                // the appspace is referenced by its own root label
                top.set(
                    segments[0].clone(),
                    ComponentSpec::Value(Component::space(child)),
                )?;
                (top, leaf)
            }
        };

        Ok(Self { top, leaf })
    }

    /// Register one entry; entries land in the innermost manager.
    pub fn add(&self, label: &str, spec: ComponentSpec) -> AppspaceResult<&Self> {
        let label = Label::new(label).map_err(invalid_pattern)?;
        self.leaf.set(label, spec)?;
        Ok(self)
    }

    /// The manager entries are registered into.
    pub fn manager(&self) -> &Arc<Manager> {
        &self.leaf
    }

    /// Finish: a fresh facade over the outermost manager.
    pub fn build(&self) -> Appspace {
        Appspace::new(Arc::clone(&self.top))
    }
}

/// Build an appspace from `(label, spec)` pairs in one call.
#[instrument(skip(entries, resolver))]
pub fn patterns<I, L>(
    label: &str,
    entries: I,
    resolver: Arc<dyn Resolver>,
) -> AppspaceResult<Appspace>
where
    I: IntoIterator<Item = (L, ComponentSpec)>,
    L: AsRef<str>,
{
    let factory = Factory::new(label, resolver)?;
    let mut count = 0_usize;
    for (entry_label, spec) in entries {
        factory.add(entry_label.as_ref(), spec)?;
        count += 1;
    }
    debug!(count, "appspace built");
    Ok(factory.build())
}

fn parse_root(root: &str) -> AppspaceResult<Option<LabelPath>> {
    if root.is_empty() {
        return Ok(None);
    }
    root.parse::<LabelPath>().map(Some).map_err(invalid_pattern)
}

fn invalid_pattern(err: impl std::fmt::Display) -> AppspaceError {
    AppspaceError::configuration(err.to_string())
}

// ── Declarative patterns ─────────────────────────────────────────────────────

/// Declarative specification of an appspace's initial contents.
#[derive(Default)]
pub struct Patterns {
    label: String,
    entries: Vec<(String, ComponentSpec)>,
    branches: Vec<BranchPatterns>,
    namespaces: Vec<NamespacePatterns>,
}

impl Patterns {
    pub fn new(label: impl Into<String>) -> Self {
        Self { label: label.into(), ..Self::default() }
    }

    /// A literal `(label, spec)` entry.
    pub fn entry(mut self, label: impl Into<String>, spec: ComponentSpec) -> Self {
        self.entries.push((label.into(), spec));
        self
    }

    /// A branch definition; its includes surface at this level.
    pub fn branch(mut self, branch: BranchPatterns) -> Self {
        self.branches.push(branch);
        self
    }

    /// A namespace definition; its entries surface as dotted flat labels.
    pub fn namespace(mut self, namespace: NamespacePatterns) -> Self {
        self.namespaces.push(namespace);
        self
    }

    /// Build the configured appspace.
    pub fn build(self, resolver: Arc<dyn Resolver>) -> AppspaceResult<Appspace> {
        let gathered = self.gather()?;
        patterns(&self.label, gathered, resolver)
    }

    fn gather(&self) -> AppspaceResult<Vec<(String, ComponentSpec)>> {
        let mut gathered = Vec::new();
        for namespace in &self.namespaces {
            gathered.extend(namespace.gather());
        }
        for branch in &self.branches {
            gathered.extend(branch.gather()?);
        }
        for (label, spec) in &self.entries {
            if !label.starts_with('_') {
                gathered.push((label.clone(), spec.clone()));
            }
        }
        Ok(gathered)
    }
}

/// Branch configuration: every entry is an importable module reference,
/// never a literal component.
#[derive(Default)]
pub struct BranchPatterns {
    apps: Vec<(String, String)>,
}

impl BranchPatterns {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a `(label, module path)` include.
    pub fn include(mut self, label: impl Into<String>, module: impl Into<String>) -> Self {
        self.apps.push((label.into(), module.into()));
        self
    }

    fn gather(&self) -> AppspaceResult<Vec<(String, ComponentSpec)>> {
        self.apps
            .iter()
            .filter(|(label, _)| !label.starts_with('_'))
            .map(|(label, module)| {
                let spec = ComponentSpec::include(module).map_err(invalid_pattern)?;
                Ok((label.clone(), spec))
            })
            .collect()
    }
}

/// Namespace configuration: entries flatten to dot-joined labels at the
/// top level instead of nesting as branches.
#[derive(Default)]
pub struct NamespacePatterns {
    name: String,
    entries: Vec<(String, ComponentSpec)>,
    children: Vec<NamespacePatterns>,
}

impl NamespacePatterns {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    pub fn entry(mut self, label: impl Into<String>, spec: ComponentSpec) -> Self {
        self.entries.push((label.into(), spec));
        self
    }

    pub fn namespace(mut self, child: NamespacePatterns) -> Self {
        self.children.push(child);
        self
    }

    fn gather(&self) -> Vec<(String, ComponentSpec)> {
        let mut gathered = Vec::new();
        for child in &self.children {
            if child.name.starts_with('_') {
                continue;
            }
            for (label, spec) in child.gather() {
                gathered.push((self.pack(&label), spec));
            }
        }
        for (label, spec) in &self.entries {
            if !label.starts_with('_') {
                gathered.push((self.pack(label), spec.clone()));
            }
        }
        gathered
    }

    fn pack(&self, label: &str) -> String {
        format!("{}.{}", self.name, label)
    }
}
