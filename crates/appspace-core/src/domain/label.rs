//! Domain value objects: Label, LabelPath, ImportPath, Namespace.
//!
//! # Design
//!
//! These are pure value types — equality-by-value, no identity, no lookup
//! logic. All resolution behaviour lives in the application layer. This
//! file's only job is to define the types, their string representations,
//! and their parsers.
//!
//! A [`Label`] names one slot in a registry. Labels produced by namespace
//! flattening keep their dots (`"outer.inner"` is a single flat key), so a
//! label only rejects the empty string. A [`LabelPath`] is the parsed form
//! used for explicit traversal through nested branches.

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── Label ────────────────────────────────────────────────────────────────────

/// The key identifying a registered component or branch.
///
/// Immutable once constructed. Uniqueness is per-namespace; re-registering
/// the same label overwrites the prior entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Label(String);

impl Label {
    /// Parse a label, rejecting the empty string.
    pub fn new(label: impl Into<String>) -> Result<Self, DomainError> {
        let label = label.into();
        if label.is_empty() {
            return Err(DomainError::InvalidLabel {
                label,
                reason: "label must not be empty".into(),
            });
        }
        Ok(Self(label))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this label is reserved for internals.
    ///
    /// Builders skip reserved labels when gathering pattern entries.
    pub fn is_reserved(&self) -> bool {
        self.0.starts_with('_')
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Label {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for Label {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ── LabelPath ────────────────────────────────────────────────────────────────

/// A dotted chain of labels for explicit descent through nested branches
/// (`helpers.util.misc.square`).
///
/// Always non-empty; an empty path is a parse error, not a value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LabelPath(Vec<Label>);

impl LabelPath {
    /// Build a path from pre-validated labels.
    pub fn from_labels(labels: Vec<Label>) -> Result<Self, DomainError> {
        if labels.is_empty() {
            return Err(DomainError::InvalidPath {
                path: String::new(),
                reason: "path must contain at least one label".into(),
            });
        }
        Ok(Self(labels))
    }

    pub fn segments(&self) -> &[Label] {
        &self.0
    }

    pub fn first(&self) -> &Label {
        // non-empty by construction
        &self.0[0]
    }

    /// The path after the first segment, `None` for a single-label path.
    pub fn rest(&self) -> Option<Self> {
        if self.0.len() > 1 {
            Some(Self(self.0[1..].to_vec()))
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for LabelPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for label in &self.0 {
            if !first {
                f.write_str(".")?;
            }
            f.write_str(label.as_str())?;
            first = false;
        }
        Ok(())
    }
}

impl FromStr for LabelPath {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let labels = s
            .split('.')
            .map(|part| {
                Label::new(part).map_err(|_| DomainError::InvalidPath {
                    path: s.into(),
                    reason: "empty path segment".into(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_labels(labels).map_err(|_| DomainError::InvalidPath {
            path: s.into(),
            reason: "path must contain at least one label".into(),
        })
    }
}

impl TryFrom<String> for LabelPath {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<LabelPath> for String {
    fn from(path: LabelPath) -> Self {
        path.to_string()
    }
}

impl From<Label> for LabelPath {
    fn from(label: Label) -> Self {
        Self(vec![label])
    }
}

// ── ImportPath ───────────────────────────────────────────────────────────────

/// A dotted path addressing an object known to the resolver
/// (`"math.sqrt"`). Same shape as [`LabelPath`] but opaque to the registry:
/// only the resolver interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImportPath(String);

impl ImportPath {
    pub fn new(path: impl Into<String>) -> Result<Self, DomainError> {
        let path = path.into();
        if path.is_empty() || path.split('.').any(str::is_empty) {
            return Err(DomainError::InvalidPath {
                path,
                reason: "import path needs non-empty dotted segments".into(),
            });
        }
        Ok(Self(path))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Join a module path with an attribute name (`pkg.apps` + `appconf`).
    pub fn join(&self, attr: &Label) -> Self {
        Self(format!("{}.{}", self.0, attr))
    }
}

impl fmt::Display for ImportPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ImportPath {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

// ── Namespace ────────────────────────────────────────────────────────────────

/// A registry's isolation domain. Labels in one namespace never collide
/// with labels in another, even when textually identical.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Namespace(String);

impl Namespace {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        if name.is_empty() { Self::default() } else { Self(name) }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Namespace {
    fn default() -> Self {
        Self("default".into())
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
