//! Three-tier settings overlay: default, explicit, required.
//!
//! # Design
//!
//! Settings accumulate into three JSON-object tiers and flatten on read:
//!
//! | Tier       | Who writes it                  | Precedence |
//! |------------|--------------------------------|------------|
//! | `default`  | component authors              | lowest     |
//! | `explicit` | the running application        | middle     |
//! | `required` | deployment / policy            | highest    |
//!
//! The merged view is `default ∪ explicit ∪ required`, later tiers winning
//! per top-level key (shallow merge). Dotted keys traverse nested objects on
//! `get` and synthesize intermediate objects on `set`. The merged view is
//! cached and invalidated by any mutation.
//!
//! Tier assignment is typed: only a [`DefaultSettings`] value can replace
//! the default tier and only a [`RequiredSettings`] value the required tier,
//! so an arbitrary object can never be overlaid as a tier by accident.

use std::fmt;
use std::sync::{Arc, RwLock};

use serde_json::{Map, Value};

use crate::domain::error::DomainError;

type SettingsMap = Map<String, Value>;

// ── Tier wrappers ────────────────────────────────────────────────────────────

/// A settings object tagged as the default tier.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DefaultSettings(SettingsMap);

/// A settings object tagged as the required tier.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequiredSettings(SettingsMap);

impl DefaultSettings {
    pub fn new(map: SettingsMap) -> Self {
        Self(map)
    }

    /// Accepts only JSON objects; anything else is an invalid tier.
    pub fn from_value(value: Value) -> Result<Self, DomainError> {
        into_map(value).map(Self)
    }

    pub fn into_inner(self) -> SettingsMap {
        self.0
    }
}

impl RequiredSettings {
    pub fn new(map: SettingsMap) -> Self {
        Self(map)
    }

    pub fn from_value(value: Value) -> Result<Self, DomainError> {
        into_map(value).map(Self)
    }

    pub fn into_inner(self) -> SettingsMap {
        self.0
    }
}

fn into_map(value: Value) -> Result<SettingsMap, DomainError> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(DomainError::InvalidSettings(format!(
            "expected a JSON object, got {}",
            kind_of(&other)
        ))),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ── Settings ─────────────────────────────────────────────────────────────────

/// The settings overlay for one appspace.
pub struct Settings {
    default: SettingsMap,
    explicit: SettingsMap,
    required: SettingsMap,
    // merged view, rebuilt lazily after any write
    merged: RwLock<Option<Arc<SettingsMap>>>,
}

impl Settings {
    pub fn new() -> Self {
        Self {
            default: SettingsMap::new(),
            explicit: SettingsMap::new(),
            required: SettingsMap::new(),
            merged: RwLock::new(None),
        }
    }

    /// Start from explicit settings.
    pub fn with_explicit(map: SettingsMap) -> Self {
        let mut settings = Self::new();
        settings.explicit = map;
        settings
    }

    // ── read side ──────────────────────────────────────────────────────────

    /// Fetch a value by (possibly dotted) key.
    ///
    /// The merged final view wins; the default tier answers for nested keys
    /// a shallow top-level merge would otherwise shadow.
    pub fn get(&self, key: &str) -> Option<Value> {
        deep_get(&self.final_view(), key)
            .or_else(|| deep_get(&self.default, key))
    }

    /// [`Settings::get`] with a caller-provided fallback.
    pub fn get_or(&self, key: &str, fallback: Value) -> Value {
        self.get(key).unwrap_or(fallback)
    }

    /// The frozen merged view: `default ∪ explicit ∪ required`.
    pub fn final_view(&self) -> Arc<SettingsMap> {
        if let Ok(cache) = self.merged.read() {
            if let Some(merged) = cache.as_ref() {
                return Arc::clone(merged);
            }
        }
        let mut merged = self.default.clone();
        for (key, value) in &self.explicit {
            merged.insert(key.clone(), value.clone());
        }
        for (key, value) in &self.required {
            merged.insert(key.clone(), value.clone());
        }
        let merged = Arc::new(merged);
        if let Ok(mut cache) = self.merged.write() {
            *cache = Some(Arc::clone(&merged));
        }
        merged
    }

    /// The default tier on its own.
    pub fn default_view(&self) -> &SettingsMap {
        &self.default
    }

    /// The required tier on its own.
    pub fn required_view(&self) -> &SettingsMap {
        &self.required
    }

    // ── write side ─────────────────────────────────────────────────────────

    /// Set a value in the explicit tier.
    ///
    /// A dotted key walks into nested objects, synthesizing intermediate
    /// objects along the path; a non-object intermediate is replaced.
    pub fn set(&mut self, key: &str, value: Value) {
        deep_set(&mut self.explicit, key, value);
        self.invalidate();
    }

    /// Replace the default tier.
    pub fn set_default(&mut self, settings: DefaultSettings) {
        self.default = settings.into_inner();
        self.invalidate();
    }

    /// Merge into the default tier.
    pub fn update_default(&mut self, settings: DefaultSettings) {
        for (key, value) in settings.into_inner() {
            self.default.insert(key, value);
        }
        self.invalidate();
    }

    /// Replace the required tier.
    pub fn set_required(&mut self, settings: RequiredSettings) {
        self.required = settings.into_inner();
        self.invalidate();
    }

    /// Merge into the required tier.
    pub fn update_required(&mut self, settings: RequiredSettings) {
        for (key, value) in settings.into_inner() {
            self.required.insert(key, value);
        }
        self.invalidate();
    }

    /// Merge a plain object into the explicit tier.
    pub fn update(&mut self, map: SettingsMap) {
        for (key, value) in map {
            self.explicit.insert(key, value);
        }
        self.invalidate();
    }

    fn invalidate(&self) {
        if let Ok(mut cache) = self.merged.write() {
            *cache = None;
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Settings {
    fn clone(&self) -> Self {
        Self {
            default: self.default.clone(),
            explicit: self.explicit.clone(),
            required: self.required.clone(),
            merged: RwLock::new(None),
        }
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("default", &self.default)
            .field("explicit", &self.explicit)
            .field("required", &self.required)
            .finish()
    }
}

// ── dotted-key helpers ───────────────────────────────────────────────────────

fn deep_get(map: &SettingsMap, key: &str) -> Option<Value> {
    // literal keys win over dotted traversal (namespace-flattened keys
    // legitimately contain dots)
    if let Some(value) = map.get(key) {
        return Some(value.clone());
    }
    let (head, rest) = key.split_once('.')?;
    match map.get(head)? {
        Value::Object(inner) => deep_get(inner, rest),
        _ => None,
    }
}

fn deep_set(map: &mut SettingsMap, key: &str, value: Value) {
    match key.split_once('.') {
        None => {
            map.insert(key.to_string(), value);
        }
        Some((head, rest)) => {
            let slot = map
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(SettingsMap::new()));
            if !slot.is_object() {
                *slot = Value::Object(SettingsMap::new());
            }
            if let Value::Object(inner) = slot {
                deep_set(inner, rest, value);
            }
        }
    }
}
