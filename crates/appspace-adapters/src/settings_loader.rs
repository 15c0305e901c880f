//! Load settings tiers from TOML.
//!
//! The overlay itself lives in `appspace-core`; this adapter only turns
//! TOML documents into typed tiers. Component authors ship defaults,
//! deployments ship required overrides:
//!
//! ```toml
//! [db]
//! host = "localhost"
//! port = 5432
//! ```

use std::path::Path;

use serde_json::Value;

use appspace_core::{
    error::{AppspaceError, AppspaceResult},
    prelude::{DefaultSettings, RequiredSettings},
};

/// Parse a TOML document into a default-tier settings object.
pub fn default_from_toml_str(document: &str) -> AppspaceResult<DefaultSettings> {
    Ok(DefaultSettings::from_value(parse(document)?)?)
}

/// Parse a TOML document into a required-tier settings object.
pub fn required_from_toml_str(document: &str) -> AppspaceResult<RequiredSettings> {
    Ok(RequiredSettings::from_value(parse(document)?)?)
}

/// Read a default-tier settings file.
pub fn default_from_toml_path(path: &Path) -> AppspaceResult<DefaultSettings> {
    default_from_toml_str(&read(path)?)
}

/// Read a required-tier settings file.
pub fn required_from_toml_path(path: &Path) -> AppspaceResult<RequiredSettings> {
    required_from_toml_str(&read(path)?)
}

fn read(path: &Path) -> AppspaceResult<String> {
    std::fs::read_to_string(path).map_err(|err| AppspaceError::Configuration {
        message: format!("cannot read settings file '{}': {}", path.display(), err),
    })
}

fn parse(document: &str) -> AppspaceResult<Value> {
    let table: toml::Value = toml::from_str(document).map_err(|err| AppspaceError::Configuration {
        message: format!("invalid settings TOML: {err}"),
    })?;
    serde_json::to_value(table).map_err(|err| AppspaceError::Configuration {
        message: format!("settings TOML did not convert to JSON: {err}"),
    })
}
