//! Infrastructure adapters for appspace.
//!
//! This crate implements the ports defined in
//! `appspace-core::application::ports`. It contains all external
//! dependencies and I/O operations.

pub mod events;
pub mod global;
pub mod resolver;
pub mod settings_loader;

// Re-export commonly used adapters
pub use events::SimpleEventBus;
pub use global::{global_appspace, init_global, init_global_patterns, reset_global, with_global};
pub use resolver::TableResolver;
