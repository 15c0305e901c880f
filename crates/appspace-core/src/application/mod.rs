//! Application layer for appspace.
//!
//! This layer contains:
//! - **Services**: the registry engine (Registry, Manager, Appspace facade,
//!   builders)
//! - **Component model**: the currency stored and resolved by the engine
//! - **Ports**: interface definitions (traits) for external dependencies
//! - **Errors**: application-specific error types
//!
//! The application layer consumes the domain layer's value types (labels,
//! paths, settings); all parsing and precedence rules live in
//! `crate::domain`.

pub mod component;
pub mod error;
pub mod ports;
pub mod services;

// Re-export the engine surface
pub use services::{
    Appspace, BranchPatterns, Entry, Factory, FactoryOptions, LazyApp, LazyPath, Manager,
    NamespacePatterns, Patterns, Registry, patterns,
};

// Re-export the component model
pub use component::{AppFn, Component, ComponentSpec, Object, include};

// Re-export port traits (for adapter implementation)
pub use ports::{EventBus, Listener, NullEventBus, Resolver};

pub use error::ApplicationError;
