//! The registry engine: storage, resolution, facade, and builders.

pub mod appspace;
pub mod builder;
pub mod manager;
pub mod registry;

pub use appspace::Appspace;
pub use builder::{BranchPatterns, Factory, FactoryOptions, NamespacePatterns, Patterns, patterns};
pub use manager::{LazyApp, LazyPath, Manager};
pub use registry::{Entry, Registry};
