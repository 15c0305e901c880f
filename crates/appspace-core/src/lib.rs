//! Appspace Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the appspace
//! component registry, following hexagonal (ports and adapters)
//! architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            Consumer code                │
//! │    (drives the Appspace facade)         │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │  (Appspace, Manager, Factory, Patterns) │
//! │       Registry + lazy resolution        │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │       Application Ports (Traits)        │
//! │      (Driven: Resolver, EventBus)       │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │   appspace-adapters (Infrastructure)    │
//! │   (TableResolver, SimpleEventBus, …)    │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │        Domain Layer (Pure Logic)        │
//! │   (Label, LabelPath, Settings tiers)    │
//! │        No External Dependencies         │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use appspace_core::prelude::*;
//!
//! # fn demo(resolver: Arc<dyn Resolver>) -> AppspaceResult<()> {
//! // 1. Declare the appspace contents
//! let app = patterns(
//!     "helpers",
//!     vec![("square", ComponentSpec::import("math.sqrt")?)],
//!     resolver,
//! )?;
//!
//! // 2. Resolve lazily by label
//! let square = app.get("square")?;
//! assert!(square.is_callable());
//! # Ok(())
//! # }
//! ```

// Re-export domain layer (stable, well-defined API)
pub mod domain;

// Re-export application layer (registry engine)
pub mod application;

// Re-export error types
pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        Appspace, BranchPatterns, Component, ComponentSpec, Factory, FactoryOptions, Manager,
        NamespacePatterns, Object, Patterns, include, patterns,
        ports::{EventBus, Listener, Resolver},
    };
    pub use crate::domain::{
        DefaultSettings, ImportPath, Label, LabelPath, Namespace, RequiredSettings, Settings,
    };
    pub use crate::error::{AppspaceError, AppspaceResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
