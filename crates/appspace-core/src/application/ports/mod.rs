//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `appspace-adapters` implement
//! these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by
//!   infrastructure
//!   - `Resolver`: import-path resolution (the stand-in for a dynamic
//!     language's import machinery)
//!   - `EventBus`: event binding and dispatch
//!
//! - **Driving (Input) Ports**: the appspace facade itself — callers drive
//!   the engine through it.

pub mod output;

pub use output::{EventBus, Listener, NullEventBus, Resolver};
