//! Event manager adapters.

pub mod simple;

pub use simple::SimpleEventBus;
