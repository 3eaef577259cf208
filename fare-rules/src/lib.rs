//! Fare-rule compiler.
//!
//! Reads the tabular fare description of a transit network (ticket prices,
//! transition rules between travel states, and origin-destination fares)
//! and compiles it into the in-memory model used by the fare engine.

pub mod config;
pub mod domain;
pub mod loader;
pub mod prices;
pub mod snapshot;
