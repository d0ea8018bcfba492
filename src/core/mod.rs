//! Core automation module
//!
//! Provides the engine that drives configure, export, fetch and
//! optimization passes over one shared fleet.

mod automation;

pub use automation::*;
