//! Configuration module for NetFleet
//!
//! Provides configuration management including CLI arguments,
//! device declarations, and runtime settings.

mod settings;

pub use settings::*;
