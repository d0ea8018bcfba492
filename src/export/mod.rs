//! Configuration export module
//!
//! Serializes registry snapshots to:
//! - JSON (array of `{name, ip, type}`, 2-space pretty print)
//! - Structured markup (`network_config` / `device` / one leaf per key)
//!
//! File writes go through a temporary file in the target directory and
//! an atomic rename, so a failed export never leaves a partial file behind.

mod atomic;
mod exporter;
mod json;
mod markup;

pub use atomic::*;
pub use exporter::*;
pub use json::*;
pub use markup::*;
