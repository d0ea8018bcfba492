//! Device model and registry
//!
//! Provides the flat device abstraction shared by every device kind,
//! the configuration seam behind `configure()`, and the ordered registry
//! that drives bulk configure/export operations.

mod configurator;
mod model;
mod registry;

pub use configurator::*;
pub use model::*;
pub use registry::*;
