//! Remote configuration retrieval
//!
//! `ConfigSource` is the seam for pulling a device's running configuration
//! over a management protocol. The shipped source is a simulation; the
//! `TimeoutSource` wrapper bounds any source by a per-call deadline.

mod credentials;
mod source;

pub use credentials::*;
pub use source::*;
