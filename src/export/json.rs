//! JSON rendering of configuration snapshots

use crate::device::ConfigSnapshot;
use crate::error::Result;

/// Render snapshots as a pretty-printed JSON array (2-space indent)
pub fn render_json(snapshots: &[ConfigSnapshot]) -> Result<String> {
    Ok(serde_json::to_string_pretty(snapshots)?)
}
