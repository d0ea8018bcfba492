//! Registry export front end

use super::atomic::{write_atomic, StagedFile};
use super::json::render_json;
use super::markup::render_markup;
use crate::device::{ConfigSnapshot, DeviceRegistry};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Export target format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// JSON array
    Json,
    /// Structured markup document
    Xml,
}

impl ExportFormat {
    /// Conventional file extension
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Xml => "xml",
        }
    }
}

/// Files written by an export pass
#[derive(Debug, Clone, Default)]
pub struct ExportSummary {
    /// Number of device snapshots exported
    pub devices: usize,
    /// Paths written, in the order they were written
    pub written: Vec<(ExportFormat, PathBuf)>,
}

/// Serializes a fixed snapshot collection
///
/// The exporter captures snapshots once, so every format rendered from it
/// describes the same registry state.
#[derive(Debug, Clone)]
pub struct ConfigExporter {
    snapshots: Vec<ConfigSnapshot>,
}

impl ConfigExporter {
    /// Create an exporter over explicit snapshots
    pub fn new(snapshots: Vec<ConfigSnapshot>) -> Self {
        Self { snapshots }
    }

    /// Capture the current state of a registry
    pub fn from_registry(registry: &DeviceRegistry) -> Self {
        Self::new(registry.export_configs())
    }

    /// Captured snapshots
    pub fn snapshots(&self) -> &[ConfigSnapshot] {
        &self.snapshots
    }

    /// Render in the given format
    pub fn render(&self, format: ExportFormat) -> Result<String> {
        match format {
            ExportFormat::Json => render_json(&self.snapshots),
            ExportFormat::Xml => render_markup(&self.snapshots),
        }
    }

    /// Render and atomically write one format
    pub fn write(&self, format: ExportFormat, path: &Path) -> Result<()> {
        let rendered = self.render(format)?;
        write_atomic(path, rendered.as_bytes())?;
        tracing::info!(
            "Exported {} device(s) as {} to {:?}",
            self.snapshots.len(),
            format.extension(),
            path
        );
        Ok(())
    }

    /// Write the JSON export
    pub fn write_json(&self, path: &Path) -> Result<()> {
        self.write(ExportFormat::Json, path)
    }

    /// Write the markup export
    pub fn write_xml(&self, path: &Path) -> Result<()> {
        self.write(ExportFormat::Xml, path)
    }

    /// Write several targets as one unit
    ///
    /// Every document is rendered and staged in a synced temporary file
    /// before any target is replaced. A rendering or staging failure drops
    /// the staged files and leaves every target untouched.
    pub fn write_targets(&self, targets: &[(ExportFormat, PathBuf)]) -> Result<ExportSummary> {
        let mut staged = Vec::with_capacity(targets.len());
        for (format, path) in targets {
            let document = self.render(*format)?;
            staged.push((*format, StagedFile::stage(path, document.as_bytes())?));
        }

        let mut summary = ExportSummary {
            devices: self.snapshots.len(),
            written: Vec::with_capacity(staged.len()),
        };
        for (format, file) in staged {
            let path = file.commit()?;
            tracing::info!(
                "Exported {} device(s) as {} to {:?}",
                summary.devices,
                format.extension(),
                path
            );
            summary.written.push((format, path));
        }
        Ok(summary)
    }
}
