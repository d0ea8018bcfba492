//! All-or-nothing file writes

use crate::error::{IoResultExt, NetFleetError, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// A fully written, synced temporary file waiting to replace its target
///
/// Dropping a staged file without committing removes the temporary file
/// and leaves the target untouched.
#[derive(Debug)]
pub struct StagedFile {
    temp: NamedTempFile,
    path: PathBuf,
}

impl StagedFile {
    /// Write `contents` to a temporary file next to `path` and sync it
    pub fn stage(path: &Path, contents: &[u8]) -> Result<Self> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut temp = NamedTempFile::new_in(dir).with_path(path)?;
        temp.write_all(contents).with_path(path)?;
        temp.as_file().sync_all().with_path(path)?;

        Ok(Self {
            temp,
            path: path.to_path_buf(),
        })
    }

    /// Target the file will replace
    pub fn target(&self) -> &Path {
        &self.path
    }

    /// Rename the temporary file over the target
    pub fn commit(self) -> Result<PathBuf> {
        let Self { temp, path } = self;
        temp.persist(&path)
            .map_err(|e| NetFleetError::export_io(&path, e.error))?;
        tracing::debug!("Committed {:?}", path);
        Ok(path)
    }
}

/// Write `contents` to `path` atomically
///
/// The data lands in a temporary file next to the target and is renamed
/// over it only after a successful flush and sync. On any failure the
/// target is left untouched and the temporary file is removed.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    StagedFile::stage(path, contents)?.commit()?;
    tracing::debug!("Wrote {} bytes to {:?}", contents.len(), path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_atomic_replaces_target() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.json");
        std::fs::write(&path, "old").unwrap();

        write_atomic(&path, b"new contents").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new contents");

        let leftovers: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(leftovers.len(), 1);
    }

    #[test]
    fn test_write_atomic_missing_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("out.xml");

        let err = write_atomic(&path, b"data").unwrap_err();
        assert!(matches!(err, NetFleetError::ExportIo { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn test_dropped_stage_leaves_target_untouched() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.xml");
        std::fs::write(&path, "old").unwrap();

        let staged = StagedFile::stage(&path, b"new").unwrap();
        assert_eq!(staged.target(), path.as_path());
        drop(staged);

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "old");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
