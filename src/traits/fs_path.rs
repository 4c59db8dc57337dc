//! Path resolution operations.

use std::path::{Path, PathBuf};

use crate::FsError;

/// Absolute and real path resolution.
///
/// For the bundle overlay these are the two operations that may materialize
/// an entry on the real filesystem: when the path matches the extraction
/// filter, the returned path points into the extraction directory instead of
/// the mount point.
pub trait FsPath: Send + Sync {
    /// Resolve `path` to an absolute path without touching the filesystem.
    ///
    /// # Errors
    ///
    /// - [`FsError::HostIoDisabled`] if the path is outside the overlay and host I/O is off
    /// - [`FsError::Extraction`] if a required extraction failed
    fn to_absolute_path(&self, path: &Path) -> Result<PathBuf, FsError>;

    /// Resolve `path` to its real, normalized location.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotFound`] if a host path does not exist
    /// - [`FsError::Extraction`] if a required extraction failed
    fn to_real_path(&self, path: &Path) -> Result<PathBuf, FsError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fs_path_is_object_safe() {
        fn _check(_: &dyn FsPath) {}
    }
}
