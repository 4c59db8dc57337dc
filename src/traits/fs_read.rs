//! Read operations for virtual filesystems.

use std::io::Read;
use std::path::Path;

use crate::{AccessMode, FileHandle, FsError, Metadata, OpenFlags};

/// Read operations for a virtual filesystem.
///
/// All methods use `&self` (interior mutability). Backends manage their own synchronization.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync`. The bundle overlay is shared by
/// many caller threads; its index and content caches are populated lazily
/// behind `&self`.
///
/// # Object Safety
///
/// This trait is object-safe and can be used as `dyn FsRead`.
pub trait FsRead: Send + Sync {
    /// Check that `path` exists and is accessible with `mode`.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotFound`] if the path does not exist
    /// - [`FsError::ReadOnly`] if write access is requested on a read-only filesystem
    /// - [`FsError::PermissionDenied`] if access is denied
    fn check_access(&self, path: &Path, mode: AccessMode) -> Result<(), FsError>;

    /// Get metadata for a path (follows symlinks).
    ///
    /// # Errors
    ///
    /// - [`FsError::NotFound`] if the path does not exist
    fn metadata(&self, path: &Path) -> Result<Metadata, FsError>;

    /// Open a file with the given option set.
    ///
    /// Read-only backends accept only the empty set or exactly
    /// [`OpenFlags::READ`].
    ///
    /// # Errors
    ///
    /// - [`FsError::NotFound`] if the path does not exist
    /// - [`FsError::NotAFile`] if the path is a directory
    /// - [`FsError::ReadOnly`] if a write option is requested on a read-only filesystem
    fn open(&self, path: &Path, flags: OpenFlags) -> Result<Box<dyn FileHandle>, FsError>;

    /// Read entire file contents as bytes.
    ///
    /// # Errors
    ///
    /// Same as [`open`](Self::open), plus [`FsError::Io`] if reading fails.
    fn read(&self, path: &Path) -> Result<Vec<u8>, FsError> {
        let mut handle = self.open(path, OpenFlags::READ)?;
        let mut data = Vec::new();
        handle
            .read_to_end(&mut data)
            .map_err(|e| FsError::from_io("read", path, e))?;
        Ok(data)
    }
}
