//! Write operations for virtual filesystems.

use std::path::Path;

use crate::FsError;

/// Mutating operations for a virtual filesystem.
///
/// The bundle overlay rejects every method here for paths under its mount
/// point; only host delegates ever succeed.
///
/// # Object Safety
///
/// This trait is object-safe and can be used as `dyn FsWrite`.
pub trait FsWrite: Send + Sync {
    /// Create a directory (parent must exist).
    ///
    /// # Errors
    ///
    /// - [`FsError::NotFound`] if parent directory does not exist
    /// - [`FsError::AlreadyExists`] if the path already exists
    /// - [`FsError::ReadOnly`] if the filesystem is read-only
    fn create_dir(&self, path: &Path) -> Result<(), FsError>;

    /// Delete a file or an empty directory.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotFound`] if the path does not exist
    /// - [`FsError::ReadOnly`] if the filesystem is read-only
    fn remove(&self, path: &Path) -> Result<(), FsError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fs_write_is_object_safe() {
        fn _check(_: &dyn FsWrite) {}
    }
}
