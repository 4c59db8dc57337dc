//! # Filesystem Traits
//!
//! The operation set shared by the bundle overlay and the host filesystems it
//! delegates to.
//!
//! ## Quick Reference
//!
//! | Trait | Operations |
//! |-------|------------|
//! | [`FsRead`] | `check_access`, `metadata`, `open`, `read` |
//! | [`FsWrite`] | `create_dir`, `remove` |
//! | [`FsDir`] | `read_dir` |
//! | [`FsPath`] | `to_absolute_path`, `to_real_path` |
//! | [`Fs`] | all of the above |
//!
//! ## Blanket Implementation
//!
//! [`Fs`] is implemented for every type implementing the four component
//! traits, so delegates only implement the components:
//!
//! ```rust
//! use bundle_vfs::{Fs, NativeFs};
//!
//! fn use_fs(_backend: &dyn Fs) {}
//! use_fs(&NativeFs::new());
//! ```
//!
//! ## Thread Safety
//!
//! All traits require `Send + Sync`. Methods take `&self`.

use std::path::{Path, PathBuf};

use crate::{AccessMode, FsError, Metadata, OpenFlags};

mod file_handle;
mod fs_dir;
mod fs_path;
mod fs_read;
mod fs_write;

pub use file_handle::FileHandle;
pub use fs_dir::{DirFilter, FsDir, ReadDirIter};
pub use fs_path::FsPath;
pub use fs_read::FsRead;
pub use fs_write::FsWrite;

/// Full operation set used by a generic I/O layer.
///
/// Combines [`FsRead`], [`FsWrite`], [`FsDir`] and [`FsPath`]. This is the
/// contract the overlay's delegate must satisfy, and the contract the overlay
/// itself exposes.
///
/// # Blanket Implementation
///
/// Automatically implemented for any type that implements all four component traits.
pub trait Fs: FsRead + FsWrite + FsDir + FsPath {}

impl<T: FsRead + FsWrite + FsDir + FsPath> Fs for T {}

impl<T: FsRead + ?Sized> FsRead for Box<T> {
    fn check_access(&self, path: &Path, mode: AccessMode) -> Result<(), FsError> {
        (**self).check_access(path, mode)
    }

    fn metadata(&self, path: &Path) -> Result<Metadata, FsError> {
        (**self).metadata(path)
    }

    fn open(&self, path: &Path, flags: OpenFlags) -> Result<Box<dyn FileHandle>, FsError> {
        (**self).open(path, flags)
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>, FsError> {
        (**self).read(path)
    }
}

impl<T: FsWrite + ?Sized> FsWrite for Box<T> {
    fn create_dir(&self, path: &Path) -> Result<(), FsError> {
        (**self).create_dir(path)
    }

    fn remove(&self, path: &Path) -> Result<(), FsError> {
        (**self).remove(path)
    }
}

impl<T: FsDir + ?Sized> FsDir for Box<T> {
    fn read_dir(&self, path: &Path, filter: DirFilter<'_>) -> Result<ReadDirIter, FsError> {
        (**self).read_dir(path, filter)
    }
}

impl<T: FsPath + ?Sized> FsPath for Box<T> {
    fn to_absolute_path(&self, path: &Path) -> Result<PathBuf, FsError> {
        (**self).to_absolute_path(path)
    }

    fn to_real_path(&self, path: &Path) -> Result<PathBuf, FsError> {
        (**self).to_real_path(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boxed_backends_are_fs() {
        fn _takes_fs<T: Fs>(_: &T) {}
        let boxed: Box<dyn Fs> = Box::new(crate::NativeFs::new());
        _takes_fs(&boxed);
    }
}
