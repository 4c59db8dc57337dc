//! # Layers
//!
//! Tower-style middleware composition for filesystems.
//!
//! ```text
//! Backend ──▶ Layer::layer() ──▶ Wrapped Backend
//! ```
//!
//! The crate ships one layer, [`ReadOnlyLayer`], which the overlay applies to
//! its host delegate in [`HostIo::Read`](crate::HostIo::Read) mode:
//!
//! ```rust
//! use bundle_vfs::{AccessMode, FsError, FsRead, LayerExt, NativeFs, ReadOnlyLayer};
//! use std::path::Path;
//!
//! let host = NativeFs::new().layer(ReadOnlyLayer);
//! let err = host.check_access(Path::new("/tmp"), AccessMode::WRITE).unwrap_err();
//! assert!(matches!(err, FsError::ReadOnly { .. }));
//! ```

use std::path::{Path, PathBuf};

use crate::{
    AccessMode, DirFilter, FileHandle, Fs, FsDir, FsError, FsPath, FsRead, FsWrite, Metadata,
    OpenFlags, ReadDirIter,
};

/// A layer that wraps a backend to add functionality.
///
/// Inspired by Tower's `Layer` trait. `layer(self, backend)` consumes both
/// the layer and the backend.
pub trait Layer<B> {
    /// The resulting backend type after applying this layer.
    type Backend;

    /// Wrap the given backend with this layer's functionality.
    fn layer(self, backend: B) -> Self::Backend;
}

/// Extension trait for fluent layer composition.
///
/// ```rust
/// use bundle_vfs::{Fs, Layer, LayerExt};
///
/// fn compose_backend<B: Fs, L: Layer<B>>(backend: B, layer: L) -> L::Backend {
///     backend.layer(layer)
/// }
/// ```
pub trait LayerExt: Fs + Sized {
    /// Apply a layer to this backend.
    fn layer<L: Layer<Self>>(self, layer: L) -> L::Backend {
        layer.layer(self)
    }
}

impl<B: Fs> LayerExt for B {}

/// Rejects every mutation of the wrapped filesystem with [`FsError::ReadOnly`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadOnlyLayer;

impl<B: Fs> Layer<B> for ReadOnlyLayer {
    type Backend = ReadOnlyFs<B>;

    fn layer(self, backend: B) -> Self::Backend {
        ReadOnlyFs::new(backend)
    }
}

/// A filesystem whose reads pass through and whose writes fail.
#[derive(Debug, Clone)]
pub struct ReadOnlyFs<B> {
    inner: B,
}

impl<B> ReadOnlyFs<B> {
    /// Wrap `inner`.
    pub fn new(inner: B) -> Self {
        Self { inner }
    }

    /// The wrapped filesystem.
    pub fn inner(&self) -> &B {
        &self.inner
    }

    /// Unwrap the layer.
    pub fn into_inner(self) -> B {
        self.inner
    }
}

fn read_only(path: &Path, operation: &'static str) -> FsError {
    FsError::ReadOnly {
        path: path.to_path_buf(),
        operation,
    }
}

impl<B: FsRead> FsRead for ReadOnlyFs<B> {
    fn check_access(&self, path: &Path, mode: AccessMode) -> Result<(), FsError> {
        if mode.write {
            return Err(read_only(path, "check_access"));
        }
        self.inner.check_access(path, mode)
    }

    fn metadata(&self, path: &Path) -> Result<Metadata, FsError> {
        self.inner.metadata(path)
    }

    fn open(&self, path: &Path, flags: OpenFlags) -> Result<Box<dyn FileHandle>, FsError> {
        if !flags.is_read_only() {
            return Err(read_only(path, "open"));
        }
        self.inner.open(path, flags)
    }
}

impl<B: FsWrite> FsWrite for ReadOnlyFs<B> {
    fn create_dir(&self, path: &Path) -> Result<(), FsError> {
        Err(read_only(path, "create_dir"))
    }

    fn remove(&self, path: &Path) -> Result<(), FsError> {
        Err(read_only(path, "remove"))
    }
}

impl<B: FsDir> FsDir for ReadOnlyFs<B> {
    fn read_dir(&self, path: &Path, filter: DirFilter<'_>) -> Result<ReadDirIter, FsError> {
        self.inner.read_dir(path, filter)
    }
}

impl<B: FsPath> FsPath for ReadOnlyFs<B> {
    fn to_absolute_path(&self, path: &Path) -> Result<PathBuf, FsError> {
        self.inner.to_absolute_path(path)
    }

    fn to_real_path(&self, path: &Path) -> Result<PathBuf, FsError> {
        self.inner.to_real_path(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NativeFs;
    use std::io::Read;

    #[test]
    fn layer_ext_is_auto_implemented() {
        fn _check<B: Fs + LayerExt>() {}
    }

    #[test]
    fn read_only_layer_passes_reads_through() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.txt");
        std::fs::write(&file, b"host").unwrap();

        let fs = NativeFs::new().layer(ReadOnlyLayer);
        let mut handle = fs.open(&file, OpenFlags::READ).unwrap();
        let mut out = String::new();
        handle.read_to_string(&mut out).unwrap();
        assert_eq!(out, "host");
        assert!(fs.metadata(&file).unwrap().is_file());
        assert_eq!(fs.read_dir(dir.path(), &|_| true).unwrap().count(), 1);
    }

    #[test]
    fn read_only_layer_rejects_writes() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.txt");
        std::fs::write(&file, b"host").unwrap();

        let fs = NativeFs::new().layer(ReadOnlyLayer);
        let errors = [
            fs.create_dir(&dir.path().join("new")).unwrap_err(),
            fs.remove(&file).unwrap_err(),
            fs.open(&file, OpenFlags::WRITE).err().unwrap(),
            fs.check_access(&file, AccessMode::WRITE).unwrap_err(),
        ];
        for err in errors {
            assert!(matches!(err, FsError::ReadOnly { .. }), "{err}");
        }
        assert!(file.exists());
        assert!(!dir.path().join("new").exists());
    }
}
