//! # Extension Traits
//!
//! Convenience methods for any [`Fs`], implemented once on top of the core
//! operations.
//!
//! | Method | Description |
//! |--------|-------------|
//! | [`exists`](FsExt::exists) | Check that a path resolves |
//! | [`is_file`](FsExt::is_file) | Check if path is a regular file |
//! | [`is_dir`](FsExt::is_dir) | Check if path is a directory |
//! | [`read_to_string`](FsExt::read_to_string) | Read a UTF-8 file |
//! | [`file_size`](FsExt::file_size) | Size from metadata |
//!
//! With the `serde` feature, `FsExtJson::read_json` deserializes a JSON file.

use std::io;
use std::path::Path;

use crate::{AccessMode, Fs, FsError};

/// Extension methods for any filesystem.
///
/// ```rust
/// use bundle_vfs::{Fs, FsExt, FsError};
/// use std::path::Path;
///
/// fn load_script<B: Fs>(fs: &B) -> Result<Option<String>, FsError> {
///     let path = Path::new("/bundle_vfs/src/main.py");
///     if !fs.is_file(path)? {
///         return Ok(None);
///     }
///     fs.read_to_string(path).map(Some)
/// }
/// ```
pub trait FsExt: Fs {
    /// Whether `path` resolves. Missing paths are `Ok(false)`, not errors.
    fn exists(&self, path: &Path) -> Result<bool, FsError> {
        match self.check_access(path, AccessMode::EXISTS) {
            Ok(()) => Ok(true),
            Err(FsError::NotFound { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Check if the path points to a regular file.
    ///
    /// Returns `Ok(false)` if the path doesn't exist.
    fn is_file(&self, path: &Path) -> Result<bool, FsError> {
        match self.metadata(path) {
            Ok(m) => Ok(m.is_file()),
            Err(FsError::NotFound { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Check if the path points to a directory.
    ///
    /// Returns `Ok(false)` if the path doesn't exist.
    fn is_dir(&self, path: &Path) -> Result<bool, FsError> {
        match self.metadata(path) {
            Ok(m) => Ok(m.is_dir()),
            Err(FsError::NotFound { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Read a file as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Same as [`FsRead::read`](crate::FsRead::read), plus [`FsError::Io`]
    /// with [`io::ErrorKind::InvalidData`] if the content is not UTF-8.
    fn read_to_string(&self, path: &Path) -> Result<String, FsError> {
        let data = self.read(path)?;
        String::from_utf8(data).map_err(|e| FsError::Io {
            operation: "read_to_string",
            path: path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::InvalidData, e),
        })
    }

    /// Size of a file in bytes.
    fn file_size(&self, path: &Path) -> Result<u64, FsError> {
        Ok(self.metadata(path)?.size)
    }
}

impl<B: Fs + ?Sized> FsExt for B {}

#[cfg(feature = "serde")]
mod json {
    use super::*;
    use serde::de::DeserializeOwned;

    /// JSON extension methods, available with the `serde` feature.
    pub trait FsExtJson: Fs {
        /// Read a file and deserialize it as JSON.
        ///
        /// # Errors
        ///
        /// - `FsError::NotFound` if the file doesn't exist
        /// - `FsError::Deserialization` if JSON parsing failed
        fn read_json<T: DeserializeOwned>(&self, path: &Path) -> Result<T, FsError> {
            let data = self.read_to_string(path)?;
            serde_json::from_str(&data).map_err(|e| FsError::Deserialization(e.to_string()))
        }
    }

    impl<B: Fs + ?Sized> FsExtJson for B {}
}

#[cfg(feature = "serde")]
pub use json::FsExtJson;

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::{BundleFs, HostIo, MANIFEST_PATH, MemoryBundle};

    fn overlay() -> BundleFs {
        let bundle = MemoryBundle::new()
            .with(
                MANIFEST_PATH,
                "/bundle.vfs/etc/\n/bundle.vfs/etc/app.json\n/bundle.vfs/etc/blob.bin\n",
            )
            .with("/bundle.vfs/etc/app.json", r#"{"name":"demo","threads":4}"#)
            .with("/bundle.vfs/etc/blob.bin", [0xffu8, 0xfe, 0x00]);
        BundleFs::builder()
            .mount_point("/ov")
            .host_io(HostIo::None)
            .loader(bundle)
            .build()
            .unwrap()
    }

    #[test]
    fn exists_treats_missing_as_false() {
        let fs = overlay();
        assert!(fs.exists(Path::new("/ov/etc")).unwrap());
        assert!(fs.exists(Path::new("/ov/etc/app.json")).unwrap());
        assert!(!fs.exists(Path::new("/ov/etc/nope")).unwrap());
    }

    #[test]
    fn exists_surfaces_rejections() {
        let fs = overlay();
        let err = fs.exists(Path::new("/outside")).unwrap_err();
        assert!(matches!(err, FsError::HostIoDisabled { .. }));
    }

    #[test]
    fn kind_checks() {
        let fs = overlay();
        assert!(fs.is_file(Path::new("/ov/etc/app.json")).unwrap());
        assert!(!fs.is_file(Path::new("/ov/etc")).unwrap());
        assert!(fs.is_dir(Path::new("/ov/etc")).unwrap());
        assert!(!fs.is_dir(Path::new("/ov/missing")).unwrap());
    }

    #[test]
    fn read_to_string_rejects_binary() {
        let fs = overlay();
        assert!(fs
            .read_to_string(Path::new("/ov/etc/app.json"))
            .unwrap()
            .contains("demo"));
        let err = fs.read_to_string(Path::new("/ov/etc/blob.bin")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn file_size_from_metadata() {
        let fs = overlay();
        assert_eq!(fs.file_size(Path::new("/ov/etc/blob.bin")).unwrap(), 3);
    }

    #[test]
    fn fs_ext_available_on_dyn_fs() {
        let fs = overlay();
        let fs: &dyn Fs = &fs;
        assert!(fs.is_dir(Path::new("/ov/etc")).unwrap());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn read_json_deserializes() {
        let fs = overlay();
        let value: serde_json::Value = fs.read_json(Path::new("/ov/etc/app.json")).unwrap();
        assert_eq!(value["threads"], 4);

        let err = fs
            .read_json::<serde_json::Value>(Path::new("/ov/etc/blob.bin"))
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }
}
