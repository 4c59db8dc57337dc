//! The host filesystem, used as the overlay's delegate.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::{
    AccessMode, DirEntry, DirFilter, FileHandle, FileType, FsDir, FsError, FsPath, FsRead,
    FsWrite, Metadata, OpenFlags, Permissions, ReadDirIter,
};

/// [`Fs`](crate::Fs) over `std::fs`.
///
/// Paths are passed to the operating system unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeFs;

impl NativeFs {
    /// The host filesystem.
    pub fn new() -> Self {
        Self
    }
}

fn file_type(ft: fs::FileType) -> FileType {
    if ft.is_dir() {
        FileType::Directory
    } else if ft.is_symlink() {
        FileType::Symlink
    } else {
        FileType::File
    }
}

#[cfg(unix)]
fn permissions(meta: &fs::Metadata) -> (Permissions, u64) {
    use std::os::unix::fs::{MetadataExt, PermissionsExt};
    (
        Permissions::from_mode(meta.permissions().mode()),
        meta.nlink(),
    )
}

#[cfg(not(unix))]
fn permissions(meta: &fs::Metadata) -> (Permissions, u64) {
    let mode = if meta.permissions().readonly() {
        0o444
    } else {
        0o644
    };
    (Permissions::from_mode(mode), 1)
}

impl FsRead for NativeFs {
    fn check_access(&self, path: &Path, mode: AccessMode) -> Result<(), FsError> {
        let meta = fs::metadata(path).map_err(|e| FsError::from_io("check_access", path, e))?;
        if mode.write && meta.permissions().readonly() {
            return Err(FsError::PermissionDenied {
                path: path.to_path_buf(),
                operation: "check_access",
            });
        }
        Ok(())
    }

    fn metadata(&self, path: &Path) -> Result<Metadata, FsError> {
        let meta = fs::metadata(path).map_err(|e| FsError::from_io("metadata", path, e))?;
        let (permissions, nlink) = permissions(&meta);
        Ok(Metadata {
            file_type: file_type(meta.file_type()),
            size: meta.len(),
            permissions,
            created: meta.created().unwrap_or(SystemTime::UNIX_EPOCH),
            modified: meta.modified().unwrap_or(SystemTime::UNIX_EPOCH),
            accessed: meta.accessed().unwrap_or(SystemTime::UNIX_EPOCH),
            nlink,
        })
    }

    fn open(&self, path: &Path, flags: OpenFlags) -> Result<Box<dyn FileHandle>, FsError> {
        let read = flags.read || flags.is_empty();
        let file = OpenOptions::new()
            .read(read)
            .write(flags.write)
            .create(flags.create)
            .truncate(flags.truncate)
            .append(flags.append)
            .open(path)
            .map_err(|e| FsError::from_io("open", path, e))?;
        Ok(Box::new(file))
    }
}

impl FsWrite for NativeFs {
    fn create_dir(&self, path: &Path) -> Result<(), FsError> {
        fs::create_dir(path).map_err(|e| FsError::from_io("create_dir", path, e))
    }

    fn remove(&self, path: &Path) -> Result<(), FsError> {
        let meta = fs::symlink_metadata(path).map_err(|e| FsError::from_io("remove", path, e))?;
        if meta.is_dir() {
            fs::remove_dir(path)
        } else {
            fs::remove_file(path)
        }
        .map_err(|e| FsError::from_io("remove", path, e))
    }
}

impl FsDir for NativeFs {
    fn read_dir(&self, path: &Path, filter: DirFilter<'_>) -> Result<ReadDirIter, FsError> {
        let entries = fs::read_dir(path).map_err(|e| FsError::from_io("read_dir", path, e))?;
        let mut listed = Vec::new();
        for entry in entries {
            let item = entry.and_then(|entry| {
                let ft = entry.file_type()?;
                Ok(DirEntry {
                    name: entry.file_name().to_string_lossy().into_owned(),
                    path: entry.path(),
                    file_type: file_type(ft),
                })
            });
            match item {
                Ok(entry) if filter(entry.path.as_path()) => listed.push(Ok(entry)),
                Ok(_) => {}
                Err(e) => listed.push(Err(FsError::from_io("read_dir", path, e))),
            }
        }
        Ok(ReadDirIter::from_vec(listed))
    }
}

impl FsPath for NativeFs {
    fn to_absolute_path(&self, path: &Path) -> Result<PathBuf, FsError> {
        std::path::absolute(path).map_err(|e| FsError::from_io("to_absolute_path", path, e))
    }

    fn to_real_path(&self, path: &Path) -> Result<PathBuf, FsError> {
        fs::canonicalize(path).map_err(|e| FsError::from_io("to_real_path", path, e))
    }
}
