//! Error types for the bundle overlay.

use std::io;
use std::path::PathBuf;

/// Filesystem error type with contextual variants.
///
/// All error variants include relevant context (path, operation) where applicable.
/// Uses `#[non_exhaustive]` for forward compatibility.
///
/// # Examples
///
/// ```rust
/// use bundle_vfs::FsError;
/// use std::path::PathBuf;
///
/// let err = FsError::NotFound { path: PathBuf::from("/missing") };
/// assert!(err.to_string().contains("/missing"));
/// ```
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum FsError {
    // Path/File Errors
    /// Path does not exist in the overlay or the delegate.
    #[error("not found: {path}")]
    NotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// Expected a file but found a directory.
    #[error("not a file: {path}")]
    NotAFile {
        /// The path that is not a file.
        path: PathBuf,
    },

    /// Expected a directory but found a file.
    #[error("not a directory: {path}")]
    NotADirectory {
        /// The path that is not a directory.
        path: PathBuf,
    },

    /// Path already exists when it shouldn't.
    #[error("{operation}: already exists: {path}")]
    AlreadyExists {
        /// The path that already exists.
        path: PathBuf,
        /// The operation that failed.
        operation: &'static str,
    },

    // Permission/Access Errors
    /// Permission denied for operation.
    #[error("{operation}: permission denied: {path}")]
    PermissionDenied {
        /// The path where permission was denied.
        path: PathBuf,
        /// The operation that was denied.
        operation: &'static str,
    },

    /// Write attempted against a read-only filesystem.
    #[error("{operation}: read-only filesystem: {path}")]
    ReadOnly {
        /// The path the write targeted.
        path: PathBuf,
        /// The operation that was attempted.
        operation: &'static str,
    },

    /// Path lies outside the overlay and no host filesystem is configured.
    #[error("{operation}: filesystem without host I/O: {path}")]
    HostIoDisabled {
        /// The path outside the overlay.
        path: PathBuf,
        /// The operation that was attempted.
        operation: &'static str,
    },

    // Configuration Errors
    /// An argument was rejected (bad mount point, bad resource path).
    #[error("invalid argument: {details}")]
    InvalidArgument {
        /// What was wrong with the argument.
        details: String,
    },

    // Data Errors
    /// Deserialization error.
    #[error("deserialization error: {0}")]
    Deserialization(String),

    // Backend Errors
    /// Materializing a bundle entry to the real filesystem failed.
    #[error("error while extracting {path} to disk: {source}")]
    Extraction {
        /// The overlay path being extracted.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// I/O error with context.
    #[error("{operation} failed for {path}: {source}")]
    Io {
        /// The operation that failed.
        operation: &'static str,
        /// The path involved in the operation.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },
}

impl FsError {
    /// Wrap an I/O error raised while operating on `path`, keeping the
    /// specific variants for the common error kinds.
    pub fn from_io(operation: &'static str, path: impl Into<PathBuf>, error: io::Error) -> Self {
        let path = path.into();
        match error.kind() {
            io::ErrorKind::NotFound => FsError::NotFound { path },
            io::ErrorKind::PermissionDenied => FsError::PermissionDenied { path, operation },
            io::ErrorKind::AlreadyExists => FsError::AlreadyExists { path, operation },
            io::ErrorKind::NotADirectory => FsError::NotADirectory { path },
            io::ErrorKind::IsADirectory => FsError::NotAFile { path },
            io::ErrorKind::ReadOnlyFilesystem => FsError::ReadOnly { path, operation },
            _ => FsError::Io {
                operation,
                path,
                source: error,
            },
        }
    }

    /// The standard I/O condition this error surfaces as.
    pub fn kind(&self) -> io::ErrorKind {
        match self {
            FsError::NotFound { .. } => io::ErrorKind::NotFound,
            FsError::NotAFile { .. } => io::ErrorKind::IsADirectory,
            FsError::NotADirectory { .. } => io::ErrorKind::NotADirectory,
            FsError::AlreadyExists { .. } => io::ErrorKind::AlreadyExists,
            FsError::PermissionDenied { .. }
            | FsError::ReadOnly { .. }
            | FsError::HostIoDisabled { .. } => io::ErrorKind::PermissionDenied,
            FsError::InvalidArgument { .. } => io::ErrorKind::InvalidInput,
            FsError::Deserialization(_) => io::ErrorKind::InvalidData,
            FsError::Extraction { source, .. } | FsError::Io { source, .. } => source.kind(),
        }
    }

    /// Returns `true` for every rejection that is a permission condition:
    /// explicit denials, writes into the read-only overlay, and paths
    /// outside the overlay when host I/O is disabled.
    pub fn is_permission_denied(&self) -> bool {
        self.kind() == io::ErrorKind::PermissionDenied
    }
}

impl From<io::Error> for FsError {
    fn from(error: io::Error) -> Self {
        FsError::from_io("io", PathBuf::new(), error)
    }
}

impl From<FsError> for io::Error {
    fn from(error: FsError) -> Self {
        match error {
            FsError::Io { source, .. } => source,
            other => io::Error::new(other.kind(), other),
        }
    }
}
