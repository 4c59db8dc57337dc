//! # Resource Loading
//!
//! The single collaborator contract the overlay consumes to reach bundle
//! bytes: `load_resource(name) -> bytes | NotFound`.
//!
//! Resource names are resource-space paths (`/`-separated, rooted at
//! [`RESOURCE_ROOT`](crate::RESOURCE_ROOT)).
//!
//! | Loader | Source |
//! |--------|--------|
//! | [`MemoryBundle`] | In-memory map, e.g. built from `include_bytes!` |
//! | [`DirectoryLoader`] | A bundle tree unpacked under a directory on disk |

use std::borrow::Cow;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::FsError;

/// Turns a logical resource name into its bytes.
///
/// Implementations must be pure: loading the same name twice returns the
/// same bytes. The overlay relies on this to tolerate redundant concurrent
/// loads.
pub trait ResourceLoader: Send + Sync {
    /// Load the full content of resource `name`.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotFound`] if the bundle has no such resource
    fn load_resource(&self, name: &str) -> Result<Vec<u8>, FsError>;
}

/// Resources held in memory.
///
/// ```rust
/// use bundle_vfs::{MemoryBundle, ResourceLoader};
///
/// let bundle = MemoryBundle::new()
///     .with("/bundle.vfs/fileslist.txt", "/bundle.vfs/a.txt\n")
///     .with("/bundle.vfs/a.txt", "hello");
/// assert_eq!(bundle.load_resource("/bundle.vfs/a.txt").unwrap(), b"hello");
/// ```
#[derive(Debug, Default)]
pub struct MemoryBundle {
    resources: HashMap<String, Cow<'static, [u8]>>,
    loads: AtomicUsize,
}

impl MemoryBundle {
    /// Create an empty bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a copy of `data`, replacing any previous content under `name`.
    pub fn with(mut self, name: impl Into<String>, data: impl AsRef<[u8]>) -> Self {
        self.insert(name, Cow::Owned(data.as_ref().to_vec()));
        self
    }

    /// Add borrowed static data without copying it.
    pub fn with_static(mut self, name: impl Into<String>, data: &'static [u8]) -> Self {
        self.insert(name, Cow::Borrowed(data));
        self
    }

    /// Add a resource in place.
    pub fn insert(&mut self, name: impl Into<String>, data: Cow<'static, [u8]>) {
        self.resources.insert(name.into(), data);
    }

    /// Number of successful or failed `load_resource` calls so far.
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::Relaxed)
    }
}

impl ResourceLoader for MemoryBundle {
    fn load_resource(&self, name: &str) -> Result<Vec<u8>, FsError> {
        self.loads.fetch_add(1, Ordering::Relaxed);
        self.resources
            .get(name)
            .map(|data| data.to_vec())
            .ok_or_else(|| FsError::NotFound {
                path: PathBuf::from(name),
            })
    }
}

/// Resources stored as files under a directory.
///
/// Resource `/bundle.vfs/a/b.txt` is read from `<root>/bundle.vfs/a/b.txt`.
/// Used when the bundle is packaged separately from the overlay.
#[derive(Debug, Clone)]
pub struct DirectoryLoader {
    root: PathBuf,
}

impl DirectoryLoader {
    /// Serve resources from `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory resources are read from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, name: &str) -> PathBuf {
        name.split('/')
            .filter(|segment| !segment.is_empty())
            .fold(self.root.clone(), |path, segment| path.join(segment))
    }
}

impl ResourceLoader for DirectoryLoader {
    fn load_resource(&self, name: &str) -> Result<Vec<u8>, FsError> {
        let path = self.resolve(name);
        if !path.is_file() {
            return Err(FsError::NotFound {
                path: PathBuf::from(name),
            });
        }
        std::fs::read(&path).map_err(|e| FsError::from_io("load_resource", path, e))
    }
}

impl<L: ResourceLoader + ?Sized> ResourceLoader for std::sync::Arc<L> {
    fn load_resource(&self, name: &str) -> Result<Vec<u8>, FsError> {
        (**self).load_resource(name)
    }
}
