//! # bundle-vfs
//!
//! A read-only virtual filesystem over an embedded resource bundle.
//!
//! An application ships its files (interpreter stdlib, installed packages,
//! sources, native libraries) inside one artifact and addresses them through
//! ordinary paths under a mount point such as `/bundle_vfs`. Nothing is
//! unpacked to disk except the entries the operating system must open
//! itself, like shared libraries, which are extracted lazily into a
//! temporary directory.
//!
//! ---
//!
//! ## Quick Start
//!
//! ```rust
//! use bundle_vfs::{BundleFs, FsExt, FsRead, HostIo, MemoryBundle};
//! use std::path::Path;
//!
//! let bundle = MemoryBundle::new()
//!     .with("/bundle.vfs/fileslist.txt", "/bundle.vfs/home/\n/bundle.vfs/home/motd\n")
//!     .with("/bundle.vfs/home/motd", "welcome");
//!
//! let fs = BundleFs::builder()
//!     .mount_point("/bundle_vfs")
//!     .host_io(HostIo::None)
//!     .loader(bundle)
//!     .build()?;
//!
//! assert_eq!(fs.read_to_string(&fs.home_path().join("motd"))?, "welcome");
//! assert!(fs.metadata(Path::new("/etc/passwd")).is_err());
//! # Ok::<(), bundle_vfs::FsError>(())
//! ```
//!
//! ---
//!
//! ## The Bundle
//!
//! Resources live in *resource space*, `/`-separated names under
//! [`RESOURCE_ROOT`]. The resource at [`MANIFEST_PATH`] lists every entry,
//! one per line, directories with a trailing `/`. A [`ResourceLoader`] turns
//! names into bytes:
//!
//! | Loader | Source |
//! |--------|--------|
//! | [`MemoryBundle`] | In-memory map, e.g. from `include_bytes!` |
//! | [`DirectoryLoader`] | A bundle tree on disk |
//!
//! ---
//!
//! ## Routing
//!
//! Every operation first asks whether its path lies under the mount point.
//!
//! | Path | [`HostIo::None`] | [`HostIo::Read`] | [`HostIo::ReadWrite`] |
//! |------|------------------|------------------|-----------------------|
//! | under mount point | bundle, read-only | bundle, read-only | bundle, read-only |
//! | elsewhere | [`FsError::HostIoDisabled`] | host, writes fail | host |
//!
//! ---
//!
//! ## Traits
//!
//! | Trait | Operations |
//! |-------|------------|
//! | [`FsRead`] | `check_access`, `metadata`, `open`, `read` |
//! | [`FsWrite`] | `create_dir`, `remove` |
//! | [`FsDir`] | `read_dir` |
//! | [`FsPath`] | `to_absolute_path`, `to_real_path` |
//! | [`Fs`] | all of the above (blanket) |
//! | [`FsExt`] | `exists`, `is_file`, `is_dir`, `read_to_string`, `file_size` |
//!
//! ---
//!
//! ## Logging
//!
//! The crate emits [`tracing`](https://docs.rs/tracing) events and never
//! installs a subscriber.
//!
//! ---
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `serde` | Serialization for [`Metadata`], [`DirEntry`], [`OverlayConfig`], and `FsExtJson` |

// Private modules
mod config;
mod error;
mod ext;
mod extract;
mod layer;
mod loader;
mod manifest;
mod native;
mod overlay;
mod traits;
mod translate;
mod types;

// Public re-exports - error types
pub use error::FsError;

// Public re-exports - core types
pub use types::{AccessMode, DirEntry, FileType, HostIo, Metadata, OpenFlags, Permissions};

// Public re-exports - traits
pub use traits::{DirFilter, FileHandle, Fs, FsDir, FsPath, FsRead, FsWrite, ReadDirIter};

// Public re-exports - the overlay
pub use config::{BundleFsBuilder, EXTRACT_ON_STARTUP_ENV, OverlayConfig};
pub use extract::{DEFAULT_EXTRACT_EXTENSIONS, ExtractFilter, extract_resources};
pub use loader::{DirectoryLoader, MemoryBundle, ResourceLoader};
pub use manifest::{DirectoryEntry, Entry, FileEntry, MANIFEST_PATH, ManifestIndex, ManifestTree};
pub use overlay::{BundleFile, BundleFs};
pub use translate::{PathTranslator, RESOURCE_ROOT, RESOURCE_SEPARATOR};

// Public re-exports - infrastructure
pub use ext::FsExt;
pub use layer::{Layer, LayerExt, ReadOnlyFs, ReadOnlyLayer};
pub use native::NativeFs;

// Conditional re-exports
#[cfg(feature = "serde")]
pub use ext::FsExtJson;
