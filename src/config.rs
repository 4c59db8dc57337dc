//! # Configuration
//!
//! [`BundleFsBuilder`] collects the construction parameters of a
//! [`BundleFs`]; [`OverlayConfig`] is the plain-data subset of them, which
//! can be deserialized from a settings file with the `serde` feature.
//!
//! | Setting | Default |
//! |---------|---------|
//! | mount point | `/bundle_vfs` (Unix), `X:\bundle_vfs` (Windows) |
//! | host I/O | [`HostIo::ReadWrite`] |
//! | case-insensitive lookups | on Windows only |
//! | extraction filter | [`ExtractFilter::native_libraries`] |
//! | extract on startup | `BUNDLE_VFS_EXTRACT_ON_STARTUP=true` |

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::extract::{ExtractFilter, Extractor};
use crate::{
    BundleFs, Fs, FsError, HostIo, LayerExt, NativeFs, PathTranslator, ReadOnlyLayer,
    ResourceLoader,
};

/// Environment variable enabling eager extraction while the index is built.
pub const EXTRACT_ON_STARTUP_ENV: &str = "BUNDLE_VFS_EXTRACT_ON_STARTUP";

#[cfg(windows)]
const DEFAULT_MOUNT_POINT: &str = "X:\\bundle_vfs";
#[cfg(not(windows))]
const DEFAULT_MOUNT_POINT: &str = "/bundle_vfs";

/// Serializable overlay settings.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct OverlayConfig {
    /// Absolute mount point, without a trailing separator.
    pub mount_point: PathBuf,
    /// Access to paths outside the mount point.
    pub host_io: HostIo,
    /// Fold case in overlay lookups.
    pub case_insensitive: bool,
    /// Extract every matching entry while the index is built.
    pub extract_on_startup: bool,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            mount_point: PathBuf::from(DEFAULT_MOUNT_POINT),
            host_io: HostIo::default(),
            case_insensitive: cfg!(windows),
            extract_on_startup: extract_on_startup_from_env(),
        }
    }
}

fn extract_on_startup_from_env() -> bool {
    std::env::var(EXTRACT_ON_STARTUP_ENV).is_ok_and(|v| v == "true")
}

/// Builder for [`BundleFs`].
///
/// ```rust
/// use bundle_vfs::{BundleFs, HostIo, MemoryBundle};
/// use std::path::Path;
///
/// let fs = BundleFs::builder()
///     .mount_point("/opt/app")
///     .host_io(HostIo::Read)
///     .extract_filter(|p: &Path| p.extension().is_some_and(|e| e == "jar"))
///     .loader(MemoryBundle::new())
///     .build()?;
/// assert_eq!(fs.mount_point(), Path::new("/opt/app"));
/// # Ok::<(), bundle_vfs::FsError>(())
/// ```
pub struct BundleFsBuilder {
    config: OverlayConfig,
    extract_filter: Option<ExtractFilter>,
    loader: Option<Arc<dyn ResourceLoader>>,
    host: Option<Box<dyn Fs>>,
}

impl BundleFs {
    /// Start configuring an overlay.
    pub fn builder() -> BundleFsBuilder {
        BundleFsBuilder::from_config(OverlayConfig::default())
    }
}

impl Default for BundleFsBuilder {
    fn default() -> Self {
        BundleFs::builder()
    }
}

impl BundleFsBuilder {
    /// A builder seeded with `config` and the default extraction filter.
    pub fn from_config(config: OverlayConfig) -> Self {
        Self {
            config,
            extract_filter: Some(ExtractFilter::native_libraries()),
            loader: None,
            host: None,
        }
    }

    /// Where the bundle appears. Must be absolute, without a trailing separator.
    pub fn mount_point(mut self, mount_point: impl Into<PathBuf>) -> Self {
        self.config.mount_point = mount_point.into();
        self
    }

    /// Access to paths outside the mount point.
    pub fn host_io(mut self, host_io: HostIo) -> Self {
        self.config.host_io = host_io;
        self
    }

    /// Fold case in overlay lookups.
    pub fn case_insensitive(mut self, case_insensitive: bool) -> Self {
        self.config.case_insensitive = case_insensitive;
        self
    }

    /// Also extract paths matching `filter`.
    ///
    /// The default native-library filter stays in effect; use
    /// [`no_extraction`](Self::no_extraction) to turn extraction off.
    pub fn extract_filter(mut self, filter: impl Fn(&Path) -> bool + Send + Sync + 'static) -> Self {
        self.extract_filter = Some(ExtractFilter::with_default(filter));
        self
    }

    /// Never extract anything.
    pub fn no_extraction(mut self) -> Self {
        self.extract_filter = None;
        self
    }

    /// Extract every matching entry while the index is built rather than on
    /// first access.
    pub fn extract_on_startup(mut self, extract_on_startup: bool) -> Self {
        self.config.extract_on_startup = extract_on_startup;
        self
    }

    /// Where bundle resources are loaded from.
    pub fn loader(mut self, loader: impl ResourceLoader + 'static) -> Self {
        self.loader = Some(Arc::new(loader));
        self
    }

    /// Share a loader with other owners.
    pub fn shared_loader(mut self, loader: Arc<dyn ResourceLoader>) -> Self {
        self.loader = Some(loader);
        self
    }

    /// Replace the host filesystem used outside the mount point.
    ///
    /// Defaults to [`NativeFs`]. Ignored with [`HostIo::None`]; wrapped in
    /// [`ReadOnlyFs`](crate::ReadOnlyFs) with [`HostIo::Read`].
    pub fn host_fs(mut self, host: impl Fs + 'static) -> Self {
        self.host = Some(Box::new(host));
        self
    }

    /// Validate the configuration and create the overlay.
    ///
    /// # Errors
    ///
    /// - [`FsError::InvalidArgument`] if the mount point is relative or ends
    ///   with a separator, or no loader was configured
    pub fn build(self) -> Result<BundleFs, FsError> {
        let config = self.config;
        let translator = PathTranslator::new(config.mount_point, config.case_insensitive)?;
        let loader = self.loader.ok_or_else(|| FsError::InvalidArgument {
            details: "no resource loader configured".to_owned(),
        })?;

        let host: Box<dyn Fs> = self.host.unwrap_or_else(|| Box::new(NativeFs::new()));
        let host: Option<Box<dyn Fs>> = match config.host_io {
            HostIo::None => None,
            HostIo::Read => Some(Box::new(host.layer(ReadOnlyLayer))),
            HostIo::ReadWrite => Some(host),
        };

        debug!(
            mount_point = %translator.mount_point().display(),
            host_io = ?config.host_io,
            case_insensitive = config.case_insensitive,
            extract_on_startup = config.extract_on_startup,
            extraction = self.extract_filter.is_some(),
            "bundle filesystem configured"
        );

        Ok(BundleFs::from_parts(
            translator,
            loader,
            Extractor::new(self.extract_filter),
            config.extract_on_startup,
            config.host_io,
            host,
        ))
    }
}

impl fmt::Debug for BundleFsBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BundleFsBuilder")
            .field("config", &self.config)
            .field("extract_filter", &self.extract_filter)
            .field("loader", &self.loader.is_some())
            .field("host", &self.host.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryBundle;

    #[test]
    fn defaults_follow_platform() {
        let config = OverlayConfig::default();
        assert_eq!(config.mount_point, PathBuf::from(DEFAULT_MOUNT_POINT));
        assert_eq!(config.host_io, HostIo::ReadWrite);
        assert_eq!(config.case_insensitive, cfg!(windows));
    }

    #[test]
    fn default_builder_builds() {
        let fs = BundleFs::builder().loader(MemoryBundle::new()).build().unwrap();
        assert_eq!(fs.mount_point(), Path::new(DEFAULT_MOUNT_POINT));
        assert_eq!(fs.host_io(), HostIo::ReadWrite);
    }

    #[test]
    fn read_host_io_layers_the_host_read_only() {
        use crate::{FsRead, FsWrite};

        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("seen.txt"), b"host").unwrap();
        let fs = BundleFs::builder()
            .host_io(HostIo::Read)
            .host_fs(NativeFs::new())
            .loader(MemoryBundle::new())
            .build()
            .unwrap();

        assert_eq!(fs.read(&dir.path().join("seen.txt")).unwrap(), b"host");
        let err = fs.create_dir(&dir.path().join("new")).unwrap_err();
        assert!(matches!(err, FsError::ReadOnly { .. }));
        assert!(!dir.path().join("new").exists());
    }

    #[test]
    fn loader_is_required() {
        let err = BundleFs::builder().build().unwrap_err();
        assert!(matches!(err, FsError::InvalidArgument { .. }));
    }

    #[test]
    fn rejects_bad_mount_points() {
        for mount in ["relative/dir", "/trailing/"] {
            let err = BundleFs::builder()
                .mount_point(mount)
                .loader(MemoryBundle::new())
                .build()
                .unwrap_err();
            assert!(matches!(err, FsError::InvalidArgument { .. }), "{mount}");
        }
    }

    #[test]
    fn from_config_keeps_settings() {
        let config = OverlayConfig {
            mount_point: PathBuf::from(DEFAULT_MOUNT_POINT).with_file_name("other_vfs"),
            host_io: HostIo::None,
            case_insensitive: true,
            extract_on_startup: false,
        };
        let fs = BundleFsBuilder::from_config(config.clone())
            .loader(MemoryBundle::new())
            .build()
            .unwrap();
        assert_eq!(fs.mount_point(), config.mount_point.as_path());
        assert_eq!(fs.host_io(), HostIo::None);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn config_deserializes_with_defaults() {
        let config: OverlayConfig =
            serde_json::from_str(r#"{ "mount_point": "/srv/vfs", "host_io": "read" }"#).unwrap();
        assert_eq!(config.mount_point, PathBuf::from("/srv/vfs"));
        assert_eq!(config.host_io, HostIo::Read);
        assert_eq!(config.case_insensitive, cfg!(windows));
    }
}
