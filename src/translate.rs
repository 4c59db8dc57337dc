//! # Path Translation
//!
//! Bidirectional mapping between resource space and platform space.
//!
//! ```text
//! resource space:  /bundle.vfs/lib/x.so      ('/'-separated, fixed root)
//!                        │  ▲
//!    resource_to_platform│  │platform_to_resource
//!                        ▼  │
//! platform space:  /bundle_vfs/lib/x.so      (mount point, host separator)
//! ```
//!
//! [`PathTranslator::is_in_overlay`] is the single gate that decides, for
//! every public operation, whether a path is served from the bundle or
//! handed to the delegate.

use std::path::{MAIN_SEPARATOR_STR, Path, PathBuf};

use crate::FsError;

/// Root of the bundle inside resource space.
pub const RESOURCE_ROOT: &str = "/bundle.vfs";

/// Separator used by resource names regardless of platform.
pub const RESOURCE_SEPARATOR: char = '/';

pub(crate) const PLATFORM_SEPARATOR: &str = MAIN_SEPARATOR_STR;

/// Maps resource names to platform paths under a mount point and back.
#[derive(Debug, Clone)]
pub struct PathTranslator {
    mount_point: PathBuf,
    mount_str: String,
    mount_key: String,
    case_insensitive: bool,
}

impl PathTranslator {
    /// Create a translator rooted at `mount_point`.
    ///
    /// # Errors
    ///
    /// - [`FsError::InvalidArgument`] if the mount point is relative or ends
    ///   with a separator
    pub fn new(mount_point: impl Into<PathBuf>, case_insensitive: bool) -> Result<Self, FsError> {
        let mount_point = mount_point.into();
        let mount_str = mount_point.to_string_lossy().into_owned();
        if mount_str.ends_with(PLATFORM_SEPARATOR)
            || mount_str.ends_with(RESOURCE_SEPARATOR)
            || !mount_point.is_absolute()
        {
            return Err(FsError::InvalidArgument {
                details: format!(
                    "mount point must be an absolute path without a trailing separator: '{mount_str}'"
                ),
            });
        }
        let mount_key = fold_case(&mount_str, case_insensitive);
        Ok(Self {
            mount_point,
            mount_str,
            mount_key,
            case_insensitive,
        })
    }

    /// The configured mount point.
    pub fn mount_point(&self) -> &Path {
        &self.mount_point
    }

    /// The mount point as a platform string.
    pub fn mount_str(&self) -> &str {
        &self.mount_str
    }

    /// Whether lookups fold case.
    pub fn is_case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    /// Convert a resource name under [`RESOURCE_ROOT`] into its platform path.
    ///
    /// A trailing `/` (directory marker) is preserved as a trailing platform
    /// separator.
    ///
    /// # Errors
    ///
    /// - [`FsError::InvalidArgument`] if `resource_path` is not strictly below
    ///   [`RESOURCE_ROOT`]
    pub fn resource_to_platform(&self, resource_path: &str) -> Result<String, FsError> {
        let rest = resource_path
            .strip_prefix(RESOURCE_ROOT)
            .and_then(|rest| rest.strip_prefix(RESOURCE_SEPARATOR))
            .ok_or_else(|| FsError::InvalidArgument {
                details: format!(
                    "resource path is expected to start with '{RESOURCE_ROOT}' but was '{resource_path}'"
                ),
            })?;

        let trimmed = rest.trim_end_matches(RESOURCE_SEPARATOR);
        let mut platform = self.mount_str.clone();
        if !trimmed.is_empty() {
            platform.push_str(PLATFORM_SEPARATOR);
            platform.push_str(&to_platform_separators(trimmed));
        }
        if rest.ends_with(RESOURCE_SEPARATOR) || rest.is_empty() {
            platform.push_str(PLATFORM_SEPARATOR);
        }
        Ok(platform)
    }

    /// Convert a platform path under the mount point back into a resource name.
    ///
    /// Any trailing separator is dropped.
    pub fn platform_to_resource(&self, platform_path: &str) -> String {
        debug_assert!(
            platform_path.starts_with(&self.mount_str),
            "{platform_path} is not under {}",
            self.mount_str
        );
        let rest = platform_path
            .strip_prefix(&self.mount_str)
            .unwrap_or(platform_path);
        let mut rest = to_resource_separators(rest);
        if rest.ends_with(RESOURCE_SEPARATOR) {
            rest.pop();
        }
        format!("{RESOURCE_ROOT}{rest}")
    }

    /// Whether `path`, once normalized, lies at or below the mount point.
    ///
    /// The comparison is component-aware, so `/bundle_vfsx` is not inside
    /// `/bundle_vfs`, and folds case when the overlay is case-insensitive.
    pub fn is_in_overlay(&self, path: &Path) -> bool {
        let normalized = path_clean::clean(path);
        let key = self.case_key(&normalized.to_string_lossy());
        match key.strip_prefix(&self.mount_key) {
            Some(rest) => rest.is_empty() || rest.starts_with(PLATFORM_SEPARATOR),
            None => false,
        }
    }

    /// Absolute, normalized form of an overlay path. Relative paths are
    /// resolved against the mount point.
    pub fn normalize(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path_clean::clean(path)
        } else {
            path_clean::clean(self.mount_point.join(path))
        }
    }

    /// Index key for `path`: normalized and case-folded when configured.
    pub fn lookup_key(&self, path: &Path) -> String {
        self.case_key(&self.normalize(path).to_string_lossy())
    }

    /// Index key for an already-normalized platform path string.
    pub fn case_key(&self, platform_path: &str) -> String {
        fold_case(platform_path, self.case_insensitive)
    }

    /// `platform_path` relative to the mount point, e.g. `lib/x.so`.
    pub fn relative_to_mount(&self, platform_path: &str) -> PathBuf {
        let rest = platform_path
            .strip_prefix(&self.mount_str)
            .unwrap_or(platform_path);
        PathBuf::from(rest.trim_start_matches(PLATFORM_SEPARATOR))
    }
}

fn fold_case(s: &str, case_insensitive: bool) -> String {
    if case_insensitive {
        s.to_lowercase()
    } else {
        s.to_owned()
    }
}

fn to_platform_separators(s: &str) -> String {
    if PLATFORM_SEPARATOR == "/" {
        s.to_owned()
    } else {
        s.replace(RESOURCE_SEPARATOR, PLATFORM_SEPARATOR)
    }
}

fn to_resource_separators(s: &str) -> String {
    if PLATFORM_SEPARATOR == "/" {
        s.to_owned()
    } else {
        s.replace(PLATFORM_SEPARATOR, "/")
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn translator() -> PathTranslator {
        PathTranslator::new("/ov", false).unwrap()
    }

    #[test]
    fn rejects_relative_mount_point() {
        let err = PathTranslator::new("ov", false).unwrap_err();
        assert!(matches!(err, FsError::InvalidArgument { .. }));
    }

    #[test]
    fn rejects_trailing_separator() {
        assert!(PathTranslator::new("/ov/", false).is_err());
        assert!(PathTranslator::new("/", false).is_err());
    }

    #[test]
    fn resource_to_platform_maps_files() {
        let t = translator();
        assert_eq!(
            t.resource_to_platform("/bundle.vfs/a/b/c.txt").unwrap(),
            "/ov/a/b/c.txt"
        );
    }

    #[test]
    fn resource_to_platform_keeps_directory_marker() {
        let t = translator();
        assert_eq!(t.resource_to_platform("/bundle.vfs/a/b/").unwrap(), "/ov/a/b/");
        assert_eq!(t.resource_to_platform("/bundle.vfs/").unwrap(), "/ov/");
    }

    #[test]
    fn resource_to_platform_rejects_foreign_roots() {
        let t = translator();
        for bad in ["/bundle.vfs", "/other/a.txt", "/bundle.vfsx/a.txt", ""] {
            let err = t.resource_to_platform(bad).unwrap_err();
            assert!(matches!(err, FsError::InvalidArgument { .. }), "{bad}");
        }
    }

    #[test]
    fn platform_to_resource_strips_trailing_separator() {
        let t = translator();
        assert_eq!(t.platform_to_resource("/ov/a/b/"), "/bundle.vfs/a/b");
        assert_eq!(t.platform_to_resource("/ov"), "/bundle.vfs");
    }

    #[test]
    fn round_trips_resource_paths() {
        let t = translator();
        for p in [
            "/bundle.vfs/a",
            "/bundle.vfs/a/b/c.txt",
            "/bundle.vfs/venv/lib/site-packages/pkg/_ext.so",
            "/bundle.vfs/Mixed Case/Name.PY",
        ] {
            let platform = t.resource_to_platform(p).unwrap();
            assert_eq!(t.platform_to_resource(&platform), p);
        }
    }

    #[test]
    fn is_in_overlay_checks_mount_prefix() {
        let t = translator();
        assert!(t.is_in_overlay(Path::new("/ov")));
        assert!(t.is_in_overlay(Path::new("/ov/")));
        assert!(t.is_in_overlay(Path::new("/ov/a/b")));
        assert!(t.is_in_overlay(Path::new("/elsewhere/../ov/a")));
        assert!(!t.is_in_overlay(Path::new("/ovx/a")));
        assert!(!t.is_in_overlay(Path::new("/tmp/a")));
        assert!(!t.is_in_overlay(Path::new("/ov/../tmp")));
        assert!(!t.is_in_overlay(Path::new("a/b")));
        assert!(!t.is_in_overlay(Path::new("/OV/a")));
    }

    #[test]
    fn is_in_overlay_folds_case_when_insensitive() {
        let t = PathTranslator::new("/Ov", true).unwrap();
        assert!(t.is_in_overlay(Path::new("/OV/a")));
        assert!(t.is_in_overlay(Path::new("/ov/a")));
        assert!(!t.is_in_overlay(Path::new("/ovx")));
    }

    #[test]
    fn lookup_key_normalizes_and_folds() {
        let t = PathTranslator::new("/ov", true).unwrap();
        assert_eq!(t.lookup_key(Path::new("/ov/A/./B/../C.txt")), "/ov/a/c.txt");
        assert_eq!(t.lookup_key(Path::new("a/b")), "/ov/a/b");
    }

    #[test]
    fn relative_to_mount_strips_prefix() {
        let t = translator();
        assert_eq!(t.relative_to_mount("/ov/lib/x.so"), PathBuf::from("lib/x.so"));
        assert_eq!(t.relative_to_mount("/ov"), PathBuf::from(""));
    }
}
