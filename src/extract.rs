//! # Extraction
//!
//! Materializes selected bundle entries into a real temporary directory so
//! the operating system can open them directly (the dynamic loader cannot
//! map a library out of memory).
//!
//! The temporary directory is created on the first extraction and removed
//! recursively by [`Extractor::close`], which also runs on drop.
//!
//! ```text
//! /bundle_vfs/venv/lib/site-packages/pkg/_ext.so
//!         │ extract (top-level)
//!         ▼
//! <tmp>/bundle-vfsxXXXX/venv/lib/site-packages/pkg/_ext.so
//!         + every file under /bundle_vfs/venv/lib/site-packages/pkg.libs/
//! ```

use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use tempfile::{NamedTempFile, TempDir};
use tracing::{debug, error, trace, warn};

use crate::manifest::{Entry, FileEntry, MANIFEST_PATH, ManifestTree};
use crate::translate::RESOURCE_SEPARATOR;
use crate::{FsError, PathTranslator, RESOURCE_ROOT, ResourceLoader};

/// Extensions the default filter extracts: shared objects, dynamic
/// libraries, Python extension modules, DLLs and fonts.
pub const DEFAULT_EXTRACT_EXTENSIONS: [&str; 5] = [".so", ".dylib", ".pyd", ".dll", ".ttf"];

const TEMP_DIR_PREFIX: &str = "bundle-vfsx";
const PACKAGE_ROOT: &str = "site-packages";
const LIBS_SUFFIX: &str = ".libs";
#[cfg(unix)]
const EXTRACTED_FILE_MODE: u32 = 0o644;

/// Predicate over platform paths deciding what gets extracted.
#[derive(Clone)]
pub struct ExtractFilter(Arc<dyn Fn(&Path) -> bool + Send + Sync>);

impl ExtractFilter {
    /// A filter from an arbitrary predicate, used as is.
    pub fn new(predicate: impl Fn(&Path) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(predicate))
    }

    /// Matches [`DEFAULT_EXTRACT_EXTENSIONS`].
    pub fn native_libraries() -> Self {
        Self::new(is_native_library)
    }

    /// The default filter widened by `predicate`.
    pub fn with_default(predicate: impl Fn(&Path) -> bool + Send + Sync + 'static) -> Self {
        Self::new(move |path| predicate(path) || is_native_library(path))
    }

    /// Apply the filter.
    pub fn matches(&self, path: &Path) -> bool {
        (self.0)(path)
    }
}

impl Default for ExtractFilter {
    fn default() -> Self {
        Self::native_libraries()
    }
}

impl fmt::Debug for ExtractFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ExtractFilter(..)")
    }
}

fn is_native_library(path: &Path) -> bool {
    let path = path.to_string_lossy();
    DEFAULT_EXTRACT_EXTENSIONS
        .iter()
        .any(|ext| path.ends_with(ext))
}

#[derive(Debug)]
enum ExtractDir {
    Pending,
    Active(TempDir),
    Closed,
}

/// Read-only view of the bundle an extraction works against.
#[derive(Clone, Copy)]
pub(crate) struct BundleView<'a> {
    pub(crate) tree: &'a ManifestTree,
    pub(crate) translator: &'a PathTranslator,
    pub(crate) loader: &'a dyn ResourceLoader,
}

impl<'a> BundleView<'a> {
    fn entry(&self, path: &Path) -> Option<&'a Entry> {
        self.tree.get(&self.translator.lookup_key(path))
    }
}

/// Owns the extraction directory and the filter deciding what goes there.
#[derive(Debug)]
pub struct Extractor {
    filter: Option<ExtractFilter>,
    dir: Mutex<ExtractDir>,
    writes: AtomicUsize,
}

impl Extractor {
    /// An extractor applying `filter`; `None` disables extraction.
    pub fn new(filter: Option<ExtractFilter>) -> Self {
        Self {
            filter,
            dir: Mutex::new(ExtractDir::Pending),
            writes: AtomicUsize::new(0),
        }
    }

    /// Whether `path` is selected for extraction.
    pub fn should_extract(&self, path: &Path) -> bool {
        let extract = self.filter.as_ref().is_some_and(|f| f.matches(path));
        trace!(path = %path.display(), extract, "should_extract");
        extract
    }

    /// Number of files written to disk so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::Relaxed)
    }

    /// The extraction directory, if it has been created and not closed.
    pub fn extract_dir(&self) -> Option<PathBuf> {
        match &*self.dir.lock() {
            ExtractDir::Active(dir) => Some(dir.path().to_path_buf()),
            ExtractDir::Pending | ExtractDir::Closed => None,
        }
    }

    fn root(&self, path: &Path) -> Result<PathBuf, FsError> {
        let mut dir = self.dir.lock();
        match &*dir {
            ExtractDir::Active(tmp) => Ok(tmp.path().to_path_buf()),
            ExtractDir::Pending => {
                let tmp = tempfile::Builder::new()
                    .prefix(TEMP_DIR_PREFIX)
                    .tempdir()
                    .map_err(|source| extraction_failed(path, source))?;
                debug!(dir = %tmp.path().display(), "created extraction directory");
                let root = tmp.path().to_path_buf();
                *dir = ExtractDir::Active(tmp);
                Ok(root)
            }
            ExtractDir::Closed => Err(extraction_failed(
                path,
                io::Error::other("extraction directory closed"),
            )),
        }
    }

    /// Extract the entry at `path` and return its real path.
    ///
    /// Returns `Ok(None)` when no entry exists for `path`; callers fall back
    /// to the overlay path. An already extracted target is returned without
    /// rewriting it. Extracting a file inside an installed package also
    /// pulls in the package's sibling `<package>.libs` directory.
    ///
    /// # Errors
    ///
    /// - [`FsError::Extraction`] if writing to disk fails or the extractor
    ///   was closed
    pub(crate) fn extract(
        &self,
        bundle: BundleView<'_>,
        path: &Path,
    ) -> Result<Option<PathBuf>, FsError> {
        self.extract_path(bundle, path, true)
    }

    fn extract_path(
        &self,
        bundle: BundleView<'_>,
        path: &Path,
        pull_libs: bool,
    ) -> Result<Option<PathBuf>, FsError> {
        let Some(entry) = bundle.entry(path) else {
            warn!(path = %path.display(), "no bundle entry to extract");
            return Ok(None);
        };
        let target = self
            .root(path)?
            .join(bundle.translator.relative_to_mount(entry.platform_path()));
        if target.exists() {
            return Ok(Some(target));
        }

        match entry {
            Entry::File(file) => {
                self.write_file(bundle, file, &target)?;
                if pull_libs {
                    if let Some(libs) = package_libs_dir(Path::new(file.platform_path())) {
                        self.extract_tree(bundle, &libs)?;
                    }
                }
            }
            Entry::Directory(_) => {
                fs::create_dir_all(&target).map_err(|source| extraction_failed(path, source))?;
            }
        }
        Ok(Some(target))
    }

    fn write_file(
        &self,
        bundle: BundleView<'_>,
        file: &FileEntry,
        target: &Path,
    ) -> Result<(), FsError> {
        let path = Path::new(file.platform_path());
        let data = file.content(bundle.loader)?;
        write_atomically(target, &data).map_err(|source| extraction_failed(path, source))?;
        self.writes.fetch_add(1, Ordering::Relaxed);
        trace!(from = %path.display(), to = %target.display(), "extracted");
        Ok(())
    }

    fn extract_tree(&self, bundle: BundleView<'_>, path: &Path) -> Result<(), FsError> {
        match bundle.entry(path) {
            Some(Entry::File(_)) => {
                self.extract_path(bundle, path, false)?;
            }
            Some(Entry::Directory(dir)) => {
                for child in bundle.tree.children(dir) {
                    self.extract_tree(bundle, Path::new(child.platform_path()))?;
                }
            }
            None => {}
        }
        Ok(())
    }

    /// Remove the extraction directory and everything in it.
    ///
    /// Safe to call repeatedly and when nothing was ever extracted. Later
    /// extractions fail. Deletion errors are logged, not returned.
    pub fn close(&self) {
        let previous = std::mem::replace(&mut *self.dir.lock(), ExtractDir::Closed);
        if let ExtractDir::Active(tmp) = previous {
            let dir = tmp.path().to_path_buf();
            match tmp.close() {
                Ok(()) => debug!(dir = %dir.display(), "removed extraction directory"),
                Err(e) => warn!(dir = %dir.display(), error = %e, "could not delete extraction directory"),
            }
        }
    }
}

impl Drop for Extractor {
    fn drop(&mut self) {
        self.close();
    }
}

/// Readers racing an extraction see either no file or the complete one.
fn write_atomically(target: &Path, data: &[u8]) -> io::Result<()> {
    let parent = target
        .parent()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "no parent directory"))?;
    fs::create_dir_all(parent)?;
    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(data)?;
    set_extracted_permissions(tmp.as_file())?;
    tmp.persist(target).map_err(|e| e.error)?;
    Ok(())
}

/// Temp files start out owner-only; extracted files must be readable by
/// other processes of the application.
#[cfg(unix)]
fn set_extracted_permissions(file: &fs::File) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(fs::Permissions::from_mode(EXTRACTED_FILE_MODE))
}

#[cfg(not(unix))]
fn set_extracted_permissions(_file: &fs::File) -> io::Result<()> {
    Ok(())
}

fn extraction_failed(path: &Path, source: io::Error) -> FsError {
    error!(path = %path.display(), error = %source, "error while extracting to disk");
    FsError::Extraction {
        path: path.to_path_buf(),
        source,
    }
}

/// `<pkg>.libs` for a path below `.../site-packages/<pkg>/...`.
fn package_libs_dir(path: &Path) -> Option<PathBuf> {
    let mut package: Option<&Path> = None;
    for ancestor in path.ancestors().skip(1) {
        if ancestor.file_name().is_some_and(|name| name == PACKAGE_ROOT) {
            let mut libs = package?.as_os_str().to_owned();
            libs.push(LIBS_SUFFIX);
            return Some(PathBuf::from(libs));
        }
        package = Some(ancestor);
    }
    None
}

/// Write every bundle entry under `target`, preserving the bundle layout.
///
/// Reads the manifest directly and does not need (or build) the index.
///
/// # Errors
///
/// - [`FsError::NotFound`] if a listed resource is missing; a missing
///   manifest only logs a warning
/// - [`FsError::Extraction`] if writing to disk fails
pub fn extract_resources(loader: &dyn ResourceLoader, target: &Path) -> Result<(), FsError> {
    debug!(target = %target.display(), "extracting all bundle resources");
    let manifest = match loader.load_resource(MANIFEST_PATH) {
        Ok(manifest) => manifest,
        Err(FsError::NotFound { .. }) => {
            warn!(manifest = MANIFEST_PATH, "bundle manifest missing; nothing to extract");
            return Ok(());
        }
        Err(e) => return Err(e),
    };
    let manifest = String::from_utf8_lossy(&manifest);

    for line in manifest.lines().filter(|line| !line.is_empty()) {
        let Some(relative) = line
            .strip_prefix(RESOURCE_ROOT)
            .and_then(|rest| rest.strip_prefix(RESOURCE_SEPARATOR))
        else {
            warn!(line, "skipping manifest line outside the bundle root");
            continue;
        };
        let dest = relative
            .split(RESOURCE_SEPARATOR)
            .filter(|segment| !segment.is_empty())
            .fold(target.to_path_buf(), |path, segment| path.join(segment));

        if line.ends_with(RESOURCE_SEPARATOR) {
            fs::create_dir_all(&dest).map_err(|source| extraction_failed(&dest, source))?;
            continue;
        }
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).map_err(|source| extraction_failed(&dest, source))?;
        }
        trace!(resource = line, to = %dest.display(), "extract resource");
        let data = loader.load_resource(line)?;
        fs::write(&dest, data).map_err(|source| extraction_failed(&dest, source))?;
    }
    Ok(())
}
