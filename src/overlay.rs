//! # Bundle Overlay
//!
//! [`BundleFs`] serves a read-only resource bundle under a mount point and
//! hands every other path to a host filesystem.
//!
//! ```text
//!                 ┌──────── is_in_overlay? ────────┐
//!                 │ yes                            │ no
//!                 ▼                                ▼
//!   manifest index ─▶ entry ─▶ bytes     host delegate (HostIo::Read / ReadWrite)
//!                      │                   or HostIoDisabled (HostIo::None)
//!                      └▶ extraction (to_absolute_path / to_real_path)
//! ```
//!
//! Every write against the overlay fails with [`FsError::ReadOnly`].

use std::fmt;
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{error, trace};

use crate::extract::{BundleView, Extractor};
use crate::manifest::{Entry, ManifestIndex, ManifestTree};
use crate::{
    AccessMode, DirEntry, DirFilter, FileHandle, FileType, Fs, FsDir, FsError, FsPath, FsRead,
    FsWrite, HostIo, Metadata, OpenFlags, PathTranslator, ReadDirIter, ResourceLoader,
};

const HOME_DIR: &str = "home";
const VENV_DIR: &str = "venv";
const SRC_DIR: &str = "src";

/// Read-only filesystem over a resource bundle, with optional host delegation.
///
/// Build one with [`BundleFs::builder`]:
///
/// ```rust
/// use bundle_vfs::{BundleFs, FsDir, FsRead, HostIo, MemoryBundle};
/// use std::path::Path;
///
/// let bundle = MemoryBundle::new()
///     .with("/bundle.vfs/fileslist.txt", "/bundle.vfs/src/\n/bundle.vfs/src/main.py\n")
///     .with("/bundle.vfs/src/main.py", "print('hi')");
///
/// let fs = BundleFs::builder()
///     .mount_point("/app")
///     .host_io(HostIo::None)
///     .loader(bundle)
///     .build()?;
///
/// assert_eq!(fs.read(Path::new("/app/src/main.py"))?, b"print('hi')");
/// let names: Vec<_> = fs
///     .read_dir(Path::new("/app/src"), &|_| true)?
///     .map(|e| e.map(|e| e.name))
///     .collect::<Result<_, _>>()?;
/// assert_eq!(names, ["main.py"]);
/// # Ok::<(), bundle_vfs::FsError>(())
/// ```
///
/// Dropping the overlay (or calling [`close`](BundleFs::close)) removes
/// every extracted file.
pub struct BundleFs {
    translator: PathTranslator,
    loader: Arc<dyn ResourceLoader>,
    index: ManifestIndex,
    extractor: Extractor,
    extract_on_startup: bool,
    host_io: HostIo,
    host: Option<Box<dyn Fs>>,
}

enum Route<'a> {
    Overlay,
    Host(&'a dyn Fs),
}

impl BundleFs {
    pub(crate) fn from_parts(
        translator: PathTranslator,
        loader: Arc<dyn ResourceLoader>,
        extractor: Extractor,
        extract_on_startup: bool,
        host_io: HostIo,
        host: Option<Box<dyn Fs>>,
    ) -> Self {
        Self {
            translator,
            loader,
            index: ManifestIndex::new(),
            extractor,
            extract_on_startup,
            host_io,
            host,
        }
    }

    /// The configured mount point.
    pub fn mount_point(&self) -> &Path {
        self.translator.mount_point()
    }

    /// The configured host I/O mode.
    pub fn host_io(&self) -> HostIo {
        self.host_io
    }

    /// Whether `path` is served from the bundle.
    pub fn is_in_overlay(&self, path: &Path) -> bool {
        self.translator.is_in_overlay(path)
    }

    /// Platform path of a bundle resource name.
    ///
    /// # Errors
    ///
    /// - [`FsError::InvalidArgument`] if `resource_path` is not below the bundle root
    pub fn resource_to_platform(&self, resource_path: &str) -> Result<PathBuf, FsError> {
        self.translator
            .resource_to_platform(resource_path)
            .map(PathBuf::from)
    }

    /// Platform path of the bundled `home` tree.
    pub fn home_path(&self) -> PathBuf {
        self.mount_point().join(HOME_DIR)
    }

    /// Platform path of the bundled virtual environment.
    pub fn venv_path(&self) -> PathBuf {
        self.mount_point().join(VENV_DIR)
    }

    /// Platform path of the bundled application sources.
    pub fn src_path(&self) -> PathBuf {
        self.mount_point().join(SRC_DIR)
    }

    /// Number of files written to the extraction directory so far.
    pub fn extracted_count(&self) -> usize {
        self.extractor.write_count()
    }

    /// The extraction directory, once something has been extracted.
    pub fn extract_dir(&self) -> Option<PathBuf> {
        self.extractor.extract_dir()
    }

    /// Write the whole bundle under `target`, preserving its layout.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotFound`] if the manifest or a listed resource is missing
    /// - [`FsError::Extraction`] if writing to disk fails
    pub fn extract_resources(&self, target: &Path) -> Result<(), FsError> {
        crate::extract::extract_resources(self.loader.as_ref(), target)
    }

    /// Delete the extraction directory. Idempotent; also runs on drop.
    pub fn close(&self) {
        self.extractor.close();
    }

    fn tree(&self) -> Result<&ManifestTree, FsError> {
        let (tree, built_here) = self.index.ensure_built(&self.translator, self.loader.as_ref());
        if built_here && self.extract_on_startup {
            self.extract_matching(tree)?;
        }
        Ok(tree)
    }

    /// Extract every file the filter selects, continuing past failures.
    fn extract_matching(&self, tree: &ManifestTree) -> Result<(), FsError> {
        let mut failed = 0usize;
        for file in tree.files() {
            let path = Path::new(file.platform_path());
            if !self.extractor.should_extract(path) {
                continue;
            }
            if let Err(e) = self.extractor.extract(self.view(tree), path) {
                error!(path = %path.display(), error = %e, "eager extraction failed");
                failed += 1;
            }
        }
        if failed == 0 {
            return Ok(());
        }
        Err(FsError::Extraction {
            path: self.translator.mount_point().to_path_buf(),
            source: io::Error::other(format!(
                "{failed} bundle entries could not be extracted at startup"
            )),
        })
    }

    fn view<'a>(&'a self, tree: &'a ManifestTree) -> BundleView<'a> {
        BundleView {
            tree,
            translator: &self.translator,
            loader: self.loader.as_ref(),
        }
    }

    fn entry(&self, path: &Path) -> Result<Option<&Entry>, FsError> {
        let tree = self.tree()?;
        Ok(tree.get(&self.translator.lookup_key(path)))
    }

    fn existing(&self, path: &Path) -> Result<&Entry, FsError> {
        self.entry(path)?.ok_or_else(|| FsError::NotFound {
            path: path.to_path_buf(),
        })
    }

    fn route(&self, path: &Path, operation: &'static str) -> Result<Route<'_>, FsError> {
        if self.translator.is_in_overlay(path) {
            trace!(operation, path = %path.display(), "overlay");
            return Ok(Route::Overlay);
        }
        match &self.host {
            Some(host) => {
                trace!(operation, path = %path.display(), "delegated");
                Ok(Route::Host(host.as_ref()))
            }
            None => {
                trace!(operation, path = %path.display(), "filesystem without host I/O");
                Err(FsError::HostIoDisabled {
                    path: path.to_path_buf(),
                    operation,
                })
            }
        }
    }

    fn resolve(&self, path: &Path, operation: &'static str) -> Result<PathBuf, FsError> {
        let normalized = self.translator.normalize(path);
        if !self.extractor.should_extract(&normalized) {
            return Ok(normalized);
        }
        let tree = self.tree()?;
        match self.extractor.extract(self.view(tree), &normalized)? {
            Some(real) => {
                trace!(operation, from = %normalized.display(), to = %real.display(), "extracted");
                Ok(real)
            }
            None => {
                trace!(operation, path = %normalized.display(), "could not extract");
                Ok(normalized)
            }
        }
    }
}

fn read_only(path: &Path, operation: &'static str) -> FsError {
    FsError::ReadOnly {
        path: path.to_path_buf(),
        operation,
    }
}

impl fmt::Debug for BundleFs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BundleFs")
            .field("mount_point", &self.translator.mount_point())
            .field("case_insensitive", &self.translator.is_case_insensitive())
            .field("host_io", &self.host_io)
            .field("extract_on_startup", &self.extract_on_startup)
            .field("index_built", &self.index.is_built())
            .finish_non_exhaustive()
    }
}

impl FsRead for BundleFs {
    fn check_access(&self, path: &Path, mode: AccessMode) -> Result<(), FsError> {
        match self.route(path, "check_access")? {
            Route::Host(host) => host.check_access(path, mode),
            Route::Overlay if mode.write => Err(read_only(path, "check_access")),
            Route::Overlay => self.existing(path).map(|_| ()),
        }
    }

    fn metadata(&self, path: &Path) -> Result<Metadata, FsError> {
        match self.route(path, "metadata")? {
            Route::Host(host) => host.metadata(path),
            Route::Overlay => match self.existing(path)? {
                Entry::File(file) => {
                    let size = file.content(self.loader.as_ref())?.len() as u64;
                    Ok(Metadata::bundled(FileType::File, size))
                }
                Entry::Directory(_) => Ok(Metadata::bundled(FileType::Directory, 0)),
            },
        }
    }

    fn open(&self, path: &Path, flags: OpenFlags) -> Result<Box<dyn FileHandle>, FsError> {
        match self.route(path, "open")? {
            Route::Host(host) => host.open(path, flags),
            Route::Overlay if !flags.is_read_only() => Err(read_only(path, "open")),
            Route::Overlay => match self.existing(path)? {
                Entry::File(file) => Ok(Box::new(BundleFile::new(
                    file.content(self.loader.as_ref())?,
                ))),
                Entry::Directory(_) => Err(FsError::NotAFile {
                    path: path.to_path_buf(),
                }),
            },
        }
    }
}

impl FsWrite for BundleFs {
    fn create_dir(&self, path: &Path) -> Result<(), FsError> {
        match self.route(path, "create_dir")? {
            Route::Host(host) => host.create_dir(path),
            Route::Overlay => Err(read_only(path, "create_dir")),
        }
    }

    fn remove(&self, path: &Path) -> Result<(), FsError> {
        match self.route(path, "remove")? {
            Route::Host(host) => host.remove(path),
            Route::Overlay => Err(read_only(path, "remove")),
        }
    }
}

impl FsDir for BundleFs {
    fn read_dir(&self, path: &Path, filter: DirFilter<'_>) -> Result<ReadDirIter, FsError> {
        match self.route(path, "read_dir")? {
            Route::Host(host) => host.read_dir(path, filter),
            Route::Overlay => {
                let tree = self.tree()?;
                let dir = match tree.get(&self.translator.lookup_key(path)) {
                    Some(Entry::Directory(dir)) => dir,
                    Some(Entry::File(_)) => {
                        return Err(FsError::NotADirectory {
                            path: path.to_path_buf(),
                        });
                    }
                    None => {
                        return Err(FsError::NotFound {
                            path: path.to_path_buf(),
                        });
                    }
                };
                let entries = tree
                    .children(dir)
                    .map(|child| (child, PathBuf::from(child.platform_path())))
                    .filter(|(_, child_path)| filter(child_path.as_path()))
                    .map(|(child, child_path)| {
                        Ok(DirEntry {
                            name: child.name().to_owned(),
                            path: child_path,
                            file_type: child.file_type(),
                        })
                    })
                    .collect();
                Ok(ReadDirIter::from_vec(entries))
            }
        }
    }
}

impl FsPath for BundleFs {
    fn to_absolute_path(&self, path: &Path) -> Result<PathBuf, FsError> {
        match self.route(path, "to_absolute_path")? {
            Route::Host(host) => host.to_absolute_path(path),
            Route::Overlay => self.resolve(path, "to_absolute_path"),
        }
    }

    fn to_real_path(&self, path: &Path) -> Result<PathBuf, FsError> {
        match self.route(path, "to_real_path")? {
            Route::Host(host) => host.to_real_path(path),
            Route::Overlay => self.resolve(path, "to_real_path"),
        }
    }
}

/// Handle over the cached bytes of a bundled file.
///
/// Seekable and readable; `write` and `set_len` fail with
/// [`io::ErrorKind::ReadOnlyFilesystem`].
#[derive(Debug, Clone)]
pub struct BundleFile {
    data: Arc<[u8]>,
    pos: u64,
}

impl BundleFile {
    /// A handle positioned at the start of `data`.
    pub fn new(data: Arc<[u8]>) -> Self {
        Self { data, pos: 0 }
    }
}

fn read_only_handle() -> io::Error {
    io::Error::new(io::ErrorKind::ReadOnlyFilesystem, "bundle files are read-only")
}

impl Read for BundleFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let len = self.data.len() as u64;
        if self.pos >= len {
            return Ok(0);
        }
        let start = self.pos as usize;
        let n = buf.len().min(self.data.len() - start);
        buf[..n].copy_from_slice(&self.data[start..start + n]);
        self.pos += n as u64;
        Ok(n)
    }
}

impl Write for BundleFile {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(read_only_handle())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Seek for BundleFile {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let target = match pos {
            SeekFrom::Start(offset) => Some(offset),
            SeekFrom::End(offset) => (self.data.len() as u64).checked_add_signed(offset),
            SeekFrom::Current(offset) => self.pos.checked_add_signed(offset),
        };
        let target = target.ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "invalid seek to a negative or overflowing position",
            )
        })?;
        self.pos = target;
        Ok(target)
    }
}

impl FileHandle for BundleFile {
    fn size(&self) -> io::Result<u64> {
        Ok(self.data.len() as u64)
    }

    fn set_len(&mut self, _size: u64) -> io::Result<()> {
        Err(read_only_handle())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::{MANIFEST_PATH, MemoryBundle};

    const MANIFEST: &str = "\
/bundle.vfs/a/
/bundle.vfs/a/b/
/bundle.vfs/a/b/c.txt
/bundle.vfs/libs/
/bundle.vfs/libs/x.so
";

    fn bundle() -> MemoryBundle {
        MemoryBundle::new()
            .with(MANIFEST_PATH, MANIFEST)
            .with("/bundle.vfs/a/b/c.txt", "see")
            .with("/bundle.vfs/libs/x.so", "\x7fELF")
    }

    fn overlay(host_io: HostIo) -> BundleFs {
        BundleFs::builder()
            .mount_point("/ov")
            .case_insensitive(false)
            .host_io(host_io)
            .extract_on_startup(false)
            .loader(bundle())
            .build()
            .unwrap()
    }

    fn names(fs: &BundleFs, dir: &str) -> Vec<String> {
        fs.read_dir(Path::new(dir), &|_| true)
            .unwrap()
            .map(|e| e.unwrap().name)
            .collect()
    }

    #[test]
    fn lists_and_reads() {
        let fs = overlay(HostIo::None);
        assert_eq!(names(&fs, "/ov/a/b"), ["c.txt"]);
        assert_eq!(names(&fs, "/ov"), ["a", "libs"]);
        assert_eq!(fs.read(Path::new("/ov/a/b/c.txt")).unwrap(), b"see");
    }

    #[test]
    fn missing_file_is_not_found() {
        let fs = overlay(HostIo::None);
        let err = fs.read(Path::new("/ov/a/b/missing.txt")).unwrap_err();
        assert!(matches!(err, FsError::NotFound { .. }));
    }

    #[test]
    fn read_dir_applies_filter() {
        let fs = overlay(HostIo::None);
        let filter = |p: &Path| p.extension().is_none();
        let entries = fs
            .read_dir(Path::new("/ov"), &filter)
            .unwrap()
            .collect_all()
            .unwrap();
        let paths: Vec<_> = entries.into_iter().map(|e| e.path).collect();
        assert_eq!(paths, [PathBuf::from("/ov/a"), PathBuf::from("/ov/libs")]);
    }

    #[test]
    fn read_dir_rejects_files_and_missing_paths() {
        let fs = overlay(HostIo::None);
        let err = fs.read_dir(Path::new("/ov/a/b/c.txt"), &|_| true).err().unwrap();
        assert!(matches!(err, FsError::NotADirectory { .. }));
        let err = fs.read_dir(Path::new("/ov/nope"), &|_| true).err().unwrap();
        assert!(matches!(err, FsError::NotFound { .. }));
    }

    #[test]
    fn lookups_normalize_dot_segments() {
        let fs = overlay(HostIo::None);
        assert_eq!(fs.read(Path::new("/ov/a/./b/../b/c.txt")).unwrap(), b"see");
        let meta = fs.metadata(Path::new("/ov/a")).unwrap();
        assert!(meta.is_dir());
        assert_eq!(meta.size, 0);
    }

    #[test]
    fn metadata_reports_content_length() {
        let fs = overlay(HostIo::None);
        let meta = fs.metadata(Path::new("/ov/a/b/c.txt")).unwrap();
        assert!(meta.is_file());
        assert_eq!(meta.size, 3);
        assert_eq!(meta.permissions.mode(), 0o555);
    }

    #[test]
    fn writes_are_rejected() {
        let fs = overlay(HostIo::ReadWrite);
        let file = Path::new("/ov/a/b/c.txt");
        for err in [
            fs.create_dir(Path::new("/ov/a/new")).unwrap_err(),
            fs.remove(file).unwrap_err(),
            fs.open(file, OpenFlags::WRITE).err().unwrap(),
            fs.open(file, OpenFlags::APPEND).err().unwrap(),
            fs.check_access(file, AccessMode::WRITE).unwrap_err(),
        ] {
            assert!(matches!(err, FsError::ReadOnly { .. }), "{err}");
            assert!(err.is_permission_denied());
        }
        assert_eq!(fs.read(file).unwrap(), b"see");
    }

    #[test]
    fn check_access_reads() {
        let fs = overlay(HostIo::None);
        fs.check_access(Path::new("/ov/a/b/c.txt"), AccessMode::READ)
            .unwrap();
        fs.check_access(Path::new("/ov/a"), AccessMode::EXISTS).unwrap();
        let err = fs
            .check_access(Path::new("/ov/zzz"), AccessMode::READ)
            .unwrap_err();
        assert!(matches!(err, FsError::NotFound { .. }));
    }

    #[test]
    fn open_directory_is_not_a_file() {
        let fs = overlay(HostIo::None);
        let err = fs.open(Path::new("/ov/a"), OpenFlags::READ).err().unwrap();
        assert!(matches!(err, FsError::NotAFile { .. }));
    }

    #[test]
    fn open_accepts_empty_flags() {
        let fs = overlay(HostIo::None);
        let mut handle = fs
            .open(Path::new("/ov/a/b/c.txt"), OpenFlags::default())
            .unwrap();
        let mut out = String::new();
        handle.read_to_string(&mut out).unwrap();
        assert_eq!(out, "see");
    }

    #[test]
    fn host_io_none_rejects_outside_paths() {
        let fs = overlay(HostIo::None);
        let outside = Path::new("/tmp/anything");
        let errors = [
            fs.read(outside).unwrap_err(),
            fs.metadata(outside).unwrap_err(),
            fs.create_dir(outside).unwrap_err(),
            fs.remove(outside).unwrap_err(),
            fs.read_dir(outside, &|_| true).err().unwrap(),
            fs.check_access(outside, AccessMode::READ).unwrap_err(),
            fs.to_absolute_path(outside).unwrap_err(),
            fs.to_real_path(outside).unwrap_err(),
        ];
        for err in errors {
            assert!(matches!(err, FsError::HostIoDisabled { .. }), "{err}");
            assert!(err.to_string().contains("filesystem without host I/O"));
        }
    }

    #[test]
    fn real_path_extracts_native_libraries() {
        let fs = overlay(HostIo::None);
        let first = fs.to_real_path(Path::new("/ov/libs/x.so")).unwrap();
        let second = fs.to_absolute_path(Path::new("/ov/libs/x.so")).unwrap();

        assert!(!fs.is_in_overlay(&first));
        assert_eq!(first, second);
        assert_eq!(std::fs::read(&first).unwrap(), b"\x7fELF");
        assert_eq!(fs.extracted_count(), 1);
    }

    #[test]
    fn real_path_of_plain_files_stays_in_overlay() {
        let fs = overlay(HostIo::None);
        let real = fs.to_real_path(Path::new("/ov/a/b/../b/c.txt")).unwrap();
        assert_eq!(real, PathBuf::from("/ov/a/b/c.txt"));
        assert_eq!(fs.extracted_count(), 0);
        assert!(fs.extract_dir().is_none());
    }

    #[test]
    fn unknown_library_falls_back_to_overlay_path() {
        let fs = overlay(HostIo::None);
        let real = fs.to_real_path(Path::new("/ov/libs/missing.so")).unwrap();
        assert_eq!(real, PathBuf::from("/ov/libs/missing.so"));
    }

    #[test]
    fn close_removes_extracted_files() {
        let fs = overlay(HostIo::None);
        let real = fs.to_real_path(Path::new("/ov/libs/x.so")).unwrap();
        fs.close();
        fs.close();
        assert!(!real.exists());
    }

    #[test]
    fn extract_on_startup_materializes_matching_files() {
        let fs = BundleFs::builder()
            .mount_point("/ov")
            .host_io(HostIo::None)
            .extract_on_startup(true)
            .loader(bundle())
            .build()
            .unwrap();
        assert_eq!(fs.extracted_count(), 0);
        fs.metadata(Path::new("/ov/a")).unwrap();
        assert_eq!(fs.extracted_count(), 1);
        fs.to_real_path(Path::new("/ov/libs/x.so")).unwrap();
        assert_eq!(fs.extracted_count(), 1);
    }

    #[test]
    fn extract_on_startup_continues_past_failures() {
        let manifest = "\
/bundle.vfs/a/
/bundle.vfs/a/ok.txt
/bundle.vfs/libs/
/bundle.vfs/libs/x.so
/bundle.vfs/libs/y.so
";
        let fs = BundleFs::builder()
            .mount_point("/ov")
            .host_io(HostIo::None)
            .extract_on_startup(true)
            .loader(
                MemoryBundle::new()
                    .with(MANIFEST_PATH, manifest)
                    .with("/bundle.vfs/a/ok.txt", "ok")
                    .with("/bundle.vfs/libs/y.so", "why"),
            )
            .build()
            .unwrap();

        let err = fs.metadata(Path::new("/ov/a/ok.txt")).unwrap_err();
        assert!(matches!(err, FsError::Extraction { ref path, .. } if path == Path::new("/ov")));
        assert_eq!(fs.extracted_count(), 1);
        let y = fs.extract_dir().unwrap().join("libs/y.so");
        assert_eq!(std::fs::read(y).unwrap(), b"why");

        assert_eq!(fs.metadata(Path::new("/ov/a/ok.txt")).unwrap().size, 2);
    }

    #[test]
    fn well_known_subtrees() {
        let fs = overlay(HostIo::None);
        assert_eq!(fs.home_path(), PathBuf::from("/ov/home"));
        assert_eq!(fs.venv_path(), PathBuf::from("/ov/venv"));
        assert_eq!(fs.src_path(), PathBuf::from("/ov/src"));
        assert_eq!(
            fs.resource_to_platform("/bundle.vfs/src/main.py").unwrap(),
            PathBuf::from("/ov/src/main.py")
        );
    }

    #[test]
    fn bundle_file_reads_and_seeks() {
        let mut file = BundleFile::new(Arc::from(&b"hello"[..]));
        let mut buf = [0u8; 3];
        assert_eq!(file.read(&mut buf).unwrap(), 3);
        assert_eq!(&buf, b"hel");

        assert_eq!(file.seek(SeekFrom::End(-1)).unwrap(), 4);
        assert_eq!(file.read(&mut buf).unwrap(), 1);
        assert_eq!(buf[0], b'o');
        assert_eq!(file.read(&mut buf).unwrap(), 0);

        file.seek(SeekFrom::Start(100)).unwrap();
        assert_eq!(file.read(&mut buf).unwrap(), 0);

        let err = file.seek(SeekFrom::Current(-200)).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn bundle_file_is_read_only() {
        let mut file = BundleFile::new(Arc::from(&b"data"[..]));
        assert_eq!(
            file.write(b"x").unwrap_err().kind(),
            io::ErrorKind::ReadOnlyFilesystem
        );
        assert_eq!(
            file.set_len(0).unwrap_err().kind(),
            io::ErrorKind::ReadOnlyFilesystem
        );
        assert_eq!(file.size().unwrap(), 4);
    }
}
