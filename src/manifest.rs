//! # Manifest Index
//!
//! In-memory tree of the bundle, built once from the flat manifest resource.
//!
//! The manifest lists one resource name per line. Lines ending in `/` are
//! directories, every other line is a file:
//!
//! ```text
//! /bundle.vfs/a/
//! /bundle.vfs/a/b/
//! /bundle.vfs/a/b/c.txt
//! ```
//!
//! Ancestor directories are synthesized on first reference, so the tree is
//! connected even when a directory marker line is missing.
//!
//! Nodes live in an arena (`Vec<Entry>`) and directories refer to their
//! children by index; the key map resolves normalized (optionally
//! case-folded) platform paths to nodes.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use tracing::{trace, warn};

use crate::translate::PLATFORM_SEPARATOR;
use crate::{FileType, FsError, PathTranslator, RESOURCE_ROOT, ResourceLoader};

/// Resource name of the manifest listing every bundle entry.
pub const MANIFEST_PATH: &str = "/bundle.vfs/fileslist.txt";

/// Source root that predates `src`; still accepted but reported once.
const LEGACY_PROJ_DIR: &str = "proj";
const CURRENT_SRC_DIR: &str = "src";

type EntryId = usize;

/// A node of the overlay tree.
#[derive(Debug)]
pub enum Entry {
    /// A bundled file.
    File(FileEntry),
    /// A directory, explicit or synthesized from a descendant.
    Directory(DirectoryEntry),
}

impl Entry {
    /// Absolute platform path of this entry, as listed under the mount point.
    pub fn platform_path(&self) -> &str {
        match self {
            Entry::File(file) => &file.platform_path,
            Entry::Directory(dir) => &dir.platform_path,
        }
    }

    /// Whether this is a file or a directory.
    pub fn file_type(&self) -> FileType {
        match self {
            Entry::File(_) => FileType::File,
            Entry::Directory(_) => FileType::Directory,
        }
    }

    /// Final path segment.
    pub fn name(&self) -> &str {
        let path = self.platform_path();
        path.rsplit(PLATFORM_SEPARATOR).next().unwrap_or(path)
    }
}

/// A bundled file whose content is fetched on first read and then cached.
#[derive(Debug)]
pub struct FileEntry {
    platform_path: String,
    resource_path: String,
    content: OnceLock<Arc<[u8]>>,
}

impl FileEntry {
    fn new(platform_path: String, resource_path: String) -> Self {
        Self {
            platform_path,
            resource_path,
            content: OnceLock::new(),
        }
    }

    /// Absolute platform path.
    pub fn platform_path(&self) -> &str {
        &self.platform_path
    }

    /// Resource name the content is loaded from.
    pub fn resource_path(&self) -> &str {
        &self.resource_path
    }

    /// Whether the content has been loaded already.
    pub fn is_loaded(&self) -> bool {
        self.content.get().is_some()
    }

    /// The file's bytes, loading them through `loader` on first use.
    ///
    /// Concurrent first reads may each hit the loader; the first stored
    /// buffer wins and every caller gets that same buffer back.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotFound`] if the bundle lists the file but has no resource for it
    pub fn content(&self, loader: &dyn ResourceLoader) -> Result<Arc<[u8]>, FsError> {
        if let Some(data) = self.content.get() {
            return Ok(Arc::clone(data));
        }
        let data: Arc<[u8]> = match loader.load_resource(&self.resource_path) {
            Ok(bytes) => bytes.into(),
            Err(FsError::NotFound { .. }) => {
                warn!(resource = %self.resource_path, "could not read bundle resource");
                return Err(FsError::NotFound {
                    path: self.platform_path.clone().into(),
                });
            }
            Err(e) => return Err(e),
        };
        Ok(Arc::clone(self.content.get_or_init(|| data)))
    }
}

/// A directory and its children in manifest order.
#[derive(Debug)]
pub struct DirectoryEntry {
    platform_path: String,
    children: Vec<EntryId>,
}

impl DirectoryEntry {
    /// Absolute platform path.
    pub fn platform_path(&self) -> &str {
        &self.platform_path
    }

    /// Number of direct children.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Whether the directory has no children.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

/// The fully built tree.
#[derive(Debug, Default)]
pub struct ManifestTree {
    entries: Vec<Entry>,
    keys: HashMap<String, EntryId>,
}

impl ManifestTree {
    /// Load and parse the manifest through `loader`.
    ///
    /// A missing manifest yields an empty tree: every lookup then reports
    /// absent instead of failing the process.
    pub fn load(translator: &PathTranslator, loader: &dyn ResourceLoader) -> Self {
        match loader.load_resource(MANIFEST_PATH) {
            Ok(bytes) => Self::parse(&String::from_utf8_lossy(&bytes), translator),
            Err(e) => {
                warn!(manifest = MANIFEST_PATH, error = %e, "could not read bundle manifest");
                Self::default()
            }
        }
    }

    /// Build the tree from manifest text.
    pub fn parse(manifest: &str, translator: &PathTranslator) -> Self {
        let mut tree = Self::default();
        let legacy_prefix = format!("{RESOURCE_ROOT}/{LEGACY_PROJ_DIR}");
        let mut legacy_reported = false;

        trace!("bundle entries:");
        for line in manifest.lines().filter(|line| !line.is_empty()) {
            if !legacy_reported && line.starts_with(&legacy_prefix) {
                legacy_reported = true;
                warn!(
                    "{legacy_prefix} source root is deprecated, use {RESOURCE_ROOT}/{CURRENT_SRC_DIR} instead"
                );
            }
            let platform_path = match translator.resource_to_platform(line) {
                Ok(path) => path,
                Err(e) => {
                    warn!(line, error = %e, "skipping manifest line");
                    continue;
                }
            };
            tree.insert_line(line, &platform_path, translator);
        }
        tree
    }

    fn insert_line(&mut self, resource_path: &str, platform_path: &str, translator: &PathTranslator) {
        let mount_len = translator.mount_str().len();
        let mut parent = None;
        for (offset, _) in platform_path[mount_len..].match_indices(PLATFORM_SEPARATOR) {
            let dir = &platform_path[..mount_len + offset];
            match self.ensure_directory(dir, parent, translator) {
                Some(id) => parent = Some(id),
                None => return,
            }
        }

        let Some(parent) = parent else {
            return;
        };
        if platform_path.ends_with(PLATFORM_SEPARATOR) {
            return;
        }

        let key = translator.case_key(platform_path);
        match self.keys.get(&key).map(|&id| &self.entries[id]) {
            Some(Entry::File(_)) => {}
            Some(Entry::Directory(_)) => {
                warn!(path = platform_path, "manifest lists a file where a directory exists");
            }
            None => {
                trace!("  {resource_path}");
                let id = self.push(
                    key,
                    Entry::File(FileEntry::new(
                        platform_path.to_owned(),
                        translator.platform_to_resource(platform_path),
                    )),
                );
                self.link(parent, id);
            }
        }
    }

    fn ensure_directory(
        &mut self,
        dir: &str,
        parent: Option<EntryId>,
        translator: &PathTranslator,
    ) -> Option<EntryId> {
        let key = translator.case_key(dir);
        if let Some(&id) = self.keys.get(&key) {
            return match self.entries[id] {
                Entry::Directory(_) => Some(id),
                Entry::File(_) => {
                    warn!(path = dir, "manifest lists a directory where a file exists");
                    None
                }
            };
        }
        let id = self.push(
            key,
            Entry::Directory(DirectoryEntry {
                platform_path: dir.to_owned(),
                children: Vec::new(),
            }),
        );
        if let Some(parent) = parent {
            self.link(parent, id);
        }
        Some(id)
    }

    fn push(&mut self, key: String, entry: Entry) -> EntryId {
        let id = self.entries.len();
        self.entries.push(entry);
        self.keys.insert(key, id);
        id
    }

    fn link(&mut self, parent: EntryId, child: EntryId) {
        if let Entry::Directory(dir) = &mut self.entries[parent] {
            dir.children.push(child);
        }
    }

    /// Look up an entry by index key (see [`PathTranslator::lookup_key`]).
    pub fn get(&self, key: &str) -> Option<&Entry> {
        self.keys.get(key).map(|&id| &self.entries[id])
    }

    /// Children of `dir` in manifest order.
    pub fn children<'a>(&'a self, dir: &'a DirectoryEntry) -> impl Iterator<Item = &'a Entry> + 'a {
        dir.children.iter().map(|&id| &self.entries[id])
    }

    /// Every file entry in manifest order.
    pub fn files(&self) -> impl Iterator<Item = &FileEntry> {
        self.entries.iter().filter_map(|entry| match entry {
            Entry::File(file) => Some(file),
            Entry::Directory(_) => None,
        })
    }

    /// Total number of entries, directories included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the tree holds no entries at all.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Lazily built, process-lifetime manifest tree.
///
/// The first caller builds the tree; concurrent callers block until it is
/// ready and then observe the same tree. It is never rebuilt.
#[derive(Debug, Default)]
pub struct ManifestIndex {
    tree: OnceLock<ManifestTree>,
}

impl ManifestIndex {
    /// An index that has not been built yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the tree has been built.
    pub fn is_built(&self) -> bool {
        self.tree.get().is_some()
    }

    /// The tree, building it on first call.
    ///
    /// The returned flag is `true` only for the one caller that performed
    /// the build.
    pub fn ensure_built(
        &self,
        translator: &PathTranslator,
        loader: &dyn ResourceLoader,
    ) -> (&ManifestTree, bool) {
        if let Some(tree) = self.tree.get() {
            return (tree, false);
        }
        let mut built_here = false;
        let tree = self.tree.get_or_init(|| {
            built_here = true;
            let tree = ManifestTree::load(translator, loader);
            if tree.is_empty() {
                warn!("no bundle entries after reading the manifest");
            }
            tree
        });
        (tree, built_here)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::MemoryBundle;

    fn translator() -> PathTranslator {
        PathTranslator::new("/ov", false).unwrap()
    }

    fn names(tree: &ManifestTree, key: &str) -> Vec<String> {
        match tree.get(key) {
            Some(Entry::Directory(dir)) => {
                tree.children(dir).map(|e| e.name().to_owned()).collect()
            }
            other => panic!("{key} is not a directory: {other:?}"),
        }
    }

    #[test]
    fn parses_files_and_directories() {
        let tree = ManifestTree::parse(
            "/bundle.vfs/a/\n/bundle.vfs/a/b/\n/bundle.vfs/a/b/c.txt\n",
            &translator(),
        );
        assert!(matches!(tree.get("/ov"), Some(Entry::Directory(_))));
        assert!(matches!(tree.get("/ov/a/b"), Some(Entry::Directory(_))));
        assert!(matches!(tree.get("/ov/a/b/c.txt"), Some(Entry::File(_))));
        assert_eq!(names(&tree, "/ov/a/b"), ["c.txt"]);
        assert_eq!(names(&tree, "/ov"), ["a"]);
    }

    #[test]
    fn synthesizes_missing_ancestors() {
        let tree = ManifestTree::parse("/bundle.vfs/x/y/z.py\n", &translator());
        assert_eq!(names(&tree, "/ov"), ["x"]);
        assert_eq!(names(&tree, "/ov/x"), ["y"]);
        assert_eq!(names(&tree, "/ov/x/y"), ["z.py"]);
    }

    #[test]
    fn keeps_manifest_order() {
        let tree = ManifestTree::parse(
            "/bundle.vfs/d/\n/bundle.vfs/d/zeta\n/bundle.vfs/d/alpha\n/bundle.vfs/d/mid/\n",
            &translator(),
        );
        assert_eq!(names(&tree, "/ov/d"), ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn tolerates_duplicate_lines() {
        let tree = ManifestTree::parse(
            "/bundle.vfs/d/\n/bundle.vfs/d/f\n/bundle.vfs/d/\n/bundle.vfs/d/f\n",
            &translator(),
        );
        assert_eq!(names(&tree, "/ov/d"), ["f"]);
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn skips_lines_outside_the_root() {
        let tree = ManifestTree::parse("/elsewhere/a\n/bundle.vfs/b\n", &translator());
        assert!(tree.get("/ov/b").is_some());
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn skips_kind_collisions() {
        let tree = ManifestTree::parse(
            "/bundle.vfs/a\n/bundle.vfs/a/b.txt\n/bundle.vfs/c/\n/bundle.vfs/c\n",
            &translator(),
        );
        assert!(matches!(tree.get("/ov/a"), Some(Entry::File(_))));
        assert!(tree.get("/ov/a/b.txt").is_none());
        assert!(matches!(tree.get("/ov/c"), Some(Entry::Directory(_))));
    }

    #[test]
    fn folds_keys_when_case_insensitive() {
        let t = PathTranslator::new("/ov", true).unwrap();
        let tree = ManifestTree::parse("/bundle.vfs/Lib/Foo.PY\n", &t);
        let entry = tree.get("/ov/lib/foo.py").unwrap();
        assert_eq!(entry.platform_path(), "/ov/Lib/Foo.PY");
    }

    #[test]
    fn file_entries_remember_their_resource() {
        let tree = ManifestTree::parse("/bundle.vfs/a/b.txt\n", &translator());
        let file = tree.files().next().unwrap();
        assert_eq!(file.resource_path(), "/bundle.vfs/a/b.txt");
        assert!(!file.is_loaded());
    }

    #[test]
    fn content_is_loaded_once() {
        let bundle = MemoryBundle::new().with("/bundle.vfs/a.txt", "hello");
        let tree = ManifestTree::parse("/bundle.vfs/a.txt\n", &translator());
        let Some(Entry::File(file)) = tree.get("/ov/a.txt") else {
            panic!("missing file entry");
        };

        let first = file.content(&bundle).unwrap();
        let second = file.content(&bundle).unwrap();
        assert_eq!(&*first, b"hello");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(bundle.load_count(), 1);
    }

    #[test]
    fn missing_content_reports_platform_path() {
        let bundle = MemoryBundle::new();
        let tree = ManifestTree::parse("/bundle.vfs/gone.txt\n", &translator());
        let file = tree.files().next().unwrap();
        match file.content(&bundle) {
            Err(FsError::NotFound { path }) => assert_eq!(path.to_str(), Some("/ov/gone.txt")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn missing_manifest_degrades_to_empty_index() {
        let index = ManifestIndex::new();
        let (tree, built_here) = index.ensure_built(&translator(), &MemoryBundle::new());
        assert!(built_here);
        assert!(tree.is_empty());
        assert!(tree.get("/ov").is_none());
    }

    #[test]
    fn index_is_built_once() {
        let bundle = MemoryBundle::new().with(MANIFEST_PATH, "/bundle.vfs/a.txt\n");
        let index = ManifestIndex::new();
        let t = translator();
        assert!(!index.is_built());

        let (_, first) = index.ensure_built(&t, &bundle);
        let (tree, second) = index.ensure_built(&t, &bundle);
        assert!(first);
        assert!(!second);
        assert_eq!(tree.len(), 2);
        assert_eq!(bundle.load_count(), 1);
    }
}
