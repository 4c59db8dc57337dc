//! Mounting an in-memory bundle and browsing it.
//!
//! Builds a small bundle with [`MemoryBundle`], mounts it, then lists,
//! reads, and stats entries through the ordinary filesystem traits.
//!
//! Run with: `cargo run --example basic_usage`

use bundle_vfs::*;
use std::io::Read;
use std::path::Path;

const MANIFEST: &str = "\
/bundle.vfs/home/
/bundle.vfs/home/lib-python/
/bundle.vfs/home/lib-python/os.py
/bundle.vfs/src/
/bundle.vfs/src/main.py
/bundle.vfs/src/config.json
";

fn main() -> Result<(), FsError> {
    println!("=== bundle-vfs Basic Usage Example ===\n");

    let bundle = MemoryBundle::new()
        .with(MANIFEST_PATH, MANIFEST)
        .with("/bundle.vfs/home/lib-python/os.py", "import sys\n")
        .with("/bundle.vfs/src/main.py", "print('hello from the bundle')\n")
        .with("/bundle.vfs/src/config.json", r#"{"debug": false}"#);

    // Only the bundle is visible: host paths are rejected.
    let fs = BundleFs::builder()
        .host_io(HostIo::None)
        .loader(bundle)
        .build()?;
    println!("Mounted at {}", fs.mount_point().display());

    // --- Listing ---
    println!("\n1. Listing the mount point...");
    for entry in fs.read_dir(fs.mount_point(), &|_| true)? {
        let entry = entry?;
        println!("   - {} ({:?})", entry.name, entry.file_type);
    }

    // --- Reading ---
    println!("\n2. Reading a source file...");
    let main_py = fs.src_path().join("main.py");
    println!("   {}: {}", main_py.display(), fs.read_to_string(&main_py)?.trim());

    let mut handle = fs.open(&fs.home_path().join("lib-python/os.py"), OpenFlags::READ)?;
    let mut head = String::new();
    handle
        .read_to_string(&mut head)
        .map_err(|e| FsError::from_io("read", "os.py", e))?;
    println!("   os.py starts with: {}", head.lines().next().unwrap_or_default());

    // --- Metadata ---
    println!("\n3. Metadata...");
    let meta = fs.metadata(&fs.src_path().join("config.json"))?;
    println!(
        "   config.json: type={:?}, size={}, mode={:o}",
        meta.file_type,
        meta.size,
        meta.permissions.mode()
    );
    println!("   src/ is a directory: {}", fs.is_dir(&fs.src_path())?);

    // --- Read-only ---
    println!("\n4. Writes are rejected...");
    match fs.create_dir(&fs.src_path().join("new")) {
        Err(e) => println!("   create_dir: {e}"),
        Ok(()) => println!("   create_dir unexpectedly succeeded"),
    }

    // --- Outside the mount point ---
    println!("\n5. Host paths with host I/O disabled...");
    match fs.metadata(Path::new("/etc/hosts")) {
        Err(e) => println!("   metadata: {e}"),
        Ok(_) => println!("   metadata unexpectedly succeeded"),
    }

    println!("\n=== Done ===");
    Ok(())
}
