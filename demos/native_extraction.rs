//! Extracting native libraries out of a bundle.
//!
//! Shared libraries cannot be mapped from memory, so the overlay copies
//! them into a temporary directory the first time their real path is
//! requested. Files inside an installed package also bring along the
//! package's `<pkg>.libs` directory.
//!
//! Run with: `cargo run --example native_extraction`

use bundle_vfs::*;

const MANIFEST: &str = "\
/bundle.vfs/venv/
/bundle.vfs/venv/lib/
/bundle.vfs/venv/lib/site-packages/
/bundle.vfs/venv/lib/site-packages/numpy/
/bundle.vfs/venv/lib/site-packages/numpy/__init__.py
/bundle.vfs/venv/lib/site-packages/numpy/_core.so
/bundle.vfs/venv/lib/site-packages/numpy.libs/
/bundle.vfs/venv/lib/site-packages/numpy.libs/libopenblas.so.0
/bundle.vfs/venv/lib/site-packages/numpy/data.csv
";

fn main() -> Result<(), FsError> {
    println!("=== bundle-vfs Native Extraction Example ===\n");

    let bundle = MemoryBundle::new()
        .with(MANIFEST_PATH, MANIFEST)
        .with("/bundle.vfs/venv/lib/site-packages/numpy/__init__.py", "")
        .with("/bundle.vfs/venv/lib/site-packages/numpy/_core.so", "\x7fELF core")
        .with(
            "/bundle.vfs/venv/lib/site-packages/numpy.libs/libopenblas.so.0",
            "\x7fELF blas",
        )
        .with("/bundle.vfs/venv/lib/site-packages/numpy/data.csv", "a,b\n1,2\n");

    // CSV files are extracted too, on top of the default native extensions.
    let fs = BundleFs::builder()
        .host_io(HostIo::Read)
        .extract_filter(|path| path.extension().is_some_and(|ext| ext == "csv"))
        .loader(bundle)
        .build()?;

    let numpy = fs.venv_path().join("lib/site-packages/numpy");

    // --- Lazy extraction ---
    println!("1. Resolving the real path of a shared library...");
    println!("   files on disk before: {}", fs.extracted_count());
    let core = fs.to_real_path(&numpy.join("_core.so"))?;
    println!("   {} -> {}", numpy.join("_core.so").display(), core.display());
    println!("   files on disk after: {}", fs.extracted_count());

    if let Some(dir) = fs.extract_dir() {
        let blas = dir.join("venv/lib/site-packages/numpy.libs/libopenblas.so.0");
        println!("   sibling library pulled in: {}", blas.exists());
    }

    // --- Idempotence ---
    println!("\n2. Resolving again reuses the extracted file...");
    let again = fs.to_real_path(&numpy.join("_core.so"))?;
    println!("   same path: {}, writes: {}", again == core, fs.extracted_count());

    // --- Filtering ---
    println!("\n3. Paths outside the filter stay virtual...");
    let init = fs.to_real_path(&numpy.join("__init__.py"))?;
    println!("   __init__.py -> {}", init.display());
    let csv = fs.to_real_path(&numpy.join("data.csv"))?;
    println!("   data.csv -> {}", csv.display());

    // --- Bulk extraction ---
    println!("\n4. Materializing the whole bundle...");
    let target = tempfile::tempdir().map_err(|e| FsError::from_io("tempdir", "", e))?;
    fs.extract_resources(target.path())?;
    println!("   wrote the bundle under {}", target.path().display());

    // --- Cleanup ---
    fs.close();
    println!("\n5. Closed; extracted files removed: {}", !core.exists());

    println!("\n=== Done ===");
    Ok(())
}
