//! Open file handles.
//!
//! [`FsRead::open`](super::FsRead::open) returns a boxed [`FileHandle`]: a
//! random-access stream that also reports and (for writable backends) changes
//! its length.

use std::fs::File;
use std::io::{self, Read, Seek, Write};

/// A random-access handle returned by `open`.
///
/// Reading at or past the end of the data yields `Ok(0)` (end of stream),
/// never an error. Handles on read-only backends fail `write` and
/// [`set_len`](FileHandle::set_len) with a read-only I/O error.
pub trait FileHandle: Read + Write + Seek + Send {
    /// Current length of the underlying data in bytes.
    fn size(&self) -> io::Result<u64>;

    /// Truncate or extend the underlying data.
    fn set_len(&mut self, size: u64) -> io::Result<()>;
}

impl FileHandle for File {
    fn size(&self) -> io::Result<u64> {
        Ok(self.metadata()?.len())
    }

    fn set_len(&mut self, size: u64) -> io::Result<()> {
        File::set_len(self, size)
    }
}
