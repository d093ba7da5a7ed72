//! File handle plumbing shared by the rolling and structured writers: one
//! exclusively owned handle, one reusable byte chunk, append/truncate
//! support.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::chunk::ByteChunk;

/// Open log file with optional chunk buffering.
///
/// The handle is owned exclusively; rotation closes it fully before a new
/// one is opened, so no write ever interleaves across files. The chunk is
/// allocated once and survives rotations via `reset`.
#[derive(Debug)]
pub struct LogFile {
    path: PathBuf,
    file: Option<File>,
    chunk: ByteChunk,
    buffered: bool,
    /// Bytes known to have reached the OS handle (excludes chunk content).
    flushed: u64,
}

impl LogFile {
    /// Opens `path`, creating parent directories as needed. With `append`
    /// the existing content is kept, otherwise the file is truncated.
    ///
    /// # Errors
    /// I/O errors from directory creation or opening the file.
    pub fn open(
        path: impl Into<PathBuf>,
        append: bool,
        capacity: usize,
        buffered: bool,
    ) -> io::Result<Self> {
        let path = path.into();
        let file = open_handle(&path, append)?;
        let flushed = if append { file.metadata()?.len() } else { 0 };
        Ok(Self {
            path,
            file: Some(file),
            chunk: ByteChunk::new(capacity, capacity),
            buffered,
            flushed,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Bytes written to the OS handle so far; pending chunk content is not
    /// included until the next flush.
    #[must_use]
    pub const fn flushed_len(&self) -> u64 {
        self.flushed
    }

    fn handle(&mut self) -> io::Result<&mut File> {
        self.file
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "log file is closed"))
    }

    /// Stores `bytes`, flushing full chunks mid-store so a record larger
    /// than the remaining chunk space is split across flushes but never
    /// dropped.
    ///
    /// # Errors
    /// I/O errors from the underlying file.
    pub fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        if !self.buffered {
            let written = bytes.len() as u64;
            self.handle()?.write_all(bytes)?;
            self.flushed += written;
            return Ok(());
        }

        let mut offset = 0;
        while offset < bytes.len() {
            offset += self.chunk.store(bytes, offset);
            if self.chunk.is_full() {
                self.flush_chunk()?;
            }
        }
        Ok(())
    }

    fn flush_chunk(&mut self) -> io::Result<()> {
        if self.chunk.is_empty() {
            return Ok(());
        }
        let Some(file) = self.file.as_mut() else {
            return Err(io::Error::new(io::ErrorKind::NotConnected, "log file is closed"));
        };
        let written = self.chunk.write_to(file)?;
        self.flushed += written as u64;
        let capacity = self.chunk.capacity();
        self.chunk.reset(capacity);
        Ok(())
    }

    /// Forces buffered bytes to the OS handle.
    ///
    /// # Errors
    /// I/O errors from the underlying file.
    pub fn flush(&mut self) -> io::Result<()> {
        self.flush_chunk()?;
        self.handle()?.flush()
    }

    /// Flushes, then cuts the file to `len` bytes; subsequent writes append
    /// after the cut.
    ///
    /// # Errors
    /// I/O errors from flushing or truncating.
    pub fn truncate(&mut self, len: u64) -> io::Result<()> {
        self.flush_chunk()?;
        self.handle()?.set_len(len)?;
        self.flushed = len;
        Ok(())
    }

    /// Closes the current handle and opens a fresh (truncated) file at
    /// `path`, reusing the chunk storage.
    ///
    /// # Errors
    /// I/O errors from flushing the old handle or opening the new file.
    pub fn reopen(&mut self, path: impl Into<PathBuf>) -> io::Result<()> {
        self.flush()?;
        self.file = None;
        self.path = path.into();
        self.file = Some(open_handle(&self.path, false)?);
        let capacity = self.chunk.capacity();
        self.chunk.reset(capacity);
        self.flushed = 0;
        Ok(())
    }

    /// Flushes and releases the handle; repeated calls are no-ops.
    ///
    /// # Errors
    /// I/O errors from the final flush.
    pub fn close(&mut self) -> io::Result<()> {
        if self.file.is_some() {
            self.flush()?;
            self.file = None;
        }
        Ok(())
    }

    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.file.is_none()
    }
}

fn open_handle(path: &Path, append: bool) -> io::Result<File> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent)?;
    }
    let mut options = OpenOptions::new();
    options.create(true).write(true);
    if append {
        options.append(true);
    } else {
        options.truncate(true);
    }
    options.open(path)
}
