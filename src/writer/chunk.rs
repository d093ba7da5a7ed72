//! Fixed-capacity byte buffer, the unit of buffered file I/O.

use std::io::{self, Write};

/// Byte buffer with a fill/flush/reset lifecycle.
///
/// The backing storage is allocated once; `reset` may shrink or grow the
/// accepted maximum but never beyond the original capacity. Exceeding the
/// capacity is a programming error and panics.
#[derive(Debug)]
pub struct ByteChunk {
    data: Vec<u8>,
    max_size: usize,
    current_size: usize,
}

impl ByteChunk {
    /// # Panics
    /// If `max_size` exceeds `capacity`.
    #[must_use]
    pub fn new(capacity: usize, max_size: usize) -> Self {
        assert!(
            max_size <= capacity,
            "max_size {max_size} exceeds capacity {capacity}"
        );
        Self {
            data: vec![0; capacity],
            max_size,
            current_size: 0,
        }
    }

    /// `true` if no bytes are stored.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.current_size == 0
    }

    /// `true` once the current maximum size is reached.
    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.current_size == self.max_size
    }

    /// Number of bytes currently stored.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.current_size
    }

    /// Size of the backing storage fixed at construction.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Copies bytes from `source`, beginning at `start`, until either all
    /// bytes are copied or this chunk is full. Returns the number of copied
    /// bytes; the caller re-checks [`Self::is_full`] and flushes before
    /// storing the remainder.
    pub fn store(&mut self, source: &[u8], start: usize) -> usize {
        let length = (source.len() - start).min(self.max_size - self.current_size);
        self.data[self.current_size..self.current_size + length]
            .copy_from_slice(&source[start..start + length]);
        self.current_size += length;
        length
    }

    /// Writes all stored bytes to `output` without resetting.
    ///
    /// # Errors
    /// Failed to write to the passed output.
    pub fn write_to<W: Write>(&self, output: &mut W) -> io::Result<usize> {
        output.write_all(&self.data[..self.current_size])?;
        Ok(self.current_size)
    }

    /// Empties the chunk and installs a new maximum size.
    ///
    /// # Panics
    /// If `max_size` exceeds the originally allocated capacity.
    pub fn reset(&mut self, max_size: usize) {
        assert!(
            max_size <= self.data.len(),
            "max_size {max_size} exceeds capacity {}",
            self.data.len()
        );
        self.max_size = max_size;
        self.current_size = 0;
    }
}
