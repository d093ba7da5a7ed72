//! Writers deliver rendered records to a destination under the synchronous
//! `log`/`flush`/`close` contract consumed by a dispatcher.
//!
//! A writer instance assumes external serialization: exactly one dispatcher
//! thread calls into it at a time and the writer performs no internal
//! locking. [`SynchronizedWriter`] is the decorator for shared access.

mod chunk;
mod console;
mod file;
mod json;
mod logfile;

pub use chunk::ByteChunk;
pub use console::ConsoleWriter;
pub use file::{CountingNamer, FileNamer, RollingFileBuilder, RollingFileWriter};
pub use json::{JsonFileBuilder, JsonFileWriter};
pub use logfile::LogFile;

use std::borrow::Cow;
use std::sync::Mutex;

use crate::error::Error;
use crate::record::{FieldSet, LogRecord};

/// Platform line separator appended after each rendered record.
#[cfg(windows)]
pub const LINE_SEPARATOR: &str = "\r\n";
#[cfg(not(windows))]
pub const LINE_SEPARATOR: &str = "\n";

/// Synchronous delivery contract called by a dispatcher.
///
/// Records are rendered and written in the exact order `log` is invoked;
/// `close` is idempotent. Failures surface as [`Error`] and leave the writer
/// in a state consistent with what succeeded.
pub trait Writer {
    /// Record fields this writer reads, so the producer can skip populating
    /// expensive unused fields.
    fn required_fields(&self) -> FieldSet;

    /// Renders and delivers one record.
    ///
    /// # Errors
    /// I/O failures and [`Error::Closed`] after `close`.
    fn log(&mut self, record: &LogRecord) -> Result<(), Error>;

    /// Forces buffered bytes to the destination.
    ///
    /// # Errors
    /// I/O failures.
    fn flush(&mut self) -> Result<(), Error>;

    /// Flushes, then releases the destination. Calling `close` twice must
    /// not fail.
    ///
    /// # Errors
    /// I/O failures from the final flush.
    fn close(&mut self) -> Result<(), Error>;
}

/// Output text encoding.
///
/// `Ascii` substitutes `?` for characters outside the 7-bit range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Charset {
    #[default]
    Utf8,
    Ascii,
}

impl Charset {
    /// Resolves a configured charset name.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "utf-8" | "utf8" => Some(Self::Utf8),
            "ascii" | "us-ascii" => Some(Self::Ascii),
            _ => None,
        }
    }

    /// Encodes text for the output file.
    #[must_use]
    pub fn encode<'a>(self, text: &'a str) -> Cow<'a, [u8]> {
        match self {
            Self::Utf8 => Cow::Borrowed(text.as_bytes()),
            Self::Ascii => {
                if text.is_ascii() {
                    Cow::Borrowed(text.as_bytes())
                } else {
                    Cow::Owned(
                        text.chars()
                            .map(|c| if c.is_ascii() { c as u8 } else { b'?' })
                            .collect(),
                    )
                }
            }
        }
    }
}

/// Mutex decorator that lets several threads share one writer while
/// preserving per-writer call ordering.
///
/// The dispatcher composes this around a writer; the core writers stay
/// lock-free.
pub struct SynchronizedWriter {
    inner: Mutex<Box<dyn Writer + Send>>,
}

impl SynchronizedWriter {
    #[must_use]
    pub fn new(writer: Box<dyn Writer + Send>) -> Self {
        Self {
            inner: Mutex::new(writer),
        }
    }

    fn locked<T>(
        &self,
        operation: impl FnOnce(&mut Box<dyn Writer + Send>) -> Result<T, Error>,
    ) -> Result<T, Error> {
        match self.inner.lock() {
            Ok(mut writer) => operation(&mut writer),
            // A poisoned lock means a writer panicked mid-call; the file
            // state is unknown, so refuse further writes.
            Err(_) => Err(Error::Closed),
        }
    }

    /// Shared-access variant of [`Writer::log`].
    ///
    /// # Errors
    /// Same as [`Writer::log`].
    pub fn log_shared(&self, record: &LogRecord) -> Result<(), Error> {
        self.locked(|writer| writer.log(record))
    }

    /// Shared-access variant of [`Writer::flush`].
    ///
    /// # Errors
    /// Same as [`Writer::flush`].
    pub fn flush_shared(&self) -> Result<(), Error> {
        self.locked(|writer| writer.flush())
    }

    /// Shared-access variant of [`Writer::close`].
    ///
    /// # Errors
    /// Same as [`Writer::close`].
    pub fn close_shared(&self) -> Result<(), Error> {
        self.locked(|writer| writer.close())
    }
}

impl Writer for SynchronizedWriter {
    fn required_fields(&self) -> FieldSet {
        self.inner
            .lock()
            .map_or(FieldSet::EMPTY, |writer| writer.required_fields())
    }

    fn log(&mut self, record: &LogRecord) -> Result<(), Error> {
        self.log_shared(record)
    }

    fn flush(&mut self) -> Result<(), Error> {
        self.flush_shared()
    }

    fn close(&mut self) -> Result<(), Error> {
        self.close_shared()
    }
}
