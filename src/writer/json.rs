//! Structured file writer that keeps the file a syntactically valid JSON
//! array across appends and process restarts.

use std::fs;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use super::logfile::LogFile;
use super::{Charset, LINE_SEPARATOR, Writer};
use crate::error::Error;
use crate::message::{DecimalSymbols, MessageFormatter};
use crate::record::{Field, FieldSet, LogRecord};

/// Block size for the backward end-of-file scan.
const SCAN_BLOCK: usize = 1024;
const DEFAULT_BUFFER_CAPACITY: usize = 64 * 1024;
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Writer maintaining a single JSON array of log objects on disk.
///
/// Each `log` call appends one object followed by a comma; `close` removes
/// the pending comma and restores the closing bracket, so the file is a
/// valid array whenever the writer is closed. Reopening in append mode
/// splices new objects into the existing array.
pub struct JsonFileWriter {
    file: LogFile,
    formatter: MessageFormatter,
    charset: Charset,
    comma_pending: bool,
    closed: bool,
}

impl JsonFileWriter {
    /// Starts configuring a writer for `path`.
    #[must_use]
    pub fn builder(path: impl Into<PathBuf>) -> JsonFileBuilder {
        JsonFileBuilder {
            path: path.into(),
            append: true,
            buffered: true,
            capacity: DEFAULT_BUFFER_CAPACITY,
            charset: Charset::Utf8,
            symbols: DecimalSymbols::default(),
        }
    }

    fn resolve_message(&self, record: &LogRecord) -> Option<String> {
        let message = record.message()?;
        if record.arguments().is_empty() {
            Some(message.to_string())
        } else {
            Some(self.formatter.format(message, record.arguments()))
        }
    }
}

impl Writer for JsonFileWriter {
    fn required_fields(&self) -> FieldSet {
        FieldSet::of(Field::Message)
            .with(Field::Timestamp)
            .with(Field::Level)
            .with(Field::Class)
            .with(Field::Method)
            .with(Field::Thread)
    }

    fn log(&mut self, record: &LogRecord) -> Result<(), Error> {
        if self.closed {
            return Err(Error::Closed);
        }

        // Fields are included only when present, in a fixed order.
        let mut fields: Vec<String> = Vec::new();
        if let Some(message) = self.resolve_message(record) {
            fields.push(property("message", &message));
        }
        if let Some(timestamp) = record.timestamp() {
            fields.push(property(
                "timestamp",
                &timestamp.format(TIMESTAMP_FORMAT).to_string(),
            ));
        }
        if let Some(level) = record.level() {
            fields.push(property("level", level.display_name()));
        }
        if let Some(class) = record.class() {
            fields.push(property("class", class));
        }
        if let Some(method) = record.method() {
            fields.push(property("method", &format!("{method}()")));
        }
        if let Some(thread) = record.thread() {
            fields.push(property("thread", thread));
        }

        let separator = format!(",{LINE_SEPARATOR}");
        let object = format!(
            "{{{LINE_SEPARATOR}{}{LINE_SEPARATOR}}},",
            fields.join(&separator)
        );
        self.file.write(&self.charset.encode(&object))?;
        self.comma_pending = true;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Error> {
        if self.closed {
            return Ok(());
        }
        self.file.flush()?;
        Ok(())
    }

    fn close(&mut self) -> Result<(), Error> {
        if self.closed {
            return Ok(());
        }
        if self.comma_pending {
            self.file.flush()?;
            let len = self.file.flushed_len();
            self.file.truncate(len.saturating_sub(1))?;
        }
        self.file.write(b"]")?;
        self.file.close()?;
        self.closed = true;
        Ok(())
    }
}

fn property(name: &str, value: &str) -> String {
    format!(
        "\"{name}\": {}",
        serde_json::Value::String(value.to_string())
    )
}

/// Builder for [`JsonFileWriter`].
pub struct JsonFileBuilder {
    path: PathBuf,
    append: bool,
    buffered: bool,
    capacity: usize,
    charset: Charset,
    symbols: DecimalSymbols,
}

impl JsonFileBuilder {
    /// Continue an existing array instead of starting a fresh file.
    #[must_use]
    pub const fn append(mut self, append: bool) -> Self {
        self.append = append;
        self
    }

    #[must_use]
    pub const fn buffered(mut self, buffered: bool) -> Self {
        self.buffered = buffered;
        self
    }

    #[must_use]
    pub const fn buffer_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    #[must_use]
    pub const fn charset(mut self, charset: Charset) -> Self {
        self.charset = charset;
        self
    }

    /// Decimal symbols for message-argument sub-patterns.
    #[must_use]
    pub const fn symbols(mut self, symbols: DecimalSymbols) -> Self {
        self.symbols = symbols;
        self
    }

    /// Opens the file and splices or initializes the array delimiters.
    ///
    /// # Errors
    /// I/O failures, and [`Error::CorruptFile`] when appending to a
    /// non-empty file that contains no closing bracket.
    pub fn build(self) -> Result<JsonFileWriter, Error> {
        // Always an append-mode handle: closing truncates the trailing comma
        // and then writes the bracket, which must land at the new end.
        let mut file = LogFile::open(&self.path, true, self.capacity, self.buffered)?;
        let mut comma_pending = false;

        if !self.append && file.flushed_len() > 0 {
            file.truncate(0)?;
        }

        let existing = file.flushed_len();
        if self.append && existing > 0 {
            let to_truncate = bracket_offset(&self.path, existing)?;
            let remaining = existing - to_truncate;
            file.truncate(remaining)?;
            if remaining > 1 {
                file.write(b",")?;
                comma_pending = true;
            }
        }
        if file.flushed_len() == 0 {
            file.write(b"[")?;
        }

        Ok(JsonFileWriter {
            file,
            formatter: MessageFormatter::new(self.symbols),
            charset: self.charset,
            comma_pending,
            closed: false,
        })
    }
}

/// Scans backward from the end of the file in fixed-size blocks and returns
/// how many trailing bytes (up to and including the last `]`) must be cut.
fn bracket_offset(path: &Path, size: u64) -> Result<u64, Error> {
    let mut reader = fs::File::open(path)?;
    let mut buffer = [0_u8; SCAN_BLOCK];
    let mut position = size;
    let mut to_truncate: u64 = 0;

    while position > 0 {
        let from = position.saturating_sub(SCAN_BLOCK as u64);
        #[allow(clippy::cast_possible_truncation)]
        let length = (position - from) as usize;
        reader.seek(SeekFrom::Start(from))?;
        reader.read_exact(&mut buffer[..length])?;
        for i in (0..length).rev() {
            to_truncate += 1;
            if buffer[i] == b']' {
                return Ok(to_truncate);
            }
        }
        position = from;
    }

    Err(Error::CorruptFile(path.to_path_buf()))
}
