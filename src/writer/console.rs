//! Console writer: no buffering, no rotation, per-call flush.

use std::io::Write;

use super::{LINE_SEPARATOR, Writer};
use crate::error::Error;
use crate::level::Level;
use crate::pattern::Placeholder;
use crate::record::{Field, FieldSet, LogRecord};

/// Routes each record to one of two streams by severity: records at or
/// above the threshold go to the error stream, the rest to the standard
/// stream. Output is line-oriented and low-volume, so every record is
/// flushed immediately.
pub struct ConsoleWriter {
    placeholder: Box<dyn Placeholder>,
    threshold: Level,
    out: Box<dyn Write + Send>,
    err: Box<dyn Write + Send>,
}

impl ConsoleWriter {
    /// Writer over the process stdout/stderr streams.
    #[must_use]
    pub fn new(placeholder: Box<dyn Placeholder>, threshold: Level) -> Self {
        Self::with_streams(
            placeholder,
            threshold,
            Box::new(std::io::stdout()),
            Box::new(std::io::stderr()),
        )
    }

    /// Injectable streams, used by tests and by embedders that redirect
    /// console output.
    #[must_use]
    pub fn with_streams(
        placeholder: Box<dyn Placeholder>,
        threshold: Level,
        out: Box<dyn Write + Send>,
        err: Box<dyn Write + Send>,
    ) -> Self {
        Self {
            placeholder,
            threshold,
            out,
            err,
        }
    }
}

impl Writer for ConsoleWriter {
    fn required_fields(&self) -> FieldSet {
        // Stream routing reads the level even when no placeholder does.
        self.placeholder.required_fields().with(Field::Level)
    }

    fn log(&mut self, record: &LogRecord) -> Result<(), Error> {
        let mut line = String::with_capacity(128);
        self.placeholder.render(&mut line, record);
        line.push_str(LINE_SEPARATOR);

        let severe = record.level().is_some_and(|level| level >= self.threshold);
        let stream = if severe { &mut self.err } else { &mut self.out };
        stream.write_all(line.as_bytes())?;
        stream.flush()?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Error> {
        self.out.flush()?;
        self.err.flush()?;
        Ok(())
    }

    fn close(&mut self) -> Result<(), Error> {
        self.flush()
    }
}
