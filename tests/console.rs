use std::io::Write as IoWrite;
use std::sync::{Arc, Mutex};

use patternlog::record::Field;
use patternlog::writer::ConsoleWriter;
use patternlog::{Level, LogRecord, PatternCompiler, Writer};

/// Captures stream output so routing can be asserted.
#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl IoWrite for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

fn writer_with_buffers(threshold: Level) -> (ConsoleWriter, SharedBuffer, SharedBuffer) {
    let out = SharedBuffer::default();
    let err = SharedBuffer::default();
    let writer = ConsoleWriter::with_streams(
        PatternCompiler::new().compile("{level}: {message}").unwrap(),
        threshold,
        Box::new(out.clone()),
        Box::new(err.clone()),
    );
    (writer, out, err)
}

fn record(level: Level, message: &str) -> LogRecord {
    LogRecord::builder().level(level).message(message).build()
}

#[test]
fn severity_at_or_above_the_threshold_goes_to_the_error_stream() {
    let (mut writer, out, err) = writer_with_buffers(Level::Warn);

    writer.log(&record(Level::Info, "routine")).unwrap();
    writer.log(&record(Level::Warn, "attention")).unwrap();
    writer.log(&record(Level::Error, "broken")).unwrap();
    writer.close().unwrap();

    assert_eq!(out.contents(), "INFO: routine\n");
    assert_eq!(err.contents(), "WARN: attention\nERROR: broken\n");
}

#[test]
fn records_without_a_level_go_to_the_standard_stream() {
    let (mut writer, out, err) = writer_with_buffers(Level::Warn);

    let record = LogRecord::builder().message("unleveled").build();
    writer.log(&record).unwrap();

    assert_eq!(out.contents(), "<level unknown>: unleveled\n");
    assert_eq!(err.contents(), "");
}

#[test]
fn console_requires_the_level_even_when_no_placeholder_reads_it() {
    let writer = ConsoleWriter::with_streams(
        PatternCompiler::new().compile("{message}").unwrap(),
        Level::Error,
        Box::new(SharedBuffer::default()),
        Box::new(SharedBuffer::default()),
    );

    let required = writer.required_fields();
    assert!(required.contains(Field::Level));
    assert!(required.contains(Field::Message));
}

#[test]
fn every_record_is_flushed_immediately() {
    let (mut writer, out, _err) = writer_with_buffers(Level::Error);

    writer.log(&record(Level::Info, "visible at once")).unwrap();
    assert_eq!(out.contents(), "INFO: visible at once\n");
}
