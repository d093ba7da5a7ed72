use std::fs;
use std::sync::Arc;

use patternlog::writer::{RollingFileWriter, SynchronizedWriter};
use patternlog::{Level, LogRecord, PatternCompiler, Writer};
use tempfile::TempDir;

#[test]
fn synchronized_writer_serializes_shared_access() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("shared.log");

    let inner = RollingFileWriter::builder(&path)
        .placeholder(PatternCompiler::new().compile("{message}").unwrap())
        .buffered(false)
        .build()
        .unwrap();
    let writer = Arc::new(SynchronizedWriter::new(Box::new(inner)));

    let mut handles = Vec::new();
    for thread in 0..4 {
        let writer = Arc::clone(&writer);
        handles.push(std::thread::spawn(move || {
            for i in 0..10 {
                let record = LogRecord::builder()
                    .level(Level::Info)
                    .message(format!("t{thread} line {i}"))
                    .build();
                writer.log_shared(&record).unwrap();
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }
    writer.close_shared().unwrap();

    // Every line arrives whole; nothing interleaves mid-line.
    let content = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 40);
    for line in lines {
        assert!(line.starts_with('t') && line.contains(" line "));
    }
}

#[test]
fn synchronized_writer_forwards_the_inner_contract() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("shared.log");

    let inner = RollingFileWriter::builder(&path)
        .placeholder(PatternCompiler::new().compile("{message}").unwrap())
        .build()
        .unwrap();
    let mut writer = SynchronizedWriter::new(Box::new(inner));

    let record = LogRecord::builder().message("through").build();
    writer.log(&record).unwrap();
    writer.flush().unwrap();
    writer.close().unwrap();
    writer.close().unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "through\n");
}
