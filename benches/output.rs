use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use patternlog::writer::RollingFileWriter;
use patternlog::{Level, LogRecord, PatternCompiler, SizePolicy, Writer};
use tempfile::TempDir;

fn sample_record() -> LogRecord {
    LogRecord::builder()
        .level(Level::Info)
        .thread("main")
        .message("benchmark line with a realistic amount of text")
        .build()
}

fn bench_buffered_file_writer(c: &mut Criterion) {
    let dir = TempDir::new().unwrap();
    let mut writer = RollingFileWriter::builder(dir.path().join("bench.log"))
        .placeholder(PatternCompiler::new().compile("{level} [{thread}] {message}").unwrap())
        .build()
        .unwrap();
    let record = sample_record();

    c.bench_function("RollingFileWriter::log buffered", |b| {
        b.iter(|| writer.log(black_box(&record)).unwrap());
    });
    writer.close().unwrap();
}

fn bench_unbuffered_file_writer(c: &mut Criterion) {
    let dir = TempDir::new().unwrap();
    let mut writer = RollingFileWriter::builder(dir.path().join("bench.log"))
        .placeholder(PatternCompiler::new().compile("{level} [{thread}] {message}").unwrap())
        .buffered(false)
        .build()
        .unwrap();
    let record = sample_record();

    c.bench_function("RollingFileWriter::log unbuffered", |b| {
        b.iter(|| writer.log(black_box(&record)).unwrap());
    });
    writer.close().unwrap();
}

fn bench_rotating_file_writer(c: &mut Criterion) {
    let dir = TempDir::new().unwrap();
    let mut writer = RollingFileWriter::builder(dir.path().join("bench.log"))
        .placeholder(PatternCompiler::new().compile("{message}").unwrap())
        .policy(Box::new(SizePolicy::new(1024 * 1024)))
        .build()
        .unwrap();
    let record = sample_record();

    c.bench_function("RollingFileWriter::log with size policy", |b| {
        b.iter(|| writer.log(black_box(&record)).unwrap());
    });
    writer.close().unwrap();
}

criterion_group!(
    benches,
    bench_buffered_file_writer,
    bench_unbuffered_file_writer,
    bench_rotating_file_writer
);
criterion_main!(benches);
