use std::fs;

use chrono::TimeZone;
use patternlog::writer::JsonFileWriter;
use patternlog::{Error, Level, LogRecord, Writer};
use tempfile::TempDir;

fn record(message: &str) -> LogRecord {
    LogRecord::builder()
        .level(Level::Info)
        .message(message)
        .build()
}

fn parse_array(path: &std::path::Path) -> Vec<serde_json::Value> {
    let content = fs::read_to_string(path).unwrap();
    serde_json::from_str::<Vec<serde_json::Value>>(&content).unwrap()
}

#[test]
fn fresh_file_becomes_a_well_formed_array() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("log.json");

    let mut writer = JsonFileWriter::builder(&path).build().unwrap();
    writer.log(&record("first")).unwrap();
    writer.log(&record("second")).unwrap();
    writer.close().unwrap();

    let entries = parse_array(&path);
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["message"], "first");
    assert_eq!(entries[0]["level"], "INFO");
    assert_eq!(entries[1]["message"], "second");
}

#[test]
fn fields_are_included_only_when_present() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("log.json");

    let timestamp = chrono::Local.with_ymd_and_hms(2025, 1, 15, 14, 30, 0).unwrap();
    let full = LogRecord::builder()
        .timestamp(timestamp)
        .level(Level::Warn)
        .class("com.example.App")
        .method("run")
        .thread("main")
        .message("full record")
        .build();
    let bare = LogRecord::builder().message("bare record").build();

    let mut writer = JsonFileWriter::builder(&path).build().unwrap();
    writer.log(&full).unwrap();
    writer.log(&bare).unwrap();
    writer.close().unwrap();

    let entries = parse_array(&path);
    assert_eq!(entries[0]["timestamp"], "2025-01-15 14:30:00");
    assert_eq!(entries[0]["level"], "WARN");
    assert_eq!(entries[0]["class"], "com.example.App");
    assert_eq!(entries[0]["method"], "run()");
    assert_eq!(entries[0]["thread"], "main");

    let bare_object = entries[1].as_object().unwrap();
    assert_eq!(bare_object.len(), 1);
    assert_eq!(bare_object["message"], "bare record");
}

#[test]
fn reopening_in_append_mode_splices_into_the_array() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("log.json");

    let mut writer = JsonFileWriter::builder(&path).build().unwrap();
    writer.log(&record("one")).unwrap();
    writer.log(&record("two")).unwrap();
    writer.close().unwrap();

    let mut writer = JsonFileWriter::builder(&path).build().unwrap();
    writer.log(&record("three")).unwrap();
    writer.close().unwrap();

    let entries = parse_array(&path);
    let messages: Vec<&str> = entries
        .iter()
        .map(|entry| entry["message"].as_str().unwrap())
        .collect();
    assert_eq!(messages, vec!["one", "two", "three"]);
}

#[test]
fn closing_without_records_leaves_an_empty_array() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("log.json");

    let mut writer = JsonFileWriter::builder(&path).build().unwrap();
    writer.close().unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "[]");
    assert!(parse_array(&path).is_empty());
}

#[test]
fn reopening_an_empty_array_and_closing_again_stays_valid() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("log.json");

    let mut writer = JsonFileWriter::builder(&path).build().unwrap();
    writer.close().unwrap();

    let mut writer = JsonFileWriter::builder(&path).build().unwrap();
    writer.log(&record("later")).unwrap();
    writer.close().unwrap();

    let entries = parse_array(&path);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["message"], "later");
}

#[test]
fn appending_to_a_file_without_a_bracket_is_refused() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("log.json");
    fs::write(&path, "not a json array").unwrap();

    let result = JsonFileWriter::builder(&path).build();
    assert!(matches!(result, Err(Error::CorruptFile(_))));
}

#[test]
fn message_arguments_are_substituted() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("log.json");

    let record = LogRecord::builder()
        .message("{} of {}")
        .argument(2)
        .argument(8)
        .build();

    let mut writer = JsonFileWriter::builder(&path).build().unwrap();
    writer.log(&record).unwrap();
    writer.close().unwrap();

    assert_eq!(parse_array(&path)[0]["message"], "2 of 8");
}

#[test]
fn special_characters_are_escaped() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("log.json");

    let mut writer = JsonFileWriter::builder(&path).build().unwrap();
    writer.log(&record("quote \" backslash \\ newline \n")).unwrap();
    writer.close().unwrap();

    assert_eq!(
        parse_array(&path)[0]["message"],
        "quote \" backslash \\ newline \n"
    );
}

#[test]
fn close_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("log.json");

    let mut writer = JsonFileWriter::builder(&path).build().unwrap();
    writer.log(&record("only")).unwrap();
    writer.close().unwrap();
    writer.close().unwrap();

    assert_eq!(parse_array(&path).len(), 1);
    assert!(matches!(writer.log(&record("late")), Err(Error::Closed)));
}
