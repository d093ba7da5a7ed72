use chrono::TimeZone;
use patternlog::record::Field;
use patternlog::{
    Level, LogRecord, PatternCompiler, PatternError, Placeholder, RecordedStatement, SqlType,
    SqlValue,
};

fn render(pattern: &str, record: &LogRecord) -> String {
    let placeholder = PatternCompiler::new().compile(pattern).unwrap();
    let mut out = String::new();
    placeholder.render(&mut out, record);
    out
}

#[test]
fn level_and_message_render_end_to_end() {
    let record = LogRecord::builder()
        .level(Level::Info)
        .message("Hello World!")
        .build();

    assert_eq!(render("{level}:{message}", &record), "INFO:Hello World!");
}

#[test]
fn literal_text_passes_through() {
    let record = LogRecord::builder().build();
    assert_eq!(render("plain text", &record), "plain text");
}

#[test]
fn escaped_braces_render_literally() {
    let record = LogRecord::builder().level(Level::Warn).build();
    assert_eq!(render("\\{{level}\\}", &record), "{WARN}");
}

#[test]
fn unknown_placeholder_fails_compilation_with_name() {
    let error = PatternCompiler::new().compile("{bogus}").unwrap_err();
    assert_eq!(error, PatternError::UnknownPlaceholder("bogus".to_string()));
}

#[test]
fn unmatched_braces_fail_compilation() {
    assert!(matches!(
        PatternCompiler::new().compile("{level"),
        Err(PatternError::UnmatchedBrace(_))
    ));
    assert!(matches!(
        PatternCompiler::new().compile("level}"),
        Err(PatternError::UnmatchedBrace(_))
    ));
}

#[test]
fn unknown_modifier_fails_compilation() {
    let error = PatternCompiler::new()
        .compile("{level | sparkle: 3}")
        .unwrap_err();
    assert_eq!(error, PatternError::UnknownModifier("sparkle".to_string()));
}

#[test]
fn missing_fields_render_markers() {
    let record = LogRecord::builder().build();
    assert_eq!(render("{level}", &record), "<level unknown>");
    assert_eq!(render("{class}", &record), "<class unknown>");
    assert_eq!(render("{thread}", &record), "<thread unknown>");
    assert_eq!(render("{uptime}", &record), "<uptime unknown>");
    assert_eq!(render("{date}", &record), "<timestamp unknown>");
    assert_eq!(render("{message}", &record), "<message unknown>");
}

#[test]
fn date_placeholder_formats_timestamp() {
    let timestamp = chrono::Local.with_ymd_and_hms(2025, 1, 15, 14, 30, 5).unwrap();
    let record = LogRecord::builder().timestamp(timestamp).build();
    assert_eq!(render("{date}", &record), "2025-01-15 14:30:05");
    assert_eq!(render("{date: %H:%M}", &record), "14:30");
}

#[test]
fn invalid_date_pattern_fails_compilation() {
    assert!(matches!(
        PatternCompiler::new().compile("{date: %Q}"),
        Err(PatternError::InvalidArgument { .. })
    ));
}

#[test]
fn timestamp_placeholder_renders_epoch_counts() {
    let timestamp = chrono::Local.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
    let record = LogRecord::builder().timestamp(timestamp).build();

    assert_eq!(
        render("{timestamp: seconds}", &record),
        timestamp.timestamp().to_string()
    );
    assert_eq!(
        render("{timestamp}", &record),
        timestamp.timestamp_millis().to_string()
    );
}

#[test]
fn timestamp_placeholder_binds_bigint_and_typed_null() {
    let timestamp = chrono::Local.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
    let placeholder = PatternCompiler::new().compile("{timestamp: seconds}").unwrap();

    let mut statement = RecordedStatement::new();
    let record = LogRecord::builder().timestamp(timestamp).build();
    placeholder.bind(&mut statement, 1, &record).unwrap();
    assert_eq!(
        statement.parameter(1),
        Some(&SqlValue::BigInt(timestamp.timestamp()))
    );

    let mut statement = RecordedStatement::new();
    let empty = LogRecord::builder().build();
    placeholder.bind(&mut statement, 1, &empty).unwrap();
    assert_eq!(statement.parameter(1), Some(&SqlValue::Null(SqlType::BigInt)));
}

#[test]
fn bundle_renders_children_in_order_and_binds_combined_text() {
    let placeholder = PatternCompiler::new().compile("Class: {class}").unwrap();
    let record = LogRecord::builder().class("foo.MyClass").build();

    let mut out = String::new();
    placeholder.render(&mut out, &record);
    assert_eq!(out, "Class: foo.MyClass");

    let mut statement = RecordedStatement::new();
    placeholder.bind(&mut statement, 42, &record).unwrap();
    assert_eq!(
        statement.parameter(42),
        Some(&SqlValue::Text("Class: foo.MyClass".to_string()))
    );
}

#[test]
fn required_fields_are_the_union_of_children() {
    let placeholder = PatternCompiler::new()
        .compile("{date} {class} said: {message}")
        .unwrap();
    let required = placeholder.required_fields();

    assert!(required.contains(Field::Timestamp));
    assert!(required.contains(Field::Class));
    assert!(required.contains(Field::Message));
    assert!(!required.contains(Field::Thread));
    assert!(!required.contains(Field::Level));
}

#[test]
fn static_text_requires_no_fields() {
    let placeholder = PatternCompiler::new().compile("nothing here").unwrap();
    assert!(placeholder.required_fields().is_empty());
}

#[test]
fn max_length_modifier_truncates() {
    let record = LogRecord::builder().class("org.example.Service").build();
    assert_eq!(render("{class | max-length: 11}", &record), "org.example");
}

#[test]
fn min_length_modifier_pads() {
    let record = LogRecord::builder().level(Level::Info).build();
    assert_eq!(render("{level | min-length: 6}|", &record), "INFO  |");
}

#[test]
fn context_placeholder_reads_named_values() {
    let record = LogRecord::builder().context("request", "abc-123").build();
    assert_eq!(render("{context: request}", &record), "abc-123");

    let empty = LogRecord::builder().build();
    assert_eq!(render("{context: request}", &empty), "");
}

#[test]
fn context_placeholder_requires_a_key() {
    assert!(matches!(
        PatternCompiler::new().compile("{context}"),
        Err(PatternError::MissingArgument(_))
    ));
}

#[test]
fn exception_placeholder_renders_description_and_causes() {
    let exception = patternlog::ExceptionInfo::new("connection refused");
    let record = LogRecord::builder().exception(exception).build();
    assert_eq!(render("{exception}", &record), "connection refused");

    let empty = LogRecord::builder().build();
    assert_eq!(render("{exception}", &empty), "");
}

#[test]
fn message_placeholder_substitutes_arguments() {
    let record = LogRecord::builder()
        .message("{} of {} done")
        .argument(3)
        .argument(10)
        .build();
    assert_eq!(render("{message}", &record), "3 of 10 done");
}
