use std::time::Duration;

use patternlog::pattern::uptime::UptimeFormat;
use patternlog::pattern::{PatternCompiler, Placeholder, UptimePlaceholder};
use patternlog::record::Field;
use patternlog::{Decimal, LogRecord, RecordedStatement, SqlType, SqlValue};

fn format(pattern: &str, duration: Duration) -> String {
    UptimeFormat::parse(pattern).format(duration)
}

const NANO: Duration = Duration::from_nanos(1);

#[test]
fn minimum_second_fraction_digits() {
    assert_eq!(format("S", Duration::from_millis(100) - NANO), "0");
    assert_eq!(format("S", Duration::from_millis(100)), "1");
    assert_eq!(format("S", Duration::from_secs(1) - NANO), "9");
    assert_eq!(format("S", Duration::from_secs(1)), "0");
}

#[test]
fn maximum_second_fraction_digits() {
    assert_eq!(format("SSSSSSSSS", Duration::from_nanos(0)), "000000000");
    assert_eq!(format("SSSSSSSSS", Duration::from_nanos(1)), "000000001");
    assert_eq!(format("SSSSSSSSS", Duration::from_secs(1) - NANO), "999999999");
    assert_eq!(format("SSSSSSSSS", Duration::from_secs(1)), "000000000");
}

#[test]
fn too_many_second_fraction_digits_pad_right() {
    assert_eq!(format("SSSSSSSSSS", Duration::from_nanos(0)), "0000000000");
    assert_eq!(format("SSSSSSSSSS", Duration::from_nanos(1)), "0000000010");
    assert_eq!(
        format("SSSSSSSSSS", Duration::from_secs(1) - NANO),
        "9999999990"
    );
    assert_eq!(format("SSSSSSSSSS", Duration::from_secs(1)), "0000000000");
}

#[test]
fn seconds_alone_are_a_total_count() {
    assert_eq!(format("s", Duration::from_secs(1) - NANO), "0");
    assert_eq!(format("s", Duration::from_secs(1)), "1");
    assert_eq!(format("s", Duration::from_secs(10) - NANO), "9");
    assert_eq!(format("s", Duration::from_secs(10)), "10");
    assert_eq!(format("s", Duration::from_secs(100) - NANO), "99");
}

#[test]
fn seconds_with_fraction() {
    assert_eq!(format("s.SSS", Duration::from_secs(1) - NANO), "0.999");
    assert_eq!(format("s.SSS", Duration::from_secs(1)), "1.000");
    assert_eq!(format("s.SSS", Duration::from_secs(10) - NANO), "9.999");
    assert_eq!(format("s.SSS", Duration::from_secs(10)), "10.000");
    assert_eq!(format("s.SSS", Duration::from_secs(100) - NANO), "99.999");
}

#[test]
fn minutes_alone_are_a_total_count() {
    assert_eq!(format("m", Duration::from_secs(60) - NANO), "0");
    assert_eq!(format("m", Duration::from_secs(60)), "1");
    assert_eq!(format("m", Duration::from_secs(600)), "10");
    assert_eq!(format("m", Duration::from_secs(6000) - NANO), "99");
}

#[test]
fn seconds_are_reduced_only_when_paired_with_minutes() {
    assert_eq!(format("m:ss", Duration::from_secs(60) - NANO), "0:59");
    assert_eq!(format("m:ss", Duration::from_secs(60)), "1:00");
    assert_eq!(format("m:ss", Duration::from_secs(600) - NANO), "9:59");
    assert_eq!(format("m:ss", Duration::from_secs(600)), "10:00");
    assert_eq!(format("m:ss", Duration::from_secs(6000) - NANO), "99:59");
}

#[test]
fn hours_alone_and_with_minutes() {
    assert_eq!(format("H", Duration::from_secs(3600)), "1");
    assert_eq!(format("H", Duration::from_secs(36000) - NANO), "9");
    assert_eq!(format("H", Duration::from_secs(360_000) - NANO), "99");
    assert_eq!(format("H:mm", Duration::from_secs(3600) - NANO), "0:59");
    assert_eq!(format("H:mm", Duration::from_secs(3600)), "1:00");
    assert_eq!(format("H:mm", Duration::from_secs(36000)), "10:00");
}

#[test]
fn days_alone_and_with_hours() {
    const DAY: u64 = 24 * 60 * 60;
    assert_eq!(format("d", Duration::from_secs(DAY)), "1");
    assert_eq!(format("d", Duration::from_secs(10 * DAY) - NANO), "9");
    assert_eq!(format("d", Duration::from_secs(100 * DAY) - NANO), "99");
    assert_eq!(format("d:HH", Duration::from_secs(DAY) - NANO), "0:23");
    assert_eq!(format("d:HH", Duration::from_secs(DAY)), "1:00");
    assert_eq!(format("d:HH", Duration::from_secs(10 * DAY)), "10:00");
}

#[test]
fn quoted_literals_and_ticks() {
    let almost_a_day = Duration::from_secs(24 * 60 * 60) - NANO;
    assert_eq!(format("HH'mm", almost_a_day), "23'59");
    assert_eq!(format("HH''mm", almost_a_day), "23'59");
    assert_eq!(format("HH'h'mm", almost_a_day), "23h59");
    assert_eq!(format("H 'hours'", almost_a_day), "23 hours");
}

#[test]
fn full_pattern_with_padded_days() {
    let duration = Duration::from_secs(42 * 24 * 60 * 60) - NANO;
    assert_eq!(format("ddd:HH:mm:ss.SSS", duration), "041:23:59:59.999");
}

#[test]
fn uptime_placeholder_renders_marker_without_uptime() {
    let placeholder = UptimePlaceholder::new("HH:mm", false);
    let mut out = String::new();
    placeholder.render(&mut out, &LogRecord::builder().build());
    assert_eq!(out, "<uptime unknown>");
}

#[test]
fn uptime_placeholder_requires_the_uptime_field() {
    let placeholder = UptimePlaceholder::new("HH:mm", false);
    let required = placeholder.required_fields();
    assert!(required.contains(Field::Uptime));
    assert!(!required.contains(Field::Timestamp));
}

#[test]
fn uptime_binds_decimal_seconds_by_default() {
    let placeholder = UptimePlaceholder::new("s", false);

    let cases = [
        (Duration::from_secs(0), "0.000000000"),
        (Duration::from_secs(1) - NANO, "0.999999999"),
        (Duration::from_secs(1), "1.000000000"),
        (Duration::from_secs(60) - NANO, "59.999999999"),
        (Duration::from_secs(60), "60.000000000"),
    ];
    for (duration, expected) in cases {
        let mut statement = RecordedStatement::new();
        let record = LogRecord::builder().uptime(duration).build();
        placeholder.bind(&mut statement, 42, &record).unwrap();
        match statement.parameter(42) {
            Some(SqlValue::Decimal(decimal)) => assert_eq!(decimal.to_string(), expected),
            other => panic!("expected a decimal parameter, got {other:?}"),
        }
    }

    let mut statement = RecordedStatement::new();
    placeholder
        .bind(&mut statement, 42, &LogRecord::builder().build())
        .unwrap();
    assert_eq!(
        statement.parameter(42),
        Some(&SqlValue::Null(SqlType::Decimal))
    );
}

#[test]
fn uptime_binds_formatted_text_with_the_sql_modifier() {
    let placeholder = PatternCompiler::new()
        .compile("{uptime: m:ss | sql: text}")
        .unwrap();
    let record = LogRecord::builder()
        .uptime(Duration::from_secs(600))
        .build();

    let mut statement = RecordedStatement::new();
    placeholder.bind(&mut statement, 1, &record).unwrap();
    assert_eq!(
        statement.parameter(1),
        Some(&SqlValue::Text("10:00".to_string()))
    );

    let mut statement = RecordedStatement::new();
    placeholder
        .bind(&mut statement, 1, &LogRecord::builder().build())
        .unwrap();
    assert_eq!(statement.parameter(1), Some(&SqlValue::Null(SqlType::Text)));
}

#[test]
fn decimal_display_is_zero_padded() {
    assert_eq!(Decimal::new(999_999_999, 9).to_string(), "0.999999999");
    assert_eq!(Decimal::new(-1_500_000_000, 9).to_string(), "-1.500000000");
    assert_eq!(Decimal::new(42, 0).to_string(), "42");
}
