//! Concrete placeholders over the optional record fields.
//!
//! Each placeholder renders a fixed `<field unknown>` marker when its field
//! is absent; free-form suffix placeholders (`context`, `exception`) render
//! nothing instead, so absence does not corrupt otherwise-valid lines.

use chrono::{DateTime, Local, Locale};

use super::Placeholder;
use super::uptime::UptimeFormat;
use crate::error::Error;
use crate::message::MessageFormatter;
use crate::record::{Field, FieldSet, LogRecord};
use crate::sql::{Decimal, SqlStatement, SqlType, SqlValue};

fn bind_text(
    statement: &mut dyn SqlStatement,
    index: usize,
    value: Option<String>,
) -> Result<(), Error> {
    match value {
        Some(text) => statement.bind(index, SqlValue::Text(text)),
        None => statement.bind(index, SqlValue::Null(SqlType::Text)),
    }
}

/// Literal text between placeholders; ignores the record entirely.
#[derive(Debug, Clone)]
pub struct StaticTextPlaceholder {
    text: String,
}

impl StaticTextPlaceholder {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl Placeholder for StaticTextPlaceholder {
    fn required_fields(&self) -> FieldSet {
        FieldSet::EMPTY
    }

    fn render(&self, out: &mut String, _record: &LogRecord) {
        out.push_str(&self.text);
    }

    fn bind(
        &self,
        statement: &mut dyn SqlStatement,
        index: usize,
        _record: &LogRecord,
    ) -> Result<(), Error> {
        statement.bind(index, SqlValue::Text(self.text.clone()))
    }
}

/// Ordered sequence of child placeholders, rendered in order.
///
/// Owns its children exclusively; the required set is the union of the
/// children's. Binding renders the whole sequence and binds one text
/// parameter.
#[derive(Debug)]
pub struct Bundle {
    children: Vec<Box<dyn Placeholder>>,
}

impl Bundle {
    #[must_use]
    pub fn new(children: Vec<Box<dyn Placeholder>>) -> Self {
        Self { children }
    }
}

impl Placeholder for Bundle {
    fn required_fields(&self) -> FieldSet {
        self.children
            .iter()
            .fold(FieldSet::EMPTY, |set, child| {
                set.union(child.required_fields())
            })
    }

    fn render(&self, out: &mut String, record: &LogRecord) {
        for child in &self.children {
            child.render(out, record);
        }
    }

    fn bind(
        &self,
        statement: &mut dyn SqlStatement,
        index: usize,
        record: &LogRecord,
    ) -> Result<(), Error> {
        let mut text = String::new();
        self.render(&mut text, record);
        statement.bind(index, SqlValue::Text(text))
    }
}

/// Severity level, rendered uppercase.
#[derive(Debug, Clone, Copy, Default)]
pub struct LevelPlaceholder;

impl Placeholder for LevelPlaceholder {
    fn required_fields(&self) -> FieldSet {
        FieldSet::of(Field::Level)
    }

    fn render(&self, out: &mut String, record: &LogRecord) {
        match record.level() {
            Some(level) => out.push_str(level.display_name()),
            None => out.push_str("<level unknown>"),
        }
    }

    fn bind(
        &self,
        statement: &mut dyn SqlStatement,
        index: usize,
        record: &LogRecord,
    ) -> Result<(), Error> {
        bind_text(
            statement,
            index,
            record.level().map(|l| l.display_name().to_string()),
        )
    }
}

/// Fully qualified type name of the issuing call site.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassPlaceholder;

impl Placeholder for ClassPlaceholder {
    fn required_fields(&self) -> FieldSet {
        FieldSet::of(Field::Class)
    }

    fn render(&self, out: &mut String, record: &LogRecord) {
        out.push_str(record.class().unwrap_or("<class unknown>"));
    }

    fn bind(
        &self,
        statement: &mut dyn SqlStatement,
        index: usize,
        record: &LogRecord,
    ) -> Result<(), Error> {
        bind_text(statement, index, record.class().map(str::to_string))
    }
}

/// Method name of the issuing call site.
#[derive(Debug, Clone, Copy, Default)]
pub struct MethodPlaceholder;

impl Placeholder for MethodPlaceholder {
    fn required_fields(&self) -> FieldSet {
        FieldSet::of(Field::Method)
    }

    fn render(&self, out: &mut String, record: &LogRecord) {
        out.push_str(record.method().unwrap_or("<method unknown>"));
    }

    fn bind(
        &self,
        statement: &mut dyn SqlStatement,
        index: usize,
        record: &LogRecord,
    ) -> Result<(), Error> {
        bind_text(statement, index, record.method().map(str::to_string))
    }
}

/// Name of the issuing thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadPlaceholder;

impl Placeholder for ThreadPlaceholder {
    fn required_fields(&self) -> FieldSet {
        FieldSet::of(Field::Thread)
    }

    fn render(&self, out: &mut String, record: &LogRecord) {
        out.push_str(record.thread().unwrap_or("<thread unknown>"));
    }

    fn bind(
        &self,
        statement: &mut dyn SqlStatement,
        index: usize,
        record: &LogRecord,
    ) -> Result<(), Error> {
        bind_text(statement, index, record.thread().map(str::to_string))
    }
}

/// Free-form tag assigned at the call site.
#[derive(Debug, Clone, Copy, Default)]
pub struct TagPlaceholder;

impl Placeholder for TagPlaceholder {
    fn required_fields(&self) -> FieldSet {
        FieldSet::of(Field::Tag)
    }

    fn render(&self, out: &mut String, record: &LogRecord) {
        out.push_str(record.tag().unwrap_or("<tag unknown>"));
    }

    fn bind(
        &self,
        statement: &mut dyn SqlStatement,
        index: usize,
        record: &LogRecord,
    ) -> Result<(), Error> {
        bind_text(statement, index, record.tag().map(str::to_string))
    }
}

/// Timestamp of issue formatted through a strftime pattern, optionally
/// locale-aware.
#[derive(Debug, Clone)]
pub struct DatePlaceholder {
    pattern: String,
    locale: Option<Locale>,
}

impl DatePlaceholder {
    /// The pattern must already be validated by the compiler; rendering an
    /// invalid pattern would not be total.
    #[must_use]
    pub fn new(pattern: impl Into<String>, locale: Option<Locale>) -> Self {
        Self {
            pattern: pattern.into(),
            locale,
        }
    }

    fn format(&self, timestamp: DateTime<Local>) -> String {
        use std::fmt::Write;
        let mut text = String::new();
        // The compiler validated the pattern; a formatting error here would
        // only drop the value, never fail the render.
        let _ = match self.locale {
            Some(locale) => write!(text, "{}", timestamp.format_localized(&self.pattern, locale)),
            None => write!(text, "{}", timestamp.format(&self.pattern)),
        };
        text
    }
}

impl Placeholder for DatePlaceholder {
    fn required_fields(&self) -> FieldSet {
        FieldSet::of(Field::Timestamp)
    }

    fn render(&self, out: &mut String, record: &LogRecord) {
        match record.timestamp() {
            Some(timestamp) => out.push_str(&self.format(timestamp)),
            None => out.push_str("<timestamp unknown>"),
        }
    }

    fn bind(
        &self,
        statement: &mut dyn SqlStatement,
        index: usize,
        record: &LogRecord,
    ) -> Result<(), Error> {
        bind_text(statement, index, record.timestamp().map(|t| self.format(t)))
    }
}

/// Timestamp of issue as an integer epoch count.
///
/// The instant-to-integer conversion is injected, so the same placeholder
/// covers epoch millis and epoch seconds.
#[derive(Debug, Clone, Copy)]
pub struct TimestampPlaceholder {
    mapper: fn(&DateTime<Local>) -> i64,
}

impl TimestampPlaceholder {
    #[must_use]
    pub fn new(mapper: fn(&DateTime<Local>) -> i64) -> Self {
        Self { mapper }
    }

    /// Epoch milliseconds.
    #[must_use]
    pub fn milliseconds() -> Self {
        Self::new(|t| t.timestamp_millis())
    }

    /// Epoch seconds.
    #[must_use]
    pub fn seconds() -> Self {
        Self::new(|t| t.timestamp())
    }
}

impl Placeholder for TimestampPlaceholder {
    fn required_fields(&self) -> FieldSet {
        FieldSet::of(Field::Timestamp)
    }

    fn render(&self, out: &mut String, record: &LogRecord) {
        use std::fmt::Write;
        match record.timestamp() {
            Some(timestamp) => {
                let _ = write!(out, "{}", (self.mapper)(&timestamp));
            }
            None => out.push_str("<timestamp unknown>"),
        }
    }

    fn bind(
        &self,
        statement: &mut dyn SqlStatement,
        index: usize,
        record: &LogRecord,
    ) -> Result<(), Error> {
        match record.timestamp() {
            Some(timestamp) => statement.bind(index, SqlValue::BigInt((self.mapper)(&timestamp))),
            None => statement.bind(index, SqlValue::Null(SqlType::BigInt)),
        }
    }
}

/// Elapsed time since process start, formatted through a d/H/m/s/S pattern.
#[derive(Debug, Clone)]
pub struct UptimePlaceholder {
    format: UptimeFormat,
    /// Bind the formatted text instead of a decimal second count.
    sql_text: bool,
}

impl UptimePlaceholder {
    #[must_use]
    pub fn new(pattern: &str, sql_text: bool) -> Self {
        Self {
            format: UptimeFormat::parse(pattern),
            sql_text,
        }
    }
}

impl Placeholder for UptimePlaceholder {
    fn required_fields(&self) -> FieldSet {
        FieldSet::of(Field::Uptime)
    }

    fn render(&self, out: &mut String, record: &LogRecord) {
        match record.uptime() {
            Some(uptime) => self.format.format_into(uptime, out),
            None => out.push_str("<uptime unknown>"),
        }
    }

    fn bind(
        &self,
        statement: &mut dyn SqlStatement,
        index: usize,
        record: &LogRecord,
    ) -> Result<(), Error> {
        if self.sql_text {
            bind_text(statement, index, record.uptime().map(|u| self.format.format(u)))
        } else {
            match record.uptime() {
                Some(uptime) => {
                    statement.bind(index, SqlValue::Decimal(Decimal::from_duration(uptime)))
                }
                None => statement.bind(index, SqlValue::Null(SqlType::Decimal)),
            }
        }
    }
}

/// Log message with positional arguments substituted.
#[derive(Debug, Clone, Default)]
pub struct MessagePlaceholder {
    formatter: MessageFormatter,
}

impl MessagePlaceholder {
    #[must_use]
    pub const fn new(formatter: MessageFormatter) -> Self {
        Self { formatter }
    }

    fn resolve(&self, record: &LogRecord) -> Option<String> {
        let message = record.message()?;
        if record.arguments().is_empty() {
            Some(message.to_string())
        } else {
            Some(self.formatter.format(message, record.arguments()))
        }
    }
}

impl Placeholder for MessagePlaceholder {
    fn required_fields(&self) -> FieldSet {
        FieldSet::of(Field::Message)
    }

    fn render(&self, out: &mut String, record: &LogRecord) {
        match self.resolve(record) {
            Some(message) => out.push_str(&message),
            None => out.push_str("<message unknown>"),
        }
    }

    fn bind(
        &self,
        statement: &mut dyn SqlStatement,
        index: usize,
        record: &LogRecord,
    ) -> Result<(), Error> {
        bind_text(statement, index, self.resolve(record))
    }
}

/// Named context value; absent keys render nothing.
#[derive(Debug, Clone)]
pub struct ContextPlaceholder {
    key: String,
}

impl ContextPlaceholder {
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl Placeholder for ContextPlaceholder {
    fn required_fields(&self) -> FieldSet {
        FieldSet::of(Field::Context)
    }

    fn render(&self, out: &mut String, record: &LogRecord) {
        if let Some(value) = record.context_value(&self.key) {
            out.push_str(value);
        }
    }

    fn bind(
        &self,
        statement: &mut dyn SqlStatement,
        index: usize,
        record: &LogRecord,
    ) -> Result<(), Error> {
        bind_text(
            statement,
            index,
            record.context_value(&self.key).map(str::to_string),
        )
    }
}

/// Attached error with its cause chain; absent exceptions render nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExceptionPlaceholder;

impl Placeholder for ExceptionPlaceholder {
    fn required_fields(&self) -> FieldSet {
        FieldSet::of(Field::Exception)
    }

    fn render(&self, out: &mut String, record: &LogRecord) {
        use std::fmt::Write;
        if let Some(exception) = record.exception() {
            let _ = write!(out, "{exception}");
        }
    }

    fn bind(
        &self,
        statement: &mut dyn SqlStatement,
        index: usize,
        record: &LogRecord,
    ) -> Result<(), Error> {
        bind_text(
            statement,
            index,
            record.exception().map(ToString::to_string),
        )
    }
}
