//! The immutable snapshot of one logging event and the field-requirement
//! machinery that lets producers skip expensive fields no placeholder needs.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Local};

use crate::level::Level;

/// Every field a rendered record may supply. Absence of a field is distinct
/// from an empty or zero value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Timestamp,
    Level,
    Thread,
    Class,
    Method,
    Message,
    Uptime,
    Tag,
    Exception,
    Context,
}

impl Field {
    const fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

/// Set of [`Field`]s a placeholder subtree needs populated before rendering.
///
/// Computed once per compiled pattern so the upstream producer can skip
/// expensive captures (e.g. source location) that no placeholder reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FieldSet(u16);

impl FieldSet {
    /// The set requiring no fields at all.
    pub const EMPTY: Self = Self(0);

    /// A set containing exactly one field.
    #[must_use]
    pub const fn of(field: Field) -> Self {
        Self(field.bit())
    }

    /// The union of two sets.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// A copy of this set with one more field.
    #[must_use]
    pub const fn with(self, field: Field) -> Self {
        Self(self.0 | field.bit())
    }

    /// Checks whether a field is a member of this set.
    #[must_use]
    pub const fn contains(self, field: Field) -> bool {
        self.0 & field.bit() != 0
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// One positional message argument.
///
/// Only `Int`, `Uint`, and `Float` can satisfy a numeric sub-pattern; every
/// variant has a plain string form used as the substitution fallback.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Uint(u64),
    Float(f64),
    Bool(bool),
    Char(char),
    Str(String),
    /// Message text of an error argument, captured at conversion time.
    Error(String),
}

impl Value {
    /// Captures an error argument as its message text, or its type name when
    /// the message is empty.
    #[must_use]
    pub fn from_error<E: std::error::Error>(error: &E) -> Self {
        let message = error.to_string();
        if message.is_empty() {
            Self::Error(std::any::type_name::<E>().to_string())
        } else {
            Self::Error(message)
        }
    }

    /// The substitution text used for an empty `{}` span and for sub-pattern
    /// fallbacks.
    #[must_use]
    pub fn plain(&self) -> String {
        match self {
            Self::Int(v) => v.to_string(),
            Self::Uint(v) => v.to_string(),
            Self::Float(v) => v.to_string(),
            Self::Bool(v) => v.to_string(),
            Self::Char(v) => v.to_string(),
            Self::Str(v) | Self::Error(v) => v.clone(),
        }
    }

    /// Numeric interpretation for decimal and choice sub-patterns.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            #[allow(clippy::cast_precision_loss)]
            Self::Int(v) => Some(*v as f64),
            #[allow(clippy::cast_precision_loss)]
            Self::Uint(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Self::Uint(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<char> for Value {
    fn from(v: char) -> Self {
        Self::Char(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

/// Message and cause chain of an error attached to a log record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExceptionInfo {
    description: String,
    causes: Vec<String>,
}

impl ExceptionInfo {
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            causes: Vec::new(),
        }
    }

    /// Captures an error's message and its whole `source()` chain.
    #[must_use]
    pub fn from_error(error: &(dyn std::error::Error + 'static)) -> Self {
        let mut causes = Vec::new();
        let mut source = error.source();
        while let Some(cause) = source {
            causes.push(cause.to_string());
            source = cause.source();
        }
        Self {
            description: error.to_string(),
            causes,
        }
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn causes(&self) -> &[String] {
        &self.causes
    }
}

impl fmt::Display for ExceptionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description)?;
        for cause in &self.causes {
            write!(f, "\ncaused by: {cause}")?;
        }
        Ok(())
    }
}

/// Immutable snapshot of one logging event.
///
/// Created per call site, consumed synchronously by the rendering stage, and
/// discarded. Every field is optional; placeholders render their own
/// "unknown" marker for absent fields instead of failing.
#[derive(Debug, Clone, Default)]
pub struct LogRecord {
    timestamp: Option<DateTime<Local>>,
    level: Option<Level>,
    thread: Option<String>,
    class: Option<String>,
    method: Option<String>,
    tag: Option<String>,
    message: Option<String>,
    arguments: Vec<Value>,
    exception: Option<ExceptionInfo>,
    uptime: Option<Duration>,
    context: HashMap<String, String>,
}

impl LogRecord {
    /// Records carry many optional fields; the builder keeps call sites from
    /// spelling out every `None`.
    #[must_use]
    pub fn builder() -> RecordBuilder {
        RecordBuilder::default()
    }

    #[must_use]
    pub const fn timestamp(&self) -> Option<DateTime<Local>> {
        self.timestamp
    }

    #[must_use]
    pub const fn level(&self) -> Option<Level> {
        self.level
    }

    #[must_use]
    pub fn thread(&self) -> Option<&str> {
        self.thread.as_deref()
    }

    #[must_use]
    pub fn class(&self) -> Option<&str> {
        self.class.as_deref()
    }

    #[must_use]
    pub fn method(&self) -> Option<&str> {
        self.method.as_deref()
    }

    #[must_use]
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// The raw message template, before argument substitution.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    #[must_use]
    pub fn arguments(&self) -> &[Value] {
        &self.arguments
    }

    #[must_use]
    pub const fn exception(&self) -> Option<&ExceptionInfo> {
        self.exception.as_ref()
    }

    #[must_use]
    pub const fn uptime(&self) -> Option<Duration> {
        self.uptime
    }

    #[must_use]
    pub fn context_value(&self, key: &str) -> Option<&str> {
        self.context.get(key).map(String::as_str)
    }
}

/// Builder for [`LogRecord`].
#[derive(Debug, Clone, Default)]
pub struct RecordBuilder {
    record: LogRecord,
}

impl RecordBuilder {
    #[must_use]
    pub fn timestamp(mut self, timestamp: DateTime<Local>) -> Self {
        self.record.timestamp = Some(timestamp);
        self
    }

    #[must_use]
    pub fn level(mut self, level: Level) -> Self {
        self.record.level = Some(level);
        self
    }

    #[must_use]
    pub fn thread(mut self, thread: impl Into<String>) -> Self {
        self.record.thread = Some(thread.into());
        self
    }

    #[must_use]
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.record.class = Some(class.into());
        self
    }

    #[must_use]
    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.record.method = Some(method.into());
        self
    }

    #[must_use]
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.record.tag = Some(tag.into());
        self
    }

    #[must_use]
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.record.message = Some(message.into());
        self
    }

    #[must_use]
    pub fn argument(mut self, argument: impl Into<Value>) -> Self {
        self.record.arguments.push(argument.into());
        self
    }

    #[must_use]
    pub fn arguments(mut self, arguments: Vec<Value>) -> Self {
        self.record.arguments = arguments;
        self
    }

    #[must_use]
    pub fn exception(mut self, exception: ExceptionInfo) -> Self {
        self.record.exception = Some(exception);
        self
    }

    #[must_use]
    pub fn uptime(mut self, uptime: Duration) -> Self {
        self.record.uptime = Some(uptime);
        self
    }

    #[must_use]
    pub fn context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.record.context.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn build(self) -> LogRecord {
        self.record
    }
}
