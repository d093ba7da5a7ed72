#![forbid(unsafe_code)]

//! `patternlog` - Pattern-compiled log formatting with a durable writer
//! pipeline.
//!
//! A structured log record flows through three subsystems:
//! - Format patterns compile once into a placeholder tree that renders each
//!   record field (and can bind typed SQL parameters).
//! - Message arguments substitute into `{}` placeholders, with optional
//!   decimal/choice sub-patterns and tick escaping.
//! - Writers buffer rendered bytes into fixed-capacity chunks and deliver
//!   them to the console, a rotating text file, or a JSON array file, with
//!   rotation gated by composable policies.
//!
//! # Example
//!
//! ```
//! use patternlog::{Level, LogRecord, PatternCompiler, Placeholder};
//!
//! let placeholder = PatternCompiler::new()
//!     .compile("{level}: {message}")
//!     .unwrap();
//!
//! let record = LogRecord::builder()
//!     .level(Level::Info)
//!     .message("Hello World!")
//!     .build();
//!
//! let mut line = String::new();
//! placeholder.render(&mut line, &record);
//! assert_eq!(line, "INFO: Hello World!");
//! ```

pub mod config;
mod error;
pub mod internal;
pub mod level;
pub mod message;
pub mod pattern;
pub mod policy;
pub mod record;
pub mod sql;
pub mod writer;

pub use config::{Config, Properties, create_writer};
pub use error::Error;
pub use level::Level;
pub use message::{DecimalSymbols, MessageFormatter};
pub use pattern::{Bundle, PatternCompiler, PatternError, Placeholder};
pub use policy::{DailyPolicy, RotationPolicy, SizePolicy, StartupPolicy};
pub use record::{ExceptionInfo, Field, FieldSet, LogRecord, Value};
pub use sql::{Decimal, RecordedStatement, SqlStatement, SqlType, SqlValue};
pub use writer::{
    ByteChunk, Charset, ConsoleWriter, JsonFileWriter, RollingFileWriter, SynchronizedWriter,
    Writer,
};
