//! Format patterns compile once into a tree of renderable placeholders;
//! the tree is immutable and reused for every subsequent record.

mod compiler;
mod placeholders;
mod style;
pub mod uptime;

pub use compiler::PatternCompiler;
pub use placeholders::{
    Bundle, ClassPlaceholder, ContextPlaceholder, DatePlaceholder, ExceptionPlaceholder,
    LevelPlaceholder, MessagePlaceholder, MethodPlaceholder, StaticTextPlaceholder,
    TagPlaceholder, ThreadPlaceholder, TimestampPlaceholder, UptimePlaceholder,
};
pub use style::{MaxLengthPlaceholder, MinLengthPlaceholder};

use std::fmt;

use crate::error::Error;
use crate::record::{FieldSet, LogRecord};
use crate::sql::SqlStatement;

/// A renderable unit mapping log-record fields to text or a typed SQL
/// parameter.
///
/// Rendering is total by contract: `render` must not fail for any record
/// state; absent fields produce a placeholder-specific "unknown" marker.
///
/// `Send + Sync` bounds let one compiled tree serve writers on any thread;
/// the tree itself is immutable after compilation.
pub trait Placeholder: fmt::Debug + Send + Sync {
    /// The record fields this placeholder (and its children) read.
    fn required_fields(&self) -> FieldSet;

    /// Appends the formatted value to `out`.
    fn render(&self, out: &mut String, record: &LogRecord);

    /// Binds the same value into a positional parameter slot, typed; absent
    /// fields bind a typed NULL, never an empty string.
    ///
    /// # Errors
    /// Statement-specific binding failures.
    fn bind(
        &self,
        statement: &mut dyn SqlStatement,
        index: usize,
        record: &LogRecord,
    ) -> Result<(), Error>;
}

/// Compile-time rejection of a malformed format pattern.
///
/// Raised only by [`PatternCompiler::compile`]; a compiled tree never fails
/// at render time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    /// A `{name}` that matches no known placeholder.
    UnknownPlaceholder(String),
    /// A `| name` style modifier that matches no known modifier.
    UnknownModifier(String),
    /// An unclosed `{` or a stray `}`, with its character position.
    UnmatchedBrace(usize),
    /// A placeholder or modifier that needs an argument was written without one.
    MissingArgument(String),
    /// A placeholder or modifier argument that cannot be interpreted.
    InvalidArgument {
        name: String,
        reason: String,
    },
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownPlaceholder(name) => write!(f, "unknown placeholder: '{name}'"),
            Self::UnknownModifier(name) => write!(f, "unknown style modifier: '{name}'"),
            Self::UnmatchedBrace(position) => {
                write!(f, "unmatched brace at position {position}")
            }
            Self::MissingArgument(name) => {
                write!(f, "placeholder '{name}' requires an argument")
            }
            Self::InvalidArgument { name, reason } => {
                write!(f, "invalid argument for '{name}': {reason}")
            }
        }
    }
}

impl std::error::Error for PatternError {}
