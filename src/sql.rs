//! Typed parameter binding for parameterized statements.
//!
//! Placeholders bind the value they render, with its natural SQL type: a
//! numeric placeholder binds a number, not its string rendering, and a
//! missing field binds a typed NULL, never an empty string. The statement
//! itself is an external collaborator behind the [`SqlStatement`] trait.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use crate::error::Error;

/// SQL type expected for a parameter slot, carried by NULL bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlType {
    BigInt,
    Decimal,
    Text,
}

/// Fixed-point decimal with an explicit scale.
///
/// Wide enough for a nanosecond-scaled duration; `Display` renders the
/// canonical `units.fraction` form with the fraction zero-padded to the
/// scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decimal {
    unscaled: i128,
    scale: u32,
}

impl Decimal {
    #[must_use]
    pub const fn new(unscaled: i128, scale: u32) -> Self {
        Self { unscaled, scale }
    }

    /// A duration as seconds with nine fractional digits.
    #[must_use]
    pub const fn from_duration(duration: Duration) -> Self {
        Self {
            unscaled: duration.as_nanos() as i128,
            scale: 9,
        }
    }

    #[must_use]
    pub const fn unscaled(&self) -> i128 {
        self.unscaled
    }

    #[must_use]
    pub const fn scale(&self) -> u32 {
        self.scale
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.scale == 0 {
            return write!(f, "{}", self.unscaled);
        }
        let divisor = 10_i128.pow(self.scale);
        let sign = if self.unscaled < 0 { "-" } else { "" };
        let magnitude = self.unscaled.unsigned_abs();
        let divisor = divisor.unsigned_abs();
        write!(
            f,
            "{sign}{}.{:0width$}",
            magnitude / divisor,
            magnitude % divisor,
            width = self.scale as usize
        )
    }
}

/// One typed parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// Typed NULL for an absent record field.
    Null(SqlType),
    BigInt(i64),
    Decimal(Decimal),
    Text(String),
}

/// Positional parameter sink of a parameterized statement.
pub trait SqlStatement {
    /// Binds one parameter slot.
    ///
    /// # Errors
    /// Statement-specific failures, e.g. an out-of-range index.
    fn bind(&mut self, index: usize, value: SqlValue) -> Result<(), Error>;
}

/// In-memory statement that records its bindings, for tests and for
/// collaborators that batch parameters before handing them to a driver.
#[derive(Debug, Clone, Default)]
pub struct RecordedStatement {
    parameters: BTreeMap<usize, SqlValue>,
}

impl RecordedStatement {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn parameter(&self, index: usize) -> Option<&SqlValue> {
        self.parameters.get(&index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }
}

impl SqlStatement for RecordedStatement {
    fn bind(&mut self, index: usize, value: SqlValue) -> Result<(), Error> {
        self.parameters.insert(index, value);
        Ok(())
    }
}
