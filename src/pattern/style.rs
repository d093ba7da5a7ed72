//! Style modifiers wrap an inner placeholder and post-process its rendered
//! text; the wrapped tree keeps exclusive ownership of its child.

use super::Placeholder;
use crate::error::Error;
use crate::record::{FieldSet, LogRecord};
use crate::sql::{SqlStatement, SqlValue};

/// Truncates the child's rendered text to a maximum number of characters.
#[derive(Debug)]
pub struct MaxLengthPlaceholder {
    inner: Box<dyn Placeholder>,
    limit: usize,
}

impl MaxLengthPlaceholder {
    #[must_use]
    pub fn new(inner: Box<dyn Placeholder>, limit: usize) -> Self {
        Self { inner, limit }
    }

    fn apply(&self, record: &LogRecord) -> String {
        let mut text = String::new();
        self.inner.render(&mut text, record);
        if let Some((cut, _)) = text.char_indices().nth(self.limit) {
            text.truncate(cut);
        }
        text
    }
}

impl Placeholder for MaxLengthPlaceholder {
    fn required_fields(&self) -> FieldSet {
        self.inner.required_fields()
    }

    fn render(&self, out: &mut String, record: &LogRecord) {
        out.push_str(&self.apply(record));
    }

    fn bind(
        &self,
        statement: &mut dyn SqlStatement,
        index: usize,
        record: &LogRecord,
    ) -> Result<(), Error> {
        statement.bind(index, SqlValue::Text(self.apply(record)))
    }
}

/// Pads the child's rendered text with trailing spaces to a minimum width.
#[derive(Debug)]
pub struct MinLengthPlaceholder {
    inner: Box<dyn Placeholder>,
    width: usize,
}

impl MinLengthPlaceholder {
    #[must_use]
    pub fn new(inner: Box<dyn Placeholder>, width: usize) -> Self {
        Self { inner, width }
    }

    fn apply(&self, record: &LogRecord) -> String {
        let mut text = String::new();
        self.inner.render(&mut text, record);
        let length = text.chars().count();
        for _ in length..self.width {
            text.push(' ');
        }
        text
    }
}

impl Placeholder for MinLengthPlaceholder {
    fn required_fields(&self) -> FieldSet {
        self.inner.required_fields()
    }

    fn render(&self, out: &mut String, record: &LogRecord) {
        out.push_str(&self.apply(record));
    }

    fn bind(
        &self,
        statement: &mut dyn SqlStatement,
        index: usize,
        record: &LogRecord,
    ) -> Result<(), Error> {
        statement.bind(index, SqlValue::Text(self.apply(record)))
    }
}
