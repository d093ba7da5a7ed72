//! Positional `{}` argument substitution for log messages.
//!
//! A single left-to-right scan replaces each top-level unescaped `{...}`
//! span with the next argument. A span may carry a decimal or choice
//! sub-pattern; tick quoting suspends substitution; substitution failures
//! fall back to the argument's plain string form and are reported through
//! the internal diagnostic channel, never to the caller.

mod choice;
mod number;

pub use number::DecimalSymbols;

use choice::ChoicePattern;
use number::{DecimalPattern, SubPatternError};

use crate::internal;
use crate::record::Value;

const EXTRA_CAPACITY: usize = 32;

/// Replaces `{}` placeholders in a message with positional arguments.
#[derive(Debug, Clone)]
pub struct MessageFormatter {
    symbols: DecimalSymbols,
}

impl Default for MessageFormatter {
    fn default() -> Self {
        Self::new(DecimalSymbols::default())
    }
}

impl MessageFormatter {
    /// The symbols are passed in explicitly; there is no ambient locale.
    #[must_use]
    pub const fn new(symbols: DecimalSymbols) -> Self {
        Self { symbols }
    }

    /// Substitutes arguments into `message`.
    ///
    /// Scanner rules:
    /// - A tick toggles quoted-literal mode unless doubled (`''` emits one
    ///   literal tick) and only at brace depth zero; quoted text is copied
    ///   verbatim with brace scanning suspended.
    /// - `{` opens a span only outside quoted mode, while arguments remain,
    ///   and when it is not the final character; nested braces are tracked
    ///   by depth and the span closes on the brace returning depth to zero.
    /// - An empty span substitutes the argument's plain string form; a
    ///   non-empty span is interpreted as a choice or decimal sub-pattern.
    /// - An unterminated span is emitted literally, including its `{`.
    /// - An unterminated quote re-inserts the opening tick at the output
    ///   position where it was consumed, so no text is lost.
    #[must_use]
    pub fn format(&self, message: &str, arguments: &[Value]) -> String {
        let chars: Vec<char> = message.chars().collect();
        let len = chars.len();

        let mut builder = String::with_capacity(message.len() + EXTRA_CAPACITY);
        let mut buffer = String::with_capacity(EXTRA_CAPACITY);

        let mut argument_index = 0;
        let mut tick_position: Option<usize> = None;
        let mut depth = 0_usize;

        let mut i = 0;
        while i < len {
            let c = chars[i];
            if c == '\'' && i + 1 < len && depth == 0 {
                if chars[i + 1] == '\'' {
                    builder.push('\'');
                    i += 1;
                } else if tick_position.is_some() {
                    tick_position = None;
                } else {
                    tick_position = Some(builder.len());
                }
            } else if c == '{'
                && i + 1 < len
                && argument_index < arguments.len()
                && tick_position.is_none()
            {
                if depth > 0 {
                    buffer.push(c);
                }
                depth += 1;
            } else if c == '}' && depth > 0 && tick_position.is_none() {
                depth -= 1;
                if depth == 0 {
                    let argument = &arguments[argument_index];
                    argument_index += 1;
                    if buffer.is_empty() {
                        builder.push_str(&argument.plain());
                    } else {
                        builder.push_str(&self.format_pattern(&buffer, argument));
                        buffer.clear();
                    }
                } else {
                    buffer.push(c);
                }
            } else if depth > 0 {
                buffer.push(c);
            } else {
                builder.push(c);
            }
            i += 1;
        }

        if !buffer.is_empty() {
            builder.push('{');
            builder.push_str(&buffer);
        }

        if let Some(position) = tick_position {
            builder.insert(position, '\'');
        }

        builder
    }

    /// Applies a span's sub-pattern to an argument, falling back to the
    /// plain string form on any failure.
    fn format_pattern(&self, pattern: &str, argument: &Value) -> String {
        match self.try_pattern(pattern, argument) {
            Ok(text) => text,
            Err(SubPatternError(reason)) => {
                internal::warn(
                    "MESSAGE",
                    &format!(
                        "illegal argument '{}' for pattern '{pattern}': {reason}",
                        argument.plain()
                    ),
                );
                argument.plain()
            }
        }
    }

    fn try_pattern(&self, pattern: &str, argument: &Value) -> Result<String, SubPatternError> {
        let value = argument.as_f64().ok_or_else(|| {
            SubPatternError(format!("argument '{}' is not numeric", argument.plain()))
        })?;

        if pattern.contains('|') {
            // A brace span inside a choice pattern is resolved by one more
            // formatter pass before the alternatives are parsed.
            let resolved = match (pattern.find('{'), pattern.rfind('}')) {
                (Some(start), Some(end)) if start < end => {
                    self.format(pattern, std::slice::from_ref(argument))
                }
                _ => pattern.to_string(),
            };
            Ok(ChoicePattern::parse(&resolved)?.select(value).to_string())
        } else {
            DecimalPattern::parse(pattern)?.format(value, &self.symbols)
        }
    }
}
