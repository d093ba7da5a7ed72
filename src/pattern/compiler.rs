//! Compiles user format strings into placeholder trees.
//!
//! Grammar: literal text passes through verbatim; `\{`, `\}`, and `\\` are
//! escapes; `{name}` or `{name: arg}` resolves a placeholder, with optional
//! pipe-separated style modifiers (`{date: %H:%M:%S | max-length: 5}`).
//! Every malformed construct is rejected here; a compiled tree never fails
//! at render time.

use chrono::Locale;

use super::placeholders::{
    Bundle, ClassPlaceholder, ContextPlaceholder, DatePlaceholder, ExceptionPlaceholder,
    LevelPlaceholder, MessagePlaceholder, MethodPlaceholder, StaticTextPlaceholder,
    TagPlaceholder, ThreadPlaceholder, TimestampPlaceholder, UptimePlaceholder,
};
use super::style::{MaxLengthPlaceholder, MinLengthPlaceholder};
use super::{PatternError, Placeholder};
use crate::message::{DecimalSymbols, MessageFormatter};

const DEFAULT_DATE_PATTERN: &str = "%Y-%m-%d %H:%M:%S";
const DEFAULT_UPTIME_PATTERN: &str = "HH:mm:ss";

enum Modifier {
    MaxLength(usize),
    MinLength(usize),
}

/// Compiles format patterns; construction fixes the decimal symbols and
/// locale so no component consults ambient global state.
#[derive(Debug, Clone, Default)]
pub struct PatternCompiler {
    symbols: DecimalSymbols,
    locale: Option<Locale>,
}

impl PatternCompiler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decimal symbols applied to numeric message-argument sub-patterns.
    #[must_use]
    pub const fn symbols(mut self, symbols: DecimalSymbols) -> Self {
        self.symbols = symbols;
        self
    }

    /// Locale applied to date placeholders.
    #[must_use]
    pub const fn locale(mut self, locale: Locale) -> Self {
        self.locale = Some(locale);
        self
    }

    /// Compiles `pattern` into a placeholder tree.
    ///
    /// # Errors
    /// [`PatternError`] for unknown placeholder or modifier names, unmatched
    /// braces, and uninterpretable arguments. An unknown name never degrades
    /// to literal text.
    pub fn compile(&self, pattern: &str) -> Result<Box<dyn Placeholder>, PatternError> {
        let chars: Vec<char> = pattern.chars().collect();
        let len = chars.len();

        let mut segments: Vec<Box<dyn Placeholder>> = Vec::new();
        let mut literal = String::new();
        let mut i = 0;

        while i < len {
            match chars[i] {
                '\\' if i + 1 < len => {
                    match chars[i + 1] {
                        c @ ('{' | '}' | '\\') => literal.push(c),
                        c => {
                            literal.push('\\');
                            literal.push(c);
                        }
                    }
                    i += 2;
                }
                '{' => {
                    let mut depth = 1;
                    let mut j = i + 1;
                    while j < len && depth > 0 {
                        match chars[j] {
                            '\\' if j + 1 < len => j += 1,
                            '{' => depth += 1,
                            '}' => depth -= 1,
                            _ => {}
                        }
                        j += 1;
                    }
                    if depth > 0 {
                        return Err(PatternError::UnmatchedBrace(i));
                    }
                    if !literal.is_empty() {
                        segments.push(Box::new(StaticTextPlaceholder::new(std::mem::take(
                            &mut literal,
                        ))));
                    }
                    let inner: String = chars[i + 1..j - 1].iter().collect();
                    segments.push(self.placeholder(inner.trim())?);
                    i = j;
                }
                '}' => return Err(PatternError::UnmatchedBrace(i)),
                c => {
                    literal.push(c);
                    i += 1;
                }
            }
        }

        if !literal.is_empty() {
            segments.push(Box::new(StaticTextPlaceholder::new(literal)));
        }

        Ok(if segments.is_empty() {
            Box::new(StaticTextPlaceholder::new(""))
        } else if segments.len() == 1 {
            segments.remove(0)
        } else {
            Box::new(Bundle::new(segments))
        })
    }

    /// Resolves one brace span: `name`, optional `: arg`, optional
    /// `| modifier` chain.
    fn placeholder(&self, span: &str) -> Result<Box<dyn Placeholder>, PatternError> {
        let mut parts = span.split('|');
        let head = parts.next().unwrap_or_default();
        let (name, arg) = match head.split_once(':') {
            Some((name, arg)) => (name.trim(), Some(arg.trim())),
            None => (head.trim(), None),
        };

        let mut modifiers = Vec::new();
        let mut sql_text = false;
        for part in parts {
            let (modifier, value) = match part.split_once(':') {
                Some((modifier, value)) => (modifier.trim(), Some(value.trim())),
                None => (part.trim(), None),
            };
            match modifier {
                "max-length" => modifiers.push(Modifier::MaxLength(parse_width(modifier, value)?)),
                "min-length" => modifiers.push(Modifier::MinLength(parse_width(modifier, value)?)),
                "sql" => {
                    if value != Some("text") {
                        return Err(PatternError::InvalidArgument {
                            name: "sql".to_string(),
                            reason: format!(
                                "expected 'text', got '{}'",
                                value.unwrap_or_default()
                            ),
                        });
                    }
                    sql_text = true;
                }
                unknown => return Err(PatternError::UnknownModifier(unknown.to_string())),
            }
        }

        if sql_text && name != "uptime" {
            return Err(PatternError::InvalidArgument {
                name: "sql".to_string(),
                reason: format!("modifier does not apply to '{name}'"),
            });
        }

        let mut placeholder = self.base_placeholder(name, arg, sql_text)?;
        for modifier in modifiers {
            placeholder = match modifier {
                Modifier::MaxLength(limit) => Box::new(MaxLengthPlaceholder::new(placeholder, limit)),
                Modifier::MinLength(width) => Box::new(MinLengthPlaceholder::new(placeholder, width)),
            };
        }
        Ok(placeholder)
    }

    fn base_placeholder(
        &self,
        name: &str,
        arg: Option<&str>,
        sql_text: bool,
    ) -> Result<Box<dyn Placeholder>, PatternError> {
        match name {
            "date" => {
                let pattern = arg.unwrap_or(DEFAULT_DATE_PATTERN);
                self.validate_date_pattern(pattern)?;
                Ok(Box::new(DatePlaceholder::new(pattern, self.locale)))
            }
            "timestamp" => match arg.unwrap_or("milliseconds") {
                "milliseconds" => Ok(Box::new(TimestampPlaceholder::milliseconds())),
                "seconds" => Ok(Box::new(TimestampPlaceholder::seconds())),
                unit => Err(PatternError::InvalidArgument {
                    name: "timestamp".to_string(),
                    reason: format!("unknown unit '{unit}'"),
                }),
            },
            "uptime" => Ok(Box::new(UptimePlaceholder::new(
                arg.unwrap_or(DEFAULT_UPTIME_PATTERN),
                sql_text,
            ))),
            "context" => match arg {
                Some(key) if !key.is_empty() => Ok(Box::new(ContextPlaceholder::new(key))),
                _ => Err(PatternError::MissingArgument("context".to_string())),
            },
            "level" | "class" | "method" | "thread" | "tag" | "message" | "exception" => {
                if let Some(arg) = arg {
                    return Err(PatternError::InvalidArgument {
                        name: name.to_string(),
                        reason: format!("takes no argument, got '{arg}'"),
                    });
                }
                Ok(match name {
                    "level" => Box::new(LevelPlaceholder),
                    "class" => Box::new(ClassPlaceholder),
                    "method" => Box::new(MethodPlaceholder),
                    "thread" => Box::new(ThreadPlaceholder),
                    "tag" => Box::new(TagPlaceholder),
                    "message" => Box::new(MessagePlaceholder::new(MessageFormatter::new(
                        self.symbols,
                    ))),
                    _ => Box::new(ExceptionPlaceholder),
                })
            }
            unknown => Err(PatternError::UnknownPlaceholder(unknown.to_string())),
        }
    }

    /// Probes the strftime pattern once at compile time so date rendering
    /// stays total.
    fn validate_date_pattern(&self, pattern: &str) -> Result<(), PatternError> {
        use std::fmt::Write;

        let probe = chrono::Local::now();
        let mut buffer = String::new();
        let result = match self.locale {
            Some(locale) => write!(buffer, "{}", probe.format_localized(pattern, locale)),
            None => write!(buffer, "{}", probe.format(pattern)),
        };
        result.map_err(|_| PatternError::InvalidArgument {
            name: "date".to_string(),
            reason: format!("invalid strftime pattern '{pattern}'"),
        })
    }
}

fn parse_width(modifier: &str, value: Option<&str>) -> Result<usize, PatternError> {
    let value = value.ok_or_else(|| PatternError::MissingArgument(modifier.to_string()))?;
    value.parse().map_err(|_| PatternError::InvalidArgument {
        name: modifier.to_string(),
        reason: format!("expected a number, got '{value}'"),
    })
}
