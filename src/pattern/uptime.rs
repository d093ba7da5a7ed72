//! Duration rendering for the `{uptime}` placeholder.
//!
//! Patterns use run-length tokens in the style of date/time format strings:
//! `d`, `H`, `m`, `s` for days, hours, minutes, and whole seconds, `S` for
//! the fraction of a second. Any other character passes through, and a
//! single-tick pair quotes a literal section (`''` is a literal tick).
//!
//! A time unit is only reduced modulo the next larger unit when that larger
//! unit appears somewhere in the same pattern: `"s"` alone renders the total
//! second count, while `"m:ss"` renders seconds 0-59.

use std::time::Duration;

const SECONDS_PER_MINUTE: u64 = 60;
const SECONDS_PER_HOUR: u64 = 60 * 60;
const SECONDS_PER_DAY: u64 = 24 * 60 * 60;
const FRACTION_DIGITS: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unit {
    Days,
    Hours,
    Minutes,
    Seconds,
    Fraction,
}

#[derive(Debug, Clone)]
enum Segment {
    Field { unit: Unit, width: usize },
    Literal(String),
}

/// Pre-parsed uptime pattern; parse once at pattern-compile time, render for
/// every record.
#[derive(Debug, Clone)]
pub struct UptimeFormat {
    segments: Vec<Segment>,
    has_days: bool,
    has_hours: bool,
    has_minutes: bool,
}

impl UptimeFormat {
    #[must_use]
    pub fn parse(pattern: &str) -> Self {
        let chars: Vec<char> = pattern.chars().collect();
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut i = 0;

        while i < chars.len() {
            match chars[i] {
                '\'' => {
                    if chars.get(i + 1) == Some(&'\'') {
                        literal.push('\'');
                        i += 2;
                    } else if let Some(end) = chars[i + 1..].iter().position(|&c| c == '\'') {
                        literal.extend(&chars[i + 1..=i + end]);
                        i += end + 2;
                    } else {
                        // Unterminated tick renders literally and the rest of
                        // the pattern is processed as usual.
                        literal.push('\'');
                        i += 1;
                    }
                }
                c @ ('d' | 'H' | 'm' | 's' | 'S') => {
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    let mut width = 0;
                    while chars.get(i) == Some(&c) {
                        width += 1;
                        i += 1;
                    }
                    let unit = match c {
                        'd' => Unit::Days,
                        'H' => Unit::Hours,
                        'm' => Unit::Minutes,
                        's' => Unit::Seconds,
                        _ => Unit::Fraction,
                    };
                    segments.push(Segment::Field { unit, width });
                }
                c => {
                    literal.push(c);
                    i += 1;
                }
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        let has = |wanted: Unit| {
            segments
                .iter()
                .any(|s| matches!(s, Segment::Field { unit, .. } if *unit == wanted))
        };
        let (has_days, has_hours, has_minutes) =
            (has(Unit::Days), has(Unit::Hours), has(Unit::Minutes));

        Self {
            segments,
            has_days,
            has_hours,
            has_minutes,
        }
    }

    /// Renders a duration into `out`.
    pub fn format_into(&self, duration: Duration, out: &mut String) {
        use std::fmt::Write;

        let total_seconds = duration.as_secs();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field { unit, width } => {
                    let width = *width;
                    let value = match unit {
                        Unit::Days => total_seconds / SECONDS_PER_DAY,
                        Unit::Hours => {
                            let hours = total_seconds / SECONDS_PER_HOUR;
                            if self.has_days { hours % 24 } else { hours }
                        }
                        Unit::Minutes => {
                            let minutes = total_seconds / SECONDS_PER_MINUTE;
                            if self.has_hours { minutes % 60 } else { minutes }
                        }
                        Unit::Seconds => {
                            if self.has_minutes {
                                total_seconds % 60
                            } else {
                                total_seconds
                            }
                        }
                        Unit::Fraction => {
                            push_fraction(duration.subsec_nanos(), width, out);
                            continue;
                        }
                    };
                    let _ = write!(out, "{value:0width$}");
                }
            }
        }
    }

    /// Convenience wrapper over [`Self::format_into`].
    #[must_use]
    pub fn format(&self, duration: Duration) -> String {
        let mut out = String::new();
        self.format_into(duration, &mut out);
        out
    }
}

/// The fraction field truncates to the requested number of digits; widths
/// beyond nanosecond precision are right-padded with zeros.
fn push_fraction(nanos: u32, width: usize, out: &mut String) {
    let digits = format!("{nanos:09}");
    if width <= FRACTION_DIGITS {
        out.push_str(&digits[..width]);
    } else {
        out.push_str(&digits);
        for _ in FRACTION_DIGITS..width {
            out.push('0');
        }
    }
}
