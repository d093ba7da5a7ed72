//! Decimal-format sub-patterns for message placeholders.
//!
//! Supports the common subset of the classic decimal pattern grammar: `0`
//! and `#` digit slots, `.` fraction separator, `,` grouping, `%` percent
//! multiplier, a `;`-separated negative subpattern, and tick-quoted literal
//! affixes. Rounding is half-even.

/// Locale symbols substituted into rendered numbers.
///
/// Passed explicitly into the formatter at construction; there is no ambient
/// default-locale lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecimalSymbols {
    pub decimal_separator: char,
    pub grouping_separator: char,
    pub minus_sign: char,
}

impl DecimalSymbols {
    #[must_use]
    pub const fn new(decimal_separator: char, grouping_separator: char, minus_sign: char) -> Self {
        Self {
            decimal_separator,
            grouping_separator,
            minus_sign,
        }
    }
}

impl Default for DecimalSymbols {
    fn default() -> Self {
        Self::new('.', ',', '-')
    }
}

/// A sub-pattern this module cannot interpret; the caller falls back to the
/// argument's plain string form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SubPatternError(pub(crate) String);

#[derive(Debug, Clone)]
pub(crate) struct DecimalPattern {
    positive_prefix: String,
    positive_suffix: String,
    negative_prefix: Option<String>,
    negative_suffix: Option<String>,
    min_int: usize,
    min_frac: usize,
    max_frac: usize,
    grouping: Option<usize>,
    percent: bool,
}

impl DecimalPattern {
    pub(crate) fn parse(pattern: &str) -> Result<Self, SubPatternError> {
        let (positive, negative) = split_subpatterns(pattern);
        let positive = parse_half(&positive)?;
        let negative = match negative {
            Some(raw) => {
                let half = parse_half(&raw)?;
                Some((half.prefix, half.suffix))
            }
            None => None,
        };

        Ok(Self {
            positive_prefix: positive.prefix,
            positive_suffix: positive.suffix,
            negative_prefix: negative.as_ref().map(|(p, _)| p.clone()),
            negative_suffix: negative.as_ref().map(|(_, s)| s.clone()),
            min_int: positive.min_int,
            min_frac: positive.min_frac,
            max_frac: positive.max_frac,
            grouping: positive.grouping,
            percent: positive.percent,
        })
    }

    pub(crate) fn format(&self, value: f64, symbols: &DecimalSymbols) -> Result<String, SubPatternError> {
        if !value.is_finite() {
            return Err(SubPatternError(format!("non-finite value {value}")));
        }

        let value = if self.percent { value * 100.0 } else { value };
        let negative = value < 0.0;
        let magnitude = value.abs();

        // Rust's float formatting with explicit precision rounds half-even.
        let rounded = format!("{magnitude:.prec$}", prec = self.max_frac);
        let (int_digits, frac_digits) = match rounded.split_once('.') {
            Some((i, f)) => (i.to_string(), f.to_string()),
            None => (rounded, String::new()),
        };

        let mut frac = frac_digits;
        while frac.len() > self.min_frac && frac.ends_with('0') {
            frac.pop();
        }

        let mut int = int_digits;
        if int == "0" && self.min_int == 0 && !frac.is_empty() {
            int.clear();
        }
        while int.len() < self.min_int {
            int.insert(0, '0');
        }
        if let Some(size) = self.grouping {
            int = group_digits(&int, size, symbols.grouping_separator);
        }

        let mut out = String::new();
        if negative {
            match &self.negative_prefix {
                Some(prefix) => out.push_str(prefix),
                None => {
                    out.push(symbols.minus_sign);
                    out.push_str(&self.positive_prefix);
                }
            }
        } else {
            out.push_str(&self.positive_prefix);
        }

        out.push_str(&int);
        if !frac.is_empty() {
            out.push(symbols.decimal_separator);
            out.push_str(&frac);
        }

        if negative {
            match &self.negative_suffix {
                Some(suffix) => out.push_str(suffix),
                None => out.push_str(&self.positive_suffix),
            }
        } else {
            out.push_str(&self.positive_suffix);
        }

        Ok(out)
    }
}

struct PatternHalf {
    prefix: String,
    suffix: String,
    min_int: usize,
    min_frac: usize,
    max_frac: usize,
    grouping: Option<usize>,
    percent: bool,
}

/// Splits `positive;negative`, ignoring ticks-quoted separators.
fn split_subpatterns(pattern: &str) -> (String, Option<String>) {
    let mut quoted = false;
    for (i, c) in pattern.char_indices() {
        match c {
            '\'' => quoted = !quoted,
            ';' if !quoted => {
                return (
                    pattern[..i].to_string(),
                    Some(pattern[i + 1..].to_string()),
                );
            }
            _ => {}
        }
    }
    (pattern.to_string(), None)
}

fn is_number_char(c: char) -> bool {
    matches!(c, '0' | '#' | '.' | ',')
}

fn parse_half(pattern: &str) -> Result<PatternHalf, SubPatternError> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut prefix = String::new();
    let mut suffix = String::new();
    let mut percent = false;

    let mut i = 0;
    parse_affix(&chars, &mut i, &mut prefix, &mut percent, true)?;

    let number_start = i;
    while i < chars.len() && is_number_char(chars[i]) {
        i += 1;
    }
    let number: Vec<char> = chars[number_start..i].to_vec();

    parse_affix(&chars, &mut i, &mut suffix, &mut percent, false)?;

    if !number.iter().any(|c| matches!(c, '0' | '#')) {
        return Err(SubPatternError(format!(
            "no digit slots in decimal pattern '{pattern}'"
        )));
    }

    let (int_part, frac_part) = match number.iter().position(|&c| c == '.') {
        Some(dot) => {
            if number[dot + 1..].contains(&'.') {
                return Err(SubPatternError(format!(
                    "multiple fraction separators in decimal pattern '{pattern}'"
                )));
            }
            (&number[..dot], &number[dot + 1..])
        }
        None => (&number[..], &[][..]),
    };

    let min_int = int_part.iter().filter(|&&c| c == '0').count();
    let min_frac = frac_part.iter().filter(|&&c| c == '0').count();
    let max_frac = frac_part.iter().filter(|&&c| c == '0' || c == '#').count();

    let grouping = int_part.iter().rposition(|&c| c == ',').and_then(|pos| {
        let size = int_part[pos + 1..]
            .iter()
            .filter(|&&c| c == '0' || c == '#')
            .count();
        (size > 0).then_some(size)
    });

    Ok(PatternHalf {
        prefix,
        suffix,
        min_int,
        min_frac,
        max_frac,
        grouping,
        percent,
    })
}

/// Consumes literal affix characters up to (prefix) or after (suffix) the
/// number core, honoring tick quoting.
fn parse_affix(
    chars: &[char],
    i: &mut usize,
    out: &mut String,
    percent: &mut bool,
    stop_at_number: bool,
) -> Result<(), SubPatternError> {
    while *i < chars.len() {
        let c = chars[*i];
        if stop_at_number && is_number_char(c) {
            return Ok(());
        }
        match c {
            '\'' => {
                if chars.get(*i + 1) == Some(&'\'') {
                    out.push('\'');
                    *i += 2;
                } else if let Some(end) = chars[*i + 1..].iter().position(|&q| q == '\'') {
                    out.extend(&chars[*i + 1..=*i + end]);
                    *i += end + 2;
                } else {
                    return Err(SubPatternError("unterminated quote in affix".to_string()));
                }
            }
            '%' => {
                *percent = true;
                out.push('%');
                *i += 1;
            }
            '0' | '#' | '.' | ',' => {
                // Number chars after the suffix started are malformed.
                return Err(SubPatternError(format!(
                    "misplaced '{c}' in decimal pattern"
                )));
            }
            c => {
                out.push(c);
                *i += 1;
            }
        }
    }
    Ok(())
}

/// Inserts the grouping separator every `size` digits, counting from the
/// least significant digit.
fn group_digits(digits: &str, size: usize, separator: char) -> String {
    let chars: Vec<char> = digits.chars().collect();
    let mut out = String::new();
    for (i, c) in chars.iter().enumerate() {
        let remaining = chars.len() - i;
        if i > 0 && remaining % size == 0 {
            out.push(separator);
        }
        out.push(*c);
    }
    out
}
