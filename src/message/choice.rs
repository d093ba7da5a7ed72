//! Choice-format sub-patterns: `|`-separated alternatives selected by a
//! numeric bound, e.g. `0#no files|1#one file|1<{#,##0} files`.

use super::number::SubPatternError;

#[derive(Debug, Clone)]
struct Alternative {
    limit: f64,
    /// `#` bounds are inclusive, `<` bounds exclusive.
    inclusive: bool,
    text: String,
}

#[derive(Debug, Clone)]
pub(crate) struct ChoicePattern {
    alternatives: Vec<Alternative>,
}

impl ChoicePattern {
    pub(crate) fn parse(pattern: &str) -> Result<Self, SubPatternError> {
        let mut alternatives = Vec::new();
        for part in pattern.split('|') {
            let Some(separator) = part.find(['#', '<']) else {
                return Err(SubPatternError(format!(
                    "choice alternative '{part}' has no '#' or '<' bound"
                )));
            };
            let limit: f64 = part[..separator].trim().parse().map_err(|_| {
                SubPatternError(format!("invalid choice bound in '{part}'"))
            })?;
            alternatives.push(Alternative {
                limit,
                inclusive: part.as_bytes()[separator] == b'#',
                text: part[separator + 1..].to_string(),
            });
        }
        if alternatives.is_empty() {
            return Err(SubPatternError("empty choice pattern".to_string()));
        }
        Ok(Self { alternatives })
    }

    /// Selects the last alternative whose bound is satisfied; values below
    /// every bound (and NaN) clamp to the first alternative.
    pub(crate) fn select(&self, value: f64) -> &str {
        let mut selected = &self.alternatives[0].text;
        for alternative in &self.alternatives {
            let satisfied = if alternative.inclusive {
                value >= alternative.limit
            } else {
                value > alternative.limit
            };
            if satisfied {
                selected = &alternative.text;
            }
        }
        selected
    }
}
