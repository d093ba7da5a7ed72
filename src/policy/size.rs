//! Rotation once a configured maximum file size would be exceeded.

use std::time::SystemTime;

use super::RotationPolicy;

/// Triggers when appending the next record would exceed the maximum size.
///
/// The counter mirrors the bytes the writer appends; it starts at the
/// existing file's length when a file is continued and at zero after each
/// rotation. The record that triggers a rotation is written to the fresh
/// file without being re-counted, so a file may exceed the limit by at most
/// one record.
#[derive(Debug, Clone)]
pub struct SizePolicy {
    limit: u64,
    count: u64,
}

impl SizePolicy {
    #[must_use]
    pub const fn new(limit: u64) -> Self {
        Self { limit, count: 0 }
    }
}

impl RotationPolicy for SizePolicy {
    fn accepts_existing(&mut self, len: u64, _modified: SystemTime) -> bool {
        if len <= self.limit {
            self.count = len;
            true
        } else {
            false
        }
    }

    fn must_rotate(&mut self, upcoming: u64) -> bool {
        if self.count + upcoming > self.limit {
            true
        } else {
            self.count += upcoming;
            false
        }
    }

    fn reset(&mut self) {
        self.count = 0;
    }
}

/// Parses size notation from config values and policy strings: a plain byte
/// count or a `K`/`KB`, `M`/`MB`, `G`/`GB` suffix.
#[must_use]
pub fn parse_size(s: &str) -> Option<u64> {
    let s = s.trim().to_uppercase();
    let (num_str, multiplier): (&str, f64) = if s.ends_with("GB") || s.ends_with('G') {
        (
            s.trim_end_matches("GB").trim_end_matches('G'),
            1024.0 * 1024.0 * 1024.0,
        )
    } else if s.ends_with("MB") || s.ends_with('M') {
        (
            s.trim_end_matches("MB").trim_end_matches('M'),
            1024.0 * 1024.0,
        )
    } else if s.ends_with("KB") || s.ends_with('K') {
        (s.trim_end_matches("KB").trim_end_matches('K'), 1024.0)
    } else {
        (s.as_str(), 1.0)
    };

    num_str.trim().parse::<f64>().ok().map(|n| {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let result = (n * multiplier) as u64;
        result
    })
}
