//! Rotation policies decide when a writer must replace its output file.
//!
//! A writer holds an ordered list of policies composed by logical OR:
//! rotation occurs if any policy triggers, evaluated in list order with a
//! short circuit on the first trigger. After a rotation every policy is
//! reset against the fresh file.

mod daily;
mod size;
mod startup;

pub use daily::DailyPolicy;
pub use size::{SizePolicy, parse_size};
pub use startup::StartupPolicy;

use std::time::SystemTime;

use crate::error::Error;

/// Stateful rollover predicate, consulted before each write.
pub trait RotationPolicy: Send {
    /// At writer open: may the existing file (with the given length and
    /// last-modified time) be continued? Accepting may anchor internal
    /// state, e.g. a byte counter or a rotation deadline.
    fn accepts_existing(&mut self, len: u64, modified: SystemTime) -> bool;

    /// Before each write: must the writer rotate before appending
    /// `upcoming` bytes?
    fn must_rotate(&mut self, upcoming: u64) -> bool;

    /// A fresh file has been opened; restart internal state from now.
    fn reset(&mut self);
}

/// OR composition in list order, short-circuiting on the first trigger.
pub(crate) fn any_rotates(policies: &mut [Box<dyn RotationPolicy>], upcoming: u64) -> bool {
    policies.iter_mut().any(|policy| policy.must_rotate(upcoming))
}

/// Parses a comma-separated policy list from configuration, e.g.
/// `"startup, daily: 04:00, size: 10mb"`.
///
/// # Errors
/// [`Error::UnknownPolicy`] for unrecognized names and
/// [`Error::InvalidProperty`] for arguments that cannot be interpreted.
pub fn parse_policies(spec: &str) -> Result<Vec<Box<dyn RotationPolicy>>, Error> {
    let mut policies: Vec<Box<dyn RotationPolicy>> = Vec::new();
    for item in spec.split(',') {
        let item = item.trim();
        if item.is_empty() {
            continue;
        }
        let (name, arg) = match item.split_once(':') {
            Some((name, arg)) => (name.trim(), Some(arg.trim())),
            None => (item, None),
        };
        match name {
            "startup" => policies.push(Box::new(StartupPolicy::new())),
            "daily" => {
                let time = match arg {
                    Some(raw) => chrono::NaiveTime::parse_from_str(raw, "%H:%M").map_err(|_| {
                        Error::InvalidProperty {
                            key: "policies",
                            value: raw.to_string(),
                        }
                    })?,
                    None => chrono::NaiveTime::MIN,
                };
                policies.push(Box::new(DailyPolicy::new(time)));
            }
            "size" => {
                let raw = arg.ok_or(Error::MissingProperty("policies"))?;
                let limit = parse_size(raw).ok_or_else(|| Error::InvalidProperty {
                    key: "policies",
                    value: raw.to_string(),
                })?;
                policies.push(Box::new(SizePolicy::new(limit)));
            }
            unknown => return Err(Error::UnknownPolicy(unknown.to_string())),
        }
    }
    Ok(policies)
}
