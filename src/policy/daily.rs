//! Rotation at a fixed wall-clock time of day.

use std::time::SystemTime;

use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone};

use super::RotationPolicy;

type Clock = Box<dyn Fn() -> DateTime<Local> + Send>;

/// Triggers when the clock crosses the next occurrence of the configured
/// time of day.
///
/// When continuing an existing file, the deadline is anchored from the
/// file's last-modified time; for a fresh file it is anchored from "now".
pub struct DailyPolicy {
    time: NaiveTime,
    clock: Clock,
    deadline: DateTime<Local>,
}

impl DailyPolicy {
    #[must_use]
    pub fn new(time: NaiveTime) -> Self {
        Self::with_clock(time, Box::new(Local::now))
    }

    /// An injectable clock keeps the rollover deadline testable.
    #[must_use]
    pub fn with_clock(time: NaiveTime, clock: Clock) -> Self {
        let deadline = next_occurrence(time, (clock)());
        Self {
            time,
            clock,
            deadline,
        }
    }
}

impl RotationPolicy for DailyPolicy {
    fn accepts_existing(&mut self, _len: u64, modified: SystemTime) -> bool {
        let modified: DateTime<Local> = modified.into();
        let deadline = next_occurrence(self.time, modified);
        if (self.clock)() < deadline {
            self.deadline = deadline;
            true
        } else {
            false
        }
    }

    fn must_rotate(&mut self, _upcoming: u64) -> bool {
        (self.clock)() >= self.deadline
    }

    fn reset(&mut self) {
        self.deadline = next_occurrence(self.time, (self.clock)());
    }
}

impl std::fmt::Debug for DailyPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DailyPolicy")
            .field("time", &self.time)
            .field("deadline", &self.deadline)
            .finish_non_exhaustive()
    }
}

/// First occurrence of `time` strictly after `after`.
fn next_occurrence(time: NaiveTime, after: DateTime<Local>) -> DateTime<Local> {
    let mut date = after.date_naive();
    for _ in 0..2 {
        if let Some(candidate) = local_datetime(date, time)
            && candidate > after
        {
            return candidate;
        }
        date = date.succ_opt().unwrap_or(date);
    }
    // Unresolvable local times (DST gaps on both days) fall back to a flat
    // 24h delay.
    after + chrono::Duration::days(1)
}

fn local_datetime(date: NaiveDate, time: NaiveTime) -> Option<DateTime<Local>> {
    Local.from_local_datetime(&date.and_time(time)).earliest()
}
