//! Patternlog's own diagnostic channel.
//!
//! Recovered anomalies (a message argument that cannot satisfy its
//! sub-pattern, an ignorable config oddity) are reported here instead of
//! being raised to the caller. Uses `OnceLock` so the threshold is set
//! exactly once, even if multiple entry points race to call `init`.

use std::io::Write;
use std::sync::OnceLock;

use crate::level::Level;

static THRESHOLD: OnceLock<Level> = OnceLock::new();

/// Sets the minimum severity of internal diagnostics written to stderr.
///
/// `OnceLock` guarantees only the first call takes effect; later calls are
/// no-ops. Without `init`, the threshold defaults to `Warn`.
pub fn init(level: Level) {
    let _ = THRESHOLD.set(level);
}

fn log(level: Level, scope: &str, msg: &str) {
    let threshold = THRESHOLD.get().copied().unwrap_or(Level::Warn);
    if level < threshold {
        return;
    }
    // Diagnostics must never break the logging pipeline itself.
    let _ = writeln!(
        std::io::stderr(),
        "patternlog [{}] {scope}: {msg}",
        level.display_name()
    );
}

/// High-volume instrumentation, visible only when the threshold includes Trace.
pub fn trace(scope: &str, msg: &str) {
    log(Level::Trace, scope, msg);
}

/// Startup and teardown diagnostics.
pub fn debug(scope: &str, msg: &str) {
    log(Level::Debug, scope, msg);
}

/// Normal operational milestones.
pub fn info(scope: &str, msg: &str) {
    log(Level::Info, scope, msg);
}

/// Recovered anomalies, e.g. a fallback from a malformed sub-pattern.
pub fn warn(scope: &str, msg: &str) {
    log(Level::Warn, scope, msg);
}

/// Failures that were contained but should not pass silently.
pub fn error(scope: &str, msg: &str) {
    log(Level::Error, scope, msg);
}
