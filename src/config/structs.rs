//! Serde schema for the TOML configuration file.
//!
//! Separated from the loading logic so file I/O and writer construction stay
//! independent of the schema.

use serde::Deserialize;

/// A completely empty config file must still parse; `#[serde(default)]` on
/// every field keeps zero-config working.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Settings that apply to every writer.
    pub general: GeneralConfig,
    /// One `[[writer]]` table per writer; keys stay free-form because each
    /// writer type consumes its own set.
    pub writer: Vec<toml::Table>,
}

/// Cross-writer settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct GeneralConfig {
    /// Threshold for patternlog's own diagnostics (`trace`..`error`).
    pub level: String,
    /// Locale applied to date placeholders, e.g. `de_DE`.
    pub locale: String,
}
