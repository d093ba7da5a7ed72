//! Configuration loading and the flat-property writer registry.
//!
//! The loader turns each `[[writer]]` TOML table into a flat string
//! key/value map; [`create_writer`] dispatches on the `type` key and wires
//! pattern, file, policy, and charset properties into a concrete writer.
//! Service discovery of writer implementations is out of scope; the
//! registry is a static match.

mod structs;

pub use structs::{Config, GeneralConfig};

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Locale;

use crate::error::Error;
use crate::internal;
use crate::level::Level;
use crate::message::DecimalSymbols;
use crate::pattern::PatternCompiler;
use crate::policy::parse_policies;
use crate::writer::{Charset, ConsoleWriter, JsonFileWriter, RollingFileWriter, Writer};

const DEFAULT_PATTERN: &str = "{date} [{thread}] {level}: {message}";

/// Flat string key/value map describing one writer.
#[derive(Debug, Clone, Default)]
pub struct Properties {
    values: HashMap<String, String>,
}

impl Properties {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flattens a TOML table; scalar values are stringified, nested
    /// structures are skipped with a diagnostic.
    #[must_use]
    pub fn from_table(table: &toml::Table) -> Self {
        let mut values = HashMap::new();
        for (key, value) in table {
            let flat = match value {
                toml::Value::String(s) => s.clone(),
                toml::Value::Integer(i) => i.to_string(),
                toml::Value::Float(f) => f.to_string(),
                toml::Value::Boolean(b) => b.to_string(),
                other => {
                    internal::warn(
                        "CONFIG",
                        &format!("Ignoring non-scalar writer property '{key}' = {other}"),
                    );
                    continue;
                }
            };
            values.insert(key.clone(), flat);
        }
        Self { values }
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    fn get_bool(&self, key: &'static str, default: bool) -> Result<bool, Error> {
        match self.get(key) {
            None => Ok(default),
            Some("true") => Ok(true),
            Some("false") => Ok(false),
            Some(other) => Err(Error::InvalidProperty {
                key,
                value: other.to_string(),
            }),
        }
    }

    fn get_charset(&self) -> Result<Charset, Error> {
        match self.get("charset") {
            None => Ok(Charset::Utf8),
            Some(name) => Charset::parse(name).ok_or_else(|| Error::InvalidProperty {
                key: "charset",
                value: name.to_string(),
            }),
        }
    }

    fn get_level(&self, key: &'static str, default: Level) -> Result<Level, Error> {
        match self.get(key) {
            None => Ok(default),
            Some(raw) => raw
                .parse()
                .map_err(|_| Error::InvalidLevel(raw.to_string())),
        }
    }
}

/// Creates the writer a flat property map describes.
///
/// Recognized `type` values: `console`, `file`, `json`.
///
/// # Errors
/// Missing or uninterpretable properties, unknown writer types, pattern
/// compile errors, and I/O failures from opening files.
pub fn create_writer(properties: &Properties) -> Result<Box<dyn Writer + Send>, Error> {
    let type_name = properties
        .get("type")
        .ok_or(Error::MissingProperty("type"))?;

    let mut compiler = PatternCompiler::new().symbols(DecimalSymbols::default());
    if let Some(name) = properties.get("locale") {
        let locale = Locale::try_from(name).map_err(|_| Error::InvalidProperty {
            key: "locale",
            value: name.to_string(),
        })?;
        compiler = compiler.locale(locale);
    }

    match type_name {
        "console" => {
            let pattern = properties.get("pattern").unwrap_or(DEFAULT_PATTERN);
            let placeholder = compiler.compile(pattern)?;
            let threshold = properties.get_level("threshold", Level::Warn)?;
            Ok(Box::new(ConsoleWriter::new(placeholder, threshold)))
        }
        "file" => {
            let pattern = properties.get("pattern").unwrap_or(DEFAULT_PATTERN);
            let placeholder = compiler.compile(pattern)?;
            let path = file_path(properties)?;
            let mut builder = RollingFileWriter::builder(path)
                .placeholder(placeholder)
                .append(properties.get_bool("append", true)?)
                .buffered(properties.get_bool("buffered", true)?)
                .charset(properties.get_charset()?);
            if let Some(spec) = properties.get("policies") {
                builder = builder.policies(parse_policies(spec)?);
            }
            Ok(Box::new(builder.build()?))
        }
        "json" => {
            let path = file_path(properties)?;
            let writer = JsonFileWriter::builder(path)
                .append(properties.get_bool("append", true)?)
                .buffered(properties.get_bool("buffered", true)?)
                .charset(properties.get_charset()?)
                .build()?;
            Ok(Box::new(writer))
        }
        unknown => Err(Error::UnknownWriter(unknown.to_string())),
    }
}

fn file_path(properties: &Properties) -> Result<PathBuf, Error> {
    let raw = properties.get("file").ok_or(Error::MissingProperty("file"))?;
    Ok(PathBuf::from(shellexpand::tilde(raw).as_ref()))
}

impl Config {
    /// Loads the configuration from the default location.
    ///
    /// # Errors
    /// Fails when the config directory cannot be determined or the file
    /// cannot be read or parsed. A missing file is not an error; it yields
    /// the default (empty) configuration.
    pub fn load() -> Result<Self, Error> {
        let Some(dirs) = directories::ProjectDirs::from("", "", "patternlog") else {
            return Err(Error::ConfigDirNotFound);
        };
        let path = dirs.config_dir().join("patternlog.toml");
        if path.exists() {
            Self::load_from(&path)
        } else {
            internal::debug(
                "CONFIG",
                &format!("No config at {}, using defaults", path.display()),
            );
            Ok(Self::default())
        }
    }

    /// Loads configuration from an explicit path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self, Error> {
        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        internal::debug(
            "CONFIG",
            &format!("Config loaded from {}", path.display()),
        );
        Ok(config)
    }

    /// Materializes every configured `[[writer]]` through the registry and
    /// applies the general settings.
    ///
    /// # Errors
    /// Any error from [`create_writer`], plus invalid general settings.
    pub fn build_writers(&self) -> Result<Vec<Box<dyn Writer + Send>>, Error> {
        if !self.general.level.is_empty() {
            let level: Level = self
                .general
                .level
                .parse()
                .map_err(|_| Error::InvalidLevel(self.general.level.clone()))?;
            internal::init(level);
        }

        let mut writers = Vec::with_capacity(self.writer.len());
        for table in &self.writer {
            let mut properties = Properties::from_table(table);
            if !self.general.locale.is_empty() && properties.get("locale").is_none() {
                properties = properties.with("locale", self.general.locale.clone());
            }
            writers.push(create_writer(&properties)?);
        }
        Ok(writers)
    }
}
