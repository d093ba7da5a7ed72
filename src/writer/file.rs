//! Rotating text file writer: pattern rendering, chunked buffering, and
//! policy-gated file replacement.

use std::fs;
use std::path::{Path, PathBuf};

use super::logfile::LogFile;
use super::{Charset, LINE_SEPARATOR, Writer};
use crate::error::Error;
use crate::internal;
use crate::pattern::Placeholder;
use crate::policy::{RotationPolicy, any_rotates};
use crate::record::{FieldSet, LogRecord};

const DEFAULT_BUFFER_CAPACITY: usize = 64 * 1024;

/// Naming seam for rotated files; the naming policy itself is a
/// collaborator concern, not the writer's.
pub trait FileNamer: Send {
    /// Path for the given rotation generation; generation zero is the
    /// initial file.
    fn path_for(&mut self, rotation: usize) -> PathBuf;
}

/// Default naming: the base path itself, then `stem.1.ext`, `stem.2.ext`...
#[derive(Debug, Clone)]
pub struct CountingNamer {
    base: PathBuf,
}

impl CountingNamer {
    #[must_use]
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }
}

impl FileNamer for CountingNamer {
    fn path_for(&mut self, rotation: usize) -> PathBuf {
        if rotation == 0 {
            return self.base.clone();
        }
        let stem = self
            .base
            .file_stem()
            .map_or_else(String::new, |s| s.to_string_lossy().into_owned());
        let name = self.base.extension().map_or_else(
            || format!("{stem}.{rotation}"),
            |ext| format!("{stem}.{rotation}.{}", ext.to_string_lossy()),
        );
        self.base.with_file_name(name)
    }
}

/// Pattern-formatted text file writer with chunked buffering and
/// policy-driven rotation.
pub struct RollingFileWriter {
    placeholder: Box<dyn Placeholder>,
    file: LogFile,
    policies: Vec<Box<dyn RotationPolicy>>,
    namer: Box<dyn FileNamer>,
    rotations: usize,
    charset: Charset,
    closed: bool,
}

impl RollingFileWriter {
    /// Starts configuring a writer for `path`.
    #[must_use]
    pub fn builder(path: impl Into<PathBuf>) -> RollingFileBuilder {
        RollingFileBuilder {
            path: path.into(),
            placeholder: None,
            policies: Vec::new(),
            namer: None,
            append: true,
            buffered: true,
            capacity: DEFAULT_BUFFER_CAPACITY,
            charset: Charset::Utf8,
        }
    }

    /// The file currently being written.
    #[must_use]
    pub fn current_path(&self) -> &Path {
        self.file.path()
    }

    /// Rotation is completed in full before the triggering record is
    /// written: the old handle is flushed and closed, then the new file is
    /// opened and every policy reset.
    fn rotate(&mut self) -> Result<(), Error> {
        self.rotations += 1;
        let path = self.namer.path_for(self.rotations);
        internal::debug(
            "FILE",
            &format!("Rotating to {}", path.display()),
        );
        self.file.reopen(path)?;
        for policy in &mut self.policies {
            policy.reset();
        }
        Ok(())
    }
}

impl Writer for RollingFileWriter {
    fn required_fields(&self) -> FieldSet {
        self.placeholder.required_fields()
    }

    fn log(&mut self, record: &LogRecord) -> Result<(), Error> {
        if self.closed {
            return Err(Error::Closed);
        }

        let mut line = String::with_capacity(128);
        self.placeholder.render(&mut line, record);
        line.push_str(LINE_SEPARATOR);
        let bytes = self.charset.encode(&line);

        if any_rotates(&mut self.policies, bytes.len() as u64) {
            self.rotate()?;
        }
        self.file.write(&bytes)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Error> {
        if self.closed {
            return Ok(());
        }
        self.file.flush()?;
        Ok(())
    }

    fn close(&mut self) -> Result<(), Error> {
        if self.closed {
            return Ok(());
        }
        self.file.close()?;
        self.closed = true;
        Ok(())
    }
}

/// Builder for [`RollingFileWriter`].
pub struct RollingFileBuilder {
    path: PathBuf,
    placeholder: Option<Box<dyn Placeholder>>,
    policies: Vec<Box<dyn RotationPolicy>>,
    namer: Option<Box<dyn FileNamer>>,
    append: bool,
    buffered: bool,
    capacity: usize,
    charset: Charset,
}

impl RollingFileBuilder {
    /// The compiled placeholder tree used to render each record.
    #[must_use]
    pub fn placeholder(mut self, placeholder: Box<dyn Placeholder>) -> Self {
        self.placeholder = Some(placeholder);
        self
    }

    /// Appends one rotation policy; policies compose by logical OR.
    #[must_use]
    pub fn policy(mut self, policy: Box<dyn RotationPolicy>) -> Self {
        self.policies.push(policy);
        self
    }

    /// Replaces the whole policy list.
    #[must_use]
    pub fn policies(mut self, policies: Vec<Box<dyn RotationPolicy>>) -> Self {
        self.policies = policies;
        self
    }

    /// Custom rotation naming; defaults to [`CountingNamer`].
    #[must_use]
    pub fn namer(mut self, namer: Box<dyn FileNamer>) -> Self {
        self.namer = Some(namer);
        self
    }

    /// Continue an existing file instead of truncating it.
    #[must_use]
    pub const fn append(mut self, append: bool) -> Self {
        self.append = append;
        self
    }

    /// Chunked buffering; unbuffered writers write through per record.
    #[must_use]
    pub const fn buffered(mut self, buffered: bool) -> Self {
        self.buffered = buffered;
        self
    }

    /// Capacity of the reusable byte chunk.
    #[must_use]
    pub const fn buffer_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    #[must_use]
    pub const fn charset(mut self, charset: Charset) -> Self {
        self.charset = charset;
        self
    }

    /// Opens the file and finishes the writer.
    ///
    /// When appending to an existing non-empty file, every policy is asked
    /// whether the file may be continued; any rejection starts the next
    /// rotation generation instead.
    ///
    /// # Errors
    /// I/O failures from opening or probing the file.
    pub fn build(self) -> Result<RollingFileWriter, Error> {
        let placeholder = self
            .placeholder
            .ok_or(Error::MissingProperty("pattern"))?;
        let mut namer: Box<dyn FileNamer> = self
            .namer
            .unwrap_or_else(|| Box::new(CountingNamer::new(self.path.clone())));
        let mut policies = self.policies;
        let mut rotations = 0;

        let initial = namer.path_for(0);
        let existing = if self.append {
            fs::metadata(&initial).ok().filter(|meta| meta.len() > 0)
        } else {
            None
        };

        let (path, append) = match existing {
            Some(meta) => {
                let modified = meta.modified()?;
                let len = meta.len();
                if policies
                    .iter_mut()
                    .all(|policy| policy.accepts_existing(len, modified))
                {
                    (initial, true)
                } else {
                    rotations = 1;
                    let next = namer.path_for(rotations);
                    for policy in &mut policies {
                        policy.reset();
                    }
                    (next, false)
                }
            }
            None => {
                for policy in &mut policies {
                    policy.reset();
                }
                (initial, false)
            }
        };

        let file = LogFile::open(path, append, self.capacity, self.buffered)?;
        Ok(RollingFileWriter {
            placeholder,
            file,
            policies,
            namer,
            rotations,
            charset: self.charset,
            closed: false,
        })
    }
}
