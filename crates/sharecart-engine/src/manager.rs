//! Lifecycle of one sharecart file: resolve, load, read and mutate, save.

use sharecart_core::constraints::{
    clamp_misc, clamp_name, clamp_x, clamp_y, valid_misc, valid_misc_index, valid_name,
    valid_switch_index, valid_x, valid_y,
};
use sharecart_core::{Config, FileSystem, ReadError, Record, SharecartError};

use crate::codec::{CartReader, CartWriter};
use crate::fs::OsFileSystem;
use crate::locate::{Location, LocationResolver};

type Result<T> = std::result::Result<T, SharecartError>;

/// Owns the in-memory [`Record`] and the [`Location`] it is persisted to.
///
/// ```text
/// unresolved --resolve--> resolved --load--> loaded <--mutate/save--> dirty
/// ```
///
/// A failed `resolve`, or a `load` that hits an I/O error, drops the manager
/// back to unresolved. Callers sharing a manager must serialize access
/// themselves.
#[derive(Debug)]
pub struct CartManager<F: FileSystem = OsFileSystem> {
    config: Config,
    fs: F,
    location: Option<Location>,
    record: Option<Record>,
    searched: bool,
    valid: bool,
    loaded: bool,
    dirty: bool,
}

impl CartManager<OsFileSystem> {
    pub fn new(config: Config) -> Self {
        Self::with_file_system(config, OsFileSystem)
    }
}

impl<F: FileSystem> CartManager<F> {
    pub fn with_file_system(config: Config, fs: F) -> Self {
        Self {
            config,
            fs,
            location: None,
            record: None,
            searched: false,
            valid: false,
            loaded: false,
            dirty: false,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn file_system(&self) -> &F {
        &self.fs
    }

    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    /// Copy of the in-memory record, if one is loaded from a resolved file.
    pub fn record(&self) -> Option<Record> {
        self.readable("record").ok().cloned()
    }

    /// Search for the sharecart file, creating it when the configuration
    /// allows. Runs a fresh search on every call.
    pub fn resolve(&mut self) -> bool {
        let resolver = LocationResolver::new(&self.fs, self.config.directory_levels());
        let start = self.config.application_path();
        let location = if self.config.auto_create() {
            resolver.find_or_create(start)
        } else {
            resolver.find(start)
        };

        match &location {
            Some(loc) => tracing::info!(
                path = %loc,
                auto_created = loc.is_auto_created(),
                "sharecart resolved"
            ),
            None => tracing::info!(start = %start.display(), "no sharecart file found"),
        }

        self.valid = location.is_some();
        self.location = location;
        self.searched = true;
        self.valid
    }

    /// Whether a sharecart file has been located. Searches once if no
    /// search has happened yet.
    pub fn is_valid(&mut self) -> bool {
        if !self.searched {
            self.resolve();
        }
        self.valid
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }

    /// Read the record from the resolved file.
    ///
    /// A freshly created file is populated with defaults instead of parsed.
    /// Outside strict parsing, malformed content is clamped or defaulted
    /// field by field and an I/O failure returns `Ok(false)`.
    pub fn load(&mut self) -> Result<bool> {
        let location = match (&self.location, self.valid) {
            (Some(location), true) => location.clone(),
            _ => {
                return Err(SharecartError::State {
                    operation: "load",
                    reason: "no sharecart file has been resolved",
                })
            }
        };

        if location.is_auto_created() {
            self.record = Some(Record::default());
            self.loaded = true;
            self.dirty = false;
            if self.save()? {
                if let Some(loc) = self.location.as_mut() {
                    loc.clear_auto_created();
                }
            }
            return Ok(true);
        }

        let strict = self.config.strict_parsing();
        let read = self
            .fs
            .open_read(location.path())
            .map_err(ReadError::Io)
            .and_then(|input| CartReader::new(input).strict(strict).read());

        match read {
            Ok(record) => {
                self.record = Some(record);
                self.loaded = true;
                self.dirty = false;
                Ok(true)
            }
            Err(ReadError::Io(e)) => {
                tracing::warn!(path = %location, error = %e, "cannot read sharecart file");
                self.valid = false;
                self.loaded = false;
                self.record = None;
                if strict {
                    return Err(SharecartError::read_failure(location.path(), ReadError::Io(e)));
                }
                Ok(false)
            }
            // Only a strict reader reports format errors.
            Err(ReadError::Format(e)) => Err(SharecartError::read_failure(
                location.path(),
                ReadError::Format(e),
            )),
        }
    }

    /// Write the in-memory record back. Returns `Ok(false)` when the file
    /// cannot be written.
    pub fn save(&mut self) -> Result<bool> {
        let location = match (&self.location, self.valid) {
            (Some(location), true) => location,
            _ => {
                return Err(SharecartError::State {
                    operation: "save",
                    reason: "no sharecart file has been resolved",
                })
            }
        };
        let record = match (&self.record, self.loaded) {
            (Some(record), true) => record,
            _ => {
                return Err(SharecartError::State {
                    operation: "save",
                    reason: "the sharecart file has not been loaded",
                })
            }
        };

        let written = self
            .fs
            .open_write(location.path())
            .and_then(|out| CartWriter::new(out).write(record));
        match written {
            Ok(()) => {
                tracing::debug!(path = %location, "sharecart saved");
                self.dirty = false;
                Ok(true)
            }
            Err(e) => {
                tracing::warn!(path = %location, error = %e, "cannot write sharecart file");
                Ok(false)
            }
        }
    }

    pub fn x(&self) -> Result<i16> {
        Ok(self.readable("x")?.x)
    }

    pub fn set_x(&mut self, value: i64) -> Result<()> {
        let clamp = self.config.clamp_to_constraints();
        let record = self.writable("x")?;
        if !clamp && !valid_x(value) {
            return Err(SharecartError::invalid_parameter("x", value));
        }
        record.x = clamp_x(value);
        self.dirty = true;
        Ok(())
    }

    pub fn y(&self) -> Result<i16> {
        Ok(self.readable("y")?.y)
    }

    pub fn set_y(&mut self, value: i64) -> Result<()> {
        let clamp = self.config.clamp_to_constraints();
        let record = self.writable("y")?;
        if !clamp && !valid_y(value) {
            return Err(SharecartError::invalid_parameter("y", value));
        }
        record.y = clamp_y(value);
        self.dirty = true;
        Ok(())
    }

    pub fn misc(&self, index: usize) -> Result<i32> {
        let record = self.readable(format!("misc{index}"))?;
        record
            .misc(index)
            .ok_or(SharecartError::IndexOutOfBounds {
                parameter: "misc",
                index,
            })
    }

    pub fn set_misc(&mut self, index: usize, value: i64) -> Result<()> {
        let clamp = self.config.clamp_to_constraints();
        let record = self.writable(format!("misc{index}"))?;
        if !valid_misc_index(index) {
            return Err(SharecartError::IndexOutOfBounds {
                parameter: "misc",
                index,
            });
        }
        if !clamp && !valid_misc(value) {
            return Err(SharecartError::invalid_parameter(format!("misc{index}"), value));
        }
        record.set_misc(index, clamp_misc(value));
        self.dirty = true;
        Ok(())
    }

    pub fn name(&self) -> Result<&str> {
        Ok(&self.readable("name")?.name)
    }

    /// `None` clears the name when clamping, and is rejected otherwise.
    pub fn set_name<'a>(&mut self, value: impl Into<Option<&'a str>>) -> Result<()> {
        let value = value.into();
        let clamp = self.config.clamp_to_constraints();
        let record = self.writable("name")?;
        if !clamp && !valid_name(value) {
            return Err(SharecartError::invalid_parameter(
                "name",
                value.unwrap_or("<none>"),
            ));
        }
        record.name = clamp_name(value);
        self.dirty = true;
        Ok(())
    }

    pub fn switch_value(&self, index: usize) -> Result<bool> {
        let record = self.readable(format!("switch{index}"))?;
        record
            .switch_value(index)
            .ok_or(SharecartError::IndexOutOfBounds {
                parameter: "switch",
                index,
            })
    }

    pub fn set_switch_value(&mut self, index: usize, value: bool) -> Result<()> {
        let record = self.writable(format!("switch{index}"))?;
        if !valid_switch_index(index) {
            return Err(SharecartError::IndexOutOfBounds {
                parameter: "switch",
                index,
            });
        }
        record.set_switch_value(index, value);
        self.dirty = true;
        Ok(())
    }

    fn readable(&self, parameter: impl Into<String>) -> Result<&Record> {
        match (&self.record, self.valid && self.loaded) {
            (Some(record), true) => Ok(record),
            _ => Err(SharecartError::not_accessible(parameter)),
        }
    }

    fn writable(&mut self, parameter: impl Into<String>) -> Result<&mut Record> {
        match (&mut self.record, self.valid && self.loaded) {
            (Some(record), true) => Ok(record),
            _ => Err(SharecartError::not_accessible(parameter)),
        }
    }
}
