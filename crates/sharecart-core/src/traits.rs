use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

/// File-system operations the resolver and codec need.
///
/// Implemented over `std::fs` by the engine; tests substitute their own.
pub trait FileSystem {
    fn exists(&self, path: &Path) -> bool;
    fn is_dir(&self, path: &Path) -> bool;
    fn is_file(&self, path: &Path) -> bool;

    /// Creates a single directory; the parent must already exist.
    fn create_dir(&self, path: &Path) -> io::Result<()>;

    /// Creates an empty file. `Ok(false)` if something already exists at `path`.
    fn create_file(&self, path: &Path) -> io::Result<bool>;

    fn open_read(&self, path: &Path) -> io::Result<Box<dyn BufRead + '_>>;

    /// Opens an existing regular file for writing, truncating it.
    ///
    /// Never creates the file: a missing target is `ErrorKind::NotFound`.
    fn open_write(&self, path: &Path) -> io::Result<Box<dyn Write + '_>>;

    fn remove_file(&self, path: &Path) -> io::Result<()>;
}

/// Process environment lookups.
pub trait Environment {
    fn var(&self, name: &str) -> Option<String>;
    fn current_dir(&self) -> io::Result<PathBuf>;
}

/// [`Environment`] backed by `std::env`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemEnvironment;

impl Environment for SystemEnvironment {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }

    fn current_dir(&self) -> io::Result<PathBuf> {
        std::env::current_dir()
    }
}
