use std::path::{Component, Path, PathBuf};

use sharecart_core::format::{DAT_DIRECTORY, INI_FILE};
use sharecart_core::traits::FileSystem;

use super::Location;

/// Bounded upward search for `dat/o_o.ini`.
///
/// Level `0` is the start directory itself, level `n` is `n` parent
/// traversals above it; every level up to and including `levels` is visited.
/// A creating search touches the file system at most once for a directory
/// and once for a file. Creation failures are logged and reported as
/// "not found".
pub struct LocationResolver<'a, F: FileSystem + ?Sized> {
    fs: &'a F,
    levels: usize,
}

impl<'a, F: FileSystem + ?Sized> LocationResolver<'a, F> {
    pub fn new(fs: &'a F, levels: usize) -> Self {
        Self { fs, levels }
    }

    /// Look for an existing file only.
    pub fn find(&self, start: &Path) -> Option<Location> {
        self.search(start, false)
    }

    /// Look for an existing file, creating the file or the whole `dat`
    /// structure when none is found.
    pub fn find_or_create(&self, start: &Path) -> Option<Location> {
        self.search(start, true)
    }

    fn search(&self, start: &Path, create: bool) -> Option<Location> {
        for level in 0..=self.levels {
            let dat = above(start, level).join(DAT_DIRECTORY);
            tracing::debug!(level, candidate = %dat.display(), "checking sharecart directory");
            if !self.fs.is_dir(&dat) {
                continue;
            }

            let ini = dat.join(INI_FILE);
            if self.fs.exists(&ini) {
                tracing::info!(path = %ini.display(), "sharecart file found");
                return Some(Location::new(ini, false));
            }
            if create {
                return self.create_ini_file(ini);
            }
        }

        if create {
            return self.create_dat_directory(start);
        }
        None
    }

    fn create_dat_directory(&self, start: &Path) -> Option<Location> {
        for level in 0..=self.levels {
            let parent = above(start, level + 1);
            if !self.fs.is_dir(&parent) {
                continue;
            }

            let dat = parent.join(DAT_DIRECTORY);
            match self.fs.create_dir(&dat) {
                Ok(()) => {
                    tracing::info!(path = %dat.display(), "created sharecart directory");
                    return self.create_ini_file(dat.join(INI_FILE));
                }
                Err(e) => {
                    tracing::debug!(path = %dat.display(), error = %e, "cannot create sharecart directory");
                }
            }
        }
        None
    }

    fn create_ini_file(&self, ini: PathBuf) -> Option<Location> {
        if self.fs.exists(&ini) {
            return Some(Location::new(ini, false));
        }
        match self.fs.create_file(&ini) {
            Ok(true) => {
                tracing::info!(path = %ini.display(), "created sharecart file");
                Some(Location::new(ini, true))
            }
            Ok(false) => Some(Location::new(ini, false)),
            Err(e) => {
                tracing::warn!(path = %ini.display(), error = %e, "cannot create sharecart file");
                None
            }
        }
    }
}

/// `start` followed by `levels` parent traversals.
fn above(start: &Path, levels: usize) -> PathBuf {
    let mut path = start.to_path_buf();
    for _ in 0..levels {
        path.push(Component::ParentDir);
    }
    path
}
