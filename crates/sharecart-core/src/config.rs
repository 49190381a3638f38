use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::errors::SharecartError;
use crate::traits::{Environment, SystemEnvironment};

/// Levels above the application path searched when none is configured.
pub const DEFAULT_DIRECTORY_LEVELS: usize = 4;

/// Environment variable that overrides the application path.
pub const APPLICATION_DIR_VAR: &str = "SHARECART_APPLICATION_DIR";

/// How the manager finds, parses and guards the sharecart file.
///
/// Immutable once built; construct through [`ConfigBuilder`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Config {
    auto_create: bool,
    clamp_to_constraints: bool,
    strict_parsing: bool,
    directory_levels: usize,
    application_path: PathBuf,
}

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Create the `dat/o_o.ini` structure when no file is found.
    pub fn auto_create(&self) -> bool {
        self.auto_create
    }

    /// Clamp out-of-range writes instead of rejecting them.
    pub fn clamp_to_constraints(&self) -> bool {
        self.clamp_to_constraints
    }

    /// Fail on malformed file content instead of substituting defaults.
    pub fn strict_parsing(&self) -> bool {
        self.strict_parsing
    }

    pub fn directory_levels(&self) -> usize {
        self.directory_levels
    }

    pub fn application_path(&self) -> &Path {
        &self.application_path
    }
}

#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    auto_create: bool,
    clamp_to_constraints: bool,
    strict_parsing: bool,
    directory_levels: i64,
    application_path: Option<PathBuf>,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self {
            auto_create: false,
            clamp_to_constraints: false,
            strict_parsing: false,
            directory_levels: DEFAULT_DIRECTORY_LEVELS as i64,
            application_path: None,
        }
    }
}

impl ConfigBuilder {
    pub fn auto_create(mut self, create: bool) -> Self {
        self.auto_create = create;
        self
    }

    pub fn clamp_to_constraints(mut self, clamp: bool) -> Self {
        self.clamp_to_constraints = clamp;
        self
    }

    pub fn strict_parsing(mut self, strict: bool) -> Self {
        self.strict_parsing = strict;
        self
    }

    /// Negative values are rejected by `build`.
    pub fn directory_levels(mut self, levels: i64) -> Self {
        self.directory_levels = levels;
        self
    }

    pub fn application_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.application_path = Some(path.into());
        self
    }

    /// Build against the real process environment.
    pub fn build(self) -> Result<Config, SharecartError> {
        self.build_with(&SystemEnvironment)
    }

    /// Build, falling back to `env` for an unset application path.
    pub fn build_with(self, env: &dyn Environment) -> Result<Config, SharecartError> {
        let directory_levels =
            usize::try_from(self.directory_levels).map_err(|_| SharecartError::InvalidConfig {
                reason: format!(
                    "directory levels cannot be negative (got {})",
                    self.directory_levels
                ),
            })?;

        let application_path = match self.application_path {
            Some(path) => path,
            None => default_application_path(env),
        };

        Ok(Config {
            auto_create: self.auto_create,
            clamp_to_constraints: self.clamp_to_constraints,
            strict_parsing: self.strict_parsing,
            directory_levels,
            application_path,
        })
    }
}

/// `SHARECART_APPLICATION_DIR` if set, else the working directory, else `.`.
pub fn default_application_path(env: &dyn Environment) -> PathBuf {
    if let Some(dir) = env.var(APPLICATION_DIR_VAR).filter(|d| !d.is_empty()) {
        return PathBuf::from(dir);
    }
    env.current_dir().unwrap_or_else(|_| PathBuf::from("."))
}
