#![forbid(unsafe_code)]

pub mod config;
pub mod constraints;
pub mod errors;
pub mod format;
pub mod record;
pub mod traits;

pub use config::{Config, ConfigBuilder};
pub use errors::{FormatError, ReadError, SharecartError, ValueKind};
pub use record::Record;
pub use traits::{Environment, FileSystem, SystemEnvironment};
