#![forbid(unsafe_code)]

pub mod codec;
pub mod fs;
pub mod locate;
pub mod manager;

pub use codec::{encode, CartReader, CartWriter};
pub use fs::OsFileSystem;
pub use locate::{Location, LocationResolver};
pub use manager::CartManager;
