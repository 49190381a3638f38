//! The `o_o.ini` text format.

mod reader;
mod writer;

pub use reader::CartReader;
pub use writer::{encode, CartWriter};
