//! Finding (and optionally materializing) the backing `dat/o_o.ini` file.

mod location;
mod resolver;

pub use location::Location;
pub use resolver::LocationResolver;
