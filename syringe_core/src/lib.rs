// Generated source is commonly written to stdout. For temporary logging, print to stderr instead.
#![deny(clippy::print_stdout)]

pub mod back;
pub mod compile;
pub mod config;
pub mod driver;
pub mod error;
pub mod hash;
pub mod manifest;
pub mod registry;
pub mod util;
pub mod validate;
