//! Crate which contains the files in `assets/` as a generated registry,
//! built by running the resource compiler in the build script.
//!
//! This doubles as a check that the generated Rust source compiles and behaves as intended.

include!(concat!(env!("OUT_DIR"), "/assets.rs"));
