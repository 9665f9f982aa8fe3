pub mod fixed_map;

pub use fixed_map::{CapacityExceeded, FixedMap, NotFound};

/// Source of [fixed_map], embedded unchanged into generated Rust registries.
pub const FIXED_MAP_SOURCE: &str = include_str!("fixed_map.rs");
