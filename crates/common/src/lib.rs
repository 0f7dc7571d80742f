//! Shared types used across the transit stream pipeline crates.

pub mod types;

pub use types::StationId;
