//! Shared types used across the vantage crates.

mod types;

pub use types::CameraId;

pub fn crate_info() -> &'static str {
    "vantage-common v0.1.0"
}
