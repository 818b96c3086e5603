//! Input bindings: raw window events mapped to camera actions.
//!
//! # Invariants
//! - At most one binding per window at a time.
//! - A binding names its camera by id; the host passes the camera in on every
//!   dispatch, so a binding never outlives or aliases it.
//! - The first cursor event after attaching only records a reference point.

pub mod action;
pub mod binding;

pub use action::Action;
pub use binding::{BindingError, InputBindings};

pub fn crate_info() -> &'static str {
    "vantage-input v0.1.0"
}
