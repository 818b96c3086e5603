//! Shader program lifecycle on top of a graphics API.
//!
//! A program is built from a vertex and a fragment stage: sources are loaded,
//! each stage is compiled, both are linked, and the intermediate stage objects
//! are released whether or not linking succeeded.
//!
//! # Invariants
//! - A failed build leaves the program without a handle; it never panics.
//! - Compile and link diagnostics are reported through `tracing`.
//! - GPU objects are released explicitly, never on drop.
//!
//! The GL calls go through [`GraphicsApi`], implemented for [`glow::Context`].

mod api;
mod error;
#[cfg(test)]
mod fake;
mod glow_backend;
mod program;
mod source;

pub use api::{GraphicsApi, ShaderStage, UniformValue};
pub use error::ShaderError;
pub use program::{ShaderProgram, compile_program, compile_shader};
pub use source::{load_file, read_source};

pub fn crate_info() -> &'static str {
    "vantage-shader v0.1.0"
}
