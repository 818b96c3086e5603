use std::path::PathBuf;

use crate::api::ShaderStage;

/// Errors from building a shader program.
///
/// These are static configuration errors found once at startup; nothing here
/// is retried.
#[derive(Debug, thiserror::Error)]
pub enum ShaderError {
    #[error("unable to open {}: {source}", path.display())]
    FileUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{stage} shader source is empty")]
    EmptySource { stage: ShaderStage },
    #[error("failed to create {object}: {message}")]
    ObjectCreation {
        object: &'static str,
        message: String,
    },
    #[error("error compiling {stage} shader:\n{log}")]
    CompileFailure { stage: ShaderStage, log: String },
    #[error("error linking program:\n{log}")]
    LinkFailure { log: String },
}
