use std::path::Path;

use crate::error::ShaderError;

/// Read a shader source file in full.
///
/// Fails with [`ShaderError::FileUnreadable`] if the file cannot be opened or
/// read. No preprocessing is done; `#version` and friends pass through as-is.
pub fn read_source(path: impl AsRef<Path>) -> Result<String, ShaderError> {
    let path = path.as_ref();
    std::fs::read_to_string(path).map_err(|source| ShaderError::FileUnreadable {
        path: path.to_path_buf(),
        source,
    })
}

/// Read a shader source file, reporting failure instead of returning it.
///
/// An unreadable file is logged and yields an empty string, which the compile
/// step rejects as [`ShaderError::EmptySource`].
pub fn load_file(path: impl AsRef<Path>) -> String {
    match read_source(path) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{e}");
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_whole_file() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        write!(tmp, "#version 330 core\nvoid main() {{}}\n").unwrap();
        let code = read_source(tmp.path()).unwrap();
        assert!(code.starts_with("#version 330 core"));
        assert_eq!(load_file(tmp.path()), code);
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.glsl");
        let err = read_source(&path).unwrap_err();
        assert!(matches!(err, ShaderError::FileUnreadable { .. }));
        assert!(err.to_string().contains("nope.glsl"));
    }

    #[test]
    fn load_file_returns_empty_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load_file(dir.path().join("missing.frag")), "");
    }
}
