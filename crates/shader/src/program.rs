use glam::{Mat3, Mat4, Vec2, Vec3, Vec4};
use std::cell::RefCell;
use std::collections::HashSet;
use std::path::Path;

use crate::api::{GraphicsApi, ShaderStage, UniformValue};
use crate::error::ShaderError;
use crate::source::{load_file, read_source};

/// Compile one shader stage from source text.
///
/// Empty source is rejected before reaching the driver. On a compile failure
/// the driver log is reported, the stage object is deleted, and the log is
/// returned in [`ShaderError::CompileFailure`].
pub fn compile_shader<G: GraphicsApi>(
    gl: &G,
    source: &str,
    stage: ShaderStage,
) -> Result<G::Shader, ShaderError> {
    if source.trim().is_empty() {
        let err = ShaderError::EmptySource { stage };
        tracing::error!("{err}");
        return Err(err);
    }

    let shader = gl
        .create_shader(stage)
        .map_err(|message| ShaderError::ObjectCreation {
            object: "shader",
            message,
        })?;
    gl.shader_source(shader, source);
    gl.compile_shader(shader);

    if !gl.shader_compile_status(shader) {
        let log = gl.shader_info_log(shader);
        gl.delete_shader(shader);
        let err = ShaderError::CompileFailure { stage, log };
        tracing::error!("{err}");
        return Err(err);
    }

    tracing::debug!(?shader, %stage, "compiled shader stage");
    Ok(shader)
}

/// Attach a vertex and a fragment stage to a new program and link it.
///
/// The stages stay alive; releasing them is the caller's job. On a link
/// failure the linker log is reported and the program object is deleted.
pub fn compile_program<G: GraphicsApi>(
    gl: &G,
    vertex: G::Shader,
    fragment: G::Shader,
) -> Result<G::Program, ShaderError> {
    let program = gl
        .create_program()
        .map_err(|message| ShaderError::ObjectCreation {
            object: "program",
            message,
        })?;
    gl.attach_shader(program, vertex);
    gl.attach_shader(program, fragment);
    gl.link_program(program);

    if !gl.program_link_status(program) {
        let log = gl.program_info_log(program);
        gl.delete_program(program);
        let err = ShaderError::LinkFailure { log };
        tracing::error!("{err}");
        return Err(err);
    }

    tracing::debug!(?program, "linked shader program");
    Ok(program)
}

/// Compile both stages, link them, and release the stage objects.
///
/// Both stages are compiled even if the first fails so every diagnostic gets
/// reported. The first error wins.
fn build<G: GraphicsApi>(
    gl: &G,
    vertex_src: &str,
    fragment_src: &str,
) -> Result<G::Program, ShaderError> {
    let vertex = compile_shader(gl, vertex_src, ShaderStage::Vertex);
    let fragment = compile_shader(gl, fragment_src, ShaderStage::Fragment);

    let program = match (&vertex, &fragment) {
        (Ok(vs), Ok(fs)) => compile_program(gl, *vs, *fs),
        _ => Err(ShaderError::LinkFailure {
            log: "skipped: a stage failed to compile".into(),
        }),
    };

    // Stage objects are not needed once linking has been attempted.
    for stage in [&vertex, &fragment].into_iter().flatten() {
        gl.delete_shader(*stage);
    }

    match (vertex, fragment) {
        (Err(e), _) | (_, Err(e)) => Err(e),
        _ => program,
    }
}

/// A linked vertex + fragment program and its uniform setters.
///
/// Construction never fails outright: on any build error the program keeps no
/// handle, the error is logged and kept for [`ShaderProgram::error`], and
/// [`use_program`](ShaderProgram::use_program) unbinds instead. Hosts that
/// want to abort on a bad shader use the `try_` constructors.
///
/// The program is not released on drop; call [`delete`](ShaderProgram::delete)
/// while the context is still current.
#[derive(Debug)]
pub struct ShaderProgram<G: GraphicsApi> {
    handle: Option<G::Program>,
    error: Option<ShaderError>,
    missing_uniforms: RefCell<HashSet<String>>,
}

impl<G: GraphicsApi> ShaderProgram<G> {
    /// Build from two source files, reporting rather than returning failures.
    pub fn from_files(gl: &G, vertex_path: impl AsRef<Path>, fragment_path: impl AsRef<Path>) -> Self {
        let vertex_src = load_file(vertex_path);
        let fragment_src = load_file(fragment_path);
        Self::from_sources(gl, &vertex_src, &fragment_src)
    }

    /// Build from two source files, returning the first failure.
    pub fn try_from_files(
        gl: &G,
        vertex_path: impl AsRef<Path>,
        fragment_path: impl AsRef<Path>,
    ) -> Result<Self, ShaderError> {
        let vertex_src = read_source(vertex_path)?;
        let fragment_src = read_source(fragment_path)?;
        Self::try_from_sources(gl, &vertex_src, &fragment_src)
    }

    /// Build from in-memory sources, reporting rather than returning failures.
    pub fn from_sources(gl: &G, vertex_src: &str, fragment_src: &str) -> Self {
        match build(gl, vertex_src, fragment_src) {
            Ok(program) => Self::with_handle(Some(program), None),
            Err(e) => {
                tracing::warn!("shader program left unusable: {e}");
                Self::with_handle(None, Some(e))
            }
        }
    }

    /// Build from in-memory sources, returning the first failure.
    pub fn try_from_sources(gl: &G, vertex_src: &str, fragment_src: &str) -> Result<Self, ShaderError> {
        let program = build(gl, vertex_src, fragment_src)?;
        Ok(Self::with_handle(Some(program), None))
    }

    fn with_handle(handle: Option<G::Program>, error: Option<ShaderError>) -> Self {
        Self {
            handle,
            error,
            missing_uniforms: RefCell::new(HashSet::new()),
        }
    }

    /// The linked program, `None` if building failed.
    pub fn handle(&self) -> Option<G::Program> {
        self.handle
    }

    pub fn is_valid(&self) -> bool {
        self.handle.is_some()
    }

    /// Why building failed, if it did.
    pub fn error(&self) -> Option<&ShaderError> {
        self.error.as_ref()
    }

    /// Bind this program for subsequent draws. An invalid program unbinds.
    pub fn use_program(&self, gl: &G) {
        gl.use_program(self.handle);
    }

    pub fn set_bool(&self, gl: &G, name: &str, value: bool) {
        self.upload(gl, name, UniformValue::Int(i32::from(value)));
    }

    pub fn set_int(&self, gl: &G, name: &str, value: i32) {
        self.upload(gl, name, UniformValue::Int(value));
    }

    pub fn set_float(&self, gl: &G, name: &str, value: f32) {
        self.upload(gl, name, UniformValue::Float(value));
    }

    pub fn set_vec2(&self, gl: &G, name: &str, value: Vec2) {
        self.upload(gl, name, UniformValue::Vec2(value));
    }

    pub fn set_vec3(&self, gl: &G, name: &str, value: Vec3) {
        self.upload(gl, name, UniformValue::Vec3(value));
    }

    pub fn set_vec3_xyz(&self, gl: &G, name: &str, x: f32, y: f32, z: f32) {
        self.set_vec3(gl, name, Vec3::new(x, y, z));
    }

    pub fn set_vec4(&self, gl: &G, name: &str, value: Vec4) {
        self.upload(gl, name, UniformValue::Vec4(value));
    }

    pub fn set_mat3(&self, gl: &G, name: &str, value: Mat3) {
        self.upload(gl, name, UniformValue::Mat3(value));
    }

    pub fn set_mat4(&self, gl: &G, name: &str, value: Mat4) {
        self.upload(gl, name, UniformValue::Mat4(value));
    }

    /// Activate texture unit `unit` and bind `texture` to its 2D target.
    pub fn set_texture(&self, gl: &G, unit: u32, texture: G::Texture) {
        gl.bind_texture_2d(unit, Some(texture));
    }

    /// Release the program object.
    pub fn delete(self, gl: &G) {
        if let Some(program) = self.handle {
            gl.delete_program(program);
            tracing::debug!(?program, "deleted shader program");
        }
    }

    fn upload(&self, gl: &G, name: &str, value: UniformValue) {
        let Some(program) = self.handle else {
            return;
        };
        match gl.uniform_location(program, name) {
            Some(location) => gl.set_uniform(&location, value),
            None => {
                // Warn once per name; the upload itself stays a no-op.
                if self.missing_uniforms.borrow_mut().insert(name.to_string()) {
                    tracing::warn!(?program, "uniform `{name}` not found in program");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::FakeGl;
    use std::io::Write;

    const VERTEX: &str = "#version 330 core
layout (location = 0) in vec3 aPos;
uniform mat4 model;
uniform mat4 view;
uniform mat4 projection;
void main() {
    gl_Position = projection * view * model * vec4(aPos, 1.0);
}
";

    const FRAGMENT: &str = "#version 330 core
out vec4 FragColor;
uniform vec3 tint;
uniform float alpha;
uniform bool useTexture;
uniform int texture1;
uniform mat3 normalMatrix;
uniform vec4 overlay;
uniform vec2 offset;
void main() {
    FragColor = vec4(tint, alpha);
}
";

    const BROKEN_FRAGMENT: &str = "#version 330 core
out vec4 FragColor;
void main() {
    FragColor = vec4(1.0
";

    #[test]
    fn builds_valid_program_and_releases_stages() {
        let gl = FakeGl::new();
        let program = ShaderProgram::from_sources(&gl, VERTEX, FRAGMENT);
        assert!(program.is_valid());
        assert!(program.error().is_none());
        assert_eq!(gl.live_shaders(), 0);
        assert_eq!(gl.live_programs(), 1);
    }

    #[test]
    fn broken_fragment_yields_invalid_program() {
        let gl = FakeGl::new();
        let program = ShaderProgram::from_sources(&gl, VERTEX, BROKEN_FRAGMENT);
        assert!(!program.is_valid());
        assert!(matches!(
            program.error(),
            Some(ShaderError::CompileFailure {
                stage: ShaderStage::Fragment,
                ..
            })
        ));
        // The vertex stage compiled but must still be released.
        assert_eq!(gl.live_shaders(), 0);
        assert_eq!(gl.live_programs(), 0);
    }

    #[test]
    fn use_on_invalid_program_unbinds() {
        let gl = FakeGl::new();
        let program = ShaderProgram::from_sources(&gl, VERTEX, BROKEN_FRAGMENT);
        program.use_program(&gl);
        assert_eq!(gl.active_program(), None);
        assert_eq!(gl.use_calls(), 1);
        // Setters on an invalid program do nothing.
        program.set_float(&gl, "alpha", 0.5);
    }

    #[test]
    fn use_binds_and_rebinding_is_harmless() {
        let gl = FakeGl::new();
        let program = ShaderProgram::from_sources(&gl, VERTEX, FRAGMENT);
        program.use_program(&gl);
        program.use_program(&gl);
        assert_eq!(gl.active_program(), program.handle());
    }

    #[test]
    fn try_from_sources_returns_compile_error() {
        let gl = FakeGl::new();
        let err = ShaderProgram::try_from_sources(&gl, "void main( {", FRAGMENT).unwrap_err();
        assert!(matches!(
            err,
            ShaderError::CompileFailure {
                stage: ShaderStage::Vertex,
                ..
            }
        ));
        assert!(err.to_string().contains("error compiling vertex shader"));
        assert_eq!(gl.live_shaders(), 0);
    }

    #[test]
    fn empty_source_is_a_build_failure() {
        let gl = FakeGl::new();
        let program = ShaderProgram::from_sources(&gl, VERTEX, "  \n");
        assert!(matches!(
            program.error(),
            Some(ShaderError::EmptySource {
                stage: ShaderStage::Fragment
            })
        ));
        assert_eq!(gl.live_shaders(), 0);
    }

    #[test]
    fn link_failure_is_reported() {
        let gl = FakeGl::new();
        let a = compile_shader(&gl, VERTEX, ShaderStage::Vertex).unwrap();
        let b = compile_shader(&gl, VERTEX, ShaderStage::Vertex).unwrap();
        let err = compile_program(&gl, a, b).unwrap_err();
        assert!(matches!(err, ShaderError::LinkFailure { ref log } if log.contains("fragment")));
        assert_eq!(gl.live_programs(), 0);
        gl.delete_shader(a);
        gl.delete_shader(b);
    }

    #[test]
    fn program_creation_failure_is_reported() {
        let gl = FakeGl::new();
        gl.fail_program_creation();
        let program = ShaderProgram::from_sources(&gl, VERTEX, FRAGMENT);
        assert!(matches!(
            program.error(),
            Some(ShaderError::ObjectCreation {
                object: "program",
                ..
            })
        ));
        assert_eq!(gl.live_shaders(), 0);
    }

    #[test]
    fn uniform_setters_upload_values() {
        let gl = FakeGl::new();
        let program = ShaderProgram::from_sources(&gl, VERTEX, FRAGMENT);
        let id = program.handle().unwrap();
        let view = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));

        program.use_program(&gl);
        program.set_mat4(&gl, "view", view);
        program.set_vec3_xyz(&gl, "tint", 0.1, 0.2, 0.3);
        program.set_float(&gl, "alpha", 0.5);
        program.set_bool(&gl, "useTexture", true);
        program.set_int(&gl, "texture1", 1);
        program.set_mat3(&gl, "normalMatrix", Mat3::IDENTITY);
        program.set_vec4(&gl, "overlay", Vec4::ONE);
        program.set_vec2(&gl, "offset", Vec2::new(0.5, -0.5));

        assert_eq!(gl.uniform(id, "view"), Some(UniformValue::Mat4(view)));
        assert_eq!(
            gl.uniform(id, "tint"),
            Some(UniformValue::Vec3(Vec3::new(0.1, 0.2, 0.3)))
        );
        assert_eq!(gl.uniform(id, "alpha"), Some(UniformValue::Float(0.5)));
        assert_eq!(gl.uniform(id, "useTexture"), Some(UniformValue::Int(1)));
        assert_eq!(gl.uniform(id, "texture1"), Some(UniformValue::Int(1)));
        assert_eq!(
            gl.uniform(id, "normalMatrix"),
            Some(UniformValue::Mat3(Mat3::IDENTITY))
        );
        assert_eq!(gl.uniform(id, "overlay"), Some(UniformValue::Vec4(Vec4::ONE)));
        assert_eq!(
            gl.uniform(id, "offset"),
            Some(UniformValue::Vec2(Vec2::new(0.5, -0.5)))
        );
    }

    #[test]
    fn unknown_uniform_is_a_no_op() {
        let gl = FakeGl::new();
        let program = ShaderProgram::from_sources(&gl, VERTEX, FRAGMENT);
        let id = program.handle().unwrap();
        program.set_float(&gl, "material.shininess", 32.0);
        program.set_float(&gl, "material.shininess", 64.0);
        assert_eq!(gl.uniform(id, "material.shininess"), None);
        assert_eq!(program.missing_uniforms.borrow().len(), 1);
    }

    #[test]
    fn set_texture_binds_unit() {
        let gl = FakeGl::new();
        let program = ShaderProgram::from_sources(&gl, VERTEX, FRAGMENT);
        program.set_texture(&gl, 0, 7);
        program.set_texture(&gl, 1, 9);
        assert_eq!(gl.texture_bindings(), vec![(0, Some(7)), (1, Some(9))]);
    }

    #[test]
    fn delete_releases_program() {
        let gl = FakeGl::new();
        let program = ShaderProgram::from_sources(&gl, VERTEX, FRAGMENT);
        program.delete(&gl);
        assert_eq!(gl.live_programs(), 0);
    }

    #[test]
    fn from_files_reads_sources() {
        let dir = tempfile::tempdir().unwrap();
        let vs = dir.path().join("simple.vert");
        let fs = dir.path().join("simple.frag");
        write!(std::fs::File::create(&vs).unwrap(), "{VERTEX}").unwrap();
        write!(std::fs::File::create(&fs).unwrap(), "{FRAGMENT}").unwrap();

        let gl = FakeGl::new();
        assert!(ShaderProgram::from_files(&gl, &vs, &fs).is_valid());
        assert!(ShaderProgram::try_from_files(&gl, &vs, &fs).is_ok());
    }

    #[test]
    fn missing_file_leaves_program_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let vs = dir.path().join("simple.vert");
        write!(std::fs::File::create(&vs).unwrap(), "{VERTEX}").unwrap();
        let fs = dir.path().join("absent.frag");

        let gl = FakeGl::new();
        let program = ShaderProgram::from_files(&gl, &vs, &fs);
        assert!(!program.is_valid());
        assert!(matches!(
            program.error(),
            Some(ShaderError::EmptySource { .. })
        ));
        assert!(matches!(
            ShaderProgram::try_from_files(&gl, &vs, &fs),
            Err(ShaderError::FileUnreadable { .. })
        ));
        assert_eq!(gl.live_shaders(), 0);
    }
}
