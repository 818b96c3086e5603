use glam::{Mat3, Mat4, Vec2, Vec3, Vec4};
use std::fmt;

/// Programmable pipeline stage a shader object belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vertex => f.write_str("vertex"),
            Self::Fragment => f.write_str("fragment"),
        }
    }
}

/// A value uploaded to a uniform. Booleans travel as `Int(0 | 1)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Int(i32),
    Float(f32),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    Mat3(Mat3),
    Mat4(Mat4),
}

/// The graphics API calls the shader program lifecycle needs.
///
/// Object handles are opaque to this crate. Implementations must not validate
/// handle ownership beyond what the underlying API does.
pub trait GraphicsApi {
    type Shader: Copy + fmt::Debug;
    type Program: Copy + fmt::Debug;
    type UniformLocation: Clone + fmt::Debug;
    type Texture: Copy + fmt::Debug;

    fn create_shader(&self, stage: ShaderStage) -> Result<Self::Shader, String>;
    fn shader_source(&self, shader: Self::Shader, source: &str);
    fn compile_shader(&self, shader: Self::Shader);
    fn shader_compile_status(&self, shader: Self::Shader) -> bool;
    fn shader_info_log(&self, shader: Self::Shader) -> String;
    fn delete_shader(&self, shader: Self::Shader);

    fn create_program(&self) -> Result<Self::Program, String>;
    fn attach_shader(&self, program: Self::Program, shader: Self::Shader);
    fn link_program(&self, program: Self::Program);
    fn program_link_status(&self, program: Self::Program) -> bool;
    fn program_info_log(&self, program: Self::Program) -> String;
    fn delete_program(&self, program: Self::Program);

    /// Make `program` current; `None` unbinds.
    fn use_program(&self, program: Option<Self::Program>);
    /// Look up a uniform by its declared name, `None` if the program has none.
    fn uniform_location(&self, program: Self::Program, name: &str)
    -> Option<Self::UniformLocation>;
    /// Upload to the uniform at `location` of the current program.
    fn set_uniform(&self, location: &Self::UniformLocation, value: UniformValue);

    /// Activate texture unit `unit` and bind `texture` to its 2D target.
    fn bind_texture_2d(&self, unit: u32, texture: Option<Self::Texture>);
}
