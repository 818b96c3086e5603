//! [`GraphicsApi`] over a live OpenGL context.
//!
//! Every call requires the context to be current on the calling thread, which
//! is the host's job when it creates the `glow::Context`.

use glow::HasContext;

use crate::api::{GraphicsApi, ShaderStage, UniformValue};

fn stage_enum(stage: ShaderStage) -> u32 {
    match stage {
        ShaderStage::Vertex => glow::VERTEX_SHADER,
        ShaderStage::Fragment => glow::FRAGMENT_SHADER,
    }
}

// SAFETY (all blocks below): the host keeps the context current while the
// render loop runs, and every handle passed in was created by this context.
impl GraphicsApi for glow::Context {
    type Shader = glow::Shader;
    type Program = glow::Program;
    type UniformLocation = glow::UniformLocation;
    type Texture = glow::Texture;

    fn create_shader(&self, stage: ShaderStage) -> Result<Self::Shader, String> {
        unsafe { HasContext::create_shader(self, stage_enum(stage)) }
    }

    fn shader_source(&self, shader: Self::Shader, source: &str) {
        unsafe { HasContext::shader_source(self, shader, source) }
    }

    fn compile_shader(&self, shader: Self::Shader) {
        unsafe { HasContext::compile_shader(self, shader) }
    }

    fn shader_compile_status(&self, shader: Self::Shader) -> bool {
        unsafe { HasContext::get_shader_compile_status(self, shader) }
    }

    fn shader_info_log(&self, shader: Self::Shader) -> String {
        unsafe { HasContext::get_shader_info_log(self, shader) }
    }

    fn delete_shader(&self, shader: Self::Shader) {
        unsafe { HasContext::delete_shader(self, shader) }
    }

    fn create_program(&self) -> Result<Self::Program, String> {
        unsafe { HasContext::create_program(self) }
    }

    fn attach_shader(&self, program: Self::Program, shader: Self::Shader) {
        unsafe { HasContext::attach_shader(self, program, shader) }
    }

    fn link_program(&self, program: Self::Program) {
        unsafe { HasContext::link_program(self, program) }
    }

    fn program_link_status(&self, program: Self::Program) -> bool {
        unsafe { HasContext::get_program_link_status(self, program) }
    }

    fn program_info_log(&self, program: Self::Program) -> String {
        unsafe { HasContext::get_program_info_log(self, program) }
    }

    fn delete_program(&self, program: Self::Program) {
        unsafe { HasContext::delete_program(self, program) }
    }

    fn use_program(&self, program: Option<Self::Program>) {
        unsafe { HasContext::use_program(self, program) }
    }

    fn uniform_location(
        &self,
        program: Self::Program,
        name: &str,
    ) -> Option<Self::UniformLocation> {
        unsafe { HasContext::get_uniform_location(self, program, name) }
    }

    fn set_uniform(&self, location: &Self::UniformLocation, value: UniformValue) {
        let loc = Some(location);
        unsafe {
            match value {
                UniformValue::Int(v) => self.uniform_1_i32(loc, v),
                UniformValue::Float(v) => self.uniform_1_f32(loc, v),
                UniformValue::Vec2(v) => self.uniform_2_f32(loc, v.x, v.y),
                UniformValue::Vec3(v) => self.uniform_3_f32(loc, v.x, v.y, v.z),
                UniformValue::Vec4(v) => self.uniform_4_f32(loc, v.x, v.y, v.z, v.w),
                UniformValue::Mat3(m) => {
                    self.uniform_matrix_3_f32_slice(loc, false, &m.to_cols_array())
                }
                UniformValue::Mat4(m) => {
                    self.uniform_matrix_4_f32_slice(loc, false, &m.to_cols_array())
                }
            }
        }
    }

    fn bind_texture_2d(&self, unit: u32, texture: Option<Self::Texture>) {
        unsafe {
            self.active_texture(glow::TEXTURE0 + unit);
            self.bind_texture(glow::TEXTURE_2D, texture);
        }
    }
}
