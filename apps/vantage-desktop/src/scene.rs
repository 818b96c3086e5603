//! Cube scene: vertex buffer, procedural texture, per-cube transforms.
//!
//! This is host-side plumbing around the core. The camera supplies the
//! view/projection and the shader program receives every uniform.

use anyhow::{Result, anyhow};
use glam::{Mat4, Vec3};
use glow::HasContext;
use vantage_camera::Camera;
use vantage_shader::ShaderProgram;

const FLOATS_PER_VERTEX: usize = 5;
const CUBE_VERTEX_COUNT: usize = 36;
const CHECKER_SIZE: usize = 64;
const CHECKER_CELL: usize = 8;

/// Unit cube as 12 triangles: position xyz, texture uv.
#[rustfmt::skip]
const CUBE_VERTICES: [f32; CUBE_VERTEX_COUNT * FLOATS_PER_VERTEX] = [
    -0.5, -0.5, -0.5,  0.0, 0.0,
     0.5, -0.5, -0.5,  1.0, 0.0,
     0.5,  0.5, -0.5,  1.0, 1.0,
     0.5,  0.5, -0.5,  1.0, 1.0,
    -0.5,  0.5, -0.5,  0.0, 1.0,
    -0.5, -0.5, -0.5,  0.0, 0.0,

    -0.5, -0.5,  0.5,  0.0, 0.0,
     0.5, -0.5,  0.5,  1.0, 0.0,
     0.5,  0.5,  0.5,  1.0, 1.0,
     0.5,  0.5,  0.5,  1.0, 1.0,
    -0.5,  0.5,  0.5,  0.0, 1.0,
    -0.5, -0.5,  0.5,  0.0, 0.0,

    -0.5,  0.5,  0.5,  1.0, 0.0,
    -0.5,  0.5, -0.5,  1.0, 1.0,
    -0.5, -0.5, -0.5,  0.0, 1.0,
    -0.5, -0.5, -0.5,  0.0, 1.0,
    -0.5, -0.5,  0.5,  0.0, 0.0,
    -0.5,  0.5,  0.5,  1.0, 0.0,

     0.5,  0.5,  0.5,  1.0, 0.0,
     0.5,  0.5, -0.5,  1.0, 1.0,
     0.5, -0.5, -0.5,  0.0, 1.0,
     0.5, -0.5, -0.5,  0.0, 1.0,
     0.5, -0.5,  0.5,  0.0, 0.0,
     0.5,  0.5,  0.5,  1.0, 0.0,

    -0.5, -0.5, -0.5,  0.0, 1.0,
     0.5, -0.5, -0.5,  1.0, 1.0,
     0.5, -0.5,  0.5,  1.0, 0.0,
     0.5, -0.5,  0.5,  1.0, 0.0,
    -0.5, -0.5,  0.5,  0.0, 0.0,
    -0.5, -0.5, -0.5,  0.0, 1.0,

    -0.5,  0.5, -0.5,  0.0, 1.0,
     0.5,  0.5, -0.5,  1.0, 1.0,
     0.5,  0.5,  0.5,  1.0, 0.0,
     0.5,  0.5,  0.5,  1.0, 0.0,
    -0.5,  0.5,  0.5,  0.0, 0.0,
    -0.5,  0.5, -0.5,  0.0, 1.0,
];

/// Where the cubes sit in the world.
const CUBE_POSITIONS: [Vec3; 10] = [
    Vec3::new(0.0, 0.0, 0.0),
    Vec3::new(2.0, 5.0, -15.0),
    Vec3::new(-1.5, -2.2, -2.5),
    Vec3::new(-3.8, -2.0, -12.3),
    Vec3::new(2.4, -0.4, -3.5),
    Vec3::new(-1.7, 3.0, -7.5),
    Vec3::new(1.3, -2.0, -2.5),
    Vec3::new(1.5, 2.0, -2.5),
    Vec3::new(1.5, 0.2, -1.5),
    Vec3::new(-1.3, 1.0, -1.5),
];

/// Model matrix for cube `index`: translated, then tilted a fixed amount.
fn cube_model(index: usize, position: Vec3) -> Mat4 {
    let angle = (20.0 * index as f32).to_radians();
    Mat4::from_translation(position)
        * Mat4::from_axis_angle(Vec3::new(1.0, 0.3, 0.5).normalize(), angle)
}

/// Per-cube tint so the cubes are distinguishable.
fn cube_tint(index: usize) -> Vec3 {
    let t = index as f32 / (CUBE_POSITIONS.len() - 1) as f32;
    Vec3::new(1.0, 0.6 + 0.4 * t, 1.0 - 0.5 * t)
}

/// RGBA checkerboard, two greys.
fn checker_pixels() -> Vec<u8> {
    let mut pixels = Vec::with_capacity(CHECKER_SIZE * CHECKER_SIZE * 4);
    for y in 0..CHECKER_SIZE {
        for x in 0..CHECKER_SIZE {
            let light = ((x / CHECKER_CELL) + (y / CHECKER_CELL)) % 2 == 0;
            let v = if light { 230 } else { 90 };
            pixels.extend_from_slice(&[v, v, v, 255]);
        }
    }
    pixels
}

/// GPU objects for the cube scene. Released with [`Scene::delete`].
pub struct Scene {
    vao: glow::VertexArray,
    vbo: glow::Buffer,
    texture: glow::Texture,
}

impl Scene {
    pub fn new(gl: &glow::Context) -> Result<Self> {
        let stride = (FLOATS_PER_VERTEX * size_of::<f32>()) as i32;
        // SAFETY: the context is current; all objects are created here.
        unsafe {
            let vao = gl.create_vertex_array().map_err(|e| anyhow!(e))?;
            gl.bind_vertex_array(Some(vao));

            let vbo = gl.create_buffer().map_err(|e| anyhow!(e))?;
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(&CUBE_VERTICES[..]),
                glow::STATIC_DRAW,
            );
            gl.vertex_attrib_pointer_f32(0, 3, glow::FLOAT, false, stride, 0);
            gl.enable_vertex_attrib_array(0);
            gl.vertex_attrib_pointer_f32(
                1,
                2,
                glow::FLOAT,
                false,
                stride,
                (3 * size_of::<f32>()) as i32,
            );
            gl.enable_vertex_attrib_array(1);

            gl.bind_vertex_array(None);
            gl.bind_buffer(glow::ARRAY_BUFFER, None);

            let texture = gl.create_texture().map_err(|e| anyhow!(e))?;
            gl.bind_texture(glow::TEXTURE_2D, Some(texture));
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_WRAP_S,
                glow::MIRRORED_REPEAT as i32,
            );
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_WRAP_T,
                glow::MIRRORED_REPEAT as i32,
            );
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MIN_FILTER,
                glow::LINEAR_MIPMAP_LINEAR as i32,
            );
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, glow::NEAREST as i32);
            let pixels = checker_pixels();
            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                glow::RGBA as i32,
                CHECKER_SIZE as i32,
                CHECKER_SIZE as i32,
                0,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(Some(pixels.as_slice())),
            );
            gl.generate_mipmap(glow::TEXTURE_2D);
            gl.bind_texture(glow::TEXTURE_2D, None);

            gl.enable(glow::DEPTH_TEST);

            Ok(Self { vao, vbo, texture })
        }
    }

    /// Draw every cube with `program` from `camera`'s point of view.
    pub fn draw(
        &self,
        gl: &glow::Context,
        program: &ShaderProgram<glow::Context>,
        camera: &Camera,
        aspect: f32,
        near: f32,
        far: f32,
    ) {
        program.use_program(gl);
        program.set_texture(gl, 0, self.texture);
        program.set_int(gl, "checker", 0);
        program.set_mat4(gl, "view", camera.view_matrix());
        program.set_mat4(gl, "projection", camera.projection_matrix(aspect, near, far));

        // SAFETY: the context is current and the VAO belongs to it.
        unsafe { gl.bind_vertex_array(Some(self.vao)) };
        for (i, position) in CUBE_POSITIONS.iter().enumerate() {
            program.set_mat4(gl, "model", cube_model(i, *position));
            program.set_vec3(gl, "tint", cube_tint(i));
            unsafe { gl.draw_arrays(glow::TRIANGLES, 0, CUBE_VERTEX_COUNT as i32) };
        }
        unsafe { gl.bind_vertex_array(None) };
    }

    pub fn delete(self, gl: &glow::Context) {
        // SAFETY: the context is current; the objects are not used again.
        unsafe {
            gl.delete_vertex_array(self.vao);
            gl.delete_buffer(self.vbo);
            gl.delete_texture(self.texture);
        }
    }
}
