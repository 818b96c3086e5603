//! Recording stand-in for a GL context.
//!
//! A stage "compiles" when its source has a `main` entry point and balanced
//! braces. A program "links" when it has exactly one compiled vertex and one
//! compiled fragment stage. Uniforms are whatever `uniform <type> <name>;`
//! lines the attached sources declare.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use crate::api::{GraphicsApi, ShaderStage, UniformValue};

#[derive(Debug)]
struct FakeShader {
    stage: ShaderStage,
    source: String,
    compiled: bool,
}

#[derive(Debug, Default)]
struct FakeProgram {
    attached: Vec<u32>,
    linked: bool,
    log: String,
    declared: HashSet<String>,
    uniforms: HashMap<String, UniformValue>,
}

#[derive(Debug, Default)]
struct State {
    next_id: u32,
    shaders: HashMap<u32, FakeShader>,
    programs: HashMap<u32, FakeProgram>,
    active: Option<u32>,
    use_calls: usize,
    textures: Vec<(u32, Option<u32>)>,
    fail_program_creation: bool,
}

#[derive(Debug, Default)]
pub(crate) struct FakeGl {
    state: RefCell<State>,
}

impl FakeGl {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn fail_program_creation(&self) {
        self.state.borrow_mut().fail_program_creation = true;
    }

    pub(crate) fn live_shaders(&self) -> usize {
        self.state.borrow().shaders.len()
    }

    pub(crate) fn live_programs(&self) -> usize {
        self.state.borrow().programs.len()
    }

    pub(crate) fn active_program(&self) -> Option<u32> {
        self.state.borrow().active
    }

    pub(crate) fn use_calls(&self) -> usize {
        self.state.borrow().use_calls
    }

    pub(crate) fn uniform(&self, program: u32, name: &str) -> Option<UniformValue> {
        let state = self.state.borrow();
        state.programs.get(&program)?.uniforms.get(name).copied()
    }

    pub(crate) fn texture_bindings(&self) -> Vec<(u32, Option<u32>)> {
        self.state.borrow().textures.clone()
    }

    fn alloc(state: &mut State) -> u32 {
        state.next_id += 1;
        state.next_id
    }
}

fn looks_compilable(source: &str) -> bool {
    let open = source.matches('{').count();
    let close = source.matches('}').count();
    source.contains("void main") && open > 0 && open == close
}

fn declared_uniforms(source: &str) -> impl Iterator<Item = String> + '_ {
    source.lines().filter_map(|line| {
        let mut words = line.trim().trim_end_matches(';').split_whitespace();
        match (words.next(), words.next(), words.next()) {
            (Some("uniform"), Some(_ty), Some(name)) => Some(name.to_string()),
            _ => None,
        }
    })
}

impl GraphicsApi for FakeGl {
    type Shader = u32;
    type Program = u32;
    type UniformLocation = (u32, String);
    type Texture = u32;

    fn create_shader(&self, stage: ShaderStage) -> Result<u32, String> {
        let mut state = self.state.borrow_mut();
        let id = Self::alloc(&mut state);
        state.shaders.insert(
            id,
            FakeShader {
                stage,
                source: String::new(),
                compiled: false,
            },
        );
        Ok(id)
    }

    fn shader_source(&self, shader: u32, source: &str) {
        if let Some(s) = self.state.borrow_mut().shaders.get_mut(&shader) {
            s.source = source.to_string();
        }
    }

    fn compile_shader(&self, shader: u32) {
        if let Some(s) = self.state.borrow_mut().shaders.get_mut(&shader) {
            s.compiled = looks_compilable(&s.source);
        }
    }

    fn shader_compile_status(&self, shader: u32) -> bool {
        self.state
            .borrow()
            .shaders
            .get(&shader)
            .is_some_and(|s| s.compiled)
    }

    fn shader_info_log(&self, shader: u32) -> String {
        match self.state.borrow().shaders.get(&shader) {
            Some(s) if !s.compiled => "0:1(1): error: syntax error, unexpected end of file".into(),
            _ => String::new(),
        }
    }

    fn delete_shader(&self, shader: u32) {
        self.state.borrow_mut().shaders.remove(&shader);
    }

    fn create_program(&self) -> Result<u32, String> {
        let mut state = self.state.borrow_mut();
        if state.fail_program_creation {
            return Err("out of program objects".into());
        }
        let id = Self::alloc(&mut state);
        state.programs.insert(id, FakeProgram::default());
        Ok(id)
    }

    fn attach_shader(&self, program: u32, shader: u32) {
        if let Some(p) = self.state.borrow_mut().programs.get_mut(&program) {
            p.attached.push(shader);
        }
    }

    fn link_program(&self, program: u32) {
        let mut state = self.state.borrow_mut();
        let State {
            shaders, programs, ..
        } = &mut *state;
        let Some(p) = programs.get_mut(&program) else {
            return;
        };
        let stages: Vec<&FakeShader> = p.attached.iter().filter_map(|id| shaders.get(id)).collect();
        let count = |stage| stages.iter().filter(|s| s.stage == stage).count();
        p.linked = false;
        p.log = if stages.iter().any(|s| !s.compiled) {
            "error: linking with uncompiled shader".into()
        } else if count(ShaderStage::Vertex) != 1 || count(ShaderStage::Fragment) != 1 {
            "error: program needs one vertex and one fragment stage".into()
        } else {
            p.linked = true;
            p.declared = stages.iter().flat_map(|s| declared_uniforms(&s.source)).collect();
            String::new()
        };
    }

    fn program_link_status(&self, program: u32) -> bool {
        self.state
            .borrow()
            .programs
            .get(&program)
            .is_some_and(|p| p.linked)
    }

    fn program_info_log(&self, program: u32) -> String {
        self.state
            .borrow()
            .programs
            .get(&program)
            .map(|p| p.log.clone())
            .unwrap_or_default()
    }

    fn delete_program(&self, program: u32) {
        self.state.borrow_mut().programs.remove(&program);
    }

    fn use_program(&self, program: Option<u32>) {
        let mut state = self.state.borrow_mut();
        state.active = program;
        state.use_calls += 1;
    }

    fn uniform_location(&self, program: u32, name: &str) -> Option<(u32, String)> {
        let state = self.state.borrow();
        let p = state.programs.get(&program)?;
        p.declared.contains(name).then(|| (program, name.to_string()))
    }

    fn set_uniform(&self, location: &(u32, String), value: UniformValue) {
        let (program, name) = location;
        if let Some(p) = self.state.borrow_mut().programs.get_mut(program) {
            p.uniforms.insert(name.clone(), value);
        }
    }

    fn bind_texture_2d(&self, unit: u32, texture: Option<u32>) {
        self.state.borrow_mut().textures.push((unit, texture));
    }
}
