mod config;
mod scene;

use anyhow::{Result, anyhow};
use clap::Parser;
use glam::Vec3;
use glow::HasContext;
use glutin::config::{ConfigTemplateBuilder, GlConfig};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, GlProfile, NotCurrentGlContext, PossiblyCurrentContext,
    Version,
};
use glutin::display::{GetGlDisplay, GlDisplay};
use glutin::surface::{GlSurface, Surface, SwapInterval, WindowSurface};
use glutin_winit::{DisplayBuilder, GlWindow};
use std::collections::HashSet;
use std::num::NonZeroU32;
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use vantage_camera::{Camera, Movement};
use vantage_input::{Action, InputBindings};
use vantage_shader::ShaderProgram;
use winit::application::ApplicationHandler;
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::raw_window_handle::HasWindowHandle;
use winit::window::{Window, WindowId};

use config::DesktopConfig;
use scene::Scene;

/// Pixels of trackpad scroll that count as one wheel notch.
const PIXELS_PER_LINE: f64 = 20.0;
const SPRINT_FACTOR: f32 = 3.0;

#[derive(Parser)]
#[command(name = "vantage-desktop", about = "Fly a camera through a textured cube scene")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML config file; defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,
}

/// Movement flags for the keys currently held.
fn movement_from_keys(keys: &HashSet<KeyCode>) -> Movement {
    [
        (KeyCode::KeyW, Movement::FORWARD),
        (KeyCode::KeyS, Movement::BACKWARD),
        (KeyCode::KeyA, Movement::LEFT),
        (KeyCode::KeyD, Movement::RIGHT),
        (KeyCode::Space, Movement::UP),
        (KeyCode::ControlLeft, Movement::DOWN),
    ]
    .into_iter()
    .filter(|(key, _)| keys.contains(key))
    .fold(Movement::IDLE, |acc, (_, flag)| acc | flag)
}

/// Frame time scaled for sprinting.
fn frame_step(keys: &HashSet<KeyCode>, dt: f32) -> f32 {
    if keys.contains(&KeyCode::ShiftLeft) {
        dt * SPRINT_FACTOR
    } else {
        dt
    }
}

/// Scroll delta in wheel notches.
fn scroll_lines(delta: MouseScrollDelta) -> (f64, f64) {
    match delta {
        MouseScrollDelta::LineDelta(x, y) => (f64::from(x), f64::from(y)),
        MouseScrollDelta::PixelDelta(PhysicalPosition { x, y }) => {
            (x / PIXELS_PER_LINE, y / PIXELS_PER_LINE)
        }
    }
}

/// Application state that does not depend on a GL context.
struct AppState {
    config: DesktopConfig,
    camera: Camera,
    bindings: InputBindings<WindowId>,
    keys_held: HashSet<KeyCode>,
    looking: bool,
    last_frame: Instant,
    aspect: f32,
}

impl AppState {
    fn new(config: DesktopConfig) -> Self {
        let camera = Camera::new(
            config.camera_position,
            config.camera_yaw,
            config.camera_pitch,
            Vec3::Y,
        )
        .with_settings(config.camera);
        let aspect = config.aspect();
        Self {
            config,
            camera,
            bindings: InputBindings::new(),
            keys_held: HashSet::new(),
            looking: false,
            last_frame: Instant::now(),
            aspect,
        }
    }

    fn update(&mut self, dt: f32) {
        let movement = movement_from_keys(&self.keys_held);
        Action::Move(movement).apply(&mut self.camera, frame_step(&self.keys_held, dt));
    }
}

/// Window, context and the GL objects that live on it.
///
/// Fields drop in order, so the window goes last.
struct GlState {
    gl: glow::Context,
    scene: Scene,
    program: ShaderProgram<glow::Context>,
    surface: Surface<WindowSurface>,
    context: PossiblyCurrentContext,
    window: Window,
}

impl GlState {
    fn new(event_loop: &ActiveEventLoop, config: &DesktopConfig) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title(config.title.clone())
            .with_inner_size(PhysicalSize::new(config.width, config.height));
        let template = ConfigTemplateBuilder::new().with_depth_size(24);
        let (window, gl_config) = DisplayBuilder::new()
            .with_window_attributes(Some(attrs))
            .build(event_loop, template, |configs| {
                configs
                    .max_by_key(|c| c.num_samples())
                    .expect("display offers at least one config")
            })
            .map_err(|e| anyhow!("create display: {e}"))?;
        let window = window.ok_or_else(|| anyhow!("display builder returned no window"))?;

        let raw_handle = window.window_handle()?.as_raw();
        let context_attrs = ContextAttributesBuilder::new()
            .with_profile(GlProfile::Core)
            .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
            .build(Some(raw_handle));
        let display = gl_config.display();
        // SAFETY: the raw handle belongs to `window`, which outlives the context.
        let not_current = unsafe { display.create_context(&gl_config, &context_attrs)? };

        let surface_attrs = window.build_surface_attributes(Default::default())?;
        // SAFETY: as above, the surface is dropped before the window.
        let surface = unsafe { display.create_window_surface(&gl_config, &surface_attrs)? };
        let context = not_current.make_current(&surface)?;
        if let Err(e) = surface.set_swap_interval(&context, SwapInterval::Wait(NonZeroU32::MIN)) {
            tracing::warn!("vsync unavailable: {e}");
        }

        // SAFETY: the context is current on this thread.
        let gl = unsafe {
            glow::Context::from_loader_function_cstr(|name| display.get_proc_address(name))
        };
        tracing::info!(
            version = ?gl.version(),
            samples = gl_config.num_samples(),
            "OpenGL context ready"
        );

        let program =
            ShaderProgram::from_files(&gl, &config.vertex_shader, &config.fragment_shader);
        if !program.is_valid() {
            tracing::warn!("shader program unusable; cubes will not render");
        }
        let scene = Scene::new(&gl)?;

        Ok(Self {
            gl,
            scene,
            program,
            surface,
            context,
            window,
        })
    }

    fn resize(&self, size: PhysicalSize<u32>) {
        let (Some(w), Some(h)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height)) else {
            return;
        };
        self.surface.resize(&self.context, w, h);
        // SAFETY: the context is current.
        unsafe { self.gl.viewport(0, 0, size.width as i32, size.height as i32) };
    }

    fn render(&self, state: &AppState) -> Result<()> {
        let [r, g, b, a] = state.config.clear_color;
        // SAFETY: the context is current.
        unsafe {
            self.gl.clear_color(r, g, b, a);
            self.gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        }
        self.scene.draw(
            &self.gl,
            &self.program,
            &state.camera,
            state.aspect,
            state.config.near,
            state.config.far,
        );
        self.surface.swap_buffers(&self.context)?;
        Ok(())
    }

    fn delete(self) {
        self.program.delete(&self.gl);
        self.scene.delete(&self.gl);
    }
}

struct DesktopApp {
    state: AppState,
    gl: Option<GlState>,
}

impl DesktopApp {
    fn new(config: DesktopConfig) -> Self {
        Self {
            state: AppState::new(config),
            gl: None,
        }
    }

    fn set_looking(&mut self, window_id: WindowId, looking: bool) {
        self.state.looking = looking;
        self.state.bindings.reset_cursor(window_id);
        if let Some(gl) = &self.gl {
            gl.window.set_cursor_visible(!looking);
        }
    }
}

impl ApplicationHandler for DesktopApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gl.is_some() {
            return;
        }
        match GlState::new(event_loop, &self.state.config) {
            Ok(gl) => {
                let size = gl.window.inner_size();
                self.state.aspect = size.width as f32 / size.height.max(1) as f32;
                self.state.bindings.attach(gl.window.id(), &self.state.camera);
                self.state.last_frame = Instant::now();
                self.gl = Some(gl);
            }
            Err(e) => {
                tracing::error!("failed to initialise OpenGL: {e:#}");
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                self.state.aspect = size.width as f32 / size.height.max(1) as f32;
                if let Some(gl) = &self.gl {
                    gl.resize(size);
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: key_state,
                        ..
                    },
                ..
            } => match (key, key_state) {
                (KeyCode::Escape, ElementState::Pressed) => event_loop.exit(),
                (_, ElementState::Pressed) => {
                    self.state.keys_held.insert(key);
                }
                (_, ElementState::Released) => {
                    self.state.keys_held.remove(&key);
                }
            },
            WindowEvent::MouseInput {
                button: MouseButton::Right,
                state: btn_state,
                ..
            } => self.set_looking(window_id, btn_state == ElementState::Pressed),
            WindowEvent::CursorMoved { position, .. } if self.state.looking => {
                self.state
                    .bindings
                    .cursor_moved(window_id, &mut self.state.camera, position.x, position.y);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let (dx, dy) = scroll_lines(delta);
                self.state
                    .bindings
                    .scrolled(window_id, &mut self.state.camera, dx, dy);
            }
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let dt = (now - self.state.last_frame).as_secs_f32().min(0.1);
                self.state.last_frame = now;
                self.state.update(dt);

                if let Some(gl) = &self.gl {
                    if let Err(e) = gl.render(&self.state) {
                        tracing::error!("frame failed: {e:#}");
                    }
                    gl.window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gl) = &self.gl {
            gl.window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gl) = self.gl.take() {
            self.state.bindings.detach(gl.window.id());
            gl.delete();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = match &cli.config {
        Some(path) => DesktopConfig::load(path)?,
        None => DesktopConfig::default(),
    };
    tracing::info!(title = %config.title, "vantage-desktop starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = DesktopApp::new(config);
    event_loop.run_app(&mut app)?;

    Ok(())
}
