use clap::{Parser, Subcommand};
use glam::{Mat4, Vec3};
use serde::Serialize;
use tracing_subscriber::EnvFilter;
use vantage_camera::{Camera, CameraSettings, Movement};
use vantage_input::{Action, InputBindings};

#[derive(Parser)]
#[command(name = "vantage-cli", about = "CLI tool for vantage camera operations")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Simulate a fixed input script against a camera and print its state
    Fly {
        /// Starting position as x,y,z
        #[arg(long, default_value = "0,0,3", value_parser = parse_vec3, allow_hyphen_values = true)]
        from: Vec3,
        /// Look-at target as x,y,z (overrides --yaw/--pitch)
        #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true)]
        target: Option<Vec3>,
        /// Initial yaw in degrees
        #[arg(long, default_value_t = -90.0, allow_negative_numbers = true)]
        yaw: f32,
        /// Initial pitch in degrees
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        pitch: f32,
        /// Movement flags held every step, e.g. forward,right
        #[arg(short, long, default_value = "idle")]
        moves: String,
        /// Number of frames to simulate
        #[arg(short, long, default_value = "60")]
        steps: u32,
        /// Seconds per frame
        #[arg(long, default_value = "0.016")]
        dt: f32,
        /// Cursor travel per frame in pixels as dx,dy (screen space, y down)
        #[arg(long, default_value = "0,0", value_parser = parse_vec2, allow_hyphen_values = true)]
        cursor: (f32, f32),
        /// Scroll delta applied once per frame
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        zoom: f32,
        /// Viewport aspect ratio for the projection
        #[arg(long, default_value = "1.7777778")]
        aspect: f32,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the default camera settings as YAML
    Config,
}

/// Camera state after a simulated flight.
#[derive(Serialize)]
struct FlightReport {
    steps: u32,
    position: Vec3,
    yaw: f32,
    pitch: f32,
    fov: f32,
    forward: Vec3,
    right: Vec3,
    up: Vec3,
    view: Mat4,
    projection: Mat4,
}

fn parse_floats<const N: usize>(s: &str) -> Result<[f32; N], String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != N {
        return Err(format!("expected {N} comma-separated numbers, got `{s}`"));
    }
    let mut out = [0.0; N];
    for (slot, part) in out.iter_mut().zip(parts) {
        *slot = part
            .parse()
            .map_err(|_| format!("`{part}` is not a number"))?;
    }
    Ok(out)
}

fn parse_vec3(s: &str) -> Result<Vec3, String> {
    parse_floats::<3>(s).map(Vec3::from_array)
}

fn parse_vec2(s: &str) -> Result<(f32, f32), String> {
    parse_floats::<2>(s).map(|[x, y]| (x, y))
}

struct Flight {
    camera: Camera,
    movement: Movement,
    steps: u32,
    dt: f32,
    cursor: (f32, f32),
    zoom: f32,
}

impl Flight {
    /// Run the script through the same binding path the desktop host uses.
    fn run(mut self, aspect: f32) -> FlightReport {
        const WINDOW: u32 = 0;
        let mut bindings = InputBindings::new();
        bindings.attach(WINDOW, &self.camera);

        let (mut x, mut y) = (0.0_f64, 0.0_f64);
        bindings.cursor_moved(WINDOW, &mut self.camera, x, y);
        for _ in 0..self.steps {
            x += f64::from(self.cursor.0);
            y += f64::from(self.cursor.1);
            bindings.cursor_moved(WINDOW, &mut self.camera, x, y);
            if self.zoom != 0.0 {
                bindings.scrolled(WINDOW, &mut self.camera, 0.0, f64::from(self.zoom));
            }
            Action::Move(self.movement).apply(&mut self.camera, self.dt);
        }
        bindings.detach(WINDOW);

        let cam = &self.camera;
        FlightReport {
            steps: self.steps,
            position: cam.position(),
            yaw: cam.yaw(),
            pitch: cam.pitch(),
            fov: cam.fov(),
            forward: cam.forward(),
            right: cam.right(),
            up: cam.up(),
            view: cam.view_matrix(),
            projection: cam.projection_matrix(aspect, 0.1, 100.0),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("vantage-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", vantage_common::crate_info());
            println!("camera: {}", vantage_camera::crate_info());
            println!("shader: {}", vantage_shader::crate_info());
            println!("input: {}", vantage_input::crate_info());
        }
        Commands::Fly {
            from,
            target,
            yaw,
            pitch,
            moves,
            steps,
            dt,
            cursor,
            zoom,
            aspect,
            json,
        } => {
            let movement = Movement::parse_list(&moves)
                .map_err(|name| anyhow::anyhow!("unknown movement flag `{name}`"))?;
            let camera = match target {
                Some(target) => Camera::looking_at(from, target, Vec3::Y)?,
                None => Camera::new(from, yaw, pitch, Vec3::Y),
            };
            tracing::debug!(camera = %camera.id(), ?movement, steps, "starting flight");

            let report = Flight {
                camera,
                movement,
                steps,
                dt,
                cursor,
                zoom,
            }
            .run(aspect);

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                let p = report.position;
                let f = report.forward;
                println!("Flight: {} steps of {dt}s, moves={moves}", report.steps);
                println!("Position: ({:.3}, {:.3}, {:.3})", p.x, p.y, p.z);
                println!(
                    "Orientation: yaw={:.2} pitch={:.2} fov={:.1}",
                    report.yaw, report.pitch, report.fov
                );
                println!("Forward: ({:.3}, {:.3}, {:.3})", f.x, f.y, f.z);
                println!("View:\n{}", format_matrix(&report.view));
                println!("Projection:\n{}", format_matrix(&report.projection));
            }
        }
        Commands::Config => {
            print!("{}", serde_yaml::to_string(&CameraSettings::default())?);
        }
    }

    Ok(())
}

/// Row-major text rendering of a column-major matrix.
fn format_matrix(m: &Mat4) -> String {
    (0..4)
        .map(|r| {
            let row = m.row(r);
            format!(
                "  [{:>9.4} {:>9.4} {:>9.4} {:>9.4}]",
                row.x, row.y, row.z, row.w
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
