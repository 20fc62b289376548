//! Aether particle toy
//!
//! Sized particles push each other apart, latch onto close neighbours and
//! bounce off the window borders.

mod gpu;

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use gpu::GpuState;
use particle_renderer::{tessellate, DrawList, RenderOptions};
use particle_simulation::{spawn, Accumulation, ParticleSimulation, Variant, Viewport};
use rand::rngs::StdRng;
use rand::SeedableRng;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

/// Frame cap: one simulation step per frame at 60 Hz
const FRAME_INTERVAL: Duration = Duration::from_nanos(1_000_000_000 / 60);

/// Particle counts the force laws were tuned for
const TUNED_COUNT: std::ops::RangeInclusive<usize> = 1..=100;

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum VariantArg {
    /// Aether avoidance with speed-scaled links and chaining pull
    Chained,
    /// Aether avoidance with fixed-distance links
    Avoidance,
    /// Plain particles attracted to each other
    Attraction,
    /// Plain particles drifting without forces
    Drift,
}

impl From<VariantArg> for Variant {
    fn from(arg: VariantArg) -> Self {
        match arg {
            VariantArg::Chained => Self::Chained,
            VariantArg::Avoidance => Self::Avoidance,
            VariantArg::Attraction => Self::Attraction,
            VariantArg::Drift => Self::Drift,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum AccumulationArg {
    /// Sum attraction over every other particle
    Sum,
    /// Keep only the last pair's attraction
    LastPair,
}

impl From<AccumulationArg> for Accumulation {
    fn from(arg: AccumulationArg) -> Self {
        match arg {
            AccumulationArg::Sum => Self::Sum,
            AccumulationArg::LastPair => Self::LastPair,
        }
    }
}

#[derive(Parser, Debug)]
#[command(version, about = "Interactive 2D particle toy")]
struct Args {
    /// Which force law and preset to run
    #[arg(short, long, value_enum, default_value_t = VariantArg::Chained)]
    variant: VariantArg,

    /// Override the preset particle count
    #[arg(short = 'n', long)]
    count: Option<usize>,

    /// Seed for the initial layout
    #[arg(short, long)]
    seed: Option<u64>,

    /// How attraction contributions are combined
    #[arg(long, value_enum, default_value_t = AccumulationArg::Sum)]
    accumulation: AccumulationArg,

    #[arg(long, default_value_t = 800)]
    width: u32,

    #[arg(long, default_value_t = 800)]
    height: u32,

    /// Run this many steps without a window and log the result
    #[arg(long, value_name = "STEPS")]
    headless: Option<u64>,
}

fn build_simulation(args: &Args) -> anyhow::Result<ParticleSimulation> {
    let variant = Variant::from(args.variant);

    let mut params = variant.params();
    params.accumulation = args.accumulation.into();
    params.viewport = Viewport {
        width: args.width as f32,
        height: args.height as f32,
        ..params.viewport
    };

    let mut spawn_config = variant.spawn_config();
    if let Some(count) = args.count {
        spawn_config.count = count;
    }
    if !TUNED_COUNT.contains(&spawn_config.count) {
        log::warn!(
            "{} particles is outside the tuned range {:?}",
            spawn_config.count,
            TUNED_COUNT
        );
    }

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let particles = spawn(&spawn_config, &mut rng);

    ParticleSimulation::new(params, particles).context("invalid simulation parameters")
}

fn run_headless(mut simulation: ParticleSimulation, steps: u64) {
    log::info!("Running {} steps headless", steps);
    for _ in 0..steps {
        simulation.step();
        if simulation.tick() % 60 == 0 {
            log::debug!("{}", simulation.stats());
        }
    }
    log::info!("{}", simulation.stats());
}

struct App {
    simulation: ParticleSimulation,
    options: RenderOptions,
    window: Option<Arc<Window>>,
    gpu_state: Option<GpuState>,
    next_frame: Instant,
    error: Option<anyhow::Error>,
}

impl App {
    fn new(simulation: ParticleSimulation) -> Self {
        Self {
            simulation,
            options: RenderOptions::default(),
            window: None,
            gpu_state: None,
            next_frame: Instant::now(),
            error: None,
        }
    }

    fn init_window(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let viewport = self.simulation.params().viewport;
        let window_attributes = Window::default_attributes()
            .with_title("Aether")
            .with_inner_size(winit::dpi::LogicalSize::new(viewport.width, viewport.height));

        let window = Arc::new(
            event_loop
                .create_window(window_attributes)
                .context("failed to create window")?,
        );
        let gpu_state = pollster::block_on(GpuState::new(window.clone(), &viewport))?;

        self.window = Some(window);
        self.gpu_state = Some(gpu_state);
        Ok(())
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(window), Some(gpu_state)) = (&self.window, &mut self.gpu_state) else {
            return;
        };

        self.simulation.step();

        let list = DrawList::from_particles(
            self.simulation.particles(),
            &self.simulation.params().viewport,
            self.options,
        );
        let vertices = tessellate(&list);

        match gpu_state.render(&vertices) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu_state.resize(window.inner_size())
            }
            Err(wgpu::SurfaceError::OutOfMemory) => event_loop.exit(),
            Err(e) => log::warn!("Render error: {:?}", e),
        }

        if self.simulation.tick() % 60 == 0 {
            let stats = self.simulation.stats();
            window.set_title(&format!(
                "Aether - {} particles, {} linked",
                stats.particles, stats.linked
            ));
            log::debug!("{}", stats);
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init_window(event_loop) {
            self.error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => event_loop.exit(),

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key_code),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => match key_code {
                KeyCode::KeyH => {
                    self.options.toggle_vectors();
                    log::debug!("Vectors: {}", self.options.show_vectors);
                }
                KeyCode::KeyT => {
                    self.options.toggle_trails();
                    log::debug!("Trails: {}", self.options.show_trails);
                }
                _ => {}
            },

            WindowEvent::Resized(physical_size) => {
                if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state.resize(physical_size);
                }
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        if now >= self.next_frame {
            if let Some(window) = &self.window {
                window.request_redraw();
            }
            // No catch-up: a late frame just pushes the schedule back
            self.next_frame = (self.next_frame + FRAME_INTERVAL).max(now);
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(self.next_frame));
    }
}

fn main() -> anyhow::Result<()> {
    // Initialize logger (RUST_LOG=debug for verbose output)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let simulation = build_simulation(&args)?;

    if let Some(steps) = args.headless {
        run_headless(simulation, steps);
        return Ok(());
    }

    log::info!("Starting particle toy ({:?})...", args.variant);

    let event_loop = EventLoop::new().context("failed to create event loop")?;
    let mut app = App::new(simulation);
    event_loop.run_app(&mut app).context("event loop failed")?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
