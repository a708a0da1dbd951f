//! Meadow builder and render-loop driver.
//!
//! [`Meadow`] configures the scene with method chaining, then `.run()`
//! validates the grid, builds the static geometry, kicks off the noise
//! asset load, and hands control to the windowing event loop. One frame =
//! one clock tick: advance time, refresh per-frame uniforms from the
//! immutable parameter structs, render.

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;

use glam::Vec2;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::displace::GrassParams;
use crate::error::{GpuError, MeadowError, NoiseError};
use crate::gpu::GpuState;
use crate::grid::GridSpec;
use crate::mesh::Mesh;
use crate::noise::TextureField;
use crate::particles::ParticleSet;
use crate::time::FrameClock;

/// Side-face subdivision of the blade box; enough rows for the wind curve
/// to read as a bend rather than a shear.
const BLADE_HEIGHT_SEGMENTS: u32 = 4;
/// Extent of the ground plane.
const GROUND_EXTENT: f32 = 20.0;

/// Where the noise field comes from.
#[derive(Debug, Clone)]
pub enum NoiseSource {
    /// Decode an image file (red channel) on a background thread.
    File(PathBuf),
    /// Generate a tileable hash-noise field up front.
    Generated {
        /// Texture edge length in texels.
        size: u32,
        /// Hash seed.
        seed: u32,
    },
}

/// A configured grass scene.
///
/// # Example
///
/// ```ignore
/// use sward::Meadow;
///
/// Meadow::new()
///     .with_grid(175, 175)
///     .with_noise_texture("assets/noise.png")
///     .run()?;
/// ```
pub struct Meadow {
    rows: u32,
    columns: u32,
    params: GrassParams,
    blade_size: f32,
    moved: Vec2,
    particle_count: u32,
    noise: NoiseSource,
    title: String,
}

impl Meadow {
    /// Create a meadow with the default scene: a 175x175 blade grid over a
    /// 30x30 area, 100 particles, generated noise.
    pub fn new() -> Self {
        Self {
            rows: 175,
            columns: 175,
            params: GrassParams::default(),
            blade_size: 0.1,
            moved: Vec2::ZERO,
            particle_count: 100,
            noise: NoiseSource::Generated { size: 256, seed: 7 },
            title: "sward".to_string(),
        }
    }

    /// Set the blade grid dimensions. Validated when the meadow runs.
    pub fn with_grid(mut self, rows: u32, columns: u32) -> Self {
        self.rows = rows;
        self.columns = columns;
        self
    }

    /// Set the world-space footprint of the field.
    pub fn with_area(mut self, width: f32, depth: f32) -> Self {
        self.params.area = Vec2::new(width, depth);
        self
    }

    /// Replace the displacement parameters wholesale.
    pub fn with_params(mut self, params: GrassParams) -> Self {
        self.params = params;
        self
    }

    /// Set the blade footprint; height follows as `size * height_ratio`.
    pub fn with_blade(mut self, size: f32, height_ratio: f32) -> Self {
        self.blade_size = size;
        self.params.height = size * height_ratio;
        self
    }

    /// Set the camera-relative pan offset fed to the plane noise.
    pub fn with_pan(mut self, moved: Vec2) -> Self {
        self.moved = moved;
        self
    }

    /// Set the number of ambient particles.
    pub fn with_particle_count(mut self, count: u32) -> Self {
        self.particle_count = count;
        self
    }

    /// Load the noise field from an image file.
    pub fn with_noise_texture<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.noise = NoiseSource::File(path.into());
        self
    }

    /// Generate the noise field procedurally.
    pub fn with_generated_noise(mut self, size: u32, seed: u32) -> Self {
        self.noise = NoiseSource::Generated { size, seed };
        self
    }

    /// Set the window title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Run the meadow. Blocks until the window is closed.
    pub fn run(self) -> Result<(), MeadowError> {
        let grid = GridSpec::new(self.rows, self.columns, self.params.area)?;

        let blade = Mesh::blade(
            self.blade_size,
            self.params.height,
            self.blade_size,
            BLADE_HEIGHT_SEGMENTS,
        );
        let ground = Mesh::ground_plane(GROUND_EXTENT, GROUND_EXTENT);
        let particles = ParticleSet::new(self.particle_count, self.params.area);

        let noise = match self.noise {
            NoiseSource::Generated { size, seed } => {
                NoiseState::Ready(TextureField::generated(size, seed))
            }
            NoiseSource::File(path) => {
                // Decode off-thread; frames before it lands render the
                // resource-independent objects only.
                let (tx, rx) = mpsc::channel();
                thread::spawn(move || {
                    let _ = tx.send(TextureField::from_image(&path));
                });
                NoiseState::Loading(rx)
            }
        };

        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = App {
            window: None,
            gpu: None,
            clock: FrameClock::new(),
            params: self.params,
            moved: self.moved,
            blade,
            ground,
            offsets: grid.offset_buffer(),
            instance_count: grid.count(),
            particles,
            noise,
            title: self.title,
            mouse_pressed: false,
            last_mouse_pos: None,
            init_error: None,
        };
        event_loop.run_app(&mut app)?;

        match app.init_error {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }
}

impl Default for Meadow {
    fn default() -> Self {
        Self::new()
    }
}

enum NoiseState {
    /// Waiting on the loader thread.
    Loading(Receiver<Result<TextureField, NoiseError>>),
    /// Decoded, not yet uploaded.
    Ready(TextureField),
    /// Uploaded to the GPU.
    Installed,
}

struct App {
    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
    clock: FrameClock,
    params: GrassParams,
    moved: Vec2,
    blade: Mesh,
    ground: Mesh,
    offsets: Vec<f32>,
    instance_count: u32,
    particles: ParticleSet,
    noise: NoiseState,
    title: String,
    mouse_pressed: bool,
    last_mouse_pos: Option<(f64, f64)>,
    init_error: Option<GpuError>,
}

impl App {
    /// Move the noise field onto the GPU as soon as it is available.
    fn poll_noise(&mut self) {
        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };
        if gpu.has_noise_field() {
            return;
        }

        match std::mem::replace(&mut self.noise, NoiseState::Installed) {
            NoiseState::Ready(field) => gpu.set_noise_field(&field),
            NoiseState::Loading(rx) => match rx.try_recv() {
                Ok(Ok(field)) => gpu.set_noise_field(&field),
                Ok(Err(e)) => {
                    // Not fatal: fall back to a generated field.
                    eprintln!("Noise texture failed to load ({}), generating one instead", e);
                    gpu.set_noise_field(&TextureField::generated(256, 7));
                }
                Err(TryRecvError::Empty) => {
                    self.noise = NoiseState::Loading(rx);
                }
                Err(TryRecvError::Disconnected) => {
                    eprintln!("Noise loader thread died, generating a field instead");
                    gpu.set_noise_field(&TextureField::generated(256, 7));
                }
            },
            NoiseState::Installed => {}
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            let window_attrs = Window::default_attributes()
                .with_title(&self.title)
                .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));

            let window = Arc::new(event_loop.create_window(window_attrs).unwrap());
            self.window = Some(window.clone());

            match pollster::block_on(GpuState::new(
                window,
                &self.blade,
                &self.ground,
                &self.offsets,
                self.instance_count,
                &self.particles,
            )) {
                Ok(gpu) => self.gpu = Some(gpu),
                Err(e) => {
                    self.init_error = Some(e);
                    event_loop.exit();
                }
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(physical_size);
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if button == MouseButton::Left {
                    self.mouse_pressed = state == ElementState::Pressed;
                    if !self.mouse_pressed {
                        self.last_mouse_pos = None;
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                if self.mouse_pressed {
                    if let Some((last_x, last_y)) = self.last_mouse_pos {
                        let dx = (position.x - last_x) as f32;
                        let dy = (position.y - last_y) as f32;
                        if let Some(gpu) = &mut self.gpu {
                            gpu.camera.orbit(dx, dy);
                        }
                    }
                    self.last_mouse_pos = Some((position.x, position.y));
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.1,
                };
                if let Some(gpu) = &mut self.gpu {
                    gpu.camera.zoom(scroll);
                }
            }
            WindowEvent::RedrawRequested => {
                self.poll_noise();

                if let Some(gpu) = &mut self.gpu {
                    let (time, _delta) = self.clock.tick();
                    match gpu.render(time, &self.params, self.moved) {
                        Ok(_) => {}
                        Err(wgpu::SurfaceError::Lost) => gpu.resize(winit::dpi::PhysicalSize {
                            width: gpu.config.width,
                            height: gpu.config.height,
                        }),
                        Err(wgpu::SurfaceError::OutOfMemory) => event_loop.exit(),
                        Err(e) => eprintln!("Render error: {:?}", e),
                    }
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults_match_scene() {
        let meadow = Meadow::new();
        assert_eq!(meadow.rows, 175);
        assert_eq!(meadow.columns, 175);
        assert_eq!(meadow.params.area, Vec2::splat(30.0));
        assert_eq!(meadow.particle_count, 100);
        assert_eq!(meadow.params.height, 0.2);
    }

    #[test]
    fn test_with_blade_sets_height() {
        let meadow = Meadow::new().with_blade(0.2, 3.0);
        assert_eq!(meadow.blade_size, 0.2);
        assert!((meadow.params.height - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_invalid_grid_fails_fast() {
        // The grid is validated before any window or device exists.
        let err = GridSpec::new(0, 175, Vec2::splat(30.0)).unwrap_err();
        let meadow_err: MeadowError = err.into();
        assert!(matches!(meadow_err, MeadowError::Grid(_)));
    }
}
