use std::path::PathBuf;
use std::sync::mpsc::Receiver;
use std::time::Instant;

use clap::Parser;
use glam::Vec2;
use sphere_core::gpu::TileRenderer;
use sphere_core::{Camera, GalleryConfig, GalleryController, Scene, Viewport};
use winit::event::{ElementState, Event, KeyEvent, MouseButton, Touch, TouchPhase, WindowEvent};
use winit::event_loop::EventLoop;
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowBuilder};

mod images;

use images::ImageResult;

const MAX_FRAME_DT_SEC: f32 = 0.1;

/// Fibonacci-sphere image gallery.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Directory the gallery's image paths resolve against.
    #[arg(long, value_name = "DIR", default_value = "public")]
    images: PathBuf,
    /// Number of tiles on the sphere.
    #[arg(long, value_name = "N")]
    tiles: Option<usize>,
    /// Sphere radius in world units.
    #[arg(long, value_name = "R")]
    radius: Option<f32>,
    /// Use touch-device tuning (larger focus, ambient drift).
    #[arg(long)]
    touch: bool,
}

impl Args {
    fn gallery_config(&self) -> GalleryConfig {
        let mut config = GalleryConfig::for_device(self.touch);
        if let Some(n) = self.tiles {
            config.tile_count = n;
        }
        if let Some(r) = self.radius {
            config.radius = r;
        }
        config
    }
}

struct GpuState<'w> {
    window: &'w Window,
    surface: wgpu::Surface<'w>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    tiles: TileRenderer,
}

impl<'w> GpuState<'w> {
    async fn new(window: &'w Window) -> anyhow::Result<Self> {
        let size = window.inner_size();
        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(window)?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No GPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            desired_maximum_frame_latency: 2,
            view_formats: vec![],
        };
        surface.configure(&device, &config);
        let tiles = TileRenderer::new(&device, &queue, format, config.width, config.height);
        log::info!(
            "[gpu] {} {}x{} {:?}",
            adapter.get_info().name,
            config.width,
            config.height,
            format
        );

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            tiles,
        })
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.tiles
                .resize(&self.device, new_size.width, new_size.height);
        }
    }

    fn render(&mut self, scene: &Scene) -> Result<(), wgpu::SurfaceError> {
        let Some(camera) = scene.camera.as_ref() else {
            return Ok(());
        };
        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        self.tiles.render(
            &self.device,
            &self.queue,
            &view,
            camera,
            &scene.group,
            &scene.tiles,
        );
        frame.present();
        Ok(())
    }
}

/// Everything the event loop owns besides the GPU.
struct App {
    gallery: GalleryController,
    images: Receiver<ImageResult>,
    cursor: Vec2,
    started: Instant,
    last_frame: Instant,
    clock_sec: f64,
}

impl App {
    fn now_ms(&self) -> f64 {
        self.started.elapsed().as_secs_f64() * 1000.0
    }

    fn drain_images(&mut self, gpu: &mut GpuState) {
        while let Ok(result) = self.images.try_recv() {
            let img = match result.image {
                Ok(img) => img,
                Err(e) => {
                    log::warn!("[image] {}; keeping placeholder", e);
                    continue;
                }
            };
            for &tile in &result.tiles {
                self.gallery
                    .set_image_dimensions(tile, img.width, img.height);
                let Some(surface) = self.gallery.tiles().get(tile).map(|t| t.surface) else {
                    continue;
                };
                if let Err(e) = gpu.tiles.upload_rgba(
                    &gpu.device,
                    &gpu.queue,
                    surface,
                    img.width,
                    img.height,
                    &img.rgba,
                ) {
                    log::warn!("[image] {}", e);
                }
            }
            log::debug!(
                "[image] {} ({}x{}) -> {} tiles",
                img.url,
                img.width,
                img.height,
                result.tiles.len()
            );
        }
    }

    fn tick(&mut self) {
        let now = Instant::now();
        let dt_sec = (now - self.last_frame).as_secs_f32().min(MAX_FRAME_DT_SEC);
        self.last_frame = now;
        self.clock_sec += dt_sec as f64;
        self.gallery.frame(self.clock_sec, dt_sec);
    }

    fn on_touch(&mut self, touch: Touch) {
        let p = Vec2::new(touch.location.x as f32, touch.location.y as f32);
        let now_ms = self.now_ms();
        match touch.phase {
            TouchPhase::Started => self.gallery.touch_start(p, now_ms),
            TouchPhase::Moved => self.gallery.touch_move(p),
            TouchPhase::Cancelled => self.gallery.touch_cancel(),
            TouchPhase::Ended => {
                // Browsers follow a tap with a click; do the same here so an
                // outside tap closes the focus.
                if let Some(sphere_core::TouchOutcome::Tap(at)) = self.gallery.touch_end(now_ms) {
                    self.gallery.click(at);
                }
            }
        }
    }

    fn on_key(&mut self, event: &KeyEvent) {
        if event.state != ElementState::Pressed {
            return;
        }
        match &event.logical_key {
            Key::Named(NamedKey::Escape) => {
                self.gallery.close();
            }
            Key::Named(NamedKey::Space | NamedKey::Enter) => {
                self.gallery.start();
            }
            _ => {}
        }
    }
}

fn viewport_for(size: winit::dpi::PhysicalSize<u32>) -> Viewport {
    Viewport::fullscreen(size.width as f32, size.height as f32)
}

fn run(args: Args) -> anyhow::Result<()> {
    let config = args.gallery_config();
    log::info!(
        "[config] {} tiles, radius {}, touch={}, images from {}",
        config.tile_count,
        config.radius,
        config.touch_device,
        args.images.display()
    );

    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title("Tile Sphere (native)")
        .build(&event_loop)?;

    let mut gpu = pollster::block_on(GpuState::new(&window))?;
    let mut gallery = GalleryController::new(config, &mut gpu.tiles)?;
    let viewport = viewport_for(window.inner_size());
    gallery.resize(viewport);
    gallery.attach_camera(Camera::gallery(viewport.aspect().unwrap_or(1.0)));
    let images = images::spawn_decoders(&args.images, gallery.tiles().image_requests());

    let now = Instant::now();
    let mut app = App {
        gallery,
        images,
        cursor: Vec2::ZERO,
        started: now,
        last_frame: now,
        clock_sec: 0.0,
    };
    log::info!("press Space or Enter to start, Escape to close a focused tile");

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { event, .. } => match event {
            WindowEvent::CloseRequested => elwt.exit(),
            WindowEvent::Resized(size) => {
                gpu.resize(size);
                app.gallery.resize(viewport_for(size));
            }
            WindowEvent::CursorMoved { position, .. } => {
                app.cursor = Vec2::new(position.x as f32, position.y as f32);
                app.gallery.pointer_move(app.cursor);
            }
            WindowEvent::MouseInput {
                state: ElementState::Released,
                button: MouseButton::Left,
                ..
            } => app.gallery.click(app.cursor),
            WindowEvent::Touch(touch) => app.on_touch(touch),
            WindowEvent::KeyboardInput { event, .. } => app.on_key(&event),
            _ => {}
        },
        Event::AboutToWait => {
            app.drain_images(&mut gpu);
            app.tick();
            match gpu.render(app.gallery.scene()) {
                Ok(()) => gpu.window.request_redraw(),
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    gpu.resize(gpu.window.inner_size())
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("[gpu] out of memory");
                    elwt.exit()
                }
                Err(e) => log::warn!("[gpu] {:?}", e),
            }
        }
        _ => {}
    })?;
    Ok(())
}

fn main() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    if let Err(e) = run(Args::parse()) {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}
