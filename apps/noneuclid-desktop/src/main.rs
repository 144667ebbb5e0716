use anyhow::Result;
use clap::Parser;
use egui::Context as EguiContext;
use noneuclid_common::Pose;
use noneuclid_input::{Action, MoveKey, MoveKeys};
use noneuclid_kernel::{Flight, FlightConfig, RAW_MOUSE_SENSITIVITY};
use noneuclid_render::RenderView;
use noneuclid_render_wgpu::{GpuContext, WgpuRenderer};
use noneuclid_tools::PoseInspector;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{CursorGrabMode, Fullscreen, Window, WindowId};

const TITLE: &str = "Non-Euclidean Raytracing";

#[derive(Parser)]
#[command(name = "noneuclid-desktop", about = "Fly through a 3-sphere glued to a cylinder")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Open a 1280×720 window instead of going fullscreen
    #[arg(long)]
    windowed: bool,

    /// Radians per unit of pointer motion (default: 4 / window height)
    #[arg(long, conflicts_with = "raw_mouse")]
    mouse_sensitivity: Option<f32>,

    /// Use the fixed sensitivity for raw device counts
    #[arg(long)]
    raw_mouse: bool,

    /// Movement speed in units per second
    #[arg(long, default_value = "10")]
    move_speed: f32,

    /// Simulation tick in milliseconds
    #[arg(long, default_value = "20")]
    tick_ms: u64,
}

/// Where the look sensitivity comes from.
#[derive(Debug, Clone, Copy)]
enum Sensitivity {
    Fixed(f32),
    WindowHeight,
}

impl Sensitivity {
    fn resolve(self, height: u32) -> f32 {
        match self {
            Sensitivity::Fixed(value) => value,
            Sensitivity::WindowHeight => FlightConfig::sensitivity_for_height(height),
        }
    }
}

/// Application state.
struct AppState {
    flight: Flight,
    keys: MoveKeys,
    sensitivity: Sensitivity,
    show_hud: bool,
    next_tick: Instant,
}

impl AppState {
    fn new(cli: &Cli) -> Result<Self> {
        let sensitivity = match (cli.mouse_sensitivity, cli.raw_mouse) {
            (Some(value), _) => Sensitivity::Fixed(value),
            (None, true) => Sensitivity::Fixed(RAW_MOUSE_SENSITIVITY),
            (None, false) => Sensitivity::WindowHeight,
        };
        let config = FlightConfig {
            mouse_sensitivity: sensitivity.resolve(720),
            move_speed: cli.move_speed,
            tick_interval: Duration::from_millis(cli.tick_ms),
            ..FlightConfig::default()
        };
        Ok(Self {
            flight: Flight::new(config)?,
            keys: MoveKeys::default(),
            sensitivity,
            show_hud: false,
            next_tick: Instant::now(),
        })
    }

    fn update_sensitivity(&mut self, height: u32) {
        let value = self.sensitivity.resolve(height);
        if let Err(e) = self.flight.set_mouse_sensitivity(value) {
            tracing::warn!("keeping previous mouse sensitivity: {e}");
        }
    }

    /// Apply held keys once per elapsed tick. Returns whether a tick ran.
    fn run_due_tick(&mut self, now: Instant) -> bool {
        if now < self.next_tick {
            return false;
        }
        let interval = self.flight.config().tick_interval;
        self.flight.tick(self.keys.intent());
        self.next_tick += interval;
        // Drop ticks that were missed while the loop was stalled.
        if self.next_tick <= now {
            self.next_tick = now + interval;
        }
        true
    }

    fn handle_key(&mut self, key: KeyCode, pressed: bool, repeat: bool) -> Action {
        match key {
            KeyCode::Escape if pressed => return Action::Quit,
            KeyCode::F1 if pressed && !repeat => self.show_hud = !self.show_hud,
            KeyCode::KeyW => self.keys.set(MoveKey::Forward, pressed),
            KeyCode::KeyS => self.keys.set(MoveKey::Backward, pressed),
            KeyCode::KeyA => self.keys.set(MoveKey::Left, pressed),
            KeyCode::KeyD => self.keys.set(MoveKey::Right, pressed),
            _ => {}
        }
        Action::Noop
    }

    fn draw_hud(&self, ctx: &EguiContext) {
        if !self.show_hud {
            return;
        }
        let pose = self.flight.pose();
        let summary = PoseInspector::summary(pose);
        let config = self.flight.config();

        egui::Window::new("Camera")
            .default_width(320.0)
            .show(ctx, |ui| {
                ui.label(format!("Sheet: {}", summary.sheet));
                ui.label(format!("Ticks: {}", self.flight.ticks()));
                ui.label(format!(
                    "Speed: {} units/s  Sensitivity: {:.5}",
                    config.move_speed, config.mouse_sensitivity
                ));
                ui.separator();
                for (name, v) in [
                    ("right", pose.right),
                    ("up", pose.up),
                    ("forward", pose.forward),
                    ("position", pose.position),
                ] {
                    ui.monospace(format!(
                        "{name:<8} {:+.4} {:+.4} {:+.4} {:+.4}",
                        v.x, v.y, v.z, v.w
                    ));
                }
                ui.separator();
                let r = &summary.residuals;
                ui.monospace(format!("length error  {:.2e}", r.max_length_error));
                ui.monospace(format!("max dot       {:.2e}", r.max_dot()));
                ui.monospace(format!("forward·pos   {:.2e}", r.forward_position));
                ui.separator();
                ui.small("F1: Toggle HUD | Mouse: Look | WASD: Move | Esc: Quit");
            });
    }
}

struct GpuApp {
    state: AppState,
    windowed: bool,
    window: Option<Arc<Window>>,
    gpu: Option<GpuContext>,
    renderer: Option<WgpuRenderer>,
    egui_ctx: EguiContext,
    egui_winit: Option<egui_winit::State>,
    egui_renderer: Option<egui_wgpu::Renderer>,
    error: Option<anyhow::Error>,
}

impl GpuApp {
    fn new(state: AppState, windowed: bool) -> Self {
        Self {
            state,
            windowed,
            window: None,
            gpu: None,
            renderer: None,
            egui_ctx: EguiContext::default(),
            egui_winit: None,
            egui_renderer: None,
            error: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let mut attrs = Window::default_attributes().with_title(TITLE);
        attrs = if self.windowed {
            attrs.with_inner_size(PhysicalSize::new(1280u32, 720))
        } else {
            attrs.with_fullscreen(Some(Fullscreen::Borderless(None)))
        };
        let window = Arc::new(event_loop.create_window(attrs)?);

        if let Err(e) = window
            .set_cursor_grab(CursorGrabMode::Locked)
            .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined))
        {
            tracing::warn!("could not grab the cursor: {e}");
        }
        window.set_cursor_visible(false);

        let size = window.inner_size();
        let gpu = GpuContext::new(window.clone(), size.width, size.height)?;
        let renderer = WgpuRenderer::new(&gpu.device, gpu.format());

        let egui_winit = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&gpu.device, gpu.format(), None, 1, false);

        self.state.update_sensitivity(gpu.config.height);
        self.state.next_tick = Instant::now() + self.state.flight.config().tick_interval;

        self.window = Some(window);
        self.gpu = Some(gpu);
        self.renderer = Some(renderer);
        self.egui_winit = Some(egui_winit);
        self.egui_renderer = Some(egui_renderer);
        Ok(())
    }

    fn apply(&mut self, event_loop: &ActiveEventLoop, action: Action) {
        match action {
            Action::Quit => event_loop.exit(),
            Action::Look { dx, dy } => self.state.flight.look(dx, dy),
            Action::Noop => {}
        }
    }

    fn redraw(&mut self) {
        let (Some(window), Some(gpu), Some(renderer), Some(egui_winit), Some(egui_renderer)) = (
            &self.window,
            &self.gpu,
            &self.renderer,
            &mut self.egui_winit,
            &mut self.egui_renderer,
        ) else {
            return;
        };

        let output = match gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.reconfigure();
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let (width, height) = gpu.size();
        let pose: &Pose = self.state.flight.pose();
        renderer.render(
            &gpu.device,
            &gpu.queue,
            &view,
            pose,
            &RenderView::for_viewport(width, height),
        );

        let raw_input = egui_winit.take_egui_input(window);
        let state = &self.state;
        let full_output = self.egui_ctx.run(raw_input, |ctx| state.draw_hud(ctx));
        egui_winit.handle_platform_output(window, full_output.platform_output);

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [width, height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            egui_renderer.update_texture(&gpu.device, &gpu.queue, *id, image_delta);
        }
        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("egui_encoder"),
            });
        egui_renderer.update_buffers(
            &gpu.device,
            &gpu.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            egui_renderer.render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        gpu.queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            egui_renderer.free_texture(id);
        }

        output.present();
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init(event_loop) {
            tracing::error!("initialization failed: {e:#}");
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
        if let (Some(egui_winit), Some(window)) = (&mut self.egui_winit, &self.window) {
            let response = egui_winit.on_window_event(window, &event);
            if self.state.show_hud && response.consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => self.apply(event_loop, Action::Quit),
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(new_size.width, new_size.height);
                    self.state.update_sensitivity(gpu.config.height);
                }
            }
            WindowEvent::Focused(false) => self.state.keys.release_all(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: key_state,
                        repeat,
                        ..
                    },
                ..
            } => {
                let action = self
                    .state
                    .handle_key(key, key_state == ElementState::Pressed, repeat);
                self.apply(event_loop, action);
            }
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.apply(event_loop, Action::pointer_motion(delta.0, delta.1));
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.run_due_tick(Instant::now()) {
            if let Some(window) = &self.window {
                window.request_redraw();
            }
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(self.state.next_tick));
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("noneuclid-desktop starting");

    let state = AppState::new(&cli)?;
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::WaitUntil(Instant::now()));

    let mut app = GpuApp::new(state, cli.windowed);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("noneuclid-desktop").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn default_flags() {
        let state = AppState::new(&cli(&[])).unwrap();
        let config = state.flight.config();
        assert_eq!(config.move_speed, 10.0);
        assert_eq!(config.tick_interval, Duration::from_millis(20));
        assert!(matches!(state.sensitivity, Sensitivity::WindowHeight));
    }

    #[test]
    fn raw_mouse_uses_fixed_sensitivity() {
        let mut state = AppState::new(&cli(&["--raw-mouse"])).unwrap();
        state.update_sensitivity(1080);
        assert_eq!(state.flight.config().mouse_sensitivity, RAW_MOUSE_SENSITIVITY);
    }

    #[test]
    fn window_height_drives_sensitivity() {
        let mut state = AppState::new(&cli(&[])).unwrap();
        state.update_sensitivity(800);
        assert_eq!(state.flight.config().mouse_sensitivity, 0.005);
    }

    #[test]
    fn zero_tick_is_rejected() {
        assert!(AppState::new(&cli(&["--tick-ms", "0"])).is_err());
    }

    #[test]
    fn conflicting_sensitivity_flags() {
        let parsed = Cli::try_parse_from([
            "noneuclid-desktop",
            "--raw-mouse",
            "--mouse-sensitivity",
            "0.01",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn escape_quits_and_wasd_moves() {
        let mut state = AppState::new(&cli(&[])).unwrap();
        assert!(state.handle_key(KeyCode::Escape, true, false).is_quit());
        assert!(!state.handle_key(KeyCode::Escape, false, false).is_quit());
        state.handle_key(KeyCode::KeyW, true, false);
        assert_eq!(state.keys.intent(), Vec2::new(0.0, -1.0));
        state.handle_key(KeyCode::KeyW, false, false);
        assert_eq!(state.keys.intent(), Vec2::ZERO);
    }

    #[test]
    fn f1_toggles_hud_once_per_press() {
        let mut state = AppState::new(&cli(&[])).unwrap();
        state.handle_key(KeyCode::F1, true, false);
        state.handle_key(KeyCode::F1, true, true);
        assert!(state.show_hud);
        state.handle_key(KeyCode::F1, true, false);
        assert!(!state.show_hud);
    }

    #[test]
    fn one_tick_per_interval() {
        let mut state = AppState::new(&cli(&[])).unwrap();
        let start = Instant::now();
        state.next_tick = start;
        state.keys.set(MoveKey::Forward, true);
        assert!(state.run_due_tick(start));
        assert!(!state.run_due_tick(start));
        assert_eq!(state.flight.ticks(), 1);
        assert!(state.run_due_tick(start + Duration::from_millis(20)));
        assert_eq!(state.flight.ticks(), 2);
        // A long stall runs one tick, not a burst.
        assert!(state.run_due_tick(start + Duration::from_secs(1)));
        assert!(!state.run_due_tick(start + Duration::from_secs(1)));
        assert_eq!(state.flight.ticks(), 3);
    }

}
