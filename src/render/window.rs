//! Live window renderer.
//!
//! winit normally owns the main loop. Here the simulation owns it instead:
//! every `draw_frame` pumps the event loop for one tick interval, so the
//! driver stays a plain synchronous loop. Each run gets its own window, like
//! a figure per material; closing it (or pressing Escape) ends the run.

use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, error, info};
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{Key, NamedKey},
    platform::pump_events::{EventLoopExtPumpEvents, PumpStatus},
    window::{Window, WindowId},
};

use crate::error::RenderError;
use crate::results::BarChart;

use super::gpu::GpuState;
use super::scene::Scene;
use super::{Frame, FrameControl, Renderer};

/// Window renderer settings.
#[derive(Debug, Clone)]
pub struct WindowOptions {
    /// Wall-clock time per frame.
    pub tick_interval: Duration,
    /// How long to keep a finished run (or the chart) on screen.
    /// `None` waits until the window is closed.
    pub linger: Option<Duration>,
    pub frame_size: LogicalSize<u32>,
    pub chart_size: LogicalSize<u32>,
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(50),
            linger: None,
            frame_size: LogicalSize::new(1200, 900),
            chart_size: LogicalSize::new(1200, 800),
        }
    }
}

/// Window state driven by the pumped event loop.
#[derive(Default)]
struct Viewer {
    window: Option<Arc<Window>>,
    gpu_state: Option<GpuState>,
    /// Open a window on the next pump if none is open.
    wants_window: bool,
    size: LogicalSize<u32>,
    scene: Option<Scene>,
    close_requested: bool,
    error: Option<RenderError>,
}

impl Viewer {
    fn ensure_window(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() || !self.wants_window || self.error.is_some() {
            return;
        }

        let title = self
            .scene
            .as_ref()
            .map(|s| s.title.clone())
            .unwrap_or_else(|| "gamma-shield".to_string());
        let window_attrs = Window::default_attributes()
            .with_title(title)
            .with_inner_size(self.size);

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                self.error = Some(e.into());
                return;
            }
        };

        match pollster::block_on(GpuState::new(window.clone())) {
            Ok(gpu_state) => {
                debug!("Opened window {:?}", window.id());
                self.gpu_state = Some(gpu_state);
                self.close_requested = false;
                window.request_redraw();
                self.window = Some(window);
            }
            Err(e) => self.error = Some(e.into()),
        }
    }

    fn close_window(&mut self) {
        // Surface must go before its window.
        self.gpu_state = None;
        self.window = None;
        self.wants_window = false;
    }

    fn show(&mut self, scene: Scene) {
        if let Some(window) = &self.window {
            if self.scene.as_ref().map(|s| &s.title) != Some(&scene.title) {
                window.set_title(&scene.title);
            }
            window.request_redraw();
        }
        self.scene = Some(scene);
    }

    fn redraw(&mut self) {
        let (Some(gpu_state), Some(scene)) = (&mut self.gpu_state, &self.scene) else {
            return;
        };
        match gpu_state.render(scene) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => gpu_state.reconfigure(),
            Err(wgpu::SurfaceError::OutOfMemory) => {
                self.error = Some(wgpu::SurfaceError::OutOfMemory.into());
            }
            Err(e) => error!("Render error: {:?}", e),
        }
    }
}

impl ApplicationHandler for Viewer {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        self.ensure_window(event_loop);
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        self.ensure_window(event_loop);
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        if self.window.as_ref().map(|w| w.id()) != Some(id) {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                self.close_requested = true;
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed
                    && event.logical_key == Key::Named(NamedKey::Escape)
                {
                    self.close_requested = true;
                }
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state.resize(physical_size);
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }
    }
}

/// Draws each run in its own window with wgpu.
pub struct WindowRenderer {
    event_loop: EventLoop<()>,
    viewer: Viewer,
    options: WindowOptions,
    /// Set once the current run's end marker has been added.
    ended: bool,
}

impl WindowRenderer {
    /// Create the event loop. Must be called on the main thread, once.
    pub fn new(options: WindowOptions) -> Result<Self, RenderError> {
        let event_loop = EventLoop::new()?;
        Ok(Self {
            event_loop,
            viewer: Viewer::default(),
            options,
            ended: false,
        })
    }

    /// Pump events until `deadline`, or until the window is closed.
    ///
    /// With no deadline, blocks until the window is closed.
    fn pump_until(&mut self, deadline: Option<Instant>) -> Result<(), RenderError> {
        loop {
            let timeout = deadline.map(|d| d.saturating_duration_since(Instant::now()));
            let status = self
                .event_loop
                .pump_app_events(timeout, &mut self.viewer);

            if let Some(e) = self.viewer.error.take() {
                return Err(e);
            }
            if let PumpStatus::Exit(code) = status {
                debug!("Event loop exited with code {}", code);
                self.viewer.close_requested = true;
            }
            if self.viewer.close_requested {
                return Ok(());
            }
            if deadline.is_some_and(|d| Instant::now() >= d) {
                return Ok(());
            }
        }
    }

    /// Keep the current window up per `linger`, then close it.
    fn hold(&mut self) -> Result<(), RenderError> {
        if self.viewer.window.is_some() && !self.viewer.close_requested {
            let deadline = self.options.linger.map(|d| Instant::now() + d);
            if deadline.is_none() {
                info!("Close the window (or press Escape) to continue");
            }
            self.pump_until(deadline)?;
        }
        self.viewer.close_window();
        // let the platform process the close
        self.pump_until(Some(Instant::now()))?;
        self.viewer.close_requested = false;
        self.viewer.scene = None;
        Ok(())
    }
}

impl Renderer for WindowRenderer {
    fn draw_frame(&mut self, frame: &Frame<'_>) -> Result<FrameControl, RenderError> {
        if frame.tick <= 1 {
            self.ended = false;
        }
        self.viewer.wants_window = true;
        self.viewer.size = self.options.frame_size;
        self.viewer.show(Scene::from_frame(frame));

        let deadline = Instant::now() + self.options.tick_interval;
        self.pump_until(Some(deadline))?;

        if self.viewer.close_requested {
            Ok(FrameControl::Stop)
        } else {
            Ok(FrameControl::Continue)
        }
    }

    fn announce_end(&mut self, message: &str) -> Result<(), RenderError> {
        if self.ended {
            return Ok(());
        }
        self.ended = true;

        if let Some(mut scene) = self.viewer.scene.take() {
            scene.push_end_marker();
            scene.title = format!("{} - {}", scene.title, message);
            self.viewer.show(scene);
        }
        Ok(())
    }

    fn end_run(&mut self) -> Result<(), RenderError> {
        self.hold()
    }

    fn draw_bar_chart(&mut self, chart: &BarChart) -> Result<(), RenderError> {
        for line in chart.to_string().lines() {
            info!("{}", line);
        }

        self.viewer.wants_window = true;
        self.viewer.size = self.options.chart_size;
        let mut scene = Scene::from_bar_chart(chart);
        scene.title = format!("{} [{}]", chart.title, chart.labels.join(", "));
        self.viewer.show(scene);

        self.pump_until(Some(Instant::now() + self.options.tick_interval))?;
        self.hold()
    }
}
