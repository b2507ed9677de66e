//! The renderer collaborator.
//!
//! The simulation pushes state into a [`Renderer`] once per tick and never
//! reads anything back except a [`FrameControl`]. Three renderers ship with the
//! crate:
//!
//! - [`LogRenderer`] - headless, writes progress through the `log` facade
//! - [`ImageRenderer`] - headless, rasterises frames and the chart to PNG
//! - [`WindowRenderer`] - live window drawn with wgpu
//!
//! All of them go through [`scene`] to turn a frame or chart into colored
//! quads.

pub mod raster;
pub mod scene;

mod gpu;
mod shader;
mod window;

pub use raster::ImageRenderer;
pub use scene::{Quad, QuadShape, Scene};
pub use shader::QUAD_SHADER;
pub use window::{WindowOptions, WindowRenderer};

use glam::Vec2;
use log::{info, trace};

use crate::config::Canvas;
use crate::ensemble::Band;
use crate::error::RenderError;
use crate::particle::{Particle, StateColor, StateCounts};
use crate::results::BarChart;

/// Text of the end-of-run marker.
pub const END_MESSAGE: &str = "Simulation Ended";

/// Whether the simulation should keep ticking after a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameControl {
    Continue,
    /// The viewer went away (window closed); end the current run now.
    Stop,
}

/// Everything a renderer needs to draw one tick.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    /// e.g. `Gamma Ray Simulation - Lead`.
    pub title: &'a str,
    pub material: &'a str,
    pub tick: u32,
    pub canvas: Canvas,
    /// Static overlay: the material slab.
    pub band: Band,
    pub particles: &'a [Particle],
}

impl<'a> Frame<'a> {
    pub fn positions(&self) -> impl Iterator<Item = Vec2> + 'a {
        let particles: &'a [Particle] = self.particles;
        particles.iter().map(|p| p.position)
    }

    /// Parallel to [`Frame::positions`].
    pub fn colors(&self) -> impl Iterator<Item = StateColor> + 'a {
        let particles: &'a [Particle] = self.particles;
        particles.iter().map(|p| p.state.color())
    }

    pub fn counts(&self) -> StateCounts {
        self.particles.iter().collect()
    }
}

/// Sink for simulation output.
///
/// Calls arrive strictly in order: for each run, `draw_frame` once per tick,
/// at most one `announce_end`, then `end_run`; after the last run a single
/// `draw_bar_chart`.
pub trait Renderer {
    /// Draw the current tick.
    fn draw_frame(&mut self, frame: &Frame<'_>) -> Result<FrameControl, RenderError>;

    /// The run resolved; show an end marker.
    fn announce_end(&mut self, message: &str) -> Result<(), RenderError>;

    /// The run is over, whatever the outcome.
    fn end_run(&mut self) -> Result<(), RenderError> {
        Ok(())
    }

    /// Draw the final per-material chart.
    fn draw_bar_chart(&mut self, chart: &BarChart) -> Result<(), RenderError>;
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn draw_frame(&mut self, frame: &Frame<'_>) -> Result<FrameControl, RenderError> {
        (**self).draw_frame(frame)
    }

    fn announce_end(&mut self, message: &str) -> Result<(), RenderError> {
        (**self).announce_end(message)
    }

    fn end_run(&mut self) -> Result<(), RenderError> {
        (**self).end_run()
    }

    fn draw_bar_chart(&mut self, chart: &BarChart) -> Result<(), RenderError> {
        (**self).draw_bar_chart(chart)
    }
}

/// Headless renderer that reports through the `log` facade.
#[derive(Debug, Default)]
pub struct LogRenderer {
    current: String,
}

impl LogRenderer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Renderer for LogRenderer {
    fn draw_frame(&mut self, frame: &Frame<'_>) -> Result<FrameControl, RenderError> {
        if self.current != frame.title {
            info!("{}", frame.title);
            self.current = frame.title.to_string();
        }
        let counts = frame.counts();
        trace!(
            "tick {:>3}: {} active, {} absorbed, {} transmitted",
            frame.tick,
            counts.active,
            counts.absorbed,
            counts.transmitted
        );
        Ok(FrameControl::Continue)
    }

    fn announce_end(&mut self, message: &str) -> Result<(), RenderError> {
        info!("{}: {}", self.current, message);
        Ok(())
    }

    fn draw_bar_chart(&mut self, chart: &BarChart) -> Result<(), RenderError> {
        for line in chart.to_string().lines() {
            info!("{}", line);
        }
        Ok(())
    }
}
