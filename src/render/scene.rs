//! Renderer-agnostic 2D scenes.
//!
//! A [`Scene`] is a list of axis-aligned quads in world units plus the world
//! rectangle that should fill the viewport. Both the GPU and the raster
//! renderer draw exactly this, in order, with alpha blending.

use glam::{Vec2, Vec4};

use crate::results::BarChart;

use super::Frame;

const BACKGROUND: Vec4 = Vec4::new(1.0, 1.0, 1.0, 1.0);
const AXIS_COLOR: Vec4 = Vec4::new(0.15, 0.15, 0.15, 1.0);
const BAND_COLOR: Vec4 = Vec4::new(0.5, 0.5, 0.5, 0.3);
const BAR_COLOR: Vec4 = Vec4::new(0.0, 0.5, 0.0, 0.7);
const END_TINT: Vec4 = Vec4::new(0.9, 0.12, 0.12, 0.08);

/// Marker radius as a fraction of the canvas width.
const MARKER_FRACTION: f32 = 0.006;
/// Margin around the plotted area as a fraction of its size.
const MARGIN_FRACTION: f32 = 0.05;
/// Axis line thickness as a fraction of the view size.
const AXIS_FRACTION: f32 = 0.003;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuadShape {
    /// Filled rectangle.
    Rect,
    /// Disc inscribed in the quad.
    Disc,
}

/// An axis-aligned quad from `min` to `max` (world units, y up).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad {
    pub min: Vec2,
    pub max: Vec2,
    /// Straight (non-premultiplied) RGBA.
    pub color: Vec4,
    pub shape: QuadShape,
}

impl Quad {
    pub fn rect(min: Vec2, max: Vec2, color: Vec4) -> Self {
        Self {
            min,
            max,
            color,
            shape: QuadShape::Rect,
        }
    }

    pub fn disc(center: Vec2, radius: f32, color: Vec4) -> Self {
        Self {
            min: center - Vec2::splat(radius),
            max: center + Vec2::splat(radius),
            color,
            shape: QuadShape::Disc,
        }
    }

    /// Whether the world point `p` is covered by this quad.
    pub fn covers(&self, p: Vec2) -> bool {
        match self.shape {
            QuadShape::Rect => {
                p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
            }
            QuadShape::Disc => {
                let center = (self.min + self.max) * 0.5;
                let radius = (self.max - self.min) * 0.5;
                if radius.x <= 0.0 || radius.y <= 0.0 {
                    return false;
                }
                ((p - center) / radius).length_squared() <= 1.0
            }
        }
    }
}

/// A list of quads and the world rectangle to show.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub title: String,
    /// Lower-left corner of the view.
    pub view_min: Vec2,
    /// Upper-right corner of the view.
    pub view_max: Vec2,
    pub background: Vec4,
    /// Drawn in order; later quads blend over earlier ones.
    pub quads: Vec<Quad>,
}

impl Scene {
    pub fn new(title: impl Into<String>, view_min: Vec2, view_max: Vec2) -> Self {
        Self {
            title: title.into(),
            view_min,
            view_max,
            background: BACKGROUND,
            quads: Vec::new(),
        }
    }

    pub fn push(&mut self, quad: Quad) {
        self.quads.push(quad);
    }

    pub fn view_size(&self) -> Vec2 {
        self.view_max - self.view_min
    }

    /// Particles over the material band, on the canvas.
    pub fn from_frame(frame: &Frame<'_>) -> Self {
        let size = Vec2::new(frame.canvas.width, frame.canvas.height);
        let margin = size * MARGIN_FRACTION;
        let mut scene = Scene::new(frame.title, -margin, size + margin);

        scene.push_axes(Vec2::ZERO, size);
        scene.push(Quad::rect(
            Vec2::new(0.0, frame.band.y0),
            Vec2::new(size.x, frame.band.top()),
            BAND_COLOR,
        ));

        let radius = size.x * MARKER_FRACTION;
        for (position, color) in frame.positions().zip(frame.colors()) {
            scene.push(Quad::disc(position, radius, color.rgba()));
        }
        scene
    }

    /// One green bar per label, unit spacing, heights in counts.
    pub fn from_bar_chart(chart: &BarChart) -> Self {
        let width = chart.labels.len().max(1) as f32;
        let height = (chart.max_value().max(1) as f32) * 1.05;
        let size = Vec2::new(width, height);
        let margin = size * MARGIN_FRACTION;
        let mut scene = Scene::new(chart.title.clone(), -margin, size + margin);

        for (i, (_, value)) in chart.bars().enumerate() {
            let x = i as f32;
            scene.push(Quad::rect(
                Vec2::new(x + 0.1, 0.0),
                Vec2::new(x + 0.9, value as f32),
                BAR_COLOR,
            ));
        }
        scene.push_axes(Vec2::ZERO, size);
        scene
    }

    /// Translucent wash over the whole view, used as the end-of-run marker.
    pub fn push_end_marker(&mut self) {
        self.push(Quad::rect(self.view_min, self.view_max, END_TINT));
    }

    /// Left and bottom axis lines of the plotted area.
    fn push_axes(&mut self, min: Vec2, max: Vec2) {
        let t = self.view_size() * AXIS_FRACTION;
        self.push(Quad::rect(
            Vec2::new(min.x - t.x, min.y - t.y),
            Vec2::new(max.x, min.y),
            AXIS_COLOR,
        ));
        self.push(Quad::rect(
            Vec2::new(min.x - t.x, min.y - t.y),
            Vec2::new(min.x, max.y),
            AXIS_COLOR,
        ));
    }
}
