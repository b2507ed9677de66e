//! CPU rasteriser and the PNG-writing renderer built on it.

use glam::{Vec2, Vec4};
use image::{Rgba, RgbaImage};
use log::{info, warn};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::RenderError;
use crate::results::BarChart;

use super::scene::Scene;
use super::{Frame, FrameControl, Renderer};

/// File name of the summary chart.
pub const CHART_FILE: &str = "transmitted.png";

fn to_rgba8(color: Vec4) -> Rgba<u8> {
    let c = (color.clamp(Vec4::ZERO, Vec4::ONE) * 255.0).round();
    Rgba([c.x as u8, c.y as u8, c.z as u8, c.w as u8])
}

/// Blend straight-alpha `src` over an opaque pixel.
fn blend(dst: &mut Rgba<u8>, src: Vec4) {
    let a = src.w.clamp(0.0, 1.0);
    for i in 0..3 {
        let d = dst.0[i] as f32 / 255.0;
        let s = src[i].clamp(0.0, 1.0);
        dst.0[i] = ((s * a + d * (1.0 - a)) * 255.0).round() as u8;
    }
    dst.0[3] = 255;
}

/// Rasterise `scene` into a `width` x `height` image.
///
/// The view rectangle is stretched to fill the image; world y points up.
/// A pixel is covered when its center is.
pub fn rasterize(scene: &Scene, width: u32, height: u32) -> RgbaImage {
    let mut background = to_rgba8(scene.background);
    background.0[3] = 255;
    let mut image = RgbaImage::from_pixel(width, height, background);
    if width == 0 || height == 0 {
        return image;
    }

    let view = scene.view_size();
    let pixel = Vec2::new(view.x / width as f32, view.y / height as f32);
    let to_px_x = |x: f32| (x - scene.view_min.x) / pixel.x;
    let to_px_row = |y: f32| (scene.view_max.y - y) / pixel.y;

    for quad in &scene.quads {
        // pixel range whose centers can fall inside the quad
        let x0 = (to_px_x(quad.min.x) - 0.5).ceil().max(0.0) as u32;
        let x1 = (to_px_x(quad.max.x) - 0.5).floor().min(width as f32 - 1.0);
        let r0 = (to_px_row(quad.max.y) - 0.5).ceil().max(0.0) as u32;
        let r1 = (to_px_row(quad.min.y) - 0.5).floor().min(height as f32 - 1.0);
        if x1 < 0.0 || r1 < 0.0 {
            continue;
        }

        for row in r0..=r1 as u32 {
            for col in x0..=x1 as u32 {
                let center = Vec2::new(
                    scene.view_min.x + (col as f32 + 0.5) * pixel.x,
                    scene.view_max.y - (row as f32 + 0.5) * pixel.y,
                );
                if quad.covers(center) {
                    blend(image.get_pixel_mut(col, row), quad.color);
                }
            }
        }
    }

    image
}

/// File-system friendly version of a material name.
pub fn file_stem(name: &str) -> String {
    let stem: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    if stem.is_empty() {
        "material".to_string()
    } else {
        stem
    }
}

/// Headless renderer that writes PNGs.
///
/// Every frame is rasterised; the last frame of each run is written to
/// `<dir>/<material>.png` and the chart to `<dir>/transmitted.png`. Names
/// that map to an already used file get a `_2`, `_3`, ... suffix.
pub struct ImageRenderer {
    output_dir: PathBuf,
    /// Pixels per canvas unit.
    scale: f32,
    chart_size: (u32, u32),
    last_frame: Option<(String, Scene)>,
    /// Run file stems handed out so far.
    stems: HashSet<String>,
    written: Vec<PathBuf>,
}

impl ImageRenderer {
    /// Create the output directory if needed.
    pub fn new(output_dir: impl AsRef<Path>) -> Result<Self, RenderError> {
        let output_dir = output_dir.as_ref().to_path_buf();
        fs::create_dir_all(&output_dir)?;
        Ok(Self {
            output_dir,
            scale: 4.0,
            chart_size: (1200, 800),
            last_frame: None,
            stems: HashSet::new(),
            written: Vec::new(),
        })
    }

    /// Pixels per canvas unit for run frames (default 4).
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale.max(0.1);
        self
    }

    /// Files written so far.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    /// A file stem for `material` that no earlier run has used.
    fn unique_stem(&mut self, material: &str) -> String {
        let base = file_stem(material);
        let mut stem = base.clone();
        let mut n = 1;
        while Some(stem.as_str()) == CHART_FILE.strip_suffix(".png") || self.stems.contains(&stem) {
            n += 1;
            stem = format!("{}_{}", base, n);
        }
        if n > 1 {
            warn!("{} clashes with an earlier file name, writing {}.png", material, stem);
        }
        self.stems.insert(stem.clone());
        stem
    }

    fn save(&mut self, image: &RgbaImage, file_name: &str) -> Result<(), RenderError> {
        let path = self.output_dir.join(file_name);
        image.save(&path)?;
        info!("Wrote {}", path.display());
        self.written.push(path);
        Ok(())
    }
}

impl Renderer for ImageRenderer {
    fn draw_frame(&mut self, frame: &Frame<'_>) -> Result<FrameControl, RenderError> {
        self.last_frame = Some((frame.material.to_string(), Scene::from_frame(frame)));
        Ok(FrameControl::Continue)
    }

    fn announce_end(&mut self, message: &str) -> Result<(), RenderError> {
        if let Some((material, scene)) = &mut self.last_frame {
            scene.push_end_marker();
            info!("{}: {}", material, message);
        }
        Ok(())
    }

    fn end_run(&mut self) -> Result<(), RenderError> {
        let Some((material, scene)) = self.last_frame.take() else {
            return Ok(());
        };
        let size = scene.view_size() * self.scale;
        let (w, h) = (size.x.round().max(1.0), size.y.round().max(1.0));
        let image = rasterize(&scene, w as u32, h as u32);
        let stem = self.unique_stem(&material);
        self.save(&image, &format!("{}.png", stem))
    }

    fn draw_bar_chart(&mut self, chart: &BarChart) -> Result<(), RenderError> {
        let (w, h) = self.chart_size;
        let image = rasterize(&Scene::from_bar_chart(chart), w, h);
        self.save(&image, CHART_FILE)
    }
}
