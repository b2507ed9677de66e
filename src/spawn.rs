//! Photon emission.
//!
//! Photons leave a line source along the bottom of the canvas, heading mostly
//! upward with some lateral spread.

use glam::Vec2;
use rand::Rng;
use std::f32::consts::PI;
use std::ops::Range;

use crate::config::SimConfig;
use crate::particle::Particle;

/// Emission angles are drawn uniformly from this range (radians).
pub const EMISSION_ANGLES: Range<f32> = (PI / 3.0)..(2.0 * PI / 3.0);

/// Line source along `y = 0` spanning the canvas width.
#[derive(Debug, Clone, PartialEq)]
pub struct Source {
    /// Source spans `x` in `[0, width)`.
    pub width: f32,
    /// Angular spread of emitted photons.
    pub angles: Range<f32>,
    /// Length of the one-time in-flight offset applied at emission.
    pub speed: f32,
}

impl Source {
    pub fn new(width: f32, speed: f32) -> Self {
        Self {
            width,
            angles: EMISSION_ANGLES,
            speed,
        }
    }

    pub fn from_config(config: &SimConfig) -> Self {
        Self::new(config.canvas_width, config.speed)
    }

    /// Emit one photon.
    ///
    /// The photon is already `speed` units along its direction when it
    /// appears; the ensemble then moves it one unit per tick.
    pub fn emit<R: Rng + ?Sized>(&self, rng: &mut R) -> Particle {
        let x = rng.gen_range(0.0..self.width);
        let angle = rng.gen_range(self.angles.clone());

        let mut particle = Particle::new(Vec2::new(x, 0.0), angle);
        particle.position += particle.direction * self.speed;
        particle
    }

    /// Emit `count` photons.
    pub fn emit_many<R: Rng + ?Sized>(&self, count: u32, rng: &mut R) -> Vec<Particle> {
        (0..count).map(|_| self.emit(rng)).collect()
    }
}
