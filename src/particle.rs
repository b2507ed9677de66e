//! Photon records and their tri-state classification.

use glam::{Vec2, Vec4};

/// Classification of a photon.
///
/// Every photon starts `Active` and moves to `Absorbed` or `Transmitted`
/// exactly once, on the tick it first enters the material band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ParticleState {
    /// Still in flight (drawn blue).
    #[default]
    Active,
    /// Stopped by the material (drawn red).
    Absorbed,
    /// Crossed the material (drawn green).
    Transmitted,
}

impl ParticleState {
    #[inline]
    pub fn is_active(self) -> bool {
        self == ParticleState::Active
    }

    /// Named display color for this state.
    pub fn color(self) -> StateColor {
        match self {
            ParticleState::Active => StateColor::Blue,
            ParticleState::Absorbed => StateColor::Red,
            ParticleState::Transmitted => StateColor::Green,
        }
    }
}

/// The three marker colors the renderer is handed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateColor {
    Blue,
    Red,
    Green,
}

impl StateColor {
    /// Opaque RGBA, 0.0-1.0.
    pub fn rgba(self) -> Vec4 {
        match self {
            StateColor::Blue => Vec4::new(0.12, 0.3, 0.95, 1.0),
            StateColor::Red => Vec4::new(0.9, 0.12, 0.12, 1.0),
            StateColor::Green => Vec4::new(0.1, 0.7, 0.2, 1.0),
        }
    }
}

/// A single simulated photon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    /// Emission angle in radians, fixed for the photon's lifetime.
    pub angle: f32,
    /// Unit vector `(cos angle, sin angle)`.
    pub direction: Vec2,
    pub state: ParticleState,
}

impl Particle {
    /// An active photon at `position` heading along `angle`.
    pub fn new(position: Vec2, angle: f32) -> Self {
        Self {
            position,
            angle,
            direction: Vec2::from_angle(angle),
            state: ParticleState::Active,
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }
}

/// Number of photons in each state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StateCounts {
    pub active: usize,
    pub absorbed: usize,
    pub transmitted: usize,
}

impl StateCounts {
    pub fn record(&mut self, state: ParticleState) {
        match state {
            ParticleState::Active => self.active += 1,
            ParticleState::Absorbed => self.absorbed += 1,
            ParticleState::Transmitted => self.transmitted += 1,
        }
    }

    /// Photons that have been classified either way.
    pub fn resolved(&self) -> usize {
        self.absorbed + self.transmitted
    }

    pub fn total(&self) -> usize {
        self.active + self.resolved()
    }
}

impl<'a> FromIterator<&'a Particle> for StateCounts {
    fn from_iter<I: IntoIterator<Item = &'a Particle>>(iter: I) -> Self {
        let mut counts = StateCounts::default();
        for p in iter {
            counts.record(p.state);
        }
        counts
    }
}
