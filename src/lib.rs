//! # gamma-shield
//!
//! Animated Monte Carlo of gamma photons crossing a shielding slab.
//!
//! Each configured material gets one run: a fresh ensemble of photons is
//! emitted at the bottom edge of the canvas, travels upward along fixed
//! directions, and every photon that reaches the material band is either
//! transmitted or absorbed by a single Bernoulli trial against the
//! Beer-Lambert probability `exp(-mu * thickness)`. After the last run the
//! transmitted counts are plotted per material.
//!
//! ## Quick Start
//!
//! ```ignore
//! use gamma_shield::prelude::*;
//!
//! fn main() -> Result<(), SimulationError> {
//!     let config = SimConfig {
//!         num_particles: 1000,
//!         ..SimConfig::default()
//!     };
//!     let results = Simulation::new(config)?
//!         .with_seed(7)
//!         .run_all(&mut LogRenderer::new())?;
//!
//!     for (material, transmitted) in results.iter() {
//!         println!("{material}: {transmitted}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Photons
//!
//! A [`Particle`] has a position, a fixed unit direction and a
//! [`ParticleState`]. Photons start `Active` and move to exactly one of
//! `Absorbed` or `Transmitted`; resolved photons are frozen.
//!
//! ### Runs
//!
//! A [`Simulation`] owns the session RNG and runs one [`simulation::Run`] per
//! material, in declaration order. A run ends when no photon is active, when
//! the tick cap is hit, or when the renderer asks to stop.
//!
//! ### Rendering
//!
//! The core never draws. It pushes frames into a [`Renderer`]; see
//! [`render`] for the renderers that ship with the crate.
//!
//! ## Reproducibility
//!
//! All randomness flows through one seedable [`rand::rngs::SmallRng`]. Two
//! sessions with the same seed and configuration produce identical counts.

pub mod config;
pub mod ensemble;
pub mod error;
pub mod material;
pub mod particle;
pub mod render;
pub mod results;
pub mod simulation;
pub mod spawn;
pub mod time;

pub use config::{Canvas, SimConfig};
pub use ensemble::{Band, Ensemble, TickStats};
pub use error::{ConfigError, GpuError, RenderError, SimulationError};
pub use glam::{Vec2, Vec4};
pub use material::{transmission_probability, Material};
pub use particle::{Particle, ParticleState, StateColor, StateCounts};
pub use render::{
    Frame, FrameControl, ImageRenderer, LogRenderer, Renderer, WindowOptions, WindowRenderer,
    END_MESSAGE,
};
pub use results::{BarChart, Results};
pub use simulation::{RunOutcome, RunReport, Simulation};

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::config::{Canvas, SimConfig};
    pub use crate::ensemble::{Band, Ensemble};
    pub use crate::error::{ConfigError, RenderError, SimulationError};
    pub use crate::material::Material;
    pub use crate::particle::{Particle, ParticleState, StateCounts};
    pub use crate::render::{
        Frame, FrameControl, ImageRenderer, LogRenderer, Renderer, WindowOptions, WindowRenderer,
    };
    pub use crate::results::{BarChart, Results};
    pub use crate::simulation::{RunOutcome, RunReport, Simulation};
    pub use crate::{Vec2, Vec4};
}
