//! Simulation configuration.
//!
//! [`SimConfig`] can be serialized to JSON and loaded back, so a session can be
//! described in a file and replayed with `gamma-shield --config session.json`.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::ensemble::Band;
use crate::error::ConfigError;
use crate::material::Material;

/// Size of the drawing plane in arbitrary units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Canvas {
    pub width: f32,
    pub height: f32,
}

/// Complete simulation configuration.
///
/// Fields missing from a JSON file take their [`Default`] values.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimConfig {
    /// Materials to run, in declaration order.
    pub materials: Vec<Material>,
    /// Photons per run.
    pub num_particles: u32,
    /// Slab thickness along y.
    pub material_thickness: f32,
    pub canvas_width: f32,
    pub canvas_height: f32,
    /// One-time in-flight offset applied at spawn. Later ticks use a unit step.
    pub speed: f32,
    /// Hard upper bound on ticks per run.
    pub max_ticks: u32,
    /// Wall-clock time between frames. Presentation only.
    pub tick_interval_ms: u64,
    /// Seed for the session RNG. `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            materials: Material::defaults(),
            num_particles: 300,
            material_thickness: 10.0,
            canvas_width: 200.0,
            canvas_height: 150.0,
            speed: 70.0,
            max_ticks: 200,
            tick_interval_ms: 50,
            seed: None,
        }
    }
}

impl SimConfig {
    /// Save the configuration to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Load a configuration from a JSON file.
    ///
    /// The result is not validated; call [`SimConfig::validate`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Fail fast on values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_particles == 0 {
            return Err(ConfigError::NoParticles);
        }
        if !(self.material_thickness.is_finite() && self.material_thickness > 0.0) {
            return Err(ConfigError::NonPositiveThickness(self.material_thickness));
        }
        let canvas_ok = |v: f32| v.is_finite() && v > 0.0;
        if !canvas_ok(self.canvas_width) || !canvas_ok(self.canvas_height) {
            return Err(ConfigError::InvalidCanvas {
                width: self.canvas_width,
                height: self.canvas_height,
            });
        }
        if !self.speed.is_finite() {
            return Err(ConfigError::InvalidSpeed(self.speed));
        }
        if self.max_ticks == 0 {
            return Err(ConfigError::NoTicks);
        }
        if self.materials.is_empty() {
            return Err(ConfigError::NoMaterials);
        }

        let mut seen = HashSet::new();
        for material in &self.materials {
            material.validate()?;
            if !seen.insert(material.name.as_str()) {
                return Err(ConfigError::DuplicateMaterial(material.name.clone()));
            }
        }
        Ok(())
    }

    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.canvas_width,
            height: self.canvas_height,
        }
    }

    /// The material slab: starts at the (floored) canvas mid-height.
    pub fn band(&self) -> Band {
        Band::new((self.canvas_height / 2.0).floor(), self.material_thickness)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Look up a declared material by name.
    pub fn material(&self, name: &str) -> Option<&Material> {
        self.materials.iter().find(|m| m.name == name)
    }
}
