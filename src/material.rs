//! Shielding materials and the Beer-Lambert transmission law.
//!
//! A [`Material`] is static configuration: it is read once per run to compute
//! the probability that a photon crosses the slab unabsorbed and is never
//! mutated afterwards.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// A shielding material for ~1 MeV gamma rays.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Material {
    /// Display name, also the key in the results aggregate.
    pub name: String,
    /// Density in g/cm³. Informational only, not used by the transmission law.
    pub density: f32,
    /// Linear attenuation coefficient (mu). Larger means more absorption.
    pub mu: f32,
}

impl Material {
    /// Create a material from its name, density and attenuation coefficient.
    pub fn new(name: impl Into<String>, density: f32, mu: f32) -> Self {
        Self {
            name: name.into(),
            density,
            mu,
        }
    }

    /// Lead, mu = 0.5.
    pub fn lead() -> Self {
        Self::new("Lead", 11.34, 0.5)
    }

    /// Aluminum, mu = 0.136.
    pub fn aluminum() -> Self {
        Self::new("Aluminum", 2.7, 0.136)
    }

    /// Concrete, mu = 0.03.
    pub fn concrete() -> Self {
        Self::new("Concrete", 2.4, 0.03)
    }

    /// Steel, mu = 0.15.
    pub fn steel() -> Self {
        Self::new("Steel", 7.85, 0.15)
    }

    /// The default material table, in declaration order.
    pub fn defaults() -> Vec<Material> {
        vec![
            Self::lead(),
            Self::aluminum(),
            Self::concrete(),
            Self::steel(),
        ]
    }

    /// Probability that a photon crosses `thickness` of this material.
    ///
    /// See [`transmission_probability`].
    pub fn transmission_probability(&self, thickness: f32) -> f32 {
        transmission_probability(self.mu, thickness)
    }

    /// Reject negative or non-finite attenuation coefficients.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.mu.is_finite() || self.mu < 0.0 {
            return Err(ConfigError::NegativeAttenuation {
                material: self.name.clone(),
                mu: self.mu,
            });
        }
        Ok(())
    }
}

/// Beer-Lambert transmission probability `exp(-mu * thickness)`.
///
/// Always in `(0, 1]` for `mu >= 0` and `thickness >= 0`; zero thickness
/// transmits everything.
#[inline]
pub fn transmission_probability(mu: f32, thickness: f32) -> f32 {
    (-mu * thickness).exp()
}
