//! The particle ensemble: per-photon state and the per-tick update.
//!
//! Photons live in a flat `Vec` and are addressed by index. Each call to
//! [`Ensemble::advance`] moves every active photon one unit along its fixed
//! direction and resolves the ones that have just entered the material band
//! with a single Bernoulli trial against the Beer-Lambert probability.

use glam::Vec2;
use rand::Rng;

use crate::config::SimConfig;
use crate::material::Material;
use crate::particle::{Particle, ParticleState, StateCounts};
use crate::spawn::Source;

/// The material slab: a horizontal strip `y0 <= y <= y0 + thickness`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub y0: f32,
    pub thickness: f32,
}

impl Band {
    pub fn new(y0: f32, thickness: f32) -> Self {
        Self { y0, thickness }
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y0 + self.thickness
    }

    /// Inclusive on both edges.
    #[inline]
    pub fn contains(&self, y: f32) -> bool {
        self.y0 <= y && y <= self.top()
    }
}

/// What happened during one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickStats {
    /// Photons moved this tick.
    pub moved: usize,
    /// Photons absorbed this tick.
    pub absorbed: usize,
    /// Photons transmitted this tick.
    pub transmitted: usize,
}

/// All photons of one run plus the fixed parameters they are judged against.
#[derive(Debug, Clone)]
pub struct Ensemble {
    particles: Vec<Particle>,
    band: Band,
    transmission_probability: f32,
}

impl Ensemble {
    /// Build an ensemble from already-emitted photons.
    pub fn new(particles: Vec<Particle>, band: Band, transmission_probability: f32) -> Self {
        Self {
            particles,
            band,
            transmission_probability,
        }
    }

    /// Emit `config.num_particles` photons for a run against `material`.
    ///
    /// The transmission probability is computed here, once per run.
    pub fn spawn<R: Rng + ?Sized>(config: &SimConfig, material: &Material, rng: &mut R) -> Self {
        let particles = Source::from_config(config).emit_many(config.num_particles, rng);
        let probability = material.transmission_probability(config.material_thickness);
        Self::new(particles, config.band(), probability)
    }

    /// Advance every active photon by one unit step and classify the ones now
    /// inside the band.
    ///
    /// Classified photons are never moved or re-classified.
    pub fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R) -> TickStats {
        let mut stats = TickStats::default();

        for particle in self.particles.iter_mut().filter(|p| p.is_active()) {
            particle.position += particle.direction;
            stats.moved += 1;

            if self.band.contains(particle.position.y) {
                if rng.gen::<f32>() < self.transmission_probability {
                    particle.state = ParticleState::Transmitted;
                    stats.transmitted += 1;
                } else {
                    particle.state = ParticleState::Absorbed;
                    stats.absorbed += 1;
                }
            }
        }

        stats
    }

    /// `true` once no photon is active.
    pub fn is_resolved(&self) -> bool {
        !self.particles.iter().any(Particle::is_active)
    }

    pub fn counts(&self) -> StateCounts {
        self.particles.iter().collect()
    }

    pub fn transmitted(&self) -> usize {
        self.particles
            .iter()
            .filter(|p| p.state == ParticleState::Transmitted)
            .count()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn positions(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.particles.iter().map(|p| p.position)
    }

    pub fn states(&self) -> impl Iterator<Item = ParticleState> + '_ {
        self.particles.iter().map(|p| p.state)
    }

    pub fn band(&self) -> Band {
        self.band
    }

    pub fn transmission_probability(&self) -> f32 {
        self.transmission_probability
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use std::f32::consts::FRAC_PI_2;

    fn straight_up(x: f32, y: f32) -> Particle {
        Particle::new(Vec2::new(x, y), FRAC_PI_2)
    }

    #[test]
    fn test_band_contains_is_inclusive() {
        let band = Band::new(75.0, 10.0);
        assert!(band.contains(75.0));
        assert!(band.contains(85.0));
        assert!(band.contains(80.0));
        assert!(!band.contains(74.99));
        assert!(!band.contains(85.01));
    }

    #[test]
    fn test_advance_moves_active_by_unit_step() {
        let mut ensemble = Ensemble::new(vec![straight_up(5.0, 10.0)], Band::new(75.0, 10.0), 1.0);
        let mut rng = SmallRng::seed_from_u64(1);

        let stats = ensemble.advance(&mut rng);
        assert_eq!(stats.moved, 1);
        let p = ensemble.particles()[0];
        assert!((p.position.y - 11.0).abs() < 1e-5);
        assert!((p.position.x - 5.0).abs() < 1e-5);
        assert!(p.is_active());
    }

    #[test]
    fn test_classification_on_band_entry() {
        let mut ensemble = Ensemble::new(vec![straight_up(0.0, 73.5)], Band::new(75.0, 10.0), 1.0);
        let mut rng = SmallRng::seed_from_u64(1);

        ensemble.advance(&mut rng);
        assert!(ensemble.particles()[0].is_active());

        let stats = ensemble.advance(&mut rng);
        assert_eq!(stats.transmitted, 1);
        assert_eq!(ensemble.particles()[0].state, ParticleState::Transmitted);
        assert!(ensemble.is_resolved());
    }

    #[test]
    fn test_resolved_particles_are_frozen() {
        let mut ensemble = Ensemble::new(vec![straight_up(0.0, 74.5)], Band::new(75.0, 10.0), 0.0);
        let mut rng = SmallRng::seed_from_u64(2);

        ensemble.advance(&mut rng);
        let frozen = ensemble.particles()[0];
        assert_eq!(frozen.state, ParticleState::Absorbed);

        for _ in 0..20 {
            let stats = ensemble.advance(&mut rng);
            assert_eq!(stats, TickStats::default());
        }
        assert_eq!(ensemble.particles()[0], frozen);
    }

    #[test]
    fn test_zero_probability_absorbs_everything() {
        let particles = (0..100).map(|i| straight_up(i as f32, 70.0)).collect();
        let mut ensemble = Ensemble::new(particles, Band::new(75.0, 10.0), 0.0);
        let mut rng = SmallRng::seed_from_u64(3);

        while !ensemble.is_resolved() {
            ensemble.advance(&mut rng);
        }
        assert_eq!(ensemble.counts().absorbed, 100);
        assert_eq!(ensemble.transmitted(), 0);
    }

    #[test]
    fn test_photon_that_skips_band_stays_active() {
        // A unit step cannot land inside a band thinner than the step.
        let mut ensemble = Ensemble::new(vec![straight_up(0.0, 74.6)], Band::new(75.0, 0.2), 1.0);
        let mut rng = SmallRng::seed_from_u64(4);

        for _ in 0..10 {
            ensemble.advance(&mut rng);
        }
        assert!(!ensemble.is_resolved());
        assert_eq!(ensemble.counts().active, 1);
    }

    #[test]
    fn test_spawn_uses_config_and_material() {
        let config = SimConfig::default();
        let mut rng = SmallRng::seed_from_u64(5);
        let ensemble = Ensemble::spawn(&config, &Material::lead(), &mut rng);

        assert_eq!(ensemble.len(), 300);
        assert_eq!(ensemble.band(), Band::new(75.0, 10.0));
        assert_eq!(ensemble.transmission_probability(), (-5.0f32).exp());
        assert!(ensemble.states().all(|s| s == ParticleState::Active));
        // All photons start below the band after the in-flight offset.
        assert!(ensemble.positions().all(|p| p.y < 75.0));
    }
}
