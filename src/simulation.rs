//! Simulation driver.
//!
//! A [`Simulation`] runs one [`Run`] per material in declaration order, pushing
//! a frame to the renderer after every tick, and collects the transmitted
//! counts into [`Results`].
//!
//! ```ignore
//! use gamma_shield::prelude::*;
//!
//! let results = Simulation::new(SimConfig::default())?
//!     .with_seed(42)
//!     .run_all(&mut LogRenderer::new())?;
//! ```

use log::{debug, info, warn};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::config::SimConfig;
use crate::ensemble::{Ensemble, TickStats};
use crate::error::SimulationError;
use crate::material::Material;
use crate::particle::StateCounts;
use crate::render::{Frame, FrameControl, Renderer, END_MESSAGE};
use crate::results::Results;
use crate::time::TickClock;

/// Lifecycle of a single run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    /// Ensemble built, no tick taken yet.
    Init,
    Running,
    /// No photon left active.
    Resolved,
    /// Tick cap reached with photons still active.
    TickCapped,
    /// The renderer asked to stop early.
    Interrupted,
    /// Final count handed to the results aggregate.
    Reported,
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Resolved,
    TickCapped,
    Interrupted,
}

/// Final state of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub material: String,
    pub outcome: RunOutcome,
    /// Ticks taken.
    pub ticks: u32,
    pub counts: StateCounts,
    /// `exp(-mu * thickness)` used for every trial of this run.
    pub transmission_probability: f32,
}

impl RunReport {
    pub fn transmitted(&self) -> usize {
        self.counts.transmitted
    }

    /// Mean transmitted count for this ensemble size: `N * p`.
    pub fn expected_transmitted(&self) -> f32 {
        self.counts.total() as f32 * self.transmission_probability
    }
}

/// Title of the frames drawn for `material`.
pub fn run_title(material: &str) -> String {
    format!("Gamma Ray Simulation - {}", material)
}

/// State of one run: the ensemble, its clock and where it is in its lifecycle.
#[derive(Debug)]
pub struct Run {
    material: Material,
    title: String,
    ensemble: Ensemble,
    clock: TickClock,
    phase: RunPhase,
}

impl Run {
    /// Emit the ensemble for `material`.
    pub fn new<R: Rng + ?Sized>(config: &SimConfig, material: &Material, rng: &mut R) -> Self {
        Self {
            material: material.clone(),
            title: run_title(&material.name),
            ensemble: Ensemble::spawn(config, material, rng),
            clock: TickClock::new(config.max_ticks),
            phase: RunPhase::Init,
        }
    }

    /// Take one tick. Returns `None` once the run has finished.
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<TickStats> {
        if self.is_finished() {
            return None;
        }
        let Some(tick) = self.clock.next_tick() else {
            self.phase = RunPhase::TickCapped;
            return None;
        };
        self.phase = RunPhase::Running;

        let stats = self.ensemble.advance(rng);
        if stats.absorbed + stats.transmitted > 0 {
            debug!(
                "{} tick {}: {} absorbed, {} transmitted",
                self.material.name, tick, stats.absorbed, stats.transmitted
            );
        }

        if self.ensemble.is_resolved() {
            self.clock.stop();
            self.phase = RunPhase::Resolved;
        } else if self.clock.is_capped() {
            self.phase = RunPhase::TickCapped;
        }
        Some(stats)
    }

    /// End the run early.
    pub fn interrupt(&mut self) {
        if !self.is_finished() {
            self.clock.stop();
            self.phase = RunPhase::Interrupted;
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(
            self.phase,
            RunPhase::Resolved | RunPhase::TickCapped | RunPhase::Interrupted | RunPhase::Reported
        )
    }

    /// Frame for the current state.
    pub fn frame(&self, config: &SimConfig) -> Frame<'_> {
        Frame {
            title: &self.title,
            material: &self.material.name,
            tick: self.clock.tick(),
            canvas: config.canvas(),
            band: self.ensemble.band(),
            particles: self.ensemble.particles(),
        }
    }

    /// Close the run and produce its report.
    pub fn finish(&mut self) -> RunReport {
        let outcome = match self.phase {
            RunPhase::Resolved => RunOutcome::Resolved,
            RunPhase::Interrupted => RunOutcome::Interrupted,
            _ => RunOutcome::TickCapped,
        };
        self.phase = RunPhase::Reported;

        RunReport {
            material: self.material.name.clone(),
            outcome,
            ticks: self.clock.tick(),
            counts: self.ensemble.counts(),
            transmission_probability: self.ensemble.transmission_probability(),
        }
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn ensemble(&self) -> &Ensemble {
        &self.ensemble
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn tick(&self) -> u32 {
        self.clock.tick()
    }

    pub(crate) fn ticks_per_second(&self) -> f32 {
        self.clock.ticks_per_second()
    }
}

/// Runs every configured material and aggregates the transmitted counts.
pub struct Simulation {
    config: SimConfig,
    rng: SmallRng,
    reports: Vec<RunReport>,
}

impl Simulation {
    /// Validate `config` and create a driver.
    ///
    /// Seeds from `config.seed` when set, otherwise from OS entropy.
    pub fn new(config: SimConfig) -> Result<Self, SimulationError> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        Ok(Self {
            config,
            rng,
            reports: Vec::new(),
        })
    }

    /// Reseed the session RNG.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = SmallRng::seed_from_u64(seed);
        self.config.seed = Some(seed);
        self
    }

    /// Replace the session RNG.
    pub fn with_rng(mut self, rng: SmallRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Reports of every run so far, in run order.
    pub fn reports(&self) -> &[RunReport] {
        &self.reports
    }

    /// Run `material` to completion, drawing every tick.
    ///
    /// `material` is validated first; it need not be one of the configured
    /// materials.
    pub fn run_one<R: Renderer + ?Sized>(
        &mut self,
        material: &Material,
        renderer: &mut R,
    ) -> Result<RunReport, SimulationError> {
        material.validate()?;
        let mut run = Run::new(&self.config, material, &mut self.rng);
        info!(
            "{}: {} photons, mu = {}, p(transmit) = {:.5}",
            run.title,
            run.ensemble.len(),
            material.mu,
            run.ensemble.transmission_probability()
        );

        while run.step(&mut self.rng).is_some() {
            let control = renderer.draw_frame(&run.frame(&self.config))?;

            if run.phase() == RunPhase::Resolved {
                renderer.announce_end(END_MESSAGE)?;
            } else if control == FrameControl::Stop {
                run.interrupt();
            }
        }

        let ticks_per_second = run.ticks_per_second();
        let report = run.finish();
        match report.outcome {
            RunOutcome::Resolved => info!(
                "{} resolved after {} ticks ({:.1} ticks/s): {} transmitted, {} absorbed (expected {:.1})",
                report.material,
                report.ticks,
                ticks_per_second,
                report.counts.transmitted,
                report.counts.absorbed,
                report.expected_transmitted()
            ),
            RunOutcome::TickCapped => warn!(
                "{} hit the {} tick cap with {} photons still active; {} transmitted",
                report.material, report.ticks, report.counts.active, report.counts.transmitted
            ),
            RunOutcome::Interrupted => warn!(
                "{} interrupted at tick {}; {} transmitted so far",
                report.material, report.ticks, report.counts.transmitted
            ),
        }

        renderer.end_run()?;
        self.reports.push(report.clone());
        Ok(report)
    }

    /// Run every material in declaration order, then draw the summary chart.
    pub fn run_all<R: Renderer + ?Sized>(
        &mut self,
        renderer: &mut R,
    ) -> Result<Results, SimulationError> {
        let mut results = Results::new();
        let materials = self.config.materials.clone();

        for material in &materials {
            let report = self.run_one(material, renderer)?;
            results.record(&report.material, report.transmitted());
        }

        renderer.draw_bar_chart(&results.bar_chart())?;
        Ok(results)
    }
}
