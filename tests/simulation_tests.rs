//! Integration tests for the simulation core and the renderer contract.
//!
//! Everything here runs headless: renderers are either the recording test
//! double below, the `LogRenderer`, or the `ImageRenderer` writing into a
//! temporary directory.

use gamma_shield::prelude::*;
use gamma_shield::render::END_MESSAGE;
use rand::rngs::SmallRng;
use rand::SeedableRng;

fn config(num_particles: u32, seed: u64) -> SimConfig {
    SimConfig {
        num_particles,
        seed: Some(seed),
        ..SimConfig::default()
    }
}

fn single(material: Material, num_particles: u32, seed: u64) -> SimConfig {
    SimConfig {
        materials: vec![material],
        ..config(num_particles, seed)
    }
}

// ============================================================================
// Recording renderer
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Frame { title: String, tick: u32, counts: StateCounts },
    AnnounceEnd(String),
    EndRun,
    Chart { labels: Vec<String>, values: Vec<usize> },
}

/// Records every call; optionally stops each run at a given tick.
#[derive(Default)]
struct Recorder {
    calls: Vec<Call>,
    stop_at: Option<u32>,
}

impl Recorder {
    fn stopping_at(tick: u32) -> Self {
        Self {
            stop_at: Some(tick),
            ..Self::default()
        }
    }

    fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }
}

impl Renderer for Recorder {
    fn draw_frame(&mut self, frame: &Frame<'_>) -> Result<FrameControl, RenderError> {
        self.calls.push(Call::Frame {
            title: frame.title.to_string(),
            tick: frame.tick,
            counts: frame.counts(),
        });
        if self.stop_at == Some(frame.tick) {
            Ok(FrameControl::Stop)
        } else {
            Ok(FrameControl::Continue)
        }
    }

    fn announce_end(&mut self, message: &str) -> Result<(), RenderError> {
        self.calls.push(Call::AnnounceEnd(message.to_string()));
        Ok(())
    }

    fn end_run(&mut self) -> Result<(), RenderError> {
        self.calls.push(Call::EndRun);
        Ok(())
    }

    fn draw_bar_chart(&mut self, chart: &BarChart) -> Result<(), RenderError> {
        self.calls.push(Call::Chart {
            labels: chart.labels.clone(),
            values: chart.values.clone(),
        });
        Ok(())
    }
}

// ============================================================================
// Ensemble Invariants
// ============================================================================

#[test]
fn test_resolved_photons_never_change() {
    let config = config(500, 1);
    let mut rng = SmallRng::seed_from_u64(1);
    let mut ensemble = Ensemble::spawn(&config, &Material::aluminum(), &mut rng);

    let mut previous = ensemble.particles().to_vec();
    for _ in 0..config.max_ticks {
        ensemble.advance(&mut rng);
        for (before, after) in previous.iter().zip(ensemble.particles()) {
            if !before.is_active() {
                assert_eq!(before, after, "resolved photon moved or changed state");
            }
        }
        previous = ensemble.particles().to_vec();
        if ensemble.is_resolved() {
            break;
        }
    }
    assert!(ensemble.is_resolved());
}

#[test]
fn test_classification_happens_on_first_band_entry() {
    let config = config(500, 2);
    let band = config.band();
    let mut rng = SmallRng::seed_from_u64(2);
    let mut ensemble = Ensemble::spawn(&config, &Material::steel(), &mut rng);

    // every photon is emitted below the band with the default geometry
    assert!(ensemble.positions().all(|p| p.y < band.y0));

    while !ensemble.is_resolved() {
        let before = ensemble.particles().to_vec();
        ensemble.advance(&mut rng);

        for (b, a) in before.iter().zip(ensemble.particles()) {
            if !b.is_active() {
                continue;
            }
            assert!(!band.contains(b.position.y));
            if band.contains(a.position.y) {
                assert!(!a.is_active(), "photon inside the band left unclassified");
            } else {
                assert!(a.is_active(), "photon classified outside the band");
            }
        }
    }
}

#[test]
fn test_counts_always_sum_to_ensemble_size() {
    let config = config(300, 3);
    let mut rng = SmallRng::seed_from_u64(3);
    let mut ensemble = Ensemble::spawn(&config, &Material::lead(), &mut rng);

    for _ in 0..50 {
        let stats = ensemble.advance(&mut rng);
        let counts = ensemble.counts();
        assert_eq!(counts.total(), 300);
        assert!(stats.moved <= 300);
    }
}

// ============================================================================
// Probability Law
// ============================================================================

#[test]
fn test_zero_attenuation_transmits_everything() {
    let cfg = single(Material::new("Vacuum", 0.0, 0.0), 2000, 4);
    let results = Simulation::new(cfg)
        .unwrap()
        .run_all(&mut Recorder::default())
        .unwrap();
    assert_eq!(results.get("Vacuum"), Some(2000));
}

#[test]
fn test_opaque_material_transmits_almost_nothing() {
    // mu * thickness = 20
    let cfg = single(Material::new("Tungsten-ish", 19.3, 2.0), 2000, 5);
    let results = Simulation::new(cfg)
        .unwrap()
        .run_all(&mut Recorder::default())
        .unwrap();
    assert!(results.get("Tungsten-ish").unwrap() <= 1);
}

#[test]
fn test_concrete_fraction_matches_beer_lambert() {
    let n = 20_000;
    let cfg = single(Material::concrete(), n, 6);
    let mut sim = Simulation::new(cfg).unwrap();
    let report = sim.run_one(&Material::concrete(), &mut Recorder::default()).unwrap();

    let p = (-0.3f64).exp();
    let mean = n as f64 * p;
    let sd = (n as f64 * p * (1.0 - p)).sqrt();
    let diff = (report.transmitted() as f64 - mean).abs();
    assert!(diff < 6.0 * sd, "transmitted {} vs expected {:.1}", report.transmitted(), mean);
    assert_eq!(report.outcome, RunOutcome::Resolved);
}

#[test]
fn test_transmission_decreases_with_attenuation() {
    let results = Simulation::new(config(20_000, 7))
        .unwrap()
        .run_all(&mut Recorder::default())
        .unwrap();

    // ordered by increasing mu
    let by_mu = ["Concrete", "Aluminum", "Steel", "Lead"];
    let counts: Vec<usize> = by_mu.iter().map(|m| results.get(m).unwrap()).collect();
    for pair in counts.windows(2) {
        assert!(pair[0] > pair[1], "counts not decreasing: {:?}", counts);
    }
}

#[test]
fn test_lead_scenario() {
    let cfg = SimConfig {
        material_thickness: 10.0,
        ..single(Material::lead(), 1000, 8)
    };
    let mut sim = Simulation::new(cfg).unwrap();
    let report = sim.run_one(&Material::lead(), &mut Recorder::default()).unwrap();

    assert!((report.expected_transmitted() - 6.7379).abs() < 1e-2);
    assert!(report.transmitted() <= 20, "transmitted {}", report.transmitted());
    assert_eq!(report.counts.total(), 1000);
}

// ============================================================================
// Driver
// ============================================================================

#[test]
fn test_results_follow_declaration_order() {
    let mut recorder = Recorder::default();
    let results = Simulation::new(config(100, 9))
        .unwrap()
        .run_all(&mut recorder)
        .unwrap();

    let names: Vec<&str> = results.iter().map(|(name, _)| name).collect();
    assert_eq!(names, ["Lead", "Aluminum", "Concrete", "Steel"]);

    let Some(Call::Chart { labels, values }) = recorder.calls.last() else {
        panic!("chart was not the last call");
    };
    assert_eq!(labels, &["Lead", "Aluminum", "Concrete", "Steel"]);
    let expected: Vec<usize> = results.iter().map(|(_, count)| count).collect();
    assert_eq!(values, &expected);
}

#[test]
fn test_custom_declaration_order_is_kept() {
    let cfg = SimConfig {
        materials: vec![Material::steel(), Material::lead(), Material::concrete()],
        ..config(50, 10)
    };
    let results = Simulation::new(cfg)
        .unwrap()
        .run_all(&mut Recorder::default())
        .unwrap();
    let names: Vec<&str> = results.iter().map(|(name, _)| name).collect();
    assert_eq!(names, ["Steel", "Lead", "Concrete"]);
}

#[test]
fn test_renderer_call_sequence() {
    let mut recorder = Recorder::default();
    let mut sim = Simulation::new(config(200, 11)).unwrap();
    sim.run_all(&mut recorder).unwrap();

    let materials = ["Lead", "Aluminum", "Concrete", "Steel"];
    let mut calls = recorder.calls.iter().peekable();

    for material in materials {
        let title = format!("Gamma Ray Simulation - {}", material);
        let mut last_tick = 0;
        while let Some(Call::Frame { title: t, tick, .. }) = calls.peek() {
            assert_eq!(t, &title);
            assert_eq!(*tick, last_tick + 1, "ticks must be consecutive");
            last_tick = *tick;
            calls.next();
        }
        assert!(last_tick > 0, "no frames for {}", material);
        assert_eq!(calls.next(), Some(&Call::AnnounceEnd(END_MESSAGE.to_string())));
        assert_eq!(calls.next(), Some(&Call::EndRun));
    }
    assert!(matches!(calls.next(), Some(Call::Chart { .. })));
    assert!(calls.next().is_none());

    assert_eq!(recorder.count(|c| matches!(c, Call::AnnounceEnd(_))), 4);
}

#[test]
fn test_last_frame_of_resolved_run_has_no_active_photons() {
    let mut recorder = Recorder::default();
    let mut sim = Simulation::new(single(Material::steel(), 150, 12)).unwrap();
    sim.run_all(&mut recorder).unwrap();

    let frames: Vec<&StateCounts> = recorder
        .calls
        .iter()
        .filter_map(|c| match c {
            Call::Frame { counts, .. } => Some(counts),
            _ => None,
        })
        .collect();
    let last = frames.last().unwrap();
    assert_eq!(last.active, 0);
    assert!(frames[..frames.len() - 1].iter().all(|c| c.active > 0));
    assert_eq!(sim.reports()[0].counts, **last);
}

#[test]
fn test_tick_cap_ends_run_without_end_marker() {
    // photons start above the band and never reach it
    let cfg = SimConfig {
        speed: 200.0,
        max_ticks: 5,
        ..single(Material::lead(), 40, 13)
    };
    let mut recorder = Recorder::default();
    let mut sim = Simulation::new(cfg).unwrap();
    let results = sim.run_all(&mut recorder).unwrap();

    let report = &sim.reports()[0];
    assert_eq!(report.outcome, RunOutcome::TickCapped);
    assert_eq!(report.ticks, 5);
    assert_eq!(report.counts.active, 40);
    assert_eq!(results.get("Lead"), Some(0));

    assert_eq!(recorder.count(|c| matches!(c, Call::Frame { .. })), 5);
    assert_eq!(recorder.count(|c| matches!(c, Call::AnnounceEnd(_))), 0);
    assert_eq!(recorder.count(|c| matches!(c, Call::EndRun)), 1);
}

#[test]
fn test_default_tick_cap_bounds_every_run() {
    let mut sim = Simulation::new(config(300, 14)).unwrap();
    sim.run_all(&mut Recorder::default()).unwrap();
    for report in sim.reports() {
        assert!(report.ticks <= 200);
    }
}

#[test]
fn test_stop_interrupts_run_and_keeps_count() {
    let mut recorder = Recorder::stopping_at(3);
    let mut sim = Simulation::new(config(100, 15)).unwrap();
    let results = sim.run_all(&mut recorder).unwrap();

    assert_eq!(sim.reports().len(), 4);
    for report in sim.reports() {
        assert_eq!(report.outcome, RunOutcome::Interrupted);
        assert_eq!(report.ticks, 3);
        assert_eq!(results.get(&report.material), Some(report.transmitted()));
    }
    assert_eq!(recorder.count(|c| matches!(c, Call::Frame { .. })), 12);
    assert_eq!(recorder.count(|c| matches!(c, Call::AnnounceEnd(_))), 0);
    assert_eq!(recorder.count(|c| matches!(c, Call::EndRun)), 4);
}

// ============================================================================
// Reproducibility
// ============================================================================

#[test]
fn test_same_seed_same_results() {
    let run = |seed| {
        let mut sim = Simulation::new(config(300, seed)).unwrap();
        let results = sim.run_all(&mut LogRenderer::new()).unwrap();
        (results, sim.reports().to_vec())
    };

    let (a, reports_a) = run(42);
    let (b, reports_b) = run(42);
    assert_eq!(a, b);
    assert_eq!(reports_a, reports_b);
}

#[test]
fn test_with_seed_overrides_config_seed() {
    let a = Simulation::new(config(300, 1))
        .unwrap()
        .with_seed(99)
        .run_all(&mut Recorder::default())
        .unwrap();
    let b = Simulation::new(config(300, 2))
        .unwrap()
        .with_seed(99)
        .run_all(&mut Recorder::default())
        .unwrap();
    assert_eq!(a, b);
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_invalid_config_fails_before_any_run() {
    let cfg = SimConfig {
        materials: vec![Material::lead(), Material::new("Antimatter", 1.0, -0.2)],
        ..SimConfig::default()
    };
    assert!(matches!(
        Simulation::new(cfg),
        Err(SimulationError::Config(ConfigError::NegativeAttenuation { .. }))
    ));

    let cfg = SimConfig {
        material_thickness: -1.0,
        ..SimConfig::default()
    };
    assert!(matches!(
        Simulation::new(cfg),
        Err(SimulationError::Config(ConfigError::NonPositiveThickness(_)))
    ));
}

#[test]
fn test_partial_json_config_uses_defaults() {
    let json = r#"{
        "materials": [{ "name": "Lead", "density": 11.34, "mu": 0.5 }],
        "num_particles": 25,
        "material_thickness": 4.0,
        "canvas_width": 100.0,
        "canvas_height": 81.0,
        "speed": 30.0
    }"#;
    let cfg = SimConfig::from_json(json).unwrap();
    assert_eq!(cfg.max_ticks, 200);
    assert_eq!(cfg.seed, None);
    assert_eq!(cfg.band(), Band::new(40.0, 4.0));

    let results = Simulation::new(cfg)
        .unwrap()
        .with_seed(3)
        .run_all(&mut Recorder::default())
        .unwrap();
    assert_eq!(results.len(), 1);
}

// ============================================================================
// Image Output
// ============================================================================

#[test]
fn test_image_renderer_writes_runs_and_chart() {
    let dir = std::env::temp_dir().join(format!("gamma-shield-test-{}", std::process::id()));
    let mut renderer = ImageRenderer::new(&dir).unwrap().with_scale(1.0);

    let cfg = SimConfig {
        materials: vec![Material::lead(), Material::concrete()],
        ..config(30, 16)
    };
    Simulation::new(cfg).unwrap().run_all(&mut renderer).unwrap();

    for file in ["lead.png", "concrete.png", "transmitted.png"] {
        assert!(dir.join(file).is_file(), "{} missing", file);
    }
    assert_eq!(renderer.written().len(), 3);

    let frame = image::open(dir.join("lead.png")).unwrap();
    assert_eq!(frame.width(), 220);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_image_renderer_keeps_case_colliding_runs_apart() {
    let dir = std::env::temp_dir().join(format!("gamma-shield-case-{}", std::process::id()));
    let mut renderer = ImageRenderer::new(&dir).unwrap().with_scale(1.0);

    let cfg = SimConfig {
        materials: vec![Material::lead(), Material::new("lead", 11.34, 0.5)],
        ..config(20, 17)
    };
    Simulation::new(cfg).unwrap().run_all(&mut renderer).unwrap();

    let written: std::collections::HashSet<_> = renderer.written().iter().collect();
    assert_eq!(written.len(), 3);
    for file in ["lead.png", "lead_2.png", "transmitted.png"] {
        assert!(dir.join(file).is_file(), "{} missing", file);
    }

    let _ = std::fs::remove_dir_all(&dir);
}
