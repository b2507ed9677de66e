use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use env_logger::Env;
use log::{error, info};

use gamma_shield::prelude::*;

#[derive(Parser)]
#[command(name = "gamma-shield")]
#[command(about = "Animated Monte Carlo of gamma photons crossing shielding materials")]
#[command(version)]
struct Cli {
    /// JSON configuration file (defaults are used for missing fields)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Photons per material
    #[arg(short = 'n', long)]
    particles: Option<u32>,

    /// Material slab thickness
    #[arg(short, long)]
    thickness: Option<f32>,

    /// Seed for a reproducible session
    #[arg(short, long)]
    seed: Option<u64>,

    /// Hard cap on ticks per material
    #[arg(long)]
    max_ticks: Option<u32>,

    /// Wall-clock time per frame in the window
    #[arg(long)]
    tick_interval_ms: Option<u64>,

    /// Run without a window, logging progress only
    #[arg(long)]
    headless: bool,

    /// Write the last frame of every run and the chart as PNGs (implies --headless)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Close each finished window after this long instead of waiting
    #[arg(long)]
    linger_ms: Option<u64>,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    dump_config: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn load_config(&self) -> Result<SimConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => {
                info!("Loading configuration from {}", path.display());
                SimConfig::load(path)?
            }
            None => SimConfig::default(),
        };

        if let Some(n) = self.particles {
            config.num_particles = n;
        }
        if let Some(t) = self.thickness {
            config.material_thickness = t;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(max_ticks) = self.max_ticks {
            config.max_ticks = max_ticks;
        }
        if let Some(ms) = self.tick_interval_ms {
            config.tick_interval_ms = ms;
        }
        Ok(config)
    }

    fn renderer(&self, config: &SimConfig) -> Result<Box<dyn Renderer>, RenderError> {
        if let Some(dir) = &self.output_dir {
            info!("Writing frames to {}", dir.display());
            return Ok(Box::new(ImageRenderer::new(dir)?));
        }
        if self.headless {
            return Ok(Box::new(LogRenderer::new()));
        }
        let options = WindowOptions {
            tick_interval: config.tick_interval(),
            linger: self.linger_ms.map(Duration::from_millis),
            ..WindowOptions::default()
        };
        Ok(Box::new(WindowRenderer::new(options)?))
    }
}

fn print_summary(reports: &[RunReport]) {
    let name_width = reports
        .iter()
        .map(|r| r.material.len())
        .max()
        .unwrap_or(0)
        .max("Material".len());

    println!(
        "{:<name_width$}  {:>11}  {:>8}  {:>6}  {:>5}  {:>8}  {:>8}  outcome",
        "Material", "transmitted", "absorbed", "active", "ticks", "p", "expected"
    );
    for report in reports {
        println!(
            "{:<name_width$}  {:>11}  {:>8}  {:>6}  {:>5}  {:>8.5}  {:>8.1}  {:?}",
            report.material,
            report.counts.transmitted,
            report.counts.absorbed,
            report.counts.active,
            report.ticks,
            report.transmission_probability,
            report.expected_transmitted(),
            report.outcome
        );
    }
}

fn run(cli: &Cli) -> Result<(), SimulationError> {
    let config = cli.load_config()?;

    if cli.dump_config {
        config.validate()?;
        println!("{}", config.to_json()?);
        return Ok(());
    }

    let mut simulation = Simulation::new(config)?;
    let mut renderer = cli.renderer(simulation.config())?;
    let results = simulation.run_all(&mut renderer)?;

    info!("Finished {} materials", results.len());
    print_summary(simulation.reports());
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
