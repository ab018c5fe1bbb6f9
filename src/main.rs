use anyhow::{Context, Result, bail};
use clap::Parser;
use flexi_logger::Logger;
use orbiverse::engine::{SCENE_SOLAR_SYSTEM, scene_catalog};
use orbiverse::{Engine, SandboxConfig, SimulationState};
use std::path::PathBuf;

/// Run one scene headless for a fixed number of frames.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Scene id, see --list
    #[arg(short, long, default_value = SCENE_SOLAR_SYSTEM)]
    scene: String,

    /// Frames to simulate
    #[arg(short, long, default_value_t = 600)]
    frames: usize,

    /// JSON config; missing fields keep their defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed both scenes' random generators
    #[arg(long)]
    seed: Option<u64>,

    /// Solar system only: resume from the save file and write it back at the end
    #[arg(long)]
    save: bool,

    /// Print the scene catalog and exit
    #[arg(long)]
    list: bool,
}

impl Args {
    /// Combinations clap cannot express on its own.
    fn check(&self) -> Result<()> {
        if self.save && self.scene != SCENE_SOLAR_SYSTEM {
            bail!("--save only applies to the '{}' scene, not '{}'", SCENE_SOLAR_SYSTEM, self.scene);
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    let _logger = Logger::try_with_env_or_str("info")?.start()?;
    let args = Args::parse();
    args.check()?;

    if args.list {
        for info in scene_catalog() {
            println!("{:<14} {}: {}", info.id, info.name, info.description);
        }
        return Ok(());
    }

    let mut cfg = match &args.config {
        Some(path) => SandboxConfig::from_path(path)
            .with_context(|| format!("loading config {:?}", path))?,
        None => SandboxConfig::default(),
    };
    if let Some(seed) = args.seed {
        cfg.geodesic.seed = Some(seed);
        cfg.gravity.seed = Some(seed);
    }

    if args.save {
        return run_persistent_sandbox(&cfg, args.frames);
    }

    let mut engine = Engine::new_builtin(&args.scene, &cfg)?;
    log::info!("running '{}' with {} objects for {} frames", engine.scene_id(), engine.len(), args.frames);
    for _ in 0..args.frames {
        engine.tick();
    }

    if let Some(field) = engine.particles() {
        log::info!(
            "{} particles still orbiting, {} captured",
            field.len(),
            field.captured()
        );
    }
    if let Some(state) = engine.sandbox() {
        report_bodies(state);
    }
    Ok(())
}

fn run_persistent_sandbox(cfg: &SandboxConfig, frames: usize) -> Result<()> {
    cfg.validate()?;
    let mut state = SimulationState::restore(cfg);
    log::info!("running '{}' with {} bodies for {} frames", SCENE_SOLAR_SYSTEM, state.bodies().len(), frames);
    for _ in 0..frames {
        state.tick();
    }
    report_bodies(&state);
    state
        .save()
        .with_context(|| format!("saving to {:?}", state.save_path()))?;
    Ok(())
}

fn report_bodies(state: &SimulationState) {
    let bodies = state.bodies().bodies();
    let fastest = bodies
        .iter()
        .map(|b| b.speed())
        .fold(0.0_f64, f64::max);
    log::info!("{} bodies, fastest moving at {:.3}", bodies.len(), fastest);
    if let Some(sun) = bodies.first() {
        log::info!("central body at {:?}", sun.position.as_slice());
    }
}
