use meteorsim::{ScenarioConfig, Scenario};
use meteorsim::{run_headless, FrameClock, LogRenderer};
use meteorsim::bench_step;

use clap::Parser;
use anyhow::{Context, Result};

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Parser, Debug)]
struct Args {
    /// Scenario file under `scenarios/`
    #[arg(short, long, default_value = "meteor_shower.yaml")]
    file_name: String,

    /// Number of frames to run
    #[arg(long, default_value_t = 600)]
    frames: u64,

    /// Fixed host frame time in seconds; measures the wall clock when omitted
    #[arg(long)]
    frame_time: Option<f64>,

    /// Override the scenario's time scale (negative plays backwards)
    #[arg(long, allow_hyphen_values = true)]
    time_scale: Option<f64>,

    /// Time `Simulation::step` for growing body counts instead of running
    #[arg(long)]
    bench: bool,
}

// load here to keep main clean
fn load_scenario_from_yaml(file_name: &str) -> Result<ScenarioConfig> {
    let config_path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(file_name);
    let file = File::open(&config_path)
        .with_context(|| format!("failed to open {}", config_path.display()))?;
    let reader = BufReader::new(file);
    let scenario_cfg: ScenarioConfig = serde_yaml::from_reader(reader)
        .with_context(|| format!("failed to parse {}", config_path.display()))?;

    Ok(scenario_cfg)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.bench {
        return bench_step();
    }

    let mut scenario_cfg = load_scenario_from_yaml(&args.file_name)?;
    if let Some(time_scale) = args.time_scale {
        scenario_cfg.simulation.time_scale = time_scale;
    }

    let mut scenario = Scenario::build_scenario(scenario_cfg)?;
    let clock = match args.frame_time {
        Some(seconds) => FrameClock::Fixed(seconds),
        None => FrameClock::WallClock,
    };

    let mut renderer = LogRenderer::default();
    let stats = run_headless(&mut scenario, args.frames, clock, &mut renderer)?;

    println!(
        "{} frames, {} steps, t = {:.3}s, {} bodies, {} draw calls",
        stats.frames, stats.steps, stats.sim_time, stats.bodies, renderer.draw_calls
    );

    Ok(())
}
