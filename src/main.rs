use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use neurodrive::simulation::car::{ControlInputs, ControlMode};
use neurodrive::simulation::params::Params;
use neurodrive::simulation::snapshot::ModelSnapshot;
use neurodrive::simulation::stepper::Simulation;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "neurodrive")]
#[command(about = "Headless neural car evolution")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the simulation for a number of ticks
    Run {
        /// Path to a params file (JSON); defaults are used when omitted
        #[arg(long)]
        config: Option<PathBuf>,

        /// Number of ticks to run
        #[arg(long, default_value_t = 20_000)]
        ticks: u64,

        /// Seed for the random stream
        #[arg(long)]
        seed: Option<u64>,

        /// Speed multiplier passed to every tick
        #[arg(long, default_value_t = 1.0)]
        speed: f32,

        /// Driving mode
        #[arg(long, value_enum)]
        mode: Option<Mode>,

        /// Traffic density in percent
        #[arg(long)]
        traffic_density: Option<f32>,

        /// Start from a saved model snapshot (JSON)
        #[arg(long)]
        model: Option<PathBuf>,

        /// Write the best brain as a model snapshot when done
        #[arg(long)]
        export: Option<PathBuf>,

        /// Ticks between progress reports
        #[arg(long, default_value_t = 1_000)]
        report_every: u64,
    },
    /// Dump the default params to stdout
    DumpDefaultConfig,
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    Ai,
    Manual,
    Assist,
}

impl From<Mode> for ControlMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Ai => ControlMode::Ai,
            Mode::Manual => ControlMode::Manual,
            Mode::Assist => ControlMode::AiAssist,
        }
    }
}

fn main() -> Result<()> {
    init_tracing();

    match Cli::parse().command {
        Commands::Run {
            config,
            ticks,
            seed,
            speed,
            mode,
            traffic_density,
            model,
            export,
            report_every,
        } => {
            let mut params = match config {
                Some(path) => Params::load_from_file(&path.to_string_lossy())
                    .with_context(|| format!("loading {}", path.display()))?,
                None => Params::default(),
            };
            if seed.is_some() {
                params.rng_seed = seed;
            }
            if let Some(mode) = mode {
                params.control_mode = mode.into();
            }
            if let Some(density) = traffic_density {
                params.traffic_density = density;
            }

            let mut simulation = Simulation::new(params)?;

            if let Some(path) = model {
                let json = std::fs::read_to_string(&path)
                    .with_context(|| format!("reading {}", path.display()))?;
                let snapshot = ModelSnapshot::from_json(&json)?;
                info!(name = %snapshot.name, generation = snapshot.generation, "loaded model");
                simulation.load_brain(snapshot.brain_data)?;
            }

            run(&mut simulation, ticks, speed, report_every.max(1));

            if let Some(path) = export {
                match simulation.export_best("best") {
                    Some(snapshot) => {
                        std::fs::write(&path, snapshot.to_json()?)
                            .with_context(|| format!("writing {}", path.display()))?;
                        info!(path = %path.display(), score = snapshot.best_score, "exported model");
                    }
                    None => info!("no brain to export yet"),
                }
            }
        }
        Commands::DumpDefaultConfig => {
            println!("{}", serde_json::to_string_pretty(&Params::default())?);
        }
    }

    Ok(())
}

fn run(simulation: &mut Simulation, ticks: u64, speed: f32, report_every: u64) {
    // a headless player just holds the throttle
    let controls = ControlInputs {
        forward: true,
        ..ControlInputs::default()
    };

    info!(ticks, cars = simulation.cars().len(), "starting run");
    for tick in 1..=ticks {
        let stats = simulation.tick(speed, controls);
        if tick % report_every == 0 {
            info!(
                tick,
                generation = stats.generation,
                alive = stats.alive,
                total = stats.total,
                best = stats.best_score,
                avg = stats.avg_score,
                all_time_best = stats.all_time_best,
                "progress"
            );
        }
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
