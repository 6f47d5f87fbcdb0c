use std::{fs::File, io::BufWriter, path::PathBuf};

use clap::{Parser, ValueEnum};
use stage_simulation::*;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AtmosphereModel {
    Constant,
    Layered,
}

#[derive(Debug, Parser)]
#[command(about = "Fixed-step flight simulation of a multi-stage rocket")]
struct Args {
    /// JSON vehicle and run configuration; a two-stage vehicle is used if omitted
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    time_max: Option<f64>,

    #[arg(long)]
    time_step: Option<f64>,

    #[arg(long, value_enum, default_value_t = AtmosphereModel::Constant)]
    atmosphere: AtmosphereModel,

    /// Write every telemetry row to this CSV file
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Write the flight summary to this JSON file
    #[arg(long)]
    summary_json: Option<PathBuf>,
}

fn run<A: Atmosphere>(config: &SimulationConfig, atmosphere: A) -> Result<FlightLog, SimulationError> {
    let head = config.build_chain()?;
    let mut simulation =
        FlightSimulation::new(head, atmosphere, config.time_max, config.time_step)?;
    simulation.run()?;

    let (_, log) = simulation.into_parts();
    Ok(log)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SimulationConfig::from_file(path)?,
        None => SimulationConfig::default(),
    };
    if let Some(time_max) = args.time_max {
        config.time_max = time_max;
    }
    if let Some(time_step) = args.time_step {
        config.time_step = time_step;
    }

    let log = match args.atmosphere {
        AtmosphereModel::Constant => run(&config, ConstantAtmosphere)?,
        AtmosphereModel::Layered => run(&config, LayeredAtmosphere::default())?,
    };

    log.display_data();

    if let Some(path) = &args.csv {
        log.write_csv(BufWriter::new(File::create(path)?))?;
        println!("Telemetry written to {}", path.display());
    }
    if let Some(path) = &args.summary_json {
        serde_json::to_writer_pretty(BufWriter::new(File::create(path)?), &log.summary())?;
        println!("Summary written to {}", path.display());
    }

    Ok(())
}
