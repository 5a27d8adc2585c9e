use clap::{Parser, Subcommand};
use savanna::{run_simulation, Config, RunStatus};
use std::error::Error;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;

#[derive(Parser)]
#[command(name = "savanna", version, about = "Agent-based ecosystem simulator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a simulation and print or save the JSON report
    Run {
        /// Path to a YAML configuration file; defaults apply when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// RNG seed; random when omitted
        #[arg(short, long)]
        seed: Option<u64>,
        /// Write the report to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Write a default configuration file to edit
    Init {
        #[arg(default_value = "savanna.yaml")]
        output: PathBuf,
    },
    /// Measure simulation throughput
    Benchmark {
        #[arg(long, default_value_t = 2000)]
        ticks: u64,
        #[arg(long, default_value_t = 100)]
        population: u32,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Command::Run {
            config,
            seed,
            output,
        } => run(config, seed, output),
        Command::Init { output } => init(output),
        Command::Benchmark { ticks, population } => {
            let result = savanna::benchmark(ticks, population);
            println!(
                "{} ticks in {:.2}s ({:.0} ticks/s), {} creatures remaining",
                result.ticks, result.duration_secs, result.ticks_per_second, result.final_population
            );
            Ok(())
        }
    }
}

fn run(
    config_path: Option<PathBuf>,
    seed: Option<u64>,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn Error>> {
    let config = match config_path {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    let seed = seed.unwrap_or_else(rand::random);

    let stop = AtomicBool::new(false);
    let result = run_simulation(&config, seed, &stop, None);

    let json = serde_json::to_string_pretty(&result)?;
    match output {
        Some(path) => {
            std::fs::write(&path, json)?;
            println!("report written to {}", path.display());
        }
        None => println!("{json}"),
    }

    if result.status != RunStatus::Success {
        return Err(format!(
            "run ended with status {:?}: {}",
            result.status,
            result.failure_reason.unwrap_or_default()
        )
        .into());
    }
    Ok(())
}

fn init(output: PathBuf) -> Result<(), Box<dyn Error>> {
    let config = Config::default();
    config.save(&output)?;
    println!("wrote default configuration to {}", output.display());
    Ok(())
}
