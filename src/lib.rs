//! Agent-based ecosystem simulator.
//!
//! Creatures with heritable genomes forage for perishable food, flee
//! predators, mate, mutate and die inside a bounded 2D world. A run is
//! driven tick by tick from a seeded RNG, so the same configuration and
//! seed always replay the same history.
//!
//! The crate exposes three layers:
//! - [`World`] plus [`Tracking`] for direct tick-by-tick control,
//! - [`run_simulation`] / [`SimulationHandle`] for whole runs with
//!   binned statistics and cooperative cancellation,
//! - [`WorldSnapshot`] for frame consumers that render or record runs.

mod behavior;
pub mod config;
pub mod creature;
pub mod food;
pub mod genetics;
pub mod runner;
pub mod snapshot;
pub mod stats;
pub mod targeting;
pub mod tracking;
pub mod world;

pub use config::{Config, CreatureSettings, SimulationSettings};
pub use creature::{BehaviorState, Creature, CreatureId, DeathCause, DietPreference, DietType, Target};
pub use food::{Food, FoodId};
pub use runner::{run_simulation, FrameObserver, SimulationHandle};
pub use snapshot::{CreatureView, FoodView, WorldSnapshot};
pub use stats::{RunStatus, SimulationResult, SpeciesSeries, TickBinner};
pub use tracking::{DeathCauseTally, Tracking};
pub use world::World;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Throughput measurement for a headless run.
#[derive(Debug, Clone)]
pub struct BenchmarkResult {
    pub ticks: u64,
    pub duration_secs: f64,
    pub ticks_per_second: f64,
    pub final_population: usize,
}

/// Run a fixed-seed world as fast as possible and measure throughput.
pub fn benchmark(ticks: u64, initial_population: u32) -> BenchmarkResult {
    let mut config = Config::default();
    config.simulation.sim_length = ticks;
    config.species[0].initial_population = initial_population;

    let mut world = World::new_with_seed(&config.simulation, &config.species, 0xB3A57);
    let timer = std::time::Instant::now();
    let mut ticks_run = 0;
    for _ in 0..ticks {
        let mut tracking = Tracking::new();
        world.update(&mut tracking);
        ticks_run += 1;
        if world.is_extinct() {
            break;
        }
    }
    let duration_secs = timer.elapsed().as_secs_f64();

    BenchmarkResult {
        ticks: ticks_run,
        duration_secs,
        ticks_per_second: ticks_run as f64 / duration_secs.max(f64::EPSILON),
        final_population: world.population(),
    }
}
