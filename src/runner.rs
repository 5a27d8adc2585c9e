//! Run loop and background execution handle.
//!
//! `run_simulation` drives a world for its configured length, binning
//! statistics and optionally feeding frame snapshots to an observer.
//! `SimulationHandle` runs the same loop on a worker thread with
//! cooperative cancellation.

use crate::config::Config;
use crate::snapshot::WorldSnapshot;
use crate::stats::{RunStatus, SimulationResult, TickBinner};
use crate::tracking::Tracking;
use crate::world::World;
use log::{info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

/// Estimated cost per wall-clock hour of simulation.
const COST_PER_HOUR: f64 = 0.096;

/// Per-tick frame consumer. An error aborts the run and is reported as
/// the failure reason.
pub type FrameObserver<'a> =
    dyn FnMut(&WorldSnapshot) -> Result<(), Box<dyn std::error::Error>> + 'a;

/// Run a simulation to completion on the current thread.
///
/// The run ends early on cancellation via `stop`, on extinction, or on
/// an observer error. Extinction is still a successful run; the series
/// simply stop at the last flushed bin.
pub fn run_simulation(
    config: &Config,
    seed: u64,
    stop: &AtomicBool,
    mut frame_observer: Option<&mut FrameObserver>,
) -> SimulationResult {
    let datetime = chrono::Local::now().to_rfc3339();
    let timer = Instant::now();

    let mut world = World::new_with_seed(&config.simulation, &config.species, seed);
    let mut binner = TickBinner::new(config.simulation.sim_length, &config.species);
    let mut status = RunStatus::Success;
    let mut failure_reason = None;

    info!(
        "starting run: seed {}, {} ticks, {} creatures, {} species",
        seed,
        config.simulation.sim_length,
        world.population(),
        config.species.len()
    );

    for tick in 0..config.simulation.sim_length {
        if stop.load(Ordering::Relaxed) {
            info!("run cancelled at tick {tick}");
            status = RunStatus::Cancelled;
            failure_reason = Some("cancelled".to_string());
            break;
        }

        let mut tracking = Tracking::new();
        world.update(&mut tracking);

        if world.is_extinct() {
            info!("population extinct at tick {tick}");
            break;
        }

        binner.record_tick(&world, &tracking);

        if let Some(ref mut observer) = frame_observer {
            let snapshot = WorldSnapshot::from_world(&world);
            if let Err(e) = observer(&snapshot) {
                warn!("frame observer failed at tick {tick}: {e}");
                status = RunStatus::Failed;
                failure_reason = Some(e.to_string());
                break;
            }
        }
    }

    let duration_secs = timer.elapsed().as_secs_f64();
    let compute_cost = COST_PER_HOUR / 3600.0 * duration_secs;
    info!(
        "run finished: {} ticks in {:.2}s, {} creatures remaining",
        binner.ticks_recorded(),
        duration_secs,
        world.population()
    );

    binner.into_result(status, failure_reason, datetime, duration_secs, compute_cost, seed)
}

/// Handle to a simulation running on a worker thread.
pub struct SimulationHandle {
    thread: Option<thread::JoinHandle<SimulationResult>>,
    stop: Arc<AtomicBool>,
}

impl SimulationHandle {
    /// Start the run on a new thread.
    pub fn spawn(config: Config, seed: u64) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);
        let thread = thread::spawn(move || run_simulation(&config, seed, &stop_flag, None));
        Self {
            thread: Some(thread),
            stop,
        }
    }

    /// Ask the run to stop at the next tick boundary.
    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    pub fn is_finished(&self) -> bool {
        self.thread.as_ref().map_or(true, |t| t.is_finished())
    }

    /// Wait for the run and take its result.
    pub fn join(mut self) -> SimulationResult {
        match self.thread.take() {
            Some(handle) => match handle.join() {
                Ok(result) => result,
                Err(_) => failed_result("simulation thread panicked"),
            },
            None => failed_result("simulation already joined"),
        }
    }
}

impl Drop for SimulationHandle {
    fn drop(&mut self) {
        if let Some(handle) = self.thread.take() {
            self.stop.store(true, Ordering::Relaxed);
            let _ = handle.join();
        }
    }
}

fn failed_result(reason: &str) -> SimulationResult {
    TickBinner::new(1, &[]).into_result(
        RunStatus::Failed,
        Some(reason.to_string()),
        chrono::Local::now().to_rfc3339(),
        0.0,
        0.0,
        0,
    )
}
