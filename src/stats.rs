//! Run statistics: fixed-width tick binning and the final run report.
//!
//! Long runs are compressed into roughly eighty bins so report series
//! stay bounded regardless of run length. Counts are time-averaged per
//! bin; births and deaths are summed.

use crate::config::CreatureSettings;
use crate::tracking::{DeathCauseTally, Tracking};
use crate::world::World;
use serde::{Deserialize, Serialize};

/// Upper bound on the number of bins in a report series.
pub const TARGET_BIN_COUNT: u64 = 80;

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Success,
    Failed,
    Cancelled,
}

/// Binned series for a single species.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeciesSeries {
    pub name: String,
    pub color: (u8, u8, u8),
    /// Average live population per bin.
    pub count: Vec<f64>,
    /// Births per bin.
    pub births: Vec<f64>,
    /// Deaths per bin.
    pub deaths: Vec<f64>,
}

/// Final report for one simulation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    pub status: RunStatus,
    pub failure_reason: Option<String>,
    /// ISO 8601 timestamp taken when the run started.
    pub datetime: String,
    pub duration_secs: f64,
    /// Estimated compute cost of the run in currency units.
    pub compute_cost: f64,
    pub seed: u64,
    /// Ticks actually simulated (early extinction cuts a run short).
    pub ticks_run: u64,

    pub creature_count: Vec<f64>,
    pub food_count: Vec<f64>,
    pub birth_count: Vec<f64>,
    pub death_count: Vec<f64>,
    /// Cumulative death causes over all flushed bins.
    pub deaths_by_cause: DeathCauseTally,
    pub species: Vec<SpeciesSeries>,
}

struct SpeciesAccumulator {
    name: String,
    color: (u8, u8, u8),
    count_acc: f64,
    birth_acc: f64,
    death_acc: f64,
    count: Vec<f64>,
    births: Vec<f64>,
    deaths: Vec<f64>,
}

/// Accumulates per-tick observations and flushes them into bins.
///
/// A bin flushes when it reaches the bin width or when the final
/// scheduled tick is recorded; a run that breaks off early leaves its
/// partial bin unflushed.
pub struct TickBinner {
    bin_size: u64,
    sim_length: u64,
    ticks_recorded: u64,
    bin_counter: u64,

    creature_acc: f64,
    food_acc: f64,
    birth_acc: f64,
    death_acc: f64,
    cause_acc: DeathCauseTally,

    creature_count: Vec<f64>,
    food_count: Vec<f64>,
    birth_count: Vec<f64>,
    death_count: Vec<f64>,
    cause_totals: DeathCauseTally,

    species: Vec<SpeciesAccumulator>,
}

impl TickBinner {
    pub fn new(sim_length: u64, species: &[CreatureSettings]) -> Self {
        let bin_size = (sim_length as f64 / TARGET_BIN_COUNT as f64).ceil().max(1.0) as u64;
        Self {
            bin_size,
            sim_length,
            ticks_recorded: 0,
            bin_counter: 0,
            creature_acc: 0.0,
            food_acc: 0.0,
            birth_acc: 0.0,
            death_acc: 0.0,
            cause_acc: DeathCauseTally::default(),
            creature_count: Vec::new(),
            food_count: Vec::new(),
            birth_count: Vec::new(),
            death_count: Vec::new(),
            cause_totals: DeathCauseTally::default(),
            species: species
                .iter()
                .map(|s| SpeciesAccumulator {
                    name: s.species_name.clone(),
                    color: (s.color_r, s.color_g, s.color_b),
                    count_acc: 0.0,
                    birth_acc: 0.0,
                    death_acc: 0.0,
                    count: Vec::new(),
                    births: Vec::new(),
                    deaths: Vec::new(),
                })
                .collect(),
        }
    }

    pub fn bin_size(&self) -> u64 {
        self.bin_size
    }

    pub fn ticks_recorded(&self) -> u64 {
        self.ticks_recorded
    }

    /// Record one completed tick.
    pub fn record_tick(&mut self, world: &World, tracking: &Tracking) {
        self.ticks_recorded += 1;
        self.bin_counter += 1;

        self.creature_acc += world.population() as f64;
        self.food_acc += world.foods.len() as f64;
        self.birth_acc += tracking.births.len() as f64;
        self.death_acc += tracking.deaths.len() as f64;
        self.cause_acc.absorb(tracking.death_cause);

        for acc in &mut self.species {
            acc.count_acc += world
                .creatures
                .iter()
                .filter(|c| c.species_name == acc.name)
                .count() as f64;
            acc.birth_acc += tracking.births.iter().filter(|n| **n == acc.name).count() as f64;
            acc.death_acc += tracking.deaths.iter().filter(|n| **n == acc.name).count() as f64;
        }

        if self.bin_counter == self.bin_size || self.ticks_recorded == self.sim_length {
            self.flush_bin();
        }
    }

    fn flush_bin(&mut self) {
        let divisor = self.bin_counter.max(1) as f64;

        self.creature_count.push(self.creature_acc / divisor);
        self.food_count.push(self.food_acc / divisor);
        self.birth_count.push(self.birth_acc);
        self.death_count.push(self.death_acc);
        self.cause_totals.absorb(self.cause_acc);

        for acc in &mut self.species {
            acc.count.push(acc.count_acc / divisor);
            acc.births.push(acc.birth_acc);
            acc.deaths.push(acc.death_acc);
            acc.count_acc = 0.0;
            acc.birth_acc = 0.0;
            acc.death_acc = 0.0;
        }

        self.creature_acc = 0.0;
        self.food_acc = 0.0;
        self.birth_acc = 0.0;
        self.death_acc = 0.0;
        self.cause_acc = DeathCauseTally::default();
        self.bin_counter = 0;
    }

    /// Consume the binner into a report.
    pub fn into_result(
        self,
        status: RunStatus,
        failure_reason: Option<String>,
        datetime: String,
        duration_secs: f64,
        compute_cost: f64,
        seed: u64,
    ) -> SimulationResult {
        SimulationResult {
            status,
            failure_reason,
            datetime,
            duration_secs,
            compute_cost,
            seed,
            ticks_run: self.ticks_recorded,
            creature_count: self.creature_count,
            food_count: self.food_count,
            birth_count: self.birth_count,
            death_count: self.death_count,
            deaths_by_cause: self.cause_totals,
            species: self
                .species
                .into_iter()
                .map(|acc| SpeciesSeries {
                    name: acc.name,
                    color: acc.color,
                    count: acc.count,
                    births: acc.births,
                    deaths: acc.deaths,
                })
                .collect(),
        }
    }
}
