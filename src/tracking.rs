//! Per-tick event ledger consumed by the scheduler and, after binning,
//! by reporting.

use crate::creature::{Creature, CreatureId, DeathCause};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Death counters for a single tick, or cumulatively for a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeathCauseTally {
    pub age: u32,
    pub hunger: u32,
    pub predation: u32,
}

impl DeathCauseTally {
    pub fn record(&mut self, cause: DeathCause) {
        match cause {
            DeathCause::Age => self.age += 1,
            DeathCause::Hunger => self.hunger += 1,
            DeathCause::Predation => self.predation += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.age + self.hunger + self.predation
    }

    /// Fold another tally into this one.
    pub fn absorb(&mut self, other: DeathCauseTally) {
        self.age += other.age;
        self.hunger += other.hunger;
        self.predation += other.predation;
    }
}

/// Per-tick tracking accumulator. Owned by exactly one tick invocation;
/// the caller constructs a fresh one each tick.
#[derive(Debug, Default)]
pub struct Tracking {
    /// Species names of deaths recorded this tick.
    pub deaths: Vec<String>,
    /// Death cause counters for this tick.
    pub death_cause: DeathCauseTally,
    /// Species names of births recorded this tick.
    pub births: Vec<String>,
    /// Newly spawned creatures, appended to the world after the tick.
    pub newborns: Vec<Creature>,
    /// Prey creature ids queued for removal after predation.
    pub prey_removals: Vec<CreatureId>,
    /// Target id to number of creatures competing for it.
    pub food_competition: HashMap<u64, u32>,
}

impl Tracking {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of competitors currently after the given target.
    #[inline]
    pub fn competition_for(&self, id: u64) -> u32 {
        self.food_competition.get(&id).copied().unwrap_or(0)
    }

    /// Shift one competition slot from `old_id` to `new_id` when a
    /// creature retargets. Entries reaching zero are dropped.
    pub fn retarget(&mut self, old_id: Option<u64>, new_id: Option<u64>) {
        if let Some(id) = old_id {
            if let Some(count) = self.food_competition.get_mut(&id) {
                if *count > 1 {
                    *count -= 1;
                } else {
                    self.food_competition.remove(&id);
                }
            }
        }
        if let Some(id) = new_id {
            *self.food_competition.entry(id).or_insert(0) += 1;
        }
    }
}
