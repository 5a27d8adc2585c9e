//! Creature entity and its closed state/diet/cause enumerations.

use crate::config::CreatureSettings;
use crate::food::FoodId;
use serde::{Deserialize, Serialize};

/// Unique creature identifier
pub type CreatureId = u64;

/// Broad diet class deciding which target classes a creature scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DietType {
    Herbivore,
    Carnivore,
    Omnivore,
}

impl DietType {
    /// Herbivores never threaten other creatures.
    #[inline]
    pub fn is_predatory(self) -> bool {
        self != DietType::Herbivore
    }
}

/// Food class an omnivore favours when scoring targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DietPreference {
    Plants,
    Meat,
    Any,
}

/// Behavior state machine tag. `Unset` is the transient value left
/// behind when the safety check clears a flee, before the next state
/// selection runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BehaviorState {
    Unset,
    #[default]
    Exploring,
    Hunting,
    Mating,
    Fleeing,
    Resting,
}

/// Cause of death tallied into per-tick tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    Age,
    Hunger,
    Predation,
}

/// Id-based reference to a hunting creature's current objective.
///
/// Never dereferenced without a liveness check: consumed food or a
/// removed creature simply fails the world lookup and the reference
/// is reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Target {
    #[default]
    None,
    Food(FoodId),
    Creature(CreatureId),
}

impl Target {
    /// Target id regardless of class, or `None` when unset.
    #[inline]
    pub fn id(&self) -> Option<u64> {
        match *self {
            Target::None => None,
            Target::Food(id) | Target::Creature(id) => Some(id),
        }
    }

    #[inline]
    pub fn is_some(&self) -> bool {
        !matches!(self, Target::None)
    }

    #[inline]
    pub fn is_none(&self) -> bool {
        matches!(self, Target::None)
    }
}

/// A live agent in the world.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Creature {
    // Identity
    pub id: CreatureId,
    pub species_name: String,

    // Position
    pub x: f64,
    pub y: f64,

    // Appearance
    pub color_r: u8,
    pub color_g: u8,
    pub color_b: u8,
    pub size: f64,

    // Genome-derived parameters
    pub base_speed: f64,
    pub speed_multiplier: f64,
    pub metabolic_base_rate: f64,
    pub metabolic_rate: f64,
    pub fullness_cap: f64,
    pub energy_storage_rate: f64,
    pub diet_type: DietType,
    pub diet_preference: DietPreference,
    pub reproduction_cost: f64,
    pub mating_hunger_threshold: f64,
    pub reproduction_cooldown_cap: f64,
    pub litter_size: u32,
    pub age_cap: f64,
    pub age_rate: f64,
    pub mutation_factor: f64,
    pub attack_power: f64,
    pub defence_power: f64,
    pub flee_exhaustion_rate: f64,
    pub flee_recovery_factor: f64,
    pub skittish_multiplier_base: f64,
    pub skittish_multiplier_scared: f64,

    // Mutable vitals
    pub health: f64,
    pub age: f64,
    pub fullness_level: f64,
    pub reserve_energy: f64,
    pub reproduction_cooldown: f64,

    // Behavior
    pub state: BehaviorState,
    pub dead: bool,
    pub death_cause: Option<DeathCause>,

    // Transient per-tick state
    pub target: Target,
    pub predator: Option<CreatureId>,
    pub skittish_multiplier: f64,
    pub tired: bool,
    pub recovery_needed: i32,
    pub flee_count: u32,
    pub flee_recovery_cooldown: f64,
    pub last_direction: Option<f64>,
}

impl Creature {
    /// Instantiate a creature from a genome template at a position.
    pub fn from_settings(id: CreatureId, x: f64, y: f64, settings: &CreatureSettings) -> Self {
        Self {
            id,
            species_name: settings.species_name.clone(),
            x,
            y,
            color_r: settings.color_r,
            color_g: settings.color_g,
            color_b: settings.color_b,
            size: settings.size,
            base_speed: settings.base_speed,
            speed_multiplier: settings.speed_multiplier,
            metabolic_base_rate: settings.metabolic_base_rate,
            metabolic_rate: settings.metabolic_rate,
            fullness_cap: settings.fullness_cap,
            energy_storage_rate: settings.energy_storage_rate,
            diet_type: settings.diet_type,
            diet_preference: settings.diet_preference,
            reproduction_cost: settings.reproduction_cost,
            mating_hunger_threshold: settings.mating_hunger_threshold,
            reproduction_cooldown_cap: settings.reproduction_cooldown,
            litter_size: settings.litter_size,
            age_cap: settings.age_cap,
            age_rate: settings.age_rate,
            mutation_factor: settings.mutation_factor,
            attack_power: settings.attack_power,
            defence_power: settings.defence_power,
            flee_exhaustion_rate: settings.flee_exhaustion,
            flee_recovery_factor: settings.flee_recovery_factor,
            skittish_multiplier_base: settings.skittish_multiplier_base,
            skittish_multiplier_scared: settings.skittish_multiplier_scared,
            health: settings.health,
            age: settings.age,
            fullness_level: settings.initial_fullness,
            reserve_energy: settings.reserve_energy,
            reproduction_cooldown: settings.reproduction_cooldown,
            state: BehaviorState::Exploring,
            dead: false,
            death_cause: None,
            target: Target::None,
            predator: None,
            skittish_multiplier: settings.skittish_multiplier_base,
            tired: false,
            recovery_needed: 0,
            flee_count: 0,
            flee_recovery_cooldown: 0.0,
            last_direction: None,
        }
    }

    /// Euclidean distance to a point.
    #[inline]
    pub fn distance_to(&self, x: f64, y: f64) -> f64 {
        let dx = self.x - x;
        let dy = self.y - y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Energy a predator gains by consuming this creature.
    #[inline]
    pub fn energy_content(&self) -> f64 {
        self.size * 6.0 + (self.fullness_level / self.fullness_cap) * 6.0
    }

    /// Movement reach per tick, also the flee-trigger radius base.
    #[inline]
    pub fn step_length(&self) -> f64 {
        self.base_speed * self.speed_multiplier
    }
}
