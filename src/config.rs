//! Configuration for a simulation run.
//!
//! Supports YAML configuration files with sensible defaults.

use crate::creature::{DietPreference, DietType};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure: run-level settings plus one genome
/// template per species.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub simulation: SimulationSettings,
    /// Ordered list of species genome templates.
    pub species: Vec<CreatureSettings>,
}

/// Run-level simulation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationSettings {
    /// Number of ticks to simulate
    pub sim_length: u64,
    /// Base food replication count
    pub food_respawn_base: f64,
    /// Multiplier applied to the base replication count
    pub food_respawn_multiplier: f64,
    /// Energy value of each food item
    pub food_energy: f64,
    /// World width
    pub width: f64,
    /// World height
    pub height: f64,
}

/// Genome template for one species: immutable-at-birth parameters,
/// also the shape computed for offspring during reproduction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatureSettings {
    pub species_name: String,

    // Movement
    pub base_speed: f64,
    pub speed_multiplier: f64,

    // Vitals
    pub health: f64,
    pub age: f64,
    pub age_cap: f64,
    pub age_rate: f64,
    pub initial_population: u32,

    // Metabolism
    pub initial_fullness: f64,
    pub fullness_cap: f64,
    pub metabolic_base_rate: f64,
    pub metabolic_rate: f64,
    pub energy_storage_rate: f64,
    pub reserve_energy: f64,

    // Diet
    pub diet_type: DietType,
    pub diet_preference: DietPreference,

    // Reproduction
    pub reproduction_cost: f64,
    pub mating_hunger_threshold: f64,
    pub reproduction_cooldown: f64,
    pub litter_size: u32,
    pub mutation_factor: f64,

    // Appearance
    pub color_r: u8,
    pub color_g: u8,
    pub color_b: u8,
    pub size: f64,

    // Combat and flight
    pub skittish_multiplier_base: f64,
    pub skittish_multiplier_scared: f64,
    pub attack_power: f64,
    pub defence_power: f64,
    pub flee_exhaustion: f64,
    pub flee_recovery_factor: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            simulation: SimulationSettings::default(),
            species: vec![CreatureSettings::default()],
        }
    }
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            sim_length: 5400,
            food_respawn_base: 1.0,
            food_respawn_multiplier: 1.0,
            food_energy: 15.0,
            width: 1280.0,
            height: 720.0,
        }
    }
}

impl Default for CreatureSettings {
    fn default() -> Self {
        Self {
            species_name: "Creature".to_string(),
            base_speed: 1.5,
            speed_multiplier: 1.0,
            health: 100.0,
            age: 0.0,
            age_cap: 35.0,
            age_rate: 0.04,
            initial_population: 25,
            initial_fullness: 100.0,
            fullness_cap: 100.0,
            metabolic_base_rate: 1.0 / 16.0,
            metabolic_rate: 1.0,
            energy_storage_rate: 0.7,
            reserve_energy: 0.0,
            diet_type: DietType::Herbivore,
            diet_preference: DietPreference::Plants,
            reproduction_cost: 40.0,
            mating_hunger_threshold: 50.0,
            reproduction_cooldown: 100.0,
            litter_size: 1,
            mutation_factor: 0.05,
            color_r: 155,
            color_g: 255,
            color_b: 55,
            size: 5.0,
            skittish_multiplier_base: 10.0,
            skittish_multiplier_scared: 20.0,
            attack_power: 40.0,
            defence_power: 10.0,
            flee_exhaustion: 0.05,
            flee_recovery_factor: 10.0,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a YAML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.simulation.sim_length == 0 {
            return Err("sim_length must be > 0".to_string());
        }
        if self.simulation.width <= 0.0 || self.simulation.height <= 0.0 {
            return Err("world dimensions must be > 0".to_string());
        }
        if self.species.is_empty() {
            return Err("at least one species is required".to_string());
        }
        for creature in &self.species {
            if creature.species_name.is_empty() {
                return Err("species_name must not be empty".to_string());
            }
            if creature.initial_population == 0 {
                return Err(format!(
                    "{}: initial_population must be > 0",
                    creature.species_name
                ));
            }
            if creature.fullness_cap <= 0.0 {
                return Err(format!(
                    "{}: fullness_cap must be > 0",
                    creature.species_name
                ));
            }
            if creature.base_speed <= 0.0 {
                return Err(format!("{}: base_speed must be > 0", creature.species_name));
            }
        }
        Ok(())
    }
}
