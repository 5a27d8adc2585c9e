//! Genome blending and randomized perturbation for reproduction.

use crate::config::CreatureSettings;
use crate::creature::{Creature, DietType};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

/// Per-field maximum mutation percentages (as fractions).
///
/// The metabolic pair is deliberately crossed: `metabolic_base_rate`
/// mutates with the `metabolic_rate` constant and vice versa, matching
/// the inherited tuning of the simulation.
struct MutationFactors {
    base_speed: f64,
    speed_multiplier: f64,
    health: f64,
    age_cap: f64,
    fullness_cap: f64,
    metabolic_base_rate: f64,
    metabolic_rate: f64,
    energy_storage_rate: f64,
    reproduction_cost: f64,
    mating_hunger_threshold: f64,
    reproduction_cooldown: f64,
    attack_power: f64,
    defence_power: f64,
    skittish_multiplier_base: f64,
    skittish_multiplier_scared: f64,
    flee_exhaustion_rate: f64,
    flee_recovery_factor: f64,
}

const FACTORS: MutationFactors = MutationFactors {
    base_speed: 0.1,
    speed_multiplier: 0.15,
    health: 0.15,
    age_cap: 0.05,
    fullness_cap: 0.05,
    metabolic_base_rate: 0.1,
    metabolic_rate: 0.15,
    energy_storage_rate: 0.1,
    reproduction_cost: 0.1,
    mating_hunger_threshold: 0.1,
    reproduction_cooldown: 0.05,
    attack_power: 0.1,
    defence_power: 0.1,
    skittish_multiplier_base: 0.1,
    skittish_multiplier_scared: 0.1,
    flee_exhaustion_rate: 0.1,
    flee_recovery_factor: 0.1,
};

/// With probability `mutation_factor`, perturb `value` by a uniform
/// fraction in `[-max_percent, +max_percent]`. A draw that would make
/// the value non-positive is rejected and the original kept.
pub fn mutate_value_percent(
    rng: &mut ChaCha8Rng,
    value: f64,
    mutation_factor: f64,
    max_percent: f64,
) -> f64 {
    if rng.gen::<f64>() < mutation_factor {
        let mutation = rng.gen::<f64>() * (max_percent * 2.0) - max_percent;
        let new_value = value + value * mutation;
        if new_value <= 0.0 {
            return value;
        }
        return new_value;
    }
    value
}

/// Litter size for a mating pair. When both parents independently pass
/// their own mutation roll the average litter gets a uniform jitter in
/// [-1, 1], floored at one offspring; otherwise the plain floored
/// average is used.
pub fn mutate_litter_size(rng: &mut ChaCha8Rng, parent_a: &Creature, parent_b: &Creature) -> u32 {
    let mean = (parent_a.litter_size as f64 + parent_b.litter_size as f64) / 2.0;
    if rng.gen::<f64>() < parent_a.mutation_factor && rng.gen::<f64>() < parent_b.mutation_factor {
        let jittered = (mean + rng.gen::<f64>() * 2.0 - 1.0).round();
        if jittered < 1.0 {
            return 1;
        }
        return jittered as u32;
    }
    mean.floor() as u32
}

/// Blend two parents into an offspring genome: each numeric field is
/// the average of both parents' independently mutated values.
pub fn blend_offspring(
    rng: &mut ChaCha8Rng,
    parent_a: &Creature,
    parent_b: &Creature,
) -> CreatureSettings {
    let mut blend = |a: f64, b: f64, max_percent: f64| -> f64 {
        (mutate_value_percent(rng, a, parent_a.mutation_factor, max_percent)
            + mutate_value_percent(rng, b, parent_b.mutation_factor, max_percent))
            / 2.0
    };

    let base_speed = blend(parent_a.base_speed, parent_b.base_speed, FACTORS.base_speed);
    let speed_multiplier = blend(
        parent_a.speed_multiplier,
        parent_b.speed_multiplier,
        FACTORS.speed_multiplier,
    );
    let health = blend(parent_a.health, parent_b.health, FACTORS.health).trunc();
    let age_cap = blend(parent_a.age_cap, parent_b.age_cap, FACTORS.age_cap);
    let fullness_cap = blend(
        parent_a.fullness_cap,
        parent_b.fullness_cap,
        FACTORS.fullness_cap,
    )
    .trunc();
    let initial_fullness = blend(
        parent_a.fullness_cap / 2.0,
        parent_b.fullness_cap / 2.0,
        FACTORS.fullness_cap,
    )
    .floor();
    let metabolic_base_rate = blend(
        parent_a.metabolic_base_rate,
        parent_b.metabolic_base_rate,
        FACTORS.metabolic_rate,
    );
    let metabolic_rate = blend(
        parent_a.metabolic_rate,
        parent_b.metabolic_rate,
        FACTORS.metabolic_base_rate,
    );
    let energy_storage_rate = blend(
        parent_a.energy_storage_rate,
        parent_b.energy_storage_rate,
        FACTORS.energy_storage_rate,
    );
    let reproduction_cost = blend(
        parent_a.reproduction_cost,
        parent_b.reproduction_cost,
        FACTORS.reproduction_cost,
    )
    .trunc();
    let mating_hunger_threshold = blend(
        parent_a.mating_hunger_threshold,
        parent_b.mating_hunger_threshold,
        FACTORS.mating_hunger_threshold,
    )
    .trunc();
    let reproduction_cooldown = blend(
        parent_a.reproduction_cooldown_cap,
        parent_b.reproduction_cooldown_cap,
        FACTORS.reproduction_cooldown,
    )
    .trunc();
    let attack_power = blend(parent_a.attack_power, parent_b.attack_power, FACTORS.attack_power);
    let defence_power = blend(
        parent_a.defence_power,
        parent_b.defence_power,
        FACTORS.defence_power,
    );
    let skittish_multiplier_base = blend(
        parent_a.skittish_multiplier_base,
        parent_b.skittish_multiplier_base,
        FACTORS.skittish_multiplier_base,
    );
    let skittish_multiplier_scared = blend(
        parent_a.skittish_multiplier_scared,
        parent_b.skittish_multiplier_scared,
        FACTORS.skittish_multiplier_scared,
    );
    let flee_exhaustion = blend(
        parent_a.flee_exhaustion_rate,
        parent_b.flee_exhaustion_rate,
        FACTORS.flee_exhaustion_rate,
    );
    let flee_recovery_factor = blend(
        parent_a.flee_recovery_factor,
        parent_b.flee_recovery_factor,
        FACTORS.flee_recovery_factor,
    );

    let diet_type = if parent_a.diet_type == parent_b.diet_type {
        parent_a.diet_type
    } else {
        DietType::Omnivore
    };
    let diet_preference = if rng.gen::<f64>() > 0.5 {
        parent_a.diet_preference
    } else {
        parent_b.diet_preference
    };
    let litter_size = mutate_litter_size(rng, parent_a, parent_b);

    CreatureSettings {
        species_name: parent_a.species_name.clone(),
        base_speed,
        speed_multiplier,
        health,
        age: 0.0,
        age_cap,
        age_rate: parent_a.age_rate,
        initial_population: 0,
        initial_fullness,
        fullness_cap,
        metabolic_base_rate,
        metabolic_rate,
        energy_storage_rate,
        reserve_energy: 0.0,
        diet_type,
        diet_preference,
        reproduction_cost,
        mating_hunger_threshold,
        reproduction_cooldown,
        litter_size,
        mutation_factor: parent_a.mutation_factor,
        color_r: parent_a.color_r,
        color_g: parent_a.color_g,
        color_b: parent_a.color_b,
        size: parent_a.size,
        skittish_multiplier_base,
        skittish_multiplier_scared,
        attack_power,
        defence_power,
        flee_exhaustion,
        flee_recovery_factor,
    }
}
