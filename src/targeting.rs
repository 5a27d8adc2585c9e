//! Target selection: desirability scoring for food and prey, with
//! competition-aware discounting.

use crate::creature::{Creature, DietPreference, DietType, Target};
use crate::food::Food;
use crate::tracking::Tracking;

/// Distance floor applied in scoring so colocated entities cannot
/// divide by zero. Movement math is unaffected.
const MIN_SCORING_DISTANCE: f64 = 1.0;

/// Desirability of a food item for a hunting creature.
///
/// `(energy * focus) / distance * 1/(competitors+1)`, where focus is
/// 3.0 when the item is already the creature's current target.
pub fn food_desirability(creature: &Creature, food: &Food, tracking: &Tracking) -> f64 {
    let distance = creature
        .distance_to(food.x(), food.y())
        .max(MIN_SCORING_DISTANCE);
    let focus = if creature.target == Target::Food(food.id()) {
        3.0
    } else {
        1.0
    };
    let competition = tracking.competition_for(food.id()) as f64;

    ((food.energy_content() * focus) / distance) * (1.0 / (competition + 1.0))
}

/// Desirability of a prey creature for a predator.
///
/// Like food scoring but with a 1.5 sticky focus and a softer
/// competition discount of `1/(competitors+1)^0.2`; competitors are
/// counted by scanning every creature currently targeting the prey.
pub fn prey_desirability(creature: &Creature, prey: &Creature, creatures: &[Creature]) -> f64 {
    let distance = creature.distance_to(prey.x, prey.y).max(MIN_SCORING_DISTANCE);
    let focus = if creature.target == Target::Creature(prey.id) {
        1.5
    } else {
        1.0
    };
    let competition = creatures
        .iter()
        .filter(|other| other.target == Target::Creature(prey.id))
        .count() as f64;

    ((prey.energy_content() * focus) / distance) * (1.0 / (competition + 1.0).powf(0.2))
}

/// Pick the highest-scoring food or prey candidate for the creature's
/// diet. Food is evaluated before prey and candidates in id order, so
/// ties favour the earlier candidate. The caller must invalidate a
/// stale food target before scoring.
pub fn find_best_target(
    creature: &Creature,
    foods: &[Food],
    creatures: &[Creature],
    tracking: &Tracking,
) -> Target {
    let mut best = Target::None;
    let mut highest = f64::NEG_INFINITY;

    if matches!(creature.diet_type, DietType::Herbivore | DietType::Omnivore) {
        for food in foods {
            if food.is_consumed() {
                continue;
            }
            let mut desirability = food_desirability(creature, food, tracking);
            if creature.diet_type == DietType::Omnivore
                && creature.diet_preference == DietPreference::Plants
            {
                desirability *= 2.0;
            }
            if desirability > highest {
                highest = desirability;
                best = Target::Food(food.id());
            }
        }
    }

    if matches!(creature.diet_type, DietType::Carnivore | DietType::Omnivore) {
        for prey in creatures {
            if prey.species_name == creature.species_name || prey.dead || prey.health <= 0.0 {
                continue;
            }
            let mut desirability = prey_desirability(creature, prey, creatures);
            if creature.diet_type == DietType::Omnivore
                && creature.diet_preference == DietPreference::Meat
            {
                desirability *= 2.0;
            }
            if desirability > highest {
                highest = desirability;
                best = Target::Creature(prey.id);
            }
        }
    }

    best
}
