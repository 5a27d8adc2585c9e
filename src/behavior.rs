//! Per-creature tick update: survival checks, the behavior state
//! machine and its movement/combat/mating actions.
//!
//! All functions operate on a creature slot inside the world so that
//! actions can touch other creatures (attack damage, mating costs)
//! through the same exclusive world borrow.

use crate::creature::{BehaviorState, Creature, DeathCause, Target};
use crate::food::FoodId;
use crate::genetics;
use crate::targeting;
use crate::tracking::Tracking;
use crate::world::World;
use rand::Rng;
use std::f64::consts::PI;

/// Ticks of rest required after eating a food item.
const FOOD_RECOVERY_TICKS: i32 = 2;
/// Ticks of rest required after bringing down prey.
const PREY_RECOVERY_TICKS: i32 = 60;
/// Exploration heading perturbation bound (18 degrees).
const MAX_TURN_ANGLE: f64 = 18.0 * PI / 180.0;

/// Advance one creature by one tick. Dead creatures perform no
/// behavior; the scheduler skips slots already flagged dead before
/// calling this.
pub(crate) fn update_creature(world: &mut World, idx: usize, tracking: &mut Tracking) {
    {
        let c = &mut world.creatures[idx];
        c.age += c.age_rate;
        if c.reproduction_cooldown > 0.0 {
            c.reproduction_cooldown -= 1.0;
        }
    }

    check_survival(world, idx);
    if world.creatures[idx].dead {
        return;
    }

    check_safety(world, idx);
    check_state(&mut world.creatures[idx]);

    match world.creatures[idx].state {
        BehaviorState::Hunting => go_hunt(world, idx, tracking),
        BehaviorState::Mating => go_mate(world, idx, tracking),
        BehaviorState::Fleeing => go_flee(world, idx),
        BehaviorState::Resting => go_rest(&mut world.creatures[idx]),
        BehaviorState::Exploring | BehaviorState::Unset => go_explore(world, idx),
    }
}

/// Reconcile fullness against reserve/health, then sample age death
/// and apply the health check.
///
/// Health exhaustion is always reported as `Hunger`: starvation is the
/// only gradual health drain, and predation flags its victim before
/// this check can see it.
pub(crate) fn check_survival(world: &mut World, idx: usize) {
    {
        let c = &mut world.creatures[idx];
        if c.fullness_level <= 0.0 && c.reserve_energy <= 0.0 {
            c.health -= c.fullness_level.abs();
            c.fullness_level = 0.0;
        } else if c.fullness_level <= 0.0 {
            c.reserve_energy -= c.fullness_level.abs();
            c.fullness_level = 0.0;
        } else if c.fullness_level > c.fullness_cap {
            c.reserve_energy += (c.fullness_level - c.fullness_cap) * c.energy_storage_rate;
            c.fullness_level = c.fullness_cap;
        }
    }

    let (age, age_cap) = {
        let c = &world.creatures[idx];
        (c.age, c.age_cap)
    };
    if age >= age_cap {
        let death_probability = ((age - age_cap) * 0.1).min(1.0);
        if world.rng.gen::<f64>() < death_probability {
            let c = &mut world.creatures[idx];
            c.dead = true;
            c.death_cause = Some(DeathCause::Age);
        }
    }

    let c = &mut world.creatures[idx];
    if c.health <= 0.0 {
        c.dead = true;
        c.death_cause = Some(DeathCause::Hunger);
    }
}

/// Scan for the nearest predator of a different species and enter or
/// leave the fleeing state accordingly. The skittishness multiplier
/// for the trigger radius depends on whether the creature is already
/// scared.
pub(crate) fn check_safety(world: &mut World, idx: usize) {
    let fleeing = world.creatures[idx].state == BehaviorState::Fleeing;
    {
        let c = &mut world.creatures[idx];
        c.skittish_multiplier = if fleeing {
            c.skittish_multiplier_scared
        } else {
            c.skittish_multiplier_base
        };
    }

    let closest = if world.has_predators {
        let me = &world.creatures[idx];
        world
            .creatures
            .iter()
            .filter(|other| {
                other.id != me.id
                    && other.species_name != me.species_name
                    && other.diet_type.is_predatory()
            })
            .map(|other| (other.id, me.distance_to(other.x, other.y)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
    } else {
        None
    };

    let c = &mut world.creatures[idx];
    match closest {
        Some((predator_id, distance)) => {
            if distance <= c.step_length() * c.skittish_multiplier {
                c.state = BehaviorState::Fleeing;
                c.predator = Some(predator_id);
            } else {
                c.state = BehaviorState::Unset;
                c.predator = None;
            }
        }
        None => {
            if c.state == BehaviorState::Fleeing {
                c.state = BehaviorState::Unset;
                c.predator = None;
            }
        }
    }
}

/// Select the next behavior state. Fleeing is sticky and only cleared
/// by the safety check.
pub(crate) fn check_state(c: &mut Creature) {
    if c.state == BehaviorState::Fleeing {
        c.flee_count += 1;
        c.flee_recovery_cooldown += 1.0;
        return;
    }

    if c.flee_recovery_cooldown > 0.0 {
        c.flee_recovery_cooldown -= 1.0;
    } else if c.flee_count > 0 {
        c.flee_count -= 1;
    }

    if c.tired {
        c.state = BehaviorState::Resting;
        return;
    }

    if c.fullness_level > c.mating_hunger_threshold && c.reproduction_cooldown <= 0.0 {
        c.state = BehaviorState::Mating;
        return;
    }

    if c.fullness_level < c.fullness_cap {
        c.state = BehaviorState::Hunting;
        return;
    }

    c.state = BehaviorState::Exploring;
}

/// Apply movement deltas with the metabolic cost and world-bounds
/// clamp. Fleeing creatures move at double magnitude.
fn apply_move(world: &mut World, idx: usize, mut dx: f64, mut dy: f64) {
    let (width, height) = (world.width, world.height);
    let c = &mut world.creatures[idx];

    if c.state == BehaviorState::Fleeing {
        dx *= 2.0;
        dy *= 2.0;
    }

    c.x += dx;
    c.y += dy;
    c.fullness_level -= (dx.abs() + dy.abs()) * c.metabolic_base_rate * c.metabolic_rate;

    c.x = c.x.clamp(0.0, width);
    c.y = c.y.clamp(0.0, height);
}

/// Step toward a target position, never overshooting on either axis.
fn move_towards(world: &mut World, idx: usize, target_x: f64, target_y: f64) {
    let (dx, dy) = {
        let c = &world.creatures[idx];
        let x_diff = target_x - c.x;
        let y_diff = target_y - c.y;
        let angle = y_diff.atan2(x_diff);
        let mut dx = angle.cos() * c.step_length();
        let mut dy = angle.sin() * c.step_length();
        if dx.abs() > x_diff.abs() {
            dx = x_diff;
        }
        if dy.abs() > y_diff.abs() {
            dy = y_diff;
        }
        (dx, dy)
    };
    apply_move(world, idx, dx, dy);
}

fn go_hunt(world: &mut World, idx: usize, tracking: &mut Tracking) {
    // Capture the carried target id first so a stale entry still gets
    // its competition slot released on retarget, then invalidate it
    // before scoring.
    let old_id = world.creatures[idx].target.id();
    if let Target::Food(food_id) = world.creatures[idx].target {
        let live = world
            .foods
            .iter()
            .any(|f| f.id() == food_id && !f.is_consumed());
        if !live {
            world.creatures[idx].target = Target::None;
        }
    }

    let best = targeting::find_best_target(
        &world.creatures[idx],
        &world.foods,
        &world.creatures,
        tracking,
    );

    if best.is_none() {
        // Nothing edible anywhere: wander on a fresh random heading.
        let angle = world.rng.gen::<f64>() * 2.0 * PI;
        let (dx, dy) = {
            let c = &world.creatures[idx];
            (angle.cos() * c.step_length(), angle.sin() * c.step_length())
        };
        apply_move(world, idx, dx, dy);
        return;
    }

    tracking.retarget(old_id, best.id());
    world.creatures[idx].target = best;

    let resolved = match best {
        Target::Food(food_id) => world
            .food_by_id(food_id)
            .map(|f| (f.x(), f.y(), f.size())),
        Target::Creature(creature_id) => world
            .creature_by_id(creature_id)
            .map(|p| (p.x, p.y, p.size)),
        Target::None => None,
    };
    let Some((target_x, target_y, target_size)) = resolved else {
        return;
    };

    move_towards(world, idx, target_x, target_y);

    let within_reach = {
        let c = &world.creatures[idx];
        c.distance_to(target_x, target_y) <= target_size + c.size / 2.0
    };
    if within_reach {
        match best {
            Target::Food(food_id) => consume_food(world, idx, food_id),
            Target::Creature(creature_id) => {
                if let Some(prey_idx) = world.creatures.iter().position(|c| c.id == creature_id) {
                    attack_prey(world, idx, prey_idx, tracking);
                }
            }
            Target::None => {}
        }
    }
}

fn consume_food(world: &mut World, idx: usize, food_id: FoodId) {
    let Some(food) = world.foods.iter_mut().find(|f| f.id() == food_id) else {
        return;
    };
    let energy = food.energy_content();
    food.mark_consumed();

    let c = &mut world.creatures[idx];
    c.fullness_level += energy;
    c.target = Target::None;
    c.tired = true;
    c.recovery_needed = FOOD_RECOVERY_TICKS;
}

/// Flat attack-power subtraction; prey defence is not applied. A kill
/// is tallied as predation here, before the generic health check could
/// ever relabel it.
fn attack_prey(world: &mut World, attacker_idx: usize, prey_idx: usize, tracking: &mut Tracking) {
    let attack_power = world.creatures[attacker_idx].attack_power;

    let prey = &mut world.creatures[prey_idx];
    if prey.dead {
        return;
    }
    prey.health -= attack_power;
    if prey.health > 0.0 {
        return;
    }

    prey.dead = true;
    prey.death_cause = Some(DeathCause::Predation);
    let energy = prey.energy_content();
    tracking.death_cause.record(DeathCause::Predation);
    tracking.deaths.push(prey.species_name.clone());
    tracking.prey_removals.push(prey.id);

    let attacker = &mut world.creatures[attacker_idx];
    attacker.fullness_level += energy;
    attacker.target = Target::None;
    attacker.tired = true;
    attacker.recovery_needed = PREY_RECOVERY_TICKS;
}

fn go_mate(world: &mut World, idx: usize, tracking: &mut Tracking) {
    let partner = {
        let me = &world.creatures[idx];
        world
            .creatures
            .iter()
            .enumerate()
            .filter(|(_, other)| {
                other.id != me.id
                    && other.species_name == me.species_name
                    && other.reproduction_cooldown <= 0.0
            })
            .map(|(i, other)| (i, me.distance_to(other.x, other.y)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
    };
    let Some(partner_idx) = partner else {
        go_explore(world, idx);
        return;
    };

    let (partner_x, partner_y) = {
        let p = &world.creatures[partner_idx];
        (p.x, p.y)
    };
    move_towards(world, idx, partner_x, partner_y);

    let in_contact = {
        let c = &world.creatures[idx];
        c.distance_to(partner_x, partner_y) <= c.size + c.size / 2.0
    };
    if !in_contact {
        return;
    }

    {
        let c = &mut world.creatures[idx];
        c.fullness_level -= c.reproduction_cost;
    }
    {
        let p = &mut world.creatures[partner_idx];
        p.fullness_level -= p.reproduction_cost;
    }

    let litter = world.creatures[idx].litter_size;
    for _ in 0..litter {
        let genome = genetics::blend_offspring(
            &mut world.rng,
            &world.creatures[idx],
            &world.creatures[partner_idx],
        );
        let baby_id = world.allocate_creature_id();
        let baby_x = world.creatures[idx].x;
        let baby_y = world.creatures[partner_idx].y;
        let baby = Creature::from_settings(baby_id, baby_x, baby_y, &genome);
        tracking.newborns.push(baby);
        tracking.births.push(world.creatures[idx].species_name.clone());
    }

    {
        let c = &mut world.creatures[idx];
        c.reproduction_cooldown = c.reproduction_cooldown_cap;
    }
    {
        let p = &mut world.creatures[partner_idx];
        p.reproduction_cooldown = p.reproduction_cooldown_cap;
    }
}

fn go_flee(world: &mut World, idx: usize) {
    let predator_pos = world.creatures[idx]
        .predator
        .and_then(|predator_id| world.creature_by_id(predator_id))
        .map(|p| (p.x, p.y));
    let Some((predator_x, predator_y)) = predator_pos else {
        // Predator vanished since the safety check: nothing to run from.
        world.creatures[idx].predator = None;
        go_explore(world, idx);
        return;
    };

    let (dx, dy) = {
        let c = &world.creatures[idx];
        let angle = (c.y - predator_y).atan2(c.x - predator_x);
        (angle.cos() * c.step_length(), angle.sin() * c.step_length())
    };
    apply_move(world, idx, dx, dy);
}

fn go_rest(c: &mut Creature) {
    c.recovery_needed -= 1;
    if c.recovery_needed <= 0 {
        c.tired = false;
        c.recovery_needed = 0;
        c.state = BehaviorState::Exploring;
    }
}

fn go_explore(world: &mut World, idx: usize) {
    let angle = match world.creatures[idx].last_direction {
        Some(last) => last + (world.rng.gen::<f64>() * 2.0 * MAX_TURN_ANGLE - MAX_TURN_ANGLE),
        None => world.rng.gen::<f64>() * 2.0 * PI,
    };
    world.creatures[idx].last_direction = Some(angle);

    let (dx, dy) = {
        let c = &world.creatures[idx];
        (angle.cos() * c.step_length(), angle.sin() * c.step_length())
    };
    apply_move(world, idx, dx, dy);
}
