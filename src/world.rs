//! World state and the per-tick scheduler.
//!
//! The world owns every creature and food item plus the seeded RNG, so
//! two worlds built with the same configuration and seed replay the
//! same history tick for tick.

use crate::behavior;
use crate::config::{CreatureSettings, SimulationSettings};
use crate::creature::{Creature, CreatureId, Target};
use crate::food::{Food, FoodId};
use crate::tracking::Tracking;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub struct World {
    pub creatures: Vec<Creature>,
    pub foods: Vec<Food>,
    pub width: f64,
    pub height: f64,
    /// Ticks elapsed since construction.
    pub time: u64,

    food_energy: f64,
    /// Items added per successful replenishment pass.
    base_replication_count: u32,
    /// Set during setup when any configured species can hunt. Offspring
    /// drifting into a predatory diet later do not flip it.
    pub has_predators: bool,

    next_creature_id: CreatureId,
    next_food_id: FoodId,

    pub(crate) rng: ChaCha8Rng,
    seed: u64,
}

impl World {
    /// Create a world with a random seed.
    pub fn new(settings: &SimulationSettings, species: &[CreatureSettings]) -> Self {
        Self::new_with_seed(settings, species, rand::random())
    }

    /// Create a world with an explicit seed, placing the initial food
    /// and creature populations.
    pub fn new_with_seed(
        settings: &SimulationSettings,
        species: &[CreatureSettings],
        seed: u64,
    ) -> Self {
        let base_replication_count =
            (settings.food_respawn_base * settings.food_respawn_multiplier).floor() as u32;
        let mut world = Self {
            creatures: Vec::new(),
            foods: Vec::new(),
            width: settings.width,
            height: settings.height,
            time: 0,
            food_energy: settings.food_energy,
            base_replication_count,
            has_predators: false,
            next_creature_id: 1,
            next_food_id: 1,
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        };
        world.setup_food();
        world.setup_creatures(species);
        world
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    fn setup_food(&mut self) {
        for _ in 0..self.base_replication_count {
            let x = (self.rng.gen::<f64>() * self.width).floor();
            let y = (self.rng.gen::<f64>() * self.height).floor();
            self.spawn_food(x, y);
        }
    }

    fn setup_creatures(&mut self, species: &[CreatureSettings]) {
        for settings in species {
            for _ in 0..settings.initial_population {
                let x = self.rng.gen::<f64>() * self.width;
                let y = self.rng.gen::<f64>() * self.height;
                self.spawn_creature(x, y, settings);
            }
        }
    }

    /// Add a creature from a genome template, allocating its id.
    pub fn spawn_creature(&mut self, x: f64, y: f64, settings: &CreatureSettings) -> CreatureId {
        let id = self.allocate_creature_id();
        self.creatures.push(Creature::from_settings(id, x, y, settings));
        if settings.diet_type.is_predatory() {
            self.has_predators = true;
        }
        id
    }

    /// Add a food item at the given position, allocating its id.
    pub fn spawn_food(&mut self, x: f64, y: f64) -> FoodId {
        let id = self.next_food_id;
        self.next_food_id += 1;
        self.foods.push(Food::new(id, x, y, self.food_energy));
        id
    }

    pub(crate) fn allocate_creature_id(&mut self) -> CreatureId {
        let id = self.next_creature_id;
        self.next_creature_id += 1;
        id
    }

    pub fn creature_by_id(&self, id: CreatureId) -> Option<&Creature> {
        self.creatures.iter().find(|c| c.id == id)
    }

    pub fn food_by_id(&self, id: FoodId) -> Option<&Food> {
        self.foods.iter().find(|f| f.id() == id)
    }

    pub fn population(&self) -> usize {
        self.creatures.len()
    }

    /// Unconsumed food items currently available.
    pub fn available_food(&self) -> usize {
        self.foods.iter().filter(|f| !f.is_consumed()).count()
    }

    pub fn is_extinct(&self) -> bool {
        self.creatures.is_empty()
    }

    /// Coin-flip gate on replenishment, then scatter a fixed batch.
    fn replenish_food(&mut self) {
        if self.rng.gen::<f64>() > 0.5 {
            for _ in 0..self.base_replication_count {
                let x = (self.rng.gen::<f64>() * self.width).round();
                let y = (self.rng.gen::<f64>() * self.height).round();
                self.spawn_food(x, y);
            }
        }
    }

    /// Advance the world by one tick, recording events into `tracking`.
    ///
    /// Phase order: food aging, replenishment, competition seeding,
    /// creature updates, dead-creature removal, consumed-food removal,
    /// newborn insertion. Creatures flagged dead by an earlier attacker
    /// in the same pass are skipped, so nothing acts or dies twice.
    pub fn update(&mut self, tracking: &mut Tracking) {
        for food in &mut self.foods {
            food.age();
        }
        self.replenish_food();

        // Seed competition from targets carried over from last tick.
        for creature in &self.creatures {
            if let Some(id) = creature.target.id() {
                *tracking.food_competition.entry(id).or_insert(0) += 1;
            }
        }

        let count = self.creatures.len();
        let mut removals: Vec<CreatureId> = Vec::new();
        for idx in 0..count {
            if self.creatures[idx].dead {
                continue;
            }
            behavior::update_creature(self, idx, tracking);

            let creature = &self.creatures[idx];
            if creature.dead && !tracking.prey_removals.contains(&creature.id) {
                if let Some(cause) = creature.death_cause {
                    tracking.death_cause.record(cause);
                }
                tracking.deaths.push(creature.species_name.clone());
                removals.push(creature.id);
            }
        }
        removals.extend(tracking.prey_removals.iter().copied());

        if !removals.is_empty() {
            for creature in &mut self.creatures {
                if let Target::Creature(target_id) = creature.target {
                    if removals.contains(&target_id) {
                        creature.target = Target::None;
                    }
                }
            }
            self.creatures.retain(|c| !removals.contains(&c.id));
        }

        let consumed: Vec<FoodId> = self
            .foods
            .iter()
            .filter(|f| f.is_consumed())
            .map(|f| f.id())
            .collect();
        if !consumed.is_empty() {
            for creature in &mut self.creatures {
                if let Target::Food(target_id) = creature.target {
                    if consumed.contains(&target_id) {
                        creature.target = Target::None;
                    }
                }
            }
            self.foods.retain(|f| !f.is_consumed());
        }

        self.creatures.append(&mut tracking.newborns);

        self.time += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::creature::{DietPreference, DietType};

    fn small_settings() -> SimulationSettings {
        SimulationSettings {
            width: 200.0,
            height: 200.0,
            ..SimulationSettings::default()
        }
    }

    fn predator_settings() -> CreatureSettings {
        CreatureSettings {
            species_name: "Wolf".to_string(),
            diet_type: DietType::Carnivore,
            diet_preference: DietPreference::Meat,
            attack_power: 500.0,
            ..CreatureSettings::default()
        }
    }

    #[test]
    fn test_setup_places_initial_population() {
        let config = Config::default();
        let world = World::new_with_seed(&config.simulation, &config.species, 1);

        let expected: u32 = config.species.iter().map(|s| s.initial_population).sum();
        assert_eq!(world.population(), expected as usize);
        assert_eq!(world.available_food() as u32, 1);

        for c in &world.creatures {
            assert!(c.x >= 0.0 && c.x <= world.width);
            assert!(c.y >= 0.0 && c.y <= world.height);
        }
    }

    #[test]
    fn test_ids_are_unique_and_stable() {
        let config = Config::default();
        let mut world = World::new_with_seed(&config.simulation, &config.species, 2);
        let mut tracking = Tracking::new();
        world.update(&mut tracking);

        let mut ids: Vec<CreatureId> = world.creatures.iter().map(|c| c.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), world.population());
    }

    #[test]
    fn test_same_seed_replays_identically() {
        let config = Config::default();
        let mut a = World::new_with_seed(&config.simulation, &config.species, 99);
        let mut b = World::new_with_seed(&config.simulation, &config.species, 99);

        for _ in 0..50 {
            let mut ta = Tracking::new();
            let mut tb = Tracking::new();
            a.update(&mut ta);
            b.update(&mut tb);
            assert_eq!(ta.deaths, tb.deaths);
            assert_eq!(ta.births, tb.births);
            assert_eq!(ta.death_cause, tb.death_cause);
            assert_eq!(a.population(), b.population());
            assert_eq!(a.foods.len(), b.foods.len());
        }
        let pos_a: Vec<(f64, f64)> = a.creatures.iter().map(|c| (c.x, c.y)).collect();
        let pos_b: Vec<(f64, f64)> = b.creatures.iter().map(|c| (c.x, c.y)).collect();
        assert_eq!(pos_a, pos_b);
    }

    #[test]
    fn test_predation_removes_prey_and_feeds_attacker() {
        let mut world = World::new_with_seed(&small_settings(), &[], 3);
        let predator = predator_settings();
        let prey = CreatureSettings {
            species_name: "Rabbit".to_string(),
            ..CreatureSettings::default()
        };
        let predator_id = world.spawn_creature(50.0, 50.0, &predator);
        let prey_id = world.spawn_creature(52.0, 50.0, &prey);
        // Hungry predator so it hunts immediately.
        {
            let idx = world
                .creatures
                .iter()
                .position(|c| c.id == predator_id)
                .unwrap();
            world.creatures[idx].fullness_level = 10.0;
        }

        let mut tracking = Tracking::new();
        world.update(&mut tracking);

        assert!(world.creature_by_id(prey_id).is_none());
        assert_eq!(tracking.death_cause.predation, 1);
        assert_eq!(tracking.deaths, vec!["Rabbit".to_string()]);
        let predator = world.creature_by_id(predator_id).unwrap();
        assert!(predator.tired);
        assert!(predator.fullness_level > 10.0);
    }

    #[test]
    fn test_prey_killed_before_its_turn_does_not_act_or_die_twice() {
        let mut world = World::new_with_seed(&small_settings(), &[], 4);
        let predator_id = world.spawn_creature(50.0, 50.0, &predator_settings());
        let prey = CreatureSettings {
            species_name: "Rabbit".to_string(),
            ..CreatureSettings::default()
        };
        let prey_id = world.spawn_creature(51.0, 50.0, &prey);
        {
            let idx = world
                .creatures
                .iter()
                .position(|c| c.id == predator_id)
                .unwrap();
            world.creatures[idx].fullness_level = 10.0;
        }
        // Predator sits at a lower index, so the prey is already dead
        // when the scheduler reaches its slot.
        assert!(world.creatures[0].id == predator_id);

        let mut tracking = Tracking::new();
        world.update(&mut tracking);

        assert!(world.creature_by_id(prey_id).is_none());
        assert_eq!(tracking.death_cause.total(), 1);
        assert_eq!(tracking.deaths.len(), 1);
    }

    #[test]
    fn test_dangling_creature_targets_cleared() {
        let mut world = World::new_with_seed(&small_settings(), &[], 5);
        let predator_id = world.spawn_creature(10.0, 10.0, &predator_settings());
        let rival_id = world.spawn_creature(190.0, 190.0, &predator_settings());
        let prey = CreatureSettings {
            species_name: "Rabbit".to_string(),
            ..CreatureSettings::default()
        };
        let prey_id = world.spawn_creature(11.0, 10.0, &prey);
        {
            let idx = world
                .creatures
                .iter()
                .position(|c| c.id == predator_id)
                .unwrap();
            world.creatures[idx].fullness_level = 10.0;
        }
        // Distant rival already locked onto the same prey.
        {
            let idx = world
                .creatures
                .iter()
                .position(|c| c.id == rival_id)
                .unwrap();
            world.creatures[idx].target = Target::Creature(prey_id);
            world.creatures[idx].fullness_level = world.creatures[idx].fullness_cap;
        }

        let mut tracking = Tracking::new();
        world.update(&mut tracking);

        assert!(world.creature_by_id(prey_id).is_none());
        let rival = world.creature_by_id(rival_id).unwrap();
        assert_eq!(rival.target, Target::None);
    }

    #[test]
    fn test_expired_food_removed_and_targets_reset() {
        let mut world = World::new_with_seed(&small_settings(), &[], 6);
        let food_id = world.spawn_food(100.0, 100.0);
        let grazer_id = world.spawn_creature(10.0, 10.0, &CreatureSettings::default());
        {
            let idx = world
                .creatures
                .iter()
                .position(|c| c.id == grazer_id)
                .unwrap();
            world.creatures[idx].target = Target::Food(food_id);
        }
        {
            let food = world.foods.iter_mut().find(|f| f.id() == food_id).unwrap();
            for _ in 0..crate::food::FOOD_LIFETIME {
                food.age();
            }
            assert!(food.is_consumed());
        }

        let mut tracking = Tracking::new();
        world.update(&mut tracking);

        assert!(world.food_by_id(food_id).is_none());
        let grazer = world.creature_by_id(grazer_id).unwrap();
        assert_ne!(grazer.target, Target::Food(food_id));
    }

    #[test]
    fn test_age_death_recorded() {
        let mut world = World::new_with_seed(&small_settings(), &[], 7);
        let id = world.spawn_creature(100.0, 100.0, &CreatureSettings::default());
        {
            let idx = world.creatures.iter().position(|c| c.id == id).unwrap();
            // Far past the cap so the death probability saturates.
            world.creatures[idx].age = world.creatures[idx].age_cap + 20.0;
        }

        let mut tracking = Tracking::new();
        world.update(&mut tracking);

        assert!(world.is_extinct());
        assert_eq!(tracking.death_cause.age, 1);
    }

    #[test]
    fn test_starvation_death_recorded_as_hunger() {
        let mut world = World::new_with_seed(&small_settings(), &[], 8);
        let id = world.spawn_creature(100.0, 100.0, &CreatureSettings::default());
        {
            let idx = world.creatures.iter().position(|c| c.id == id).unwrap();
            let c = &mut world.creatures[idx];
            c.fullness_level = -10.0;
            c.reserve_energy = 0.0;
            c.health = 5.0;
        }

        let mut tracking = Tracking::new();
        world.update(&mut tracking);

        assert!(world.is_extinct());
        assert_eq!(tracking.death_cause.hunger, 1);
    }

    #[test]
    fn test_newborns_join_world_after_tick() {
        let mut world = World::new_with_seed(&small_settings(), &[], 9);
        let settings = CreatureSettings::default();
        let a = world.spawn_creature(100.0, 100.0, &settings);
        let b = world.spawn_creature(101.0, 100.0, &settings);
        for id in [a, b] {
            let idx = world.creatures.iter().position(|c| c.id == id).unwrap();
            let c = &mut world.creatures[idx];
            c.fullness_level = c.fullness_cap;
            c.reproduction_cooldown = 0.0;
        }

        let mut tracking = Tracking::new();
        world.update(&mut tracking);

        assert!(!tracking.births.is_empty());
        assert!(tracking.newborns.is_empty());
        assert_eq!(world.population(), 2 + tracking.births.len());
        let parent = world.creature_by_id(a).unwrap();
        assert!(parent.reproduction_cooldown > 0.0);
    }

    #[test]
    fn test_positions_stay_in_bounds_over_run() {
        let config = Config::default();
        let mut world = World::new_with_seed(&config.simulation, &config.species, 10);
        for _ in 0..200 {
            let mut tracking = Tracking::new();
            world.update(&mut tracking);
            for c in &world.creatures {
                assert!(c.x >= 0.0 && c.x <= world.width, "x out of bounds: {}", c.x);
                assert!(c.y >= 0.0 && c.y <= world.height, "y out of bounds: {}", c.y);
                assert!(c.fullness_level.is_finite());
            }
            if world.is_extinct() {
                break;
            }
        }
    }

    #[test]
    fn test_death_tally_matches_death_names() {
        let config = Config::default();
        let mut world = World::new_with_seed(&config.simulation, &config.species, 11);
        for _ in 0..300 {
            let mut tracking = Tracking::new();
            world.update(&mut tracking);
            assert_eq!(tracking.death_cause.total() as usize, tracking.deaths.len());
            if world.is_extinct() {
                break;
            }
        }
    }

    #[test]
    fn test_flee_from_predator() {
        let mut world = World::new_with_seed(&small_settings(), &[], 12);
        let predator = predator_settings();
        let skittish = CreatureSettings {
            species_name: "Rabbit".to_string(),
            skittish_multiplier_base: 100.0,
            skittish_multiplier_scared: 100.0,
            ..CreatureSettings::default()
        };
        let predator_id = world.spawn_creature(100.0, 100.0, &predator);
        let rabbit_id = world.spawn_creature(110.0, 100.0, &skittish);
        // Keep the predator sated so it does not immediately attack.
        {
            let idx = world
                .creatures
                .iter()
                .position(|c| c.id == predator_id)
                .unwrap();
            world.creatures[idx].fullness_level = world.creatures[idx].fullness_cap;
        }

        let mut tracking = Tracking::new();
        world.update(&mut tracking);

        if let Some(rabbit) = world.creature_by_id(rabbit_id) {
            assert_eq!(rabbit.state, crate::creature::BehaviorState::Fleeing);
            assert_eq!(rabbit.predator, Some(predator_id));
            assert!(rabbit.x > 110.0);
        }
    }

    #[test]
    fn test_hunger_labels_health_exhaustion() {
        // Zero health without a predation flag is a starvation death.
        let mut world = World::new_with_seed(&small_settings(), &[], 13);
        let id = world.spawn_creature(100.0, 100.0, &CreatureSettings::default());
        {
            let idx = world.creatures.iter().position(|c| c.id == id).unwrap();
            world.creatures[idx].health = 0.0;
        }
        let mut tracking = Tracking::new();
        world.update(&mut tracking);
        assert_eq!(tracking.death_cause.hunger, 1);
        assert_eq!(tracking.death_cause.total(), 1);
    }
}
