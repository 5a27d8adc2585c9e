//! Perishable food resource.

use serde::{Deserialize, Serialize};

/// Unique food identifier
pub type FoodId = u64;

/// Ticks a food item survives before rotting away.
pub const FOOD_LIFETIME: i32 = 500;

/// A food item: fixed position, energy value and a limited lifetime.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Food {
    id: FoodId,
    x: f64,
    y: f64,
    size: f64,
    energy_content: f64,
    consumed: bool,
    remaining_life: i32,
}

impl Food {
    pub fn new(id: FoodId, x: f64, y: f64, energy_content: f64) -> Self {
        Self {
            id,
            x,
            y,
            size: 3.0,
            energy_content,
            consumed: false,
            remaining_life: FOOD_LIFETIME,
        }
    }

    /// Advance the lifetime counter; expired food counts as consumed.
    pub fn age(&mut self) {
        self.remaining_life -= 1;
        if self.remaining_life <= 0 {
            self.consumed = true;
            self.energy_content = 0.0;
        }
    }

    /// Mark as consumed and zero the stored energy.
    pub fn mark_consumed(&mut self) {
        self.consumed = true;
        self.energy_content = 0.0;
    }

    #[inline]
    pub fn id(&self) -> FoodId {
        self.id
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.x
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Render size
    #[inline]
    pub fn size(&self) -> f64 {
        self.size
    }

    #[inline]
    pub fn energy_content(&self) -> f64 {
        self.energy_content
    }

    #[inline]
    pub fn is_consumed(&self) -> bool {
        self.consumed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_food_creation() {
        let food = Food::new(1, 10.0, 20.0, 15.0);
        assert_eq!(food.id(), 1);
        assert_eq!(food.energy_content(), 15.0);
        assert!(!food.is_consumed());
    }

    #[test]
    fn test_food_expires() {
        let mut food = Food::new(1, 0.0, 0.0, 15.0);
        for _ in 0..FOOD_LIFETIME {
            food.age();
        }
        assert!(food.is_consumed());
        assert_eq!(food.energy_content(), 0.0);
    }

    #[test]
    fn test_mark_consumed_zeroes_energy() {
        let mut food = Food::new(1, 0.0, 0.0, 15.0);
        food.mark_consumed();
        assert!(food.is_consumed());
        assert_eq!(food.energy_content(), 0.0);
    }
}
