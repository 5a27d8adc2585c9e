//! Immutable render snapshot of the world, decoupled from simulation
//! state so observers never hold a borrow into the live world.

use crate::world::World;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatureView {
    pub id: u64,
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub color: (u8, u8, u8),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodView {
    pub id: u64,
    pub x: f64,
    pub y: f64,
    pub size: f64,
}

/// Everything a frame consumer needs for one tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub time: u64,
    pub width: f64,
    pub height: f64,
    pub creatures: Vec<CreatureView>,
    pub food: Vec<FoodView>,
}

impl WorldSnapshot {
    pub fn from_world(world: &World) -> Self {
        Self {
            time: world.time,
            width: world.width,
            height: world.height,
            creatures: world
                .creatures
                .iter()
                .map(|c| CreatureView {
                    id: c.id,
                    x: c.x,
                    y: c.y,
                    size: c.size,
                    color: (c.color_r, c.color_g, c.color_b),
                })
                .collect(),
            food: world
                .foods
                .iter()
                .filter(|f| !f.is_consumed())
                .map(|f| FoodView {
                    id: f.id(),
                    x: f.x(),
                    y: f.y(),
                    size: f.size(),
                })
                .collect(),
        }
    }
}
