//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Integer cell coordinate on a bounded grid
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Straight-line distance between cell coordinates
    pub fn distance(&self, other: &GridPos) -> f64 {
        let dx = f64::from(self.x - other.x);
        let dy = f64::from(self.y - other.y);
        (dx * dx + dy * dy).sqrt()
    }

    /// Distance rounded up to whole cells, the unit weapon ranges and
    /// acceptance radii are expressed in
    pub fn cell_distance(&self, other: &GridPos) -> u32 {
        self.distance(other).ceil() as u32
    }

    /// The 8 surrounding cells in scan order: row above, same row, row below,
    /// each read left to right.
    ///
    /// Search and route reconstruction both depend on this exact order.
    pub fn neighbors(&self) -> [GridPos; 8] {
        [
            GridPos::new(self.x - 1, self.y - 1),
            GridPos::new(self.x, self.y - 1),
            GridPos::new(self.x + 1, self.y - 1),
            GridPos::new(self.x - 1, self.y),
            GridPos::new(self.x + 1, self.y),
            GridPos::new(self.x - 1, self.y + 1),
            GridPos::new(self.x, self.y + 1),
            GridPos::new(self.x + 1, self.y + 1),
        ]
    }

    /// True for the 8 surrounding cells (not for the cell itself)
    pub fn is_adjacent(&self, other: &GridPos) -> bool {
        self != other && (self.x - other.x).abs() <= 1 && (self.y - other.y).abs() <= 1
    }
}

/// Unique identifier for ships
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShipId(pub u32);

/// Unique identifier for fleets on the star map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FleetId(pub u32);

/// Unique identifier for players (realms)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u32);

/// Identifier for one combat session, used in logs and reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CombatId(pub Uuid);

impl CombatId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CombatId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CombatId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
