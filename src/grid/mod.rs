//! Grid blockage queries shared by the combat arena and the star map

pub mod blocked;
pub mod cost_map;

pub use blocked::BlockedGrid;
pub use cost_map::{CostCell, CostMap, BLOCKED, UNBLOCKED};

use crate::core::types::GridPos;

/// Anything that can answer "is this cell traversable" for a bounded grid
pub trait BlockageSource {
    fn width(&self) -> i32;

    fn height(&self) -> i32;

    /// Cells outside the extent always report blocked
    fn is_blocked(&self, x: i32, y: i32) -> bool;

    fn contains(&self, pos: GridPos) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width() && pos.y < self.height()
    }
}
