//! Blocked cells on a bounded rectangle
//!
//! Uses a HashSet-based approach for O(1) lookup of blocked cells.

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use crate::core::error::{Result, StarfallError};
use crate::core::types::GridPos;
use crate::grid::BlockageSource;

/// Bounded grid with a set of impassable cells
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockedGrid {
    width: i32,
    height: i32,
    cells: AHashSet<GridPos>,
}

impl BlockedGrid {
    /// Create an open grid of the given size
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            cells: AHashSet::new(),
        }
    }

    /// Block a cell
    ///
    /// Returns InvalidCoordinate for cells outside the grid.
    pub fn block(&mut self, x: i32, y: i32) -> Result<()> {
        let pos = GridPos::new(x, y);
        if !self.contains(pos) {
            return Err(StarfallError::InvalidCoordinate { x, y });
        }
        self.cells.insert(pos);
        Ok(())
    }

    /// Block every cell of a row
    pub fn block_row(&mut self, y: i32) -> Result<()> {
        for x in 0..self.width {
            self.block(x, y)?;
        }
        Ok(())
    }

    /// Unblock a cell
    pub fn unblock(&mut self, x: i32, y: i32) {
        self.cells.remove(&GridPos::new(x, y));
    }

    /// Number of blocked cells
    pub fn blocked_count(&self) -> usize {
        self.cells.len()
    }
}

impl BlockageSource for BlockedGrid {
    fn width(&self) -> i32 {
        self.width
    }

    fn height(&self) -> i32 {
        self.height
    }

    fn is_blocked(&self, x: i32, y: i32) -> bool {
        !self.contains(GridPos::new(x, y)) || self.cells.contains(&GridPos::new(x, y))
    }
}
