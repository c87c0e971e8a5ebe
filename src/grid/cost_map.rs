//! Per-search cost map
//!
//! Every cell doubles as a blocked flag and a "visited at step N" counter.

use crate::core::error::{Result, StarfallError};
use crate::core::types::GridPos;
use crate::grid::BlockageSource;

/// Raw value of an impassable cell; never overwritten
pub const BLOCKED: u32 = u32::MAX;

/// Raw value of a passable cell the search has not reached yet
pub const UNBLOCKED: u32 = u32::MAX - 1;

/// Decoded view of a cost cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CostCell {
    Blocked,
    Unvisited,
    Visited(u32),
}

impl CostCell {
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            BLOCKED => CostCell::Blocked,
            UNBLOCKED => CostCell::Unvisited,
            step => CostCell::Visited(step),
        }
    }
}

/// Snapshot of a blockage source, annotated as a search runs
#[derive(Debug, Clone)]
pub struct CostMap {
    width: i32,
    height: i32,
    cells: Vec<u32>,
}

impl CostMap {
    /// Query every cell of the source once
    ///
    /// Later changes to the source are not observed; build a new map per search.
    pub fn snapshot<S: BlockageSource + ?Sized>(source: &S) -> Self {
        let width = source.width().max(0);
        let height = source.height().max(0);
        let mut cells = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                cells.push(if source.is_blocked(x, y) { BLOCKED } else { UNBLOCKED });
            }
        }
        Self {
            width,
            height,
            cells,
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn contains(&self, pos: GridPos) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height
    }

    fn index(&self, pos: GridPos) -> Option<usize> {
        self.contains(pos)
            .then(|| (pos.y * self.width + pos.x) as usize)
    }

    /// Raw value, or None outside the map
    pub fn raw(&self, pos: GridPos) -> Option<u32> {
        self.index(pos).map(|i| self.cells[i])
    }

    /// Decoded value; out-of-bounds queries are a caller error
    pub fn cell(&self, pos: GridPos) -> Result<CostCell> {
        self.raw(pos)
            .map(CostCell::from_raw)
            .ok_or(StarfallError::InvalidCoordinate { x: pos.x, y: pos.y })
    }

    /// Record that the search reached `pos` at `step`
    ///
    /// Only lowers the stored value and never touches a blocked cell.
    /// Returns whether anything was written.
    pub fn mark_visited(&mut self, pos: GridPos, step: u32) -> bool {
        let Some(i) = self.index(pos) else {
            return false;
        };
        let current = self.cells[i];
        if current == BLOCKED || current <= step {
            return false;
        }
        self.cells[i] = step;
        true
    }

    /// Force a value at the search origin, blocked or not
    ///
    /// The origin is usually occupied by the mover itself, so it may have
    /// been snapshotted as blocked.
    pub(crate) fn set_origin(&mut self, pos: GridPos) -> Result<()> {
        let i = self
            .index(pos)
            .ok_or(StarfallError::InvalidCoordinate { x: pos.x, y: pos.y })?;
        self.cells[i] = 0;
        Ok(())
    }

    /// Number of cells the search has reached
    pub fn visited_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c < UNBLOCKED).count()
    }
}
