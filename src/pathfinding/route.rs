//! Reconstructed routes consumed one step at a time

use serde::{Deserialize, Serialize};

use crate::core::types::GridPos;
use crate::pathfinding::search::SearchNode;

/// Steps from the target point (index 0) back to the origin (last index)
///
/// The cursor starts on the origin and only ever moves one step toward the
/// target. The steps themselves never change after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    steps: Vec<SearchNode>,
    cursor: usize,
}

impl Route {
    /// `steps` must hold at least the target point
    pub(crate) fn new(steps: Vec<SearchNode>) -> Self {
        debug_assert!(!steps.is_empty());
        let cursor = steps.len().saturating_sub(1);
        Self { steps, cursor }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// All steps, target point first
    pub fn steps(&self) -> &[SearchNode] {
        &self.steps
    }

    /// The step under the cursor
    pub fn get_move(&self) -> &SearchNode {
        &self.steps[self.cursor]
    }

    /// Advance one step toward the target and return it
    ///
    /// Returns None once the last move has been reached; the cursor stays put.
    pub fn next_move(&mut self) -> Option<&SearchNode> {
        if self.is_last_move() {
            return None;
        }
        self.cursor -= 1;
        Some(&self.steps[self.cursor])
    }

    /// The step `next_move` would return, without advancing
    pub fn peek_next(&self) -> Option<&SearchNode> {
        self.cursor.checked_sub(1).map(|i| &self.steps[i])
    }

    /// True when the cursor sits on the target point
    pub fn is_last_move(&self) -> bool {
        self.cursor == 0
    }

    /// Advances left before the last move
    pub fn remaining(&self) -> usize {
        self.cursor
    }

    pub fn origin(&self) -> GridPos {
        self.steps[self.steps.len() - 1].pos
    }

    pub fn destination(&self) -> GridPos {
        self.steps[0].pos
    }
}
