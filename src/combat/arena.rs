//! Tactical combat grid and ship deployment

use serde::{Deserialize, Serialize};

use crate::combat::participant::Side;
use crate::core::config::TacticsConfig;
use crate::core::error::Result;
use crate::core::types::GridPos;
use crate::grid::{BlockageSource, BlockedGrid};

/// Fixed-size battlefield with static obstacles (asteroids, wrecks)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatArena {
    obstacles: BlockedGrid,
}

impl CombatArena {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            obstacles: BlockedGrid::new(width, height),
        }
    }

    pub fn from_config(config: &TacticsConfig) -> Self {
        Self::new(config.combat_width, config.combat_height)
    }

    pub fn add_obstacle(&mut self, x: i32, y: i32) -> Result<()> {
        self.obstacles.block(x, y)
    }

    pub fn is_obstacle(&self, pos: GridPos) -> bool {
        self.obstacles.is_blocked(pos.x, pos.y)
    }

    /// Starting cells for `count` ships of one side
    ///
    /// Defenders start `margin` rows below the top edge, attackers `margin`
    /// rows above the bottom edge. Ships fill a row from the centre column
    /// outward (centre, left, right, further left, ...), then continue on
    /// the next row toward the middle. Obstacles are skipped. Returns fewer
    /// cells than asked for when the half of the arena runs out.
    pub fn deployment_slots(&self, side: Side, count: usize, margin: i32) -> Vec<GridPos> {
        let width = self.obstacles.width();
        let height = self.obstacles.height();
        let (first_row, step) = match side {
            Side::Defender => (margin, 1),
            Side::Attacker => (height - 1 - margin, -1),
        };

        let centre = width / 2;
        let columns: Vec<i32> = std::iter::once(centre)
            .chain((1..=width).flat_map(|offset| [centre - offset, centre + offset]))
            .filter(|x| (0..width).contains(x))
            .collect();

        let mut slots = Vec::with_capacity(count);
        let mut row = first_row;
        while slots.len() < count && (0..height).contains(&row) {
            // Stay in our own half; the middle row of an odd arena is no-man's-land
            if (step > 0 && row >= height / 2) || (step < 0 && row < height - height / 2) {
                break;
            }
            for &x in &columns {
                if slots.len() == count {
                    break;
                }
                let pos = GridPos::new(x, row);
                if !self.is_obstacle(pos) {
                    slots.push(pos);
                }
            }
            row += step;
        }
        slots
    }
}

impl BlockageSource for CombatArena {
    fn width(&self) -> i32 {
        self.obstacles.width()
    }

    fn height(&self) -> i32 {
        self.obstacles.height()
    }

    fn is_blocked(&self, x: i32, y: i32) -> bool {
        self.obstacles.is_blocked(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_ship_deploys_centre() {
        let arena = CombatArena::new(9, 9);
        assert_eq!(
            arena.deployment_slots(Side::Attacker, 1, 1),
            vec![GridPos::new(4, 7)]
        );
        assert_eq!(
            arena.deployment_slots(Side::Defender, 1, 1),
            vec![GridPos::new(4, 1)]
        );
    }

    #[test]
    fn test_row_fills_outward() {
        let arena = CombatArena::new(9, 9);
        let slots = arena.deployment_slots(Side::Defender, 4, 1);
        assert_eq!(
            slots,
            vec![
                GridPos::new(4, 1),
                GridPos::new(3, 1),
                GridPos::new(5, 1),
                GridPos::new(2, 1),
            ]
        );
    }

    #[test]
    fn test_overflow_moves_inward() {
        let arena = CombatArena::new(3, 9);
        let slots = arena.deployment_slots(Side::Attacker, 5, 1);
        assert_eq!(slots.len(), 5);
        assert!(slots[..3].iter().all(|p| p.y == 7));
        assert!(slots[3..].iter().all(|p| p.y == 6));
    }

    #[test]
    fn test_obstacles_skipped() {
        let mut arena = CombatArena::new(9, 9);
        arena.add_obstacle(4, 7).unwrap();
        let slots = arena.deployment_slots(Side::Attacker, 2, 1);
        assert_eq!(slots, vec![GridPos::new(3, 7), GridPos::new(5, 7)]);
    }

    #[test]
    fn test_half_arena_limit() {
        let arena = CombatArena::new(3, 5);
        // Row 2 is the neutral middle row, so each side gets a single row
        let defenders = arena.deployment_slots(Side::Defender, 20, 1);
        let attackers = arena.deployment_slots(Side::Attacker, 20, 1);
        assert!(defenders.iter().all(|d| !attackers.contains(d)));
        assert_eq!(defenders.len(), 3);
        assert_eq!(attackers.len(), 3);
    }
}
