//! Star map - bounded strategic grid
//!
//! Provides the map fleets travel across. Obstacles (black holes, dense
//! nebulae) block travel; fleets never block each other, they engage.

use serde::{Deserialize, Serialize};

use crate::core::config::TacticsConfig;
use crate::core::error::Result;
use crate::core::types::GridPos;
use crate::grid::{BlockageSource, BlockedGrid};
use crate::pathfinding::{Pathfinder, Route};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StarMap {
    obstacles: BlockedGrid,
    step_limit: Option<u32>,
}

impl StarMap {
    /// Create an open star map
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            obstacles: BlockedGrid::new(width, height),
            step_limit: None,
        }
    }

    /// Map sized and search-capped from the configuration
    pub fn from_config(config: &TacticsConfig) -> Self {
        Self {
            obstacles: BlockedGrid::new(config.starmap_width, config.starmap_height),
            step_limit: config.search_step_limit,
        }
    }

    pub fn add_obstacle(&mut self, x: i32, y: i32) -> Result<()> {
        self.obstacles.block(x, y)
    }

    /// Route between two sectors, None if unreachable
    pub fn find_route(&self, start: GridPos, target: GridPos, radius: u32) -> Result<Option<Route>> {
        let mut search = Pathfinder::new(self, start, target, radius)?;
        if let Some(limit) = self.step_limit {
            search = search.with_step_limit(limit);
        }
        if !search.do_search() {
            return Ok(None);
        }
        search.do_route().map(Some)
    }
}

impl BlockageSource for StarMap {
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
