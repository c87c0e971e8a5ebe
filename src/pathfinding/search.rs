//! Frontier-list route search over a cost map
//!
//! Not a textbook A*: there is no priority queue. Newly reached cells that
//! are closer to the target than the cell being expanded jump to the front
//! of the frontier, all others queue at the back. Ties and plateaus resolve
//! by insertion order, so the route found depends on the exact neighbor
//! scan order of `GridPos::neighbors`.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, StarfallError};
use crate::core::types::GridPos;
use crate::grid::{BlockageSource, CostMap, BLOCKED, UNBLOCKED};
use crate::pathfinding::route::Route;

/// A reached cell and its straight-line distance to the target
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchNode {
    pub pos: GridPos,
    pub distance: f64,
}

impl SearchNode {
    pub fn new(pos: GridPos, target: GridPos) -> Self {
        Self {
            pos,
            distance: pos.distance(&target),
        }
    }
}

/// Where a pathfinder stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    /// `do_search` has not run yet
    Pending,
    /// A cell within the acceptance radius was reached
    Found,
    /// Frontier emptied (or the step limit hit) without reaching the radius
    Exhausted,
}

/// One search from a start cell toward a target cell
#[derive(Debug, Clone)]
pub struct Pathfinder {
    costs: CostMap,
    frontier: VecDeque<SearchNode>,
    start: GridPos,
    target: GridPos,
    radius: u32,
    step_limit: Option<u32>,
    target_point: Option<SearchNode>,
    state: SearchState,
}

impl Pathfinder {
    /// Snapshot `source` and prepare a search
    ///
    /// The start cell is marked visited at step 0 even when the source
    /// reports it blocked (it is usually occupied by the mover).
    pub fn new<S: BlockageSource + ?Sized>(
        source: &S,
        start: GridPos,
        target: GridPos,
        radius: u32,
    ) -> Result<Self> {
        for pos in [start, target] {
            if !source.contains(pos) {
                return Err(StarfallError::InvalidCoordinate { x: pos.x, y: pos.y });
            }
        }

        let mut costs = CostMap::snapshot(source);
        costs.set_origin(start)?;

        let mut frontier = VecDeque::new();
        frontier.push_back(SearchNode::new(start, target));

        Ok(Self {
            costs,
            frontier,
            start,
            target,
            radius,
            step_limit: None,
            target_point: None,
            state: SearchState::Pending,
        })
    }

    /// Give up after `limit` expansions
    pub fn with_step_limit(mut self, limit: u32) -> Self {
        self.step_limit = Some(limit);
        self
    }

    pub fn state(&self) -> SearchState {
        self.state
    }

    pub fn cost_map(&self) -> &CostMap {
        &self.costs
    }

    /// The cell that satisfied the acceptance radius, once found
    pub fn target_point(&self) -> Option<&SearchNode> {
        self.target_point.as_ref()
    }

    /// Run the search to completion
    ///
    /// Returns true when a cell whose rounded-up distance to the target
    /// equals the acceptance radius was reached. Calling again returns the
    /// first result without searching twice.
    pub fn do_search(&mut self) -> bool {
        match self.state {
            SearchState::Found => return true,
            SearchState::Exhausted => return false,
            SearchState::Pending => {}
        }

        if self.start.cell_distance(&self.target) <= self.radius {
            self.target_point = Some(SearchNode::new(self.start, self.target));
            self.state = SearchState::Found;
            self.frontier.clear();
            return true;
        }

        let mut step: u32 = 0;
        while let Some(node) = self.frontier.pop_front() {
            step += 1;
            if self.step_limit.is_some_and(|limit| step > limit) {
                tracing::debug!(limit = step - 1, "route search hit step limit");
                break;
            }

            for next in node.pos.neighbors() {
                match self.costs.raw(next) {
                    Some(raw) if raw != BLOCKED && raw > step => {}
                    _ => continue,
                }
                self.costs.mark_visited(next, step);

                let candidate = SearchNode::new(next, self.target);
                if candidate.distance < node.distance {
                    self.frontier.push_front(candidate);
                } else {
                    self.frontier.push_back(candidate);
                }

                if candidate.distance.ceil() as u32 == self.radius {
                    tracing::debug!(
                        start = ?self.start,
                        target = ?self.target,
                        radius = self.radius,
                        steps = step,
                        "route search succeeded"
                    );
                    self.target_point = Some(candidate);
                    self.state = SearchState::Found;
                    self.frontier.clear();
                    return true;
                }
            }
        }

        tracing::debug!(
            start = ?self.start,
            target = ?self.target,
            radius = self.radius,
            "route search exhausted"
        );
        self.frontier.clear();
        self.state = SearchState::Exhausted;
        false
    }

    /// Walk the visited-step gradient from the target point back to the start
    ///
    /// Each step takes the neighbor with the lowest step value that is still
    /// below the previous one, so the walk strictly descends and ends on the
    /// start (step 0).
    pub fn do_route(&self) -> Result<Route> {
        let (SearchState::Found, Some(target_point)) = (self.state, self.target_point) else {
            return Err(StarfallError::SearchNotReady);
        };

        let mut steps = vec![target_point];
        let mut current = target_point.pos;
        let mut threshold = UNBLOCKED;

        while self.costs.raw(current) != Some(0) {
            let mut best = None;
            for next in current.neighbors() {
                if let Some(raw) = self.costs.raw(next) {
                    if raw < threshold {
                        threshold = raw;
                        best = Some(next);
                    }
                }
            }
            // A visited cell always borders the cell that discovered it
            let Some(pos) = best else {
                return Err(StarfallError::SearchNotReady);
            };
            steps.push(SearchNode::new(pos, self.target));
            current = pos;
        }

        Ok(Route::new(steps))
    }
}

/// Search and reconstruct in one call
///
/// `Ok(None)` means the target is unreachable within the radius, which is a
/// normal outcome the caller decides how to handle.
pub fn find_route<S: BlockageSource + ?Sized>(
    source: &S,
    start: GridPos,
    target: GridPos,
    radius: u32,
) -> Result<Option<Route>> {
    let mut pathfinder = Pathfinder::new(source, start, target, radius)?;
    if !pathfinder.do_search() {
        return Ok(None);
    }
    pathfinder.do_route().map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{BlockedGrid, CostCell};

    fn reference_arena() -> BlockedGrid {
        let mut grid = BlockedGrid::new(9, 9);
        grid.block(4, 1).unwrap();
        grid.block_row(7).unwrap();
        grid
    }

    #[test]
    fn test_reference_scenario_route() {
        let grid = reference_arena();
        let mut search =
            Pathfinder::new(&grid, GridPos::new(4, 7), GridPos::new(4, 1), 1).unwrap();

        assert!(search.do_search());
        let route = search.do_route().unwrap();

        let cells: Vec<GridPos> = route.steps().iter().map(|s| s.pos).collect();
        assert_eq!(
            cells,
            vec![
                GridPos::new(5, 1),
                GridPos::new(6, 2),
                GridPos::new(6, 3),
                GridPos::new(5, 4),
                GridPos::new(4, 5),
                GridPos::new(3, 6),
                GridPos::new(4, 7),
            ]
        );
    }

    #[test]
    fn test_blocked_cells_survive_search() {
        let grid = reference_arena();
        let mut search =
            Pathfinder::new(&grid, GridPos::new(4, 7), GridPos::new(4, 1), 1).unwrap();
        search.do_search();

        let costs = search.cost_map();
        assert_eq!(costs.cell(GridPos::new(3, 7)).unwrap(), CostCell::Blocked);
        assert_eq!(costs.cell(GridPos::new(4, 1)).unwrap(), CostCell::Blocked);
        assert_eq!(costs.cell(GridPos::new(4, 7)).unwrap(), CostCell::Visited(0));
    }

    #[test]
    fn test_first_expansion_is_step_one() {
        let grid = BlockedGrid::new(5, 5);
        let mut search =
            Pathfinder::new(&grid, GridPos::new(0, 0), GridPos::new(4, 4), 0).unwrap();
        search.do_search();

        let costs = search.cost_map();
        assert_eq!(costs.cell(GridPos::new(1, 0)).unwrap(), CostCell::Visited(1));
        assert_eq!(costs.cell(GridPos::new(1, 1)).unwrap(), CostCell::Visited(1));
    }

    #[test]
    fn test_start_within_radius() {
        let grid = BlockedGrid::new(9, 9);
        let mut search =
            Pathfinder::new(&grid, GridPos::new(4, 4), GridPos::new(4, 5), 1).unwrap();

        assert!(search.do_search());
        let route = search.do_route().unwrap();
        assert_eq!(route.len(), 1);
        assert!(route.is_last_move());
        assert_eq!(route.get_move().pos, GridPos::new(4, 4));
    }

    #[test]
    fn test_enclosed_target_fails() {
        let mut grid = BlockedGrid::new(9, 9);
        let target = GridPos::new(6, 6);
        for n in target.neighbors() {
            grid.block(n.x, n.y).unwrap();
        }

        let mut search = Pathfinder::new(&grid, GridPos::new(0, 0), target, 0).unwrap();
        assert!(!search.do_search());
        assert_eq!(search.state(), SearchState::Exhausted);
        assert!(matches!(search.do_route(), Err(StarfallError::SearchNotReady)));
    }

    #[test]
    fn test_route_before_search_is_error() {
        let grid = BlockedGrid::new(4, 4);
        let search = Pathfinder::new(&grid, GridPos::new(0, 0), GridPos::new(3, 3), 0).unwrap();
        assert!(matches!(search.do_route(), Err(StarfallError::SearchNotReady)));
    }

    #[test]
    fn test_search_is_idempotent() {
        let grid = reference_arena();
        let mut search =
            Pathfinder::new(&grid, GridPos::new(4, 7), GridPos::new(4, 1), 1).unwrap();
        assert!(search.do_search());
        let first = search.target_point().copied();
        assert!(search.do_search());
        assert_eq!(search.target_point().copied(), first);
    }

    #[test]
    fn test_step_limit_gives_up() {
        let grid = BlockedGrid::new(30, 30);
        let mut search = Pathfinder::new(&grid, GridPos::new(0, 0), GridPos::new(29, 29), 0)
            .unwrap()
            .with_step_limit(3);
        assert!(!search.do_search());
    }

    #[test]
    fn test_out_of_bounds_endpoints() {
        let grid = BlockedGrid::new(4, 4);
        let result = Pathfinder::new(&grid, GridPos::new(0, 0), GridPos::new(4, 0), 0);
        assert!(matches!(
            result,
            Err(StarfallError::InvalidCoordinate { x: 4, y: 0 })
        ));
    }

    #[test]
    fn test_find_route_unreachable_is_none() {
        let mut grid = BlockedGrid::new(5, 5);
        grid.block_row(2).unwrap();
        let route = find_route(&grid, GridPos::new(0, 0), GridPos::new(0, 4), 0).unwrap();
        assert!(route.is_none());
    }
}
